use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    // Configuration errors
    #[error("Missing required environment variable: {name}")]
    MissingEnv { name: String },

    #[error("Invalid config: {message}")]
    ConfigValidation { message: String },

    // State errors
    #[error("Failed to save state to '{path}': {source}")]
    StateSave {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load state from '{path}': {source}")]
    StateLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse state file '{path}': {source}")]
    StateParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported state file version {found} in '{path}' (expected {expected})")]
    StateVersion {
        path: String,
        found: u32,
        expected: u32,
    },

    // Discord errors
    #[error("Discord API error: {message}")]
    Discord { message: String },

    // Generic errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<serenity::Error> for BotError {
    fn from(err: serenity::Error) -> Self {
        BotError::Discord {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for BotError {
    fn from(err: std::io::Error) -> Self {
        BotError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BotError {
    fn from(err: serde_json::Error) -> Self {
        BotError::Internal {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

/// Why a role mutation did not go through
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// The bot lacks Manage Roles or sits below the target role
    #[error("missing permissions to change this role")]
    PermissionDenied,

    #[error("{0}")]
    Platform(String),
}

impl From<serenity::Error> for MutationError {
    fn from(err: serenity::Error) -> Self {
        if is_permission_error(&err) {
            MutationError::PermissionDenied
        } else {
            MutationError::Platform(err.to_string())
        }
    }
}

/// Discord JSON error codes that mean the bot may not touch the resource
const MISSING_ACCESS: isize = 50001;
const MISSING_PERMISSIONS: isize = 50013;

fn is_permission_error(err: &serenity::Error) -> bool {
    if let serenity::Error::Http(serenity::http::HttpError::UnsuccessfulRequest(response)) = err {
        return is_permission_response(response.status_code.as_u16(), response.error.code);
    }
    let err_str = err.to_string();
    err_str.contains("Missing Permissions") || err_str.contains("Missing Access")
}

fn is_permission_response(status: u16, code: isize) -> bool {
    status == 403 || code == MISSING_ACCESS || code == MISSING_PERMISSIONS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_error_from_message() {
        let err = serenity::Error::Other("Missing Permissions");
        assert_eq!(MutationError::from(err), MutationError::PermissionDenied);
    }

    #[test]
    fn test_permission_response_codes() {
        assert!(is_permission_response(403, 0));
        assert!(is_permission_response(400, MISSING_PERMISSIONS));
        assert!(is_permission_response(403, MISSING_PERMISSIONS));
        assert!(is_permission_response(400, MISSING_ACCESS));
        // Unknown Member
        assert!(!is_permission_response(404, 10007));
        assert!(!is_permission_response(500, 0));
    }

    #[test]
    fn test_other_error_keeps_description() {
        let err = serenity::Error::Other("gateway closed");
        assert_eq!(
            MutationError::from(err),
            MutationError::Platform("gateway closed".to_string())
        );
    }

    #[test]
    fn test_missing_env_message() {
        let err = BotError::MissingEnv {
            name: "DISCORD_TOKEN".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing required environment variable: DISCORD_TOKEN"
        );
    }
}
