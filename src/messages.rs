// src/messages.rs
use poise::serenity_prelude::{ChannelId, Mentionable};

pub const PERMISSION_DENIED_COMMAND: &str = "You don't have permission to run this command.";

pub const PANEL_CREATED: &str = "Role panel created.";

pub const PANEL_EXPIRED: &str = "This panel is no longer active. \
    Please ask a moderator to post a new one with `/setup_roles`.";

pub const ROLE_CHANGE_FORBIDDEN: &str = "Couldn't change your role because the bot is missing \
    permissions. Please contact a moderator.";

pub const GUEST_REMOVED: &str = "Your Guest role has been removed.";

pub const GUEST_GRANTED: &str = "You now have the Guest role. Welcome to Rouge Lounge!";

pub const CANDIDATE_REMOVED: &str = "Your Candidate role has been removed.";

/// The fields candidates fill in when introducing themselves
pub const ONBOARDING_FIELDS: [&str; 5] = [
    "Name (what we should call you)",
    "VRChat ID",
    "Available hours (days / time of day)",
    "Preferred atmosphere (e.g. calm / chatty / mysterious)",
    "A short message",
];

pub fn candidate_granted(interview_channel: ChannelId) -> String {
    let mut message = format!(
        "You now have the Candidate role.\n\
        Please introduce yourself in {} using this template:\n\n",
        interview_channel.mention()
    );
    for field in ONBOARDING_FIELDS {
        message.push_str(&format!("• {}\n", field));
    }
    message
}

pub fn unexpected_error(error: &str) -> String {
    format!("An error occurred: {}", error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_granted_lists_template() {
        let message = candidate_granted(ChannelId::new(42));
        assert!(message.contains("<#42>"));
        for field in ONBOARDING_FIELDS {
            assert!(message.contains(field), "missing field: {}", field);
        }
    }
}
