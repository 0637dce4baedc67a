use tracing_subscriber::filter::LevelFilter;

use crate::error::{BotError, Result};
use crate::logging;

const DEFAULT_STATE_PATH: &str = "state";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_PANEL_FOOTER: &str = "Rouge Lounge";

/// Process-wide settings read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Settings {
    /// Bot token used to open the gateway session
    pub token: String,

    /// Directory holding `panels.json`
    pub state_path: String,

    pub log_level: LevelFilter,

    /// Footer text on every published panel
    pub panel_footer: String,

    /// Guild to restrict command registration to
    pub guild_id: Option<u64>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = get("DISCORD_TOKEN").ok_or_else(|| BotError::MissingEnv {
            name: "DISCORD_TOKEN".to_string(),
        })?;

        let log_level =
            logging::parse_level(&get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.into()))?;

        let guild_id = match get("DISCORD_GUILD_ID") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                BotError::ConfigValidation {
                    message: format!("DISCORD_GUILD_ID '{}' is not a valid guild id", raw),
                }
            })?),
            None => None,
        };

        Ok(Self {
            token,
            state_path: get("STATE_PATH").unwrap_or_else(|| DEFAULT_STATE_PATH.to_string()),
            log_level,
            panel_footer: get("PANEL_FOOTER").unwrap_or_else(|| DEFAULT_PANEL_FOOTER.to_string()),
            guild_id,
        })
    }

    /// Path of the panel store file
    pub fn panel_store_path(&self) -> String {
        format!("{}/panels.json", self.state_path)
    }
}

/// Where slash commands get registered on startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandScope {
    /// Global registration, may take up to an hour to propagate
    Global,
    /// Every guild the bot is in at login
    AllGuilds,
    Guild(u64),
}

impl CommandScope {
    /// A CLI guild id wins over the environment, which wins over `--guild-commands`
    pub fn resolve(guild_commands: bool, cli_guild: Option<u64>, env_guild: Option<u64>) -> Self {
        match cli_guild.or(env_guild) {
            Some(id) => CommandScope::Guild(id),
            None if guild_commands => CommandScope::AllGuilds,
            None => CommandScope::Global,
        }
    }
}
