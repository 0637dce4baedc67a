use poise::serenity_prelude::{ChannelId, GuildId, MessageId, RoleId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::PanelConfig;
use crate::error::{BotError, Result};

/// Schema version written by this build; other versions are refused on load
pub const PANEL_STORE_VERSION: u32 = 1;

/// Published role panels, keyed by the panel message ID.
/// Button clicks look their panel up here, so panels keep working across restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelStore {
    /// Schema version
    pub version: u32,

    /// Message ID (as string) -> binding
    pub panels: HashMap<String, PanelBinding>,
}

impl Default for PanelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelStore {
    pub fn new() -> Self {
        Self {
            version: PANEL_STORE_VERSION,
            panels: HashMap::new(),
        }
    }

    /// Load from file, or start empty if the file doesn't exist yet
    pub async fn load(path: &str) -> Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                let store: Self =
                    serde_json::from_str(&content).map_err(|e| BotError::StateParse {
                        path: path.to_string(),
                        source: e,
                    })?;
                if store.version != PANEL_STORE_VERSION {
                    return Err(BotError::StateVersion {
                        path: path.to_string(),
                        found: store.version,
                        expected: PANEL_STORE_VERSION,
                    });
                }
                Ok(store)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(BotError::StateLoad {
                path: path.to_string(),
                source: e,
            }),
        }
    }

    /// Save to file atomically
    pub async fn save(&self, path: &str) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;

        let temp_path = format!("{}.tmp", path);
        tokio::fs::write(&temp_path, &content)
            .await
            .map_err(|e| BotError::StateSave {
                path: path.to_string(),
                source: e,
            })?;

        tokio::fs::rename(&temp_path, path)
            .await
            .map_err(|e| BotError::StateSave {
                path: path.to_string(),
                source: e,
            })?;

        Ok(())
    }

    pub fn insert(&mut self, binding: PanelBinding) {
        self.panels.insert(binding.message_id.to_string(), binding);
    }

    pub fn get(&self, message_id: MessageId) -> Option<&PanelBinding> {
        self.panels.get(&message_id.to_string())
    }

    pub fn remove(&mut self, message_id: MessageId) -> Option<PanelBinding> {
        self.panels.remove(&message_id.to_string())
    }

    /// Drop every panel posted in `channel_id`. Returns how many were removed.
    pub fn remove_channel(&mut self, channel_id: ChannelId) -> usize {
        self.remove_where(|binding| binding.channel_id == channel_id)
    }

    /// Drop every panel belonging to `guild_id`. Returns how many were removed.
    pub fn remove_guild(&mut self, guild_id: GuildId) -> usize {
        self.remove_where(|binding| binding.guild_id == guild_id)
    }

    fn remove_where(&mut self, matches: impl Fn(&PanelBinding) -> bool) -> usize {
        let before = self.panels.len();
        self.panels.retain(|_, binding| !matches(binding));
        before - self.panels.len()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

/// Everything a button click needs to know about the panel it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelBinding {
    pub message_id: MessageId,
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub guest_role_id: RoleId,
    pub candidate_role_id: RoleId,
    pub interview_channel_id: ChannelId,
    pub created_by: UserId,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl PanelBinding {
    pub fn new(
        message_id: MessageId,
        guild_id: GuildId,
        channel_id: ChannelId,
        config: &PanelConfig,
        created_by: UserId,
    ) -> Self {
        Self {
            message_id,
            guild_id,
            channel_id,
            guest_role_id: config.guest_role,
            candidate_role_id: config.candidate_role,
            interview_channel_id: config.interview_channel,
            created_by,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Shared panel store type
pub type SharedPanelStore = Arc<tokio::sync::RwLock<PanelStore>>;

pub fn create_shared_panel_store(store: PanelStore) -> SharedPanelStore {
    Arc::new(tokio::sync::RwLock::new(store))
}
