use poise::serenity_prelude::{ChannelId, RoleId};

pub const DEFAULT_PANEL_TITLE: &str = "Role Panel";

pub const DEFAULT_PANEL_DESCRIPTION: &str = "Use the buttons below to pick up a role.\n\
    • **Guest**: access to the general channels\n\
    • **Candidate**: please introduce yourself in the interview channel";

/// Settings for one role panel, built from a `/setup_roles` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    pub guest_role: RoleId,
    pub candidate_role: RoleId,
    pub interview_channel: ChannelId,
    pub title: String,
    pub description: String,
}

impl PanelConfig {
    /// Blank or missing text falls back to the defaults
    pub fn new(
        guest_role: RoleId,
        candidate_role: RoleId,
        interview_channel: ChannelId,
        title: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            guest_role,
            candidate_role,
            interview_channel,
            title: non_blank(title).unwrap_or_else(|| DEFAULT_PANEL_TITLE.to_string()),
            description: non_blank(description)
                .unwrap_or_else(|| DEFAULT_PANEL_DESCRIPTION.to_string()),
        }
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}
