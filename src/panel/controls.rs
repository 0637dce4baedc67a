use poise::serenity_prelude as serenity;

use crate::config::PanelConfig;

pub const GUEST_TOGGLE_ID: &str = "guest-toggle";
pub const CANDIDATE_TOGGLE_ID: &str = "candidate-toggle";

/// The two buttons on a role panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Guest,
    Candidate,
}

impl ControlKind {
    pub fn from_custom_id(custom_id: &str) -> Option<Self> {
        match custom_id {
            GUEST_TOGGLE_ID => Some(ControlKind::Guest),
            CANDIDATE_TOGGLE_ID => Some(ControlKind::Candidate),
            _ => None,
        }
    }

    pub fn custom_id(self) -> &'static str {
        match self {
            ControlKind::Guest => GUEST_TOGGLE_ID,
            ControlKind::Candidate => CANDIDATE_TOGGLE_ID,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ControlKind::Guest => "Toggle Guest Role",
            ControlKind::Candidate => "Toggle Candidate Role",
        }
    }

    fn style(self) -> serenity::ButtonStyle {
        match self {
            ControlKind::Guest => serenity::ButtonStyle::Primary,
            ControlKind::Candidate => serenity::ButtonStyle::Secondary,
        }
    }

    /// Audit log reason for adding or removing this control's role
    pub fn audit_reason(self, adding: bool) -> &'static str {
        match (self, adding) {
            (ControlKind::Guest, true) => "Guest role toggle on",
            (ControlKind::Guest, false) => "Guest role toggle off",
            (ControlKind::Candidate, true) => "Candidate role toggle on",
            (ControlKind::Candidate, false) => "Candidate role toggle off",
        }
    }
}

/// A panel ready to publish: embed text plus its buttons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelMessage {
    pub title: String,
    pub description: String,
    pub footer: String,
    pub controls: Vec<ControlKind>,
}

impl PanelMessage {
    pub fn build(config: &PanelConfig, footer: &str) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            footer: footer.to_string(),
            controls: vec![ControlKind::Guest, ControlKind::Candidate],
        }
    }

    pub fn embed(&self) -> serenity::CreateEmbed {
        serenity::CreateEmbed::new()
            .title(&self.title)
            .description(&self.description)
            .footer(serenity::CreateEmbedFooter::new(&self.footer))
            .color(0x9b59b6)
    }

    pub fn components(&self) -> Vec<serenity::CreateActionRow> {
        let buttons = self
            .controls
            .iter()
            .map(|kind| {
                serenity::CreateButton::new(kind.custom_id())
                    .label(kind.label())
                    .style(kind.style())
            })
            .collect();

        vec![serenity::CreateActionRow::Buttons(buttons)]
    }

    pub fn to_create_message(&self) -> serenity::CreateMessage {
        serenity::CreateMessage::new()
            .embed(self.embed())
            .components(self.components())
    }
}
