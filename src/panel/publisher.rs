use async_trait::async_trait;
use poise::serenity_prelude::{MessageId, Permissions};
use tracing::{info, warn};

use super::controls::PanelMessage;
use crate::config::PanelConfig;
use crate::error::Result;
use crate::messages;
use crate::permissions::can_manage_roles;

/// Where a `/setup_roles` invocation sends its output
#[async_trait]
pub trait PanelSink: Send + Sync {
    /// Private reply to the invoking user
    async fn acknowledge(&self, text: &str) -> Result<()>;

    /// Public message in the invoking channel
    async fn publish(&self, panel: &PanelMessage) -> Result<MessageId>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Denied,
    Published(MessageId),
}

/// Check the caller, then acknowledge privately and post the panel.
/// A denied caller gets one private reply and nothing is posted.
pub async fn publish_panel<S: PanelSink + ?Sized>(
    sink: &S,
    caller_permissions: Permissions,
    config: &PanelConfig,
    footer: &str,
) -> Result<PublishOutcome> {
    if !can_manage_roles(caller_permissions) {
        warn!("Caller lacks Manage Roles, not posting a role panel");
        sink.acknowledge(messages::PERMISSION_DENIED_COMMAND).await?;
        return Ok(PublishOutcome::Denied);
    }

    let panel = PanelMessage::build(config, footer);
    sink.acknowledge(messages::PANEL_CREATED).await?;
    let message_id = sink.publish(&panel).await?;

    info!(
        "Posted role panel {} (guest role {}, candidate role {}, interview channel {})",
        message_id, config.guest_role, config.candidate_role, config.interview_channel
    );
    Ok(PublishOutcome::Published(message_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::ControlKind;
    use poise::serenity_prelude::{ChannelId, RoleId};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        private: Mutex<Vec<String>>,
        public: Mutex<Vec<PanelMessage>>,
    }

    #[async_trait]
    impl PanelSink for RecordingSink {
        async fn acknowledge(&self, text: &str) -> Result<()> {
            self.private.lock().unwrap().push(text.to_string());
            Ok(())
        }

        async fn publish(&self, panel: &PanelMessage) -> Result<MessageId> {
            let mut public = self.public.lock().unwrap();
            public.push(panel.clone());
            Ok(MessageId::new(1000 + public.len() as u64))
        }
    }

    fn config() -> PanelConfig {
        PanelConfig::new(RoleId::new(1), RoleId::new(2), ChannelId::new(3), None, None)
    }

    #[tokio::test]
    async fn test_denied_caller_posts_nothing() {
        let sink = RecordingSink::default();
        let outcome = publish_panel(&sink, Permissions::SEND_MESSAGES, &config(), "Lounge")
            .await
            .unwrap();

        assert_eq!(outcome, PublishOutcome::Denied);
        assert!(sink.public.lock().unwrap().is_empty());
        assert_eq!(
            *sink.private.lock().unwrap(),
            vec![messages::PERMISSION_DENIED_COMMAND]
        );
    }

    #[tokio::test]
    async fn test_publishes_one_panel() {
        let sink = RecordingSink::default();
        let outcome = publish_panel(&sink, Permissions::MANAGE_ROLES, &config(), "Lounge")
            .await
            .unwrap();

        assert_eq!(outcome, PublishOutcome::Published(MessageId::new(1001)));
        assert_eq!(*sink.private.lock().unwrap(), vec![messages::PANEL_CREATED]);

        let public = sink.public.lock().unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(
            public[0].controls,
            vec![ControlKind::Guest, ControlKind::Candidate]
        );
        assert_eq!(public[0].title, crate::config::panel::DEFAULT_PANEL_TITLE);
        assert_eq!(public[0].footer, "Lounge");
    }

    #[tokio::test]
    async fn test_administrator_may_publish() {
        let sink = RecordingSink::default();
        let outcome = publish_panel(&sink, Permissions::ADMINISTRATOR, &config(), "Lounge")
            .await
            .unwrap();
        assert!(matches!(outcome, PublishOutcome::Published(_)));
    }

    #[tokio::test]
    async fn test_repeat_invocations_post_duplicates() {
        let sink = RecordingSink::default();
        for _ in 0..2 {
            publish_panel(&sink, Permissions::MANAGE_ROLES, &config(), "Lounge")
                .await
                .unwrap();
        }
        assert_eq!(sink.public.lock().unwrap().len(), 2);
    }
}
