use async_trait::async_trait;
use poise::serenity_prelude::{ChannelId, RoleId, UserId};
use tracing::{error, info, warn};

use super::controls::ControlKind;
use crate::error::MutationError;
use crate::messages;
use crate::state::PanelBinding;

/// Role reads and writes for one guild
#[async_trait]
pub trait RoleMutator: Send + Sync {
    /// Roles the member holds right now, read from the platform
    async fn member_roles(&self, user_id: UserId) -> Result<Vec<RoleId>, MutationError>;

    async fn add_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> Result<(), MutationError>;

    async fn remove_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> Result<(), MutationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleDirection {
    Add,
    Remove,
}

impl ToggleDirection {
    pub fn decide(current_roles: &[RoleId], role_id: RoleId) -> Self {
        if current_roles.contains(&role_id) {
            ToggleDirection::Remove
        } else {
            ToggleDirection::Add
        }
    }
}

/// How a click ended, with the private reply to send back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleReply {
    Added(String),
    Removed(String),
    Forbidden(String),
    Failed(String),
}

impl ToggleReply {
    pub fn text(&self) -> &str {
        match self {
            ToggleReply::Added(text)
            | ToggleReply::Removed(text)
            | ToggleReply::Forbidden(text)
            | ToggleReply::Failed(text) => text,
        }
    }
}

fn role_for(kind: ControlKind, binding: &PanelBinding) -> RoleId {
    match kind {
        ControlKind::Guest => binding.guest_role_id,
        ControlKind::Candidate => binding.candidate_role_id,
    }
}

fn granted_text(kind: ControlKind, interview_channel: ChannelId) -> String {
    match kind {
        ControlKind::Guest => messages::GUEST_GRANTED.to_string(),
        ControlKind::Candidate => messages::candidate_granted(interview_channel),
    }
}

fn removed_text(kind: ControlKind) -> String {
    match kind {
        ControlKind::Guest => messages::GUEST_REMOVED.to_string(),
        ControlKind::Candidate => messages::CANDIDATE_REMOVED.to_string(),
    }
}

/// Flip the clicking member's membership of the control's role.
///
/// Membership is read fresh on every click; nothing about past clicks is kept.
/// Two overlapping clicks from one member may both pick the same direction,
/// which the platform treats as a no-op.
pub async fn toggle_role<M: RoleMutator + ?Sized>(
    mutator: &M,
    user_id: UserId,
    kind: ControlKind,
    binding: &PanelBinding,
) -> ToggleReply {
    let role_id = role_for(kind, binding);

    let result = async {
        let current = mutator.member_roles(user_id).await?;
        let direction = ToggleDirection::decide(&current, role_id);
        match direction {
            ToggleDirection::Add => {
                mutator
                    .add_role(user_id, role_id, kind.audit_reason(true))
                    .await?
            }
            ToggleDirection::Remove => {
                mutator
                    .remove_role(user_id, role_id, kind.audit_reason(false))
                    .await?
            }
        }
        Ok::<_, MutationError>(direction)
    }
    .await;

    match result {
        Ok(ToggleDirection::Add) => {
            info!("Added role {} to user {} via {}", role_id, user_id, kind.custom_id());
            ToggleReply::Added(granted_text(kind, binding.interview_channel_id))
        }
        Ok(ToggleDirection::Remove) => {
            info!("Removed role {} from user {} via {}", role_id, user_id, kind.custom_id());
            ToggleReply::Removed(removed_text(kind))
        }
        Err(MutationError::PermissionDenied) => {
            warn!(
                "Missing permissions to toggle role {} for user {} - check the bot's role position",
                role_id, user_id
            );
            ToggleReply::Forbidden(messages::ROLE_CHANGE_FORBIDDEN.to_string())
        }
        Err(MutationError::Platform(e)) => {
            error!("Failed to toggle role {} for user {}: {}", role_id, user_id, e);
            ToggleReply::Failed(messages::unexpected_error(&e))
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::state::panel_store::tests::sample_binding;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// In-memory guild: member -> role set
    #[derive(Default)]
    pub(crate) struct FakeGuild {
        pub members: Mutex<HashMap<UserId, HashSet<RoleId>>>,
        pub deny_mutations: bool,
        pub fail_reads: Option<String>,
        pub reasons: Mutex<Vec<String>>,
    }

    impl FakeGuild {
        pub(crate) fn with_member(user_id: UserId, roles: &[RoleId]) -> Self {
            let guild = Self::default();
            guild
                .members
                .lock()
                .unwrap()
                .insert(user_id, roles.iter().copied().collect());
            guild
        }

        pub(crate) fn roles_of(&self, user_id: UserId) -> HashSet<RoleId> {
            self.members
                .lock()
                .unwrap()
                .get(&user_id)
                .cloned()
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl RoleMutator for FakeGuild {
        async fn member_roles(&self, user_id: UserId) -> Result<Vec<RoleId>, MutationError> {
            if let Some(e) = &self.fail_reads {
                return Err(MutationError::Platform(e.clone()));
            }
            Ok(self.roles_of(user_id).into_iter().collect())
        }

        async fn add_role(
            &self,
            user_id: UserId,
            role_id: RoleId,
            reason: &str,
        ) -> Result<(), MutationError> {
            if self.deny_mutations {
                return Err(MutationError::PermissionDenied);
            }
            self.reasons.lock().unwrap().push(reason.to_string());
            self.members
                .lock()
                .unwrap()
                .entry(user_id)
                .or_default()
                .insert(role_id);
            Ok(())
        }

        async fn remove_role(
            &self,
            user_id: UserId,
            role_id: RoleId,
            reason: &str,
        ) -> Result<(), MutationError> {
            if self.deny_mutations {
                return Err(MutationError::PermissionDenied);
            }
            self.reasons.lock().unwrap().push(reason.to_string());
            if let Some(roles) = self.members.lock().unwrap().get_mut(&user_id) {
                roles.remove(&role_id);
            }
            Ok(())
        }
    }

    fn set(roles: &[RoleId]) -> HashSet<RoleId> {
        roles.iter().copied().collect()
    }

    const USER: UserId = UserId::new(7);
    const OTHER_ROLE: RoleId = RoleId::new(77);

    #[test]
    fn test_decide_direction() {
        let roles = [RoleId::new(1), RoleId::new(2)];
        assert_eq!(ToggleDirection::decide(&roles, RoleId::new(2)), ToggleDirection::Remove);
        assert_eq!(ToggleDirection::decide(&roles, RoleId::new(3)), ToggleDirection::Add);
        assert_eq!(ToggleDirection::decide(&[], RoleId::new(3)), ToggleDirection::Add);
    }

    #[tokio::test]
    async fn test_guest_toggle_twice() {
        let binding = sample_binding(1);
        let guild = FakeGuild::with_member(USER, &[OTHER_ROLE]);

        let reply = toggle_role(&guild, USER, ControlKind::Guest, &binding).await;
        assert_eq!(reply, ToggleReply::Added(messages::GUEST_GRANTED.to_string()));
        assert_eq!(guild.roles_of(USER), set(&[OTHER_ROLE, binding.guest_role_id]));

        let reply = toggle_role(&guild, USER, ControlKind::Guest, &binding).await;
        assert_eq!(reply, ToggleReply::Removed(messages::GUEST_REMOVED.to_string()));
        assert_eq!(guild.roles_of(USER), set(&[OTHER_ROLE]));

        assert_eq!(
            *guild.reasons.lock().unwrap(),
            vec!["Guest role toggle on", "Guest role toggle off"]
        );
    }

    #[tokio::test]
    async fn test_candidate_add_includes_onboarding() {
        let binding = sample_binding(1);
        let guild = FakeGuild::with_member(USER, &[]);

        let reply = toggle_role(&guild, USER, ControlKind::Candidate, &binding).await;
        let ToggleReply::Added(text) = &reply else {
            panic!("expected Added, got {:?}", reply);
        };
        assert!(text.contains(&format!("<#{}>", binding.interview_channel_id)));
        for field in messages::ONBOARDING_FIELDS {
            assert!(text.contains(field));
        }
        assert!(guild.roles_of(USER).contains(&binding.candidate_role_id));
        assert!(!guild.roles_of(USER).contains(&binding.guest_role_id));
    }

    #[tokio::test]
    async fn test_candidate_remove() {
        let binding = sample_binding(1);
        let guild = FakeGuild::with_member(USER, &[binding.candidate_role_id]);

        let reply = toggle_role(&guild, USER, ControlKind::Candidate, &binding).await;
        assert_eq!(reply, ToggleReply::Removed(messages::CANDIDATE_REMOVED.to_string()));
        assert!(guild.roles_of(USER).is_empty());
    }

    #[tokio::test]
    async fn test_permission_denied_leaves_roles() {
        let binding = sample_binding(1);
        let mut guild = FakeGuild::with_member(USER, &[OTHER_ROLE]);
        guild.deny_mutations = true;

        let reply = toggle_role(&guild, USER, ControlKind::Guest, &binding).await;
        assert_eq!(
            reply,
            ToggleReply::Forbidden(messages::ROLE_CHANGE_FORBIDDEN.to_string())
        );
        assert_eq!(guild.roles_of(USER), set(&[OTHER_ROLE]));
    }

    #[tokio::test]
    async fn test_other_failure_is_surfaced() {
        let binding = sample_binding(1);
        let mut guild = FakeGuild::with_member(USER, &[]);
        guild.fail_reads = Some("Unknown Member".to_string());

        let reply = toggle_role(&guild, USER, ControlKind::Guest, &binding).await;
        assert_eq!(reply.text(), "An error occurred: Unknown Member");
        assert!(matches!(reply, ToggleReply::Failed(_)));
    }
}
