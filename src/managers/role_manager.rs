use async_trait::async_trait;
use poise::serenity_prelude::{GuildId, Http, RoleId, UserId};
use tracing::debug;

use crate::error::MutationError;
use crate::panel::RoleMutator;

/// Role reads and writes against one guild over the Discord REST API
pub struct RoleManager<'a> {
    http: &'a Http,
    guild_id: GuildId,
}

impl<'a> RoleManager<'a> {
    pub fn new(http: &'a Http, guild_id: GuildId) -> Self {
        Self { http, guild_id }
    }
}

#[async_trait]
impl RoleMutator for RoleManager<'_> {
    async fn member_roles(&self, user_id: UserId) -> Result<Vec<RoleId>, MutationError> {
        let member = self.http.get_member(self.guild_id, user_id).await?;
        debug!(
            "User {} holds {} roles in guild {}",
            user_id,
            member.roles.len(),
            self.guild_id
        );
        Ok(member.roles)
    }

    async fn add_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> Result<(), MutationError> {
        self.http
            .add_member_role(self.guild_id, user_id, role_id, Some(reason))
            .await?;
        Ok(())
    }

    async fn remove_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> Result<(), MutationError> {
        self.http
            .remove_member_role(self.guild_id, user_id, role_id, Some(reason))
            .await?;
        Ok(())
    }
}
