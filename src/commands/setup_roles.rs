use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};

use crate::config::PanelConfig;
use crate::error::Result as BotResult;
use crate::managers::permission_checker::{check_guild_permissions, log_permission_check_result};
use crate::permissions::member_guild_permissions;
use crate::panel::{publish_panel, PanelMessage, PanelSink, PublishOutcome};
use crate::state::PanelBinding;
use crate::{Context, Error};

/// Replies and posts through the invoking slash command
struct CommandSink<'a> {
    ctx: Context<'a>,
}

#[async_trait]
impl PanelSink for CommandSink<'_> {
    async fn acknowledge(&self, text: &str) -> BotResult<()> {
        self.ctx
            .send(
                poise::CreateReply::default()
                    .content(text)
                    .ephemeral(true),
            )
            .await?;
        Ok(())
    }

    async fn publish(&self, panel: &PanelMessage) -> BotResult<serenity::MessageId> {
        let message = self
            .ctx
            .channel_id()
            .send_message(self.ctx.http(), panel.to_create_message())
            .await?;
        Ok(message.id)
    }
}

/// Post a role panel with Guest and Candidate toggle buttons (moderators only)
#[poise::command(
    slash_command,
    guild_only,
    default_member_permissions = "MANAGE_ROLES"
)]
pub async fn setup_roles(
    ctx: Context<'_>,
    #[description = "The Guest role"] guest_role: serenity::Role,
    #[description = "The Candidate role"] candidate_role: serenity::Role,
    #[description = "Text channel where candidates introduce themselves"]
    #[channel_types("Text")]
    interview_channel: serenity::GuildChannel,
    #[description = "Panel title (optional)"] title: Option<String>,
    #[description = "Panel text (optional)"] description: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("This command must be used in a guild")?;

    // Server-wide permissions; the interaction member only carries the channel's
    let member = guild_id.member(ctx.http(), ctx.author().id).await?;
    let guild = guild_id.to_partial_guild(ctx.http()).await?;
    let caller_permissions = member_guild_permissions(&guild, &member);

    let config = PanelConfig::new(
        guest_role.id,
        candidate_role.id,
        interview_channel.id,
        title,
        description,
    );

    let data = ctx.data();
    let sink = CommandSink { ctx };
    let message_id =
        match publish_panel(&sink, caller_permissions, &config, &data.panel_footer).await? {
            PublishOutcome::Denied => {
                info!(
                    "{} (ID: {}) tried to post a role panel without Manage Roles",
                    ctx.author().name,
                    ctx.author().id
                );
                return Ok(());
            }
            PublishOutcome::Published(message_id) => message_id,
        };

    {
        let mut store = data.panel_store.write().await;
        store.insert(PanelBinding::new(
            message_id,
            guild_id,
            ctx.channel_id(),
            &config,
            ctx.author().id,
        ));
        if let Err(e) = store.save(&data.store_path).await {
            error!(
                "Failed to save panel {} - it will stop working after a restart: {}",
                message_id, e
            );
        }
    }

    // Toggles fail later if the bot sits below either role, so flag it now
    match check_guild_permissions(ctx.http(), guild_id, &[guest_role.id, candidate_role.id]).await
    {
        Ok(check) => log_permission_check_result(&check),
        Err(e) => warn!("Could not verify role hierarchy for new panel: {}", e),
    }

    Ok(())
}
