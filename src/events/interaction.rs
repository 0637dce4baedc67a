use poise::serenity_prelude as serenity;
use tracing::{debug, warn};

use crate::managers::RoleManager;
use crate::messages;
use crate::panel::{toggle_role, ControlKind, RoleMutator};
use crate::state::SharedPanelStore;
use crate::{Data, Error};

/// Handle a button click on a posted role panel
pub async fn handle_component_interaction(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    data: &Data,
) -> Result<(), Error> {
    let Some(kind) = ControlKind::from_custom_id(&interaction.data.custom_id) else {
        debug!("Ignoring unknown button: {}", interaction.data.custom_id);
        return Ok(());
    };

    let reply = match interaction.guild_id {
        Some(guild_id) => {
            let role_manager = RoleManager::new(&ctx.http, guild_id);
            dispatch_click(
                &data.panel_store,
                &role_manager,
                guild_id,
                interaction.message.id,
                interaction.user.id,
                kind,
            )
            .await
        }
        None => messages::PANEL_EXPIRED.to_string(),
    };

    interaction
        .create_response(
            &ctx.http,
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new()
                    .content(reply)
                    .ephemeral(true),
            ),
        )
        .await?;

    Ok(())
}

/// Resolve the clicked panel and toggle its role; returns the private reply text
pub async fn dispatch_click<M: RoleMutator + ?Sized>(
    store: &SharedPanelStore,
    mutator: &M,
    guild_id: serenity::GuildId,
    message_id: serenity::MessageId,
    user_id: serenity::UserId,
    kind: ControlKind,
) -> String {
    let binding = store
        .read()
        .await
        .get(message_id)
        .filter(|binding| binding.guild_id == guild_id)
        .cloned();

    match binding {
        Some(binding) => toggle_role(mutator, user_id, kind, &binding)
            .await
            .text()
            .to_string(),
        None => {
            warn!(
                "Click on {} from user {} on unknown panel {}",
                kind.custom_id(),
                user_id,
                message_id
            );
            messages::PANEL_EXPIRED.to_string()
        }
    }
}
