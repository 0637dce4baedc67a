use poise::serenity_prelude as serenity;
use tracing::{error, info};

use crate::state::{PanelStore, SharedPanelStore};
use crate::Data;

/// Drop panels whose messages were deleted
pub async fn handle_messages_deleted(deleted: &[serenity::MessageId], data: &Data) {
    forget_panels(&data.panel_store, &data.store_path, deleted).await;
}

/// Drop panels posted in a deleted channel
pub async fn handle_channel_deleted(channel_id: serenity::ChannelId, data: &Data) {
    prune(&data.panel_store, &data.store_path, "channel deletion", |store| {
        store.remove_channel(channel_id)
    })
    .await;
}

/// Drop panels of a guild the bot was removed from
pub async fn handle_guild_left(guild_id: serenity::GuildId, data: &Data) {
    prune(&data.panel_store, &data.store_path, "leaving guild", |store| {
        store.remove_guild(guild_id)
    })
    .await;
}

/// Remove bindings for `deleted` and save if anything changed. Returns how many were removed.
pub async fn forget_panels(
    store: &SharedPanelStore,
    store_path: &str,
    deleted: &[serenity::MessageId],
) -> usize {
    prune(store, store_path, "message deletion", |store| {
        deleted
            .iter()
            .filter(|message_id| store.remove(**message_id).is_some())
            .count()
    })
    .await
}

/// Apply `remove` under the write lock and save if it dropped anything
pub async fn prune(
    store: &SharedPanelStore,
    store_path: &str,
    cause: &str,
    remove: impl FnOnce(&mut PanelStore) -> usize,
) -> usize {
    let mut store = store.write().await;
    let removed = remove(&mut store);

    if removed > 0 {
        info!(
            "Removed {} role panel(s) after {}, {} left",
            removed,
            cause,
            store.len()
        );
        if let Err(e) = store.save(store_path).await {
            error!("Failed to save panel store after {}: {}", cause, e);
        }
    }
    removed
}
