pub mod interaction;
pub mod message;

pub use interaction::handle_component_interaction;
pub use message::{handle_channel_deleted, handle_guild_left, handle_messages_deleted};
