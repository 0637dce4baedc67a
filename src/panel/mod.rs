pub mod controls;
pub mod publisher;
pub mod toggle;

pub use controls::{ControlKind, PanelMessage};
pub use publisher::{publish_panel, PanelSink, PublishOutcome};
pub use toggle::{toggle_role, RoleMutator};
