pub mod panel;
pub mod settings;

pub use panel::PanelConfig;
pub use settings::{CommandScope, Settings};
