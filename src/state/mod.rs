pub mod panel_store;

pub use panel_store::{create_shared_panel_store, PanelBinding, PanelStore, SharedPanelStore};
