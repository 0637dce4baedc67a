pub mod permission_checker;
pub mod role_manager;

pub use permission_checker::run_startup_permission_check;
pub use role_manager::RoleManager;
