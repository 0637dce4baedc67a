pub mod setup_roles;

pub use setup_roles::setup_roles;
