#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod layout;
pub mod layout_dump;
pub mod model;
pub mod status;
pub mod viewport;
pub mod workspace;

#[cfg(feature = "cli")]
pub use cli::run;
