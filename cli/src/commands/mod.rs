//! Command implementations

pub mod config;
pub mod console;
pub mod group;
pub mod schema;
pub mod settings;
