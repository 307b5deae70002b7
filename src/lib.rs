pub mod command;
pub mod config;
pub mod directory;
pub mod engine;
pub mod hooks;
pub mod limits;
pub mod model;
pub mod notify;
pub mod observability;
