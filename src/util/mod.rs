pub mod config;
pub mod time;
pub mod validate;
