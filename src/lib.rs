pub mod api;
pub mod app;
pub mod layout;
pub mod session;
pub mod ui;
pub mod util;
