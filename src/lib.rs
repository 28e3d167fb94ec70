pub mod api_connection;
pub mod cli;
pub mod config;
pub mod ingredients;
pub mod legacy;
pub mod logging;
pub mod nutrition;
