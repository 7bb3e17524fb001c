pub mod config;
pub mod database;
pub mod errors;
pub mod openrouter;
pub mod review;
pub mod server;
pub mod services;
