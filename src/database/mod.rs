pub mod connection;
pub mod entities;
pub mod migrations;

pub use connection::{establish_connection, get_database_url};
