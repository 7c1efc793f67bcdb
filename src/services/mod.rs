pub mod config;
pub mod database;
pub mod sql;

pub use config::*;
pub use database::*;
pub use sql::*;
