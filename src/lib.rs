pub mod api;
pub mod config;
pub mod discord;
pub mod error;
pub mod models;
pub mod seeding;
pub mod utils;

pub use crate::config::{Config, ServerConfig};
pub use crate::error::{Result, SeedVipError};
