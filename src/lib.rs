pub mod client;
pub mod config;
pub mod error;
pub mod observability;
pub mod render;

pub use client::MealieClient;
pub use config::Config;
pub use error::MealieError;
