//! EmotionSense
//!
//! A small web service that serves a text emotion classifier and a facial
//! emotion classifier. Both models are trained elsewhere and loaded from
//! disk at startup; this crate maps their outputs to emotion names, emoji
//! and suggestion tips.

pub mod config;
pub mod emotion;
pub mod error;
pub mod inference;
pub mod math;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use inference::{ModelError, Models};
