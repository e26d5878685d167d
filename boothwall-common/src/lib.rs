//! # Boothwall Common Library
//!
//! Shared code for the boothwall photo-booth coordinator:
//! - Error types
//! - Typed webhook event model
//! - Configuration loading and root folder resolution

pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, Result};
