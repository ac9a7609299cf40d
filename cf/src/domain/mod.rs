//! Domain types for ContentForge
//!
//! - [`Section`] / [`SocialPost`] - records produced by the pipeline
//! - [`parse_outline`] - outline block to section titles

mod content;
mod outline;

pub use content::{Section, SocialPost, join_drafts};
pub use outline::parse_outline;
