//! Core data model definitions shared across Reelshelf crates.
#![allow(missing_docs)]

pub mod error;
pub mod ids;
pub mod recommendation;

pub use error::{ModelError, Result as ModelResult};
pub use ids::MovieID;
pub use recommendation::{
    RecommendationItem, RecommendationTrigger, Recommendations,
};
