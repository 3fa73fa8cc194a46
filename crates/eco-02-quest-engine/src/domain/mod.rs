//! # Domain Layer - Quest Engine
//!
//! - `entities`: Challenge, Difficulty, ChallengeStatus
//! - `value_objects`: command outcomes, Progression
//! - `catalog`: seed challenges and the seed/persisted merge policy
//! - `quest_book`: the owned, ordered challenge collection
//! - `errors`: QuestError

pub mod catalog;
pub mod entities;
pub mod errors;
pub mod quest_book;
pub mod value_objects;

pub use catalog::*;
pub use entities::*;
pub use errors::*;
pub use quest_book::*;
pub use value_objects::*;
