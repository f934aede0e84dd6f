//! Domain entities and their backend row mappings.
//!
//! Each collection has a domain type consumed by views and a wire-row type
//! matching the backend's column naming:
//!
//! - `TimelineEntry` / `TimelineRow`: dated milestones with lazily loaded
//!   photo payloads
//! - `Letter` / `LetterRow`: letters, newest first
//! - `Flower` / `FlowerRow`: garden messages in insertion order
//!
//! Row-to-entity mapping and the insert/patch payload builders live next to
//! each type and are pure, so they are tested without any I/O.

pub mod flower;
pub mod letter;
pub mod timeline;

pub use flower::{Flower, FlowerKind, FlowerRow};
pub use letter::{Letter, LetterRow};
pub use timeline::{TimelineEntry, TimelineRow};
