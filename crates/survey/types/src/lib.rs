//! Domain types for the gridsurvey workflow
//!
//! This crate defines the data model shared by every layer of the
//! survey engine:
//!
//! - **Administrative hierarchy**: Division → Subdivision → Feeder,
//!   each meaningful only in the context of its selected parent.
//! - **Assets**: transformers (TCs) and poles, their creation payloads,
//!   and the two-step pole detail record (span length + sag).
//! - **Material survey**: status-scoped question catalogs and the
//!   constrained "Type of Arrangement" enumeration.
//! - **Workflow stage**: the orchestrator's state enum.
//! - **Errors**: the survey error taxonomy.
//!
//! This is a pure types crate with no runtime dependencies. All types
//! implement `Clone`, `Debug`, `Serialize`, `Deserialize`. IDs use the
//! newtype pattern and implement `Display` and `new()`.

#![deny(unsafe_code)]

mod asset;
mod errors;
mod hierarchy;
mod material;
mod stage;

pub use asset::*;
pub use errors::*;
pub use hierarchy::*;
pub use material::*;
pub use stage::*;
