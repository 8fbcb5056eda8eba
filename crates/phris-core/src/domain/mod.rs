//! Domain module containing the engine's entities and value objects.
//!
//! - **Entities**: [`EntityProfile`] (identity plus rolling history), [`Zone`]
//! - **Value Objects**: [`Point`], [`BoundingBox`], [`RiskAssessment`], [`ZoneMatch`]
//! - **Collaborator input**: [`TrackedBox`], [`PoseReading`], [`FrameInput`]

pub mod assessment;
pub mod geometry;
pub mod observation;
pub mod profile;
pub mod zone;

pub use assessment::*;
pub use geometry::*;
pub use observation::*;
pub use profile::*;
pub use zone::*;
