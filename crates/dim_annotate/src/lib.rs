//! Camera-aware linear-dimension annotations.
//!
//! Given a tracked object's bounding box and a per-frame camera pose, this
//! crate keeps up to three arrow-pair dimension overlays attached to the
//! object, annotating the extents of whichever face currently looks at
//! the viewer:
//!
//! * [`facing::FacingTracker`] decides which of the six axis-aligned
//!   directions faces the camera most directly and reports changes.
//! * [`dimension::LinearDimension`] turns two endpoints plus an extrusion
//!   vector into a pair of opposing arrow glyphs and a screen-projected
//!   length label.
//! * [`rig::DimensionRig`] owns three dimension slots and rebuilds them
//!   whenever the best-facing direction flips.
//!
//! Everything is single-threaded and frame-driven: the host calls
//! [`rig::DimensionRig::frame`] once per displayed frame and nothing here
//! blocks or polls on its own.

pub mod dimension;
pub mod error;
pub mod facing;
pub mod rig;

pub use dimension::{DimensionConfig, DimensionSpec, LinearDimension};
pub use error::DimensionError;
pub use facing::{AxisDirection, FacingChangeEvent, FacingState, FacingTracker, SubscriptionId};
pub use rig::DimensionRig;
