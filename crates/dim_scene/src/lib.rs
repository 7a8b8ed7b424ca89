//! Scene primitives for the dimension-annotation core.
//!
//! This crate owns the seams to the host application: a retained scene
//! graph that annotation nodes are attached to, an [`eye::Eye`] describing
//! the camera pose, a [`target::ScreenTarget`] describing the renderer
//! output, and a [`labels::LabelSurface`] for screen-space text.
//!
//! The host's actual renderer, input handling and asset loading live
//! outside; they only ever see these types.

pub mod arrow;
pub mod eye;
pub mod graph;
pub mod labels;
pub mod target;

pub use arrow::ArrowGlyph;
pub use eye::Eye;
pub use graph::{NodeId, SceneGraph, SceneNode};
pub use labels::{LabelId, LabelStore, LabelSurface};
pub use target::ScreenTarget;
