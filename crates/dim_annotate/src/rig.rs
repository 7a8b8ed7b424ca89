use glam::Vec3;
use macaw::BoundingBox;

use dim_scene::{Eye, LabelSurface, NodeId, SceneGraph, ScreenTarget};

use crate::dimension::{DimensionConfig, DimensionSpec, LinearDimension};
use crate::error::DimensionError;
use crate::facing::{AxisDirection, FacingState, FacingTracker};

/// The object whose extents are being annotated.
///
/// The rig only ever reads the bounding box and parents overlay nodes
/// under `node`; the object's geometry stays untouched.
#[derive(Clone, Copy, Debug)]
pub struct TrackedObject {
    pub node: NodeId,
    pub bounds: BoundingBox,
}

/// Owns the facing tracker and three dimension slots, rebuilding the
/// active overlay set whenever the best-facing direction changes.
///
/// Call [`Self::frame`] once per displayed frame. Within a frame the
/// facing check runs first, a rebuild (detach all, then recreate)
/// completes fully, and only then are the slots updated — overlays are
/// never updated in a partially-detached state.
#[derive(Default)]
pub struct DimensionRig {
    tracker: FacingTracker,
    dims: [LinearDimension; 3],
    tracked: Option<TrackedObject>,

    /// Set when a tracked object arrives after a facing state already
    /// exists, so the next frame rebuilds without waiting for another
    /// facing change.
    rebuild_pending: bool,
}

impl DimensionRig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_configs(configs: [DimensionConfig; 3]) -> Self {
        Self {
            dims: configs.map(LinearDimension::new),
            ..Default::default()
        }
    }

    pub fn tracker(&self) -> &FacingTracker {
        &self.tracker
    }

    /// For registering additional facing-change subscribers.
    pub fn tracker_mut(&mut self) -> &mut FacingTracker {
        &mut self.tracker
    }

    pub fn dimensions(&self) -> &[LinearDimension; 3] {
        &self.dims
    }

    pub fn tracked(&self) -> Option<&TrackedObject> {
        self.tracked.as_ref()
    }

    /// Starts annotating `node` with the given (local-space) bounds.
    ///
    /// Until this is called, facing changes are observed but build
    /// nothing — an object that hasn't finished loading simply isn't
    /// annotated yet.
    pub fn set_tracked(&mut self, node: NodeId, bounds: BoundingBox) {
        self.tracked = Some(TrackedObject { node, bounds });
        self.rebuild_pending = self.tracker.state().is_some();
    }

    /// Stops annotating and detaches all overlays.
    pub fn clear_tracked(&mut self, scene: &mut SceneGraph, labels: &mut dyn LabelSurface) {
        for dim in &mut self.dims {
            dim.detach(scene, labels);
        }
        self.tracked = None;
        self.rebuild_pending = false;
    }

    /// Per-frame entry point: facing check, rebuild on change, then
    /// update every attached overlay.
    pub fn frame(
        &mut self,
        eye: &Eye,
        scene: &mut SceneGraph,
        labels: &mut dyn LabelSurface,
        target: &ScreenTarget,
    ) -> Result<(), DimensionError> {
        let changed = self.tracker.check(eye).is_some();

        if (changed || std::mem::take(&mut self.rebuild_pending)) && self.tracked.is_some() {
            if let Some(state) = self.tracker.state().cloned() {
                self.rebuild(&state, eye, scene, labels, target)?;
            }
        }

        for dim in &mut self.dims {
            dim.update(eye, scene, labels, target)?;
        }
        Ok(())
    }

    /// Detaches all slots, then recreates the overlay set for `state`.
    ///
    /// Slot policy, keyed on the axis of the best direction:
    /// * x: slot 0 annotates the bottom-face extent toward the viewer,
    ///   slot 2 a vertical edge pushed out along +z.
    /// * z: slot 1 annotates the bottom-face extent, slot 2 a vertical
    ///   edge pushed out along -x.
    /// * y (top/bottom view): the two non-best facing directions drive
    ///   slots 0 and 1, slot 2 a vertical edge pushed out along +x.
    fn rebuild(
        &mut self,
        state: &FacingState,
        eye: &Eye,
        scene: &mut SceneGraph,
        labels: &mut dyn LabelSurface,
        target: &ScreenTarget,
    ) -> Result<(), DimensionError> {
        for dim in &mut self.dims {
            dim.detach(scene, labels);
        }
        let Some(tracked) = self.tracked else {
            return Ok(());
        };
        let bbox = tracked.bounds;

        // The bottom-face diagonal; combined with a one-axis extrusion it
        // collapses into that face's extent along the other axis.
        let bottom_from = bbox.min;
        let bottom_to = Vec3::new(bbox.max.x, bbox.min.y, bbox.max.z);

        let attach = |dim: &mut LinearDimension,
                          spec: DimensionSpec,
                          scene: &mut SceneGraph,
                          labels: &mut dyn LabelSurface|
         -> Result<(), DimensionError> {
            let node = dim.create(spec, scene, labels, eye, target)?;
            scene.attach(node, tracked.node);
            Ok(())
        };

        match state.best {
            AxisDirection::PosX | AxisDirection::NegX => {
                attach(
                    &mut self.dims[0],
                    DimensionSpec::new(bottom_from, bottom_to, state.best.as_vec3()),
                    scene,
                    labels,
                )?;
                attach(
                    &mut self.dims[2],
                    DimensionSpec::new(
                        Vec3::new(bbox.max.x, bbox.min.y, bbox.max.z),
                        Vec3::new(bbox.max.x, bbox.max.y, bbox.max.z),
                        Vec3::Z,
                    ),
                    scene,
                    labels,
                )?;
            }
            AxisDirection::PosZ | AxisDirection::NegZ => {
                attach(
                    &mut self.dims[1],
                    DimensionSpec::new(bottom_from, bottom_to, state.best.as_vec3()),
                    scene,
                    labels,
                )?;
                attach(
                    &mut self.dims[2],
                    DimensionSpec::new(
                        Vec3::new(bbox.min.x, bbox.min.y, bbox.max.z),
                        Vec3::new(bbox.min.x, bbox.max.y, bbox.max.z),
                        Vec3::NEG_X,
                    ),
                    scene,
                    labels,
                )?;
            }
            AxisDirection::PosY | AxisDirection::NegY => {
                // Looking from above/below: annotate along the other
                // facing directions (there may be fewer than two when the
                // camera sits exactly on the y axis).
                let others = state.facing.iter().filter(|&&dir| dir != state.best);
                for (slot, dir) in self.dims.iter_mut().take(2).zip(others) {
                    attach(
                        slot,
                        DimensionSpec::new(bottom_from, bottom_to, dir.as_vec3()),
                        scene,
                        labels,
                    )?;
                }
                attach(
                    &mut self.dims[2],
                    DimensionSpec::new(
                        Vec3::new(bbox.max.x, bbox.min.y, bbox.min.z),
                        Vec3::new(bbox.max.x, bbox.max.y, bbox.min.z),
                        Vec3::X,
                    ),
                    scene,
                    labels,
                )?;
            }
        }

        log::debug!(
            "rebuilt dimension overlays for best facing direction {:?}",
            state.best
        );
        Ok(())
    }
}
