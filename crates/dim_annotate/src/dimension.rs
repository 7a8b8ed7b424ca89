use ecolor::Color32;
use glam::Vec3;

use dim_scene::{ArrowGlyph, Eye, LabelId, LabelSurface, NodeId, SceneGraph, ScreenTarget};

use crate::error::DimensionError;

/// Extrusion components with a magnitude below this are treated as zero,
/// i.e. the measured segment is not extruded along that axis.
pub const EXTRUDE_EPSILON: f32 = 1e-7;

/// Two endpoints of a measured segment plus a per-axis extrusion offset
/// pushing the arrows away from the object surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DimensionSpec {
    pub from: Vec3,
    pub to: Vec3,
    pub extrude: Vec3,
}

impl DimensionSpec {
    pub fn new(from: Vec3, to: Vec3, extrude: Vec3) -> Self {
        Self { from, to, extrude }
    }

    /// The two corners bounding the measured segment after extrusion.
    ///
    /// Along every extruded axis the segment collapses onto the pushed-out
    /// corner, so the remaining extent is what gets measured. All extrude
    /// components must share a sign (or be zero); mixed signs are a
    /// contract violation.
    pub fn corners(&self) -> Result<(Vec3, Vec3), DimensionError> {
        let extrude = self.extrude;

        if extrude.cmpge(Vec3::ZERO).all() {
            let pmax = extrude + self.from.max(self.to);
            let base = self.from.min(self.to);
            let pmin = Vec3::new(
                if extrude.x < EXTRUDE_EPSILON { extrude.x + base.x } else { pmax.x },
                if extrude.y < EXTRUDE_EPSILON { extrude.y + base.y } else { pmax.y },
                if extrude.z < EXTRUDE_EPSILON { extrude.z + base.z } else { pmax.z },
            );
            Ok((pmin, pmax))
        } else if extrude.cmple(Vec3::ZERO).all() {
            let pmax = extrude + self.from.min(self.to);
            let base = self.from.max(self.to);
            let pmin = Vec3::new(
                if extrude.x > -EXTRUDE_EPSILON { extrude.x + base.x } else { pmax.x },
                if extrude.y > -EXTRUDE_EPSILON { extrude.y + base.y } else { pmax.y },
                if extrude.z > -EXTRUDE_EPSILON { extrude.z + base.z } else { pmax.z },
            );
            Ok((pmin, pmax))
        } else {
            Err(DimensionError::MixedSignExtrude { extrude })
        }
    }
}

/// Per-overlay appearance and formatting, owned by each instance.
pub struct DimensionConfig {
    /// Arrow head length in world units.
    pub head_length: f32,

    /// Arrow head width in world units.
    pub head_width: f32,

    pub color: Color32,

    /// Suffix appended to the formatted length.
    pub units: String,

    /// Maps the measured world-space length to the displayed value.
    pub converter: Box<dyn Fn(f32) -> f32>,
}

impl Default for DimensionConfig {
    fn default() -> Self {
        Self {
            head_length: 0.1,
            head_width: 0.1,
            color: Color32::WHITE,
            units: "mm".to_owned(),
            converter: Box::new(|v| v),
        }
    }
}

struct ActiveOverlay {
    spec: DimensionSpec,
    node: NodeId,
    label: LabelId,
}

/// One linear-dimension overlay: a pair of opposing arrows spanning the
/// measured extent plus a screen-space length label.
///
/// Lifecycle: [`Self::create`] → attached, [`Self::detach`] → idle.
/// [`Self::update`] must run every frame while attached and is a no-op
/// while idle.
#[derive(Default)]
pub struct LinearDimension {
    config: DimensionConfig,
    active: Option<ActiveOverlay>,
}

impl LinearDimension {
    pub fn new(config: DimensionConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.active.is_some()
    }

    /// The overlay's root node while attached.
    pub fn node(&self) -> Option<NodeId> {
        self.active.as_ref().map(|a| a.node)
    }

    pub fn label(&self) -> Option<LabelId> {
        self.active.as_ref().map(|a| a.label)
    }

    pub fn spec(&self) -> Option<&DimensionSpec> {
        self.active.as_ref().map(|a| &a.spec)
    }

    /// Allocates the overlay node and label and runs one update.
    ///
    /// The returned node is unparented; the caller decides where in the
    /// scene graph it goes. Calling this on an attached overlay is an
    /// error, as is a mixed-sign extrusion.
    pub fn create(
        &mut self,
        spec: DimensionSpec,
        scene: &mut SceneGraph,
        labels: &mut dyn LabelSurface,
        eye: &Eye,
        target: &ScreenTarget,
    ) -> Result<NodeId, DimensionError> {
        if self.active.is_some() {
            return Err(DimensionError::AlreadyAttached);
        }
        // Reject bad specs before allocating anything:
        spec.corners()?;

        let node = scene.spawn();
        let label = labels.create("");
        self.active = Some(ActiveOverlay { spec, node, label });

        self.update(eye, scene, labels, target)?;
        Ok(node)
    }

    /// Rebuilds the arrow glyphs and repositions the label.
    ///
    /// Children of the overlay node are replaced wholesale each call,
    /// which is what keeps repeated updates with an unchanged camera
    /// byte-for-byte deterministic.
    pub fn update(
        &mut self,
        eye: &Eye,
        scene: &mut SceneGraph,
        labels: &mut dyn LabelSurface,
        target: &ScreenTarget,
    ) -> Result<(), DimensionError> {
        let Some(active) = &self.active else {
            return Ok(());
        };

        let (pmin, pmax) = active.spec.corners()?;
        let origin = (pmin + pmax) * 0.5;
        let measured = pmin.distance(pmax);
        let arrow_length = measured / 2.0;
        let direction = (pmax - pmin).normalize_or_zero();

        scene.clear_children(active.node);
        for dir in [direction, -direction] {
            let glyph = ArrowGlyph::new(origin, dir, arrow_length)
                .with_head(self.config.head_length, self.config.head_width)
                .with_color(self.config.color);
            let child = scene.spawn_glyph(glyph);
            scene.attach(child, active.node);
        }

        let ndc = eye
            .ndc_from_world(target.aspect_ratio())
            .project_point3(origin);
        let anchor = target.pixel_from_ndc(ndc);

        let text = format!("{:.2}{}", (self.config.converter)(measured), self.config.units);
        labels.set_text(active.label, &text);
        let size = labels.size(active.label);
        labels.set_position(active.label, anchor - size * 0.5);

        Ok(())
    }

    /// Drops the overlay node (with its glyph children) and the label.
    ///
    /// Idempotent; afterwards a new [`Self::create`] is valid.
    pub fn detach(&mut self, scene: &mut SceneGraph, labels: &mut dyn LabelSurface) {
        if let Some(active) = self.active.take() {
            scene.despawn_subtree(active.node);
            labels.remove(active.label);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use dim_scene::{Eye, LabelStore, LabelSurface as _, SceneGraph, ScreenTarget};

    use super::{DimensionConfig, DimensionError, DimensionSpec, LinearDimension};

    fn frame_inputs() -> (Eye, ScreenTarget) {
        (
            Eye::look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y),
            ScreenTarget::new([800, 600]),
        )
    }

    #[test]
    fn zero_extrude_measures_the_segment_itself() {
        let spec = DimensionSpec::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 4.0), Vec3::ZERO);
        let (pmin, pmax) = spec.corners().unwrap();
        assert_eq!(pmin, Vec3::ZERO);
        assert_eq!(pmax, Vec3::new(2.0, 0.0, 4.0));
        assert!((pmin.distance(pmax) - 20.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn positive_extrude_collapses_the_extruded_axis() {
        let spec = DimensionSpec::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 4.0), Vec3::X);
        let (pmin, pmax) = spec.corners().unwrap();
        assert_eq!(pmax, Vec3::new(3.0, 0.0, 4.0));
        // x collapses onto pmax, y and z keep the un-extruded minima:
        assert_eq!(pmin, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(pmin.distance(pmax), 4.0);
    }

    #[test]
    fn negative_extrude_mirrors_the_positive_case() {
        let spec = DimensionSpec::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 4.0), Vec3::NEG_X);
        let (pmin, pmax) = spec.corners().unwrap();
        assert_eq!(pmax, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(pmin, Vec3::new(-1.0, 0.0, 4.0));
    }

    #[test]
    fn mixed_sign_extrude_is_rejected() {
        let spec = DimensionSpec::new(Vec3::ZERO, Vec3::ONE, Vec3::new(1.0, -1.0, 0.0));
        assert!(matches!(
            spec.corners(),
            Err(DimensionError::MixedSignExtrude { .. })
        ));
    }

    #[test]
    fn create_builds_arrows_and_label() {
        let (eye, target) = frame_inputs();
        let mut scene = SceneGraph::new();
        let mut labels = LabelStore::new();
        let mut dim = LinearDimension::default();

        let node = dim
            .create(
                DimensionSpec::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 4.0), Vec3::ZERO),
                &mut scene,
                &mut labels,
                &eye,
                &target,
            )
            .unwrap();

        let children = scene.children(node);
        assert_eq!(children.len(), 2);
        let glyph0 = scene.get(children[0]).unwrap().glyph.unwrap();
        let glyph1 = scene.get(children[1]).unwrap().glyph.unwrap();
        assert_eq!(glyph0.origin, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(glyph0.direction, -glyph1.direction);
        assert!((glyph0.length - 20.0_f32.sqrt() / 2.0).abs() < 1e-5);

        let label = labels.get(dim.label().unwrap()).unwrap();
        assert_eq!(label.text, "4.47mm");
    }

    #[test]
    fn double_create_is_an_error() {
        let (eye, target) = frame_inputs();
        let mut scene = SceneGraph::new();
        let mut labels = LabelStore::new();
        let mut dim = LinearDimension::default();
        let spec = DimensionSpec::new(Vec3::ZERO, Vec3::ONE, Vec3::ZERO);

        dim.create(spec, &mut scene, &mut labels, &eye, &target)
            .unwrap();
        assert!(matches!(
            dim.create(spec, &mut scene, &mut labels, &eye, &target),
            Err(DimensionError::AlreadyAttached)
        ));
    }

    #[test]
    fn detach_then_create_succeeds_with_fresh_children() {
        let (eye, target) = frame_inputs();
        let mut scene = SceneGraph::new();
        let mut labels = LabelStore::new();
        let mut dim = LinearDimension::default();
        let spec = DimensionSpec::new(Vec3::ZERO, Vec3::ONE, Vec3::ZERO);

        dim.create(spec, &mut scene, &mut labels, &eye, &target)
            .unwrap();
        dim.detach(&mut scene, &mut labels);
        assert!(scene.is_empty());
        assert!(labels.is_empty());
        dim.detach(&mut scene, &mut labels); // idempotent

        let node = dim
            .create(spec, &mut scene, &mut labels, &eye, &target)
            .unwrap();
        assert_eq!(scene.children(node).len(), 2);
    }

    #[test]
    fn update_before_create_is_a_no_op() {
        let (eye, target) = frame_inputs();
        let mut scene = SceneGraph::new();
        let mut labels = LabelStore::new();
        let mut dim = LinearDimension::default();

        dim.update(&eye, &mut scene, &mut labels, &target).unwrap();
        assert!(scene.is_empty());
        assert!(labels.is_empty());
    }

    #[test]
    fn repeated_update_is_deterministic() {
        let (eye, target) = frame_inputs();
        let mut scene = SceneGraph::new();
        let mut labels = LabelStore::new();
        let mut dim = LinearDimension::default();

        dim.create(
            DimensionSpec::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 4.0), Vec3::ZERO),
            &mut scene,
            &mut labels,
            &eye,
            &target,
        )
        .unwrap();

        let label_id = dim.label().unwrap();
        let first = labels.get(label_id).unwrap().clone();
        for _ in 0..3 {
            dim.update(&eye, &mut scene, &mut labels, &target).unwrap();
        }
        assert_eq!(labels.get(label_id).unwrap(), &first);
    }

    #[test]
    fn converter_and_units_apply_to_the_label() {
        let (eye, target) = frame_inputs();
        let mut scene = SceneGraph::new();
        let mut labels = LabelStore::new();
        let mut dim = LinearDimension::new(DimensionConfig {
            units: "cm".to_owned(),
            converter: Box::new(|v| v / 10.0),
            ..Default::default()
        });

        dim.create(
            DimensionSpec::new(Vec3::ZERO, Vec3::new(0.0, 30.0, 0.0), Vec3::ZERO),
            &mut scene,
            &mut labels,
            &eye,
            &target,
        )
        .unwrap();

        assert_eq!(labels.get(dim.label().unwrap()).unwrap().text, "3.00cm");
    }
}
