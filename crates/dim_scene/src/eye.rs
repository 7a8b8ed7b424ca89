use glam::{Mat4, Vec3};
use macaw::IsoTransform;

/// The camera pose sampled once per frame.
///
/// Note: we prefer the word "eye" so hosts don't confuse this with any
/// camera object of their own scene.
///
/// View-space is right-handed with X=Right, Y=Up, Z=Back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Eye {
    pub world_from_view: IsoTransform,

    /// Vertical field of view in radians.
    pub fov_y: f32,
}

impl Eye {
    pub const DEFAULT_FOV_Y: f32 = 55.0_f32 * std::f32::consts::TAU / 360.0;

    const NEAR_PLANE_DISTANCE: f32 = 0.01;

    pub fn from_world_from_view(world_from_view: IsoTransform, fov_y: f32) -> Self {
        Self {
            world_from_view,
            fov_y,
        }
    }

    /// An eye at `pos` looking at `target`.
    ///
    /// Falls back to an untilted eye when `pos` and `target` coincide or
    /// `up` is degenerate.
    pub fn look_at(pos: Vec3, target: Vec3, up: Vec3) -> Self {
        let world_from_view = IsoTransform::look_at_rh(pos, target, up)
            .map_or_else(|| IsoTransform::from_translation(pos), |m| m.inverse());
        Self {
            world_from_view,
            fov_y: Self::DEFAULT_FOV_Y,
        }
    }

    pub fn pos_in_world(&self) -> Vec3 {
        self.world_from_view.translation()
    }

    pub fn forward_in_world(&self) -> Vec3 {
        self.world_from_view.rotation() * -Vec3::Z // view-space is RUB
    }

    /// Transform taking world-space points to normalized device coordinates.
    ///
    /// NDC x/y are in `[-1, 1]` with y up; z is the projected depth.
    pub fn ndc_from_world(&self, aspect_ratio: f32) -> Mat4 {
        let projection =
            Mat4::perspective_infinite_rh(self.fov_y, aspect_ratio, Self::NEAR_PLANE_DISTANCE);
        projection * self.world_from_view.inverse()
    }
}
