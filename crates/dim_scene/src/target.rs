use emath::Pos2;
use glam::Vec3;

/// Describes the renderer output a view is composited into.
///
/// `origin_in_pixel` is the offset of the output within the host window,
/// so label positions come out in window coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenTarget {
    pub resolution_in_pixel: [u32; 2],
    pub origin_in_pixel: [u32; 2],
}

impl ScreenTarget {
    pub fn new(resolution_in_pixel: [u32; 2]) -> Self {
        Self {
            resolution_in_pixel,
            origin_in_pixel: [0, 0],
        }
    }

    pub fn with_origin(mut self, origin_in_pixel: [u32; 2]) -> Self {
        self.origin_in_pixel = origin_in_pixel;
        self
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.resolution_in_pixel[0] as f32 / self.resolution_in_pixel[1] as f32
    }

    /// Converts a point in normalized device coordinates to window pixels.
    ///
    /// NDC y points up, pixel y points down.
    pub fn pixel_from_ndc(&self, ndc: Vec3) -> Pos2 {
        let [width, height] = self.resolution_in_pixel.map(|p| p as f32);
        let [left, top] = self.origin_in_pixel.map(|p| p as f32);
        Pos2 {
            x: width * (ndc.x + 1.0) / 2.0 + left,
            y: -height * (ndc.y - 1.0) / 2.0 + top,
        }
    }
}
