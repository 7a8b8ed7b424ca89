use ecolor::Color32;
use glam::Vec3;
use smallvec::SmallVec;

/// A single arrow: a shaft from `origin` along `direction` plus a four-line
/// head at the tip.
///
/// Purely descriptive; the host renderer turns [`Self::segments`] into
/// whatever line primitive it draws with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowGlyph {
    pub origin: Vec3,

    /// Unit vector the arrow points along.
    pub direction: Vec3,

    /// Shaft length from `origin` to the tip.
    pub length: f32,

    pub head_length: f32,
    pub head_width: f32,

    pub color: Color32,
}

impl ArrowGlyph {
    pub fn new(origin: Vec3, direction: Vec3, length: f32) -> Self {
        Self {
            origin,
            direction,
            length,
            head_length: 0.1,
            head_width: 0.1,
            color: Color32::WHITE,
        }
    }

    pub fn with_head(mut self, head_length: f32, head_width: f32) -> Self {
        self.head_length = head_length;
        self.head_width = head_width;
        self
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    pub fn tip(&self) -> Vec3 {
        self.origin + self.direction * self.length
    }

    /// Line segments making up the glyph: the shaft plus four head lines
    /// converging on the tip.
    pub fn segments(&self) -> SmallVec<[(Vec3, Vec3); 5]> {
        let tip = self.tip();
        let mut segments: SmallVec<[(Vec3, Vec3); 5]> = smallvec::smallvec![(self.origin, tip)];

        let (u, v) = self.direction.any_orthonormal_pair();
        let base = tip - self.direction * self.head_length;
        let half_width = self.head_width * 0.5;
        for lateral in [u, -u, v, -v] {
            segments.push((base + lateral * half_width, tip));
        }
        segments
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::ArrowGlyph;

    #[test]
    fn tip_is_origin_plus_scaled_direction() {
        let glyph = ArrowGlyph::new(Vec3::new(1.0, 0.0, 0.0), Vec3::Y, 2.0);
        assert_eq!(glyph.tip(), Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn segments_have_shaft_and_head() {
        let glyph = ArrowGlyph::new(Vec3::ZERO, Vec3::X, 3.0).with_head(0.5, 0.2);
        let segments = glyph.segments();
        assert_eq!(segments.len(), 5);

        // Shaft spans the configured length:
        let (start, end) = segments[0];
        assert_eq!(start, Vec3::ZERO);
        assert!(((end - start).length() - 3.0).abs() < 1e-5);

        // Head lines start head_length behind the tip, head_width/2 off axis:
        for &(from, to) in &segments[1..] {
            assert_eq!(to, glyph.tip());
            assert!((from.x - 2.5).abs() < 1e-5);
            assert!((from.distance(Vec3::new(2.5, 0.0, 0.0)) - 0.1).abs() < 1e-5);
        }
    }
}
