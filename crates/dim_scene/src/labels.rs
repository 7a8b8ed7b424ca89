use emath::{Pos2, Vec2};
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to a label on a [`LabelSurface`].
    pub struct LabelId;
}

/// Screen-space text surface the annotation core writes labels to.
///
/// Hosts back this with whatever they render text with (DOM elements,
/// egui painters, …). `size` must report the measured extent of the
/// current text so the core can center labels on their anchor.
pub trait LabelSurface {
    fn create(&mut self, text: &str) -> LabelId;

    /// No-op if the label is already gone.
    fn remove(&mut self, id: LabelId);

    fn set_text(&mut self, id: LabelId, text: &str);

    /// Position of the label's top-left corner in window pixels.
    fn set_position(&mut self, id: LabelId, pos: Pos2);

    fn size(&self, id: LabelId) -> Vec2;
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: Pos2,
}

/// Headless [`LabelSurface`] with a fixed-advance text metric.
///
/// Suitable for tests and for hosts that draw the retained labels
/// themselves each frame.
#[derive(Default)]
pub struct LabelStore {
    labels: SlotMap<LabelId, Label>,
}

impl LabelStore {
    /// Horizontal advance per character of the built-in metric, in pixels.
    pub const GLYPH_ADVANCE: f32 = 7.0;

    /// Label height of the built-in metric, in pixels.
    pub const LINE_HEIGHT: f32 = 16.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: LabelId) -> Option<&Label> {
        self.labels.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LabelId, &Label)> {
        self.labels.iter()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl LabelSurface for LabelStore {
    fn create(&mut self, text: &str) -> LabelId {
        self.labels.insert(Label {
            text: text.to_owned(),
            position: Pos2::ZERO,
        })
    }

    fn remove(&mut self, id: LabelId) {
        self.labels.remove(id);
    }

    fn set_text(&mut self, id: LabelId, text: &str) {
        if let Some(label) = self.labels.get_mut(id) {
            text.clone_into(&mut label.text);
        }
    }

    fn set_position(&mut self, id: LabelId, pos: Pos2) {
        if let Some(label) = self.labels.get_mut(id) {
            label.position = pos;
        }
    }

    fn size(&self, id: LabelId) -> Vec2 {
        self.labels.get(id).map_or(Vec2::ZERO, |label| {
            Vec2::new(
                label.text.chars().count() as f32 * Self::GLYPH_ADVANCE,
                Self::LINE_HEIGHT,
            )
        })
    }
}
