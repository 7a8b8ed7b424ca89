use glam::Vec3;
use log_once::warn_once;
use smallvec::SmallVec;

use dim_scene::Eye;

/// One of the six axis-aligned candidate facing directions.
///
/// Declaration order doubles as the tie-break order: when two directions
/// have exactly the same alignment with the view vector, the first one
/// declared here wins. This keeps [`FacingTracker::check`] deterministic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisDirection {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl AxisDirection {
    pub const ALL: [Self; 6] = [
        Self::PosX,
        Self::NegX,
        Self::PosY,
        Self::NegY,
        Self::PosZ,
        Self::NegZ,
    ];

    pub fn as_vec3(self) -> Vec3 {
        match self {
            Self::PosX => Vec3::X,
            Self::NegX => Vec3::NEG_X,
            Self::PosY => Vec3::Y,
            Self::NegY => Vec3::NEG_Y,
            Self::PosZ => Vec3::Z,
            Self::NegZ => Vec3::NEG_Z,
        }
    }
}

/// Which directions face the viewer right now.
#[derive(Clone, Debug, PartialEq)]
pub struct FacingState {
    /// All directions with a positive dot product against the view vector.
    ///
    /// At most three: opposing directions can't face the viewer at once.
    pub facing: SmallVec<[AxisDirection; 3]>,

    /// The member of `facing` most directly aligned with the view vector.
    pub best: AxisDirection,
}

/// Emitted when the best-facing direction changes between two `check` calls.
#[derive(Clone, Debug, PartialEq)]
pub struct FacingChangeEvent {
    /// `None` on the very first observation.
    pub previous: Option<FacingState>,
    pub current: FacingState,
}

/// Opaque handle returned by [`FacingTracker::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type ChangeHandler = Box<dyn FnMut(&FacingChangeEvent)>;

/// Tracks which axis-aligned direction of a target faces the camera.
///
/// [`Self::check`] is the sole input-sampling point: call it once per
/// frame with the current eye. There are no timers and no background
/// polling, and change notification is edge-triggered on `best` only —
/// an oscillating camera near a face boundary fires an event per flip.
pub struct FacingTracker {
    /// The point the candidate directions are anchored at, in world space.
    target_in_world: Vec3,

    state: Option<FacingState>,

    subscribers: Vec<(SubscriptionId, ChangeHandler)>,
    next_subscription: u64,
}

impl Default for FacingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl FacingTracker {
    pub fn new() -> Self {
        Self::with_target(Vec3::ZERO)
    }

    pub fn with_target(target_in_world: Vec3) -> Self {
        Self {
            target_in_world,
            state: None,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// The state computed by the most recent [`Self::check`], if any.
    pub fn state(&self) -> Option<&FacingState> {
        self.state.as_ref()
    }

    /// Registers a change handler.
    ///
    /// Handlers run synchronously inside [`Self::check`], in subscription
    /// order.
    pub fn subscribe(&mut self, handler: ChangeHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, handler));
        id
    }

    /// Returns false if the id was already unsubscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Recomputes the facing state from the eye's current position.
    ///
    /// Returns the change event when `best` differs from the previous
    /// call (subscribers have already been notified by the time this
    /// returns). A degenerate view vector (eye sitting on the target)
    /// keeps the previous state and emits nothing.
    pub fn check(&mut self, eye: &Eye) -> Option<FacingChangeEvent> {
        let Some(view_dir) = (eye.pos_in_world() - self.target_in_world).try_normalize() else {
            warn_once!("camera coincides with the tracked origin; holding previous facing state");
            return None;
        };

        let mut facing: SmallVec<[AxisDirection; 3]> = SmallVec::new();
        let mut best: Option<(AxisDirection, f32)> = None;
        for dir in AxisDirection::ALL {
            let dot = dir.as_vec3().dot(view_dir);
            if dot > 0.0 {
                facing.push(dir);
                // Strict comparison: on exact ties the first declared direction wins.
                if best.is_none_or(|(_, best_dot)| dot > best_dot) {
                    best = Some((dir, dot));
                }
            }
        }
        let (best, _) = best?;

        let current = FacingState { facing, best };
        if self.state.as_ref().map(|s| s.best) == Some(best) {
            // Same best; remember the (possibly different) facing set silently.
            self.state = Some(current);
            return None;
        }

        log::debug!(
            "best facing direction changed: {:?} -> {best:?}",
            self.state.as_ref().map(|s| s.best)
        );

        let event = FacingChangeEvent {
            previous: self.state.replace(current.clone()),
            current,
        };
        for (_, handler) in &mut self.subscribers {
            handler(&event);
        }
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec3;

    use dim_scene::Eye;

    use super::{AxisDirection, FacingTracker};

    fn eye_at(pos: Vec3) -> Eye {
        Eye::look_at(pos, Vec3::ZERO, Vec3::Y)
    }

    #[test]
    fn axis_aligned_camera_sees_exactly_that_direction() {
        for dir in AxisDirection::ALL {
            let mut tracker = FacingTracker::new();
            let event = tracker
                .check(&eye_at(dir.as_vec3() * 5.0))
                .expect("first check must fire");
            assert_eq!(event.previous, None);
            assert_eq!(event.current.best, dir);
            assert_eq!(event.current.facing.as_slice(), &[dir]);
        }
    }

    #[test]
    fn diagonal_camera_faces_three_directions() {
        let mut tracker = FacingTracker::new();
        let event = tracker.check(&eye_at(Vec3::new(5.0, 5.0, 5.0))).unwrap();
        assert_eq!(
            event.current.facing.as_slice(),
            &[AxisDirection::PosX, AxisDirection::PosY, AxisDirection::PosZ]
        );
        // Exact three-way tie: first declared direction wins.
        assert_eq!(event.current.best, AxisDirection::PosX);
    }

    #[test]
    fn unchanged_best_fires_no_event() {
        let mut tracker = FacingTracker::new();
        assert!(tracker.check(&eye_at(Vec3::new(5.0, 0.0, 0.0))).is_some());
        assert!(tracker.check(&eye_at(Vec3::new(5.0, 0.0, 0.0))).is_none());
        // Small wiggle that keeps +x dominant:
        assert!(tracker.check(&eye_at(Vec3::new(5.0, 1.0, 0.0))).is_none());
        // Crossing over to +y dominant:
        let event = tracker.check(&eye_at(Vec3::new(1.0, 5.0, 0.0))).unwrap();
        assert_eq!(event.current.best, AxisDirection::PosY);
        assert_eq!(
            event.previous.as_ref().map(|s| s.best),
            Some(AxisDirection::PosX)
        );
    }

    #[test]
    fn degenerate_camera_holds_previous_state() {
        let mut tracker = FacingTracker::new();
        tracker.check(&eye_at(Vec3::new(0.0, 0.0, 5.0))).unwrap();

        assert!(tracker.check(&eye_at(Vec3::ZERO)).is_none());
        assert_eq!(tracker.state().unwrap().best, AxisDirection::PosZ);
    }

    #[test]
    fn subscribers_fire_in_order_until_unsubscribed() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut tracker = FacingTracker::new();

        let calls_a = Rc::clone(&calls);
        let sub_a = tracker.subscribe(Box::new(move |_| calls_a.borrow_mut().push("a")));
        let calls_b = Rc::clone(&calls);
        tracker.subscribe(Box::new(move |_| calls_b.borrow_mut().push("b")));

        tracker.check(&eye_at(Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(*calls.borrow(), ["a", "b"]);

        assert!(tracker.unsubscribe(sub_a));
        assert!(!tracker.unsubscribe(sub_a));

        tracker.check(&eye_at(Vec3::new(0.0, 5.0, 0.0)));
        assert_eq!(*calls.borrow(), ["a", "b", "b"]);
    }
}
