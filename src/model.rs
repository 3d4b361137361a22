//! Core value types for the pinch-zoom overlay.
//! Every type here is `Copy`; transitions produce new values instead of
//! mutating shared ones.

/// One finger sample in two coordinate spaces.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TouchPoint {
    /// Position relative to the tracked view.
    pub location_x: f64,
    pub location_y: f64,
    /// Position relative to the window.
    pub page_x: f64,
    pub page_y: f64,
}

impl TouchPoint {
    pub fn new(location_x: f64, location_y: f64, page_x: f64, page_y: f64) -> Self {
        Self {
            location_x,
            location_y,
            page_x,
            page_y,
        }
    }

    /// A window position plus the same position relative to a view whose
    /// top-left corner is at (`view_left`, `view_top`).
    pub fn from_client(client_x: f64, client_y: f64, view_left: f64, view_top: f64) -> Self {
        Self::new(client_x - view_left, client_y - view_top, client_x, client_y)
    }

    /// A point whose view-local and window coordinates coincide.
    pub fn at(x: f64, y: f64) -> Self {
        Self::new(x, y, x, y)
    }
}

/// Exactly two touches. Index 0 is the anchor used for panning.
pub type TouchPair = [TouchPoint; 2];

/// Absolute window rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayLayout {
    /// Frame of the image when the gesture activated; fixed for the gesture.
    pub initial: BoundingBox,
    /// Live overlay frame.
    pub current: BoundingBox,
}

impl OverlayLayout {
    pub fn at_rest(frame: BoundingBox) -> Self {
        Self {
            initial: frame,
            current: frame,
        }
    }

    /// Magnification of the live frame relative to the initial one.
    pub fn scale(&self) -> f64 {
        if self.initial.w == 0.0 {
            return 1.0;
        }
        self.current.w / self.initial.w
    }
}

/// The two most recent touch pairs; consecutive samples give incremental deltas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchSample {
    pub previous: TouchPair,
    pub current: TouchPair,
}

impl PinchSample {
    pub fn seeded(touches: TouchPair) -> Self {
        Self {
            previous: touches,
            current: touches,
        }
    }

    pub fn roll(self, touches: TouchPair) -> Self {
        Self {
            previous: self.current,
            current: touches,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PhaseKind {
    #[default]
    Idle,
    /// Two touches landed; waiting for the bounds query to come back.
    Pending,
    Tracking,
    Releasing,
}

/// What the renderer needs after each transition.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureSnapshot {
    pub phase: PhaseKind,
    pub layout: Option<OverlayLayout>,
    /// `None` until the first activation, like an unset modal flag.
    pub show_modal: Option<bool>,
}

impl GestureSnapshot {
    pub fn has_overlay(&self) -> bool {
        self.layout.is_some()
    }

    pub fn modal_visible(&self) -> bool {
        self.show_modal.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::distance;

    #[test]
    fn client_positions_keep_sub_pixel_precision() {
        let a = TouchPoint::from_client(100.25, 40.5, 10.5, 20.25);
        assert_eq!(a, TouchPoint::new(89.75, 20.25, 100.25, 40.5));
        let b = TouchPoint::from_client(103.25, 44.5, 10.5, 20.25);
        assert_eq!(distance(&a, &b), 5.0);
    }

    #[test]
    fn scale_is_one_for_degenerate_initial_width() {
        let layout = OverlayLayout {
            initial: BoundingBox::new(0.0, 0.0, 0.0, 0.0),
            current: BoundingBox::new(0.0, 0.0, 50.0, 50.0),
        };
        assert_eq!(layout.scale(), 1.0);
    }
}
