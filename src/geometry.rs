// Pure geometry used by the gesture machine.

use crate::config::ZoomConfig;
use crate::model::{BoundingBox, OverlayLayout, TouchPair, TouchPoint};

/// Euclidean distance in view-local coordinates.
pub fn distance(a: &TouchPoint, b: &TouchPoint) -> f64 {
    ((a.location_x - b.location_x).powi(2) + (a.location_y - b.location_y).powi(2)).sqrt()
}

pub fn pair_spread(pair: &TouchPair) -> f64 {
    distance(&pair[0], &pair[1])
}

/// Window-coordinate containment, inclusive on every edge.
pub fn contains_point(frame: &BoundingBox, touch: &TouchPoint) -> bool {
    let x = touch.page_x;
    let y = touch.page_y;
    !(frame.x > x || frame.x + frame.w < x || frame.y > y || frame.y + frame.h < y)
}

/// Next overlay frame from two consecutive touch pairs.
///
/// The width follows the change in finger spread (scaled by `spread_gain`),
/// keeping the current aspect ratio and centre. A resize that would leave
/// `[initial.w, max_scale * initial.w]` is dropped. The anchor touch's window
/// delta is always applied, so a pinch that hits the band still pans.
pub fn next_overlay_frame(
    prev: &TouchPair,
    curr: &TouchPair,
    layout: &OverlayLayout,
    config: &ZoomConfig,
) -> BoundingBox {
    let OverlayLayout { initial, current } = *layout;
    let BoundingBox {
        mut x,
        mut y,
        mut w,
        mut h,
    } = current;

    let dw = (pair_spread(curr) - pair_spread(prev)) * config.spread_gain;
    let target = w + dw;
    if initial.w <= target && target <= config.max_scale * initial.w && current.w > 0.0 {
        w = target;
        h *= w / current.w;
        x -= (w - current.w) / 2.0;
        y -= (h - current.h) / 2.0;
    }

    x += curr[0].page_x - prev[0].page_x;
    y += curr[0].page_y - prev[0].page_y;
    BoundingBox { x, y, w, h }
}
