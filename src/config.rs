use serde::{Deserialize, Serialize};

/// Tunables for the zoom gesture and the release animation.
/// Defaults match the stock component feel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Overlay width change per pixel of finger spread change.
    pub spread_gain: f64,
    /// Upper bound of the overlay width as a multiple of the initial width.
    pub max_scale: f64,
    /// Number of interpolation steps when shrinking back.
    pub release_frames: u32,
    /// Delay between release steps, one display refresh.
    pub frame_interval_ms: u32,
    /// Backdrop alpha is `(scale - 1) / backdrop_divisor`.
    pub backdrop_divisor: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            spread_gain: 3.0,
            max_scale: 7.0,
            release_frames: 6,
            frame_interval_ms: 17,
            backdrop_divisor: 6.0,
        }
    }
}

impl ZoomConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(raw).map(Self::sanitized)
    }

    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            spread_gain: if self.spread_gain.is_finite() {
                self.spread_gain
            } else {
                defaults.spread_gain
            },
            max_scale: if self.max_scale.is_finite() {
                self.max_scale.max(1.0)
            } else {
                defaults.max_scale
            },
            release_frames: self.release_frames.max(1),
            frame_interval_ms: self.frame_interval_ms,
            backdrop_divisor: if self.backdrop_divisor.is_finite() && self.backdrop_divisor > 0.0 {
                self.backdrop_divisor
            } else {
                defaults.backdrop_divisor
            },
        }
    }
}
