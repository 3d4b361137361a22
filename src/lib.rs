//! Pinch-to-zoom overlay for images in Yew applications.
//!
//! Two fingers on an image open a magnified copy in a full-window overlay
//! that follows the pinch, then shrinks back to the original frame when the
//! fingers lift. The gesture core (`geometry`, `state`, `presenter`) is free
//! of DOM calls; `host` and `components` bind it to the browser.

pub mod components;
pub mod config;
pub mod geometry;
pub mod host;
pub mod logging;
pub mod model;
pub mod presenter;
pub mod state;

pub use components::{Gallery, ZoomableImage};
pub use config::ZoomConfig;
pub use presenter::ResizeMode;
