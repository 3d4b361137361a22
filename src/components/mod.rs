pub mod gallery;
pub mod zoom_overlay;
pub mod zoomable_image;

pub use gallery::{CONFIG_STORAGE_KEY, Gallery, GalleryProps};
pub use zoom_overlay::ZoomOverlay;
pub use zoomable_image::{ZoomableImage, ZoomableImageProps};
