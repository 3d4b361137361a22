//! Renderable attributes derived from the gesture snapshot.

use crate::config::ZoomConfig;
use crate::model::OverlayLayout;

/// How the image fills its box, forwarded to CSS `object-fit`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResizeMode {
    #[default]
    Cover,
    Contain,
    Stretch,
    Center,
}

impl ResizeMode {
    pub fn object_fit(self) -> &'static str {
        match self {
            ResizeMode::Cover => "cover",
            ResizeMode::Contain => "contain",
            ResizeMode::Stretch => "fill",
            ResizeMode::Center => "none",
        }
    }
}

/// Absolute placement of the magnified image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayFrame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayPresentation {
    pub image: OverlayFrame,
    pub backdrop_alpha: f64,
}

impl OverlayPresentation {
    pub fn image_style(&self, resize_mode: ResizeMode) -> String {
        let f = self.image;
        format!(
            "position:absolute; left:{}px; top:{}px; width:{}px; height:{}px; object-fit:{};",
            f.left,
            f.top,
            f.width,
            f.height,
            resize_mode.object_fit()
        )
    }

    pub fn backdrop_color(&self) -> String {
        format!("rgba(0,0,0,{})", self.backdrop_alpha)
    }
}

pub fn present(layout: &OverlayLayout, config: &ZoomConfig) -> OverlayPresentation {
    let c = layout.current;
    // The width band keeps this within [0, 1] for the stock config; clamp for custom ones.
    let alpha = ((layout.scale() - 1.0) / config.backdrop_divisor).clamp(0.0, 1.0);
    OverlayPresentation {
        image: OverlayFrame {
            left: c.x,
            top: c.y,
            width: c.w,
            height: c.h,
        },
        backdrop_alpha: alpha,
    }
}

/// Source shown while an overlay exists: the placeholder when one is given.
pub fn display_source<'a>(source: &'a str, placeholder: Option<&'a str>, has_overlay: bool) -> &'a str {
    match placeholder {
        Some(p) if has_overlay => p,
        _ => source,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomNotification {
    Begin,
    End,
}

/// Turns the modal flag into begin/end edges.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZoomNotifier {
    last: Option<bool>,
}

impl ZoomNotifier {
    pub fn observe(&mut self, show_modal: Option<bool>) -> Option<ZoomNotification> {
        if show_modal == self.last {
            return None;
        }
        self.last = show_modal;
        match show_modal {
            Some(true) => Some(ZoomNotification::Begin),
            Some(false) => Some(ZoomNotification::End),
            None => None,
        }
    }
}
