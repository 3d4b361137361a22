use yew::prelude::*;

use crate::config::ZoomConfig;
use crate::model::OverlayLayout;
use crate::presenter::{ResizeMode, present};

#[derive(Properties, PartialEq, Clone)]
pub struct ZoomOverlayProps {
    pub layout: OverlayLayout,
    /// Mounted but hidden during the last frame of a release.
    pub visible: bool,
    pub src: AttrValue,
    pub resize_mode: ResizeMode,
    pub config: ZoomConfig,
}

#[function_component]
pub fn ZoomOverlay(props: &ZoomOverlayProps) -> Html {
    let p = present(&props.layout, &props.config);
    let display = if props.visible { "block" } else { "none" };
    let backdrop_style = format!(
        "position:fixed; inset:0; z-index:1000; pointer-events:none; display:{}; background:{};",
        display,
        p.backdrop_color()
    );
    html! {
        <div style={backdrop_style}>
            <img src={props.src.clone()} style={p.image_style(props.resize_mode)} draggable="false" />
        </div>
    }
}
