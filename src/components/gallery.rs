use super::zoomable_image::ZoomableImage;
use crate::config::ZoomConfig;
use yew::prelude::*;

/// localStorage key holding a JSON `ZoomConfig` override.
pub const CONFIG_STORAGE_KEY: &str = "pinch_zoom_config";

#[derive(Properties, PartialEq, Clone)]
pub struct GalleryProps {
    pub urls: Vec<AttrValue>,
}

fn load_config() -> Option<ZoomConfig> {
    let store = web_sys::window()?.local_storage().ok()??;
    let raw = store.get_item(CONFIG_STORAGE_KEY).ok()??;
    match ZoomConfig::from_json(&raw) {
        Ok(cfg) => Some(cfg),
        Err(err) => {
            log::warn!("ignoring stored zoom config: {err}");
            None
        }
    }
}

#[function_component(Gallery)]
pub fn gallery(props: &GalleryProps) -> Html {
    let config = use_state(|| load_config().unwrap_or_default());
    let zoomed = use_state(|| None::<usize>);

    let items = props
        .urls
        .iter()
        .enumerate()
        .map(|(i, url)| {
            let on_begin = {
                let zoomed = zoomed.clone();
                Callback::from(move |_| {
                    log::info!("zoom begin on image {i}");
                    zoomed.set(Some(i));
                })
            };
            let on_end = {
                let zoomed = zoomed.clone();
                Callback::from(move |_| {
                    log::info!("zoom end on image {i}");
                    zoomed.set(None);
                })
            };
            html! {
                <div key={url.to_string()} style="margin:10px;">
                    <ZoomableImage
                        src={url.clone()}
                        style="width:300px; height:200px; background:#000;"
                        config={*config}
                        on_zoom_begin={on_begin}
                        on_zoom_end={on_end}
                    />
                </div>
            }
        })
        .collect::<Html>();

    let status = match *zoomed {
        Some(i) => format!("Zooming image {}", i + 1),
        None => "Pinch an image with two fingers to zoom".to_string(),
    };

    html! {
        <div style="margin:20px; display:flex; flex-direction:column;">
            <div style="font-size:12px; opacity:0.7; margin:0 10px;">{ status }</div>
            { items }
        </div>
    }
}
