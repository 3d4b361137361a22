use yew::AttrValue;
use yew_pinch_zoom::components::{Gallery, GalleryProps};
use yew_pinch_zoom::logging;

const PHOTO_IDS: [u32; 5] = [1074, 1025, 1020, 1003, 1062];

fn main() {
    logging::init(log::LevelFilter::Debug);
    let urls = PHOTO_IDS
        .iter()
        .map(|id| AttrValue::from(format!("https://picsum.photos/id/{id}/300/200.jpg")))
        .collect();
    yew::Renderer::<Gallery>::with_props(GalleryProps { urls }).render();
}
