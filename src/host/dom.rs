// Browser implementation of the zoom host.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{DomRect, Element, Touch, TouchList};
use yew::prelude::*;

use super::{HostError, ZoomHost};
use crate::model::{BoundingBox, GestureSnapshot, TouchPoint};
use crate::state::BoundsTicket;

impl HostError {
    pub fn from_js(value: JsValue) -> Self {
        HostError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

/// Answers coming back from the browser on a later turn of the event loop.
#[derive(Debug, Clone)]
pub enum HostSignal {
    BoundsResolved {
        ticket: BoundsTicket,
        frame: BoundingBox,
    },
    BoundsFailed {
        ticket: BoundsTicket,
        err: HostError,
    },
    Frame,
}

#[derive(Clone, Default, PartialEq)]
pub struct ZoomCallbacks {
    pub on_zoom_begin: Callback<()>,
    pub on_zoom_end: Callback<()>,
}

pub struct DomHost {
    node: NodeRef,
    signals: Callback<HostSignal>,
    render: Callback<GestureSnapshot>,
    callbacks: ZoomCallbacks,
    measure_id: Option<i32>,
    frame_id: Option<i32>,
}

impl DomHost {
    pub fn new(
        node: NodeRef,
        signals: Callback<HostSignal>,
        render: Callback<GestureSnapshot>,
        callbacks: ZoomCallbacks,
    ) -> Self {
        Self {
            node,
            signals,
            render,
            callbacks,
            measure_id: None,
            frame_id: None,
        }
    }

    pub fn set_callbacks(&mut self, callbacks: ZoomCallbacks) {
        self.callbacks = callbacks;
    }

    /// Window rectangle of the tracked element right now.
    pub fn measure_in_window(node: &NodeRef) -> Result<BoundingBox, HostError> {
        let el = node.cast::<Element>().ok_or(HostError::Detached)?;
        if !el.is_connected() {
            return Err(HostError::Detached);
        }
        let r = el.get_bounding_client_rect();
        Ok(BoundingBox::new(r.left(), r.top(), r.width(), r.height()))
    }
}

impl ZoomHost for DomHost {
    fn request_bounds(&mut self, ticket: BoundsTicket) -> Result<(), HostError> {
        let window = web_sys::window().ok_or(HostError::NoWindow)?;
        let node = self.node.clone();
        let signals = self.signals.clone();
        // Layout is read on the next animation frame, so the answer always
        // arrives after the touch event that asked for it.
        let measure = Closure::once_into_js(move |_ts: f64| {
            let signal = match DomHost::measure_in_window(&node) {
                Ok(frame) => HostSignal::BoundsResolved { ticket, frame },
                Err(err) => HostSignal::BoundsFailed { ticket, err },
            };
            signals.emit(signal);
        });
        let id = window
            .request_animation_frame(measure.unchecked_ref())
            .map_err(HostError::from_js)?;
        if let Some(prev) = self.measure_id.replace(id) {
            let _ = window.cancel_animation_frame(prev);
        }
        Ok(())
    }

    fn schedule_frame(&mut self, delay_ms: u32) -> Result<(), HostError> {
        let window = web_sys::window().ok_or(HostError::NoWindow)?;
        if let Some(prev) = self.frame_id.take() {
            window.clear_timeout_with_handle(prev);
        }
        let signals = self.signals.clone();
        let tick = Closure::once_into_js(move || signals.emit(HostSignal::Frame));
        let timeout = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        let id = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(tick.unchecked_ref(), timeout)
            .map_err(HostError::from_js)?;
        self.frame_id = Some(id);
        Ok(())
    }

    fn publish(&mut self, snapshot: &GestureSnapshot) {
        self.render.emit(*snapshot);
    }

    fn zoom_began(&mut self) {
        self.callbacks.on_zoom_begin.emit(());
    }

    fn zoom_ended(&mut self) {
        self.callbacks.on_zoom_end.emit(());
    }
}

impl Drop for DomHost {
    fn drop(&mut self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(id) = self.measure_id.take() {
            let _ = window.cancel_animation_frame(id);
        }
        if let Some(id) = self.frame_id.take() {
            window.clear_timeout_with_handle(id);
        }
    }
}

/// Browsers report fractional client positions; the typed accessors
/// truncate them to whole pixels, so read the raw property when present.
fn client_coord(touch: &Touch, key: &str, whole: i32) -> f64 {
    let target: &JsValue = touch.as_ref();
    js_sys::Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(f64::from(whole))
}

/// Converts a DOM touch list: view-local coordinates are relative to
/// `view`, window coordinates are the client position.
pub fn touches_from_list(list: &TouchList, view: &DomRect) -> Vec<TouchPoint> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .map(|t| {
            let cx = client_coord(&t, "clientX", t.client_x());
            let cy = client_coord(&t, "clientY", t.client_y());
            TouchPoint::from_client(cx, cy, view.left(), view.top())
        })
        .collect()
}
