use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, HtmlElement, TouchEvent};
use yew::prelude::*;

use super::zoom_overlay::ZoomOverlay;
use crate::config::ZoomConfig;
use crate::host::{DomHost, HostSignal, ZoomCallbacks, touches_from_list};
use crate::model::{GestureSnapshot, PhaseKind};
use crate::presenter::{ResizeMode, display_source};
use crate::state::ZoomController;

type SharedController = Rc<RefCell<Option<ZoomController<DomHost>>>>;

#[derive(Properties, PartialEq, Clone)]
pub struct ZoomableImageProps {
    pub src: AttrValue,
    /// Shown instead of `src` while the overlay is up.
    #[prop_or_default]
    pub placeholder_src: Option<AttrValue>,
    /// Inline CSS for the image; width/height belong here.
    #[prop_or_default]
    pub style: AttrValue,
    #[prop_or_default]
    pub resize_mode: ResizeMode,
    #[prop_or_default]
    pub alt: AttrValue,
    #[prop_or_default]
    pub config: ZoomConfig,
    #[prop_or_default]
    pub on_zoom_begin: Callback<()>,
    #[prop_or_default]
    pub on_zoom_end: Callback<()>,
}

/// Runs `f` on the controller unless it is gone or already borrowed.
fn with_controller<R>(
    controller: &SharedController,
    f: impl FnOnce(&mut ZoomController<DomHost>) -> R,
) -> Option<R> {
    let Ok(mut slot) = controller.try_borrow_mut() else {
        log::warn!("zoom controller busy, event dropped");
        return None;
    };
    slot.as_mut().map(f)
}

#[function_component(ZoomableImage)]
pub fn zoomable_image(props: &ZoomableImageProps) -> Html {
    let img_ref = use_node_ref();
    let snapshot = use_state(GestureSnapshot::default);
    let controller: SharedController = use_mut_ref(|| None);

    // Controller, host and native touch listeners live as long as the image.
    {
        let img_ref = img_ref.clone();
        let controller = controller.clone();
        let render = {
            let snapshot = snapshot.clone();
            Callback::from(move |s: GestureSnapshot| snapshot.set(s))
        };
        let callbacks = ZoomCallbacks {
            on_zoom_begin: props.on_zoom_begin.clone(),
            on_zoom_end: props.on_zoom_end.clone(),
        };
        let config = props.config;
        use_effect_with((), move |_| {
            let signals = {
                let controller = controller.clone();
                Callback::from(move |signal: HostSignal| {
                    with_controller(&controller, |c| match signal {
                        HostSignal::BoundsResolved { ticket, frame } => c.bounds_resolved(ticket, frame),
                        HostSignal::BoundsFailed { ticket, err } => c.bounds_failed(ticket, &err),
                        HostSignal::Frame => c.frame(),
                    });
                })
            };
            let host = DomHost::new(img_ref.clone(), signals, render, callbacks);
            *controller.borrow_mut() = Some(ZoomController::new(host, config));

            let img = img_ref.cast::<HtmlElement>();
            if img.is_none() {
                log::warn!("zoomable image not mounted, gestures disabled");
            }

            // Listeners must not be passive so the page does not scroll or
            // zoom under an active pinch.
            let opts = AddEventListenerOptions::new();
            opts.set_passive(false);

            let touch_start_cb = {
                let controller = controller.clone();
                let img = img.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    let Some(img) = &img else { return };
                    let touches = touches_from_list(&e.touches(), &img.get_bounding_client_rect());
                    let claimed = with_controller(&controller, |c| c.on_start(&touches)).unwrap_or(false);
                    if claimed {
                        e.prevent_default();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let touch_move_cb = {
                let controller = controller.clone();
                let img = img.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    let Some(img) = &img else { return };
                    let touches = touches_from_list(&e.touches(), &img.get_bounding_client_rect());
                    let phase = with_controller(&controller, |c| {
                        c.on_move(&touches);
                        c.snapshot().phase
                    });
                    if matches!(phase, Some(p) if p != PhaseKind::Idle) {
                        e.prevent_default();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let touch_end_cb = {
                let controller = controller.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    let remaining = e.touches().length() as usize;
                    with_controller(&controller, |c| c.on_end(remaining));
                }) as Box<dyn FnMut(_)>)
            };
            let touch_cancel_cb = {
                let controller = controller.clone();
                Closure::wrap(Box::new(move |_e: TouchEvent| {
                    with_controller(&controller, |c| c.on_terminate());
                }) as Box<dyn FnMut(_)>)
            };

            if let Some(img) = &img {
                for (name, cb) in [
                    ("touchstart", &touch_start_cb),
                    ("touchmove", &touch_move_cb),
                    ("touchend", &touch_end_cb),
                    ("touchcancel", &touch_cancel_cb),
                ] {
                    img.add_event_listener_with_callback_and_add_event_listener_options(
                        name,
                        cb.as_ref().unchecked_ref(),
                        &opts,
                    )
                    .ok();
                }
            }

            move || {
                if let Some(img) = &img {
                    for (name, cb) in [
                        ("touchstart", &touch_start_cb),
                        ("touchmove", &touch_move_cb),
                        ("touchend", &touch_end_cb),
                        ("touchcancel", &touch_cancel_cb),
                    ] {
                        let _ = img.remove_event_listener_with_callback(name, cb.as_ref().unchecked_ref());
                    }
                }
                // Dropping the host cancels its timers and breaks the
                // controller <-> signal callback cycle.
                controller.borrow_mut().take();
            }
        });
    }

    {
        let controller = controller.clone();
        let callbacks = ZoomCallbacks {
            on_zoom_begin: props.on_zoom_begin.clone(),
            on_zoom_end: props.on_zoom_end.clone(),
        };
        use_effect_with(callbacks, move |callbacks| {
            with_controller(&controller, |c| c.host_mut().set_callbacks(callbacks.clone()));
            || ()
        });
    }
    {
        let controller = controller.clone();
        use_effect_with(props.config, move |config| {
            with_controller(&controller, |c| c.set_config(*config));
            || ()
        });
    }

    let snap = *snapshot;
    let source: AttrValue = display_source(
        &props.src,
        props.placeholder_src.as_deref(),
        snap.has_overlay(),
    )
    .to_string()
    .into();
    let img_style = format!(
        "{} object-fit:{}; touch-action:pan-x pan-y; user-select:none;",
        props.style,
        props.resize_mode.object_fit()
    );

    html! {
        <>
            <img ref={img_ref} src={source.clone()} alt={props.alt.clone()} style={img_style} draggable="false" />
            {
                match snap.layout {
                    Some(layout) => html! {
                        <ZoomOverlay
                            layout={layout}
                            visible={snap.modal_visible()}
                            src={source}
                            resize_mode={props.resize_mode}
                            config={props.config}
                        />
                    },
                    None => html! {},
                }
            }
        </>
    }
}
