//! Browser bindings.
//!
//! Everything in here touches `web_sys`. The modules above it are plain Rust
//! and are driven from here: a canvas-backed [`painter::CanvasPainter`], the
//! `requestAnimationFrame` loop in [`surface`], the `WebSocket` transport,
//! `localStorage`, and the two `#[wasm_bindgen]` entry points
//! [`game::GameClient`] and [`editor::EditorClient`].

pub mod editor;
pub mod game;
pub mod painter;
pub mod socket;
pub mod storage;
pub mod surface;

use std::sync::Once;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, EventTarget, HtmlCanvasElement, HtmlElement, PointerEvent, Window};

use crate::geometry::Point;
use crate::input::{Button, Modifiers, PointerInput, PointerKind, is_text_entry};
use crate::surface::Surface;

static LOGGING: Once = Once::new();

/// Route `log` output to the browser console and install the panic hook.
/// Safe to call from every entry point.
pub fn init_logging() {
    LOGGING.call_once(|| {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Debug) {
            web_sys::console::warn_1(&JsValue::from_str(&format!("logger not installed: {e}")));
        }
    });
}

pub(crate) fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

/// Monotonic milliseconds, falling back to wall-clock time.
pub(crate) fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or_else(js_sys::Date::now, |p| p.now())
}

/// Wall-clock milliseconds since the epoch.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn epoch_ms() -> u64 {
    js_sys::Date::now().max(0.0) as u64
}

pub(crate) fn js_error(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

pub(crate) fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

pub(crate) fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers { shift, ctrl, alt, meta }
}

/// The event was aimed at a form field or editable element.
pub(crate) fn targets_text_entry(event: &Event) -> bool {
    let Some(target) = event.target() else {
        return false;
    };
    let Some(element) = target.dyn_ref::<HtmlElement>() else {
        return false;
    };
    is_text_entry(&element.tag_name(), element.is_content_editable())
}

/// Convert a DOM pointer event on `canvas` into logical coordinates.
/// Unknown buttons yield `None`.
pub(crate) fn pointer_input(event: &PointerEvent, canvas: &HtmlCanvasElement, surface: &Surface) -> Option<PointerInput> {
    let button = Button::from_dom(event.button())?;
    Some(hover_input(event, canvas, surface).with_button(button))
}

/// Like [`pointer_input`] for moves, which carry no button.
pub(crate) fn hover_input(event: &PointerEvent, canvas: &HtmlCanvasElement, surface: &Surface) -> PointerInput {
    let rect = canvas.get_bounding_client_rect();
    let at: Point = surface.pointer_to_logical(f64::from(event.client_x()), f64::from(event.client_y()), rect.left(), rect.top());
    PointerInput {
        at,
        button: Button::Primary,
        kind: PointerKind::from_dom(&event.pointer_type()),
        modifiers: modifiers(event.shift_key(), event.ctrl_key(), event.alt_key(), event.meta_key()),
    }
}

/// A DOM event listener, detached when dropped.
pub(crate) struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    /// # Errors
    /// The browser refused the listener.
    pub(crate) fn attach<F>(target: &EventTarget, kind: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self { target: target.clone(), kind, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(e) = self.target.remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref()) {
            log::warn!("could not detach {} listener: {}", self.kind, js_error(&e));
        }
    }
}

/// Send one JSON message to a host callback.
pub(crate) fn emit<T: serde::Serialize>(callback: &js_sys::Function, message: &T) {
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("notification not serialized: {e}");
            return;
        }
    };
    if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
        log::warn!("host callback threw: {}", js_error(&e));
    }
}
