//! One canvas, one layer, one `requestAnimationFrame` loop.
//!
//! A continuous layer reschedules itself every frame. An on-demand layer draws
//! once per [`RenderLoop::request_render`], coalescing repeated requests into
//! a single frame. Window resizes are debounced before the canvas is refit.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Event, HtmlCanvasElement};

use super::painter::CanvasPainter;
use super::{Listener, js_error, window};
use crate::consts::{RESIZE_DEBOUNCE_MS, SURFACE_MARGIN_PX};
use crate::paint::PaintError;
use crate::surface::{FrameClock, Layer, LoopMode, Surface, render_frame};

struct Frame {
    canvas: HtmlCanvasElement,
    painter: CanvasPainter,
    layer: Rc<RefCell<dyn Layer>>,
    clock: FrameClock,
    pending: Option<i32>,
    stopped: bool,
}

struct Inner {
    frame: RefCell<Frame>,
    on_frame: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    on_resize: RefCell<Option<Listener>>,
    settle: RefCell<Option<Timeout>>,
}

/// Render loop for one layer. Cloning shares the loop.
#[derive(Clone)]
pub struct RenderLoop {
    inner: Rc<Inner>,
}

impl RenderLoop {
    /// Bind `layer` to `canvas`. Nothing is drawn until [`RenderLoop::start`].
    ///
    /// # Errors
    /// The canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, layer: Rc<RefCell<dyn Layer>>) -> Result<Self, PaintError> {
        let painter = CanvasPainter::new(&canvas)?;
        let clock = FrameClock::new(layer.borrow().loop_mode());
        let inner = Rc::new(Inner {
            frame: RefCell::new(Frame { canvas, painter, layer, clock, pending: None, stopped: false }),
            on_frame: RefCell::new(None),
            on_resize: RefCell::new(None),
            settle: RefCell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let on_frame = Closure::wrap(Box::new(move |now: f64| {
            if let Some(inner) = weak.upgrade() {
                inner.draw(now);
            }
        }) as Box<dyn FnMut(f64)>);
        *inner.on_frame.borrow_mut() = Some(on_frame);

        Ok(Self { inner })
    }

    #[must_use]
    pub fn canvas(&self) -> HtmlCanvasElement {
        self.inner.frame.borrow().canvas.clone()
    }

    #[must_use]
    pub fn surface(&self) -> Surface {
        self.inner.frame.borrow().painter.surface()
    }

    /// Fit to the parent element, watch for resizes, and draw the first frame.
    pub fn start(&self) {
        self.inner.fit_to_parent();
        self.watch_resize();
        self.inner.schedule();
    }

    /// Draw on the next animation frame.
    pub fn request_render(&self) {
        self.inner.schedule();
    }

    /// Cancel the pending frame and any pending resize, and detach listeners.
    pub fn stop(&self) {
        let mut frame = self.inner.frame.borrow_mut();
        frame.stopped = true;
        let pending = frame.pending.take();
        drop(frame);

        if let Some(id) = pending {
            if let Err(e) = window().and_then(|win| win.cancel_animation_frame(id)) {
                log::warn!("cancel frame failed: {}", js_error(&e));
            }
        }
        self.inner.on_resize.borrow_mut().take();
        self.inner.settle.borrow_mut().take();
    }

    fn watch_resize(&self) {
        if self.inner.on_resize.borrow().is_some() {
            return;
        }
        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        let on_resize = move |_event: Event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let settle_weak = Rc::downgrade(&inner);
            // Replacing the timeout cancels the previous one.
            *inner.settle.borrow_mut() = Some(Timeout::new(RESIZE_DEBOUNCE_MS, move || {
                if let Some(inner) = settle_weak.upgrade() {
                    inner.fit_to_parent();
                }
            }));
        };
        match window().and_then(|win| Listener::attach(&win, "resize", on_resize)) {
            Ok(listener) => *self.inner.on_resize.borrow_mut() = Some(listener),
            Err(e) => log::warn!("resize listener not attached: {}", js_error(&e)),
        }
    }
}

impl Inner {
    fn schedule(&self) {
        let mut frame = self.frame.borrow_mut();
        if frame.stopped || frame.pending.is_some() {
            return;
        }
        let on_frame = self.on_frame.borrow();
        let Some(callback) = on_frame.as_ref() else {
            return;
        };
        match window().and_then(|win| win.request_animation_frame(callback.as_ref().unchecked_ref())) {
            Ok(id) => frame.pending = Some(id),
            Err(e) => log::warn!("animation frame not scheduled: {}", js_error(&e)),
        }
    }

    fn draw(&self, now: f64) {
        let continuous = {
            let mut frame = self.frame.borrow_mut();
            frame.pending = None;
            if frame.stopped {
                return;
            }
            let info = frame.clock.advance(now);
            let surface = frame.painter.surface();
            let Frame { painter, layer, .. } = &mut *frame;
            if let Err(e) = render_frame(&surface, &mut *layer.borrow_mut(), painter, info) {
                log::error!("render failed: {e}");
            }
            frame.clock.mode() == LoopMode::Continuous
        };
        if continuous {
            self.schedule();
        }
    }

    fn fit(&self, surface: Surface) {
        {
            let mut frame = self.frame.borrow_mut();
            apply_size(&frame.canvas, surface);
            frame.painter.set_surface(surface);
        }
        self.schedule();
    }

    fn fit_to_parent(&self) {
        let canvas = self.frame.borrow().canvas.clone();
        let Some(parent) = canvas.parent_element() else {
            log::debug!("canvas has no parent; not resizing");
            return;
        };
        let dpr = window().map_or(1.0, |win| win.device_pixel_ratio());
        let width = f64::from(parent.client_width()) - SURFACE_MARGIN_PX;
        let height = f64::from(parent.client_height()) - SURFACE_MARGIN_PX;
        self.fit(Surface::fit(width, height, dpr));
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn apply_size(canvas: &HtmlCanvasElement, surface: Surface) {
    canvas.set_width(surface.device_width() as u32);
    canvas.set_height(surface.device_height() as u32);
    let style = canvas.style();
    let css = style
        .set_property("width", &format!("{}px", surface.css_width))
        .and_then(|()| style.set_property("height", &format!("{}px", surface.css_height)));
    if let Err(e) = css {
        log::warn!("canvas style not applied: {}", js_error(&e));
    }
}
