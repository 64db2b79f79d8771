//! `GameClient`: the game page's entry point.
//!
//! Four stacked canvases, bottom to top: ground and floor structures, balls,
//! solid structures, and the shot overlay that takes pointer input. Each has
//! its own [`RenderLoop`]; all four draw from the one [`GameSession`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::{Event, HtmlCanvasElement, PointerEvent};

use super::socket::{Connection, SocketHandlers, WebSocketTransport};
use super::storage::LocalStorage;
use super::surface::RenderLoop;
use super::{Listener, emit, epoch_ms, hover_input, init_logging, js_err, now_ms, pointer_input, window};
use crate::config::Endpoint;
use crate::consts::SAVE_DEMO_DELAY_MS;
use crate::engine::{GameSession, Notification};
use crate::paint::{PaintError, Painter};
use crate::storage::IdentityStore;
use crate::surface::{FrameInfo, Layer, LoopMode};

type Session = GameSession<WebSocketTransport, LocalStorage>;

/// One of the session's layers, bound to its own loop.
struct SessionLayer {
    session: Rc<RefCell<Session>>,
    mode: LoopMode,
    pick: fn(&mut Session) -> &mut dyn Layer,
}

impl Layer for SessionLayer {
    fn loop_mode(&self) -> LoopMode {
        self.mode
    }

    fn render(&mut self, painter: &mut dyn Painter, frame: FrameInfo) -> Result<(), PaintError> {
        let mut session = self.session.borrow_mut();
        (self.pick)(&mut *session).render(painter, frame)
    }
}

fn ground(session: &mut Session) -> &mut dyn Layer {
    session.ground_mut()
}

fn sprites(session: &mut Session) -> &mut dyn Layer {
    session.sprites_mut()
}

fn structures(session: &mut Session) -> &mut dyn Layer {
    session.structures_mut()
}

fn shot(session: &mut Session) -> &mut dyn Layer {
    session.shot_mut()
}

#[derive(Clone, Copy)]
enum Phase {
    Down,
    Move,
    Up,
}

struct Shared {
    session: Rc<RefCell<Session>>,
    ground: RenderLoop,
    sprites: RenderLoop,
    structures: RenderLoop,
    overlay: RenderLoop,
    on_event: js_sys::Function,
    connection: RefCell<Option<Connection>>,
    listeners: RefCell<Vec<Listener>>,
    /// Pending save-demo offer; a newer token replaces it.
    save_demo: RefCell<Option<Timeout>>,
}

impl Shared {
    fn loops(&self) -> [&RenderLoop; 4] {
        [&self.ground, &self.sprites, &self.structures, &self.overlay]
    }

    /// Forward notifications to the host. The session borrow must already be released.
    fn deliver(&self, notifications: Vec<Notification>) {
        for notification in notifications {
            match notification {
                Notification::MapStarted { .. } => {
                    self.ground.request_render();
                    self.structures.request_render();
                    emit(&self.on_event, &notification);
                }
                Notification::SaveDemo { .. } => {
                    let on_event = self.on_event.clone();
                    let timer = Timeout::new(SAVE_DEMO_DELAY_MS, move || emit(&on_event, &notification));
                    *self.save_demo.borrow_mut() = Some(timer);
                }
                _ => emit(&self.on_event, &notification),
            }
        }
    }

    fn on_pointer(&self, phase: Phase, event: &PointerEvent) {
        event.prevent_default();
        let canvas = self.overlay.canvas();
        let surface = self.overlay.surface();
        let now = now_ms();
        let mut session = self.session.borrow_mut();
        match phase {
            Phase::Down => {
                if let Some(input) = pointer_input(event, &canvas, &surface) {
                    session.on_pointer_down(input, now);
                }
            }
            Phase::Move => session.on_pointer_move(hover_input(event, &canvas, &surface)),
            Phase::Up => {
                if let Some(input) = pointer_input(event, &canvas, &surface) {
                    session.on_pointer_up(input, now);
                }
            }
        }
    }
}

/// Game page client. `on_event` receives each notification as a JSON string.
#[wasm_bindgen]
pub struct GameClient {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl GameClient {
    /// # Errors
    /// A canvas has no 2D context, or the page has no window or storage.
    #[wasm_bindgen(constructor)]
    pub fn new(
        game_id: &str,
        ground_canvas: HtmlCanvasElement,
        sprite_canvas: HtmlCanvasElement,
        structure_canvas: HtmlCanvasElement,
        overlay_canvas: HtmlCanvasElement,
        on_event: js_sys::Function,
    ) -> Result<GameClient, JsValue> {
        init_logging();
        let location = window()?.location();
        let endpoint = Endpoint::from_location(&location.protocol()?, &location.host()?);
        let identities = IdentityStore::new(LocalStorage::new().map_err(js_err)?);
        let session = Rc::new(RefCell::new(GameSession::new(game_id, endpoint, identities)));

        let bind = |canvas: HtmlCanvasElement, mode: LoopMode, pick: fn(&mut Session) -> &mut dyn Layer| {
            let layer = SessionLayer { session: Rc::clone(&session), mode, pick };
            RenderLoop::new(canvas, Rc::new(RefCell::new(layer))).map_err(js_err)
        };
        let shared = Rc::new(Shared {
            ground: bind(ground_canvas, LoopMode::OnDemand, ground)?,
            sprites: bind(sprite_canvas, LoopMode::Continuous, sprites)?,
            structures: bind(structure_canvas, LoopMode::OnDemand, structures)?,
            overlay: bind(overlay_canvas.clone(), LoopMode::Continuous, shot)?,
            session,
            on_event,
            connection: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            save_demo: RefCell::new(None),
        });

        let mut listeners = Vec::new();
        for (kind, phase) in [("pointerdown", Phase::Down), ("pointermove", Phase::Move), ("pointerup", Phase::Up)] {
            let weak = Rc::downgrade(&shared);
            listeners.push(Listener::attach(&overlay_canvas, kind, move |event: Event| {
                if let (Some(shared), Some(event)) = (weak.upgrade(), event.dyn_ref::<PointerEvent>()) {
                    shared.on_pointer(phase, event);
                }
            })?);
        }
        listeners.push(Listener::attach(&overlay_canvas, "contextmenu", |event: Event| event.prevent_default())?);
        *shared.listeners.borrow_mut() = listeners;

        for render_loop in shared.loops() {
            render_loop.start();
        }
        log::info!("game client ready for {game_id}");
        Ok(Self { shared })
    }

    /// Open the game socket.
    ///
    /// # Errors
    /// Already connected, destroyed, or the socket could not be created.
    pub fn connect(&self) -> Result<(), JsValue> {
        let url = self.shared.session.borrow_mut().begin_connect(epoch_ms()).map_err(js_err)?;
        let weak = Rc::downgrade(&self.shared);
        let handlers = SocketHandlers {
            on_open: Box::new(with_shared(weak.clone(), |shared, transport: WebSocketTransport| {
                let out = shared.session.borrow_mut().on_open(transport);
                shared.deliver(out);
            })),
            on_message: Box::new(with_shared(weak.clone(), |shared, text: String| {
                let out = shared.session.borrow_mut().handle_message(&text, now_ms());
                shared.deliver(out);
            })),
            on_close: Box::new(with_shared(weak.clone(), |shared, _code: u16| {
                let out = shared.session.borrow_mut().on_close();
                shared.deliver(out);
            })),
        };
        match Connection::open(&url, handlers) {
            Ok(connection) => {
                *self.shared.connection.borrow_mut() = Some(connection);
                Ok(())
            }
            Err(e) => {
                let out = self.shared.session.borrow_mut().on_close();
                self.shared.deliver(out);
                Err(js_err(e))
            }
        }
    }

    /// Tell the server whether this player is ready. Returns whether it was sent.
    pub fn ready(&self, value: bool) -> bool {
        self.shared.session.borrow_mut().ready(value)
    }

    /// Shot engine state as JSON, for the debug panel.
    ///
    /// # Errors
    /// Serialization failure.
    pub fn debug(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.shared.session.borrow().shot().debug()).map_err(js_err)
    }

    /// Close the socket, stop every loop, and detach listeners.
    pub fn destroy(&self) {
        self.shared.session.borrow_mut().destroy();
        for render_loop in self.shared.loops() {
            render_loop.stop();
        }
        self.shared.listeners.borrow_mut().clear();
        self.shared.save_demo.borrow_mut().take();
        self.shared.connection.borrow_mut().take();
        log::info!("game client destroyed");
    }
}

fn with_shared<A, F>(weak: Weak<Shared>, f: F) -> impl FnMut(A)
where
    F: Fn(&Shared, A),
{
    move |arg| {
        if let Some(shared) = weak.upgrade() {
            f(&shared, arg);
        }
    }
}

impl Drop for GameClient {
    fn drop(&mut self) {
        self.destroy();
    }
}
