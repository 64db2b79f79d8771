//! `EditorClient`: the map editor page's entry point.
//!
//! Two stacked canvases: the map under construction (all tiles) and the
//! preview overlay that takes pointer and wheel input. Keyboard shortcuts are
//! bound on the window. Every tile change is saved to local storage.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::{Event, HtmlCanvasElement, KeyboardEvent, PointerEvent, WheelEvent};

use super::storage::LocalStorage;
use super::surface::RenderLoop;
use super::{Listener, emit, hover_input, init_logging, js_err, modifiers, pointer_input, targets_text_entry, window};
use crate::draft::{DraftChange, MapDraft};
use crate::editor::{EditAction, EditController, EditorState};
use crate::input::{Key, PointerInput, WheelDelta};
use crate::storage::IdentityStore;
use crate::templates;
use crate::tiles::{LayerFilter, MapRenderer};

/// Messages to the host UI.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum EditorEvent<'a> {
    Selection { state: &'a EditorState },
    #[serde(rename_all = "camelCase")]
    Tiles { can_undo: bool, can_redo: bool },
}

struct Shared {
    draft: RefCell<MapDraft>,
    store: RefCell<IdentityStore<LocalStorage>>,
    map: Rc<RefCell<MapRenderer>>,
    controller: Rc<RefCell<EditController>>,
    map_loop: RenderLoop,
    overlay: RenderLoop,
    on_change: js_sys::Function,
    listeners: RefCell<Vec<Listener>>,
}

impl Shared {
    /// Push the draft's tiles to the map layer, save, and tell the host.
    fn tiles_changed(&self) {
        let draft = self.draft.borrow();
        self.map.borrow_mut().set_game_map(Rc::new(draft.to_game_map()));
        self.map_loop.request_render();
        if let Err(e) = draft.save(&mut *self.store.borrow_mut()) {
            log::warn!("draft {} not saved: {e}", draft.id());
        }
        let history = draft.history();
        emit(&self.on_change, &EditorEvent::Tiles { can_undo: history.can_undo(), can_redo: history.can_redo() });
    }

    /// Push the palette selection to the preview and tell the host.
    fn selection_changed(&self) {
        let draft = self.draft.borrow();
        self.controller.borrow_mut().set_state(draft.state().clone());
        self.overlay.request_render();
        emit(&self.on_change, &EditorEvent::Selection { state: draft.state() });
    }

    fn changed(&self, change: DraftChange) {
        match change {
            DraftChange::Tiles => self.tiles_changed(),
            DraftChange::Selection => self.selection_changed(),
        }
    }

    fn run(&self, actions: Vec<EditAction>) {
        let mut tiles = false;
        for action in actions {
            match action {
                EditAction::Patch(patch) => tiles |= self.draft.borrow_mut().apply_patch(&patch),
                EditAction::RenderNeeded => self.overlay.request_render(),
            }
        }
        if tiles {
            self.tiles_changed();
        }
    }

    fn on_pointer(&self, kind: &str, event: &PointerEvent) {
        event.prevent_default();
        let canvas = self.overlay.canvas();
        let surface = self.overlay.surface();
        let input: Option<PointerInput> = match kind {
            "pointermove" => Some(hover_input(event, &canvas, &surface)),
            _ => pointer_input(event, &canvas, &surface),
        };
        let Some(input) = input else {
            return;
        };
        let actions = {
            let mut controller = self.controller.borrow_mut();
            match kind {
                "pointerdown" => controller.on_pointer_down(input),
                "pointermove" => controller.on_pointer_move(input),
                _ => controller.on_pointer_up(input),
            }
        };
        self.run(actions);
    }

    fn on_key(&self, event: &KeyboardEvent) {
        if targets_text_entry(event) {
            return;
        }
        let mods = modifiers(event.shift_key(), event.ctrl_key(), event.alt_key(), event.meta_key());
        let change = self.draft.borrow_mut().on_key(&Key(event.key()), mods);
        if let Some(change) = change {
            event.prevent_default();
            self.changed(change);
        }
    }

    fn on_wheel(&self, event: &WheelEvent) {
        event.prevent_default();
        let mods = modifiers(event.shift_key(), event.ctrl_key(), event.alt_key(), event.meta_key());
        let change = self.draft.borrow_mut().on_wheel(WheelDelta { dx: event.delta_x(), dy: event.delta_y() }, mods);
        self.changed(change);
    }
}

/// Map editor client. `on_change` receives selection and history updates as JSON strings.
#[wasm_bindgen]
pub struct EditorClient {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl EditorClient {
    /// Resume the saved draft for `map_id`, or start one from the bordered template.
    ///
    /// # Errors
    /// A canvas has no 2D context, storage is unavailable, or the saved draft is corrupt.
    #[wasm_bindgen(constructor)]
    pub fn new(
        map_id: &str,
        map_canvas: HtmlCanvasElement,
        overlay_canvas: HtmlCanvasElement,
        on_change: js_sys::Function,
    ) -> Result<EditorClient, JsValue> {
        init_logging();
        let store = IdentityStore::new(LocalStorage::new().map_err(js_err)?);
        let draft = MapDraft::load(&store, map_id).map_err(js_err)?.unwrap_or_else(|| MapDraft::new(map_id));

        let map = Rc::new(RefCell::new(MapRenderer::new(LayerFilter::All)));
        let controller = Rc::new(RefCell::new(EditController::new()));
        controller.borrow_mut().set_state(draft.state().clone());

        let shared = Rc::new(Shared {
            map_loop: RenderLoop::new(map_canvas, map.clone()).map_err(js_err)?,
            overlay: RenderLoop::new(overlay_canvas.clone(), controller.clone()).map_err(js_err)?,
            draft: RefCell::new(draft),
            store: RefCell::new(store),
            map,
            controller,
            on_change,
            listeners: RefCell::new(Vec::new()),
        });

        let mut listeners = Vec::new();
        for kind in ["pointerdown", "pointermove", "pointerup"] {
            let weak = Rc::downgrade(&shared);
            listeners.push(Listener::attach(&overlay_canvas, kind, move |event: Event| {
                if let (Some(shared), Some(event)) = (weak.upgrade(), event.dyn_ref::<PointerEvent>()) {
                    shared.on_pointer(kind, event);
                }
            })?);
        }
        let weak = Rc::downgrade(&shared);
        listeners.push(Listener::attach(&overlay_canvas, "wheel", move |event: Event| {
            if let (Some(shared), Some(event)) = (weak.upgrade(), event.dyn_ref::<WheelEvent>()) {
                shared.on_wheel(event);
            }
        })?);
        listeners.push(Listener::attach(&overlay_canvas, "contextmenu", |event: Event| event.prevent_default())?);
        let win = window()?;
        let weak = Rc::downgrade(&shared);
        listeners.push(Listener::attach(&win, "keydown", move |event: Event| {
            if let (Some(shared), Some(event)) = (weak.upgrade(), event.dyn_ref::<KeyboardEvent>()) {
                shared.on_key(event);
            }
        })?);
        *shared.listeners.borrow_mut() = listeners;

        shared.map_loop.start();
        shared.overlay.start();
        shared.tiles_changed();
        log::info!("editor ready for map {map_id}");
        Ok(Self { shared })
    }

    /// Current palette selection as JSON.
    ///
    /// # Errors
    /// Serialization failure.
    pub fn state(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.shared.draft.borrow().state()).map_err(js_err)
    }

    /// Replace the palette selection from JSON. Missing fields take defaults.
    ///
    /// # Errors
    /// `json` is not an editor state.
    #[wasm_bindgen(js_name = setState)]
    pub fn set_state(&self, json: &str) -> Result<(), JsValue> {
        let state: EditorState = serde_json::from_str(json).map_err(js_err)?;
        self.shared.draft.borrow_mut().set_state(state);
        self.shared.selection_changed();
        Ok(())
    }

    pub fn undo(&self) {
        self.shared.draft.borrow_mut().undo();
        self.shared.tiles_changed();
    }

    pub fn redo(&self) {
        self.shared.draft.borrow_mut().redo();
        self.shared.tiles_changed();
    }

    /// Start over from a named template (`empty` or `bordered`), clearing history.
    ///
    /// # Errors
    /// Unknown template name.
    pub fn reset(&self, template: &str) -> Result<(), JsValue> {
        let tiles = templates::by_name(template).ok_or_else(|| JsValue::from_str(&format!("no template {template}")))?;
        self.shared.draft.borrow_mut().reset(tiles);
        self.shared.tiles_changed();
        Ok(())
    }

    /// The draft as a column-major map DTO, ready to submit.
    ///
    /// # Errors
    /// The tiles do not form a full grid.
    #[wasm_bindgen(js_name = gameMap)]
    pub fn game_map(&self) -> Result<String, JsValue> {
        let dto = self.shared.draft.borrow().to_game_map().to_dto().map_err(js_err)?;
        serde_json::to_string(&dto).map_err(js_err)
    }

    /// Forget the saved draft, e.g. after a successful submit.
    ///
    /// # Errors
    /// Storage refused the removal.
    pub fn discard(&self) -> Result<(), JsValue> {
        let id = self.shared.draft.borrow().id().to_owned();
        self.shared.store.borrow_mut().remove_draft(&id).map_err(js_err)
    }

    /// Stop both loops and detach listeners.
    pub fn destroy(&self) {
        self.shared.map_loop.stop();
        self.shared.overlay.stop();
        self.shared.listeners.borrow_mut().clear();
    }
}

impl Drop for EditorClient {
    fn drop(&mut self) {
        self.destroy();
    }
}
