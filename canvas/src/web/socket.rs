//! Browser `WebSocket` as a [`Transport`].

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use super::js_error;
use crate::engine::{Transport, TransportError};

#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    socket: WebSocket,
}

impl Transport for WebSocketTransport {
    fn is_open(&self) -> bool {
        self.socket.ready_state() == WebSocket::OPEN
    }

    fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        if !self.is_open() {
            return Err(TransportError::Closed);
        }
        self.socket.send_with_str(&text).map_err(|e| TransportError::Backend(js_error(&e)))
    }

    fn close(&mut self, code: u16, reason: &str) {
        if let Err(e) = self.socket.close_with_code_and_reason(code, reason) {
            log::warn!("socket close failed: {}", js_error(&e));
        }
    }
}

/// Socket lifecycle callbacks.
pub struct SocketHandlers {
    pub on_open: Box<dyn FnMut(WebSocketTransport)>,
    pub on_message: Box<dyn FnMut(String)>,
    pub on_close: Box<dyn FnMut(u16)>,
}

/// An open socket and the callbacks bound to it. Dropping the connection
/// unbinds the callbacks without closing the socket.
pub struct Connection {
    socket: WebSocket,
    _on_open: Closure<dyn FnMut(Event)>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
}

impl Connection {
    /// Open `url` and bind `handlers`.
    ///
    /// # Errors
    /// The browser rejected the URL.
    pub fn open(url: &str, handlers: SocketHandlers) -> Result<Self, TransportError> {
        let socket = WebSocket::new(url).map_err(|e| TransportError::Backend(js_error(&e)))?;
        let SocketHandlers { mut on_open, mut on_message, mut on_close } = handlers;

        let opened = socket.clone();
        let open_cb = Closure::wrap(Box::new(move |_event: Event| {
            on_open(WebSocketTransport { socket: opened.clone() });
        }) as Box<dyn FnMut(Event)>);

        let message_cb = Closure::wrap(Box::new(move |event: MessageEvent| match event.data().as_string() {
            Some(text) => on_message(text),
            None => log::warn!("dropping non-text frame"),
        }) as Box<dyn FnMut(MessageEvent)>);

        let close_cb = Closure::wrap(Box::new(move |event: CloseEvent| {
            log::debug!("socket closed: {} {}", event.code(), event.reason());
            on_close(event.code());
        }) as Box<dyn FnMut(CloseEvent)>);

        socket.set_onopen(Some(open_cb.as_ref().unchecked_ref()));
        socket.set_onmessage(Some(message_cb.as_ref().unchecked_ref()));
        socket.set_onclose(Some(close_cb.as_ref().unchecked_ref()));

        Ok(Self { socket, _on_open: open_cb, _on_message: message_cb, _on_close: close_cb })
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.socket.set_onopen(None);
        self.socket.set_onmessage(None);
        self.socket.set_onclose(None);
    }
}
