//! WebSocket notification sink.

use crate::link::Outbox;
use lewis_core::{Notification, NotificationSink};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, ErrorEvent, WebSocket};

/// Sends each notification to the host as one text frame.
///
/// Frames emitted before the socket opens are queued and flushed in order
/// from the `open` handler.
pub struct SocketSink {
    ws: WebSocket,
    outbox: Rc<RefCell<Outbox>>,
    // Store closures to prevent them from being dropped
    _on_open: Closure<dyn Fn()>,
    _on_close: Closure<dyn Fn(CloseEvent)>,
    _on_error: Closure<dyn Fn(ErrorEvent)>,
}

impl SocketSink {
    /// Open the channel to `url`.
    pub fn connect(url: &str) -> Result<Self, JsValue> {
        let ws = WebSocket::new(url)?;
        let outbox = Rc::new(RefCell::new(Outbox::new()));

        // onopen
        let ws_open = ws.clone();
        let outbox_open = outbox.clone();
        let on_open = Closure::wrap(Box::new(move || {
            log::info!("Notification channel open");
            outbox_open.borrow_mut().mark_open();
            flush(&ws_open, &outbox_open);
        }) as Box<dyn Fn()>);
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));

        // onclose
        let outbox_close = outbox.clone();
        let on_close = Closure::wrap(Box::new(move |e: CloseEvent| {
            log::warn!("Notification channel closed (code {})", e.code());
            outbox_close.borrow_mut().mark_closed();
        }) as Box<dyn Fn(CloseEvent)>);
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        // onerror
        let on_error = Closure::wrap(Box::new(move |e: ErrorEvent| {
            log::warn!("Notification channel error: {}", e.message());
        }) as Box<dyn Fn(ErrorEvent)>);
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        Ok(Self {
            ws,
            outbox,
            _on_open: on_open,
            _on_close: on_close,
            _on_error: on_error,
        })
    }
}

impl NotificationSink for SocketSink {
    fn notify(&mut self, notification: Notification) {
        if let Err(e) = self.outbox.borrow_mut().push(&notification) {
            log::warn!("Failed to encode notification for {}: {}", notification.id(), e);
            return;
        }
        flush(&self.ws, &self.outbox);
    }
}

fn flush(ws: &WebSocket, outbox: &RefCell<Outbox>) {
    let frames = outbox.borrow_mut().take_ready();
    for frame in frames {
        if let Err(e) = ws.send_with_str(&frame) {
            log::warn!("Send failed: {:?}", e);
        }
    }
}
