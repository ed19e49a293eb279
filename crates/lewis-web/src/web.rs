//! WebAssembly entry point and DOM event wiring.

use crate::link::socket_url;
use crate::pointer::{Hit, to_canvas_local};
use crate::socket::SocketSink;
use crate::view::CanvasView;
use kurbo::Point;
use lewis_core::render::{CANVAS_ELEMENT_ID, CONFIG_ELEMENT_ID};
use lewis_core::{Canvas, CanvasConfig, Change, PointerEvent};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, Element, Event, HtmlElement, MouseEvent, Node, TouchEvent};

/// Engine plus its DOM mirror.
struct App {
    canvas: Canvas<SocketSink>,
    view: CanvasView,
}

impl App {
    /// Feed one pointer event to the engine and mirror the result.
    /// Returns whether the event did anything.
    fn dispatch(&mut self, event: PointerEvent) -> bool {
        let change = self.canvas.handle_pointer_event(event);
        if let Err(e) = self.view.apply(&self.canvas, &change) {
            log::warn!("Failed to update canvas view: {:?}", e);
        }
        change != Change::Ignored
    }

    /// Canvas-local position of a mouse or touch event.
    fn local_point(&self, event: &Event) -> Option<Point> {
        let client = client_point(event)?;
        let rect = self.view.root().get_bounding_client_rect();
        Some(to_canvas_local(client, Point::new(rect.left(), rect.top())))
    }
}

fn error(message: &str) -> JsValue {
    js_sys::Error::new(message).into()
}

/// Initialize and run the canvas binding.
#[wasm_bindgen(start)]
pub fn run_wasm() -> Result<(), JsValue> {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(log::Level::Info).map_err(|e| error(&e.to_string()))?;

    let window = web_sys::window().ok_or_else(|| error("No window"))?;
    let document = window.document().ok_or_else(|| error("No document"))?;
    let body = document.body().ok_or_else(|| error("No body"))?;
    let session = body
        .get_attribute("data-session")
        .ok_or_else(|| error("Page carries no session id"))?;

    let config_text = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
        .ok_or_else(|| error("Page carries no canvas configuration"))?;
    let config = CanvasConfig::from_json(&config_text).map_err(|e| error(&e.to_string()))?;

    let root = document
        .get_element_by_id(CANVAS_ELEMENT_ID)
        .ok_or_else(|| error("No canvas element"))?
        .dyn_into::<HtmlElement>()?;

    let location = window.location();
    let url = socket_url(&location.protocol()?, &location.host()?, &session, &config.name);
    log::info!("Starting canvas {} (session {})", config.name, session);

    let sink = SocketSink::connect(&url)?;
    let deletable = config.delete_enabled;
    let canvas = Canvas::new(config, sink);
    let mut view = CanvasView::new(document.clone(), root, deletable);
    view.reset(&canvas)?;

    let app = Rc::new(RefCell::new(App { canvas, view }));
    install_listeners(&document, app)
}

fn install_listeners(document: &Document, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
    // Touch handlers must be able to cancel scrolling.
    let options = AddEventListenerOptions::new();
    options.set_passive(false);

    let down_app = app.clone();
    let on_down = Closure::wrap(Box::new(move |event: Event| {
        let mut app = down_app.borrow_mut();
        let Some(target) = hit_test(&event, app.view.root()).target() else {
            return;
        };
        let Some(position) = app.local_point(&event) else {
            return;
        };
        if app.dispatch(PointerEvent::Down { position, target }) {
            event.prevent_default();
        }
    }) as Box<dyn FnMut(Event)>);

    let move_app = app.clone();
    let on_move = Closure::wrap(Box::new(move |event: Event| {
        let mut app = move_app.borrow_mut();
        if !app.canvas.drag_state().is_dragging() {
            return;
        }
        let Some(position) = app.local_point(&event) else {
            return;
        };
        if app.dispatch(PointerEvent::Move { position }) {
            event.prevent_default();
        }
    }) as Box<dyn FnMut(Event)>);

    let up_app = app;
    let on_up = Closure::wrap(Box::new(move |event: Event| {
        let mut app = up_app.borrow_mut();
        if !app.canvas.drag_state().is_dragging() {
            return;
        }
        let Some(position) = app.local_point(&event) else {
            return;
        };
        app.dispatch(PointerEvent::Up { position });
    }) as Box<dyn FnMut(Event)>);

    for (kind, handler) in [
        ("mousedown", &on_down),
        ("touchstart", &on_down),
        ("mousemove", &on_move),
        ("touchmove", &on_move),
        ("mouseup", &on_up),
        ("touchend", &on_up),
        ("touchcancel", &on_up),
    ] {
        document.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            handler.as_ref().unchecked_ref(),
            &options,
        )?;
    }

    // Listeners live for the page.
    on_down.forget();
    on_move.forget();
    on_up.forget();
    Ok(())
}

/// Client coordinates of a mouse event, or of the touch that changed.
fn client_point(event: &Event) -> Option<Point> {
    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        return Some(Point::new(mouse.client_x() as f64, mouse.client_y() as f64));
    }
    let touch = event.dyn_ref::<TouchEvent>()?.changed_touches().get(0)?;
    Some(Point::new(touch.client_x() as f64, touch.client_y() as f64))
}

/// Read what a press landed on from the element tree.
fn hit_test(event: &Event, root: &HtmlElement) -> Hit {
    let Some(element) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return Hit::default();
    };
    let closest = |selector: &str| element.closest(selector).ok().flatten();

    let piece = closest(".piece").filter(|piece| contains(root, piece));
    let delete_control = closest(".delete-btn")
        .and(piece.as_ref())
        .and_then(|piece| piece.get_attribute("data-piece-id"));
    Hit {
        palette_index: closest(".palette-item").and_then(|item| item.get_attribute("data-index")),
        delete_control,
        piece: piece.as_ref().and_then(|piece| piece.get_attribute("data-piece-id")),
        in_canvas: contains(root, &element),
    }
}

fn contains(root: &HtmlElement, element: &Element) -> bool {
    let node: &Node = element;
    root.contains(Some(node))
}
