//! DOM mirror of the pieces on a canvas.

use lewis_core::render::glyph_html;
use lewis_core::{Canvas, Change, NotificationSink, Piece, PieceId};
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

/// Piece elements inside the canvas element, kept in step with the engine.
pub struct CanvasView {
    document: Document,
    root: HtmlElement,
    elements: HashMap<PieceId, HtmlElement>,
    deletable: bool,
}

impl CanvasView {
    pub fn new(document: Document, root: HtmlElement, deletable: bool) -> Self {
        Self {
            document,
            root,
            elements: HashMap::new(),
            deletable,
        }
    }

    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    /// Replace whatever the canvas element holds with the engine's pieces.
    pub fn reset<S: NotificationSink>(&mut self, canvas: &Canvas<S>) -> Result<(), JsValue> {
        self.root.set_inner_html("");
        self.elements.clear();
        for piece in canvas.pieces_ordered() {
            self.add(piece)?;
        }
        Ok(())
    }

    /// Mirror one engine change.
    pub fn apply<S: NotificationSink>(&mut self, canvas: &Canvas<S>, change: &Change) -> Result<(), JsValue> {
        match change {
            Change::Created(id) => {
                if let Some(piece) = canvas.get(id) {
                    self.add(piece)?;
                }
            }
            Change::Grabbed(id) => {
                // Re-appending moves the element to the front.
                if let Some(element) = self.elements.get(id) {
                    self.root.append_child(element)?;
                }
                self.refresh(canvas, id)?;
            }
            Change::Moved(id) | Change::Released(id) => self.refresh(canvas, id)?,
            Change::Removed(id) => {
                if let Some(element) = self.elements.remove(id) {
                    element.remove();
                }
            }
            Change::Ignored => {}
        }
        Ok(())
    }

    fn add(&mut self, piece: &Piece) -> Result<(), JsValue> {
        let element = self.document.create_element("div")?.dyn_into::<HtmlElement>()?;
        let mut class = String::from("piece");
        if let Some(extra) = piece.style().css_class() {
            class.push(' ');
            class.push_str(extra);
        }
        element.set_class_name(&class);
        element.set_attribute("data-piece-id", piece.id().as_str())?;
        element.set_attribute("data-type", piece.kind().as_str())?;
        element.set_inner_html(&glyph_html(piece.label()));

        if self.deletable {
            let delete = self.document.create_element("div")?;
            delete.set_class_name("delete-btn");
            delete.set_text_content(Some("\u{d7}"));
            element.append_child(&delete)?;
        }

        update(&element, piece)?;
        self.root.append_child(&element)?;
        self.elements.insert(piece.id().clone(), element);
        Ok(())
    }

    fn refresh<S: NotificationSink>(&self, canvas: &Canvas<S>, id: &PieceId) -> Result<(), JsValue> {
        match (canvas.get(id), self.elements.get(id)) {
            (Some(piece), Some(element)) => update(element, piece),
            _ => Ok(()),
        }
    }
}

fn update(element: &HtmlElement, piece: &Piece) -> Result<(), JsValue> {
    let style = element.style();
    style.set_property("left", &format!("{}px", piece.position.x))?;
    style.set_property("top", &format!("{}px", piece.position.y))?;
    let classes = element.class_list();
    classes.toggle_with_force("active", piece.visual.active)?;
    classes.toggle_with_force("glow", piece.visual.pre_snap)?;
    Ok(())
}
