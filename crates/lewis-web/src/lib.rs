//! Lewis Builder Browser Binding
//!
//! Wires the interaction engine to the page: pointer input from the palette
//! and canvas elements, piece elements mirrored from engine state, and a
//! WebSocket that carries notifications to the host in order.

pub mod link;
pub mod pointer;

#[cfg(target_arch = "wasm32")]
mod socket;
#[cfg(target_arch = "wasm32")]
mod view;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
