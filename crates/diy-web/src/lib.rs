//! diy-assistant Web Frontend
//!
//! Leptos-based WASM frontend: landing and pricing pages plus the
//! subscription return page that confirms a completed checkout.

mod api;
mod app;
mod components;
mod config;
mod pages;
mod storage;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
