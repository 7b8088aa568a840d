/// Phish Watch - Chrome extension flagging phishing sites via a remote classifier
/// Built with Rust + WASM + Yew

mod check;
mod classifier;
mod monitor;
mod storage;
pub mod ui;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};

use monitor::Monitor;

thread_local! {
    // The background context holds exactly one Monitor; its dedup memo
    // starts empty again whenever the service worker restarts.
    static MONITOR: RefCell<Monitor> = RefCell::new(Monitor::new());
}

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

/// Called once by the service-worker glue on startup.
#[wasm_bindgen]
pub fn start_background() {
    log::info!("Phish Watch background monitor initialized");
}

/// Tab-update hook: the glue forwards every onUpdated event here. The
/// classification runs detached; this handler returns immediately.
#[wasm_bindgen]
pub fn on_navigation(status: Option<String>, url: Option<String>) {
    let accepted = MONITOR.with(|m| m.borrow_mut().accept(status.as_deref(), url.as_deref()));

    if let Some(url) = accepted {
        spawn_local(classifier::classify(url));
    }
}

/// Runtime-message hook; the returned promise resolves with the value the
/// glue passes to sendResponse.
#[wasm_bindgen]
pub fn on_message(request: JsValue) -> js_sys::Promise {
    future_to_promise(monitor::handle_message(request))
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
