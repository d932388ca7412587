//! Study Dashboard Frontend Entry Point

mod app;
mod components;
mod context;
mod services;
mod storage;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let config = services::load_config();
    let logs = match rolling_logger::init_logger("StudyDash", config.log_capacity) {
        Ok(handle) => Some(handle),
        Err(e) => {
            web_sys::console::warn_1(&format!("[APP] logger unavailable: {}", e).into());
            None
        }
    };

    mount_to_body(move || view! { <App config=config.clone() logs=logs.clone() /> });
}
