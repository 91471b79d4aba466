//! Recipe Reels Frontend Entry Point

mod app;
mod commands;
mod components;
mod config;
mod context;
mod dom;
mod error;
mod models;
mod playback;
mod storage;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    // Only fails if a logger is already installed
    let _ = console_logger::init_logger("recipe-reels", log::LevelFilter::Debug);
    mount_to_body(App);
}
