pub mod app;
pub mod dashboards;
pub mod domain;
pub mod layout;
pub mod routes;
pub mod shared;
pub mod system;

use wasm_bindgen::prelude::wasm_bindgen;

#[wasm_bindgen(start)]
pub fn start() {
    // initializes logging using the `log` crate
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();

    // config.toml is read before mounting so every component sees the final values
    wasm_bindgen_futures::spawn_local(async {
        let cfg = shared::config::load_config().await;
        shared::config::install(cfg);
        leptos::mount::mount_to_body(app::App);
    });
}
