use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use wasm_bindgen_futures::spawn_local;

/// Run `tick` every `interval_ms` while the calling component is mounted.
///
/// The loop stops on the first wake-up after cleanup, so a tab that was
/// closed never refetches.
pub fn use_polling<F>(interval_ms: u32, tick: F)
where
    F: Fn() + 'static,
{
    if interval_ms == 0 {
        return;
    }

    let alive = Arc::new(AtomicBool::new(true));
    let alive_loop = alive.clone();

    spawn_local(async move {
        loop {
            TimeoutFuture::new(interval_ms).await;
            if !alive_loop.load(Ordering::Relaxed) {
                log::debug!("polling stopped");
                break;
            }
            tick();
        }
    });

    on_cleanup(move || alive.store(false, Ordering::Relaxed));
}
