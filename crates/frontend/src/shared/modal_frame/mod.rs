use gloo_timers::future::TimeoutFuture;
use leptos::ev;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// Overlay plus surface with a title bar and a close button.
#[component]
pub fn ModalFrame(
    on_close: Callback<()>,
    #[prop(into)] title: String,
    #[prop(into)] width: String,
    #[prop(optional)] z_index: Option<i32>,
    children: Children,
) -> impl IntoView {
    let z_index = z_index.unwrap_or(1000);
    let overlay_mouse_down = RwSignal::new(false);

    let is_direct_overlay_event = |ev: &ev::MouseEvent| -> bool {
        match (ev.target(), ev.current_target()) {
            (Some(t), Some(ct)) => t == ct,
            _ => false,
        }
    };

    // Press and release must both land on the overlay, so selecting text
    // inside the dialog and releasing outside does not close it.
    let handle_overlay_mouse_down = move |ev: ev::MouseEvent| {
        overlay_mouse_down.set(is_direct_overlay_event(&ev));
    };

    let handle_overlay_click = move |ev: ev::MouseEvent| {
        let should_close = overlay_mouse_down.get() && is_direct_overlay_event(&ev);
        overlay_mouse_down.set(false);
        if should_close {
            spawn_local(async move {
                TimeoutFuture::new(0).await;
                on_close.run(());
            });
        }
    };

    let has_title = !title.is_empty();

    view! {
        <div
            class="modal-overlay"
            style=format!("z-index: {z_index};")
            on:mousedown=handle_overlay_mouse_down
            on:click=handle_overlay_click
        >
            <div
                class="modal"
                style=format!("position: relative; width: {width}; max-width: 95vw;")
                on:click=|ev: ev::MouseEvent| ev.stop_propagation()
            >
                <Show when=move || has_title>
                    <div class="modal__header">
                        <h3 class="modal__title">{title.clone()}</h3>
                        <button
                            class="modal__close"
                            title="Cerrar"
                            on:click=move |_| on_close.run(())
                        >
                            "×"
                        </button>
                    </div>
                </Show>
                <div class="modal__body">{children()}</div>
            </div>
        </div>
    }
}
