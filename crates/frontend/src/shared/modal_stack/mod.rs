//! Stack of modal dialogs rendered above the tabs.
//!
//! Wizards, detail forms and confirmation dialogs are all pushed here.
//! Escape and overlay clicks close only the topmost entry, and only when
//! its guard allows it (a wizard with unsaved lines asks first).

use crate::shared::modal_frame::ModalFrame;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use std::sync::Arc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::KeyboardEvent;

pub type CloseGuard = Arc<dyn Fn() -> bool + Send + Sync>;
type Builder = Arc<dyn Fn(ModalHandle) -> AnyView + Send + Sync>;

#[derive(Clone)]
struct ModalEntry {
    id: u64,
    title: String,
    width: String,
    builder: Builder,
    can_close: Option<CloseGuard>,
}

impl ModalEntry {
    fn allows_close(&self) -> bool {
        self.can_close.as_ref().map(|f| f()).unwrap_or(true)
    }
}

/// Lets the modal content close itself.
#[derive(Clone, Copy)]
pub struct ModalHandle {
    id: u64,
    svc: ModalStackService,
}

impl ModalHandle {
    pub fn close(&self) {
        self.svc.close_deferred(self.id);
    }
}

/// Options for a pushed modal
#[derive(Clone, Default)]
pub struct ModalOptions {
    pub title: String,
    /// CSS width of the surface, `"560px"` when empty
    pub width: String,
    pub can_close: Option<CloseGuard>,
}

impl ModalOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = width.into();
        self
    }

    pub fn guard(mut self, can_close: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.can_close = Some(Arc::new(can_close));
        self
    }
}

#[derive(Clone, Copy)]
pub struct ModalStackService {
    stack: RwSignal<Vec<ModalEntry>>,
    next_id: StoredValue<u64>,
}

impl Default for ModalStackService {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalStackService {
    pub fn new() -> Self {
        Self {
            stack: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(1),
        }
    }

    // Removal waits one tick so the DOM event that triggered it finishes dispatching first.
    fn defer(&self, f: impl FnOnce(ModalStackService) + 'static) {
        let svc = *self;
        spawn_local(async move {
            TimeoutFuture::new(0).await;
            f(svc);
        });
    }

    pub fn is_open(&self) -> bool {
        self.stack.with(|s| !s.is_empty())
    }

    pub fn push<F>(&self, options: ModalOptions, builder: F) -> ModalHandle
    where
        F: Fn(ModalHandle) -> AnyView + Send + Sync + 'static,
    {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);

        let width = if options.width.is_empty() {
            "560px".to_string()
        } else {
            options.width
        };
        self.stack.update(|s| {
            s.push(ModalEntry {
                id,
                title: options.title,
                width,
                builder: Arc::new(builder),
                can_close: options.can_close,
            })
        });
        log::debug!("modal {} opened", id);

        ModalHandle { id, svc: *self }
    }

    pub fn close(&self, id: u64) {
        self.stack.update(|s| s.retain(|e| e.id != id));
    }

    pub fn close_deferred(&self, id: u64) {
        self.defer(move |svc| svc.close(id));
    }

    /// Close the topmost modal if its guard allows it
    pub fn dismiss_top(&self) {
        let allowed = self
            .stack
            .with_untracked(|s| s.last().map(ModalEntry::allows_close))
            .unwrap_or(false);
        if allowed {
            self.defer(|svc| svc.stack.update(|s| {
                s.pop();
            }));
        }
    }

    pub fn clear(&self) {
        self.stack.set(Vec::new());
    }
}

/// Renders the stack. Mounted once at the application root.
#[component]
pub fn ModalHost() -> impl IntoView {
    let Some(svc) = use_context::<ModalStackService>() else {
        log::error!("ModalStackService not provided");
        return ().into_any();
    };

    Effect::new(move |_| {
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            if let Some(keyboard_event) = event.dyn_ref::<KeyboardEvent>() {
                if keyboard_event.key() == "Escape" && svc.is_open() {
                    svc.dismiss_top();
                }
            }
        }) as Box<dyn FnMut(_)>);

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            // lives as long as the app
            closure.forget();
        }
    });

    view! {
        <Show when=move || svc.is_open()>
            <For
                each=move || {
                    svc.stack
                        .get()
                        .into_iter()
                        .enumerate()
                        .collect::<Vec<(usize, ModalEntry)>>()
                }
                key=|(_, entry)| entry.id
                children=move |(idx, entry)| {
                    let z_index = 1000 + idx as i32;
                    let id = entry.id;
                    let guard = entry.clone();
                    let on_close = Callback::new(move |_| {
                        if guard.allows_close() {
                            svc.close_deferred(id);
                        }
                    });
                    let content = (entry.builder)(ModalHandle { id, svc });

                    view! {
                        <ModalFrame
                            z_index=z_index
                            title=entry.title.clone()
                            width=entry.width.clone()
                            on_close=on_close
                        >
                            {content}
                        </ModalFrame>
                    }
                }
            />
        </Show>
    }
    .into_any()
}
