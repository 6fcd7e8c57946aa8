//! Inline-editable table cells.
//!
//! Cells only report the committed value; the list owning the row applies
//! it locally first and then sends the PATCH.

use crate::shared::number_format::{format_for_input, format_number, parse_number};
use leptos::ev::KeyboardEvent;
use leptos::prelude::*;

/// Number cell: click to edit, Enter or blur commits, Escape cancels.
/// Unparsable or negative input is discarded.
#[component]
pub fn EditableNumberCell(
    #[prop(into)] value: Signal<f64>,
    #[prop(optional)] decimals: usize,
    #[prop(into)] editable: Signal<bool>,
    on_commit: Callback<f64>,
    /// Rendered in place of the plain number when not editing
    #[prop(optional)]
    display: Option<Callback<f64, String>>,
) -> impl IntoView {
    let editing = RwSignal::new(false);
    let draft = RwSignal::new(String::new());

    let shown = move || {
        let v = value.get();
        match display {
            Some(f) => f.run(v),
            None => format_number(v, decimals),
        }
    };

    let start_edit = move |_| {
        if editable.get_untracked() {
            draft.set(format_for_input(value.get_untracked(), decimals));
            editing.set(true);
        }
    };

    let commit = move || {
        if !editing.get_untracked() {
            return;
        }
        editing.set(false);
        match parse_number(&draft.get_untracked()) {
            Some(v) if v >= 0.0 && v != value.get_untracked() => on_commit.run(v),
            Some(_) => {}
            None => log::debug!("discarded non-numeric input {:?}", draft.get_untracked()),
        }
    };

    let on_keydown = move |ev: KeyboardEvent| match ev.key().as_str() {
        "Enter" => commit(),
        "Escape" => editing.set(false),
        _ => {}
    };

    view! {
        <Show
            when=move || editing.get()
            fallback=move || {
                view! {
                    <span
                        class=move || if editable.get() { "cell-editable" } else { "cell-readonly" }
                        on:click=start_edit
                    >
                        {shown}
                    </span>
                }
            }
        >
            <input
                class="cell-editable__input"
                type="text"
                inputmode="decimal"
                prop:value=move || draft.get()
                on:input=move |ev| draft.set(event_target_value(&ev))
                on:keydown=on_keydown
                on:blur=move |_| commit()
                autofocus=true
            />
        </Show>
    }
}

/// Text cell; blank input is discarded
#[component]
pub fn EditableTextCell(
    #[prop(into)] value: Signal<String>,
    #[prop(into)] editable: Signal<bool>,
    on_commit: Callback<String>,
) -> impl IntoView {
    let editing = RwSignal::new(false);
    let draft = RwSignal::new(String::new());

    let start_edit = move |_| {
        if editable.get_untracked() {
            draft.set(value.get_untracked());
            editing.set(true);
        }
    };

    let commit = move || {
        if !editing.get_untracked() {
            return;
        }
        editing.set(false);
        let text = draft.get_untracked().trim().to_string();
        if !text.is_empty() && text != value.get_untracked() {
            on_commit.run(text);
        }
    };

    let on_keydown = move |ev: KeyboardEvent| match ev.key().as_str() {
        "Enter" => commit(),
        "Escape" => editing.set(false),
        _ => {}
    };

    view! {
        <Show
            when=move || editing.get()
            fallback=move || {
                view! {
                    <span
                        class=move || if editable.get() { "cell-editable" } else { "cell-readonly" }
                        on:click=start_edit
                    >
                        {move || value.get()}
                    </span>
                }
            }
        >
            <input
                class="cell-editable__input"
                type="text"
                prop:value=move || draft.get()
                on:input=move |ev| draft.set(event_target_value(&ev))
                on:keydown=on_keydown
                on:blur=move |_| commit()
                autofocus=true
            />
        </Show>
    }
}

/// Checkbox reporting the flipped value
#[component]
pub fn ToggleCell(
    #[prop(into)] value: Signal<bool>,
    #[prop(into)] editable: Signal<bool>,
    on_toggle: Callback<bool>,
) -> impl IntoView {
    view! {
        <input
            type="checkbox"
            class="cell-toggle"
            prop:checked=move || value.get()
            disabled=move || !editable.get()
            on:change=move |_| {
                if editable.get_untracked() {
                    on_toggle.run(!value.get_untracked());
                }
            }
        />
    }
}
