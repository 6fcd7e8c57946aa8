use super::registry::render_tab_content;
use crate::layout::global_context::{AppGlobalContext, Tab as TabData};
use leptos::prelude::*;

/// Content of one open tab. Inactive tabs stay mounted but hidden, so a
/// list keeps its filters while the user looks at another tab.
#[component]
pub fn TabPage(tab: TabData, tabs_store: AppGlobalContext) -> impl IntoView {
    let tab_key = tab.key.clone();
    let tab_key_for_active_check = tab_key.clone();

    let is_active = move || {
        tabs_store
            .active
            .with(|a| a.as_deref() == Some(tab_key_for_active_check.as_str()))
    };

    log::debug!("tab '{}' mounted", tab_key);
    let tab_key_for_cleanup = tab_key.clone();
    on_cleanup(move || log::debug!("tab '{}' unmounted", tab_key_for_cleanup));

    let content = render_tab_content(&tab_key, tabs_store);

    view! {
        <div
            class="tabs__item"
            class:tabs__item--hidden=move || !is_active()
            data-tab-key=tab_key
        >
            {content}
        </div>
    }
}
