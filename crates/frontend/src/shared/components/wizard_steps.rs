use contracts::shared::wizard::{StepState, Wizard, WizardStep};
use leptos::prelude::*;

/// Step strip above a wizard body
#[component]
pub fn WizardSteps<S>(wizard: RwSignal<Wizard<S>>) -> impl IntoView
where
    S: WizardStep + Send + Sync + 'static,
{
    view! {
        <ol class="wizard-steps">
            {move || {
                wizard.with(|w| {
                    w.steps()
                        .into_iter()
                        .enumerate()
                        .map(|(i, (step, state))| {
                            let class = match state {
                                StepState::Done => "wizard-steps__item wizard-steps__item--done",
                                StepState::Current => "wizard-steps__item wizard-steps__item--current",
                                StepState::Pending => "wizard-steps__item",
                            };
                            view! {
                                <li class=class>
                                    <span class="wizard-steps__num">{i + 1}</span>
                                    <span class="wizard-steps__title">{step.title()}</span>
                                </li>
                            }
                        })
                        .collect_view()
                })
            }}
        </ol>
        <div class="wizard-progress" title=move || wizard.with(|w| w.progress_label())>
            <div
                class="wizard-progress__bar"
                style=move || format!("width: {:.0}%;", wizard.with(|w| w.progress()) * 100.0)
            ></div>
        </div>
        <Show when=move || wizard.with(|w| w.error().is_some())>
            <div class="error-banner" role="alert">
                {move || wizard.with(|w| w.error().map(str::to_string).unwrap_or_default())}
            </div>
        </Show>
    }
}
