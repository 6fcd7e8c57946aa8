//! Multi-step wizard state shared by the ingreso, solicitud, ajuste,
//! transferencia and devolución modals.
//!
//! The wizard only tracks position and the last validation error; the draft
//! itself lives next to it in the modal's local state.

use std::fmt::Display;
use std::marker::PhantomData;

pub trait WizardStep: Copy + PartialEq + 'static {
    /// Steps in display order
    const ALL: &'static [Self];

    fn title(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Done,
    Current,
    Pending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wizard<S: WizardStep> {
    index: usize,
    error: Option<String>,
    _steps: PhantomData<S>,
}

impl<S: WizardStep> Default for Wizard<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: WizardStep> Wizard<S> {
    pub fn new() -> Self {
        Self {
            index: 0,
            error: None,
            _steps: PhantomData,
        }
    }

    pub fn current(&self) -> S {
        S::ALL[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        S::ALL.len()
    }

    pub fn is_empty(&self) -> bool {
        S::ALL.is_empty()
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= S::ALL.len()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: impl Display) {
        self.error = Some(error.to_string());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Advance if `check` passed; otherwise keep the step and remember the error.
    /// Returns whether the wizard moved.
    pub fn next<E: Display>(&mut self, check: Result<(), E>) -> bool {
        match check {
            Ok(()) => {
                self.error = None;
                if self.is_last() {
                    return false;
                }
                self.index += 1;
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    pub fn back(&mut self) {
        self.error = None;
        self.index = self.index.saturating_sub(1);
    }

    pub fn steps(&self) -> Vec<(S, StepState)> {
        S::ALL
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let state = if i < self.index {
                    StepState::Done
                } else if i == self.index {
                    StepState::Current
                } else {
                    StepState::Pending
                };
                (*s, state)
            })
            .collect()
    }

    /// Completed fraction in `[0, 1]`; the last step counts as complete
    pub fn progress(&self) -> f64 {
        if S::ALL.len() <= 1 {
            return 1.0;
        }
        self.index as f64 / (S::ALL.len() - 1) as f64
    }

    /// "2 / 3"
    pub fn progress_label(&self) -> String {
        format!("{} / {}", self.index + 1, S::ALL.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Step {
        Header,
        Lines,
        Confirm,
    }

    impl WizardStep for Step {
        const ALL: &'static [Self] = &[Step::Header, Step::Lines, Step::Confirm];

        fn title(&self) -> &'static str {
            match self {
                Step::Header => "Datos",
                Step::Lines => "Productos",
                Step::Confirm => "Confirmar",
            }
        }
    }

    #[test]
    fn test_next_is_gated_by_validation() {
        let mut w = Wizard::<Step>::new();
        assert!(!w.next(Err("falta la factura")));
        assert_eq!(w.current(), Step::Header);
        assert_eq!(w.error(), Some("falta la factura"));

        assert!(w.next(Ok::<(), String>(())));
        assert_eq!(w.current(), Step::Lines);
        assert_eq!(w.error(), None);
    }

    #[test]
    fn test_does_not_run_past_last_step() {
        let mut w = Wizard::<Step>::new();
        w.next(Ok::<(), String>(()));
        w.next(Ok::<(), String>(()));
        assert!(w.is_last());
        assert!(!w.next(Ok::<(), String>(())));
        assert_eq!(w.current(), Step::Confirm);
        assert_eq!(w.progress_label(), "3 / 3");
        assert_eq!(w.progress(), 1.0);
    }

    #[test]
    fn test_back_clears_error_and_stops_at_first() {
        let mut w = Wizard::<Step>::new();
        w.next(Ok::<(), String>(()));
        w.next(Err("sin productos"));
        w.back();
        assert!(w.is_first());
        assert_eq!(w.error(), None);
        w.back();
        assert_eq!(w.index(), 0);
    }

    #[test]
    fn test_step_states() {
        let mut w = Wizard::<Step>::new();
        w.next(Ok::<(), String>(()));
        assert_eq!(w.progress(), 0.5);
        let states: Vec<StepState> = w.steps().into_iter().map(|(_, s)| s).collect();
        assert_eq!(
            states,
            vec![StepState::Done, StepState::Current, StepState::Pending]
        );
        assert_eq!(Step::ALL[1].title(), "Productos");
    }
}
