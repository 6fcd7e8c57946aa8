//! Movement wizards. Each one keeps its draft in local signals, validates
//! every step against the inventory snapshot it loaded on open, and posts
//! the finished request to the movement endpoint of its kind.

mod adjustment;
pub mod common;
mod ingress;
mod return_goods;
mod transfer;

use contracts::domain::a004_movement::aggregate::MovementKind;
use leptos::prelude::*;

use crate::shared::modal_stack::{ModalOptions, ModalStackService};
use adjustment::AdjustmentWizard;
use common::confirm_discard;
use ingress::IngressWizard;
use return_goods::ReturnWizard;
use transfer::TransferWizard;

pub fn wizard_title(kind: MovementKind) -> &'static str {
    match kind {
        MovementKind::Ingreso => "Registrar ingreso",
        MovementKind::Ajuste => "Ajuste por conteo físico",
        MovementKind::Transferencia => "Transferencia entre fincas",
        MovementKind::Devolucion => "Registrar devolución",
    }
}

/// Push the wizard for `kind`; `on_done` runs after a successful post, once the modal is closed
pub fn open_movement_wizard(modal_stack: ModalStackService, kind: MovementKind, on_done: Callback<()>) {
    let dirty = RwSignal::new(false);
    let options = ModalOptions::titled(wizard_title(kind))
        .width("760px")
        .guard(move || !dirty.get_untracked() || confirm_discard());

    modal_stack.push(options, move |handle| {
        let done = Callback::new(move |_: ()| {
            handle.close();
            on_done.run(());
        });
        let cancel = Callback::new(move |_: ()| {
            if !dirty.get_untracked() || confirm_discard() {
                handle.close();
            }
        });
        match kind {
            MovementKind::Ingreso => view! { <IngressWizard dirty=dirty on_done=done on_cancel=cancel /> }.into_any(),
            MovementKind::Ajuste => view! { <AdjustmentWizard dirty=dirty on_done=done on_cancel=cancel /> }.into_any(),
            MovementKind::Transferencia => {
                view! { <TransferWizard dirty=dirty on_done=done on_cancel=cancel /> }.into_any()
            }
            MovementKind::Devolucion => view! { <ReturnWizard dirty=dirty on_done=done on_cancel=cancel /> }.into_any(),
        }
    });
}
