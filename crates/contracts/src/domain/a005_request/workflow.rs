//! Approval workflow of a solicitud.
//!
//! ```text
//! Pendiente --aprobar--> Aprobada --entregar--> Entregada
//!     |  \--rechazar--> Rechazada
//!     \----cancelar---> Cancelada
//! ```

use super::aggregate::{DeliverRequest, DeliveredLine, RequestStatus, Solicitud};
use crate::domain::common::Resource;
use crate::shared::stock::{StockBook, StockShortage};
use crate::system::auth::UserInfo;
use crate::system::users::{Permission, Role};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestAction {
    Aprobar,
    Rechazar,
    Entregar,
    Cancelar,
}

impl RequestAction {
    pub const ALL: [RequestAction; 4] = [
        RequestAction::Aprobar,
        RequestAction::Rechazar,
        RequestAction::Entregar,
        RequestAction::Cancelar,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RequestAction::Aprobar => "Aprobar",
            RequestAction::Rechazar => "Rechazar",
            RequestAction::Entregar => "Entregar",
            RequestAction::Cancelar => "Cancelar",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestAction::Aprobar => "aprobar",
            RequestAction::Rechazar => "rechazar",
            RequestAction::Entregar => "entregar",
            RequestAction::Cancelar => "cancelar",
        }
    }

    /// Status the solicitud must be in for this action
    pub fn from_status(&self) -> RequestStatus {
        match self {
            RequestAction::Entregar => RequestStatus::Aprobada,
            _ => RequestStatus::Pendiente,
        }
    }

    pub fn to_status(&self) -> RequestStatus {
        match self {
            RequestAction::Aprobar => RequestStatus::Aprobada,
            RequestAction::Rechazar => RequestStatus::Rechazada,
            RequestAction::Entregar => RequestStatus::Entregada,
            RequestAction::Cancelar => RequestStatus::Cancelada,
        }
    }

    fn permission(&self) -> Permission {
        match self {
            RequestAction::Aprobar | RequestAction::Rechazar => Permission::ApproveRequests,
            RequestAction::Entregar => Permission::DeliverRequests,
            RequestAction::Cancelar => Permission::CreateRequests,
        }
    }

    /// Actions that need extra data open a modal instead of posting directly
    pub fn needs_form(&self) -> bool {
        matches!(self, RequestAction::Rechazar | RequestAction::Entregar)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionError {
    #[error("No se puede {} una solicitud {}", .action.as_str(), .status.label().to_lowercase())]
    InvalidTransition {
        action: RequestAction,
        status: RequestStatus,
    },

    #[error("Su rol no permite {}", .0.as_str())]
    Forbidden(RequestAction),

    #[error("Indique cuánto se entrega de al menos un producto")]
    NothingDelivered,

    #[error("«{producto}»: se entregan {delivered} pero se solicitaron {requested}")]
    OverDelivered {
        producto: String,
        delivered: f64,
        requested: f64,
    },

    #[error("Cantidad entregada inválida para «{0}»")]
    InvalidQuantity(String),

    #[error("Stock insuficiente: {0}")]
    Stock(#[from] StockShortage),
}

/// Status after applying `action`, or why it cannot be applied
pub fn transition(
    status: RequestStatus,
    action: RequestAction,
) -> Result<RequestStatus, TransitionError> {
    if status != action.from_status() {
        return Err(TransitionError::InvalidTransition { action, status });
    }
    Ok(action.to_status())
}

/// Checks both the status transition and the user's right to perform it
pub fn authorize(
    solicitud: &Solicitud,
    user: &UserInfo,
    action: RequestAction,
) -> Result<RequestStatus, TransitionError> {
    let next = transition(solicitud.estado, action)?;
    if !user.rol.can(action.permission()) {
        return Err(TransitionError::Forbidden(action));
    }
    if action == RequestAction::Cancelar
        && user.rol != Role::Admin
        && solicitud.solicitante_id != user.id
    {
        return Err(TransitionError::Forbidden(action));
    }
    Ok(next)
}

/// Actions the list shows as buttons for this user
pub fn allowed_actions(solicitud: &Solicitud, user: &UserInfo) -> Vec<RequestAction> {
    RequestAction::ALL
        .into_iter()
        .filter(|a| authorize(solicitud, user, *a).is_ok())
        .collect()
}

/// `POST /api/solicitudes/:id/{accion}`
pub fn action_endpoint(id: &str, action: RequestAction) -> String {
    format!("{}/{}", Solicitud::item_path(id), action.as_str())
}

/// Delivery quantities prefilled with what was requested, capped by stock
pub fn default_delivery(solicitud: &Solicitud, book: &StockBook) -> Vec<DeliveredLine> {
    solicitud
        .lineas
        .iter()
        .map(|l| DeliveredLine {
            producto_id: l.producto_id.clone(),
            cantidad: l.cantidad.min(book.available(&l.producto_id)).max(0.0),
        })
        .collect()
}

/// Every delivered quantity in `[0, requested]` and within stock; at least one above zero.
/// Lines delivered as zero are dropped from the request.
pub fn validate_delivery(
    solicitud: &Solicitud,
    delivered: &[DeliveredLine],
    book: &StockBook,
) -> Result<DeliverRequest, TransitionError> {
    transition(solicitud.estado, RequestAction::Entregar)?;

    let mut lineas = Vec::new();
    for d in delivered {
        let Some(line) = solicitud
            .lineas
            .iter()
            .find(|l| l.producto_id == d.producto_id)
        else {
            return Err(TransitionError::InvalidQuantity(d.producto_id.clone()));
        };

        if !d.cantidad.is_finite() || d.cantidad < 0.0 {
            return Err(TransitionError::InvalidQuantity(line.producto_nombre.clone()));
        }
        if d.cantidad > line.cantidad + f64::EPSILON {
            return Err(TransitionError::OverDelivered {
                producto: line.producto_nombre.clone(),
                delivered: d.cantidad,
                requested: line.cantidad,
            });
        }
        if d.cantidad > 0.0 {
            book.check_quantity(&d.producto_id, d.cantidad)?;
            lineas.push(d.clone());
        }
    }

    if lineas.is_empty() {
        return Err(TransitionError::NothingDelivered);
    }
    Ok(DeliverRequest { lineas })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_product::aggregate::Product;
    use crate::domain::a005_request::aggregate::SolicitudLine;
    use chrono::NaiveDate;

    fn user(id: &str, rol: Role) -> UserInfo {
        UserInfo {
            id: id.into(),
            username: id.into(),
            nombre: String::new(),
            rol,
        }
    }

    fn solicitud(estado: RequestStatus) -> Solicitud {
        Solicitud {
            id: "42".into(),
            numero: "SOL-0042".into(),
            solicitante_id: "ana".into(),
            solicitante: "Ana".into(),
            finca_id: "f1".into(),
            lote_id: Some("l1".into()),
            estado,
            lineas: vec![
                SolicitudLine {
                    producto_id: "u".into(),
                    producto_nombre: "Urea".into(),
                    cantidad: 10.0,
                    cantidad_entregada: 0.0,
                    cantidad_devuelta: 0.0,
                },
                SolicitudLine {
                    producto_id: "k".into(),
                    producto_nombre: "KCl".into(),
                    cantidad: 4.0,
                    cantidad_entregada: 0.0,
                    cantidad_devuelta: 0.0,
                },
            ],
            motivo_rechazo: None,
            creada: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            nota: String::new(),
        }
    }

    fn book() -> StockBook {
        let p = |id: &str, stock| Product {
            id: id.into(),
            codigo: id.into(),
            nombre: id.into(),
            categoria: String::new(),
            unidad: "kg".into(),
            stock,
            stock_minimo: 0.0,
            precio: 0.0,
            activo: true,
        };
        StockBook::from_products(&[p("u", 8.0), p("k", 50.0)])
    }

    #[test]
    fn test_transitions() {
        use RequestAction::*;
        use RequestStatus::*;
        assert_eq!(transition(Pendiente, Aprobar), Ok(Aprobada));
        assert_eq!(transition(Pendiente, Rechazar), Ok(Rechazada));
        assert_eq!(transition(Pendiente, Cancelar), Ok(Cancelada));
        assert_eq!(transition(Aprobada, Entregar), Ok(Entregada));
        assert!(transition(Pendiente, Entregar).is_err());
        assert!(transition(Aprobada, Cancelar).is_err());
        for action in RequestAction::ALL {
            assert!(transition(Entregada, action).is_err());
            assert!(transition(Rechazada, action).is_err());
        }
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = transition(RequestStatus::Entregada, RequestAction::Aprobar).unwrap_err();
        assert_eq!(err.to_string(), "No se puede aprobar una solicitud entregada");
    }

    #[test]
    fn test_allowed_actions_by_role() {
        let pending = solicitud(RequestStatus::Pendiente);
        assert_eq!(
            allowed_actions(&pending, &user("sup", Role::Supervisor)),
            vec![RequestAction::Aprobar, RequestAction::Rechazar]
        );
        assert_eq!(
            allowed_actions(&pending, &user("ana", Role::Solicitante)),
            vec![RequestAction::Cancelar]
        );
        assert!(allowed_actions(&pending, &user("otro", Role::Solicitante)).is_empty());
        assert!(allowed_actions(&pending, &user("bod", Role::Bodeguero)).is_empty());

        // Owning a solicitud does not let a supervisor cancel it
        let mut own = solicitud(RequestStatus::Pendiente);
        own.solicitante_id = "sup".into();
        assert_eq!(
            authorize(&own, &user("sup", Role::Supervisor), RequestAction::Cancelar),
            Err(TransitionError::Forbidden(RequestAction::Cancelar))
        );

        let approved = solicitud(RequestStatus::Aprobada);
        assert_eq!(
            allowed_actions(&approved, &user("bod", Role::Bodeguero)),
            vec![RequestAction::Entregar]
        );
        assert_eq!(
            allowed_actions(&approved, &user("root", Role::Admin)),
            vec![RequestAction::Entregar]
        );
    }

    #[test]
    fn test_action_endpoint() {
        assert_eq!(
            action_endpoint("42", RequestAction::Entregar),
            "/api/solicitudes/42/entregar"
        );
    }

    #[test]
    fn test_default_delivery_capped_by_stock() {
        let d = default_delivery(&solicitud(RequestStatus::Aprobada), &book());
        assert_eq!(d[0].cantidad, 8.0);
        assert_eq!(d[1].cantidad, 4.0);
    }

    #[test]
    fn test_validate_delivery() {
        let s = solicitud(RequestStatus::Aprobada);
        let line = |id: &str, cantidad| DeliveredLine {
            producto_id: id.into(),
            cantidad,
        };

        let req = validate_delivery(&s, &[line("u", 8.0), line("k", 0.0)], &book()).unwrap();
        assert_eq!(req.lineas, vec![line("u", 8.0)]);

        assert!(matches!(
            validate_delivery(&s, &[line("u", 9.0)], &book()),
            Err(TransitionError::Stock(_))
        ));
        assert!(matches!(
            validate_delivery(&s, &[line("k", 5.0)], &book()),
            Err(TransitionError::OverDelivered { .. })
        ));
        assert_eq!(
            validate_delivery(&s, &[line("u", 0.0)], &book()),
            Err(TransitionError::NothingDelivered)
        );
        assert!(matches!(
            validate_delivery(&solicitud(RequestStatus::Pendiente), &[line("u", 1.0)], &book()),
            Err(TransitionError::InvalidTransition { .. })
        ));
    }
}
