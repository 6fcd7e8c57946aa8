use crate::domain::common::Resource;
use crate::shared::list_filter::{filter_by_text, group_by};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Ingreso,
    Ajuste,
    Transferencia,
    Devolucion,
}

impl MovementKind {
    pub const ALL: [MovementKind; 4] = [
        MovementKind::Ingreso,
        MovementKind::Ajuste,
        MovementKind::Transferencia,
        MovementKind::Devolucion,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MovementKind::Ingreso => "Ingreso",
            MovementKind::Ajuste => "Ajuste",
            MovementKind::Transferencia => "Transferencia",
            MovementKind::Devolucion => "Devolución",
        }
    }

    /// Value of `?tipo=` and path segment of the register endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Ingreso => "ingreso",
            MovementKind::Ajuste => "ajuste",
            MovementKind::Transferencia => "transferencia",
            MovementKind::Devolucion => "devolucion",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// `POST /api/movimientos/{tipo}`
    pub fn endpoint(&self) -> String {
        format!("{}/{}", Movement::collection_path(), self.as_str())
    }
}

/// Ledger row as listed by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub id: String,
    pub tipo: MovementKind,
    #[serde(rename = "productoId")]
    pub producto_id: String,
    #[serde(rename = "productoNombre", default)]
    pub producto_nombre: String,
    /// Signed: downward adjustments arrive negative
    pub cantidad: f64,
    pub fecha: NaiveDate,
    #[serde(default)]
    pub usuario: String,
    /// Invoice or solicitud number
    #[serde(default)]
    pub referencia: String,
    #[serde(default)]
    pub nota: String,
}

impl Resource for Movement {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.producto_nombre
    }

    fn resource_index() -> &'static str {
        "a004"
    }

    fn collection_name() -> &'static str {
        "movement"
    }

    fn collection_path() -> &'static str {
        "/api/movimientos"
    }

    fn element_name() -> &'static str {
        "Movimiento"
    }

    fn list_name() -> &'static str {
        "Movimientos"
    }
}

// ============================================================================
// Request payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngressLine {
    #[serde(rename = "productoId")]
    pub producto_id: String,
    pub cantidad: f64,
    #[serde(rename = "costoUnitario")]
    pub costo_unitario: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngressRequest {
    #[serde(rename = "proveedorId")]
    pub proveedor_id: String,
    pub factura: String,
    pub fecha: NaiveDate,
    pub lineas: Vec<IngressLine>,
    pub nota: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentRequest {
    #[serde(rename = "productoId")]
    pub producto_id: String,
    #[serde(rename = "cantidadContada")]
    pub cantidad_contada: f64,
    pub motivo: String,
}

/// Farm and optional lot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "fincaId")]
    pub finca_id: String,
    #[serde(rename = "loteId")]
    pub lote_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    #[serde(rename = "productoId")]
    pub producto_id: String,
    pub cantidad: f64,
    pub origen: Location,
    pub destino: Location,
    pub nota: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tipo", rename_all = "lowercase")]
pub enum ReturnOrigin {
    /// Leftover of a delivered solicitud going back to the warehouse
    Solicitud {
        #[serde(rename = "solicitudId")]
        solicitud_id: String,
    },
    /// Return to the provider
    Proveedor {
        #[serde(rename = "proveedorId")]
        proveedor_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnRequest {
    pub origen: ReturnOrigin,
    #[serde(rename = "productoId")]
    pub producto_id: String,
    pub cantidad: f64,
    pub motivo: String,
}

// ============================================================================
// Listing helpers
// ============================================================================

pub fn group_by_kind(movements: &[Movement]) -> BTreeMap<MovementKind, Vec<Movement>> {
    group_by(movements, |m| m.tipo)
}

/// Kind filter plus the text search of the ledger
pub fn filter_movements(
    movements: &[Movement],
    kind: Option<MovementKind>,
    text: &str,
    min_chars: usize,
) -> Vec<Movement> {
    let by_kind: Vec<Movement> = movements
        .iter()
        .filter(|m| kind.map(|k| m.tipo == k).unwrap_or(true))
        .cloned()
        .collect();
    filter_by_text(&by_kind, text, min_chars)
}

/// Newest first; same day keeps backend order
pub fn sort_newest_first(movements: &mut [Movement]) {
    movements.sort_by(|a, b| b.fecha.cmp(&a.fecha));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip_through_query_value() {
        for kind in MovementKind::ALL {
            assert_eq!(MovementKind::from_str_opt(kind.as_str()), Some(kind));
        }
        assert_eq!(MovementKind::from_str_opt("venta"), None);
        assert_eq!(
            MovementKind::Devolucion.endpoint(),
            "/api/movimientos/devolucion"
        );
    }

    #[test]
    fn test_movement_from_backend_json() {
        let m: Movement = serde_json::from_str(
            r#"{"id":"m1","tipo":"ajuste","productoId":"u","cantidad":-3.5,"fecha":"2026-03-02"}"#,
        )
        .unwrap();
        assert_eq!(m.tipo, MovementKind::Ajuste);
        assert_eq!(m.cantidad, -3.5);
        assert_eq!(m.fecha, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    }

    #[test]
    fn test_return_origin_is_tagged() {
        let json = serde_json::to_value(ReturnOrigin::Solicitud {
            solicitud_id: "s9".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"tipo": "solicitud", "solicitudId": "s9"}));
    }

    #[test]
    fn test_group_and_sort() {
        let mk = |id: &str, tipo, day| Movement {
            id: id.into(),
            tipo,
            producto_id: "u".into(),
            producto_nombre: "Urea".into(),
            cantidad: 1.0,
            fecha: NaiveDate::from_ymd_opt(2026, 5, day).unwrap(),
            usuario: String::new(),
            referencia: String::new(),
            nota: String::new(),
        };
        let mut list = vec![
            mk("a", MovementKind::Ingreso, 1),
            mk("b", MovementKind::Ajuste, 3),
            mk("c", MovementKind::Ingreso, 2),
        ];
        let groups = group_by_kind(&list);
        assert_eq!(groups[&MovementKind::Ingreso].len(), 2);
        assert!(!groups.contains_key(&MovementKind::Transferencia));

        sort_newest_first(&mut list);
        let ids: Vec<&str> = list.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_filter_movements_by_kind_and_text() {
        let mk = |id: &str, tipo, nombre: &str| Movement {
            id: id.into(),
            tipo,
            producto_id: id.into(),
            producto_nombre: nombre.into(),
            cantidad: 1.0,
            fecha: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            usuario: String::new(),
            referencia: String::new(),
            nota: String::new(),
        };
        let list = vec![
            mk("a", MovementKind::Ingreso, "Urea"),
            mk("b", MovementKind::Ajuste, "Urea"),
            mk("c", MovementKind::Ingreso, "Fungicida"),
        ];

        let ingresos = filter_movements(&list, Some(MovementKind::Ingreso), "", 2);
        assert_eq!(ingresos.len(), 2);

        let urea_ingresos = filter_movements(&list, Some(MovementKind::Ingreso), "ure", 2);
        assert_eq!(urea_ingresos.len(), 1);
        assert_eq!(urea_ingresos[0].id, "a");

        assert_eq!(filter_movements(&list, None, "u", 2).len(), 3);
    }
}
