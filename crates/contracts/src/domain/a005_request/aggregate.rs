use crate::domain::a004_movement::aggregate::Location;
use crate::domain::a004_movement::draft::DraftError;
use crate::domain::common::{require_non_blank, require_positive, Resource, ValidationError};
use crate::shared::stock::{DraftLines, StockBook};
use crate::shared::wizard::WizardStep;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pendiente,
    Aprobada,
    Rechazada,
    Entregada,
    Cancelada,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 5] = [
        RequestStatus::Pendiente,
        RequestStatus::Aprobada,
        RequestStatus::Rechazada,
        RequestStatus::Entregada,
        RequestStatus::Cancelada,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pendiente => "Pendiente",
            RequestStatus::Aprobada => "Aprobada",
            RequestStatus::Rechazada => "Rechazada",
            RequestStatus::Entregada => "Entregada",
            RequestStatus::Cancelada => "Cancelada",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pendiente => "pendiente",
            RequestStatus::Aprobada => "aprobada",
            RequestStatus::Rechazada => "rechazada",
            RequestStatus::Entregada => "entregada",
            RequestStatus::Cancelada => "cancelada",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.as_str() == s)
    }

    /// Badge variant in the UI
    pub fn badge_variant(&self) -> &'static str {
        match self {
            RequestStatus::Pendiente => "warning",
            RequestStatus::Aprobada => "primary",
            RequestStatus::Entregada => "success",
            RequestStatus::Rechazada => "error",
            RequestStatus::Cancelada => "neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolicitudLine {
    #[serde(rename = "productoId")]
    pub producto_id: String,
    #[serde(rename = "productoNombre", default)]
    pub producto_nombre: String,
    pub cantidad: f64,
    #[serde(rename = "cantidadEntregada", default)]
    pub cantidad_entregada: f64,
    #[serde(rename = "cantidadDevuelta", default)]
    pub cantidad_devuelta: f64,
}

/// Supplies request from a farm or lot to the warehouse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solicitud {
    pub id: String,
    pub numero: String,
    #[serde(rename = "solicitanteId")]
    pub solicitante_id: String,
    #[serde(default)]
    pub solicitante: String,
    #[serde(rename = "fincaId")]
    pub finca_id: String,
    #[serde(rename = "loteId", default)]
    pub lote_id: Option<String>,
    pub estado: RequestStatus,
    #[serde(default)]
    pub lineas: Vec<SolicitudLine>,
    #[serde(rename = "motivoRechazo", default)]
    pub motivo_rechazo: Option<String>,
    pub creada: NaiveDate,
    #[serde(default)]
    pub nota: String,
}

impl Solicitud {
    pub fn total_requested(&self) -> f64 {
        self.lineas.iter().map(|l| l.cantidad).sum()
    }

    /// Product name and quantity that can still go back to the warehouse
    pub fn returnable(&self, producto_id: &str) -> Option<(String, f64)> {
        if self.estado != RequestStatus::Entregada {
            return None;
        }
        let line = self.lineas.iter().find(|l| l.producto_id == producto_id)?;
        let left = (line.cantidad_entregada - line.cantidad_devuelta).max(0.0);
        Some((line.producto_nombre.clone(), left))
    }
}

impl Resource for Solicitud {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.numero
    }

    fn resource_index() -> &'static str {
        "a005"
    }

    fn collection_name() -> &'static str {
        "request"
    }

    fn collection_path() -> &'static str {
        "/api/solicitudes"
    }

    fn element_name() -> &'static str {
        "Solicitud"
    }

    fn list_name() -> &'static str {
        "Solicitudes"
    }
}

// ============================================================================
// Payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSolicitudLine {
    #[serde(rename = "productoId")]
    pub producto_id: String,
    pub cantidad: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSolicitud {
    pub destino: Location,
    pub lineas: Vec<NewSolicitudLine>,
    pub nota: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectRequest {
    pub motivo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveredLine {
    #[serde(rename = "productoId")]
    pub producto_id: String,
    pub cantidad: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliverRequest {
    pub lineas: Vec<DeliveredLine>,
}

// ============================================================================
// New-solicitud wizard
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolicitudStep {
    Destination,
    Products,
    Confirm,
}

impl WizardStep for SolicitudStep {
    const ALL: &'static [Self] = &[
        SolicitudStep::Destination,
        SolicitudStep::Products,
        SolicitudStep::Confirm,
    ];

    fn title(&self) -> &'static str {
        match self {
            SolicitudStep::Destination => "Finca y lote",
            SolicitudStep::Products => "Productos",
            SolicitudStep::Confirm => "Confirmar",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolicitudDraft {
    pub destino: Location,
    pub lines: DraftLines,
    pub nota: String,
}

impl SolicitudDraft {
    pub fn validate_step(
        &self,
        step: SolicitudStep,
        book: &StockBook,
    ) -> Result<(), DraftError> {
        match step {
            SolicitudStep::Destination => {
                require_non_blank("finca", &self.destino.finca_id)?;
                Ok(())
            }
            SolicitudStep::Products => {
                if self.lines.is_empty() {
                    return Err(DraftError::NoLines);
                }
                for line in self.lines.lines() {
                    require_positive("cantidad", line.cantidad)?;
                }
                let shortages = self.lines.check_stock(book);
                if !shortages.is_empty() {
                    return Err(DraftError::StockLines(shortages));
                }
                Ok(())
            }
            SolicitudStep::Confirm => Ok(()),
        }
    }

    pub fn build(
        &self,
        book: &StockBook,
    ) -> Result<NewSolicitud, DraftError> {
        for step in SolicitudStep::ALL {
            self.validate_step(*step, book)?;
        }
        Ok(NewSolicitud {
            destino: self.destino.clone(),
            lineas: self
                .lines
                .merged()
                .into_iter()
                .map(|l| NewSolicitudLine {
                    producto_id: l.producto_id,
                    cantidad: l.cantidad,
                })
                .collect(),
            nota: self.nota.trim().to_string(),
        })
    }
}

// ============================================================================
// Listing helpers
// ============================================================================

pub fn filter_by_status(items: &[Solicitud], status: Option<RequestStatus>) -> Vec<Solicitud> {
    items
        .iter()
        .filter(|s| status.map(|st| s.estado == st).unwrap_or(true))
        .cloned()
        .collect()
}

pub fn count_by_status(items: &[Solicitud]) -> BTreeMap<RequestStatus, usize> {
    let mut map = BTreeMap::new();
    for s in items {
        *map.entry(s.estado).or_insert(0) += 1;
    }
    map
}

pub fn validate_reject_reason(motivo: &str) -> Result<(), ValidationError> {
    require_non_blank("motivo de rechazo", motivo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_product::aggregate::Product;

    fn product(id: &str, stock: f64) -> Product {
        Product {
            id: id.into(),
            codigo: id.into(),
            nombre: id.to_uppercase(),
            categoria: String::new(),
            unidad: "kg".into(),
            stock,
            stock_minimo: 0.0,
            precio: 0.0,
            activo: true,
        }
    }

    #[test]
    fn test_solicitud_from_backend_json() {
        let s: Solicitud = serde_json::from_str(
            r#"{
                "id": "9", "numero": "SOL-0009", "solicitanteId": "u3",
                "fincaId": "f1", "estado": "aprobada", "creada": "2026-06-01",
                "lineas": [{"productoId": "u", "cantidad": 4}]
            }"#,
        )
        .unwrap();
        assert_eq!(s.estado, RequestStatus::Aprobada);
        assert_eq!(s.lineas[0].cantidad_entregada, 0.0);
        assert_eq!(s.total_requested(), 4.0);
        assert_eq!(s.returnable("u"), None);
    }

    #[test]
    fn test_draft_blocks_on_aggregated_stock() {
        let products = [product("u", 10.0), product("k", 5.0)];
        let book = StockBook::from_products(&products);
        let mut draft = SolicitudDraft::default();
        assert!(draft.validate_step(SolicitudStep::Destination, &book).is_err());
        draft.destino.finca_id = "f1".into();

        draft.lines.add(&products[0], 6.0, 0.0);
        draft.lines.add(&products[0], 6.0, 0.0);
        match draft.validate_step(SolicitudStep::Products, &book) {
            Err(DraftError::StockLines(s)) => {
                assert_eq!(s.len(), 1);
                assert_eq!(s[0].requested, 12.0);
            }
            other => panic!("expected stock error, got {:?}", other),
        }
    }

    #[test]
    fn test_draft_build_merges_lines() {
        let products = [product("u", 10.0)];
        let book = StockBook::from_products(&products);
        let mut draft = SolicitudDraft::default();
        draft.destino.finca_id = "f1".into();
        draft.destino.lote_id = Some("l3".into());
        draft.lines.add(&products[0], 3.0, 0.0);
        draft.lines.add(&products[0], 2.0, 0.0);
        let req = draft.build(&book).unwrap();
        assert_eq!(
            req.lineas,
            vec![NewSolicitudLine {
                producto_id: "u".into(),
                cantidad: 5.0
            }]
        );
    }

    #[test]
    fn test_status_filters_and_counts() {
        let base: Solicitud = serde_json::from_value(serde_json::json!({
            "id": "1", "numero": "SOL-1", "solicitanteId": "u", "fincaId": "f",
            "estado": "pendiente", "creada": "2026-01-01"
        }))
        .unwrap();
        let mut approved = base.clone();
        approved.estado = RequestStatus::Aprobada;
        let items = vec![base.clone(), approved, base];

        assert_eq!(filter_by_status(&items, Some(RequestStatus::Pendiente)).len(), 2);
        assert_eq!(filter_by_status(&items, None).len(), 3);
        let counts = count_by_status(&items);
        assert_eq!(counts[&RequestStatus::Pendiente], 2);
        assert_eq!(counts.get(&RequestStatus::Entregada), None);
    }

    #[test]
    fn test_reject_needs_reason() {
        assert!(validate_reject_reason("  ").is_err());
        assert!(validate_reject_reason("Sin presupuesto").is_ok());
    }
}
