//! Local draft state of the movement wizards and its validation.
//!
//! Each draft is validated step by step (so the wizard can stop on the
//! failing step) and once more as a whole in `build`, which produces the
//! request payload.

use super::aggregate::{
    AdjustmentRequest, IngressLine, IngressRequest, Location, ReturnOrigin, ReturnRequest,
    TransferRequest,
};
use crate::domain::a005_request::aggregate::Solicitud;
use crate::domain::common::{require_non_blank, require_non_negative, require_positive, ValidationError};
use crate::shared::stock::{DraftLines, StockBook, StockShortage};
use crate::shared::wizard::WizardStep;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Stock insuficiente: {0}")]
    Stock(#[from] StockShortage),

    #[error("Stock insuficiente: {}", join_shortages(.0))]
    StockLines(Vec<StockShortage>),

    #[error("Agregue al menos un producto")]
    NoLines,

    #[error("Seleccione un producto")]
    NoProduct,

    #[error("El origen y el destino deben ser distintos")]
    SameLocation,

    #[error("La cantidad contada es igual a la existencia; no hay nada que ajustar")]
    NoChange,

    #[error("«{producto}»: sólo se pueden devolver {returnable}")]
    ExceedsReturnable { producto: String, returnable: f64 },
}

fn join_shortages(shortages: &[StockShortage]) -> String {
    shortages
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// Ingreso
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IngressStep {
    Header,
    Lines,
    Confirm,
}

impl WizardStep for IngressStep {
    const ALL: &'static [Self] = &[IngressStep::Header, IngressStep::Lines, IngressStep::Confirm];

    fn title(&self) -> &'static str {
        match self {
            IngressStep::Header => "Proveedor y factura",
            IngressStep::Lines => "Productos",
            IngressStep::Confirm => "Confirmar",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngressDraft {
    pub proveedor_id: String,
    pub factura: String,
    pub fecha: NaiveDate,
    pub lines: DraftLines,
    pub nota: String,
}

impl IngressDraft {
    pub fn new(fecha: NaiveDate) -> Self {
        Self {
            proveedor_id: String::new(),
            factura: String::new(),
            fecha,
            lines: DraftLines::new(),
            nota: String::new(),
        }
    }

    pub fn validate_step(&self, step: IngressStep) -> Result<(), DraftError> {
        match step {
            IngressStep::Header => {
                require_non_blank("proveedor", &self.proveedor_id)?;
                require_non_blank("factura", &self.factura)?;
                Ok(())
            }
            IngressStep::Lines => {
                if self.lines.is_empty() {
                    return Err(DraftError::NoLines);
                }
                for line in self.lines.lines() {
                    require_positive("cantidad", line.cantidad)?;
                    require_non_negative("costo unitario", line.costo_unitario)?;
                }
                Ok(())
            }
            IngressStep::Confirm => Ok(()),
        }
    }

    pub fn build(&self) -> Result<IngressRequest, DraftError> {
        for step in IngressStep::ALL {
            self.validate_step(*step)?;
        }
        Ok(IngressRequest {
            proveedor_id: self.proveedor_id.clone(),
            factura: self.factura.trim().to_string(),
            fecha: self.fecha,
            lineas: self
                .lines
                .merged()
                .into_iter()
                .map(|l| IngressLine {
                    producto_id: l.producto_id,
                    cantidad: l.cantidad,
                    costo_unitario: l.costo_unitario,
                })
                .collect(),
            nota: self.nota.trim().to_string(),
        })
    }
}

// ============================================================================
// Ajuste (physical count)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdjustmentStep {
    Product,
    Count,
}

impl WizardStep for AdjustmentStep {
    const ALL: &'static [Self] = &[AdjustmentStep::Product, AdjustmentStep::Count];

    fn title(&self) -> &'static str {
        match self {
            AdjustmentStep::Product => "Producto",
            AdjustmentStep::Count => "Conteo y motivo",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentDraft {
    pub producto_id: String,
    pub cantidad_contada: f64,
    pub motivo: String,
}

impl AdjustmentDraft {
    /// Delta the adjustment will record
    pub fn delta(&self, book: &StockBook) -> f64 {
        self.cantidad_contada - book.available(&self.producto_id)
    }

    pub fn validate_step(&self, step: AdjustmentStep, book: &StockBook) -> Result<(), DraftError> {
        match step {
            AdjustmentStep::Product => {
                if self.producto_id.is_empty() {
                    return Err(DraftError::NoProduct);
                }
                Ok(())
            }
            AdjustmentStep::Count => {
                require_non_negative("cantidad contada", self.cantidad_contada)?;
                require_non_blank("motivo", &self.motivo)?;
                if self.delta(book).abs() < f64::EPSILON {
                    return Err(DraftError::NoChange);
                }
                Ok(())
            }
        }
    }

    pub fn build(&self, book: &StockBook) -> Result<AdjustmentRequest, DraftError> {
        for step in AdjustmentStep::ALL {
            self.validate_step(*step, book)?;
        }
        Ok(AdjustmentRequest {
            producto_id: self.producto_id.clone(),
            cantidad_contada: self.cantidad_contada,
            motivo: self.motivo.trim().to_string(),
        })
    }
}

// ============================================================================
// Transferencia
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransferStep {
    Product,
    Locations,
}

impl WizardStep for TransferStep {
    const ALL: &'static [Self] = &[TransferStep::Product, TransferStep::Locations];

    fn title(&self) -> &'static str {
        match self {
            TransferStep::Product => "Producto y cantidad",
            TransferStep::Locations => "Origen y destino",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferDraft {
    pub producto_id: String,
    pub cantidad: f64,
    pub origen: Location,
    pub destino: Location,
    pub nota: String,
}

impl TransferDraft {
    pub fn validate_step(&self, step: TransferStep, book: &StockBook) -> Result<(), DraftError> {
        match step {
            TransferStep::Product => {
                if self.producto_id.is_empty() {
                    return Err(DraftError::NoProduct);
                }
                require_positive("cantidad", self.cantidad)?;
                book.check_quantity(&self.producto_id, self.cantidad)?;
                Ok(())
            }
            TransferStep::Locations => {
                require_non_blank("finca de origen", &self.origen.finca_id)?;
                require_non_blank("finca de destino", &self.destino.finca_id)?;
                if self.origen == self.destino {
                    return Err(DraftError::SameLocation);
                }
                Ok(())
            }
        }
    }

    pub fn build(&self, book: &StockBook) -> Result<TransferRequest, DraftError> {
        for step in TransferStep::ALL {
            self.validate_step(*step, book)?;
        }
        Ok(TransferRequest {
            producto_id: self.producto_id.clone(),
            cantidad: self.cantidad,
            origen: self.origen.clone(),
            destino: self.destino.clone(),
            nota: self.nota.trim().to_string(),
        })
    }
}

// ============================================================================
// Devolución
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReturnStep {
    Origin,
    Product,
}

impl WizardStep for ReturnStep {
    const ALL: &'static [Self] = &[ReturnStep::Origin, ReturnStep::Product];

    fn title(&self) -> &'static str {
        match self {
            ReturnStep::Origin => "Origen",
            ReturnStep::Product => "Producto y motivo",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnMode {
    /// Leftover from a delivered solicitud
    #[default]
    Solicitud,
    Proveedor,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnDraft {
    pub modo: ReturnMode,
    pub solicitud_id: String,
    pub proveedor_id: String,
    pub producto_id: String,
    pub cantidad: f64,
    pub motivo: String,
}

impl ReturnDraft {
    /// `solicitud` must be the one referenced by `solicitud_id` when returning to the warehouse
    pub fn validate_step(
        &self,
        step: ReturnStep,
        book: &StockBook,
        solicitud: Option<&Solicitud>,
    ) -> Result<(), DraftError> {
        match step {
            ReturnStep::Origin => match self.modo {
                ReturnMode::Solicitud => {
                    require_non_blank("solicitud", &self.solicitud_id)?;
                    Ok(())
                }
                ReturnMode::Proveedor => {
                    require_non_blank("proveedor", &self.proveedor_id)?;
                    Ok(())
                }
            },
            ReturnStep::Product => {
                if self.producto_id.is_empty() {
                    return Err(DraftError::NoProduct);
                }
                require_positive("cantidad", self.cantidad)?;
                require_non_blank("motivo", &self.motivo)?;
                match self.modo {
                    ReturnMode::Solicitud => {
                        let (producto, returnable) = solicitud
                            .and_then(|s| s.returnable(&self.producto_id))
                            .ok_or(DraftError::NoProduct)?;
                        if self.cantidad > returnable + f64::EPSILON {
                            return Err(DraftError::ExceedsReturnable {
                                producto,
                                returnable,
                            });
                        }
                        Ok(())
                    }
                    ReturnMode::Proveedor => {
                        book.check_quantity(&self.producto_id, self.cantidad)?;
                        Ok(())
                    }
                }
            }
        }
    }

    pub fn build(
        &self,
        book: &StockBook,
        solicitud: Option<&Solicitud>,
    ) -> Result<ReturnRequest, DraftError> {
        for step in ReturnStep::ALL {
            self.validate_step(*step, book, solicitud)?;
        }
        let origen = match self.modo {
            ReturnMode::Solicitud => ReturnOrigin::Solicitud {
                solicitud_id: self.solicitud_id.clone(),
            },
            ReturnMode::Proveedor => ReturnOrigin::Proveedor {
                proveedor_id: self.proveedor_id.clone(),
            },
        };
        Ok(ReturnRequest {
            origen,
            producto_id: self.producto_id.clone(),
            cantidad: self.cantidad,
            motivo: self.motivo.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_product::aggregate::Product;
    use crate::domain::a005_request::aggregate::{RequestStatus, SolicitudLine};

    fn product(id: &str, stock: f64) -> Product {
        Product {
            id: id.into(),
            codigo: id.into(),
            nombre: format!("Producto {}", id),
            categoria: String::new(),
            unidad: "kg".into(),
            stock,
            stock_minimo: 0.0,
            precio: 0.0,
            activo: true,
        }
    }

    fn book() -> StockBook {
        StockBook::from_products(&[product("u", 100.0), product("k", 10.0)])
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 10).unwrap()
    }

    #[test]
    fn test_ingress_header_required() {
        let mut d = IngressDraft::new(date());
        assert_eq!(
            d.validate_step(IngressStep::Header),
            Err(DraftError::Validation(ValidationError::Required("proveedor")))
        );
        d.proveedor_id = "p1".into();
        d.factura = "FV-100".into();
        assert!(d.validate_step(IngressStep::Header).is_ok());
        assert_eq!(d.validate_step(IngressStep::Lines), Err(DraftError::NoLines));
    }

    #[test]
    fn test_ingress_builds_merged_lines() {
        let mut d = IngressDraft::new(date());
        d.proveedor_id = "p1".into();
        d.factura = "  FV-100 ".into();
        d.lines.add(&product("u", 0.0), 10.0, 3000.0);
        d.lines.add(&product("u", 0.0), 5.0, 3200.0);
        let req = d.build().unwrap();
        assert_eq!(req.factura, "FV-100");
        assert_eq!(req.lineas.len(), 1);
        assert_eq!(req.lineas[0].cantidad, 15.0);
        assert_eq!(req.lineas[0].costo_unitario, 3200.0);
    }

    #[test]
    fn test_ingress_rejects_zero_quantity() {
        let mut d = IngressDraft::new(date());
        d.proveedor_id = "p1".into();
        d.factura = "FV-1".into();
        d.lines.add(&product("u", 0.0), 0.0, 1.0);
        assert!(matches!(d.build(), Err(DraftError::Validation(_))));
    }

    #[test]
    fn test_adjustment_needs_a_difference() {
        let d = AdjustmentDraft {
            producto_id: "k".into(),
            cantidad_contada: 10.0,
            motivo: "Conteo mensual".into(),
        };
        assert_eq!(d.build(&book()), Err(DraftError::NoChange));

        let d = AdjustmentDraft {
            cantidad_contada: 7.0,
            ..d
        };
        assert_eq!(d.delta(&book()), -3.0);
        assert!(d.build(&book()).is_ok());
    }

    #[test]
    fn test_transfer_checks_stock_and_locations() {
        let mut d = TransferDraft {
            producto_id: "k".into(),
            cantidad: 12.0,
            origen: Location {
                finca_id: "f1".into(),
                lote_id: None,
            },
            destino: Location {
                finca_id: "f1".into(),
                lote_id: None,
            },
            nota: String::new(),
        };
        assert!(matches!(
            d.validate_step(TransferStep::Product, &book()),
            Err(DraftError::Stock(_))
        ));
        d.cantidad = 4.0;
        assert_eq!(d.build(&book()), Err(DraftError::SameLocation));
        d.destino.lote_id = Some("l2".into());
        assert!(d.build(&book()).is_ok());
    }

    fn delivered_solicitud() -> Solicitud {
        Solicitud {
            id: "s1".into(),
            numero: "SOL-0001".into(),
            solicitante_id: "u1".into(),
            solicitante: "Ana".into(),
            finca_id: "f1".into(),
            lote_id: None,
            estado: RequestStatus::Entregada,
            lineas: vec![SolicitudLine {
                producto_id: "u".into(),
                producto_nombre: "Urea".into(),
                cantidad: 20.0,
                cantidad_entregada: 18.0,
                cantidad_devuelta: 5.0,
            }],
            motivo_rechazo: None,
            creada: date(),
            nota: String::new(),
        }
    }

    #[test]
    fn test_return_to_warehouse_limited_by_delivered_minus_returned() {
        let s = delivered_solicitud();
        let d = ReturnDraft {
            modo: ReturnMode::Solicitud,
            solicitud_id: "s1".into(),
            producto_id: "u".into(),
            cantidad: 14.0,
            motivo: "Sobrante de aplicación".into(),
            ..Default::default()
        };
        assert_eq!(
            d.build(&book(), Some(&s)),
            Err(DraftError::ExceedsReturnable {
                producto: "Urea".into(),
                returnable: 13.0
            })
        );
        let d = ReturnDraft { cantidad: 13.0, ..d };
        let req = d.build(&book(), Some(&s)).unwrap();
        assert_eq!(
            req.origen,
            ReturnOrigin::Solicitud {
                solicitud_id: "s1".into()
            }
        );
    }

    #[test]
    fn test_return_to_provider_limited_by_stock() {
        let d = ReturnDraft {
            modo: ReturnMode::Proveedor,
            proveedor_id: "p1".into(),
            producto_id: "k".into(),
            cantidad: 11.0,
            motivo: "Producto vencido".into(),
            ..Default::default()
        };
        assert!(matches!(d.build(&book(), None), Err(DraftError::Stock(_))));
    }

    #[test]
    fn test_stock_lines_message_joins_every_shortage() {
        let err = DraftError::StockLines(book().check_lines([("u", 120.0), ("k", 11.0)]));
        let msg = err.to_string();
        assert!(msg.starts_with("Stock insuficiente: «Producto u»"));
        assert!(msg.contains("; «Producto k»"));
    }
}
