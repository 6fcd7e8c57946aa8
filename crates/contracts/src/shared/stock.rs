//! Client-side stock validation against the last inventory snapshot.
//!
//! The backend stays authoritative; this only blocks drafts that obviously
//! ask for more than what the snapshot shows.

use crate::domain::a001_product::aggregate::Product;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("«{producto}»: se piden {requested} y hay {available} disponibles")]
pub struct StockShortage {
    pub producto_id: String,
    pub producto: String,
    pub requested: f64,
    pub available: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockBook {
    entries: HashMap<String, (String, f64)>,
}

impl StockBook {
    pub fn from_products(products: &[Product]) -> Self {
        let entries = products
            .iter()
            .map(|p| (p.id.clone(), (p.nombre.clone(), p.stock)))
            .collect();
        Self { entries }
    }

    /// Unknown products have nothing available
    pub fn available(&self, producto_id: &str) -> f64 {
        self.entries.get(producto_id).map(|(_, s)| *s).unwrap_or(0.0)
    }

    fn name_of(&self, producto_id: &str) -> String {
        self.entries
            .get(producto_id)
            .map(|(n, _)| n.clone())
            .unwrap_or_else(|| producto_id.to_string())
    }

    pub fn check_quantity(&self, producto_id: &str, requested: f64) -> Result<(), StockShortage> {
        let available = self.available(producto_id);
        if requested > available + f64::EPSILON {
            return Err(StockShortage {
                producto_id: producto_id.to_string(),
                producto: self.name_of(producto_id),
                requested,
                available,
            });
        }
        Ok(())
    }

    /// Sum quantities per product across the draft and report every product
    /// whose total exceeds availability, in first-seen order.
    pub fn check_lines<'a, I>(&self, lines: I) -> Vec<StockShortage>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut order: Vec<&'a str> = Vec::new();
        let mut totals: HashMap<&'a str, f64> = HashMap::new();
        for (id, qty) in lines {
            let total = totals.entry(id).or_insert_with(|| {
                order.push(id);
                0.0
            });
            *total += qty;
        }

        order
            .into_iter()
            .filter_map(|id| self.check_quantity(id, totals[id]).err())
            .collect()
    }
}

// ============================================================================
// Draft lines
// ============================================================================

/// One product line in a wizard draft. `key` is local to the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftLine {
    pub key: Uuid,
    pub producto_id: String,
    pub producto_nombre: String,
    pub cantidad: f64,
    /// Ingress only
    pub costo_unitario: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftLines {
    lines: Vec<DraftLine>,
}

impl DraftLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn add(&mut self, product: &Product, cantidad: f64, costo_unitario: f64) -> Uuid {
        let key = Uuid::new_v4();
        self.lines.push(DraftLine {
            key,
            producto_id: product.id.clone(),
            producto_nombre: product.nombre.clone(),
            cantidad,
            costo_unitario,
        });
        key
    }

    pub fn remove(&mut self, key: Uuid) {
        self.lines.retain(|l| l.key != key);
    }

    pub fn set_quantity(&mut self, key: Uuid, cantidad: f64) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.key == key) {
            line.cantidad = cantidad;
        }
    }

    pub fn set_cost(&mut self, key: Uuid, costo_unitario: f64) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.key == key) {
            line.costo_unitario = costo_unitario;
        }
    }

    /// Lines of the same product merged: quantities summed, the last cost kept
    pub fn merged(&self) -> Vec<DraftLine> {
        let mut out: Vec<DraftLine> = Vec::new();
        for line in &self.lines {
            match out.iter_mut().find(|l| l.producto_id == line.producto_id) {
                Some(existing) => {
                    existing.cantidad += line.cantidad;
                    existing.costo_unitario = line.costo_unitario;
                }
                None => out.push(line.clone()),
            }
        }
        out
    }

    pub fn total_cost(&self) -> f64 {
        self.lines.iter().map(|l| l.cantidad * l.costo_unitario).sum()
    }

    pub fn check_stock(&self, book: &StockBook) -> Vec<StockShortage> {
        book.check_lines(
            self.lines
                .iter()
                .map(|l| (l.producto_id.as_str(), l.cantidad)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, nombre: &str, stock: f64) -> Product {
        Product {
            id: id.into(),
            codigo: id.to_uppercase(),
            nombre: nombre.into(),
            categoria: String::new(),
            unidad: "kg".into(),
            stock,
            stock_minimo: 0.0,
            precio: 0.0,
            activo: true,
        }
    }

    fn book() -> StockBook {
        StockBook::from_products(&[product("u", "Urea", 100.0), product("k", "KCl", 20.0)])
    }

    #[test]
    fn test_quantity_within_stock() {
        assert!(book().check_quantity("u", 100.0).is_ok());
        let err = book().check_quantity("k", 25.0).unwrap_err();
        assert_eq!(err.available, 20.0);
        assert_eq!(err.to_string(), "«KCl»: se piden 25 y hay 20 disponibles");
    }

    #[test]
    fn test_unknown_product_has_no_stock() {
        assert_eq!(book().available("zzz"), 0.0);
        assert!(book().check_quantity("zzz", 1.0).is_err());
    }

    #[test]
    fn test_lines_are_summed_per_product() {
        let shortages = book().check_lines([("u", 60.0), ("k", 5.0), ("u", 50.0)]);
        assert_eq!(shortages.len(), 1);
        assert_eq!(shortages[0].producto_id, "u");
        assert_eq!(shortages[0].requested, 110.0);
    }

    #[test]
    fn test_draft_lines_merge_and_cost() {
        let urea = product("u", "Urea", 100.0);
        let kcl = product("k", "KCl", 20.0);
        let mut draft = DraftLines::new();
        draft.add(&urea, 10.0, 3000.0);
        let k = draft.add(&kcl, 2.0, 5000.0);
        draft.add(&urea, 5.0, 3100.0);

        let merged = draft.merged();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].cantidad, 15.0);
        assert_eq!(merged[0].costo_unitario, 3100.0);
        assert_eq!(draft.total_cost(), 10.0 * 3000.0 + 2.0 * 5000.0 + 5.0 * 3100.0);

        draft.set_quantity(k, 30.0);
        let shortages = draft.check_stock(&book());
        assert_eq!(shortages.len(), 1);
        assert_eq!(shortages[0].producto, "KCl");

        draft.remove(k);
        assert_eq!(draft.len(), 2);
        assert!(draft.check_stock(&book()).is_empty());
    }
}
