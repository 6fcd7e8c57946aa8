use crate::domain::common::{
    require_non_blank, require_non_negative, Resource, ValidationError,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Aggregate
// ============================================================================

/// Catalog product with its current stock (row of `/api/inventario`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub codigo: String,
    pub nombre: String,
    #[serde(default)]
    pub categoria: String,
    pub unidad: String,
    #[serde(default)]
    pub stock: f64,
    #[serde(rename = "stockMinimo", default)]
    pub stock_minimo: f64,
    #[serde(default)]
    pub precio: f64,
    #[serde(default = "default_true")]
    pub activo: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Stock at or below the minimum (active products only)
    pub fn is_low_stock(&self) -> bool {
        self.activo && self.stock <= self.stock_minimo
    }

    /// Apply a patch locally (optimistic cell update)
    pub fn apply(&mut self, patch: &ProductPatch) {
        match patch {
            ProductPatch::Nombre(v) => self.nombre = v.clone(),
            ProductPatch::StockMinimo(v) => self.stock_minimo = *v,
            ProductPatch::Precio(v) => self.precio = *v,
            ProductPatch::Activo(v) => self.activo = *v,
        }
    }

    pub fn to_dto(&self) -> ProductDto {
        ProductDto {
            id: Some(self.id.clone()),
            codigo: self.codigo.clone(),
            nombre: self.nombre.clone(),
            categoria: self.categoria.clone(),
            unidad: self.unidad.clone(),
            stock_minimo: self.stock_minimo,
            precio: self.precio,
            activo: self.activo,
        }
    }
}

impl Resource for Product {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.nombre
    }

    fn resource_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "product"
    }

    fn collection_path() -> &'static str {
        "/api/productos"
    }

    fn element_name() -> &'static str {
        "Producto"
    }

    fn list_name() -> &'static str {
        "Inventario"
    }
}

/// Stock listing (read only). Create and edit go through `/api/productos`.
pub const INVENTORY_PATH: &str = "/api/inventario";

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO to create or update a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDto {
    pub id: Option<String>,
    pub codigo: String,
    pub nombre: String,
    pub categoria: String,
    pub unidad: String,
    #[serde(rename = "stockMinimo")]
    pub stock_minimo: f64,
    pub precio: f64,
    pub activo: bool,
}

impl Default for ProductDto {
    fn default() -> Self {
        Self {
            id: None,
            codigo: String::new(),
            nombre: String::new(),
            categoria: String::new(),
            unidad: "kg".to_string(),
            stock_minimo: 0.0,
            precio: 0.0,
            activo: true,
        }
    }
}

impl ProductDto {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("código", &self.codigo)?;
        require_non_blank("nombre", &self.nombre)?;
        require_non_blank("unidad", &self.unidad)?;
        require_non_negative("precio", self.precio)?;
        require_non_negative("stock mínimo", self.stock_minimo)?;
        Ok(())
    }
}

/// Single-field change sent by the table's editable cells.
///
/// Serialized as a one-key object: `{"precio": 12.5}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProductPatch {
    #[serde(rename = "nombre")]
    Nombre(String),
    #[serde(rename = "stockMinimo")]
    StockMinimo(f64),
    #[serde(rename = "precio")]
    Precio(f64),
    #[serde(rename = "activo")]
    Activo(bool),
}

impl ProductPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            ProductPatch::Nombre(v) => require_non_blank("nombre", v),
            ProductPatch::StockMinimo(v) => require_non_negative("stock mínimo", *v),
            ProductPatch::Precio(v) => require_non_negative("precio", *v),
            ProductPatch::Activo(_) => Ok(()),
        }
    }
}

/// Distinct categories present in the listing, sorted
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut cats: Vec<String> = products
        .iter()
        .map(|p| p.categoria.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    cats.sort();
    cats.dedup();
    cats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            id: "7".into(),
            codigo: "FER-001".into(),
            nombre: "Urea 46%".into(),
            categoria: "Fertilizantes".into(),
            unidad: "kg".into(),
            stock: 40.0,
            stock_minimo: 50.0,
            precio: 3200.0,
            activo: true,
        }
    }

    #[test]
    fn test_low_stock_only_for_active() {
        let mut p = sample();
        assert!(p.is_low_stock());
        p.activo = false;
        assert!(!p.is_low_stock());
        p.activo = true;
        p.stock = 80.0;
        assert!(!p.is_low_stock());
    }

    #[test]
    fn test_apply_patch() {
        let mut p = sample();
        p.apply(&ProductPatch::Precio(3500.0));
        p.apply(&ProductPatch::Activo(false));
        assert_eq!(p.precio, 3500.0);
        assert!(!p.activo);
    }

    #[test]
    fn test_patch_serializes_as_single_key() {
        let json = serde_json::to_string(&ProductPatch::StockMinimo(10.0)).unwrap();
        assert_eq!(json, r#"{"stockMinimo":10.0}"#);
    }

    #[test]
    fn test_product_from_backend_json_with_defaults() {
        let p: Product = serde_json::from_str(
            r#"{"id":"1","codigo":"SEM-9","nombre":"Semilla maíz","unidad":"bulto"}"#,
        )
        .unwrap();
        assert!(p.activo);
        assert_eq!(p.stock, 0.0);
    }

    #[test]
    fn test_dto_validation() {
        let mut dto = sample().to_dto();
        assert!(dto.validate().is_ok());
        dto.precio = -1.0;
        assert_eq!(dto.validate(), Err(ValidationError::Negative("precio")));
        dto.precio = 1.0;
        dto.codigo = " ".into();
        assert_eq!(dto.validate(), Err(ValidationError::Required("código")));
    }

    #[test]
    fn test_categories_are_sorted_and_unique() {
        let mut a = sample();
        let mut b = sample();
        b.categoria = "Agroquímicos".into();
        a.categoria = "Fertilizantes".into();
        let c = sample();
        assert_eq!(
            categories(&[a, b, c]),
            vec!["Agroquímicos".to_string(), "Fertilizantes".to_string()]
        );
    }

    #[test]
    fn test_full_name_matches_tab_key() {
        assert_eq!(Product::full_name(), "a001_product");
        assert_eq!(Product::item_path("7"), "/api/productos/7");
    }
}
