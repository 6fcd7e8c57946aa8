use crate::domain::common::{require_non_blank, require_positive, Resource, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Finca
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farm {
    pub id: String,
    pub nombre: String,
    #[serde(default)]
    pub ubicacion: String,
    #[serde(rename = "areaHa")]
    pub area_ha: f64,
    #[serde(default = "default_true")]
    pub activo: bool,
}

fn default_true() -> bool {
    true
}

impl Resource for Farm {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.nombre
    }

    fn resource_index() -> &'static str {
        "a003"
    }

    fn collection_name() -> &'static str {
        "farm"
    }

    fn collection_path() -> &'static str {
        "/api/fincas"
    }

    fn element_name() -> &'static str {
        "Finca"
    }

    fn list_name() -> &'static str {
        "Fincas y lotes"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmDto {
    pub id: Option<String>,
    pub nombre: String,
    pub ubicacion: String,
    #[serde(rename = "areaHa")]
    pub area_ha: f64,
    pub activo: bool,
}

impl Default for FarmDto {
    fn default() -> Self {
        Self {
            id: None,
            nombre: String::new(),
            ubicacion: String::new(),
            area_ha: 0.0,
            activo: true,
        }
    }
}

impl From<&Farm> for FarmDto {
    fn from(f: &Farm) -> Self {
        Self {
            id: Some(f.id.clone()),
            nombre: f.nombre.clone(),
            ubicacion: f.ubicacion.clone(),
            area_ha: f.area_ha,
            activo: f.activo,
        }
    }
}

impl FarmDto {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("nombre", &self.nombre)?;
        require_positive("área (ha)", self.area_ha)?;
        Ok(())
    }
}

// ============================================================================
// Lote
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub id: String,
    #[serde(rename = "fincaId")]
    pub finca_id: String,
    pub nombre: String,
    #[serde(default)]
    pub cultivo: String,
    #[serde(rename = "areaHa")]
    pub area_ha: f64,
}

/// Flat lot path; the farm filter goes in `?finca=`
pub const LOTS_PATH: &str = "/api/lotes";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LotDto {
    pub id: Option<String>,
    #[serde(rename = "fincaId")]
    pub finca_id: String,
    pub nombre: String,
    pub cultivo: String,
    #[serde(rename = "areaHa")]
    pub area_ha: f64,
}

impl From<&Lot> for LotDto {
    fn from(l: &Lot) -> Self {
        Self {
            id: Some(l.id.clone()),
            finca_id: l.finca_id.clone(),
            nombre: l.nombre.clone(),
            cultivo: l.cultivo.clone(),
            area_ha: l.area_ha,
        }
    }
}

impl LotDto {
    /// The lots of a farm cannot add up to more area than the farm.
    /// `existing` are the lots already registered (the edited one is ignored).
    pub fn validate(&self, farm: &Farm, existing: &[Lot]) -> Result<(), ValidationError> {
        require_non_blank("nombre", &self.nombre)?;
        require_positive("área (ha)", self.area_ha)?;

        let used: f64 = existing
            .iter()
            .filter(|l| l.finca_id == farm.id)
            .filter(|l| Some(&l.id) != self.id.as_ref())
            .map(|l| l.area_ha)
            .sum();

        let free = farm.area_ha - used;
        if self.area_ha > free + f64::EPSILON {
            return Err(ValidationError::Invalid {
                field: "área (ha)",
                reason: format!(
                    "la finca «{}» sólo tiene {:.2} ha libres",
                    farm.nombre,
                    free.max(0.0)
                ),
            });
        }
        Ok(())
    }
}

/// Group lots by farm
pub fn lots_by_farm(lots: &[Lot]) -> BTreeMap<String, Vec<Lot>> {
    let mut map: BTreeMap<String, Vec<Lot>> = BTreeMap::new();
    for lot in lots {
        map.entry(lot.finca_id.clone()).or_default().push(lot.clone());
    }
    for group in map.values_mut() {
        group.sort_by(|a, b| a.nombre.cmp(&b.nombre));
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farm() -> Farm {
        Farm {
            id: "f1".into(),
            nombre: "La Esperanza".into(),
            ubicacion: "Palmira".into(),
            area_ha: 10.0,
            activo: true,
        }
    }

    fn lot(id: &str, finca: &str, area: f64) -> Lot {
        Lot {
            id: id.into(),
            finca_id: finca.into(),
            nombre: format!("Lote {}", id),
            cultivo: "Caña".into(),
            area_ha: area,
        }
    }

    #[test]
    fn test_lot_fits_in_free_area() {
        let existing = vec![lot("1", "f1", 4.0), lot("2", "f1", 3.0), lot("9", "f2", 50.0)];
        let dto = LotDto {
            finca_id: "f1".into(),
            nombre: "Nuevo".into(),
            area_ha: 3.0,
            ..Default::default()
        };
        assert!(dto.validate(&farm(), &existing).is_ok());

        let too_big = LotDto { area_ha: 3.5, ..dto };
        assert!(matches!(
            too_big.validate(&farm(), &existing),
            Err(ValidationError::Invalid { .. })
        ));
    }

    #[test]
    fn test_editing_lot_excludes_its_own_area() {
        let existing = vec![lot("1", "f1", 4.0), lot("2", "f1", 6.0)];
        let dto = LotDto::from(&existing[1]);
        let edited = LotDto { area_ha: 6.0, ..dto };
        assert!(edited.validate(&farm(), &existing).is_ok());
    }

    #[test]
    fn test_farm_area_must_be_positive() {
        let dto = FarmDto {
            nombre: "El Roble".into(),
            area_ha: 0.0,
            ..Default::default()
        };
        assert_eq!(dto.validate(), Err(ValidationError::NotPositive("área (ha)")));
    }

    #[test]
    fn test_lots_grouped_and_sorted() {
        let groups = lots_by_farm(&[lot("b", "f1", 1.0), lot("a", "f1", 1.0), lot("c", "f2", 1.0)]);
        assert_eq!(groups.len(), 2);
        let names: Vec<&str> = groups["f1"].iter().map(|l| l.nombre.as_str()).collect();
        assert_eq!(names, vec!["Lote a", "Lote b"]);
    }
}
