use crate::domain::common::{require_non_blank, Resource, ValidationError};
use serde::{Deserialize, Serialize};

/// Supplies provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub nombre: String,
    pub nit: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub direccion: String,
    #[serde(default = "default_true")]
    pub activo: bool,
}

fn default_true() -> bool {
    true
}

impl Provider {
    pub fn to_dto(&self) -> ProviderDto {
        ProviderDto {
            id: Some(self.id.clone()),
            nombre: self.nombre.clone(),
            nit: self.nit.clone(),
            telefono: self.telefono.clone(),
            email: self.email.clone(),
            direccion: self.direccion.clone(),
            activo: self.activo,
        }
    }
}

impl Resource for Provider {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.nombre
    }

    fn resource_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "provider"
    }

    fn collection_path() -> &'static str {
        "/api/proveedores"
    }

    fn element_name() -> &'static str {
        "Proveedor"
    }

    fn list_name() -> &'static str {
        "Proveedores"
    }
}

/// DTO to create or update a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDto {
    pub id: Option<String>,
    pub nombre: String,
    pub nit: String,
    pub telefono: String,
    pub email: String,
    pub direccion: String,
    pub activo: bool,
}

impl Default for ProviderDto {
    fn default() -> Self {
        Self {
            id: None,
            nombre: String::new(),
            nit: String::new(),
            telefono: String::new(),
            email: String::new(),
            direccion: String::new(),
            activo: true,
        }
    }
}

impl ProviderDto {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("nombre", &self.nombre)?;
        require_non_blank("NIT", &self.nit)?;
        validate_nit(&self.nit)?;
        if !self.email.trim().is_empty() {
            validate_email(&self.email)?;
        }
        Ok(())
    }
}

/// NIT: digits with an optional check digit after a hyphen (`900123456-7`)
fn validate_nit(nit: &str) -> Result<(), ValidationError> {
    let nit = nit.trim();
    let (body, check) = match nit.split_once('-') {
        Some((body, check)) => (body, Some(check)),
        None => (nit, None),
    };

    let body_ok = !body.is_empty() && body.chars().all(|c| c.is_ascii_digit());
    let check_ok = check
        .map(|c| c.len() == 1 && c.chars().all(|ch| ch.is_ascii_digit()))
        .unwrap_or(true);

    if body_ok && check_ok {
        Ok(())
    } else {
        Err(ValidationError::Invalid {
            field: "NIT",
            reason: "use sólo dígitos y un dígito de verificación opcional (900123456-7)".into(),
        })
    }
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::Invalid {
        field: "email",
        reason: "formato esperado usuario@dominio.com".into(),
    };

    let (user, domain) = email.trim().split_once('@').ok_or_else(invalid)?;
    if user.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    match domain.split_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() && !tld.ends_with('.') => Ok(()),
        _ => Err(invalid()),
    }
}

/// Single-field change sent from the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProviderPatch {
    #[serde(rename = "activo")]
    Activo(bool),
}

impl Provider {
    pub fn apply(&mut self, patch: &ProviderPatch) {
        match patch {
            ProviderPatch::Activo(v) => self.activo = *v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> ProviderDto {
        ProviderDto {
            nombre: "Agroinsumos del Valle".into(),
            nit: "900123456-7".into(),
            email: "ventas@agrovalle.co".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_provider() {
        assert!(dto().validate().is_ok());
    }

    #[test]
    fn test_nit_without_check_digit() {
        let mut d = dto();
        d.nit = "800999111".into();
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_bad_nit() {
        let mut d = dto();
        d.nit = "90012A".into();
        assert!(matches!(
            d.validate(),
            Err(ValidationError::Invalid { field: "NIT", .. })
        ));
        d.nit = "900123456-78".into();
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_email_optional_but_checked() {
        let mut d = dto();
        d.email = String::new();
        assert!(d.validate().is_ok());
        d.email = "ventas@agrovalle".into();
        assert!(matches!(
            d.validate(),
            Err(ValidationError::Invalid { field: "email", .. })
        ));
        d.email = "a@b@c.co".into();
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_toggle_patch() {
        let mut p: Provider = serde_json::from_str(
            r#"{"id":"3","nombre":"Semillas SA","nit":"811000222"}"#,
        )
        .unwrap();
        assert!(p.activo);
        p.apply(&ProviderPatch::Activo(false));
        assert!(!p.activo);
        assert_eq!(
            serde_json::to_string(&ProviderPatch::Activo(false)).unwrap(),
            r#"{"activo":false}"#
        );
    }
}
