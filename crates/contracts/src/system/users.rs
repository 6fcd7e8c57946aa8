use crate::domain::common::{require_non_blank, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Supervisor,
    Bodeguero,
    Solicitante,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ManageCatalog,
    ManageProviders,
    ManageFarms,
    ManageUsers,
    RegisterMovements,
    CreateRequests,
    ApproveRequests,
    DeliverRequests,
    ViewAllRequests,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Supervisor, Role::Bodeguero, Role::Solicitante];

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::Supervisor => "Supervisor",
            Role::Bodeguero => "Bodeguero",
            Role::Solicitante => "Solicitante",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
            Role::Bodeguero => "bodeguero",
            Role::Solicitante => "solicitante",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }

    pub fn can(&self, permission: Permission) -> bool {
        use Permission::*;
        match self {
            Role::Admin => true,
            Role::Supervisor => matches!(
                permission,
                ApproveRequests | ViewAllRequests | ManageFarms
            ),
            Role::Bodeguero => matches!(
                permission,
                ManageCatalog | ManageProviders | RegisterMovements | DeliverRequests | ViewAllRequests
            ),
            Role::Solicitante => matches!(permission, CreateRequests),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub email: Option<String>,
    pub rol: Role,
    #[serde(default = "default_true")]
    pub activo: bool,
}

fn default_true() -> bool {
    true
}

pub const USERS_PATH: &str = "/api/usuarios";

impl User {
    pub fn apply(&mut self, patch: &UserPatch) {
        match patch {
            UserPatch::Rol(r) => self.rol = *r,
            UserPatch::Activo(v) => self.activo = *v,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserDto {
    pub username: String,
    pub password: String,
    pub nombre: String,
    pub email: Option<String>,
    pub rol: Role,
}

impl CreateUserDto {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("usuario", &self.username)?;
        require_non_blank("nombre", &self.nombre)?;
        if self.password.chars().count() < 8 {
            return Err(ValidationError::Invalid {
                field: "contraseña",
                reason: "mínimo 8 caracteres".into(),
            });
        }
        Ok(())
    }
}

/// Single-field change sent from the users table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UserPatch {
    #[serde(rename = "rol")]
    Rol(Role),
    #[serde(rename = "activo")]
    Activo(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_matrix() {
        assert!(Role::Admin.can(Permission::ManageUsers));
        assert!(Role::Supervisor.can(Permission::ApproveRequests));
        assert!(!Role::Supervisor.can(Permission::DeliverRequests));
        assert!(!Role::Supervisor.can(Permission::CreateRequests));
        assert!(Role::Supervisor.can(Permission::ManageFarms));
        assert!(Role::Bodeguero.can(Permission::DeliverRequests));
        assert!(!Role::Bodeguero.can(Permission::ApproveRequests));
        assert!(Role::Solicitante.can(Permission::CreateRequests));
        assert!(!Role::Solicitante.can(Permission::ViewAllRequests));
    }

    #[test]
    fn test_role_json_is_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Bodeguero).unwrap(), r#""bodeguero""#);
        assert_eq!(Role::from_str_opt("supervisor"), Some(Role::Supervisor));
        assert_eq!(
            serde_json::to_string(&UserPatch::Rol(Role::Admin)).unwrap(),
            r#"{"rol":"admin"}"#
        );
    }

    #[test]
    fn test_create_user_password_length() {
        let dto = CreateUserDto {
            username: "jperez".into(),
            password: "corta".into(),
            nombre: "Juan Pérez".into(),
            email: None,
            rol: Role::Solicitante,
        };
        assert!(dto.validate().is_err());
        let dto = CreateUserDto {
            password: "suficiente".into(),
            ..dto
        };
        assert!(dto.validate().is_ok());
    }
}
