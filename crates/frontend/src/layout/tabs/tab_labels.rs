//! Tab titles. Resources take their list name from `contracts`.

use contracts::domain::a001_product::aggregate::Product;
use contracts::domain::a002_provider::aggregate::Provider;
use contracts::domain::a003_farm::aggregate::Farm;
use contracts::domain::a004_movement::aggregate::Movement;
use contracts::domain::a005_request::aggregate::Solicitud;
use contracts::domain::common::Resource;

pub fn tab_label_for_key(key: &str) -> &'static str {
    match key {
        "d400_dashboard" => "Inicio",
        "a001_product" => Product::list_name(),
        "a002_provider" => Provider::list_name(),
        "a003_farm" => Farm::list_name(),
        "a004_movement" => Movement::list_name(),
        "a005_request" => Solicitud::list_name(),
        "sys_users" => "Usuarios",
        _ => "Sin título",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(tab_label_for_key("a001_product"), "Inventario");
        assert_eq!(tab_label_for_key("a005_request"), "Solicitudes");
        assert_eq!(tab_label_for_key("zzz"), "Sin título");
    }
}
