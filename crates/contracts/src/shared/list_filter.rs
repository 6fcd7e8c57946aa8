//! Client-side list search and grouping

use crate::domain::a001_product::aggregate::Product;
use crate::domain::a002_provider::aggregate::Provider;
use crate::domain::a004_movement::aggregate::Movement;
use crate::domain::a005_request::aggregate::Solicitud;
use crate::system::users::User;
use std::collections::BTreeMap;

/// Types that support text search
pub trait Searchable {
    /// Text searched against (normalized before comparing)
    fn haystack(&self) -> String;

    fn matches(&self, normalized_query: &str) -> bool {
        normalize(&self.haystack()).contains(normalized_query)
    }
}

/// Lowercased with accents stripped, so "fungicida" matches "FUNGÍCIDA"
pub fn normalize(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Queries shorter than `min_chars` (after trimming) return all items
pub fn filter_by_text<T: Searchable + Clone>(items: &[T], query: &str, min_chars: usize) -> Vec<T> {
    let query = query.trim();
    if query.chars().count() < min_chars.max(1) {
        return items.to_vec();
    }
    let needle = normalize(query);
    items.iter().filter(|i| i.matches(&needle)).cloned().collect()
}

pub fn is_filter_active(query: &str, min_chars: usize) -> bool {
    query.trim().chars().count() >= min_chars.max(1)
}

pub fn group_by<T, K, F>(items: &[T], key: F) -> BTreeMap<K, Vec<T>>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut map: BTreeMap<K, Vec<T>> = BTreeMap::new();
    for item in items {
        map.entry(key(item)).or_default().push(item.clone());
    }
    map
}

// ============================================================================
// Implementations
// ============================================================================

impl Searchable for Product {
    fn haystack(&self) -> String {
        format!("{} {} {}", self.codigo, self.nombre, self.categoria)
    }
}

impl Searchable for Provider {
    fn haystack(&self) -> String {
        format!("{} {} {}", self.nombre, self.nit, self.email)
    }
}

impl Searchable for Movement {
    fn haystack(&self) -> String {
        format!(
            "{} {} {} {}",
            self.producto_nombre, self.referencia, self.usuario, self.nota
        )
    }
}

impl Searchable for Solicitud {
    fn haystack(&self) -> String {
        let products: Vec<&str> = self
            .lineas
            .iter()
            .map(|l| l.producto_nombre.as_str())
            .collect();
        format!("{} {} {}", self.numero, self.solicitante, products.join(" "))
    }
}

impl Searchable for User {
    fn haystack(&self) -> String {
        format!("{} {}", self.username, self.nombre)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(codigo: &str, nombre: &str, categoria: &str) -> Product {
        Product {
            id: codigo.into(),
            codigo: codigo.into(),
            nombre: nombre.into(),
            categoria: categoria.into(),
            unidad: "l".into(),
            stock: 0.0,
            stock_minimo: 0.0,
            precio: 0.0,
            activo: true,
        }
    }

    #[test]
    fn test_normalize_strips_accents() {
        assert_eq!(normalize("FUNGÍCIDA Año"), "fungicida ano");
    }

    #[test]
    fn test_filter_ignores_short_queries() {
        let items = vec![
            product("A1", "Fungicida cúprico", "Agroquímicos"),
            product("B2", "Urea", "Fertilizantes"),
        ];
        assert_eq!(filter_by_text(&items, "u", 2).len(), 2);
        assert!(!is_filter_active(" u ", 2));

        let found = filter_by_text(&items, "cuprico", 2);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].codigo, "A1");

        assert_eq!(filter_by_text(&items, "fertil", 2)[0].codigo, "B2");
        assert!(filter_by_text(&items, "zzz", 2).is_empty());
    }

    #[test]
    fn test_group_by_category() {
        let items = vec![
            product("1", "a", "Semillas"),
            product("2", "b", "Fertilizantes"),
            product("3", "c", "Semillas"),
        ];
        let groups = group_by(&items, |p| p.categoria.clone());
        let keys: Vec<&String> = groups.keys().collect();
        assert_eq!(keys, vec!["Fertilizantes", "Semillas"]);
        assert_eq!(groups["Semillas"].len(), 2);
    }
}
