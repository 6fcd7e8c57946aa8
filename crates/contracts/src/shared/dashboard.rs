//! Role dashboards: what each role sees first after login.
//!
//! Everything is computed on the client from the same snapshots the list
//! screens fetch.

use crate::domain::a001_product::aggregate::Product;
use crate::domain::a004_movement::aggregate::{Movement, MovementKind};
use crate::domain::a005_request::aggregate::{RequestStatus, Solicitud};
use crate::system::users::{Permission, Role};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardCard {
    LowStock,
    PendingApprovals,
    AwaitingDelivery,
    MyRequests,
    MovementsToday,
    MovementsWeek,
}

impl DashboardCard {
    pub fn title(&self) -> &'static str {
        match self {
            DashboardCard::LowStock => "Productos bajo mínimo",
            DashboardCard::PendingApprovals => "Solicitudes por aprobar",
            DashboardCard::AwaitingDelivery => "Aprobadas por entregar",
            DashboardCard::MyRequests => "Mis solicitudes",
            DashboardCard::MovementsToday => "Movimientos de hoy",
            DashboardCard::MovementsWeek => "Movimientos últimos 7 días",
        }
    }

    /// Tab that opens when the card is clicked
    pub fn target_tab(&self) -> &'static str {
        match self {
            DashboardCard::LowStock => "a001_product",
            DashboardCard::PendingApprovals
            | DashboardCard::AwaitingDelivery
            | DashboardCard::MyRequests => "a005_request",
            DashboardCard::MovementsToday | DashboardCard::MovementsWeek => "a004_movement",
        }
    }

    /// Filter preset handed to the target list, if any
    pub fn target_filter(&self) -> Option<&'static str> {
        match self {
            DashboardCard::LowStock => Some(LOW_STOCK_FILTER),
            DashboardCard::PendingApprovals => Some("pendiente"),
            DashboardCard::AwaitingDelivery => Some("aprobada"),
            _ => None,
        }
    }
}

/// Preset understood by the inventory list
pub const LOW_STOCK_FILTER: &str = "bajo_minimo";

pub fn cards_for(role: Role) -> Vec<DashboardCard> {
    use DashboardCard::*;
    match role {
        Role::Admin => vec![
            PendingApprovals,
            AwaitingDelivery,
            LowStock,
            MovementsToday,
            MovementsWeek,
        ],
        Role::Supervisor => vec![PendingApprovals, LowStock, MovementsWeek],
        Role::Bodeguero => vec![AwaitingDelivery, LowStock, MovementsToday, MovementsWeek],
        Role::Solicitante => vec![MyRequests],
    }
}

/// Which snapshots the dashboard has to fetch for a role
pub fn needs_inventory(role: Role) -> bool {
    cards_for(role).contains(&DashboardCard::LowStock)
}

pub fn needs_movements(role: Role) -> bool {
    role.can(Permission::RegisterMovements) || role.can(Permission::ApproveRequests)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSummary {
    pub low_stock: Vec<Product>,
    pub pending_approvals: usize,
    pub awaiting_delivery: usize,
    pub my_requests: BTreeMap<RequestStatus, usize>,
    pub movements_today: usize,
    pub movements_week: BTreeMap<MovementKind, usize>,
}

impl DashboardSummary {
    pub fn compute(
        user_id: &str,
        products: &[Product],
        solicitudes: &[Solicitud],
        movements: &[Movement],
        today: NaiveDate,
    ) -> Self {
        let mut low_stock: Vec<Product> =
            products.iter().filter(|p| p.is_low_stock()).cloned().collect();
        // Most critical first: lowest stock / minimum ratio
        low_stock.sort_by(|a, b| {
            ratio(a)
                .partial_cmp(&ratio(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let pending_approvals = solicitudes
            .iter()
            .filter(|s| s.estado == RequestStatus::Pendiente)
            .count();
        let awaiting_delivery = solicitudes
            .iter()
            .filter(|s| s.estado == RequestStatus::Aprobada)
            .count();

        let mut my_requests = BTreeMap::new();
        for s in solicitudes.iter().filter(|s| s.solicitante_id == user_id) {
            *my_requests.entry(s.estado).or_insert(0) += 1;
        }

        let week_start = today - Duration::days(6);
        let movements_today = movements.iter().filter(|m| m.fecha == today).count();
        let mut movements_week = BTreeMap::new();
        for m in movements
            .iter()
            .filter(|m| m.fecha >= week_start && m.fecha <= today)
        {
            *movements_week.entry(m.tipo).or_insert(0) += 1;
        }

        Self {
            low_stock,
            pending_approvals,
            awaiting_delivery,
            my_requests,
            movements_today,
            movements_week,
        }
    }

    /// Main number shown on a card
    pub fn value(&self, card: DashboardCard) -> usize {
        match card {
            DashboardCard::LowStock => self.low_stock.len(),
            DashboardCard::PendingApprovals => self.pending_approvals,
            DashboardCard::AwaitingDelivery => self.awaiting_delivery,
            DashboardCard::MyRequests => self.my_requests.values().sum(),
            DashboardCard::MovementsToday => self.movements_today,
            DashboardCard::MovementsWeek => self.movements_week.values().sum(),
        }
    }
}

fn ratio(p: &Product) -> f64 {
    if p.stock_minimo <= 0.0 {
        0.0
    } else {
        p.stock / p.stock_minimo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, stock: f64, min: f64) -> Product {
        Product {
            id: id.into(),
            codigo: id.into(),
            nombre: id.into(),
            categoria: String::new(),
            unidad: "kg".into(),
            stock,
            stock_minimo: min,
            precio: 0.0,
            activo: true,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
    }

    fn movement(tipo: MovementKind, fecha: NaiveDate) -> Movement {
        Movement {
            id: String::new(),
            tipo,
            producto_id: "u".into(),
            producto_nombre: "Urea".into(),
            cantidad: 1.0,
            fecha,
            usuario: String::new(),
            referencia: String::new(),
            nota: String::new(),
        }
    }

    fn solicitud(owner: &str, estado: RequestStatus) -> Solicitud {
        serde_json::from_value(serde_json::json!({
            "id": "x", "numero": "SOL-x", "solicitanteId": owner, "fincaId": "f",
            "estado": estado, "creada": "2026-07-01"
        }))
        .unwrap()
    }

    #[test]
    fn test_summary_counts() {
        let products = vec![product("a", 9.0, 10.0), product("b", 1.0, 10.0), product("c", 50.0, 10.0)];
        let solicitudes = vec![
            solicitud("ana", RequestStatus::Pendiente),
            solicitud("ana", RequestStatus::Aprobada),
            solicitud("luis", RequestStatus::Pendiente),
        ];
        let movements = vec![
            movement(MovementKind::Ingreso, day(20)),
            movement(MovementKind::Ingreso, day(14)),
            movement(MovementKind::Ajuste, day(13)),
            movement(MovementKind::Devolucion, day(12)),
        ];
        let s = DashboardSummary::compute("ana", &products, &solicitudes, &movements, day(20));

        let low: Vec<&str> = s.low_stock.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(low, vec!["b", "a"]);
        assert_eq!(s.pending_approvals, 2);
        assert_eq!(s.awaiting_delivery, 1);
        assert_eq!(s.value(DashboardCard::MyRequests), 2);
        assert_eq!(s.movements_today, 1);
        // 14..=20 is the 7-day window
        assert_eq!(s.movements_week[&MovementKind::Ingreso], 2);
        assert_eq!(s.value(DashboardCard::MovementsWeek), 2);
    }

    #[test]
    fn test_cards_per_role() {
        assert_eq!(cards_for(Role::Solicitante), vec![DashboardCard::MyRequests]);
        assert!(cards_for(Role::Bodeguero).contains(&DashboardCard::AwaitingDelivery));
        assert!(!cards_for(Role::Supervisor).contains(&DashboardCard::AwaitingDelivery));
        assert!(!needs_inventory(Role::Solicitante));
        assert!(needs_movements(Role::Supervisor));
        assert!(!needs_movements(Role::Solicitante));
        assert_eq!(DashboardCard::LowStock.target_tab(), "a001_product");
    }

    #[test]
    fn test_cards_carry_list_presets() {
        assert_eq!(DashboardCard::PendingApprovals.target_filter(), Some("pendiente"));
        assert_eq!(DashboardCard::LowStock.target_filter(), Some(LOW_STOCK_FILTER));
        assert_eq!(DashboardCard::MovementsToday.target_filter(), None);
        assert_eq!(
            RequestStatus::from_str_opt(DashboardCard::AwaitingDelivery.target_filter().unwrap()),
            Some(RequestStatus::Aprobada)
        );
    }
}
