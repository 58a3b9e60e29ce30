// src/services/station_service.rs
//
// Roteamento dos pedidos para as estações pelo departamento de cada linha.

use crate::models::{
    catalog::Department,
    orders::{Order, OrderStatus, StationOrder},
};

/// Linhas de departamento General aparecem tanto na cozinha quanto no bar.
pub fn routes_to(line: Department, station: Department) -> bool {
    line == station || (line == Department::General && station != Department::General)
}

/// Pedidos em aberto, só com as linhas ativas da estação. Pedidos que ficam
/// vazios saem da lista. Mantém a ordem de chegada.
pub fn station_view(orders: &[Order], station: Department) -> Vec<StationOrder> {
    orders
        .iter()
        .filter(|order| order.status != OrderStatus::Completed)
        .filter_map(|order| {
            let items: Vec<_> = order
                .items
                .iter()
                .filter(|item| item.is_active() && routes_to(item.department, station))
                .cloned()
                .collect();

            if items.is_empty() {
                return None;
            }

            Some(StationOrder {
                order_id: order.id,
                comanda_id: order.comanda_id,
                table_id: order.table_id,
                status: order.status,
                created_at: order.created_at,
                items,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::orders::{ItemStatus, OrderItem};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn item(department: Department, status: ItemStatus) -> OrderItem {
        OrderItem {
            product_id: Uuid::new_v4(),
            name: format!("{:?}", department),
            price: Decimal::TEN,
            quantity: 1,
            department,
            status,
            promotion_id: None,
        }
    }

    fn order(status: OrderStatus, items: Vec<OrderItem>) -> Order {
        Order {
            id: Uuid::new_v4(),
            chefe_id: Uuid::new_v4(),
            comanda_id: 7,
            customer_id: None,
            waiter_id: None,
            table_id: None,
            status,
            items: Json(items),
            total: Decimal::ZERO,
            payment_method: None,
            created_at: Utc::now(),
            printed_at: None,
        }
    }

    #[test]
    fn kitchen_sees_kitchen_and_general_lines() {
        let orders = vec![order(
            OrderStatus::Pending,
            vec![
                item(Department::Kitchen, ItemStatus::Active),
                item(Department::Bar, ItemStatus::Active),
                item(Department::General, ItemStatus::Active),
            ],
        )];

        let view = station_view(&orders, Department::Kitchen);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].items.len(), 2);
        assert!(view[0].items.iter().all(|i| i.department != Department::Bar));
    }

    #[test]
    fn bar_skips_orders_without_bar_lines() {
        let orders = vec![
            order(OrderStatus::Pending, vec![item(Department::Kitchen, ItemStatus::Active)]),
            order(OrderStatus::InProgress, vec![item(Department::Bar, ItemStatus::Active)]),
        ];

        let view = station_view(&orders, Department::Bar);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].order_id, orders[1].id);
    }

    #[test]
    fn cancelled_lines_and_completed_orders_are_hidden() {
        let orders = vec![
            order(OrderStatus::Pending, vec![item(Department::Bar, ItemStatus::Cancelled)]),
            order(OrderStatus::Completed, vec![item(Department::Bar, ItemStatus::Active)]),
        ];

        assert!(station_view(&orders, Department::Bar).is_empty());
    }
}
