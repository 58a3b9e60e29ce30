// src/services/order_items.rs
//
// Regras puras sobre a lista de itens de um pedido: preço, taxa de serviço,
// cancelamento (com divisão de linha) e aplicação de promoções.
// Nada aqui toca o banco; o OrderService carrega, aplica e regrava o array inteiro.

use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        catalog::{Product, ProductSnapshot, Promotion},
        orders::{ItemStatus, OrderItem, OrderStatus},
    },
};

/// Taxa de serviço fixa de 10%, embutida no total do pedido.
pub fn service_fee_multiplier() -> Decimal {
    Decimal::new(110, 2)
}

pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// =========================================================================
//  PREÇO
// =========================================================================

/// Soma de preço × quantidade das linhas não canceladas.
pub fn subtotal(items: &[OrderItem]) -> Decimal {
    items
        .iter()
        .filter(|item| item.is_active())
        .map(OrderItem::line_total)
        .sum()
}

/// Subtotal + 10%, arredondado em centavos.
pub fn total_with_service_fee(items: &[OrderItem]) -> Decimal {
    round_cents(subtotal(items) * service_fee_multiplier())
}

/// Inverso da taxa: recupera o subtotal a partir de um total já gravado.
pub fn implied_subtotal(total: Decimal) -> Decimal {
    total / service_fee_multiplier()
}

/// price × (1 − pct/100)
pub fn apply_discount(price: Decimal, discount_percentage: Decimal) -> Decimal {
    price * (Decimal::ONE_HUNDRED - discount_percentage) / Decimal::ONE_HUNDRED
}

// =========================================================================
//  LINHAS
// =========================================================================

pub fn product_line(product: &Product, quantity: i32) -> OrderItem {
    OrderItem {
        product_id: product.id,
        name: product.name.clone(),
        price: product.price,
        quantity,
        department: product.department,
        status: ItemStatus::Active,
        promotion_id: None,
    }
}

/// Uma linha por produto do combo, já com o desconto da promoção.
pub fn promotion_lines(promotion_id: Uuid, products: &[ProductSnapshot], discount_percentage: Decimal) -> Vec<OrderItem> {
    products
        .iter()
        .map(|snapshot| OrderItem {
            product_id: snapshot.product_id,
            name: snapshot.name.clone(),
            price: apply_discount(snapshot.price, discount_percentage),
            quantity: 1,
            department: snapshot.department,
            status: ItemStatus::Active,
            promotion_id: Some(promotion_id),
        })
        .collect()
}

// =========================================================================
//  CANCELAMENTO
// =========================================================================

/// Cancela `quantity` unidades da linha `index`.
///
/// Quantidade cheia: a linha inteira vira Cancelled.
/// Parcial: a linha original perde N unidades e uma cópia com N unidades
/// e status Cancelled é adicionada ao fim.
///
/// Em caso de erro a lista não é alterada.
pub fn cancel_item(items: &mut Vec<OrderItem>, index: usize, quantity: i32) -> Result<(), AppError> {
    let line = items
        .get(index)
        .filter(|line| line.is_active())
        .ok_or(AppError::ItemNotFound(index))?;

    if quantity < 1 || quantity > line.quantity {
        return Err(AppError::InvalidCancelQuantity {
            requested: quantity,
            available: line.quantity,
        });
    }

    if quantity == line.quantity {
        items[index].status = ItemStatus::Cancelled;
        return Ok(());
    }

    let mut cancelled = line.clone();
    cancelled.quantity = quantity;
    cancelled.status = ItemStatus::Cancelled;

    items[index].quantity -= quantity;
    items.push(cancelled);

    Ok(())
}

// =========================================================================
//  PROMOÇÕES
// =========================================================================

pub fn add_promotion(items: &mut Vec<OrderItem>, promotion: &Promotion) -> Result<(), AppError> {
    if !promotion.is_active {
        return Err(AppError::PromotionInactive);
    }

    items.extend(promotion_lines(
        promotion.id,
        &promotion.products,
        promotion.discount_percentage,
    ));

    Ok(())
}

/// Retira uma aplicação do combo: para cada produto do combo, tira uma unidade
/// da linha ativa com o mesmo par (produto, promoção). Linhas zeradas somem.
pub fn remove_promotion(
    items: &mut Vec<OrderItem>,
    promotion_id: Uuid,
    products: &[ProductSnapshot],
) -> Result<(), AppError> {
    let matches = |item: &OrderItem, product_id: Uuid| {
        item.is_active() && item.product_id == product_id && item.promotion_id == Some(promotion_id)
    };

    // Confere tudo antes de mexer, para não deixar o combo pela metade
    let mut available: Vec<(Uuid, i32)> = Vec::new();
    for snapshot in products {
        let units: i32 = items
            .iter()
            .filter(|item| matches(item, snapshot.product_id))
            .map(|item| item.quantity)
            .sum();
        available.push((snapshot.product_id, units));
    }
    for snapshot in products {
        let needed = products
            .iter()
            .filter(|p| p.product_id == snapshot.product_id)
            .count() as i32;
        let has = available
            .iter()
            .find(|(id, _)| *id == snapshot.product_id)
            .map(|(_, units)| *units)
            .unwrap_or(0);
        if has < needed {
            return Err(AppError::PromotionNotOnOrder);
        }
    }

    for snapshot in products {
        if let Some(position) = items.iter().position(|item| matches(item, snapshot.product_id)) {
            items[position].quantity -= 1;
            if items[position].quantity == 0 {
                items.remove(position);
            }
        }
    }

    Ok(())
}

// =========================================================================
//  STATUS
// =========================================================================

/// O status só anda para frente.
pub fn ensure_forward(from: OrderStatus, to: OrderStatus) -> Result<(), AppError> {
    if to <= from {
        return Err(AppError::InvalidStatusTransition {
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::Department;
    use chrono::Utc;
    use sqlx::types::Json;

    fn money(value: &str) -> Decimal {
        Decimal::from_str_exact(value).unwrap()
    }

    fn line(price: &str, quantity: i32) -> OrderItem {
        OrderItem {
            product_id: Uuid::new_v4(),
            name: "Item".to_string(),
            price: money(price),
            quantity,
            department: Department::Kitchen,
            status: ItemStatus::Active,
            promotion_id: None,
        }
    }

    fn active_units(items: &[OrderItem]) -> i32 {
        items.iter().filter(|i| i.is_active()).map(|i| i.quantity).sum()
    }

    fn cancelled_units(items: &[OrderItem]) -> i32 {
        items.iter().filter(|i| !i.is_active()).map(|i| i.quantity).sum()
    }

    fn snapshot(name: &str, price: &str) -> ProductSnapshot {
        ProductSnapshot {
            product_id: Uuid::new_v4(),
            name: name.to_string(),
            price: money(price),
            department: Department::Bar,
        }
    }

    fn promotion(products: Vec<ProductSnapshot>, discount: &str, active: bool) -> Promotion {
        Promotion {
            id: Uuid::new_v4(),
            chefe_id: Uuid::new_v4(),
            name: "Combo".to_string(),
            products: Json(products),
            original_price: Decimal::ZERO,
            discount_percentage: money(discount),
            final_price: Decimal::ZERO,
            is_active: active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn full_cancel_flips_line_in_place() {
        let mut items = vec![line("10.00", 3), line("5.00", 1)];
        cancel_item(&mut items, 0, 3).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].status, ItemStatus::Cancelled);
        assert_eq!(items[0].quantity, 3);
    }

    #[test]
    fn partial_cancel_splits_line() {
        let mut items = vec![line("10.00", 5)];
        cancel_item(&mut items, 0, 2).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].quantity, 3);
        assert!(items[0].is_active());
        assert_eq!(items[1].quantity, 2);
        assert_eq!(items[1].status, ItemStatus::Cancelled);
        assert_eq!(items[1].product_id, items[0].product_id);
    }

    #[test]
    fn cancel_conserves_units_for_every_quantity() {
        for n in 1..=4 {
            let mut items = vec![line("7.50", 4), line("3.00", 2)];
            let before = active_units(&items);
            cancel_item(&mut items, 0, n).unwrap();

            assert_eq!(active_units(&items), before - n);
            assert_eq!(cancelled_units(&items), n);
        }
    }

    #[test]
    fn invalid_quantities_leave_items_untouched() {
        let original = vec![line("10.00", 2)];

        for n in [0, -1, 3] {
            let mut items = original.clone();
            let err = cancel_item(&mut items, 0, n).unwrap_err();
            assert!(matches!(err, AppError::InvalidCancelQuantity { .. }));
            assert_eq!(items, original);
        }
    }

    #[test]
    fn cancelled_or_missing_line_is_rejected() {
        let mut items = vec![line("10.00", 1)];
        cancel_item(&mut items, 0, 1).unwrap();

        assert!(matches!(cancel_item(&mut items, 0, 1), Err(AppError::ItemNotFound(0))));
        assert!(matches!(cancel_item(&mut items, 9, 1), Err(AppError::ItemNotFound(9))));
    }

    #[test]
    fn total_after_cancellations_is_subtotal_plus_fee() {
        let mut items = vec![line("12.90", 3), line("8.45", 2), line("31.00", 1)];
        cancel_item(&mut items, 0, 1).unwrap();
        cancel_item(&mut items, 2, 1).unwrap();
        cancel_item(&mut items, 1, 1).unwrap();

        // 12.90 * 2 + 8.45 * 1 = 34.25 -> 37.675 -> 37.68
        assert_eq!(subtotal(&items), money("34.25"));
        assert_eq!(total_with_service_fee(&items), money("37.68"));
    }

    #[test]
    fn implied_subtotal_inverts_fee() {
        assert_eq!(implied_subtotal(money("110.00")), money("100"));
        assert_eq!(implied_subtotal(money("55")), money("50"));
    }

    #[test]
    fn promotion_appends_discounted_lines() {
        let promo = promotion(vec![snapshot("Chopp", "12.00"), snapshot("Porção", "38.00")], "20", true);
        let mut items = vec![line("5.00", 1)];
        add_promotion(&mut items, &promo).unwrap();

        let added: Vec<&OrderItem> = items.iter().filter(|i| i.promotion_id == Some(promo.id)).collect();
        assert_eq!(added.len(), 2);

        let summed: Decimal = added.iter().map(|i| i.price).sum();
        assert_eq!(summed, money("0.8") * money("50.00"));
    }

    #[test]
    fn inactive_promotion_is_rejected() {
        let promo = promotion(vec![snapshot("Chopp", "12.00")], "10", false);
        let mut items = Vec::new();

        assert!(matches!(add_promotion(&mut items, &promo), Err(AppError::PromotionInactive)));
        assert!(items.is_empty());
    }

    #[test]
    fn removing_promotion_takes_one_unit_per_product() {
        let promo = promotion(vec![snapshot("Chopp", "12.00"), snapshot("Porção", "38.00")], "20", true);
        let mut items = Vec::new();
        add_promotion(&mut items, &promo).unwrap();
        add_promotion(&mut items, &promo).unwrap();
        assert_eq!(items.len(), 4);

        remove_promotion(&mut items, promo.id, &promo.products).unwrap();
        assert_eq!(items.len(), 2);

        remove_promotion(&mut items, promo.id, &promo.products).unwrap();
        assert!(items.is_empty());

        assert!(matches!(
            remove_promotion(&mut items, promo.id, &promo.products),
            Err(AppError::PromotionNotOnOrder)
        ));
    }

    #[test]
    fn incomplete_bundle_is_not_removed() {
        let promo = promotion(vec![snapshot("Chopp", "12.00"), snapshot("Porção", "38.00")], "20", true);
        let mut items = Vec::new();
        add_promotion(&mut items, &promo).unwrap();

        // Chopp do combo cancelado no caixa: o combo não está mais inteiro
        cancel_item(&mut items, 0, 1).unwrap();
        let before = items.clone();

        assert!(matches!(
            remove_promotion(&mut items, promo.id, &promo.products),
            Err(AppError::PromotionNotOnOrder)
        ));
        assert_eq!(items, before);
    }

    #[test]
    fn cancelled_promotion_lines_are_left_alone() {
        let promo = promotion(vec![snapshot("Chopp", "12.00"), snapshot("Porção", "38.00")], "20", true);
        let mut items = Vec::new();
        add_promotion(&mut items, &promo).unwrap();
        add_promotion(&mut items, &promo).unwrap();
        cancel_item(&mut items, 0, 1).unwrap();

        remove_promotion(&mut items, promo.id, &promo.products).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].status, ItemStatus::Cancelled);
        assert_eq!(items[0].quantity, 1);
        assert_eq!(items[0].product_id, promo.products[0].product_id);
        assert!(items[1].is_active());
        assert_eq!(items[1].product_id, promo.products[1].product_id);
        assert_eq!(cancelled_units(&items), 1);
    }

    #[test]
    fn status_only_moves_forward() {
        assert!(ensure_forward(OrderStatus::Pending, OrderStatus::InProgress).is_ok());
        assert!(ensure_forward(OrderStatus::Pending, OrderStatus::Completed).is_ok());
        assert!(ensure_forward(OrderStatus::Completed, OrderStatus::Pending).is_err());
        assert!(ensure_forward(OrderStatus::InProgress, OrderStatus::InProgress).is_err());
    }
}
