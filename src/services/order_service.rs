// src/services/order_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, CustomerRepository, OrderFilter, OrderRepository, TableRepository},
    models::{
        catalog::Product,
        orders::{ComandaSummary, Order, OrderItem, OrderStatus},
        tables::TableStatus,
    },
    services::order_items,
};

// Linha pedida pelo garçom: produto + quantidade
#[derive(Debug, Clone, Copy)]
pub struct RequestedLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub comanda_id: i32,
    pub table_id: Option<Uuid>,
    pub lines: Vec<RequestedLine>,
    pub promotion_ids: Vec<Uuid>,
}

#[derive(Clone)]
pub struct OrderService {
    pool: PgPool,
    order_repo: OrderRepository,
    catalog_repo: CatalogRepository,
    customer_repo: CustomerRepository,
    table_repo: TableRepository,
}

impl OrderService {
    pub fn new(
        pool: PgPool,
        order_repo: OrderRepository,
        catalog_repo: CatalogRepository,
        customer_repo: CustomerRepository,
        table_repo: TableRepository,
    ) -> Self {
        Self { pool, order_repo, catalog_repo, customer_repo, table_repo }
    }

    // --- CRIAÇÃO ---

    /// Garçom envia o pedido: preços e departamentos são copiados do cardápio,
    /// o cliente é achado pela pulseira e a mesa passa a Ocupada.
    pub async fn create_order(
        &self,
        chefe_id: Uuid,
        waiter_id: Uuid,
        new_order: NewOrder,
    ) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut items = self.snapshot_lines(&mut tx, chefe_id, &new_order.lines).await?;

        for promotion_id in &new_order.promotion_ids {
            let promotion = self.catalog_repo
                .find_promotion(&mut *tx, chefe_id, *promotion_id)
                .await?
                .ok_or_else(|| AppError::ResourceNotFound(format!("Promoção {}", promotion_id)))?;
            order_items::add_promotion(&mut items, &promotion)?;
        }

        if items.is_empty() {
            return Err(AppError::EmptyOrder);
        }

        let customer = self.customer_repo
            .find_by_wristband(&mut *tx, chefe_id, new_order.comanda_id)
            .await?;

        let total = order_items::total_with_service_fee(&items);

        let order = self.order_repo
            .create_order(
                &mut *tx,
                chefe_id,
                new_order.comanda_id,
                customer.map(|c| c.id),
                Some(waiter_id),
                new_order.table_id,
                &items,
                total,
            )
            .await?;

        if let Some(table_id) = new_order.table_id {
            self.table_repo
                .set_status(&mut *tx, chefe_id, table_id, TableStatus::Occupied, Some(order.id))
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "🧾 Pedido {} criado na comanda {} ({} itens, total {})",
            order.id, order.comanda_id, items.len(), order.total
        );
        Ok(order)
    }

    /// Acrescenta produtos a um pedido ainda não pago.
    pub async fn add_products(
        &self,
        chefe_id: Uuid,
        order_id: Uuid,
        lines: &[RequestedLine],
    ) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self.order_repo.find(&mut *tx, chefe_id, order_id).await?;
        ensure_unpaid(&order)?;

        let mut items = order.items.0;
        items.extend(self.snapshot_lines(&mut tx, chefe_id, lines).await?);

        let total = order_items::total_with_service_fee(&items);
        let updated = self.order_repo
            .update_items(&mut *tx, chefe_id, order_id, &items, total)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    // --- CANCELAMENTO (Caixa) ---

    /// Lê, altera e regrava o array inteiro. Dois cancelamentos simultâneos no
    /// mesmo pedido podem se sobrescrever: vale a última escrita.
    pub async fn cancel_item(
        &self,
        chefe_id: Uuid,
        order_id: Uuid,
        index: usize,
        quantity: i32,
    ) -> Result<Order, AppError> {
        let order = self.order_repo.find(&self.pool, chefe_id, order_id).await?;
        ensure_unpaid(&order)?;

        let mut items = order.items.0;
        order_items::cancel_item(&mut items, index, quantity)?;

        let total = order_items::total_with_service_fee(&items);
        let updated = self.order_repo
            .update_items(&self.pool, chefe_id, order_id, &items, total)
            .await?;

        tracing::info!(
            "❌ Pedido {}: {} unidade(s) da linha {} canceladas, novo total {}",
            order_id, quantity, index, updated.total
        );
        Ok(updated)
    }

    // --- PROMOÇÕES ---

    pub async fn add_promotion(&self, chefe_id: Uuid, order_id: Uuid, promotion_id: Uuid) -> Result<Order, AppError> {
        let order = self.order_repo.find(&self.pool, chefe_id, order_id).await?;
        ensure_unpaid(&order)?;

        let promotion = self.catalog_repo
            .find_promotion(&self.pool, chefe_id, promotion_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Promoção".into()))?;

        let mut items = order.items.0;
        order_items::add_promotion(&mut items, &promotion)?;

        let total = order_items::total_with_service_fee(&items);
        self.order_repo.update_items(&self.pool, chefe_id, order_id, &items, total).await
    }

    pub async fn remove_promotion(&self, chefe_id: Uuid, order_id: Uuid, promotion_id: Uuid) -> Result<Order, AppError> {
        let order = self.order_repo.find(&self.pool, chefe_id, order_id).await?;
        ensure_unpaid(&order)?;

        let promotion = self.catalog_repo
            .find_promotion(&self.pool, chefe_id, promotion_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Promoção".into()))?;

        let mut items = order.items.0;
        order_items::remove_promotion(&mut items, promotion.id, &promotion.products)?;

        let total = order_items::total_with_service_fee(&items);
        self.order_repo.update_items(&self.pool, chefe_id, order_id, &items, total).await
    }

    // --- STATUS ---

    pub async fn advance_status(&self, chefe_id: Uuid, order_id: Uuid, status: OrderStatus) -> Result<Order, AppError> {
        let order = self.order_repo.find(&self.pool, chefe_id, order_id).await?;
        order_items::ensure_forward(order.status, status)?;

        self.order_repo.update_status(&self.pool, chefe_id, order_id, status).await
    }

    /// Fechamento da conta no caixa: grava a forma de pagamento, finaliza o
    /// pedido e libera a mesa.
    pub async fn close_order(&self, chefe_id: Uuid, order_id: Uuid, payment_method: &str) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self.order_repo.find(&mut *tx, chefe_id, order_id).await?;
        ensure_unpaid(&order)?;

        let total = order_items::total_with_service_fee(&order.items);
        let closed = self.order_repo
            .close(&mut *tx, chefe_id, order_id, payment_method, total)
            .await?;

        if let Some(table_id) = closed.table_id {
            self.table_repo
                .set_status(&mut *tx, chefe_id, table_id, TableStatus::Available, None)
                .await?;
        }

        tx.commit().await?;

        tracing::info!("💰 Pedido {} pago via {} (total {})", order_id, payment_method, closed.total);
        Ok(closed)
    }

    // --- CONSULTAS ---

    pub async fn get(&self, chefe_id: Uuid, order_id: Uuid) -> Result<Order, AppError> {
        self.order_repo.find(&self.pool, chefe_id, order_id).await
    }

    pub async fn list(&self, chefe_id: Uuid, filter: &OrderFilter) -> Result<Vec<Order>, AppError> {
        self.order_repo.list(chefe_id, filter).await
    }

    pub async fn list_open(&self, chefe_id: Uuid) -> Result<Vec<Order>, AppError> {
        self.order_repo.list_open(chefe_id).await
    }

    /// A conta corrente da pulseira: pedidos ainda não pagos.
    pub async fn comanda(&self, chefe_id: Uuid, comanda_id: i32) -> Result<ComandaSummary, AppError> {
        let filter = OrderFilter { comanda_id: Some(comanda_id), ..Default::default() };
        let orders = self.order_repo.list(chefe_id, &filter).await?;
        Ok(comanda_summary(comanda_id, orders))
    }

    // Copia nome, preço e departamento do cardápio para as linhas
    async fn snapshot_lines(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        chefe_id: Uuid,
        lines: &[RequestedLine],
    ) -> Result<Vec<OrderItem>, AppError> {
        if lines.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = lines.iter().map(|l| l.product_id).collect();
        let products = self.catalog_repo.find_products(&mut **tx, chefe_id, &ids).await?;

        lines
            .iter()
            .map(|line| {
                let product: &Product = products
                    .iter()
                    .find(|p| p.id == line.product_id)
                    .ok_or_else(|| AppError::ResourceNotFound(format!("Produto {}", line.product_id)))?;
                Ok(order_items::product_line(product, line.quantity))
            })
            .collect()
    }
}

fn ensure_unpaid(order: &Order) -> Result<(), AppError> {
    if order.payment_method.is_some() {
        return Err(AppError::OrderAlreadyPaid);
    }
    Ok(())
}

pub fn comanda_summary(comanda_id: i32, orders: Vec<Order>) -> ComandaSummary {
    let open: Vec<Order> = orders
        .into_iter()
        .filter(|o| o.payment_method.is_none())
        .collect();
    let total: Decimal = open.iter().map(|o| o.total).sum();

    ComandaSummary { comanda_id, orders: open, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::types::Json;

    fn order(total: &str, payment_method: Option<&str>) -> Order {
        Order {
            id: Uuid::new_v4(),
            chefe_id: Uuid::new_v4(),
            comanda_id: 42,
            customer_id: None,
            waiter_id: None,
            table_id: None,
            status: OrderStatus::Pending,
            items: Json(Vec::new()),
            total: Decimal::from_str_exact(total).unwrap(),
            payment_method: payment_method.map(str::to_string),
            created_at: Utc::now(),
            printed_at: None,
        }
    }

    #[test]
    fn comanda_sums_only_unpaid_orders() {
        let orders = vec![order("11.00", None), order("22.00", Some("Pix")), order("33.00", None)];
        let summary = comanda_summary(42, orders);

        assert_eq!(summary.orders.len(), 2);
        assert_eq!(summary.total, Decimal::from_str_exact("44.00").unwrap());
    }

    #[test]
    fn paid_order_cannot_be_changed() {
        assert!(ensure_unpaid(&order("10.00", None)).is_ok());
        assert!(matches!(ensure_unpaid(&order("10.00", Some("Dinheiro"))), Err(AppError::OrderAlreadyPaid)));
    }
}
