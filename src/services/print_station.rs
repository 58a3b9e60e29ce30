// src/services/print_station.rs
//
// Fila de impressão: pedidos sem `printed_at`, do mais antigo para o mais novo,
// impressos um de cada vez com uma pausa fixa entre eles.

use std::{collections::VecDeque, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{common::error::AppError, db::OrderRepository, models::orders::Order};

// Quantos pedidos cada rodada puxa do banco
pub const BATCH_SIZE: i64 = 50;

#[async_trait]
pub trait TicketPrinter: Send + Sync + 'static {
    async fn print(&self, order: &Order) -> Result<(), AppError>;
}

#[async_trait]
pub trait PrintQueue: Send + Sync + 'static {
    async fn pending(&self, limit: i64) -> Result<Vec<Order>, AppError>;
    async fn mark_printed(&self, order_id: Uuid, printed_at: DateTime<Utc>) -> Result<(), AppError>;
}

#[async_trait]
impl PrintQueue for OrderRepository {
    async fn pending(&self, limit: i64) -> Result<Vec<Order>, AppError> {
        self.list_unprinted(None, limit).await
    }

    async fn mark_printed(&self, order_id: Uuid, printed_at: DateTime<Utc>) -> Result<(), AppError> {
        OrderRepository::mark_printed(self, order_id, printed_at).await
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    pub printed: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct PrintStation {
    printer: Arc<dyn TicketPrinter>,
    queue: Arc<dyn PrintQueue>,
    delay: Duration,
}

impl PrintStation {
    pub fn new(printer: Arc<dyn TicketPrinter>, queue: Arc<dyn PrintQueue>, delay: Duration) -> Self {
        Self { printer, queue, delay }
    }

    /// Esvazia a fila em ordem. Um pedido que falha (na impressão ou na marcação)
    /// é registrado no log e a fila segue; sem `printed_at`, ele volta na próxima rodada.
    pub async fn drain(&self, orders: Vec<Order>) -> DrainReport {
        let mut queue: VecDeque<Order> = orders.into();
        let mut report = DrainReport::default();

        while let Some(order) = queue.pop_front() {
            match self.print_one(&order).await {
                Ok(()) => {
                    tracing::info!("🖨️ Pedido {} (comanda {}) impresso", order.id, order.comanda_id);
                    report.printed += 1;
                }
                Err(e) => {
                    tracing::error!("Falha ao imprimir o pedido {}: {}", order.id, e);
                    report.failed += 1;
                }
            }

            if !queue.is_empty() {
                tokio::time::sleep(self.delay).await;
            }
        }

        report
    }

    /// Uma rodada: busca a fila atual e esvazia.
    pub async fn run_once(&self) -> Result<DrainReport, AppError> {
        let orders = self.queue.pending(BATCH_SIZE).await?;
        if orders.is_empty() {
            return Ok(DrainReport::default());
        }

        tracing::info!("🖨️ {} pedido(s) na fila de impressão", orders.len());
        Ok(self.drain(orders).await)
    }

    /// Loop de consulta periódica. Roda até o processo terminar.
    pub fn spawn(self, interval: Duration) {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if let Err(e) = self.run_once().await {
                    tracing::error!("Erro na estação de impressão: {}", e);
                }
            }
        });
    }

    async fn print_one(&self, order: &Order) -> Result<(), AppError> {
        self.printer.print(order).await?;
        self.queue.mark_printed(order.id, Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::orders::OrderStatus;
    use rust_decimal::Decimal;
    use sqlx::types::Json;
    use std::sync::Mutex;

    fn order(comanda_id: i32) -> Order {
        Order {
            id: Uuid::new_v4(),
            chefe_id: Uuid::new_v4(),
            comanda_id,
            customer_id: None,
            waiter_id: None,
            table_id: None,
            status: OrderStatus::Pending,
            items: Json(Vec::new()),
            total: Decimal::ZERO,
            payment_method: None,
            created_at: Utc::now(),
            printed_at: None,
        }
    }

    // Impressora que registra a ordem e falha para as comandas configuradas
    #[derive(Default)]
    struct FakePrinter {
        printed: Mutex<Vec<i32>>,
        fail_on: Vec<i32>,
    }

    #[async_trait]
    impl TicketPrinter for FakePrinter {
        async fn print(&self, order: &Order) -> Result<(), AppError> {
            if self.fail_on.contains(&order.comanda_id) {
                return Err(AppError::InternalServerError(anyhow::anyhow!("sem papel")));
            }
            self.printed.lock().unwrap().push(order.comanda_id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeQueue {
        orders: Mutex<Vec<Order>>,
        marked: Mutex<Vec<Uuid>>,
        fail_mark: bool,
    }

    #[async_trait]
    impl PrintQueue for FakeQueue {
        async fn pending(&self, limit: i64) -> Result<Vec<Order>, AppError> {
            let marked = self.marked.lock().unwrap().clone();
            Ok(self.orders
                .lock()
                .unwrap()
                .iter()
                .filter(|o| !marked.contains(&o.id))
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn mark_printed(&self, order_id: Uuid, _printed_at: DateTime<Utc>) -> Result<(), AppError> {
            if self.fail_mark {
                return Err(AppError::ResourceNotFound("Pedido".into()));
            }
            self.marked.lock().unwrap().push(order_id);
            Ok(())
        }
    }

    fn station(printer: Arc<FakePrinter>, queue: Arc<FakeQueue>) -> PrintStation {
        PrintStation::new(printer, queue, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn prints_in_arrival_order() {
        let printer = Arc::new(FakePrinter::default());
        let queue = Arc::new(FakeQueue::default());
        *queue.orders.lock().unwrap() = vec![order(1), order(2), order(3)];

        let report = station(printer.clone(), queue.clone()).run_once().await.unwrap();

        assert_eq!(report, DrainReport { printed: 3, failed: 0 });
        assert_eq!(*printer.printed.lock().unwrap(), vec![1, 2, 3]);
        assert_eq!(queue.marked.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn failed_print_does_not_block_the_queue() {
        let printer = Arc::new(FakePrinter { fail_on: vec![2], ..Default::default() });
        let queue = Arc::new(FakeQueue::default());
        *queue.orders.lock().unwrap() = vec![order(1), order(2), order(3)];

        let report = station(printer.clone(), queue.clone()).run_once().await.unwrap();

        assert_eq!(report, DrainReport { printed: 2, failed: 1 });
        assert_eq!(*printer.printed.lock().unwrap(), vec![1, 3]);

        // O pedido que falhou continua na fila
        let left = queue.pending(BATCH_SIZE).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].comanda_id, 2);
    }

    #[tokio::test]
    async fn failed_mark_is_counted_and_queue_advances() {
        let printer = Arc::new(FakePrinter::default());
        let queue = Arc::new(FakeQueue { fail_mark: true, ..Default::default() });

        let report = station(printer.clone(), queue).drain(vec![order(1), order(2)]).await;

        assert_eq!(report, DrainReport { printed: 0, failed: 2 });
        assert_eq!(*printer.printed.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn empty_queue_is_a_no_op() {
        let printer = Arc::new(FakePrinter::default());
        let queue = Arc::new(FakeQueue::default());

        let report = station(printer, queue).run_once().await.unwrap();
        assert_eq!(report, DrainReport::default());
    }
}
