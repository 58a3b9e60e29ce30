// src/services/ticket_service.rs

use std::path::PathBuf;

use async_trait::async_trait;
use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;

use crate::{
    common::error::AppError,
    models::{
        catalog::Department,
        orders::{Order, OrderItem},
    },
    services::print_station::TicketPrinter,
};

/// Linhas ativas na ordem em que aparecem no ticket: cozinha, bar, geral.
pub fn ticket_lines(order: &Order) -> Vec<&OrderItem> {
    let mut lines: Vec<&OrderItem> = order.items.iter().filter(|i| i.is_active()).collect();
    lines.sort_by_key(|item| match item.department {
        Department::Kitchen => 0,
        Department::Bar => 1,
        Department::General => 2,
    });
    lines
}

fn department_label(department: Department) -> &'static str {
    match department {
        Department::Kitchen => "COZINHA",
        Department::Bar => "BAR",
        Department::General => "GERAL",
    }
}

fn pdf_error(e: impl std::fmt::Display) -> AppError {
    AppError::InternalServerError(anyhow::Error::msg(e.to_string()))
}

#[derive(Clone)]
pub struct TicketService {
    fonts_dir: PathBuf,
}

impl TicketService {
    pub fn new(fonts_dir: PathBuf) -> Self {
        Self { fonts_dir }
    }

    /// Gera o PDF do ticket em memória. Bloqueante: chamar fora do runtime.
    pub fn render(&self, order: &Order) -> Result<Vec<u8>, AppError> {
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, "Roboto", None)
            .map_err(|_| AppError::FontNotFound(self.fonts_dir.display().to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Comanda {}", order.comanda_id));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(5);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new(format!("COMANDA #{}", order.comanda_id))
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        doc.push(elements::Paragraph::new(format!(
            "Pedido: {}",
            order.created_at.format("%d/%m/%Y %H:%M")
        )));
        doc.push(elements::Break::new(1));

        // --- ITENS ---
        let mut table = elements::TableLayout::new(vec![1, 5, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(false, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Qtd").styled(style_bold))
            .element(elements::Paragraph::new("Item").styled(style_bold))
            .element(elements::Paragraph::new("Setor").styled(style_bold))
            .push()
            .map_err(pdf_error)?;

        for item in ticket_lines(order) {
            table
                .row()
                .element(elements::Paragraph::new(item.quantity.to_string()))
                .element(elements::Paragraph::new(item.name.as_str()))
                .element(elements::Paragraph::new(department_label(item.department)))
                .push()
                .map_err(pdf_error)?;
        }

        doc.push(table);
        doc.push(elements::Break::new(1));

        // --- QR CODE (id do pedido) ---
        let code = QrCode::new(order.id.to_string().as_bytes()).map_err(pdf_error)?;
        let image_buffer = code.render::<Luma<u8>>().build();
        let pdf_image = elements::Image::from_dynamic_image(image::DynamicImage::ImageLuma8(image_buffer))
            .map_err(pdf_error)?
            .with_scale(genpdf::Scale::new(0.4, 0.4));
        doc.push(pdf_image);

        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(pdf_error)?;

        Ok(buffer)
    }

    pub async fn render_async(&self, order: &Order) -> Result<Vec<u8>, AppError> {
        let service = self.clone();
        let order = order.clone();

        tokio::task::spawn_blocking(move || service.render(&order))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de geração do ticket: {}", e))?
    }
}

/// Impressora da estação: grava o PDF em `{spool}/{order_id}.pdf`.
#[derive(Clone)]
pub struct SpoolPrinter {
    tickets: TicketService,
    spool_dir: PathBuf,
}

impl SpoolPrinter {
    pub fn new(tickets: TicketService, spool_dir: PathBuf) -> Self {
        Self { tickets, spool_dir }
    }
}

#[async_trait]
impl TicketPrinter for SpoolPrinter {
    async fn print(&self, order: &Order) -> Result<(), AppError> {
        let pdf = self.tickets.render_async(order).await?;

        tokio::fs::create_dir_all(&self.spool_dir).await?;
        tokio::fs::write(self.spool_dir.join(format!("{}.pdf", order.id)), pdf).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::orders::{ItemStatus, OrderStatus};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn item(name: &str, department: Department, status: ItemStatus) -> OrderItem {
        OrderItem {
            product_id: Uuid::new_v4(),
            name: name.to_string(),
            price: Decimal::ONE,
            quantity: 1,
            department,
            status,
            promotion_id: None,
        }
    }

    #[test]
    fn ticket_groups_by_department_and_skips_cancelled() {
        let order = Order {
            id: Uuid::new_v4(),
            chefe_id: Uuid::new_v4(),
            comanda_id: 3,
            customer_id: None,
            waiter_id: None,
            table_id: None,
            status: OrderStatus::Pending,
            items: Json(vec![
                item("Água", Department::General, ItemStatus::Active),
                item("Chopp", Department::Bar, ItemStatus::Active),
                item("Fritas", Department::Kitchen, ItemStatus::Active),
                item("Vinho", Department::Bar, ItemStatus::Cancelled),
            ]),
            total: Decimal::ZERO,
            payment_method: None,
            created_at: Utc::now(),
            printed_at: None,
        };

        let names: Vec<&str> = ticket_lines(&order).iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Fritas", "Chopp", "Água"]);
    }

    #[tokio::test]
    async fn missing_fonts_fail_without_panicking() {
        let tickets = TicketService::new(std::env::temp_dir().join(format!("sem-fontes-{}", Uuid::new_v4())));
        let order = Order {
            id: Uuid::new_v4(),
            chefe_id: Uuid::new_v4(),
            comanda_id: 1,
            customer_id: None,
            waiter_id: None,
            table_id: None,
            status: OrderStatus::Pending,
            items: Json(Vec::new()),
            total: Decimal::ZERO,
            payment_method: None,
            created_at: Utc::now(),
            printed_at: None,
        };

        assert!(matches!(tickets.render_async(&order).await, Err(AppError::FontNotFound(_))));
    }
}
