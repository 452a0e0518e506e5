//! Row models and row/domain conversions for the catalog schema.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{order_items, orders, products};
use crate::catalog::{
    domain::{Order, OrderId, OrderLine, OrderStatus, Product, ProductId},
    ports::{CatalogError, CatalogResult},
};

/// One row of the `products` table.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i64,
    pub product_id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image_url: Option<String>,
    pub in_stock: bool,
}

/// One row of the `orders` table.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i64,
    pub order_id: String,
    pub user_id: Option<String>,
    pub total_amount: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// One row of the `order_items` table.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: i64,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i32,
}

pub fn row_to_product(row: ProductRow) -> Product {
    Product {
        product_id: ProductId::new(row.product_id),
        name: row.name,
        description: row.description,
        price: row.price,
        category: row.category,
        image_url: row.image_url,
        in_stock: row.in_stock,
    }
}

pub fn row_to_order(row: OrderRow, items: Vec<OrderItemRow>) -> CatalogResult<Order> {
    let status = OrderStatus::try_from(row.status.as_str())
        .map_err(CatalogError::invalid_persisted_data)?;
    let lines = items
        .into_iter()
        .map(|item| OrderLine {
            product_id: ProductId::new(item.product_id),
            quantity: u32::try_from(item.quantity).unwrap_or(0),
        })
        .collect();
    Ok(Order {
        order_id: OrderId::new(row.order_id),
        user_id: row.user_id,
        lines,
        total_amount: row.total_amount,
        status,
        created_at: row.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn order_row(status: &str) -> OrderRow {
        OrderRow {
            id: 1,
            order_id: "o1".to_owned(),
            user_id: Some("u1".to_owned()),
            total_amount: 42.5,
            status: status.to_owned(),
            created_at: Utc
                .with_ymd_and_hms(2025, 3, 10, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[test]
    fn known_status_converts_with_items() {
        let items = vec![OrderItemRow {
            id: 1,
            order_id: "o1".to_owned(),
            product_id: "p1".to_owned(),
            quantity: 2,
        }];
        let order = row_to_order(order_row("shipped"), items).expect("valid order");
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].quantity, 2);
    }

    #[test]
    fn unknown_status_is_invalid_persisted_data() {
        let result = row_to_order(order_row("teleported"), Vec::new());
        assert!(matches!(result, Err(CatalogError::InvalidPersistedData(_))));
    }

    #[test]
    fn negative_quantity_clamps_to_zero() {
        let items = vec![OrderItemRow {
            id: 1,
            order_id: "o1".to_owned(),
            product_id: "p1".to_owned(),
            quantity: -3,
        }];
        let order = row_to_order(order_row("pending"), items).expect("valid order");
        assert_eq!(order.lines[0].quantity, 0);
    }
}
