use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::search::{contains_ignore_case, like_contains};
use crate::common::{
    trim_results, CustomerId, OrderId, Page, PaginationDirection, ProductId, StoreResult,
    ValidatedPaginationArgs,
};
use crate::domains::products::models::Product;

/// Order model
///
/// `total_amount` is fixed when the order is placed and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
}

/// A product together with the order it belongs to, for batch loading.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductWithOrderId {
    pub order_id: OrderId,
    #[sqlx(flatten)]
    pub product: Product,
}

/// Input for inserting an order and its product associations
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub customer_id: CustomerId,
    /// Distinct product ids, in the order the caller listed them
    pub product_ids: Vec<ProductId>,
    pub total_amount: Decimal,
}

/// Conjunctive order filter over the order and its related rows.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub customer_name_icontains: Option<String>,
    pub product_name_icontains: Option<String>,
    pub total_amount_gte: Option<Decimal>,
    pub total_amount_lte: Option<Decimal>,
    pub order_date_gte: Option<DateTime<Utc>>,
    pub order_date_lte: Option<DateTime<Utc>>,
}

impl OrderFilter {
    /// Evaluate against an order plus its customer's name and its products' names.
    pub fn matches(&self, order: &Order, customer_name: &str, product_names: &[&str]) -> bool {
        if let Some(needle) = &self.customer_name_icontains {
            if !contains_ignore_case(customer_name, needle) {
                return false;
            }
        }
        if let Some(needle) = &self.product_name_icontains {
            if !product_names
                .iter()
                .any(|name| contains_ignore_case(name, needle))
            {
                return false;
            }
        }
        self.total_amount_gte.map_or(true, |min| order.total_amount >= min)
            && self.total_amount_lte.map_or(true, |max| order.total_amount <= max)
            && self.order_date_gte.map_or(true, |from| order.order_date >= from)
            && self.order_date_lte.map_or(true, |to| order.order_date <= to)
    }
}

// Binds: $1 customer name, $2 product name, $3/$4 total bounds, $5/$6 date bounds
const FILTER_SQL: &str = r#"
    ($1::text IS NULL OR EXISTS (
        SELECT 1 FROM customers c
        WHERE c.id = orders.customer_id AND c.name ILIKE $1 ESCAPE '\'
    ))
    AND ($2::text IS NULL OR EXISTS (
        SELECT 1 FROM order_products op
        JOIN products p ON p.id = op.product_id
        WHERE op.order_id = orders.id AND p.name ILIKE $2 ESCAPE '\'
    ))
    AND ($3::numeric IS NULL OR total_amount >= $3)
    AND ($4::numeric IS NULL OR total_amount <= $4)
    AND ($5::timestamptz IS NULL OR order_date >= $5)
    AND ($6::timestamptz IS NULL OR order_date <= $6)
"#;

impl Order {
    pub async fn find_by_id(id: OrderId, pool: &PgPool) -> StoreResult<Option<Self>> {
        let order = sqlx::query_as::<_, Self>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(order)
    }

    /// Insert the order row and its product associations in one transaction.
    pub async fn create(input: CreateOrder, pool: &PgPool) -> StoreResult<Self> {
        let product_ids: Vec<Uuid> = input.product_ids.iter().map(|id| id.into_uuid()).collect();
        let positions: Vec<i32> = (0..).take(product_ids.len()).collect();

        let mut tx = pool.begin().await?;

        let order = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO orders (id, customer_id, total_amount)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(OrderId::new())
        .bind(input.customer_id)
        .bind(input.total_amount)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO order_products (order_id, product_id, position)
            SELECT $1, t.product_id, t.position
            FROM UNNEST($2::uuid[], $3::int4[]) AS t(product_id, position)
            "#,
        )
        .bind(order.id)
        .bind(&product_ids)
        .bind(&positions)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(order)
    }

    /// Products on an order, in the order they were listed.
    /// Batch-load the products of several orders (for DataLoader).
    /// Rows come back grouped by order, in the order the products were listed.
    pub async fn find_products_for_orders(
        order_ids: &[OrderId],
        pool: &PgPool,
    ) -> StoreResult<Vec<ProductWithOrderId>> {
        let rows = sqlx::query_as::<_, ProductWithOrderId>(
            r#"
            SELECT op.order_id, p.*
            FROM products p
            INNER JOIN order_products op ON op.product_id = p.id
            WHERE op.order_id = ANY($1)
            ORDER BY op.order_id, op.position ASC
            "#,
        )
        .bind(order_ids)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    // =========================================================================
    // Cursor-Based Pagination (Relay spec)
    // =========================================================================

    pub async fn find_paginated(
        filter: &OrderFilter,
        args: &ValidatedPaginationArgs,
        pool: &PgPool,
    ) -> StoreResult<Page<Self>> {
        let sql = match args.direction {
            PaginationDirection::Forward => format!(
                "SELECT * FROM orders WHERE {} AND ($7::uuid IS NULL OR id > $7) \
                 ORDER BY id ASC LIMIT $8",
                FILTER_SQL
            ),
            PaginationDirection::Backward => format!(
                "SELECT * FROM orders WHERE {} AND ($7::uuid IS NULL OR id < $7) \
                 ORDER BY id DESC LIMIT $8",
                FILTER_SQL
            ),
        };

        let rows = sqlx::query_as::<_, Self>(&sql)
            .bind(filter.customer_name_icontains.as_deref().map(like_contains))
            .bind(filter.product_name_icontains.as_deref().map(like_contains))
            .bind(filter.total_amount_gte)
            .bind(filter.total_amount_lte)
            .bind(filter.order_date_gte)
            .bind(filter.order_date_lte)
            .bind(args.cursor)
            .bind(args.fetch_limit())
            .fetch_all(pool)
            .await?;

        Ok(trim_results(rows, args))
    }

    pub async fn count_with_filters(filter: &OrderFilter, pool: &PgPool) -> StoreResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM orders WHERE {}", FILTER_SQL);
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(filter.customer_name_icontains.as_deref().map(like_contains))
            .bind(filter.product_name_icontains.as_deref().map(like_contains))
            .bind(filter.total_amount_gte)
            .bind(filter.total_amount_lte)
            .bind(filter.order_date_gte)
            .bind(filter.order_date_lte)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
