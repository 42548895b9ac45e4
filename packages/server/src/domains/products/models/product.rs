use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::cmp::Ordering;

use crate::common::search::{contains_ignore_case, like_contains};
use crate::common::{
    trim_results, Page, PaginationDirection, ProductId, StoreResult, ValidatedPaginationArgs,
};

/// Stock added to each product by a low-stock restock.
pub const RESTOCK_AMOUNT: i32 = 10;

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

/// Validated input for inserting a product
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
}

/// Conjunctive product filter; bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub name_icontains: Option<String>,
    pub price_gte: Option<Decimal>,
    pub price_lte: Option<Decimal>,
    pub stock_gte: Option<i32>,
    pub stock_lte: Option<i32>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(needle) = &self.name_icontains {
            if !contains_ignore_case(&product.name, needle) {
                return false;
            }
        }
        self.price_gte.map_or(true, |min| product.price >= min)
            && self.price_lte.map_or(true, |max| product.price <= max)
            && self.stock_gte.map_or(true, |min| product.stock >= min)
            && self.stock_lte.map_or(true, |max| product.stock <= max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSortField {
    #[default]
    CreatedAt,
    Name,
    Price,
    Stock,
}

impl ProductSortField {
    /// Sort expression. Names compare bytewise (`COLLATE "C"`), like `str::cmp`.
    fn column(self) -> &'static str {
        match self {
            ProductSortField::CreatedAt => "created_at",
            ProductSortField::Name => r#"name COLLATE "C""#,
            ProductSortField::Price => "price",
            ProductSortField::Stock => "stock",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Product ordering. Ties on the sort key are broken by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProductSort {
    pub field: ProductSortField,
    pub direction: SortDirection,
}

impl ProductSort {
    /// Total order matching the SQL `ORDER BY <key>, id`.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let by_key = match self.field {
            ProductSortField::CreatedAt => a.created_at.cmp(&b.created_at),
            ProductSortField::Name => a.name.cmp(&b.name),
            ProductSortField::Price => a.price.cmp(&b.price),
            ProductSortField::Stock => a.stock.cmp(&b.stock),
        };
        let ordering = by_key.then_with(|| a.id.cmp(&b.id));
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

// Binds: $1 name, $2 price_gte, $3 price_lte, $4 stock_gte, $5 stock_lte
const FILTER_SQL: &str = r#"
    ($1::text IS NULL OR name ILIKE $1 ESCAPE '\')
    AND ($2::numeric IS NULL OR price >= $2)
    AND ($3::numeric IS NULL OR price <= $3)
    AND ($4::int4 IS NULL OR stock >= $4)
    AND ($5::int4 IS NULL OR stock <= $5)
"#;

impl Product {
    pub async fn find_by_id(id: ProductId, pool: &PgPool) -> StoreResult<Option<Self>> {
        let product = sqlx::query_as::<_, Self>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(product)
    }

    pub async fn find_by_ids(ids: &[ProductId], pool: &PgPool) -> StoreResult<Vec<Self>> {
        let products = sqlx::query_as::<_, Self>(
            "SELECT * FROM products WHERE id = ANY($1) ORDER BY id ASC",
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;
        Ok(products)
    }

    pub async fn create(input: CreateProduct, pool: &PgPool) -> StoreResult<Self> {
        let product = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO products (id, name, price, stock)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(ProductId::new())
        .bind(&input.name)
        .bind(input.price)
        .bind(input.stock)
        .fetch_one(pool)
        .await?;
        Ok(product)
    }

    /// Add `amount` to the stock of every product with stock below `threshold`.
    ///
    /// Runs as a single UPDATE; returns the updated rows in creation order.
    /// Rows whose stock would overflow `int4` are left alone.
    pub async fn restock_below(
        threshold: i32,
        amount: i32,
        pool: &PgPool,
    ) -> StoreResult<Vec<Self>> {
        let mut products = sqlx::query_as::<_, Self>(
            r#"
            UPDATE products
            SET stock = stock + $2
            WHERE stock < $1
              AND stock <= 2147483647 - $2
            RETURNING *
            "#,
        )
        .bind(threshold)
        .bind(amount)
        .fetch_all(pool)
        .await?;
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    // =========================================================================
    // Cursor-Based Pagination (Relay spec)
    // =========================================================================

    /// Keyset pagination over `(sort key, id)`.
    pub async fn find_paginated(
        filter: &ProductFilter,
        sort: ProductSort,
        args: &ValidatedPaginationArgs,
        pool: &PgPool,
    ) -> StoreResult<Page<Self>> {
        let column = sort.field.column();
        let (comparison, order) = match (args.direction, sort.direction) {
            (PaginationDirection::Forward, SortDirection::Asc)
            | (PaginationDirection::Backward, SortDirection::Desc) => (">", "ASC"),
            (PaginationDirection::Forward, SortDirection::Desc)
            | (PaginationDirection::Backward, SortDirection::Asc) => ("<", "DESC"),
        };

        let sql = format!(
            "SELECT * FROM products WHERE {filter} \
             AND ($6::uuid IS NULL OR ({column}, id) {comparison} \
                 (SELECT {column}, id FROM products WHERE id = $6)) \
             ORDER BY {column} {order}, id {order} LIMIT $7",
            filter = FILTER_SQL,
            column = column,
            comparison = comparison,
            order = order,
        );

        let rows = sqlx::query_as::<_, Self>(&sql)
            .bind(filter.name_icontains.as_deref().map(like_contains))
            .bind(filter.price_gte)
            .bind(filter.price_lte)
            .bind(filter.stock_gte)
            .bind(filter.stock_lte)
            .bind(args.cursor)
            .bind(args.fetch_limit())
            .fetch_all(pool)
            .await?;

        Ok(trim_results(rows, args))
    }

    pub async fn count_with_filters(filter: &ProductFilter, pool: &PgPool) -> StoreResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM products WHERE {}", FILTER_SQL);
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(filter.name_icontains.as_deref().map(like_contains))
            .bind(filter.price_gte)
            .bind(filter.price_lte)
            .bind(filter.stock_gte)
            .bind(filter.stock_lte)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
