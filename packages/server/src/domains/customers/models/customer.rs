use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::search::{contains_ignore_case, like_contains};
use crate::common::{
    trim_results, CustomerId, Page, PaginationDirection, StoreError, StoreResult,
    ValidatedPaginationArgs,
};

/// Customer model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for inserting a customer
#[derive(Debug, Clone)]
pub struct CreateCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Conjunctive customer filter; `None` fields impose no constraint.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    pub name_icontains: Option<String>,
    pub email_icontains: Option<String>,
    pub created_at_gte: Option<DateTime<Utc>>,
    pub created_at_lte: Option<DateTime<Utc>>,
    /// Substring of the stored phone number
    pub phone_pattern: Option<String>,
}

impl CustomerFilter {
    /// Evaluate the filter against a loaded row (same semantics as the SQL).
    pub fn matches(&self, customer: &Customer) -> bool {
        if let Some(needle) = &self.name_icontains {
            if !contains_ignore_case(&customer.name, needle) {
                return false;
            }
        }
        if let Some(needle) = &self.email_icontains {
            if !contains_ignore_case(&customer.email, needle) {
                return false;
            }
        }
        if let Some(from) = self.created_at_gte {
            if customer.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.created_at_lte {
            if customer.created_at > to {
                return false;
            }
        }
        if let Some(pattern) = &self.phone_pattern {
            match &customer.phone {
                Some(phone) if phone.contains(pattern.as_str()) => {}
                _ => return false,
            }
        }
        true
    }
}

// Binds: $1 name, $2 email, $3 created_at_gte, $4 created_at_lte, $5 phone
const FILTER_SQL: &str = r#"
    ($1::text IS NULL OR name ILIKE $1 ESCAPE '\')
    AND ($2::text IS NULL OR email ILIKE $2 ESCAPE '\')
    AND ($3::timestamptz IS NULL OR created_at >= $3)
    AND ($4::timestamptz IS NULL OR created_at <= $4)
    AND ($5::text IS NULL OR phone LIKE $5 ESCAPE '\')
"#;

impl Customer {
    pub async fn find_by_id(id: CustomerId, pool: &PgPool) -> StoreResult<Option<Self>> {
        let customer = sqlx::query_as::<_, Self>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(customer)
    }

    pub async fn find_by_ids(ids: &[CustomerId], pool: &PgPool) -> StoreResult<Vec<Self>> {
        let customers = sqlx::query_as::<_, Self>(
            "SELECT * FROM customers WHERE id = ANY($1) ORDER BY id ASC",
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;
        Ok(customers)
    }

    pub async fn email_exists(email: &str, pool: &PgPool) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Insert a customer. A duplicate email surfaces as `StoreError::UniqueViolation`.
    pub async fn create(input: CreateCustomer, pool: &PgPool) -> StoreResult<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO customers (id, name, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(CustomerId::new())
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .fetch_one(pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    // =========================================================================
    // Cursor-Based Pagination (Relay spec)
    // =========================================================================

    /// Find customers matching `filter`, in creation order, one page at a time.
    pub async fn find_paginated(
        filter: &CustomerFilter,
        args: &ValidatedPaginationArgs,
        pool: &PgPool,
    ) -> StoreResult<Page<Self>> {
        let sql = match args.direction {
            PaginationDirection::Forward => format!(
                "SELECT * FROM customers WHERE {} AND ($6::uuid IS NULL OR id > $6) \
                 ORDER BY id ASC LIMIT $7",
                FILTER_SQL
            ),
            PaginationDirection::Backward => format!(
                "SELECT * FROM customers WHERE {} AND ($6::uuid IS NULL OR id < $6) \
                 ORDER BY id DESC LIMIT $7",
                FILTER_SQL
            ),
        };

        let rows = sqlx::query_as::<_, Self>(&sql)
            .bind(filter.name_icontains.as_deref().map(like_contains))
            .bind(filter.email_icontains.as_deref().map(like_contains))
            .bind(filter.created_at_gte)
            .bind(filter.created_at_lte)
            .bind(filter.phone_pattern.as_deref().map(like_contains))
            .bind(args.cursor)
            .bind(args.fetch_limit())
            .fetch_all(pool)
            .await?;

        Ok(trim_results(rows, args))
    }

    pub async fn count_with_filters(filter: &CustomerFilter, pool: &PgPool) -> StoreResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM customers WHERE {}", FILTER_SQL);
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(filter.name_icontains.as_deref().map(like_contains))
            .bind(filter.email_icontains.as_deref().map(like_contains))
            .bind(filter.created_at_gte)
            .bind(filter.created_at_lte)
            .bind(filter.phone_pattern.as_deref().map(like_contains))
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
