//! Relay-style cursor-based pagination types
//!
//! Implements the GraphQL Cursor Connections Specification:
//! https://relay.dev/graphql/connections.htm
//!
//! # Usage
//!
//! ```rust,ignore
//! let args = PaginationArgs { first: Some(10), after: None, .. };
//! let validated = args.validate()?;
//!
//! let page = deps.store.list_customers(&filter, &validated).await?;
//! let page_info = build_page_info(page.has_more, &validated, start, end);
//! ```

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use juniper::GraphQLObject;
use uuid::Uuid;

use super::errors::CrmError;

/// Default page size when neither `first` nor `last` is given.
pub const DEFAULT_PAGE_SIZE: i32 = 25;

/// Upper bound on page size.
pub const MAX_PAGE_SIZE: i32 = 100;

// ============================================================================
// Cursor
// ============================================================================

/// Opaque cursor for pagination (base64-encoded row id).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor(Uuid);

impl Cursor {
    pub fn new(id: Uuid) -> Self {
        Cursor(id)
    }

    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0.as_bytes())
    }

    /// Encode an id directly to a cursor string.
    pub fn encode_uuid(id: Uuid) -> String {
        Cursor::new(id).encode()
    }

    pub fn decode(s: &str) -> Result<Self, CrmError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(s)
            .map_err(|_| CrmError::validation("cursor", "invalid cursor"))?;
        let uuid = Uuid::from_slice(&bytes)
            .map_err(|_| CrmError::validation("cursor", "invalid cursor"))?;
        Ok(Cursor(uuid))
    }

    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

// ============================================================================
// PageInfo (Relay spec)
// ============================================================================

/// Page information for cursor-based pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq, GraphQLObject)]
#[graphql(description = "Information about pagination in a connection")]
pub struct PageInfo {
    /// When paginating forwards, are there more items?
    pub has_next_page: bool,
    /// When paginating backwards, are there more items?
    pub has_previous_page: bool,
    /// Cursor of the first edge in the page.
    pub start_cursor: Option<String>,
    /// Cursor of the last edge in the page.
    pub end_cursor: Option<String>,
}

// ============================================================================
// Pagination Arguments
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationDirection {
    /// first/after
    Forward,
    /// last/before
    Backward,
}

/// Raw pagination arguments as received from GraphQL.
///
/// Use either first/after (forward) or last/before (backward).
#[derive(Debug, Clone, Default)]
pub struct PaginationArgs {
    pub first: Option<i32>,
    pub after: Option<String>,
    pub last: Option<i32>,
    pub before: Option<String>,
}

impl PaginationArgs {
    pub fn forward(first: i32, after: Option<String>) -> Self {
        PaginationArgs {
            first: Some(first),
            after,
            last: None,
            before: None,
        }
    }

    pub fn backward(last: i32, before: Option<String>) -> Self {
        PaginationArgs {
            first: None,
            after: None,
            last: Some(last),
            before,
        }
    }

    /// Validate pagination arguments, applying defaults and decoding the cursor.
    pub fn validate(&self) -> Result<ValidatedPaginationArgs, CrmError> {
        if (self.first.is_some() || self.after.is_some())
            && (self.last.is_some() || self.before.is_some())
        {
            return Err(CrmError::validation(
                "pagination",
                "cannot use first/after with last/before",
            ));
        }

        let direction = if self.last.is_some() || self.before.is_some() {
            PaginationDirection::Backward
        } else {
            PaginationDirection::Forward
        };

        let limit = self
            .first
            .or(self.last)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let cursor_str = match direction {
            PaginationDirection::Forward => self.after.as_deref(),
            PaginationDirection::Backward => self.before.as_deref(),
        };

        let cursor = cursor_str
            .map(Cursor::decode)
            .transpose()?
            .map(Cursor::into_uuid);

        Ok(ValidatedPaginationArgs {
            limit,
            cursor,
            direction,
        })
    }
}

/// Validated and normalized pagination arguments.
#[derive(Debug, Clone)]
pub struct ValidatedPaginationArgs {
    /// Number of items to return (1-100, default 25).
    pub limit: i32,
    pub cursor: Option<Uuid>,
    pub direction: PaginationDirection,
}

impl Default for ValidatedPaginationArgs {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            cursor: None,
            direction: PaginationDirection::Forward,
        }
    }
}

impl ValidatedPaginationArgs {
    /// SQL LIMIT value (limit + 1 to detect has_more).
    pub fn fetch_limit(&self) -> i64 {
        i64::from(self.limit) + 1
    }

    pub fn is_forward(&self) -> bool {
        self.direction == PaginationDirection::Forward
    }
}

// ============================================================================
// Results
// ============================================================================

/// One page of rows fetched from the store, already in display order.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Whether more rows exist beyond this page in the requested direction.
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            has_more: false,
        }
    }
}

/// Build PageInfo from pagination results.
pub fn build_page_info(
    has_more: bool,
    args: &ValidatedPaginationArgs,
    start_cursor: Option<String>,
    end_cursor: Option<String>,
) -> PageInfo {
    match args.direction {
        PaginationDirection::Forward => PageInfo {
            has_next_page: has_more,
            has_previous_page: args.cursor.is_some(),
            start_cursor,
            end_cursor,
        },
        PaginationDirection::Backward => PageInfo {
            has_next_page: args.cursor.is_some(),
            has_previous_page: has_more,
            start_cursor,
            end_cursor,
        },
    }
}

/// Trim rows fetched with `fetch_limit()` down to the page size.
///
/// Backward queries fetch in reverse order; the page is flipped back into
/// display order here.
pub fn trim_results<T>(mut results: Vec<T>, args: &ValidatedPaginationArgs) -> Page<T> {
    let limit = usize::try_from(args.limit).unwrap_or(0);
    let has_more = results.len() > limit;
    results.truncate(limit);
    if !args.is_forward() {
        results.reverse();
    }
    Page {
        items: results,
        has_more,
    }
}
