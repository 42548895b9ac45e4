// Common types and utilities shared across the application

pub mod entity_ids;
pub mod errors;
pub mod id;
pub mod pagination;
pub mod search;
pub mod validation;

pub use entity_ids::*;
pub use errors::{CrmError, CrmResult, SharedStoreResult, StoreError, StoreResult};
pub use id::Id;
pub use pagination::{
    build_page_info, trim_results, Cursor, Page, PageInfo, PaginationArgs, PaginationDirection,
    ValidatedPaginationArgs,
};
