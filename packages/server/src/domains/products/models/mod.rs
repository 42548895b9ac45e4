pub mod product;

pub use product::{
    CreateProduct, Product, ProductFilter, ProductSort, ProductSortField, SortDirection,
    RESTOCK_AMOUNT,
};
