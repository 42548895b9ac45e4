pub mod product;

pub use product::{
    CreateProductPayload, OrderDirection, ProductConnection, ProductData, ProductEdge,
    ProductFilterInput, ProductInput, ProductOrderBy, ProductOrderField,
    UpdateLowStockProductsPayload,
};
