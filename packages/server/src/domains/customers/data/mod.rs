pub mod customer;

pub use customer::{
    BulkCreateCustomersPayload, CreateCustomerPayload, CustomerConnection, CustomerData,
    CustomerEdge, CustomerFilterInput, CustomerInput,
};
