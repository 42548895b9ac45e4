//! Customer query actions

use tracing::info;

use crate::common::{build_page_info, CrmResult, Cursor, CustomerId, ValidatedPaginationArgs};
use crate::domains::customers::data::{CustomerConnection, CustomerData, CustomerEdge};
use crate::domains::customers::models::{Customer, CustomerFilter};
use crate::kernel::ServerDeps;

/// Get a single customer by ID. A malformed ID finds nothing.
pub async fn get_customer(customer_id: &str, deps: &ServerDeps) -> CrmResult<Option<Customer>> {
    let Ok(id) = CustomerId::parse(customer_id) else {
        return Ok(None);
    };

    info!(customer_id = %id, "Getting customer");

    Ok(deps.store.find_customer(id).await?)
}

/// Get paginated customers with cursor-based pagination (Relay spec)
pub async fn get_customers_paginated(
    filter: &CustomerFilter,
    args: &ValidatedPaginationArgs,
    deps: &ServerDeps,
) -> CrmResult<CustomerConnection> {
    info!(filter = ?filter, limit = args.limit, "Listing customers");

    let page = deps.store.list_customers(filter, args).await?;
    let total_count = deps.store.count_customers(filter).await? as i32;

    let edges: Vec<CustomerEdge> = page
        .items
        .into_iter()
        .map(|customer| {
            let cursor = Cursor::encode_uuid(customer.id.into_uuid());
            CustomerEdge {
                node: CustomerData::from(customer),
                cursor,
            }
        })
        .collect();

    let page_info = build_page_info(
        page.has_more,
        args,
        edges.first().map(|e| e.cursor.clone()),
        edges.last().map(|e| e.cursor.clone()),
    );

    Ok(CustomerConnection {
        edges,
        page_info,
        total_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PaginationArgs;
    use crate::domains::customers::actions::create_customer;
    use crate::domains::customers::data::CustomerInput;
    use crate::kernel::TestDependencies;

    async fn seed(deps: &ServerDeps, names: &[&str]) {
        for name in names {
            create_customer(
                CustomerInput {
                    name: name.to_string(),
                    email: format!("{}@example.com", name.to_lowercase()),
                    phone: None,
                },
                deps,
            )
            .await
            .unwrap();
        }
    }

    #[tokio::test]
    async fn name_filter_counts_only_matches() {
        let deps = TestDependencies::new().into_server_deps();
        seed(&deps, &["Alice", "Bob", "Natalia"]).await;

        let filter = CustomerFilter {
            name_icontains: Some("ali".into()),
            ..Default::default()
        };
        let connection =
            get_customers_paginated(&filter, &ValidatedPaginationArgs::default(), &deps)
                .await
                .unwrap();

        assert_eq!(connection.total_count, 2);
        let names: Vec<_> = connection
            .edges
            .iter()
            .map(|e| e.node.name.as_str())
            .collect();
        assert_eq!(names, ["Alice", "Natalia"]);
        assert!(!connection.page_info.has_next_page);
    }

    #[tokio::test]
    async fn consecutive_pages_are_disjoint() {
        let deps = TestDependencies::new().into_server_deps();
        seed(&deps, &["A", "B", "C", "D", "E"]).await;
        let filter = CustomerFilter::default();

        let first = PaginationArgs::forward(2, None).validate().unwrap();
        let page1 = get_customers_paginated(&filter, &first, &deps).await.unwrap();
        assert!(page1.page_info.has_next_page);
        assert!(!page1.page_info.has_previous_page);

        let second = PaginationArgs::forward(2, page1.page_info.end_cursor.clone())
            .validate()
            .unwrap();
        let page2 = get_customers_paginated(&filter, &second, &deps).await.unwrap();
        assert!(page2.page_info.has_previous_page);

        let third = PaginationArgs::forward(2, page2.page_info.end_cursor.clone())
            .validate()
            .unwrap();
        let page3 = get_customers_paginated(&filter, &third, &deps).await.unwrap();
        assert!(!page3.page_info.has_next_page);

        let names: Vec<_> = [page1, page2, page3]
            .iter()
            .flat_map(|c| c.edges.iter().map(|e| e.node.name.clone()))
            .collect();
        assert_eq!(names, ["A", "B", "C", "D", "E"]);
    }

    #[tokio::test]
    async fn malformed_id_finds_nothing() {
        let deps = TestDependencies::new().into_server_deps();
        assert!(get_customer("not-a-uuid", &deps).await.unwrap().is_none());
    }
}
