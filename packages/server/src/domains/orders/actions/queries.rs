use tracing::info;

use crate::common::{build_page_info, CrmResult, Cursor, OrderId, ValidatedPaginationArgs};
use crate::domains::orders::data::{OrderConnection, OrderData, OrderEdge};
use crate::domains::orders::models::{Order, OrderFilter};
use crate::kernel::ServerDeps;

pub async fn get_order(order_id: &str, deps: &ServerDeps) -> CrmResult<Option<Order>> {
    let Ok(id) = OrderId::parse(order_id) else {
        return Ok(None);
    };
    Ok(deps.store.find_order(id).await?)
}

/// Get paginated orders in placement order (Relay spec)
pub async fn get_orders_paginated(
    filter: &OrderFilter,
    args: &ValidatedPaginationArgs,
    deps: &ServerDeps,
) -> CrmResult<OrderConnection> {
    info!(filter = ?filter, limit = args.limit, "Listing orders");

    let page = deps.store.list_orders(filter, args).await?;
    let total_count = deps.store.count_orders(filter).await? as i32;

    let edges: Vec<OrderEdge> = page
        .items
        .into_iter()
        .map(|order| {
            let cursor = Cursor::encode_uuid(order.id.into_uuid());
            OrderEdge {
                node: OrderData::from(order),
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

    Ok(OrderConnection {
        edges,
        page_info,
        total_count,
    })
}
