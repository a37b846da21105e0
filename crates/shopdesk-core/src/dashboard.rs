// ── Dashboard summary ──
//
// The console's landing page: a handful of counts and the revenue total,
// fetched concurrently.

use serde::Serialize;
use serde_json::Value;
use shopdesk_api::{ListPage, ListQuery};
use tracing::debug;

use crate::data::DataProvider;
use crate::error::CoreError;

/// Products shown on the dashboard's recent list.
pub const RECENT_PRODUCTS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub products: u64,
    pub categories: u64,
    pub users: u64,
    pub orders: u64,
    /// Sum of `totalPrice` over the fetched orders.
    pub revenue: f64,
    /// First page of products.
    pub recent_products: Vec<Value>,
}

impl DashboardSummary {
    pub async fn fetch(data: &DataProvider) -> Result<Self, CoreError> {
        let all = ListQuery::new();
        let recent = ListQuery::new().page_size(RECENT_PRODUCTS);

        let (products, categories, users, orders) = tokio::join!(
            data.list::<Value>("products", &recent),
            data.list::<Value>("categories", &all),
            data.list::<Value>("users", &all),
            data.list::<Value>("orders", &all),
        );
        let (products, categories, users, orders) = (products?, categories?, users?, orders?);

        let revenue = revenue(&orders);
        debug!(orders = orders.total, revenue, "dashboard summary fetched");
        Ok(Self {
            products: products.total,
            categories: categories.total,
            users: users.total,
            orders: orders.total,
            revenue,
            recent_products: products.data,
        })
    }
}

/// Prices may arrive as numbers or as decimal strings. Anything else,
/// including NaN and infinities, counts as zero.
fn revenue(orders: &ListPage<Value>) -> f64 {
    orders
        .data
        .iter()
        .filter_map(|o| o.get("totalPrice").and_then(price))
        .sum()
}

fn price(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    amount.is_finite().then_some(amount)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn revenue_counts_numbers_and_decimal_strings() {
        let orders = ListPage {
            data: vec![
                json!({"totalPrice": "19.99"}),
                json!({"totalPrice": 5}),
                json!({"totalPrice": " 0.01 "}),
            ],
            total: 3,
        };
        assert!((revenue(&orders) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn revenue_ignores_unusable_prices() {
        let orders = ListPage {
            data: vec![
                json!({"totalPrice": 10.5}),
                json!({"totalPrice": "twelve"}),
                json!({"totalPrice": "NaN"}),
                json!({"totalPrice": "inf"}),
                json!({"totalPrice": null}),
                json!({"totalPrice": true}),
                json!({"id": 3}),
            ],
            total: 7,
        };
        assert!((revenue(&orders) - 10.5).abs() < f64::EPSILON);
    }
}
