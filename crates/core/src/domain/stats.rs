// Dashboard statistics (derived, never stored)

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AccountStatus, EntityId, Merchant, Order, OrderStatus, StoreProduct};

/// Products with stock below this are flagged on the merchant dashboard
pub const LOW_STOCK_THRESHOLD: i64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantDashboardStats {
    pub total_sales: f64,
    pub today_orders: usize,
    pub product_count: usize,
    pub low_stock_products: usize,
    pub orders_by_status: BTreeMap<OrderStatus, usize>,
}

impl MerchantDashboardStats {
    pub fn compute(products: &[StoreProduct], orders: &[Order], today: NaiveDate) -> Self {
        let mut orders_by_status = BTreeMap::new();
        for order in orders {
            *orders_by_status.entry(order.status).or_insert(0) += 1;
        }

        Self {
            total_sales: orders.iter().map(|o| o.total).sum(),
            today_orders: orders
                .iter()
                .filter(|o| o.created_at.date_naive() == today)
                .count(),
            product_count: products.len(),
            low_stock_products: products
                .iter()
                .filter(|p| p.stock < LOW_STOCK_THRESHOLD)
                .count(),
            orders_by_status,
        }
    }
}

/// Per-merchant line of the back office
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantSummary {
    pub merchant_id: EntityId,
    pub shop_name: String,
    pub status: AccountStatus,
    pub total_orders: usize,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackofficeStats {
    pub total_deliveries: usize,
    pub completed_deliveries: usize,
    pub pending_deliveries: usize,
    pub total_revenue: f64,
    /// Percentage of orders delivered (0 when there are no orders)
    pub completion_rate: f64,
    /// Mean minutes from acceptance to delivery over delivered orders
    pub average_delivery_minutes: Option<f64>,
    pub merchants: Vec<MerchantSummary>,
}

impl BackofficeStats {
    pub fn compute(merchants: &[Merchant], orders: &[Order]) -> Self {
        let total = orders.len();
        let completed = orders
            .iter()
            .filter(|o| o.status == OrderStatus::Delivered)
            .count();

        let durations: Vec<f64> = orders
            .iter()
            .filter_map(|o| match (o.accepted_at, o.delivered_at) {
                (Some(a), Some(d)) if d >= a => Some((d - a).num_seconds() as f64 / 60.0),
                _ => None,
            })
            .collect();
        let average_delivery_minutes = if durations.is_empty() {
            None
        } else {
            Some(durations.iter().sum::<f64>() / durations.len() as f64)
        };

        let mut by_merchant: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
        for order in orders {
            let entry = by_merchant.entry(order.merchant_id.as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += order.total;
        }

        let mut summaries: Vec<MerchantSummary> = merchants
            .iter()
            .map(|m| {
                let (count, revenue) = by_merchant.remove(m.id.as_str()).unwrap_or((0, 0.0));
                MerchantSummary {
                    merchant_id: m.id.clone(),
                    shop_name: m.shop_name.clone(),
                    status: m.status,
                    total_orders: count,
                    total_revenue: revenue,
                }
            })
            .collect();

        // Storefront-only merchants (no backend account)
        summaries.extend(by_merchant.into_iter().map(|(id, (count, revenue))| {
            MerchantSummary {
                merchant_id: id.to_string(),
                shop_name: "Commerce Local".to_string(),
                status: AccountStatus::Active,
                total_orders: count,
                total_revenue: revenue,
            }
        }));
        summaries.sort_by(|a, b| b.total_revenue.total_cmp(&a.total_revenue));

        Self {
            total_deliveries: total,
            completed_deliveries: completed,
            pending_deliveries: total - completed,
            total_revenue: orders.iter().map(|o| o.total).sum(),
            completion_rate: if total == 0 {
                0.0
            } else {
                completed as f64 * 100.0 / total as f64
            },
            average_delivery_minutes,
            merchants: summaries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn order(id: &str, merchant: &str, total: f64, day: u32) -> Order {
        Order::new(
            id,
            Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap(),
            merchant,
            "Client",
            "77",
            "Dakar",
            vec![],
            total,
        )
    }

    fn product(stock: i64) -> StoreProduct {
        let now = Utc::now();
        StoreProduct {
            id: format!("p{stock}"),
            merchant_id: "m1".into(),
            name: "x".into(),
            description: String::new(),
            price: 1.0,
            category: String::new(),
            stock,
            image_url: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_merchant_dashboard() {
        let orders = vec![order("o1", "m1", 1000.0, 10), order("o2", "m1", 500.0, 11)];
        let products = vec![product(2), product(5), product(40)];
        let stats = MerchantDashboardStats::compute(
            &products,
            &orders,
            NaiveDate::from_ymd_opt(2025, 6, 11).unwrap(),
        );
        assert_eq!(stats.total_sales, 1500.0);
        assert_eq!(stats.today_orders, 1);
        assert_eq!(stats.product_count, 3);
        assert_eq!(stats.low_stock_products, 1);
        assert_eq!(stats.orders_by_status[&OrderStatus::Pending], 2);
    }

    #[test]
    fn test_backoffice_stats() {
        let mut delivered = order("o1", "m1", 15000.0, 1);
        let accepted = Utc.with_ymd_and_hms(2025, 6, 1, 12, 10, 0).unwrap();
        delivered.status = OrderStatus::Delivered;
        delivered.accepted_at = Some(accepted);
        delivered.delivered_at = Some(accepted + Duration::minutes(30));

        let orders = vec![delivered, order("o2", "m2", 8500.0, 2)];
        let merchants = vec![Merchant::new("m1", Utc::now(), "Chez Fatou", "Dakar")];

        let stats = BackofficeStats::compute(&merchants, &orders);
        assert_eq!(stats.total_deliveries, 2);
        assert_eq!(stats.completed_deliveries, 1);
        assert_eq!(stats.pending_deliveries, 1);
        assert_eq!(stats.total_revenue, 23500.0);
        assert_eq!(stats.completion_rate, 50.0);
        assert_eq!(stats.average_delivery_minutes, Some(30.0));
        assert_eq!(stats.merchants.len(), 2);
        assert_eq!(stats.merchants[0].shop_name, "Chez Fatou");
        assert_eq!(stats.merchants[1].merchant_id, "m2");
    }

    #[test]
    fn test_empty_backoffice() {
        let stats = BackofficeStats::compute(&[], &[]);
        assert_eq!(stats.completion_rate, 0.0);
        assert!(stats.average_delivery_minutes.is_none());
    }
}
