//! Pure monthly revenue aggregation.

use crate::dtos::RevenueStatsResponse;
use crate::models::Revenue;

/// Sum one month's rows into totals and status counts.
pub fn summarize(rows: &[Revenue]) -> RevenueStatsResponse {
    let mut stats = RevenueStatsResponse {
        total_revenue: 0.0,
        platform_fee: 0.0,
        net_revenue: 0.0,
        completed_count: 0,
        pending_count: 0,
        record_count: rows.len() as i64,
    };

    for row in rows {
        stats.total_revenue += row.total_amount;
        stats.platform_fee += row.platform_commission;
        stats.net_revenue += row.actual_received;
        if row.payment_status {
            stats.completed_count += 1;
        } else {
            stats.pending_count += 1;
        }
    }

    stats
}

/// Month-over-month growth in percent.
///
/// The guard is on the previous-month amount, not the month index: a
/// zero baseline yields 0.0 rather than a division by zero.
pub fn growth_percentage(current_total: f64, previous_total: f64) -> f64 {
    if previous_total == 0.0 {
        return 0.0;
    }
    (current_total - previous_total) / previous_total * 100.0
}

/// Calendar month preceding `(year, month)`, rolling over January.
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}
