//! Revenue operations: ledger CRUD plus the monthly aggregation endpoints.

use std::sync::Arc;

use service_core::error::AppError;
use tracing::instrument;
use validator::Validate;

use crate::dtos::{
    CreateRevenueRequest, MonthQuery, PaginatedResponse, RevenueGrowthResponse, RevenueListQuery,
    RevenueResponse, RevenueStatsResponse, RevenueStatsWithListResponse, UpdateRevenueRequest,
};
use crate::models::Revenue;
use crate::repository::{NewRevenue, RevenueFilter, RevenueStore, SearchPagination};
use crate::services::enrichment::Enrichment;
use crate::services::revenue_stats::{growth_percentage, previous_month, summarize};

#[derive(Clone)]
pub struct RevenueService {
    store: Arc<dyn RevenueStore>,
    enrichment: Enrichment,
}

impl RevenueService {
    pub fn new(store: Arc<dyn RevenueStore>, enrichment: Enrichment) -> Self {
        Self { store, enrichment }
    }

    /// Record a settlement. The net amount is derived here so that
    /// `actual_received + platform_commission == total_amount` holds for
    /// every row created through this path.
    #[instrument(skip(self, request), fields(payment_id = request.payment_id))]
    pub async fn create(&self, request: CreateRevenueRequest) -> Result<Revenue, AppError> {
        request.validate()?;

        if request.platform_commission > request.total_amount {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Platform commission cannot exceed the total amount"
            )));
        }

        self.store
            .create_revenue(&NewRevenue {
                payment_id: request.payment_id,
                tour_guide_id: request.tour_guide_id,
                invoice_id: request.invoice_id,
                total_amount: request.total_amount,
                actual_received: request.total_amount - request.platform_commission,
                platform_commission: request.platform_commission,
                payment_status: request.payment_status.unwrap_or(false),
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, revenue_id: i64) -> Result<RevenueResponse, AppError> {
        let revenue = self
            .store
            .get_revenue(revenue_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Revenue not found")))?;

        Ok(self.enrichment.revenue_response(revenue).await)
    }

    #[instrument(skip(self, query))]
    pub async fn list(
        &self,
        query: RevenueListQuery,
    ) -> Result<PaginatedResponse<RevenueResponse>, AppError> {
        let pagination = SearchPagination::new(
            query.page,
            query.per_page,
            None,
            query.sort_by.as_deref(),
            query.order.as_deref(),
        );
        let filter = RevenueFilter {
            tour_guide_id: query.tour_guide_id,
            invoice_id: query.invoice_id,
            payment_id: query.payment_id,
            payment_status: query.payment_status,
        };

        let page = self.store.list_revenues(&filter, &pagination).await?;
        let total_pages = page.total_pages();
        let has_next = page.has_next();
        let has_previous = page.has_previous();
        let data = self.enrichment.revenue_responses(page.rows).await;

        Ok(PaginatedResponse {
            data,
            total_count: page.total_count,
            page: page.page,
            per_page: page.per_page,
            total_pages,
            has_next,
            has_previous,
        })
    }

    /// Partial edit: only supplied fields overwrite the stored row.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        revenue_id: i64,
        request: UpdateRevenueRequest,
    ) -> Result<Revenue, AppError> {
        request.validate()?;

        let mut revenue = self
            .store
            .get_revenue(revenue_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Revenue not found")))?;

        if let Some(total_amount) = request.total_amount {
            revenue.total_amount = total_amount;
        }
        if let Some(actual_received) = request.actual_received {
            revenue.actual_received = actual_received;
        }
        if let Some(platform_commission) = request.platform_commission {
            revenue.platform_commission = platform_commission;
        }
        if let Some(payment_status) = request.payment_status {
            revenue.payment_status = payment_status;
        }

        let updated = self.store.update_revenue(&revenue).await?;
        if !updated {
            return Err(AppError::NotFound(anyhow::anyhow!("Revenue not found")));
        }

        Ok(revenue)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, revenue_id: i64) -> Result<(), AppError> {
        let deleted = self.store.delete_revenue(revenue_id).await?;
        if !deleted {
            return Err(AppError::NotFound(anyhow::anyhow!("Revenue not found")));
        }
        Ok(())
    }

    /// Monthly totals for one tour guide.
    #[instrument(skip(self, query), fields(tour_guide_id = tour_guide_id))]
    pub async fn monthly_stats(
        &self,
        tour_guide_id: i64,
        query: MonthQuery,
    ) -> Result<RevenueStatsResponse, AppError> {
        query.validate()?;

        let rows = self
            .store
            .list_by_month(tour_guide_id, query.year, query.month)
            .await?;

        Ok(summarize(&rows))
    }

    /// Month-over-month growth for one tour guide.
    #[instrument(skip(self, query), fields(tour_guide_id = tour_guide_id))]
    pub async fn growth(
        &self,
        tour_guide_id: i64,
        query: MonthQuery,
    ) -> Result<RevenueGrowthResponse, AppError> {
        query.validate()?;

        let current_total = self
            .store
            .total_amount_by_month(tour_guide_id, query.year, query.month)
            .await?;

        let (prev_year, prev_month) = previous_month(query.year, query.month);
        let previous_total = self
            .store
            .total_amount_by_month(tour_guide_id, prev_year, prev_month)
            .await?;

        Ok(RevenueGrowthResponse {
            current_total,
            previous_total,
            growth_percentage: growth_percentage(current_total, previous_total),
        })
    }

    /// Totals, growth and the enriched row list in one response.
    #[instrument(skip(self, query), fields(tour_guide_id = tour_guide_id))]
    pub async fn stats_with_list(
        &self,
        tour_guide_id: i64,
        query: MonthQuery,
    ) -> Result<RevenueStatsWithListResponse, AppError> {
        query.validate()?;

        let rows = self
            .store
            .list_by_month(tour_guide_id, query.year, query.month)
            .await?;
        let stats = summarize(&rows);

        let (prev_year, prev_month) = previous_month(query.year, query.month);
        let previous_total = self
            .store
            .total_amount_by_month(tour_guide_id, prev_year, prev_month)
            .await?;
        let growth = growth_percentage(stats.total_revenue, previous_total);

        let items = self.enrichment.revenue_responses(rows).await;

        Ok(RevenueStatsWithListResponse {
            stats,
            growth_percentage: growth,
            items,
        })
    }
}
