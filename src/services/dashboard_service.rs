// src/services/dashboard_service.rs

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::dashboard::{DashboardSummary, MonthlyRevenue, RecentSale, ReportsSummary},
};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    pub async fn summary(&self) -> Result<DashboardSummary, AppError> {
        let counts = self.repo.summary_counts().await?;
        let recent = self.repo.recent_invoices(3).await?;

        let recent_sales = recent
            .into_iter()
            .map(|inv| {
                let customer = inv.customer_name.unwrap_or_else(|| "Unknown".to_string());
                RecentSale {
                    id: inv.id,
                    initials: customer.chars().take(2).collect::<String>().to_uppercase(),
                    customer,
                    description: inv
                        .custom_description
                        .filter(|d| !d.is_empty())
                        .unwrap_or_else(|| "Invoice".to_string()),
                    amount: inv.total_amount,
                }
            })
            .collect();

        Ok(DashboardSummary {
            total_revenue: counts.total_revenue,
            active_jobs: counts.active_jobs,
            inventory_items: counts.inventory_items,
            active_customers: counts.active_customers,
            recent_sales,
        })
    }

    pub async fn reports(&self) -> Result<ReportsSummary, AppError> {
        let counts = self.repo.summary_counts().await?;
        let completed_jobs = self.repo.completed_jobs().await?;
        let months = self.repo.monthly_revenue().await?;

        let monthly_revenue = months
            .into_iter()
            .filter_map(|row| {
                let month = row.month? as usize;
                let name = MONTH_NAMES.get(month.checked_sub(1)?)?;
                Some(MonthlyRevenue {
                    name: name.to_string(),
                    total: row.total.unwrap_or_default(),
                })
            })
            .collect();

        Ok(ReportsSummary {
            total_revenue: counts.total_revenue,
            completed_jobs,
            monthly_revenue,
        })
    }
}
