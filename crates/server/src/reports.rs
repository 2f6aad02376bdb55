use api_types::{
    CategoryKind, PeriodQuery,
    category::{CategorySectionView, SectionsResponse},
    dashboard::{CategoryTotalView, DashboardResponse, SummaryView},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use engine::MonthlySummary;

use crate::{
    ServerError,
    server::{AuthUser, ServerState},
    views::{balance_view, category_view, engine_kind, entry_view, period},
};

fn summary_view(summary: MonthlySummary) -> SummaryView {
    SummaryView {
        total_income_minor: summary.total_in.cents(),
        total_expenses_minor: summary.total_ex.cents(),
        total_expenses_abs_minor: summary.total_ex_abs.cents(),
        net_minor: summary.net.cents(),
        total_income_paid_minor: summary.total_in_paid.cents(),
        total_expenses_paid_minor: summary.total_ex_paid.cents(),
        total_expenses_paid_abs_minor: summary.total_ex_paid_abs.cents(),
        net_paid_minor: summary.net_paid.cents(),
        expense_by_category: summary
            .expense_by_category
            .into_iter()
            .map(|c| CategoryTotalView {
                name: c.name,
                total_minor: c.total.cents(),
            })
            .collect(),
    }
}

pub async fn dashboard(
    Extension(AuthUser(owner)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<DashboardResponse>, ServerError> {
    let dashboard = state.engine.dashboard(&owner, period(query)?).await?;

    Ok(Json(DashboardResponse {
        period: dashboard.period,
        summary: summary_view(dashboard.summary),
        recent: dashboard.recent.into_iter().map(entry_view).collect(),
        balances: dashboard.balances.into_iter().map(balance_view).collect(),
    }))
}

pub async fn sections(
    Extension(AuthUser(owner)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(kind): Path<CategoryKind>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<SectionsResponse>, ServerError> {
    let period = period(query)?;
    let sections = state
        .engine
        .category_sections(&owner, engine_kind(kind), period)
        .await?;

    Ok(Json(SectionsResponse {
        period: period.to_string(),
        sections: sections
            .into_iter()
            .map(|section| CategorySectionView {
                category: category_view(section.category),
                entries: section.entries.into_iter().map(entry_view).collect(),
                total_minor: section.total.cents(),
            })
            .collect(),
    }))
}
