use std::str::FromStr;

use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::core::dates::{DateRange, company_pay_period, parse_range};
use crate::core::report::{
    DayCategory, attendance_overview, employee_breakdown, live_payroll, performance_overview,
    range_report, salary_summary, salary_summary_csv,
};
use crate::error::AppError;
use crate::store::{attendance, employees};

#[derive(Deserialize, ToSchema)]
pub struct ReportRangeRequest {
    #[schema(example = "01/03/2026")]
    pub from_date: String,
    #[schema(example = "31/03/2026")]
    pub to_date: String,
}

#[derive(Deserialize, ToSchema)]
pub struct OverviewRequest {
    pub from_date: String,
    pub to_date: String,
    /// Restricts the detail list to one category: on-time, late, leave, absent.
    #[schema(example = "late", nullable = true)]
    pub filter_type: Option<String>,
}

/// Attendance & discipline overview: category histogram plus the filterable
/// per-day-per-employee detail list.
#[utoipa::path(
    post,
    path = "/api/payroll/attendance-overview",
    request_body = OverviewRequest,
    responses(
        (status = 200, description = "Chart data, detail list and summary"),
        (status = 400, description = "Invalid date range or filter")
    ),
    tag = "Payroll"
)]
pub async fn overview(
    pool: web::Data<MySqlPool>,
    payload: web::Json<OverviewRequest>,
) -> Result<HttpResponse, AppError> {
    let range = parse_range(&payload.from_date, &payload.to_date)?;
    let filter = payload
        .filter_type
        .as_deref()
        .map(|raw| {
            DayCategory::from_str(raw).map_err(|_| {
                AppError::Validation(format!(
                    "unknown filter '{raw}', expected on-time, late, leave or absent"
                ))
            })
        })
        .transpose()?;

    let active = employees::fetch_active(pool.get_ref()).await?;
    let logs = attendance::fetch_range(pool.get_ref(), range).await?;

    let result = attendance_overview(&active, &logs, range, filter);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "chart_data": result.chart_data,
        "detailed_list": result.detailed_list,
        "summary": result.summary
    })))
}

/// Per-employee performance scores over the range.
#[utoipa::path(
    post,
    path = "/api/payroll/performance-overview",
    request_body = ReportRangeRequest,
    responses(
        (status = 200, description = "Per-employee scores and bandings"),
        (status = 400, description = "Invalid date range")
    ),
    tag = "Payroll"
)]
pub async fn performance(
    pool: web::Data<MySqlPool>,
    payload: web::Json<ReportRangeRequest>,
) -> Result<HttpResponse, AppError> {
    let range = parse_range(&payload.from_date, &payload.to_date)?;
    let active = employees::fetch_active(pool.get_ref()).await?;
    let logs = attendance::fetch_range(pool.get_ref(), range).await?;

    let performance = performance_overview(&active, &logs);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "performance": performance })))
}

/// Flat per-employee salary summary with grand totals.
#[utoipa::path(
    post,
    path = "/api/payroll/salary-summary",
    request_body = ReportRangeRequest,
    responses(
        (status = 200, description = "Summary rows and totals"),
        (status = 400, description = "Invalid date range")
    ),
    tag = "Payroll"
)]
pub async fn summary(
    pool: web::Data<MySqlPool>,
    payload: web::Json<ReportRangeRequest>,
) -> Result<HttpResponse, AppError> {
    let range = parse_range(&payload.from_date, &payload.to_date)?;
    let active = employees::fetch_active(pool.get_ref()).await?;
    let logs = attendance::fetch_range(pool.get_ref(), range).await?;

    let result = salary_summary(&active, &logs);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "summary": result.summary,
        "totals": result.totals
    })))
}

#[derive(Deserialize, ToSchema)]
pub struct FullReportRequest {
    pub from_date: String,
    pub to_date: String,
    /// Case-insensitive name or employee-number substring.
    #[schema(example = "khan", nullable = true)]
    pub search: Option<String>,
}

/// Full payroll report: per-employee totals, nested per-day rows and a
/// grand-total row.
#[utoipa::path(
    post,
    path = "/api/payroll/report",
    request_body = FullReportRequest,
    responses(
        (status = 200, description = "Nested payroll report"),
        (status = 400, description = "Invalid date range")
    ),
    tag = "Payroll"
)]
pub async fn report(
    pool: web::Data<MySqlPool>,
    payload: web::Json<FullReportRequest>,
) -> Result<HttpResponse, AppError> {
    let range = parse_range(&payload.from_date, &payload.to_date)?;
    let active = employees::fetch_active(pool.get_ref()).await?;
    let logs = attendance::fetch_range(pool.get_ref(), range).await?;

    let result = range_report(&active, &logs, payload.search.as_deref().unwrap_or(""));
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "report": result.report,
        "grand_totals": result.grand_totals
    })))
}

/// Single-employee drill-down for the range.
#[utoipa::path(
    get,
    path = "/api/payroll/employee-breakdown/{employee_id}",
    params(("employee_id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Daily breakdown and totals"),
        (status = 400, description = "Invalid date range"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Payroll"
)]
pub async fn breakdown(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<ReportRangeRequest>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    let range = parse_range(&query.from_date, &query.to_date)?;

    let employee = employees::find_by_id(pool.get_ref(), employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".into()))?;
    let logs = attendance::fetch_employee_range(pool.get_ref(), employee_id, range).await?;

    Ok(HttpResponse::Ok().json(employee_breakdown(&employee, &logs)))
}

/// In-progress payroll for the current company pay period (18th to 17th).
#[utoipa::path(
    get,
    path = "/api/payroll/live-payroll",
    responses(
        (status = 200, description = "Running total since the period start")
    ),
    tag = "Payroll"
)]
pub async fn live(pool: web::Data<MySqlPool>) -> Result<HttpResponse, AppError> {
    let today = Utc::now().date_naive();
    let period = company_pay_period(today);
    let logs = attendance::fetch_range(
        pool.get_ref(),
        DateRange {
            from: period.from,
            to: today,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(live_payroll(&logs, today)))
}

#[derive(Deserialize, ToSchema)]
pub struct ExportRequest {
    pub from_date: String,
    pub to_date: String,
    /// "csv" for a file download, anything else for JSON.
    #[schema(example = "csv", nullable = true)]
    pub format: Option<String>,
}

/// Salary summary export, as CSV attachment or JSON.
#[utoipa::path(
    post,
    path = "/api/payroll/export",
    request_body = ExportRequest,
    responses(
        (status = 200, description = "CSV attachment or JSON summary"),
        (status = 400, description = "Invalid date range")
    ),
    tag = "Payroll"
)]
pub async fn export(
    pool: web::Data<MySqlPool>,
    payload: web::Json<ExportRequest>,
) -> Result<HttpResponse, AppError> {
    let range = parse_range(&payload.from_date, &payload.to_date)?;
    let active = employees::fetch_active(pool.get_ref()).await?;
    let logs = attendance::fetch_range(pool.get_ref(), range).await?;

    let result = salary_summary(&active, &logs);

    if payload.format.as_deref() == Some("csv") {
        let csv = salary_summary_csv(&result.summary);
        return Ok(HttpResponse::Ok()
            .content_type("text/csv")
            .insert_header((
                "Content-Disposition",
                "attachment; filename=\"payroll.csv\"",
            ))
            .body(csv));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "summary": result.summary })))
}
