use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::api::ensure_payable_rate;
use crate::core::dates::{parse_input_date, parse_range};
use crate::core::financials::{PayExtras, compute_daily_financials};
use crate::core::merge::{parse_punch_csv, plan_import};
use crate::core::time::is_valid_time;
use crate::core::worksheet::build_worksheet;
use crate::error::AppError;
use crate::model::attendance::{AttendanceLog, DayStatus, InOut, RecordSource};
use crate::model::employee::Employee;
use crate::store::attendance::LogWrite;
use crate::store::{attendance, employees};

#[derive(Deserialize, ToSchema)]
pub struct WorksheetRequest {
    #[schema(example = "01/03/2026")]
    pub from_date: String,
    #[schema(example = "07/03/2026")]
    pub to_date: String,
}

/// Gap-free worksheet: one row per (employee, date), virtual Absent rows for
/// days with no stored record.
#[utoipa::path(
    post,
    path = "/api/attendance/worksheet",
    request_body = WorksheetRequest,
    responses(
        (status = 200, description = "Worksheet rows for the range"),
        (status = 400, description = "Invalid date range")
    ),
    tag = "Attendance"
)]
pub async fn worksheet(
    pool: web::Data<MySqlPool>,
    payload: web::Json<WorksheetRequest>,
) -> Result<HttpResponse, AppError> {
    let range = parse_range(&payload.from_date, &payload.to_date)?;
    let active = employees::fetch_active(pool.get_ref()).await?;
    let logs = attendance::fetch_range(pool.get_ref(), range).await?;

    let rows = build_worksheet(&active, &logs, range);
    let total = rows.len();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "worksheet": rows,
        "total": total
    })))
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SaveRowRequest {
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = "05/03/2026")]
    pub date: String,
    /// Defaults to Present when omitted.
    pub status: Option<DayStatus>,
    #[schema(example = "09:05", nullable = true)]
    pub in_time: Option<String>,
    #[schema(example = "18:00", nullable = true)]
    pub out_time: Option<String>,
    #[schema(example = 1.0)]
    pub ot_hours: Option<f64>,
    #[schema(example = 1.5)]
    pub ot_multiplier: Option<f64>,
    #[schema(example = 50.0)]
    pub deduction: Option<f64>,
}

/// Single-row save: upsert on (employee, date), recompute financials, force
/// manual override so a later CSV import cannot clobber the admin's entry.
#[utoipa::path(
    post,
    path = "/api/attendance/save-row",
    request_body = SaveRowRequest,
    responses(
        (status = 200, description = "Attendance saved (upserted)"),
        (status = 400, description = "Invalid date or time"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance"
)]
pub async fn save_row(
    pool: web::Data<MySqlPool>,
    payload: web::Json<SaveRowRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    let employee = employees::find_by_id(pool.get_ref(), payload.employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".into()))?;

    let record = apply_row(pool.get_ref(), &employee, &payload).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Attendance saved successfully (upserted)",
        "record": record
    })))
}

#[derive(Deserialize, ToSchema)]
pub struct SaveBatchRequest {
    pub attendance_data: Vec<SaveRowRequest>,
}

/// Bulk save. Each day's upsert is independent; rows with an unknown
/// employee or malformed fields are skipped, not fatal to the batch.
#[utoipa::path(
    post,
    path = "/api/attendance/save-batch",
    request_body = SaveBatchRequest,
    responses(
        (status = 200, description = "Applied versus submitted row counts")
    ),
    tag = "Attendance"
)]
pub async fn save_batch(
    pool: web::Data<MySqlPool>,
    payload: web::Json<SaveBatchRequest>,
) -> Result<HttpResponse, AppError> {
    let rows = payload.into_inner().attendance_data;
    let submitted = rows.len();
    let mut applied = 0usize;

    for row in rows {
        let Some(employee) = employees::find_by_id(pool.get_ref(), row.employee_id).await? else {
            tracing::warn!(employee_id = row.employee_id, "batch row skipped: unknown employee");
            continue;
        };
        match apply_row(pool.get_ref(), &employee, &row).await {
            Ok(_) => applied += 1,
            Err(AppError::Validation(reason)) => {
                tracing::warn!(employee_id = row.employee_id, %reason, "batch row skipped");
            }
            Err(other) => return Err(other),
        }
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("{applied} attendance records saved successfully (upserted)"),
        "applied": applied,
        "submitted": submitted
    })))
}

async fn apply_row(
    pool: &MySqlPool,
    employee: &Employee,
    row: &SaveRowRequest,
) -> Result<AttendanceLog, AppError> {
    ensure_payable_rate(employee)?;
    let date = parse_input_date(&row.date).ok_or_else(|| {
        AppError::Validation(format!(
            "invalid date '{}', use dd/mm/yyyy or yyyy-mm-dd",
            row.date
        ))
    })?;
    let in_time = clean_time(row.in_time.as_deref())?;
    let out_time = clean_time(row.out_time.as_deref())?;
    let status = row.status.unwrap_or(DayStatus::Present);

    let financials = compute_daily_financials(
        status,
        &employee.shift,
        employee.hourly_rate,
        in_time.as_deref(),
        out_time.as_deref(),
        PayExtras::new(row.ot_hours, row.ot_multiplier, row.deduction),
    );

    let write = LogWrite {
        employee_id: employee.id,
        date,
        employee_number: employee.employee_number.clone(),
        employee_name: employee.full_name(),
        department: employee.department.clone(),
        shift: employee.shift.clone(),
        hourly_rate: employee.hourly_rate,
        status,
        in_out: InOut {
            in_time,
            out_time,
        },
        financials,
        manual_override: Some(true),
        source: RecordSource::Manual,
        last_updated_by: None,
    };
    attendance::upsert(pool, &write).await?;

    attendance::fetch_one(pool, employee.id, date)
        .await?
        .ok_or_else(|| AppError::NotFound("Attendance record not found after save".into()))
}

fn clean_time(value: Option<&str>) -> Result<Option<String>, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(t) if is_valid_time(t) => Ok(Some(t.to_string())),
        Some(t) => Err(AppError::Validation(format!(
            "invalid time '{t}', expected HH:mm (24-hour)"
        ))),
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CsvImportRequest {
    /// Punch-clock export: `employee_number,date,type,time` per line,
    /// type 0 = check-in, 1 = check-out.
    pub csv_content: String,
}

/// Reconciles a punch-clock CSV export with stored records. Records under
/// manual override keep their times; import never sets the override flag.
#[utoipa::path(
    post,
    path = "/api/attendance/csv-import",
    request_body = CsvImportRequest,
    responses(
        (status = 200, description = "Imported and skipped event counts"),
        (status = 400, description = "Missing CSV content")
    ),
    tag = "Attendance"
)]
pub async fn csv_import(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CsvImportRequest>,
) -> Result<HttpResponse, AppError> {
    if payload.csv_content.trim().is_empty() {
        return Err(AppError::Validation("CSV content is required".into()));
    }

    let events = parse_punch_csv(&payload.csv_content);

    let mut numbers: Vec<String> = events.iter().map(|e| e.employee_number.clone()).collect();
    numbers.sort();
    numbers.dedup();
    let employee_map: HashMap<String, Employee> = employees::find_by_numbers(pool.get_ref(), &numbers)
        .await?
        .into_iter()
        .filter(|e| {
            let payable = e.hourly_rate > 0.0;
            if !payable {
                tracing::warn!(
                    employee_number = %e.employee_number,
                    "import events skipped: non-positive hourly rate"
                );
            }
            payable
        })
        .map(|e| (e.employee_number.clone(), e))
        .collect();

    // Seed the planner with whatever is already stored for the touched days.
    let mut keys: Vec<(u64, NaiveDate)> = events
        .iter()
        .filter_map(|e| employee_map.get(&e.employee_number).map(|emp| (emp.id, e.date)))
        .collect();
    keys.sort();
    keys.dedup();

    let mut existing: HashMap<(u64, NaiveDate), AttendanceLog> = HashMap::new();
    for (employee_id, date) in keys {
        if let Some(log) = attendance::fetch_one(pool.get_ref(), employee_id, date).await? {
            existing.insert((employee_id, date), log);
        }
    }

    let plan = plan_import(events, &employee_map, &existing);
    let imported = plan.rows.len();

    for row in plan.rows {
        let write = LogWrite {
            employee_id: row.employee_id,
            date: row.date,
            employee_number: row.employee_number,
            employee_name: row.employee_name,
            department: row.department,
            shift: row.shift,
            hourly_rate: row.hourly_rate,
            status: DayStatus::Present,
            in_out: row.in_out,
            financials: row.financials,
            manual_override: Some(false),
            source: RecordSource::CsvImport,
            last_updated_by: None,
        };
        attendance::upsert(pool.get_ref(), &write).await?;
    }

    tracing::info!(imported, skipped = plan.skipped, "csv import applied");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("{imported} attendance records imported successfully."),
        "imported": imported,
        "skipped": plan.skipped
    })))
}

#[derive(Deserialize, ToSchema)]
pub struct RangeQuery {
    pub from_date: String,
    pub to_date: String,
}

/// Raw non-deleted attendance records in the range.
#[utoipa::path(
    get,
    path = "/api/attendance/range",
    responses(
        (status = 200, description = "Attendance records"),
        (status = 400, description = "Invalid date range")
    ),
    tag = "Attendance"
)]
pub async fn range(
    pool: web::Data<MySqlPool>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse, AppError> {
    let range = parse_range(&query.from_date, &query.to_date)?;
    let logs = attendance::fetch_range(pool.get_ref(), range).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "attendance": logs })))
}
