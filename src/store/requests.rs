//! Leave and correction request persistence and the Pending → terminal state
//! transitions. Terminal updates are guarded with `WHERE status = 'Pending'`
//! so an already-processed request is never rewritten.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::MySqlPool;

use crate::error::AppError;
use crate::model::correction_request::CorrectionRequest;
use crate::model::leave_request::{LeaveRequest, LeaveType};

const LEAVE_COLUMNS: &str = "id, employee_id, employee_number, employee_name, leave_type, \
                             from_date, to_date, reason, status, approved_by, rejection_reason, \
                             created_at, is_deleted";

const CORRECTION_COLUMNS: &str = "id, employee_id, employee_number, employee_name, date, \
                                  original_in, original_out, corrected_in, corrected_out, reason, \
                                  status, approved_by, rejection_reason, created_at, is_deleted";

/// True when the employee already has a Pending leave request whose range
/// intersects [from, to].
pub async fn pending_leave_overlaps(
    pool: &MySqlPool,
    employee_id: u64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<bool, AppError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM leave_requests \
         WHERE employee_id = ? AND status = 'Pending' AND is_deleted = 0 \
           AND from_date <= ? AND to_date >= ?",
    )
    .bind(employee_id)
    .bind(to)
    .bind(from)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub struct NewLeaveRequest {
    pub employee_id: u64,
    pub employee_number: String,
    pub employee_name: String,
    pub leave_type: LeaveType,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub reason: Option<String>,
}

pub async fn insert_leave(pool: &MySqlPool, req: &NewLeaveRequest) -> Result<u64, AppError> {
    let result = sqlx::query(
        "INSERT INTO leave_requests \
           (employee_id, employee_number, employee_name, leave_type, from_date, to_date, \
            reason, status, is_deleted) \
         VALUES (?, ?, ?, ?, ?, ?, ?, 'Pending', 0)",
    )
    .bind(req.employee_id)
    .bind(&req.employee_number)
    .bind(&req.employee_name)
    .bind(req.leave_type)
    .bind(req.from_date)
    .bind(req.to_date)
    .bind(&req.reason)
    .execute(pool)
    .await?;
    Ok(result.last_insert_id())
}

pub async fn find_leave(pool: &MySqlPool, id: u64) -> Result<Option<LeaveRequest>, AppError> {
    let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ? AND is_deleted = 0");
    let row = sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Pending → Approved; false when the request was already processed.
pub async fn mark_leave_approved(
    pool: &MySqlPool,
    id: u64,
    approver: Option<u64>,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE leave_requests SET status = 'Approved', approved_by = ? \
         WHERE id = ? AND status = 'Pending'",
    )
    .bind(approver)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Pending → Rejected; false when the request was already processed.
pub async fn mark_leave_rejected(
    pool: &MySqlPool,
    id: u64,
    reason: Option<&str>,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE leave_requests SET status = 'Rejected', rejection_reason = ? \
         WHERE id = ? AND status = 'Pending'",
    )
    .bind(reason)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// True when the employee already has a Pending correction for this date.
pub async fn pending_correction_exists(
    pool: &MySqlPool,
    employee_id: u64,
    date: NaiveDate,
) -> Result<bool, AppError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM correction_requests \
         WHERE employee_id = ? AND date = ? AND status = 'Pending' AND is_deleted = 0",
    )
    .bind(employee_id)
    .bind(date)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub struct NewCorrectionRequest {
    pub employee_id: u64,
    pub employee_number: String,
    pub employee_name: String,
    pub date: NaiveDate,
    pub original_in: Option<String>,
    pub original_out: Option<String>,
    pub corrected_in: String,
    pub corrected_out: String,
    pub reason: Option<String>,
}

pub async fn insert_correction(
    pool: &MySqlPool,
    req: &NewCorrectionRequest,
) -> Result<u64, AppError> {
    let result = sqlx::query(
        "INSERT INTO correction_requests \
           (employee_id, employee_number, employee_name, date, original_in, original_out, \
            corrected_in, corrected_out, reason, status, is_deleted) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 'Pending', 0)",
    )
    .bind(req.employee_id)
    .bind(&req.employee_number)
    .bind(&req.employee_name)
    .bind(req.date)
    .bind(&req.original_in)
    .bind(&req.original_out)
    .bind(&req.corrected_in)
    .bind(&req.corrected_out)
    .bind(&req.reason)
    .execute(pool)
    .await?;
    Ok(result.last_insert_id())
}

pub async fn find_correction(
    pool: &MySqlPool,
    id: u64,
) -> Result<Option<CorrectionRequest>, AppError> {
    let sql = format!(
        "SELECT {CORRECTION_COLUMNS} FROM correction_requests WHERE id = ? AND is_deleted = 0"
    );
    let row = sqlx::query_as::<_, CorrectionRequest>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn mark_correction_approved(
    pool: &MySqlPool,
    id: u64,
    approver: Option<u64>,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE correction_requests SET status = 'Approved', approved_by = ? \
         WHERE id = ? AND status = 'Pending'",
    )
    .bind(approver)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn mark_correction_rejected(
    pool: &MySqlPool,
    id: u64,
    reason: Option<&str>,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE correction_requests SET status = 'Rejected', rejection_reason = ? \
         WHERE id = ? AND status = 'Pending'",
    )
    .bind(reason)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Pending requests created since `since`, for the admin review screen.
pub async fn pending_leave_requests(
    pool: &MySqlPool,
    since: DateTime<Utc>,
) -> Result<Vec<LeaveRequest>, AppError> {
    let sql = format!(
        "SELECT {LEAVE_COLUMNS} FROM leave_requests \
         WHERE status = 'Pending' AND is_deleted = 0 AND created_at >= ? \
         ORDER BY created_at ASC"
    );
    let rows = sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(since)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn pending_correction_requests(
    pool: &MySqlPool,
    since: DateTime<Utc>,
) -> Result<Vec<CorrectionRequest>, AppError> {
    let sql = format!(
        "SELECT {CORRECTION_COLUMNS} FROM correction_requests \
         WHERE status = 'Pending' AND is_deleted = 0 AND created_at >= ? \
         ORDER BY created_at ASC"
    );
    let rows = sqlx::query_as::<_, CorrectionRequest>(&sql)
        .bind(since)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
