//! AttendanceLog persistence. The only mutation path is an upsert keyed on
//! (employee_id, date); the unique index in `schema.sql` guarantees at most
//! one record per employee-day even under concurrent writers.

use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::core::dates::DateRange;
use crate::error::AppError;
use crate::model::attendance::{AttendanceLog, DayStatus, Financials, InOut, RecordSource, Shift};

const COLUMNS: &str = "id, employee_id, date, employee_number, employee_name, department, \
                       shift_start, shift_end, hourly_rate, status, in_time, out_time, \
                       hours_per_day, base_pay, deduction, ot_multiplier, ot_hours, ot_amount, \
                       final_day_earning, manual_override, source, last_updated_by, is_deleted";

/// Full column set written by an upsert. `manual_override: None` leaves the
/// stored flag untouched on update (false on first insert) — leave and
/// correction approvals must not disturb an admin's override.
#[derive(Debug, Clone)]
pub struct LogWrite {
    pub employee_id: u64,
    pub date: NaiveDate,
    pub employee_number: String,
    pub employee_name: String,
    pub department: String,
    pub shift: Shift,
    pub hourly_rate: f64,
    pub status: DayStatus,
    pub in_out: InOut,
    pub financials: Financials,
    pub manual_override: Option<bool>,
    pub source: RecordSource,
    pub last_updated_by: Option<u64>,
}

/// Atomic upsert on the (employee_id, date) unique key. Re-applying the same
/// write yields the same stored state.
pub async fn upsert(pool: &MySqlPool, row: &LogWrite) -> Result<(), AppError> {
    let override_update = match row.manual_override {
        Some(_) => ", manual_override = VALUES(manual_override)",
        None => "",
    };
    let sql = format!(
        "INSERT INTO attendance_logs \
           (employee_id, date, employee_number, employee_name, department, \
            shift_start, shift_end, hourly_rate, status, in_time, out_time, \
            hours_per_day, base_pay, deduction, ot_multiplier, ot_hours, ot_amount, \
            final_day_earning, manual_override, source, last_updated_by, is_deleted) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0) \
         ON DUPLICATE KEY UPDATE \
           employee_number = VALUES(employee_number), \
           employee_name = VALUES(employee_name), \
           department = VALUES(department), \
           shift_start = VALUES(shift_start), \
           shift_end = VALUES(shift_end), \
           hourly_rate = VALUES(hourly_rate), \
           status = VALUES(status), \
           in_time = VALUES(in_time), \
           out_time = VALUES(out_time), \
           hours_per_day = VALUES(hours_per_day), \
           base_pay = VALUES(base_pay), \
           deduction = VALUES(deduction), \
           ot_multiplier = VALUES(ot_multiplier), \
           ot_hours = VALUES(ot_hours), \
           ot_amount = VALUES(ot_amount), \
           final_day_earning = VALUES(final_day_earning), \
           source = VALUES(source), \
           last_updated_by = VALUES(last_updated_by)\
           {override_update}"
    );

    sqlx::query(&sql)
        .bind(row.employee_id)
        .bind(row.date)
        .bind(&row.employee_number)
        .bind(&row.employee_name)
        .bind(&row.department)
        .bind(&row.shift.start)
        .bind(&row.shift.end)
        .bind(row.hourly_rate)
        .bind(row.status)
        .bind(&row.in_out.in_time)
        .bind(&row.in_out.out_time)
        .bind(row.financials.hours_per_day)
        .bind(row.financials.base_pay)
        .bind(row.financials.deduction)
        .bind(row.financials.ot_multiplier)
        .bind(row.financials.ot_hours)
        .bind(row.financials.ot_amount)
        .bind(row.financials.final_day_earning)
        .bind(row.manual_override.unwrap_or(false))
        .bind(row.source)
        .bind(row.last_updated_by)
        .execute(pool)
        .await?;

    Ok(())
}

/// Non-deleted records in the inclusive range, date ascending.
pub async fn fetch_range(pool: &MySqlPool, range: DateRange) -> Result<Vec<AttendanceLog>, AppError> {
    let sql = format!(
        "SELECT {COLUMNS} FROM attendance_logs \
         WHERE date BETWEEN ? AND ? AND is_deleted = 0 \
         ORDER BY date ASC"
    );
    let rows = sqlx::query_as::<_, AttendanceLog>(&sql)
        .bind(range.from)
        .bind(range.to)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Non-deleted records for one employee in the inclusive range.
pub async fn fetch_employee_range(
    pool: &MySqlPool,
    employee_id: u64,
    range: DateRange,
) -> Result<Vec<AttendanceLog>, AppError> {
    let sql = format!(
        "SELECT {COLUMNS} FROM attendance_logs \
         WHERE employee_id = ? AND date BETWEEN ? AND ? AND is_deleted = 0 \
         ORDER BY date ASC"
    );
    let rows = sqlx::query_as::<_, AttendanceLog>(&sql)
        .bind(employee_id)
        .bind(range.from)
        .bind(range.to)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// The record for one employee-day, if any. Used to seed merges and
/// correction snapshots, so soft-deleted rows are visible here too.
pub async fn fetch_one(
    pool: &MySqlPool,
    employee_id: u64,
    date: NaiveDate,
) -> Result<Option<AttendanceLog>, AppError> {
    let sql = format!(
        "SELECT {COLUMNS} FROM attendance_logs WHERE employee_id = ? AND date = ?"
    );
    let row = sqlx::query_as::<_, AttendanceLog>(&sql)
        .bind(employee_id)
        .bind(date)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}
