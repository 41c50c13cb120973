use actix_web::{HttpResponse, web};
use chrono::{Duration, Utc};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::api::ensure_payable_rate;
use crate::core::dates::{days_inclusive, parse_input_date, parse_range};
use crate::core::financials::{PayExtras, compute_daily_financials};
use crate::core::time::is_valid_time;
use crate::error::AppError;
use crate::model::attendance::{DayStatus, InOut, RecordSource};
use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveType, RequestStatus};
use crate::store::attendance::LogWrite;
use crate::store::requests::{NewCorrectionRequest, NewLeaveRequest};
use crate::store::{attendance, employees, requests};

/// Leave becomes available 90 days after joining.
const LEAVE_ELIGIBILITY_DAYS: i64 = 90;

/// Pending requests older than this are no longer surfaced for review.
const PENDING_WINDOW_DAYS: i64 = 45;

#[derive(Deserialize, ToSchema)]
pub struct SubmitLeaveRequest {
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = "sick")]
    pub leave_type: LeaveType,
    #[schema(example = "10/03/2026")]
    pub from_date: String,
    #[schema(example = "12/03/2026")]
    pub to_date: String,
    pub reason: Option<String>,
}

/// Submits a leave request. Rejected when the employee is not yet eligible
/// or already has a Pending request overlapping the range.
#[utoipa::path(
    post,
    path = "/api/requests/leave",
    request_body = SubmitLeaveRequest,
    responses(
        (status = 200, description = "Leave request submitted"),
        (status = 400, description = "Invalid range or not yet eligible"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Overlapping pending request")
    ),
    tag = "Requests"
)]
pub async fn submit_leave(
    pool: web::Data<MySqlPool>,
    payload: web::Json<SubmitLeaveRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    let range = parse_range(&payload.from_date, &payload.to_date)?;

    let employee = employees::find_by_id(pool.get_ref(), payload.employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".into()))?;

    let today = Utc::now().date_naive();
    let days_elapsed = (today - employee.joining_date).num_days();
    if days_elapsed < LEAVE_ELIGIBILITY_DAYS {
        let remaining = LEAVE_ELIGIBILITY_DAYS - days_elapsed;
        return Err(AppError::Validation(format!(
            "You can apply for leave after {remaining} days"
        )));
    }

    if requests::pending_leave_overlaps(pool.get_ref(), employee.id, range.from, range.to).await? {
        return Err(AppError::Conflict(
            "You already have a pending leave request for this date range.".into(),
        ));
    }

    let request_id = requests::insert_leave(
        pool.get_ref(),
        &NewLeaveRequest {
            employee_id: employee.id,
            employee_number: employee.employee_number.clone(),
            employee_name: employee.full_name(),
            leave_type: payload.leave_type,
            from_date: range.from,
            to_date: range.to,
            reason: payload.reason,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request submitted successfully",
        "request_id": request_id
    })))
}

#[derive(Deserialize, ToSchema)]
pub struct SubmitCorrectionRequest {
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = "05/03/2026")]
    pub date: String,
    #[schema(example = "09:00")]
    pub from_time: String,
    #[schema(example = "18:00")]
    pub to_time: String,
    pub reason: Option<String>,
}

/// Submits a punch correction for one day, snapshotting the currently stored
/// in/out so the reviewer sees what is being replaced.
#[utoipa::path(
    post,
    path = "/api/requests/correction",
    request_body = SubmitCorrectionRequest,
    responses(
        (status = 200, description = "Correction request submitted"),
        (status = 400, description = "Invalid date or times"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Pending correction already exists for this date")
    ),
    tag = "Requests"
)]
pub async fn submit_correction(
    pool: web::Data<MySqlPool>,
    payload: web::Json<SubmitCorrectionRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    let date = parse_input_date(&payload.date).ok_or_else(|| {
        AppError::Validation(format!(
            "invalid date '{}', use dd/mm/yyyy or yyyy-mm-dd",
            payload.date
        ))
    })?;
    for time in [&payload.from_time, &payload.to_time] {
        if !is_valid_time(time) {
            return Err(AppError::Validation(format!(
                "invalid time '{time}', expected HH:mm (24-hour)"
            )));
        }
    }

    let employee = employees::find_by_id(pool.get_ref(), payload.employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".into()))?;

    if requests::pending_correction_exists(pool.get_ref(), employee.id, date).await? {
        return Err(AppError::Conflict(
            "You already have a pending correction request for this date.".into(),
        ));
    }

    let current = attendance::fetch_one(pool.get_ref(), employee.id, date).await?;

    let request_id = requests::insert_correction(
        pool.get_ref(),
        &NewCorrectionRequest {
            employee_id: employee.id,
            employee_number: employee.employee_number.clone(),
            employee_name: employee.full_name(),
            date,
            original_in: current.as_ref().and_then(|c| c.in_out.in_time.clone()),
            original_out: current.as_ref().and_then(|c| c.in_out.out_time.clone()),
            corrected_in: payload.from_time,
            corrected_out: payload.to_time,
            reason: payload.reason,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Correction request submitted successfully",
        "request_id": request_id
    })))
}

/// Pending leave and correction requests from the review window.
#[utoipa::path(
    get,
    path = "/api/requests/pending",
    responses(
        (status = 200, description = "Pending leave and correction requests")
    ),
    tag = "Requests"
)]
pub async fn pending(pool: web::Data<MySqlPool>) -> Result<HttpResponse, AppError> {
    let since = Utc::now() - Duration::days(PENDING_WINDOW_DAYS);
    let leave_requests = requests::pending_leave_requests(pool.get_ref(), since).await?;
    let correction_requests = requests::pending_correction_requests(pool.get_ref(), since).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "leave_requests": leave_requests,
        "correction_requests": correction_requests
    })))
}

#[derive(Default, Deserialize, ToSchema)]
pub struct ApprovePayload {
    pub approved_by: Option<u64>,
}

#[derive(Default, Deserialize, ToSchema)]
pub struct RejectPayload {
    pub reason: Option<String>,
}

/// Approves a leave request and writes one Leave attendance record for every
/// day in the range, priced at the employee's current shift and rate.
#[utoipa::path(
    patch,
    path = "/api/requests/leave/{request_id}/approve",
    params(("request_id" = u64, Path, description = "Leave request ID")),
    responses(
        (status = 200, description = "Leave approved, attendance written"),
        (status = 404, description = "Request or employee not found"),
        (status = 409, description = "Request already processed")
    ),
    tag = "Requests"
)]
pub async fn approve_leave(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: Option<web::Json<ApprovePayload>>,
) -> Result<HttpResponse, AppError> {
    let request_id = path.into_inner();
    let approver = payload.and_then(|p| p.approved_by);

    let request = requests::find_leave(pool.get_ref(), request_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Request not found".into()))?;
    if request.status != RequestStatus::Pending {
        return Err(AppError::Conflict("Request already processed".into()));
    }
    let employee = employees::find_by_id(pool.get_ref(), request.employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".into()))?;
    ensure_payable_rate(&employee)?;

    // Attendance first, status flip last. The upserts are idempotent, so a
    // crash mid-range leaves the request Pending and the approval can simply
    // be re-invoked; duplicate day writes on a retry converge to the same
    // stored state.
    let writes = leave_writes(&employee, request.from_date, request.to_date, approver);
    let days_written = writes.len();
    for write in &writes {
        attendance::upsert(pool.get_ref(), write).await?;
    }

    if !requests::mark_leave_approved(pool.get_ref(), request_id, approver).await? {
        return Err(AppError::Conflict("Request already processed".into()));
    }

    tracing::info!(request_id, days_written, "leave request approved");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request approved",
        "days_written": days_written
    })))
}

/// One Leave upsert row per day of the inclusive range, each priced as a full
/// scheduled shift at the employee's current rate.
fn leave_writes(
    employee: &Employee,
    from: chrono::NaiveDate,
    to: chrono::NaiveDate,
    approver: Option<u64>,
) -> Vec<LogWrite> {
    days_inclusive(from, to)
        .map(|day| {
            let financials = compute_daily_financials(
                DayStatus::Leave,
                &employee.shift,
                employee.hourly_rate,
                None,
                None,
                PayExtras::default(),
            );
            LogWrite {
                employee_id: employee.id,
                date: day,
                employee_number: employee.employee_number.clone(),
                employee_name: employee.full_name(),
                department: employee.department.clone(),
                shift: employee.shift.clone(),
                hourly_rate: employee.hourly_rate,
                status: DayStatus::Leave,
                in_out: InOut::default(),
                financials,
                manual_override: None,
                source: RecordSource::LeaveApproval,
                last_updated_by: approver,
            }
        })
        .collect()
}

/// Rejects a leave request, recording the reason. No attendance mutation.
#[utoipa::path(
    patch,
    path = "/api/requests/leave/{request_id}/reject",
    params(("request_id" = u64, Path, description = "Leave request ID")),
    request_body = RejectPayload,
    responses(
        (status = 200, description = "Leave rejected"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already processed")
    ),
    tag = "Requests"
)]
pub async fn reject_leave(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: Option<web::Json<RejectPayload>>,
) -> Result<HttpResponse, AppError> {
    let request_id = path.into_inner();
    let reason = payload.and_then(|p| p.into_inner().reason);

    requests::find_leave(pool.get_ref(), request_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Request not found".into()))?;

    if !requests::mark_leave_rejected(pool.get_ref(), request_id, reason.as_deref()).await? {
        return Err(AppError::Conflict("Request already processed".into()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Leave request rejected" })))
}

/// Approves a correction request and upserts the affected day with the
/// corrected times and recomputed financials.
#[utoipa::path(
    patch,
    path = "/api/requests/correction/{request_id}/approve",
    params(("request_id" = u64, Path, description = "Correction request ID")),
    responses(
        (status = 200, description = "Correction approved, attendance updated"),
        (status = 404, description = "Request or employee not found"),
        (status = 409, description = "Request already processed")
    ),
    tag = "Requests"
)]
pub async fn approve_correction(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: Option<web::Json<ApprovePayload>>,
) -> Result<HttpResponse, AppError> {
    let request_id = path.into_inner();
    let approver = payload.and_then(|p| p.approved_by);

    let request = requests::find_correction(pool.get_ref(), request_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Request not found".into()))?;
    if request.status != RequestStatus::Pending {
        return Err(AppError::Conflict("Request already processed".into()));
    }
    let employee = employees::find_by_id(pool.get_ref(), request.employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".into()))?;
    ensure_payable_rate(&employee)?;

    let financials = compute_daily_financials(
        DayStatus::Present,
        &employee.shift,
        employee.hourly_rate,
        Some(&request.corrected_in),
        Some(&request.corrected_out),
        PayExtras::default(),
    );
    let write = LogWrite {
        employee_id: employee.id,
        date: request.date,
        employee_number: employee.employee_number.clone(),
        employee_name: employee.full_name(),
        department: employee.department.clone(),
        shift: employee.shift.clone(),
        hourly_rate: employee.hourly_rate,
        status: DayStatus::Present,
        in_out: InOut {
            in_time: Some(request.corrected_in.clone()),
            out_time: Some(request.corrected_out.clone()),
        },
        financials,
        manual_override: None,
        source: RecordSource::CorrectionApproval,
        last_updated_by: approver,
    };
    // Same ordering as leave approval: the idempotent upsert lands before
    // the status flip, so a failure here leaves the request retryable.
    attendance::upsert(pool.get_ref(), &write).await?;

    if !requests::mark_correction_approved(pool.get_ref(), request_id, approver).await? {
        return Err(AppError::Conflict("Request already processed".into()));
    }

    let updated = attendance::fetch_one(pool.get_ref(), employee.id, request.date).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Correction request approved and attendance updated",
        "updated_attendance": updated
    })))
}

/// Rejects a correction request, recording the reason.
#[utoipa::path(
    patch,
    path = "/api/requests/correction/{request_id}/reject",
    params(("request_id" = u64, Path, description = "Correction request ID")),
    request_body = RejectPayload,
    responses(
        (status = 200, description = "Correction rejected"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already processed")
    ),
    tag = "Requests"
)]
pub async fn reject_correction(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: Option<web::Json<RejectPayload>>,
) -> Result<HttpResponse, AppError> {
    let request_id = path.into_inner();
    let reason = payload.and_then(|p| p.into_inner().reason);

    requests::find_correction(pool.get_ref(), request_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Request not found".into()))?;

    if !requests::mark_correction_rejected(pool.get_ref(), request_id, reason.as_deref()).await? {
        return Err(AppError::Conflict("Request already processed".into()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Correction request rejected" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::elapsed_hours;
    use crate::model::attendance::Shift;
    use crate::model::employee::EmployeeStatus;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn employee(rate: f64) -> Employee {
        Employee {
            id: 7,
            employee_number: "1007".into(),
            first_name: "Test".into(),
            last_name: "Emp".into(),
            department: "IT".into(),
            joining_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            shift: Shift {
                start: "09:00".into(),
                end: "18:00".into(),
            },
            hourly_rate: rate,
            status: EmployeeStatus::Active,
            is_archived: false,
            is_deleted: false,
        }
    }

    #[test]
    fn three_day_leave_writes_three_full_shift_rows() {
        let emp = employee(300.0);
        let from = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 3, 12).unwrap();

        let writes = leave_writes(&emp, from, to, Some(1));
        assert_eq!(writes.len(), 3);

        let dates: BTreeSet<NaiveDate> = writes.iter().map(|w| w.date).collect();
        assert_eq!(dates.len(), 3);

        let shift_pay = elapsed_hours(&emp.shift.start, &emp.shift.end) * emp.hourly_rate;
        for write in &writes {
            assert_eq!(write.status, DayStatus::Leave);
            assert_eq!(write.source, RecordSource::LeaveApproval);
            assert_eq!(write.financials.final_day_earning, shift_pay);
            assert_eq!(write.in_out, InOut::default());
            // update path must leave any stored override flag untouched
            assert_eq!(write.manual_override, None);
        }
    }

    #[test]
    fn reissued_leave_writes_are_identical() {
        let emp = employee(354.0);
        let from = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 3, 12).unwrap();

        let first = leave_writes(&emp, from, to, Some(1));
        let second = leave_writes(&emp, from, to, Some(1));
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.date, b.date);
            assert_eq!(a.financials, b.financials);
            assert_eq!(a.in_out, b.in_out);
        }
    }

    #[test]
    fn non_positive_hourly_rate_is_rejected_before_writing() {
        assert!(ensure_payable_rate(&employee(300.0)).is_ok());
        for bad in [0.0, -10.0] {
            match ensure_payable_rate(&employee(bad)) {
                Err(AppError::Validation(_)) => {}
                other => panic!("expected Validation error, got {other:?}"),
            }
        }
    }
}
