use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    strum_macros::Display,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Sick,
    Unpaid,
}

/// Pending → Approved | Rejected; terminal states are immutable.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    strum_macros::Display,
    ToSchema,
)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

/// Leave request covering the inclusive [from_date, to_date] range.
/// Employee name and number are snapshots taken at submission time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    pub id: u64,
    pub employee_id: u64,
    pub employee_number: String,
    pub employee_name: String,
    pub leave_type: LeaveType,

    #[schema(value_type = String, format = "date")]
    pub from_date: NaiveDate,

    #[schema(value_type = String, format = "date")]
    pub to_date: NaiveDate,

    pub reason: Option<String>,
    pub status: RequestStatus,
    pub approved_by: Option<u64>,
    pub rejection_reason: Option<String>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,

    pub is_deleted: bool,
}
