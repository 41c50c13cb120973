use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::leave_request::RequestStatus;

/// Punch-time correction request for a single day. The original in/out values
/// are snapshotted from whatever was on record at submission time so the admin
/// reviews exactly what the employee saw.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct CorrectionRequest {
    pub id: u64,
    pub employee_id: u64,
    pub employee_number: String,
    pub employee_name: String,

    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,

    pub original_in: Option<String>,
    pub original_out: Option<String>,
    pub corrected_in: String,
    pub corrected_out: String,

    pub reason: Option<String>,
    pub status: RequestStatus,
    pub approved_by: Option<u64>,
    pub rejection_reason: Option<String>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,

    pub is_deleted: bool,
}
