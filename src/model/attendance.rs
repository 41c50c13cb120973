use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Scheduled shift window as 24-hour HH:mm wall-clock strings.
/// `end` earlier than `start` means the shift crosses midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Shift {
    #[schema(example = "09:00")]
    #[sqlx(rename = "shift_start")]
    pub start: String,

    #[schema(example = "18:00")]
    #[sqlx(rename = "shift_end")]
    pub end: String,
}

/// Recorded punch times for one day; either slot may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct InOut {
    #[schema(example = "09:05", nullable = true)]
    #[serde(rename = "in")]
    #[sqlx(rename = "in_time")]
    pub in_time: Option<String>,

    #[schema(example = "18:00", nullable = true)]
    #[serde(rename = "out")]
    #[sqlx(rename = "out_time")]
    pub out_time: Option<String>,
}

/// Derived per-day money figures. Always produced by the daily calculator,
/// never hand-edited field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Financials {
    pub hours_per_day: f64,
    pub base_pay: f64,
    pub deduction: f64,
    pub ot_multiplier: f64,
    pub ot_hours: f64,
    pub ot_amount: f64,
    pub final_day_earning: f64,
}

impl Default for Financials {
    fn default() -> Self {
        Self {
            hours_per_day: 0.0,
            base_pay: 0.0,
            deduction: 0.0,
            ot_multiplier: 1.0,
            ot_hours: 0.0,
            ot_amount: 0.0,
            final_day_earning: 0.0,
        }
    }
}

/// Stored day status. Lateness is a derived display classification, never a
/// stored status.
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
pub enum DayStatus {
    Present,
    Absent,
    Leave,
}

/// Where the last write to a record came from.
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
pub enum RecordSource {
    #[serde(rename = "manual")]
    #[sqlx(rename = "manual")]
    #[strum(serialize = "manual")]
    Manual,

    #[serde(rename = "csv-import")]
    #[sqlx(rename = "csv-import")]
    #[strum(serialize = "csv-import")]
    CsvImport,

    #[serde(rename = "leave_approval")]
    #[sqlx(rename = "leave_approval")]
    #[strum(serialize = "leave_approval")]
    LeaveApproval,

    #[serde(rename = "correction_approval")]
    #[sqlx(rename = "correction_approval")]
    #[strum(serialize = "correction_approval")]
    CorrectionApproval,
}

/// Write provenance stamped on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct RecordMeta {
    pub source: RecordSource,
    pub last_updated_by: Option<u64>,
}

/// One employee-day attendance record, unique on (employee_id, date).
///
/// Employee number, name, department, shift and rate are point-in-time
/// snapshots copied at write time, so later edits to the employee never
/// retroactively change historical pay.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceLog {
    pub id: u64,
    pub employee_id: u64,

    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,

    pub employee_number: String,
    pub employee_name: String,
    pub department: String,

    #[sqlx(flatten)]
    pub shift: Shift,

    pub hourly_rate: f64,
    pub status: DayStatus,

    #[sqlx(flatten)]
    pub in_out: InOut,

    #[sqlx(flatten)]
    pub financials: Financials,

    /// True once an admin has authoritatively set this record; automated
    /// reconciliation must not replace the punch times while it is set.
    pub manual_override: bool,

    #[sqlx(flatten)]
    pub metadata: RecordMeta,

    pub is_deleted: bool,
}
