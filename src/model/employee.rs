use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::attendance::Shift;

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
pub enum EmployeeStatus {
    Active,
    Inactive,
    Frozen,
}

/// Employee directory row. The directory itself is maintained elsewhere; this
/// service only reads it to snapshot pay facts into attendance records.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-1007")]
    pub employee_number: String,

    #[schema(example = "John")]
    pub first_name: String,

    #[schema(example = "Doe")]
    pub last_name: String,

    #[schema(example = "Customer Support")]
    pub department: String,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub joining_date: NaiveDate,

    #[sqlx(flatten)]
    pub shift: Shift,

    #[schema(example = 300.0)]
    pub hourly_rate: f64,

    pub status: EmployeeStatus,
    pub is_archived: bool,
    pub is_deleted: bool,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
