use crate::api::attendance::{
    CsvImportRequest, RangeQuery, SaveBatchRequest, SaveRowRequest, WorksheetRequest,
};
use crate::api::payroll::{ExportRequest, FullReportRequest, OverviewRequest, ReportRangeRequest};
use crate::api::requests::{
    ApprovePayload, RejectPayload, SubmitCorrectionRequest, SubmitLeaveRequest,
};
use crate::model::attendance::{AttendanceLog, DayStatus, Financials, InOut, RecordSource, Shift};
use crate::model::correction_request::CorrectionRequest;
use crate::model::employee::{Employee, EmployeeStatus};
use crate::model::leave_request::{LeaveRequest, LeaveType, RequestStatus};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Portal API",
        version = "1.0.0",
        description = r#"
## HR attendance & payroll portal

Back-office API for attendance administration and payroll reporting.

### 🔹 Key Features
- **Attendance Worksheet**
  - Gap-free editable grid, single-row and batch saves
- **Punch-Clock Reconciliation**
  - CSV import that never clobbers manually corrected records
- **Payroll Reporting**
  - Salary summaries, full reports, per-employee breakdowns, CSV export
- **Leave & Correction Requests**
  - Submit, approve and reject with automatic attendance write-back

### 📦 Response Format
- JSON-based RESTful responses
- CSV attachment for payroll export

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::worksheet,
        crate::api::attendance::save_row,
        crate::api::attendance::save_batch,
        crate::api::attendance::csv_import,
        crate::api::attendance::range,

        crate::api::payroll::overview,
        crate::api::payroll::performance,
        crate::api::payroll::summary,
        crate::api::payroll::report,
        crate::api::payroll::breakdown,
        crate::api::payroll::live,
        crate::api::payroll::export,

        crate::api::requests::submit_leave,
        crate::api::requests::submit_correction,
        crate::api::requests::pending,
        crate::api::requests::approve_leave,
        crate::api::requests::reject_leave,
        crate::api::requests::approve_correction,
        crate::api::requests::reject_correction
    ),
    components(
        schemas(
            WorksheetRequest,
            SaveRowRequest,
            SaveBatchRequest,
            CsvImportRequest,
            RangeQuery,
            ReportRangeRequest,
            OverviewRequest,
            FullReportRequest,
            ExportRequest,
            SubmitLeaveRequest,
            SubmitCorrectionRequest,
            ApprovePayload,
            RejectPayload,
            AttendanceLog,
            Shift,
            InOut,
            Financials,
            DayStatus,
            RecordSource,
            Employee,
            EmployeeStatus,
            LeaveRequest,
            LeaveType,
            RequestStatus,
            CorrectionRequest
        )
    ),
    tags(
        (name = "Attendance", description = "Worksheet, saves and punch-clock import"),
        (name = "Payroll", description = "Reports, summaries and exports"),
        (name = "Requests", description = "Leave and correction request workflow"),
    )
)]
pub struct ApiDoc;
