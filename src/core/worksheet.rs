//! Gap-free worksheet materializer: one row per (employee, date) over a
//! range, with virtual Absent rows standing in for days that have no stored
//! record yet.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::core::dates::{DateRange, days_inclusive};
use crate::model::attendance::{AttendanceLog, DayStatus, Financials, InOut, Shift};
use crate::model::employee::Employee;

/// One editable grid row. `is_virtual` marks a synthesized placeholder, not a
/// committed Absent determination.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WorksheetRow {
    pub id: Option<u64>,

    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,

    pub employee_id: u64,
    pub employee_number: String,
    pub employee_name: String,
    pub department: String,
    pub shift: Shift,
    pub hourly_rate: f64,
    pub status: DayStatus,
    pub in_out: InOut,
    pub financials: Financials,
    pub manual_override: bool,
    pub is_virtual: bool,
}

/// Materializes exactly employees × days rows for the inclusive range,
/// ordered by date, then employee number, then employee name.
///
/// Stored records surface their own snapshot fields (not the live employee
/// row), so the grid shows the shift and rate the day was actually paid
/// against.
pub fn build_worksheet(
    employees: &[Employee],
    logs: &[AttendanceLog],
    range: DateRange,
) -> Vec<WorksheetRow> {
    let by_key: HashMap<(u64, NaiveDate), &AttendanceLog> = logs
        .iter()
        .map(|log| ((log.employee_id, log.date), log))
        .collect();

    let mut rows = Vec::with_capacity(employees.len() * 8);

    for day in days_inclusive(range.from, range.to) {
        for emp in employees {
            match by_key.get(&(emp.id, day)) {
                Some(log) => rows.push(WorksheetRow {
                    id: Some(log.id),
                    date: log.date,
                    employee_id: log.employee_id,
                    employee_number: log.employee_number.clone(),
                    employee_name: log.employee_name.clone(),
                    department: log.department.clone(),
                    shift: log.shift.clone(),
                    hourly_rate: log.hourly_rate,
                    status: log.status,
                    in_out: log.in_out.clone(),
                    financials: log.financials.clone(),
                    manual_override: log.manual_override,
                    is_virtual: false,
                }),
                None => rows.push(WorksheetRow {
                    id: None,
                    date: day,
                    employee_id: emp.id,
                    employee_number: emp.employee_number.clone(),
                    employee_name: emp.full_name(),
                    department: emp.department.clone(),
                    shift: emp.shift.clone(),
                    hourly_rate: emp.hourly_rate,
                    status: DayStatus::Absent,
                    in_out: InOut::default(),
                    financials: Financials::default(),
                    manual_override: false,
                    is_virtual: true,
                }),
            }
        }
    }

    rows.sort_by(|a, b| {
        (a.date, &a.employee_number, &a.employee_name)
            .cmp(&(b.date, &b.employee_number, &b.employee_name))
    });

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::model::attendance::{RecordMeta, RecordSource};
    use crate::model::employee::EmployeeStatus;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn employee(id: u64, number: &str, first: &str) -> Employee {
        Employee {
            id,
            employee_number: number.into(),
            first_name: first.into(),
            last_name: "Smith".into(),
            department: "Finance".into(),
            joining_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            shift: Shift {
                start: "09:00".into(),
                end: "18:00".into(),
            },
            hourly_rate: 250.0,
            status: EmployeeStatus::Active,
            is_archived: false,
            is_deleted: false,
        }
    }

    fn log(id: u64, emp: &Employee, day: NaiveDate) -> AttendanceLog {
        AttendanceLog {
            id,
            employee_id: emp.id,
            date: day,
            employee_number: emp.employee_number.clone(),
            employee_name: emp.full_name(),
            department: emp.department.clone(),
            shift: emp.shift.clone(),
            hourly_rate: emp.hourly_rate,
            status: DayStatus::Present,
            in_out: InOut {
                in_time: Some("09:00".into()),
                out_time: Some("18:00".into()),
            },
            financials: Financials {
                hours_per_day: 9.0,
                base_pay: 2250.0,
                final_day_earning: 2250.0,
                ..Financials::default()
            },
            manual_override: true,
            metadata: RecordMeta {
                source: RecordSource::Manual,
                last_updated_by: Some(1),
            },
            is_deleted: false,
        }
    }

    #[test]
    fn produces_exactly_n_times_d_rows_with_unique_keys() {
        let employees = vec![
            employee(1, "1001", "Alice"),
            employee(2, "1002", "Bob"),
            employee(3, "1003", "Carol"),
        ];
        let logs = vec![log(10, &employees[1], date(6))];
        let range = DateRange {
            from: date(5),
            to: date(9),
        };

        let rows = build_worksheet(&employees, &logs, range);
        assert_eq!(rows.len(), 3 * 5);

        let keys: HashSet<_> = rows.iter().map(|r| (r.employee_id, r.date)).collect();
        assert_eq!(keys.len(), rows.len());
    }

    #[test]
    fn rows_are_ordered_by_date_then_employee_number() {
        let employees = vec![employee(2, "1002", "Bob"), employee(1, "1001", "Alice")];
        let range = DateRange {
            from: date(5),
            to: date(6),
        };
        let rows = build_worksheet(&employees, &[], range);
        let order: Vec<_> = rows
            .iter()
            .map(|r| (r.date, r.employee_number.clone()))
            .collect();
        assert_eq!(
            order,
            vec![
                (date(5), "1001".to_string()),
                (date(5), "1002".to_string()),
                (date(6), "1001".to_string()),
                (date(6), "1002".to_string()),
            ]
        );
    }

    #[test]
    fn gap_days_become_virtual_absent_rows_with_zero_financials() {
        let employees = vec![employee(1, "1001", "Alice")];
        let range = DateRange {
            from: date(5),
            to: date(5),
        };
        let rows = build_worksheet(&employees, &[], range);
        let row = &rows[0];
        assert!(row.is_virtual);
        assert_eq!(row.status, DayStatus::Absent);
        assert_eq!(row.in_out, InOut::default());
        assert_eq!(row.financials.final_day_earning, 0.0);
        assert_eq!(row.financials.ot_multiplier, 1.0);
        assert!(!row.manual_override);
        assert_eq!(row.id, None);
    }

    #[test]
    fn stored_records_surface_their_snapshot_not_the_live_employee() {
        let mut emp = employee(1, "1001", "Alice");
        let stored = log(42, &emp, date(5));
        // rate changed after the day was recorded
        emp.hourly_rate = 999.0;

        let rows = build_worksheet(
            &[emp],
            &[stored],
            DateRange {
                from: date(5),
                to: date(5),
            },
        );
        let row = &rows[0];
        assert!(!row.is_virtual);
        assert_eq!(row.id, Some(42));
        assert_eq!(row.hourly_rate, 250.0);
        assert!(row.manual_override);
    }
}
