//! Attendance reconciliation: merging imported punch events with stored
//! records without clobbering manual corrections.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::core::dates::parse_input_date;
use crate::core::financials::{PayExtras, compute_daily_financials};
use crate::core::time::is_valid_time;
use crate::model::attendance::{AttendanceLog, DayStatus, Financials, InOut, Shift};
use crate::model::employee::Employee;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PunchKind {
    In,
    Out,
}

/// One punch-clock event from an imported log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PunchEvent {
    pub employee_number: String,
    pub date: NaiveDate,
    pub kind: PunchKind,
    pub time: String,
}

/// Parses punch-clock CSV content. Expected columns per line:
/// `employee_number,date,type,time` where type is 0 (check-in) or 1
/// (check-out), date is ISO or dd/mm/yyyy and time is HH:mm.
/// Blank lines, `#` comments, a header row and malformed rows are skipped.
pub fn parse_punch_csv(content: &str) -> Vec<PunchEvent> {
    content.lines().filter_map(parse_punch_line).collect()
}

fn parse_punch_line(line: &str) -> Option<PunchEvent> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let mut fields = line.split(',').map(str::trim);
    let employee_number = fields.next()?.to_string();
    let date = parse_input_date(fields.next()?)?;
    let kind = match fields.next()? {
        "0" => PunchKind::In,
        "1" => PunchKind::Out,
        _ => return None,
    };
    let time = fields.next()?.to_string();
    if !is_valid_time(&time) || employee_number.is_empty() {
        return None;
    }
    Some(PunchEvent {
        employee_number,
        date,
        kind,
        time,
    })
}

/// Establishes the stable chronological application order: events are applied
/// per (date, employee), earliest time first.
pub fn sort_events(events: &mut [PunchEvent]) {
    events.sort_by(|a, b| {
        (a.date, &a.employee_number, &a.time).cmp(&(b.date, &b.employee_number, &b.time))
    });
}

/// Resolves imported against stored punch times for one employee-day.
///
/// A record under manual override keeps its stored times wholesale; the
/// import is ignored for both slots. Otherwise each slot independently
/// prefers the imported value and falls back to the stored one, so a
/// check-in-only import never erases a previously known check-out.
pub fn merge_in_out(
    imported_in: Option<&str>,
    imported_out: Option<&str>,
    existing_in: Option<&str>,
    existing_out: Option<&str>,
    manual_override: bool,
) -> InOut {
    if manual_override {
        return InOut {
            in_time: existing_in.map(str::to_owned),
            out_time: existing_out.map(str::to_owned),
        };
    }
    InOut {
        in_time: imported_in.or(existing_in).map(str::to_owned),
        out_time: imported_out.or(existing_out).map(str::to_owned),
    }
}

/// Fully resolved upsert payload for one (employee, date) touched by an
/// import. Snapshot fields come from the current employee row; the store
/// layer stamps status Present, source csv-import and manual_override false.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub employee_id: u64,
    pub date: NaiveDate,
    pub employee_number: String,
    pub employee_name: String,
    pub department: String,
    pub shift: Shift,
    pub hourly_rate: f64,
    pub in_out: InOut,
    pub financials: Financials,
}

#[derive(Debug, Default)]
pub struct ImportPlan {
    pub rows: Vec<ImportRow>,
    /// Events referencing an unknown employee number; skipped, not fatal.
    pub skipped: usize,
}

/// Pure import planner: folds the sorted events through a working copy of
/// the existing records and emits exactly one upsert row per touched
/// employee-day. Applying the same event set twice yields the same rows,
/// and no two rows share an (employee_id, date) key.
pub fn plan_import(
    mut events: Vec<PunchEvent>,
    employees: &HashMap<String, Employee>,
    existing: &HashMap<(u64, NaiveDate), AttendanceLog>,
) -> ImportPlan {
    sort_events(&mut events);

    let mut working: BTreeMap<(u64, NaiveDate), ImportRow> = BTreeMap::new();
    let mut skipped = 0;

    for event in events {
        let Some(emp) = employees.get(&event.employee_number) else {
            skipped += 1;
            continue;
        };
        let key = (emp.id, event.date);

        // A row already planned in this import was written without override,
        // matching how each upsert resets the flag.
        let (current_in, current_out, override_flag) = match working.get(&key) {
            Some(row) => (row.in_out.in_time.clone(), row.in_out.out_time.clone(), false),
            None => match existing.get(&key) {
                Some(log) => (
                    log.in_out.in_time.clone(),
                    log.in_out.out_time.clone(),
                    log.manual_override,
                ),
                None => (None, None, false),
            },
        };

        let (imported_in, imported_out) = match event.kind {
            PunchKind::In => (Some(event.time.as_str()), None),
            PunchKind::Out => (None, Some(event.time.as_str())),
        };

        let merged = merge_in_out(
            imported_in,
            imported_out,
            current_in.as_deref(),
            current_out.as_deref(),
            override_flag,
        );

        let financials = compute_daily_financials(
            DayStatus::Present,
            &emp.shift,
            emp.hourly_rate,
            merged.in_time.as_deref(),
            merged.out_time.as_deref(),
            PayExtras::default(),
        );

        working.insert(
            key,
            ImportRow {
                employee_id: emp.id,
                date: event.date,
                employee_number: emp.employee_number.clone(),
                employee_name: emp.full_name(),
                department: emp.department.clone(),
                shift: emp.shift.clone(),
                hourly_rate: emp.hourly_rate,
                in_out: merged,
                financials,
            },
        );
    }

    ImportPlan {
        rows: working.into_values().collect(),
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::{RecordMeta, RecordSource};
    use crate::model::employee::EmployeeStatus;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn employee(id: u64, number: &str) -> Employee {
        Employee {
            id,
            employee_number: number.into(),
            first_name: "Test".into(),
            last_name: format!("Emp{id}"),
            department: "IT".into(),
            joining_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            shift: Shift {
                start: "09:00".into(),
                end: "18:00".into(),
            },
            hourly_rate: 300.0,
            status: EmployeeStatus::Active,
            is_archived: false,
            is_deleted: false,
        }
    }

    fn stored_log(emp: &Employee, day: NaiveDate, in_out: InOut, manual: bool) -> AttendanceLog {
        AttendanceLog {
            id: 1,
            employee_id: emp.id,
            date: day,
            employee_number: emp.employee_number.clone(),
            employee_name: emp.full_name(),
            department: emp.department.clone(),
            shift: emp.shift.clone(),
            hourly_rate: emp.hourly_rate,
            status: DayStatus::Present,
            in_out,
            financials: Financials::default(),
            manual_override: manual,
            metadata: RecordMeta {
                source: RecordSource::Manual,
                last_updated_by: None,
            },
            is_deleted: false,
        }
    }

    fn event(number: &str, day: NaiveDate, kind: PunchKind, time: &str) -> PunchEvent {
        PunchEvent {
            employee_number: number.into(),
            date: day,
            kind,
            time: time.into(),
        }
    }

    #[test]
    fn csv_parsing_skips_comments_headers_and_malformed_rows() {
        let csv = "\
# punch export
employee_number,date,type,time
1007,05/03/2026,0,09:02
1007,2026-03-05,1,18:04
1007,05/03/2026,2,19:00
1007,31/02/2026,0,09:00
1007,05/03/2026,0,25:00
,05/03/2026,0,09:00
";
        let events = parse_punch_csv(csv);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, PunchKind::In);
        assert_eq!(events[1].time, "18:04");
        assert_eq!(events[0].date, events[1].date);
    }

    #[test]
    fn events_sort_by_date_then_employee_then_time() {
        let mut events = vec![
            event("B", date(6), PunchKind::In, "09:00"),
            event("A", date(6), PunchKind::Out, "18:00"),
            event("A", date(6), PunchKind::In, "09:00"),
            event("A", date(5), PunchKind::In, "10:00"),
        ];
        sort_events(&mut events);
        assert_eq!(events[0].date, date(5));
        assert_eq!(events[1].employee_number, "A");
        assert_eq!(events[1].time, "09:00");
        assert_eq!(events[3].employee_number, "B");
    }

    #[test]
    fn manual_override_protects_stored_times() {
        let merged = merge_in_out(Some("08:00"), Some("17:00"), Some("09:10"), None, true);
        assert_eq!(merged.in_time.as_deref(), Some("09:10"));
        assert_eq!(merged.out_time, None);
    }

    #[test]
    fn import_prefers_imported_value_with_stored_fallback() {
        let merged = merge_in_out(Some("08:55"), None, Some("09:10"), Some("18:00"), false);
        assert_eq!(merged.in_time.as_deref(), Some("08:55"));
        assert_eq!(merged.out_time.as_deref(), Some("18:00"));
    }

    #[test]
    fn plan_produces_one_row_per_employee_day() {
        let emp = employee(1, "1007");
        let employees = HashMap::from([("1007".to_string(), emp)]);
        let events = vec![
            event("1007", date(5), PunchKind::Out, "18:00"),
            event("1007", date(5), PunchKind::In, "09:00"),
            event("1007", date(6), PunchKind::In, "09:05"),
        ];
        let plan = plan_import(events, &employees, &HashMap::new());
        assert_eq!(plan.rows.len(), 2);
        assert_eq!(plan.skipped, 0);

        let day5 = &plan.rows[0];
        assert_eq!(day5.in_out.in_time.as_deref(), Some("09:00"));
        assert_eq!(day5.in_out.out_time.as_deref(), Some("18:00"));
        assert_eq!(day5.financials.hours_per_day, 9.0);
        assert_eq!(day5.financials.final_day_earning, 2700.0);

        // check-in only: half-credited on the scheduled shift basis
        let day6 = &plan.rows[1];
        assert_eq!(day6.in_out.out_time, None);
        assert_eq!(day6.financials.final_day_earning, 1350.0);
    }

    #[test]
    fn unknown_employee_numbers_are_skipped_not_fatal() {
        let emp = employee(1, "1007");
        let employees = HashMap::from([("1007".to_string(), emp)]);
        let events = vec![
            event("9999", date(5), PunchKind::In, "09:00"),
            event("1007", date(5), PunchKind::In, "09:00"),
        ];
        let plan = plan_import(events, &employees, &HashMap::new());
        assert_eq!(plan.rows.len(), 1);
        assert_eq!(plan.skipped, 1);
    }

    #[test]
    fn reimporting_the_same_events_is_idempotent() {
        let emp = employee(1, "1007");
        let employees = HashMap::from([("1007".to_string(), emp.clone())]);
        let events = vec![
            event("1007", date(5), PunchKind::In, "09:00"),
            event("1007", date(5), PunchKind::Out, "18:00"),
        ];

        let first = plan_import(events.clone(), &employees, &HashMap::new());

        // Fold the first pass into a stored state, as the upsert would.
        let mut store: HashMap<(u64, NaiveDate), AttendanceLog> = HashMap::new();
        for row in &first.rows {
            store.insert(
                (row.employee_id, row.date),
                stored_log(&emp, row.date, row.in_out.clone(), false),
            );
        }

        let second = plan_import(events, &employees, &store);
        assert_eq!(first.rows, second.rows);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn import_against_overridden_record_keeps_admin_times() {
        let emp = employee(1, "1007");
        let employees = HashMap::from([("1007".to_string(), emp.clone())]);
        let day = date(5);
        let existing = HashMap::from([(
            (1u64, day),
            stored_log(
                &emp,
                day,
                InOut {
                    in_time: Some("10:00".into()),
                    out_time: Some("16:00".into()),
                },
                true,
            ),
        )]);

        let events = vec![event("1007", day, PunchKind::In, "08:00")];
        let plan = plan_import(events, &employees, &existing);
        assert_eq!(plan.rows.len(), 1);
        assert_eq!(plan.rows[0].in_out.in_time.as_deref(), Some("10:00"));
        assert_eq!(plan.rows[0].in_out.out_time.as_deref(), Some("16:00"));
    }
}
