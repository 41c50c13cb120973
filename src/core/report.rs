//! Aggregation and reporting over attendance records: discipline
//! classification, performance scores, payroll rollups and the live pay
//! period total.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::core::dates::{DateRange, company_pay_period, days_inclusive, format_dmy};
use crate::core::time::{delay_minutes, is_late};
use crate::model::attendance::{AttendanceLog, DayStatus, InOut, Shift};
use crate::model::employee::Employee;

/// Rounds to 2 decimal places. Applied only at report boundaries; all
/// intermediate sums stay unrounded.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Derived attendance/discipline category for one employee-day.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
    ToSchema,
)]
#[strum(ascii_case_insensitive)]
pub enum DayCategory {
    #[serde(rename = "On-time")]
    #[strum(serialize = "On-time")]
    OnTime,
    Late,
    Leave,
    Absent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayClassification {
    pub category: DayCategory,
    pub delay_minutes: u32,
    pub note: String,
}

/// Classifies one employee-day. A missing record counts as Absent; a record
/// with a check-in is Late or On-time against its own snapshot shift start.
pub fn classify_day(record: Option<&AttendanceLog>) -> DayClassification {
    let Some(record) = record else {
        return absent();
    };
    match record.status {
        DayStatus::Leave => DayClassification {
            category: DayCategory::Leave,
            delay_minutes: 0,
            note: "Approved leave".into(),
        },
        DayStatus::Absent => absent(),
        DayStatus::Present => match record.in_out.in_time.as_deref() {
            Some(actual_in) if is_late(actual_in, &record.shift.start) => {
                let delay = delay_minutes(actual_in, &record.shift.start);
                DayClassification {
                    category: DayCategory::Late,
                    delay_minutes: delay,
                    note: format!("Late by {delay} minutes"),
                }
            }
            Some(_) => DayClassification {
                category: DayCategory::OnTime,
                delay_minutes: 0,
                note: "On time".into(),
            },
            // Present on paper but never clocked in: nothing to classify.
            None => absent(),
        },
    }
}

fn absent() -> DayClassification {
    DayClassification {
        category: DayCategory::Absent,
        delay_minutes: 0,
        note: "No record found".into(),
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryCount {
    pub name: String,
    pub value: u64,
    /// Share of the total, one decimal place, as the chart expects it.
    pub percentage: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OverviewEntry {
    /// dd/mm/yyyy
    pub date: String,
    pub employee_number: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category: DayCategory,
    pub reason: String,
    pub delay_minutes: u32,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct CategorySummary {
    #[serde(rename = "On-time")]
    pub on_time: u64,
    #[serde(rename = "Late")]
    pub late: u64,
    #[serde(rename = "Leave")]
    pub leave: u64,
    #[serde(rename = "Absent")]
    pub absent: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AttendanceOverview {
    pub chart_data: Vec<CategoryCount>,
    pub detailed_list: Vec<OverviewEntry>,
    pub summary: CategorySummary,
}

/// Builds the category histogram and the per-day-per-employee detail list
/// over the range. Every (employee, day) cell counts toward the histogram;
/// `filter` restricts only the detail list.
pub fn attendance_overview(
    employees: &[Employee],
    logs: &[AttendanceLog],
    range: DateRange,
    filter: Option<DayCategory>,
) -> AttendanceOverview {
    let by_key: HashMap<(u64, NaiveDate), &AttendanceLog> = logs
        .iter()
        .map(|log| ((log.employee_id, log.date), log))
        .collect();

    let mut summary = CategorySummary::default();
    let mut detailed_list = Vec::new();

    for day in days_inclusive(range.from, range.to) {
        for emp in employees {
            let classification = classify_day(by_key.get(&(emp.id, day)).copied());

            match classification.category {
                DayCategory::OnTime => summary.on_time += 1,
                DayCategory::Late => summary.late += 1,
                DayCategory::Leave => summary.leave += 1,
                DayCategory::Absent => summary.absent += 1,
            }

            if filter.is_none_or(|f| f == classification.category) {
                detailed_list.push(OverviewEntry {
                    date: format_dmy(day),
                    employee_number: emp.employee_number.clone(),
                    name: emp.full_name(),
                    category: classification.category,
                    reason: classification.note,
                    delay_minutes: classification.delay_minutes,
                });
            }
        }
    }

    let total = summary.on_time + summary.late + summary.leave + summary.absent;
    let chart_data = [
        ("On-time", summary.on_time),
        ("Late", summary.late),
        ("Leave", summary.leave),
        ("Absent", summary.absent),
    ]
    .into_iter()
    .map(|(name, value)| CategoryCount {
        name: name.to_string(),
        value,
        percentage: if total == 0 {
            "0.0".to_string()
        } else {
            format!("{:.1}", value as f64 / total as f64 * 100.0)
        },
    })
    .collect();

    AttendanceOverview {
        chart_data,
        detailed_list,
        summary,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display, ToSchema)]
pub enum PerformanceBand {
    Excellent,
    Good,
    #[serde(rename = "Needs Improvement")]
    #[strum(serialize = "Needs Improvement")]
    NeedsImprovement,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PerformanceRow {
    pub employee_number: String,
    pub name: String,
    pub performance_score: u32,
    pub present: u64,
    pub absent: u64,
    pub leave: u64,
    pub status: PerformanceBand,
}

/// Per-employee performance score over the range.
///
/// The denominator counts only days with an actual stored record; gap days
/// with no record at all do not enter the score. An employee with zero
/// recorded days scores 0 via the guarded division.
pub fn performance_overview(employees: &[Employee], logs: &[AttendanceLog]) -> Vec<PerformanceRow> {
    let mut by_employee: HashMap<u64, Vec<&AttendanceLog>> = HashMap::new();
    for log in logs {
        by_employee.entry(log.employee_id).or_default().push(log);
    }

    employees
        .iter()
        .map(|emp| {
            let records = by_employee.get(&emp.id).map_or(&[][..], Vec::as_slice);
            let present = records
                .iter()
                .filter(|r| r.status == DayStatus::Present)
                .count() as u64;
            let absent = records
                .iter()
                .filter(|r| r.status == DayStatus::Absent)
                .count() as u64;
            let leave = records
                .iter()
                .filter(|r| r.status == DayStatus::Leave)
                .count() as u64;

            let score = if records.is_empty() {
                0
            } else {
                ((present + leave) as f64 / records.len() as f64 * 100.0).round() as u32
            };

            PerformanceRow {
                employee_number: emp.employee_number.clone(),
                name: emp.full_name(),
                performance_score: score,
                present,
                absent,
                leave,
                status: if score >= 90 {
                    PerformanceBand::Excellent
                } else if score >= 75 {
                    PerformanceBand::Good
                } else {
                    PerformanceBand::NeedsImprovement
                },
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyRow {
    /// dd/mm/yyyy
    pub date: String,
    pub status: DayStatus,
    /// "--" when no punch was recorded
    pub in_time: String,
    pub out_time: String,
    pub hours_per_day: f64,
    pub base_pay: f64,
    pub deduction: f64,
    pub ot_amount: f64,
    pub final_earning: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct MoneyTotals {
    pub base_pay: f64,
    pub deduction: f64,
    pub ot_amount: f64,
    pub final_earning: f64,
}

impl MoneyTotals {
    fn add_raw(&mut self, base_pay: f64, deduction: f64, ot_amount: f64, final_earning: f64) {
        self.base_pay += base_pay;
        self.deduction += deduction;
        self.ot_amount += ot_amount;
        self.final_earning += final_earning;
    }

    fn rounded(self) -> Self {
        Self {
            base_pay: round2(self.base_pay),
            deduction: round2(self.deduction),
            ot_amount: round2(self.ot_amount),
            final_earning: round2(self.final_earning),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeeReport {
    pub employee_id: u64,
    pub employee_number: String,
    pub name: String,
    pub totals: MoneyTotals,
    pub daily_attendance: Vec<DailyRow>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RangeReport {
    pub report: Vec<EmployeeReport>,
    pub grand_totals: MoneyTotals,
}

/// Full payroll report: per-employee totals plus the nested per-day rows for
/// drill-down, with a grand-total over every included employee.
///
/// `search` filters employees by case-insensitive name or employee-number
/// substring before aggregation. Output is sorted by employee name.
pub fn range_report(employees: &[Employee], logs: &[AttendanceLog], search: &str) -> RangeReport {
    let needle = search.trim().to_lowercase();

    let mut by_employee: HashMap<u64, Vec<&AttendanceLog>> = HashMap::new();
    for log in logs {
        by_employee.entry(log.employee_id).or_default().push(log);
    }

    let mut report: Vec<EmployeeReport> = employees
        .iter()
        .filter(|emp| {
            needle.is_empty()
                || emp.full_name().to_lowercase().contains(&needle)
                || emp.employee_number.to_lowercase().contains(&needle)
        })
        .map(|emp| {
            let mut records = by_employee.get(&emp.id).cloned().unwrap_or_default();
            records.sort_by_key(|r| r.date);

            let mut totals = MoneyTotals::default();
            let daily_attendance: Vec<DailyRow> = records
                .iter()
                .map(|r| {
                    totals.add_raw(
                        r.financials.base_pay,
                        r.financials.deduction,
                        r.financials.ot_amount,
                        r.financials.final_day_earning,
                    );
                    DailyRow {
                        date: format_dmy(r.date),
                        status: r.status,
                        in_time: r.in_out.in_time.clone().unwrap_or_else(|| "--".into()),
                        out_time: r.in_out.out_time.clone().unwrap_or_else(|| "--".into()),
                        hours_per_day: r.financials.hours_per_day,
                        base_pay: r.financials.base_pay,
                        deduction: r.financials.deduction,
                        ot_amount: r.financials.ot_amount,
                        final_earning: r.financials.final_day_earning,
                    }
                })
                .collect();

            EmployeeReport {
                employee_id: emp.id,
                employee_number: emp.employee_number.clone(),
                name: emp.full_name(),
                totals: totals.rounded(),
                daily_attendance,
            }
        })
        .collect();

    report.sort_by(|a, b| a.name.cmp(&b.name));

    let mut grand = MoneyTotals::default();
    for emp in &report {
        grand.add_raw(
            emp.totals.base_pay,
            emp.totals.deduction,
            emp.totals.ot_amount,
            emp.totals.final_earning,
        );
    }

    RangeReport {
        report,
        grand_totals: grand.rounded(),
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SalarySummaryRow {
    pub employee_id: u64,
    pub employee_number: String,
    pub name: String,
    pub basic_earned: f64,
    pub ot_total: f64,
    pub deduction_total: f64,
    pub net_payable: f64,
    pub record_count: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SalarySummary {
    pub summary: Vec<SalarySummaryRow>,
    pub totals: SalaryGrandTotals,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct SalaryGrandTotals {
    pub total_basic_earned: f64,
    pub total_ot: f64,
    pub total_deductions: f64,
    pub total_net_payable: f64,
}

/// Flat per-employee payroll summary over the range, sorted by name.
pub fn salary_summary(employees: &[Employee], logs: &[AttendanceLog]) -> SalarySummary {
    let mut by_employee: HashMap<u64, Vec<&AttendanceLog>> = HashMap::new();
    for log in logs {
        by_employee.entry(log.employee_id).or_default().push(log);
    }

    let mut summary: Vec<SalarySummaryRow> = employees
        .iter()
        .map(|emp| {
            let records = by_employee.get(&emp.id).map_or(&[][..], Vec::as_slice);
            let mut totals = MoneyTotals::default();
            for r in records {
                totals.add_raw(
                    r.financials.base_pay,
                    r.financials.deduction,
                    r.financials.ot_amount,
                    r.financials.final_day_earning,
                );
            }
            let totals = totals.rounded();
            SalarySummaryRow {
                employee_id: emp.id,
                employee_number: emp.employee_number.clone(),
                name: emp.full_name(),
                basic_earned: totals.base_pay,
                ot_total: totals.ot_amount,
                deduction_total: totals.deduction,
                net_payable: totals.final_earning,
                record_count: records.len(),
            }
        })
        .collect();

    summary.sort_by(|a, b| a.name.cmp(&b.name));

    let totals = SalaryGrandTotals {
        total_basic_earned: round2(summary.iter().map(|r| r.basic_earned).sum()),
        total_ot: round2(summary.iter().map(|r| r.ot_total).sum()),
        total_deductions: round2(summary.iter().map(|r| r.deduction_total).sum()),
        total_net_payable: round2(summary.iter().map(|r| r.net_payable).sum()),
    };

    SalarySummary { summary, totals }
}

/// CSV rendering of the salary summary for the export endpoint.
pub fn salary_summary_csv(rows: &[SalarySummaryRow]) -> String {
    let mut csv =
        String::from("Employee Number,Name,Basic Earned,OT Total,Deductions,Net Payable\n");
    for row in rows {
        csv.push_str(&format!(
            "{},\"{}\",{},{},{},{}\n",
            row.employee_number,
            row.name,
            row.basic_earned,
            row.ot_total,
            row.deduction_total,
            row.net_payable
        ));
    }
    csv
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BreakdownDay {
    /// dd/mm/yyyy
    pub date: String,
    pub in_out: InOut,
    pub status: DayStatus,
    pub hours_per_day: f64,
    pub base_pay: f64,
    pub ot_amount: f64,
    pub deduction: f64,
    pub daily_earning: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BreakdownEmployee {
    pub id: u64,
    pub name: String,
    pub employee_number: String,
    pub hourly_rate: f64,
    pub shift: Shift,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeeBreakdown {
    pub employee: BreakdownEmployee,
    pub daily_breakdown: Vec<BreakdownDay>,
    pub totals: SalaryGrandTotals,
}

/// Single-employee drill-down: the per-day rows plus 2-dp rounded totals.
/// `logs` must already be restricted to this employee and range.
pub fn employee_breakdown(employee: &Employee, logs: &[AttendanceLog]) -> EmployeeBreakdown {
    let mut records: Vec<&AttendanceLog> = logs.iter().collect();
    records.sort_by_key(|r| r.date);

    let mut totals = MoneyTotals::default();
    let daily_breakdown: Vec<BreakdownDay> = records
        .iter()
        .map(|r| {
            totals.add_raw(
                r.financials.base_pay,
                r.financials.deduction,
                r.financials.ot_amount,
                r.financials.final_day_earning,
            );
            BreakdownDay {
                date: format_dmy(r.date),
                in_out: r.in_out.clone(),
                status: r.status,
                hours_per_day: r.financials.hours_per_day,
                base_pay: r.financials.base_pay,
                ot_amount: r.financials.ot_amount,
                deduction: r.financials.deduction,
                daily_earning: r.financials.final_day_earning,
            }
        })
        .collect();

    let totals = totals.rounded();
    EmployeeBreakdown {
        employee: BreakdownEmployee {
            id: employee.id,
            name: employee.full_name(),
            employee_number: employee.employee_number.clone(),
            hourly_rate: employee.hourly_rate,
            shift: employee.shift.clone(),
        },
        daily_breakdown,
        totals: SalaryGrandTotals {
            total_basic_earned: totals.base_pay,
            total_ot: totals.ot_amount,
            total_deductions: totals.deduction,
            total_net_payable: totals.final_earning,
        },
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LivePayroll {
    pub total_payroll: f64,
    /// dd/mm/yyyy period bounds and as-of date
    pub period_start: String,
    pub period_end: String,
    pub as_of: String,
}

/// In-progress payroll for the current company pay period (18th to 17th).
/// `today` is injected by the caller so the computation stays deterministic;
/// `logs` must cover [period start, today].
pub fn live_payroll(logs: &[AttendanceLog], today: NaiveDate) -> LivePayroll {
    let period = company_pay_period(today);
    let total: f64 = logs
        .iter()
        .map(|r| r.financials.final_day_earning)
        .sum();

    LivePayroll {
        total_payroll: round2(total),
        period_start: format_dmy(period.from),
        period_end: format_dmy(period.to),
        as_of: format_dmy(today),
    }
}
