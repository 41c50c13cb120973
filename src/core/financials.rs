//! Daily financial calculator: turns one employee-day's status and punch
//! times into money figures.

use crate::core::time::elapsed_hours;
use crate::model::attendance::{DayStatus, Financials, Shift};

/// Optional pay inputs with their defined defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayExtras {
    pub ot_hours: f64,
    pub ot_multiplier: f64,
    pub deduction: f64,
}

impl Default for PayExtras {
    fn default() -> Self {
        Self {
            ot_hours: 0.0,
            ot_multiplier: 1.0,
            deduction: 0.0,
        }
    }
}

impl PayExtras {
    pub fn new(ot_hours: Option<f64>, ot_multiplier: Option<f64>, deduction: Option<f64>) -> Self {
        Self {
            ot_hours: ot_hours.unwrap_or(0.0),
            ot_multiplier: ot_multiplier.unwrap_or(1.0),
            deduction: deduction.unwrap_or(0.0),
        }
    }
}

/// Computes the financial outcome for a single employee-day.
///
/// Evaluated top-down, first match wins:
/// 1. Leave: paid the full scheduled shift, no overtime or deduction applied.
/// 2. Absent, or no punch at all: nothing earned.
/// 3. Both punches present: paid for the actual worked span plus overtime,
///    minus deduction, clamped at zero.
/// 4. Exactly one punch (partial punch): credited half the scheduled shift
///    pay, a conservative default pending a correction request.
///
/// Results are never rounded here; rounding happens only at report
/// boundaries so intermediate aggregation does not compound the error.
pub fn compute_daily_financials(
    status: DayStatus,
    shift: &Shift,
    hourly_rate: f64,
    in_time: Option<&str>,
    out_time: Option<&str>,
    extras: PayExtras,
) -> Financials {
    let mut out = Financials {
        deduction: extras.deduction,
        ot_multiplier: extras.ot_multiplier,
        ot_hours: extras.ot_hours,
        ..Financials::default()
    };

    if status == DayStatus::Leave {
        out.hours_per_day = elapsed_hours(&shift.start, &shift.end);
        out.base_pay = out.hours_per_day * hourly_rate;
        out.final_day_earning = out.base_pay;
        return out;
    }

    if status == DayStatus::Absent || (in_time.is_none() && out_time.is_none()) {
        return out;
    }

    match (in_time, out_time) {
        (Some(start), Some(end)) => {
            out.hours_per_day = elapsed_hours(start, end);
            out.base_pay = out.hours_per_day * hourly_rate;
            out.ot_amount = extras.ot_hours * hourly_rate * extras.ot_multiplier;
            out.final_day_earning =
                (out.base_pay + out.ot_amount - extras.deduction).max(0.0);
        }
        _ => {
            // Partial punch: the actual worked span is unknowable, so the
            // scheduled shift is the hours basis and the day is half-credited.
            out.hours_per_day = elapsed_hours(&shift.start, &shift.end);
            out.base_pay = out.hours_per_day * hourly_rate;
            out.ot_amount = extras.ot_hours * hourly_rate * extras.ot_multiplier;
            out.final_day_earning =
                (out.base_pay * 0.5 + out.ot_amount - extras.deduction).max(0.0);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day_shift() -> Shift {
        Shift {
            start: "09:00".into(),
            end: "18:00".into(),
        }
    }

    #[test]
    fn leave_pays_full_scheduled_shift() {
        let f = compute_daily_financials(
            DayStatus::Leave,
            &day_shift(),
            300.0,
            None,
            None,
            PayExtras::default(),
        );
        assert_eq!(f.hours_per_day, 9.0);
        assert_eq!(f.base_pay, 2700.0);
        assert_eq!(f.ot_amount, 0.0);
        assert_eq!(f.final_day_earning, 2700.0);
    }

    #[test]
    fn leave_ignores_overtime_and_deduction_for_the_earning() {
        let f = compute_daily_financials(
            DayStatus::Leave,
            &day_shift(),
            300.0,
            None,
            None,
            PayExtras::new(Some(2.0), Some(1.5), Some(100.0)),
        );
        assert_eq!(f.final_day_earning, f.base_pay);
        assert_eq!(f.ot_amount, 0.0);
        // inputs are still echoed into the record
        assert_eq!(f.deduction, 100.0);
        assert_eq!(f.ot_hours, 2.0);
    }

    #[test]
    fn absent_earns_nothing() {
        let f = compute_daily_financials(
            DayStatus::Absent,
            &day_shift(),
            300.0,
            Some("09:00"),
            Some("18:00"),
            PayExtras::default(),
        );
        assert_eq!(f.final_day_earning, 0.0);
        assert_eq!(f.base_pay, 0.0);
    }

    #[test]
    fn present_without_any_punch_earns_nothing() {
        let f = compute_daily_financials(
            DayStatus::Present,
            &day_shift(),
            300.0,
            None,
            None,
            PayExtras::default(),
        );
        assert_eq!(f.final_day_earning, 0.0);
        assert_eq!(f.hours_per_day, 0.0);
    }

    #[test]
    fn full_punch_pays_worked_span_plus_overtime() {
        let f = compute_daily_financials(
            DayStatus::Present,
            &day_shift(),
            300.0,
            Some("09:00"),
            Some("19:00"),
            PayExtras::new(Some(1.0), Some(2.0), Some(50.0)),
        );
        assert_eq!(f.hours_per_day, 10.0);
        assert_eq!(f.base_pay, 3000.0);
        assert_eq!(f.ot_amount, 600.0);
        assert_eq!(f.final_day_earning, 3550.0);
    }

    #[test]
    fn earnings_clamp_at_zero() {
        let f = compute_daily_financials(
            DayStatus::Present,
            &day_shift(),
            10.0,
            Some("09:00"),
            Some("10:00"),
            PayExtras::new(None, None, Some(500.0)),
        );
        assert_eq!(f.final_day_earning, 0.0);
    }

    #[test]
    fn partial_punch_half_credits_the_scheduled_shift() {
        // shift 09:00-18:00 (9h), rate 300, check-in only
        let f = compute_daily_financials(
            DayStatus::Present,
            &day_shift(),
            300.0,
            Some("09:05"),
            None,
            PayExtras::default(),
        );
        assert_eq!(f.hours_per_day, 9.0);
        assert_eq!(f.base_pay, 2700.0);
        assert_eq!(f.final_day_earning, 1350.0);
    }

    #[test]
    fn partial_punch_with_only_checkout_behaves_the_same() {
        let f = compute_daily_financials(
            DayStatus::Present,
            &day_shift(),
            300.0,
            None,
            Some("18:00"),
            PayExtras::default(),
        );
        assert_eq!(f.final_day_earning, 1350.0);
    }

    #[test]
    fn evening_shift_end_to_end_scenario() {
        // shift 14:00-23:00, rate 354, OT 1h at 1.5x, deduction 50
        let shift = Shift {
            start: "14:00".into(),
            end: "23:00".into(),
        };
        let f = compute_daily_financials(
            DayStatus::Present,
            &shift,
            354.0,
            Some("14:10"),
            Some("23:00"),
            PayExtras::new(Some(1.0), Some(1.5), Some(50.0)),
        );
        assert!((f.hours_per_day - 8.833333333333334).abs() < 1e-9);
        assert!((f.base_pay - 3127.0).abs() < 1e-9);
        assert_eq!(f.ot_amount, 531.0);
        assert!((f.final_day_earning - 3608.0).abs() < 1e-9);
    }
}
