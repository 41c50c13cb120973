pub mod attendance;
pub mod payroll;
pub mod requests;

use crate::error::AppError;
use crate::model::employee::Employee;

/// The directory is maintained elsewhere; a non-positive rate there would
/// otherwise flow straight into stored pay, so every write path rejects it.
pub(crate) fn ensure_payable_rate(employee: &Employee) -> Result<(), AppError> {
    if employee.hourly_rate > 0.0 {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "employee {} has a non-positive hourly rate",
            employee.employee_number
        )))
    }
}
