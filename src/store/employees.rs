//! Read-only employee directory lookups. The directory is maintained by the
//! surrounding system; this service only snapshots pay facts out of it.

use sqlx::MySqlPool;

use crate::error::AppError;
use crate::model::employee::Employee;

const COLUMNS: &str = "id, employee_number, first_name, last_name, department, joining_date, \
                       shift_start, shift_end, hourly_rate, status, is_archived, is_deleted";

/// Active, non-archived, non-deleted employees in worksheet order.
pub async fn fetch_active(pool: &MySqlPool) -> Result<Vec<Employee>, AppError> {
    let sql = format!(
        "SELECT {COLUMNS} FROM employees \
         WHERE status = 'Active' AND is_archived = 0 AND is_deleted = 0 \
         ORDER BY employee_number ASC, first_name ASC"
    );
    let rows = sqlx::query_as::<_, Employee>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &MySqlPool, id: u64) -> Result<Option<Employee>, AppError> {
    let sql = format!("SELECT {COLUMNS} FROM employees WHERE id = ? AND is_deleted = 0");
    let row = sqlx::query_as::<_, Employee>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Looks up employees by their human-facing numbers (for punch imports).
/// Unknown numbers are simply not returned.
pub async fn find_by_numbers(
    pool: &MySqlPool,
    numbers: &[String],
) -> Result<Vec<Employee>, AppError> {
    if numbers.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; numbers.len()].join(", ");
    let sql = format!(
        "SELECT {COLUMNS} FROM employees \
         WHERE is_deleted = 0 AND employee_number IN ({placeholders})"
    );
    let mut query = sqlx::query_as::<_, Employee>(&sql);
    for number in numbers {
        query = query.bind(number);
    }
    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}
