use std::collections::HashSet;

use chrono::NaiveDate;

use super::Department;

/// Builds the next free order number for `department` on `date`.
///
/// Format is `{CODE}{MMDDYY}{n}` where `n` is the smallest positive integer
/// whose candidate is not already in `existing`.
#[must_use]
pub fn generate_order_number(
    department: Department,
    date: NaiveDate,
    existing: &HashSet<String>,
) -> String {
    let prefix = format!("{}{}", department.code(), date.format("%m%d%y"));

    // Terminates: `existing` is finite, so some suffix is always free.
    let mut suffix = 1u64;
    loop {
        let candidate = format!("{prefix}{suffix}");
        if !existing.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}
