//! Tenure counter for the current role

use chrono::{Datelike, NaiveDate};

use crate::config::Experience;

/// Whole months in a role, counting the current month once its day-of-month
/// is reached. Never less than one.
pub fn tenure_months(start: NaiveDate, today: NaiveDate) -> u32 {
    let mut months = (today.year() - start.year()) * 12 + today.month() as i32 - start.month() as i32;
    if today.day() >= start.day() {
        months += 1;
    }
    months.max(1) as u32
}

pub fn format_tenure(months: u32) -> String {
    format!("{} mos", months)
}

/// The role shown in the header: the first configured one
pub fn current_role(experience: &[Experience]) -> Option<&Experience> {
    experience.first()
}

/// Tenure label for `role`, or `None` when its start date does not parse
pub fn tenure_label(role: &Experience, today: NaiveDate) -> Option<String> {
    role.start().map(|start| format_tenure(tenure_months(start, today)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_day_counts_one_month() {
        assert_eq!(tenure_months(date(2025, 11, 1), date(2025, 11, 1)), 1);
    }

    #[test]
    fn test_counts_current_month_once_day_reached() {
        assert_eq!(tenure_months(date(2025, 11, 1), date(2026, 1, 1)), 3);
        assert_eq!(tenure_months(date(2025, 11, 15), date(2026, 1, 14)), 2);
        assert_eq!(tenure_months(date(2025, 11, 15), date(2026, 1, 15)), 3);
    }

    #[test]
    fn test_crosses_years() {
        assert_eq!(tenure_months(date(2023, 6, 10), date(2025, 6, 9)), 24);
    }

    #[test]
    fn test_future_start_clamps_to_one() {
        assert_eq!(tenure_months(date(2026, 3, 1), date(2026, 1, 1)), 1);
    }

    #[test]
    fn test_tenure_label() {
        let role = Experience {
            company: "Jspark AI".to_string(),
            company_url: String::new(),
            role: "SDE Intern".to_string(),
            period: "Nov 2025 - Present".to_string(),
            start_date: "2025-11-01".to_string(),
            description: String::new(),
            linkedin: String::new(),
        };
        assert_eq!(tenure_label(&role, date(2026, 10, 18)).as_deref(), Some("12 mos"));
        assert_eq!(format_tenure(3), "3 mos");

        let broken = Experience {
            start_date: "soon".to_string(),
            ..role
        };
        assert_eq!(tenure_label(&broken, date(2026, 10, 18)), None);
    }
}
