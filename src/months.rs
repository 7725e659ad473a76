use chrono::NaiveDate;

use crate::models::MonthLabel;

/// First month a schedule worksheet exists for.
pub const EPOCH: MonthLabel = MonthLabel {
    year: 2023,
    month: 5,
};

fn next_month(label: MonthLabel) -> MonthLabel {
    if label.month == 12 {
        MonthLabel {
            year: label.year + 1,
            month: 1,
        }
    } else {
        MonthLabel {
            year: label.year,
            month: label.month + 1,
        }
    }
}

fn previous_month(label: MonthLabel) -> MonthLabel {
    if label.month == 1 {
        MonthLabel {
            year: label.year - 1,
            month: 12,
        }
    } else {
        MonthLabel {
            year: label.year,
            month: label.month - 1,
        }
    }
}

/// Every selectable month from the month after `today` down to [`EPOCH`],
/// newest first. Uses real calendar-month steps, so each month between the
/// bounds appears exactly once.
pub fn selectable_months(today: NaiveDate) -> Vec<MonthLabel> {
    let mut labels = Vec::new();
    let mut cursor = next_month(MonthLabel::from_date(today));
    while cursor >= EPOCH {
        labels.push(cursor);
        cursor = previous_month(cursor);
    }
    labels
}

/// Where the calendar widget should open: today when looking at the current
/// month, otherwise the first day of the selected one.
pub fn calendar_anchor(selected: MonthLabel, today: NaiveDate) -> NaiveDate {
    if selected == MonthLabel::from_date(today) {
        today
    } else {
        selected.first_day()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectable_months_bounds() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let months = selectable_months(today);
        assert_eq!(months.first().unwrap().to_string(), "2024 July");
        assert_eq!(months.last().unwrap().to_string(), "2023 May");
        // May 2023 through July 2024 inclusive
        assert_eq!(months.len(), 15);
    }

    #[test]
    fn test_selectable_months_descending_unique() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let months = selectable_months(today);
        for pair in months.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }

    #[test]
    fn test_year_boundary() {
        let today = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let months = selectable_months(today);
        assert_eq!(months.first().unwrap().to_string(), "2024 January");
        assert_eq!(months[1].to_string(), "2023 December");
    }

    #[test]
    fn test_anchor_current_month_is_today() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let current = MonthLabel::from_date(today);
        assert_eq!(calendar_anchor(current, today), today);
    }

    #[test]
    fn test_anchor_other_month_is_first_day() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let label: MonthLabel = "2024 March".parse().unwrap();
        assert_eq!(
            calendar_anchor(label, today),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_day_count_does_not_skip_short_months() {
        // A 31-day-step walk can miss labels around February; a calendar
        // step never does.
        let today = NaiveDate::from_ymd_opt(2024, 3, 30).unwrap();
        let months = selectable_months(today);
        assert!(months.iter().any(|m| m.to_string() == "2024 February"));
    }
}
