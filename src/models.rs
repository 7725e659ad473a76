use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One selectable month, displayed and parsed as `"<year> <full month name>"`
/// (e.g. `"2024 June"`). The label doubles as the worksheet name on the sheet
/// side, so the textual form must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthLabel {
    pub year: i32,
    pub month: u32,
}

impl MonthLabel {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        // Validated at construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }
}

impl fmt::Display for MonthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first_day().format("%Y %B"))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid month label {0:?}, expected e.g. \"2024 June\"")]
pub struct ParseMonthLabelError(pub String);

impl FromStr for MonthLabel {
    type Err = ParseMonthLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let first = NaiveDate::parse_from_str(&format!("{} 1", s.trim()), "%Y %B %d")
            .map_err(|_| ParseMonthLabelError(s.to_string()))?;
        Ok(Self::from_date(first))
    }
}

impl Serialize for MonthLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthLabel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A worksheet row exactly as it comes off the sheet: every column loosely
/// typed, any of them possibly blank. The `date` column holds either a bare
/// day-of-month or a full date depending on who filled the sheet in.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawScheduleRow {
    pub date: Option<String>,
    pub day: Option<String>,
    #[serde(rename = "st time")]
    pub start_time: Option<String>,
    #[serde(rename = "end time")]
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub lang: Option<String>,
    pub class: Option<String>,
    pub cancelled: Option<String>,
    pub series: Option<String>,
    #[serde(rename = "drupal link")]
    pub registration_link: Option<String>,
}

impl RawScheduleRow {
    pub fn is_cancelled(&self) -> bool {
        flag_set(self.cancelled.as_deref())
    }

    pub fn is_series(&self) -> bool {
        flag_set(self.series.as_deref())
    }
}

/// Sheet flag columns arrive as "0"/"1" but numeric cells may come through
/// the CSV export as "0.0"/"1.0". Blank means unset.
fn flag_set(cell: Option<&str>) -> bool {
    cell.and_then(|s| s.trim().parse::<f64>().ok())
        .is_some_and(|v| v != 0.0)
}

/// One normalized class session. `start_time`/`end_time` stay `None` when the
/// raw cells could not be parsed; consumers must tolerate that rather than
/// assume the row was dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ClassEvent {
    #[schema(value_type = Option<String>, format = "date", example = "2024-06-15")]
    pub date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = "date-time", example = "2024-06-15T10:00:00")]
    pub start_time: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>, format = "date-time", example = "2024-06-15T11:00:00")]
    pub end_time: Option<NaiveDateTime>,
    /// Always recomputed from `date`; the sheet's own "day" column is ignored.
    pub day_of_week: Option<String>,
    pub title: String,
    pub location: String,
    pub language: String,
    /// Cleared once the class has started, see `schedule::expire_links`.
    pub registration_link: Option<String>,
}

/// Display projection of a [`ClassEvent`] in the shape the calendar widget
/// consumes. Only events with both timestamps present can be projected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub title: String,
    #[schema(example = "2024-06-15T10:00:00")]
    pub start: String,
    #[schema(example = "2024-06-15T11:00:00")]
    pub end: String,
    pub color: String,
    pub resource_id: String,
}

/// One lane of the calendar's resource view, derived 1:1 from the location
/// registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct CalendarResource {
    pub id: String,
    pub title: String,
}

/// Full payload for the calendar sink: where to open the view, which lanes
/// exist, and the projected events.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarView {
    #[schema(value_type = String, format = "date", example = "2024-06-01")]
    pub initial_date: NaiveDate,
    pub resources: Vec<CalendarResource>,
    pub events: Vec<CalendarEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_label_round_trip() {
        let label: MonthLabel = "2024 June".parse().unwrap();
        assert_eq!(label, MonthLabel { year: 2024, month: 6 });
        assert_eq!(label.to_string(), "2024 June");
        assert_eq!(label.first_day(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn test_month_label_rejects_garbage() {
        assert!("June 2024".parse::<MonthLabel>().is_err());
        assert!("2024".parse::<MonthLabel>().is_err());
        assert!("2024 Juneuary".parse::<MonthLabel>().is_err());
    }

    #[test]
    fn test_flag_cells() {
        let row = RawScheduleRow {
            cancelled: Some("1".into()),
            series: Some("0.0".into()),
            ..Default::default()
        };
        assert!(row.is_cancelled());
        assert!(!row.is_series());

        let blank = RawScheduleRow::default();
        assert!(!blank.is_cancelled());
        assert!(!blank.is_series());
    }
}
