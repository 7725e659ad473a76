use icalendar::{Calendar, Component, Event, EventLike};

use crate::models::ClassEvent;

/// Exports a filtered schedule as an iCalendar file. Events without both
/// timestamps cannot be exported and are skipped, same as in the calendar
/// projection.
#[derive(Clone, Default)]
pub struct ICalExporter;

impl ICalExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, events: &[ClassEvent]) -> Vec<u8> {
        if events.is_empty() {
            return Vec::new();
        }

        let mut calendar = Calendar::new();
        calendar.name("Teaching Schedule");

        for item in events {
            let (Some(start), Some(end)) = (item.start_time, item.end_time) else {
                continue;
            };

            let mut event = Event::new();
            event.summary(&item.title);
            event.starts(start);
            event.ends(end);
            event.location(&item.location);
            let mut description = format!("Language: {}", item.language);
            if let Some(link) = &item.registration_link {
                description.push_str(&format!("\nRegister: {link}"));
            }
            event.description(&description);
            event.uid(&format!(
                "{}-{}-{}-teaching-schedule",
                start.format("%Y%m%dT%H%M%S"),
                item.title.replace(' ', "-"),
                item.location.replace(' ', "-")
            ));
            calendar.push(event);
        }

        calendar.to_string().into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;

    fn event(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> ClassEvent {
        ClassEvent {
            date: start.map(|s| s.date()),
            start_time: start,
            end_time: end,
            day_of_week: Some("Saturday".into()),
            title: "Intro to Email".into(),
            location: "Online".into(),
            language: "en".into(),
            registration_link: Some("https://example.org/r/1".into()),
        }
    }

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_generate_single_event() {
        let bytes = ICalExporter::new().generate(&[event(Some(at(10)), Some(at(11)))]);
        let body = String::from_utf8(bytes).unwrap();
        assert!(body.contains("BEGIN:VEVENT"));
        assert!(body.contains("Intro to Email"));
        assert!(body.contains("https://example.org/r/1"));
    }

    #[test]
    fn test_generate_skips_null_timestamps() {
        let bytes = ICalExporter::new().generate(&[event(None, Some(at(11)))]);
        let body = String::from_utf8(bytes).unwrap();
        assert!(!body.contains("BEGIN:VEVENT"));
    }

    #[test]
    fn test_generate_empty() {
        assert!(ICalExporter::new().generate(&[]).is_empty());
    }
}
