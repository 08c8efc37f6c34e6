use crate::components::schedule::models::Meeting;
use crate::error::CalResult;
use crate::utils::time::{format_datetime, format_day};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Render the schedule for one day as text
///
/// Filters `meetings` down to those beginning on `day`. Falls back to a
/// one-line notice when the day is free.
pub fn render_day(meetings: &[Meeting], day: NaiveDate) -> String {
    let on_day: Vec<&Meeting> = meetings
        .iter()
        .filter(|meeting| meeting.occurs_on(day))
        .collect();

    if on_day.is_empty() {
        return format!("No meetings planned for {}", format_day(day));
    }

    let mut out = format!("Schedule for {}", format_day(day));
    for meeting in on_day {
        out.push_str("\n-----");
        out.push_str(&format!("\nMeeting #{}", meeting.id));
        out.push_str(&format!("\nBegins at   {}", format_datetime(meeting.begin)));
        out.push_str(&format!("\nEnds at     {}", format_datetime(meeting.end)));
        match meeting.notify_at {
            Some(at) => out.push_str(&format!("\nNotify at   {}", format_datetime(at))),
            None => out.push_str("\nNo notification set"),
        }
    }
    out
}

/// Print the schedule for one day to stdout
pub fn print_console(meetings: &[Meeting], day: NaiveDate) {
    println!("{}", render_day(meetings, day));
}

/// Write the schedule for one day to `<dir>/<day>.txt`
///
/// Creates the directory if needed and returns the path written.
pub fn write_file(meetings: &[Meeting], day: NaiveDate, dir: &Path) -> CalResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.txt", format_day(day)));
    std::fs::write(&path, format!("{}\n", render_day(meetings, day)))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 6, 1).unwrap()
    }

    fn meeting(id: i64, day: u32, hour: u32) -> Meeting {
        Meeting::with_id(
            id,
            Utc.with_ymd_and_hms(2030, 6, day, hour, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2030, 6, day, hour + 1, 30, 0).unwrap(),
            None,
        )
    }

    #[test]
    fn empty_day_renders_fallback_notice() {
        let rendered = render_day(&[], day());
        assert_eq!(rendered, "No meetings planned for 01.06.2030");
    }

    #[test]
    fn meetings_on_other_days_are_filtered_out() {
        let meetings = vec![meeting(1, 2, 10)];
        let rendered = render_day(&meetings, day());
        assert_eq!(rendered, "No meetings planned for 01.06.2030");
    }

    #[test]
    fn renders_each_meeting_with_times() {
        let meetings = vec![meeting(1, 1, 10), meeting(2, 1, 14)];
        let rendered = render_day(&meetings, day());
        assert!(rendered.starts_with("Schedule for 01.06.2030"));
        assert!(rendered.contains("Meeting #1"));
        assert!(rendered.contains("Begins at   01.06.2030 10:00"));
        assert!(rendered.contains("Ends at     01.06.2030 11:30"));
        assert!(rendered.contains("Meeting #2"));
        assert!(rendered.contains("Begins at   01.06.2030 14:00"));
        assert_eq!(rendered.matches("No notification set").count(), 2);
    }

    #[test]
    fn renders_notification_time_when_set() {
        let mut with_note = meeting(3, 1, 10);
        with_note.notify_at = Some(Utc.with_ymd_and_hms(2030, 6, 1, 9, 45, 0).unwrap());
        let rendered = render_day(&[with_note], day());
        assert!(rendered.contains("Notify at   01.06.2030 09:45"));
        assert!(!rendered.contains("No notification set"));
    }

    #[test]
    fn write_file_names_the_file_after_the_day() {
        let dir = tempfile::tempdir().unwrap();
        let meetings = vec![meeting(1, 1, 10)];
        let path = write_file(&meetings, day(), dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "01.06.2030.txt");
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, format!("{}\n", render_day(&meetings, day())));
    }

    #[test]
    fn write_file_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("output");
        let path = write_file(&[], day(), &nested).unwrap();
        assert!(path.exists());
    }
}
