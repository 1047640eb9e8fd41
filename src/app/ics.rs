use crate::domain::model::DeadlineReport;
use chrono::{Days, NaiveDate};

const PRODID: &str = "-//cpr-deadline//Deadline Calculator//EN";
const MAX_LINE_OCTETS: usize = 75;

fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

/// Folds a content line at 75 octets without splitting a UTF-8 character.
fn fold_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut width = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(ch);
        width += len;
    }
    out
}

struct Event<'a> {
    uid: String,
    start: String,
    end: String,
    summary: &'a str,
    description: String,
}

impl Event<'_> {
    fn all_day(uid: String, date: NaiveDate, summary: &str, description: String) -> Event<'_> {
        let end = date.checked_add_days(Days::new(1)).unwrap_or(date);
        Event {
            uid,
            start: format!("DTSTART;VALUE=DATE:{}", date.format("%Y%m%d")),
            end: format!("DTEND;VALUE=DATE:{}", end.format("%Y%m%d")),
            summary,
            description,
        }
    }

    fn write(&self, stamp: &str, lines: &mut Vec<String>) {
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}", self.uid));
        lines.push(format!("DTSTAMP:{}", stamp));
        lines.push(self.start.clone());
        lines.push(self.end.clone());
        lines.push(format!("SUMMARY:{}", escape_text(self.summary)));
        lines.push(format!("DESCRIPTION:{}", escape_text(&self.description)));
        lines.push("END:VEVENT".to_string());
    }
}

/// iCalendar document with the transmission, deemed service and filing deadline events.
pub fn render_calendar(report: &DeadlineReport) -> String {
    let sent_at = report.transmission.timestamp();
    let stamp = sent_at.format("%Y%m%dT%H%M%S").to_string();
    // DTSTAMP 必須為 UTC 格式；取傳送時間以維持輸出可重現
    let dtstamp = sent_at.and_utc().format("%Y%m%dT%H%M%SZ").to_string();
    let key = format!("{}-{}", stamp, report.jurisdiction);
    let sent_end = sent_at + chrono::Duration::hours(1);

    let events = [
        Event {
            uid: format!("{}-transmission@cpr-deadline", key),
            start: format!("DTSTART:{}", stamp),
            end: format!("DTEND:{}", sent_end.format("%Y%m%dT%H%M%S")),
            summary: "CPR: Document Transmission",
            description: "Document sent/transmitted via electronic means or post.".to_string(),
        },
        Event::all_day(
            format!("{}-deemed-service@cpr-deadline", key),
            report.result.deemed_service_date,
            "CPR: Deemed Service",
            "The date the document is legally deemed served under CPR rules.".to_string(),
        ),
        Event::all_day(
            format!("{}-filing-deadline@cpr-deadline", key),
            report.result.filing_deadline,
            "CPR FILING DEADLINE",
            format!(
                "CRITICAL: Final date for filing response or next step. Includes {} days agreed extension. Holiday data: {}.",
                report.result.extension_days, report.provenance
            ),
        ),
    ];

    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", PRODID),
        "CALSCALE:GREGORIAN".to_string(),
    ];
    for event in &events {
        event.write(&dtstamp, &mut lines);
    }
    lines.push("END:VCALENDAR".to_string());

    let mut out = lines
        .iter()
        .map(|line| fold_line(line))
        .collect::<Vec<_>>()
        .join("\r\n");
    out.push_str("\r\n");
    out
}
