use crate::domain::model::{DeadlineReport, ServiceDeadlineReport, SourceTier};
use chrono::NaiveDate;
use std::fmt::Write;

const LONG_DATE: &str = "%A, %d %B %Y";
const RULE: &str = "------------------------------------------------------------";

fn long_date(date: NaiveDate) -> String {
    date.format(LONG_DATE).to_string()
}

/// Renders the audit summary printed by the CLI.
pub fn render_text(report: &DeadlineReport) -> String {
    let result = &report.result;
    let mut out = String::new();

    // 寫入 String 不會失敗
    let _ = writeln!(out, "--- CPR LEGAL TOOLKIT: DEADLINE CALCULATOR ---");
    let _ = writeln!(out, "Jurisdiction:         {}", report.jurisdiction);
    let _ = writeln!(
        out,
        "Transmission:         {} at {}",
        long_date(report.transmission.date()),
        report.transmission.time().format("%H:%M")
    );
    let _ = writeln!(
        out,
        "Effective Step Date:  {}",
        long_date(result.effective_step_date)
    );
    if result.effective_step_date != report.transmission.date() {
        let _ = writeln!(
            out,
            "                      (sent after 16:30 or on a non-business day, CPR 6.26)"
        );
    }
    let _ = writeln!(out, "Agreed Extension:     {} Days", result.extension_days);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(
        out,
        "DEEMED SERVICE DATE:  {}",
        long_date(result.deemed_service_date)
    );
    let _ = writeln!(out, "FILING DEADLINE:      {}", long_date(result.filing_deadline));
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Holiday data: {}", report.provenance);

    if report.holiday_source == SourceTier::Empty {
        let _ = writeln!(
            out,
            "WARNING: bank holidays were not applied; verify the dates manually."
        );
    }

    out
}

/// Summary for a deadline counted from a known date of service (CPR 10.3 and 2.8).
pub fn render_service_text(report: &ServiceDeadlineReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "--- CPR LEGAL TOOLKIT: DEADLINE CALCULATOR ---");
    let _ = writeln!(out, "Jurisdiction:         {}", report.jurisdiction);
    let _ = writeln!(out, "Date of Service:      {}", long_date(report.service_date));
    let _ = writeln!(out, "Agreed Extension:     {} Days", report.extension_days);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "FILING DEADLINE:      {}", long_date(report.filing_deadline));
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Holiday data: {}", report.provenance);

    if report.holiday_source == SourceTier::Empty {
        let _ = writeln!(
            out,
            "WARNING: bank holidays were not applied; verify the dates manually."
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DeemedServiceResult, Jurisdiction, Transmission};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample(tier: SourceTier) -> DeadlineReport {
        DeadlineReport {
            jurisdiction: Jurisdiction::EnglandAndWales,
            transmission: Transmission::parse("2023-10-03", "17:00").unwrap(),
            result: DeemedServiceResult {
                effective_step_date: d(2023, 10, 4),
                deemed_service_date: d(2023, 10, 6),
                filing_deadline: d(2023, 11, 3),
                extension_days: 14,
            },
            holiday_source: tier,
            holiday_data_as_of: None,
            provenance: "bundled holiday snapshot shipped with this tool".to_string(),
        }
    }

    #[test]
    fn test_render_contains_key_dates() {
        let text = render_text(&sample(SourceTier::Seed));

        assert!(text.contains("DEEMED SERVICE DATE:  Friday, 06 October 2023"));
        assert!(text.contains("FILING DEADLINE:      Friday, 03 November 2023"));
        assert!(text.contains("Agreed Extension:     14 Days"));
        assert!(text.contains("CPR 6.26"));
        assert!(text.contains("bundled holiday snapshot"));
        assert!(!text.contains("WARNING"));
    }

    #[test]
    fn test_render_warns_without_holidays() {
        let text = render_text(&sample(SourceTier::Empty));
        assert!(text.contains("WARNING"));
    }

    #[test]
    fn test_render_service_deadline() {
        let report = ServiceDeadlineReport {
            jurisdiction: Jurisdiction::Scotland,
            service_date: d(2025, 12, 20),
            filing_deadline: d(2026, 1, 5),
            extension_days: 0,
            holiday_source: SourceTier::Cache,
            holiday_data_as_of: None,
            provenance: "locally cached holiday data".to_string(),
        };

        let text = render_service_text(&report);

        assert!(text.contains("Date of Service:      Saturday, 20 December 2025"));
        assert!(text.contains("FILING DEADLINE:      Monday, 05 January 2026"));
        assert!(!text.contains("DEEMED SERVICE DATE"));
    }
}
