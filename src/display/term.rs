//! Term display formatting

use chrono::NaiveDate;

use crate::models::{Term, TermPhase};
use crate::services::TermProgress;

/// Format the term calendar, newest first, with each term's phase
pub fn format_term_list(terms: &[Term], today: NaiveDate) -> String {
    if terms.is_empty() {
        return "No terms found.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<14}  {:<10}  {:<10}  {:>5}  {}\n",
        "ID", "Term", "Start", "End", "Weeks", "Status"
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<14}  {:-<10}  {:-<10}  {:->5}  {:-<9}\n",
        "", "", "", "", "", ""
    ));

    for term in terms {
        let progress = TermProgress::of(term, today);
        let status = match progress.phase {
            TermPhase::Current => format!("Current ({}%)", progress.percent_complete),
            phase => phase.to_string(),
        };
        output.push_str(&format!(
            "{:<12}  {:<14}  {:<10}  {:<10}  {:>5}  {}\n",
            term.id,
            term.name(),
            term.start_date.format("%Y-%m-%d"),
            term.end_date.format("%Y-%m-%d"),
            progress.duration_weeks,
            status
        ));
    }

    output
}

/// Format one term with its progress against `today`
pub fn format_term_details(term: &Term, progress: &TermProgress) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", term.name()));
    output.push_str(&format!(
        "  Dates:      {} to {}\n",
        term.start_date.format("%Y-%m-%d"),
        term.end_date.format("%Y-%m-%d")
    ));
    output.push_str(&format!(
        "  Length:     {} days ({} weeks)\n",
        progress.total_days, progress.duration_weeks
    ));
    output.push_str(&format!("  Status:     {}\n", progress.phase));

    if progress.phase == TermPhase::Current {
        output.push_str(&format!(
            "  Progress:   {} {}%\n",
            progress_bar(progress.percent_complete, 20),
            progress.percent_complete
        ));
        output.push_str(&format!(
            "  Elapsed:    {} days, {} remaining\n",
            progress.days_elapsed, progress.days_remaining
        ));
    }

    output
}

fn progress_bar(percent: u32, width: usize) -> String {
    let filled = (percent.min(100) as usize * width) / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn terms() -> Vec<Term> {
        vec![
            Term::new(1, 2025, date(2025, 1, 14), date(2025, 4, 11)),
            Term::new(3, 2024, date(2024, 9, 10), date(2024, 12, 6)),
        ]
    }

    #[test]
    fn test_format_term_list() {
        let output = format_term_list(&terms(), date(2025, 2, 25));
        assert!(output.contains("term1-2025"));
        assert!(output.contains("Current ("));
        assert!(output.contains("Completed"));
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_term_list(&[], date(2025, 1, 1)), "No terms found.");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 4), "[....]");
        assert_eq!(progress_bar(50, 4), "[##..]");
        assert_eq!(progress_bar(150, 4), "[####]");
    }

    #[test]
    fn test_format_details_of_current_term() {
        let term = &terms()[0];
        let progress = TermProgress::of(term, date(2025, 2, 25));
        let output = format_term_details(term, &progress);
        assert!(output.contains("Status:     Current"));
        assert!(output.contains("Progress:"));
        assert!(output.contains("remaining"));
    }
}
