//! Text report renderer for a comparison result.

use std::fmt::Write;

use panchanga_recon::{Category, ComparisonResult, DiffRecord};

const RULE: &str =
    "======================================================================";

pub(crate) fn render(result: &ComparisonResult, threshold: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Comparison of Original vs Computed Panchanga Data");
    let _ = writeln!(out, "{}", RULE);

    for category in Category::ALL {
        let series = result.series(category);
        match series.stats() {
            Some(stats) => {
                let _ = writeln!(out);
                let _ = writeln!(out, "{} Comparison:", category.title());
                let _ = writeln!(out, "  Total comparisons: {}", stats.count);
                let _ = writeln!(out, "  Maximum difference: {:.2} minutes", stats.max_diff);
                let _ = writeln!(out, "  Average difference: {:.2} minutes", stats.avg_diff);
                let _ = writeln!(out, "  Median difference: {:.2} minutes", stats.median_diff);
                let _ = writeln!(out, "  Distribution of differences:");
                for bucket in &stats.distribution {
                    let _ = writeln!(
                        out,
                        "    {}: {} ({:.1}%)",
                        bucket.label, bucket.count, bucket.percent,
                    );
                }
            }
            None => {
                let _ = writeln!(out);
                let _ = writeln!(
                    out,
                    "{}: No matching data found for comparison",
                    category.title(),
                );
            }
        }
    }

    if result.masa_mismatches > 0 {
        let _ = writeln!(out);
        let _ = writeln!(out, "Lunar Month Mismatches: {}", result.masa_mismatches);
        for mismatch in &result.masa_diagnostics {
            let _ = writeln!(
                out,
                "  {} ({}) - Original: {}, Computed: {}",
                mismatch.day, mismatch.convention, mismatch.original, mismatch.computed,
            );
        }
    }

    if !result.coverage_violations.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Name Coverage Violations: {}",
            result.coverage_violations.len(),
        );
        for violation in &result.coverage_violations {
            let _ = writeln!(
                out,
                "  {} ({}) - Original: [{}], Computed: [{}]",
                violation.day,
                violation.category,
                violation.original_names.join(", "),
                violation.computed_names.join(", "),
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out);
    let _ = writeln!(out, "Dates with Large Differences (> {} minutes):", threshold);
    let _ = writeln!(out, "{}", RULE);

    for category in Category::ALL {
        let over: Vec<&DiffRecord> = result.series(category).over(threshold).collect();
        let _ = writeln!(out);
        if over.is_empty() {
            let _ = writeln!(out, "{}: No large differences found", category.title());
            continue;
        }
        let _ = writeln!(out, "{} Large Differences:", category.title());
        let mut last_day = None;
        for record in over {
            if last_day != Some(record.day) {
                let _ = writeln!(out, "  Date: {}", record.day);
                last_day = Some(record.day);
            }
            match &record.name {
                Some(name) => {
                    let _ = writeln!(
                        out,
                        "    {} ({}) - Original: {}, Computed: {}, Diff: {:.2} minutes",
                        name, record.field, record.original, record.computed, record.minutes,
                    );
                }
                None => {
                    let _ = writeln!(
                        out,
                        "    Sunrise - Original: {}, Computed: {}, Diff: {:.2} minutes",
                        record.original, record.computed, record.minutes,
                    );
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use panchanga_recon::{CoverageViolation, MasaConvention, MasaMismatch, TimeField};

    fn record(day: (i32, u32, u32), name: Option<&str>, field: TimeField, minutes: f64) -> DiffRecord {
        DiffRecord {
            day: NaiveDate::from_ymd_opt(day.0, day.1, day.2).unwrap(),
            name: name.map(String::from),
            field,
            original: "2025-06-10 10:00 AM".into(),
            computed: "2025-06-10 10:20 AM".into(),
            minutes,
        }
    }

    #[test]
    fn empty_result_reports_no_data() {
        let rendered = render(&ComparisonResult::default(), 15.0);
        assert!(rendered.starts_with("Comparison of Original vs Computed Panchanga Data"));
        assert!(rendered.contains("Tithi: No matching data found for comparison"));
        assert!(rendered.contains("Sunrise: No matching data found for comparison"));
        assert!(rendered.contains("Dates with Large Differences (> 15 minutes):"));
        assert!(rendered.contains("Yoga: No large differences found"));
        assert!(!rendered.contains("Lunar Month Mismatches"));
    }

    #[test]
    fn category_block_shows_stats_and_distribution() {
        let mut result = ComparisonResult::default();
        result.tithi.push(record((2025, 6, 10), Some("Shukla Dashami"), TimeField::StartTime, 2.0));
        result.tithi.push(record((2025, 6, 10), Some("Shukla Dashami"), TimeField::EndTime, 8.0));

        let rendered = render(&result, 15.0);
        assert!(rendered.contains("Tithi Comparison:"));
        assert!(rendered.contains("  Total comparisons: 2"));
        assert!(rendered.contains("  Maximum difference: 8.00 minutes"));
        assert!(rendered.contains("  Average difference: 5.00 minutes"));
        assert!(rendered.contains("  Median difference: 5.00 minutes"));
        assert!(rendered.contains("    < 5 minutes: 1 (50.0%)"));
        assert!(rendered.contains("    5-15 minutes: 1 (50.0%)"));
        assert!(rendered.contains("Tithi: No large differences found"));
    }

    #[test]
    fn large_differences_group_by_date() {
        let mut result = ComparisonResult::default();
        result.nakshatra.push(record((2025, 3, 1), Some("Rohini"), TimeField::StartTime, 25.0));
        result.nakshatra.push(record((2025, 3, 1), Some("Rohini"), TimeField::EndTime, 40.0));
        result.sunrise.push(record((2025, 3, 2), None, TimeField::Sunrise, 18.0));

        let rendered = render(&result, 15.0);
        assert!(rendered.contains("Nakshatra Large Differences:"));
        assert_eq!(rendered.matches("  Date: 2025-03-01").count(), 1);
        assert!(rendered.contains(
            "    Rohini (start_time) - Original: 2025-06-10 10:00 AM, \
             Computed: 2025-06-10 10:20 AM, Diff: 25.00 minutes"
        ));
        assert!(rendered.contains("Sunrise Large Differences:"));
        assert!(rendered.contains("    Sunrise - Original:"));
    }

    #[test]
    fn diagnostics_sections_render_when_present() {
        let mut result = ComparisonResult::default();
        result.masa_mismatches = 1;
        result.masa_diagnostics.push(MasaMismatch {
            day: "2025-06-10 12:00 AM".into(),
            convention: MasaConvention::Purnima,
            original: "Ashadha".into(),
            computed: "Shravana".into(),
        });
        result.coverage_violations.push(CoverageViolation {
            category: Category::Yoga,
            day: "2025-06-10 12:00 AM".into(),
            original_names: vec!["Sadhya".into()],
            computed_names: vec!["Shubha".into()],
        });

        let rendered = render(&result, 15.0);
        assert!(rendered.contains("Lunar Month Mismatches: 1"));
        assert!(rendered.contains(
            "  2025-06-10 12:00 AM (purnima) - Original: Ashadha, Computed: Shravana"
        ));
        assert!(rendered.contains("Name Coverage Violations: 1"));
        assert!(rendered.contains(
            "  2025-06-10 12:00 AM (yoga) - Original: [Sadhya], Computed: [Shubha]"
        ));
    }

    #[test]
    fn custom_threshold_appears_in_header() {
        let rendered = render(&ComparisonResult::default(), 30.0);
        assert!(rendered.contains("Dates with Large Differences (> 30 minutes):"));
    }
}
