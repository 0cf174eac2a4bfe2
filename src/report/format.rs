//! Terminal formatting for the seasonal correlation table.

use crate::domain::SeasonalCorrelation;

/// `[SEASON] ave: X max: Y min: Z` with 3-decimal coefficients.
pub fn format_summary_line(row: &SeasonalCorrelation) -> String {
    format!(
        "[{}] ave: {:.3} max: {:.3} min: {:.3}",
        row.season.label(),
        row.result.avg_coef,
        row.result.max_coef,
        row.result.min_coef
    )
}

/// One summary line per season, newline-separated.
pub fn format_summary(rows: &[SeasonalCorrelation]) -> String {
    rows.iter()
        .map(format_summary_line)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CorrelationResult, Season};

    fn row(season: Season, avg: f64, max: f64, min: f64) -> SeasonalCorrelation {
        SeasonalCorrelation {
            season,
            records: 10,
            result: CorrelationResult {
                avg_coef: avg,
                max_coef: max,
                min_coef: min,
            },
        }
    }

    #[test]
    fn summary_line_uses_three_decimals() {
        let line = format_summary_line(&row(Season::Summer, 0.1, -0.25, 1.0));
        assert_eq!(line, "[SUMMER] ave: 0.100 max: -0.250 min: 1.000");
    }

    #[test]
    fn summary_keeps_row_order() {
        let text = format_summary(&[
            row(Season::All, 0.5, 0.5, 0.5),
            row(Season::Winter, -0.123, 0.0, 0.999),
        ]);
        assert_eq!(
            text,
            "[ALL] ave: 0.500 max: 0.500 min: 0.500\n[WINTER] ave: -0.123 max: 0.000 min: 0.999"
        );
    }
}
