use std::fmt;

/// Summary statistics of one numeric column, in the layout of a dataframe
/// `describe()`. Unknown values are excluded; `NaN` marks an undefined
/// statistic (e.g. the standard deviation of a single value).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut sorted: Vec<f64> = values.into_iter().collect();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        if count == 0 {
            return Self {
                count,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q25: f64::NAN,
                q50: f64::NAN,
                q75: f64::NAN,
                max: f64::NAN,
            };
        }

        let n = count as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let std = if count > 1 {
            let squares: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (squares / (n - 1.0)).sqrt()
        } else {
            f64::NAN
        };

        Self {
            count,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            q50: quantile(&sorted, 0.50),
            q75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        }
    }

    fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.q50,
            self.q75,
            self.max,
        ]
    }
}

const STAT_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Linear interpolation between the closest ranks of a sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

/// `describe()` output for a set of named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub columns: Vec<(String, ColumnSummary)>,
}

impl Describe {
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, summary)| summary)
    }
}

impl fmt::Display for Describe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|(_, summary)| {
                summary.values().iter().map(|&value| format_stat(value)).collect()
            })
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .zip(&cells)
            .map(|((name, _), column)| {
                column.iter().map(String::len).chain([name.len()]).max().unwrap_or(0)
            })
            .collect();

        write!(f, "{:6}", "")?;
        for ((name, _), &width) in self.columns.iter().zip(&widths) {
            write!(f, "  {name:>width$}")?;
        }
        writeln!(f)?;

        for (row, label) in STAT_LABELS.iter().enumerate() {
            write!(f, "{label:6}")?;
            for (column, &width) in cells.iter().zip(&widths) {
                write!(f, "  {:>width$}", column[row])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.6}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_summary_matches_dataframe_describe() {
        let summary = ColumnSummary::from_values([4.0, 1.0, 3.0, 2.0]);

        assert_eq!(summary.count, 4);
        assert!(approx(summary.mean, 2.5));
        assert!(approx(summary.std, (5.0f64 / 3.0).sqrt()));
        assert!(approx(summary.min, 1.0));
        assert!(approx(summary.q25, 1.75));
        assert!(approx(summary.q50, 2.5));
        assert!(approx(summary.q75, 3.25));
        assert!(approx(summary.max, 4.0));
    }

    #[test]
    fn test_single_value_has_undefined_std() {
        let summary = ColumnSummary::from_values([7.0]);
        assert_eq!(summary.count, 1);
        assert!(summary.std.is_nan());
        assert!(approx(summary.q25, 7.0));
        assert!(approx(summary.q75, 7.0));
    }

    #[test]
    fn test_empty_column_is_all_nan() {
        let summary = ColumnSummary::from_values([]);
        assert_eq!(summary.count, 0);
        assert!(summary.mean.is_nan());
        assert!(summary.max.is_nan());
    }

    #[test]
    fn test_display_lists_every_statistic() {
        let describe = Describe {
            columns: vec![
                ("Height".to_string(), ColumnSummary::from_values([10.0, 20.0])),
                ("Depth".to_string(), ColumnSummary::from_values([3.0])),
            ],
        };
        let text = describe.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 9);
        assert!(lines[0].contains("Height") && lines[0].contains("Depth"));
        assert!(lines[1].starts_with("count") && lines[1].contains("2.000000"));
        assert!(lines[2].starts_with("mean") && lines[2].contains("15.000000"));
        assert!(lines[3].starts_with("std") && lines[3].contains("NaN"));
        assert!(lines[8].starts_with("max") && lines[8].contains("20.000000"));
        assert_eq!(describe.column("Depth").unwrap().count, 1);
        assert!(describe.column("Area").is_none());
    }
}
