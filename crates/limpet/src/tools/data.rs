//! Summary statistics over CSV data.
//!
//! A pure tool: no sandbox, no network. It consumes CSV text directly,
//! typically piped from the stock history tool, and describes every numeric
//! column. A column counts as numeric when all of its non-empty cells parse
//! as numbers.

use async_trait::async_trait;

use crate::error::ToolError;
use crate::tool::Tool;
use crate::wire::strip_csv_prefixes;

const STAT_ROWS: &[&str] = &["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

#[derive(Debug)]
struct ColumnStats {
    name: String,
    count: usize,
    mean: f64,
    std: f64,
    quartiles: [f64; 5],
}

impl ColumnStats {
    /// Describe a column, or `None` when it has no parseable values.
    fn describe(name: &str, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        // Sample standard deviation, undefined for a single value.
        let std = if count > 1 {
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            var.sqrt()
        } else {
            f64::NAN
        };
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let quartiles = [
            quantile(&sorted, 0.0),
            quantile(&sorted, 0.25),
            quantile(&sorted, 0.5),
            quantile(&sorted, 0.75),
            quantile(&sorted, 1.0),
        ];
        Some(Self {
            name: name.to_string(),
            count,
            mean,
            std,
            quartiles,
        })
    }

    fn stat(&self, row: &str) -> String {
        let value = match row {
            "count" => return self.count.to_string(),
            "mean" => self.mean,
            "std" => self.std,
            "min" => self.quartiles[0],
            "25%" => self.quartiles[1],
            "50%" => self.quartiles[2],
            "75%" => self.quartiles[3],
            _ => self.quartiles[4],
        };
        if value.is_nan() {
            "NaN".to_string()
        } else {
            format!("{value:.6}")
        }
    }
}

/// Linearly interpolated quantile over sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Split a CSV line into cells. Plain comma splitting: the data this tool
/// sees (price history, table extracts) carries no quoted fields.
fn split_row(line: &str) -> Vec<&str> {
    line.split(',').map(str::trim).collect()
}

/// Describe the numeric columns of pasted CSV data.
#[derive(Debug, Default)]
pub struct CsvStatisticsTool;

impl CsvStatisticsTool {
    /// Stateless tool.
    pub fn new() -> Self {
        Self
    }

    fn analyze(data: &str) -> Result<Vec<ColumnStats>, ToolError> {
        let data = strip_csv_prefixes(data);
        if data.is_empty() {
            return Err(ToolError::InvalidInput(
                "input CSV data is empty".to_string(),
            ));
        }
        let mut lines = data.lines().filter(|l| !l.trim().is_empty());
        let headers: Vec<String> = match lines.next() {
            Some(header) => split_row(header).iter().map(|h| h.to_string()).collect(),
            None => {
                return Err(ToolError::InvalidInput(
                    "input CSV data is empty".to_string(),
                ));
            }
        };

        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
        let mut numeric: Vec<bool> = vec![true; headers.len()];
        let mut rows = 0usize;
        for line in lines {
            rows += 1;
            let cells = split_row(line);
            for (i, values) in columns.iter_mut().enumerate() {
                let cell = cells.get(i).copied().unwrap_or("");
                if cell.is_empty() {
                    continue;
                }
                match cell.parse::<f64>() {
                    Ok(v) => values.push(v),
                    Err(_) => numeric[i] = false,
                }
            }
        }
        if rows == 0 {
            return Err(ToolError::InvalidInput(
                "CSV data contains a header but no rows".to_string(),
            ));
        }

        let mut stats = Vec::new();
        for ((name, values), is_numeric) in headers.iter().zip(&columns).zip(&numeric) {
            if !*is_numeric {
                continue;
            }
            if let Some(column) = ColumnStats::describe(name, values) {
                stats.push(column);
            }
        }
        if stats.is_empty() {
            return Err(ToolError::InvalidInput(
                "no numeric columns found in the provided CSV data".to_string(),
            ));
        }
        Ok(stats)
    }

    fn render(stats: &[ColumnStats]) -> String {
        let label_width = STAT_ROWS.iter().map(|r| r.len()).max().unwrap_or(0);
        let widths: Vec<usize> = stats
            .iter()
            .map(|s| {
                STAT_ROWS
                    .iter()
                    .map(|&row| s.stat(row).len())
                    .chain(std::iter::once(s.name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&" ".repeat(label_width));
        for (s, &w) in stats.iter().zip(&widths) {
            out.push_str(&format!("  {:>w$}", s.name));
        }
        out.push('\n');
        for &row in STAT_ROWS {
            out.push_str(&format!("{row:<label_width$}"));
            for (s, &w) in stats.iter().zip(&widths) {
                out.push_str(&format!("  {:>w$}", s.stat(row)));
            }
            out.push('\n');
        }
        out
    }
}

#[async_trait]
impl Tool for CsvStatisticsTool {
    fn name(&self) -> &str {
        "csv_statistics"
    }

    fn description(&self) -> &str {
        "Calculate summary statistics (count, mean, std, min, quartiles, max) for numeric CSV columns.\n\
         Input is multi-line CSV text including a header row, for example the \
         output of the stock_history tool; any leading 'Success:' or \
         'CSV Data:' lines are stripped automatically. Output is a statistics \
         table covering every numeric column."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let stats = Self::analyze(input)?;
        Ok(format!(
            "Summary Statistics for Numeric Columns:\n{}",
            Self::render(&stats)
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Date,Close,Volume\n2024-01-01,10.0,100\n2024-01-02,20.0,300\n2024-01-03,30.0,200\n";

    #[test]
    fn test_analyze_selects_numeric_columns_only() {
        let stats = CsvStatisticsTool::analyze(SAMPLE).unwrap();
        let names: Vec<&str> = stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Close", "Volume"]);
    }

    #[test]
    fn test_analyze_basic_statistics() {
        let stats = CsvStatisticsTool::analyze(SAMPLE).unwrap();
        let close = &stats[0];
        assert_eq!(close.count, 3);
        assert!((close.mean - 20.0).abs() < 1e-9);
        assert!((close.std - 10.0).abs() < 1e-9);
        assert!((close.quartiles[0] - 10.0).abs() < 1e-9);
        assert!((close.quartiles[2] - 20.0).abs() < 1e-9);
        assert!((close.quartiles[4] - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!((quantile(&sorted, 0.25) - 1.75).abs() < 1e-9);
        assert!((quantile(&sorted, 0.5) - 2.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_invoke_strips_framing_prefixes() {
        let framed = format!("Success: fetched.\nCSV Data:\n{SAMPLE}");
        let tool = CsvStatisticsTool::new();
        let out = tool.invoke(&framed).await.unwrap();
        assert!(out.starts_with("Summary Statistics for Numeric Columns:"));
        assert!(out.contains("Close"));
        assert!(out.contains("mean"));
    }

    #[tokio::test]
    async fn test_invoke_errors() {
        let tool = CsvStatisticsTool::new();
        assert!(tool.invoke("").await.is_err());
        assert!(tool.invoke("OnlyAHeader,Columns").await.is_err());
        assert!(tool.invoke("Name,City\nalice,paris\n").await.is_err());
    }

    #[test]
    fn test_render_aligns_columns() {
        let stats = CsvStatisticsTool::analyze(SAMPLE).unwrap();
        let table = CsvStatisticsTool::render(&stats);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 1 + STAT_ROWS.len());
        // Header and every stat row end at the same column.
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
    }

    #[test]
    fn test_single_value_column_has_nan_std() {
        let stats = CsvStatisticsTool::analyze("X\n42\n").unwrap();
        assert_eq!(stats[0].stat("std"), "NaN");
        assert_eq!(stats[0].stat("count"), "1");
    }
}
