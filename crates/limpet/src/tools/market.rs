//! Stock history tool backed by the Yahoo Finance chart API.

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;

use crate::error::ToolError;
use crate::limits::ToolLimits;
use crate::tool::Tool;
use crate::wire::split2;

const CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Accepted history periods, mapped directly to the API's `range` values.
const VALID_PERIODS: &[&str] = &[
    "1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
];

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteBlock>,
}

/// Per-field series; entries are null for days without a trade.
#[derive(Debug, Default, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Fetch daily OHLCV history for a ticker as CSV.
#[derive(Debug)]
pub struct StockHistoryTool {
    client: reqwest::Client,
    limits: ToolLimits,
    base_url: String,
}

impl StockHistoryTool {
    /// Tool using `client` for requests.
    pub fn new(client: reqwest::Client, limits: ToolLimits) -> Self {
        Self {
            client,
            limits,
            base_url: CHART_BASE_URL.to_string(),
        }
    }

    /// Point the tool at a different endpoint. Used by tests.
    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn parse_input(input: &str) -> Result<(String, String), ToolError> {
        let (ticker, period) = split2(input, "TICKER|PERIOD")?;
        let ticker = ticker.trim().to_uppercase();
        let period = period.trim().to_lowercase();
        if ticker.is_empty() {
            return Err(ToolError::InvalidInput(
                "ticker symbol must not be empty".to_string(),
            ));
        }
        if !VALID_PERIODS.contains(&period.as_str()) {
            return Err(ToolError::InvalidInput(format!(
                "invalid period '{period}'; valid periods: {}",
                VALID_PERIODS.join(", ")
            )));
        }
        Ok((ticker, period))
    }

    /// Flatten the chart response into CSV rows, newest last, dropping days
    /// without a close and keeping only the trailing row budget.
    fn to_csv(&self, result: &ChartResult) -> String {
        let quote = result.indicators.quote.first();
        let mut rows = Vec::new();
        for (i, &ts) in result.timestamp.iter().enumerate() {
            let field = |series: &[Option<f64>]| series.get(i).copied().flatten();
            let (open, high, low, close, volume) = match quote {
                Some(q) => (
                    field(&q.open),
                    field(&q.high),
                    field(&q.low),
                    field(&q.close),
                    q.volume.get(i).copied().flatten(),
                ),
                None => (None, None, None, None, None),
            };
            let Some(close) = close else { continue };
            let date = DateTime::from_timestamp(ts, 0)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            let fmt = |v: Option<f64>| v.map(|v| format!("{v:.2}")).unwrap_or_default();
            rows.push(format!(
                "{date},{},{},{},{close:.2},{}",
                fmt(open),
                fmt(high),
                fmt(low),
                volume.map(|v| v.to_string()).unwrap_or_default()
            ));
        }

        let cap = self.limits.max_history_rows;
        if rows.len() > cap {
            rows.drain(..rows.len() - cap);
        }
        let mut csv = String::from("Date,Open,High,Low,Close,Volume\n");
        for row in &rows {
            csv.push_str(row);
            csv.push('\n');
        }
        csv
    }
}

#[async_trait]
impl Tool for StockHistoryTool {
    fn name(&self) -> &str {
        "stock_history"
    }

    fn description(&self) -> &str {
        "Fetch historical stock data (Date, Open, High, Low, Close, Volume) as CSV.\n\
         Input format: 'TICKER|PERIOD', for example 'AAPL|1y' or 'MRF.NS|6mo'. \
         Valid periods: 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max. \
         Output starts with 'Success: ...' followed by 'CSV Data:' and the \
         rows, oldest first; long histories keep only the most recent rows."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let (ticker, period) = Self::parse_input(input)?;
        tracing::info!(%ticker, %period, "fetching stock history");

        let url = format!("{}/{ticker}", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("range", period.as_str()), ("interval", "1d")])
            .send()
            .await?
            .error_for_status()?;
        let envelope: ChartEnvelope = response.json().await?;

        if let Some(error) = &envelope.chart.error {
            return Err(ToolError::InvalidInput(format!(
                "data provider rejected '{ticker}': {} ({})",
                error.description, error.code
            )));
        }
        let result = envelope
            .chart
            .result
            .as_deref()
            .and_then(|r| r.first())
            .ok_or_else(|| {
                ToolError::NotFound(format!("historical data for '{ticker}' over '{period}'"))
            })?;

        let csv = self.to_csv(result);
        let row_count = csv.lines().count().saturating_sub(1);
        if row_count == 0 {
            return Err(ToolError::NotFound(format!(
                "historical data for '{ticker}' over '{period}'"
            )));
        }
        Ok(format!(
            "Success: Historical data fetched for {ticker} ({row_count} rows returned).\nCSV Data:\n{csv}"
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_normalizes_case() {
        let (ticker, period) = StockHistoryTool::parse_input("aapl|1Y").unwrap();
        assert_eq!(ticker, "AAPL");
        assert_eq!(period, "1y");
    }

    #[test]
    fn test_parse_input_rejects_bad_period() {
        let err = StockHistoryTool::parse_input("AAPL|fortnight").unwrap_err();
        assert!(err.to_tool_message().contains("valid periods"));
    }

    #[test]
    fn test_parse_input_rejects_empty_ticker_and_missing_pipe() {
        assert!(StockHistoryTool::parse_input(" |1y").is_err());
        assert!(StockHistoryTool::parse_input("AAPL 1y").is_err());
    }

    fn sample_result(days: usize) -> ChartResult {
        // Daily timestamps starting 2024-01-01 00:00 UTC.
        let base = 1_704_067_200_i64;
        ChartResult {
            timestamp: (0..days as i64).map(|d| base + d * 86_400).collect(),
            indicators: Indicators {
                quote: vec![QuoteBlock {
                    open: (0..days).map(|d| Some(10.0 + d as f64)).collect(),
                    high: (0..days).map(|d| Some(11.0 + d as f64)).collect(),
                    low: (0..days).map(|d| Some(9.0 + d as f64)).collect(),
                    close: (0..days).map(|d| Some(10.5 + d as f64)).collect(),
                    volume: (0..days).map(|d| Some(1000 + d as u64)).collect(),
                }],
            },
        }
    }

    fn tool() -> StockHistoryTool {
        StockHistoryTool::new(reqwest::Client::new(), ToolLimits::default())
    }

    #[test]
    fn test_to_csv_header_and_rows() {
        let csv = tool().to_csv(&sample_result(2));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Date,Open,High,Low,Close,Volume");
        assert_eq!(lines[1], "2024-01-01,10.00,11.00,9.00,10.50,1000");
        assert_eq!(lines[2], "2024-01-02,11.00,12.00,10.00,11.50,1001");
    }

    #[test]
    fn test_to_csv_keeps_most_recent_rows() {
        let csv = tool().to_csv(&sample_result(200));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 151);
        // Oldest surviving row is day 50 of 200.
        assert!(lines[1].starts_with("2024-02-20"));
    }

    #[test]
    fn test_to_csv_skips_days_without_close() {
        let mut result = sample_result(3);
        result.indicators.quote[0].close[1] = None;
        let csv = tool().to_csv(&result);
        assert_eq!(csv.lines().count(), 3);
        assert!(!csv.contains("2024-01-02"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_http_error() {
        let tool = tool().with_base_url("http://127.0.0.1:9/chart");
        let err = tool.invoke("AAPL|1y").await.unwrap_err();
        assert!(matches!(err, ToolError::Http(_)));
    }
}
