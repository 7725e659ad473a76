use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::Mutex;
use url::Url;

use crate::models::{MonthLabel, RawScheduleRow};

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("no worksheet for month {0:?}")]
    WorksheetNotFound(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed worksheet CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid sheet URL: {0}")]
    Url(#[from] url::ParseError),
}

struct CachedRows {
    fetched_at: Instant,
    rows: Vec<RawScheduleRow>,
}

/// Client for the spreadsheet's per-month worksheets, fetched as CSV through
/// the sheet's export endpoint. Responses are cached per month label for a
/// bounded window; callers always pay at most one fetch per window.
#[derive(Clone)]
pub struct SheetSource {
    client: reqwest::Client,
    base_url: Arc<Url>,
    ttl: Duration,
    cache: Arc<Mutex<HashMap<String, CachedRows>>>,
}

impl SheetSource {
    pub fn new(base_url: Url, ttl: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: Arc::new(base_url),
            ttl,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Raw rows for one month's worksheet. A missing worksheet is a hard
    /// error; a present-but-empty worksheet is an empty row set.
    pub async fn fetch_rows(&self, month: &MonthLabel) -> Result<Vec<RawScheduleRow>, SheetError> {
        let key = month.to_string();

        {
            let cache = self.cache.lock().await;
            if let Some(entry) = cache.get(&key)
                && entry.fetched_at.elapsed() < self.ttl
            {
                tracing::debug!(month = %key, "serving worksheet from cache");
                return Ok(entry.rows.clone());
            }
        }

        let url = Url::parse_with_params(
            &format!("{}/gviz/tq", self.base_url),
            &[("tqx", "out:csv"), ("sheet", key.as_str())],
        )?;

        tracing::info!(month = %key, "fetching worksheet");
        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST || status == reqwest::StatusCode::NOT_FOUND {
            return Err(SheetError::WorksheetNotFound(key));
        }
        let body = response.error_for_status()?.text().await?;
        let rows = parse_rows(&body)?;

        let mut cache = self.cache.lock().await;
        cache.insert(
            key,
            CachedRows {
                fetched_at: Instant::now(),
                rows: rows.clone(),
            },
        );
        Ok(rows)
    }
}

/// Parse a worksheet CSV body. Unknown columns are ignored and known columns
/// may be absent; a header-only body yields an empty set.
pub fn parse_rows(body: &str) -> Result<Vec<RawScheduleRow>, SheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());
    let mut rows = Vec::new();
    for record in reader.deserialize::<RawScheduleRow>() {
        rows.push(record?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows_basic() {
        let body = "\
date,day,st time,end time,location,lang,class,cancelled,series,drupal link
15,Sat,10:00 AM,11:00 AM,Online,en,Intro to Email,0,0,https://example.org/r/1
,,,,,,,,,
16,Sun,2:00 PM,3:00 PM,SNFL,zh,Excel Basics,1,0,
";
        let rows = parse_rows(body).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].date.as_deref(), Some("15"));
        assert_eq!(rows[0].start_time.as_deref(), Some("10:00 AM"));
        assert_eq!(
            rows[0].registration_link.as_deref(),
            Some("https://example.org/r/1")
        );
        assert!(rows[1].date.is_none());
        assert!(rows[2].is_cancelled());
    }

    #[test]
    fn test_parse_rows_header_only() {
        let body = "date,day,st time,end time,location,lang,class,cancelled,series\n";
        assert!(parse_rows(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rows_missing_columns() {
        let body = "date,class,location,lang\n15,Intro,Online,en\n";
        let rows = parse_rows(body).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].class.as_deref(), Some("Intro"));
        assert!(rows[0].start_time.is_none());
        assert!(!rows[0].is_cancelled());
    }
}
