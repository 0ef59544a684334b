//! Per-category aggregation over the access log.
//!
//! # Design Decisions
//! - The log is read line by line as newline-delimited JSON, never parsed
//!   as one document
//! - A malformed line costs one record, not the whole report
//! - Counts are initialized from the configured categories, so categories
//!   with no traffic still appear with a zero
//! - Records whose category id is no longer configured are not counted

use std::collections::HashMap;
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::accesslog::record::{AccessLogRecord, CategoryCount};
use crate::classify::Category;

/// Count access log records per configured category.
///
/// Emits one entry per category, in configuration order. A missing or
/// unreadable log yields all zeros, since no traffic has been recorded
/// where nothing could be read.
pub async fn aggregate(path: &Path, categories: &[Category]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = categories
        .iter()
        .map(|category| CategoryCount {
            title: category.title.clone(),
            count: 0,
        })
        .collect();
    let index: HashMap<u32, usize> = categories
        .iter()
        .enumerate()
        .map(|(position, category)| (category.id, position))
        .collect();

    let file = match File::open(path).await {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!(
                path = %path.display(),
                error = %e,
                "Access log not readable, reporting zero counts"
            );
            return counts;
        }
    };

    let mut lines = BufReader::new(file).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                // Older log files carried a trailing comma after each
                // object; tolerate it.
                let line = line.trim().trim_end_matches(',');
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str::<AccessLogRecord>(line) {
                    Ok(record) => {
                        if let Some(&position) = index.get(&record.category_id) {
                            counts[position].count += 1;
                        }
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "Skipping malformed access log line");
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Access log read aborted");
                break;
            }
        }
    }

    counts
}

/// Aggregation result serialized to JSON, as served by the admin `/info`
/// endpoint.
pub async fn get_info(path: &Path, categories: &[Category]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&aggregate(path, categories).await)
}
