//! Data loader module for reading report inputs
//!
//! Reports are built from three files: the raw position records, the tracked
//! keywords with their price tiers, and optionally the interval aggregates
//! the server computed. All of them are JSON arrays. Position records may
//! also be given as JSONL (one record per line, `.jsonl` extension), in
//! which case malformed lines are skipped with a warning.
//!
//! # Examples
//!
//! ```no_run
//! use rankstat::data_loader::DataLoader;
//!
//! # async fn example() -> rankstat::Result<()> {
//! let input = DataLoader::new("positions.jsonl", "keywords.json")
//!     .with_aggregates("intervals.json")
//!     .load()
//!     .await?;
//!
//! println!("{} records for {} keywords", input.records.len(), input.keywords.len());
//! # Ok(())
//! # }
//! ```

use crate::aggregation_types::KeywordIntervals;
use crate::error::{RankstatError, Result};
use crate::types::{Keyword, PositionRecord};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// Everything read from disk for one report
#[derive(Debug, Clone, Default)]
pub struct ReportInput {
    pub records: Vec<PositionRecord>,
    pub keywords: Vec<Keyword>,
    /// Empty when no aggregates file was given
    pub aggregates: Vec<KeywordIntervals>,
}

/// Loader for the input files of a report
#[derive(Debug, Clone)]
pub struct DataLoader {
    positions_path: PathBuf,
    keywords_path: PathBuf,
    aggregates_path: Option<PathBuf>,
}

impl DataLoader {
    /// Create a new DataLoader for the given positions and keywords files
    pub fn new(positions_path: impl Into<PathBuf>, keywords_path: impl Into<PathBuf>) -> Self {
        Self {
            positions_path: positions_path.into(),
            keywords_path: keywords_path.into(),
            aggregates_path: None,
        }
    }

    /// Also load server interval aggregates
    pub fn with_aggregates(mut self, path: impl Into<PathBuf>) -> Self {
        self.aggregates_path = Some(path.into());
        self
    }

    /// Read all configured files concurrently
    pub async fn load(&self) -> Result<ReportInput> {
        let (records, keywords, aggregates) = tokio::try_join!(
            Self::load_positions(&self.positions_path),
            Self::load_keywords(&self.keywords_path),
            self.load_aggregates_if_configured(),
        )?;

        info!(
            "Loaded {} position records, {} keywords, {} aggregate sets",
            records.len(),
            keywords.len(),
            aggregates.len()
        );
        Ok(ReportInput {
            records,
            keywords,
            aggregates,
        })
    }

    async fn load_aggregates_if_configured(&self) -> Result<Vec<KeywordIntervals>> {
        match &self.aggregates_path {
            Some(path) => Self::load_aggregates(path).await,
            None => Ok(Vec::new()),
        }
    }

    /// Load position records from a JSON array or a `.jsonl` file
    pub async fn load_positions(path: &Path) -> Result<Vec<PositionRecord>> {
        if path.extension().is_some_and(|ext| ext == "jsonl") {
            Self::parse_jsonl(path).await
        } else {
            Self::parse_json_array(path).await
        }
    }

    /// Load keywords with their price tiers
    pub async fn load_keywords(path: &Path) -> Result<Vec<Keyword>> {
        Self::parse_json_array(path).await
    }

    /// Load server interval aggregates grouped per keyword
    pub async fn load_aggregates(path: &Path) -> Result<Vec<KeywordIntervals>> {
        Self::parse_json_array(path).await
    }

    async fn parse_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
        let content = tokio::fs::read_to_string(path).await?;
        let items: Vec<T> = serde_json::from_str(&content).map_err(|e| RankstatError::Parse {
            file: path.to_path_buf(),
            error: e.to_string(),
        })?;
        debug!("Parsed {} items from {}", items.len(), path.display());
        Ok(items)
    }

    async fn parse_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
        let file = tokio::fs::File::open(path).await?;
        let mut lines = BufReader::new(file).lines();
        let mut items = Vec::new();
        let mut line_number = 0;

        while let Some(line) = lines.next_line().await? {
            line_number += 1;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<T>(&line) {
                Ok(item) => items.push(item),
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {}: {}",
                        line_number,
                        path.display(),
                        e
                    );
                }
            }
        }

        debug!("Parsed {} items from {}", items.len(), path.display());
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::AsyncWriteExt;

    async fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = tokio::fs::File::create(&path).await.unwrap();
        file.write_all(content.as_bytes()).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_jsonl_skips_malformed_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(
            &temp_dir,
            "positions.jsonl",
            concat!(
                r#"{"keyword_id":"k1","checked_at":"2025-01-01T07:00:00","position":3,"cost":100.0}"#,
                "\n",
                "not json\n",
                "\n",
                r#"{"keyword_id":"k2","checked_at":"2025-01-01","position":null}"#,
                "\n",
            ),
        )
        .await;

        let records = DataLoader::load_positions(&path).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].keyword_id.as_str(), "k1");
        assert_eq!(records[0].cost, Some(100.0));
        assert_eq!(records[1].position, None);
    }

    #[tokio::test]
    async fn test_json_array_error_carries_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(&temp_dir, "keywords.json", r#"[{"id": "k1"}"#).await;

        let err = DataLoader::load_keywords(&path).await.unwrap_err();
        match err {
            RankstatError::Parse { file, .. } => assert_eq!(file, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.json");
        assert!(matches!(
            DataLoader::load_positions(&path).await,
            Err(RankstatError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_load_all_inputs() {
        let temp_dir = TempDir::new().unwrap();
        let positions = write_file(
            &temp_dir,
            "positions.json",
            r#"[{"keyword_id":"k1","checked_at":"2025-01-02","position":5}]"#,
        )
        .await;
        let keywords = write_file(
            &temp_dir,
            "keywords.json",
            r#"[{"id":"k1","keyword":"bricks","price_top_1_3":10,"price_top_4_5":5,"price_top_6_10":1}]"#,
        )
        .await;
        let aggregates = write_file(
            &temp_dir,
            "intervals.json",
            r#"[{"keywordId":"k1","intervals":[{"startDate":"2025-01-01","endDate":"2025-01-14","sumCost":5}]}]"#,
        )
        .await;

        let input = DataLoader::new(&positions, &keywords)
            .with_aggregates(&aggregates)
            .load()
            .await
            .unwrap();
        assert_eq!(input.records.len(), 1);
        assert_eq!(input.keywords[0].pricing.top4to5, 5.0);
        assert_eq!(input.aggregates[0].intervals[0].sum_cost, 5.0);

        let without = DataLoader::new(&positions, &keywords).load().await.unwrap();
        assert!(without.aggregates.is_empty());
    }
}
