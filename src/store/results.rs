use crate::models::{RatingRecord, ScoredPoint};
use chrono::Utc;
use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Result type for results store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur when reading or appending ratings
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to access results file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed results file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Refusing to store an empty submission")]
    EmptySubmission,
}

/// What happened to a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    /// All points were appended under one submission id
    Written {
        submission_id: String,
        records: usize,
    },
    /// The user had already rated this paper; nothing was written
    AlreadyRated,
}

/// Append-only CSV of individual point ratings
///
/// One row per (user, paper, review source, section, point). The header is
/// written when the file is created or empty.
#[derive(Debug, Clone)]
pub struct ResultsStore {
    path: PathBuf,
}

impl ResultsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored record; a missing file holds no records
    pub fn records(&self) -> StoreResult<Vec<RatingRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .from_path(&self.path)
            .map_err(|source| self.csv_error(source))?;

        reader
            .deserialize()
            .collect::<Result<Vec<RatingRecord>, _>>()
            .map_err(|source| self.csv_error(source))
    }

    /// Whether the user has any stored rating for the paper
    pub fn is_rated(&self, user: &str, paper_id: &str) -> StoreResult<bool> {
        Ok(self
            .records()?
            .iter()
            .any(|r| r.user == user && r.paper_id == paper_id))
    }

    /// Papers the user has rated
    pub fn rated_papers(&self, user: &str) -> StoreResult<BTreeSet<String>> {
        Ok(self
            .records()?
            .into_iter()
            .filter(|r| r.user == user)
            .map(|r| r.paper_id)
            .collect())
    }

    /// Append a validated submission
    ///
    /// Resubmitting a paper the user already rated leaves the file untouched
    /// and reports `AlreadyRated`.
    pub fn append_submission(
        &self,
        user: &str,
        paper_id: &str,
        points: &[ScoredPoint],
    ) -> StoreResult<AppendOutcome> {
        if points.is_empty() {
            return Err(StoreError::EmptySubmission);
        }

        if self.is_rated(user, paper_id)? {
            tracing::info!(user, paper_id, "Paper already rated, skipping append");
            return Ok(AppendOutcome::AlreadyRated);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let needs_header = fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let submission_id = Uuid::new_v4().to_string();
        let timestamp = Utc::now().to_rfc3339();

        let records: Vec<RatingRecord> = points
            .iter()
            .map(|point| RatingRecord {
                submission_id: submission_id.clone(),
                timestamp: timestamp.clone(),
                user: user.to_string(),
                paper_id: paper_id.to_string(),
                review_source: point.source,
                section: point.section,
                point_index: point.index,
                point: point.text.clone(),
                rating: point.rating.value().unwrap_or(0),
                rating_label: point.rating.label().to_string(),
            })
            .collect();

        // A submission lands in one write so a failure never leaves a partial set
        let bytes = self.encode_records(&records, needs_header)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&bytes)?;
        file.flush()?;

        tracing::info!(
            user,
            paper_id,
            submission_id = %submission_id,
            records = points.len(),
            "Stored ratings"
        );

        Ok(AppendOutcome::Written {
            submission_id,
            records: points.len(),
        })
    }

    /// Encode records as CSV rows, with the header when the file is new
    fn encode_records(&self, records: &[RatingRecord], header: bool) -> StoreResult<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(header)
            .from_writer(Vec::new());
        for record in records {
            writer
                .serialize(record)
                .map_err(|source| self.csv_error(source))?;
        }
        writer
            .into_inner()
            .map_err(|e| StoreError::Io(e.into_error()))
    }

    fn csv_error(&self, source: csv::Error) -> StoreError {
        StoreError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}
