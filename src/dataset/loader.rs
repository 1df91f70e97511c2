use crate::models::{EvalConfig, ReviewSource};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder shown when a paper has no review for a source
pub const NOT_AVAILABLE: &str = "Not Available";

/// Result type for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Errors raised while loading annotation inputs
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Required data file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to parse review JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Column '{column}' missing from {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Invalid paper id: {0}")]
    InvalidPaperId(String),
}

/// One paper's entry in a review file
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ReviewEntry {
    #[serde(default)]
    pub gold_review: Option<String>,
    #[serde(default)]
    pub inference_review: Option<String>,
}

/// Papers assigned to one annotator
#[derive(Debug, Clone, PartialEq, Eq)]
struct Assignment {
    user: String,
    papers: Vec<String>,
}

/// All inputs needed to build annotation forms
#[derive(Debug, Clone)]
pub struct Dataset {
    users: Vec<String>,
    assignments: Vec<Assignment>,
    primary: BTreeMap<String, ReviewEntry>,
    secondary: BTreeMap<String, ReviewEntry>,
    pdf_dir: PathBuf,
    master_user: String,
}

impl Dataset {
    /// Load roster, mapping and both review files from the configured data
    /// directory
    pub fn load(config: &EvalConfig) -> DatasetResult<Self> {
        let users = load_roster(&config.user_path())?;
        let assignments = load_mapping(&config.mapping_path())?;
        let primary = load_reviews(&config.primary_reviews_path())?;
        let secondary = load_reviews(&config.secondary_reviews_path())?;

        tracing::info!(
            users = users.len(),
            assignments = assignments.len(),
            papers = primary.len(),
            "Loaded annotation dataset from {}",
            config.data_dir.display()
        );

        Ok(Self {
            users,
            assignments,
            primary,
            secondary,
            pdf_dir: config.pdf_dir.clone(),
            master_user: config.master_user.clone(),
        })
    }

    /// Roster in file order
    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn has_user(&self, user: &str) -> bool {
        self.users.iter().any(|u| u == user)
    }

    pub fn is_master(&self, user: &str) -> bool {
        user == self.master_user
    }

    /// Every paper id in the primary review file, sorted
    pub fn all_papers(&self) -> Vec<String> {
        self.primary.keys().cloned().collect()
    }

    /// Papers a user may annotate
    ///
    /// The master user sees every paper. Other users see the papers of
    /// their first mapping row; no row means no papers.
    pub fn papers_for(&self, user: &str) -> Vec<String> {
        if self.is_master(user) {
            return self.all_papers();
        }

        self.assignments
            .iter()
            .find(|a| a.user == user)
            .map(|a| a.papers.clone())
            .unwrap_or_default()
    }

    pub fn is_assigned(&self, user: &str, paper_id: &str) -> bool {
        self.papers_for(user).iter().any(|p| p == paper_id)
    }

    /// Raw review text for each source, `"Not Available"` when missing
    pub fn reviews_for(&self, paper_id: &str) -> [(ReviewSource, String); 3] {
        let primary = self.primary.get(paper_id);
        let secondary = self.secondary.get(paper_id);

        let text = |value: Option<&String>| {
            value
                .cloned()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };

        [
            (
                ReviewSource::GroundTruth,
                text(primary.and_then(|e| e.gold_review.as_ref())),
            ),
            (
                ReviewSource::ModelA,
                text(primary.and_then(|e| e.inference_review.as_ref())),
            ),
            (
                ReviewSource::ModelB,
                text(secondary.and_then(|e| e.inference_review.as_ref())),
            ),
        ]
    }

    /// Location of a paper's PDF
    pub fn pdf_path(&self, paper_id: &str) -> DatasetResult<PathBuf> {
        validate_paper_id(paper_id)?;
        Ok(self.pdf_dir.join(format!("{}.pdf", paper_id)))
    }

    /// Build a dataset from in-memory parts
    #[cfg(test)]
    pub(crate) fn from_parts(
        users: Vec<String>,
        assignments: Vec<(String, Vec<String>)>,
        primary: BTreeMap<String, ReviewEntry>,
        secondary: BTreeMap<String, ReviewEntry>,
        pdf_dir: impl Into<PathBuf>,
        master_user: impl Into<String>,
    ) -> Self {
        Self {
            users,
            assignments: assignments
                .into_iter()
                .map(|(user, papers)| Assignment { user, papers })
                .collect(),
            primary,
            secondary,
            pdf_dir: pdf_dir.into(),
            master_user: master_user.into(),
        }
    }
}

/// Normalize a CSV header: trim, drop a BOM, lower-case, and join words
/// with underscores
pub fn normalize_column(name: &str) -> String {
    name.trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Reject ids that could escape the PDF directory
fn validate_paper_id(paper_id: &str) -> DatasetResult<()> {
    if paper_id.trim().is_empty()
        || paper_id.contains("..")
        || paper_id.contains('/')
        || paper_id.contains('\\')
    {
        return Err(DatasetError::InvalidPaperId(paper_id.to_string()));
    }
    Ok(())
}

/// Read a CSV file into normalized headers and trimmed rows
fn read_table(path: &Path) -> DatasetResult<(Vec<String>, Vec<Vec<String>>)> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }

    let csv_error = |source| DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let headers = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(normalize_column)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok((headers, rows))
}

fn load_roster(path: &Path) -> DatasetResult<Vec<String>> {
    let (headers, rows) = read_table(path)?;

    let column = match headers.iter().position(|h| h == "user") {
        Some(idx) => idx,
        None if headers.len() == 1 => 0,
        None => {
            return Err(DatasetError::MissingColumn {
                path: path.to_path_buf(),
                column: "user".to_string(),
            })
        }
    };

    let mut seen = HashSet::new();
    let users = rows
        .into_iter()
        .filter_map(|row| row.get(column).cloned())
        .filter(|user| !user.is_empty())
        .filter(|user| seen.insert(user.clone()))
        .collect();

    Ok(users)
}

fn load_mapping(path: &Path) -> DatasetResult<Vec<Assignment>> {
    let (headers, rows) = read_table(path)?;

    let user_column =
        headers
            .iter()
            .position(|h| h == "user")
            .ok_or_else(|| DatasetError::MissingColumn {
                path: path.to_path_buf(),
                column: "user".to_string(),
            })?;
    let paper_columns: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.starts_with("paper"))
        .map(|(idx, _)| idx)
        .collect();

    if paper_columns.is_empty() {
        return Err(DatasetError::MissingColumn {
            path: path.to_path_buf(),
            column: "paper_1".to_string(),
        });
    }

    let assignments = rows
        .into_iter()
        .filter_map(|row| {
            let user = row.get(user_column)?.clone();
            if user.is_empty() {
                return None;
            }
            let papers = paper_columns
                .iter()
                .filter_map(|idx| row.get(*idx))
                .filter(|p| !p.is_empty())
                .cloned()
                .collect();
            Some(Assignment { user, papers })
        })
        .collect();

    Ok(assignments)
}

fn load_reviews(path: &Path) -> DatasetResult<BTreeMap<String, ReviewEntry>> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_fixture(dir: &Path) -> EvalConfig {
        let data_dir = dir.join("data");
        fs::create_dir_all(&data_dir).unwrap();
        fs::write(data_dir.join("user.csv"), "\u{feff}User\nalice\nbob\n\nalice\nmaster\n").unwrap();
        fs::write(
            data_dir.join("mapping.csv"),
            " User , Paper 1 ,paper_2\nalice,p1,p2\nbob,p3,\nalice,p9,p9\n",
        )
        .unwrap();
        fs::write(
            data_dir.join("a.json"),
            r#"{
                "p2": {"gold_review": "Gold two", "inference_review": "A two", "score": 3},
                "p1": {"gold_review": "Gold one"}
            }"#,
        )
        .unwrap();
        fs::write(data_dir.join("b.json"), r#"{"p1": {"inference_review": "B one"}}"#).unwrap();

        EvalConfig {
            data_dir,
            pdf_dir: dir.join("pdfs"),
            reviews: crate::models::ReviewFiles {
                primary: "a.json".to_string(),
                secondary: "b.json".to_string(),
            },
            ..EvalConfig::default()
        }
    }

    #[test]
    fn test_normalize_column() {
        assert_eq!(normalize_column("User"), "user");
        assert_eq!(normalize_column(" Paper 1 "), "paper_1");
        assert_eq!(normalize_column("\u{feff}paper-2"), "paper_2");
        assert_eq!(normalize_column("PAPER_3"), "paper_3");
    }

    #[test]
    fn test_load_roster_dedups_and_skips_blank() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_fixture(temp_dir.path());
        let dataset = Dataset::load(&config).unwrap();

        assert_eq!(dataset.users(), ["alice", "bob", "master"]);
        assert!(dataset.has_user("bob"));
        assert!(!dataset.has_user("carol"));
    }

    #[test]
    fn test_papers_for_uses_first_mapping_row() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_fixture(temp_dir.path());
        let dataset = Dataset::load(&config).unwrap();

        assert_eq!(dataset.papers_for("alice"), ["p1", "p2"]);
        assert_eq!(dataset.papers_for("bob"), ["p3"]);
        assert!(dataset.papers_for("carol").is_empty());
        assert!(dataset.is_assigned("alice", "p2"));
        assert!(!dataset.is_assigned("alice", "p9"));
    }

    #[test]
    fn test_master_sees_all_primary_papers() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_fixture(temp_dir.path());
        let dataset = Dataset::load(&config).unwrap();

        assert!(dataset.is_master("master"));
        assert_eq!(dataset.papers_for("master"), ["p1", "p2"]);
    }

    #[test]
    fn test_reviews_for_fills_missing_with_placeholder() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_fixture(temp_dir.path());
        let dataset = Dataset::load(&config).unwrap();

        let reviews = dataset.reviews_for("p1");
        assert_eq!(reviews[0], (ReviewSource::GroundTruth, "Gold one".to_string()));
        assert_eq!(reviews[1], (ReviewSource::ModelA, NOT_AVAILABLE.to_string()));
        assert_eq!(reviews[2], (ReviewSource::ModelB, "B one".to_string()));

        let unknown = dataset.reviews_for("nope");
        assert!(unknown.iter().all(|(_, text)| text == NOT_AVAILABLE));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = write_fixture(temp_dir.path());
        config.reviews.secondary = "missing.json".to_string();

        match Dataset::load(&config) {
            Err(DatasetError::NotFound(path)) => assert!(path.ends_with("missing.json")),
            other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_mapping_without_user_column_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_fixture(temp_dir.path());
        fs::write(config.mapping_path(), "annotator,paper_1\nalice,p1\n").unwrap();

        assert!(matches!(
            Dataset::load(&config),
            Err(DatasetError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_fixture(temp_dir.path());
        fs::write(config.primary_reviews_path(), "{ not json").unwrap();

        assert!(matches!(
            Dataset::load(&config),
            Err(DatasetError::Json { .. })
        ));
    }

    #[test]
    fn test_pdf_path_rejects_traversal() {
        let dataset = Dataset::from_parts(
            vec![],
            vec![],
            BTreeMap::new(),
            BTreeMap::new(),
            "pdfs",
            "master",
        );

        assert_eq!(dataset.pdf_path("p1").unwrap(), PathBuf::from("pdfs/p1.pdf"));
        assert!(dataset.pdf_path("../etc/passwd").is_err());
        assert!(dataset.pdf_path("a/b").is_err());
        assert!(dataset.pdf_path("").is_err());
    }
}
