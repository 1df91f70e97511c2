use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given
pub const CONFIG_FILE_NAME: &str = "revieweval.toml";

/// Review files holding the three candidate reviews per paper
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReviewFiles {
    /// Provides the ground-truth review and model A's inference review
    pub primary: String,
    /// Provides model B's inference review
    pub secondary: String,
}

impl Default for ReviewFiles {
    fn default() -> Self {
        Self {
            primary: "sampled_papers_rouge2_t2_llama_gnn_5_3.json".to_string(),
            secondary: "sampled_papers_rouge2_t2_llama_gnn_5_5.json".to_string(),
        }
    }
}

// =============================================================================
// Evaluation Configuration
// =============================================================================

/// Evaluation tool configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EvalConfig {
    /// Directory holding the roster, mapping and review files
    pub data_dir: PathBuf,

    /// Directory holding `<paper_id>.pdf` files
    pub pdf_dir: PathBuf,

    /// CSV file ratings are appended to
    pub results_path: PathBuf,

    /// Roster file name inside `data_dir`
    pub user_file: String,

    /// User to paper mapping file name inside `data_dir`
    pub mapping_file: String,

    pub reviews: ReviewFiles,

    /// User who may open every paper
    pub master_user: String,

    pub host: String,

    pub port: u16,

    /// Mixed into the review order seed
    pub shuffle_salt: String,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            pdf_dir: PathBuf::from("pdfs"),
            results_path: PathBuf::from("results/ratings.csv"),
            user_file: "user.csv".to_string(),
            mapping_file: "mapping.csv".to_string(),
            reviews: ReviewFiles::default(),
            master_user: "master".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8501,
            shuffle_salt: "revieweval".to_string(),
        }
    }
}

impl EvalConfig {
    /// Load config from an explicit path, or `revieweval.toml` in the
    /// working directory
    ///
    /// An explicit path must exist; the implicit one falls back to defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config_path = match path {
            Some(p) => {
                if !p.exists() {
                    anyhow::bail!("Config file not found: {}", p.display());
                }
                p.to_path_buf()
            }
            None => {
                let p = PathBuf::from(CONFIG_FILE_NAME);
                if !p.exists() {
                    return Ok(Self::default());
                }
                p
            }
        };

        let content = std::fs::read_to_string(&config_path)?;
        let config: EvalConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config as TOML
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn user_path(&self) -> PathBuf {
        self.data_dir.join(&self.user_file)
    }

    pub fn mapping_path(&self) -> PathBuf {
        self.data_dir.join(&self.mapping_file)
    }

    pub fn primary_reviews_path(&self) -> PathBuf {
        self.data_dir.join(&self.reviews.primary)
    }

    pub fn secondary_reviews_path(&self) -> PathBuf {
        self.data_dir.join(&self.reviews.secondary)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EvalConfig::default();
        assert_eq!(config.user_path(), PathBuf::from("data/user.csv"));
        assert_eq!(config.master_user, "master");
        assert_eq!(config.bind_address(), "127.0.0.1:8501");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: EvalConfig = toml::from_str(
            r#"
port = 9000
master_user = "admin"

[reviews]
secondary = "other.json"
"#,
        )
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.master_user, "admin");
        assert_eq!(config.reviews.secondary, "other.json");
        assert_eq!(
            config.reviews.primary,
            "sampled_papers_rouge2_t2_llama_gnn_5_3.json"
        );
        assert_eq!(config.pdf_dir, PathBuf::from("pdfs"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("conf/revieweval.toml");

        let config = EvalConfig {
            port: 8600,
            shuffle_salt: "pilot".to_string(),
            ..EvalConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = EvalConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.toml");
        assert!(EvalConfig::load(Some(path.as_path())).is_err());
    }
}
