use log::info;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ZERO_SHOT_MODEL: &str = "facebook/bart-large-mnli";
pub const DEFAULT_ZERO_SHOT_ENDPOINT: &str = "https://api-inference.huggingface.co/models";

/// Directory layout and collaborator settings shared by every pipeline stage.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub figures_dir: PathBuf,
    pub remove_stopwords: bool,
    pub lexicon_dir: Option<PathBuf>,
    /// TrueType font for figure text; system locations are searched when unset.
    pub font_path: Option<PathBuf>,
    pub zero_shot: ZeroShotConfig,
}

#[derive(Debug, Clone)]
pub struct ZeroShotConfig {
    pub model: String,
    pub endpoint: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            figures_dir: PathBuf::from("figures"),
            remove_stopwords: true,
            lexicon_dir: None,
            font_path: None,
            zero_shot: ZeroShotConfig {
                model: DEFAULT_ZERO_SHOT_MODEL.to_string(),
                endpoint: DEFAULT_ZERO_SHOT_ENDPOINT.to_string(),
                api_token: None,
                timeout: Duration::from_secs(60),
            },
        }
    }
}

impl PipelineConfig {
    /// Builds the configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let remove_stopwords = non_empty("ABSA_REMOVE_STOPWORDS")
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(defaults.remove_stopwords);
        let timeout_secs = non_empty("ZERO_SHOT_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(defaults.zero_shot.timeout.as_secs());

        let config = Self {
            data_dir: non_empty("ABSA_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            output_dir: non_empty("ABSA_OUTPUT_DIR").map(PathBuf::from).unwrap_or(defaults.output_dir),
            figures_dir: non_empty("ABSA_FIGURES_DIR").map(PathBuf::from).unwrap_or(defaults.figures_dir),
            remove_stopwords,
            lexicon_dir: non_empty("ABSA_LEXICON_DIR").map(PathBuf::from),
            font_path: non_empty("ABSA_FONT_PATH").map(PathBuf::from),
            zero_shot: ZeroShotConfig {
                model: non_empty("ZERO_SHOT_MODEL").unwrap_or(defaults.zero_shot.model),
                endpoint: non_empty("ZERO_SHOT_ENDPOINT").unwrap_or(defaults.zero_shot.endpoint),
                api_token: non_empty("HF_API_TOKEN"),
                timeout: Duration::from_secs(timeout_secs),
            },
        };

        info!(
            "Pipeline config: data={:?}, output={:?}, figures={:?}, remove_stopwords={}, model={}",
            config.data_dir, config.output_dir, config.figures_dir, config.remove_stopwords, config.zero_shot.model
        );
        config
    }

    pub fn combined_reviews_path(&self) -> PathBuf {
        self.output_dir.join("combined_reviews.csv")
    }

    pub fn per_dataset_dir(&self) -> PathBuf {
        self.output_dir.join("per_dataset")
    }

    pub fn cleaned_reviews_path(&self) -> PathBuf {
        self.output_dir.join("cleaned_reviews.csv")
    }

    pub fn rule_mapping_path(&self) -> PathBuf {
        self.output_dir.join("relation_mapping_rule_based.csv")
    }

    pub fn bert_mapping_path(&self) -> PathBuf {
        self.output_dir.join("relation_mapping_bert_based.csv")
    }

    pub fn comparison_path(&self) -> PathBuf {
        self.output_dir.join("comparison_result.csv")
    }

    pub fn opinion_summary_path(&self, method: &str) -> PathBuf {
        self.output_dir.join(format!("opinion_summary_{}.csv", method))
    }

    pub fn comparison_figures_dir(&self) -> PathBuf {
        self.figures_dir.join("comparison")
    }

    pub fn method_figures_dir(&self, method: &str) -> PathBuf {
        self.figures_dir.join(format!("{}_based", method))
    }

    pub fn lexicon_dir(&self) -> Option<&Path> {
        self.lexicon_dir.as_deref()
    }
}
