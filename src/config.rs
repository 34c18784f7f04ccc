use crate::error::TopError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How source files are stored on disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    #[default]
    None,
    Zstd, // <name><ext>.zst
}

/// What to do with items the compliance check matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Delete,
    Save,
}

/// The predicate evaluated against every item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum CheckType {
    /// Literal, case-sensitive set membership.
    ExactMembership { items: Vec<String> },
    /// Case-insensitive regex search, unless `exception` also matches.
    PatternMatch {
        pattern: String,
        #[serde(default)]
        exception: Option<String>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComplianceTest {
    pub check: CheckType,
    pub action: Action,
}

/// Auxiliary old-key → new-key table used to remap partition keys.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyTransform {
    pub path: PathBuf,
    pub encoding: String,
    pub delimiter: String,
    pub old_column: usize,
    pub new_column: usize,
}

impl Default for KeyTransform {
    fn default() -> Self {
        Self {
            path: PathBuf::from("ID_Regions.txt"),
            encoding: "utf-8".to_string(),
            delimiter: "\t".to_string(),
            old_column: 1,
            new_column: 2,
        }
    }
}

fn default_key() -> String {
    "!KeyNotInDict".to_string()
}

/// Partitioned aggregation: one top per value of `key_column`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitByKey {
    pub key_column: usize,
    #[serde(default)]
    pub transform: Option<KeyTransform>,
    #[serde(default = "default_key")]
    pub default_key: String,
}

impl SplitByKey {
    pub fn new(key_column: usize) -> Self {
        Self { key_column, transform: None, default_key: default_key() }
    }
    pub fn with_transform(mut self, transform: KeyTransform) -> Self {
        self.transform = Some(transform);
        self
    }
    pub fn with_default_key(mut self, key: impl Into<String>) -> Self {
        self.default_key = key.into();
        self
    }
}

/// Every recognised run option, with defaults and builder chaining.
/// Column indices are 1-based.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TopOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub names: Option<Vec<String>>, // None → discover in input_dir
    pub extension: String,
    pub encoding: String,
    pub compression: Compression,
    pub delimiter: String,
    pub query_column: usize,
    pub count_column: Option<usize>,
    pub lowercase: bool,
    pub split_pattern: Option<String>,
    pub compliance_test: Option<ComplianceTest>,
    pub split_by_key: Option<SplitByKey>,
    pub day_bucketing: bool,
}

impl Default for TopOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("Data"),
            output_dir: PathBuf::from("Output"),
            names: None,
            extension: ".txt".to_string(),
            encoding: "utf-8".to_string(),
            compression: Compression::None,
            delimiter: "\t".to_string(),
            query_column: 1,
            count_column: None,
            lowercase: true,
            split_pattern: None,
            compliance_test: None,
            split_by_key: None,
            day_bucketing: false,
        }
    }
}

impl TopOptions {
    /// Parse options from JSON; unknown fields are rejected. The result is validated.
    pub fn from_json_str(s: &str) -> Result<Self, TopError> {
        let opts: TopOptions =
            serde_json::from_str(s).map_err(|e| TopError::Config(e.to_string()))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn load(path: &Path) -> Result<Self, TopError> {
        let s = fs::read_to_string(path).map_err(|e| TopError::io(path, e))?;
        Self::from_json_str(&s)
    }

    /// Structural checks that do not need compilation. Regexes and encodings are
    /// checked again when the plan is compiled.
    pub fn validate(&self) -> Result<(), TopError> {
        check_column("query_column", self.query_column)?;
        if let Some(c) = self.count_column {
            check_column("count_column", c)?;
        }
        check_delimiter("delimiter", &self.delimiter)?;
        check_encoding("encoding", &self.encoding)?;
        if self.extension.is_empty() {
            return Err(TopError::Config("extension must not be empty".into()));
        }
        if let Some(names) = &self.names {
            if names.iter().any(|n| n.is_empty()) {
                return Err(TopError::Config("names must not contain empty entries".into()));
            }
        }
        if let Some(ct) = &self.compliance_test {
            match &ct.check {
                CheckType::ExactMembership { items } if items.is_empty() => {
                    return Err(TopError::Config(
                        "exact_membership check needs at least one item".into(),
                    ));
                }
                CheckType::PatternMatch { pattern, .. } if pattern.is_empty() => {
                    return Err(TopError::Config("pattern_match check needs a pattern".into()));
                }
                _ => {}
            }
        }
        if let Some(sk) = &self.split_by_key {
            check_column("split_by_key.key_column", sk.key_column)?;
            if let Some(t) = &sk.transform {
                check_column("transform.old_column", t.old_column)?;
                check_column("transform.new_column", t.new_column)?;
                check_delimiter("transform.delimiter", &t.delimiter)?;
                check_encoding("transform.encoding", &t.encoding)?;
            }
        }
        Ok(())
    }

    pub fn with_input_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.input_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = Some(names.into_iter().map(Into::into).collect());
        self
    }
    pub fn with_extension(mut self, ext: impl Into<String>) -> Self {
        self.extension = ext.into();
        self
    }
    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = label.into();
        self
    }
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }
    pub fn with_query_column(mut self, column: usize) -> Self {
        self.query_column = column;
        self
    }
    pub fn with_count_column(mut self, column: usize) -> Self {
        self.count_column = Some(column);
        self
    }
    pub fn with_lowercase(mut self, yes: bool) -> Self {
        self.lowercase = yes;
        self
    }
    pub fn with_split_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.split_pattern = Some(pattern.into());
        self
    }
    pub fn with_compliance_test(mut self, check: CheckType, action: Action) -> Self {
        self.compliance_test = Some(ComplianceTest { check, action });
        self
    }
    pub fn with_split_by_key(mut self, split: SplitByKey) -> Self {
        self.split_by_key = Some(split);
        self
    }
    pub fn with_day_bucketing(mut self, yes: bool) -> Self {
        self.day_bucketing = yes;
        self
    }
}

fn check_column(name: &str, column: usize) -> Result<(), TopError> {
    if column == 0 {
        return Err(TopError::Config(format!("{name} is 1-based, got 0")));
    }
    Ok(())
}

fn check_delimiter(name: &str, delimiter: &str) -> Result<(), TopError> {
    if delimiter.is_empty() {
        return Err(TopError::Config(format!("{name} must not be empty")));
    }
    Ok(())
}

fn check_encoding(name: &str, label: &str) -> Result<(), TopError> {
    if encoding_rs::Encoding::for_label(label.as_bytes()).is_none() {
        return Err(TopError::Config(format!("{name}: unknown encoding {label:?}")));
    }
    Ok(())
}
