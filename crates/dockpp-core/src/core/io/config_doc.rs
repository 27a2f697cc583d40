use serde_yaml::{Mapping, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::trace;

const DATA_SECTION: &str = "data";
const DATA_FILE_KEY: &str = "data_file";
const DATA_PATH_KEY: &str = "data_path";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error on configuration file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse configuration template '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid '{key}' section in configuration template: {reason}")]
    InvalidSection { key: &'static str, reason: String },

    #[error("Invalid configuration override '{key}': {reason}")]
    InvalidOverride { key: String, reason: String },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

/// A single `KEY=VALUE` edit applied to the template before staging.
///
/// The key is a dotted path into the document (`model.num_samples`); the value is
/// kept raw and parsed as YAML when applied, so `4` becomes an integer and `true` a
/// boolean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOverride {
    pub key: String,
    pub value: String,
}

impl FromStr for ConfigOverride {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s.split_once('=').ok_or_else(|| ConfigError::InvalidOverride {
            key: s.to_string(),
            reason: "expected KEY=VALUE".to_string(),
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::InvalidOverride {
                key: s.to_string(),
                reason: "key cannot be empty".to_string(),
            });
        }
        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

impl fmt::Display for ConfigOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// The inference configuration template, held as an untyped YAML tree.
///
/// Only the `data` section is ever interpreted; every other field is carried
/// through to the staged copy as loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    root: Value,
}

impl ConfigDocument {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let root = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self { root })
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Looks up a dotted key, e.g. `data.data_file`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        key.split('.')
            .try_fold(&self.root, |node, segment| node.get(segment))
    }

    pub fn apply(&mut self, edit: &ConfigOverride) -> Result<(), ConfigError> {
        self.set(&edit.key, &edit.value)
    }

    /// Sets a dotted key, creating intermediate mappings where they are absent.
    pub fn set(&mut self, key: &str, raw_value: &str) -> Result<(), ConfigError> {
        let segments: Vec<&str> = key.split('.').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(ConfigError::InvalidOverride {
                key: key.to_string(),
                reason: "key contains an empty segment".to_string(),
            });
        }
        let Some((last, parents)) = segments.split_last() else {
            return Err(ConfigError::InvalidOverride {
                key: key.to_string(),
                reason: "key cannot be empty".to_string(),
            });
        };

        let mut node = &mut self.root;
        for segment in parents {
            let mapping = mapping_for_override(node, key, segment)?;
            if !mapping.contains_key(*segment) {
                mapping.insert(Value::String(segment.to_string()), Value::Mapping(Mapping::new()));
            }
            node = mapping
                .get_mut(*segment)
                .ok_or_else(|| ConfigError::InvalidOverride {
                    key: key.to_string(),
                    reason: format!("could not create section '{}'", segment),
                })?;
        }

        let value = parse_value(raw_value);
        trace!("Setting configuration key '{}' to {:?}", key, value);
        mapping_for_override(node, key, last)?.insert(Value::String(last.to_string()), value);
        Ok(())
    }

    /// Redirects the template's data fields to a staged workspace: `data.data_file`
    /// to the manifest and `data.data_path` to the workspace root.
    pub fn point_at_workspace(
        &mut self,
        manifest_path: &Path,
        data_root: &Path,
    ) -> Result<(), ConfigError> {
        let Value::Mapping(root) = &mut self.root else {
            return Err(ConfigError::InvalidSection {
                key: DATA_SECTION,
                reason: "template is not a mapping".to_string(),
            });
        };
        let data = root
            .get_mut(DATA_SECTION)
            .ok_or_else(|| ConfigError::InvalidSection {
                key: DATA_SECTION,
                reason: "section is missing".to_string(),
            })?;
        let Value::Mapping(data) = data else {
            return Err(ConfigError::InvalidSection {
                key: DATA_SECTION,
                reason: "expected a mapping".to_string(),
            });
        };

        data.insert(
            Value::String(DATA_FILE_KEY.to_string()),
            Value::String(manifest_path.to_string_lossy().into_owned()),
        );
        data.insert(
            Value::String(DATA_PATH_KEY.to_string()),
            Value::String(data_root.to_string_lossy().into_owned()),
        );
        Ok(())
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(&self.root).map_err(ConfigError::Serialize)
    }

    pub fn write_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_yaml_string()?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

fn mapping_for_override<'a>(
    node: &'a mut Value,
    key: &str,
    segment: &str,
) -> Result<&'a mut Mapping, ConfigError> {
    if node.is_null() {
        *node = Value::Mapping(Mapping::new());
    }
    match node {
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(ConfigError::InvalidOverride {
            key: key.to_string(),
            reason: format!("cannot set '{}' inside a non-mapping value", segment),
        }),
    }
}

fn parse_value(raw: &str) -> Value {
    serde_yaml::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const TEMPLATE: &str = r#"
data:
  dataset: db5
  data_file: /original/splits.csv
  data_path: /original/structures
  resolution: residue
model:
  num_steps: 40
  checkpoint: ckpts/large_model_single.pth
seed: 0
"#;

    fn load_template(content: &str) -> ConfigDocument {
        let dir = tempdir().unwrap();
        let path = dir.path().join("template.yaml");
        fs::write(&path, content).unwrap();
        ConfigDocument::load(&path).unwrap()
    }

    #[test]
    fn point_at_workspace_rewrites_only_data_locations() {
        let original = load_template(TEMPLATE);
        let mut doc = original.clone();
        doc.point_at_workspace(Path::new("/tmp/ws/splits_test.csv"), Path::new("/tmp/ws"))
            .unwrap();

        assert_eq!(
            doc.get("data.data_file"),
            Some(&Value::String("/tmp/ws/splits_test.csv".to_string()))
        );
        assert_eq!(
            doc.get("data.data_path"),
            Some(&Value::String("/tmp/ws".to_string()))
        );
        assert_eq!(doc.get("data.dataset"), original.get("data.dataset"));
        assert_eq!(doc.get("data.resolution"), original.get("data.resolution"));
        assert_eq!(doc.get("model"), original.get("model"));
        assert_eq!(doc.get("seed"), original.get("seed"));
    }

    #[test]
    fn point_at_workspace_adds_absent_location_fields() {
        let mut doc = load_template("data:\n  dataset: db5\n");
        doc.point_at_workspace(Path::new("/ws/splits_test.csv"), Path::new("/ws"))
            .unwrap();
        assert!(doc.get("data.data_file").is_some());
        assert!(doc.get("data.data_path").is_some());
        assert_eq!(
            doc.get("data.dataset"),
            Some(&Value::String("db5".to_string()))
        );
    }

    #[test]
    fn point_at_workspace_fails_without_data_section() {
        let mut doc = load_template("model:\n  num_steps: 40\n");
        let result = doc.point_at_workspace(Path::new("/ws/m.csv"), Path::new("/ws"));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidSection { key: "data", .. })
        ));
    }

    #[test]
    fn point_at_workspace_fails_when_data_is_scalar() {
        let mut doc = load_template("data: 3\n");
        let result = doc.point_at_workspace(Path::new("/ws/m.csv"), Path::new("/ws"));
        assert!(matches!(result, Err(ConfigError::InvalidSection { .. })));
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = ConfigDocument::load(&dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn load_fails_for_malformed_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "data: [unclosed\n").unwrap();
        let result = ConfigDocument::load(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn set_parses_values_as_yaml() {
        let mut doc = load_template(TEMPLATE);
        doc.set("model.num_steps", "20").unwrap();
        doc.set("model.use_ema", "true").unwrap();
        doc.set("model.checkpoint", "ckpts/other.pth").unwrap();

        assert_eq!(doc.get("model.num_steps"), Some(&Value::from(20)));
        assert_eq!(doc.get("model.use_ema"), Some(&Value::Bool(true)));
        assert_eq!(
            doc.get("model.checkpoint"),
            Some(&Value::String("ckpts/other.pth".to_string()))
        );
    }

    #[test]
    fn set_creates_missing_sections() {
        let mut doc = load_template(TEMPLATE);
        doc.set("inference.sampling.num_samples", "8").unwrap();
        assert_eq!(
            doc.get("inference.sampling.num_samples"),
            Some(&Value::from(8))
        );
    }

    #[test]
    fn set_rejects_paths_through_scalars_and_empty_segments() {
        let mut doc = load_template(TEMPLATE);
        assert!(matches!(
            doc.set("seed.value", "1"),
            Err(ConfigError::InvalidOverride { .. })
        ));
        assert!(matches!(
            doc.set("model..num_steps", "1"),
            Err(ConfigError::InvalidOverride { .. })
        ));
    }

    #[test]
    fn override_parses_key_value_pairs() {
        let edit: ConfigOverride = "model.num_steps=20".parse().unwrap();
        assert_eq!(edit.key, "model.num_steps");
        assert_eq!(edit.value, "20");

        let edit: ConfigOverride = "model.tag=a=b".parse().unwrap();
        assert_eq!(edit.value, "a=b");

        assert!("model.num_steps".parse::<ConfigOverride>().is_err());
        assert!("=5".parse::<ConfigOverride>().is_err());
    }

    #[test]
    fn written_document_round_trips_through_disk() {
        let mut doc = load_template(TEMPLATE);
        doc.point_at_workspace(Path::new("/ws/splits_test.csv"), Path::new("/ws"))
            .unwrap();

        let dir = tempdir().unwrap();
        let out = dir.path().join("config.yaml");
        doc.write_to_path(&out).unwrap();

        let reloaded = ConfigDocument::load(&out).unwrap();
        assert_eq!(reloaded, doc);
    }
}
