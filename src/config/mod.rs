use std::collections::BTreeMap;
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ConfigError;
use crate::listing::{ClientSort, CombinedSort, IssueSort, ProjectSort, SortDirection, SortKey};
use crate::utils::app_data_dir;

const CONFIG_FILE: &str = "config.json";
const DATA_FILE: &str = "data.json";
const TMP_SUFFIX: &str = "tmp";
const SORT_PREFIX: &str = "default_sort.";

/// Listings whose default ordering can be configured.
pub const LISTINGS: &[&str] = &["clients", "projects", "issues", "overview"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Overrides the data file location; relative to the app directory when
    /// not absolute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    pub page_size: usize,
    pub color_enabled: bool,
    pub locale: String,
    /// Listing name → `key[:asc|desc]`.
    pub default_sort: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            page_size: 20,
            color_enabled: true,
            locale: "en-US".into(),
            default_sort: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Current settings as `(key, value)` pairs, in display order.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries = vec![
            (
                "data_file".to_string(),
                self.data_file
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| format!("(default) {DATA_FILE}")),
            ),
            ("page_size".to_string(), self.page_size.to_string()),
            ("color_enabled".to_string(), self.color_enabled.to_string()),
            ("locale".to_string(), self.locale.clone()),
        ];
        for (listing, sort) in &self.default_sort {
            entries.push((format!("{SORT_PREFIX}{listing}"), sort.clone()));
        }
        entries
    }

    /// Updates one setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };
        match key {
            "data_file" => {
                self.data_file = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "page_size" => {
                let size: usize = value
                    .parse()
                    .map_err(|_| invalid("expected a whole number"))?;
                if !(1..=500).contains(&size) {
                    return Err(invalid("must be between 1 and 500"));
                }
                self.page_size = size;
            }
            "color_enabled" => {
                self.color_enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    _ => return Err(invalid("expected true or false")),
                };
            }
            "locale" => {
                if value.is_empty() {
                    return Err(invalid("locale cannot be empty"));
                }
                value
                    .parse::<icu::locale::Locale>()
                    .map_err(|err| invalid(&format!("not a BCP 47 locale tag ({err})")))?;
                self.locale = value.to_string();
            }
            other => {
                let listing = other
                    .strip_prefix(SORT_PREFIX)
                    .filter(|listing| LISTINGS.contains(listing))
                    .ok_or_else(|| ConfigError::UnknownKey(other.to_string()))?;
                if value.is_empty() {
                    self.default_sort.remove(listing);
                } else {
                    check_sort(listing, value).map_err(|message| invalid(&message))?;
                    self.default_sort.insert(listing.to_string(), value.to_string());
                }
            }
        }
        Ok(())
    }

    pub fn default_sort(&self, listing: &str) -> Option<&str> {
        self.default_sort.get(listing).map(String::as_str)
    }
}

/// Splits `key[:dir]`; the direction defaults to ascending.
pub fn parse_sort_spec(spec: &str) -> Result<(&str, SortDirection), String> {
    match spec.split_once(':') {
        Some((key, direction)) => Ok((key.trim(), direction.parse()?)),
        None => Ok((spec.trim(), SortDirection::Asc)),
    }
}

fn check_sort(listing: &str, spec: &str) -> Result<(), String> {
    let (key, _) = parse_sort_spec(spec)?;
    let known = match listing {
        "clients" => ClientSort::from_name(key).is_ok(),
        "projects" => ProjectSort::from_name(key).is_ok(),
        "issues" => IssueSort::from_name(key).is_ok(),
        _ => CombinedSort::from_name(key).is_ok(),
    };
    if known {
        Ok(())
    } else {
        Err(format!("`{key}` is not a sort key for {listing}"))
    }
}

/// Loads and atomically saves [`Config`] under the app data directory.
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
            base,
        })
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            debug!(path = %self.path.display(), "no config file, using defaults");
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the JSON data store lives for `config`.
    pub fn data_file(&self, config: &Config) -> PathBuf {
        match &config.data_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.base.join(path),
            None => self.base.join(DATA_FILE),
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.page_size, 20);
        assert!(config.color_enabled);
        assert_eq!(config.locale, "en-US");
    }

    #[test]
    fn save_then_load_keeps_settings() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.set("page_size", "50").unwrap();
        config.set("default_sort.projects", "deadline:desc").unwrap();
        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded.page_size, 50);
        assert_eq!(loaded.default_sort("projects"), Some("deadline:desc"));
        assert!(!manager.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn set_rejects_bad_input() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("theme", "dark"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(config.set("page_size", "0").is_err());
        assert!(config.set("color_enabled", "maybe").is_err());
        assert!(config.set("default_sort.clients", "budget").is_err());
        assert!(config.set("default_sort.clients", "company:sideways").is_err());
        assert!(config.set("locale", "not a locale!").is_err());
        assert_eq!(config, Config::default());

        config.set("locale", "fr-FR").unwrap();
        assert_eq!(config.locale, "fr-FR");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{ "page_size": 5 }"#).unwrap();
        assert_eq!(config.page_size, 5);
        assert_eq!(config.locale, "en-US");
    }

    #[test]
    fn relative_data_file_resolves_under_base() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        assert_eq!(manager.data_file(&config), dir.path().join("data.json"));
        config.set("data_file", "team.json").unwrap();
        assert_eq!(manager.data_file(&config), dir.path().join("team.json"));
    }
}
