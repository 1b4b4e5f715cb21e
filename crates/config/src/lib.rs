//! Configuration loading and validation.
//!
//! Sources are merged in order, later ones winning:
//!
//! 1. built-in defaults,
//! 2. a config file: either the one passed explicitly, or `satchel.toml`
//!    in the platform config directory (when it exists),
//! 3. environment variables prefixed with `SATCHEL_`, with `__` separating
//!    nested keys (`SATCHEL_DRIVE__API_KEY`).
//!
//! ```toml
//! default_shelf = "material"
//!
//! [shelves.material]
//! display_name = "Material"
//! provider = "drive"
//! root = "1Z4tBts_Y55n4m8yRSyV7WzKocVHpi9yC"
//!
//! [shelves.pyq]
//! display_name = "PYQ"
//! provider = "local"
//! root = "/srv/papers"
//!
//! [drive]
//! api_key = "..."
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PREFIX: &str = "SATCHEL_";
const FILE_NAME: &str = "satchel.toml";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Drive,
    Local,
}

/// Which link Drive shelves produce for files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    #[default]
    View,
    Preview,
}

/// One browsable folder tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfConfig {
    /// Name shown for the root folder; defaults to the shelf key
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub provider: ProviderKind,
    /// Drive folder id, or an absolute directory for local shelves
    pub root: String,
    #[serde(default)]
    pub link: LinkStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveConfig {
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Shelf used when none is named on the command line
    #[serde(default)]
    pub default_shelf: Option<String>,
    /// Per-request timeout for remote providers
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub shelves: BTreeMap<String, ShelfConfig>,
    #[serde(default)]
    pub drive: DriveConfig,
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
impl Default for Config {
    fn default() -> Self {
        Self {
            default_shelf: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            shelves: BTreeMap::new(),
            drive: DriveConfig::default(),
        }
    }
}

impl Config {
    /// Location of the implicit config file for this platform.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "satchel").map(|dirs| dirs.config_dir().join(FILE_NAME))
    }

    /// Build the layered sources without extracting anything.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        match explicit {
            Some(path) => figment = Self::merge_file(figment, path)?,
            None => {
                if let Some(path) = Self::default_path().filter(|p| p.is_file()) {
                    tracing::debug!(path = %path.display(), "Using config file from config directory");
                    figment = figment.merge(Toml::file(path));
                }
            },
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
        let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
        tracing::debug!(path = %path.display(), "Using explicit config file");
        Ok(match extension.as_deref() {
            Some("toml") => figment.merge(Toml::file_exact(path)),
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
            Some("json") => figment.merge(Json::file_exact(path)),
            _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
        })
    }

    /// Load and validate configuration from every source.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::from_figment(Self::figment(explicit)?)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.shelves.is_empty() {
            exn::bail!(ErrorKind::NoShelves);
        }
        if let Some(name) = &self.default_shelf
            && !self.shelves.contains_key(name)
        {
            exn::bail!(ErrorKind::UnknownShelf(name.clone()));
        }
        if self.timeout_secs == 0 {
            exn::bail!(ErrorKind::Invalid("timeout_secs must be greater than zero".to_string()));
        }
        for (name, shelf) in &self.shelves {
            match shelf.provider {
                ProviderKind::Drive => {
                    if shelf.root.trim().is_empty() {
                        exn::bail!(ErrorKind::Invalid(format!("shelf `{name}` needs a Drive folder id as its root")));
                    }
                    if self.drive.api_key.as_deref().is_none_or(str::is_empty) {
                        exn::bail!(ErrorKind::Invalid(format!("shelf `{name}` uses Drive, but drive.api_key is not set")));
                    }
                },
                ProviderKind::Local => {
                    if !Path::new(&shelf.root).is_absolute() {
                        exn::bail!(ErrorKind::Invalid(format!("shelf `{name}` root must be an absolute path")));
                    }
                },
            }
        }
        Ok(())
    }

    /// Look up a shelf by name, falling back to `default_shelf`, then to the
    /// first shelf alphabetically.
    pub fn shelf<'a>(&'a self, name: Option<&'a str>) -> Result<(&'a str, &'a ShelfConfig)> {
        let name = match name.or(self.default_shelf.as_deref()) {
            Some(name) => name,
            None => self.shelves.keys().next().map(String::as_str).ok_or_else(|| exn::Exn::from(ErrorKind::NoShelves))?,
        };
        let shelf = self.shelves.get(name).ok_or_else(|| exn::Exn::from(ErrorKind::UnknownShelf(name.to_string())))?;
        Ok((name, shelf))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ShelfConfig {
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.display_name.as_deref().unwrap_or(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EXAMPLE: &str = r#"
        default_shelf = "pyq"

        [shelves.material]
        display_name = "Material"
        root = "1Z4tBts_Y55n4m8yRSyV7WzKocVHpi9yC"

        [shelves.pyq]
        display_name = "PYQ"
        provider = "drive"
        root = "17J2Qw3xEwzXKvzFp6r_avWsVxXuewA5x"
        link = "preview"

        [drive]
        api_key = "secret"
    "#;

    fn from_toml(toml: &str) -> Result<Config> {
        Config::from_figment(Figment::from(Serialized::defaults(Config::default())).merge(Toml::string(toml)))
    }

    #[test]
    fn test_example_config() {
        let config = from_toml(EXAMPLE).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.drive.api_key.as_deref(), Some("secret"));
        let material = &config.shelves["material"];
        assert_eq!(material.provider, ProviderKind::Drive);
        assert_eq!(material.link, LinkStyle::View);
        let (name, pyq) = config.shelf(None).unwrap();
        assert_eq!(name, "pyq");
        assert_eq!(pyq.link, LinkStyle::Preview);
        assert_eq!(pyq.display_name(name), "PYQ");
    }

    #[test]
    fn test_shelf_lookup() {
        let config = from_toml(EXAMPLE).unwrap();
        assert_eq!(config.shelf(Some("material")).unwrap().0, "material");
        let err = config.shelf(Some("chat")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnknownShelf(name) if name == "chat"));
    }

    #[test]
    fn test_first_shelf_when_no_default() {
        let config = from_toml(
            r#"
            [shelves.zeta]
            provider = "local"
            root = "/srv/zeta"
            [shelves.alpha]
            provider = "local"
            root = "/srv/alpha"
        "#,
        )
        .unwrap();
        let (name, shelf) = config.shelf(None).unwrap();
        assert_eq!(name, "alpha");
        assert_eq!(shelf.display_name(name), "alpha");
    }

    #[rstest]
    #[case("", "no shelves configured")]
    #[case(
        "default_shelf = \"nope\"\n[shelves.a]\nprovider = \"local\"\nroot = \"/a\"",
        "unknown shelf: nope"
    )]
    #[case(
        "[shelves.a]\nroot = \"abc\"",
        "invalid configuration: shelf `a` uses Drive, but drive.api_key is not set"
    )]
    #[case(
        "[shelves.a]\nprovider = \"local\"\nroot = \"relative/dir\"",
        "invalid configuration: shelf `a` root must be an absolute path"
    )]
    #[case(
        "timeout_secs = 0\n[shelves.a]\nprovider = \"local\"\nroot = \"/a\"",
        "invalid configuration: timeout_secs must be greater than zero"
    )]
    fn test_invalid(#[case] toml: &str, #[case] expected: &str) {
        let err = from_toml(toml).unwrap_err();
        assert_eq!((*err).to_string(), expected);
    }

    #[test]
    fn test_unknown_provider_fails_to_load() {
        let err = from_toml("[shelves.a]\nprovider = \"dropbox\"\nroot = \"x\"").unwrap_err();
        assert!(matches!(&*err, ErrorKind::Load));
    }

    #[rstest]
    #[case("satchel.toml", "timeout_secs = 5\n[shelves.a]\nprovider = \"local\"\nroot = \"/a\"\n")]
    #[case("satchel.yaml", "timeout_secs: 5\nshelves:\n  a:\n    provider: local\n    root: /a\n")]
    #[case("satchel.json", r#"{"timeout_secs": 5, "shelves": {"a": {"provider": "local", "root": "/a"}}}"#)]
    fn test_explicit_file_formats(#[case] file_name: &str, #[case] contents: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(file_name);
        std::fs::write(&path, contents).unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.shelves["a"].provider, ProviderKind::Local);
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Load));
    }

    #[test]
    fn test_unsupported_format() {
        let err = Config::figment(Some(Path::new("satchel.ini"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnsupportedFormat(_)));
    }
}
