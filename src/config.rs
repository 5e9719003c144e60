use log::info;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_PATH: &str = "md2html.toml";

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
}

/// How the rendered `<div>` is written out.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Wrap the document in a full HTML page.
    pub standalone: bool,
    /// Page title, standalone output only.
    pub title: String,
    /// Stylesheet href, standalone output only.
    pub stylesheet: String,
    pub trailing_newline: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            standalone: false,
            title: String::new(),
            stylesheet: String::new(),
            trailing_newline: true,
        }
    }
}

impl Config {
    /// The bundled default config. Its syntax is checked by the build script.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit` if given. Otherwise load [`DEFAULT_CONFIG_PATH`] from
    /// `dir` when it exists, falling back to the compiled default.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            info!("Using config {}", path.display());
            return Self::load(path);
        }
        let implicit = dir.join(DEFAULT_CONFIG_PATH);
        if implicit.is_file() {
            info!("Using config {}", implicit.display());
            Self::load(&implicit)
        } else {
            info!("Using compiled default config");
            Ok(Self::compiled_default())
        }
    }

    /// Produce the final output text around a rendered document body.
    pub fn wrap(&self, body: &str) -> String {
        let output = &self.output;
        let mut out = String::new();

        if output.standalone {
            out.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"UTF-8\"/>");
            if !output.title.is_empty() {
                out.push_str(&format!("<title>{}</title>", output.title));
            }
            if !output.stylesheet.is_empty() {
                out.push_str(&format!(
                    "<link rel=\"stylesheet\" href=\"{}\"/>",
                    output.stylesheet
                ));
            }
            out.push_str("</head><body>");
            out.push_str(body);
            out.push_str("</body></html>");
        } else {
            out.push_str(body);
        }

        if output.trailing_newline {
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn compiled_default_matches_default() {
        assert_eq!(Config::compiled_default(), Config::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = toml::from_str("[output]\nstandalone = true").unwrap();
        assert!(config.output.standalone);
        assert!(config.output.trailing_newline);
        assert_eq!(config.output.title, "");
    }

    #[test]
    fn load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[output]\ntitle = \"Notes\"\ntrailing_newline = false\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.output.title, "Notes");
        assert!(!config.output.trailing_newline);
    }

    #[test]
    fn load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[output\nstandalone = ").unwrap();
        assert!(matches!(
            Config::load(&path).unwrap_err(),
            ConfigError::Parse { .. }
        ));
    }

    #[test]
    fn resolve_prefers_implicit_file() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Config::resolve(None, dir.path()).unwrap(), Config::default());

        fs::write(
            dir.path().join(DEFAULT_CONFIG_PATH),
            "[output]\nstandalone = true\n",
        )
        .unwrap();
        assert!(Config::resolve(None, dir.path()).unwrap().output.standalone);
    }

    #[test]
    fn wrap_bare() {
        let config = Config::default();
        assert_eq!(config.wrap("<div></div>"), "<div></div>\n");
    }

    #[test]
    fn wrap_standalone() {
        let mut config = Config::default();
        config.output.standalone = true;
        config.output.title = "Doc".into();
        config.output.stylesheet = "style.css".into();
        config.output.trailing_newline = false;
        assert_eq!(
            config.wrap("<div><p>x</p></div>"),
            "<!DOCTYPE html>\n<html><head><meta charset=\"UTF-8\"/><title>Doc</title><link rel=\"stylesheet\" href=\"style.css\"/></head><body><div><p>x</p></div></body></html>"
        );
    }
}
