use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parsing(#[from] toml::de::Error),
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub feed: FeedConfig,
    pub convert: ConvertConfig,
    pub lint: LintConfig,
}

impl Config {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&data)?;

        Ok(config)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct SiteConfig {
    /// Shown in the header and used as the page title prefix
    pub title: String,
    pub description: String,
    /// Absolute site URL without a trailing slash
    pub base_url: String,
    /// Google Analytics property, the snippet is left out when unset
    pub analytics_id: Option<String>,
    pub navigation: Vec<Link>,
}

impl SiteConfig {
    /// `base_url` with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Ben Trevett".into(),
            description: "Posts by Ben Trevett".into(),
            base_url: "https://www.bentrevett.com".into(),
            analytics_id: Some("UA-124821553-1".into()),
            navigation: vec![
                Link {
                    text: "GitHub".into(),
                    link: "https://www.github.com/bentrevett/".into(),
                },
                Link {
                    text: "Twitter".into(),
                    link: "https://www.twitter.com/ben_trevett/".into(),
                },
            ],
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct FeedConfig {
    /// Channel title, falls back to "<site title> blog"
    pub title: Option<String>,
    /// Feed location relative to the output directory
    pub path: String,
    /// Directory under `base_url` that post links point into
    pub posts_path: String,
    /// Entity-escape item titles and descriptions. Off by default so that
    /// markup in a description reaches readers untouched.
    pub escape_text: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: None,
            path: "feed.xml".into(),
            posts_path: "posts".into(),
            escape_text: false,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConverterKind {
    #[default]
    Pandoc,
    Builtin,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct ConvertConfig {
    pub backend: ConverterKind,
    /// Name or path of the pandoc executable
    pub pandoc: String,
    pub syntax_theme: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            backend: ConverterKind::Pandoc,
            pandoc: "pandoc".into(),
            syntax_theme: "base16-ocean.dark".into(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct LintConfig {
    pub prose: bool,
    /// Base URL of a LanguageTool server, e.g. `http://localhost:8081`
    pub languagetool_url: Option<String>,
    pub language: String,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            prose: true,
            languagetool_url: None,
            language: "en-US".into(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [site]
            title = "Jane Doe"
            base_url = "https://jane.example/"

            [convert]
            backend = "builtin"
            "#,
        )
        .unwrap();

        assert_eq!(config.site.title, "Jane Doe");
        assert_eq!(config.site.base_url(), "https://jane.example");
        assert_eq!(config.site.description, "Posts by Ben Trevett");
        assert_eq!(config.convert.backend, ConverterKind::Builtin);
        assert_eq!(config.feed.path, "feed.xml");
        assert!(!config.feed.escape_text);
    }

    #[test]
    fn navigation_links_parse() {
        let config: Config = toml::from_str(
            r#"
            [site]
            navigation = [{ text = "Mastodon", link = "https://example.social/@me" }]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.site.navigation,
            vec![Link {
                text: "Mastodon".into(),
                link: "https://example.social/@me".into(),
            }]
        );
    }
}
