use std::path::{Path, PathBuf};

use tera::Context;

use crate::config::Config;
use crate::feed::{self, FeedError};
use crate::lint::{self, CheckError, CheckRequest, Checker};
use crate::markdown::{self, ConvertError, Converter};
use crate::metadata::MetadataError;
use crate::scanner::{Document, ScanError, SiteScanner};
use crate::site::Page;
use crate::template::{TemplateError, TemplateRenderer};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Source directory not specified")]
    MissingSourceDir,
    #[error("{} is missing a header: {source}", path.display())]
    MalformedPage {
        path: PathBuf,
        source: MetadataError,
    },
    #[error("Converter error on {}: {source}", path.display())]
    Convert {
        path: PathBuf,
        source: ConvertError,
    },
    #[error("Converter setup failed: {0}")]
    ConverterSetup(ConvertError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error(transparent)]
    Check(#[from] CheckError),
}

/// What a build produced.
#[derive(Debug, Default)]
pub struct BuildSummary {
    pub pages: Vec<PathBuf>,
    pub feed: Option<PathBuf>,
    pub suggestions: usize,
}

pub struct SiteBuilder {
    source_dir: Option<PathBuf>,
    output_dir: PathBuf,
    index_file: PathBuf,
    theme_dir: Option<PathBuf>,
    config: Config,
    converter: Option<Box<dyn Converter>>,
    checkers: Option<Vec<Box<dyn Checker>>>,
}

impl Default for SiteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteBuilder {
    pub fn new() -> Self {
        Self {
            source_dir: None,
            output_dir: PathBuf::from("."),
            index_file: PathBuf::from("index.md"),
            theme_dir: None,
            config: Config::default(),
            converter: None,
            checkers: None,
        }
    }

    // Required configuration
    pub fn source_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source_dir = Some(path.as_ref().to_path_buf());
        self
    }

    // Optional paths
    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = path.as_ref().to_path_buf();
        self
    }

    pub fn index_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.index_file = path.as_ref().to_path_buf();
        self
    }

    pub fn theme_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.theme_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Replace the converter chosen by `[convert]` in the config.
    pub fn converter(mut self, converter: Box<dyn Converter>) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Replace the checkers chosen by `[lint]` in the config.
    pub fn checkers(mut self, checkers: Vec<Box<dyn Checker>>) -> Self {
        self.checkers = Some(checkers);
        self
    }

    pub fn build(self) -> Result<Site, BuildError> {
        let source_dir = self.source_dir.ok_or(BuildError::MissingSourceDir)?;

        let mut renderer = match &self.theme_dir {
            Some(dir) => TemplateRenderer::with_theme(dir)?,
            None => TemplateRenderer::new()?,
        };
        renderer.add_to_context("site", &self.config.site);

        let converter = match self.converter {
            Some(converter) => converter,
            None => markdown::converter_from_config(&self.config.convert)
                .map_err(BuildError::ConverterSetup)?,
        };

        let checkers = match self.checkers {
            Some(checkers) => checkers,
            None => lint::checkers_from_config(&self.config.lint)?,
        };

        Ok(Site {
            source_dir,
            output_dir: self.output_dir,
            index_file: self.index_file,
            config: self.config,
            renderer,
            converter,
            checkers,
        })
    }
}

pub struct Site {
    source_dir: PathBuf,
    output_dir: PathBuf,
    index_file: PathBuf,
    config: Config,
    renderer: TemplateRenderer,
    converter: Box<dyn Converter>,
    checkers: Vec<Box<dyn Checker>>,
}

impl Site {
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn posts_dir(&self) -> PathBuf {
        PathBuf::from(self.config.feed.posts_path.trim_matches('/'))
    }

    fn render_page(&self, page: &Page) -> Result<PathBuf, BuildError> {
        let content = self
            .converter
            .convert(&page.document.content)
            .map_err(|source| BuildError::Convert {
                path: page.document.path.clone(),
                source,
            })?;

        let mut context = Context::new();
        context.insert("page", &serde_json::json!({
            "title": page.title,
            "source": page.document.name,
        }));
        context.insert("content", &content);

        let output_path = self.output_dir.join(page.out_path(&self.posts_dir()));
        self.renderer
            .render_to_file(page.template_name(), &context, &output_path)?;

        Ok(output_path)
    }

    /// Render `index.md` to `index.html`.
    pub fn render_index(&self) -> Result<PathBuf, BuildError> {
        tracing::info!("formatting {}", self.index_file.display());
        let page = Page::home(Document::read(&self.index_file)?);
        self.render_page(&page)
    }

    /// Render every post, or only those whose file name contains `filter`.
    /// Returns the written paths and the number of checker findings.
    pub fn render_posts(&self, filter: Option<&str>) -> Result<(Vec<PathBuf>, usize), BuildError> {
        let documents = SiteScanner::new(&self.source_dir).filter(filter).scan()?;

        let mut written = Vec::new();
        let mut suggestions = 0;
        for document in documents {
            tracing::info!("generating html from {}", document.path.display());

            suggestions += lint::run_checkers(
                &self.checkers,
                &CheckRequest {
                    path: &document.path,
                    text: &document.content,
                },
            );

            let path = document.path.clone();
            let page =
                Page::post(document).map_err(|source| BuildError::MalformedPage { path, source })?;
            written.push(self.render_page(&page)?);
        }

        Ok((written, suggestions))
    }

    /// Generate the RSS feed from every post in the source directory.
    pub fn render_feed(&self) -> Result<PathBuf, BuildError> {
        let documents = SiteScanner::new(&self.source_dir).scan()?;
        let xml = feed::generate(&documents, &self.config.site, &self.config.feed)?;

        let feed_path = self
            .output_dir
            .join(self.config.feed.path.trim_start_matches('/'));
        feed::write_feed(&feed_path, &xml)?;

        Ok(feed_path)
    }

    /// Homepage (when `index.md` exists), all posts, then the feed.
    pub fn render_all(&self) -> Result<BuildSummary, BuildError> {
        let mut summary = BuildSummary::default();

        if self.index_file.is_file() {
            summary.pages.push(self.render_index()?);
        } else {
            tracing::debug!("no {}, skipping homepage", self.index_file.display());
        }

        let (posts, suggestions) = self.render_posts(None)?;
        summary.pages.extend(posts);
        summary.suggestions = suggestions;

        summary.feed = Some(self.render_feed()?);

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConvertConfig, ConverterKind};

    fn builtin_config() -> Config {
        Config {
            convert: ConvertConfig {
                backend: ConverterKind::Builtin,
                ..ConvertConfig::default()
            },
            ..Config::default()
        }
    }

    #[test]
    fn source_dir_is_required() {
        assert!(matches!(
            SiteBuilder::new().config(builtin_config()).build(),
            Err(BuildError::MissingSourceDir)
        ));
    }

    #[test]
    fn posts_dir_ignores_slashes() {
        let mut config = builtin_config();
        config.feed.posts_path = "/blog/".into();
        let site = SiteBuilder::new()
            .source_dir("source")
            .config(config)
            .checkers(Vec::new())
            .build()
            .unwrap();
        assert_eq!(site.posts_dir(), PathBuf::from("blog"));
    }
}
