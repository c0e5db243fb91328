use std::path::Path;

use serde::Serialize;
use tera::{Context, Tera};

pub const POST_TEMPLATE: &str = "post.html";
pub const INDEX_TEMPLATE: &str = "index.html";
pub const FEED_TEMPLATE: &str = "feed.xml";

const DEFAULT_TEMPLATES: [(&str, &str); 4] = [
    ("analytics.html", include_str!("../templates/analytics.html")),
    (POST_TEMPLATE, include_str!("../templates/post.html")),
    (INDEX_TEMPLATE, include_str!("../templates/index.html")),
    (FEED_TEMPLATE, include_str!("../templates/feed.xml")),
];

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template error: {0}")]
    TeraError(#[from] tera::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub struct TemplateRenderer {
    tera: Tera,
    context: Context,
}

impl TemplateRenderer {
    /// Built-in templates only.
    pub fn new() -> Result<Self, TemplateError> {
        Ok(Self {
            tera: default_tera()?,
            context: Context::new(),
        })
    }

    /// Templates in `theme_dir` replace the built-in ones of the same name.
    /// A missing theme directory falls back to the built-ins.
    pub fn with_theme<P: AsRef<Path>>(theme_dir: P) -> Result<Self, TemplateError> {
        let theme_dir = theme_dir.as_ref();
        if !theme_dir.is_dir() {
            return Self::new();
        }

        let glob = format!("{}/**/*.html", theme_dir.display());
        let mut tera = Tera::new(&glob)?;
        tera.autoescape_on(vec![]);
        tera.extend(&default_tera()?)?;
        tracing::debug!("loaded theme from {}", theme_dir.display());

        Ok(Self {
            tera,
            context: Context::new(),
        })
    }

    /// Add a value shared by every render
    pub fn add_to_context<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        self.context.insert(key, value);
    }

    /// Render a template with the shared context plus `extra`
    pub fn render(&self, template: &str, extra: &Context) -> Result<String, TemplateError> {
        let mut context = self.context.clone();
        context.extend(extra.clone());
        Ok(self.tera.render(template, &context)?)
    }

    /// Render a template and write it directly to a file
    pub fn render_to_file(
        &self,
        template: &str,
        extra: &Context,
        output_path: &Path,
    ) -> Result<(), TemplateError> {
        let rendered = self.render(template, extra)?;

        // Ensure parent directory exists
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(output_path, rendered)?;
        Ok(())
    }
}

fn default_tera() -> Result<Tera, TemplateError> {
    let mut tera = Tera::default();
    // Page content is already HTML. Titles and feed text are written as
    // authored unless the feed asks for escaping.
    tera.autoescape_on(vec![]);
    tera.add_raw_templates(DEFAULT_TEMPLATES)?;
    Ok(tera)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    fn page_context(title: &str, content: &str) -> Context {
        let mut ctx = Context::new();
        ctx.insert("page", &serde_json::json!({ "title": title }));
        ctx.insert("content", content);
        ctx
    }

    #[test]
    fn post_template_wraps_content() {
        let mut renderer = TemplateRenderer::new().unwrap();
        renderer.add_to_context("site", &SiteConfig::default());

        let html = renderer
            .render(POST_TEMPLATE, &page_context("Attention & Transformers", "<p>Hi</p>\n"))
            .unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Ben Trevett - Attention & Transformers</title>"));
        assert!(html.contains("<p>Hi</p>\n\n        <!-- begin footer -->"));
        assert!(html.contains(r#"<a href="https://www.github.com/bentrevett/">GitHub</a>"#));
        assert!(html.contains("gtag('config', 'UA-124821553-1');"));
        assert!(html.contains(r#"href="../styles.css""#));
    }

    #[test]
    fn analytics_is_optional() {
        let mut renderer = TemplateRenderer::new().unwrap();
        let site = SiteConfig {
            analytics_id: None,
            ..SiteConfig::default()
        };
        renderer.add_to_context("site", &site);

        let html = renderer.render(INDEX_TEMPLATE, &page_context("", "")).unwrap();
        assert!(!html.contains("googletagmanager"));
        assert!(html.contains("<title>Ben Trevett</title>\n    </head>"));
    }

    #[test]
    fn theme_overrides_single_template() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("post.html"), "POST {{ page.title }}").unwrap();

        let mut renderer = TemplateRenderer::with_theme(dir.path()).unwrap();
        renderer.add_to_context("site", &SiteConfig::default());

        let post = renderer.render(POST_TEMPLATE, &page_context("X", "")).unwrap();
        assert_eq!(post, "POST X");

        let index = renderer.render(INDEX_TEMPLATE, &page_context("", "")).unwrap();
        assert!(index.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn missing_theme_dir_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let renderer = TemplateRenderer::with_theme(dir.path().join("absent")).unwrap();
        assert!(renderer.tera.get_template_names().any(|n| n == POST_TEMPLATE));
    }
}
