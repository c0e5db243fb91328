use std::path::{Path, PathBuf};

use crate::metadata::{self, MetadataError};
use crate::scanner::Document;
use crate::template::{INDEX_TEMPLATE, POST_TEMPLATE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    /// The homepage, rendered from `index.md`
    Home,
    /// A blog post from the source directory
    Post,
}

#[derive(Debug)]
pub struct Page {
    pub title: String,
    pub document: Document,
    pub page_type: PageType,
}

impl Page {
    /// Posts must open with a `# ` heading, it becomes the page title.
    pub fn post(document: Document) -> Result<Self, MetadataError> {
        let title = metadata::title(&document.content)?;
        Ok(Self {
            title,
            document,
            page_type: PageType::Post,
        })
    }

    /// The homepage is titled by the site alone, a heading is optional.
    pub fn home(document: Document) -> Self {
        let title = metadata::title(&document.content).unwrap_or_default();
        Self {
            title,
            document,
            page_type: PageType::Home,
        }
    }

    /// Output location relative to the output directory.
    pub fn out_path(&self, posts_dir: &Path) -> PathBuf {
        match self.page_type {
            PageType::Home => PathBuf::from("index.html"),
            PageType::Post => posts_dir.join(format!("{}.html", self.document.stem())),
        }
    }

    pub fn template_name(&self) -> &'static str {
        match self.page_type {
            PageType::Home => INDEX_TEMPLATE,
            PageType::Post => POST_TEMPLATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_requires_heading() {
        let err = Page::post(Document::new("draft.md", "Draft\n")).unwrap_err();
        assert_eq!(err, MetadataError::MissingTitle);

        let page = Page::post(Document::new("rnn.md", "# RNNs\n\nbody")).unwrap();
        assert_eq!(page.title, "RNNs");
        assert_eq!(page.template_name(), POST_TEMPLATE);
    }

    #[test]
    fn out_paths_mirror_source_names() {
        let post = Page::post(Document::new("word-embeddings.md", "# W")).unwrap();
        assert_eq!(
            post.out_path(Path::new("posts")),
            PathBuf::from("posts/word-embeddings.html")
        );

        let home = Page::home(Document::new("index.md", "Hello, I'm Ben."));
        assert_eq!(home.title, "");
        assert_eq!(home.out_path(Path::new("posts")), PathBuf::from("index.html"));
        assert_eq!(home.template_name(), INDEX_TEMPLATE);
    }
}
