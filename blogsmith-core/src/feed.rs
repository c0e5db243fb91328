//! RSS 2.0 feed generation.
//!
//! Every post in the source directory becomes one `<item>`, newest first.
//! The channel's `pubDate` and `lastBuildDate` both follow the newest post.

use std::path::Path;

use serde::Serialize;
use tera::Context;

use crate::config::{FeedConfig, SiteConfig};
use crate::metadata::{self, MetadataError};
use crate::scanner::Document;
use crate::template::{FEED_TEMPLATE, TemplateError, TemplateRenderer};

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("{name} is malformed: {source}")]
    MalformedDocument { name: String, source: MetadataError },
    #[error("{name} has no date: {source}")]
    MissingDate { name: String, source: MetadataError },
    #[error("{name} has an invalid date: {source}")]
    InvalidDate { name: String, source: MetadataError },
    #[error("no posts found, refusing to write an empty feed")]
    EmptyFeed,
    #[error("IO error writing feed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl FeedError {
    fn from_metadata(name: &str, source: MetadataError) -> Self {
        let name = name.to_string();
        match source {
            MetadataError::MissingDate => FeedError::MissingDate { name, source },
            MetadataError::InvalidDate(_) => FeedError::InvalidDate { name, source },
            MetadataError::MissingTitle | MetadataError::MissingDescription => {
                FeedError::MalformedDocument { name, source }
            }
        }
    }
}

/// One post as it appears in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedItem {
    pub title: String,
    pub description: String,
    pub link: String,
    /// RFC-822 style, e.g. `Wed, 01 Jan 2020 00:00:00`
    pub pub_date: String,
    /// ISO `YYYY-MM-DD`, only used for ordering
    pub sort_key: String,
    /// Breaks ties between posts published on the same day
    pub source_name: String,
}

impl FeedItem {
    pub fn from_document(
        document: &Document,
        site: &SiteConfig,
        feed: &FeedConfig,
    ) -> Result<Self, FeedError> {
        let to_feed_error = |e| FeedError::from_metadata(&document.name, e);

        let meta = metadata::extract(&document.content).map_err(to_feed_error)?;
        let pub_date = metadata::display_date(&meta.sort_key).map_err(to_feed_error)?;

        Ok(Self {
            title: meta.title,
            description: meta.description,
            link: post_link(site, feed, document),
            pub_date,
            sort_key: meta.sort_key,
            source_name: document.name.clone(),
        })
    }
}

/// `{base_url}/{posts_path}/{stem}.html`
pub fn post_link(site: &SiteConfig, feed: &FeedConfig, document: &Document) -> String {
    let posts_path = feed.posts_path.trim_matches('/');
    if posts_path.is_empty() {
        format!("{}/{}.html", site.base_url(), document.stem())
    } else {
        format!("{}/{}/{}.html", site.base_url(), posts_path, document.stem())
    }
}

/// Build one item per document. The first bad document aborts the whole
/// feed, nothing is skipped.
pub fn build_items(
    documents: &[Document],
    site: &SiteConfig,
    feed: &FeedConfig,
) -> Result<Vec<FeedItem>, FeedError> {
    documents
        .iter()
        .map(|doc| {
            let item = FeedItem::from_document(doc, site, feed)?;
            tracing::debug!("feed item {} ({})", item.title, item.sort_key);
            Ok(item)
        })
        .collect()
}

/// Newest first, then by source file name.
pub fn sort_items(items: &mut [FeedItem]) {
    items.sort_by(|a, b| {
        b.sort_key
            .cmp(&a.sort_key)
            .then_with(|| a.source_name.cmp(&b.source_name))
    });
}

/// Serialize sorted items into the feed document.
pub fn assemble(
    items: &[FeedItem],
    site: &SiteConfig,
    feed: &FeedConfig,
) -> Result<String, FeedError> {
    let latest = items.first().ok_or(FeedError::EmptyFeed)?;

    let text = |s: &str| -> String {
        if feed.escape_text {
            html_escape::encode_text(s).into_owned()
        } else {
            s.to_string()
        }
    };

    let title = feed
        .title
        .clone()
        .unwrap_or_else(|| format!("{} blog", site.title));

    let items: Vec<FeedItem> = items
        .iter()
        .map(|item| FeedItem {
            title: text(&item.title),
            description: text(&item.description),
            ..item.clone()
        })
        .collect();

    let mut context = Context::new();
    context.insert("title", &text(&title));
    context.insert("description", &text(&site.description));
    context.insert("base_url", site.base_url());
    context.insert("feed_path", feed.path.trim_start_matches('/'));
    context.insert("pub_date", &latest.pub_date);
    context.insert("items", &items);

    Ok(TemplateRenderer::new()?.render(FEED_TEMPLATE, &context)?)
}

/// Collect, sort and serialize: the whole feed for a set of documents.
pub fn generate(
    documents: &[Document],
    site: &SiteConfig,
    feed: &FeedConfig,
) -> Result<String, FeedError> {
    let mut items = build_items(documents, site, feed)?;
    sort_items(&mut items);
    assemble(&items, site, feed)
}

pub fn write_feed<P: AsRef<Path>>(path: P, xml: &str) -> Result<(), FeedError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, xml)?;
    tracing::info!("wrote feed to {}", path.display());

    Ok(())
}
