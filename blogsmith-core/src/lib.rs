pub mod builder;
pub mod config;
pub mod feed;
pub mod lint;
pub mod markdown;
pub mod metadata;
pub mod pandoc;
pub mod scanner;
pub mod site;
pub mod template;

// Re-export main types
pub use builder::{BuildError, BuildSummary, Site, SiteBuilder};
pub use feed::{FeedError, FeedItem};
pub use lint::{CheckRequest, Checker, Suggestion};
pub use markdown::{BuiltinConverter, ConvertError, Converter};
pub use pandoc::PandocConverter;
pub use scanner::{Document, SiteScanner};
pub use site::{Page, PageType};
pub use template::{TemplateError, TemplateRenderer};
