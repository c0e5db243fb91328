use std::path::Path;

use blogsmith_core::config::{Config, ConvertConfig, ConverterKind};
use blogsmith_core::{BuildError, Checker, FeedError, SiteBuilder};
use tempfile::TempDir;

fn post(title: &str, date: &str, summary: &str) -> String {
    format!(
        "# {title}\n\n<span class=\"date\">{date}</span>\n\n{summary}\n\n## Details\n\nMore text.\n"
    )
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn config() -> Config {
    let mut config = Config {
        convert: ConvertConfig {
            backend: ConverterKind::Builtin,
            ..ConvertConfig::default()
        },
        ..Config::default()
    };
    config.site.base_url = "https://blog.example".into();
    config.lint.prose = false;
    config
}

fn builder(root: &Path) -> SiteBuilder {
    SiteBuilder::new()
        .source_dir(root.join("source"))
        .output_dir(root.join("out"))
        .index_file(root.join("index.md"))
        .config(config())
}

#[test]
fn builds_homepage_posts_and_feed() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "index.md", "Hi, I write about machine learning.\n");
    write(root, "source/seq2seq.md", &post("Seq2Seq", "2019-03-01", "Encoders and decoders."));
    write(root, "source/attention.md", &post("Attention", "2020-01-01", "Looking around."));
    write(root, "source/notes.txt", "ignored");

    let site = builder(root).build().unwrap();
    let summary = site.render_all().unwrap();

    assert_eq!(summary.pages.len(), 3);
    assert_eq!(summary.suggestions, 0);

    let index = std::fs::read_to_string(root.join("out/index.html")).unwrap();
    assert!(index.contains("<title>Ben Trevett</title>"));
    assert!(index.contains("<p>Hi, I write about machine learning.</p>"));

    let attention = std::fs::read_to_string(root.join("out/posts/attention.html")).unwrap();
    assert!(attention.contains("<title>Ben Trevett - Attention</title>"));
    assert!(attention.contains("<h1>Attention</h1>"));
    assert!(attention.contains(r#"<a href="https://blog.example">Home</a>"#));

    let feed_path = summary.feed.unwrap();
    assert_eq!(feed_path, root.join("out/feed.xml"));
    let feed = std::fs::read_to_string(feed_path).unwrap();
    let newest = feed.find("<title>Attention</title>").unwrap();
    let oldest = feed.find("<title>Seq2Seq</title>").unwrap();
    assert!(newest < oldest);
    assert!(feed.contains("<lastBuildDate>Wed, 01 Jan 2020 00:00:00</lastBuildDate>"));
    assert!(feed.contains("<guid>https://blog.example/posts/seq2seq.html</guid>"));
    assert!(!root.join("out/posts/notes.html").exists());
}

#[test]
fn filter_limits_rendered_posts() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "source/word-embeddings.md", &post("Embeddings", "2019-03-01", "Vectors."));
    write(root, "source/attention.md", &post("Attention", "2020-01-01", "Looking around."));

    let site = builder(root).build().unwrap();
    let (written, _) = site.render_posts(Some("embed")).unwrap();

    assert_eq!(written, vec![root.join("out/posts/word-embeddings.html")]);
    assert!(!root.join("out/posts/attention.html").exists());
}

#[test]
fn empty_source_dir_fails_feed() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("source")).unwrap();

    let site = builder(root).build().unwrap();
    let err = site.render_feed().unwrap_err();

    assert!(matches!(err, BuildError::Feed(FeedError::EmptyFeed)));
    assert!(!root.join("out/feed.xml").exists());
}

#[test]
fn post_without_heading_aborts_the_run() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "source/a.md", &post("Fine", "2019-03-01", "ok"));
    write(root, "source/b.md", "Forgot the heading\n\n<span class=\"date\">2019-04-01</span>\n\nx\n");

    let site = builder(root).build().unwrap();
    assert!(matches!(
        site.render_posts(None),
        Err(BuildError::MalformedPage { .. })
    ));
    assert!(matches!(
        site.render_feed(),
        Err(BuildError::Feed(FeedError::MalformedDocument { .. }))
    ));
    assert!(!root.join("out/feed.xml").exists());
}

#[test]
fn checker_findings_are_counted_not_fatal() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "source/a.md", &post("Typos", "2019-03-01", "This is is repeated."));

    let checkers: Vec<Box<dyn Checker>> = vec![Box::new(blogsmith_core::lint::ProseChecker)];
    let site = builder(root).checkers(checkers).build().unwrap();
    let (written, suggestions) = site.render_posts(None).unwrap();

    assert_eq!(written.len(), 1);
    assert_eq!(suggestions, 1);
}
