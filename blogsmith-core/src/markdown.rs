use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::{ConvertConfig, ConverterKind};
use crate::pandoc::PandocConverter;

// Initialize syntax highlighting resources once
static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("{tool} failed ({status}): {stderr}")]
    ExternalTool {
        tool: String,
        status: String,
        stderr: String,
    },
    #[error("{tool} not found: {source}")]
    NotFound { tool: String, source: which::Error },
    #[error("IO error talking to {tool}: {source}")]
    Io { tool: String, source: std::io::Error },
    #[error("unknown syntax theme: {0}")]
    UnknownTheme(String),
}

/// Turns a markdown document into an HTML fragment.
pub trait Converter {
    fn convert(&self, markdown: &str) -> Result<String, ConvertError>;
}

/// Pick the converter named in the configuration.
pub fn converter_from_config(config: &ConvertConfig) -> Result<Box<dyn Converter>, ConvertError> {
    let converter: Box<dyn Converter> = match config.backend {
        ConverterKind::Pandoc => Box::new(PandocConverter::new(&config.pandoc)),
        ConverterKind::Builtin => Box::new(BuiltinConverter::new(&config.syntax_theme)?),
    };
    Ok(converter)
}

/// In-process renderer for machines without pandoc. Fenced code blocks are
/// highlighted with syntect.
pub struct BuiltinConverter {
    theme: String,
}

impl BuiltinConverter {
    pub fn new<S: Into<String>>(theme: S) -> Result<Self, ConvertError> {
        let theme = theme.into();
        if !THEME_SET.themes.contains_key(&theme) {
            return Err(ConvertError::UnknownTheme(theme));
        }
        Ok(Self { theme })
    }
}

impl Default for BuiltinConverter {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

impl Converter for BuiltinConverter {
    fn convert(&self, markdown: &str) -> Result<String, ConvertError> {
        let parser = Parser::new_ext(markdown, Options::all());

        let events: Vec<Event> = parser.collect();
        let mut processed_events = Vec::new();
        let mut i = 0;

        while i < events.len() {
            match &events[i] {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang))) => {
                    let mut code_content = String::new();
                    i += 1;

                    while i < events.len() {
                        match &events[i] {
                            Event::End(TagEnd::CodeBlock) => break,
                            Event::Text(text) => code_content.push_str(text),
                            _ => {}
                        }
                        i += 1;
                    }

                    processed_events.push(Event::Html(self.highlight(lang, &code_content).into()));
                }
                event => processed_events.push(event.clone()),
            }
            i += 1;
        }

        let mut out = String::new();
        html::push_html(&mut out, processed_events.into_iter());

        Ok(out)
    }
}

impl BuiltinConverter {
    fn highlight(&self, lang: &str, code: &str) -> String {
        let plain = || format!("<pre><code>{}</code></pre>\n", html_escape::encode_text(code));

        let syntax = SYNTAX_SET.find_syntax_by_token(lang).or_else(|| {
            // Fallback mappings for unsupported languages
            match lang {
                "toml" => SYNTAX_SET.find_syntax_by_name("YAML"),
                _ => None,
            }
        });

        match (syntax, THEME_SET.themes.get(&self.theme)) {
            (Some(syntax), Some(theme)) => {
                highlighted_html_for_string(code, &SYNTAX_SET, syntax, theme)
                    .unwrap_or_else(|_| plain())
            }
            _ => plain(),
        }
    }
}
