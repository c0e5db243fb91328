//! Grammar and prose checks run over each post before it is rendered.
//!
//! Checkers are built once per run and handed to the site explicitly.
//! Findings are only reported, they never stop a build.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use crate::config::LintConfig;

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("{checker} request failed: {source}")]
    Request {
        checker: String,
        source: reqwest::Error,
    },
}

/// Text to check and where it came from.
#[derive(Debug, Clone)]
pub struct CheckRequest<'a> {
    pub path: &'a Path,
    pub text: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub path: PathBuf,
    /// 1-based
    pub line: usize,
    /// 1-based, in characters
    pub column: usize,
    pub rule: String,
    pub message: String,
}

impl std::fmt::Display for Suggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} {}",
            self.path.display(),
            self.line,
            self.column,
            self.rule,
            self.message
        )
    }
}

pub trait Checker {
    fn name(&self) -> &str;
    fn check(&self, request: &CheckRequest<'_>) -> Result<Vec<Suggestion>, CheckError>;
}

/// Build the checkers enabled in `config`.
pub fn checkers_from_config(config: &LintConfig) -> Result<Vec<Box<dyn Checker>>, CheckError> {
    let mut checkers: Vec<Box<dyn Checker>> = Vec::new();
    if config.prose {
        checkers.push(Box::new(ProseChecker));
    }
    if let Some(url) = &config.languagetool_url {
        checkers.push(Box::new(LanguageToolChecker::new(url, &config.language)?));
    }
    Ok(checkers)
}

/// Run every checker, logging what they find. A checker that cannot be
/// reached is logged and skipped.
pub fn run_checkers(checkers: &[Box<dyn Checker>], request: &CheckRequest<'_>) -> usize {
    let mut found = 0;
    for checker in checkers {
        match checker.check(request) {
            Ok(suggestions) => {
                for suggestion in &suggestions {
                    tracing::warn!("\t{suggestion}");
                }
                found += suggestions.len();
            }
            Err(e) => tracing::warn!("skipping {} for {}: {e}", checker.name(), request.path.display()),
        }
    }
    found
}

struct Rule {
    name: &'static str,
    pattern: Regex,
    message: &'static str,
}

impl Rule {
    fn new(name: &'static str, pattern: &str, message: &'static str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("valid lint regex"),
            message,
        }
    }
}

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w']+").expect("valid word regex"));

const LEXICAL_ILLUSION: &str = "There's a lexical illusion here: a word is repeated.";

static PROSE_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(
            "uncomparables",
            r"(?i)\b(?:very|most|more|less|quite|somewhat)\s+unique\b",
            "Comparison of an uncomparable: 'unique' can not be compared.",
        ),
        Rule::new(
            "hedging",
            r"(?i)\b(?:I would argue that|to a certain degree|I'm not an expert but)\b",
            "Hedging. Just say it.",
        ),
        Rule::new(
            "cliches",
            r"(?i)\b(?:at the end of the day|low-hanging fruit|think outside the box|in this day and age)\b",
            "'{}' is a cliché.",
        ),
        Rule::new(
            "weasel_words",
            r"(?i)\b(?:very|really|extremely|basically|obviously)\s+(?:very|really|extremely)\b",
            "Stacked intensifiers.",
        ),
        Rule::new(
            "typography.spacing",
            r"[.?!] {2,}\S",
            "More than one space after a sentence.",
        ),
        Rule::new("whitespace.trailing", r"[ \t]+$", "Trailing whitespace."),
    ]
});

/// Local style rules in the spirit of proselint. Fenced code blocks are not
/// prose and are skipped.
#[derive(Default)]
pub struct ProseChecker;

impl ProseChecker {
    fn check_line(&self, path: &Path, line_no: usize, line: &str) -> Vec<Suggestion> {
        let suggest = |start: usize, rule: &str, message: String| Suggestion {
            path: path.to_path_buf(),
            line: line_no,
            column: line[..start].chars().count() + 1,
            rule: rule.to_string(),
            message,
        };

        let mut out = Vec::new();

        // The same word twice in a row, separated only by whitespace
        let words: Vec<_> = WORD.find_iter(line).collect();
        for pair in words.windows(2) {
            let gap = &line[pair[0].end()..pair[1].start()];
            if !gap.is_empty()
                && gap.chars().all(char::is_whitespace)
                && pair[0].as_str().to_lowercase() == pair[1].as_str().to_lowercase()
            {
                out.push(suggest(pair[0].start(), "lexical_illusions", LEXICAL_ILLUSION.into()));
            }
        }

        for rule in PROSE_RULES.iter() {
            for m in rule.pattern.find_iter(line) {
                out.push(suggest(
                    m.start(),
                    rule.name,
                    rule.message.replace("{}", m.as_str()),
                ));
            }
        }
        out
    }
}

impl Checker for ProseChecker {
    fn name(&self) -> &str {
        "prose"
    }

    fn check(&self, request: &CheckRequest<'_>) -> Result<Vec<Suggestion>, CheckError> {
        let mut suggestions = Vec::new();
        let mut in_code = false;
        for (i, line) in request.text.lines().enumerate() {
            if line.trim_start().starts_with("```") {
                in_code = !in_code;
                continue;
            }
            if in_code {
                continue;
            }
            suggestions.extend(self.check_line(request.path, i + 1, line));
        }
        Ok(suggestions)
    }
}

/// Client for a LanguageTool server's `/v2/check` endpoint.
pub struct LanguageToolChecker {
    client: reqwest::blocking::Client,
    endpoint: String,
    language: String,
    ignored_rules: Vec<String>,
}

impl LanguageToolChecker {
    pub fn new(base_url: &str, language: &str) -> Result<Self, CheckError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|source| CheckError::Request {
                checker: "languagetool".into(),
                source,
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/v2/check", base_url.trim_end_matches('/')),
            language: language.to_string(),
            ignored_rules: vec!["EN_QUOTES".into()],
        })
    }
}

impl Checker for LanguageToolChecker {
    fn name(&self) -> &str {
        "languagetool"
    }

    fn check(&self, request: &CheckRequest<'_>) -> Result<Vec<Suggestion>, CheckError> {
        let request_err = |source: reqwest::Error| CheckError::Request {
            checker: self.name().to_string(),
            source,
        };

        let response: LanguageToolResponse = self
            .client
            .post(&self.endpoint)
            .form(&[("text", request.text), ("language", self.language.as_str())])
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(request_err)?
            .json()
            .map_err(request_err)?;

        Ok(response.into_suggestions(request.path, request.text, &self.ignored_rules))
    }
}

#[derive(Debug, Deserialize)]
struct LanguageToolResponse {
    matches: Vec<LanguageToolMatch>,
}

#[derive(Debug, Deserialize)]
struct LanguageToolMatch {
    message: String,
    /// Offset into the checked text in UTF-16 code units
    offset: usize,
    rule: LanguageToolRule,
}

#[derive(Debug, Deserialize)]
struct LanguageToolRule {
    id: String,
}

impl LanguageToolResponse {
    fn into_suggestions(self, path: &Path, text: &str, ignored: &[String]) -> Vec<Suggestion> {
        self.matches
            .into_iter()
            .filter(|m| !ignored.contains(&m.rule.id))
            .map(|m| {
                let (line, column) = line_column(text, m.offset);
                Suggestion {
                    path: path.to_path_buf(),
                    line,
                    column,
                    rule: m.rule.id,
                    message: m.message,
                }
            })
            .collect()
    }
}

/// 1-based line and character column of a UTF-16 offset.
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    let mut units = 0;
    for c in text.chars() {
        if units >= offset {
            break;
        }
        units += c.len_utf16();
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}
