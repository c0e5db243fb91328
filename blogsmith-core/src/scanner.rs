use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid path: {}", .0.display())]
    InvalidPath(PathBuf),
}

/// A markdown source file, read once and never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name including the extension, e.g. `attention.md`
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

impl Document {
    pub fn new<S: Into<String>>(name: S, content: S) -> Self {
        let name = name.into();
        Self {
            path: PathBuf::from(&name),
            name,
            content: content.into(),
        }
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ScanError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .ok_or_else(|| ScanError::InvalidPath(path.to_path_buf()))?
            .to_string_lossy()
            .to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            name,
            path: path.to_path_buf(),
            content,
        })
    }

    /// File name without its final extension.
    pub fn stem(&self) -> String {
        Path::new(&self.name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.name.clone())
    }
}

pub struct SiteScanner {
    source_dir: PathBuf,
    filter: Option<String>,
}

impl SiteScanner {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            source_dir: path.as_ref().to_path_buf(),
            filter: None,
        }
    }

    /// Only keep documents whose file name contains `filter`.
    pub fn filter<S: Into<String>>(mut self, filter: Option<S>) -> Self {
        self.filter = filter.map(Into::into);
        self
    }

    /// Read every `.md` file directly inside the source directory whose name
    /// passes the filter. Files the filter rejects are never opened.
    ///
    /// Directory listing order differs between platforms, so documents come
    /// back sorted by file name.
    pub fn scan(&self) -> Result<Vec<Document>, ScanError> {
        tracing::debug!("Scanning: {}", self.source_dir.display());

        let io_err = |source: std::io::Error| ScanError::Io {
            path: self.source_dir.clone(),
            source,
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(&self.source_dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();

            if path.is_file() && get_extension(&path) == "md" && self.matches(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        paths.iter().map(Document::read).collect()
    }

    fn matches(&self, path: &Path) -> bool {
        match (&self.filter, path.file_name()) {
            (None, _) => true,
            (Some(filter), Some(name)) => name.to_string_lossy().contains(filter.as_str()),
            (Some(_), None) => false,
        }
    }
}

fn get_extension(path: &Path) -> String {
    match path.extension() {
        Some(ext) => ext.to_string_lossy().to_string(),
        None => "Unknown".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn scan_sorts_by_name_and_skips_other_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "zeta.md", "# Zeta");
        write(dir.path(), "alpha.md", "# Alpha");
        write(dir.path(), "notes.txt", "not markdown");
        std::fs::create_dir(dir.path().join("drafts.md")).unwrap();

        let docs = SiteScanner::new(dir.path()).scan().unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.name.as_str()).collect();

        assert_eq!(names, vec!["alpha.md", "zeta.md"]);
        assert_eq!(docs[0].content, "# Alpha");
    }

    #[test]
    fn scan_applies_name_filter() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "attention.md", "# A");
        write(dir.path(), "word-embeddings.md", "# W");

        let docs = SiteScanner::new(dir.path())
            .filter(Some("embed"))
            .scan()
            .unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "word-embeddings.md");
    }

    #[test]
    fn filtered_out_files_are_not_read() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "attention.md", "# Attention");
        std::fs::write(dir.path().join("legacy.md"), [0xff, 0xfe, 0x00]).unwrap();

        let docs = SiteScanner::new(dir.path())
            .filter(Some("attention"))
            .scan()
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "attention.md");

        let err = SiteScanner::new(dir.path()).scan().unwrap_err();
        assert!(matches!(err, ScanError::Io { ref path, .. } if path.ends_with("legacy.md")));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = SiteScanner::new(dir.path().join("nope")).scan().unwrap_err();
        assert!(matches!(err, ScanError::Io { .. }));
    }

    #[test]
    fn stem_drops_only_the_last_extension() {
        assert_eq!(Document::new("v1.2-notes.md", "").stem(), "v1.2-notes");
    }
}
