use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{ChildStdin, Command, Stdio};

use crate::markdown::{ConvertError, Converter};

/// Runs `pandoc --wrap=none -f markdown -t html`, markdown on stdin.
pub struct PandocConverter {
    program: String,
}

impl PandocConverter {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn resolve(&self) -> Result<PathBuf, ConvertError> {
        which::which(&self.program).map_err(|source| ConvertError::NotFound {
            tool: self.program.clone(),
            source,
        })
    }
}

impl Default for PandocConverter {
    fn default() -> Self {
        Self::new("pandoc")
    }
}

impl Converter for PandocConverter {
    fn convert(&self, markdown: &str) -> Result<String, ConvertError> {
        let program = self.resolve()?;
        let io_err = |source: std::io::Error| ConvertError::Io {
            tool: self.program.clone(),
            source,
        };

        let mut child = Command::new(program)
            .args(["--wrap=none", "-f", "markdown", "-t", "html"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(io_err)?;

        // stdin is fed from its own thread while stdout and stderr drain
        let stdin = child.stdin.take();
        let output = std::thread::scope(|scope| {
            let writer = scope.spawn(move || write_input(stdin, markdown));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
            written.and(output)
        })
        .map_err(io_err)?;

        if !output.status.success() {
            return Err(ConvertError::ExternalTool {
                tool: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// A tool that exits without reading all of its input is judged by its exit
/// status, not by the broken pipe.
fn write_input(stdin: Option<ChildStdin>, input: &str) -> std::io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(input.as_bytes()) {
        Err(e) if e.kind() != ErrorKind::BrokenPipe => Err(e),
        _ => Ok(()),
    }
}
