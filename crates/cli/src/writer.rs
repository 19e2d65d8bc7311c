//! Writing generated files to disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use rayon::prelude::*;
use tracing::{debug, warn};

use refract_core::{Error, FormatConfig, GeneratedFiles, LintConfig, Result};

/// Header that silences lint rules in generated files.
pub const LINT_DISABLE: &str = "/* tslint:disable */";

/// Write every file in parallel, creating directories as needed.
///
/// A missing or failing formatter is logged and never fails the write.
pub fn write_all(files: &GeneratedFiles, lint: LintConfig, format: &FormatConfig) -> Result<usize> {
    let formatter = Formatter::locate(format);
    let entries: Vec<_> = files.iter().collect();

    entries
        .par_iter()
        .map(|(path, lines)| write_file(path, lines, lint, formatter.as_ref()))
        .collect::<Result<Vec<()>>>()?;

    Ok(entries.len())
}

fn write_file(path: &Path, lines: &[String], lint: LintConfig, formatter: Option<&Formatter>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    fs::write(path, render(lines, lint)).map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), lines = lines.len(), "Wrote file.");

    if let Some(formatter) = formatter {
        formatter.run(path);
    }
    Ok(())
}

/// File contents: optional lint header, then the lines, newline-terminated.
pub fn render(lines: &[String], lint: LintConfig) -> String {
    let mut text = String::new();
    if lint.add_ts_ignore {
        text.push_str(LINT_DISABLE);
        text.push('\n');
    }
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}

/// External formatter invoked as `<program> <args...> <file>`.
#[derive(Debug, Clone)]
struct Formatter {
    program: PathBuf,
    args: Vec<String>,
}

impl Formatter {
    fn locate(config: &FormatConfig) -> Option<Self> {
        let command = config.command.as_deref()?;

        match which::which(command) {
            Ok(program) => Some(Self {
                program,
                args: config.args.clone(),
            }),
            Err(err) => {
                warn!(command, error = %err, "Formatter not found, files are left unformatted.");
                None
            }
        }
    }

    fn run(&self, path: &Path) {
        match Command::new(&self.program).args(&self.args).arg(path).output() {
            Ok(output) if output.status.success() => {}
            Ok(output) => warn!(
                path = %path.display(),
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "Formatter failed, keeping the unformatted file."
            ),
            Err(err) => warn!(
                path = %path.display(),
                error = %err,
                "Failed to run formatter, keeping the unformatted file."
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_lint_header() {
        let lines = vec!["export {};".to_string()];

        assert_eq!(render(&lines, LintConfig::default()), "export {};\n");
        assert_eq!(
            render(&lines, LintConfig { add_ts_ignore: true }),
            "/* tslint:disable */\nexport {};\n"
        );
    }

    #[test]
    fn test_missing_formatter_is_skipped() {
        let config = FormatConfig {
            command: Some("refract-no-such-formatter".into()),
            args: Vec::new(),
        };
        assert!(Formatter::locate(&config).is_none());
        assert!(Formatter::locate(&FormatConfig::default()).is_none());
    }
}
