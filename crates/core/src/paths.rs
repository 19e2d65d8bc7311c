//! Relative import paths between generated files.

use std::path::{Component, Path};

use tracing::warn;

/// Import path from the file `source` to the file `target` (both without
/// extension).
///
/// - same file: empty string, no import needed
/// - same directory: `./<file>`
/// - otherwise: the lexical relative path from `source` *as if it were a
///   directory*, with its first `../` removed. Removing that segment turns the
///   file-based path into a directory-based one.
pub fn relative_path(source: &Path, target: &Path) -> String {
    if source == target {
        return String::new();
    }

    if source.parent() == target.parent() {
        let file = target
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        return format!("./{file}");
    }

    let relative = lexical_relative(source, target).replace('\\', "/");

    if !relative.starts_with("../") {
        warn!(
            source = %source.display(),
            target = %target.display(),
            "Import target is nested below the importing file; relative path is unsupported."
        );
    }

    relative.replacen("../", "", 1)
}

/// Normalized components: `.` dropped, `..` folded into the preceding segment.
fn components(path: &Path) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.last().is_some_and(|p| p != ".." && p != "/") {
                    parts.pop();
                } else if parts.last().is_none_or(|p| p != "/") {
                    parts.push("..".into());
                }
            }
            Component::RootDir => parts.push("/".into()),
            Component::Prefix(prefix) => {
                parts.push(prefix.as_os_str().to_string_lossy().into_owned());
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
        }
    }

    parts
}

/// Equivalent of `path.relative(from, to)` on already-absolute paths.
fn lexical_relative(from: &Path, to: &Path) -> String {
    let from = components(from);
    let to = components(to);

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; from.len() - common];
    parts.extend(to[common..].iter().map(String::as_str));
    parts.join("/")
}
