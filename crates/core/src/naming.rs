//! Module naming: display names of origins and emissions, and output file paths.
//!
//! These names qualify cross-file references (`BillingTypescript.Invoice`) and
//! are distinct from schema type names, which come from
//! [`NameRegistry`](crate::names::NameRegistry).

use std::path::{Path, PathBuf};

use crate::config::{GeneratorConfig, SideOrigin};
use crate::emit::Connection;

/// Extension of every generated file.
pub const FILE_EXTENSION: &str = "ts";

/// Folder and file name of the generated support module.
const SUPPORT_FOLDER: &str = "support";
const SUPPORT_FILE: &str = "Runtime";

/// Derives display names and file locations from connections.
#[derive(Debug, Clone)]
pub struct Naming {
    out_dir: PathBuf,
    unknown: SideOrigin,
    shared: SideOrigin,
}

impl Naming {
    /// Naming rooted at `out_dir` with the two pseudo-origins.
    pub fn new(out_dir: impl Into<PathBuf>, unknown: SideOrigin, shared: SideOrigin) -> Self {
        Self {
            out_dir: out_dir.into(),
            unknown,
            shared,
        }
    }

    /// Naming for a generator configuration.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(
            config.out_dir.clone(),
            config.unknown.clone(),
            config.shared.clone(),
        )
    }

    /// Root of the generated tree.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Pseudo-origin for types whose origin is unknown.
    pub fn unknown(&self) -> &SideOrigin {
        &self.unknown
    }

    /// Pseudo-origin for types shared by every origin.
    pub fn shared(&self) -> &SideOrigin {
        &self.shared
    }

    /// Whether `origin` is the shared pseudo-origin.
    pub fn is_shared(&self, origin: &str) -> bool {
        origin == self.shared.origin
    }

    /// Display name of an origin; pseudo-origins use their configured names.
    pub fn origin_name(&self, origin: &str) -> String {
        let name = if origin == self.unknown.origin {
            self.unknown.name.as_str()
        } else if origin == self.shared.origin {
            self.shared.name.as_str()
        } else {
            origin
        };
        upper_camel(name)
    }

    /// Qualifier used when importing the file of `connection`.
    pub fn emission_name(&self, connection: &Connection) -> String {
        format!(
            "{}{}",
            self.origin_name(&connection.origin),
            upper_camel(&connection.emission)
        )
    }

    /// `<out_dir>/<emission lowercased>/<OriginName>[.ts]`
    pub fn file_path(&self, connection: &Connection, with_extension: bool) -> PathBuf {
        let folder = connection.emission.to_lowercase();
        let name = self.origin_name(&connection.origin);
        let file = if with_extension {
            format!("{name}.{FILE_EXTENSION}")
        } else {
            name
        };
        self.out_dir.join(folder).join(file)
    }

    /// Location of the generated support module.
    pub fn support_path(&self, with_extension: bool) -> PathBuf {
        let file = if with_extension {
            format!("{SUPPORT_FILE}.{FILE_EXTENSION}")
        } else {
            SUPPORT_FILE.to_string()
        };
        self.out_dir.join(SUPPORT_FOLDER).join(file)
    }
}

/// Upper-camel-case a name: separators are dropped and every word gets an upper
/// first letter; the rest of each word is kept as is.
pub fn upper_camel(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut upper_next = true;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '$' {
            if upper_next {
                result.extend(c.to_uppercase());
                upper_next = false;
            } else {
                result.push(c);
            }
        } else {
            upper_next = true;
        }
    }

    result
}
