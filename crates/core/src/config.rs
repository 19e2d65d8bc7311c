//! Generator configuration, loaded from TOML.
//!
//! ```toml
//! out_dir = "generated"
//! union_match = "any"
//!
//! [unknown]
//! origin = "unknown"
//! name = "Unknown"
//!
//! [shared]
//! origin = "shared"
//! name = "Shared"
//!
//! [[emitters]]
//! kind = "typescript-definition"
//! emission = "typescript"
//!
//! [[emitters]]
//! kind = "graphql-definition"
//! emission = "graphql"
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::emitters::EmitterKind;
use crate::error::{Error, Result};
use crate::runtime::discriminator::MatchPolicy;

/// Pseudo-origin holding declarations that do not belong to a real service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideOrigin {
    /// Origin key as it appears in the model.
    pub origin: String,
    /// Display name used for files and qualifiers.
    pub name: String,
}

impl SideOrigin {
    /// Pseudo-origin `origin` displayed as `name`.
    pub fn new(origin: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            name: name.into(),
        }
    }
}

fn default_unknown() -> SideOrigin {
    SideOrigin::new("unknown", "Unknown")
}

fn default_shared() -> SideOrigin {
    SideOrigin::new("shared", "Shared")
}

fn default_nullable() -> bool {
    true
}

/// One emitter pass, in the order it should run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EmitterConfig {
    /// Structural interface/enum declarations.
    TypescriptDefinition {
        /// Emission the declarations are written in.
        emission: String,
    },
    /// Schema object/input/enum factories.
    GraphqlDefinition {
        /// Emission the factories are written in.
        emission: String,
        /// Fields not marked required stay nullable.
        #[serde(default = "default_nullable")]
        nullable: bool,
        /// Appended to schema names on collision.
        #[serde(default)]
        postfix: String,
    },
    /// Per-controller schema objects and the Query/Mutation roots.
    GraphqlAggregator {
        /// Emission of the controller objects and roots.
        emission: String,
    },
    /// Request builders for every controller method.
    ApiBinding {
        /// Emission of the request builders.
        emission: String,
        /// Module exporting the `api` request builder.
        api_path: PathBuf,
    },
}

impl EmitterConfig {
    /// Kind of emitter this entry builds.
    pub fn kind(&self) -> EmitterKind {
        match self {
            EmitterConfig::TypescriptDefinition { .. } => EmitterKind::TypescriptDefinition,
            EmitterConfig::GraphqlDefinition { .. } => EmitterKind::GraphqlDefinition,
            EmitterConfig::GraphqlAggregator { .. } => EmitterKind::GraphqlAggregator,
            EmitterConfig::ApiBinding { .. } => EmitterKind::ApiBinding,
        }
    }

    /// Emission the emitter writes.
    pub fn emission(&self) -> &str {
        match self {
            EmitterConfig::TypescriptDefinition { emission }
            | EmitterConfig::GraphqlDefinition { emission, .. }
            | EmitterConfig::GraphqlAggregator { emission }
            | EmitterConfig::ApiBinding { emission, .. } => emission,
        }
    }
}

/// Where generated schema code imports its runtime helpers from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportConfig {
    /// Module exporting the `Raw` scalar; any extension is dropped on import.
    pub raw_type_path: Option<PathBuf>,
    /// Module exporting `resolveType`; any extension is dropped on import.
    pub resolve_type_path: Option<PathBuf>,
}

/// Static-lint options applied when files are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintConfig {
    /// Prepend `/* tslint:disable */` to every written file.
    #[serde(default)]
    pub add_ts_ignore: bool,
}

/// External formatter run on every written file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Program to run; formatting is skipped when unset.
    pub command: Option<String>,
    /// Arguments placed before the file path.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Full configuration of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Root of the generated tree.
    pub out_dir: PathBuf,
    /// Pseudo-origin for types without a known origin.
    #[serde(default = "default_unknown")]
    pub unknown: SideOrigin,
    /// Pseudo-origin for types shared by every origin.
    #[serde(default = "default_shared")]
    pub shared: SideOrigin,
    /// Emitter passes in run order.
    #[serde(default)]
    pub emitters: Vec<EmitterConfig>,
    /// Runtime helper modules.
    #[serde(default)]
    pub support: SupportConfig,
    /// How union responses pick their member.
    #[serde(default)]
    pub union_match: MatchPolicy,
    /// Lint header options.
    #[serde(default)]
    pub lint: LintConfig,
    /// External formatter.
    #[serde(default)]
    pub format: FormatConfig,
}

impl GeneratorConfig {
    /// Configuration with the default pseudo-origins and no emitters.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            unknown: default_unknown(),
            shared: default_shared(),
            emitters: Vec::new(),
            support: SupportConfig::default(),
            union_match: MatchPolicy::default(),
            lint: LintConfig::default(),
            format: FormatConfig::default(),
        }
    }

    /// Append an emitter pass.
    pub fn with_emitter(mut self, emitter: EmitterConfig) -> Self {
        self.emitters.push(emitter);
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// Relative paths (`out_dir`, support modules, api modules) are resolved
    /// against the file's directory.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut config = Self::from_toml(&text)?;

        if let Some(base) = path.parent() {
            config.rebase(base);
        }

        Ok(config)
    }

    fn rebase(&mut self, base: &Path) {
        let rebase = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        rebase(&mut self.out_dir);
        self.support.raw_type_path.iter_mut().for_each(rebase);
        self.support.resolve_type_path.iter_mut().for_each(rebase);

        for emitter in &mut self.emitters {
            if let EmitterConfig::ApiBinding { api_path, .. } = emitter {
                rebase(api_path);
            }
        }
    }

    /// Each emitter kind may appear once and emissions must not collide.
    pub fn validate(&self) -> Result<()> {
        let mut kinds = HashSet::new();
        let mut emissions = HashSet::new();

        for emitter in &self.emitters {
            if !kinds.insert(emitter.kind()) {
                return Err(Error::Config(format!(
                    "emitter `{}` is configured more than once",
                    emitter.kind()
                )));
            }
            if emitter.emission().is_empty() {
                return Err(Error::Config(format!(
                    "emitter `{}` has an empty emission name",
                    emitter.kind()
                )));
            }
            if !emissions.insert(emitter.emission().to_lowercase()) {
                return Err(Error::Config(format!(
                    "emission `{}` is used by more than one emitter",
                    emitter.emission()
                )));
            }
        }

        if self.unknown.origin == self.shared.origin {
            return Err(Error::Config(
                "`unknown` and `shared` must use different origins".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
out_dir = "generated"
union_match = "all"

[shared]
origin = "common"
name = "Common"

[[emitters]]
kind = "typescript-definition"
emission = "typescript"

[[emitters]]
kind = "graphql-definition"
emission = "graphql"
nullable = false

[[emitters]]
kind = "api-binding"
emission = "api"
api_path = "/src/api"

[lint]
add_ts_ignore = true
"#;

    #[test]
    fn test_parse_config() {
        let config = GeneratorConfig::from_toml(CONFIG).unwrap();
        assert_eq!(config.out_dir, PathBuf::from("generated"));
        assert_eq!(config.unknown, default_unknown());
        assert_eq!(config.shared.name, "Common");
        assert_eq!(config.union_match, MatchPolicy::All);
        assert!(config.lint.add_ts_ignore);
        assert_eq!(config.emitters.len(), 3);
        assert_eq!(
            config.emitters[1],
            EmitterConfig::GraphqlDefinition {
                emission: "graphql".into(),
                nullable: false,
                postfix: String::new(),
            }
        );
        assert_eq!(config.emitters[2].kind(), EmitterKind::ApiBinding);
    }

    #[test]
    fn test_unknown_emitter_kind_is_config_error() {
        let text = "out_dir = \"x\"\n[[emitters]]\nkind = \"swift\"\nemission = \"swift\"\n";
        let err = GeneratorConfig::from_toml(text).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_duplicate_kind_is_rejected() {
        let config = GeneratorConfig::new("out")
            .with_emitter(EmitterConfig::TypescriptDefinition {
                emission: "a".into(),
            })
            .with_emitter(EmitterConfig::TypescriptDefinition {
                emission: "b".into(),
            });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_relative_out_dir_resolves_against_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refract.toml");
        fs::write(
            &path,
            "out_dir = \"gen\"\n\
             [support]\nraw_type_path = \"src/raw.ts\"\n\
             [[emitters]]\nkind = \"typescript-definition\"\nemission = \"typescript\"\n\
             [[emitters]]\nkind = \"api-binding\"\nemission = \"api\"\napi_path = \"/abs/api.ts\"\n",
        )
        .unwrap();

        let config = GeneratorConfig::from_path(&path).unwrap();
        assert_eq!(config.out_dir, dir.path().join("gen"));
        assert_eq!(config.support.raw_type_path, Some(dir.path().join("src/raw.ts")));
        assert_eq!(config.support.resolve_type_path, None);
        assert_eq!(
            config.emitters[1],
            EmitterConfig::ApiBinding {
                emission: "api".into(),
                api_path: "/abs/api.ts".into(),
            }
        );
    }
}
