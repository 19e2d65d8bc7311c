//! State shared by every emitter during one generation run.

use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;
use crate::emit::Emit;
use crate::emitters::{EmitterKind, EmitterRegistry};
use crate::names::{NameRegistry, NameRequest};
use crate::naming::Naming;
use crate::paths::relative_path;
use crate::resolve::TypeResolver;
use crate::runtime::MatchPolicy;
use crate::ts::{Print, TsImport};

/// Modules the generated schema code imports its helpers from, without
/// extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportPaths {
    /// Exports `Raw`.
    pub raw_type: PathBuf,
    /// Exports `resolveType`.
    pub resolve_type: PathBuf,
    /// At least one of the two points at the generated support module.
    pub generated: bool,
}

/// Explicit per-run context: naming, sibling emitter lookup and the schema
/// name registry. Created fresh for every run so runs never share names.
#[derive(Debug)]
pub struct GenerationContext {
    /// Display names and file locations.
    pub naming: Naming,
    /// Configured emitters, looked up by kind.
    pub emitters: EmitterRegistry,
    /// Schema names allocated so far in this run.
    pub names: NameRegistry,
    /// Where schema code imports its runtime helpers from.
    pub support: SupportPaths,
    /// Policy passed to every generated `resolveType` call.
    pub union_match: MatchPolicy,
}

impl GenerationContext {
    /// Fresh context for one run of `config`.
    pub fn new(config: &GeneratorConfig) -> Self {
        let naming = Naming::from_config(config);
        let generated_support = naming.support_path(false);

        let external = |path: &Option<PathBuf>| path.as_deref().map(strip_extension);
        let raw_type = external(&config.support.raw_type_path);
        let resolve_type = external(&config.support.resolve_type_path);

        let emitters = EmitterRegistry::new(&config.emitters);
        let needs_support = emitters.contains(EmitterKind::GraphqlDefinition)
            || emitters.contains(EmitterKind::GraphqlAggregator);

        let support = SupportPaths {
            generated: needs_support && (raw_type.is_none() || resolve_type.is_none()),
            raw_type: raw_type.unwrap_or_else(|| generated_support.clone()),
            resolve_type: resolve_type.unwrap_or(generated_support),
        };

        Self {
            naming,
            emitters,
            names: NameRegistry::new(),
            support,
            union_match: config.union_match,
        }
    }

    /// Type resolver bound to this run's naming.
    pub fn resolver(&self) -> TypeResolver<'_> {
        TypeResolver::new(&self.naming)
    }

    /// Allocate a unique schema name.
    pub fn register_name(&mut self, request: &NameRequest<'_>) -> String {
        self.names.register(&self.naming, request)
    }

    /// `import * as <Qualifier> from '<path>';` for every dependency of `emit`
    /// that lives in another file.
    pub fn import_lines(&self, emit: &Emit) -> Vec<String> {
        let source = self.naming.file_path(&emit.connection(), false);
        let mut imports: Vec<String> = Vec::new();

        for connection in &emit.connections {
            let target = self.naming.file_path(connection, false);
            let path = relative_path(&source, &target);

            if path.is_empty() {
                continue;
            }

            let line = TsImport::namespace(self.naming.emission_name(connection), path).print();
            if !imports.contains(&line) {
                imports.push(line);
            }
        }

        imports
    }

    /// `import {items} from '<path>';` for a module outside the connection
    /// address space.
    pub fn module_import(&self, emit: &Emit, items: &[&str], module: &Path) -> Option<String> {
        let source = self.naming.file_path(&emit.connection(), false);
        let path = relative_path(&source, module);

        if path.is_empty() {
            return None;
        }

        Some(TsImport::named(items, path).print())
    }
}

/// Module specifier for a file path: the extension is dropped.
pub fn strip_extension(path: &Path) -> PathBuf {
    path.with_extension("")
}
