//! Orchestration of one generation run.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::config::GeneratorConfig;
use crate::context::GenerationContext;
use crate::emit::{Connection, Emit, EmitMap};
use crate::emitters::{self, support};
use crate::error::Result;
use crate::model::Model;

/// Body of a module that is imported but declares nothing.
const EMPTY_MODULE: &str = "export {};";

/// Generated files: path (with extension) -> lines, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedFiles {
    files: IndexMap<PathBuf, Vec<String>>,
}

impl GeneratedFiles {
    /// Lines of the file at `path`.
    pub fn get(&self, path: &Path) -> Option<&[String]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Whether a file was generated at `path`.
    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// Generated paths in emission order.
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.keys()
    }

    /// Paths and lines in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &Vec<String>)> {
        self.files.iter()
    }

    /// Number of generated files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing was generated.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn insert(&mut self, path: PathBuf, lines: Vec<String>) {
        self.files.insert(path, lines);
    }
}

impl IntoIterator for GeneratedFiles {
    type Item = (PathBuf, Vec<String>);
    type IntoIter = indexmap::map::IntoIter<PathBuf, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

/// Runs every configured emitter over a model.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Generator for a validated configuration.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this generator runs.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Emit all files for `model`.
    ///
    /// Every run starts from a fresh [`GenerationContext`], so names allocated
    /// in one run never leak into the next.
    pub fn generate(&self, model: &Model) -> Result<GeneratedFiles> {
        let mut model = model.clone();
        model.sort_enumerations_last();

        let mut cx = GenerationContext::new(&self.config);
        let mut passes: Vec<_> = self.config.emitters.iter().map(emitters::build).collect();

        for emitter in &mut passes {
            emitter.prepare(&mut cx, &model)?;
        }

        let mut emits: Vec<Emit> = Vec::new();
        for emitter in &mut passes {
            let emit_map: EmitMap = emitter.create(&mut cx, &model)?;
            emits.extend(emit_map);
        }

        let mut files = GeneratedFiles::default();
        let mut written: Vec<Connection> = Vec::new();

        for emit in &emits {
            if emit.lines.iter().all(String::is_empty) {
                debug!(origin = %emit.origin, emission = %emit.emission, "Skipping emit without declarations.");
                continue;
            }
            files.insert(cx.naming.file_path(&emit.connection(), true), emit.page());
            written.push(emit.connection());
        }

        // Imports must always resolve, even to a file that declares nothing.
        for emit in &emits {
            if !written.contains(&emit.connection()) {
                continue;
            }
            for connection in &emit.connections {
                if written.contains(connection) {
                    continue;
                }
                warn!(
                    origin = %connection.origin,
                    emission = %connection.emission,
                    requested_by = %emit.origin,
                    "Referenced module has no declarations, emitting an empty module."
                );
                files.insert(
                    cx.naming.file_path(connection, true),
                    vec![EMPTY_MODULE.to_string()],
                );
                written.push(connection.clone());
            }
        }

        if cx.support.generated {
            files.insert(
                cx.naming.support_path(true),
                support::runtime_module(cx.union_match),
            );
        }

        debug!(files = files.len(), "Generation finished.");
        Ok(files)
    }
}
