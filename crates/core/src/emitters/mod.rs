//! Emitter passes over the model.
//!
//! Every emitter walks all introspections of a model and fills one [`Emit`] per
//! origin: body lines from [`Emitter::fill_introspection`], then header lines
//! (imports) from [`Emitter::fill_headlines`]. Emitters that need method-local
//! declarations run a fresh sibling emitter over the controller's interplay and
//! merge its output into their own file.

mod api_binding;
mod graphql_aggregator;
mod graphql_definition;
pub mod support;
mod typescript_definition;

use std::fmt;

use indexmap::IndexMap;
use tracing::debug;

pub use api_binding::ApiBinding;
pub use graphql_aggregator::GraphqlAggregator;
pub use graphql_definition::GraphqlDefinition;
pub use typescript_definition::TypescriptDefinition;

use crate::config::EmitterConfig;
use crate::context::GenerationContext;
use crate::emit::{Connection, Emit, EmitMap};
use crate::error::{Error, Result};
use crate::model::{Controller, Introspection, Model};

/// Closed set of emitter kinds; the capability tag sibling lookups go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmitterKind {
    /// Structural declarations.
    TypescriptDefinition,
    /// Schema factories.
    GraphqlDefinition,
    /// Controller objects and the Query/Mutation roots.
    GraphqlAggregator,
    /// Request builders.
    ApiBinding,
}

impl EmitterKind {
    /// Tag used in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            EmitterKind::TypescriptDefinition => "typescript-definition",
            EmitterKind::GraphqlDefinition => "graphql-definition",
            EmitterKind::GraphqlAggregator => "graphql-aggregator",
            EmitterKind::ApiBinding => "api-binding",
        }
    }
}

impl fmt::Display for EmitterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configured emitters by kind, populated once at setup.
#[derive(Debug, Clone, Default)]
pub struct EmitterRegistry {
    emitters: IndexMap<EmitterKind, EmitterConfig>,
}

impl EmitterRegistry {
    /// Registry of `configs`; a later entry of the same kind replaces an earlier one.
    pub fn new(configs: &[EmitterConfig]) -> Self {
        Self {
            emitters: configs.iter().map(|c| (c.kind(), c.clone())).collect(),
        }
    }

    /// Whether an emitter of `kind` is configured.
    pub fn contains(&self, kind: EmitterKind) -> bool {
        self.emitters.contains_key(&kind)
    }

    /// Configuration of the emitter of `kind`.
    pub fn get(&self, kind: EmitterKind) -> Result<&EmitterConfig> {
        self.emitters
            .get(&kind)
            .ok_or(Error::EmitterNotRegistered(kind))
    }

    /// Emission of the sibling emitter of `kind`.
    pub fn emission(&self, kind: EmitterKind) -> Result<&str> {
        self.get(kind).map(EmitterConfig::emission)
    }
}

/// Instantiate the emitter described by `config`.
pub fn build(config: &EmitterConfig) -> Box<dyn Emitter> {
    match config {
        EmitterConfig::TypescriptDefinition { emission } => {
            Box::new(TypescriptDefinition::new(emission.clone()))
        }
        EmitterConfig::GraphqlDefinition {
            emission,
            nullable,
            postfix,
        } => Box::new(GraphqlDefinition::new(emission.clone(), postfix.clone(), *nullable)),
        EmitterConfig::GraphqlAggregator { emission } => {
            Box::new(GraphqlAggregator::new(emission.clone()))
        }
        EmitterConfig::ApiBinding { emission, api_path } => {
            Box::new(ApiBinding::new(emission.clone(), api_path.clone()))
        }
    }
}

/// One emitter pass.
pub trait Emitter {
    /// Kind tag of this emitter.
    fn kind(&self) -> EmitterKind;

    /// Emission this emitter declares its types in.
    fn emission(&self) -> &str;

    /// Emits collected so far.
    fn emit_map(&mut self) -> &mut EmitMap;

    /// Runs for every configured emitter before any of them creates output.
    fn prepare(&mut self, _cx: &mut GenerationContext, _model: &Model) -> Result<()> {
        Ok(())
    }

    /// Push the body of `introspection` into `lines`.
    fn fill_introspection(
        &mut self,
        cx: &mut GenerationContext,
        lines: &mut Vec<String>,
        introspection: &Introspection,
        requested_from: &Connection,
    ) -> Result<()>;

    /// Header lines of the emit for `requested_from`; imports by default.
    fn fill_headlines(&mut self, cx: &mut GenerationContext, requested_from: &Connection) -> Result<()> {
        self.fill_imports(cx, requested_from);
        Ok(())
    }

    /// Merge the import lines of every recorded dependency.
    fn fill_imports(&mut self, cx: &GenerationContext, requested_from: &Connection) {
        if let Some(emit) = self.emit_map().get_mut(&requested_from.origin) {
            let imports = cx.import_lines(emit);
            emit.merge_headlines(&imports);
        }
    }

    /// Runs once after every introspection has been emitted.
    fn finish(&mut self, _cx: &mut GenerationContext) -> Result<()> {
        Ok(())
    }

    /// Emit one introspection: body first, then header lines.
    fn emit_introspection(
        &mut self,
        cx: &mut GenerationContext,
        introspection: &Introspection,
        requested_from_emission: &str,
    ) -> Result<()> {
        let requested_from = Connection::new(introspection.origin.clone(), requested_from_emission);
        self.emit_map().get_or_create(&requested_from);

        let mut lines = Vec::new();
        self.fill_introspection(cx, &mut lines, introspection, &requested_from)?;
        self.emit_map().get_or_create(&requested_from).lines.extend(lines);

        self.fill_headlines(cx, &requested_from)
    }

    /// Emit the whole model as if referenced from files of
    /// `requested_from_emission`, and hand over the result.
    fn create_for(
        &mut self,
        cx: &mut GenerationContext,
        model: &Model,
        requested_from_emission: &str,
    ) -> Result<EmitMap> {
        debug!(
            kind = %self.kind(),
            emission = %self.emission(),
            requested_from = requested_from_emission,
            "Running emitter."
        );

        for introspection in model.introspections() {
            self.emit_introspection(cx, introspection, requested_from_emission)?;
        }
        self.finish(cx)?;

        Ok(std::mem::take(self.emit_map()))
    }

    /// Emit the whole model in this emitter's own emission.
    fn create(&mut self, cx: &mut GenerationContext, model: &Model) -> Result<EmitMap> {
        let emission = self.emission().to_string();
        self.create_for(cx, model, &emission)
    }
}

/// Model holding only the method-local declarations of `controller`.
pub(crate) fn interplay_model(origin: &str, controller: &Controller) -> Model {
    Model::from_introspections([Introspection::from_sources(
        origin,
        controller.interplay.clone(),
    )])
}

/// Fold a nested emitter's output into the parent emit and body.
pub(crate) fn absorb(parent: &mut Emit, lines: &mut Vec<String>, nested: EmitMap) {
    for emit in nested {
        parent.merge_headlines(&emit.headlines);
        for connection in emit.connections {
            parent.add_connection(connection);
        }
        lines.extend(emit.lines);
    }
}

/// Append possibly multi-line text.
pub(crate) fn push_text(lines: &mut Vec<String>, text: &str) {
    lines.extend(text.lines().map(str::to_string));
}
