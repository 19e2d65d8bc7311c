//! Type resolution: abstract [`TypeDescriptor`]s to target-specific type
//! expressions.
//!
//! Resolution is a pure function of the request, except that referencing a named
//! declaration from another file records that file as a dependency of the
//! requesting emit. Recording is idempotent.

mod graphql;
mod typescript;

pub use graphql::{IS_INPUT_PARAM, RAW_SCALAR};

use std::fmt;
use std::str::FromStr;

use crate::emit::{Connection, EmitMap};
use crate::error::Error;
use crate::model::TypeDescriptor;
use crate::naming::Naming;
use crate::ts::Print;

/// Target representation of a resolution request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    /// Structural declaration form (interfaces, generics, enums).
    TypeScript,
    /// Schema form (object/input types, lists, enums).
    GraphQL,
}

impl FromStr for Representation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "typescript" | "ts" => Ok(Representation::TypeScript),
            "graphql" | "gql" => Ok(Representation::GraphQL),
            _ => Err(Error::UnsupportedRepresentation(s.to_string())),
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Representation::TypeScript => write!(f, "typescript"),
            Representation::GraphQL => write!(f, "graphql"),
        }
    }
}

/// One resolution request.
#[derive(Debug, Clone)]
pub struct TypeRequest<'a> {
    /// Form to resolve to.
    pub representation: Representation,
    /// The type being referenced.
    pub ty: &'a TypeDescriptor,
    /// Where the type is declared.
    pub type_location: Connection,
    /// Where the type is being referenced.
    pub requested_from: Connection,
    /// Schema form only: materialize as input (`true`) or output (`false`)
    /// type. `None` forwards the factory's own `isInput` argument.
    pub is_input_type: Option<bool>,
}

impl<'a> TypeRequest<'a> {
    /// Structural-form request.
    pub fn typescript(ty: &'a TypeDescriptor, type_location: Connection, requested_from: Connection) -> Self {
        Self {
            representation: Representation::TypeScript,
            ty,
            type_location,
            requested_from,
            is_input_type: None,
        }
    }

    /// Schema-form request, forwarding the factory's `isInput`.
    pub fn graphql(ty: &'a TypeDescriptor, type_location: Connection, requested_from: Connection) -> Self {
        Self {
            representation: Representation::GraphQL,
            ..Self::typescript(ty, type_location, requested_from)
        }
    }

    /// Fix the input/output choice instead of forwarding it.
    pub fn input(mut self, is_input_type: bool) -> Self {
        self.is_input_type = Some(is_input_type);
        self
    }

    /// Request for a type argument: declared in the argument's own origin, same
    /// emission; everything else carried over.
    fn generic(&self, ty: &'a TypeDescriptor) -> Self {
        Self {
            representation: self.representation,
            ty,
            type_location: Connection::new(ty.origin.clone(), self.type_location.emission.clone()),
            requested_from: self.requested_from.clone(),
            is_input_type: self.is_input_type,
        }
    }
}

/// Resolves type descriptors against the module naming of one run.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    naming: &'a Naming,
}

impl<'a> TypeResolver<'a> {
    /// Resolver over `naming`.
    pub fn new(naming: &'a Naming) -> Self {
        Self { naming }
    }

    /// Resolve to source text in the requested representation.
    pub fn resolve(&self, request: &TypeRequest<'_>, emit: &mut EmitMap) -> String {
        match request.representation {
            Representation::TypeScript => self.typescript(request, emit).print(),
            Representation::GraphQL => self.graphql(request, emit).print(),
        }
    }

    /// Qualifier for a named declaration referenced from another file; records
    /// the dependency. `None` when no qualification is needed.
    fn cross_file_prefix(&self, request: &TypeRequest<'_>, emit: &mut EmitMap) -> Option<String> {
        let from_another_file = request.type_location != request.requested_from;

        if !from_another_file || !request.ty.kind.is_named() {
            return None;
        }

        let target = Connection::new(
            request.ty.origin.clone(),
            request.type_location.emission.clone(),
        );
        let prefix = self.naming.emission_name(&target);
        emit.add_dependency(&request.requested_from, target);
        Some(prefix)
    }

    /// `Name` or `Prefix.Name` for a named declaration.
    fn qualified_name(&self, request: &TypeRequest<'_>, emit: &mut EmitMap) -> String {
        match self.cross_file_prefix(request, emit) {
            Some(prefix) => format!("{prefix}.{}", request.ty.name),
            None => request.ty.name.clone(),
        }
    }
}
