//! Runtime semantics of the generated schema code: identity-caching schema
//! factories and union member discrimination.

pub mod discriminator;
pub mod schema;

pub use discriminator::{
    FieldSelection, InlineFragment, MatchPolicy, PathKey, ResponsePath, Selection, SelectionSet,
    resolve_union_member, resolve_union_member_index,
};
pub use schema::{DefinitionFactory, FieldDef, ObjectType, SchemaType};
