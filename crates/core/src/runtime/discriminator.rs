//! Union member discrimination by duck-typing.
//!
//! Upstream results carry no type tag. To pick the member of a union a result
//! value belongs to, the executing query's selection is searched for the inline
//! fragments requested at the current response path; a fragment whose fields the
//! value carries names the member. This is the behavior of the generated
//! `resolveType` helper, expressed over a small selection-set model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Meta field that never counts towards a match.
const TYPENAME_FIELD: &str = "__typename";

/// How many of a fragment's fields a value must carry to match it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// At least one selected field is present.
    #[default]
    Any,
    /// Every selected field is present.
    All,
}

impl MatchPolicy {
    /// Name used in configuration and generated calls.
    pub fn as_str(self) -> &'static str {
        match self {
            MatchPolicy::Any => "any",
            MatchPolicy::All => "all",
        }
    }

    fn matches(self, value: &Value, fields: &[&str]) -> bool {
        if fields.is_empty() {
            return false;
        }

        let present = |name: &&str| value.get(*name).is_some_and(is_truthy);

        match self {
            MatchPolicy::Any => fields.iter().any(present),
            MatchPolicy::All => fields.iter().all(present),
        }
    }
}

/// Selections requested at one level of a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    /// Selections in document order.
    pub selections: Vec<Selection>,
}

impl SelectionSet {
    /// Set of `selections`.
    pub fn new(selections: Vec<Selection>) -> Self {
        Self { selections }
    }

    /// Child set of the field answering under `key`. The last matching field
    /// wins, as repeated fields are merged into the last occurrence.
    fn descend(&self, key: &str) -> Option<&SelectionSet> {
        self.selections
            .iter()
            .rev()
            .find_map(|selection| match selection {
                Selection::Field(field) if field.response_key() == key => Some(field),
                _ => None,
            })
            .and_then(|field| field.selection_set.as_ref())
    }
}

/// One selection of a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A field, possibly with a child set.
    Field(FieldSelection),
    /// `... on Type { ... }`.
    InlineFragment(InlineFragment),
    /// Named fragment spread; never inspected.
    FragmentSpread(String),
}

/// A selected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection {
    /// Field name in the schema.
    pub name: String,
    /// Response key replacing the name.
    pub alias: Option<String>,
    /// Child selections of a composite field.
    pub selection_set: Option<SelectionSet>,
}

impl FieldSelection {
    /// Leaf field without alias.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            selection_set: None,
        }
    }

    /// Composite field selecting `selection_set`.
    pub fn with_selections(name: impl Into<String>, selection_set: SelectionSet) -> Self {
        Self {
            name: name.into(),
            alias: None,
            selection_set: Some(selection_set),
        }
    }

    /// Answer under `alias` instead of the field name.
    pub fn aliased(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Key under which the field appears in the response.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// An inline fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineFragment {
    /// Type the fragment applies to.
    pub type_condition: Option<String>,
    /// Selections of the fragment.
    pub selection_set: SelectionSet,
}

impl InlineFragment {
    /// Fragment on `type_condition`.
    pub fn on(type_condition: impl Into<String>, selection_set: SelectionSet) -> Self {
        Self {
            type_condition: Some(type_condition.into()),
            selection_set,
        }
    }

    /// Names of the concrete fields selected directly in this fragment.
    fn field_names(&self) -> Vec<&str> {
        self.selection_set
            .selections
            .iter()
            .filter_map(|selection| match selection {
                Selection::Field(field) => Some(field.name.as_str()),
                _ => None,
            })
            .filter(|name| !name.is_empty() && *name != TYPENAME_FIELD)
            .collect()
    }
}

/// One segment of a response path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathKey {
    /// Field response key.
    Field(String),
    /// List index.
    Index(usize),
}

/// Response path as a parent-linked chain, innermost segment first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePath {
    /// This segment.
    pub key: PathKey,
    /// Enclosing path, `None` at the root.
    pub prev: Option<Box<ResponsePath>>,
}

impl ResponsePath {
    /// Single-segment path.
    pub fn root(key: PathKey) -> Self {
        Self { key, prev: None }
    }

    /// Extend the path by one segment.
    pub fn push(self, key: PathKey) -> Self {
        Self {
            key,
            prev: Some(Box::new(self)),
        }
    }

    /// Build a path from field names, outermost first.
    pub fn from_fields<I, S>(fields: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        fields.into_iter().fold(None, |path, field| {
            let key = PathKey::Field(field.into());
            Some(match path {
                Some(path) => ResponsePath::push(path, key),
                None => ResponsePath::root(key),
            })
        })
    }

    /// Segments from the query root down to this one.
    pub fn keys(&self) -> Vec<&PathKey> {
        let mut keys = Vec::new();
        let mut current = Some(self);

        while let Some(part) = current {
            keys.push(&part.key);
            current = part.prev.as_deref();
        }

        keys.reverse();
        keys
    }
}

/// Selection set in effect at `path`, starting from the operation's top level.
///
/// Segments that match no field (list indices, unknown keys) or whose field has
/// no sub-selection leave the current set unchanged.
pub fn selection_at<'a>(operation: &'a SelectionSet, path: &ResponsePath) -> &'a SelectionSet {
    path.keys()
        .into_iter()
        .fold(operation, |set, key| match key {
            PathKey::Field(name) => set.descend(name).unwrap_or(set),
            PathKey::Index(_) => set,
        })
}

/// Index into `members` of the union member `value` is resolved to.
///
/// The first inline fragment (in selection order) whose type condition names a
/// member and whose fields `value` carries according to `policy` wins. Without a
/// match the first member is chosen; `None` only for an empty union.
pub fn resolve_union_member_index<S: AsRef<str>>(
    value: &Value,
    path: &ResponsePath,
    operation: &SelectionSet,
    members: &[S],
    policy: MatchPolicy,
) -> Option<usize> {
    if members.is_empty() {
        return None;
    }

    let set = selection_at(operation, path);

    let matched = set.selections.iter().find_map(|selection| {
        let Selection::InlineFragment(fragment) = selection else {
            return None;
        };
        let condition = fragment.type_condition.as_deref()?;

        if !policy.matches(value, &fragment.field_names()) {
            return None;
        }

        members.iter().position(|m| m.as_ref() == condition)
    });

    Some(matched.unwrap_or(0))
}

/// Member of `members` that `value` is resolved to. See
/// [`resolve_union_member_index`].
pub fn resolve_union_member<'m, S: AsRef<str>>(
    value: &Value,
    path: &ResponsePath,
    operation: &SelectionSet,
    members: &'m [S],
    policy: MatchPolicy,
) -> Option<&'m S> {
    resolve_union_member_index(value, path, operation, members, policy).and_then(|i| members.get(i))
}

/// JavaScript truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
