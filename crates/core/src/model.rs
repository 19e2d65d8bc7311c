//! Introspected API model consumed by the emitters.
//!
//! The model is produced upstream (one introspection per origin) and is read-only
//! here. It is deserialized from JSON; field names follow the camelCase
//! convention of the introspection output.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// Classification of a type descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    /// `boolean`.
    Boolean,
    /// Any numeric type.
    Number,
    /// `string`.
    String,
    /// A date or timestamp.
    Date,
    /// An untyped object.
    Object,
    /// No value.
    Void,
    /// A list; the element type is the only generic.
    List,
    /// A keyed map; the value type is the last generic.
    Map,
    /// A type parameter of the enclosing declaration.
    TypeParameter,
    /// A record/interface declaration.
    Entity,
    /// An enumeration declaration.
    Enumeration,
}

impl TypeKind {
    /// Named declarations live in a file of their own and need an import when
    /// referenced from elsewhere.
    pub fn is_named(self) -> bool {
        matches!(self, TypeKind::Entity | TypeKind::Enumeration)
    }
}

/// Abstract description of a type as referenced from a field, a parameter or a
/// response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    /// Short name of the type.
    pub name: String,
    /// Origin that declares the type.
    pub origin: String,
    /// Classification.
    pub kind: TypeKind,
    /// Type arguments, in parameter order.
    #[serde(default, deserialize_with = "deserialize_generics")]
    pub generics: Vec<TypeDescriptor>,
    /// Another origin declares a type with the same short name.
    #[serde(default)]
    pub is_duplicate: bool,
    /// Documentation carried over from the introspection.
    #[serde(default)]
    pub comment: String,
}

impl TypeDescriptor {
    /// Descriptor without generics or comment.
    pub fn new(name: impl Into<String>, origin: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            origin: origin.into(),
            kind,
            generics: Vec::new(),
            is_duplicate: false,
            comment: String::new(),
        }
    }

    /// Attach type arguments.
    pub fn with_generics(mut self, generics: Vec<TypeDescriptor>) -> Self {
        self.generics = generics;
        self
    }

    /// Mark the descriptor as sharing its short name with another declaration.
    pub fn duplicated(mut self) -> Self {
        self.is_duplicate = true;
        self
    }

    /// The `void` placeholder the introspection uses for absent params/query.
    pub fn is_void(&self) -> bool {
        self.kind == TypeKind::Void || self.name == "void"
    }
}

/// Generics arrive either as an array or as an object keyed by parameter name.
fn deserialize_generics<'de, D>(deserializer: D) -> Result<Vec<TypeDescriptor>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Generics {
        Ordered(Vec<TypeDescriptor>),
        Keyed(IndexMap<String, TypeDescriptor>),
    }

    Ok(match Option::<Generics>::deserialize(deserializer)? {
        Some(Generics::Ordered(list)) => list,
        Some(Generics::Keyed(map)) => map.into_values().collect(),
        None => Vec::new(),
    })
}

/// A field of an interface declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Property name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Optional fields are printed with `?`.
    #[serde(default)]
    pub is_required: bool,
    /// Documentation.
    #[serde(default)]
    pub comment: String,
}

/// Record/interface declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interface {
    /// Declaration name.
    pub name: String,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Type parameter names, in declaration order.
    #[serde(default)]
    pub variables: Vec<String>,
    /// Base declarations.
    #[serde(default)]
    pub extends: Vec<TypeDescriptor>,
    /// Another origin declares the same short name.
    #[serde(default)]
    pub is_duplicate: bool,
    /// Documentation.
    #[serde(default)]
    pub comment: String,
}

/// One member of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    /// Member name.
    pub key: String,
    /// String value on the wire.
    pub value: String,
}

/// Enumeration declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enumeration {
    /// Declaration name.
    pub name: String,
    /// Members in declaration order.
    #[serde(default)]
    pub values: Vec<EnumValue>,
    /// Another origin declares the same short name.
    #[serde(default)]
    pub is_duplicate: bool,
    /// Documentation.
    #[serde(default)]
    pub comment: String,
}

/// Shape of a declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Shape {
    /// A record declaration.
    Interface(Interface),
    /// An enumeration declaration.
    Enumeration(Enumeration),
}

impl Shape {
    /// Declaration name.
    pub fn name(&self) -> &str {
        match self {
            Shape::Interface(i) => &i.name,
            Shape::Enumeration(e) => &e.name,
        }
    }

    /// Whether this is an enumeration.
    pub fn is_enumeration(&self) -> bool {
        matches!(self, Shape::Enumeration(_))
    }
}

/// A declaration together with the origin that owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Owning origin.
    pub origin: String,
    /// The declaration.
    pub shape: Shape,
}

/// HTTP verb of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestVerb {
    /// `GET`.
    Get,
    /// `POST`.
    Post,
    /// `PUT`.
    Put,
    /// `PATCH`.
    Patch,
    /// `DELETE`.
    Delete,
    /// `HEAD`.
    Head,
    /// `OPTIONS`.
    Options,
}

impl RequestVerb {
    /// Lowercase verb as passed to the request builder.
    pub fn as_str(self) -> &'static str {
        match self {
            RequestVerb::Get => "get",
            RequestVerb::Post => "post",
            RequestVerb::Put => "put",
            RequestVerb::Patch => "patch",
            RequestVerb::Delete => "delete",
            RequestVerb::Head => "head",
            RequestVerb::Options => "options",
        }
    }

    /// Reads end up under the query root, everything else under the mutation root.
    pub fn is_query(self) -> bool {
        matches!(self, RequestVerb::Get)
    }
}

fn void_descriptor() -> TypeDescriptor {
    TypeDescriptor::new("void", "", TypeKind::Void)
}

/// An API method of a controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    /// Method name, exported from the controller namespace.
    pub name: String,
    /// Path template with `${param}` placeholders.
    pub path: String,
    /// HTTP verb.
    pub request: RequestVerb,
    /// Path parameters; `void` when there are none.
    #[serde(default = "void_descriptor")]
    pub params: TypeDescriptor,
    /// Query string shape; `void` when there is none.
    #[serde(default = "void_descriptor")]
    pub query: TypeDescriptor,
    /// Request body candidates; the second one is the payload type.
    #[serde(default)]
    pub payload: Vec<TypeDescriptor>,
    /// More than one member models a polymorphic result.
    #[serde(default)]
    pub response: Vec<TypeDescriptor>,
    /// Documentation.
    #[serde(default)]
    pub comment: String,
}

/// A group of methods sharing a base path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Controller {
    /// Controller name.
    pub name: String,
    /// Owning origin.
    pub origin: String,
    /// Origin the controller was merged in from, if any.
    #[serde(default)]
    pub added_from: Option<String>,
    /// Documentation.
    #[serde(default)]
    pub comment: String,
    /// Methods in declaration order.
    #[serde(default)]
    pub methods: Vec<Method>,
    /// Declarations local to this controller's methods (query and params shapes).
    #[serde(default)]
    pub interplay: Vec<Source>,
}

/// Everything introspected for a single origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Introspection {
    /// The origin.
    pub origin: String,
    /// Origin this introspection was merged in from, if any.
    #[serde(default)]
    pub added_from: Option<String>,
    /// Declarations.
    #[serde(default)]
    pub sources: Vec<Source>,
    /// Controllers.
    #[serde(default)]
    pub controllers: Vec<Controller>,
}

impl Introspection {
    /// An introspection holding only declarations, used for interplay passes.
    pub fn from_sources(origin: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            origin: origin.into(),
            added_from: None,
            sources,
            controllers: Vec::new(),
        }
    }
}

/// The whole model: origin name -> introspection, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Model {
    introspections: IndexMap<String, Introspection>,
}

impl Model {
    /// Parse a model document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a model from introspections, keyed by their origin.
    pub fn from_introspections(introspections: impl IntoIterator<Item = Introspection>) -> Self {
        Self {
            introspections: introspections
                .into_iter()
                .map(|i| (i.origin.clone(), i))
                .collect(),
        }
    }

    /// Introspections in document order.
    pub fn introspections(&self) -> impl Iterator<Item = &Introspection> {
        self.introspections.values()
    }

    /// Introspection of `origin`.
    pub fn get(&self, origin: &str) -> Option<&Introspection> {
        self.introspections.get(origin)
    }

    /// Number of origins.
    pub fn len(&self) -> usize {
        self.introspections.len()
    }

    /// Whether the model has no origins.
    pub fn is_empty(&self) -> bool {
        self.introspections.is_empty()
    }

    /// Stable-sort every origin's sources so enumerations come after all other
    /// declarations.
    pub fn sort_enumerations_last(&mut self) {
        for introspection in self.introspections.values_mut() {
            introspection
                .sources
                .sort_by_key(|source| source.shape.is_enumeration());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const MODEL_JSON: &str = r#"{
      "billing": {
        "origin": "billing",
        "sources": [
          { "origin": "billing", "shape": { "kind": "Enumeration", "name": "Status",
            "values": [{ "key": "OPEN", "value": "open" }] } },
          { "origin": "billing", "shape": { "kind": "Interface", "name": "Invoice",
            "fields": [{ "name": "status", "isRequired": true,
              "type": { "name": "Status", "origin": "billing", "kind": "Enumeration" } }] } }
        ],
        "controllers": [{
          "name": "InvoiceController", "origin": "billing",
          "methods": [{ "name": "get", "path": "/invoices/{id}", "request": "get",
            "response": [{ "name": "Invoice", "origin": "billing", "kind": "Entity" }] }]
        }]
      }
    }"#;

    #[test]
    fn test_parse_model() {
        let model = Model::from_json(MODEL_JSON).unwrap();
        assert_eq!(model.len(), 1);

        let billing = model.get("billing").unwrap();
        assert_eq!(billing.sources.len(), 2);
        assert_eq!(billing.controllers[0].methods[0].request, RequestVerb::Get);
        assert!(billing.controllers[0].methods[0].params.is_void());
    }

    #[test]
    fn test_generics_accept_keyed_object() {
        let json = r#"{ "name": "Page", "origin": "o", "kind": "Entity",
            "generics": { "T": { "name": "User", "origin": "o", "kind": "Entity" },
                          "U": { "name": "string", "origin": "o", "kind": "String" } } }"#;
        let ty: TypeDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(ty.generics.len(), 2);
        assert_eq!(ty.generics[0].name, "User");
        assert_eq!(ty.generics[1].kind, TypeKind::String);
    }

    #[test]
    fn test_sort_enumerations_last() {
        let mut model = Model::from_json(MODEL_JSON).unwrap();
        model.sort_enumerations_last();
        let names: Vec<_> = model
            .get("billing")
            .unwrap()
            .sources
            .iter()
            .map(|s| s.shape.name().to_string())
            .collect();
        assert_eq!(names, vec!["Invoice", "Status"]);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let json = r#"{ "name": "X", "origin": "o", "kind": "Tuple" }"#;
        assert!(serde_json::from_str::<TypeDescriptor>(json).is_err());
    }
}
