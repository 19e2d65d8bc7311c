//! TypeScript syntax tree for generated declarations.
//!
//! - TsType: type positions (primitives, references, records, unions)
//! - TsExpr: value positions (schema constructors, factory calls, request builders)
//! - TsTypeDef: top-level `interface` / `enum` / `type` declarations

/// TypeScript primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    /// `string`
    String,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `void`
    Void,
    /// `unknown`
    Unknown,
}

/// TypeScript type representation
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// Primitive types: string, number, boolean, void, unknown
    Primitive(TsPrimitive),
    /// Named reference with optional type arguments: `Date`, `Array<T>`, `Billing.Page<User>`
    Ref {
        /// Possibly qualified type name
        name: String,
        /// Type arguments
        args: Vec<TsType>,
    },
    /// Record type: Record<K, V>
    Record {
        /// Key type
        key: Box<TsType>,
        /// Value type
        value: Box<TsType>,
    },
    /// The empty object type `{}`
    EmptyObject,
    /// Union type: A | B | C
    Union(Vec<TsType>),
    /// Literal type: "foo"
    Literal(TsLiteral),
}

impl TsType {
    /// Reference without type arguments.
    pub fn named(name: impl Into<String>) -> Self {
        TsType::Ref {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Union of `types`, collapsing to the fallback when there are none.
    pub fn union_or(types: Vec<TsType>, fallback: TsType) -> Self {
        match types.len() {
            0 => fallback,
            1 => types.into_iter().next().unwrap_or(fallback),
            _ => TsType::Union(types),
        }
    }
}

/// TypeScript literal values
#[derive(Debug, Clone, PartialEq)]
pub enum TsLiteral {
    /// String literal, escaped when printed
    String(String),
    /// `true` / `false`
    Bool(bool),
}

/// Object property / interface member
#[derive(Debug, Clone, PartialEq)]
pub struct TsProp {
    /// Property key, quoted when printed if needed
    pub name: String,
    /// Property type
    pub ty: TsType,
    /// Printed with `?`
    pub optional: bool,
    /// Doc comment; empty for none
    pub comment: String,
}

/// Type parameter with its default: `T = void`
#[derive(Debug, Clone, PartialEq)]
pub struct TsTypeParam {
    /// Parameter name
    pub name: String,
    /// Default type, if any
    pub default: Option<TsType>,
}

/// Type definition kind
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefKind {
    /// interface Foo<T = void> extends Bar { ... }
    Interface {
        /// Type parameters
        type_params: Vec<TsTypeParam>,
        /// Base interfaces
        extends: Vec<TsType>,
        /// Members
        properties: Vec<TsProp>,
    },
    /// type Foo = ...
    TypeAlias {
        /// Aliased type
        ty: TsType,
    },
    /// enum Foo { KEY = "value" }
    Enum {
        /// Key and string value of each member
        members: Vec<(String, String)>,
    },
}

/// Top-level declaration
#[derive(Debug, Clone, PartialEq)]
pub struct TsTypeDef {
    /// Declared name
    pub name: String,
    /// Doc comment; empty for none
    pub comment: String,
    /// What is declared
    pub kind: TypeDefKind,
}

/// TypeScript expression
#[derive(Debug, Clone, PartialEq)]
pub enum TsExpr {
    /// Identifier or dotted path: foo, graphql.GraphQLString
    Ident(String),
    /// Literal value
    Literal(TsLiteral),
    /// Function call: foo(a, b)
    Call {
        /// Called expression
        callee: Box<TsExpr>,
        /// Arguments
        args: Vec<TsExpr>,
    },
    /// new Foo(a, b)
    New {
        /// Constructor expression
        callee: Box<TsExpr>,
        /// Arguments
        args: Vec<TsExpr>,
    },
    /// Member access: foo.bar
    Member {
        /// Accessed expression
        object: Box<TsExpr>,
        /// Member name
        prop: String,
    },
    /// Arrow function with an expression body: (x) => x.foo
    Arrow {
        /// Parameters
        params: Vec<TsParam>,
        /// Body expression
        body: Box<TsExpr>,
    },
    /// Template literal: `${foo}/bar`
    Template(Vec<TemplatePart>),
    /// Raw code that doesn't fit the tree
    Raw(String),
}

impl TsExpr {
    /// Identifier or dotted path
    pub fn ident(name: impl Into<String>) -> Self {
        TsExpr::Ident(name.into())
    }

    /// `callee(args)`
    pub fn call(callee: TsExpr, args: Vec<TsExpr>) -> Self {
        TsExpr::Call {
            callee: Box::new(callee),
            args,
        }
    }

    /// `new callee(args)`
    pub fn new_instance(callee: TsExpr, args: Vec<TsExpr>) -> Self {
        TsExpr::New {
            callee: Box::new(callee),
            args,
        }
    }

    /// `object.prop`
    pub fn member(object: TsExpr, prop: impl Into<String>) -> Self {
        TsExpr::Member {
            object: Box::new(object),
            prop: prop.into(),
        }
    }
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct TsParam {
    /// Parameter name
    pub name: String,
    /// Annotation; omitted when `None`
    pub ty: Option<TsType>,
}

impl TsParam {
    /// Parameter `name`, optionally annotated
    pub fn new(name: impl Into<String>, ty: Option<TsType>) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Template literal part
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    /// Static string part, escaped when printed
    Static(String),
    /// Dynamic expression part: ${expr}
    Dynamic(TsExpr),
}

/// What an import statement binds
#[derive(Debug, Clone, PartialEq)]
pub enum ImportBinding {
    /// import * as name from '...'
    Namespace(String),
    /// import {a, b} from '...'
    Named(Vec<String>),
}

/// Import statement
#[derive(Debug, Clone, PartialEq)]
pub struct TsImport {
    /// Imported names
    pub binding: ImportBinding,
    /// Module path
    pub from: String,
}

impl TsImport {
    /// `import * as name from 'from';`
    pub fn namespace(name: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            binding: ImportBinding::Namespace(name.into()),
            from: from.into(),
        }
    }

    /// `import {items} from 'from';`
    pub fn named(items: &[&str], from: impl Into<String>) -> Self {
        Self {
            binding: ImportBinding::Named(items.iter().map(|s| (*s).to_string()).collect()),
            from: from.into(),
        }
    }
}
