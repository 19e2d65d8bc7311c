//! Schema form of the model's declarations.
//!
//! Enumerations become `GraphQLEnumType` constants. Interfaces become factory
//! functions `Name(isInput, ...typeArguments)` that build an input or output
//! object type on first use and hand out the cached instance afterwards, so a
//! schema never sees two distinct types under one name.

use super::{Emitter, EmitterKind};
use crate::context::GenerationContext;
use crate::emit::{Connection, EmitMap, add_space};
use crate::error::Result;
use crate::model::{Enumeration, Field, Interface, Introspection, Shape, TypeDescriptor};
use crate::names::NameRequest;
use crate::resolve::{RAW_SCALAR, TypeRequest};
use crate::ts::utils::{escape_js_string, escape_template};
use crate::ts::{Print, TsExpr};

/// Type accepted for a type argument of a generated factory.
const TYPE_ARGUMENT: &str = "graphql.GraphQLOutputType | graphql.GraphQLInputObjectType | undefined";

/// Namespace import of the schema library.
pub const GRAPHQL_IMPORT: &str = "import * as graphql from 'graphql';";

/// Emits identity-caching schema factories for every declaration.
#[derive(Debug)]
pub struct GraphqlDefinition {
    emission: String,
    /// Appended after the origin name when a schema name must be qualified.
    postfix: String,
    /// Optional fields stay nullable; otherwise every field is non-null.
    nullable: bool,
    emit: EmitMap,
}

impl GraphqlDefinition {
    /// Emitter writing `emission`; `postfix` qualifies colliding schema names.
    pub fn new(emission: impl Into<String>, postfix: impl Into<String>, nullable: bool) -> Self {
        Self {
            emission: emission.into(),
            postfix: postfix.into(),
            nullable,
            emit: EmitMap::new(),
        }
    }

    fn fill_enumeration(
        &self,
        cx: &mut GenerationContext,
        lines: &mut Vec<String>,
        enumeration: &Enumeration,
        origin: &str,
    ) {
        let name = cx.register_name(
            &NameRequest::new(&enumeration.name, origin)
                .duplicate(enumeration.is_duplicate)
                .postfix(&self.postfix),
        );

        lines.push(format!("export const {} = new graphql.GraphQLEnumType({{", enumeration.name));
        lines.push(format!("name: '{name}',"));
        lines.push("values: {".to_string());

        if enumeration.values.is_empty() {
            lines.push("'empty': {value: 'empty'},".to_string());
        }
        for value in &enumeration.values {
            lines.push(format!(
                "'{}': {{value: `{}`}},",
                escape_js_string(&value.key),
                escape_template(&value.value)
            ));
        }

        lines.push("}".to_string());
        lines.push("})".to_string());
        add_space(lines);
    }

    fn fill_interface(
        &mut self,
        cx: &mut GenerationContext,
        lines: &mut Vec<String>,
        interface: &Interface,
        origin: &str,
        requested_from: &Connection,
    ) {
        let placeholders: Vec<String> = interface
            .variables
            .iter()
            .map(|v| format!("${{{v}}}"))
            .collect();

        let schema_name = cx.register_name(
            &NameRequest::new(&interface.name, origin)
                .duplicate(interface.is_duplicate)
                .postfix(&self.postfix)
                .variables(&placeholders),
        );

        let name = &interface.name;
        let signature = type_parameters(&interface.variables, |v| format!("{v}?: {TYPE_ARGUMENT}"));
        let implementation =
            type_parameters(&interface.variables, |v| format!("{v}: {TYPE_ARGUMENT} = {RAW_SCALAR}"));

        lines.push(format!("export const {name} = (() => {{"));
        lines.push(
            "const cache: Record<string, graphql.GraphQLObjectType | graphql.GraphQLInputObjectType> = {};"
                .to_string(),
        );
        lines.push(String::new());
        lines.push(format!(
            "function {name}(isInput: true{signature}): graphql.GraphQLInputObjectType;"
        ));
        lines.push(format!(
            "function {name}(isInput: false{signature}): graphql.GraphQLObjectType;"
        ));
        lines.push(format!("function {name}(isInput: any{implementation}) {{"));
        lines.push("let name = isInput".to_string());
        lines.push(format!("? `{schema_name}Input`"));
        lines.push(format!(": `{schema_name}`;"));
        lines.push(String::new());
        lines.push("name = name.replace(/[\\[\\]]/g, '');".to_string());
        lines.push(String::new());
        lines.push("if (!cache[name]) {".to_string());
        lines.push("const c = {".to_string());
        lines.push("name,".to_string());
        lines.push(format!("description: `{}`,", escape_template(&interface.comment)));
        lines.push("interfaces: [],".to_string());
        lines.push("fields: () => ({".to_string());
        lines.push(format!("raw: {{type: {RAW_SCALAR}}},"));

        for parent in &interface.extends {
            self.fill_extends(cx, lines, parent, requested_from);
        }
        for field in &interface.fields {
            self.fill_field(cx, lines, field, requested_from);
        }

        lines.push("}),".to_string());
        lines.push(
            "} as graphql.GraphQLObjectTypeConfig<any, any> | graphql.GraphQLInputObjectTypeConfig;"
                .to_string(),
        );
        lines.push(String::new());
        lines.push("cache[name] = isInput".to_string());
        lines.push("? new graphql.GraphQLInputObjectType(c as graphql.GraphQLInputObjectTypeConfig)".to_string());
        lines.push(": new graphql.GraphQLObjectType(c as graphql.GraphQLObjectTypeConfig<any, any>);".to_string());
        lines.push("}".to_string());
        lines.push("return cache[name];".to_string());
        lines.push("};".to_string());
        lines.push(String::new());
        lines.push(format!("return {name};"));
        lines.push("})();".to_string());
        add_space(lines);
    }

    /// Copy the parent's fields into the object being built.
    fn fill_extends(
        &mut self,
        cx: &GenerationContext,
        lines: &mut Vec<String>,
        parent: &TypeDescriptor,
        requested_from: &Connection,
    ) {
        let parent = self.resolve(cx, parent, requested_from);

        lines.push("...(function() {".to_string());
        lines.push(format!("const fields = {}.getFields();", parent.print()));
        lines.push("const result: any = {};".to_string());
        lines.push(
            "Object.keys(fields).forEach((k) => result[k] = {type: fields[k].type, description: fields[k].description});"
                .to_string(),
        );
        lines.push("return result;".to_string());
        lines.push("})(),".to_string());
    }

    fn fill_field(
        &mut self,
        cx: &GenerationContext,
        lines: &mut Vec<String>,
        field: &Field,
        requested_from: &Connection,
    ) {
        let mut ty = self.resolve(cx, &field.ty, requested_from);

        if !self.nullable || field.is_required {
            ty = non_null(ty);
        }

        lines.push(format!(
            "'{}': {{type: {}, description: `{}`}},",
            escape_js_string(&field.name),
            ty.print(),
            escape_template(&field.comment)
        ));
    }

    /// Schema expression for a type declared in this emission; `isInput` is
    /// forwarded from the enclosing factory.
    fn resolve(&mut self, cx: &GenerationContext, ty: &TypeDescriptor, requested_from: &Connection) -> TsExpr {
        let location = Connection::new(ty.origin.clone(), self.emission.clone());
        let request = TypeRequest::graphql(ty, location, requested_from.clone());
        cx.resolver().graphql(&request, &mut self.emit)
    }
}

/// `, T: ..., U: ...` for the factory parameter list; empty without variables.
fn type_parameters(variables: &[String], param: impl Fn(&str) -> String) -> String {
    variables.iter().map(|v| format!(", {}", param(v))).collect()
}

/// Wrap `ty` in `GraphQLNonNull`.
pub fn non_null(ty: TsExpr) -> TsExpr {
    TsExpr::new_instance(TsExpr::ident("graphql.GraphQLNonNull"), vec![ty])
}

impl Emitter for GraphqlDefinition {
    fn kind(&self) -> EmitterKind {
        EmitterKind::GraphqlDefinition
    }

    fn emission(&self) -> &str {
        &self.emission
    }

    fn emit_map(&mut self) -> &mut EmitMap {
        &mut self.emit
    }

    fn fill_introspection(
        &mut self,
        cx: &mut GenerationContext,
        lines: &mut Vec<String>,
        introspection: &Introspection,
        requested_from: &Connection,
    ) -> Result<()> {
        add_space(lines);

        for source in &introspection.sources {
            match &source.shape {
                Shape::Enumeration(enumeration) => {
                    self.fill_enumeration(cx, lines, enumeration, &source.origin);
                }
                Shape::Interface(interface) => {
                    self.fill_interface(cx, lines, interface, &source.origin, requested_from);
                }
            }
        }
        Ok(())
    }

    fn fill_headlines(&mut self, cx: &mut GenerationContext, requested_from: &Connection) -> Result<()> {
        self.fill_imports(cx, requested_from);

        if let Some(emit) = self.emit.get_mut(&requested_from.origin) {
            let raw = cx.module_import(emit, &[RAW_SCALAR], &cx.support.raw_type);
            emit.merge_headlines(raw.iter());
            emit.merge_headlines([&GRAPHQL_IMPORT.to_string()]);
        }
        Ok(())
    }
}
