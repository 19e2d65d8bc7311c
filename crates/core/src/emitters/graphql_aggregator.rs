//! Schema objects for controllers and the root types exposing them.
//!
//! Each controller yields up to two schema objects: `<Controller>` with its GET
//! methods and `<Controller>Mutation` with everything else. Method-local
//! declarations live in a `<Name>Interplay` namespace next to the object,
//! emitted by a nested schema-definition pass. After the model has been
//! walked, the `query` and `mutation` files group the objects by origin.

use indexmap::IndexMap;
use tracing::warn;

use super::graphql_definition::{GRAPHQL_IMPORT, non_null};
use super::{Emitter, EmitterKind, GraphqlDefinition, absorb, interplay_model, push_text};
use crate::context::GenerationContext;
use crate::emit::{Connection, EmitMap, add_space};
use crate::error::Result;
use crate::model::{Controller, Introspection, Method, Model, TypeDescriptor, TypeKind};
use crate::names::NameRequest;
use crate::resolve::{RAW_SCALAR, TypeRequest};
use crate::ts::utils::{binding_name, escape_js_string, escape_template, quote_if_needed};
use crate::ts::Print;

const QUERY_ROOT: &str = "query";
const MUTATION_ROOT: &str = "mutation";
const MUTATION_SUFFIX: &str = "Mutation";
const RESOLVE_TYPE: &str = "resolveType";

/// A controller object exposed under a root type.
#[derive(Debug, Clone)]
struct RootEntry {
    name: String,
    origin: String,
}

/// Emits controller schema objects and the root types.
#[derive(Debug)]
pub struct GraphqlAggregator {
    emission: String,
    emit: EmitMap,
    /// Emission of the schema-definition emitter, set by `prepare`.
    definition_emission: String,
    /// Emission of the API-binding emitter, set by `prepare`.
    api_emission: String,
    queries: Vec<RootEntry>,
    mutations: Vec<RootEntry>,
}

impl GraphqlAggregator {
    /// Emitter writing `emission`.
    pub fn new(emission: impl Into<String>) -> Self {
        Self {
            emission: emission.into(),
            emit: EmitMap::new(),
            definition_emission: String::new(),
            api_emission: String::new(),
            queries: Vec::new(),
            mutations: Vec::new(),
        }
    }

    fn fill_controller(
        &mut self,
        cx: &mut GenerationContext,
        lines: &mut Vec<String>,
        controller: &Controller,
        requested_from: &Connection,
        is_query: bool,
    ) -> Result<()> {
        let methods: Vec<&Method> = controller
            .methods
            .iter()
            .filter(|m| m.request.is_query() == is_query)
            .collect();

        if methods.is_empty() {
            return Ok(());
        }

        let name = if is_query {
            controller.name.clone()
        } else {
            format!("{}{MUTATION_SUFFIX}", controller.name)
        };
        let interplay = format!("{name}Interplay");

        add_space(lines);
        lines.push(format!("export namespace {interplay} {{"));
        add_space(lines);

        let mut definitions = GraphqlDefinition::new(self.definition_emission.clone(), interplay.clone(), false);
        let model = interplay_model(&requested_from.origin, controller);
        let nested = definitions.create_for(cx, &model, &self.emission)?;
        absorb(self.emit.get_or_create(requested_from), lines, nested);

        lines.push("}".to_string());
        add_space(lines);

        let schema_name = cx.register_name(&NameRequest::new(&name, &controller.origin));

        lines.push(format!("export const {name} = new graphql.GraphQLObjectType({{"));
        lines.push(format!("name: \"{}\",", escape_js_string(&schema_name)));
        lines.push("fields: {".to_string());
        for method in methods {
            self.fill_method(cx, lines, controller, method, requested_from, &interplay);
        }
        lines.push("}".to_string());
        lines.push("})".to_string());
        add_space(lines);

        let entry = RootEntry {
            name,
            origin: requested_from.origin.clone(),
        };
        if is_query {
            self.queries.push(entry);
        } else {
            self.mutations.push(entry);
        }
        Ok(())
    }

    fn fill_method(
        &mut self,
        cx: &mut GenerationContext,
        lines: &mut Vec<String>,
        controller: &Controller,
        method: &Method,
        requested_from: &Connection,
        interplay: &str,
    ) {
        let ty = self.response_type(cx, controller, method, requested_from);
        let args = self.arguments(cx, method, requested_from, interplay);

        let binding = TypeDescriptor::new(
            format!("{}.{}", controller.name, binding_name(&method.name)),
            requested_from.origin.clone(),
            TypeKind::Entity,
        );
        let location = Connection::new(requested_from.origin.clone(), self.api_emission.clone());
        let request = TypeRequest::typescript(&binding, location, requested_from.clone());
        let binding = cx.resolver().resolve(&request, &mut self.emit);

        lines.push(format!("{}: {{", quote_if_needed(&method.name)));
        lines.push(format!(
            "description: `Path: {}\\n{}`,",
            escape_template(&method.path),
            escape_template(&method.comment)
        ));
        push_text(lines, &format!("type: {ty},"));
        push_text(lines, &format!("args: {args},"));
        lines.push("resolve: (source: any, args: any, c: any, info: any) =>".to_string());
        lines.push(format!(
            "{binding}(args, {{source, info, origin: '{}', ...c}}),",
            escape_js_string(&controller.origin)
        ));
        lines.push("},".to_string());
    }

    /// Schema type of a method result. Several results become a union
    /// discriminated at runtime by `resolveType`.
    fn response_type(
        &mut self,
        cx: &mut GenerationContext,
        controller: &Controller,
        method: &Method,
        requested_from: &Connection,
    ) -> String {
        let (members, dropped) = union_members(&method.response);
        for r in dropped {
            warn!(
                controller = %controller.name,
                method = %method.name,
                response = %r.name,
                kind = ?r.kind,
                "Cannot add a non-entity member to a union response, dropping it."
            );
        }

        let location = Connection::new(requested_from.origin.clone(), self.definition_emission.clone());
        let mut types: Vec<String> = members
            .into_iter()
            .map(|r| {
                let request = TypeRequest::graphql(r, location.clone(), requested_from.clone()).input(false);
                cx.resolver().resolve(&request, &mut self.emit)
            })
            .collect();

        match types.len() {
            0 => RAW_SCALAR.to_string(),
            1 => types.remove(0),
            _ => {
                let union_name = format!("{}{}Response", method.name, controller.name);
                let union_name = cx.register_name(&NameRequest::new(&union_name, &controller.origin));

                [
                    "(function() {".to_string(),
                    format!("const types = [{}];", types.join(", ")),
                    String::new(),
                    "return new graphql.GraphQLUnionType({".to_string(),
                    format!("name: '{}',", escape_js_string(&union_name)),
                    format!(
                        "resolveType: (v: any, c: any, i: any) => {RESOLVE_TYPE}(v, c, i, types, '{}'),",
                        cx.union_match.as_str()
                    ),
                    "types,".to_string(),
                    "});".to_string(),
                    "})()".to_string(),
                ]
                .join("\n")
            }
        }
    }

    /// `{ query, params, payload }` argument map of a method field.
    fn arguments(
        &mut self,
        cx: &GenerationContext,
        method: &Method,
        requested_from: &Connection,
        interplay: &str,
    ) -> String {
        let mut lines = vec!["{".to_string()];

        if method.query.kind == TypeKind::Entity {
            let request =
                TypeRequest::graphql(&method.query, requested_from.clone(), requested_from.clone()).input(true);
            let query = cx.resolver().resolve(&request, &mut self.emit);
            lines.push(format!("query: {{type: {interplay}.{query}}},"));
        }

        if method.params.kind == TypeKind::Entity {
            let request =
                TypeRequest::graphql(&method.params, requested_from.clone(), requested_from.clone()).input(true);
            let params = cx.resolver().resolve(&request, &mut self.emit);
            lines.push(format!(
                "params: {{type: new graphql.GraphQLNonNull({interplay}.{params})}},"
            ));
        }

        // Several payload members: the second one is the body.
        let payload = match method.payload.as_slice() {
            [] => None,
            [single] => Some(single),
            [_, second, ..] => Some(second),
        };
        if let Some(payload) = payload {
            let location = Connection::new(requested_from.origin.clone(), self.definition_emission.clone());
            let request = TypeRequest::graphql(payload, location, requested_from.clone()).input(true);
            let ty = cx.resolver().graphql(&request, &mut self.emit);
            lines.push(format!("payload: {{type: {}}},", non_null(ty).print()));
        }

        lines.push("}".to_string());
        lines.join("\n")
    }

    /// The `query` or `mutation` root file: one object per origin whose
    /// fields are that origin's controller objects.
    fn fill_root(&mut self, cx: &mut GenerationContext, is_query: bool) -> Result<()> {
        let (root, class, entries) = if is_query {
            (QUERY_ROOT, "Query", std::mem::take(&mut self.queries))
        } else {
            (MUTATION_ROOT, "Mutation", std::mem::take(&mut self.mutations))
        };
        let requested_from = Connection::new(root, self.emission.clone());
        self.emit.get_or_create(&requested_from);

        let mut by_origin: IndexMap<&str, Vec<&RootEntry>> = IndexMap::new();
        for entry in &entries {
            by_origin.entry(entry.origin.as_str()).or_default().push(entry);
        }

        let mut lines = Vec::new();
        add_space(&mut lines);
        lines.push(format!("export class {class} {{"));
        lines.push("public create() {".to_string());
        lines.push("return {".to_string());

        for (origin, controllers) in by_origin {
            let service = root_service_name(cx, origin, is_query);

            lines.push(format!("{service}: {{type: new graphql.GraphQLObjectType({{"));
            lines.push(format!("name: '{service}',"));
            lines.push("fields: {".to_string());

            for controller in controllers {
                let object = TypeDescriptor::new(controller.name.clone(), origin, TypeKind::Entity);
                let location = Connection::new(origin, self.emission.clone());
                let request = TypeRequest::typescript(&object, location, requested_from.clone());
                let ty = cx.resolver().resolve(&request, &mut self.emit);
                lines.push(format!("{}: {{type: {ty}, resolve: () => ({{}})}},", controller.name));
            }

            lines.push("}".to_string());
            lines.push("}),".to_string());
            lines.push("resolve: () => ({})},".to_string());
        }

        lines.push("};".to_string());
        lines.push("}".to_string());
        lines.push("}".to_string());
        add_space(&mut lines);

        self.emit.get_or_create(&requested_from).lines.extend(lines);
        self.fill_headlines(cx, &requested_from)
    }
}

/// Field name (and schema name) of an origin's object under a root type.
fn root_service_name(cx: &GenerationContext, origin: &str, is_query: bool) -> String {
    let name = cx.naming.origin_name(origin);
    if is_query {
        name
    } else {
        format!("{name}{MUTATION_SUFFIX}")
    }
}

impl Emitter for GraphqlAggregator {
    fn kind(&self) -> EmitterKind {
        EmitterKind::GraphqlAggregator
    }

    fn emission(&self) -> &str {
        &self.emission
    }

    fn emit_map(&mut self) -> &mut EmitMap {
        &mut self.emit
    }

    /// Resolve sibling emissions and reserve the names of everything the
    /// aggregator itself will declare.
    fn prepare(&mut self, cx: &mut GenerationContext, model: &Model) -> Result<()> {
        self.definition_emission = cx.emitters.emission(EmitterKind::GraphqlDefinition)?.to_string();
        self.api_emission = cx.emitters.emission(EmitterKind::ApiBinding)?.to_string();

        cx.names.reserve("Query");
        cx.names.reserve("Mutation");

        for introspection in model.introspections() {
            let query = root_service_name(cx, &introspection.origin, true);
            let mutation = root_service_name(cx, &introspection.origin, false);
            cx.names.reserve(introspection.origin.clone());
            cx.names.reserve(query);
            cx.names.reserve(mutation);

            for controller in &introspection.controllers {
                cx.names.reserve(controller.name.clone());
                cx.names.reserve(format!("{}{MUTATION_SUFFIX}", controller.name));
            }
        }
        Ok(())
    }

    fn fill_introspection(
        &mut self,
        cx: &mut GenerationContext,
        lines: &mut Vec<String>,
        introspection: &Introspection,
        requested_from: &Connection,
    ) -> Result<()> {
        for controller in &introspection.controllers {
            self.fill_controller(cx, lines, controller, requested_from, true)?;
            self.fill_controller(cx, lines, controller, requested_from, false)?;
        }
        Ok(())
    }

    fn fill_headlines(&mut self, cx: &mut GenerationContext, requested_from: &Connection) -> Result<()> {
        self.fill_imports(cx, requested_from);

        if let Some(emit) = self.emit.get_mut(&requested_from.origin) {
            let support = [
                cx.module_import(emit, &[RAW_SCALAR], &cx.support.raw_type),
                cx.module_import(emit, &[RESOLVE_TYPE], &cx.support.resolve_type),
            ];
            emit.merge_headlines(support.iter().flatten());
            emit.merge_headlines([&GRAPHQL_IMPORT.to_string()]);
        }
        Ok(())
    }

    fn finish(&mut self, cx: &mut GenerationContext) -> Result<()> {
        self.fill_root(cx, true)?;
        self.fill_root(cx, false)
    }
}

/// Split the results of a method into union members and dropped results.
///
/// A single result is always kept. With several, only entities can take part
/// in the union; everything else is returned as dropped.
fn union_members(response: &[TypeDescriptor]) -> (Vec<&TypeDescriptor>, Vec<&TypeDescriptor>) {
    if response.len() <= 1 {
        return (response.iter().collect(), Vec::new());
    }
    response.iter().partition(|r| r.kind == TypeKind::Entity)
}
