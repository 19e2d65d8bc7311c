//! Request builders for controller methods.
//!
//! Every controller becomes a namespace holding its method-local declarations
//! and one `api.path(...).request<...>(verb).build()` chain per method. The
//! `api` builder itself is hand-written and imported from the configured path.

use std::path::PathBuf;

use super::{Emitter, EmitterKind, TypescriptDefinition, absorb, interplay_model};
use crate::context::{GenerationContext, strip_extension};
use crate::emit::{Connection, EmitMap, add_space};
use crate::error::Result;
use crate::model::{Controller, Introspection, Method, Model, TypeDescriptor};
use crate::resolve::TypeRequest;
use crate::ts::utils::{binding_name, escape_js_string};
use crate::ts::{Print, TemplatePart, TsExpr, TsParam, TsPrimitive, TsType};

/// Emits an `api.path(...).request(...)` builder per controller method.
#[derive(Debug)]
pub struct ApiBinding {
    emission: String,
    api_path: PathBuf,
    emit: EmitMap,
    /// Emission of the declaration emitter, set by `prepare`.
    declaration_emission: String,
}

impl ApiBinding {
    /// Emitter writing `emission`, importing `api` from `api_path`.
    pub fn new(emission: impl Into<String>, api_path: impl Into<PathBuf>) -> Self {
        Self {
            emission: emission.into(),
            api_path: api_path.into(),
            emit: EmitMap::new(),
            declaration_emission: String::new(),
        }
    }

    fn fill_controller(
        &mut self,
        cx: &mut GenerationContext,
        lines: &mut Vec<String>,
        controller: &Controller,
        requested_from: &Connection,
    ) -> Result<()> {
        add_space(lines);
        lines.push(format!("export namespace {} {{", controller.name));

        let mut declarations = TypescriptDefinition::new(self.declaration_emission.clone());
        let model = interplay_model(&requested_from.origin, controller);
        let nested = declarations.create_for(cx, &model, &self.emission)?;
        absorb(self.emit.get_or_create(requested_from), lines, nested);

        for method in &controller.methods {
            self.fill_method(cx, lines, method, requested_from);
        }

        lines.push("}".to_string());
        Ok(())
    }

    fn fill_method(
        &mut self,
        cx: &GenerationContext,
        lines: &mut Vec<String>,
        method: &Method,
        requested_from: &Connection,
    ) {
        let path = self.path(cx, method, requested_from);

        let query = {
            let request = TypeRequest::typescript(&method.query, requested_from.clone(), requested_from.clone());
            cx.resolver().typescript(&request, &mut self.emit)
        };
        let response = self.declared_union(cx, &method.response, requested_from);
        let payload = self.declared_union(cx, &method.payload, requested_from);

        add_space(lines);
        lines.push(format!("export const {} = api", binding_name(&method.name)));
        lines.push(format!(".path({})", path.print()));
        lines.push(format!(
            ".request<{}, {}, {}>('{}')",
            response.print(),
            query.print(),
            payload.print(),
            method.request.as_str()
        ));
        lines.push(".build();".to_string());
        add_space(lines);
    }

    /// Union of types declared by the declaration emitter; `void` when empty.
    fn declared_union(
        &mut self,
        cx: &GenerationContext,
        types: &[TypeDescriptor],
        requested_from: &Connection,
    ) -> TsType {
        let location = Connection::new(requested_from.origin.clone(), self.declaration_emission.clone());
        let types = types
            .iter()
            .map(|ty| {
                let request = TypeRequest::typescript(ty, location.clone(), requested_from.clone());
                cx.resolver().typescript(&request, &mut self.emit)
            })
            .collect();

        TsType::union_or(types, TsType::Primitive(TsPrimitive::Void))
    }

    /// `'/static'`, or `(p: Params) => \`/items/${p.id}\`` when the method
    /// takes path parameters.
    fn path(&mut self, cx: &GenerationContext, method: &Method, requested_from: &Connection) -> TsExpr {
        if method.params.is_void() {
            return TsExpr::Raw(format!("'{}'", escape_js_string(&method.path)));
        }

        let request = TypeRequest::typescript(&method.params, requested_from.clone(), requested_from.clone());
        let params = cx.resolver().typescript(&request, &mut self.emit);

        TsExpr::Arrow {
            params: vec![TsParam::new("p", Some(params))],
            body: Box::new(path_template(&method.path)),
        }
    }
}

/// Template literal for a path with `{name}` placeholders read from `p`.
fn path_template(path: &str) -> TsExpr {
    let mut parts = Vec::new();
    let mut rest = path;

    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        if start > 0 {
            parts.push(TemplatePart::Static(rest[..start].to_string()));
        }
        let name = &rest[start + 1..start + len];
        parts.push(TemplatePart::Dynamic(TsExpr::member(TsExpr::ident("p"), name)));
        rest = &rest[start + len + 1..];
    }

    if !rest.is_empty() {
        parts.push(TemplatePart::Static(rest.to_string()));
    }

    TsExpr::Template(parts)
}

impl Emitter for ApiBinding {
    fn kind(&self) -> EmitterKind {
        EmitterKind::ApiBinding
    }

    fn emission(&self) -> &str {
        &self.emission
    }

    fn emit_map(&mut self) -> &mut EmitMap {
        &mut self.emit
    }

    fn prepare(&mut self, cx: &mut GenerationContext, _model: &Model) -> Result<()> {
        self.declaration_emission = cx
            .emitters
            .emission(EmitterKind::TypescriptDefinition)?
            .to_string();
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
            self.fill_controller(cx, lines, controller, requested_from)?;
        }
        Ok(())
    }

    fn fill_headlines(&mut self, cx: &mut GenerationContext, requested_from: &Connection) -> Result<()> {
        self.fill_imports(cx, requested_from);

        let api = strip_extension(&self.api_path);
        if let Some(emit) = self.emit.get_mut(&requested_from.origin) {
            let import = cx.module_import(emit, &["api"], &api);
            emit.merge_headlines(import.iter());
        }
        Ok(())
    }
}
