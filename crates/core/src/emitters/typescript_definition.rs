//! Structural declarations: one interface per record, a string enum plus a
//! literal-union alias per enumeration.

use std::collections::HashMap;

use super::{Emitter, EmitterKind};
use crate::context::GenerationContext;
use crate::emit::{Connection, EmitMap, add_space};
use crate::error::Result;
use crate::model::{Enumeration, Interface, Introspection, Shape};
use crate::resolve::TypeRequest;
use crate::ts::{
    TsLiteral, TsPrimitive, TsProp, TsType, TsTypeDef, TsTypeParam, TypeDefKind, print_lines,
};

/// Emits interfaces and string enums.
#[derive(Debug)]
pub struct TypescriptDefinition {
    emission: String,
    emit: EmitMap,
    /// Per origin: how often each enum declaration name has been used.
    enum_names: HashMap<String, HashMap<String, usize>>,
}

impl TypescriptDefinition {
    /// Emitter writing `emission`.
    pub fn new(emission: impl Into<String>) -> Self {
        Self {
            emission: emission.into(),
            emit: EmitMap::new(),
            enum_names: HashMap::new(),
        }
    }

    /// `name`, then `name_2`, `name_3`, ... within one origin.
    fn unique_enum_name(&mut self, origin: &str, name: String) -> String {
        let used = self.enum_names.entry(origin.to_string()).or_default();
        let count = used.entry(name.clone()).or_insert(0);
        *count += 1;

        if *count == 1 {
            name
        } else {
            format!("{name}_{count}")
        }
    }

    fn fill_enumeration(&mut self, lines: &mut Vec<String>, enumeration: &Enumeration, origin: &str) {
        let alias_name = self.unique_enum_name(origin, enumeration.name.clone());
        let enum_name = self.unique_enum_name(origin, format!("{}Enum", enumeration.name));

        add_space(lines);
        print_lines(
            lines,
            &TsTypeDef {
                name: enum_name,
                comment: enumeration.comment.clone(),
                kind: TypeDefKind::Enum {
                    members: enumeration
                        .values
                        .iter()
                        .map(|v| (v.key.clone(), v.value.clone()))
                        .collect(),
                },
            },
        );
        add_space(lines);

        let literals = enumeration
            .values
            .iter()
            .map(|v| TsType::Literal(TsLiteral::String(v.value.clone())))
            .collect();

        print_lines(
            lines,
            &TsTypeDef {
                name: alias_name,
                comment: String::new(),
                kind: TypeDefKind::TypeAlias {
                    ty: TsType::union_or(literals, TsType::Primitive(TsPrimitive::String)),
                },
            },
        );
        add_space(lines);
    }

    fn fill_interface(
        &mut self,
        cx: &GenerationContext,
        lines: &mut Vec<String>,
        interface: &Interface,
        requested_from: &Connection,
    ) {
        let resolver = cx.resolver();

        let extends = interface
            .extends
            .iter()
            .map(|parent| {
                let location = Connection::new(parent.origin.clone(), self.emission.clone());
                let request = TypeRequest::typescript(parent, location, requested_from.clone());
                resolver.typescript(&request, &mut self.emit)
            })
            .collect();

        let properties = interface
            .fields
            .iter()
            .map(|field| {
                let location = Connection::new(field.ty.origin.clone(), self.emission.clone());
                let request = TypeRequest::typescript(&field.ty, location, requested_from.clone());
                TsProp {
                    name: field.name.clone(),
                    ty: resolver.typescript(&request, &mut self.emit),
                    optional: !field.is_required,
                    comment: field.comment.clone(),
                }
            })
            .collect();

        let type_params = interface
            .variables
            .iter()
            .map(|name| TsTypeParam {
                name: name.clone(),
                default: Some(TsType::Primitive(TsPrimitive::Void)),
            })
            .collect();

        add_space(lines);
        print_lines(
            lines,
            &TsTypeDef {
                name: interface.name.clone(),
                comment: interface.comment.clone(),
                kind: TypeDefKind::Interface {
                    type_params,
                    extends,
                    properties,
                },
            },
        );
        add_space(lines);
    }
}

impl Emitter for TypescriptDefinition {
    fn kind(&self) -> EmitterKind {
        EmitterKind::TypescriptDefinition
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
        for source in &introspection.sources {
            match &source.shape {
                Shape::Enumeration(enumeration) => {
                    self.fill_enumeration(lines, enumeration, &requested_from.origin);
                }
                Shape::Interface(interface) => {
                    self.fill_interface(cx, lines, interface, requested_from);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::{EmitterConfig, GeneratorConfig};
    use crate::model::{EnumValue, Field, Model, Source, TypeDescriptor, TypeKind};

    fn context() -> GenerationContext {
        let config = GeneratorConfig::new("/out").with_emitter(EmitterConfig::TypescriptDefinition {
            emission: "typescript".into(),
        });
        GenerationContext::new(&config)
    }

    fn status(values: &[(&str, &str)]) -> Source {
        Source {
            origin: "billing".into(),
            shape: Shape::Enumeration(Enumeration {
                name: "Status".into(),
                values: values
                    .iter()
                    .map(|(k, v)| EnumValue {
                        key: (*k).into(),
                        value: (*v).into(),
                    })
                    .collect(),
                is_duplicate: false,
                comment: String::new(),
            }),
        }
    }

    fn invoice() -> Source {
        Source {
            origin: "billing".into(),
            shape: Shape::Interface(Interface {
                name: "Invoice".into(),
                fields: vec![
                    Field {
                        name: "owner".into(),
                        ty: TypeDescriptor::new("User", "users", TypeKind::Entity),
                        is_required: true,
                        comment: String::new(),
                    },
                    Field {
                        name: "total".into(),
                        ty: TypeDescriptor::new("number", "billing", TypeKind::Number),
                        is_required: false,
                        comment: String::new(),
                    },
                ],
                variables: vec!["T".into()],
                extends: vec![TypeDescriptor::new("Base", "billing", TypeKind::Entity)],
                is_duplicate: false,
                comment: "An invoice.".into(),
            }),
        }
    }

    fn run(sources: Vec<Source>) -> EmitMap {
        let mut cx = context();
        let model = Model::from_introspections([Introspection::from_sources("billing", sources)]);
        TypescriptDefinition::new("typescript")
            .create(&mut cx, &model)
            .unwrap()
    }

    #[test]
    fn test_interface() {
        let emit = run(vec![invoice()]);
        let billing = emit.get("billing").unwrap();

        let body = billing.lines.join("\n");
        assert!(body.contains("/**\n * An invoice.\n */"));
        assert!(body.contains("export interface Invoice<T = void> extends Base {"));
        assert!(body.contains("owner: UsersTypescript.User;"));
        assert!(body.contains("total?: number;"));

        assert_eq!(
            billing.headlines,
            vec!["import * as UsersTypescript from './Users';"]
        );
    }

    #[test]
    fn test_enumeration() {
        let emit = run(vec![status(&[("OPEN", "open"), ("PAID", "paid")])]);
        let body = emit.get("billing").unwrap().lines.join("\n");

        assert!(body.contains("export enum StatusEnum {\nOPEN = \"open\",\nPAID = \"paid\",\n}"));
        assert!(body.contains("export type Status = \"open\" | \"paid\";"));
    }

    #[test]
    fn test_empty_enumeration_is_string() {
        let emit = run(vec![status(&[])]);
        let body = emit.get("billing").unwrap().lines.join("\n");
        assert!(body.contains("export type Status = string;"));
    }

    #[test]
    fn test_repeated_enum_names_get_suffix() {
        let emit = run(vec![status(&[("A", "a")]), status(&[("B", "b")])]);
        let body = emit.get("billing").unwrap().lines.join("\n");

        assert!(body.contains("export enum StatusEnum {"));
        assert!(body.contains("export enum StatusEnum_2 {"));
        assert!(body.contains("export type Status_2 = \"b\";"));
    }
}
