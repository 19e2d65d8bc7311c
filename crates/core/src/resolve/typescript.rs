//! Structural-form resolution.

use super::{TypeRequest, TypeResolver};
use crate::emit::EmitMap;
use crate::model::TypeKind;
use crate::ts::{TsPrimitive, TsType};

impl TypeResolver<'_> {
    /// Resolve to a structural-form type.
    ///
    /// Lists become `Array<T>`, maps `Record<string, V>` (the key is always
    /// `string`; the value is the last type argument), and named declarations
    /// keep their type arguments.
    pub fn typescript(&self, request: &TypeRequest<'_>, emit: &mut EmitMap) -> TsType {
        let ty = request.ty;

        match ty.kind {
            TypeKind::Boolean => return TsType::Primitive(TsPrimitive::Boolean),
            TypeKind::Number => return TsType::Primitive(TsPrimitive::Number),
            TypeKind::String => return TsType::Primitive(TsPrimitive::String),
            TypeKind::Date => return TsType::named("Date"),
            TypeKind::Object => return TsType::EmptyObject,
            TypeKind::Void => return TsType::Primitive(TsPrimitive::Void),
            TypeKind::TypeParameter => return TsType::named(ty.name.clone()),
            _ => {}
        }

        let mut generics: Vec<TsType> = ty
            .generics
            .iter()
            .map(|g| self.typescript(&request.generic(g), emit))
            .collect();

        match ty.kind {
            TypeKind::List => {
                let item = if generics.is_empty() {
                    TsType::Primitive(TsPrimitive::Unknown)
                } else {
                    generics.swap_remove(0)
                };
                TsType::Ref {
                    name: "Array".to_string(),
                    args: vec![item],
                }
            }
            TypeKind::Map => TsType::Record {
                key: Box::new(TsType::Primitive(TsPrimitive::String)),
                value: Box::new(
                    generics
                        .pop()
                        .unwrap_or(TsType::Primitive(TsPrimitive::Unknown)),
                ),
            },
            _ => TsType::Ref {
                name: self.qualified_name(request, emit),
                args: generics,
            },
        }
    }
}
