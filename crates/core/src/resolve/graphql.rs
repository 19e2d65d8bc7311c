//! Schema-form resolution.

use super::{TypeRequest, TypeResolver};
use crate::emit::EmitMap;
use crate::model::TypeKind;
use crate::ts::{TsExpr, TsLiteral};

/// Scalar carrying values the model cannot describe structurally.
pub const RAW_SCALAR: &str = "Raw";

/// Name of the factory parameter forwarded when `is_input_type` is unset.
pub const IS_INPUT_PARAM: &str = "isInput";

impl TypeResolver<'_> {
    /// Resolve to a schema-form expression.
    ///
    /// Dates, plain objects, void, maps and untyped lists have no schema
    /// structure and become the [`RAW_SCALAR`]. Named declarations resolve to a
    /// factory call `Name(isInput, ...typeArguments)`; enumerations to the bare
    /// constant.
    pub fn graphql(&self, request: &TypeRequest<'_>, emit: &mut EmitMap) -> TsExpr {
        let ty = request.ty;

        match ty.kind {
            TypeKind::Boolean => return TsExpr::ident("graphql.GraphQLBoolean"),
            TypeKind::Number => return TsExpr::ident("graphql.GraphQLFloat"),
            TypeKind::String => return TsExpr::ident("graphql.GraphQLString"),
            TypeKind::Date | TypeKind::Object | TypeKind::Void | TypeKind::Map => {
                return TsExpr::ident(RAW_SCALAR);
            }
            TypeKind::TypeParameter => return TsExpr::ident(format!("{}!", ty.name)),
            TypeKind::Enumeration => return TsExpr::ident(self.qualified_name(request, emit)),
            _ => {}
        }

        let generics: Vec<TsExpr> = ty
            .generics
            .iter()
            .map(|g| self.graphql(&request.generic(g), emit))
            .collect();

        if ty.kind == TypeKind::List {
            return match generics.into_iter().next() {
                Some(item) => TsExpr::new_instance(TsExpr::ident("graphql.GraphQLList"), vec![item]),
                None => TsExpr::ident(RAW_SCALAR),
            };
        }

        let is_input = match request.is_input_type {
            Some(value) => TsExpr::Literal(TsLiteral::Bool(value)),
            None => TsExpr::ident(IS_INPUT_PARAM),
        };

        let mut args = vec![is_input];
        args.extend(generics);

        TsExpr::call(TsExpr::ident(self.qualified_name(request, emit)), args)
    }
}
