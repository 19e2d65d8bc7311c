//! TypeScript syntax tree and printer shared by all emitters.

pub mod print;
pub mod types;
pub mod utils;

pub use print::{Print, print_lines};
pub use types::{
    ImportBinding, TemplatePart, TsExpr, TsImport, TsLiteral, TsParam, TsPrimitive, TsProp,
    TsType, TsTypeDef, TsTypeParam, TypeDefKind,
};
