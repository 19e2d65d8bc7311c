//! TypeScript source printing via the Print trait.
//!
//! Each syntax node implements `Print`; multi-line declarations are printed as
//! one string with `\n` separators and split into lines by [`print_lines`].

use super::types::{
    ImportBinding, TemplatePart, TsExpr, TsImport, TsLiteral, TsParam, TsPrimitive, TsProp,
    TsType, TsTypeDef, TsTypeParam, TypeDefKind,
};
use super::utils::{escape_js_string, escape_template, fill_multiline_comment, quote_if_needed};

/// Trait for printing TypeScript code from syntax nodes.
pub trait Print {
    /// Convert the node to its TypeScript source representation.
    fn print(&self) -> String;
}

/// Print a node and append its lines.
pub fn print_lines(lines: &mut Vec<String>, node: &impl Print) {
    lines.extend(node.print().lines().map(str::to_string));
}

fn join<T: Print>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(Print::print)
        .collect::<Vec<_>>()
        .join(separator)
}

// =============================================================================
// Types
// =============================================================================

impl Print for TsPrimitive {
    fn print(&self) -> String {
        match self {
            TsPrimitive::String => "string".to_string(),
            TsPrimitive::Number => "number".to_string(),
            TsPrimitive::Boolean => "boolean".to_string(),
            TsPrimitive::Void => "void".to_string(),
            TsPrimitive::Unknown => "unknown".to_string(),
        }
    }
}

impl Print for TsLiteral {
    fn print(&self) -> String {
        match self {
            TsLiteral::String(s) => format!("\"{}\"", escape_js_string(s)),
            TsLiteral::Bool(b) => b.to_string(),
        }
    }
}

impl Print for TsType {
    fn print(&self) -> String {
        match self {
            TsType::Primitive(p) => p.print(),
            TsType::Ref { name, args } => {
                if args.is_empty() {
                    name.clone()
                } else {
                    format!("{name}<{}>", join(args, ", "))
                }
            }
            TsType::Record { key, value } => {
                format!("Record<{}, {}>", key.print(), value.print())
            }
            TsType::EmptyObject => "{}".to_string(),
            TsType::Union(types) => join(types, " | "),
            TsType::Literal(lit) => lit.print(),
        }
    }
}

impl Print for TsProp {
    fn print(&self) -> String {
        let key = quote_if_needed(&self.name);
        let opt = if self.optional { "?" } else { "" };
        format!("{key}{opt}: {};", self.ty.print())
    }
}

impl Print for TsTypeParam {
    fn print(&self) -> String {
        match &self.default {
            Some(default) => format!("{} = {}", self.name, default.print()),
            None => self.name.clone(),
        }
    }
}

// =============================================================================
// Type Definitions
// =============================================================================

impl Print for TsTypeDef {
    fn print(&self) -> String {
        let mut lines = Vec::new();
        fill_multiline_comment(&mut lines, &self.comment);

        match &self.kind {
            TypeDefKind::Interface {
                type_params,
                extends,
                properties,
            } => {
                let mut head = format!("export interface {}", self.name);
                if !type_params.is_empty() {
                    head.push_str(&format!("<{}>", join(type_params, ", ")));
                }
                if !extends.is_empty() {
                    head.push_str(&format!(" extends {}", join(extends, ", ")));
                }
                lines.push(format!("{head} {{"));

                for prop in properties {
                    if fill_multiline_comment(&mut lines, &prop.comment) {
                        lines.push(prop.print());
                        lines.push(String::new());
                    } else {
                        lines.push(prop.print());
                    }
                }
                if lines.last().is_some_and(String::is_empty) {
                    lines.pop();
                }
                lines.push("}".to_string());
            }
            TypeDefKind::TypeAlias { ty } => {
                lines.push(format!("export type {} = {};", self.name, ty.print()));
            }
            TypeDefKind::Enum { members } => {
                lines.push(format!("export enum {} {{", self.name));
                for (key, value) in members {
                    lines.push(format!(
                        "{} = {},",
                        quote_if_needed(key),
                        TsLiteral::String(value.clone()).print()
                    ));
                }
                lines.push("}".to_string());
            }
        }

        lines.join("\n")
    }
}

// =============================================================================
// Expressions
// =============================================================================

impl Print for TsExpr {
    fn print(&self) -> String {
        match self {
            TsExpr::Ident(name) => name.clone(),
            TsExpr::Literal(lit) => lit.print(),
            TsExpr::Call { callee, args } => {
                format!("{}({})", callee.print(), join(args, ", "))
            }
            TsExpr::New { callee, args } => {
                format!("new {}({})", callee.print(), join(args, ", "))
            }
            TsExpr::Member { object, prop } => {
                format!("{}.{}", object.print(), prop)
            }
            TsExpr::Arrow { params, body } => {
                format!("({}) => {}", join(params, ", "), body.print())
            }
            TsExpr::Template(parts) => {
                let content: String = parts
                    .iter()
                    .map(|p| match p {
                        TemplatePart::Static(s) => escape_template(s),
                        TemplatePart::Dynamic(e) => format!("${{{}}}", e.print()),
                    })
                    .collect();
                format!("`{content}`")
            }
            TsExpr::Raw(code) => code.clone(),
        }
    }
}

impl Print for TsParam {
    fn print(&self) -> String {
        match &self.ty {
            Some(ty) => format!("{}: {}", self.name, ty.print()),
            None => self.name.clone(),
        }
    }
}

// =============================================================================
// Imports
// =============================================================================

impl Print for TsImport {
    fn print(&self) -> String {
        let binding = match &self.binding {
            ImportBinding::Namespace(name) => format!("* as {name}"),
            ImportBinding::Named(items) => format!("{{{}}}", items.join(", ")),
        };
        format!("import {binding} from '{}';", self.from)
    }
}
