//! `refract resolve`: print the expression for one type descriptor.

use clap::Args;
use tracing::debug;

use refract_core::{
    Connection, EmitMap, GenerationContext, GeneratorConfig, Representation, Result, TypeDescriptor,
    TypeRequest,
};

/// Arguments of `refract resolve`.
#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Target representation: `typescript` or `graphql`
    #[arg(long, value_name = "REPRESENTATION")]
    pub representation: String,
    /// Type descriptor as JSON
    #[arg(long = "type", value_name = "JSON")]
    pub ty: String,
    /// Origin the type is declared in (defaults to the descriptor's origin)
    #[arg(long)]
    pub origin: Option<String>,
    /// Emission the type is declared in
    #[arg(long, default_value = "typescript")]
    pub emission: String,
    /// Origin the type is referenced from (defaults to the declaring origin)
    #[arg(long)]
    pub from_origin: Option<String>,
    /// Schema form only: `true` for an input type, `false` for an output type
    #[arg(long, value_name = "BOOL")]
    pub input: Option<bool>,
}

/// Run `refract resolve` and return the process exit code.
pub fn run(args: ResolveArgs) -> i32 {
    match resolve(&args) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            0
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

/// Resolve one descriptor: the imports it needs, then the expression.
pub fn resolve(args: &ResolveArgs) -> Result<Vec<String>> {
    let representation: Representation = args.representation.parse()?;
    let ty: TypeDescriptor = serde_json::from_str(&args.ty)?;

    let config = GeneratorConfig::new(".");
    let cx = GenerationContext::new(&config);

    let location = Connection::new(
        args.origin.clone().unwrap_or_else(|| ty.origin.clone()),
        args.emission.clone(),
    );
    let requested_from = Connection::new(
        args.from_origin
            .clone()
            .unwrap_or_else(|| location.origin.clone()),
        args.emission.clone(),
    );

    let mut request = match representation {
        Representation::TypeScript => TypeRequest::typescript(&ty, location, requested_from.clone()),
        Representation::GraphQL => TypeRequest::graphql(&ty, location, requested_from.clone()),
    };
    if let Some(is_input) = args.input {
        request = request.input(is_input);
    }

    let mut emit = EmitMap::new();
    let expression = cx.resolver().resolve(&request, &mut emit);
    debug!(%representation, from = %requested_from, "Resolved type.");

    let mut lines = emit
        .get(&requested_from.origin)
        .map(|e| cx.import_lines(e))
        .unwrap_or_default();
    lines.push(expression);
    Ok(lines)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn args(representation: &str, ty: &str) -> ResolveArgs {
        ResolveArgs {
            representation: representation.to_string(),
            ty: ty.to_string(),
            origin: None,
            emission: "typescript".to_string(),
            from_origin: None,
            input: None,
        }
    }

    #[test]
    fn test_resolve_in_place() {
        let lines = resolve(&args("ts", r#"{"name": "User", "origin": "users", "kind": "Entity"}"#)).unwrap();
        assert_eq!(lines, vec!["User".to_string()]);
    }

    #[test]
    fn test_resolve_across_origins_adds_import() {
        let mut args = args("typescript", r#"{"name": "User", "origin": "users", "kind": "Entity"}"#);
        args.from_origin = Some("billing".to_string());

        let lines = resolve(&args).unwrap();
        assert_eq!(
            lines,
            vec![
                "import * as UsersTypescript from './Users';".to_string(),
                "UsersTypescript.User".to_string(),
            ]
        );
    }

    #[test]
    fn test_resolve_schema_list() {
        let mut args = args(
            "graphql",
            r#"{"name": "Array", "origin": "users", "kind": "List", "generics": [{"name": "string", "origin": "users", "kind": "String"}]}"#,
        );
        args.emission = "graphql".to_string();

        let lines = resolve(&args).unwrap();
        assert_eq!(lines, vec!["new graphql.GraphQLList(graphql.GraphQLString)".to_string()]);
    }

    #[test]
    fn test_unknown_representation() {
        let err = resolve(&args("swift", "{}")).unwrap_err();
        assert!(err.to_string().contains("swift"));
    }
}
