//! Run-wide registry of schema type names.
//!
//! A schema must not contain two types with the same name, but several origins
//! routinely declare types with the same short name. Every schema name goes
//! through [`NameRegistry::register`], which qualifies colliding names with the
//! origin's display name (and the caller's postfix) until the name is free.
//!
//! The registry is append-only for the duration of one run and memoizes nothing:
//! registering the same declaration twice yields two different names.

use std::collections::HashSet;

use crate::naming::Naming;

/// A name allocation request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameRequest<'a> {
    /// Candidate short name.
    pub name: &'a str,
    /// Another declaration elsewhere shares this short name.
    pub is_duplicate: bool,
    /// Origin that owns the declaration.
    pub origin: &'a str,
    /// Appended after the origin name when qualifying (interplay namespaces).
    pub postfix: &'a str,
    /// Generic argument placeholders appended as `_A_B`.
    pub variables: &'a [String],
}

impl<'a> NameRequest<'a> {
    /// Request for `name` declared in `origin`.
    pub fn new(name: &'a str, origin: &'a str) -> Self {
        Self {
            name,
            origin,
            ..Self::default()
        }
    }

    /// Flag the name as shared with another declaration.
    pub fn duplicate(mut self, is_duplicate: bool) -> Self {
        self.is_duplicate = is_duplicate;
        self
    }

    /// Set the postfix appended after the origin name.
    pub fn postfix(mut self, postfix: &'a str) -> Self {
        self.postfix = postfix;
        self
    }

    /// Set the generic placeholders.
    pub fn variables(mut self, variables: &'a [String]) -> Self {
        self.variables = variables;
        self
    }
}

/// Append-only set of allocated schema names.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    names: Vec<String>,
    used: HashSet<String>,
}

impl NameRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a name as-is, without collision handling.
    pub fn reserve(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.used.insert(name.clone()) {
            self.names.push(name);
        }
    }

    /// Whether `name` has been allocated or reserved.
    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Allocated names in allocation order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Allocate a unique schema name for `request`.
    ///
    /// The candidate is qualified with `<OriginName><postfix>` when it is already
    /// taken or flagged as a duplicate (unless the origin is the shared
    /// pseudo-origin); qualification repeats until the name is free. Generic
    /// placeholders are appended afterwards and bracket characters removed.
    pub fn register(&mut self, naming: &Naming, request: &NameRequest<'_>) -> String {
        let suffix = format!("{}{}", naming.origin_name(request.origin), request.postfix);
        let mut force_qualify = request.is_duplicate && !naming.is_shared(request.origin);
        let mut base = request.name.to_string();
        let mut counter = 1usize;

        let name = loop {
            let candidate = decorate(&base, request.variables);

            if !force_qualify && !self.is_used(&base) && !self.is_used(&candidate) {
                break candidate;
            }

            force_qualify = false;

            if suffix.is_empty() {
                counter += 1;
                base = format!("{}_{counter}", request.name);
            } else {
                base.push_str(&suffix);
            }
        };

        self.used.insert(name.clone());
        self.names.push(name.clone());
        name
    }
}

/// Append generic placeholders and drop list brackets.
fn decorate(base: &str, variables: &[String]) -> String {
    let name = if variables.is_empty() {
        base.to_string()
    } else {
        format!("{base}_{}", variables.join("_"))
    };
    strip_brackets(&name)
}

/// Schema names cannot contain the `[`/`]` used to print list types.
pub fn strip_brackets(name: &str) -> String {
    name.chars().filter(|c| !matches!(c, '[' | ']')).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::SideOrigin;

    fn naming() -> Naming {
        Naming::new(
            "/out",
            SideOrigin::new("unknown", "Unknown"),
            SideOrigin::new("shared", "Shared"),
        )
    }

    #[test]
    fn test_duplicate_gets_origin_suffix() {
        let naming = naming();
        let mut names = NameRegistry::new();

        let first = names.register(&naming, &NameRequest::new("User", "billing"));
        let second = names.register(
            &naming,
            &NameRequest::new("User", "shipping").duplicate(true),
        );

        assert_eq!(first, "User");
        assert_eq!(second, "UserShipping");
    }

    #[test]
    fn test_collision_without_duplicate_flag() {
        let naming = naming();
        let mut names = NameRegistry::new();

        names.register(&naming, &NameRequest::new("User", "billing"));
        let again = names.register(&naming, &NameRequest::new("User", "billing"));
        let third = names.register(&naming, &NameRequest::new("User", "billing"));

        assert_eq!(again, "UserBilling");
        assert_eq!(third, "UserBillingBilling");
    }

    #[test]
    fn test_shared_origin_ignores_duplicate_flag() {
        let naming = naming();
        let mut names = NameRegistry::new();

        let name = names.register(&naming, &NameRequest::new("Money", "shared").duplicate(true));
        assert_eq!(name, "Money");
    }

    #[test]
    fn test_postfix_is_appended_after_origin() {
        let naming = naming();
        let mut names = NameRegistry::new();
        names.reserve("Query");

        let name = names.register(
            &naming,
            &NameRequest::new("Query", "billing").postfix("UserControllerInterplay"),
        );
        assert_eq!(name, "QueryBillingUserControllerInterplay");
    }

    #[test]
    fn test_generic_placeholders_and_brackets() {
        let naming = naming();
        let mut names = NameRegistry::new();
        let variables = vec!["${T}".to_string(), "[${U}]".to_string()];

        let name = names.register(
            &naming,
            &NameRequest::new("Page", "billing").variables(&variables),
        );
        assert_eq!(name, "Page_${T}_${U}");
    }

    #[test]
    fn test_generic_declaration_registered_twice_stays_unique() {
        let naming = naming();
        let mut names = NameRegistry::new();
        let variables = vec!["${T}".to_string()];
        let request = NameRequest::new("Page", "billing").variables(&variables);

        let first = names.register(&naming, &request);
        let second = names.register(&naming, &request);
        assert_ne!(first, second);
        assert_eq!(second, "PageBilling_${T}");
    }

    #[test]
    fn test_empty_suffix_falls_back_to_counter() {
        let naming = naming();
        let mut names = NameRegistry::new();

        let first = names.register(&naming, &NameRequest::new("Thing", ""));
        let second = names.register(&naming, &NameRequest::new("Thing", ""));
        let third = names.register(&naming, &NameRequest::new("Thing", ""));
        assert_eq!(first, "Thing");
        assert_eq!(second, "Thing_2");
        assert_eq!(third, "Thing_3");
    }

    #[test]
    fn test_never_returns_same_name_twice() {
        let naming = naming();
        let mut names = NameRegistry::new();
        let origins = ["billing", "shipping", "billing", "shared", "shipping"];

        let allocated: Vec<_> = origins
            .iter()
            .map(|o| names.register(&naming, &NameRequest::new("Item", o).duplicate(true)))
            .collect();
        let unique: HashSet<_> = allocated.iter().collect();
        assert_eq!(unique.len(), allocated.len());
    }
}
