//! Generated support module: the `Raw` scalar and the `resolveType` union
//! discriminator imported by schema code when no external paths are configured.
//!
//! The discriminator mirrors [`crate::runtime::discriminator`]: descend the
//! operation's selection set along the response path (aliases included), then
//! pick the first inline fragment whose fields are present on the value.

use crate::runtime::MatchPolicy;

const POLICY_MARKER: &str = "%DEFAULT_POLICY%";

const RUNTIME: &str = r#"import * as graphql from 'graphql';

export const Raw = new graphql.GraphQLScalarType({
    name: 'Raw',
    description: 'Value passed through as is',
    serialize: (v: any) => v,
    parseValue: (v: any) => v,
    parseLiteral(ast: any): any {
        switch (ast.kind) {
            case 'NullValue':
                return null;
            case 'ListValue':
                return ast.values;
            case 'Variable':
                return ast.name;
            case 'ObjectValue': {
                const result: any = {};
                ast.fields.forEach((f: any) => {
                    const asNumber = parseFloat(f.value.value);
                    result[f.name.value] = isNaN(asNumber) ? f.value.value : asNumber;
                });
                return result;
            }
            default:
                return ast.value;
        }
    },
});

export type MatchPolicy = 'any' | 'all';

function responseKeys(info: graphql.GraphQLResolveInfo): Array<string | number> {
    const keys: Array<string | number> = [];
    for (let part: any = info.path; part; part = part.prev) {
        keys.push(part.key);
    }
    return keys.reverse();
}

function selectionAt(set: graphql.SelectionSetNode, keys: Array<string | number>): graphql.SelectionSetNode {
    return keys.reduce((current: graphql.SelectionSetNode, key) => {
        if (typeof key === 'number') {
            return current;
        }

        const fields = current.selections.filter(
            (s): s is graphql.FieldNode =>
                s.kind === 'Field' && (s.alias ? s.alias.value : s.name.value) === key && !!s.selectionSet,
        );
        const field = fields.pop();
        return field && field.selectionSet ? field.selectionSet : current;
    }, set);
}

export function resolveType(
    value: any,
    context: any,
    info: graphql.GraphQLResolveInfo,
    types: graphql.GraphQLObjectType[],
    policy: MatchPolicy = '%DEFAULT_POLICY%',
): graphql.GraphQLObjectType | undefined {
    const set = selectionAt(info.operation.selectionSet, responseKeys(info));

    for (const selection of set.selections) {
        if (selection.kind !== 'InlineFragment' || !selection.typeCondition) {
            continue;
        }

        const names = selection.selectionSet.selections
            .map((s) => (s.kind === 'Field' ? s.name.value : ''))
            .filter((n) => !!n && n !== '__typename');

        const present = (n: string) => !!value[n];
        const matches = names.length > 0 && (policy === 'all' ? names.every(present) : names.some(present));

        if (!matches) {
            continue;
        }

        const condition = selection.typeCondition.name.value;
        const member = types.find((t) => t.name === condition);
        if (member) {
            return member;
        }
    }

    return types[0];
}"#;

/// Lines of the support module, defaulting `resolveType` to `policy`.
pub fn runtime_module(policy: MatchPolicy) -> Vec<String> {
    RUNTIME
        .replace(POLICY_MARKER, policy.as_str())
        .lines()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_substituted() {
        let any = runtime_module(MatchPolicy::Any).join("\n");
        assert!(any.contains("policy: MatchPolicy = 'any',"));
        assert!(!any.contains(POLICY_MARKER));

        let all = runtime_module(MatchPolicy::All).join("\n");
        assert!(all.contains("policy: MatchPolicy = 'all',"));
    }

    #[test]
    fn test_exports() {
        let lines = runtime_module(MatchPolicy::Any);
        assert_eq!(lines[0], "import * as graphql from 'graphql';");
        assert!(lines.iter().any(|l| l == "export const Raw = new graphql.GraphQLScalarType({"));
        assert!(lines.iter().any(|l| l.starts_with("export function resolveType(")));
    }
}
