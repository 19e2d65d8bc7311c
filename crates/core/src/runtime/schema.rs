//! Schema types with singleton identity and the identity-caching factory.
//!
//! Schema assembly compares named types by reference: two structurally equal
//! object types with the same name are a conflict, not a duplicate. Every named
//! declaration is therefore built through a [`DefinitionFactory`], which hands
//! out one shared instance per distinct instantiation.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::names::strip_brackets;

/// Name of the scalar used for values without structure.
pub const RAW_SCALAR_NAME: &str = "Raw";

/// Suffix distinguishing input variants from output variants.
const INPUT_SUFFIX: &str = "Input";

/// A schema type. Named variants are shared through `Rc` and compared with
/// [`Rc::ptr_eq`].
#[derive(Debug)]
pub enum SchemaType {
    /// Named scalar.
    Scalar(String),
    /// Enumeration.
    Enum {
        /// Schema name.
        name: String,
        /// Member values.
        values: Vec<String>,
    },
    /// Object or input object.
    Object(ObjectType),
    /// List of the inner type.
    List(Rc<SchemaType>),
    /// Non-null wrapper.
    NonNull(Rc<SchemaType>),
    /// Union of object types.
    Union {
        /// Schema name.
        name: String,
        /// Member object types.
        members: Vec<Rc<SchemaType>>,
    },
}

impl SchemaType {
    /// New scalar named `name`.
    pub fn scalar(name: impl Into<String>) -> Rc<Self> {
        Rc::new(SchemaType::Scalar(name.into()))
    }

    /// A fresh `Raw` scalar. Share one instance per schema.
    pub fn raw() -> Rc<Self> {
        Self::scalar(RAW_SCALAR_NAME)
    }

    /// List of `of`.
    pub fn list(of: &Rc<SchemaType>) -> Rc<Self> {
        Rc::new(SchemaType::List(Rc::clone(of)))
    }

    /// Non-null `of`.
    pub fn non_null(of: &Rc<SchemaType>) -> Rc<Self> {
        Rc::new(SchemaType::NonNull(Rc::clone(of)))
    }

    /// Printed type reference: `User`, `[User]`, `User!`.
    pub fn display_name(&self) -> String {
        match self {
            SchemaType::Scalar(name)
            | SchemaType::Enum { name, .. }
            | SchemaType::Union { name, .. } => name.clone(),
            SchemaType::Object(object) => object.name.clone(),
            SchemaType::List(of) => format!("[{}]", of.display_name()),
            SchemaType::NonNull(of) => format!("{}!", of.display_name()),
        }
    }

    /// The object type, if this is one.
    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            SchemaType::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Object or input object type. Fields are filled after the instance is cached
/// so that self-referencing declarations resolve to the same instance.
pub struct ObjectType {
    /// Schema name.
    pub name: String,
    /// Input object rather than output object.
    pub is_input: bool,
    /// Description shown in the schema.
    pub description: String,
    fields: RefCell<Vec<FieldDef>>,
}

impl ObjectType {
    /// Snapshot of the field list.
    pub fn fields(&self) -> Vec<FieldDef> {
        self.fields.borrow().clone()
    }

    /// Field named `name`.
    pub fn field(&self, name: &str) -> Option<FieldDef> {
        self.fields.borrow().iter().find(|f| f.name == name).cloned()
    }
}

// Fields may point back at this type; print names only.
impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .fields
            .borrow()
            .iter()
            .map(|field| format!("{}: {}", field.name, field.ty.display_name()))
            .collect();

        f.debug_struct("ObjectType")
            .field("name", &self.name)
            .field("is_input", &self.is_input)
            .field("fields", &fields)
            .finish()
    }
}

/// Field of an object type.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Field type.
    pub ty: Rc<SchemaType>,
    /// Description shown in the schema.
    pub description: String,
}

impl FieldDef {
    /// Field `name` of type `ty`.
    pub fn new(name: impl Into<String>, ty: Rc<SchemaType>) -> Self {
        Self {
            name: name.into(),
            ty,
            description: String::new(),
        }
    }

    /// Attach a description.
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

type FieldsFn = dyn Fn(bool, &[Rc<SchemaType>]) -> Vec<FieldDef>;

/// Builds one declaration's object types on demand and caches them by the name
/// of the instantiation.
///
/// The name template is the registered schema name with `${Var}` placeholders
/// for type variables (`Page_${T}`). At call time each placeholder is replaced
/// with the display name of the argument actually passed, so distinct argument
/// types give distinct instances and the same argument gives the cached one.
/// Input variants are cached separately under `<name>Input`.
pub struct DefinitionFactory {
    name_template: String,
    variables: Vec<String>,
    description: String,
    raw: Rc<SchemaType>,
    fields: Box<FieldsFn>,
    cache: RefCell<HashMap<String, Rc<SchemaType>>>,
}

impl DefinitionFactory {
    /// `fields` receives the input flag and the effective type arguments
    /// (missing ones replaced by `raw`). A `raw` field is always added first.
    pub fn new<F>(
        name_template: impl Into<String>,
        variables: Vec<String>,
        raw: Rc<SchemaType>,
        fields: F,
    ) -> Self
    where
        F: Fn(bool, &[Rc<SchemaType>]) -> Vec<FieldDef> + 'static,
    {
        Self {
            name_template: name_template.into(),
            variables,
            description: String::new(),
            raw,
            fields: Box::new(fields),
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Description given to every instance.
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    fn arguments(&self, args: &[Rc<SchemaType>]) -> Vec<Rc<SchemaType>> {
        (0..self.variables.len())
            .map(|i| Rc::clone(args.get(i).unwrap_or(&self.raw)))
            .collect()
    }

    /// Name of the instance for `is_input` and `args`.
    pub fn instance_name(&self, is_input: bool, args: &[Rc<SchemaType>]) -> String {
        let mut name = self.name_template.clone();

        for (variable, arg) in self.variables.iter().zip(self.arguments(args)) {
            name = name.replace(&format!("${{{variable}}}"), &arg.display_name());
        }

        if is_input {
            name.push_str(INPUT_SUFFIX);
        }

        strip_brackets(&name)
    }

    /// Shared instance for `is_input` and `args`, built on first request.
    pub fn instantiate(&self, is_input: bool, args: &[Rc<SchemaType>]) -> Rc<SchemaType> {
        let name = self.instance_name(is_input, args);

        let cached = self.cache.borrow().get(&name).cloned();
        if let Some(instance) = cached {
            return instance;
        }

        let instance = Rc::new(SchemaType::Object(ObjectType {
            name: name.clone(),
            is_input,
            description: self.description.clone(),
            fields: RefCell::new(Vec::new()),
        }));
        self.cache.borrow_mut().insert(name, Rc::clone(&instance));

        let mut fields = vec![FieldDef::new("raw", Rc::clone(&self.raw))];
        fields.extend((self.fields)(is_input, &self.arguments(args)));

        if let Some(object) = instance.as_object() {
            *object.fields.borrow_mut() = fields;
        }

        instance
    }

    /// Number of instances built so far.
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl fmt::Debug for DefinitionFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinitionFactory")
            .field("name_template", &self.name_template)
            .field("variables", &self.variables)
            .field("cached", &self.cached())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::rc::Weak;

    use super::*;

    fn page(raw: &Rc<SchemaType>) -> DefinitionFactory {
        DefinitionFactory::new("Page", vec!["T".into()], Rc::clone(raw), |_, args| {
            vec![FieldDef::new("items", SchemaType::list(&args[0]))]
        })
        .described("A page of items")
    }

    fn user(raw: &Rc<SchemaType>) -> DefinitionFactory {
        DefinitionFactory::new("User", vec![], Rc::clone(raw), |_, _| {
            vec![FieldDef::new("name", SchemaType::scalar("String"))]
        })
    }

    #[test]
    fn test_same_arguments_share_instance() {
        let raw = SchemaType::raw();
        let user = user(&raw).instantiate(false, &[]);
        let page = DefinitionFactory::new("Page_${T}", vec!["T".into()], Rc::clone(&raw), |_, _| {
            vec![]
        });

        let a = page.instantiate(false, &[Rc::clone(&user)]);
        let b = page.instantiate(false, &[Rc::clone(&user)]);
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(a.display_name(), "Page_User");
        assert_eq!(page.cached(), 1);
    }

    #[test]
    fn test_distinct_arguments_give_distinct_instances() {
        let raw = SchemaType::raw();
        let users = user(&raw);
        let orders = DefinitionFactory::new("Order", vec![], Rc::clone(&raw), |_, _| vec![]);
        let page = DefinitionFactory::new("Page_${T}", vec!["T".into()], Rc::clone(&raw), |_, _| {
            vec![]
        });

        let of_users = page.instantiate(false, &[users.instantiate(false, &[])]);
        let of_orders = page.instantiate(false, &[orders.instantiate(false, &[])]);
        assert!(!Rc::ptr_eq(&of_users, &of_orders));
        assert_eq!(of_orders.display_name(), "Page_Order");
    }

    #[test]
    fn test_input_and_output_are_cached_separately() {
        let raw = SchemaType::raw();
        let users = user(&raw);

        let output = users.instantiate(false, &[]);
        let input = users.instantiate(true, &[]);
        assert!(!Rc::ptr_eq(&output, &input));
        assert_eq!(output.display_name(), "User");
        assert_eq!(input.display_name(), "UserInput");
        assert!(input.as_object().unwrap().is_input);

        assert!(Rc::ptr_eq(&input, &users.instantiate(true, &[])));
        assert_eq!(users.cached(), 2);
    }

    #[test]
    fn test_missing_argument_defaults_to_raw_and_brackets_are_stripped() {
        let raw = SchemaType::raw();
        let page = DefinitionFactory::new("Page_${T}", vec!["T".into()], Rc::clone(&raw), |_, args| {
            vec![FieldDef::new("item", Rc::clone(&args[0]))]
        });

        let untyped = page.instantiate(false, &[]);
        assert_eq!(untyped.display_name(), "Page_Raw");
        let item = untyped.as_object().unwrap().field("item").unwrap();
        assert!(Rc::ptr_eq(&item.ty, &raw));

        let users = user(&raw).instantiate(false, &[]);
        let listed = page.instantiate(false, &[SchemaType::list(&users)]);
        assert_eq!(listed.display_name(), "Page_User");
        assert!(Rc::ptr_eq(&listed, &page.instantiate(false, &[users])));
    }

    #[test]
    fn test_every_object_has_raw_field() {
        let raw = SchemaType::raw();
        let page = page(&raw);
        let instance = page.instantiate(false, &[]);
        let object = instance.as_object().unwrap();

        let names: Vec<_> = object.fields().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["raw", "items"]);
        assert!(Rc::ptr_eq(&object.field("raw").unwrap().ty, &raw));
        assert_eq!(object.description, "A page of items");
    }

    #[test]
    fn test_self_reference_resolves_to_same_instance() {
        let raw = SchemaType::raw();
        let node: Rc<DefinitionFactory> = Rc::new_cyclic(|me: &Weak<DefinitionFactory>| {
            let me = me.clone();
            DefinitionFactory::new("Node", vec![], Rc::clone(&raw), move |is_input, _| {
                let this = me.upgrade().unwrap();
                vec![FieldDef::new("parent", this.instantiate(is_input, &[]))]
            })
        });

        let instance = node.instantiate(false, &[]);
        let parent = instance.as_object().unwrap().field("parent").unwrap();
        assert!(Rc::ptr_eq(&parent.ty, &instance));
    }

    #[test]
    fn test_display_names() {
        let user = SchemaType::scalar("User");
        assert_eq!(SchemaType::list(&user).display_name(), "[User]");
        assert_eq!(SchemaType::non_null(&user).to_string(), "User!");
    }
}
