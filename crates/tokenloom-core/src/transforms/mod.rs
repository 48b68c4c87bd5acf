//! Platform transforms
//!
//! A transform is a `{matcher, apply}` record. Matchers look at a token's
//! current attributes; `apply` produces a new value, name, or attribute set.
//! Transforms are grouped into ordered, named transform groups, one per
//! platform, and held in an explicit [`TransformRegistry`].
//!
//! # Built-in Transforms
//!
//! - `attribute/cti` - category/type/item classification
//! - `name/kebab`, `name/camel`, `name/snake` - final names from paths
//! - `size/pxToRem`, `size/androidDp` - dimension units
//! - `time/msToSeconds` - durations
//! - `color/css`, `color/swift`, `color/hex8android` - color formats
//! - `opacity/decimal` - percentages to fractions
//! - `cubicBezier/css` - easing arrays to `cubic-bezier()`
//! - `typography/cssShorthand` - composite typography to a `font` shorthand
//!
//! # Example
//!
//! ```yaml
//! transform_groups:
//!   web-minimal:
//!     - attribute/cti
//!     - name/kebab
//!     - size/pxToRem
//! ```

pub mod attribute;
pub mod name;
pub mod value;

use serde_json::Value;

use crate::expr::parse_template;
use crate::tree::{Attributes, TokenNode};

/// What a transform changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    /// Rewrites the value
    Value,
    /// Sets the final name
    Name,
    /// Replaces the attributes
    Attribute,
}

/// Function applied when a transform matches
#[derive(Clone, Copy)]
pub enum TransformFn {
    /// `None` means the input is unsupported and passes through unchanged
    Value(fn(&TransformedToken) -> Option<Value>),
    /// Final name from the token and platform context
    Name(fn(&TransformedToken, &TransformContext) -> String),
    /// New attribute set
    Attribute(fn(&TransformedToken) -> Attributes),
}

/// A named transform
#[derive(Clone, Copy)]
pub struct TransformDefinition {
    /// Unique name, referenced by transform groups
    pub name: &'static str,
    /// Predicate over the token's current attributes
    pub matcher: fn(&Attributes) -> bool,
    /// The transformation
    pub apply: TransformFn,
}

impl TransformDefinition {
    /// Kind of field this transform rewrites
    pub fn kind(&self) -> TransformKind {
        match self.apply {
            TransformFn::Value(_) => TransformKind::Value,
            TransformFn::Name(_) => TransformKind::Name,
            TransformFn::Attribute(_) => TransformKind::Attribute,
        }
    }
}

impl std::fmt::Debug for TransformDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .finish()
    }
}

/// Matcher that accepts every token
pub fn match_all(_: &Attributes) -> bool {
    true
}

/// Platform settings visible to transforms
#[derive(Debug, Clone, Default)]
pub struct TransformContext {
    /// Name prefix, e.g. `vbr`
    pub prefix: Option<String>,
}

/// Ordered list of transform names applied together for one platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformGroup {
    /// Group name
    pub name: String,
    /// Transform names in application order
    pub transforms: Vec<String>,
}

impl TransformGroup {
    /// Create a group from transform names
    pub fn new<I, S>(name: impl Into<String>, transforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            transforms: transforms.into_iter().map(Into::into).collect(),
        }
    }
}

/// A token as seen by one platform: a copy of the resolved token plus its final name
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedToken {
    /// Name segments from the collection root
    pub path: Vec<String>,
    /// Final name; the dotted path until a name transform runs
    pub name: String,
    /// Current value
    pub value: Value,
    /// Value as written in the document
    pub raw_value: Value,
    /// Current attributes
    pub attributes: Attributes,
    /// Explicit `type` field
    pub token_type: Option<String>,
    /// Explicit `description` field
    pub description: Option<String>,
    /// Originating collection
    pub source_collection: String,
}

impl TransformedToken {
    /// Copy a resolved token
    pub fn from_resolved(node: &TokenNode) -> Self {
        Self {
            path: node.path.clone(),
            name: node.id(),
            value: node.value().clone(),
            raw_value: node.raw_value.clone(),
            attributes: node.attributes.clone(),
            token_type: node.token_type.clone(),
            description: node.description.clone(),
            source_collection: node.source_collection.clone(),
        }
    }

    /// Dotted path
    pub fn id(&self) -> String {
        self.path.join(".")
    }

    /// Path of the referenced token when the raw value is exactly one reference
    pub fn reference(&self) -> Option<String> {
        let Value::String(raw) = &self.raw_value else {
            return None;
        };
        parse_template(raw).single_reference().map(str::to_string)
    }
}

/// Explicit set of transforms and transform groups
#[derive(Debug, Clone, Default)]
pub struct TransformRegistry {
    transforms: Vec<TransformDefinition>,
    groups: Vec<TransformGroup>,
}

impl TransformRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with all built-in transforms and the `web`, `ios`, and `android` groups
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for definition in attribute::definitions()
            .into_iter()
            .chain(name::definitions())
            .chain(value::definitions())
        {
            registry.register(definition);
        }

        registry.register_group(TransformGroup::new(
            "web",
            [
                "attribute/cti",
                "name/kebab",
                "size/pxToRem",
                "time/msToSeconds",
                "color/css",
                "opacity/decimal",
                "cubicBezier/css",
                "typography/cssShorthand",
            ],
        ));
        registry.register_group(TransformGroup::new(
            "ios",
            [
                "attribute/cti",
                "name/camel",
                "color/swift",
                "time/msToSeconds",
                "opacity/decimal",
            ],
        ));
        registry.register_group(TransformGroup::new(
            "android",
            [
                "attribute/cti",
                "name/snake",
                "size/androidDp",
                "color/hex8android",
                "opacity/decimal",
            ],
        ));
        registry
    }

    /// Add a transform; a transform with the same name is replaced
    pub fn register(&mut self, definition: TransformDefinition) {
        match self.transforms.iter_mut().find(|t| t.name == definition.name) {
            Some(existing) => *existing = definition,
            None => self.transforms.push(definition),
        }
    }

    /// Add a group; a group with the same name is replaced
    pub fn register_group(&mut self, group: TransformGroup) {
        match self.groups.iter_mut().find(|g| g.name == group.name) {
            Some(existing) => *existing = group,
            None => self.groups.push(group),
        }
    }

    /// Look up a transform by name
    pub fn get(&self, name: &str) -> Option<&TransformDefinition> {
        self.transforms.iter().find(|t| t.name == name)
    }

    /// Look up a group by name
    pub fn group(&self, name: &str) -> Option<&TransformGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Registered transform names
    pub fn transform_names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.name).collect()
    }
}
