//! Pattern schema model.
//!
//! Immutable definitions of what a toolkit's pattern looks like: a root
//! [`PatternSchema`] of nested [`ElementSchema`]s and [`AttributeSchema`]s,
//! plus the automation and code templates attached to them.
//!
//! Schema objects are snapshots owned by a `ToolkitDefinition`. Draft items
//! never hold a live reference to them — they hold a `DraftItemSchema`
//! (schema id + structural kind) and resolve it on demand, which is what
//! lets migration resolve the same id against an *old* and a *new* toolkit.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Values and data types
// ============================================================================

/// The data types an attribute can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeDataType {
    String,
    Integer,
    Float,
    Boolean,
}

impl fmt::Display for AttributeDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Boolean => write!(f, "boolean"),
        }
    }
}

/// A typed attribute value.
///
/// The tagged representation keeps persisted drafts self-describing; the
/// engine never stores an untyped string and re-guesses later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum AttributeValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl AttributeValue {
    pub fn data_type(&self) -> AttributeDataType {
        match self {
            Self::String(_) => AttributeDataType::String,
            Self::Integer(_) => AttributeDataType::Integer,
            Self::Float(_) => AttributeDataType::Float,
            Self::Boolean(_) => AttributeDataType::Boolean,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl AttributeDataType {
    /// Whether a value conforms to this data type.
    pub fn validates(&self, value: &AttributeValue) -> bool {
        value.data_type() == *self
    }

    /// Parse a raw textual value into this data type.
    ///
    /// Returns `None` when the text does not parse; the caller decides
    /// whether that is an error (user assignment) or a fallback-to-default
    /// (migration).
    pub fn coerce(&self, raw: &str) -> Option<AttributeValue> {
        match self {
            Self::String => Some(AttributeValue::String(raw.to_string())),
            Self::Integer => raw.parse::<i64>().ok().map(AttributeValue::Integer),
            Self::Float => raw.parse::<f64>().ok().map(AttributeValue::Float),
            Self::Boolean => raw.parse::<bool>().ok().map(AttributeValue::Boolean),
        }
    }

    /// Re-type an existing value into this data type, going through its
    /// textual form. Used by migration when an attribute changes type.
    pub fn convert(&self, value: &AttributeValue) -> Option<AttributeValue> {
        if self.validates(value) {
            return Some(value.clone());
        }
        self.coerce(&value.to_string())
    }
}

/// Cardinality of an element relative to its parent.
///
/// `OneOrMany` / `ZeroOrMany` elements are instantiated as collections;
/// `One` / `ZeroOrOne` as singular elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    One,
    ZeroOrOne,
    OneOrMany,
    ZeroOrMany,
}

impl Cardinality {
    pub fn requires_at_least_one(&self) -> bool {
        matches!(self, Self::One | Self::OneOrMany)
    }

    pub fn limits_to_one(&self) -> bool {
        matches!(self, Self::One | Self::ZeroOrOne)
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::OneOrMany | Self::ZeroOrMany)
    }
}

// ============================================================================
// Attribute schema
// ============================================================================

/// Definition of a single attribute on a pattern or element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSchema {
    pub id: String,
    pub name: String,
    pub data_type: AttributeDataType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<AttributeValue>,
    /// Allowed values. Empty means unconstrained.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<AttributeValue>,
}

impl AttributeSchema {
    pub fn new(id: impl Into<String>, name: impl Into<String>, data_type: AttributeDataType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data_type,
            required: false,
            default_value: None,
            choices: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: AttributeValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_choices(mut self, choices: Vec<AttributeValue>) -> Self {
        self.choices = choices;
        self
    }

    /// Whether a value is acceptable for this attribute (type + choices).
    pub fn is_valid_value(&self, value: &AttributeValue) -> bool {
        self.data_type.validates(value)
            && (self.choices.is_empty() || self.choices.contains(value))
    }

    /// The declared default, but only when it actually conforms to the
    /// attribute's own type and choices. An invalid default is treated as
    /// no default at all.
    pub fn default_if_valid(&self) -> Option<AttributeValue> {
        self.default_value
            .as_ref()
            .filter(|v| self.is_valid_value(v))
            .cloned()
    }

    /// Pick the value a materialising attribute should take: an explicit
    /// value wins if valid, otherwise the (valid) default, otherwise null.
    pub fn materialise_value(&self, explicit: Option<AttributeValue>) -> Option<AttributeValue> {
        match explicit {
            Some(v) if self.is_valid_value(&v) => Some(v),
            _ => self.default_if_valid(),
        }
    }

    /// Attribute-level validation, invoked with the node's configuration
    /// path as context. Returns violation messages; empty means valid.
    pub fn validate(&self, value: Option<&AttributeValue>) -> Vec<String> {
        let mut violations = Vec::new();
        match value {
            None => {
                if self.required {
                    violations.push(format!("'{}' requires a value", self.name));
                }
            }
            Some(v) => {
                if !self.data_type.validates(v) {
                    violations.push(format!(
                        "'{}' is not a valid '{}' value",
                        v, self.data_type
                    ));
                }
                if !self.choices.is_empty() && !self.choices.contains(v) {
                    violations.push(format!(
                        "'{}' is not one of the allowed values for '{}'",
                        v, self.name
                    ));
                }
            }
        }
        violations
    }
}

// ============================================================================
// Automation and code templates
// ============================================================================

/// What an automation command does when launched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AutomationKind {
    /// Run an external executable.
    CliCommand {
        executable: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        arguments: Option<String>,
    },
    /// Render a packaged code template to a target path.
    ///
    /// `target_path` may contain `{...}` expressions resolved against the
    /// target item's configuration at execution time.
    CodeTemplateCommand {
        template_id: String,
        target_path: String,
    },
}

/// An automation command declared on a pattern or element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationSchema {
    pub id: String,
    pub name: String,
    /// Only launchable commands can be executed directly by users.
    #[serde(default)]
    pub launchable: bool,
    pub kind: AutomationKind,
}

/// A packaged code template declared on a pattern or element.
/// The template's file content lives on the owning `ToolkitDefinition`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeTemplateSchema {
    pub id: String,
    pub name: String,
}

// ============================================================================
// Element and pattern schemas
// ============================================================================

/// Definition of a child element of a pattern or element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSchema {
    pub id: String,
    pub name: String,
    pub cardinality: Cardinality,
    /// Explicit auto-create override; when absent, required singular
    /// elements auto-create and everything else does not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_create: Option<bool>,
    #[serde(default)]
    pub attributes: Vec<AttributeSchema>,
    #[serde(default)]
    pub elements: Vec<ElementSchema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub automation: Vec<AutomationSchema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub code_templates: Vec<CodeTemplateSchema>,
}

impl ElementSchema {
    pub fn new(id: impl Into<String>, name: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cardinality,
            auto_create: None,
            attributes: Vec::new(),
            elements: Vec::new(),
            automation: Vec::new(),
            code_templates: Vec::new(),
        }
    }

    pub fn is_collection(&self) -> bool {
        self.cardinality.is_collection()
    }

    /// Auto-create policy: an explicit flag wins; otherwise only required
    /// singular elements materialise automatically. Collections never
    /// auto-create their items.
    pub fn should_auto_create(&self) -> bool {
        self.auto_create
            .unwrap_or(matches!(self.cardinality, Cardinality::One))
    }
}

/// The root schema of a toolkit's pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSchema {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeSchema>,
    #[serde(default)]
    pub elements: Vec<ElementSchema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub automation: Vec<AutomationSchema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub code_templates: Vec<CodeTemplateSchema>,
}

impl PatternSchema {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            attributes: Vec::new(),
            elements: Vec::new(),
            automation: Vec::new(),
            code_templates: Vec::new(),
        }
    }

    /// Find an element schema anywhere in the pattern graph by id.
    pub fn find_element(&self, element_id: &str) -> Option<&ElementSchema> {
        fn search<'a>(elements: &'a [ElementSchema], id: &str) -> Option<&'a ElementSchema> {
            for element in elements {
                if element.id == id {
                    return Some(element);
                }
                if let Some(found) = search(&element.elements, id) {
                    return Some(found);
                }
            }
            None
        }
        search(&self.elements, element_id)
    }

    /// Find an attribute schema anywhere in the pattern graph by id.
    pub fn find_attribute(&self, attribute_id: &str) -> Option<&AttributeSchema> {
        fn search<'a>(
            attributes: &'a [AttributeSchema],
            elements: &'a [ElementSchema],
            id: &str,
        ) -> Option<&'a AttributeSchema> {
            if let Some(found) = attributes.iter().find(|a| a.id == id) {
                return Some(found);
            }
            for element in elements {
                if let Some(found) = search(&element.attributes, &element.elements, id) {
                    return Some(found);
                }
            }
            None
        }
        search(&self.attributes, &self.elements, attribute_id)
    }
}

/// Read-only view shared by [`PatternSchema`] and [`ElementSchema`].
///
/// Tree algorithms (construction, migration, automation lookup) treat the
/// pattern root and elements uniformly through this trait.
pub trait CompositeSchema {
    fn schema_id(&self) -> &str;
    fn schema_name(&self) -> &str;
    fn attributes(&self) -> &[AttributeSchema];
    fn elements(&self) -> &[ElementSchema];
    fn automation(&self) -> &[AutomationSchema];
    fn code_templates(&self) -> &[CodeTemplateSchema];

    /// Find a launchable automation command by (case-insensitive) name.
    fn find_automation(&self, name: &str) -> Option<&AutomationSchema> {
        self.automation()
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    fn has_code_template(&self, template_id: &str) -> bool {
        self.code_templates().iter().any(|t| t.id == template_id)
    }
}

impl CompositeSchema for PatternSchema {
    fn schema_id(&self) -> &str {
        &self.id
    }
    fn schema_name(&self) -> &str {
        &self.name
    }
    fn attributes(&self) -> &[AttributeSchema] {
        &self.attributes
    }
    fn elements(&self) -> &[ElementSchema] {
        &self.elements
    }
    fn automation(&self) -> &[AutomationSchema] {
        &self.automation
    }
    fn code_templates(&self) -> &[CodeTemplateSchema] {
        &self.code_templates
    }
}

impl CompositeSchema for ElementSchema {
    fn schema_id(&self) -> &str {
        &self.id
    }
    fn schema_name(&self) -> &str {
        &self.name
    }
    fn attributes(&self) -> &[AttributeSchema] {
        &self.attributes
    }
    fn elements(&self) -> &[ElementSchema] {
        &self.elements
    }
    fn automation(&self) -> &[AutomationSchema] {
        &self.automation
    }
    fn code_templates(&self) -> &[CodeTemplateSchema] {
        &self.code_templates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_integer() {
        assert_eq!(
            AttributeDataType::Integer.coerce("42"),
            Some(AttributeValue::Integer(42))
        );
        assert_eq!(AttributeDataType::Integer.coerce("x"), None);
    }

    #[test]
    fn coerce_boolean() {
        assert_eq!(
            AttributeDataType::Boolean.coerce("true"),
            Some(AttributeValue::Boolean(true))
        );
        assert_eq!(AttributeDataType::Boolean.coerce("yes"), None);
    }

    #[test]
    fn convert_across_types() {
        let v = AttributeValue::Integer(7);
        assert_eq!(
            AttributeDataType::String.convert(&v),
            Some(AttributeValue::String("7".into()))
        );
        let s = AttributeValue::String("abc".into());
        assert_eq!(AttributeDataType::Integer.convert(&s), None);
    }

    #[test]
    fn cardinality_collection_mapping() {
        assert!(Cardinality::OneOrMany.is_collection());
        assert!(Cardinality::ZeroOrMany.is_collection());
        assert!(!Cardinality::One.is_collection());
        assert!(Cardinality::One.requires_at_least_one());
        assert!(Cardinality::ZeroOrOne.limits_to_one());
    }

    #[test]
    fn invalid_default_is_ignored() {
        let schema = AttributeSchema::new("a1", "Size", AttributeDataType::Integer)
            .with_default(AttributeValue::String("big".into()));
        assert_eq!(schema.default_if_valid(), None);
    }

    #[test]
    fn default_outside_choices_is_ignored() {
        let schema = AttributeSchema::new("a1", "Size", AttributeDataType::String)
            .with_default(AttributeValue::String("huge".into()))
            .with_choices(vec![
                AttributeValue::String("small".into()),
                AttributeValue::String("big".into()),
            ]);
        assert_eq!(schema.default_if_valid(), None);
    }

    #[test]
    fn materialise_value_prefers_valid_explicit() {
        let schema = AttributeSchema::new("a1", "Name", AttributeDataType::String)
            .with_default(AttributeValue::String("d".into()));
        assert_eq!(
            schema.materialise_value(Some(AttributeValue::String("x".into()))),
            Some(AttributeValue::String("x".into()))
        );
        // An explicit value of the wrong type falls back to the default.
        assert_eq!(
            schema.materialise_value(Some(AttributeValue::Integer(3))),
            Some(AttributeValue::String("d".into()))
        );
        assert_eq!(
            schema.materialise_value(None),
            Some(AttributeValue::String("d".into()))
        );
    }

    #[test]
    fn validate_required_and_choices() {
        let schema = AttributeSchema::new("a1", "Env", AttributeDataType::String)
            .required()
            .with_choices(vec![
                AttributeValue::String("dev".into()),
                AttributeValue::String("prod".into()),
            ]);
        assert_eq!(schema.validate(None).len(), 1);
        assert!(schema.validate(Some(&AttributeValue::String("dev".into()))).is_empty());
        assert_eq!(
            schema.validate(Some(&AttributeValue::String("staging".into()))).len(),
            1
        );
    }

    #[test]
    fn auto_create_defaults_by_cardinality() {
        let one = ElementSchema::new("e1", "Api", Cardinality::One);
        let optional = ElementSchema::new("e2", "Docs", Cardinality::ZeroOrOne);
        let collection = ElementSchema::new("e3", "Routes", Cardinality::OneOrMany);
        assert!(one.should_auto_create());
        assert!(!optional.should_auto_create());
        assert!(!collection.should_auto_create());

        let forced = ElementSchema {
            auto_create: Some(true),
            ..optional
        };
        assert!(forced.should_auto_create());
    }

    #[test]
    fn pattern_graph_lookup() {
        let mut pattern = PatternSchema::new("p1", "Service");
        let mut api = ElementSchema::new("e1", "Api", Cardinality::One);
        api.attributes
            .push(AttributeSchema::new("a2", "Port", AttributeDataType::Integer));
        pattern
            .attributes
            .push(AttributeSchema::new("a1", "Name", AttributeDataType::String));
        pattern.elements.push(api);

        assert!(pattern.find_element("e1").is_some());
        assert!(pattern.find_element("missing").is_none());
        assert_eq!(pattern.find_attribute("a2").map(|a| a.name.as_str()), Some("Port"));
        assert_eq!(pattern.find_attribute("a1").map(|a| a.name.as_str()), Some("Name"));
    }
}
