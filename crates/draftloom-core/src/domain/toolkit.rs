//! Toolkit definitions and versioning.
//!
//! A [`ToolkitDefinition`] is an immutable, versioned snapshot of a pattern
//! schema plus the packaged code-template contents, created at publish time.
//! It is never mutated once a draft references it — a draft upgrade swaps in
//! a different `ToolkitDefinition` wholesale.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::schema::PatternSchema;

// ============================================================================
// ToolkitVersion
// ============================================================================

/// Semantic toolkit version.
///
/// Stored structurally (not as an opaque string) because the migration
/// policy keys off the major component: a major bump marks the upgrade as
/// breaking and requires `force`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToolkitVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl ToolkitVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub fn major(&self) -> u64 {
        self.major
    }
}

impl FromStr for ToolkitVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidVersion { raw: s.to_string() };
        let mut parts = s.split('.');
        let mut next = || -> Result<u64, DomainError> {
            parts
                .next()
                .ok_or_else(invalid)?
                .parse::<u64>()
                .map_err(|_| invalid())
        };
        let version = Self::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

impl TryFrom<String> for ToolkitVersion {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ToolkitVersion> for String {
    fn from(v: ToolkitVersion) -> Self {
        v.to_string()
    }
}

impl fmt::Display for ToolkitVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

// ============================================================================
// ToolkitDefinition
// ============================================================================

/// An immutable, versioned package of a pattern schema.
///
/// Owns the schema graph that every `DraftItemSchema` reference resolves
/// against, the packaged code-template file contents, and the minimum
/// runtime version the toolkit was built for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolkitDefinition {
    pub id: String,
    pub version: ToolkitVersion,
    /// Minimum runtime the toolkit is compatible with.
    pub runtime_version: ToolkitVersion,
    pub pattern: PatternSchema,
    /// Code-template contents packaged at publish time, keyed by template id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub code_templates: BTreeMap<String, String>,
}

impl ToolkitDefinition {
    pub fn new(id: impl Into<String>, version: ToolkitVersion, pattern: PatternSchema) -> Self {
        Self {
            id: id.into(),
            version,
            runtime_version: ToolkitVersion::new(0, 1, 0),
            pattern,
            code_templates: BTreeMap::new(),
        }
    }

    /// The toolkit is named after its pattern.
    pub fn name(&self) -> &str {
        &self.pattern.name
    }

    pub fn with_code_template(
        mut self,
        template_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.code_templates.insert(template_id.into(), content.into());
        self
    }

    pub fn code_template_content(&self, template_id: &str) -> Option<&str> {
        self.code_templates.get(template_id).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_parses() {
        let v: ToolkitVersion = "1.2.3".parse().unwrap();
        assert_eq!(v, ToolkitVersion::new(1, 2, 3));
        assert_eq!(v.to_string(), "1.2.3");
    }

    #[test]
    fn version_rejects_garbage() {
        assert!("1.2".parse::<ToolkitVersion>().is_err());
        assert!("1.2.3.4".parse::<ToolkitVersion>().is_err());
        assert!("a.b.c".parse::<ToolkitVersion>().is_err());
    }

    #[test]
    fn version_orders_by_components() {
        let a: ToolkitVersion = "0.9.0".parse().unwrap();
        let b: ToolkitVersion = "1.0.0".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn toolkit_is_named_after_pattern() {
        let toolkit = ToolkitDefinition::new(
            "tk1",
            ToolkitVersion::new(0, 1, 0),
            PatternSchema::new("p1", "WebService"),
        );
        assert_eq!(toolkit.name(), "WebService");
    }

    #[test]
    fn code_template_lookup() {
        let toolkit = ToolkitDefinition::new(
            "tk1",
            ToolkitVersion::new(0, 1, 0),
            PatternSchema::new("p1", "WebService"),
        )
        .with_code_template("ct1", "hello {{Name}}");
        assert_eq!(toolkit.code_template_content("ct1"), Some("hello {{Name}}"));
        assert_eq!(toolkit.code_template_content("missing"), None);
    }
}
