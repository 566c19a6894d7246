//! Attribute types, attribute paths and diagnostics.
//!
//! These are the pieces of the host schema that the provider core touches:
//! the declared type of every attribute (used to type-check object and list
//! values), the path used to attach a diagnostic to an attribute, and the
//! diagnostics themselves.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The type of an attribute value.
///
/// This is a closed set: every schema leaf is one of the scalar types, and
/// every nested attribute is either a list of a single element type or an
/// object with a fixed set of typed attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// A string value.
    String,
    /// A 64-bit integer.
    Int64,
    /// A 64-bit floating point number.
    Float64,
    /// A boolean value.
    Bool,
    /// An ordered list of values of a single type.
    List(Box<AttributeType>),
    /// An object with a fixed set of attributes.
    Object(BTreeMap<String, AttributeType>),
}

impl AttributeType {
    /// Create a list type.
    pub fn list(element_type: AttributeType) -> Self {
        Self::List(Box::new(element_type))
    }

    /// Create an object type.
    pub fn object(attributes: BTreeMap<String, AttributeType>) -> Self {
        Self::Object(attributes)
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "types.StringType"),
            Self::Int64 => write!(f, "types.Int64Type"),
            Self::Float64 => write!(f, "types.Float64Type"),
            Self::Bool => write!(f, "types.BoolType"),
            Self::List(element) => write!(f, "types.ListType[{}]", element),
            Self::Object(attributes) => {
                write!(f, "types.ObjectType[")?;
                for (i, (name, attr_type)) in attributes.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{}\":{}", name, attr_type)?;
                }
                write!(f, "]")
            },
        }
    }
}

/// Build an object attribute-type map from `(name, type)` pairs.
pub fn attribute_types<const N: usize>(
    pairs: [(&str, AttributeType); N],
) -> BTreeMap<String, AttributeType> {
    pairs
        .into_iter()
        .map(|(name, attr_type)| (name.to_string(), attr_type))
        .collect()
}

/// One step of an [`AttributePath`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStep {
    /// A named attribute.
    Attribute(String),
    /// An element of a list.
    Index(usize),
}

/// The route identifying a leaf inside the schema tree.
///
/// Rendered dotted, with list indexes as their own segment: `ips.0.address`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributePath(Vec<PathStep>);

impl AttributePath {
    /// The empty path, addressing the whole resource.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// A path starting at a top-level attribute.
    pub fn root(name: impl Into<String>) -> Self {
        Self(vec![PathStep::Attribute(name.into())])
    }

    /// Extend the path with a nested attribute name.
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.0.push(PathStep::Attribute(name.into()));
        self
    }

    /// Extend the path with a list index.
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(PathStep::Index(index));
        self
    }

    /// The steps of this path.
    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    /// Whether this path addresses the whole resource.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            match step {
                PathStep::Attribute(name) => write!(f, "{}", name)?,
                PathStep::Index(index) => write!(f, "{}", index)?,
            }
        }
        Ok(())
    }
}

/// Whether a diagnostic fails the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// Fails the plan or apply.
    Error,
    /// Shown to the user, the run continues.
    Warning,
}

/// An attribute-scoped message for the host's diagnostics channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Error or warning.
    pub severity: DiagnosticSeverity,
    /// One-line summary, e.g. `Invalid Region`.
    pub summary: String,
    /// Full message; for wrapped errors the whole prefixed chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Attribute the message belongs to. `None` for provider-wide problems.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<AttributePath>,
}

impl Diagnostic {
    /// An error with only a summary.
    pub fn error(summary: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            summary: summary.into(),
            detail: None,
            attribute: None,
        }
    }

    /// A warning with only a summary.
    pub fn warning(summary: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            summary: summary.into(),
            detail: None,
            attribute: None,
        }
    }

    /// Set the detail.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Scope to `attribute`. An empty path leaves the diagnostic unscoped.
    pub fn with_attribute(mut self, attribute: AttributePath) -> Self {
        if !attribute.is_empty() {
            self.attribute = Some(attribute);
        }
        self
    }

    /// Whether this is an error diagnostic.
    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

/// An ordered collection of diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    /// Append an error diagnostic with a summary and detail.
    pub fn add_error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Diagnostic::error(summary).with_detail(detail));
    }

    /// Append an error diagnostic scoped to an attribute.
    pub fn add_attribute_error(
        &mut self,
        path: AttributePath,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) {
        self.push(
            Diagnostic::error(summary)
                .with_detail(detail)
                .with_attribute(path),
        );
    }

    /// Append every diagnostic of another collection.
    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    /// Whether any diagnostic is an error.
    pub fn has_error(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    /// The first error diagnostic, if any.
    pub fn first_error(&self) -> Option<&Diagnostic> {
        self.0.iter().find(|d| d.is_error())
    }

    /// Iterate over the diagnostics in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the collection into a vector.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Self(vec![diagnostic])
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
