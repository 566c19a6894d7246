//! Reusable adapter primitives between domain values and schema values.
//!
//! Conversions into object and list values report the *first* diagnostic they
//! run into as an [`AdapterError`] prefixed with the primitive's name, so a
//! failure deep inside a nested model still says where it happened.

use thiserror::Error;

use crate::domain::DomainError;
use crate::schema::Diagnostics;
use crate::types::{
    AttrValue, BoolValue, Int64Value, ListValue, ObjectModel, ObjectValue, StringValue,
};

/// A schema value could not be built from, or read into, the domain model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// Building or reading an object or list value produced a diagnostic.
    #[error("{prefix}: {summary} {detail}")]
    Diagnostic {
        /// Name of the failing adapter.
        prefix: String,
        /// Diagnostic summary.
        summary: String,
        /// Diagnostic detail.
        detail: String,
    },

    /// A nested adapter failed.
    #[error("{prefix}: {source}")]
    Nested {
        /// Name of the enclosing adapter.
        prefix: String,
        /// The nested failure.
        #[source]
        source: Box<AdapterError>,
    },

    /// A schema value violates a domain invariant.
    #[error("{prefix}: {field}: {source}")]
    Domain {
        /// Name of the failing adapter.
        prefix: String,
        /// Schema attribute holding the value.
        field: String,
        /// The violated invariant.
        #[source]
        source: DomainError,
    },
}

impl AdapterError {
    /// Turn the first error of `diagnostics` into an adapter error.
    pub fn from_diagnostics(prefix: impl Into<String>, diagnostics: &Diagnostics) -> Self {
        let (summary, detail) = match diagnostics.first_error() {
            Some(diagnostic) => (
                diagnostic.summary.clone(),
                diagnostic.detail.clone().unwrap_or_default(),
            ),
            None => ("Unknown Error".to_string(), String::new()),
        };
        Self::Diagnostic {
            prefix: prefix.into(),
            summary,
            detail,
        }
    }

    /// A domain invariant violation on `field`.
    pub fn domain(prefix: impl Into<String>, field: impl Into<String>, source: DomainError) -> Self {
        Self::Domain {
            prefix: prefix.into(),
            field: field.into(),
            source,
        }
    }

    /// A required attribute is null or unknown.
    pub fn missing(prefix: impl Into<String>, field: &str) -> Self {
        Self::Diagnostic {
            prefix: prefix.into(),
            summary: "Missing Required Value".to_string(),
            detail: format!("{field:?} must be known"),
        }
    }

    /// Wrap this error in the name of the enclosing adapter.
    pub fn within(self, prefix: impl Into<String>) -> Self {
        Self::Nested {
            prefix: prefix.into(),
            source: Box::new(self),
        }
    }

    /// The domain invariant underneath, if that is what failed.
    pub fn domain_error(&self) -> Option<&DomainError> {
        match self {
            Self::Domain { source, .. } => Some(source),
            Self::Nested { source, .. } => source.domain_error(),
            Self::Diagnostic { .. } => None,
        }
    }

    /// The schema attribute whose value broke an invariant.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Domain { field, .. } => Some(field),
            Self::Nested { source, .. } => source.field(),
            Self::Diagnostic { .. } => None,
        }
    }
}

/// `None` becomes null; anything else a known string.
pub fn adapt_nullable_scalar_to_string_value<T>(value: Option<&T>) -> StringValue
where
    T: ToString + ?Sized,
{
    match value {
        Some(value) => AttrValue::Known(value.to_string()),
        None => AttrValue::Null,
    }
}

/// Null and unknown both become `None`.
pub fn adapt_string_value_to_nullable(value: &StringValue) -> Option<String> {
    value.as_known().cloned()
}

/// Null and unknown both become `None`.
pub fn adapt_int64_value_to_nullable(value: &Int64Value) -> Option<i64> {
    value.as_known().copied()
}

/// Null and unknown both become `None`.
pub fn adapt_bool_value_to_nullable(value: &BoolValue) -> Option<bool> {
    value.as_known().copied()
}

/// Build the model of `entity` and store it in a known object value.
///
/// On failure the caller is left with no value; it stands in for the unknown
/// object of `M`'s shape.
pub fn adapt_domain_entity_to_object_value<E, M>(
    entity: &E,
    build: impl FnOnce(&E) -> Result<M, AdapterError>,
) -> Result<ObjectValue, AdapterError>
where
    M: ObjectModel,
{
    let prefix = "adapt_domain_entity_to_object_value";
    let model = build(entity).map_err(|e| e.within(prefix))?;
    ObjectValue::from_model(model).map_err(|d| AdapterError::from_diagnostics(prefix, &d))
}

/// Like [`adapt_domain_entity_to_object_value`], with `None` becoming a null
/// object of `M`'s shape.
pub fn adapt_nullable_domain_entity_to_object_value<E, M>(
    entity: Option<&E>,
    build: impl FnOnce(&E) -> Result<M, AdapterError>,
) -> Result<ObjectValue, AdapterError>
where
    M: ObjectModel,
{
    match entity {
        Some(entity) => adapt_domain_entity_to_object_value(entity, build)
            .map_err(|e| e.within("adapt_nullable_domain_entity_to_object_value")),
        None => Ok(ObjectValue::null(M::attribute_types())),
    }
}

/// Build the models of `entities`, in order, and store them in a known list.
/// An empty slice gives a known empty list.
pub fn adapt_entities_to_list_value<E, M>(
    entities: &[E],
    build: impl Fn(&E) -> Result<M, AdapterError>,
) -> Result<ListValue, AdapterError>
where
    M: ObjectModel,
{
    let prefix = "adapt_entities_to_list_value";
    let models = entities
        .iter()
        .map(&build)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.within(prefix))?;
    ListValue::from_models(models).map_err(|d| AdapterError::from_diagnostics(prefix, &d))
}

/// Read a known object into its model; null and unknown become `None`.
pub fn adapt_object_value_to_model<M: ObjectModel>(
    value: &ObjectValue,
) -> Result<Option<M>, AdapterError> {
    value
        .to_model::<M>()
        .map(AttrValue::into_known)
        .map_err(|d| AdapterError::from_diagnostics("adapt_object_value_to_model", &d))
}

/// Read a known list into its models; null and unknown become an empty list.
pub fn adapt_list_value_to_models<M: ObjectModel>(
    value: &ListValue,
) -> Result<Vec<M>, AdapterError> {
    value
        .to_models::<M>()
        .map(|models| models.into_known().unwrap_or_default())
        .map_err(|d| AdapterError::from_diagnostics("adapt_list_value_to_models", &d))
}

/// Read a list of strings; null and unknown become an empty list.
pub fn adapt_list_value_to_strings(value: &ListValue) -> Result<Vec<String>, AdapterError> {
    value
        .to_strings()
        .map(|strings| strings.into_known().unwrap_or_default())
        .map_err(|d| AdapterError::from_diagnostics("adapt_list_value_to_strings", &d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{attribute_types, AttributeType};
    use crate::types::{attr, Value};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[derive(Debug, Clone, PartialEq)]
    struct Label {
        text: String,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct LabelModel {
        text: StringValue,
    }

    impl ObjectModel for LabelModel {
        fn attribute_types() -> BTreeMap<String, AttributeType> {
            attribute_types([("text", AttributeType::String)])
        }

        fn into_attributes(self) -> BTreeMap<String, Value> {
            BTreeMap::from([("text".to_string(), Value::from(self.text))])
        }

        fn from_attributes(attributes: &BTreeMap<String, Value>) -> Result<Self, Diagnostics> {
            Ok(Self {
                text: attr::string(attributes, "text")?,
            })
        }
    }

    /// Declares `text` as an int64, which the model cannot satisfy.
    #[derive(Debug, Clone, PartialEq)]
    struct BrokenModel {
        text: StringValue,
    }

    impl ObjectModel for BrokenModel {
        fn attribute_types() -> BTreeMap<String, AttributeType> {
            attribute_types([("text", AttributeType::Int64)])
        }

        fn into_attributes(self) -> BTreeMap<String, Value> {
            BTreeMap::from([("text".to_string(), Value::from(self.text))])
        }

        fn from_attributes(attributes: &BTreeMap<String, Value>) -> Result<Self, Diagnostics> {
            Ok(Self {
                text: attr::string(attributes, "text")?,
            })
        }
    }

    fn build(label: &Label) -> Result<LabelModel, AdapterError> {
        Ok(LabelModel {
            text: StringValue::known(label.text.clone()),
        })
    }

    #[test]
    fn test_nullable_scalar() {
        assert_eq!(
            adapt_nullable_scalar_to_string_value::<str>(None),
            StringValue::Null
        );
        assert_eq!(
            adapt_nullable_scalar_to_string_value(Some("x")),
            StringValue::known("x")
        );
        assert_eq!(
            adapt_nullable_scalar_to_string_value(Some(&1.5)),
            StringValue::known("1.5")
        );
    }

    #[test]
    fn test_null_and_unknown_strings_become_none() {
        assert_eq!(adapt_string_value_to_nullable(&StringValue::Null), None);
        assert_eq!(adapt_string_value_to_nullable(&StringValue::Unknown), None);
        assert_eq!(
            adapt_string_value_to_nullable(&StringValue::known("r")),
            Some("r".to_string())
        );

        // unknown does not survive a round trip: it comes back as null
        let round_trip = adapt_nullable_scalar_to_string_value(
            adapt_string_value_to_nullable(&StringValue::Unknown).as_deref(),
        );
        assert_eq!(round_trip, StringValue::Null);
    }

    #[test]
    fn test_entity_to_object_value() {
        let object = adapt_domain_entity_to_object_value(
            &Label {
                text: "web".to_string(),
            },
            build,
        )
        .unwrap();
        assert!(object.is_known());
        assert_eq!(
            object.attribute("text"),
            Some(&Value::String(StringValue::known("web")))
        );
    }

    #[test]
    fn test_type_mismatch_reports_first_diagnostic() {
        let err = adapt_domain_entity_to_object_value(
            &Label {
                text: "web".to_string(),
            },
            |label| {
                Ok(BrokenModel {
                    text: StringValue::known(label.text.clone()),
                })
            },
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("adapt_domain_entity_to_object_value: Invalid Object Attribute Type"));
        assert!(message.contains("\"text\""));
    }

    #[test]
    fn test_builder_failure_is_wrapped() {
        let err = adapt_domain_entity_to_object_value(&Label { text: String::new() }, |_| {
            Err::<LabelModel, _>(AdapterError::domain(
                "adapt_label",
                "text",
                DomainError::InvalidSshKey,
            ))
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "adapt_domain_entity_to_object_value: adapt_label: text: {}",
                DomainError::InvalidSshKey
            )
        );
        assert_eq!(err.domain_error(), Some(&DomainError::InvalidSshKey));
    }

    #[test]
    fn test_nullable_entity() {
        let object = adapt_nullable_domain_entity_to_object_value::<Label, LabelModel>(None, build)
            .unwrap();
        assert!(object.is_null());
        assert_eq!(object.attribute_types(), &LabelModel::attribute_types());
    }

    #[test]
    fn test_entities_keep_order_and_emptiness() {
        let labels = vec![
            Label {
                text: "a".to_string(),
            },
            Label {
                text: "b".to_string(),
            },
        ];
        let list = adapt_entities_to_list_value(&labels, build).unwrap();
        let models: Vec<LabelModel> = adapt_list_value_to_models(&list).unwrap();
        assert_eq!(
            models.iter().map(|m| m.text.clone()).collect::<Vec<_>>(),
            vec![StringValue::known("a"), StringValue::known("b")]
        );

        let empty = adapt_entities_to_list_value::<Label, LabelModel>(&[], build).unwrap();
        assert!(empty.is_known());
        assert_eq!(empty.elements().map(<[Value]>::len), Some(0));
    }

    #[test]
    fn test_object_value_to_model() {
        let unknown = ObjectValue::unknown(LabelModel::attribute_types());
        assert_eq!(adapt_object_value_to_model::<LabelModel>(&unknown), Ok(None));

        let err = adapt_object_value_to_model::<BrokenModel>(&unknown).unwrap_err();
        assert!(err.to_string().contains("Value Conversion Error"));
    }

    #[test]
    fn test_string_lists() {
        let list = ListValue::from_strings(vec!["CENTRAL".to_string(), "LOCAL".to_string()]);
        assert_eq!(
            adapt_list_value_to_strings(&list).unwrap(),
            vec!["CENTRAL", "LOCAL"]
        );
        assert_eq!(
            adapt_list_value_to_strings(&ListValue::null(AttributeType::String)).unwrap(),
            Vec::<String>::new()
        );
    }
}
