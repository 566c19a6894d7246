//! Tri-state schema values.
//!
//! Every leaf the host orchestrator hands to the provider, or receives back, is
//! exactly one of *known*, *null* (explicitly absent) or *unknown* (not yet
//! resolved during planning). Scalars use [`AttrValue`]; nested attributes use
//! the dynamically typed [`ObjectValue`] and [`ListValue`], which carry their
//! declared [`AttributeType`] so that they can be null or unknown while still
//! having a shape.

use std::collections::BTreeMap;

use crate::schema::{AttributeType, Diagnostic, Diagnostics};

/// A schema leaf: known, null or unknown.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue<T> {
    /// A resolved value.
    Known(T),
    /// An explicit absence.
    Null,
    /// A value that is not resolved yet.
    Unknown,
}

/// A tri-state string leaf.
pub type StringValue = AttrValue<String>;
/// A tri-state int64 leaf.
pub type Int64Value = AttrValue<i64>;
/// A tri-state float64 leaf.
pub type Float64Value = AttrValue<f64>;
/// A tri-state bool leaf.
pub type BoolValue = AttrValue<bool>;

impl<T> AttrValue<T> {
    /// A known value.
    pub fn known(value: impl Into<T>) -> Self {
        Self::Known(value.into())
    }

    /// `None` becomes null.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Known(value),
            None => Self::Null,
        }
    }

    /// `None` becomes unknown, for computed values that are not available yet.
    pub fn or_unknown(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Known(value),
            None => Self::Unknown,
        }
    }

    /// Whether the value is known.
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Whether the value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether the value is unknown.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Borrow the known value.
    pub fn as_known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            _ => None,
        }
    }

    /// Take the known value; null and unknown both become `None`.
    pub fn into_known(self) -> Option<T> {
        match self {
            Self::Known(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the inner value, keeping the tag.
    pub fn as_ref(&self) -> AttrValue<&T> {
        match self {
            Self::Known(value) => AttrValue::Known(value),
            Self::Null => AttrValue::Null,
            Self::Unknown => AttrValue::Unknown,
        }
    }

    /// Transform the known value, keeping null and unknown as they are.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AttrValue<U> {
        match self {
            Self::Known(value) => AttrValue::Known(f(value)),
            Self::Null => AttrValue::Null,
            Self::Unknown => AttrValue::Unknown,
        }
    }

    /// Fallible [`AttrValue::map`].
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<AttrValue<U>, E> {
        match self {
            Self::Known(value) => f(value).map(AttrValue::Known),
            Self::Null => Ok(AttrValue::Null),
            Self::Unknown => Ok(AttrValue::Unknown),
        }
    }

    /// Apply `f` to the known value only.
    pub fn map_known<U>(&self, f: impl FnOnce(&T) -> U) -> Option<U> {
        self.as_known().map(f)
    }
}

impl<T> Default for AttrValue<T> {
    fn default() -> Self {
        Self::Null
    }
}

impl<T> From<Option<T>> for AttrValue<T> {
    fn from(value: Option<T>) -> Self {
        Self::from_option(value)
    }
}

/// A dynamically typed schema value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string leaf.
    String(StringValue),
    /// An int64 leaf.
    Int64(Int64Value),
    /// A float64 leaf.
    Float64(Float64Value),
    /// A bool leaf.
    Bool(BoolValue),
    /// A list.
    List(ListValue),
    /// An object.
    Object(ObjectValue),
}

impl Value {
    /// The type this value carries.
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            Self::String(_) => AttributeType::String,
            Self::Int64(_) => AttributeType::Int64,
            Self::Float64(_) => AttributeType::Float64,
            Self::Bool(_) => AttributeType::Bool,
            Self::List(list) => AttributeType::list(list.element_type.clone()),
            Self::Object(object) => AttributeType::object(object.attribute_types.clone()),
        }
    }

    /// Whether this value is null.
    pub fn is_null(&self) -> bool {
        match self {
            Self::String(v) => v.is_null(),
            Self::Int64(v) => v.is_null(),
            Self::Float64(v) => v.is_null(),
            Self::Bool(v) => v.is_null(),
            Self::List(v) => v.is_null(),
            Self::Object(v) => v.is_null(),
        }
    }

    /// Whether this value is unknown.
    pub fn is_unknown(&self) -> bool {
        match self {
            Self::String(v) => v.is_unknown(),
            Self::Int64(v) => v.is_unknown(),
            Self::Float64(v) => v.is_unknown(),
            Self::Bool(v) => v.is_unknown(),
            Self::List(v) => v.is_unknown(),
            Self::Object(v) => v.is_unknown(),
        }
    }
}

impl From<StringValue> for Value {
    fn from(value: StringValue) -> Self {
        Self::String(value)
    }
}

impl From<Int64Value> for Value {
    fn from(value: Int64Value) -> Self {
        Self::Int64(value)
    }
}

impl From<Float64Value> for Value {
    fn from(value: Float64Value) -> Self {
        Self::Float64(value)
    }
}

impl From<BoolValue> for Value {
    fn from(value: BoolValue) -> Self {
        Self::Bool(value)
    }
}

impl From<ListValue> for Value {
    fn from(value: ListValue) -> Self {
        Self::List(value)
    }
}

impl From<ObjectValue> for Value {
    fn from(value: ObjectValue) -> Self {
        Self::Object(value)
    }
}

/// An object value with declared attribute types.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
    attribute_types: BTreeMap<String, AttributeType>,
    state: AttrValue<BTreeMap<String, Value>>,
}

impl ObjectValue {
    /// Build a known object, checking the attributes against the declared types.
    ///
    /// Every declared attribute must be present with a value of the declared
    /// type, and no undeclared attribute may be present.
    pub fn new(
        attribute_types: BTreeMap<String, AttributeType>,
        attributes: BTreeMap<String, Value>,
    ) -> Result<Self, Diagnostics> {
        let mut diagnostics = Diagnostics::new();

        for (name, expected) in &attribute_types {
            match attributes.get(name) {
                None => diagnostics.push(
                    Diagnostic::error("Missing Object Attribute Value").with_detail(format!(
                        "While creating a Object value, a missing attribute value was detected. \
                         A Object must contain values for all attributes, even if null or unknown. \
                         Object Attribute Name ({:?}) Expected Type: {}",
                        name, expected
                    )),
                ),
                Some(value) => {
                    let actual = value.attribute_type();
                    if &actual != expected {
                        diagnostics.push(
                            Diagnostic::error("Invalid Object Attribute Type").with_detail(
                                format!(
                                    "While creating a Object value, an invalid attribute value \
                                     was detected. Object Attribute Name ({:?}) Expected Type: \
                                     {} Given Type: {}",
                                    name, expected, actual
                                ),
                            ),
                        );
                    }
                },
            }
        }

        for name in attributes.keys() {
            if !attribute_types.contains_key(name) {
                diagnostics.push(Diagnostic::error("Extra Object Attribute Value").with_detail(
                    format!(
                        "While creating a Object value, an extra attribute value was detected. \
                         Extra Object Attribute Name: {:?}",
                        name
                    ),
                ));
            }
        }

        if diagnostics.has_error() {
            return Err(diagnostics);
        }

        Ok(Self {
            attribute_types,
            state: AttrValue::Known(attributes),
        })
    }

    /// A null object of the given shape.
    pub fn null(attribute_types: BTreeMap<String, AttributeType>) -> Self {
        Self {
            attribute_types,
            state: AttrValue::Null,
        }
    }

    /// An unknown object of the given shape.
    pub fn unknown(attribute_types: BTreeMap<String, AttributeType>) -> Self {
        Self {
            attribute_types,
            state: AttrValue::Unknown,
        }
    }

    /// Build a known object from a typed model.
    pub fn from_model<M: ObjectModel>(model: M) -> Result<Self, Diagnostics> {
        Self::new(M::attribute_types(), model.into_attributes())
    }

    /// Read the object back into a typed model, keeping the tri-state tag.
    pub fn to_model<M: ObjectModel>(&self) -> Result<AttrValue<M>, Diagnostics> {
        if self.attribute_types != M::attribute_types() {
            return Err(Diagnostic::error("Value Conversion Error")
                .with_detail(format!(
                    "An unexpected error was encountered trying to convert the object value. \
                     Expected type: {} Actual type: {}",
                    AttributeType::object(M::attribute_types()),
                    AttributeType::object(self.attribute_types.clone())
                ))
                .into());
        }
        self.state.as_ref().try_map(M::from_attributes)
    }

    /// The declared attribute types.
    pub fn attribute_types(&self) -> &BTreeMap<String, AttributeType> {
        &self.attribute_types
    }

    /// The attributes of a known object.
    pub fn attributes(&self) -> Option<&BTreeMap<String, Value>> {
        self.state.as_known()
    }

    /// One attribute of a known object.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes().and_then(|attributes| attributes.get(name))
    }

    /// Whether the object is known.
    pub fn is_known(&self) -> bool {
        self.state.is_known()
    }

    /// Whether the object is null.
    pub fn is_null(&self) -> bool {
        self.state.is_null()
    }

    /// Whether the object is unknown.
    pub fn is_unknown(&self) -> bool {
        self.state.is_unknown()
    }
}

/// A list value with a declared element type.
#[derive(Debug, Clone, PartialEq)]
pub struct ListValue {
    element_type: AttributeType,
    state: AttrValue<Vec<Value>>,
}

impl ListValue {
    /// Build a known list, checking every element against the element type.
    pub fn new(element_type: AttributeType, elements: Vec<Value>) -> Result<Self, Diagnostics> {
        let mut diagnostics = Diagnostics::new();
        for (index, element) in elements.iter().enumerate() {
            let actual = element.attribute_type();
            if actual != element_type {
                diagnostics.push(Diagnostic::error("Invalid List Element Type").with_detail(
                    format!(
                        "While creating a List value, an invalid element was detected. \
                         A List must use the single, given element type. List Element Type: {} \
                         List Index ({}) Element Type: {}",
                        element_type, index, actual
                    ),
                ));
            }
        }

        if diagnostics.has_error() {
            return Err(diagnostics);
        }

        Ok(Self {
            element_type,
            state: AttrValue::Known(elements),
        })
    }

    /// A null list.
    pub fn null(element_type: AttributeType) -> Self {
        Self {
            element_type,
            state: AttrValue::Null,
        }
    }

    /// An unknown list.
    pub fn unknown(element_type: AttributeType) -> Self {
        Self {
            element_type,
            state: AttrValue::Unknown,
        }
    }

    /// Build a known list of objects from typed models.
    pub fn from_models<M: ObjectModel>(models: Vec<M>) -> Result<Self, Diagnostics> {
        let mut elements = Vec::with_capacity(models.len());
        for model in models {
            elements.push(Value::Object(ObjectValue::from_model(model)?));
        }
        Self::new(AttributeType::object(M::attribute_types()), elements)
    }

    /// Read a list of objects back into typed models.
    ///
    /// Null or unknown elements inside a known list are rejected: a list of
    /// nested models always carries concrete entries.
    pub fn to_models<M: ObjectModel>(&self) -> Result<AttrValue<Vec<M>>, Diagnostics> {
        self.state.as_ref().try_map(|elements| -> Result<Vec<M>, Diagnostics> {
            let mut models = Vec::with_capacity(elements.len());
            for (index, element) in elements.iter().enumerate() {
                let object = match element {
                    Value::Object(object) => object,
                    other => {
                        return Err(Diagnostic::error("Value Conversion Error")
                            .with_detail(format!(
                                "List Index ({}) expected an object, got {}",
                                index,
                                other.attribute_type()
                            ))
                            .into())
                    },
                };
                match object.to_model::<M>()? {
                    AttrValue::Known(model) => models.push(model),
                    _ => {
                        return Err(Diagnostic::error("Value Conversion Error")
                            .with_detail(format!(
                                "List Index ({}) is null or unknown and cannot be converted",
                                index
                            ))
                            .into())
                    },
                }
            }
            Ok(models)
        })
    }

    /// Build a known list of string leaves.
    pub fn from_strings(values: impl IntoIterator<Item = String>) -> Self {
        Self {
            element_type: AttributeType::String,
            state: AttrValue::Known(
                values
                    .into_iter()
                    .map(|v| Value::String(AttrValue::Known(v)))
                    .collect(),
            ),
        }
    }

    /// Read a list of known strings back, keeping the tri-state tag.
    pub fn to_strings(&self) -> Result<AttrValue<Vec<String>>, Diagnostics> {
        self.state.as_ref().try_map(|elements| {
            elements
                .iter()
                .enumerate()
                .map(|(index, element)| match element {
                    Value::String(AttrValue::Known(value)) => Ok(value.clone()),
                    other => Err(Diagnostic::error("Value Conversion Error")
                        .with_detail(format!(
                            "List Index ({}) expected a known string, got {}",
                            index,
                            other.attribute_type()
                        ))
                        .into()),
                })
                .collect::<Result<Vec<_>, Diagnostics>>()
        })
    }

    /// The declared element type.
    pub fn element_type(&self) -> &AttributeType {
        &self.element_type
    }

    /// The elements of a known list.
    pub fn elements(&self) -> Option<&[Value]> {
        self.state.as_known().map(Vec::as_slice)
    }

    /// Whether the list is known.
    pub fn is_known(&self) -> bool {
        self.state.is_known()
    }

    /// Whether the list is null.
    pub fn is_null(&self) -> bool {
        self.state.is_null()
    }

    /// Whether the list is unknown.
    pub fn is_unknown(&self) -> bool {
        self.state.is_unknown()
    }
}

/// A typed model that converts to and from an [`ObjectValue`].
pub trait ObjectModel: Sized {
    /// The declared shape of the object.
    fn attribute_types() -> BTreeMap<String, AttributeType>;

    /// The model's attributes, one entry per declared attribute.
    fn into_attributes(self) -> BTreeMap<String, Value>;

    /// Rebuild the model from a known object's attributes.
    fn from_attributes(attributes: &BTreeMap<String, Value>) -> Result<Self, Diagnostics>;
}

/// A leaf or nested value stored under one attribute name.
pub trait AttributeValue: Sized {
    /// Erase the static type.
    fn into_value(self) -> Value;

    /// Read the attribute `name`, failing on a missing or mistyped entry.
    fn read(attributes: &BTreeMap<String, Value>, name: &str) -> Result<Self, Diagnostics>;
}

macro_rules! attribute_value {
    ($($ty:ty => $read:path),+ $(,)?) => {
        $(
            impl AttributeValue for $ty {
                fn into_value(self) -> Value {
                    Value::from(self)
                }

                fn read(
                    attributes: &BTreeMap<String, Value>,
                    name: &str,
                ) -> Result<Self, Diagnostics> {
                    $read(attributes, name)
                }
            }
        )+
    };
}

attribute_value! {
    StringValue => attr::string,
    Int64Value => attr::int64,
    Float64Value => attr::float64,
    BoolValue => attr::bool,
    ListValue => attr::list,
    ObjectValue => attr::object,
}

/// Typed accessors used by [`ObjectModel::from_attributes`] implementations.
pub mod attr {
    use super::*;

    fn missing(name: &str) -> Diagnostics {
        Diagnostic::error("Value Conversion Error")
            .with_detail(format!("Object is missing attribute {:?}", name))
            .into()
    }

    fn mismatch(name: &str, expected: &str, actual: &Value) -> Diagnostics {
        Diagnostic::error("Value Conversion Error")
            .with_detail(format!(
                "Attribute {:?} expected {}, got {}",
                name,
                expected,
                actual.attribute_type()
            ))
            .into()
    }

    /// Read a string attribute.
    pub fn string(attributes: &BTreeMap<String, Value>, name: &str) -> Result<StringValue, Diagnostics> {
        match attributes.get(name) {
            Some(Value::String(value)) => Ok(value.clone()),
            Some(other) => Err(mismatch(name, "types.StringType", other)),
            None => Err(missing(name)),
        }
    }

    /// Read an int64 attribute.
    pub fn int64(attributes: &BTreeMap<String, Value>, name: &str) -> Result<Int64Value, Diagnostics> {
        match attributes.get(name) {
            Some(Value::Int64(value)) => Ok(value.clone()),
            Some(other) => Err(mismatch(name, "types.Int64Type", other)),
            None => Err(missing(name)),
        }
    }

    /// Read a float64 attribute.
    pub fn float64(
        attributes: &BTreeMap<String, Value>,
        name: &str,
    ) -> Result<Float64Value, Diagnostics> {
        match attributes.get(name) {
            Some(Value::Float64(value)) => Ok(value.clone()),
            Some(other) => Err(mismatch(name, "types.Float64Type", other)),
            None => Err(missing(name)),
        }
    }

    /// Read a bool attribute.
    pub fn bool(attributes: &BTreeMap<String, Value>, name: &str) -> Result<BoolValue, Diagnostics> {
        match attributes.get(name) {
            Some(Value::Bool(value)) => Ok(value.clone()),
            Some(other) => Err(mismatch(name, "types.BoolType", other)),
            None => Err(missing(name)),
        }
    }

    /// Read a list attribute.
    pub fn list(attributes: &BTreeMap<String, Value>, name: &str) -> Result<ListValue, Diagnostics> {
        match attributes.get(name) {
            Some(Value::List(value)) => Ok(value.clone()),
            Some(other) => Err(mismatch(name, "types.ListType", other)),
            None => Err(missing(name)),
        }
    }

    /// Read an object attribute.
    pub fn object(
        attributes: &BTreeMap<String, Value>,
        name: &str,
    ) -> Result<ObjectValue, Diagnostics> {
        match attributes.get(name) {
            Some(Value::Object(value)) => Ok(value.clone()),
            Some(other) => Err(mismatch(name, "types.ObjectType", other)),
            None => Err(missing(name)),
        }
    }
}
