//! Schema models and their adapters.
//!
//! [`resource`] models keep nested entities as [`crate::types::ObjectValue`]
//! and [`crate::types::ListValue`] so that every leaf can stay known, null or
//! unknown across plan and apply. [`data_source`] models are read-only and
//! nest plain structs.

/// Declare a model struct whose fields map one-to-one onto the attributes of
/// an object value.
macro_rules! object_model {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                pub $field:ident: $ty:ty => ($attr:literal, $attr_type:expr)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )+
        }

        impl $crate::types::ObjectModel for $name {
            fn attribute_types(
            ) -> std::collections::BTreeMap<String, $crate::schema::AttributeType> {
                std::collections::BTreeMap::from([
                    $(($attr.to_string(), $attr_type),)+
                ])
            }

            fn into_attributes(self) -> std::collections::BTreeMap<String, $crate::types::Value> {
                std::collections::BTreeMap::from([
                    $((
                        $attr.to_string(),
                        $crate::types::AttributeValue::into_value(self.$field),
                    ),)+
                ])
            }

            fn from_attributes(
                attributes: &std::collections::BTreeMap<String, $crate::types::Value>,
            ) -> Result<Self, $crate::schema::Diagnostics> {
                Ok(Self {
                    $($field: <$ty as $crate::types::AttributeValue>::read(attributes, $attr)?,)+
                })
            }
        }
    };
}

pub mod adapt;
#[allow(missing_docs)]
pub mod data_source;
pub mod resource;

use crate::schema::AttributeType;
use crate::types::ObjectModel;

pub use adapt::AdapterError;

/// The object type of model `M`.
pub fn object_type<M: ObjectModel>() -> AttributeType {
    AttributeType::object(M::attribute_types())
}

/// The type of a list of `M` objects.
pub fn list_type<M: ObjectModel>() -> AttributeType {
    AttributeType::list(object_type::<M>())
}

/// The type of a list of strings.
pub fn string_list_type() -> AttributeType {
    AttributeType::list(AttributeType::String)
}
