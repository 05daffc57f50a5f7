//! serde deserializers over store data.
//!
//! `SectionData` presents one section as a map of option name to
//! `ValueData`; `ValueData` parses its string into whatever shape the
//! target type requests. Collection-shaped requests (sequences, maps,
//! nested records) parse the string as JSON and re-wrap each element,
//! so `ports = [8089, 8090]` materializes into a `Vec<u16>`.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::value::{MapDeserializer, SeqDeserializer, StringDeserializer};
use serde::de::{self, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;

use super::ConvertError;

/// One section's options, ready for deserialization.
pub(crate) struct SectionData {
    pairs: Vec<(String, String)>,
    booleans: Arc<HashMap<String, bool>>,
}

impl SectionData {
    pub(crate) fn new(pairs: Vec<(String, String)>, booleans: Arc<HashMap<String, bool>>) -> Self {
        Self { pairs, booleans }
    }
}

impl<'de> de::Deserializer<'de> for SectionData {
    type Error = ConvertError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        let booleans = self.booleans;
        let entries = self.pairs.into_iter().map(move |(key, value)| {
            (
                key,
                ValueData {
                    value,
                    booleans: booleans.clone(),
                },
            )
        });
        MapDeserializer::new(entries).deserialize_any(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct newtype_struct seq tuple tuple_struct
        map struct enum identifier ignored_any
    }
}

impl<'de> IntoDeserializer<'de, ConvertError> for SectionData {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

/// A single option value; parses on demand per the requested type.
pub(crate) struct ValueData {
    value: String,
    booleans: Arc<HashMap<String, bool>>,
}

impl ValueData {
    fn rewrap(&self, value: serde_json::Value) -> ValueData {
        let value = match value {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        ValueData {
            value,
            booleans: self.booleans.clone(),
        }
    }

    fn parse_json(&self) -> Result<serde_json::Value, ConvertError> {
        serde_json::from_str(&self.value).map_err(|e| ConvertError::Json {
            value: self.value.clone(),
            message: e.to_string(),
        })
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $ty:ty => $visit:ident,)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, ConvertError>
            where
                V: Visitor<'de>,
            {
                let parsed: $ty = self.value.parse().map_err(|_| ConvertError::Cast {
                    value: self.value.clone(),
                    target: stringify!($ty),
                })?;
                visitor.$visit(parsed)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for ValueData {
    type Error = ConvertError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_string(self.value)
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        match self.booleans.get(&self.value.to_lowercase()) {
            Some(&state) => visitor.visit_bool(state),
            None => Err(ConvertError::Cast {
                value: self.value,
                target: "bool",
            }),
        }
    }

    deserialize_parsed! {
        deserialize_i8 => i8 => visit_i8,
        deserialize_i16 => i16 => visit_i16,
        deserialize_i32 => i32 => visit_i32,
        deserialize_i64 => i64 => visit_i64,
        deserialize_u8 => u8 => visit_u8,
        deserialize_u16 => u16 => visit_u16,
        deserialize_u32 => u32 => visit_u32,
        deserialize_u64 => u64 => visit_u64,
        deserialize_f32 => f32 => visit_f32,
        deserialize_f64 => f64 => visit_f64,
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        let mut chars = self.value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(ConvertError::Cast {
                value: self.value,
                target: "char",
            }),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_string(self.value)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_string(self.value)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_byte_buf(self.value.into_bytes())
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_byte_buf(self.value.into_bytes())
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, _visitor: V) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        Err(ConvertError::Cast {
            value: self.value,
            target: "unit",
        })
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        match self.parse_json()? {
            serde_json::Value::Array(items) => {
                let elements: Vec<ValueData> =
                    items.into_iter().map(|item| self.rewrap(item)).collect();
                SeqDeserializer::new(elements.into_iter()).deserialize_seq(visitor)
            }
            other => Err(ConvertError::Cast {
                value: other.to_string(),
                target: "sequence",
            }),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        match self.parse_json()? {
            serde_json::Value::Object(entries) => {
                let pairs: Vec<(String, ValueData)> = entries
                    .into_iter()
                    .map(|(key, value)| {
                        let wrapped = self.rewrap(value);
                        (key, wrapped)
                    })
                    .collect();
                MapDeserializer::new(pairs.into_iter()).deserialize_map(visitor)
            }
            other => Err(ConvertError::Cast {
                value: other.to_string(),
                target: "map",
            }),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        let variant: StringDeserializer<ConvertError> = self.value.into_deserializer();
        visitor.visit_enum(variant)
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_string(self.value)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_i128<V>(self, visitor: V) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        let parsed: i128 = self.value.parse().map_err(|_| ConvertError::Cast {
            value: self.value.clone(),
            target: "i128",
        })?;
        visitor.visit_i128(parsed)
    }

    fn deserialize_u128<V>(self, visitor: V) -> Result<V::Value, ConvertError>
    where
        V: Visitor<'de>,
    {
        let parsed: u128 = self.value.parse().map_err(|_| ConvertError::Cast {
            value: self.value.clone(),
            target: "u128",
        })?;
        visitor.visit_u128(parsed)
    }
}

impl<'de> IntoDeserializer<'de, ConvertError> for ValueData {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}
