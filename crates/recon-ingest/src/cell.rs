//! Serde access to one string cell.
//!
//! Cells are handed to serde as text. Only when the target asks for a
//! number is the cell rewritten from the configured culture to invariant
//! form, so dates and other text keep their separators.

use recon_model::Culture;
use serde::de::value::{Error as DeError, MapDeserializer};
use serde::de::{DeserializeOwned, Error as _, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;

/// Deserialize a `T` from `(field, cell)` pairs.
pub(crate) fn deserialize_row<'a, T, I>(cells: I, culture: &Culture) -> Result<T, DeError>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let pairs = cells
        .into_iter()
        .map(|(field, raw)| (field, CellDeserializer { raw, culture }));
    T::deserialize(MapDeserializer::new(pairs))
}

struct CellDeserializer<'a, 'c> {
    raw: &'a str,
    culture: &'c Culture,
}

impl CellDeserializer<'_, '_> {
    fn number_text(&self) -> String {
        self.culture
            .normalize_number(self.raw)
            .unwrap_or_else(|| self.raw.trim().to_string())
    }
}

macro_rules! deserialize_numbers {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
                let text = self.number_text();
                let value = text.parse::<$ty>().map_err(|err| {
                    DeError::custom(format!("invalid number {:?}: {err}", self.raw))
                })?;
                visitor.$visit(value)
            }
        )*
    };
}

impl<'de> serde::Deserializer<'de> for CellDeserializer<'_, '_> {
    type Error = DeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_str(self.raw)
    }

    deserialize_numbers! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        match self.raw.trim() {
            "true" | "TRUE" | "True" => visitor.visit_bool(true),
            "false" | "FALSE" | "False" => visitor.visit_bool(false),
            other => Err(DeError::custom(format!("invalid bool {other:?}"))),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        if self.raw.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeError> {
        visitor.visit_enum(self.raw.into_deserializer())
    }

    forward_to_deserialize_any! {
        i128 u128 char str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

impl<'de> IntoDeserializer<'de, DeError> for CellDeserializer<'_, '_> {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}
