//! A serializer that only checks that every number in a value is finite.
//!
//! `serde_json` turns NaN and infinities into `null`, so `try_value` runs
//! this pass first to reject them instead.

use serde::Serialize;
use serde::ser::{self, Serializer};

use crate::error::{ExpressionError, ExpressionResult};

/// Walk `value`, failing on the first non-finite float.
pub(crate) fn check_finite<T: Serialize + ?Sized>(value: &T) -> ExpressionResult<()> {
    value.serialize(FiniteCheck)
}

#[derive(Debug, Clone, Copy)]
struct FiniteCheck;

fn float(v: f64) -> ExpressionResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ExpressionError::invalid_parameter(format!(
            "unsupported value: non-finite number {v}"
        )))
    }
}

impl Serializer for FiniteCheck {
    type Ok = ();
    type Error = ExpressionError;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _: bool) -> ExpressionResult<()> {
        Ok(())
    }

    fn serialize_i8(self, _: i8) -> ExpressionResult<()> {
        Ok(())
    }

    fn serialize_i16(self, _: i16) -> ExpressionResult<()> {
        Ok(())
    }

    fn serialize_i32(self, _: i32) -> ExpressionResult<()> {
        Ok(())
    }

    fn serialize_i64(self, _: i64) -> ExpressionResult<()> {
        Ok(())
    }

    fn serialize_i128(self, _: i128) -> ExpressionResult<()> {
        Ok(())
    }

    fn serialize_u8(self, _: u8) -> ExpressionResult<()> {
        Ok(())
    }

    fn serialize_u16(self, _: u16) -> ExpressionResult<()> {
        Ok(())
    }

    fn serialize_u32(self, _: u32) -> ExpressionResult<()> {
        Ok(())
    }

    fn serialize_u64(self, _: u64) -> ExpressionResult<()> {
        Ok(())
    }

    fn serialize_u128(self, _: u128) -> ExpressionResult<()> {
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> ExpressionResult<()> {
        float(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> ExpressionResult<()> {
        float(v)
    }

    fn serialize_char(self, _: char) -> ExpressionResult<()> {
        Ok(())
    }

    fn serialize_str(self, _: &str) -> ExpressionResult<()> {
        Ok(())
    }

    fn serialize_bytes(self, _: &[u8]) -> ExpressionResult<()> {
        Ok(())
    }

    fn serialize_none(self) -> ExpressionResult<()> {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> ExpressionResult<()> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> ExpressionResult<()> {
        Ok(())
    }

    fn serialize_unit_struct(self, _: &'static str) -> ExpressionResult<()> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
    ) -> ExpressionResult<()> {
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        value: &T,
    ) -> ExpressionResult<()> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> ExpressionResult<()> {
        value.serialize(self)
    }

    fn serialize_seq(self, _: Option<usize>) -> ExpressionResult<Self> {
        Ok(self)
    }

    fn serialize_tuple(self, _: usize) -> ExpressionResult<Self> {
        Ok(self)
    }

    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> ExpressionResult<Self> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> ExpressionResult<Self> {
        Ok(self)
    }

    fn serialize_map(self, _: Option<usize>) -> ExpressionResult<Self> {
        Ok(self)
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> ExpressionResult<Self> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> ExpressionResult<Self> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteCheck {
    type Ok = ();
    type Error = ExpressionError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> ExpressionResult<()> {
        value.serialize(*self)
    }

    fn end(self) -> ExpressionResult<()> {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteCheck {
    type Ok = ();
    type Error = ExpressionError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> ExpressionResult<()> {
        value.serialize(*self)
    }

    fn end(self) -> ExpressionResult<()> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteCheck {
    type Ok = ();
    type Error = ExpressionError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> ExpressionResult<()> {
        value.serialize(*self)
    }

    fn end(self) -> ExpressionResult<()> {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteCheck {
    type Ok = ();
    type Error = ExpressionError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> ExpressionResult<()> {
        value.serialize(*self)
    }

    fn end(self) -> ExpressionResult<()> {
        Ok(())
    }
}

impl ser::SerializeMap for FiniteCheck {
    type Ok = ();
    type Error = ExpressionError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> ExpressionResult<()> {
        key.serialize(*self)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> ExpressionResult<()> {
        value.serialize(*self)
    }

    fn end(self) -> ExpressionResult<()> {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteCheck {
    type Ok = ();
    type Error = ExpressionError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _: &'static str,
        value: &T,
    ) -> ExpressionResult<()> {
        value.serialize(*self)
    }

    fn end(self) -> ExpressionResult<()> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteCheck {
    type Ok = ();
    type Error = ExpressionError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _: &'static str,
        value: &T,
    ) -> ExpressionResult<()> {
        value.serialize(*self)
    }

    fn end(self) -> ExpressionResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_should_accept_finite_numbers() {
        check_finite(&1.5_f64).unwrap();
        check_finite(&(1_u8, -2_i64, 0.25_f32)).unwrap();
        check_finite(&None::<f64>).unwrap();
    }

    #[test]
    fn test_should_reject_nested_non_finite_numbers() {
        assert!(check_finite(&f64::NAN).unwrap_err().is_invalid_parameter());
        assert!(check_finite(&vec![1.0, f64::INFINITY]).is_err());
        assert!(check_finite(&Some(f32::NEG_INFINITY)).is_err());

        let mut scores = HashMap::new();
        scores.insert("avg", f64::NAN);
        assert!(check_finite(&scores).is_err());
    }
}
