//! Conversion of `Serialize` types into [`Value`]s.
//!
//! This lets an application put its own typed data into a [`Context`](crate::Context)
//! without hand-building values:
//!
//! - structs become [`Record`]s named after the struct, fields in declaration order
//! - maps become maps; scalar keys are stringified
//! - sequences become lists, tuples and tuple structs become tuples
//! - unit variants become strings; other enum variants become records named
//!   `Enum::Variant`
//! - integers too large for `i64` become big integers
//!
//! ```rust
//! use context_help::{to_value, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Order { id: u32, items: Vec<&'static str> }
//!
//! let value = to_value(&Order { id: 7, items: vec!["pen"] }).unwrap();
//! assert_eq!(value.type_name(), "Order");
//! assert_eq!(value.len(), Some(2));
//! ```

use crate::{Error, Number, Record, Result, Value, ValueMap};
use num_bigint::BigInt;
use serde::{ser, Serialize};

/// Serializes any `Serialize` type into a [`Value`].
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for map keys that are containers, and
/// any error raised by the type's own `Serialize` implementation.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

/// The serializer behind [`to_value`].
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
    tuple: bool,
}

pub struct SerializeVariant {
    name: String,
    vec: Vec<Value>,
}

pub struct SerializeMap {
    map: ValueMap,
    current_key: Option<String>,
}

pub struct SerializeRecord {
    record: Record,
}

fn variant_name(name: &str, variant: &str) -> String {
    format!("{}::{}", name, variant)
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeRecord;
    type SerializeStructVariant = SerializeRecord;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v)))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(match i64::try_from(v) {
            Ok(i) => Value::Number(Number::Integer(i)),
            Err(_) => Value::BigInt(BigInt::from(v)),
        })
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        Ok(match i64::try_from(v) {
            Ok(i) => Value::Number(Number::Integer(i)),
            Err(_) => Value::BigInt(BigInt::from(v)),
        })
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Number(Number::from(v)))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::list(
            v.iter().map(|&b| Value::Number(Number::Integer(i64::from(b)))),
        ))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let mut record = Record::new(variant_name(name, variant));
        record.insert("0", to_value(value)?);
        Ok(Value::record(record))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec {
            vec: Vec::with_capacity(len.unwrap_or(0)),
            tuple: false,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec {
            vec: Vec::with_capacity(len),
            tuple: true,
        })
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        self.serialize_tuple(len)
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVariant> {
        Ok(SerializeVariant {
            name: variant_name(name, variant),
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap {
            map: ValueMap::with_capacity(len.unwrap_or(0)),
            current_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<SerializeRecord> {
        Ok(SerializeRecord {
            record: Record::new(name),
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeRecord> {
        Ok(SerializeRecord {
            record: Record::new(variant_name(name, variant)),
        })
    }
}

impl SerializeVec {
    fn finish(self) -> Value {
        if self.tuple {
            Value::tuple(self.vec)
        } else {
            Value::list(self.vec)
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut record = Record::new(self.name);
        for (i, value) in self.vec.into_iter().enumerate() {
            record.insert(i.to_string(), value);
        }
        Ok(Value::record(record))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = to_value(key)?;
        if key.is_container() {
            return Err(Error::unsupported_type(&format!(
                "{} as map key",
                key.type_name()
            )));
        }
        self.current_key = Some(match key {
            Value::String(s) => s,
            other => other.to_string(),
        });
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::from(self.map))
    }
}

impl ser::SerializeStruct for SerializeRecord {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.record.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::record(self.record))
    }
}

impl ser::SerializeStructVariant for SerializeRecord {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.record.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::record(self.record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Address {
        city: String,
        zip: u32,
    }

    #[derive(Serialize)]
    enum Event {
        Started,
        Moved(i32, i32),
        Renamed { from: String, to: String },
    }

    #[test]
    fn test_struct_becomes_record_in_field_order() {
        let value = to_value(&Address {
            city: "Oslo".to_string(),
            zip: 150,
        })
        .unwrap();
        match &value {
            Value::Record(record) => {
                let record = record.borrow();
                assert_eq!(record.type_name, "Address");
                let names: Vec<_> = record.fields.keys().cloned().collect();
                assert_eq!(names, vec!["city", "zip"]);
            }
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn test_enum_variants() {
        assert_eq!(to_value(&Event::Started).unwrap().as_str(), Some("Started"));

        let moved = to_value(&Event::Moved(1, 2)).unwrap();
        assert_eq!(moved.type_name(), "Event::Moved");
        assert_eq!(moved.len(), Some(2));

        let renamed = to_value(&Event::Renamed {
            from: "a".to_string(),
            to: "b".to_string(),
        })
        .unwrap();
        assert_eq!(renamed.type_name(), "Event::Renamed");
    }

    #[test]
    fn test_tuple_and_seq() {
        assert_eq!(to_value(&(1, "a")).unwrap().type_name(), "tuple");
        assert_eq!(to_value(&vec![1, 2, 3]).unwrap().type_name(), "list");
    }

    #[test]
    fn test_integer_keys_are_stringified() {
        let mut scores = BTreeMap::new();
        scores.insert(3, "c");
        let value = to_value(&scores).unwrap();
        match value {
            Value::Map(map) => assert!(map.borrow().contains_key("3")),
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn test_container_keys_rejected() {
        let mut weird = BTreeMap::new();
        weird.insert(vec![1], 1);
        assert!(matches!(
            to_value(&weird),
            Err(Error::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_large_integers_become_bigint() {
        assert_eq!(to_value(&u128::MAX).unwrap().type_name(), "bigint");
        assert_eq!(to_value(&-5i128).unwrap().as_i64(), Some(-5));
    }
}
