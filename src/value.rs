//! Dynamic value representation for inspected contexts.
//!
//! This module provides the [`Value`] enum, the runtime value graph a context
//! is made of. Containers share their storage behind `Rc<RefCell<_>>`, so a
//! value can be reachable from several places and may even contain itself.
//!
//! ## Core Types
//!
//! - [`Value`]: scalars, shared containers, records and host objects
//! - [`Number`]: numeric values including special values (Infinity, -Infinity, NaN)
//! - [`Record`]: a named object with declared fields (a form, a view model)
//! - [`Object`]: the trait host types implement to take part in inspection
//!
//! ## Building a Cycle
//!
//! ```rust
//! use context_help::Value;
//!
//! let map = Value::map(Vec::<(String, Value)>::new());
//! map.insert("self", map.clone());
//! assert_eq!(map.len(), Some(1));
//! ```
//!
//! ## Type Checking
//!
//! ```rust
//! use context_help::Value;
//!
//! let value = Value::from(42);
//! assert!(value.is_number());
//! assert!(!value.is_string());
//! assert_eq!(value.type_name(), "int");
//! ```

use crate::guard::Fingerprinter;
use crate::ValueMap;
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer};
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared, interior-mutable storage used by container values.
pub type Shared<T> = Rc<RefCell<T>>;

/// A dynamically-typed value reachable from a context.
///
/// Cloning a container clones the handle, not the contents: both clones see
/// the same storage and the same identity.
///
/// # Examples
///
/// ```rust
/// use context_help::{Value, Number};
///
/// let null = Value::Null;
/// let num = Value::Number(Number::Integer(42));
/// let tags = Value::list(vec![Value::from("a"), Value::from("b")]);
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert_eq!(tags.len(), Some(2));
/// ```
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Date(DateTime<Utc>),
    BigInt(BigInt),
    List(Shared<Vec<Value>>),
    Tuple(Rc<[Value]>),
    Map(Shared<ValueMap>),
    Set(Shared<Vec<Value>>),
    Record(Shared<Record>),
    Object(Rc<dyn Object>),
}

/// A numeric value that can be an integer, float, or special value.
///
/// # Examples
///
/// ```rust
/// use context_help::Number;
///
/// let integer = Number::Integer(42);
/// let float = Number::Float(3.5);
///
/// assert!(integer.is_integer());
/// assert_eq!(integer.as_i64(), Some(42));
/// assert_eq!(float.as_f64(), 3.5);
/// assert!(Number::NaN.is_special());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
    Infinity,
    NegativeInfinity,
    NaN,
}

impl Number {
    /// Returns `true` if this is an integer value.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Returns `true` if this is a special value (Infinity, -Infinity, or NaN).
    #[inline]
    #[must_use]
    pub const fn is_special(&self) -> bool {
        matches!(
            self,
            Number::Infinity | Number::NegativeInfinity | Number::NaN
        )
    }

    /// Converts this number to an `i64` if it is whole and in range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use context_help::Number;
    ///
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// assert_eq!(Number::Infinity.as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Converts this number to an `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
            Number::Infinity => f64::INFINITY,
            Number::NegativeInfinity => f64::NEG_INFINITY,
            Number::NaN => f64::NAN,
        }
    }

    /// Short type name used in report descriptions.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Number::Integer(_) => "int",
            _ => "float",
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
            Number::Infinity => write!(f, "Infinity"),
            Number::NegativeInfinity => write!(f, "-Infinity"),
            Number::NaN => write!(f, "NaN"),
        }
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            Number::NaN
        } else if value == f64::INFINITY {
            Number::Infinity
        } else if value == f64::NEG_INFINITY {
            Number::NegativeInfinity
        } else {
            Number::Float(value)
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

/// A named object with declared, ordered fields.
///
/// Records are identified by identity: two records with equal fields are
/// still two different objects.
///
/// # Examples
///
/// ```rust
/// use context_help::{Record, Value};
///
/// let mut form = Record::new("SignupForm");
/// form.insert("email", Value::from("a@example.com"));
/// assert_eq!(form.fields.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub type_name: String,
    pub fields: ValueMap,
}

impl Record {
    /// Creates a record without fields.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Record {
            type_name: type_name.into(),
            fields: ValueMap::new(),
        }
    }

    /// Declares (or replaces) a field, keeping declaration order.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(name.into(), value)
    }
}

/// How a host object takes part in fingerprinting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Hashing {
    /// The object is "the same" only as itself.
    #[default]
    Identity,
    /// The object carries its own content hash.
    Structural(u64),
    /// The object has no natural hash. Container-shaped objects are then
    /// fingerprinted from their contents; anything else cannot be fingerprinted.
    Unhashable,
}

/// The capabilities a host object declares.
///
/// An object may declare several; the classifier picks one by priority.
///
/// # Examples
///
/// ```rust
/// use context_help::Shape;
///
/// let shape = Shape::new().sequence().mapping();
/// assert!(shape.sequence && shape.mapping);
/// assert!(!Shape::new().scalar);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Shape {
    pub mapping: bool,
    pub set: bool,
    pub sequence: bool,
    pub record: bool,
    pub scalar: bool,
}

impl Shape {
    /// An opaque shape: nothing declared.
    #[must_use]
    pub const fn new() -> Self {
        Shape {
            mapping: false,
            set: false,
            sequence: false,
            record: false,
            scalar: false,
        }
    }

    #[must_use]
    pub const fn mapping(mut self) -> Self {
        self.mapping = true;
        self
    }

    #[must_use]
    pub const fn set(mut self) -> Self {
        self.set = true;
        self
    }

    #[must_use]
    pub const fn sequence(mut self) -> Self {
        self.sequence = true;
        self
    }

    #[must_use]
    pub const fn record(mut self) -> Self {
        self.record = true;
        self
    }

    #[must_use]
    pub const fn scalar(mut self) -> Self {
        self.scalar = true;
        self
    }
}

/// A host value that is not one of the built-in variants.
///
/// Only [`type_name`](Object::type_name), [`repr`](Object::repr) and
/// [`as_any`](Object::as_any) are required. An object that declares a
/// container [`Shape`] should also implement the matching view
/// (`entries` for mappings, `elements` for sets and sequences, `fields` for
/// records). Views are only read; inspection never mutates an object.
///
/// # Examples
///
/// ```rust
/// use context_help::{Object, Value};
/// use std::any::Any;
///
/// struct Request { path: String }
///
/// impl Object for Request {
///     fn type_name(&self) -> &str { "HttpRequest" }
///     fn repr(&self) -> String { format!("<HttpRequest {}>", self.path) }
///     fn as_any(&self) -> &dyn Any { self }
/// }
///
/// let value = Value::object(Request { path: "/".into() });
/// assert_eq!(value.type_name(), "HttpRequest");
/// ```
pub trait Object: Any {
    /// Name shown in the type column.
    fn type_name(&self) -> &str;

    /// Printable representation used as the fallback summary.
    fn repr(&self) -> String;

    fn as_any(&self) -> &dyn Any;

    fn hashing(&self) -> Hashing {
        Hashing::Identity
    }

    fn shape(&self) -> Shape {
        Shape::new()
    }

    /// Declared element count, if cheaper than building a view.
    fn size(&self) -> Option<usize> {
        None
    }

    fn entries(&self) -> Vec<(String, Value)> {
        Vec::new()
    }

    fn elements(&self) -> Vec<Value> {
        Vec::new()
    }

    fn fields(&self) -> Vec<(String, Value)> {
        Vec::new()
    }
}

impl Value {
    /// Creates a shared list.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    /// Creates an immutable tuple.
    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(items.into_iter().collect::<Vec<_>>().into())
    }

    /// Creates a shared map from key-value pairs.
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(Rc::new(RefCell::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )))
    }

    /// Creates a shared set, dropping elements whose content repeats an earlier one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use context_help::Value;
    ///
    /// let set = Value::set(vec![Value::from(1), Value::from(1), Value::from(2)]);
    /// assert_eq!(set.len(), Some(2));
    /// ```
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        let mut unique: Vec<Value> = Vec::new();
        for item in items {
            if !unique.iter().any(|existing| *existing == item) {
                unique.push(item);
            }
        }
        Value::Set(Rc::new(RefCell::new(unique)))
    }

    /// Wraps a record in shared storage.
    pub fn record(record: Record) -> Self {
        Value::Record(Rc::new(RefCell::new(record)))
    }

    /// Wraps a host object.
    pub fn object<T: Object>(object: T) -> Self {
        Value::Object(Rc::new(object))
    }

    /// Appends to a list or adds to a set. Returns `false` for other values.
    pub fn push(&self, item: Value) -> bool {
        match self {
            Value::List(items) | Value::Set(items) => {
                items.borrow_mut().push(item);
                true
            }
            _ => false,
        }
    }

    /// Inserts into a map or sets a record field. Returns `false` for other values.
    pub fn insert(&self, key: impl Into<String>, item: Value) -> bool {
        match self {
            Value::Map(map) => {
                map.borrow_mut().insert(key.into(), item);
                true
            }
            Value::Record(record) => {
                record.borrow_mut().insert(key, item);
                true
            }
            _ => false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` for lists, tuples, maps and sets.
    #[inline]
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(
            self,
            Value::List(_) | Value::Tuple(_) | Value::Map(_) | Value::Set(_)
        )
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Downcasts a host object to its concrete type.
    #[must_use]
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        match self {
            Value::Object(object) => object.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Number of elements, entries or fields; `None` for scalars and objects
    /// that do not declare a size.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::List(items) | Value::Set(items) => Some(items.borrow().len()),
            Value::Tuple(items) => Some(items.len()),
            Value::Map(map) => Some(map.borrow().len()),
            Value::Record(record) => Some(record.borrow().fields.len()),
            Value::Object(object) => object.size(),
            _ => None,
        }
    }

    /// Type name shown in report descriptions.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Number(n) => n.type_name().to_string(),
            Value::String(_) => "str".to_string(),
            Value::Date(_) => "datetime".to_string(),
            Value::BigInt(_) => "bigint".to_string(),
            Value::List(_) => "list".to_string(),
            Value::Tuple(_) => "tuple".to_string(),
            Value::Map(_) => "map".to_string(),
            Value::Set(_) => "set".to_string(),
            Value::Record(record) => record.borrow().type_name.clone(),
            Value::Object(object) => object.type_name().to_string(),
        }
    }

    /// Address of the shared storage, for values that have one.
    #[must_use]
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::List(items) | Value::Set(items) => Some(Rc::as_ptr(items) as *const () as usize),
            Value::Tuple(items) => Some(Rc::as_ptr(items) as *const () as usize),
            Value::Map(map) => Some(Rc::as_ptr(map) as *const () as usize),
            Value::Record(record) => Some(Rc::as_ptr(record) as *const () as usize),
            Value::Object(object) => Some(Rc::as_ptr(object) as *const () as usize),
            _ => None,
        }
    }

    /// Returns `true` if both values are the same shared object.
    #[must_use]
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self.identity(), other.identity()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// Shallow: containers print their kind and size, never their contents.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Date(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::BigInt(bi) => write!(f, "{}", bi),
            Value::Object(object) => write!(f, "{}", object.repr()),
            Value::Record(record) => write!(f, "<{}>", record.borrow().type_name),
            Value::List(_) | Value::Tuple(_) | Value::Map(_) | Value::Set(_) => {
                write!(f, "<{} of {}>", self.type_name(), self.len().unwrap_or(0))
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({:?})", b),
            Value::Number(n) => write!(f, "Number({:?})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Date(dt) => write!(f, "Date({:?})", dt),
            Value::BigInt(bi) => write!(f, "BigInt({:?})", bi),
            _ => write!(
                f,
                "{}@{:#x}(len={})",
                self.type_name(),
                self.identity().unwrap_or(0),
                self.len().map_or_else(|| "?".to_string(), |n| n.to_string())
            ),
        }
    }
}

/// Content equality: values are equal when their fingerprints are.
///
/// Records and identity-hashed objects are only equal to themselves. Values
/// that cannot be fingerprinted fall back to identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        let mut fingerprints = Fingerprinter::new();
        match (fingerprints.fingerprint(self), fingerprints.fingerprint(other)) {
            (Ok(a), Ok(b)) => a == b,
            _ => self.ptr_eq(other),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any self-describing value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::from(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::list(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = ValueMap::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    values.insert(key, value);
                }
                Ok(Value::Map(Rc::new(RefCell::new(values))))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        value
            .as_i64()
            .ok_or_else(|| crate::Error::custom(format!("expected integer, found {:?}", value)))
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(crate::Error::custom(format!(
                "expected string, found {:?}",
                value
            ))),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::Integer(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Value::Number(Number::Integer(i)),
            Err(_) => Value::BigInt(BigInt::from(value)),
        }
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::from(value as u64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::list(value)
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Value::Map(Rc::new(RefCell::new(value)))
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::record(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
