//! Cycle detection for a single inspection.
//!
//! Two separate mechanisms live here:
//!
//! - A [`Fingerprinter`] reduces a value to a [`Fingerprint`]. Scalars and
//!   structurally hashed objects fingerprint by content; records and other
//!   objects by identity; raw containers by content. Containers met again
//!   while they are still being fingerprinted yield
//!   [`Fingerprint::Recursive`] instead of looping.
//! - [`VisitedSet`] records the fingerprints an inspection has already
//!   expanded. It is created per call and dropped with it.
//!
//! Keeping them apart matters: the fingerprinting stack only guards its own
//! walk and is unwound as containers finish, so two equal siblings never look
//! recursive to each other.
//!
//! The walk uses an explicit work stack, so nesting depth costs heap and not
//! call stack. A fingerprinter remembers every container it has finished,
//! keyed by address, and holds a handle to everything it fingerprinted. A
//! sub-value shared along many paths is therefore walked once, and no address
//! it has seen can be reused by a different value while it lives.
//!
//! ## Examples
//!
//! ```rust
//! use context_help::{Value, VisitedSet};
//!
//! let mut visited = VisitedSet::new();
//! let fp = visited.fingerprint(&Value::from("Alice")).unwrap();
//! assert!(!visited.seen(&fp));
//! visited.mark(fp.clone());
//! assert!(visited.seen(&fp));
//! ```

use crate::{Hashing, Number, Value};
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The content or identity key of a value.
///
/// Fingerprints are totally ordered so that unordered children can be
/// enumerated deterministically. They are flat: a container's contents are
/// folded into a digest, so comparing or hashing one never walks the value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Fingerprint {
    Scalar(ScalarKey),
    /// Address of a record or identity-hashed object.
    Identity(usize),
    /// A host object's own hash, qualified by its type name.
    Structural(String, u64),
    /// A container, by kind, child count and a digest of its children.
    ///
    /// Map children are digested with their keys in key order; set members
    /// are sorted and deduplicated first, so `len` is the distinct count.
    Composite {
        kind: ContainerKind,
        len: usize,
        digest: u64,
    },
    /// A container met again while it was still being fingerprinted.
    Recursive(usize),
}

/// Hashable form of a scalar value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarKey {
    Null,
    Bool(bool),
    Int(i64),
    /// IEEE bit pattern; finite floats only.
    Float(u64),
    Infinity,
    NegativeInfinity,
    NaN,
    Str(String),
    Date(DateTime<Utc>),
    BigInt(BigInt),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContainerKind {
    List,
    Tuple,
    /// A host object walked through its `elements` view.
    Sequence,
    Mapping,
    Set,
}

/// A value for which no fingerprint exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unhashable {
    pub type_name: String,
}

impl fmt::Display for Unhashable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unable to fingerprint value of type `{}`", self.type_name)
    }
}

impl std::error::Error for Unhashable {}

/// Computes the fingerprint of a value with a fresh [`Fingerprinter`].
///
/// Fails only when the value, or something nested in it, is a host object
/// declared [`Hashing::Unhashable`] without a container shape to fall back
/// on. Fingerprints from separate calls compare by content, except for
/// identities and recursion sentinels, which are addresses.
///
/// # Examples
///
/// ```rust
/// use context_help::{fingerprint, Value};
///
/// let a = Value::map(vec![("x", Value::from(1)), ("y", Value::from(2))]);
/// let b = Value::map(vec![("y", Value::from(2)), ("x", Value::from(1))]);
/// assert_eq!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
///
/// // A map that refers to itself still fingerprints.
/// let m = Value::map(Vec::<(String, Value)>::new());
/// m.insert("self", m.clone());
/// assert!(fingerprint(&m).is_ok());
/// ```
pub fn fingerprint(value: &Value) -> Result<Fingerprint, Unhashable> {
    Fingerprinter::new().fingerprint(value)
}

enum Task {
    Visit(Value),
    Finish {
        value: Value,
        kind: ContainerKind,
        keys: Vec<String>,
        count: usize,
    },
}

/// Fingerprints values, remembering results by address.
///
/// Results are cached for the fingerprinter's lifetime, so keep one per
/// inspection: a container mutated after it was fingerprinted keeps its old
/// fingerprint here.
#[derive(Debug, Default)]
pub struct Fingerprinter {
    known: HashMap<usize, (Value, Result<Fingerprint, Unhashable>)>,
    active: HashSet<usize>,
}

impl Fingerprinter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprints `value`, reusing results for anything seen before.
    ///
    /// # Errors
    ///
    /// Returns [`Unhashable`] under the same conditions as [`fingerprint`].
    pub fn fingerprint(&mut self, value: &Value) -> Result<Fingerprint, Unhashable> {
        let mut tasks = vec![Task::Visit(value.clone())];
        let mut results: Vec<Result<Fingerprint, Unhashable>> = Vec::new();

        while let Some(task) = tasks.pop() {
            match task {
                Task::Visit(item) => {
                    let id = item.identity();
                    if let Some((_, known)) = id.and_then(|id| self.known.get(&id)) {
                        results.push(known.clone());
                        continue;
                    }
                    if let Some(result) = direct(&item) {
                        if let Some(id) = id {
                            self.known.insert(id, (item, result.clone()));
                        }
                        results.push(result);
                        continue;
                    }
                    let id = id.unwrap_or_default();
                    if !self.active.insert(id) {
                        results.push(Ok(Fingerprint::Recursive(id)));
                        continue;
                    }
                    let (kind, keys, items) = contents(&item);
                    tasks.push(Task::Finish {
                        value: item,
                        kind,
                        keys,
                        count: items.len(),
                    });
                    tasks.extend(items.into_iter().rev().map(Task::Visit));
                }
                Task::Finish {
                    value: item,
                    kind,
                    keys,
                    count,
                } => {
                    let parts = results.split_off(results.len() - count);
                    let result = parts
                        .into_iter()
                        .collect::<Result<Vec<_>, _>>()
                        .map(|parts| combine(kind, &keys, parts));
                    let id = item.identity().unwrap_or_default();
                    self.active.remove(&id);
                    self.known.insert(id, (item, result.clone()));
                    results.push(result);
                }
            }
        }

        // The root always leaves exactly one result behind.
        results.pop().unwrap_or_else(|| {
            Err(Unhashable {
                type_name: value.type_name(),
            })
        })
    }

    /// Number of distinct addresses fingerprinted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.known.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

/// The fingerprint of a value that has no children to walk, or `None` for a
/// container.
fn direct(value: &Value) -> Option<Result<Fingerprint, Unhashable>> {
    let scalar = match value {
        Value::Null => ScalarKey::Null,
        Value::Bool(b) => ScalarKey::Bool(*b),
        Value::Number(n) => number_key(n),
        Value::String(s) => ScalarKey::Str(s.clone()),
        Value::Date(dt) => ScalarKey::Date(*dt),
        Value::BigInt(bi) => ScalarKey::BigInt(bi.clone()),
        Value::Record(_) => {
            return value.identity().map(|id| Ok(Fingerprint::Identity(id)));
        }
        Value::Object(object) => {
            return match object.hashing() {
                Hashing::Identity => value.identity().map(|id| Ok(Fingerprint::Identity(id))),
                Hashing::Structural(hash) => Some(Ok(Fingerprint::Structural(
                    object.type_name().to_string(),
                    hash,
                ))),
                Hashing::Unhashable => {
                    let shape = object.shape();
                    if shape.mapping || shape.set || shape.sequence {
                        None
                    } else {
                        Some(Err(Unhashable {
                            type_name: object.type_name().to_string(),
                        }))
                    }
                }
            };
        }
        Value::List(_) | Value::Tuple(_) | Value::Map(_) | Value::Set(_) => return None,
    };
    Some(Ok(Fingerprint::Scalar(scalar)))
}

fn number_key(n: &Number) -> ScalarKey {
    match n {
        Number::Integer(i) => ScalarKey::Int(*i),
        Number::Float(f) if f.is_nan() => ScalarKey::NaN,
        Number::Float(f) if f.is_infinite() && *f > 0.0 => ScalarKey::Infinity,
        Number::Float(f) if f.is_infinite() => ScalarKey::NegativeInfinity,
        Number::Float(f) => ScalarKey::Float(f.to_bits()),
        Number::Infinity => ScalarKey::Infinity,
        Number::NegativeInfinity => ScalarKey::NegativeInfinity,
        Number::NaN => ScalarKey::NaN,
    }
}

/// A container's kind, its keys (mappings only) and its children in the
/// order they are digested.
fn contents(value: &Value) -> (ContainerKind, Vec<String>, Vec<Value>) {
    match value {
        Value::List(items) => (ContainerKind::List, Vec::new(), items.borrow().clone()),
        Value::Tuple(items) => (ContainerKind::Tuple, Vec::new(), items.to_vec()),
        Value::Set(items) => (ContainerKind::Set, Vec::new(), items.borrow().clone()),
        Value::Map(map) => keyed(ContainerKind::Mapping, map.borrow().sorted_entries()),
        Value::Object(object) => {
            let shape = object.shape();
            if shape.mapping {
                let mut pairs = object.entries();
                pairs.sort_by(|a, b| a.0.cmp(&b.0));
                keyed(ContainerKind::Mapping, pairs)
            } else if shape.set {
                (ContainerKind::Set, Vec::new(), object.elements())
            } else {
                (ContainerKind::Sequence, Vec::new(), object.elements())
            }
        }
        _ => (ContainerKind::List, Vec::new(), Vec::new()),
    }
}

fn keyed(
    kind: ContainerKind,
    pairs: Vec<(String, Value)>,
) -> (ContainerKind, Vec<String>, Vec<Value>) {
    let (keys, items): (Vec<String>, Vec<Value>) = pairs.into_iter().unzip();
    (kind, keys, items)
}

fn combine(kind: ContainerKind, keys: &[String], mut parts: Vec<Fingerprint>) -> Fingerprint {
    if kind == ContainerKind::Set {
        parts.sort();
        parts.dedup();
    }
    let mut hasher = DefaultHasher::new();
    kind.hash(&mut hasher);
    keys.hash(&mut hasher);
    parts.hash(&mut hasher);
    Fingerprint::Composite {
        kind,
        len: parts.len(),
        digest: hasher.finish(),
    }
}

/// Fingerprints already expanded during one inspection.
///
/// It owns the inspection's [`Fingerprinter`], so every value it has
/// fingerprinted stays alive, and keeps its address, until the set is dropped.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: HashSet<Fingerprint>,
    fingerprints: Fingerprinter,
}

impl VisitedSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprints `value` with this inspection's fingerprinter. Does not
    /// mark it.
    ///
    /// # Errors
    ///
    /// Returns [`Unhashable`] under the same conditions as [`fingerprint`].
    pub fn fingerprint(&mut self, value: &Value) -> Result<Fingerprint, Unhashable> {
        self.fingerprints.fingerprint(value)
    }

    /// Returns `true` if the fingerprint was marked earlier in this inspection.
    #[must_use]
    pub fn seen(&self, fp: &Fingerprint) -> bool {
        self.seen.contains(fp)
    }

    pub fn mark(&mut self, fp: Fingerprint) {
        self.seen.insert(fp);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
