//! Hashable projection of index values.

use std::sync::Arc;

use smallvec::SmallVec;

use super::net::addr_bytes;
use super::{ContainerError, Value};

/// One component of a table key.
#[derive(Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
pub enum KeyAtom {
    Bool(bool),
    Int(i64),
    Unsigned(u64),
    /// Bit pattern of a normalized double.
    Double(u64),
    Bytes(Arc<[u8]>),
    Addr([u8; 16]),
    Subnet([u8; 16], u8),
    Pattern(Arc<str>),
    /// Records, lists and vectors; absent slots are `None`.
    Composite(Vec<Option<KeyAtom>>),
}

impl KeyAtom {
    pub fn from_value(value: &Value) -> Result<Self, ContainerError> {
        Ok(match value {
            Value::Bool(b) => KeyAtom::Bool(*b),
            Value::Int(i) | Value::Enum(_, i) => KeyAtom::Int(*i),
            Value::Count(c) | Value::Counter(c) => KeyAtom::Unsigned(*c),
            Value::Port(p) => KeyAtom::Unsigned(p.internal()),
            Value::Double(d) | Value::Time(d) | Value::Interval(d) => {
                // -0.0 and 0.0 must collide
                let d = if *d == 0.0 { 0.0 } else { *d };
                KeyAtom::Double(d.to_bits())
            }
            Value::Str(s) => KeyAtom::Bytes(s.clone()),
            Value::Addr(a) => KeyAtom::Addr(addr_bytes(*a)),
            Value::Subnet(s) => KeyAtom::Subnet(addr_bytes(s.prefix()), s.width()),
            Value::Pattern(p) => KeyAtom::Pattern(Arc::from(p.text())),
            Value::List(vals) => KeyAtom::Composite(
                vals.iter()
                    .map(|v| KeyAtom::from_value(v).map(Some))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Record(r) => KeyAtom::Composite(composite(r.slots())?),
            Value::Vector(v) => KeyAtom::Composite(composite(v.slots())?),
            Value::Table(t) => {
                let mut keys: Vec<_> = t
                    .keys()
                    .into_iter()
                    .map(|k| Some(KeyAtom::Composite(k.into_atoms())))
                    .collect();
                keys.sort();
                KeyAtom::Composite(keys)
            }
            Value::Void | Value::Func(_) | Value::Type(_) => {
                return Err(ContainerError::Unhashable(value.ty().to_string()))
            }
        })
    }
}

fn composite(slots: Vec<Option<Value>>) -> Result<Vec<Option<KeyAtom>>, ContainerError> {
    slots
        .iter()
        .map(|s| s.as_ref().map(KeyAtom::from_value).transpose())
        .collect()
}

/// Key of one table entry: one atom per index position.
#[derive(Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
pub struct HashKey(SmallVec<[KeyAtom; 2]>);

impl HashKey {
    pub fn from_values(index: &[Value]) -> Result<Self, ContainerError> {
        index
            .iter()
            .map(KeyAtom::from_value)
            .collect::<Result<SmallVec<_>, _>>()
            .map(HashKey)
    }

    pub fn atoms(&self) -> &[KeyAtom] {
        &self.0
    }

    fn into_atoms(self) -> Vec<Option<KeyAtom>> {
        self.0.into_iter().map(Some).collect()
    }
}
