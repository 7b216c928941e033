//! Field values
//!
//! Dynamically typed values passed to and returned from the generic engine.
//! Typed operation wrappers convert to and from these.

use std::fmt;

use uuid::Uuid;

use crate::error::{ClcError, Result};
use crate::protocol::{Data, DistributedObjectInfo};

/// A single field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Byte(u8),
    Short(i16),
    Int(i32),
    Long(i64),
    Uuid(Option<Uuid>),
    String(String),
    NullableString(Option<String>),
    Data(Data),
    NullableData(Option<Data>),
    StringList(Vec<String>),
    DataList(Vec<Data>),
    LongList(Vec<i64>),
    DistributedObjects(Vec<DistributedObjectInfo>),
}

impl Value {
    /// Name of the value's kind, matching the layout kind names
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Uuid(_) => "uuid",
            Value::String(_) => "string",
            Value::NullableString(_) => "string?",
            Value::Data(_) => "data",
            Value::NullableData(_) => "data?",
            Value::StringList(_) => "list<string>",
            Value::DataList(_) => "list<data>",
            Value::LongList(_) => "list<long>",
            Value::DistributedObjects(_) => "list<object-info>",
        }
    }
}

fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str("]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Byte(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Uuid(Some(v)) => write!(f, "{}", v),
            Value::String(v) | Value::NullableString(Some(v)) => f.write_str(v),
            Value::Data(v) | Value::NullableData(Some(v)) => write!(f, "{}", v),
            Value::Uuid(None) | Value::NullableString(None) | Value::NullableData(None) => {
                f.write_str("null")
            }
            Value::StringList(items) => join(f, items),
            Value::DataList(items) => join(f, items),
            Value::LongList(items) => join(f, items),
            Value::DistributedObjects(items) => {
                let labels: Vec<String> = items
                    .iter()
                    .map(|o| format!("{}/{}", o.service_name, o.name))
                    .collect();
                join(f, &labels)
            }
        }
    }
}

/// Named values in layout order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    entries: Vec<(&'static str, Value)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &'static str, value: Value) {
        self.entries.push((name, value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        self.entries.iter().map(|(n, v)| (*n, v))
    }

    pub fn into_values(self) -> Vec<Value> {
        self.entries.into_iter().map(|(_, v)| v).collect()
    }

    /// Remove a field by name
    pub fn take(&mut self, name: &str) -> Result<Value> {
        let index = self
            .entries
            .iter()
            .position(|(n, _)| *n == name)
            .ok_or_else(|| ClcError::Protocol(format!("Missing field '{}'", name)))?;
        Ok(self.entries.remove(index).1)
    }

    pub fn take_bool(&mut self, name: &str) -> Result<bool> {
        match self.take(name)? {
            Value::Bool(v) => Ok(v),
            other => Err(wrong_kind(name, "bool", &other)),
        }
    }

    pub fn take_int(&mut self, name: &str) -> Result<i32> {
        match self.take(name)? {
            Value::Int(v) => Ok(v),
            other => Err(wrong_kind(name, "int", &other)),
        }
    }

    pub fn take_long(&mut self, name: &str) -> Result<i64> {
        match self.take(name)? {
            Value::Long(v) => Ok(v),
            other => Err(wrong_kind(name, "long", &other)),
        }
    }

    pub fn take_uuid(&mut self, name: &str) -> Result<Option<Uuid>> {
        match self.take(name)? {
            Value::Uuid(v) => Ok(v),
            other => Err(wrong_kind(name, "uuid", &other)),
        }
    }

    pub fn take_string(&mut self, name: &str) -> Result<String> {
        match self.take(name)? {
            Value::String(v) => Ok(v),
            other => Err(wrong_kind(name, "string", &other)),
        }
    }

    pub fn take_data(&mut self, name: &str) -> Result<Data> {
        match self.take(name)? {
            Value::Data(v) => Ok(v),
            other => Err(wrong_kind(name, "data", &other)),
        }
    }

    pub fn take_nullable_data(&mut self, name: &str) -> Result<Option<Data>> {
        match self.take(name)? {
            Value::NullableData(v) => Ok(v),
            other => Err(wrong_kind(name, "data?", &other)),
        }
    }

    pub fn take_data_list(&mut self, name: &str) -> Result<Vec<Data>> {
        match self.take(name)? {
            Value::DataList(v) => Ok(v),
            other => Err(wrong_kind(name, "list<data>", &other)),
        }
    }

    pub fn take_distributed_objects(&mut self, name: &str) -> Result<Vec<DistributedObjectInfo>> {
        match self.take(name)? {
            Value::DistributedObjects(v) => Ok(v),
            other => Err(wrong_kind(name, "list<object-info>", &other)),
        }
    }
}

fn wrong_kind(name: &str, expected: &str, found: &Value) -> ClcError {
    ClcError::Protocol(format!(
        "Field '{}': expected {}, found {}",
        name,
        expected,
        found.kind_name()
    ))
}
