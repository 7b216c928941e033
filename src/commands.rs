//! Command registry
//!
//! Maps CLI verbs such as `multi-map:lock` to operation descriptors and turns
//! `KEY=VALUE` arguments into engine values according to each field's kind.
//!
//! ## Argument Syntax
//! - bool: `true` / `false`
//! - integers: decimal
//! - uuid: hyphenated form, or `null` for an absent identifier
//! - string: taken verbatim
//! - data: a string, serialized with the string serializer
//! - nullable kinds: `null` for absent
//! - lists: comma-separated items

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::codec::ops::{client, map, multimap, topic};
use crate::codec::{FixedKind, OperationDescriptor, Value, VarKind};
use crate::config::split_key_value;
use crate::error::{ClcError, Result};
use crate::protocol::Data;

/// Literal accepted for absent optional values
const NULL_LITERAL: &str = "null";

/// Verb-to-operation registry
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, &'static OperationDescriptor>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }

    /// Create a registry with every built-in verb
    pub fn new() -> Self {
        let mut registry = Self::empty();
        let builtins: [(&'static str, &'static OperationDescriptor); 18] = [
            ("client:ping", &client::PING),
            ("object:create", &client::CREATE_PROXY),
            ("object:destroy", &client::DESTROY_PROXY),
            ("object:list", &client::GET_DISTRIBUTED_OBJECTS),
            ("map:put", &map::PUT),
            ("map:get", &map::GET),
            ("map:remove", &map::REMOVE),
            ("map:contains-key", &map::CONTAINS_KEY),
            ("map:size", &map::SIZE),
            ("map:clear", &map::CLEAR),
            ("multi-map:put", &multimap::PUT),
            ("multi-map:get", &multimap::GET),
            ("multi-map:size", &multimap::SIZE),
            ("multi-map:lock", &multimap::LOCK),
            ("multi-map:unlock", &multimap::UNLOCK),
            ("topic:publish", &topic::PUBLISH),
            ("topic:add-listener", &topic::ADD_MESSAGE_LISTENER),
            ("topic:remove-listener", &topic::REMOVE_MESSAGE_LISTENER),
        ];
        registry.commands.extend(builtins);
        registry
    }

    /// Register a verb; fails if it is already taken
    pub fn register(&mut self, verb: &'static str, op: &'static OperationDescriptor) -> Result<()> {
        if self.commands.contains_key(verb) {
            return Err(ClcError::InvalidArgument(format!(
                "command '{}' is already registered",
                verb
            )));
        }
        self.commands.insert(verb, op);
        Ok(())
    }

    /// Look up a verb
    pub fn get(&self, verb: &str) -> Result<&'static OperationDescriptor> {
        self.commands
            .get(verb)
            .copied()
            .ok_or_else(|| ClcError::UnknownCommand(verb.to_string()))
    }

    /// Registered verbs in sorted order
    pub fn verbs(&self) -> impl Iterator<Item = (&'static str, &'static OperationDescriptor)> + '_ {
        self.commands.iter().map(|(verb, op)| (*verb, *op))
    }
}

/// Convert `KEY=VALUE` strings into request arguments in layout order
///
/// Every non-nullable request field must be given exactly once; a missing
/// nullable field is sent as absent. Unknown keys are rejected.
pub fn parse_arguments(op: &OperationDescriptor, pairs: &[String]) -> Result<Vec<Value>> {
    let mut given: BTreeMap<&str, &str> = BTreeMap::new();
    for pair in pairs {
        let (key, value) = split_key_value(pair)
            .ok_or_else(|| ClcError::InvalidArgument(format!("invalid key=value pair: {}", pair)))?;
        if given.insert(key, value).is_some() {
            return Err(ClcError::InvalidArgument(format!("'{}' given more than once", key)));
        }
    }

    let mut values = Vec::with_capacity(op.request.field_count());
    for field in op.request.fixed {
        let raw = take_field(&mut given, op, field.name)?;
        values.push(parse_fixed(field.name, field.kind, raw)?);
    }
    for field in op.request.vars {
        let raw = match given.remove(field.name) {
            Some(raw) => raw,
            None if is_nullable(field.kind) => NULL_LITERAL,
            None => return Err(missing(op, field.name)),
        };
        values.push(parse_var(field.kind, raw)?);
    }

    if let Some(unknown) = given.keys().next() {
        return Err(ClcError::InvalidArgument(format!(
            "{} has no field '{}' (fields: {})",
            op.name,
            unknown,
            op.request.field_names().collect::<Vec<_>>().join(", ")
        )));
    }
    Ok(values)
}

fn take_field<'a>(given: &mut BTreeMap<&str, &'a str>, op: &OperationDescriptor, name: &str) -> Result<&'a str> {
    given.remove(name).ok_or_else(|| missing(op, name))
}

fn missing(op: &OperationDescriptor, name: &str) -> ClcError {
    ClcError::InvalidArgument(format!("{} requires {}=VALUE", op.name, name))
}

fn is_nullable(kind: VarKind) -> bool {
    matches!(kind, VarKind::NullableString | VarKind::NullableData)
}

fn parse_fixed(name: &str, kind: FixedKind, raw: &str) -> Result<Value> {
    let invalid = || ClcError::InvalidArgument(format!("'{}' is not a valid {} for {}", raw, kind.name(), name));
    let value = match kind {
        FixedKind::Bool => Value::Bool(raw.parse().map_err(|_| invalid())?),
        FixedKind::Byte => Value::Byte(raw.parse().map_err(|_| invalid())?),
        FixedKind::Short => Value::Short(raw.parse().map_err(|_| invalid())?),
        FixedKind::Int => Value::Int(raw.parse().map_err(|_| invalid())?),
        FixedKind::Long => Value::Long(raw.parse().map_err(|_| invalid())?),
        FixedKind::Uuid if raw.eq_ignore_ascii_case(NULL_LITERAL) => Value::Uuid(None),
        FixedKind::Uuid => Value::Uuid(Some(Uuid::parse_str(raw).map_err(|_| invalid())?)),
    };
    Ok(value)
}

fn parse_var(kind: VarKind, raw: &str) -> Result<Value> {
    let is_null = raw.eq_ignore_ascii_case(NULL_LITERAL);
    let value = match kind {
        VarKind::String => Value::String(raw.to_string()),
        VarKind::NullableString if is_null => Value::NullableString(None),
        VarKind::NullableString => Value::NullableString(Some(raw.to_string())),
        VarKind::Data => Value::Data(Data::from_string(raw)),
        VarKind::NullableData if is_null => Value::NullableData(None),
        VarKind::NullableData => Value::NullableData(Some(Data::from_string(raw))),
        VarKind::StringList => Value::StringList(list_items(raw).map(String::from).collect()),
        VarKind::DataList => Value::DataList(list_items(raw).map(Data::from_string).collect()),
        VarKind::LongList => Value::LongList(
            list_items(raw)
                .map(|item| {
                    item.parse()
                        .map_err(|_| ClcError::InvalidArgument(format!("'{}' is not a valid long", item)))
                })
                .collect::<Result<Vec<i64>>>()?,
        ),
        VarKind::DistributedObjectList => {
            return Err(ClcError::InvalidArgument(
                "object-info lists cannot be given on the command line".to_string(),
            ))
        }
    };
    Ok(value)
}

fn list_items(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}
