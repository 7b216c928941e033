//! Operation layout descriptors
//!
//! Every remote operation is described by data rather than code: a message
//! type, the fixed-width fields stored in the initial frame and the ordered
//! variable-length fields that follow as extra frames. Offsets are derived by
//! `const fn` from the field kinds, starting at the header size, so they can
//! be checked at compile time and never hand-summed.

use std::collections::HashSet;

use crate::error::{ClcError, Result};
use crate::protocol::fixed::{BOOLEAN_SIZE, BYTE_SIZE, INT_SIZE, LONG_SIZE, SHORT_SIZE, UUID_SIZE};
use crate::protocol::{REQUEST_HEADER_SIZE, RESPONSE_HEADER_SIZE};

/// Kind of a fixed-width field in the initial frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedKind {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Uuid,
}

impl FixedKind {
    /// Encoded size in bytes
    pub const fn size(self) -> usize {
        match self {
            FixedKind::Bool => BOOLEAN_SIZE,
            FixedKind::Byte => BYTE_SIZE,
            FixedKind::Short => SHORT_SIZE,
            FixedKind::Int => INT_SIZE,
            FixedKind::Long => LONG_SIZE,
            FixedKind::Uuid => UUID_SIZE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FixedKind::Bool => "bool",
            FixedKind::Byte => "byte",
            FixedKind::Short => "short",
            FixedKind::Int => "int",
            FixedKind::Long => "long",
            FixedKind::Uuid => "uuid",
        }
    }
}

/// Kind of a variable-length field carried in its own frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    String,
    NullableString,
    Data,
    NullableData,
    StringList,
    DataList,
    LongList,
    DistributedObjectList,
}

impl VarKind {
    pub fn name(self) -> &'static str {
        match self {
            VarKind::String => "string",
            VarKind::NullableString => "string?",
            VarKind::Data => "data",
            VarKind::NullableData => "data?",
            VarKind::StringList => "list<string>",
            VarKind::DataList => "list<data>",
            VarKind::LongList => "list<long>",
            VarKind::DistributedObjectList => "list<object-info>",
        }
    }
}

/// A named fixed-width field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedField {
    pub name: &'static str,
    pub kind: FixedKind,
}

/// A named variable-length field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarField {
    pub name: &'static str,
    pub kind: VarKind,
}

pub const fn fixed(name: &'static str, kind: FixedKind) -> FixedField {
    FixedField { name, kind }
}

pub const fn var(name: &'static str, kind: VarKind) -> VarField {
    VarField { name, kind }
}

/// Layout of one message direction of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageLayout {
    /// Unique message type tag
    pub message_type: i32,

    /// Bytes before the first fixed field
    pub header_size: usize,

    /// Fixed fields, in initial-frame order
    pub fixed: &'static [FixedField],

    /// Variable-length fields, in frame order
    pub vars: &'static [VarField],
}

impl MessageLayout {
    /// Layout of a request (partition id in the header)
    pub const fn request(message_type: i32, fixed: &'static [FixedField], vars: &'static [VarField]) -> Self {
        Self {
            message_type,
            header_size: REQUEST_HEADER_SIZE,
            fixed,
            vars,
        }
    }

    /// Layout of a response (backup acks in the header)
    pub const fn response(message_type: i32, fixed: &'static [FixedField], vars: &'static [VarField]) -> Self {
        Self {
            message_type,
            header_size: RESPONSE_HEADER_SIZE,
            fixed,
            vars,
        }
    }

    /// Layout of an event (partition id in the header)
    pub const fn event(message_type: i32, fixed: &'static [FixedField], vars: &'static [VarField]) -> Self {
        Self::request(message_type, fixed, vars)
    }

    /// Byte offset of the fixed field at `index`
    ///
    /// `offset_of(fixed.len())` is the initial frame size.
    pub const fn offset_of(&self, index: usize) -> usize {
        let mut offset = self.header_size;
        let mut i = 0;
        while i < index {
            offset += self.fixed[i].kind.size();
            i += 1;
        }
        offset
    }

    /// Exact size of the initial frame content
    pub const fn initial_frame_size(&self) -> usize {
        self.offset_of(self.fixed.len())
    }

    /// Total number of fields (fixed then variable)
    pub fn field_count(&self) -> usize {
        self.fixed.len() + self.vars.len()
    }

    /// Field names in argument order: fixed fields first, then variable ones
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fixed
            .iter()
            .map(|f| f.name)
            .chain(self.vars.iter().map(|f| f.name))
    }

    /// Check that field names are unique
    pub fn validate(&self, label: &str) -> Result<()> {
        let mut seen = HashSet::new();
        for name in self.field_names() {
            if !seen.insert(name) {
                return Err(ClcError::Protocol(format!(
                    "{}: duplicate field '{}'",
                    label, name
                )));
            }
        }
        Ok(())
    }
}

/// Partition routing policy of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    /// No partition affinity; partition id is always -1
    Any,
    /// Routed to the caller-supplied partition
    Partition,
}

/// Static description of one remote operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// Qualified name, e.g. `Topic.removeMessageListener`
    pub name: &'static str,

    /// Whether the transport may resend after a transient failure
    pub retryable: bool,

    pub routing: Routing,

    pub request: MessageLayout,

    pub response: MessageLayout,
}
