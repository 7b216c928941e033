//! Codec Module
//!
//! The operation codec table: a static descriptor per remote operation and a
//! single generic engine that encodes requests and decodes responses from it.
//!
//! ## Encoding a Request
//! ```text
//! typed args ──▶ [Value] ──▶ engine::encode_request(descriptor)
//!                               │
//!                               ├─ initial frame: type, partition, fixed fields
//!                               └─ one frame group per variable field, in order
//! ```
//!
//! ## Decoding a Response
//! The engine checks the message type, reads fixed fields at their offsets and
//! walks the remaining frames in declaration order. Server error responses
//! surface as [`ClcError::Remote`](crate::ClcError::Remote).

pub mod engine;
pub mod layout;
pub mod ops;
pub mod table;

mod value;

pub use layout::{FixedField, FixedKind, MessageLayout, OperationDescriptor, Routing, VarField, VarKind};
pub use value::{Fields, Value};
