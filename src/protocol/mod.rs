//! Protocol Module
//!
//! Frame-based binary wire protocol spoken with the data-grid server.
//!
//! ## Layers
//! - `fixed`: fixed-width scalars at byte offsets (Little Endian)
//! - `frame`: flag set + content, the atomic transport unit
//! - `message`: ordered frames forming one request, response or event
//! - `iterator`: forward-only decode cursor with role checks
//! - `builtin`: variable-length fields (strings, data, nullables, lists)
//! - `fragment`: splitting and reassembly of oversized messages
//!
//! ## Frame Wire Format
//! ```text
//! ┌──────────────┬───────────┬─────────────────────────────┐
//! │ Length (4)   │ Flags (2) │          Content            │
//! └──────────────┴───────────┴─────────────────────────────┘
//! ```

pub mod builtin;
pub mod fixed;

mod data;
mod fragment;
mod frame;
mod iterator;
mod message;

pub use builtin::{DistributedObjectInfo, ErrorHolder};
pub use data::{Data, DATA_HEADER_SIZE, STRING_TYPE_ID};
pub use fragment::{split_message, FragmentAssembler, MAX_PENDING_MESSAGES};
pub use frame::{flags, Frame, FrameRole, FRAME_HEADER_SIZE};
pub use iterator::FrameIterator;
pub use message::{
    ClientMessage, CLIENT_PROTOCOL_HEADER, CORRELATION_ID_OFFSET, EXCEPTION_MESSAGE_TYPE,
    FRAGMENTATION_ID_OFFSET, NO_PARTITION, PARTITION_ID_OFFSET, REQUEST_HEADER_SIZE,
    RESPONSE_BACKUP_ACKS_OFFSET, RESPONSE_HEADER_SIZE, TYPE_OFFSET,
};
