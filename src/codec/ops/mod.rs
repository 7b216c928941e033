//! Operation descriptors and typed wrappers, one module per service
//!
//! Each module declares the static [`OperationDescriptor`]s of a service and
//! thin typed functions that convert arguments to engine values and back.
//!
//! [`OperationDescriptor`]: crate::codec::OperationDescriptor

pub mod client;
pub mod map;
pub mod multimap;
pub mod topic;
