//! # gridclc
//!
//! Command-line client for a clustered in-memory data grid, built around the
//! grid's frame-based binary client protocol:
//! - Fixed-width field codec and frame/message model
//! - Data-driven operation codec table with a single generic engine
//! - Fragment splitting and reassembly
//! - Blocking stream transport over any `Read`/`Write` pair
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        CLI (gridclc)                         │
//! │              verbs + KEY=VALUE arguments                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Command Registry                           │
//! │              (verb → operation descriptor)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                Operation Codec Table                         │
//! │          (static layouts + generic engine)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Protocol   │          │  Transport  │
//!   │ (frames)    │─────────▶│  (stream)   │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod codec;
pub mod commands;
pub mod transport;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ClcError, Result};
pub use config::Config;
pub use commands::CommandRegistry;
pub use protocol::{ClientMessage, Data, Frame, FrameIterator};
pub use transport::{StreamTransport, Transport};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of gridclc
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
