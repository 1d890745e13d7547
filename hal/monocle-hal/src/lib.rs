//! Monocle Hardware Abstraction Layer
//!
//! This crate defines the two collaborators the display encoder talks to
//! without implementing them: the FPGA register bus and a random-access
//! byte source for font containers. Board support packages implement
//! [`FpgaBus`] on top of their SPI driver; host tools implement it over a
//! remote REPL link or a recording double.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  monocle-display (frame composer)       │
//! └─────────────────────────────────────────┘
//!          │                       │
//!          ▼                       ▼
//! ┌─────────────────┐     ┌─────────────────┐
//! │ fpga::FpgaBus   │     │ source::        │
//! │ (register I/O)  │     │ ByteSource      │
//! └─────────────────┘     └─────────────────┘
//!          │                       │
//!          ▼                       ▼
//!   board SPI driver        flash / file / blob
//! ```
//!
//! # Traits
//!
//! - [`fpga::FpgaBus`] - Register writes and reads on the FPGA bus
//! - [`source::ByteSource`] - Seekable byte stream (font containers)

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod fpga;
pub mod source;

#[cfg(feature = "mock")]
extern crate alloc;

#[cfg(feature = "mock")]
pub mod mock;

// Re-export key traits at crate root for convenience
pub use fpga::{BusError, FpgaBus, MAX_READ_LEN, MAX_WRITE_LEN};
pub use source::{ByteSource, SliceSource, SourceError};

#[cfg(feature = "std")]
pub use source::IoSource;
