//! Interpreter error variants.
//!
//! Only the three conditions that must unwind the current decode loop
//! produce a typed error. Bad headers, unsupported draw variants, and
//! backend draw failures are handled locally and never reach this type.

use thiserror::Error;

/// Fatal-to-the-current-stream errors raised by the PM4 interpreter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Pm4Error {
    /// A Type-3 packet declared more payload than the ring has available.
    #[error("packet overflow: opcode {opcode:#04x} requested {requested} bytes, {available} available")]
    DecodeOverflow {
        /// The opcode that declared the overflowing payload.
        opcode: u8,
        /// Bytes the packet claimed to need.
        requested: usize,
        /// Bytes actually available to read.
        available: usize,
    },

    /// The Type-3 opcode is not part of the documented Xenos set.
    #[error("unknown Type-3 opcode {0:#04x}")]
    UnknownOpcode(u8),

    /// `WAIT_REG_MEM` aborted because the owning worker was stopped.
    #[error("wait cancelled by worker shutdown")]
    WaitCancelled,
}
