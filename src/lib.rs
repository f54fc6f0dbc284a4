//! PM4 command-stream interpreter for an Xbox-360-class GPU emulator.
//!
//! This crate owns no thread and opens no window: an embedding application
//! feeds it a guest command ring and the external collaborators of
//! [`backend`] (a renderer, a shader loader, register-write hooks, and
//! cooperative-wait primitives), and calls [`CommandProcessor::run`]
//! whenever the guest has produced new ring data.
//!
//! Module layout mirrors the component breakdown this interpreter is built
//! from: [`ring`] is the wrapping byte cursor over the command ring,
//! [`registers`] is the side-effecting register file, [`memory`] is the
//! guest-physical memory gateway, [`trace`] is the append-only decode
//! trace, [`packet`] classifies headers, [`dispatch`] runs the Type-3
//! opcode switch, and [`handlers`] holds the ~30 opcode implementations.

pub mod backend;
pub mod config;
mod dispatch;
pub mod draw;
pub mod error;
mod handlers;
mod indirect;
pub mod memory;
pub mod observable;
pub mod opcode;
pub mod packet;
pub mod processor;
pub mod registers;
pub mod ring;
pub mod trace;

pub use backend::{
    IndexBufferInfo, IndexFormat, PrimitiveType, RegisterHooks, RenderBackend, ShaderHandle,
    ShaderLoader, ShaderType, SourceSelect, WaitPrimitives,
};
pub use config::Pm4Config;
pub use error::Pm4Error;
pub use indirect::MAX_INDIRECT_DEPTH;
pub use memory::{Endianness, GuestMemory};
pub use observable::{Observable, Value};
pub use packet::{classify_header, PacketKind};
pub use processor::CommandProcessor;
pub use registers::{Bank, RegisterFile, REGISTER_COUNT};
pub use ring::{RingGeometry, RingReader};
pub use trace::{FileTraceSink, NullTraceSink, TraceEvent, TraceSink};
