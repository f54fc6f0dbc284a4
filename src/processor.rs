//! `CommandProcessor`: owns every piece of interpreter state and drives the
//! outer decode loop.

use std::path::PathBuf;

use crate::backend::{RegisterHooks, RenderBackend, ShaderHandle, ShaderLoader, WaitPrimitives};
use crate::config::Pm4Config;
use crate::indirect::IndirectBufferStack;
use crate::memory::GuestMemory;
use crate::observable::{Observable, Value};
use crate::packet::{classify_header, PacketKind};
use crate::registers::RegisterFile;
use crate::ring::{RingGeometry, RingReader};
use crate::trace::{NullTraceSink, TraceSink};

/// A single-frame trace capture request, armed by the embedding application
/// and consumed the next time `XE_SWAP` runs.
pub(crate) struct PendingTraceRequest {
    pub(crate) dir: PathBuf,
    pub(crate) title_id: u32,
    pub(crate) seq: u32,
}

/// The PM4 command-stream interpreter. Owns the register file, the active
/// ring reader, the indirect-buffer stack, bin mask/select, shader slots,
/// and the boxed external collaborators it dispatches through.
pub struct CommandProcessor {
    pub(crate) config: Pm4Config,
    pub(crate) memory: Box<dyn GuestMemory>,
    pub(crate) backend: Box<dyn RenderBackend>,
    pub(crate) shaders: Box<dyn ShaderLoader>,
    pub(crate) hooks: Box<dyn RegisterHooks>,
    pub(crate) wait: Box<dyn WaitPrimitives>,
    pub(crate) trace: Box<dyn TraceSink>,

    pub(crate) registers: RegisterFile,
    pub(crate) reader: RingReader,
    pub(crate) indirect_stack: IndirectBufferStack,

    pub(crate) bin_mask: u64,
    pub(crate) bin_select: u64,

    pub(crate) active_vertex_shader: Option<ShaderHandle>,
    pub(crate) active_pixel_shader: Option<ShaderHandle>,

    pub(crate) me_init_buffer: Vec<u32>,
    pub(crate) frame_counter: u64,

    pub(crate) pending_trace_request: Option<PendingTraceRequest>,
    pub(crate) trace_active: bool,
    pub(crate) trace_single_frame: bool,
}

impl CommandProcessor {
    /// Build a processor over `ring`, with tracing disabled until
    /// [`Self::request_single_frame_trace`] is called.
    #[must_use]
    pub fn new(
        config: Pm4Config,
        ring: RingGeometry,
        memory: Box<dyn GuestMemory>,
        backend: Box<dyn RenderBackend>,
        shaders: Box<dyn ShaderLoader>,
        hooks: Box<dyn RegisterHooks>,
        wait: Box<dyn WaitPrimitives>,
    ) -> Self {
        Self {
            config,
            memory,
            backend,
            shaders,
            hooks,
            wait,
            trace: Box::new(NullTraceSink),
            registers: RegisterFile::new(),
            reader: RingReader::new(ring, 0, 0),
            indirect_stack: IndirectBufferStack::new(),
            bin_mask: 0,
            bin_select: 0,
            active_vertex_shader: None,
            active_pixel_shader: None,
            me_init_buffer: Vec::new(),
            frame_counter: 0,
            pending_trace_request: None,
            trace_active: false,
            trace_single_frame: false,
        }
    }

    /// The guest has produced new data up to `write_offset`; the interpreter
    /// never moves this itself.
    pub fn set_write_offset(&mut self, write_offset: u32) {
        self.reader.set_write_offset(write_offset);
    }

    /// Replace the active trace sink, e.g. to inject a counting fake in
    /// tests or to swap in a `FileTraceSink` opened by the embedding
    /// application itself instead of through [`Self::request_single_frame_trace`].
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.trace = sink;
    }

    /// Arm a single-frame trace capture: the next `XE_SWAP` opens
    /// `<dir>/<title_id:08X>_<seq>.xtr`, captures until the swap after it,
    /// then closes.
    pub fn request_single_frame_trace(&mut self, dir: PathBuf, title_id: u32, seq: u32) {
        self.pending_trace_request = Some(PendingTraceRequest { dir, title_id, seq });
    }

    /// Total frames presented via `XE_SWAP` over this processor's lifetime.
    #[must_use]
    pub const fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Read-only access to the register file, e.g. for a debugger overlay.
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// Drain every packet currently available in the ring, dispatching each
    /// through the packet decoder and, for Type-3 packets, the opcode
    /// dispatcher. Stops early if a Type-3 packet signals a fatal decode
    /// condition; the caller may call `run` again once more data is
    /// produced.
    pub fn run(&mut self) {
        self.drain_current_reader();
    }

    pub(crate) fn drain_current_reader(&mut self) {
        while self.reader.read_count() >= 4 {
            let packet_guest_ptr = self.reader.current_guest_addr();
            let header = self.reader.read_u32_swapped(self.memory.as_ref());
            match classify_header(header) {
                PacketKind::Stuffing => {
                    self.trace.write_packet_start(packet_guest_ptr, 1);
                    self.trace.write_packet_end();
                }
                PacketKind::Type2 => {
                    self.trace.write_packet_start(packet_guest_ptr, 1);
                    self.trace.write_packet_end();
                }
                PacketKind::Type0 { base_index, write_one, count } => {
                    self.execute_type0(packet_guest_ptr, base_index, write_one, count);
                }
                PacketKind::Type1 { index_a, index_b } => {
                    self.execute_type1(packet_guest_ptr, index_a, index_b);
                }
                PacketKind::Type3 { opcode, count, predicate } => {
                    match self.execute_type3(packet_guest_ptr, opcode, count, predicate) {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(error) => {
                            tracing::warn!(%error, "fatal decode error; stopping current stream");
                            break;
                        }
                    }
                }
            }
        }
    }

    fn execute_type0(&mut self, packet_guest_ptr: u32, base_index: u16, write_one: bool, count: u16) {
        self.trace.write_packet_start(packet_guest_ptr, u32::from(count) + 1);
        let words = self.read_payload_words(count);
        if write_one {
            self.registers.write_repeated_index(base_index, &words, self.hooks.as_mut());
        } else {
            self.registers.write_range(base_index, &words, self.hooks.as_mut());
        }
        self.trace.write_packet_end();
    }

    fn execute_type1(&mut self, packet_guest_ptr: u32, index_a: u16, index_b: u16) {
        self.trace.write_packet_start(packet_guest_ptr, 3);
        let words = self.read_payload_words(2);
        self.registers.write(index_a, words[0], self.hooks.as_mut());
        self.registers.write(index_b, words[1], self.hooks.as_mut());
        self.trace.write_packet_end();
    }

    /// Read exactly `count` 32-bit words from the current ring reader.
    /// Reading through this single path is what makes the Type-3
    /// post-condition (`read_offset` advances by exactly `4*count`) hold
    /// for every handler without each one re-deriving it.
    pub(crate) fn read_payload_words(&mut self, count: u16) -> Vec<u32> {
        (0..count).map(|_| self.reader.read_u32_swapped(self.memory.as_ref())).collect()
    }

    /// Read one word from guest-physical memory (not the command ring),
    /// recording a trace event for it. The single funnel point opcode
    /// handlers use for every load they issue against guest memory.
    pub(crate) fn read_guest_u32(&mut self, guest_addr: u32) -> u32 {
        let value = self.memory.read_u32(guest_addr);
        self.trace.write_memory_read(guest_addr, 4);
        value
    }

    /// Write one word to guest-physical memory, recording a trace event
    /// for it. The single funnel point opcode handlers use for every
    /// store they issue against guest memory.
    pub(crate) fn write_guest_u32(&mut self, guest_addr: u32, value: u32) {
        self.memory.write_u32(guest_addr, value);
        self.trace.write_memory_write(guest_addr, 4);
    }
}

const QUERY_PATHS: &[&str] =
    &["frame_counter", "bin_mask", "bin_select", "indirect_depth", "read_offset", "trace_active"];

impl Observable for CommandProcessor {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "frame_counter" => Some(Value::U64(self.frame_counter)),
            "bin_mask" => Some(Value::U64(self.bin_mask)),
            "bin_select" => Some(Value::U64(self.bin_select)),
            "indirect_depth" => Some(Value::U32(self.indirect_stack.depth() as u32)),
            "read_offset" => Some(Value::U32(self.reader.read_offset())),
            "trace_active" => Some(Value::Bool(self.trace_active)),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        QUERY_PATHS
    }
}
