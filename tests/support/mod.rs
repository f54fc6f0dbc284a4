//! Shared fake backends for the integration test suite, mirroring how
//! `mos-6502/tests/instructions.rs` drives its CPU through a bus fake.

use std::cell::RefCell;
use std::rc::Rc;

use xenos_pm4::backend::{
    IndexBufferInfo, PrimitiveType, RegisterHooks, RenderBackend, ShaderHandle, ShaderLoader, ShaderType,
    WaitPrimitives,
};
use xenos_pm4::memory::GuestMemory;
use xenos_pm4::trace::{TraceEvent, TraceSink};

/// Counts packet and indirect-buffer start/end calls so tests can assert
/// the nesting invariant without a real file.
#[derive(Default, Clone)]
pub struct CountingSink {
    pub packet_starts: Rc<RefCell<u32>>,
    pub packet_ends: Rc<RefCell<u32>>,
    pub indirect_starts: Rc<RefCell<u32>>,
    pub indirect_ends: Rc<RefCell<u32>>,
    pub swap_events: Rc<RefCell<u32>>,
}

impl TraceSink for CountingSink {
    fn write_packet_start(&mut self, _guest_ptr: u32, _word_count: u32) {
        *self.packet_starts.borrow_mut() += 1;
    }
    fn write_packet_end(&mut self) {
        *self.packet_ends.borrow_mut() += 1;
    }
    fn write_memory_read(&mut self, _guest_ptr: u32, _bytes: u32) {}
    fn write_memory_write(&mut self, _guest_ptr: u32, _bytes: u32) {}
    fn write_indirect_buffer_start(&mut self, _guest_ptr: u32, _word_count: u32) {
        *self.indirect_starts.borrow_mut() += 1;
    }
    fn write_indirect_buffer_end(&mut self) {
        *self.indirect_ends.borrow_mut() += 1;
    }
    fn write_event(&mut self, kind: TraceEvent) {
        match kind {
            TraceEvent::Swap => *self.swap_events.borrow_mut() += 1,
        }
    }
    fn flush(&mut self) {}
}

/// Flat guest-physical address space backing the ring and any scratch
/// buffers a test writes into. Cheaply cloneable so a test can keep its own
/// handle after moving one into `CommandProcessor`.
#[derive(Clone)]
pub struct FakeMemory {
    bytes: Rc<RefCell<Vec<u8>>>,
}

impl FakeMemory {
    pub fn new(size: usize) -> Self {
        Self { bytes: Rc::new(RefCell::new(vec![0; size])) }
    }

    pub fn put_be_words(&self, offset: u32, words: &[u32]) {
        let mut buf = self.bytes.borrow_mut();
        for (i, w) in words.iter().enumerate() {
            let at = offset as usize + i * 4;
            buf[at..at + 4].copy_from_slice(&w.to_be_bytes());
        }
    }

    pub fn raw_be_u32(&self, addr: u32) -> u32 {
        let buf = self.bytes.borrow();
        let at = addr as usize;
        u32::from_be_bytes(buf[at..at + 4].try_into().unwrap())
    }
}

impl GuestMemory for FakeMemory {
    fn translate(&self, guest_addr: u32) -> Option<usize> {
        Some(guest_addr as usize)
    }

    fn read_u32(&self, guest_addr: u32) -> u32 {
        let base = (guest_addr & !0x3) as usize;
        let word = {
            let buf = self.bytes.borrow();
            u32::from_be_bytes(buf[base..base + 4].try_into().unwrap())
        };
        xenos_pm4::Endianness::from_addr_bits(guest_addr).swap(word)
    }

    fn write_u32(&mut self, guest_addr: u32, value: u32) {
        let base = (guest_addr & !0x3) as usize;
        let swapped = xenos_pm4::Endianness::from_addr_bits(guest_addr).swap(value);
        self.bytes.borrow_mut()[base..base + 4].copy_from_slice(&swapped.to_be_bytes());
    }

    fn read_bytes(&self, guest_addr: u32, out: &mut [u8]) {
        let base = guest_addr as usize;
        out.copy_from_slice(&self.bytes.borrow()[base..base + out.len()]);
    }
}

/// Records every call instead of rendering anything.
#[derive(Default)]
pub struct RecordingBackend {
    pub swaps: Vec<(u32, u32, u32)>,
    pub draws: Vec<(PrimitiveType, u32, Option<IndexBufferInfo>, bool)>,
}

impl RenderBackend for RecordingBackend {
    fn issue_swap(&mut self, frontbuffer_ptr: u32, width: u32, height: u32) {
        self.swaps.push((frontbuffer_ptr, width, height));
    }

    fn issue_draw(
        &mut self,
        prim: PrimitiveType,
        num_indices: u32,
        index_info: Option<IndexBufferInfo>,
        major_mode_explicit: bool,
    ) -> bool {
        self.draws.push((prim, num_indices, index_info, major_mode_explicit));
        true
    }
}

#[derive(Default)]
pub struct FakeShaderLoader {
    pub next_handle: u64,
}

impl ShaderLoader for FakeShaderLoader {
    fn load_shader(
        &mut self,
        _kind: ShaderType,
        _guest_addr: u32,
        _host_bytes: Option<&[u32]>,
        _size_dwords: u32,
    ) -> ShaderHandle {
        self.next_handle += 1;
        ShaderHandle(self.next_handle)
    }
}

#[derive(Default)]
pub struct RecordingHooks {
    pub make_coherent_calls: u32,
    pub interrupts: Vec<(u32, u32)>,
}

impl RegisterHooks for RecordingHooks {
    fn make_coherent(&mut self) {
        self.make_coherent_calls += 1;
    }
    fn dispatch_interrupt(&mut self, source: u32, cpu: u32) {
        self.interrupts.push((source, cpu));
    }
    fn on_alu_constants_written(&mut self, _base: u16, _words: &[u32]) {}
    fn on_fetch_constants_written(&mut self, _base: u16, _words: &[u32]) {}
    fn on_bool_constants_written(&mut self, _base: u16, _words: &[u32]) {}
    fn on_loop_constants_written(&mut self, _base: u16, _words: &[u32]) {}
    fn on_shader_constants_written(&mut self, _base: u16, _words: &[u32]) {}
    fn on_scissor_written(&mut self, _index: u16, _value: u32) {}
    fn on_swap_register_written(&mut self, _index: u16, _value: u32) {}
    fn on_interrupt_ack_written(&mut self, _value: u32) {}
}

/// Never blocks: `worker_running` always reports true, and a panic on
/// `sleep_ms` makes any test that hits it fail loudly instead of hanging.
#[derive(Default)]
pub struct ImmediateWait;

impl WaitPrimitives for ImmediateWait {
    fn prepare_for_wait(&mut self) {}
    fn return_from_wait(&mut self) {}
    fn sleep_ms(&mut self, _millis: u32) {
        panic!("test expected WAIT_REG_MEM to resolve without sleeping");
    }
    fn yield_now(&mut self) {}
    fn worker_running(&self) -> bool {
        true
    }
}
