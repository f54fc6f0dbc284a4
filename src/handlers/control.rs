//! `ME_INIT`, `NOP`'s siblings, `INTERRUPT`, `XE_SWAP`, `INDIRECT_BUFFER`,
//! and the core's handful of documented-no-op opcodes.

use crate::error::Pm4Error;
use crate::opcode::XE_SWAP_SIGNATURE;
use crate::processor::CommandProcessor;
use crate::ring::RingReader;

impl CommandProcessor {
    pub(crate) fn handle_me_init(&mut self, words: &[u32]) -> bool {
        self.me_init_buffer.clear();
        self.me_init_buffer.extend_from_slice(words);
        true
    }

    pub(crate) fn handle_interrupt(&mut self, words: &[u32]) -> bool {
        let cpu_mask = words.first().copied().unwrap_or(0);
        for cpu in 0..6u32 {
            if cpu_mask & (1 << cpu) != 0 {
                self.hooks.dispatch_interrupt(1, cpu);
            }
        }
        true
    }

    pub(crate) fn handle_xe_swap(&mut self, words: &[u32]) -> bool {
        let signature = words.first().copied().unwrap_or(0);
        if signature != XE_SWAP_SIGNATURE {
            tracing::warn!(signature, "XE_SWAP signature mismatch");
        }
        let frontbuffer_ptr = words.get(1).copied().unwrap_or(0);
        let width = words.get(2).copied().unwrap_or(0);
        let height = words.get(3).copied().unwrap_or(0);
        self.backend.issue_swap(frontbuffer_ptr, width, height);
        self.frame_counter += 1;
        true
    }

    pub(crate) fn handle_indirect_buffer(&mut self, words: &[u32]) -> Result<bool, Pm4Error> {
        let guest_ptr = words.first().copied().unwrap_or(0);
        let length_words = words.get(1).copied().unwrap_or(0) & 0x000F_FFFF;

        let outer = self.reader.clone();
        self.indirect_stack.push(outer)?;
        self.reader = RingReader::for_indirect_buffer(guest_ptr, length_words);

        self.trace.write_indirect_buffer_start(guest_ptr, length_words);
        self.drain_current_reader();
        self.trace.write_indirect_buffer_end();

        // Restore even if the inner stream ended on a bad packet: the pop
        // always happens regardless of how `drain_current_reader` exited.
        if let Some(outer) = self.indirect_stack.pop() {
            self.reader = outer;
        }
        Ok(true)
    }

    pub(crate) fn handle_context_update(&mut self, words: &[u32]) -> bool {
        let value = words.first().copied().unwrap_or(0);
        if value != 0 {
            tracing::warn!(value, "CONTEXT_UPDATE with non-zero payload (hardware behavior undocumented)");
        }
        true
    }

    /// `WAIT_FOR_IDLE`: one payload word, no effect beyond logging it.
    pub(crate) fn handle_wait_for_idle(&mut self, words: &[u32]) -> bool {
        let value = words.first().copied().unwrap_or(0);
        tracing::debug!(value, "WAIT_FOR_IDLE");
        true
    }
}
