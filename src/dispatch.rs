//! Type-3 Dispatcher (C6): the opcode switch, predicate gate, and
//! post-amble assertions around one packet's dispatch.

use crate::error::Pm4Error;
use crate::handlers;
use crate::opcode;
use crate::processor::CommandProcessor;
use crate::trace::{FileTraceSink, TraceEvent};

impl CommandProcessor {
    /// Run one Type-3 packet whose header has already been consumed from
    /// the ring. Returns `Ok(true)` to keep draining the current stream,
    /// `Ok(false)` to stop it (unknown opcode, predicated-out packets never
    /// reach this return value), or `Err` for a fatal decode condition.
    pub(crate) fn execute_type3(
        &mut self,
        packet_guest_ptr: u32,
        opcode: u8,
        count: u16,
        predicate: bool,
    ) -> Result<bool, Pm4Error> {
        let available = self.reader.read_count();
        let requested = 4 * usize::from(count);
        if available < requested {
            tracing::warn!(opcode = format_args!("{opcode:#04x}"), requested, available, "decode overflow");
            return Err(Pm4Error::DecodeOverflow { opcode, requested, available });
        }

        let declared_word_count = if opcode == opcode::INDIRECT_BUFFER { 2 } else { u32::from(count) + 1 };
        self.trace.write_packet_start(packet_guest_ptr, declared_word_count);

        if predicate {
            let any_pass = (self.bin_select & self.bin_mask) != 0;
            if !any_pass || opcode == opcode::XE_SWAP {
                self.reader.advance(requested as u32);
                self.trace.write_packet_end();
                return Ok(true);
            }
        }

        tracing::debug!(opcode = format_args!("{opcode:#04x}"), count, predicate, "dispatching type-3 packet");
        let before_read_count = self.reader.read_count();
        let result = handlers::dispatch_opcode(self, opcode, count);

        self.trace.write_packet_end();

        if opcode == opcode::XE_SWAP {
            self.on_swap_trace_lifecycle();
        }

        let result = result?;
        debug_assert_eq!(
            self.reader.read_count(),
            before_read_count - requested,
            "handler for opcode {opcode:#04x} did not consume exactly its declared payload"
        );
        Ok(result)
    }

    /// Open/emit/close the trace file around a swap, independent of
    /// whatever the `XE_SWAP` handler itself does.
    fn on_swap_trace_lifecycle(&mut self) {
        if let Some(request) = self.pending_trace_request.take() {
            match FileTraceSink::open(&request.dir, request.title_id, request.seq) {
                Ok(sink) => {
                    self.trace = Box::new(sink);
                    self.trace_active = true;
                    self.trace_single_frame = true;
                }
                Err(error) => {
                    tracing::warn!(%error, "failed to open trace file");
                }
            }
            return;
        }
        if self.trace_active {
            self.trace.write_event(TraceEvent::Swap);
            self.trace.flush();
            if self.trace_single_frame {
                self.trace = Box::new(crate::trace::NullTraceSink);
                self.trace_active = false;
                self.trace_single_frame = false;
            }
        }
    }
}
