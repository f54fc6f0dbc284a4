//! Trace Writer: append-only capture of decode events.
//!
//! `TraceSink` is a narrow trait so it can be a true no-op when tracing is
//! disabled, and the concrete file-backed sink names its output
//! `<title_id:08X>_<seq>.xtr`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Coarse event kinds recorded alongside packet start/end brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent {
    /// A swap was presented while a trace was active.
    Swap,
}

const TAG_PACKET_START: u8 = 1;
const TAG_PACKET_END: u8 = 2;
const TAG_MEMORY_READ: u8 = 3;
const TAG_MEMORY_WRITE: u8 = 4;
const TAG_INDIRECT_BUFFER_START: u8 = 5;
const TAG_INDIRECT_BUFFER_END: u8 = 6;
const TAG_EVENT: u8 = 7;

/// Sink for trace records. All operations must tolerate being disabled
/// (`NullTraceSink` is the all-no-op implementation).
pub trait TraceSink {
    /// A packet's decode is beginning at `guest_ptr`, declaring `word_count`
    /// words (including the header).
    fn write_packet_start(&mut self, guest_ptr: u32, word_count: u32);
    /// The most recently started packet finished decoding.
    fn write_packet_end(&mut self);
    /// `bytes` were read from `guest_ptr`.
    fn write_memory_read(&mut self, guest_ptr: u32, bytes: u32);
    /// `bytes` were written to `guest_ptr`.
    fn write_memory_write(&mut self, guest_ptr: u32, bytes: u32);
    /// Entering an indirect buffer (nesting level increases by one).
    fn write_indirect_buffer_start(&mut self, guest_ptr: u32, word_count: u32);
    /// Leaving an indirect buffer (nesting level decreases by one).
    fn write_indirect_buffer_end(&mut self);
    /// Record a coarse-grained event.
    fn write_event(&mut self, kind: TraceEvent);
    /// Flush buffered records to their backing store.
    fn flush(&mut self);
}

/// No-op sink: the default when tracing is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn write_packet_start(&mut self, _guest_ptr: u32, _word_count: u32) {}
    fn write_packet_end(&mut self) {}
    fn write_memory_read(&mut self, _guest_ptr: u32, _bytes: u32) {}
    fn write_memory_write(&mut self, _guest_ptr: u32, _bytes: u32) {}
    fn write_indirect_buffer_start(&mut self, _guest_ptr: u32, _word_count: u32) {}
    fn write_indirect_buffer_end(&mut self) {}
    fn write_event(&mut self, _kind: TraceEvent) {}
    fn flush(&mut self) {}
}

/// Binary, append-only trace file.
///
/// Records are self-delimited (`[tag: u8][guest_ptr: u32][extra: u32]`),
/// so nesting of packet start/end inside indirect-buffer start/end is
/// recoverable by a replay tool without needing length-prefixed framing.
pub struct FileTraceSink {
    writer: BufWriter<File>,
    packet_depth: u32,
    indirect_depth: u32,
}

impl FileTraceSink {
    /// Open `<dir>/<title_id:08X>_<seq>.xtr` for append-only trace capture.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn open(dir: &Path, title_id: u32, seq: u32) -> io::Result<Self> {
        let path: PathBuf = dir.join(format!("{title_id:08X}_{seq}.xtr"));
        let file = File::create(path)?;
        Ok(Self { writer: BufWriter::new(file), packet_depth: 0, indirect_depth: 0 })
    }

    fn write_record(&mut self, tag: u8, guest_ptr: u32, extra: u32) {
        let mut record = [0u8; 9];
        record[0] = tag;
        record[1..5].copy_from_slice(&guest_ptr.to_le_bytes());
        record[5..9].copy_from_slice(&extra.to_le_bytes());
        // Trace capture must never crash the interpreter; a write failure
        // here means the disk is gone, not that decode should stop.
        let _ = self.writer.write_all(&record);
    }

    /// Current packet-start/end nesting depth (0 outside any packet).
    #[must_use]
    pub const fn packet_depth(&self) -> u32 {
        self.packet_depth
    }

    /// Current indirect-buffer nesting depth.
    #[must_use]
    pub const fn indirect_depth(&self) -> u32 {
        self.indirect_depth
    }
}

impl TraceSink for FileTraceSink {
    fn write_packet_start(&mut self, guest_ptr: u32, word_count: u32) {
        self.write_record(TAG_PACKET_START, guest_ptr, word_count);
        self.packet_depth += 1;
    }

    fn write_packet_end(&mut self) {
        self.write_record(TAG_PACKET_END, 0, 0);
        self.packet_depth = self.packet_depth.saturating_sub(1);
    }

    fn write_memory_read(&mut self, guest_ptr: u32, bytes: u32) {
        self.write_record(TAG_MEMORY_READ, guest_ptr, bytes);
    }

    fn write_memory_write(&mut self, guest_ptr: u32, bytes: u32) {
        self.write_record(TAG_MEMORY_WRITE, guest_ptr, bytes);
    }

    fn write_indirect_buffer_start(&mut self, guest_ptr: u32, word_count: u32) {
        self.write_record(TAG_INDIRECT_BUFFER_START, guest_ptr, word_count);
        self.indirect_depth += 1;
    }

    fn write_indirect_buffer_end(&mut self) {
        self.write_record(TAG_INDIRECT_BUFFER_END, 0, 0);
        self.indirect_depth = self.indirect_depth.saturating_sub(1);
    }

    fn write_event(&mut self, kind: TraceEvent) {
        let code = match kind {
            TraceEvent::Swap => 1,
        };
        self.write_record(TAG_EVENT, 0, code);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sink_never_panics() {
        let mut sink = NullTraceSink;
        sink.write_packet_start(0, 1);
        sink.write_packet_end();
        sink.write_memory_read(0, 4);
        sink.write_memory_write(0, 4);
        sink.write_indirect_buffer_start(0, 1);
        sink.write_indirect_buffer_end();
        sink.write_event(TraceEvent::Swap);
        sink.flush();
    }

    #[test]
    fn file_sink_tracks_nesting_depth() {
        let dir = std::env::temp_dir();
        let mut sink = FileTraceSink::open(&dir, 0x4D53_0001, 0).unwrap();
        sink.write_indirect_buffer_start(0x1000, 2);
        sink.write_packet_start(0x1000, 2);
        assert_eq!(sink.packet_depth(), 1);
        sink.write_packet_end();
        assert_eq!(sink.packet_depth(), 0);
        sink.write_indirect_buffer_end();
        assert_eq!(sink.indirect_depth(), 0);
    }
}
