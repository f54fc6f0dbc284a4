//! Ring Reader (C1): a wrapping byte cursor over the guest command ring.

use crate::memory::GuestMemory;

/// Geometry of a guest command ring.
///
/// `capacity` is a power-of-two byte count; `base` is the guest-physical
/// address of the first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingGeometry {
    /// Guest-physical address of the first byte of the ring.
    pub base: u32,
    /// Ring size in bytes. Always a power of two.
    pub capacity: u32,
}

impl RingGeometry {
    /// Build a new ring geometry. `capacity` must be a power of two;
    /// debug builds assert this, release builds trust the caller.
    #[must_use]
    pub fn new(base: u32, capacity: u32) -> Self {
        debug_assert!(capacity.is_power_of_two(), "ring capacity must be a power of two");
        Self { base, capacity }
    }
}

/// Wrapping byte cursor over a guest ring buffer.
///
/// All reads are 32-bit aligned and transparently wrap at `capacity`.
/// Words are stored big-endian in guest memory and byte-swapped to host
/// order on read.
#[derive(Clone)]
pub struct RingReader {
    geometry: RingGeometry,
    read_offset: u32,
    write_offset: u32,
}

impl RingReader {
    /// Construct a reader over `geometry`, with `read_offset`/`write_offset`
    /// as currently observed (both already taken modulo `capacity`).
    #[must_use]
    pub fn new(geometry: RingGeometry, read_offset: u32, write_offset: u32) -> Self {
        Self {
            geometry,
            read_offset: read_offset % geometry.capacity,
            write_offset: write_offset % geometry.capacity,
        }
    }

    /// Construct a reader over an embedded (non-wrapping) indirect-buffer
    /// stream of `length_words` words at `base`.
    ///
    /// The classic ring-buffer offset formula can't distinguish "full" from
    /// "empty" when the producer catches all the way up to the consumer, so
    /// the backing geometry is padded by one extra word beyond
    /// `length_words` — plenty, since a well-formed decode never reads past
    /// `length_words` in the first place (the Type-3 dispatcher's overflow
    /// check rejects that before any read happens).
    #[must_use]
    pub fn for_indirect_buffer(base: u32, length_words: u32) -> Self {
        let length_bytes = length_words * 4;
        let geometry = RingGeometry { base, capacity: length_bytes + 4 };
        Self { geometry, read_offset: 0, write_offset: length_bytes }
    }

    /// Bytes currently available to read.
    #[must_use]
    pub const fn read_count(&self) -> usize {
        let cap = self.geometry.capacity;
        (((self.write_offset + cap) - self.read_offset) % cap) as usize
    }

    /// Current read offset within the ring (bytes from `base`).
    #[must_use]
    pub const fn read_offset(&self) -> u32 {
        self.read_offset
    }

    /// Guest-physical address the next read will start at.
    #[must_use]
    pub const fn current_guest_addr(&self) -> u32 {
        self.geometry.base.wrapping_add(self.read_offset)
    }

    /// Advance the caller's view of how much has been produced. The
    /// embedding application calls this when the guest bumps the ring's
    /// write pointer; the interpreter never calls it itself.
    pub fn set_write_offset(&mut self, write_offset: u32) {
        self.write_offset = write_offset % self.geometry.capacity;
    }

    /// Advance the read cursor by `n_bytes`, wrapping at `capacity`.
    pub fn advance(&mut self, n_bytes: u32) {
        self.read_offset = (self.read_offset + n_bytes) % self.geometry.capacity;
    }

    /// Hint that the next `n_bytes` will be read soon. No-op on every
    /// target this crate builds for; kept as a documented stub so callers
    /// don't need `cfg` gating.
    pub fn prefetch_read_window(&self, _n_bytes: u32) {}

    /// Read one 32-bit word at the current offset, advance by 4, and
    /// byte-swap from guest (big-endian) to host order.
    ///
    /// Caller must have checked `read_count() >= 4`.
    pub fn read_u32_swapped(&mut self, mem: &dyn GuestMemory) -> u32 {
        let guest_addr = self.geometry.base.wrapping_add(self.read_offset);
        let mut bytes = [0u8; 4];
        mem.read_bytes(guest_addr, &mut bytes);
        self.advance(4);
        u32::from_be_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FlatMemory {
        bytes: RefCell<Vec<u8>>,
    }

    impl FlatMemory {
        fn new(size: usize) -> Self {
            Self { bytes: RefCell::new(vec![0; size]) }
        }

        fn put_be_words(&self, offset: usize, words: &[u32]) {
            let mut buf = self.bytes.borrow_mut();
            for (i, w) in words.iter().enumerate() {
                buf[offset + i * 4..offset + i * 4 + 4].copy_from_slice(&w.to_be_bytes());
            }
        }
    }

    impl GuestMemory for FlatMemory {
        fn translate(&self, guest_addr: u32) -> Option<usize> {
            Some(guest_addr as usize)
        }

        fn read_u32(&self, guest_addr: u32) -> u32 {
            let base = (guest_addr & !0x3) as usize;
            let buf = self.bytes.borrow();
            let word = u32::from_be_bytes(buf[base..base + 4].try_into().unwrap());
            crate::memory::Endianness::from_addr_bits(guest_addr).swap(word)
        }

        fn write_u32(&mut self, guest_addr: u32, value: u32) {
            let base = (guest_addr & !0x3) as usize;
            let swapped = crate::memory::Endianness::from_addr_bits(guest_addr).swap(value);
            self.bytes.borrow_mut()[base..base + 4].copy_from_slice(&swapped.to_be_bytes());
        }

        fn read_bytes(&self, guest_addr: u32, out: &mut [u8]) {
            let base = guest_addr as usize;
            out.copy_from_slice(&self.bytes.borrow()[base..base + out.len()]);
        }
    }

    #[test]
    fn read_count_matches_spec_formula() {
        let geom = RingGeometry::new(0, 0x1000);
        let reader = RingReader::new(geom, 0x100, 0x180);
        assert_eq!(reader.read_count(), 0x80);
    }

    #[test]
    fn read_count_wraps_when_write_behind_read() {
        let geom = RingGeometry::new(0, 0x1000);
        let reader = RingReader::new(geom, 0xF00, 0x100);
        assert_eq!(reader.read_count(), 0x200);
    }

    #[test]
    fn read_u32_swapped_advances_and_swaps() {
        let mem = FlatMemory::new(0x1000);
        mem.put_be_words(0, &[0xAABB_CCDD]);
        let geom = RingGeometry::new(0, 0x1000);
        let mut reader = RingReader::new(geom, 0, 4);
        let value = reader.read_u32_swapped(&mem);
        assert_eq!(value, 0xAABB_CCDD);
        assert_eq!(reader.read_offset(), 4);
    }

    #[test]
    fn indirect_buffer_reader_reports_full_length_available() {
        let reader = RingReader::for_indirect_buffer(0x2000_0000, 4);
        assert_eq!(reader.read_count(), 16);
    }

    #[test]
    fn indirect_buffer_reader_drains_to_zero_without_wrapping() {
        let mem = FlatMemory::new(0x20);
        let mut reader = RingReader::for_indirect_buffer(0, 4);
        for _ in 0..4 {
            reader.read_u32_swapped(&mem);
        }
        assert_eq!(reader.read_count(), 0);
    }

    #[test]
    fn advance_wraps_at_capacity() {
        let geom = RingGeometry::new(0, 0x100);
        let mut reader = RingReader::new(geom, 0xF0, 0xF0);
        reader.advance(0x20);
        assert_eq!(reader.read_offset(), 0x10);
    }
}
