//! Register File (C2): the indexed array of GPU register state.
//!
//! Writes funnel through a single `write` entry point which stores the
//! value and, for the handful of side-effecting index ranges, invokes the
//! matching `RegisterHooks` callback.

use crate::backend::RegisterHooks;

/// Number of addressable register slots (15-bit index space, Xenos uses
/// roughly the bottom third of it).
pub const REGISTER_COUNT: usize = 0x5000;

/// `COHER_STATUS_HOST`: reading it must first call `make_coherent`.
pub const COHER_STATUS_HOST: u16 = 0x0900;
/// `VGT_EVENT_INITIATOR`: written by `EVENT_WRITE` and `VIZ_QUERY`.
pub const VGT_EVENT_INITIATOR: u16 = 0x2094;
/// `VGT_DRAW_INITIATOR`: read by the Draw Submitter.
pub const VGT_DRAW_INITIATOR: u16 = 0x2090;
/// `VGT_DMA_BASE`: DMA (indexed) draw source address.
pub const VGT_DMA_BASE: u16 = 0x2182;
/// `VGT_DMA_SIZE`: DMA (indexed) draw word count / index format.
pub const VGT_DMA_SIZE: u16 = 0x2183;
/// `PA_SC_VIZ_QUERY`: viz-query culling control read by the Draw Submitter.
pub const PA_SC_VIZ_QUERY: u16 = 0x2293;
/// `VIZ_QUERY_STATUS_0`: viz ids 0-31 visibility bits.
pub const VIZ_QUERY_STATUS_0: u16 = 0x2294;
/// `VIZ_QUERY_STATUS_1`: viz ids 32-63 visibility bits.
pub const VIZ_QUERY_STATUS_1: u16 = 0x2295;
/// `RB_SAMPLE_COUNT_ADDR`: guest address of the fake-occlusion sample
/// count structure read/written by `EVENT_WRITE_ZPD`.
pub const RB_SAMPLE_COUNT_ADDR: u16 = 0x2300;

const ALU_CONSTANT_BASE: u16 = 0x4000;
const ALU_CONSTANT_END: u16 = 0x4000 + 512;
const FETCH_CONSTANT_BASE: u16 = 0x4800;
const FETCH_CONSTANT_END: u16 = 0x4800 + 96;
const BOOL_CONSTANT_BASE: u16 = 0x4900;
const BOOL_CONSTANT_END: u16 = 0x4900 + 8;
const LOOP_CONSTANT_BASE: u16 = 0x4908;
const LOOP_CONSTANT_END: u16 = 0x4908 + 32;
const SHADER_CONSTANT_BASE: u16 = 0x2000;
const SHADER_CONSTANT_END: u16 = 0x2000 + 256;
const SCISSOR_BASE: u16 = 0x2100;
const SCISSOR_END: u16 = 0x2100 + 16;
const SWAP_BASE: u16 = 0x2180;
const SWAP_END: u16 = 0x2180 + 2;
const INTERRUPT_ACK: u16 = 0x0001;

/// Which side-effecting bank a register index falls into, if any.
///
/// `SET_CONSTANT`/`LOAD_ALU_CONSTANT` select a bank explicitly by a small
/// integer; this enum is shared between that explicit selection and the
/// generic `write()` path's implicit bank lookup, so both funnel through
/// one internal dispatch instead of one method per bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bank {
    /// ALU (shader float) constants.
    Alu,
    /// Texture/vertex fetch constants.
    Fetch,
    /// Boolean predicate constants.
    Bool,
    /// Loop-control constants.
    Loop,
    /// Plain register-range write (no dedicated bank).
    Registers,
}

impl Bank {
    /// Decode the bank selector used by `SET_CONSTANT`'s type field.
    #[must_use]
    pub const fn from_set_constant_type(type_field: u32) -> Self {
        match type_field {
            0 => Self::Alu,
            1 => Self::Fetch,
            2 => Self::Bool,
            3 => Self::Loop,
            _ => Self::Registers,
        }
    }
}

/// The GPU register file: a flat array of 32-bit slots plus side-effect
/// dispatch on write.
pub struct RegisterFile {
    values: Box<[u32; REGISTER_COUNT]>,
}

impl RegisterFile {
    /// Create a zeroed register file.
    #[must_use]
    pub fn new() -> Self {
        Self { values: Box::new([0; REGISTER_COUNT]) }
    }

    /// Read a register without triggering any side effect.
    #[must_use]
    pub fn read(&self, index: u16) -> u32 {
        self.values[index as usize % REGISTER_COUNT]
    }

    /// Read `COHER_STATUS_HOST`, first invoking `make_coherent` so any
    /// write still in flight on another thread becomes visible before the
    /// read.
    pub fn read_coherent(&self, hooks: &mut dyn RegisterHooks) -> u32 {
        hooks.make_coherent();
        self.read(COHER_STATUS_HOST)
    }

    /// Write a single register, storing the value and invoking any
    /// matching side-effect hook.
    pub fn write(&mut self, index: u16, value: u32, hooks: &mut dyn RegisterHooks) {
        self.values[index as usize % REGISTER_COUNT] = value;
        self.dispatch_side_effect(index, value, hooks);
    }

    /// Write `count` consecutive registers starting at `base` from `words`,
    /// equivalent to `count` individual `write()` calls in order. This is
    /// the single bulk-write entry point; it dispatches internally on the
    /// starting bank rather than exposing one method per bank.
    pub fn write_range(&mut self, base: u16, words: &[u32], hooks: &mut dyn RegisterHooks) {
        for (i, &word) in words.iter().enumerate() {
            let index = base.wrapping_add(i as u16);
            self.write(index, word, hooks);
        }
        self.notify_bank(base, words, hooks);
    }

    /// Write each of `words` into the single register `base`, in order
    /// (Type-0 `write_one` mode streaming repeated values into one
    /// register). The register's final value is the last word written;
    /// every write still dispatches its side effect, matching `count`
    /// individual `write()` calls.
    pub fn write_repeated_index(&mut self, base: u16, words: &[u32], hooks: &mut dyn RegisterHooks) {
        for &word in words {
            self.write(base, word, hooks);
        }
    }

    /// Write into an explicit bank (used by `SET_CONSTANT`/`LOAD_ALU_CONSTANT`,
    /// which select the bank by an explicit type field rather than by index
    /// range). `Bank::Registers` treats `base` as an absolute register index
    /// (the "generic register bank" of `SET_CONSTANT2`); the other banks
    /// treat it as an offset within that bank's dedicated window.
    pub fn write_bank(&mut self, bank: Bank, base: u16, words: &[u32], hooks: &mut dyn RegisterHooks) {
        if matches!(bank, Bank::Registers) {
            self.write_range(base, words, hooks);
            return;
        }
        let resolved_base = bank_base(bank) + base;
        for (i, &word) in words.iter().enumerate() {
            self.values[(resolved_base.wrapping_add(i as u16)) as usize % REGISTER_COUNT] = word;
        }
        notify_for_bank(bank, resolved_base, words, hooks);
    }

    fn dispatch_side_effect(&self, index: u16, value: u32, hooks: &mut dyn RegisterHooks) {
        match index {
            i if (SCISSOR_BASE..SCISSOR_END).contains(&i) => hooks.on_scissor_written(i, value),
            i if (SWAP_BASE..SWAP_END).contains(&i) => hooks.on_swap_register_written(i, value),
            INTERRUPT_ACK => hooks.on_interrupt_ack_written(value),
            _ => {}
        }
    }

    fn notify_bank(&self, base: u16, words: &[u32], hooks: &mut dyn RegisterHooks) {
        if (ALU_CONSTANT_BASE..ALU_CONSTANT_END).contains(&base) {
            hooks.on_alu_constants_written(base - ALU_CONSTANT_BASE, words);
        } else if (FETCH_CONSTANT_BASE..FETCH_CONSTANT_END).contains(&base) {
            hooks.on_fetch_constants_written(base - FETCH_CONSTANT_BASE, words);
        } else if (BOOL_CONSTANT_BASE..BOOL_CONSTANT_END).contains(&base) {
            hooks.on_bool_constants_written(base - BOOL_CONSTANT_BASE, words);
        } else if (LOOP_CONSTANT_BASE..LOOP_CONSTANT_END).contains(&base) {
            hooks.on_loop_constants_written(base - LOOP_CONSTANT_BASE, words);
        } else if (SHADER_CONSTANT_BASE..SHADER_CONSTANT_END).contains(&base) {
            hooks.on_shader_constants_written(base - SHADER_CONSTANT_BASE, words);
        }
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

const fn bank_base(bank: Bank) -> u16 {
    match bank {
        Bank::Alu => ALU_CONSTANT_BASE,
        Bank::Fetch => FETCH_CONSTANT_BASE,
        Bank::Bool => BOOL_CONSTANT_BASE,
        Bank::Loop => LOOP_CONSTANT_BASE,
        Bank::Registers => 0,
    }
}

fn notify_for_bank(bank: Bank, resolved_base: u16, words: &[u32], hooks: &mut dyn RegisterHooks) {
    match bank {
        Bank::Alu => hooks.on_alu_constants_written(resolved_base - ALU_CONSTANT_BASE, words),
        Bank::Fetch => hooks.on_fetch_constants_written(resolved_base - FETCH_CONSTANT_BASE, words),
        Bank::Bool => hooks.on_bool_constants_written(resolved_base - BOOL_CONSTANT_BASE, words),
        Bank::Loop => hooks.on_loop_constants_written(resolved_base - LOOP_CONSTANT_BASE, words),
        Bank::Registers => hooks.on_shader_constants_written(resolved_base - SHADER_CONSTANT_BASE, words),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingHooks {
        scissor_writes: Vec<(u16, u32)>,
        interrupt_acks: Vec<u32>,
        make_coherent_calls: u32,
    }

    impl RegisterHooks for RecordingHooks {
        fn make_coherent(&mut self) {
            self.make_coherent_calls += 1;
        }
        fn dispatch_interrupt(&mut self, _source: u32, _cpu: u32) {}
        fn on_alu_constants_written(&mut self, _base: u16, _words: &[u32]) {}
        fn on_fetch_constants_written(&mut self, _base: u16, _words: &[u32]) {}
        fn on_bool_constants_written(&mut self, _base: u16, _words: &[u32]) {}
        fn on_loop_constants_written(&mut self, _base: u16, _words: &[u32]) {}
        fn on_shader_constants_written(&mut self, _base: u16, _words: &[u32]) {}
        fn on_scissor_written(&mut self, index: u16, value: u32) {
            self.scissor_writes.push((index, value));
        }
        fn on_swap_register_written(&mut self, _index: u16, _value: u32) {}
        fn on_interrupt_ack_written(&mut self, value: u32) {
            self.interrupt_acks.push(value);
        }
    }

    #[test]
    fn write_then_read_round_trips() {
        let mut regs = RegisterFile::new();
        let mut hooks = RecordingHooks::default();
        regs.write(0x100, 0xAAAA, &mut hooks);
        assert_eq!(regs.read(0x100), 0xAAAA);
    }

    #[test]
    fn write_range_is_equivalent_to_n_individual_writes() {
        let mut a = RegisterFile::new();
        let mut b = RegisterFile::new();
        let mut hooks = RecordingHooks::default();
        a.write_range(0x10, &[1, 2, 3], &mut hooks);
        for (i, v) in [1u32, 2, 3].into_iter().enumerate() {
            b.write(0x10 + i as u16, v, &mut hooks);
        }
        for i in 0..3u16 {
            assert_eq!(a.read(0x10 + i), b.read(0x10 + i));
        }
    }

    #[test]
    fn write_repeated_index_keeps_last_word() {
        let mut regs = RegisterFile::new();
        let mut hooks = RecordingHooks::default();
        regs.write_repeated_index(0x200, &[0x11, 0x22, 0x77], &mut hooks);
        assert_eq!(regs.read(0x200), 0x77);
    }

    #[test]
    fn scissor_write_triggers_hook() {
        let mut regs = RegisterFile::new();
        let mut hooks = RecordingHooks::default();
        regs.write(SCISSOR_BASE, 0x1234, &mut hooks);
        assert_eq!(hooks.scissor_writes, vec![(SCISSOR_BASE, 0x1234)]);
    }

    #[test]
    fn interrupt_ack_triggers_hook() {
        let mut regs = RegisterFile::new();
        let mut hooks = RecordingHooks::default();
        regs.write(INTERRUPT_ACK, 0xFF, &mut hooks);
        assert_eq!(hooks.interrupt_acks, vec![0xFF]);
    }

    #[test]
    fn coherent_read_calls_make_coherent_first() {
        let mut regs = RegisterFile::new();
        let mut hooks = RecordingHooks::default();
        regs.write(COHER_STATUS_HOST, 0x1, &mut hooks);
        let value = regs.read_coherent(&mut hooks);
        assert_eq!(value, 0x1);
        assert_eq!(hooks.make_coherent_calls, 1);
    }
}
