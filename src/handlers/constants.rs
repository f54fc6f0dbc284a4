//! `SET_CONSTANT`, `SET_CONSTANT2`, `LOAD_ALU_CONSTANT`, and
//! `SET_SHADER_CONSTANTS`: the bulk constant-bank writers.

use crate::processor::CommandProcessor;
use crate::registers::Bank;

/// Decode `{index: 11, type: 8}` packed into a `SET_CONSTANT`/
/// `LOAD_ALU_CONSTANT` selector word.
fn decode_bank_selector(word: u32) -> (u16, Bank) {
    let index = (word & 0x7FF) as u16;
    let type_field = (word >> 16) & 0xFF;
    (index, Bank::from_set_constant_type(type_field))
}

impl CommandProcessor {
    pub(crate) fn handle_set_constant(&mut self, words: &[u32]) -> bool {
        let Some((&selector, payload)) = words.split_first() else {
            return true;
        };
        let (index, bank) = decode_bank_selector(selector);
        self.registers.write_bank(bank, index, payload, self.hooks.as_mut());
        true
    }

    pub(crate) fn handle_set_constant2(&mut self, words: &[u32]) -> bool {
        let Some((&selector, payload)) = words.split_first() else {
            return true;
        };
        let index = (selector & 0xFFFF) as u16;
        self.registers.write_bank(Bank::Registers, index, payload, self.hooks.as_mut());
        true
    }

    pub(crate) fn handle_load_alu_constant(&mut self, words: &[u32]) -> bool {
        let guest_addr = words.first().copied().unwrap_or(0) & 0x3FFF_FFFF;
        let selector = words.get(1).copied().unwrap_or(0);
        let size_dwords = words.get(2).copied().unwrap_or(0) & 0xFFF;
        let (index, bank) = decode_bank_selector(selector);

        let loaded: Vec<u32> =
            (0..size_dwords).map(|i| self.read_guest_u32(guest_addr.wrapping_add(i * 4))).collect();
        self.registers.write_bank(bank, index, &loaded, self.hooks.as_mut());
        true
    }

    pub(crate) fn handle_set_shader_constants(&mut self, words: &[u32]) -> bool {
        let Some((&base_word, payload)) = words.split_first() else {
            return true;
        };
        let base = (base_word & 0xFFFF) as u16;
        self.registers.write_range(base, payload, self.hooks.as_mut());
        true
    }
}
