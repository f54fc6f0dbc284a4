//! `WAIT_REG_MEM`, `REG_RMW`, `REG_TO_MEM`, `MEM_WRITE`, `COND_WRITE`: the
//! register/memory read-modify-write and polling opcodes.

use crate::error::Pm4Error;
use crate::opcode::wait_condition;
use crate::processor::CommandProcessor;
use crate::registers::COHER_STATUS_HOST;

/// Evaluate the three-bit comparison encoded in `wait_info & 0x7`.
fn compare(value: u32, reference: u32, condition: u32) -> bool {
    match condition {
        wait_condition::NEVER => false,
        wait_condition::LESS => value < reference,
        wait_condition::LESS_EQUAL => value <= reference,
        wait_condition::EQUAL => value == reference,
        wait_condition::NOT_EQUAL => value != reference,
        wait_condition::GREATER_EQUAL => value >= reference,
        wait_condition::GREATER => value > reference,
        _ => true,
    }
}

impl CommandProcessor {
    fn read_poll_source(&mut self, is_mem: bool, addr: u32) -> u32 {
        if is_mem {
            return self.read_guest_u32(addr);
        }
        let index = addr as u16;
        if index == COHER_STATUS_HOST {
            self.registers.read_coherent(self.hooks.as_mut())
        } else {
            self.registers.read(index)
        }
    }

    pub(crate) fn handle_wait_reg_mem(&mut self, words: &[u32]) -> Result<bool, Pm4Error> {
        let wait_info = words.first().copied().unwrap_or(0);
        let addr = words.get(1).copied().unwrap_or(0);
        let reference = words.get(2).copied().unwrap_or(0);
        let mask = words.get(3).copied().unwrap_or(0);
        let wait = words.get(4).copied().unwrap_or(0);

        let is_mem = wait_info & 0x10 != 0;
        let condition = wait_info & 0x7;

        loop {
            let value = self.read_poll_source(is_mem, addr) & mask;
            if compare(value, reference, condition) {
                return Ok(true);
            }
            if !self.wait.worker_running() {
                return Err(Pm4Error::WaitCancelled);
            }
            if wait >= 0x100 {
                self.wait.prepare_for_wait();
                if self.config.vsync {
                    self.wait.sleep_ms(wait / 0x100);
                } else {
                    self.wait.yield_now();
                }
                self.wait.return_from_wait();
            } else {
                self.wait.yield_now();
            }
        }
    }

    pub(crate) fn handle_reg_rmw(&mut self, words: &[u32]) -> bool {
        let info = words.first().copied().unwrap_or(0);
        let and_operand = words.get(1).copied().unwrap_or(0);
        let or_operand = words.get(2).copied().unwrap_or(0);

        let index = (info & 0x1FFF) as u16;
        let mut value = self.registers.read(index);

        let and_val = if info >> 31 != 0 { self.registers.read((and_operand & 0x1FFF) as u16) } else { and_operand };
        value &= and_val;

        let or_val = if (info >> 30) & 1 != 0 { self.registers.read((or_operand & 0x1FFF) as u16) } else { or_operand };
        value |= or_val;

        self.registers.write(index, value, self.hooks.as_mut());
        true
    }

    pub(crate) fn handle_reg_to_mem(&mut self, words: &[u32]) -> bool {
        let index = words.first().copied().unwrap_or(0) as u16;
        let addr = words.get(1).copied().unwrap_or(0);
        let value = self.registers.read(index);
        self.write_guest_u32(addr, value);
        true
    }

    pub(crate) fn handle_mem_write(&mut self, words: &[u32]) -> bool {
        let Some((&base, payload)) = words.split_first() else {
            return true;
        };
        for (i, &word) in payload.iter().enumerate() {
            self.write_guest_u32(base.wrapping_add(i as u32 * 4), word);
        }
        true
    }

    pub(crate) fn handle_cond_write(&mut self, words: &[u32]) -> bool {
        let wait_info = words.first().copied().unwrap_or(0);
        let poll_addr = words.get(1).copied().unwrap_or(0);
        let reference = words.get(2).copied().unwrap_or(0);
        let mask = words.get(3).copied().unwrap_or(0);
        let write_addr = words.get(4).copied().unwrap_or(0);
        let write_data = words.get(5).copied().unwrap_or(0);

        let poll_is_mem = wait_info & 0x10 != 0;
        let write_is_mem = wait_info & 0x100 != 0;
        let condition = wait_info & 0x7;

        let value = self.read_poll_source(poll_is_mem, poll_addr) & mask;
        if !compare(value, reference, condition) {
            return true;
        }
        if write_is_mem {
            self.write_guest_u32(write_addr, write_data);
        } else {
            self.registers.write(write_addr as u16, write_data, self.hooks.as_mut());
        }
        true
    }
}
