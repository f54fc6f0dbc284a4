//! `EVENT_WRITE` and its `_SHD`/`_EXT`/`_ZPD` variants, plus `VIZ_QUERY`.

use crate::processor::CommandProcessor;
use crate::registers::{RB_SAMPLE_COUNT_ADDR, VGT_EVENT_INITIATOR, VIZ_QUERY_STATUS_0, VIZ_QUERY_STATUS_1};

/// Fake occlusion-query sentinel the guest writes to request a fresh count.
const ZPD_SENTINEL: u32 = 0xFFFF_FEED;

/// Hard-coded full-texture-bounds screen extent written by `EVENT_WRITE_EXT`.
const FULL_SCREEN_EXTENT: [u16; 6] = [0, 0, 0x2000, 0x2000, 0, 0x2000];

const VIZQUERY_START: u32 = 0x0F;
const VIZQUERY_END: u32 = 0x10;

impl CommandProcessor {
    pub(crate) fn handle_event_write(&mut self, words: &[u32]) -> bool {
        let payload = words.first().copied().unwrap_or(0);
        self.registers.write(VGT_EVENT_INITIATOR, payload & 0x3F, self.hooks.as_mut());
        if words.len() > 1 {
            debug_assert!(false, "EVENT_WRITE with count > 1: undocumented hardware behavior");
            tracing::warn!(count = words.len(), "EVENT_WRITE with extra payload; skipping it");
        }
        true
    }

    pub(crate) fn handle_event_write_shd(&mut self, words: &[u32]) -> bool {
        let addr = words.first().copied().unwrap_or(0);
        let use_supplied_value = words.get(1).copied().unwrap_or(0) != 0;
        let supplied_value = words.get(2).copied().unwrap_or(0);
        let value = if use_supplied_value { supplied_value } else { self.frame_counter as u32 };
        self.write_guest_u32(addr, value);
        true
    }

    pub(crate) fn handle_event_write_ext(&mut self, words: &[u32]) -> bool {
        let addr = words.first().copied().unwrap_or(0);
        debug_assert_eq!(addr & 0x3, 0x1, "EVENT_WRITE_EXT requires k8in16 address encoding");
        for (i, pair) in FULL_SCREEN_EXTENT.chunks_exact(2).enumerate() {
            let packed = (u32::from(pair[0]) << 16) | u32::from(pair[1]);
            self.write_guest_u32(addr.wrapping_add((i as u32) * 4), packed);
        }
        true
    }

    pub(crate) fn handle_event_write_zpd(&mut self, _words: &[u32]) -> bool {
        let struct_addr = self.registers.read(RB_SAMPLE_COUNT_ADDR);
        let zpass_a = self.read_guest_u32(struct_addr);
        let zpass_b = self.read_guest_u32(struct_addr.wrapping_add(4));
        let zfail_a = self.read_guest_u32(struct_addr.wrapping_add(8));
        let zfail_b = self.read_guest_u32(struct_addr.wrapping_add(12));

        if [zpass_a, zpass_b, zfail_a, zfail_b].contains(&ZPD_SENTINEL) {
            for offset in (0..24).step_by(4) {
                self.write_guest_u32(struct_addr.wrapping_add(offset), 0);
            }
            let fake_count = self.config.query_occlusion_fake_sample_count;
            self.write_guest_u32(struct_addr, fake_count);
            self.write_guest_u32(struct_addr.wrapping_add(16), fake_count);
        }
        true
    }

    pub(crate) fn handle_viz_query(&mut self, words: &[u32]) -> bool {
        let info = words.first().copied().unwrap_or(0);
        let id = info & 0x3F;
        let end = (info >> 6) & 1 != 0;

        if !end {
            self.registers.write(VGT_EVENT_INITIATOR, VIZQUERY_START, self.hooks.as_mut());
            return true;
        }

        self.registers.write(VGT_EVENT_INITIATOR, VIZQUERY_END, self.hooks.as_mut());
        let (status_reg, bit) = if id < 32 { (VIZ_QUERY_STATUS_0, id) } else { (VIZ_QUERY_STATUS_1, id - 32) };
        let current = self.registers.read(status_reg);
        self.registers.write(status_reg, current | (1 << bit), self.hooks.as_mut());
        true
    }
}
