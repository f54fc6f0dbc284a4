//! `DRAW_INDX` / `DRAW_INDX_2`: consume the draw-initiator payload and hand
//! off to the draw submitter (`src/draw.rs`).

use crate::processor::CommandProcessor;
use crate::registers::VGT_DRAW_INITIATOR;

impl CommandProcessor {
    /// `DRAW_INDX`: `[viz_query_condition, draw_initiator, num_indices?]`.
    /// `num_indices` is only present (and only used) for auto-indexed draws;
    /// DMA-sourced draws take their count from `VGT_DMA_SIZE`.
    pub(crate) fn handle_draw_indx(&mut self, words: &[u32]) -> bool {
        let draw_initiator = words.get(1).copied().unwrap_or(0);
        self.registers.write(VGT_DRAW_INITIATOR, draw_initiator, self.hooks.as_mut());
        let num_indices = words.get(2).copied().unwrap_or(0);
        self.submit_draw(num_indices)
    }

    /// `DRAW_INDX_2`: `[draw_initiator, num_indices]`, always auto-indexed.
    pub(crate) fn handle_draw_indx_2(&mut self, words: &[u32]) -> bool {
        let draw_initiator = words.first().copied().unwrap_or(0);
        self.registers.write(VGT_DRAW_INITIATOR, draw_initiator, self.hooks.as_mut());
        let num_indices = words.get(1).copied().unwrap_or(0);
        self.submit_draw(num_indices)
    }
}
