//! Opcode Handlers (C7): one method per Type-3 opcode, grouped into
//! submodules by concern and reached through [`dispatch_opcode`]'s match.

mod bin;
mod constants;
mod control;
mod draw_indx;
mod events;
mod memory_ops;
mod shaders;

use crate::error::Pm4Error;
use crate::opcode;
use crate::processor::CommandProcessor;

/// The opcode switch proper. All payload words have already been read from
/// the ring by the caller (`CommandProcessor::read_payload_words`); handlers
/// only interpret `words`, never read the ring themselves (the one
/// exception, `INDIRECT_BUFFER`, reads a nested stream from a *different*
/// reader it installs itself).
pub(crate) fn dispatch_opcode(cp: &mut CommandProcessor, opc: u8, count: u16) -> Result<bool, Pm4Error> {
    let words = cp.read_payload_words(count);
    match opc {
        opcode::ME_INIT => Ok(cp.handle_me_init(&words)),
        opcode::NOP => Ok(true),
        opcode::INTERRUPT => Ok(cp.handle_interrupt(&words)),
        opcode::XE_SWAP => Ok(cp.handle_xe_swap(&words)),
        opcode::INDIRECT_BUFFER | opcode::INDIRECT_BUFFER_PFD => cp.handle_indirect_buffer(&words),
        opcode::WAIT_REG_MEM => cp.handle_wait_reg_mem(&words),
        opcode::REG_RMW => Ok(cp.handle_reg_rmw(&words)),
        opcode::REG_TO_MEM => Ok(cp.handle_reg_to_mem(&words)),
        opcode::MEM_WRITE => Ok(cp.handle_mem_write(&words)),
        opcode::COND_WRITE => Ok(cp.handle_cond_write(&words)),
        opcode::EVENT_WRITE => Ok(cp.handle_event_write(&words)),
        opcode::EVENT_WRITE_SHD => Ok(cp.handle_event_write_shd(&words)),
        opcode::EVENT_WRITE_EXT => Ok(cp.handle_event_write_ext(&words)),
        opcode::EVENT_WRITE_ZPD => Ok(cp.handle_event_write_zpd(&words)),
        opcode::DRAW_INDX => Ok(cp.handle_draw_indx(&words)),
        opcode::DRAW_INDX_2 => Ok(cp.handle_draw_indx_2(&words)),
        opcode::SET_CONSTANT => Ok(cp.handle_set_constant(&words)),
        opcode::SET_CONSTANT2 => Ok(cp.handle_set_constant2(&words)),
        opcode::LOAD_ALU_CONSTANT => Ok(cp.handle_load_alu_constant(&words)),
        opcode::SET_SHADER_CONSTANTS => Ok(cp.handle_set_shader_constants(&words)),
        opcode::IM_LOAD => Ok(cp.handle_im_load(&words)),
        opcode::IM_LOAD_IMMEDIATE => Ok(cp.handle_im_load_immediate(&words)),
        opcode::INVALIDATE_STATE => Ok(true),
        opcode::VIZ_QUERY => Ok(cp.handle_viz_query(&words)),
        opcode::SET_BIN_MASK_LO => Ok(cp.handle_set_bin_mask_lo(&words)),
        opcode::SET_BIN_MASK_HI => Ok(cp.handle_set_bin_mask_hi(&words)),
        opcode::SET_BIN_SELECT_LO => Ok(cp.handle_set_bin_select_lo(&words)),
        opcode::SET_BIN_SELECT_HI => Ok(cp.handle_set_bin_select_hi(&words)),
        opcode::SET_BIN_MASK => Ok(cp.handle_set_bin_mask(&words)),
        opcode::SET_BIN_SELECT => Ok(cp.handle_set_bin_select(&words)),
        opcode::CONTEXT_UPDATE => Ok(cp.handle_context_update(&words)),
        opcode::WAIT_FOR_IDLE => Ok(cp.handle_wait_for_idle(&words)),
        other => {
            tracing::warn!(opcode = format_args!("{other:#04x}"), "unknown PM4 opcode");
            Err(Pm4Error::UnknownOpcode(other))
        }
    }
}
