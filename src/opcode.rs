//! Type-3 opcode encodings.
//!
//! These are plain `u8` constants rather than a closed enum: the dispatcher
//! (`dispatch.rs`) matches on the raw decoded byte and falls through to the
//! unknown-opcode path for anything not listed here, which an enum's
//! exhaustiveness checking would only get in the way of.

pub const ME_INIT: u8 = 0x48;
pub const NOP: u8 = 0x10;
pub const INTERRUPT: u8 = 0x40;
pub const XE_SWAP: u8 = 0x43;
pub const INDIRECT_BUFFER: u8 = 0x3f;
pub const INDIRECT_BUFFER_PFD: u8 = 0x37;
pub const WAIT_REG_MEM: u8 = 0x3c;
pub const REG_RMW: u8 = 0x21;
pub const REG_TO_MEM: u8 = 0x3e;
pub const MEM_WRITE: u8 = 0x3d;
pub const COND_WRITE: u8 = 0x45;
pub const EVENT_WRITE: u8 = 0x46;
pub const EVENT_WRITE_SHD: u8 = 0x58;
pub const EVENT_WRITE_EXT: u8 = 0x59;
pub const EVENT_WRITE_ZPD: u8 = 0x5d;
pub const DRAW_INDX: u8 = 0x22;
pub const DRAW_INDX_2: u8 = 0x36;
pub const SET_CONSTANT: u8 = 0x2d;
pub const SET_CONSTANT2: u8 = 0x55;
pub const LOAD_ALU_CONSTANT: u8 = 0x2f;
pub const SET_SHADER_CONSTANTS: u8 = 0x4d;
pub const IM_LOAD: u8 = 0x27;
pub const IM_LOAD_IMMEDIATE: u8 = 0x2b;
pub const INVALIDATE_STATE: u8 = 0x3b;
pub const VIZ_QUERY: u8 = 0x23;
pub const SET_BIN_MASK_LO: u8 = 0x50;
pub const SET_BIN_MASK_HI: u8 = 0x51;
pub const SET_BIN_SELECT_LO: u8 = 0x52;
pub const SET_BIN_SELECT_HI: u8 = 0x53;
pub const SET_BIN_MASK: u8 = 0x4a;
pub const SET_BIN_SELECT: u8 = 0x4b;
pub const CONTEXT_UPDATE: u8 = 0x5e;
pub const WAIT_FOR_IDLE: u8 = 0x26;

/// Fixed signature word `XE_SWAP`'s first payload word must match.
pub const XE_SWAP_SIGNATURE: u32 = 0x0000_0002;

/// Condition codes for `WAIT_REG_MEM`/`COND_WRITE`'s `wait_info & 0x7`.
pub mod wait_condition {
    pub const NEVER: u32 = 0;
    pub const LESS: u32 = 1;
    pub const LESS_EQUAL: u32 = 2;
    pub const EQUAL: u32 = 3;
    pub const NOT_EQUAL: u32 = 4;
    pub const GREATER_EQUAL: u32 = 5;
    pub const GREATER: u32 = 6;
    pub const ALWAYS: u32 = 7;
}
