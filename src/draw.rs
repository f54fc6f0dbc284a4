//! Draw Submitter (C8): turns `VGT_DRAW_INITIATOR` plus the DMA/immediate
//! register state into one `RenderBackend::issue_draw` call.

use crate::backend::{IndexBufferInfo, IndexFormat, PrimitiveType, SourceSelect};
use crate::memory::Endianness;
use crate::processor::CommandProcessor;
use crate::registers::{PA_SC_VIZ_QUERY, VGT_DMA_BASE, VGT_DMA_SIZE, VGT_DRAW_INITIATOR};

const PRIM_TYPE_MASK: u32 = 0x3f;
const SOURCE_SELECT_SHIFT: u32 = 6;
const SOURCE_SELECT_MASK: u32 = 0x3;
const MAJOR_MODE_SHIFT: u32 = 14;
const MAJOR_MODE_MASK: u32 = 0x3;
const VIZ_QUERY_ENA_BIT: u32 = 1 << 0;
const KILL_PIX_POST_HI_Z_BIT: u32 = 1 << 1;

fn decode_primitive_type(bits: u32) -> PrimitiveType {
    match bits & PRIM_TYPE_MASK {
        0 => PrimitiveType::PointList,
        1 => PrimitiveType::LineList,
        2 => PrimitiveType::LineStrip,
        3 => PrimitiveType::TriangleList,
        4 => PrimitiveType::TriangleFan,
        5 => PrimitiveType::TriangleStrip,
        6 => PrimitiveType::QuadList,
        _ => PrimitiveType::RectangleList,
    }
}

fn decode_source_select(initiator: u32) -> SourceSelect {
    match (initiator >> SOURCE_SELECT_SHIFT) & SOURCE_SELECT_MASK {
        0 => SourceSelect::Dma,
        1 => SourceSelect::Immediate,
        2 => SourceSelect::AutoIndex,
        _ => SourceSelect::Invalid,
    }
}

impl CommandProcessor {
    /// Build the DMA-sourced `IndexBufferInfo` from `VGT_DMA_BASE`/`VGT_DMA_SIZE`.
    ///
    /// `VGT_DMA_SIZE` bit 0 selects the index format; the remaining bits are
    /// the index count. `guest_base` is masked to the index size's
    /// alignment, and the byte-swap mode is decoded from its own low bits
    /// before masking.
    fn dma_index_buffer_info(&self) -> IndexBufferInfo {
        let base = self.registers.read(VGT_DMA_BASE);
        let size = self.registers.read(VGT_DMA_SIZE);
        let endianness = Endianness::from_addr_bits(base);
        let format = if size & 1 != 0 { IndexFormat::U32 } else { IndexFormat::U16 };
        let count = size >> 1;
        let element_size = match format {
            IndexFormat::U16 => 2,
            IndexFormat::U32 => 4,
        };
        let align_mask = !(element_size - 1);
        IndexBufferInfo {
            guest_base: base & !0x3 & align_mask,
            endianness,
            format,
            length: count * element_size,
            count,
        }
    }

    /// Submit the draw described by the current `VGT_DRAW_INITIATOR` value,
    /// after culling on viz-query state. Always returns `true`: a backend
    /// failure is logged, not propagated.
    pub(crate) fn submit_draw(&mut self, num_indices: u32) -> bool {
        let initiator = self.registers.read(VGT_DRAW_INITIATOR);
        let prim = decode_primitive_type(initiator);
        let source_select = decode_source_select(initiator);
        let major_mode_explicit = (initiator >> MAJOR_MODE_SHIFT) & MAJOR_MODE_MASK == 1;

        let index_info = match source_select {
            SourceSelect::Dma => Some(self.dma_index_buffer_info()),
            SourceSelect::AutoIndex => None,
            SourceSelect::Immediate => {
                tracing::warn!("immediate-indexed draws are unsupported; dropping draw");
                return true;
            }
            SourceSelect::Invalid => {
                tracing::warn!("invalid VGT_DRAW_INITIATOR source select");
                return true;
            }
        };

        let viz = self.registers.read(PA_SC_VIZ_QUERY);
        let culled = viz & VIZ_QUERY_ENA_BIT != 0 && viz & KILL_PIX_POST_HI_Z_BIT != 0;
        if culled {
            tracing::debug!("draw culled by viz query");
            return true;
        }

        let effective_count = match source_select {
            SourceSelect::Dma => index_info.map_or(num_indices, |info| info.count),
            _ => num_indices,
        };

        if !self.backend.issue_draw(prim, effective_count, index_info, major_mode_explicit) {
            tracing::warn!("backend draw failed; dropping this draw only");
        }
        true
    }
}
