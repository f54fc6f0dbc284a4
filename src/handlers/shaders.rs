//! `IM_LOAD` / `IM_LOAD_IMMEDIATE`: shader load into the active vertex/pixel
//! slot.

use crate::backend::ShaderType;
use crate::processor::CommandProcessor;

fn decode_shader_type(word: u32) -> ShaderType {
    if word & 1 == 0 {
        ShaderType::Vertex
    } else {
        ShaderType::Pixel
    }
}

impl CommandProcessor {
    pub(crate) fn handle_im_load(&mut self, words: &[u32]) -> bool {
        let kind = decode_shader_type(words.first().copied().unwrap_or(0));
        let guest_addr = words.get(1).copied().unwrap_or(0);
        let size_dwords = words.get(2).copied().unwrap_or(0);
        let handle = self.shaders.load_shader(kind, guest_addr, None, size_dwords);
        self.store_active_shader(kind, handle);
        true
    }

    pub(crate) fn handle_im_load_immediate(&mut self, words: &[u32]) -> bool {
        let kind = decode_shader_type(words.first().copied().unwrap_or(0));
        let size_dwords = words.get(1).copied().unwrap_or(0);
        let embedded = words.get(2..).unwrap_or(&[]);
        let handle = self.shaders.load_shader(kind, 0, Some(embedded), size_dwords);
        self.store_active_shader(kind, handle);
        true
    }

    fn store_active_shader(&mut self, kind: ShaderType, handle: crate::backend::ShaderHandle) {
        match kind {
            ShaderType::Vertex => self.active_vertex_shader = Some(handle),
            ShaderType::Pixel => self.active_pixel_shader = Some(handle),
        }
    }
}
