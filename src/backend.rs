//! External collaborators.
//!
//! The interpreter core never touches a renderer, shader compiler, or
//! physical memory map directly — it calls through these traits so the
//! embedding application can supply real backends (and tests can supply
//! recording fakes).

/// Primitive topology, decoded from `VGT_DRAW_INITIATOR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    PointList,
    LineList,
    LineStrip,
    TriangleList,
    TriangleFan,
    TriangleStrip,
    QuadList,
    RectangleList,
}

/// Index-buffer source selector, the low bits of `VGT_DRAW_INITIATOR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSelect {
    /// Indexed draw whose indices stream from guest memory via DMA.
    Dma,
    /// Non-indexed draw (vertex index is just 0..count).
    AutoIndex,
    /// Indices embedded directly in the command stream (unsupported).
    Immediate,
    /// Reserved/invalid encoding.
    Invalid,
}

/// Index format for a DMA-sourced draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    /// 16-bit indices.
    U16,
    /// 32-bit indices.
    U32,
}

/// Everything the Draw Submitter (C8) needs to describe an indexed draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBufferInfo {
    /// Guest-physical base address of the index buffer, masked to the
    /// index format's alignment.
    pub guest_base: u32,
    /// Byte-swap mode encoded in the DMA base address.
    pub endianness: crate::memory::Endianness,
    /// Index element format.
    pub format: IndexFormat,
    /// Total index buffer length in bytes.
    pub length: u32,
    /// Number of indices.
    pub count: u32,
}

/// Which shader slot an `IM_LOAD`/`IM_LOAD_IMMEDIATE` targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderType {
    Vertex,
    Pixel,
}

/// Opaque handle returned by the shader loader, retained by the dispatcher
/// in its "active vertex"/"active pixel" slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderHandle(pub u64);

/// Rendering backend: swap presentation and draw submission.
pub trait RenderBackend {
    /// Present `frontbuffer_ptr` (a guest-physical address) as a `width` x
    /// `height` frame.
    fn issue_swap(&mut self, frontbuffer_ptr: u32, width: u32, height: u32);

    /// Submit a draw call. Returns `false` on backend failure; the caller
    /// logs this but does not abort the command stream.
    fn issue_draw(
        &mut self,
        prim: PrimitiveType,
        num_indices: u32,
        index_info: Option<IndexBufferInfo>,
        major_mode_explicit: bool,
    ) -> bool;
}

/// Shader loader/translator.
pub trait ShaderLoader {
    /// Load a shader of `kind` either from `guest_addr` in guest memory
    /// (`host_ptr` is `None`) or from bytes embedded directly in the
    /// packet (`host_ptr` is `Some`).
    fn load_shader(
        &mut self,
        kind: ShaderType,
        guest_addr: u32,
        host_bytes: Option<&[u32]>,
        size_dwords: u32,
    ) -> ShaderHandle;
}

/// Side effects triggered by writes into specific register-file ranges,
/// plus the coherence and interrupt callbacks a register write can
/// trigger.
pub trait RegisterHooks {
    /// Force any pending writes visible to the command thread to become
    /// visible to other observers before a `COHER_STATUS_HOST` read.
    fn make_coherent(&mut self);
    /// Raise an interrupt line. `source` and `cpu` mirror the hardware's
    /// `INTERRUPT` packet fields.
    fn dispatch_interrupt(&mut self, source: u32, cpu: u32);
    /// ALU (shader float) constant bank was written.
    fn on_alu_constants_written(&mut self, base: u16, words: &[u32]);
    /// Texture/vertex fetch constant bank was written.
    fn on_fetch_constants_written(&mut self, base: u16, words: &[u32]);
    /// Boolean predicate constant bank was written.
    fn on_bool_constants_written(&mut self, base: u16, words: &[u32]);
    /// Loop-control constant bank was written.
    fn on_loop_constants_written(&mut self, base: u16, words: &[u32]);
    /// Generic shader constant registers were written.
    fn on_shader_constants_written(&mut self, base: u16, words: &[u32]);
    /// A scissor register was written.
    fn on_scissor_written(&mut self, index: u16, value: u32);
    /// A swap-control register was written.
    fn on_swap_register_written(&mut self, index: u16, value: u32);
    /// The interrupt-acknowledge register was written.
    fn on_interrupt_ack_written(&mut self, value: u32);
}

/// Cooperative-wait primitives injected into `WAIT_REG_MEM`.
pub trait WaitPrimitives {
    /// Called once before the first sleep/yield of a wait loop.
    fn prepare_for_wait(&mut self);
    /// Called once after the wait loop resolves.
    fn return_from_wait(&mut self);
    /// Sleep for approximately `millis` milliseconds.
    fn sleep_ms(&mut self, millis: u32);
    /// Yield the current timeslice without a fixed delay.
    fn yield_now(&mut self);
    /// Whether the owning worker is still meant to be running. `WAIT_REG_MEM`
    /// aborts with `Pm4Error::WaitCancelled` once this returns `false`.
    fn worker_running(&self) -> bool;
}
