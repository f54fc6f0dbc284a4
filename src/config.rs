//! Injected configuration.
//!
//! Occlusion-query faking and vsync behavior are captured here and handed
//! to `CommandProcessor::new`, rather than read out of process-wide
//! globals, so a single process can host more than one independently
//! configured interpreter.

/// Runtime configuration for a `CommandProcessor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pm4Config {
    /// Sample count `EVENT_WRITE_ZPD` fakes into `ZPass_A`/`Total_A` when it
    /// detects the occlusion-query sentinel.
    pub query_occlusion_fake_sample_count: u32,
    /// Whether `WAIT_REG_MEM` should treat `wait >= 0x100` as a real sleep
    /// (`true`) or fall back to yielding (`false`).
    pub vsync: bool,
}

impl Default for Pm4Config {
    fn default() -> Self {
        Self {
            query_occlusion_fake_sample_count: 1,
            vsync: true,
        }
    }
}
