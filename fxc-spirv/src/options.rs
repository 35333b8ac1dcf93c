//! Backend configuration surface. Plain struct, populated by
//! the embedder — no files, env vars, or CLI parsing here.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Options {
    /// SPIR-V minor version packed as `(major << 16) | (minor << 8)`.
    pub spirv_minor_version: u32,
    pub emit_debug_info: bool,
    pub auto_location_start: u32,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            spirv_minor_version: 1 << 16,
            emit_debug_info: true,
            auto_location_start: 10,
        }
    }
}
