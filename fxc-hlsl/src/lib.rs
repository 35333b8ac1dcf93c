//! HLSL text backend.
//!
//! Follows the HLSL string assembly and entry-point naming conventions of
//! `gfx-rs/gfx`'s DX11 backend, which cross-compiles SPIR-V to HLSL via
//! `spirv_cross`; this backend emits HLSL directly from the same IR the
//! SPIR-V backend lowers, so it borrows the shape of the output, not the
//! cross-compilation step.

pub mod generator;
pub mod spelling;

pub use generator::HlslGenerator;
