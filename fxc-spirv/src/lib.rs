//! SPIR-V binary backend.
//!
//! Combines `spirq_core::parse::instr`'s `InstructionBuilder` shape for
//! word-stream encoding, `spirq_core::parse::bin`'s `SpirvHeader` for the
//! module header, `spirq::ty`'s type model for the interner this backend
//! builds against, and `ennis_autograph_ng::spirv::ast`'s std140 layout
//! builder for the `$Globals` block.

pub mod builder;
pub mod generator;
pub mod header;
pub mod interner;
pub mod layout;
pub mod options;

pub use builder::InstructionBuilder;
pub use generator::{SpirvGenerator, SpirvModule};
pub use header::SpirvHeader;
pub use options::Options;
