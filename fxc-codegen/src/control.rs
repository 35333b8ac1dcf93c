//! Structured-control-flow hints passed from the frontend down to
//! `emit_if`/`emit_loop`/`emit_switch`.

bitflags::bitflags! {
    /// Mirrors SPIR-V's `SelectionControlMask`/`LoopControlMask` bit shapes;
    /// the SPIR-V backend maps these directly onto `OpSelectionMerge`'s and
    /// `OpLoopMerge`'s control operand, the HLSL backend onto
    /// `[flatten]`/`[branch]`/`[unroll]`/`[loop]` attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControlFlags: u32 {
        const NONE          = 0;
        const FLATTEN       = 0b0001;
        const DONT_FLATTEN  = 0b0010;
        const UNROLL        = 0b0100;
        const DONT_UNROLL   = 0b1000;
    }
}

pub type BlockId = u32;

#[derive(Clone, Debug, PartialEq)]
pub struct SwitchCase {
    pub literal: i32,
    pub target: BlockId,
}
