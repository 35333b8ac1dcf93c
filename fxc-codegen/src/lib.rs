//! The backend-neutral code-generator contract.
//!
//! Concrete backends (`fxc-spirv`, `fxc-hlsl`) implement [`CodeGenerator`]
//! directly rather than inheriting from a shared base object, per the
//! source's design note to prefer explicit capability dispatch over runtime
//! inheritance — the trait *is* that capability table.

pub mod control;
pub mod op;
pub mod semantic;

pub use control::{BlockId, ControlFlags, SwitchCase};
pub use op::{BinaryOp, Intrinsic, UnaryOp};
pub use semantic::{Builtin, Semantic};

use fxc_ir::descriptor::{
    FunctionId, Parameter, SamplerDescriptor, StructId, StructMember, TechniqueDescriptor,
    TextureDescriptor, UniformId,
};
use fxc_ir::expr::{Expr, ValueId};
use fxc_ir::locator::DescriptorBinding;
use fxc_ir::{Constant, Type};

/// The events a frontend drives during lowering. `Module` is the
/// backend-specific artifact produced by [`CodeGenerator::write_result`]
/// (a SPIR-V word vector, or an HLSL source string).
pub trait CodeGenerator {
    type Module;

    fn define_struct(&mut self, name: Option<&str>, members: &[StructMember]) -> StructId;
    fn define_texture(&mut self, desc: &TextureDescriptor);
    fn define_sampler(&mut self, desc: &SamplerDescriptor);
    /// Lays the uniform out inside the module's global uniform block and
    /// returns the block's binding plus the member's byte offset.
    fn define_uniform(
        &mut self,
        name: &str,
        ty: Type,
        initializer: Option<&Constant>,
    ) -> (UniformId, DescriptorBinding, u32);
    fn define_variable(&mut self, name: &str, ty: Type) -> ValueId;
    fn define_parameter(&mut self, param: &Parameter) -> ValueId;
    fn define_function(
        &mut self,
        name: &str,
        params: &[Parameter],
        return_ty: Type,
    ) -> FunctionId;
    fn define_technique(&mut self, technique: &TechniqueDescriptor);

    /// Wraps a user function as a stage entry point.
    fn create_entry_point(&mut self, func: FunctionId, is_pixel_stage: bool) -> FunctionId;

    fn emit_constant(&mut self, value: &Constant) -> ValueId;
    fn emit_unary_op(&mut self, op: UnaryOp, operand: ValueId, ty: Type) -> ValueId;
    fn emit_binary_op(&mut self, op: BinaryOp, lhs: ValueId, rhs: ValueId, ty: Type) -> ValueId;
    fn emit_ternary_op(&mut self, cond: ValueId, t: ValueId, f: ValueId, ty: Type) -> ValueId;
    fn emit_phi(&mut self, ty: Type, incoming: &[(ValueId, BlockId)]) -> ValueId;
    fn emit_call(&mut self, func: FunctionId, args: &[ValueId]) -> ValueId;
    fn emit_call_intrinsic(&mut self, intrinsic: Intrinsic, args: &[ValueId], ty: Type) -> ValueId;
    fn emit_construct(&mut self, ty: Type, components: &[ValueId]) -> ValueId;

    fn emit_load(&mut self, chain: &Expr) -> ValueId;
    fn emit_store(&mut self, chain: &Expr, value: ValueId, value_ty: Type);

    fn set_block(&mut self, block: BlockId);
    fn enter_block(&mut self, block: BlockId);
    fn leave_block_and_branch(&mut self, target: BlockId);
    fn leave_block_and_branch_conditional(
        &mut self,
        cond: ValueId,
        true_block: BlockId,
        false_block: BlockId,
    );
    fn leave_block_and_switch(&mut self, selector: ValueId, default: BlockId, cases: &[SwitchCase]);
    fn leave_block_and_return(&mut self, value: Option<ValueId>);
    fn leave_block_and_kill(&mut self);

    fn emit_if(&mut self, merge: BlockId, control: ControlFlags);
    fn emit_loop(&mut self, merge: BlockId, continue_target: BlockId, control: ControlFlags);
    fn emit_switch(&mut self, merge: BlockId);

    fn enter_function(&mut self, func: FunctionId);
    fn leave_function(&mut self);

    fn write_result(self) -> Self::Module;
}
