//! HLSL token spellings for types, operators and intrinsics.
//!
//! A separate table from the SPIR-V backend's opcode dispatch in
//! `fxc-spirv::generator`, because the same [`fxc_codegen::Intrinsic`] or
//! [`fxc_codegen::BinaryOp`] maps to an HLSL *token*, not an opcode selected
//! by operand type.

use fxc_codegen::{BinaryOp, Intrinsic, UnaryOp};
use fxc_ir::ty::{BaseType, Type};

pub fn type_name(ty: &Type) -> String {
    if ty.base == BaseType::Texture {
        return "Texture2D".to_string();
    }
    if ty.base == BaseType::Sampler {
        return "SamplerState".to_string();
    }
    let scalar = match ty.base {
        BaseType::Void => return "void".to_string(),
        BaseType::Bool => "bool",
        BaseType::Int => "int",
        BaseType::Uint => "uint",
        BaseType::Float => "float",
        BaseType::Struct => "struct",
        BaseType::String => "string",
        BaseType::Texture | BaseType::Sampler => unreachable!(),
    };
    let mut name = scalar.to_string();
    if ty.is_matrix() {
        name.push_str(&format!("{}x{}", ty.rows, ty.cols));
    } else if ty.is_vector() {
        name.push_str(&ty.rows.to_string());
    }
    name
}

pub fn unary_token(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Neg => "-",
        UnaryOp::Not => "!",
        UnaryOp::BitNot => "~",
        UnaryOp::PreInc | UnaryOp::PostInc => "++",
        UnaryOp::PreDec | UnaryOp::PostDec => "--",
    }
}

pub fn binary_token(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Rem => "%",
        BinaryOp::BitAnd => "&",
        BinaryOp::BitOr => "|",
        BinaryOp::BitXor => "^",
        BinaryOp::Shl => "<<",
        BinaryOp::Shr => ">>",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
        BinaryOp::Eq => "==",
        BinaryOp::Ne => "!=",
        BinaryOp::Lt => "<",
        BinaryOp::Le => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::Ge => ">=",
    }
}

pub fn intrinsic_name(intrinsic: Intrinsic) -> &'static str {
    match intrinsic {
        Intrinsic::Abs => "abs",
        Intrinsic::Saturate => "saturate",
        Intrinsic::Clamp => "clamp",
        Intrinsic::Lerp => "lerp",
        Intrinsic::Dot => "dot",
        Intrinsic::Cross => "cross",
        Intrinsic::Normalize => "normalize",
        Intrinsic::Mul => "mul",
        Intrinsic::Sample => "Sample",
        Intrinsic::Pow => "pow",
        Intrinsic::Sqrt => "sqrt",
        Intrinsic::Sin => "sin",
        Intrinsic::Cos => "cos",
        Intrinsic::Tan => "tan",
        Intrinsic::Min => "min",
        Intrinsic::Max => "max",
        Intrinsic::Floor => "floor",
        Intrinsic::Ceil => "ceil",
        Intrinsic::Frac => "frac",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_spelling_uses_rows_x_cols() {
        assert_eq!(type_name(&Type::FLOAT4X4), "float4x4");
    }

    #[test]
    fn vector_spelling_uses_single_count() {
        assert_eq!(type_name(&Type::FLOAT3), "float3");
    }
}
