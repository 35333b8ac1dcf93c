//! The access-chain expression model.
//!
//! An expression is a base value id plus an ordered list of operations; both
//! backends walk the same list once for a load and once for a store. This is
//! the effect compiler's analogue of `spirq::ty::Walk`'s iterator over
//! struct/array members, generalized from "offsets inside a type" to
//! "operations applied to a value".

use crate::ty::Type;

pub type ValueId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: u32,
    pub line: u32,
    pub column: u32,
}

/// A single step in an access chain.
#[derive(Clone, Debug, PartialEq)]
pub enum AccessOp {
    Cast { from: Type, to: Type },
    Index { index: ValueId, src_ty: Type, dst_ty: Type },
    /// Up to four source-component indices; unused trailing slots are `-1`.
    Swizzle { components: [i8; 4] },
}

impl AccessOp {
    pub fn swizzle(components: &[u8]) -> AccessOp {
        let mut c = [-1i8; 4];
        for (slot, v) in c.iter_mut().zip(components.iter()) {
            *slot = *v as i8;
        }
        AccessOp::Swizzle { components: c }
    }
}

/// A typed access chain: a base value plus the operations applied to reach
/// the expression's final value/location.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub base: ValueId,
    pub ty: Type,
    pub ops: Vec<AccessOp>,
    pub is_lvalue: bool,
    pub is_constant: bool,
    pub location: Option<SourceLocation>,
}

impl Expr {
    pub fn value(base: ValueId, ty: Type) -> Expr {
        Expr {
            base,
            ty,
            ops: Vec::new(),
            is_lvalue: false,
            is_constant: false,
            location: None,
        }
    }

    pub fn lvalue(base: ValueId, ty: Type) -> Expr {
        Expr {
            is_lvalue: true,
            ..Expr::value(base, ty)
        }
    }

    pub fn with_op(mut self, op: AccessOp) -> Expr {
        self.ops.push(op);
        self
    }

    pub fn at(mut self, location: SourceLocation) -> Expr {
        self.location = Some(location);
        self
    }

    /// The leading run of `Index` ops, the portion that folds into a single
    /// `OpAccessChain`.
    pub fn leading_indices(&self) -> &[AccessOp] {
        let end = self
            .ops
            .iter()
            .position(|op| !matches!(op, AccessOp::Index { .. }))
            .unwrap_or(self.ops.len());
        &self.ops[..end]
    }

    /// Operations after the leading index run: casts and swizzles applied to
    /// the loaded/stored value.
    pub fn trailing_ops(&self) -> &[AccessOp] {
        let end = self.leading_indices().len();
        &self.ops[end..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_indices_stop_at_first_non_index() {
        let e = Expr::lvalue(0, Type::FLOAT4)
            .with_op(AccessOp::Index {
                index: 1,
                src_ty: Type::FLOAT4,
                dst_ty: Type::FLOAT,
            })
            .with_op(AccessOp::swizzle(&[0, 1]));
        assert_eq!(e.leading_indices().len(), 1);
        assert_eq!(e.trailing_ops().len(), 1);
    }
}
