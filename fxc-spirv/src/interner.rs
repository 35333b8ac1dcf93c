//! Type and constant interning.
//!
//! Linear-scan, per the source's design note that this is acceptable for
//! modules with hundreds of types; the storage mirrors
//! `spirq_core::ty::reg::TypeRegistry`'s id-map shape but inverted — we're
//! allocating fresh ids for a `Type`/`Constant` key rather than resolving
//! ids read out of an existing binary.

use fxc_ir::constant::Constant;
use fxc_ir::ty::{BaseType, Type};
use spirv_headers::StorageClass;

fn storage_class(ty: &Type) -> StorageClass {
    use fxc_ir::ty::Qualifiers as Q;
    if ty.qualifiers.contains(Q::STATIC) {
        StorageClass::Private
    } else if ty.qualifiers.contains(Q::UNIFORM) {
        if ty.is_opaque() {
            StorageClass::UniformConstant
        } else {
            StorageClass::Uniform
        }
    } else if ty.qualifiers.contains(Q::IN) {
        StorageClass::Input
    } else if ty.qualifiers.contains(Q::OUT) {
        StorageClass::Output
    } else {
        StorageClass::Function
    }
}

/// A type plus the derived storage class, the actual interning key for
/// pointer types (two structurally-equal `Type`s with different storage
/// classes are *not* the same SPIR-V pointer type).
#[derive(Clone, Debug, PartialEq)]
struct TypeKey {
    ty: Type,
    storage: Option<StorageClass>,
}

pub struct TypeInterner {
    entries: Vec<(TypeKey, u32)>,
}

impl TypeInterner {
    pub fn new() -> TypeInterner {
        TypeInterner { entries: Vec::new() }
    }

    /// Returns the existing id for a structurally equal type, if any.
    pub fn find(&self, ty: &Type) -> Option<u32> {
        let storage = if ty.is_pointer { Some(storage_class(ty)) } else { None };
        self.entries
            .iter()
            .find(|(k, _)| k.ty == *ty && k.storage == storage)
            .map(|(_, id)| *id)
    }

    pub fn intern(&mut self, ty: Type, id: u32) {
        let storage = if ty.is_pointer { Some(storage_class(&ty)) } else { None };
        self.entries.push((TypeKey { ty, storage }, id));
    }

    pub fn pointer_storage_class(ty: &Type) -> StorageClass {
        storage_class(ty)
    }
}

pub struct ConstInterner {
    entries: Vec<(Type, Vec<u32>, Vec<Vec<u32>>, u32)>,
}

impl ConstInterner {
    pub fn new() -> ConstInterner {
        ConstInterner { entries: Vec::new() }
    }

    pub fn find(&self, c: &Constant) -> Option<u32> {
        let lanes = c.used_lanes();
        let elems: Vec<Vec<u32>> = c.elements.iter().map(|e| e.used_lanes().to_vec()).collect();
        self.entries
            .iter()
            .find(|(ty, l, e, _)| *ty == c.ty && l.as_slice() == lanes && *e == elems)
            .map(|(.., id)| *id)
    }

    pub fn intern(&mut self, c: &Constant, id: u32) {
        let elems: Vec<Vec<u32>> = c.elements.iter().map(|e| e.used_lanes().to_vec()).collect();
        self.entries.push((c.ty, c.used_lanes().to_vec(), elems, id));
    }
}

pub fn is_void(ty: &Type) -> bool {
    ty.base == BaseType::Void
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_type_interns_to_same_id() {
        let mut interner = TypeInterner::new();
        interner.intern(Type::FLOAT4, 5);
        assert_eq!(interner.find(&Type::FLOAT4), Some(5));
    }

    #[test]
    fn pointer_storage_class_differentiates_uniform_vs_private() {
        let mut uniform = Type::FLOAT4;
        uniform.is_pointer = true;
        uniform.qualifiers = fxc_ir::ty::Qualifiers::UNIFORM;
        let mut private = Type::FLOAT4;
        private.is_pointer = true;
        private.qualifiers = fxc_ir::ty::Qualifiers::STATIC;

        let mut interner = TypeInterner::new();
        interner.intern(uniform, 1);
        assert_eq!(interner.find(&private), None);
    }
}
