//! The value-type model shared by both backends.
//!
//! A [`Type`] is deliberately flat: one struct covers scalar, vector, matrix,
//! texture, sampler and struct-reference shapes at once, the way a small
//! reflection type would rather than a deep enum tree, because the SPIR-V and
//! HLSL backends both need to pattern-match on `(base, rows, cols)` far more
//! often than they need to destructure a nested representation.

use bitflags::bitflags;

/// The element kind carried by a [`Type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Void,
    Bool,
    Int,
    Uint,
    Float,
    /// References a [`crate::descriptor::StructId`] registered in the owning module.
    Struct,
    Texture,
    Sampler,
    String,
}

bitflags! {
    /// Storage/usage qualifiers. Several combine (e.g. `UNIFORM | IN`), so this
    /// is a bitset rather than an enum.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Qualifiers: u32 {
        const STATIC          = 0b0000_0000_0001;
        const UNIFORM         = 0b0000_0000_0010;
        const EXTERN          = 0b0000_0000_0100;
        const IN              = 0b0000_0000_1000;
        const OUT             = 0b0000_0001_0000;
        const INOUT           = 0b0000_0010_0000;
        const CONST           = 0b0000_0100_0000;
        const PRECISE         = 0b0000_1000_0000;
        const NOPERSPECTIVE   = 0b0001_0000_0000;
        const CENTROID        = 0b0010_0000_0000;
        const NOINTERPOLATION = 0b0100_0000_0000;
    }
}

/// A value type. Array length `0` means "not an array"; `-1` means unsized.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Type {
    pub base: BaseType,
    pub rows: u8,
    pub cols: u8,
    pub array_len: i32,
    pub qualifiers: Qualifiers,
    pub is_pointer: bool,
    /// Set when `base == BaseType::Struct`; indexes the module's struct table.
    pub struct_id: Option<u32>,
}

impl std::fmt::Debug for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.base)?;
        if self.cols > 1 {
            write!(f, "{}x{}", self.rows, self.cols)?;
        } else if self.rows > 1 {
            write!(f, "{}", self.rows)?;
        }
        match self.array_len {
            0 => {}
            -1 => write!(f, "[]")?,
            n => write!(f, "[{}]", n)?,
        }
        if self.is_pointer {
            write!(f, "*")?;
        }
        Ok(())
    }
}

impl Type {
    pub const fn scalar(base: BaseType) -> Type {
        Type {
            base,
            rows: 1,
            cols: 1,
            array_len: 0,
            qualifiers: Qualifiers::empty(),
            is_pointer: false,
            struct_id: None,
        }
    }
    pub const fn vector(base: BaseType, rows: u8) -> Type {
        Type {
            rows,
            ..Type::scalar(base)
        }
    }
    pub const fn matrix(base: BaseType, rows: u8, cols: u8) -> Type {
        Type {
            rows,
            cols,
            ..Type::scalar(base)
        }
    }
    pub const VOID: Type = Type::scalar(BaseType::Void);
    pub const BOOL: Type = Type::scalar(BaseType::Bool);
    pub const INT: Type = Type::scalar(BaseType::Int);
    pub const UINT: Type = Type::scalar(BaseType::Uint);
    pub const FLOAT: Type = Type::scalar(BaseType::Float);
    pub const FLOAT2: Type = Type::vector(BaseType::Float, 2);
    pub const FLOAT3: Type = Type::vector(BaseType::Float, 3);
    pub const FLOAT4: Type = Type::vector(BaseType::Float, 4);
    pub const FLOAT4X4: Type = Type::matrix(BaseType::Float, 4, 4);
    pub const TEXTURE: Type = Type::scalar(BaseType::Texture);
    pub const SAMPLER: Type = Type::scalar(BaseType::Sampler);

    pub fn is_scalar(&self) -> bool {
        self.rows == 1 && self.cols == 1 && self.array_len == 0
    }
    pub fn is_vector(&self) -> bool {
        self.rows > 1 && self.cols == 1
    }
    pub fn is_matrix(&self) -> bool {
        self.rows > 1 && self.cols > 1
    }
    pub fn is_array(&self) -> bool {
        self.array_len != 0
    }
    pub fn is_unsized_array(&self) -> bool {
        self.array_len == -1
    }
    pub fn is_numeric(&self) -> bool {
        matches!(self.base, BaseType::Int | BaseType::Uint | BaseType::Float)
    }
    pub fn is_opaque(&self) -> bool {
        matches!(self.base, BaseType::Texture | BaseType::Sampler)
    }

    /// Element type with the array wrapper stripped off (rows/cols unchanged).
    pub fn elem_type(&self) -> Type {
        Type {
            array_len: 0,
            ..*self
        }
    }

    /// Single-component type of a vector or matrix column.
    pub fn component_type(&self) -> Type {
        Type {
            rows: 1,
            cols: 1,
            array_len: 0,
            ..*self
        }
    }

    fn scalar_nbyte(&self) -> usize {
        match self.base {
            BaseType::Bool | BaseType::Int | BaseType::Uint | BaseType::Float => 4,
            _ => 0,
        }
    }

    /// Byte size of the type's own data, tightly packed (a `float3` is 12
    /// bytes, not 16 — the std140 rounding to 16 only affects `align()`'s
    /// stride between members, not how many bytes this value occupies).
    /// Only meaningful for numeric scalar/vector/matrix/array types.
    pub fn nbyte(&self) -> usize {
        let scalar = self.scalar_nbyte();
        if scalar == 0 {
            return 0;
        }
        let base = scalar * self.rows.max(1) as usize * self.cols.max(1) as usize;
        match self.array_len {
            0 => base,
            -1 => base,
            n => base * n.max(1) as usize,
        }
    }

    /// Alignment per the std140-equivalent rules.
    pub fn align(&self) -> usize {
        let scalar = self.scalar_nbyte().max(1);
        if self.is_array() {
            return align_up(scalar * self.rows.max(1) as usize, 16);
        }
        match self.rows {
            0 | 1 => scalar,
            2 => scalar * 2,
            _ => scalar * 4,
        }
    }
}

pub fn align_up(offset: usize, align: usize) -> usize {
    if align == 0 {
        return offset;
    }
    (offset + align - 1) / align * align
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_align_matches_std140() {
        assert_eq!(Type::FLOAT.align(), 4);
        assert_eq!(Type::FLOAT2.align(), 8);
        assert_eq!(Type::FLOAT3.align(), 16);
        assert_eq!(Type::FLOAT4.align(), 16);
    }

    #[test]
    fn matrix_size_counts_four_columns_of_vec4() {
        assert_eq!(Type::FLOAT4X4.nbyte(), 4 * 4 * 4);
    }

    #[test]
    fn debug_formats_arrays_and_pointers() {
        let t = Type {
            array_len: 3,
            is_pointer: true,
            ..Type::FLOAT4
        };
        assert_eq!(format!("{:?}", t), "Float4[3]*");
    }
}
