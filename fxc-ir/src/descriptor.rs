//! Function, struct, resource and technique/pass descriptors.
//!
//! Shaped after `spirq_core::var`'s descriptor family
//! (`InputVariable`/`DescriptorVariable`/`PushConstantVariable`): one small
//! struct per entity kind, carrying a name, a locator, and entity-specific
//! fields, rather than one monolithic "variable" struct with optional fields.

use crate::locator::DescriptorBinding;
use crate::ty::Type;
use fnv::FnvHashMap;

pub type StructId = u32;
pub type FunctionId = u32;
pub type TextureId = u32;
pub type SamplerId = u32;
pub type UniformId = u32;

#[derive(Clone, Debug, PartialEq)]
pub struct StructMember {
    pub name: String,
    pub ty: Type,
    pub semantic: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructDescriptor {
    pub id: StructId,
    pub name: Option<String>,
    pub members: Vec<StructMember>,
}

impl StructDescriptor {
    pub fn nbyte(&self) -> usize {
        self.members.iter().map(|m| m.ty.nbyte()).sum()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: Type,
    pub semantic: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDescriptor {
    pub id: FunctionId,
    pub name: String,
    pub params: Vec<Parameter>,
    pub return_ty: Type,
    pub return_semantic: Option<String>,
    pub entry_block: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Rgba8,
    Rgba8Srgb,
    Rgba16Float,
    R8,
    R32Float,
    D24S8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextureDescriptor {
    pub id: TextureId,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub mip_levels: u32,
    pub format: TextureFormat,
    pub binding: DescriptorBinding,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterMode {
    Point,
    Linear,
    Anisotropic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressMode {
    Wrap,
    Mirror,
    Clamp,
    Border,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SamplerDescriptor {
    pub id: SamplerId,
    pub name: String,
    pub texture: TextureId,
    pub filter: FilterMode,
    pub address_u: AddressMode,
    pub address_v: AddressMode,
    pub address_w: AddressMode,
    pub min_lod: f32,
    pub max_lod: f32,
    pub srgb: bool,
    pub binding: DescriptorBinding,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UniformDescriptor {
    pub id: UniformId,
    pub name: String,
    pub ty: Type,
    pub offset: u32,
    pub size: u32,
    pub initializer: Option<crate::constant::Constant>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StencilOp {
    Keep,
    Zero,
    Replace,
    IncrementClamp,
    DecrementClamp,
    Invert,
    IncrementWrap,
    DecrementWrap,
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorWriteMask: u8 {
        const RED   = 0b0001;
        const GREEN = 0b0010;
        const BLUE  = 0b0100;
        const ALPHA = 0b1000;
        const ALL   = 0b1111;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PassDescriptor {
    pub name: String,
    pub vertex_entry: String,
    pub pixel_entry: String,
    pub render_targets: [Option<String>; 8],
    pub srgb_write: bool,
    pub clear_rts: bool,
    pub blend_enable: bool,
    pub color_write_mask: ColorWriteMask,
    pub stencil_enable: bool,
    pub stencil_read_mask: u8,
    pub stencil_write_mask: u8,
    pub stencil_pass_op: StencilOp,
    pub viewport: Option<(u32, u32)>,
}

impl Default for PassDescriptor {
    fn default() -> Self {
        PassDescriptor {
            name: String::new(),
            vertex_entry: String::new(),
            pixel_entry: String::new(),
            render_targets: Default::default(),
            srgb_write: false,
            clear_rts: false,
            blend_enable: false,
            color_write_mask: ColorWriteMask::ALL,
            stencil_enable: false,
            stencil_read_mask: 0xff,
            stencil_write_mask: 0xff,
            stencil_pass_op: StencilOp::Keep,
            viewport: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct TechniqueDescriptor {
    pub name: String,
    pub annotations: FnvHashMap<String, String>,
    pub passes: Vec<PassDescriptor>,
}
