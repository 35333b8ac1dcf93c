//! The frontend-supplied IR module.
//!
//! An ordered, append-only collection of the descriptor kinds in
//! [`crate::descriptor`], plus the optional HLSL source text the frontend
//! parsed them from. Backends consume a `&Module` and never mutate it.

use crate::descriptor::*;
use fnv::FnvHashMap;

#[derive(Clone, Debug, Default)]
pub struct Module {
    pub hlsl_source: Option<String>,
    pub structs: Vec<StructDescriptor>,
    pub functions: Vec<FunctionDescriptor>,
    pub textures: Vec<TextureDescriptor>,
    pub samplers: Vec<SamplerDescriptor>,
    pub uniforms: Vec<UniformDescriptor>,
    pub techniques: Vec<TechniqueDescriptor>,
    texture_by_name: FnvHashMap<String, TextureId>,
    next_id: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    #[error("texture `{0}` redeclared with mismatching dimensions or format")]
    MismatchedTexture(String),
    #[error("unknown render target `{0}`")]
    UnknownRenderTarget(String),
}

impl Module {
    pub fn new() -> Module {
        Module::default()
    }

    fn alloc_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_struct(&mut self, name: Option<String>, members: Vec<StructMember>) -> StructId {
        let id = self.alloc_id();
        log::trace!("fxc-ir: struct {:?} (id {id}) with {} member(s)", name, members.len());
        self.structs.push(StructDescriptor { id, name, members });
        id
    }

    pub fn add_function(
        &mut self,
        name: impl Into<String>,
        params: Vec<Parameter>,
        return_ty: crate::ty::Type,
        return_semantic: Option<String>,
    ) -> FunctionId {
        let id = self.alloc_id();
        let name = name.into();
        log::trace!("fxc-ir: function `{name}` (id {id}) with {} parameter(s)", params.len());
        self.functions.push(FunctionDescriptor {
            id,
            name,
            params,
            return_ty,
            return_semantic,
            entry_block: 0,
        });
        id
    }

    /// Defines a texture, merging with an existing same-named texture when
    /// dimensions/format match.
    pub fn define_texture(
        &mut self,
        name: impl Into<String>,
        width: u32,
        height: u32,
        mip_levels: u32,
        format: TextureFormat,
        binding: crate::locator::DescriptorBinding,
    ) -> Result<TextureId, ModuleError> {
        let name = name.into();
        if let Some(&id) = self.texture_by_name.get(&name) {
            let existing = self.textures.iter().find(|t| t.id == id).unwrap();
            if existing.width == width && existing.height == height && existing.format == format {
                log::trace!("fxc-ir: texture `{name}` redeclared identically, reusing id {id}");
                return Ok(id);
            }
            log::warn!("fxc-ir: texture `{name}` redeclared with mismatching dimensions or format");
            return Err(ModuleError::MismatchedTexture(name));
        }
        let id = self.alloc_id();
        log::trace!("fxc-ir: texture `{name}` (id {id}) {width}x{height}, {mip_levels} mip(s)");
        self.texture_by_name.insert(name.clone(), id);
        self.textures.push(TextureDescriptor {
            id,
            name,
            width,
            height,
            mip_levels,
            format,
            binding,
        });
        Ok(id)
    }

    pub fn find_texture(&self, name: &str) -> Option<&TextureDescriptor> {
        self.texture_by_name
            .get(name)
            .and_then(|id| self.textures.iter().find(|t| t.id == *id))
    }

    pub fn add_sampler(&mut self, desc: SamplerDescriptor) -> SamplerId {
        log::trace!("fxc-ir: sampler `{}` (id {}) on texture {}", desc.name, desc.id, desc.texture);
        self.samplers.push(desc);
        self.samplers.last().unwrap().id
    }

    pub fn add_uniform(&mut self, desc: UniformDescriptor) -> UniformId {
        log::trace!("fxc-ir: uniform `{}` (id {}) at offset {}", desc.name, desc.id, desc.offset);
        self.uniforms.push(desc);
        self.uniforms.last().unwrap().id
    }

    pub fn add_technique(&mut self, technique: TechniqueDescriptor) {
        log::debug!("fxc-ir: technique `{}` with {} pass(es)", technique.name, technique.passes.len());
        self.techniques.push(technique);
    }

    /// Validates render-target references resolve to declared textures, and
    /// that any two RTs bound in the same pass share `(width, height)`
    ///.
    pub fn validate_passes(&self) -> Result<(), ModuleError> {
        for technique in &self.techniques {
            for pass in &technique.passes {
                let mut dims: Option<(u32, u32)> = None;
                for rt in pass.render_targets.iter().flatten() {
                    let tex = self
                        .find_texture(rt)
                        .ok_or_else(|| ModuleError::UnknownRenderTarget(rt.clone()))?;
                    let d = (tex.width, tex.height);
                    if let Some(prev) = dims {
                        if prev != d {
                            return Err(ModuleError::MismatchedTexture(rt.clone()));
                        }
                    } else {
                        dims = Some(d);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::DescriptorBinding;

    #[test]
    fn redeclaring_with_matching_dims_is_idempotent() {
        let mut m = Module::new();
        let a = m
            .define_texture("tex", 64, 64, 1, TextureFormat::Rgba8, DescriptorBinding::new(1, 0))
            .unwrap();
        let b = m
            .define_texture("tex", 64, 64, 1, TextureFormat::Rgba8, DescriptorBinding::new(1, 1))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn redeclaring_with_mismatched_dims_fails() {
        let mut m = Module::new();
        m.define_texture("tex", 64, 64, 1, TextureFormat::Rgba8, DescriptorBinding::new(1, 0))
            .unwrap();
        let err = m.define_texture("tex", 128, 64, 1, TextureFormat::Rgba8, DescriptorBinding::new(1, 1));
        assert!(err.is_err());
    }
}
