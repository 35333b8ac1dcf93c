//! Backend-neutral binding locators for samplers, textures and uniforms.
//!
//! Mirrors `spirq_core::locator`'s `DescriptorBinding`/`InterfaceLocation`
//! newtypes: a pair of small integers with named accessors rather than a
//! bare tuple, so call sites read `binding.set()` instead of `.0`.

/// `(descriptor_set, binding_index)`, the SPIR-V/D3D resource slot pair.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescriptorBinding(u32, u32);
impl DescriptorBinding {
    pub fn new(set: u32, bind: u32) -> Self {
        DescriptorBinding(set, bind)
    }
    pub fn set(&self) -> u32 {
        self.0
    }
    pub fn bind(&self) -> u32 {
        self.1
    }
    pub fn into_inner(self) -> (u32, u32) {
        (self.0, self.1)
    }
}
impl std::fmt::Display for DescriptorBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(set={}, bind={})", self.0, self.1)
    }
}
impl std::fmt::Debug for DescriptorBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

/// `(location, component)`, the stage-interface slot pair.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceLocation(u32, u32);
impl InterfaceLocation {
    pub fn new(loc: u32, comp: u32) -> Self {
        InterfaceLocation(loc, comp)
    }
    pub fn loc(&self) -> u32 {
        self.0
    }
    pub fn comp(&self) -> u32 {
        self.1
    }
}
impl std::fmt::Display for InterfaceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(loc={}, comp={})", self.0, self.1)
    }
}
impl std::fmt::Debug for InterfaceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

/// Where a value lives, independent of backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Locator {
    Input(InterfaceLocation),
    Output(InterfaceLocation),
    Descriptor(DescriptorBinding),
    UniformMember { block: DescriptorBinding, offset: u32 },
}
