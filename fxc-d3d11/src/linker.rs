//! The D3D11 effect linker.
//!
//! Resource creation (`ID3D11Texture2D`, SRV/RTV pairs, sampler states,
//! dynamic constant buffers) follows the `ComPtr`-wrapped, `HRESULT`-checked
//! shape `gfx-rs/gfx`'s DX11 backend uses for its own shader modules; here
//! the unit of work is one technique's passes rather than one shader module.

#![cfg(windows)]

use crate::arena::UniformArena;
use crate::compiler::VendorCompiler;
use crate::hash::fnv1a_32;
use fxc_diag::CompileLog;
use fxc_ir::descriptor::{
    ColorWriteMask, PassDescriptor, SamplerDescriptor, TechniqueDescriptor, TextureDescriptor,
    TextureFormat,
};
use fxc_ir::module::Module;
use fnv::FnvHashMap;
use nohash_hasher::IntMap;
use std::ptr;
use winapi::shared::winerror::SUCCEEDED;
use winapi::um::d3d11::{
    ID3D11BlendState, ID3D11DepthStencilState, ID3D11Device, ID3D11DeviceContext, ID3D11Query,
    ID3D11RenderTargetView, ID3D11SamplerState, ID3D11ShaderResourceView, ID3D11Texture2D,
    D3D11_BIND_RENDER_TARGET, D3D11_BIND_SHADER_RESOURCE, D3D11_BLEND_DESC, D3D11_BLEND_INV_SRC_ALPHA,
    D3D11_BLEND_ONE, D3D11_BLEND_OP_ADD, D3D11_BLEND_SRC_ALPHA, D3D11_BLEND_ZERO,
    D3D11_COMPARISON_ALWAYS, D3D11_COMPARISON_LESS_EQUAL, D3D11_DEPTH_STENCILOP_DESC,
    D3D11_DEPTH_STENCIL_DESC, D3D11_DEPTH_WRITE_MASK_ALL, D3D11_QUERY_DESC,
    D3D11_QUERY_TIMESTAMP, D3D11_QUERY_TIMESTAMP_DISJOINT, D3D11_RENDER_TARGET_BLEND_DESC,
    D3D11_RESOURCE_MISC_GENERATE_MIPS, D3D11_SAMPLER_DESC, D3D11_SHADER_RESOURCE_VIEW_DESC,
    D3D11_STENCIL_OP_DECR, D3D11_STENCIL_OP_DECR_SAT, D3D11_STENCIL_OP_INCR,
    D3D11_STENCIL_OP_INCR_SAT, D3D11_STENCIL_OP_INVERT, D3D11_STENCIL_OP_KEEP,
    D3D11_STENCIL_OP_REPLACE, D3D11_STENCIL_OP_ZERO, D3D11_TEX2D_SRV, D3D11_TEXTURE2D_DESC,
    D3D11_USAGE_DEFAULT, D3D11_VIEWPORT,
};
use winapi::shared::dxgiformat::DXGI_FORMAT;
use wio::com::ComPtr;

/// Per-technique GPU-timing query pair.
pub struct TimingQueries {
    pub disjoint: ComPtr<ID3D11Query>,
    pub timestamp_begin: ComPtr<ID3D11Query>,
    pub timestamp_end: ComPtr<ID3D11Query>,
}

/// Linear + sRGB shader-resource view pair cached per texture.
pub struct TextureViews {
    pub texture: ComPtr<ID3D11Texture2D>,
    pub srv_linear: ComPtr<ID3D11ShaderResourceView>,
    pub srv_srgb: Option<ComPtr<ID3D11ShaderResourceView>>,
    pub rtv: Option<ComPtr<ID3D11RenderTargetView>>,
    pub mip_levels: u32,
    pub format: TextureFormat,
    pub width: u32,
    pub height: u32,
}

/// The pipeline state and GPU-timing resources a single pass links to.
pub struct LinkedPass {
    pub depth_stencil_state: ComPtr<ID3D11DepthStencilState>,
    pub blend_state: ComPtr<ID3D11BlendState>,
    pub viewport: D3D11_VIEWPORT,
    pub render_targets: Vec<ComPtr<ID3D11RenderTargetView>>,
    /// Names of textures that are both bound as a render target and sampled
    /// within this pass; the embedder's draw call must null their SRV slots.
    pub nulled_srvs: Vec<String>,
    pub timing: TimingQueries,
}

pub struct LinkerOptions {
    pub preferred_compiler_versions: Vec<u32>,
    pub strict: bool,
}

impl Default for LinkerOptions {
    fn default() -> LinkerOptions {
        LinkerOptions {
            preferred_compiler_versions: vec![47, 43],
            strict: true,
        }
    }
}

/// Owns the resources created while linking one [`Module`] against a
/// runtime's device.
pub struct EffectLinker {
    device: ComPtr<ID3D11Device>,
    textures: FnvHashMap<String, TextureViews>,
    /// Keyed by `fnv1a_32(sampler_desc_bytes)` — already a hash, so a
    /// pass-through hasher avoids rehashing a hash.
    samplers: IntMap<u32, ComPtr<ID3D11SamplerState>>,
    arena: UniformArena,
    /// Keyed by `"{technique}/{pass}"`.
    passes: FnvHashMap<String, LinkedPass>,
    /// Falls back as the viewport size for passes that bind no render
    /// target and declare no explicit viewport. Set by the embedder via
    /// [`EffectLinker::set_framebuffer_size`] once the swapchain exists.
    framebuffer_size: Option<(u32, u32)>,
    pub log: CompileLog,
}

impl EffectLinker {
    pub fn new(device: ComPtr<ID3D11Device>) -> EffectLinker {
        EffectLinker {
            device,
            textures: FnvHashMap::default(),
            samplers: IntMap::default(),
            arena: UniformArena::new(),
            passes: FnvHashMap::default(),
            framebuffer_size: None,
            log: CompileLog::new(),
        }
    }

    pub fn set_framebuffer_size(&mut self, width: u32, height: u32) {
        self.framebuffer_size = Some((width, height));
    }

    pub fn linked_pass(&self, technique: &str, pass: &str) -> Option<&LinkedPass> {
        self.passes.get(&format!("{technique}/{pass}"))
    }

    /// Registers a runtime-owned view under a texture name declared as
    /// `COLOR`/`DEPTH`. The backbuffer and its depth buffer are owned by the
    /// embedder's swapchain, not this linker, so there is no
    /// `CreateTexture2D` call here — just bookkeeping so later technique
    /// linking can resolve render-target bindings against it.
    pub fn bind_backbuffer(
        &mut self,
        name: &str,
        texture: ComPtr<ID3D11Texture2D>,
        srv_linear: ComPtr<ID3D11ShaderResourceView>,
        srv_srgb: Option<ComPtr<ID3D11ShaderResourceView>>,
        format: TextureFormat,
        width: u32,
        height: u32,
    ) {
        self.textures.insert(
            name.to_string(),
            TextureViews {
                texture,
                srv_linear,
                srv_srgb,
                rtv: None,
                mip_levels: 1,
                format,
                width,
                height,
            },
        );
    }

    /// Runs the six linking steps over one module: compile entry points,
    /// create textures, create samplers, allocate uniform storage, then
    /// link each technique's passes.
    pub fn link(&mut self, module: &Module, options: &LinkerOptions) {
        let compiler = match VendorCompiler::load(&options.preferred_compiler_versions) {
            Ok(c) => c,
            Err(err) => {
                self.log.record(&err);
                return;
            }
        };

        let Some(source) = module.hlsl_source.as_deref() else {
            self.log.error("module has no HLSL source to compile");
            return;
        };
        for function in &module.functions {
            let is_pixel = module
                .techniques
                .iter()
                .flat_map(|t| &t.passes)
                .any(|p| p.pixel_entry == function.name);
            match compiler.compile(source, &function.name, is_pixel) {
                Ok(_blob) => {}
                Err(err) => self.log.record(&err),
            }
        }

        for texture in &module.textures {
            self.create_texture(texture);
        }
        for sampler in &module.samplers {
            self.create_sampler(sampler);
        }
        for uniform in &module.uniforms {
            let size = uniform.size.max(1) as usize;
            let initializer = uniform
                .initializer
                .as_ref()
                .map(|c| bytemuck::cast_slice::<u32, u8>(c.used_lanes()));
            self.arena.allocate(size, initializer);
        }

        for technique in &module.techniques {
            self.link_technique(technique);
        }
    }

    fn create_texture(&mut self, desc: &TextureDescriptor) {
        if let Some(existing) = self.textures.get(&desc.name) {
            if existing.width == desc.width
                && existing.height == desc.height
                && existing.mip_levels == desc.mip_levels
                && existing.format == desc.format
            {
                log::trace!("fxc-d3d11: texture `{}` redeclared identically, reusing", desc.name);
                return;
            }
            self.log.error(format!(
                "texture `{}` redeclared with mismatching dimensions, mip levels or format",
                desc.name
            ));
            return;
        }
        if desc.name == "COLOR" || desc.name == "DEPTH" {
            log::debug!(
                "fxc-d3d11: texture `{}` is a backbuffer binding, deferring to bind_backbuffer",
                desc.name
            );
            return;
        }

        let resource_format = texture_resource_format(desc.format);
        let tex_desc = D3D11_TEXTURE2D_DESC {
            Width: desc.width,
            Height: desc.height,
            MipLevels: desc.mip_levels,
            ArraySize: 1,
            Format: resource_format,
            SampleDesc: winapi::shared::dxgitype::DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            Usage: D3D11_USAGE_DEFAULT,
            BindFlags: D3D11_BIND_SHADER_RESOURCE | D3D11_BIND_RENDER_TARGET,
            CPUAccessFlags: 0,
            MiscFlags: D3D11_RESOURCE_MISC_GENERATE_MIPS,
        };
        let mut raw_tex: *mut ID3D11Texture2D = ptr::null_mut();
        let hr = unsafe {
            self.device
                .CreateTexture2D(&tex_desc, ptr::null(), &mut raw_tex)
        };
        if !SUCCEEDED(hr) {
            self.log.error(format!(
                "failed to create texture `{}` (hresult 0x{:08x})",
                desc.name, hr
            ));
            return;
        }
        let texture = unsafe { ComPtr::from_raw(raw_tex) };

        let Some(srv_linear) = self.create_srv(&texture, &desc.name, "linear", linear_view_format(desc.format)) else {
            return;
        };
        let srv_srgb = match srgb_view_format(desc.format) {
            Some(fmt) => self.create_srv(&texture, &desc.name, "sRGB", fmt),
            None => None,
        };

        self.textures.insert(
            desc.name.clone(),
            TextureViews {
                texture,
                srv_linear,
                srv_srgb,
                rtv: None,
                mip_levels: desc.mip_levels,
                format: desc.format,
                width: desc.width,
                height: desc.height,
            },
        );
    }

    fn create_srv(
        &mut self,
        texture: &ComPtr<ID3D11Texture2D>,
        name: &str,
        kind: &str,
        format: DXGI_FORMAT,
    ) -> Option<ComPtr<ID3D11ShaderResourceView>> {
        let srv_desc = D3D11_SHADER_RESOURCE_VIEW_DESC {
            Format: format,
            ViewDimension: winapi::um::d3dcommon::D3D11_SRV_DIMENSION_TEXTURE2D,
            u: unsafe {
                let mut u: winapi::um::d3d11::D3D11_SHADER_RESOURCE_VIEW_DESC_u = std::mem::zeroed();
                *u.Texture2D_mut() = D3D11_TEX2D_SRV {
                    MostDetailedMip: 0,
                    MipLevels: u32::MAX,
                };
                u
            },
        };
        let mut raw_srv: *mut ID3D11ShaderResourceView = ptr::null_mut();
        let hr = unsafe {
            self.device
                .CreateShaderResourceView(texture.up() as _, &srv_desc, &mut raw_srv)
        };
        if !SUCCEEDED(hr) {
            self.log.error(format!(
                "failed to create {kind} SRV for `{name}` (hresult 0x{:08x})",
                hr
            ));
            return None;
        }
        Some(unsafe { ComPtr::from_raw(raw_srv) })
    }

    fn create_sampler(&mut self, desc: &SamplerDescriptor) {
        let raw_desc = sampler_desc_bytes(desc);
        let key = fnv1a_32(&raw_desc);
        if self.samplers.contains_key(&key) {
            return;
        }
        let d3d_desc = build_d3d11_sampler_desc(desc);
        let mut raw_sampler: *mut ID3D11SamplerState = ptr::null_mut();
        let hr = unsafe { self.device.CreateSamplerState(&d3d_desc, &mut raw_sampler) };
        if !SUCCEEDED(hr) {
            self.log
                .warn(format!("failed to create sampler state (hresult 0x{:08x})", hr));
            return;
        }
        self.samplers.insert(key, unsafe { ComPtr::from_raw(raw_sampler) });
    }

    fn link_technique(&mut self, technique: &TechniqueDescriptor) {
        for pass in &technique.passes {
            let mut dims: Option<(u32, u32)> = None;
            let mut rt_names: Vec<&str> = Vec::new();
            for rt in pass.render_targets.iter().flatten() {
                rt_names.push(rt.as_str());
                if let Some(views) = self.textures.get(rt.as_str()) {
                    let d = (views.width, views.height);
                    if let Some(prev) = dims {
                        if prev != d {
                            self.log.error(format!(
                                "pass `{}` binds render targets of differing size",
                                pass.name
                            ));
                        }
                    } else {
                        dims = Some(d);
                    }
                }
            }

            let viewport = match pass.viewport.or(dims).or(self.framebuffer_size) {
                Some((w, h)) => D3D11_VIEWPORT {
                    TopLeftX: 0.0,
                    TopLeftY: 0.0,
                    Width: w as f32,
                    Height: h as f32,
                    MinDepth: 0.0,
                    MaxDepth: 1.0,
                },
                None => {
                    self.log.error(format!(
                        "pass `{}` has no render target, explicit viewport, or framebuffer size to derive a viewport from",
                        pass.name
                    ));
                    continue;
                }
            };

            let mut render_targets = Vec::new();
            for rt in &rt_names {
                if let Some(rtv) = self.ensure_rtv(rt) {
                    render_targets.push(rtv);
                }
            }

            // Hazard nulling: any RT of this pass that is also sampled in it
            // must not additionally appear bound as an SRV. Per-pass SRV
            // bind lists aren't tracked here, so this is a name-membership
            // check the embedder's draw call must honor against these names.
            let nulled_srvs: Vec<String> = rt_names
                .iter()
                .filter(|rt| self.textures.contains_key(**rt))
                .map(|rt| rt.to_string())
                .collect();
            for name in &nulled_srvs {
                log::trace!("pass `{}`: nulling SRV hazard for `{}`", pass.name, name);
            }

            let depth_stencil_state = self.create_depth_stencil_state(pass);
            let blend_state = self.create_blend_state(pass);
            let timing = self.create_timing_queries();
            let (Some(depth_stencil_state), Some(blend_state), Some(timing)) =
                (depth_stencil_state, blend_state, timing)
            else {
                self.log.error(format!("pass `{}`: failed to create pipeline state", pass.name));
                continue;
            };

            self.passes.insert(
                format!("{}/{}", technique.name, pass.name),
                LinkedPass {
                    depth_stencil_state,
                    blend_state,
                    viewport,
                    render_targets,
                    nulled_srvs,
                    timing,
                },
            );
        }
    }

    fn ensure_rtv(&mut self, name: &str) -> Option<ComPtr<ID3D11RenderTargetView>> {
        if let Some(rtv) = self.textures.get(name).and_then(|v| v.rtv.as_ref()) {
            return Some(rtv.clone());
        }
        let texture = self.textures.get(name)?.texture.clone();
        let mut raw_rtv: *mut ID3D11RenderTargetView = ptr::null_mut();
        let hr = unsafe {
            self.device
                .CreateRenderTargetView(texture.up() as _, ptr::null(), &mut raw_rtv)
        };
        if !SUCCEEDED(hr) {
            self.log
                .error(format!("failed to create RTV for `{name}` (hresult 0x{:08x})", hr));
            return None;
        }
        let rtv = unsafe { ComPtr::from_raw(raw_rtv) };
        if let Some(views) = self.textures.get_mut(name) {
            views.rtv = Some(rtv.clone());
        }
        Some(rtv)
    }

    fn create_depth_stencil_state(&mut self, pass: &PassDescriptor) -> Option<ComPtr<ID3D11DepthStencilState>> {
        let stencil_op_desc = D3D11_DEPTH_STENCILOP_DESC {
            StencilFailOp: D3D11_STENCIL_OP_KEEP,
            StencilDepthFailOp: D3D11_STENCIL_OP_KEEP,
            StencilPassOp: d3d11_stencil_op(pass.stencil_pass_op),
            StencilFunc: D3D11_COMPARISON_ALWAYS,
        };
        let desc = D3D11_DEPTH_STENCIL_DESC {
            DepthEnable: 1,
            DepthWriteMask: D3D11_DEPTH_WRITE_MASK_ALL,
            DepthFunc: D3D11_COMPARISON_LESS_EQUAL,
            StencilEnable: pass.stencil_enable as i32,
            StencilReadMask: pass.stencil_read_mask,
            StencilWriteMask: pass.stencil_write_mask,
            FrontFace: stencil_op_desc,
            BackFace: stencil_op_desc,
        };
        let mut raw: *mut ID3D11DepthStencilState = ptr::null_mut();
        let hr = unsafe { self.device.CreateDepthStencilState(&desc, &mut raw) };
        if !SUCCEEDED(hr) {
            self.log.error(format!(
                "pass `{}`: failed to create depth-stencil state (hresult 0x{:08x})",
                pass.name, hr
            ));
            return None;
        }
        Some(unsafe { ComPtr::from_raw(raw) })
    }

    fn create_blend_state(&mut self, pass: &PassDescriptor) -> Option<ComPtr<ID3D11BlendState>> {
        let rt_blend = D3D11_RENDER_TARGET_BLEND_DESC {
            BlendEnable: pass.blend_enable as i32,
            SrcBlend: D3D11_BLEND_SRC_ALPHA,
            DestBlend: D3D11_BLEND_INV_SRC_ALPHA,
            BlendOp: D3D11_BLEND_OP_ADD,
            SrcBlendAlpha: D3D11_BLEND_ONE,
            DestBlendAlpha: D3D11_BLEND_ZERO,
            BlendOpAlpha: D3D11_BLEND_OP_ADD,
            RenderTargetWriteMask: d3d11_color_write_mask(pass.color_write_mask),
        };
        let desc = D3D11_BLEND_DESC {
            AlphaToCoverageEnable: 0,
            IndependentBlendEnable: 0,
            RenderTarget: [rt_blend; 8],
        };
        let mut raw: *mut ID3D11BlendState = ptr::null_mut();
        let hr = unsafe { self.device.CreateBlendState(&desc, &mut raw) };
        if !SUCCEEDED(hr) {
            self.log.error(format!(
                "pass `{}`: failed to create blend state (hresult 0x{:08x})",
                pass.name, hr
            ));
            return None;
        }
        Some(unsafe { ComPtr::from_raw(raw) })
    }

    fn create_timing_queries(&mut self) -> Option<TimingQueries> {
        let disjoint = self.create_query(D3D11_QUERY_TIMESTAMP_DISJOINT)?;
        let timestamp_begin = self.create_query(D3D11_QUERY_TIMESTAMP)?;
        let timestamp_end = self.create_query(D3D11_QUERY_TIMESTAMP)?;
        Some(TimingQueries { disjoint, timestamp_begin, timestamp_end })
    }

    fn create_query(&mut self, query_type: u32) -> Option<ComPtr<ID3D11Query>> {
        let desc = D3D11_QUERY_DESC { Query: query_type, MiscFlags: 0 };
        let mut raw: *mut ID3D11Query = ptr::null_mut();
        let hr = unsafe { self.device.CreateQuery(&desc, &mut raw) };
        if !SUCCEEDED(hr) {
            self.log.error(format!("failed to create timing query (hresult 0x{:08x})", hr));
            return None;
        }
        Some(unsafe { ComPtr::from_raw(raw) })
    }

    pub fn constant_buffer_size(&self) -> usize {
        self.arena.buffer_size()
    }
}

/// The format the `ID3D11Texture2D` resource itself is created with. `Rgba8`
/// and `Rgba8Srgb` share a typeless resource so both a linear and an sRGB
/// view can be carved out of the same allocation; every other format has no
/// sRGB counterpart and is created directly in its final format.
fn texture_resource_format(format: TextureFormat) -> DXGI_FORMAT {
    use winapi::shared::dxgiformat::*;
    use TextureFormat::*;
    match format {
        Rgba8 | Rgba8Srgb => DXGI_FORMAT_R8G8B8A8_TYPELESS,
        Rgba16Float => DXGI_FORMAT_R16G16B16A16_FLOAT,
        R8 => DXGI_FORMAT_R8_UNORM,
        R32Float => DXGI_FORMAT_R32_FLOAT,
        D24S8 => DXGI_FORMAT_D24_UNORM_S8_UINT,
    }
}

fn linear_view_format(format: TextureFormat) -> DXGI_FORMAT {
    use winapi::shared::dxgiformat::*;
    use TextureFormat::*;
    match format {
        Rgba8 | Rgba8Srgb => DXGI_FORMAT_R8G8B8A8_UNORM,
        other => texture_resource_format(other),
    }
}

/// `None` when `format` has no sRGB counterpart — callers should skip
/// creating a second view and leave `TextureViews::srv_srgb` unset.
fn srgb_view_format(format: TextureFormat) -> Option<DXGI_FORMAT> {
    use winapi::shared::dxgiformat::DXGI_FORMAT_R8G8B8A8_UNORM_SRGB;
    match format {
        TextureFormat::Rgba8 | TextureFormat::Rgba8Srgb => Some(DXGI_FORMAT_R8G8B8A8_UNORM_SRGB),
        _ => None,
    }
}

fn d3d11_stencil_op(op: fxc_ir::descriptor::StencilOp) -> u32 {
    use fxc_ir::descriptor::StencilOp::*;
    match op {
        Keep => D3D11_STENCIL_OP_KEEP,
        Zero => D3D11_STENCIL_OP_ZERO,
        Replace => D3D11_STENCIL_OP_REPLACE,
        IncrementClamp => D3D11_STENCIL_OP_INCR_SAT,
        DecrementClamp => D3D11_STENCIL_OP_DECR_SAT,
        Invert => D3D11_STENCIL_OP_INVERT,
        IncrementWrap => D3D11_STENCIL_OP_INCR,
        DecrementWrap => D3D11_STENCIL_OP_DECR,
    }
}

fn d3d11_color_write_mask(mask: ColorWriteMask) -> u8 {
    use winapi::um::d3d11::*;
    let mut out = 0u32;
    if mask.contains(ColorWriteMask::RED) {
        out |= D3D11_COLOR_WRITE_ENABLE_RED;
    }
    if mask.contains(ColorWriteMask::GREEN) {
        out |= D3D11_COLOR_WRITE_ENABLE_GREEN;
    }
    if mask.contains(ColorWriteMask::BLUE) {
        out |= D3D11_COLOR_WRITE_ENABLE_BLUE;
    }
    if mask.contains(ColorWriteMask::ALPHA) {
        out |= D3D11_COLOR_WRITE_ENABLE_ALPHA;
    }
    out as u8
}

fn d3d11_filter(desc: &SamplerDescriptor) -> u32 {
    use fxc_ir::descriptor::FilterMode::*;
    use winapi::um::d3d11::*;
    match desc.filter {
        Point => D3D11_FILTER_MIN_MAG_MIP_POINT,
        Linear => D3D11_FILTER_MIN_MAG_MIP_LINEAR,
        Anisotropic => D3D11_FILTER_ANISOTROPIC,
    }
}

fn d3d11_address(mode: fxc_ir::descriptor::AddressMode) -> u32 {
    use fxc_ir::descriptor::AddressMode::*;
    use winapi::um::d3d11::*;
    match mode {
        Wrap => D3D11_TEXTURE_ADDRESS_WRAP,
        Mirror => D3D11_TEXTURE_ADDRESS_MIRROR,
        Clamp => D3D11_TEXTURE_ADDRESS_CLAMP,
        Border => D3D11_TEXTURE_ADDRESS_BORDER,
    }
}

fn build_d3d11_sampler_desc(desc: &SamplerDescriptor) -> D3D11_SAMPLER_DESC {
    D3D11_SAMPLER_DESC {
        Filter: d3d11_filter(desc),
        AddressU: d3d11_address(desc.address_u),
        AddressV: d3d11_address(desc.address_v),
        AddressW: d3d11_address(desc.address_w),
        MipLODBias: 0.0,
        MaxAnisotropy: 16,
        ComparisonFunc: winapi::um::d3d11::D3D11_COMPARISON_NEVER,
        BorderColor: [0.0; 4],
        MinLOD: desc.min_lod,
        MaxLOD: desc.max_lod,
    }
}

/// Raw byte view of the descriptor used for hashing: the struct is `repr(C)` in `winapi`, so this is a straightforward
/// reinterpretation, matching the "hash the full SAMPLER_DESC" wording.
fn sampler_desc_bytes(desc: &SamplerDescriptor) -> Vec<u8> {
    let d3d_desc = build_d3d11_sampler_desc(desc);
    let ptr = &d3d_desc as *const D3D11_SAMPLER_DESC as *const u8;
    unsafe { std::slice::from_raw_parts(ptr, std::mem::size_of::<D3D11_SAMPLER_DESC>()).to_vec() }
}
