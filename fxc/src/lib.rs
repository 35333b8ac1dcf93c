//! Umbrella facade over the effect compiler's crates, the same way `spirq`
//! re-exports `spirq-core`/`spirq-types`/… under one name for downstream
//! consumers.
//!
//! Typical use: build a [`fxc_ir::Module`] (normally produced by an
//! external frontend, out of scope here), then lower it with
//! [`compile_spirv`] and/or [`compile_hlsl`].

pub use fxc_codegen as codegen;
pub use fxc_diag as diag;
pub use fxc_ir as ir;
pub use fxc_hlsl as hlsl;
pub use fxc_spirv as spirv;

#[cfg(windows)]
pub use fxc_d3d11 as d3d11;

use fxc_codegen::CodeGenerator;

/// Lowers a module's declared entities through the SPIR-V backend and
/// returns the finished word stream plus its diagnostics.
pub fn compile_spirv(
    module: &ir::Module,
    options: spirv::Options,
) -> (spirv::SpirvModule, diag::CompileLog) {
    log::debug!(
        "fxc: compiling to SPIR-V ({} struct(s), {} texture(s), {} technique(s))",
        module.structs.len(),
        module.textures.len(),
        module.techniques.len()
    );
    let mut gen = spirv::SpirvGenerator::new(options);
    lower_declarations(module, &mut gen);
    let log = std::mem::replace(&mut gen.log, diag::CompileLog::new());
    (gen.write_result(), log)
}

/// Lowers a module's declared entities through the HLSL backend and
/// returns the finished source text plus its diagnostics.
pub fn compile_hlsl(module: &ir::Module) -> (String, diag::CompileLog) {
    log::debug!(
        "fxc: compiling to HLSL ({} struct(s), {} technique(s))",
        module.structs.len(),
        module.techniques.len()
    );
    let mut gen = hlsl::HlslGenerator::new();
    lower_declarations(module, &mut gen);
    let log = std::mem::replace(&mut gen.log, diag::CompileLog::new());
    (gen.write_result(), log)
}

/// Declaration-level lowering shared by both backends: struct/texture/
/// sampler/uniform/technique definitions. Function bodies (expressions,
/// control flow) are driven directly through the `CodeGenerator` trait by
/// the frontend, which is out of this crate's scope.
fn lower_declarations<G: CodeGenerator>(module: &ir::Module, gen: &mut G) {
    for s in &module.structs {
        gen.define_struct(s.name.as_deref(), &s.members);
    }
    for t in &module.textures {
        gen.define_texture(t);
    }
    for s in &module.samplers {
        gen.define_sampler(s);
    }
    for u in &module.uniforms {
        gen.define_uniform(&u.name, u.ty, u.initializer.as_ref());
    }
    for t in &module.techniques {
        gen.define_technique(t);
    }
}
