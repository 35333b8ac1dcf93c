//! End-to-end compile scenarios, exercised against the declaration-level
//! lowering path (`fxc::compile_spirv`/`fxc::compile_hlsl`).

use fxc::ir::descriptor::{SamplerDescriptor, TechniqueDescriptor, TextureFormat};
use fxc::ir::locator::DescriptorBinding;
use fxc::ir::ty::Type;
use fxc::ir::Module;

#[test]
fn scenario_1_empty_effect_has_only_the_module_skeleton() {
    let module = Module::new();
    let (spirv, log) = fxc::compile_spirv(&module, fxc::spirv::Options::default());
    assert!(!log.is_failed());
    assert_eq!(spirv.words[0], 0x07230203);
    assert!(spirv.words.len() > 5);

    let (hlsl, log) = fxc::compile_hlsl(&module);
    assert!(!log.is_failed());
    assert_eq!(hlsl, "");
}

#[test]
fn scenario_2_single_float4_uniform_gets_one_member_block() {
    let mut module = Module::new();
    module.add_uniform(fxc::ir::descriptor::UniformDescriptor {
        id: 0,
        name: "c".to_string(),
        ty: Type::FLOAT4,
        offset: 0,
        size: 16,
        initializer: None,
    });
    let (spirv, log) = fxc::compile_spirv(&module, fxc::spirv::Options::default());
    assert!(!log.is_failed());
    assert!(spirv.words.len() > 5);
}

#[test]
fn scenario_3_mixed_uniform_layout_matches_spec_offsets() {
    use fxc::spirv::layout::GlobalsLayout;
    let mut layout = GlobalsLayout::new();
    let a = layout.push("a", Type::FLOAT);
    let b = layout.push("b", Type::FLOAT3);
    let c = layout.push("c", Type::FLOAT);
    assert_eq!((a, b, c), (0, 16, 28));
    assert_eq!(layout.block_size(), 32);
}

#[test]
fn scenario_4_two_samplers_on_one_texture_are_independent_entries() {
    let mut module = Module::new();
    let tex = module
        .define_texture(
            "tex",
            64,
            64,
            1,
            TextureFormat::Rgba8,
            DescriptorBinding::new(1, 0),
        )
        .unwrap();
    module.add_sampler(SamplerDescriptor {
        id: 0,
        name: "s_linear".to_string(),
        texture: tex,
        filter: fxc::ir::descriptor::FilterMode::Linear,
        address_u: fxc::ir::descriptor::AddressMode::Wrap,
        address_v: fxc::ir::descriptor::AddressMode::Wrap,
        address_w: fxc::ir::descriptor::AddressMode::Wrap,
        min_lod: 0.0,
        max_lod: 1000.0,
        srgb: false,
        binding: DescriptorBinding::new(1, 0),
    });
    module.add_sampler(SamplerDescriptor {
        id: 1,
        name: "s_srgb".to_string(),
        texture: tex,
        filter: fxc::ir::descriptor::FilterMode::Linear,
        address_u: fxc::ir::descriptor::AddressMode::Wrap,
        address_v: fxc::ir::descriptor::AddressMode::Wrap,
        address_w: fxc::ir::descriptor::AddressMode::Wrap,
        min_lod: 0.0,
        max_lod: 1000.0,
        srgb: true,
        binding: DescriptorBinding::new(1, 1),
    });
    assert_eq!(module.samplers.len(), 2);
    let (spirv, log) = fxc::compile_spirv(&module, fxc::spirv::Options::default());
    assert!(!log.is_failed());
    assert!(spirv.words.len() > 5);
}

#[test]
fn scenario_5_pass_cannot_bind_mismatched_render_target_sizes() {
    let mut module = Module::new();
    module
        .define_texture("rt_a", 256, 256, 1, TextureFormat::Rgba8, DescriptorBinding::new(1, 0))
        .unwrap();
    module
        .define_texture("rt_b", 128, 128, 1, TextureFormat::Rgba8, DescriptorBinding::new(1, 1))
        .unwrap();
    let mut technique = TechniqueDescriptor::default();
    technique.name = "main".to_string();
    let mut pass = fxc::ir::descriptor::PassDescriptor::default();
    pass.render_targets[0] = Some("rt_a".to_string());
    pass.render_targets[1] = Some("rt_b".to_string());
    technique.passes.push(pass);
    module.add_technique(technique);

    assert!(module.validate_passes().is_err());
}

#[test]
fn scenario_6_vertex_entry_locations_are_assigned_in_order() {
    use fxc::codegen::CodeGenerator;
    use fxc::ir::descriptor::Parameter;
    use fxc::ir::ty::Qualifiers;
    use spirv_headers::{Decoration, Op};

    let mut position_ty = Type::FLOAT4;
    position_ty.qualifiers = Qualifiers::OUT;
    let mut uv_ty = Type::FLOAT2;
    uv_ty.qualifiers = Qualifiers::OUT;

    let position = Parameter {
        name: "position".to_string(),
        ty: position_ty,
        semantic: Some("SV_POSITION".to_string()),
    };
    let uv = Parameter { name: "uv".to_string(), ty: uv_ty, semantic: Some("TEXCOORD0".to_string()) };

    let mut gen = fxc::spirv::SpirvGenerator::new(fxc::spirv::Options::default());
    gen.define_parameter(&position);
    gen.define_parameter(&uv);
    let func = gen.define_function("vs_main", &[position, uv], Type::VOID);
    gen.leave_function();
    gen.create_entry_point(func, false);
    let module = gen.write_result();

    // Walk the word stream counting `BuiltIn`/`Location` decorations: the
    // `SV_POSITION` output gets a `BuiltIn`, the `TEXCOORD0` output gets the
    // one free `Location` slot.
    let (mut builtins, mut locations) = (0u32, Vec::new());
    let mut i = 5; // skip the fixed 5-word header (magic/version/generator/bound/schema)
    while i < module.words.len() {
        let word = module.words[i];
        let len = (word >> 16) as usize;
        let op = word & 0xffff;
        if op == Op::Decorate as u32 {
            let deco = module.words[i + 2];
            if deco == Decoration::BuiltIn as u32 {
                builtins += 1;
            } else if deco == Decoration::Location as u32 {
                locations.push(module.words[i + 3]);
            }
        }
        i += len.max(1);
    }
    assert_eq!(builtins, 1);
    assert_eq!(locations.len(), 1);

    // The raw semantic parser backing that decoration choice.
    use fxc::codegen::Semantic;
    assert_eq!(Semantic::parse("SV_POSITION"), Semantic::Builtin(fxc::codegen::Builtin::Position));
    assert_eq!(
        Semantic::parse("TEXCOORD0"),
        Semantic::Indexed { name: "TEXCOORD".to_string(), index: 0 }
    );
}
