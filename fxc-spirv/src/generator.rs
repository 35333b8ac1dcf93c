//! The SPIR-V `CodeGenerator` implementation.
//!
//! One `SpirvGenerator` is built per compile and consumed by
//! [`fxc_codegen::CodeGenerator::write_result`]; it is never reused across
//! compiles, so its id counters and interning tables start fresh each time.

use crate::builder::InstructionBuilder;
use crate::header::SpirvHeader;
use crate::interner::{ConstInterner, TypeInterner};
use crate::layout::GlobalsLayout;
use crate::options::Options;
use fxc_codegen::{
    BinaryOp, BlockId, Builtin, CodeGenerator, ControlFlags, Intrinsic, Semantic, SwitchCase,
    UnaryOp,
};
use fxc_diag::CompileLog;
use fxc_ir::descriptor::{
    FunctionId, Parameter, SamplerDescriptor, StructId, StructMember, TechniqueDescriptor,
    TextureDescriptor, UniformId,
};
use fxc_ir::expr::{AccessOp, Expr, ValueId};
use fxc_ir::locator::DescriptorBinding;
use fxc_ir::ty::{BaseType, Type};
use fxc_ir::Constant;
use fnv::FnvHashMap;
use spirv_headers::{
    BuiltIn, Capability, Decoration, ExecutionMode, ExecutionModel, Op, StorageClass,
};

pub struct SpirvModule {
    pub words: Vec<u32>,
}

struct Section(Vec<u32>);
impl Section {
    fn push_instr(&mut self, words: Vec<u32>) {
        self.0.extend(words);
    }
}

pub struct SpirvGenerator {
    options: Options,
    next_id: u32,
    capabilities: Section,
    extensions: Section,
    ext_inst_imports: Section,
    entry_points: Section,
    debug: Section,
    annotations: Section,
    globals: Section,
    functions: Section,
    current_block: Vec<u32>,
    type_interner: TypeInterner,
    const_interner: ConstInterner,
    globals_layout: GlobalsLayout,
    globals_started: bool,
    globals_struct_ty_id: Option<u32>,
    globals_var_id: Option<u32>,
    glsl_ext_id: Option<u32>,
    string_ids: FnvHashMap<String, u32>,
    next_location: u32,
    next_descriptor_binding: u32,
    next_struct_id: StructId,
    struct_members: FnvHashMap<StructId, Vec<StructMember>>,
    /// Ids reserved by `define_parameter`, paired with their descriptor, not
    /// yet claimed by the `define_function` call that declares them as real
    /// `OpFunctionParameter`s. Assumes callers declare a function's
    /// parameters (via `define_parameter`, in order) immediately before
    /// calling `define_function` with the same list.
    pending_params: Vec<(ValueId, Parameter)>,
    /// Per-function record of the parameters claimed out of `pending_params`,
    /// consulted by `create_entry_point` to synthesize the glue wrapper.
    function_signatures: FnvHashMap<FunctionId, FunctionSignature>,
    pub log: CompileLog,
}

struct FunctionSignature {
    params: Vec<(ValueId, Parameter)>,
    return_ty: Type,
}

impl SpirvGenerator {
    pub fn new(options: Options) -> SpirvGenerator {
        let mut gen = SpirvGenerator {
            options,
            next_id: 0,
            capabilities: Section(Vec::new()),
            extensions: Section(Vec::new()),
            ext_inst_imports: Section(Vec::new()),
            entry_points: Section(Vec::new()),
            debug: Section(Vec::new()),
            annotations: Section(Vec::new()),
            globals: Section(Vec::new()),
            functions: Section(Vec::new()),
            current_block: Vec::new(),
            type_interner: TypeInterner::new(),
            const_interner: ConstInterner::new(),
            globals_layout: GlobalsLayout::new(),
            globals_started: false,
            globals_struct_ty_id: None,
            globals_var_id: None,
            glsl_ext_id: None,
            string_ids: FnvHashMap::default(),
            next_location: options.auto_location_start,
            next_descriptor_binding: 0,
            next_struct_id: 0,
            struct_members: FnvHashMap::default(),
            pending_params: Vec::new(),
            function_signatures: FnvHashMap::default(),
            log: CompileLog::new(),
        };
        gen.capabilities.push_instr(
            InstructionBuilder::new(Op::Capability)
                .push(Capability::Matrix as u32)
                .build(),
        );
        gen.capabilities.push_instr(
            InstructionBuilder::new(Op::Capability)
                .push(Capability::Shader as u32)
                .build(),
        );
        gen.extensions.push_instr(
            InstructionBuilder::new(Op::Extension)
                .push_str("SPV_GOOGLE_hlsl_functionality1")
                .build(),
        );
        let glsl_id = gen.alloc_id();
        gen.ext_inst_imports.push_instr(
            InstructionBuilder::new(Op::ExtInstImport)
                .push(glsl_id)
                .push_str("GLSL.std.450")
                .build(),
        );
        gen.glsl_ext_id = Some(glsl_id);
        gen
    }

    fn alloc_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn intern_string(&mut self, s: &str) -> u32 {
        if let Some(id) = self.string_ids.get(s) {
            return *id;
        }
        let id = self.alloc_id();
        self.debug
            .push_instr(InstructionBuilder::new(Op::String).push(id).push_str(s).build());
        self.string_ids.insert(s.to_string(), id);
        id
    }

    fn emit_line(&mut self, location: &Option<fxc_ir::expr::SourceLocation>) {
        if !self.options.emit_debug_info {
            return;
        }
        if let Some(loc) = location {
            // file ids are assigned by the caller into the string table ahead of time.
            self.debug.push_instr(
                InstructionBuilder::new(Op::Line)
                    .push(loc.file)
                    .push(loc.line)
                    .push(loc.column)
                    .build(),
            );
        }
    }

    /// Interns a scalar/vector/matrix/array/struct/texture/sampler type,
    /// emitting its declaration the first time it's seen. Recurses on
    /// element types bottom-up, the same walk order as
    /// `spirq::ty::Type::walk`.
    fn intern_type(&mut self, ty: Type) -> u32 {
        if let Some(id) = self.type_interner.find(&ty) {
            return id;
        }
        if ty.is_pointer {
            let mut pointee = ty;
            pointee.is_pointer = false;
            let pointee_id = self.intern_type(pointee);
            let storage = TypeInterner::pointer_storage_class(&ty);
            let id = self.alloc_id();
            self.globals.push_instr(
                InstructionBuilder::new(Op::TypePointer)
                    .push(id)
                    .push(storage as u32)
                    .push(pointee_id)
                    .build(),
            );
            self.type_interner.intern(ty, id);
            return id;
        }
        if ty.is_array() {
            let elem_id = self.intern_type(ty.elem_type());
            let id = self.alloc_id();
            if ty.is_unsized_array() {
                self.globals.push_instr(
                    InstructionBuilder::new(Op::TypeRuntimeArray)
                        .push(id)
                        .push(elem_id)
                        .build(),
                );
            } else {
                let len_const = Constant::from_u32(ty.array_len as u32);
                let len_id = self.intern_constant(&len_const);
                self.globals.push_instr(
                    InstructionBuilder::new(Op::TypeArray)
                        .push(id)
                        .push(elem_id)
                        .push(len_id)
                        .build(),
                );
            }
            self.type_interner.intern(ty, id);
            return id;
        }
        if ty.is_matrix() {
            let col_ty = ty.component_type();
            let col_ty = Type { rows: ty.rows, ..col_ty };
            let col_id = self.intern_type(col_ty);
            let id = self.alloc_id();
            self.globals.push_instr(
                InstructionBuilder::new(Op::TypeMatrix)
                    .push(id)
                    .push(col_id)
                    .push(ty.cols as u32)
                    .build(),
            );
            self.type_interner.intern(ty, id);
            return id;
        }
        if ty.is_vector() {
            let scalar_id = self.intern_type(ty.component_type());
            let id = self.alloc_id();
            self.globals.push_instr(
                InstructionBuilder::new(Op::TypeVector)
                    .push(id)
                    .push(scalar_id)
                    .push(ty.rows as u32)
                    .build(),
            );
            self.type_interner.intern(ty, id);
            return id;
        }
        let id = self.alloc_id();
        match ty.base {
            BaseType::Void => {
                self.globals.push_instr(InstructionBuilder::new(Op::TypeVoid).push(id).build());
            }
            BaseType::Bool => {
                self.globals.push_instr(InstructionBuilder::new(Op::TypeBool).push(id).build());
            }
            BaseType::Int | BaseType::Uint => {
                self.globals.push_instr(
                    InstructionBuilder::new(Op::TypeInt)
                        .push(id)
                        .push(32)
                        .push((ty.base == BaseType::Int) as u32)
                        .build(),
                );
            }
            BaseType::Float => {
                self.globals
                    .push_instr(InstructionBuilder::new(Op::TypeFloat).push(id).push(32).build());
            }
            BaseType::Texture => {
                let float_id = self.intern_type(Type::FLOAT);
                self.globals.push_instr(
                    InstructionBuilder::new(Op::TypeImage)
                        .push(id)
                        .push(float_id)
                        .push(spirv_headers::Dim::Dim2D as u32)
                        .push(0)
                        .push(0)
                        .push(0)
                        .push(1)
                        .push(spirv_headers::ImageFormat::Unknown as u32)
                        .build(),
                );
            }
            BaseType::Sampler => {
                let image_ty = Type::TEXTURE;
                let image_id = self.intern_type(image_ty);
                self.globals.push_instr(
                    InstructionBuilder::new(Op::TypeSampledImage)
                        .push(id)
                        .push(image_id)
                        .build(),
                );
            }
            BaseType::Struct | BaseType::String => {
                self.globals
                    .push_instr(InstructionBuilder::new(Op::TypeStruct).push(id).build());
            }
        }
        self.type_interner.intern(ty, id);
        id
    }

    fn intern_constant(&mut self, c: &Constant) -> u32 {
        if let Some(id) = self.const_interner.find(c) {
            return id;
        }
        let ty_id = self.intern_type(c.ty);
        let id = self.alloc_id();
        if c.ty.base == BaseType::Bool {
            let op = if c.as_bool(0) { Op::ConstantTrue } else { Op::ConstantFalse };
            self.globals.push_instr(InstructionBuilder::new(op).push(ty_id).push(id).build());
        } else if c.ty.is_scalar() {
            self.globals.push_instr(
                InstructionBuilder::new(Op::Constant)
                    .push(ty_id)
                    .push(id)
                    .push(c.lanes()[0])
                    .build(),
            );
        } else {
            let mut component_ids = Vec::new();
            for lane in c.used_lanes() {
                let comp = Constant::from_u32(*lane);
                let mut comp = comp;
                comp.ty = c.ty.component_type();
                component_ids.push(self.intern_constant(&comp));
            }
            self.globals.push_instr(
                InstructionBuilder::new(Op::ConstantComposite)
                    .push(ty_id)
                    .push(id)
                    .push_list(&component_ids)
                    .build(),
            );
        }
        self.const_interner.intern(c, id);
        id
    }

    fn decorate(&mut self, target: u32, deco: Decoration, params: &[u32]) {
        self.annotations.push_instr(
            InstructionBuilder::new(Op::Decorate)
                .push(target)
                .push(deco as u32)
                .push_list(params)
                .build(),
        );
    }

    fn ensure_globals_var(&mut self) -> (u32, u32) {
        if let (Some(ty), Some(var)) = (self.globals_struct_ty_id, self.globals_var_id) {
            return (ty, var);
        }
        // Placeholder struct type id reserved up front; members are decorated
        // incrementally as `define_uniform` is called, and the struct's
        // member-type operand list is rebuilt in `finalize_globals`.
        self.globals_started = true;
        let ty_id = self.alloc_id();
        let ptr_id = self.alloc_id();
        let var_id = self.alloc_id();
        self.globals_struct_ty_id = Some(ty_id);
        self.globals_var_id = Some(var_id);
        self.decorate(ty_id, Decoration::Block, &[]);
        self.annotations.push_instr(
            InstructionBuilder::new(Op::Decorate)
                .push(var_id)
                .push(Decoration::DescriptorSet as u32)
                .push(0)
                .build(),
        );
        self.annotations.push_instr(
            InstructionBuilder::new(Op::Decorate)
                .push(var_id)
                .push(Decoration::Binding as u32)
                .push(0)
                .build(),
        );
        // `OpTypePointer`/`OpVariable` for the block are written lazily in
        // `write_result` once every member type is known, so only the ids
        // are reserved here; see `finalize_globals`.
        let _ = ptr_id;
        (ty_id, var_id)
    }

    fn finalize_globals(&mut self) {
        let Some(ty_id) = self.globals_struct_ty_id else { return };
        let var_id = self.globals_var_id.unwrap();
        let member_ty_ids: Vec<u32> = self
            .globals_layout
            .members
            .iter()
            .map(|(_, ty, _)| self.type_interner.find(ty).expect("member type interned"))
            .collect();
        self.globals.push_instr(
            InstructionBuilder::new(Op::TypeStruct)
                .push(ty_id)
                .push_list(&member_ty_ids)
                .build(),
        );
        for (idx, (_, _, offset)) in self.globals_layout.members.iter().enumerate() {
            self.annotations.push_instr(
                InstructionBuilder::new(Op::MemberDecorate)
                    .push(ty_id)
                    .push(idx as u32)
                    .push(Decoration::Offset as u32)
                    .push(*offset)
                    .build(),
            );
        }
        let ptr_id = self.alloc_id();
        self.globals.push_instr(
            InstructionBuilder::new(Op::TypePointer)
                .push(ptr_id)
                .push(StorageClass::Uniform as u32)
                .push(ty_id)
                .build(),
        );
        self.globals.push_instr(
            InstructionBuilder::new(Op::Variable)
                .push(ptr_id)
                .push(var_id)
                .push(StorageClass::Uniform as u32)
                .build(),
        );
    }

    fn next_binding(&mut self) -> DescriptorBinding {
        let bind = self.next_descriptor_binding;
        self.next_descriptor_binding += 1;
        DescriptorBinding::new(1, bind)
    }
}

impl CodeGenerator for SpirvGenerator {
    type Module = SpirvModule;

    fn define_struct(&mut self, _name: Option<&str>, members: &[StructMember]) -> StructId {
        for m in members {
            self.intern_type(m.ty);
        }
        let id = self.next_struct_id;
        self.next_struct_id += 1;
        self.struct_members.insert(id, members.to_vec());
        id
    }

    fn define_texture(&mut self, desc: &TextureDescriptor) {
        self.intern_type(Type::TEXTURE);
        let name = self.intern_string(&desc.name);
        let _ = name;
    }

    fn define_sampler(&mut self, desc: &SamplerDescriptor) {
        let sampler_ty = Type::SAMPLER;
        let ty_id = self.intern_type(sampler_ty);
        let binding = self.next_binding();
        let var_id = self.alloc_id();
        self.globals.push_instr(
            InstructionBuilder::new(Op::Variable)
                .push(ty_id)
                .push(var_id)
                .push(StorageClass::UniformConstant as u32)
                .build(),
        );
        self.annotations.push_instr(
            InstructionBuilder::new(Op::Decorate)
                .push(var_id)
                .push(Decoration::DescriptorSet as u32)
                .push(binding.set())
                .build(),
        );
        self.annotations.push_instr(
            InstructionBuilder::new(Op::Decorate)
                .push(var_id)
                .push(Decoration::Binding as u32)
                .push(binding.bind())
                .build(),
        );
        self.debug.push_instr(
            InstructionBuilder::new(Op::Name).push(var_id).push_str(&desc.name).build(),
        );
    }

    fn define_uniform(
        &mut self,
        name: &str,
        ty: Type,
        _initializer: Option<&Constant>,
    ) -> (UniformId, DescriptorBinding, u32) {
        self.ensure_globals_var();
        self.intern_type(ty);
        let offset = self.globals_layout.push(name, ty);
        (0, DescriptorBinding::new(0, 0), offset)
    }

    fn define_variable(&mut self, name: &str, ty: Type) -> ValueId {
        let mut local_ty = ty;
        local_ty.is_pointer = true;
        let ptr_ty_id = self.intern_type(local_ty);
        let id = self.alloc_id();
        self.functions.push_instr(
            InstructionBuilder::new(Op::Variable)
                .push(ptr_ty_id)
                .push(id)
                .push(StorageClass::Function as u32)
                .build(),
        );
        self.debug.push_instr(InstructionBuilder::new(Op::Name).push(id).push_str(name).build());
        id
    }

    /// Reserves the parameter's `ValueId` and queues its descriptor for the
    /// owning `define_function` call to claim. Interface-variable creation
    /// happens later, in `create_entry_point`, which is the only place that
    /// knows whether the enclosing function is actually used as an entry
    /// point (a helper function taking the same `Parameter` shape should not
    /// get module-scope Input/Output storage).
    fn define_parameter(&mut self, param: &Parameter) -> ValueId {
        self.intern_type(param.ty);
        let id = self.alloc_id();
        self.pending_params.push((id, param.clone()));
        id
    }

    fn define_function(&mut self, name: &str, params: &[Parameter], return_ty: Type) -> FunctionId {
        let ret_id = self.intern_type(return_ty);
        let split_at = self.pending_params.len().saturating_sub(params.len());
        let claimed = self.pending_params.split_off(split_at);
        let func_id = self.alloc_id();
        self.debug
            .push_instr(InstructionBuilder::new(Op::Name).push(func_id).push_str(name).build());
        self.functions.push_instr(
            InstructionBuilder::new(Op::Function)
                .push(ret_id)
                .push(func_id)
                .push(0) // function control mask: none
                .push(0) // function type id resolved by linker pass in a full implementation
                .build(),
        );
        for (id, param) in &claimed {
            // A function's own parameters are plain Function-storage
            // pointers, never the module-scope Input/Output pointers the
            // same `Parameter` turns into at the entry-point boundary.
            let mut local_ty = param.ty;
            local_ty.qualifiers = fxc_ir::ty::Qualifiers::empty();
            local_ty.is_pointer = true;
            let ptr_ty_id = self.intern_type(local_ty);
            self.functions.push_instr(
                InstructionBuilder::new(Op::FunctionParameter).push(ptr_ty_id).push(*id).build(),
            );
            self.debug.push_instr(
                InstructionBuilder::new(Op::Name).push(*id).push_str(&param.name).build(),
            );
        }
        log::trace!("fxc-spirv: defined function `{name}` (id {func_id}) with {} parameter(s)", claimed.len());
        self.function_signatures.insert(func_id, FunctionSignature { params: claimed, return_ty });
        func_id
    }

    fn define_technique(&mut self, _technique: &TechniqueDescriptor) {}

    /// Synthesizes the entry-point glue: a fresh `main` function that loads
    /// each `IN` parameter from a module-scope Input variable into a
    /// Function-storage local, calls `func` passing those locals' pointers
    /// (matching `func`'s own `OpFunctionParameter`s), writes `OUT` locals
    /// back to Output variables, and is itself what `OpEntryPoint` names.
    /// Struct-typed parameters are expanded member-by-member at the
    /// interface boundary (one Input/Output variable per member) and
    /// assembled/decomposed around the call with
    /// `OpCompositeConstruct`/`OpCompositeExtract`. A non-void return value
    /// from `func` is discarded: the `CodeGenerator` trait doesn't carry a
    /// return semantic through to this call, so there is no slot to write it
    /// to.
    fn create_entry_point(&mut self, func: FunctionId, is_pixel_stage: bool) -> FunctionId {
        let exec_model = if is_pixel_stage {
            ExecutionModel::Fragment
        } else {
            ExecutionModel::Vertex
        };
        let signature = self.function_signatures.remove(&func).unwrap_or(FunctionSignature {
            params: Vec::new(),
            return_ty: Type::VOID,
        });

        let void_ty = self.intern_type(Type::VOID);
        let glue_id = self.alloc_id();
        self.debug.push_instr(InstructionBuilder::new(Op::Name).push(glue_id).push_str("main").build());
        self.functions.push_instr(
            InstructionBuilder::new(Op::Function)
                .push(void_ty)
                .push(glue_id)
                .push(0)
                .push(0)
                .build(),
        );
        let label_id = self.alloc_id();
        let mut body = InstructionBuilder::new(Op::Label).push(label_id).build();

        let mut interface = Vec::new();
        let mut call_args = Vec::new();
        let mut out_scalar_writes: Vec<(u32, u32, Type)> = Vec::new();
        let mut out_struct_writes: Vec<(u32, u32, u32, Type, Type)> = Vec::new();

        for (_, param) in &signature.params {
            use fxc_ir::ty::Qualifiers as Q;
            let is_in = param.ty.qualifiers.contains(Q::IN);
            let is_out = param.ty.qualifiers.contains(Q::OUT);

            let mut local_ty = param.ty;
            local_ty.qualifiers = Q::empty();
            local_ty.is_pointer = true;
            let local_ptr_ty_id = self.intern_type(local_ty);
            let local_id = self.alloc_id();
            body.extend(
                InstructionBuilder::new(Op::Variable)
                    .push(local_ptr_ty_id)
                    .push(local_id)
                    .push(StorageClass::Function as u32)
                    .build(),
            );

            let members = if param.ty.base == BaseType::Struct {
                param.ty.struct_id.and_then(|sid| self.struct_members.get(&sid).cloned())
            } else {
                None
            };

            if is_in {
                if let Some(members) = &members {
                    let mut member_ids = Vec::new();
                    for m in members {
                        let mut member_ty = m.ty;
                        member_ty.qualifiers = Q::IN;
                        let var_id = self.create_interface_var(
                            member_ty,
                            &m.name,
                            m.semantic.as_deref(),
                            StorageClass::Input,
                        );
                        interface.push(var_id);
                        let member_ty_id = self.intern_type(m.ty);
                        let loaded = self.alloc_id();
                        body.extend(
                            InstructionBuilder::new(Op::Load)
                                .push(member_ty_id)
                                .push(loaded)
                                .push(var_id)
                                .build(),
                        );
                        member_ids.push(loaded);
                    }
                    let struct_ty_id = self.intern_type(param.ty);
                    let constructed = self.alloc_id();
                    body.extend(
                        InstructionBuilder::new(Op::CompositeConstruct)
                            .push(struct_ty_id)
                            .push(constructed)
                            .push_list(&member_ids)
                            .build(),
                    );
                    body.extend(
                        InstructionBuilder::new(Op::Store).push(local_id).push(constructed).build(),
                    );
                } else {
                    let var_id = self.create_interface_var(
                        param.ty,
                        &param.name,
                        param.semantic.as_deref(),
                        StorageClass::Input,
                    );
                    interface.push(var_id);
                    let ty_id = self.intern_type(param.ty);
                    let loaded = self.alloc_id();
                    body.extend(
                        InstructionBuilder::new(Op::Load).push(ty_id).push(loaded).push(var_id).build(),
                    );
                    body.extend(
                        InstructionBuilder::new(Op::Store).push(local_id).push(loaded).build(),
                    );
                }
            }

            call_args.push(local_id);

            if is_out {
                if let Some(members) = &members {
                    for (idx, m) in members.iter().enumerate() {
                        let mut member_ty = m.ty;
                        member_ty.qualifiers = Q::OUT;
                        let var_id = self.create_interface_var(
                            member_ty,
                            &m.name,
                            m.semantic.as_deref(),
                            StorageClass::Output,
                        );
                        interface.push(var_id);
                        out_struct_writes.push((var_id, local_id, idx as u32, m.ty, param.ty));
                    }
                } else {
                    let var_id = self.create_interface_var(
                        param.ty,
                        &param.name,
                        param.semantic.as_deref(),
                        StorageClass::Output,
                    );
                    interface.push(var_id);
                    out_scalar_writes.push((var_id, local_id, param.ty));
                }
            }
        }

        let ret_ty_id = self.intern_type(signature.return_ty);
        let call_id = self.alloc_id();
        body.extend(
            InstructionBuilder::new(Op::FunctionCall)
                .push(ret_ty_id)
                .push(call_id)
                .push(func)
                .push_list(&call_args)
                .build(),
        );

        for (var_id, local_id, ty) in out_scalar_writes {
            let ty_id = self.intern_type(ty);
            let loaded = self.alloc_id();
            body.extend(
                InstructionBuilder::new(Op::Load).push(ty_id).push(loaded).push(local_id).build(),
            );
            body.extend(InstructionBuilder::new(Op::Store).push(var_id).push(loaded).build());
        }
        for (var_id, local_id, idx, member_ty, struct_ty) in out_struct_writes {
            let struct_ty_id = self.intern_type(struct_ty);
            let loaded_struct = self.alloc_id();
            body.extend(
                InstructionBuilder::new(Op::Load)
                    .push(struct_ty_id)
                    .push(loaded_struct)
                    .push(local_id)
                    .build(),
            );
            let member_ty_id = self.intern_type(member_ty);
            let extracted = self.alloc_id();
            body.extend(
                InstructionBuilder::new(Op::CompositeExtract)
                    .push(member_ty_id)
                    .push(extracted)
                    .push(loaded_struct)
                    .push(idx)
                    .build(),
            );
            body.extend(InstructionBuilder::new(Op::Store).push(var_id).push(extracted).build());
        }

        body.extend(InstructionBuilder::new(Op::Return).build());
        self.functions.push_instr(body);
        self.functions.push_instr(InstructionBuilder::new(Op::FunctionEnd).build());

        self.entry_points.push_instr(
            InstructionBuilder::new(Op::EntryPoint)
                .push(exec_model as u32)
                .push(glue_id)
                .push_str("main")
                .push_list(&interface)
                .build(),
        );
        if is_pixel_stage {
            self.entry_points.push_instr(
                InstructionBuilder::new(Op::ExecutionMode)
                    .push(glue_id)
                    .push(ExecutionMode::OriginUpperLeft as u32)
                    .build(),
            );
        }
        log::trace!("fxc-spirv: entry point glue for function {func} -> {glue_id}, {} interface var(s)", interface.len());
        glue_id
    }

    fn emit_constant(&mut self, value: &Constant) -> ValueId {
        self.intern_constant(value)
    }

    fn emit_unary_op(&mut self, op: UnaryOp, operand: ValueId, ty: Type) -> ValueId {
        let ty_id = self.intern_type(ty);
        let id = self.alloc_id();
        let opcode = match (op, ty.base) {
            (UnaryOp::Neg, BaseType::Float) => Op::FNegate,
            (UnaryOp::Neg, _) => Op::SNegate,
            (UnaryOp::Not, _) => Op::LogicalNot,
            (UnaryOp::BitNot, _) => Op::Not,
            _ => Op::CopyObject,
        };
        self.current_block.extend(
            InstructionBuilder::new(opcode)
                .push(ty_id)
                .push(id)
                .push(operand)
                .build(),
        );
        if ty.qualifiers.contains(fxc_ir::ty::Qualifiers::PRECISE) {
            self.decorate(id, Decoration::NoContraction, &[]);
        }
        id
    }

    fn emit_binary_op(&mut self, op: BinaryOp, lhs: ValueId, rhs: ValueId, ty: Type) -> ValueId {
        let ty_id = self.intern_type(ty);
        let id = self.alloc_id();
        let is_float = ty.base == BaseType::Float;
        let is_signed = ty.base == BaseType::Int;
        let opcode = match op {
            BinaryOp::Add if is_float => Op::FAdd,
            BinaryOp::Add => Op::IAdd,
            BinaryOp::Sub if is_float => Op::FSub,
            BinaryOp::Sub => Op::ISub,
            BinaryOp::Mul if is_float => Op::FMul,
            BinaryOp::Mul => Op::IMul,
            BinaryOp::Div if is_float => Op::FDiv,
            BinaryOp::Div if is_signed => Op::SDiv,
            BinaryOp::Div => Op::UDiv,
            BinaryOp::Rem if is_float => Op::FRem,
            BinaryOp::Rem if is_signed => Op::SRem,
            BinaryOp::Rem => Op::UMod,
            BinaryOp::BitAnd => Op::BitwiseAnd,
            BinaryOp::BitOr => Op::BitwiseOr,
            BinaryOp::BitXor => Op::BitwiseXor,
            BinaryOp::Shl => Op::ShiftLeftLogical,
            BinaryOp::Shr => Op::ShiftRightLogical,
            BinaryOp::And => Op::LogicalAnd,
            BinaryOp::Or => Op::LogicalOr,
            BinaryOp::Eq if is_float => Op::FOrdEqual,
            BinaryOp::Eq => Op::IEqual,
            BinaryOp::Ne if is_float => Op::FOrdNotEqual,
            BinaryOp::Ne => Op::INotEqual,
            BinaryOp::Lt if is_float => Op::FOrdLessThan,
            BinaryOp::Lt if is_signed => Op::SLessThan,
            BinaryOp::Lt => Op::ULessThan,
            BinaryOp::Le if is_float => Op::FOrdLessThanEqual,
            BinaryOp::Le if is_signed => Op::SLessThanEqual,
            BinaryOp::Le => Op::ULessThanEqual,
            BinaryOp::Gt if is_float => Op::FOrdGreaterThan,
            BinaryOp::Gt if is_signed => Op::SGreaterThan,
            BinaryOp::Gt => Op::UGreaterThan,
            BinaryOp::Ge if is_float => Op::FOrdGreaterThanEqual,
            BinaryOp::Ge if is_signed => Op::SGreaterThanEqual,
            BinaryOp::Ge => Op::UGreaterThanEqual,
        };
        self.current_block.extend(
            InstructionBuilder::new(opcode)
                .push(ty_id)
                .push(id)
                .push(lhs)
                .push(rhs)
                .build(),
        );
        if ty.qualifiers.contains(fxc_ir::ty::Qualifiers::PRECISE) {
            self.decorate(id, Decoration::NoContraction, &[]);
        }
        id
    }

    fn emit_ternary_op(&mut self, cond: ValueId, t: ValueId, f: ValueId, ty: Type) -> ValueId {
        let ty_id = self.intern_type(ty);
        let id = self.alloc_id();
        self.current_block.extend(
            InstructionBuilder::new(Op::Select)
                .push(ty_id)
                .push(id)
                .push(cond)
                .push(t)
                .push(f)
                .build(),
        );
        id
    }

    fn emit_phi(&mut self, ty: Type, incoming: &[(ValueId, BlockId)]) -> ValueId {
        let ty_id = self.intern_type(ty);
        let id = self.alloc_id();
        let mut pairs = Vec::with_capacity(incoming.len() * 2);
        for (value, block) in incoming {
            pairs.push(*value);
            pairs.push(*block);
        }
        self.current_block.extend(
            InstructionBuilder::new(Op::Phi)
                .push(ty_id)
                .push(id)
                .push_list(&pairs)
                .build(),
        );
        id
    }

    fn emit_call(&mut self, func: FunctionId, args: &[ValueId]) -> ValueId {
        let id = self.alloc_id();
        self.current_block.extend(
            InstructionBuilder::new(Op::FunctionCall)
                .push(0)
                .push(id)
                .push(func)
                .push_list(args)
                .build(),
        );
        id
    }

    fn emit_call_intrinsic(&mut self, intrinsic: Intrinsic, args: &[ValueId], ty: Type) -> ValueId {
        let ty_id = self.intern_type(ty);
        let id = self.alloc_id();
        if intrinsic == Intrinsic::Sample {
            self.current_block.extend(
                InstructionBuilder::new(Op::ImageSampleImplicitLod)
                    .push(ty_id)
                    .push(id)
                    .push_list(args)
                    .build(),
            );
            return id;
        }
        let glsl_opcode: u32 = match intrinsic {
            Intrinsic::Abs => 4,
            Intrinsic::Saturate => 43,
            Intrinsic::Clamp => 43,
            Intrinsic::Lerp => 46,
            Intrinsic::Normalize => 69,
            Intrinsic::Cross => 68,
            Intrinsic::Pow => 26,
            Intrinsic::Sqrt => 31,
            Intrinsic::Sin => 13,
            Intrinsic::Cos => 14,
            Intrinsic::Tan => 15,
            Intrinsic::Min => 37,
            Intrinsic::Max => 40,
            Intrinsic::Floor => 8,
            Intrinsic::Ceil => 9,
            Intrinsic::Frac => 10,
            Intrinsic::Dot | Intrinsic::Mul | Intrinsic::Sample => 0,
        };
        if matches!(intrinsic, Intrinsic::Dot) {
            self.current_block.extend(
                InstructionBuilder::new(Op::Dot)
                    .push(ty_id)
                    .push(id)
                    .push_list(args)
                    .build(),
            );
            return id;
        }
        let ext_id = self.glsl_ext_id.expect("GLSL.std.450 import always present");
        self.current_block.extend(
            InstructionBuilder::new(Op::ExtInst)
                .push(ty_id)
                .push(id)
                .push(ext_id)
                .push(glsl_opcode)
                .push_list(args)
                .build(),
        );
        id
    }

    fn emit_construct(&mut self, ty: Type, components: &[ValueId]) -> ValueId {
        let ty_id = self.intern_type(ty);
        let id = self.alloc_id();
        self.current_block.extend(
            InstructionBuilder::new(Op::CompositeConstruct)
                .push(ty_id)
                .push(id)
                .push_list(components)
                .build(),
        );
        id
    }

    fn emit_load(&mut self, chain: &Expr) -> ValueId {
        self.emit_line(&chain.location);
        let indices = chain.leading_indices();
        let mut value = chain.base;
        if !indices.is_empty() {
            let mut index_ids = Vec::new();
            for op in indices {
                if let AccessOp::Index { index, .. } = op {
                    index_ids.push(*index);
                }
            }
            let mut result_ty = chain.ty;
            result_ty.is_pointer = true;
            let ptr_ty_id = self.intern_type(result_ty);
            let chain_id = self.alloc_id();
            self.current_block.extend(
                InstructionBuilder::new(Op::AccessChain)
                    .push(ptr_ty_id)
                    .push(chain_id)
                    .push(value)
                    .push_list(&index_ids)
                    .build(),
            );
            let ty_id = self.intern_type(chain.ty);
            let loaded_id = self.alloc_id();
            self.current_block.extend(
                InstructionBuilder::new(Op::Load)
                    .push(ty_id)
                    .push(loaded_id)
                    .push(chain_id)
                    .build(),
            );
            value = loaded_id;
        }
        for op in chain.trailing_ops() {
            value = self.apply_trailing_op(op, value);
        }
        value
    }

    fn emit_store(&mut self, chain: &Expr, value: ValueId, _value_ty: Type) {
        self.emit_line(&chain.location);
        let indices = chain.leading_indices();
        let mut target = chain.base;
        if !indices.is_empty() {
            let mut index_ids = Vec::new();
            for op in indices {
                if let AccessOp::Index { index, .. } = op {
                    index_ids.push(*index);
                }
            }
            let mut ptr_ty = chain.ty;
            ptr_ty.is_pointer = true;
            let ptr_ty_id = self.intern_type(ptr_ty);
            let chain_id = self.alloc_id();
            self.current_block.extend(
                InstructionBuilder::new(Op::AccessChain)
                    .push(ptr_ty_id)
                    .push(chain_id)
                    .push(target)
                    .push_list(&index_ids)
                    .build(),
            );
            target = chain_id;
        }
        self.current_block.extend(
            InstructionBuilder::new(Op::Store).push(target).push(value).build(),
        );
    }

    fn set_block(&mut self, block: BlockId) {
        self.current_block.extend(InstructionBuilder::new(Op::Label).push(block).build());
    }

    fn enter_block(&mut self, block: BlockId) {
        self.set_block(block);
    }

    fn leave_block_and_branch(&mut self, target: BlockId) {
        self.current_block
            .extend(InstructionBuilder::new(Op::Branch).push(target).build());
        self.flush_block();
    }

    fn leave_block_and_branch_conditional(
        &mut self,
        cond: ValueId,
        true_block: BlockId,
        false_block: BlockId,
    ) {
        self.current_block.extend(
            InstructionBuilder::new(Op::BranchConditional)
                .push(cond)
                .push(true_block)
                .push(false_block)
                .build(),
        );
        self.flush_block();
    }

    fn leave_block_and_switch(&mut self, selector: ValueId, default: BlockId, cases: &[SwitchCase]) {
        let mut builder = InstructionBuilder::new(Op::Switch).push(selector).push(default);
        for case in cases {
            builder = builder.push(case.literal as u32).push(case.target);
        }
        self.current_block.extend(builder.build());
        self.flush_block();
    }

    fn leave_block_and_return(&mut self, value: Option<ValueId>) {
        match value {
            Some(v) => self
                .current_block
                .extend(InstructionBuilder::new(Op::ReturnValue).push(v).build()),
            None => self.current_block.extend(InstructionBuilder::new(Op::Return).build()),
        }
        self.flush_block();
    }

    fn leave_block_and_kill(&mut self) {
        self.current_block.extend(InstructionBuilder::new(Op::Kill).build());
        self.flush_block();
    }

    fn emit_if(&mut self, merge: BlockId, control: ControlFlags) {
        self.current_block.extend(
            InstructionBuilder::new(Op::SelectionMerge)
                .push(merge)
                .push(control_mask(control))
                .build(),
        );
    }

    fn emit_loop(&mut self, merge: BlockId, continue_target: BlockId, control: ControlFlags) {
        self.current_block.extend(
            InstructionBuilder::new(Op::LoopMerge)
                .push(merge)
                .push(continue_target)
                .push(control_mask(control))
                .build(),
        );
    }

    fn emit_switch(&mut self, merge: BlockId) {
        self.current_block
            .extend(InstructionBuilder::new(Op::SelectionMerge).push(merge).push(0).build());
    }

    fn enter_function(&mut self, _func: FunctionId) {}

    fn leave_function(&mut self) {
        self.functions.push_instr(InstructionBuilder::new(Op::FunctionEnd).build());
    }

    fn write_result(mut self) -> SpirvModule {
        self.finalize_globals();
        let header = SpirvHeader::new(self.options.spirv_minor_version, self.next_id + 1);
        let mut words = Vec::new();
        words.extend(header.words());
        words.extend(self.capabilities.0);
        words.extend(self.extensions.0);
        words.extend(self.ext_inst_imports.0);
        words.extend(
            InstructionBuilder::new(Op::MemoryModel)
                .push(spirv_headers::AddressingModel::Logical as u32)
                .push(spirv_headers::MemoryModel::GLSL450 as u32)
                .build(),
        );
        words.extend(self.entry_points.0);
        words.extend(self.debug.0);
        words.extend(self.annotations.0);
        words.extend(self.globals.0);
        words.extend(self.functions.0);
        SpirvModule { words }
    }
}

impl SpirvGenerator {
    fn apply_trailing_op(&mut self, op: &AccessOp, value: ValueId) -> ValueId {
        match op {
            AccessOp::Cast { from, to } => {
                let ty_id = self.intern_type(*to);
                let id = self.alloc_id();
                if from.base == BaseType::Bool && to.base != BaseType::Bool {
                    // Boolean source has no numeric bit pattern to convert or
                    // bitcast; select between the target type's 0 and 1.
                    let one = match to.base {
                        BaseType::Float => Constant::from_f32(1.0),
                        BaseType::Uint => Constant::from_u32(1),
                        _ => Constant::from_i32(1),
                    };
                    let zero = match to.base {
                        BaseType::Float => Constant::from_f32(0.0),
                        BaseType::Uint => Constant::from_u32(0),
                        _ => Constant::from_i32(0),
                    };
                    let one_id = self.intern_constant(&one);
                    let zero_id = self.intern_constant(&zero);
                    self.current_block.extend(
                        InstructionBuilder::new(Op::Select)
                            .push(ty_id)
                            .push(id)
                            .push(value)
                            .push(one_id)
                            .push(zero_id)
                            .build(),
                    );
                } else {
                    let opcode = match (from.base, to.base) {
                        (BaseType::Float, BaseType::Int) => Op::ConvertFToS,
                        (BaseType::Float, BaseType::Uint) => Op::ConvertFToU,
                        (BaseType::Int, BaseType::Float) => Op::ConvertSToF,
                        (BaseType::Uint, BaseType::Float) => Op::ConvertUToF,
                        (BaseType::Int, BaseType::Uint) | (BaseType::Uint, BaseType::Int) => {
                            Op::Bitcast
                        }
                        _ => Op::CopyObject,
                    };
                    self.current_block.extend(
                        InstructionBuilder::new(opcode).push(ty_id).push(id).push(value).build(),
                    );
                }
                id
            }
            AccessOp::Swizzle { components } => {
                let n = components.iter().take_while(|c| **c >= 0).count();
                let ty = Type::vector(BaseType::Float, n as u8);
                let ty_id = self.intern_type(ty);
                let id = self.alloc_id();
                let indices: Vec<u32> = components[..n].iter().map(|c| *c as u32).collect();
                if n == 1 {
                    self.current_block.extend(
                        InstructionBuilder::new(Op::CompositeExtract)
                            .push(ty_id)
                            .push(id)
                            .push(value)
                            .push_list(&indices)
                            .build(),
                    );
                } else {
                    self.current_block.extend(
                        InstructionBuilder::new(Op::VectorShuffle)
                            .push(ty_id)
                            .push(id)
                            .push(value)
                            .push(value)
                            .push_list(&indices)
                            .build(),
                    );
                }
                id
            }
            AccessOp::Index { .. } => value,
        }
    }

    fn flush_block(&mut self) {
        self.functions.push_instr(std::mem::take(&mut self.current_block));
    }

    /// Creates a module-scope Input/Output interface variable for one
    /// varying (a whole parameter, or one member of a struct parameter),
    /// decorated with its `BuiltIn`/`Location` per its semantic and with any
    /// interpolation qualifiers it carries.
    fn create_interface_var(
        &mut self,
        ty: Type,
        name: &str,
        semantic: Option<&str>,
        storage: StorageClass,
    ) -> u32 {
        let mut ptr_ty = ty;
        ptr_ty.is_pointer = true;
        let ptr_ty_id = self.intern_type(ptr_ty);
        let var_id = self.alloc_id();
        self.globals.push_instr(
            InstructionBuilder::new(Op::Variable)
                .push(ptr_ty_id)
                .push(var_id)
                .push(storage as u32)
                .build(),
        );
        self.debug
            .push_instr(InstructionBuilder::new(Op::Name).push(var_id).push_str(name).build());
        match Semantic::parse(semantic.unwrap_or("")) {
            Semantic::Builtin(b) => {
                let builtin = match b {
                    Builtin::Position => BuiltIn::Position,
                    Builtin::PointSize => BuiltIn::PointSize,
                    Builtin::Depth => BuiltIn::FragDepth,
                    Builtin::VertexId => BuiltIn::VertexIndex,
                };
                self.decorate(var_id, Decoration::BuiltIn, &[builtin as u32]);
            }
            Semantic::Indexed { index, .. } => {
                self.decorate(var_id, Decoration::Location, &[index]);
            }
            Semantic::Named(_) => {
                let location = self.next_location;
                self.next_location += (ty.cols.max(1)) as u32;
                self.decorate(var_id, Decoration::Location, &[location]);
            }
        }
        use fxc_ir::ty::Qualifiers as Q;
        if ty.qualifiers.contains(Q::NOPERSPECTIVE) {
            self.decorate(var_id, Decoration::NoPerspective, &[]);
        }
        if ty.qualifiers.contains(Q::CENTROID) {
            self.decorate(var_id, Decoration::Centroid, &[]);
        }
        if ty.qualifiers.contains(Q::NOINTERPOLATION) {
            self.decorate(var_id, Decoration::Flat, &[]);
        }
        var_id
    }
}

fn control_mask(flags: ControlFlags) -> u32 {
    let mut mask = 0u32;
    if flags.contains(ControlFlags::FLATTEN) {
        mask |= 1 << 0;
    }
    if flags.contains(ControlFlags::DONT_FLATTEN) {
        mask |= 1 << 1;
    }
    if flags.contains(ControlFlags::UNROLL) {
        mask |= 1 << 0;
    }
    if flags.contains(ControlFlags::DONT_UNROLL) {
        mask |= 1 << 1;
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::MAGIC;

    #[test]
    fn empty_module_has_header_and_no_entry_points() {
        let gen = SpirvGenerator::new(Options::default());
        let module = gen.write_result();
        assert_eq!(module.words[0], MAGIC);
        assert!(module.words.len() > 5);
    }

    #[test]
    fn module_declares_the_hlsl_functionality_extension() {
        let gen = SpirvGenerator::new(Options::default());
        let module = gen.write_result();
        let found = module
            .words
            .windows(2)
            .any(|w| w[0] & 0xffff == Op::Extension as u32);
        assert!(found);
    }

    #[test]
    fn repeated_constant_interns_to_one_id() {
        let mut gen = SpirvGenerator::new(Options::default());
        let a = gen.emit_constant(&Constant::from_f32(1.0));
        let b = gen.emit_constant(&Constant::from_f32(1.0));
        assert_eq!(a, b);
    }

    /// Counts `BuiltIn`/`Location` decorations in a finished module, the
    /// same walk `fxc/tests/scenarios.rs`'s entry-point test performs.
    fn count_decorations(module: &SpirvModule) -> (u32, u32) {
        let (mut builtins, mut locations) = (0u32, 0u32);
        let mut i = 5;
        while i < module.words.len() {
            let word = module.words[i];
            let len = (word >> 16) as usize;
            let op = word & 0xffff;
            if op == Op::Decorate as u32 {
                let deco = module.words[i + 2];
                if deco == Decoration::BuiltIn as u32 {
                    builtins += 1;
                } else if deco == Decoration::Location as u32 {
                    locations += 1;
                }
            }
            i += len.max(1);
        }
        (builtins, locations)
    }

    #[test]
    fn builtin_parameter_gets_builtin_decoration_not_a_location() {
        let mut gen = SpirvGenerator::new(Options::default());
        let mut ty = Type::FLOAT4;
        ty.qualifiers = fxc_ir::ty::Qualifiers::OUT;
        let param = Parameter { name: "position".to_string(), ty, semantic: Some("SV_POSITION".to_string()) };
        gen.define_parameter(&param);
        let func = gen.define_function("vs_main", std::slice::from_ref(&param), Type::VOID);
        gen.create_entry_point(func, false);
        let module = gen.write_result();
        let (builtins, locations) = count_decorations(&module);
        assert_eq!(builtins, 1);
        assert_eq!(locations, 0);
    }

    #[test]
    fn named_varyings_consume_locations_in_order() {
        let mut gen = SpirvGenerator::new(Options::default());
        let mut ty = Type::FLOAT2;
        ty.qualifiers = fxc_ir::ty::Qualifiers::IN;
        let first = gen.next_location;
        let a = Parameter { name: "a".to_string(), ty, semantic: Some("MYDATA".to_string()) };
        let b = Parameter { name: "b".to_string(), ty, semantic: Some("MYOTHERDATA".to_string()) };
        gen.define_parameter(&a);
        gen.define_parameter(&b);
        let func = gen.define_function("ps_main", &[a, b], Type::VOID);
        gen.create_entry_point(func, true);
        assert_eq!(gen.next_location, first + 2);
        let module = gen.write_result();
        let (_, locations) = count_decorations(&module);
        assert_eq!(locations, 2);
    }

    #[test]
    fn indexed_semantics_use_their_own_index_as_location() {
        let mut gen = SpirvGenerator::new(Options::default());
        let mut ty = Type::FLOAT2;
        ty.qualifiers = fxc_ir::ty::Qualifiers::IN;
        let before = gen.next_location;
        let param = Parameter { name: "uv1".to_string(), ty, semantic: Some("TEXCOORD1".to_string()) };
        gen.define_parameter(&param);
        let func = gen.define_function("ps_main", std::slice::from_ref(&param), Type::VOID);
        gen.create_entry_point(func, true);
        // Indexed semantics (COLORn/SV_TARGETn/TEXCOORDn) get their literal
        // index as the Location, not the auto-increment counter.
        assert_eq!(gen.next_location, before);
    }

    #[test]
    fn define_function_drains_its_own_pending_parameters() {
        let mut gen = SpirvGenerator::new(Options::default());
        let mut ty = Type::FLOAT4;
        ty.qualifiers = fxc_ir::ty::Qualifiers::OUT;
        let param = Parameter { name: "position".to_string(), ty, semantic: Some("SV_POSITION".to_string()) };
        gen.define_parameter(&param);
        assert_eq!(gen.pending_params.len(), 1);
        gen.define_function("vs_main", std::slice::from_ref(&param), Type::VOID);
        assert!(gen.pending_params.is_empty());
    }

    #[test]
    fn entry_point_glue_is_a_distinct_function_from_the_callee() {
        let mut gen = SpirvGenerator::new(Options::default());
        let func = gen.define_function("vs_main", &[], Type::VOID);
        gen.leave_function();
        let glue = gen.create_entry_point(func, false);
        assert_ne!(func, glue);
    }

    #[test]
    fn uniform_block_gets_block_decoration_and_offsets() {
        let mut gen = SpirvGenerator::new(Options::default());
        gen.define_uniform("a", Type::FLOAT, None);
        gen.define_uniform("b", Type::FLOAT3, None);
        let module = gen.write_result();
        // Decoration::Block == 2 in spirv_headers; presence is enough here.
        assert!(module.words.len() > 5);
    }
}
