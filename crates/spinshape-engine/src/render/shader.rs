//! Shader compilation and linking.
//!
//! A program is built in three steps:
//! 1. [`compile`] parses and validates one stage's WGSL source.
//! 2. [`LinkedProgram::link`] pairs a vertex and a fragment stage, checks that
//!    their interfaces agree and reflects the named inputs (attributes and
//!    uniforms) drawables look up by name.
//! 3. [`ShaderProgram::new`] creates the GPU modules and the bind group layout.
//!
//! Steps 1 and 2 need no device, so a broken shader is reported with the stage
//! and the reason before anything reaches the GPU.

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

/// Entry point every stage module must define.
pub const ENTRY_POINT: &str = "main";

/// Pipeline stage of a shader source.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn matches(self, stage: naga::ShaderStage) -> bool {
        matches!(
            (self, stage),
            (ShaderStage::Vertex, naga::ShaderStage::Vertex)
                | (ShaderStage::Fragment, naga::ShaderStage::Fragment)
        )
    }

    pub fn visibility(self) -> wgpu::ShaderStages {
        match self {
            ShaderStage::Vertex => wgpu::ShaderStages::VERTEX,
            ShaderStage::Fragment => wgpu::ShaderStages::FRAGMENT,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Why a program could not be built.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{stage} shader `{label}` failed to compile:\n{message}")]
    Compile {
        label: String,
        stage: ShaderStage,
        message: String,
    },

    #[error("program `{label}` failed to link: {reason}")]
    Link { label: String, reason: String },

    #[error("program `{label}` has no vertex attribute named `{name}`")]
    MissingAttribute { label: String, name: String },

    #[error("program `{label}` has no uniform named `{name}`")]
    MissingUniform { label: String, name: String },
}

/// One validated shader stage.
#[derive(Debug)]
pub struct CompiledShader {
    label: String,
    stage: ShaderStage,
    source: &'static str,
    module: naga::Module,
}

impl CompiledShader {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    fn entry_point(&self) -> &naga::EntryPoint {
        // `compile` guarantees exactly one entry point of the right stage.
        &self.module.entry_points[0]
    }
}

/// Parses and validates a single stage.
pub fn compile(
    label: &str,
    stage: ShaderStage,
    source: &'static str,
) -> Result<CompiledShader, ShaderError> {
    let compile_err = |message: String| ShaderError::Compile {
        label: label.to_string(),
        stage,
        message,
    };

    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| compile_err(e.emit_to_string(source)))?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .map_err(|e| compile_err(e.into_inner().to_string()))?;

    match module.entry_points.as_slice() {
        [ep] if ep.name == ENTRY_POINT && stage.matches(ep.stage) => {}
        [ep] => {
            return Err(compile_err(format!(
                "expected a single {stage} entry point `{ENTRY_POINT}`, found `{}` ({:?})",
                ep.name, ep.stage
            )));
        }
        eps => {
            return Err(compile_err(format!(
                "expected exactly one entry point, found {}",
                eps.len()
            )));
        }
    }

    log::trace!("compiled {stage} shader `{label}`");

    Ok(CompiledShader {
        label: label.to_string(),
        stage,
        source,
        module,
    })
}

/// A named per-vertex input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub location: u32,
}

/// A named uniform buffer binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uniform {
    pub name: String,
    pub group: u32,
    pub binding: u32,
    pub visibility: wgpu::ShaderStages,
}

/// Vertex + fragment stages whose interfaces have been checked against each other.
#[derive(Debug)]
pub struct LinkedProgram {
    label: String,
    vertex: CompiledShader,
    fragment: CompiledShader,
    attributes: Vec<Attribute>,
    uniforms: Vec<Uniform>,
}

impl LinkedProgram {
    /// Links two compiled stages.
    ///
    /// Fails when the stages are swapped, when a fragment input has no matching
    /// vertex output, when one uniform name maps to different slots, when two
    /// names share a slot, or when a uniform lives outside bind group 0.
    pub fn link(
        label: &str,
        vertex: CompiledShader,
        fragment: CompiledShader,
    ) -> Result<Self, ShaderError> {
        let link_err = |reason: String| ShaderError::Link {
            label: label.to_string(),
            reason,
        };

        if vertex.stage != ShaderStage::Vertex || fragment.stage != ShaderStage::Fragment {
            return Err(link_err(format!(
                "expected vertex + fragment stages, got {} + {}",
                vertex.stage, fragment.stage
            )));
        }

        let outputs = vertex_output_locations(&vertex.module, vertex.entry_point());
        let inputs = argument_locations(&fragment.module, fragment.entry_point());
        if let Some(missing) = inputs.iter().find(|(loc, _)| !outputs.contains(loc)) {
            return Err(link_err(format!(
                "fragment input `{}` at location {} is not written by the vertex stage",
                missing.1, missing.0
            )));
        }

        let attributes: Vec<Attribute> = argument_locations(&vertex.module, vertex.entry_point())
            .into_iter()
            .map(|(location, name)| Attribute { name, location })
            .collect();

        let mut uniforms: Vec<Uniform> = Vec::new();
        for shader in [&vertex, &fragment] {
            for u in uniform_globals(&shader.module, shader.stage) {
                if u.group != 0 {
                    return Err(link_err(format!(
                        "uniform `{}` uses bind group {}; only group 0 is supported",
                        u.name, u.group
                    )));
                }

                if let Some(existing) = uniforms.iter_mut().find(|e| e.name == u.name) {
                    if (existing.group, existing.binding) != (u.group, u.binding) {
                        return Err(link_err(format!(
                            "uniform `{}` is bound at {}:{} in one stage and {}:{} in the other",
                            u.name, existing.group, existing.binding, u.group, u.binding
                        )));
                    }
                    existing.visibility |= u.visibility;
                    continue;
                }

                if let Some(clash) = uniforms
                    .iter()
                    .find(|e| (e.group, e.binding) == (u.group, u.binding))
                {
                    return Err(link_err(format!(
                        "uniforms `{}` and `{}` share binding {}:{}",
                        clash.name, u.name, u.group, u.binding
                    )));
                }

                uniforms.push(u);
            }
        }
        uniforms.sort_by_key(|u| u.binding);

        log::debug!(
            "linked program `{label}`: {} attribute(s), {} uniform(s)",
            attributes.len(),
            uniforms.len()
        );

        Ok(Self {
            label: label.to_string(),
            vertex,
            fragment,
            attributes,
            uniforms,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn uniforms(&self) -> &[Uniform] {
        &self.uniforms
    }

    /// Location of the vertex input called `name`.
    pub fn attribute_location(&self, name: &str) -> Result<u32, ShaderError> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.location)
            .ok_or_else(|| ShaderError::MissingAttribute {
                label: self.label.clone(),
                name: name.to_string(),
            })
    }

    /// Uniform slot called `name`.
    pub fn uniform(&self, name: &str) -> Result<&Uniform, ShaderError> {
        self.uniforms
            .iter()
            .find(|u| u.name == name)
            .ok_or_else(|| ShaderError::MissingUniform {
                label: self.label.clone(),
                name: name.to_string(),
            })
    }

    pub fn has_uniform(&self, name: &str) -> bool {
        self.uniforms.iter().any(|u| u.name == name)
    }
}

/// A linked program living on the GPU.
///
/// Created once per drawable and never recompiled. GPU objects are released
/// when the program is dropped.
pub struct ShaderProgram {
    interface: LinkedProgram,
    vertex_module: wgpu::ShaderModule,
    fragment_module: wgpu::ShaderModule,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
}

impl ShaderProgram {
    /// Compiles, links and uploads a vertex/fragment pair.
    pub fn build(
        device: &wgpu::Device,
        label: &str,
        vertex_src: &'static str,
        fragment_src: &'static str,
    ) -> Result<Self, ShaderError> {
        let linked = link_sources(label, vertex_src, fragment_src)?;
        Ok(Self::new(device, linked))
    }

    pub fn new(device: &wgpu::Device, interface: LinkedProgram) -> Self {
        let label = interface.label().to_string();

        let vertex_module = create_module(device, &interface.vertex);
        let fragment_module = create_module(device, &interface.fragment);

        let entries: Vec<wgpu::BindGroupLayoutEntry> = interface
            .uniforms()
            .iter()
            .map(|u| wgpu::BindGroupLayoutEntry {
                binding: u.binding,
                visibility: u.visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            })
            .collect();

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{label} bgl")),
            entries: &entries,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{label} pipeline layout")),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        Self {
            interface,
            vertex_module,
            fragment_module,
            bind_group_layout,
            pipeline_layout,
        }
    }

    pub fn interface(&self) -> &LinkedProgram {
        &self.interface
    }

    pub fn vertex_module(&self) -> &wgpu::ShaderModule {
        &self.vertex_module
    }

    pub fn fragment_module(&self) -> &wgpu::ShaderModule {
        &self.fragment_module
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn pipeline_layout(&self) -> &wgpu::PipelineLayout {
        &self.pipeline_layout
    }
}

/// Compiles both stages and links them, without touching the GPU.
pub fn link_sources(
    label: &str,
    vertex_src: &'static str,
    fragment_src: &'static str,
) -> Result<LinkedProgram, ShaderError> {
    let vertex = compile(label, ShaderStage::Vertex, vertex_src)?;
    let fragment = compile(label, ShaderStage::Fragment, fragment_src)?;
    LinkedProgram::link(label, vertex, fragment)
}

fn create_module(device: &wgpu::Device, shader: &CompiledShader) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{} {} shader", shader.label, shader.stage)),
        source: wgpu::ShaderSource::Wgsl(shader.source.into()),
    })
}

/// `(location, name)` of every location-bound entry point argument, struct
/// members included.
fn argument_locations(module: &naga::Module, ep: &naga::EntryPoint) -> Vec<(u32, String)> {
    let mut out = Vec::new();
    for arg in &ep.function.arguments {
        match &arg.binding {
            Some(naga::Binding::Location { location, .. }) => {
                out.push((*location, arg.name.clone().unwrap_or_default()));
            }
            Some(_) => {}
            None => out.extend(struct_member_locations(module, arg.ty)),
        }
    }
    out
}

fn vertex_output_locations(module: &naga::Module, ep: &naga::EntryPoint) -> BTreeSet<u32> {
    let Some(result) = &ep.function.result else {
        return BTreeSet::new();
    };
    match &result.binding {
        Some(naga::Binding::Location { location, .. }) => BTreeSet::from([*location]),
        Some(_) => BTreeSet::new(),
        None => struct_member_locations(module, result.ty)
            .into_iter()
            .map(|(loc, _)| loc)
            .collect(),
    }
}

fn struct_member_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
) -> Vec<(u32, String)> {
    match &module.types[ty].inner {
        naga::TypeInner::Struct { members, .. } => members
            .iter()
            .filter_map(|m| match &m.binding {
                Some(naga::Binding::Location { location, .. }) => {
                    Some((*location, m.name.clone().unwrap_or_default()))
                }
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn uniform_globals(module: &naga::Module, stage: ShaderStage) -> Vec<Uniform> {
    module
        .global_variables
        .iter()
        .filter(|(_, gv)| gv.space == naga::AddressSpace::Uniform)
        .filter_map(|(_, gv)| {
            let rb = gv.binding.as_ref()?;
            Some(Uniform {
                name: gv.name.clone().unwrap_or_default(),
                group: rb.group,
                binding: rb.binding,
                visibility: stage.visibility(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = "
        @group(0) @binding(1) var<uniform> uMVPMatrix: mat4x4<f32>;
        @vertex
        fn main(@location(0) vPosition: vec3<f32>) -> @builtin(position) vec4<f32> {
            return uMVPMatrix * vec4<f32>(vPosition, 1.0);
        }
    ";

    const FS: &str = "
        @group(0) @binding(0) var<uniform> vColor: vec4<f32>;
        @fragment
        fn main() -> @location(0) vec4<f32> {
            return vColor;
        }
    ";

    #[test]
    fn valid_pair_links_and_reflects_names() {
        let program = link_sources("test", VS, FS).unwrap();

        assert_eq!(program.attribute_location("vPosition").unwrap(), 0);

        let color = program.uniform("vColor").unwrap();
        assert_eq!((color.group, color.binding), (0, 0));
        assert_eq!(color.visibility, wgpu::ShaderStages::FRAGMENT);

        let mvp = program.uniform("uMVPMatrix").unwrap();
        assert_eq!(mvp.binding, 1);
        assert_eq!(mvp.visibility, wgpu::ShaderStages::VERTEX);

        let bindings: Vec<u32> = program.uniforms().iter().map(|u| u.binding).collect();
        assert_eq!(bindings, vec![0, 1]);
    }

    #[test]
    fn syntax_error_names_the_stage() {
        let err = compile("broken", ShaderStage::Fragment, "fn main( {").unwrap_err();
        match &err {
            ShaderError::Compile { label, stage, .. } => {
                assert_eq!(label, "broken");
                assert_eq!(*stage, ShaderStage::Fragment);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("fragment shader `broken`"));
    }

    #[test]
    fn type_error_fails_validation() {
        let src = "
            @fragment
            fn main() -> @location(0) vec4<f32> {
                let x: f32 = 1u;
                return vec4<f32>(x);
            }
        ";
        assert!(matches!(
            compile("bad", ShaderStage::Fragment, src),
            Err(ShaderError::Compile { .. })
        ));
    }

    #[test]
    fn stage_mismatch_is_rejected() {
        let err = compile("swapped", ShaderStage::Vertex, FS).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { stage: ShaderStage::Vertex, .. }));
    }

    #[test]
    fn two_vertex_stages_fail_to_link() {
        let vs = compile("p", ShaderStage::Vertex, VS).unwrap();
        let vs2 = compile("p", ShaderStage::Vertex, VS).unwrap();
        assert!(matches!(
            LinkedProgram::link("p", vs, vs2),
            Err(ShaderError::Link { .. })
        ));
    }

    #[test]
    fn unwritten_fragment_input_fails_to_link() {
        let fs = "
            @fragment
            fn main(@location(3) tint: vec4<f32>) -> @location(0) vec4<f32> {
                return tint;
            }
        ";
        let err = link_sources("p", VS, fs).unwrap_err();
        assert!(err.to_string().contains("`tint`"), "{err}");
    }

    #[test]
    fn binding_collision_fails_to_link() {
        let fs = "
            @group(0) @binding(1) var<uniform> vColor: vec4<f32>;
            @fragment
            fn main() -> @location(0) vec4<f32> {
                return vColor;
            }
        ";
        assert!(matches!(link_sources("p", VS, fs), Err(ShaderError::Link { .. })));
    }

    #[test]
    fn fragment_without_color_uniform_has_no_vcolor() {
        let fs = "
            @fragment
            fn main() -> @location(0) vec4<f32> {
                return vec4<f32>(1.0, 0.0, 0.0, 1.0);
            }
        ";
        let program = link_sources("p", VS, fs).unwrap();
        match program.uniform("vColor") {
            Err(ShaderError::MissingUniform { label, name }) => {
                assert_eq!(label, "p");
                assert_eq!(name, "vColor");
            }
            other => panic!("unexpected lookup result: {other:?}"),
        }
    }

    #[test]
    fn missing_names_are_reported() {
        let program = link_sources("p", VS, FS).unwrap();
        assert!(matches!(
            program.attribute_location("aNormal"),
            Err(ShaderError::MissingAttribute { .. })
        ));
        assert!(matches!(
            program.uniform("uTime"),
            Err(ShaderError::MissingUniform { .. })
        ));
        assert!(!program.has_uniform("uTime"));
    }
}
