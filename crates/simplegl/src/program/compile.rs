use crate::device::GlBackend;

use super::{ProgramDesc, ShaderStage};

/// Outcome of the last program install.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ProgramStatus {
    /// No drawing context, or no program installed yet.
    Unavailable,
    /// The program was created but failed to link. It stays current and inert.
    LinkFailed,
    /// Linked and in use.
    Linked,
}

/// Driver objects produced by `build_program`.
pub(crate) struct BuiltProgram<G: GlBackend> {
    pub program: G::Program,
    /// Shaders created for this program, attached or not.
    pub shaders: Vec<G::Shader>,
    pub linked: bool,
}

/// Creates a program, compiles both stages and links.
///
/// A stage that fails to compile is logged and left unattached; linking then
/// fails or succeeds per the driver's rules.
pub(crate) fn build_program<G: GlBackend>(gl: &G, desc: &ProgramDesc) -> Option<BuiltProgram<G>> {
    let program = gl.create_program()?;

    let shaders: Vec<G::Shader> = [ShaderStage::Vertex, ShaderStage::Fragment]
        .into_iter()
        .filter_map(|stage| compile_stage(gl, &program, stage, desc.source(stage)))
        .collect();

    gl.link_program(&program);
    let linked = gl.link_status(&program);

    if !linked {
        let info = gl.program_info_log(&program).unwrap_or_default();
        log::warn!("{} does not link main program: {}", crate::NAME, info.trim());
    }

    Some(BuiltProgram {
        program,
        shaders,
        linked,
    })
}

fn compile_stage<G: GlBackend>(
    gl: &G,
    program: &G::Program,
    stage: ShaderStage,
    source: &str,
) -> Option<G::Shader> {
    let shader = gl.create_shader(stage)?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl.compile_status(&shader) {
        gl.attach_shader(program, &shader);
    } else {
        let info = gl.shader_info_log(&shader).unwrap_or_default();
        log::warn!(
            "{} does not compile {stage} from source ({}):\n{source}",
            crate::NAME,
            info.trim()
        );
    }

    Some(shader)
}
