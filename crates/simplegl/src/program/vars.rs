use crate::device::GlBackend;
use crate::resources::NamedTable;

use super::VarsDesc;

/// Resolved location of a shader variable.
///
/// Driver sentinels pass through untouched: `-1` for an unknown attribute,
/// `None` for an unknown uniform.
#[derive(Debug, Clone, PartialEq)]
pub enum VarLocation<U> {
    Attribute(i32),
    Uniform(Option<U>),
}

impl<U> VarLocation<U> {
    pub fn as_attribute(&self) -> Option<i32> {
        match self {
            VarLocation::Attribute(loc) => Some(*loc),
            VarLocation::Uniform(_) => None,
        }
    }

    pub fn as_uniform(&self) -> Option<&U> {
        match self {
            VarLocation::Uniform(loc) => loc.as_ref(),
            VarLocation::Attribute(_) => None,
        }
    }
}

/// Attributes and uniforms share one name space.
pub type VarTable<U> = NamedTable<VarLocation<U>>;

/// Resolves every attribute, then every uniform, named in `vars`.
pub(crate) fn resolve_vars<G: GlBackend>(
    gl: &G,
    program: &G::Program,
    vars: &VarsDesc,
    table: &mut VarTable<G::UniformLocation>,
) {
    if let Some(names) = &vars.attribute {
        for name in names.iter() {
            table.insert(name, VarLocation::Attribute(gl.attrib_location(program, name)));
        }
    }

    if let Some(names) = &vars.uniform {
        for name in names.iter() {
            table.insert(name, VarLocation::Uniform(gl.uniform_location(program, name)));
        }
    }
}
