//! Shader programs and the variable binding table.
//!
//! A program is described by a `ProgramDesc` (sources + optional variable
//! names). Compilation and linking go through the driver; failures are
//! reported through `log` and the returned `ProgramStatus`.

mod compile;
mod desc;
mod vars;

pub use compile::ProgramStatus;
pub use desc::{Names, ProgramDesc, ShaderStage, VarsDesc};
pub use vars::{VarLocation, VarTable};

pub(crate) use compile::build_program;
pub(crate) use vars::resolve_vars;
