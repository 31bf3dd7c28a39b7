use crate::device::GlBackend;

use super::NamedTable;

/// Bind target of a registered buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferKind {
    /// `ARRAY_BUFFER`: per-vertex attribute data.
    Vertex,
    /// `ELEMENT_ARRAY_BUFFER`: index data.
    Index,
}

/// Registered buffer: its bind target and the driver handle.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferEntry<B> {
    pub kind: BufferKind,
    pub handle: B,
}

pub type BufferTable<B> = NamedTable<BufferEntry<B>>;

/// Creates a buffer for `kind` and fills it with `data` as 32-bit floats.
///
/// Index data goes through the same `f32` path; shaders and draw calls that
/// read it are expected to agree on that layout. The bind point is left empty
/// afterwards.
pub(crate) fn upload_buffer<G: GlBackend>(
    gl: &G,
    kind: BufferKind,
    data: &[f32],
) -> Option<G::Buffer> {
    let buffer = gl.create_buffer()?;
    gl.bind_buffer(kind, Some(&buffer));
    gl.buffer_data(kind, bytemuck::cast_slice(data));
    gl.bind_buffer(kind, None);
    Some(buffer)
}
