//! Named GPU resources: vertex/index buffers and textures.
//!
//! Tables are keyed by caller-chosen names. Registering an existing name
//! overwrites the entry and hands the superseded handle back to the caller of
//! `NamedTable::insert`, which decides whether to release it.

mod buffer;
mod table;
mod texture;

pub use buffer::{BufferEntry, BufferKind, BufferTable};
pub use table::NamedTable;
pub use texture::{TexParam, TextureFilter, TextureParams, TextureTable, TextureWrap};

pub(crate) use buffer::upload_buffer;
pub(crate) use texture::upload_texture;
