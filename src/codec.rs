//! Record stream codec: byte-level reading, header and export blocks, record dispatch.

pub(crate) mod backing;
pub(crate) mod decode;
pub(crate) mod header;
pub(crate) mod reader;
pub(crate) mod record;
pub(crate) mod splice;
