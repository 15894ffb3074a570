pub(crate) mod canvas_pool;
pub(crate) mod frame;
pub(crate) mod glyph;
pub(crate) mod pipeline;
