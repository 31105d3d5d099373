// PDF output: the drawing surface and the sheet compositor on top of it.

pub mod canvas;
pub mod compositor;

pub use compositor::create_pdf;
