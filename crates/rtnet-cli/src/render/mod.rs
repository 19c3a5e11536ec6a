//! Plot output: SVG files or an interactive terminal view.

pub mod svg;
pub mod terminal;
