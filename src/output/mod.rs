//! Output encoders (PNG, SVG, HTML, terminal).

mod html;
mod png_encoder;
mod svg;
mod terminal;

pub use html::HtmlExporter;
pub use png_encoder::PngEncoder;
pub use svg::{SvgElement, SvgEncoder, TextAnchor};
pub use terminal::{TerminalEncoder, TerminalMode};
