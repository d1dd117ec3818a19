//! Reader-page template and viewer settings for `txt-chunks`.

mod page;
mod viewer;

pub use page::{build_reader_html, reader_template};
pub use viewer::{is_hex_color, ColorOption, ViewerConfig};
