//! Dashboard renderers.

pub mod generator;
pub mod html;

pub use generator::{generate_console_summary, generate_json_report, generate_markdown_report};
pub use html::{render_html, HtmlOptions};
