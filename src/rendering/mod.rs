//! Document rendering.
//!
//! Turns a built graph into an interactive HTML document, using simple
//! `{{name}}` placeholder templates.

mod html;
mod template;

pub use html::{DEFAULT_ENGINE_URL, HtmlRenderer, RenderOptions, RenderSummary};
pub use template::{RenderContext, extract_variables, render_template};
