pub mod src;

pub use src::commonjs_rendering_formatter::CommonJsRenderingFormatter;
pub use src::dts_renderer::DtsRenderer;
pub use src::esm5_rendering_formatter::Esm5RenderingFormatter;
pub use src::esm_rendering_formatter::EsmRenderingFormatter;
pub use src::formatter::RenderingFormatter;
pub use src::import_manager::ImportManager;
pub use src::magic_string::MagicString;
pub use src::renderer::{RenderedFile, Renderer};
pub use src::umd_rendering_formatter::UmdRenderingFormatter;

#[cfg(test)]
mod test;
