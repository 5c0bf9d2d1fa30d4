pub mod classifier;
pub mod image_converter;
pub mod latex_builder;
pub mod merger;
pub mod parity;
pub mod tool;
pub mod workspace;

pub use classifier::FileKind;
pub use image_converter::ImageConverter;
pub use latex_builder::LatexBuilder;
pub use merger::PdfMerger;
pub use parity::ParityEnforcer;
pub use tool::{Tool, ToolOutput};
pub use workspace::Workspace;

/// Whether `program` can be started, probed with `--version`.
pub fn is_tool_available(program: &str) -> bool {
    std::process::Command::new(program)
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
