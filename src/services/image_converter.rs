use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::tool::Tool;
use crate::services::workspace::Workspace;

/// A4 in points.
pub const PAGE_GEOMETRY: &str = "595x842";
pub const PAGE_SIZE: &str = "a4";

/// Renders raster images into single-page A4 PDFs with the external converter.
pub struct ImageConverter {
    config: Arc<Config>,
}

impl ImageConverter {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub async fn to_pdf(&self, name: &str, image: &[u8]) -> AppResult<Vec<u8>> {
        let workspace = Workspace::acquire(&self.config.workspace_root, "image")?;
        let output_name = format!("{}.pdf", workspace.id());

        workspace.write("img", image).await?;

        let tool = Tool::new("convert", &self.config.tools.convert, self.config.tool_timeout())
            .args([
                "img",
                "-resize",
                PAGE_GEOMETRY,
                "-background",
                "white",
                "-alpha",
                "remove",
                "-page",
                PAGE_SIZE,
            ])
            .arg(&output_name)
            .current_dir(workspace.path());

        tool.run().await.map_err(|e| AppError::ConversionError {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        let pdf = workspace.read(&output_name).await.map_err(|e| AppError::ConversionError {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        info!(file_name = name, bytes = pdf.len(), "image converted to pdf");
        Ok(pdf)
    }
}
