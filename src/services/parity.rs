use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::tool::Tool;
use crate::services::workspace::Workspace;

/// Pads prepared documents to an even page count with the reference blank
/// page, one document at a time and before concatenation.
pub struct ParityEnforcer {
    config: Arc<Config>,
}

impl ParityEnforcer {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Absolute path of the reference blank page, which must exist.
    pub async fn blank_page(&self) -> AppResult<PathBuf> {
        tokio::fs::canonicalize(&self.config.pdf_blank_path)
            .await
            .map_err(|e| {
                AppError::config(format!(
                    "blank page {} unavailable: {}",
                    self.config.pdf_blank_path.display(),
                    e
                ))
            })
    }

    pub async fn page_count(&self, workspace: &Workspace, file_name: &str) -> AppResult<u32> {
        let qpdf = &self.config.tools.qpdf;
        let output = Tool::new("qpdf page count", qpdf, self.config.tool_timeout())
            .arg("--show-npages")
            .arg(file_name)
            .current_dir(workspace.path())
            .run()
            .await?;

        let raw = output.stdout_text();
        raw.trim().parse::<u32>().map_err(|e| {
            AppError::processing(format!(
                "page count for {} is not a number ({:?}): {}",
                file_name,
                raw.trim(),
                e
            ))
        })
    }

    /// Appends one blank page to `file_name` in place when its page count is
    /// odd. Returns whether a page was added.
    pub async fn enforce_even(
        &self,
        workspace: &Workspace,
        file_name: &str,
        blank_page: &Path,
    ) -> AppResult<bool> {
        let page_count = self.page_count(workspace, file_name).await?;
        let is_odd = page_count % 2 == 1;

        debug!(
            pdf_filename = file_name,
            page_count = page_count,
            is_odd = is_odd,
            "pdf stats"
        );

        if !is_odd {
            return Ok(false);
        }

        Tool::new("qpdf append blank", &self.config.tools.qpdf, self.config.tool_timeout())
            .arg("--replace-input")
            .arg(file_name)
            .arg("--pages")
            .arg(file_name)
            .arg(blank_page)
            .arg("1")
            .arg("--")
            .current_dir(workspace.path())
            .run()
            .await
            .map_err(|e| match e {
                AppError::ToolFailed { tool, code, detail } => AppError::ToolFailed {
                    tool,
                    code,
                    detail: format!("adding blank to odd numbered pdf {}: {}", file_name, detail),
                },
                other => other,
            })?;

        info!(pdf_filename = file_name, page_count = page_count + 1, "blank page appended");
        Ok(true)
    }
}
