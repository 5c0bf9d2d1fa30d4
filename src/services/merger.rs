use std::sync::Arc;

use lopdf::Document;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::InputFile;
use crate::services::classifier::FileKind;
use crate::services::image_converter::ImageConverter;
use crate::services::parity::ParityEnforcer;
use crate::services::tool::Tool;
use crate::services::workspace::Workspace;

/// qpdf exits with 3 when it succeeded but printed warnings.
pub const QPDF_WARNING_EXIT: i32 = 3;

/// Concatenates PDFs and images into one PDF, preserving input order.
pub struct PdfMerger {
    config: Arc<Config>,
    converter: ImageConverter,
    parity: ParityEnforcer,
}

impl PdfMerger {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            converter: ImageConverter::new(config.clone()),
            parity: ParityEnforcer::new(config.clone()),
            config,
        }
    }

    pub async fn merge(&self, files: &[InputFile], force_even: bool) -> AppResult<Vec<u8>> {
        if files.is_empty() {
            return Err(AppError::validation("must provide one or more files"));
        }

        let blank_page = if force_even {
            Some(self.parity.blank_page().await?)
        } else {
            None
        };

        let prepared = self.prepare(files).await?;

        let workspace = Workspace::acquire(&self.config.workspace_root, "merge")?;
        let output_name = format!("{}.pdf", workspace.id());

        let mut part_names = Vec::with_capacity(prepared.len());
        for (index, pdf) in prepared.iter().enumerate() {
            let part_name = format!("{}.pdf", index);
            workspace.write(&part_name, pdf).await?;

            if let Some(blank_page) = &blank_page {
                self.parity
                    .enforce_even(&workspace, &part_name, blank_page)
                    .await?;
            }

            part_names.push(part_name);
        }

        let tool = Tool::new("qpdf merge", &self.config.tools.qpdf, self.config.tool_timeout())
            .arg("--empty")
            .arg(&output_name)
            .arg("--pages")
            .args(&part_names)
            .arg("--")
            .current_dir(workspace.path());

        debug!(parts = part_names.len(), "running merge command");
        let output = tool.output().await?;

        let tolerated = output.code() == Some(QPDF_WARNING_EXIT);
        if !output.success() && !tolerated {
            return Err(tool.failure(&output));
        }

        let merged = workspace.read(&output_name).await.map_err(|e| {
            AppError::processing(format!("failed reading produced PDF: {}", e))
        })?;

        if tolerated {
            warn!(detail = %output.diagnostic(), "merge finished with warnings");
            verify_readable(merged.clone()).await.map_err(|_| tool.failure(&output))?;
        }

        info!(
            files = files.len(),
            bytes = merged.len(),
            force_even = force_even,
            "merge completed"
        );

        Ok(merged)
    }

    /// Turns every input into PDF bytes, in input order. All files are
    /// classified before any conversion runs, and a single unsupported file
    /// aborts the whole request.
    pub async fn prepare(&self, files: &[InputFile]) -> AppResult<Vec<Vec<u8>>> {
        let kinds = files
            .iter()
            .map(|file| {
                let kind = FileKind::classify(&file.data);
                info!(
                    file_type = kind.mime_type(),
                    extension = %kind,
                    filename = %file.name,
                    bytes = file.size(),
                    "file info"
                );
                match kind {
                    FileKind::Unsupported => Err(AppError::UnsupportedFile {
                        name: file.name.clone(),
                    }),
                    supported => Ok(supported),
                }
            })
            .collect::<AppResult<Vec<_>>>()?;

        let mut prepared = Vec::with_capacity(files.len());
        for (file, kind) in files.iter().zip(kinds) {
            let pdf = match kind {
                FileKind::Pdf => file.data.clone(),
                FileKind::Jpeg | FileKind::Png => {
                    self.converter.to_pdf(&file.name, &file.data).await?
                }
                FileKind::Unsupported => {
                    return Err(AppError::UnsupportedFile {
                        name: file.name.clone(),
                    })
                }
            };
            prepared.push(pdf);
        }

        Ok(prepared)
    }
}

async fn verify_readable(pdf: Vec<u8>) -> AppResult<()> {
    tokio::task::spawn_blocking(move || Document::load_mem(&pdf).map(|_| ()))
        .await
        .map_err(|e| AppError::internal(format!("pdf validation task failed: {}", e)))?
        .map_err(|e| AppError::processing(format!("merged output is not a readable PDF: {}", e)))
}
