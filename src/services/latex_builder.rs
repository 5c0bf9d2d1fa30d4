use std::sync::Arc;

use tracing::{error, info};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::InputFile;
use crate::services::tool::Tool;
use crate::services::workspace::Workspace;

pub const LATEXMK_CONFIG_NAME: &str = ".latexmkrc";

/// Names latexmk loads as rc files from the working directory.
const RESERVED_ROOT_NAMES: [&str; 2] = [".latexmkrc", "latexmkrc"];

/// Pins xelatex as the engine and turns on synctex output.
pub const LATEXMK_CONFIG: &str = "
$pdf_mode = 1;
$pdflatex=q/xelatex -synctex=1 %O %S/
";

/// Typesets a LaTeX file set with latexmk inside a private workspace.
pub struct LatexBuilder {
    config: Arc<Config>,
}

impl LatexBuilder {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub async fn build(&self, files: &[InputFile]) -> AppResult<Vec<u8>> {
        if files.is_empty() {
            return Err(AppError::validation("must provide one or more files"));
        }

        let paths = files
            .iter()
            .map(InputFile::relative_path)
            .collect::<AppResult<Vec<_>>>()?;

        if let Some(reserved) = paths
            .iter()
            .find(|path| RESERVED_ROOT_NAMES.iter().any(|name| path.as_os_str() == *name))
        {
            return Err(AppError::validation(format!(
                "file {} is reserved for the build configuration",
                reserved.display()
            )));
        }

        let workspace = Workspace::acquire(&self.config.workspace_root, "build")?;
        let job_name = workspace.id().to_string();

        for (file, path) in files.iter().zip(&paths) {
            workspace.write(path, &file.data).await?;
        }

        workspace
            .write(LATEXMK_CONFIG_NAME, LATEXMK_CONFIG.as_bytes())
            .await?;

        let timeout = self.config.tool_timeout();
        let latexmk = &self.config.tools.latexmk;

        info!(workspace = %workspace.path().display(), "cleaning");
        Tool::new("latexmk clean", latexmk, timeout)
            .arg("-C")
            .current_dir(workspace.path())
            .run()
            .await
            .inspect_err(|e| error!(error = %e, "running latexmk clean"))?;

        info!(workspace = %workspace.path().display(), job_name = %job_name, "building");
        Tool::new("latexmk build", latexmk, timeout)
            .arg(format!("-jobname={}", job_name))
            .current_dir(workspace.path())
            .run()
            .await
            .inspect_err(|e| error!(error = %e, "running latexmk build"))?;

        let pdf = workspace.read(format!("{}.pdf", job_name)).await?;

        info!(files = files.len(), bytes = pdf.len(), "build completed");
        Ok(pdf)
    }
}
