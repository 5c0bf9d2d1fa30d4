use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::base64_bytes;
use crate::error::{AppError, AppResult};

/// One caller-supplied file. `folder` is only meaningful for builds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputFile {
    pub name: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    #[serde(default)]
    pub folder: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BuildLatexRequest {
    #[serde(default)]
    pub files: Vec<InputFile>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MergeRequest {
    #[serde(default)]
    pub files: Vec<InputFile>,
    #[serde(default)]
    pub force_even: bool,
}

impl InputFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
            folder: String::new(),
        }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Location of this file relative to a workspace root.
    ///
    /// Only plain path segments are accepted, so the result can never point
    /// outside the directory it is joined onto.
    pub fn relative_path(&self) -> AppResult<PathBuf> {
        let mut path = PathBuf::new();
        for part in [self.folder.as_str(), self.name.as_str()] {
            for component in Path::new(part).components() {
                match component {
                    Component::Normal(segment) => path.push(segment),
                    Component::CurDir => {}
                    Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                        return Err(AppError::validation(format!(
                            "file path {} escapes the workspace",
                            self.display_name()
                        )));
                    }
                }
            }
        }

        if self.name.trim().is_empty() || path.as_os_str().is_empty() {
            return Err(AppError::validation("every file needs a name"));
        }

        Ok(path)
    }

    pub fn display_name(&self) -> String {
        if self.folder.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.folder.trim_end_matches('/'), self.name)
        }
    }
}
