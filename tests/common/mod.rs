#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::{dictionary, Document, Object, Stream};
use tempfile::TempDir;

use pressroom::config::{Config, ToolPaths};
use pressroom::handlers::AppState;

/// A 1x1 PNG.
pub const TINY_PNG_BASE64: &str = concat!(
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA",
    "60e6kgAAAABJRU5ErkJggg==",
);

pub const MINIMAL_LATEX: &str = concat!(
    "\\documentclass{article}\n",
    "\\begin{document}\n",
    "Hello from the press.\n",
    "\\end{document}\n",
);

/// Isolated workspace root plus a separate directory for assets such as the
/// blank page, so the root can be checked for leftovers.
pub struct Fixture {
    pub root: TempDir,
    pub assets: TempDir,
    pub config: Config,
}

impl Fixture {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("workspace root");
        let assets = tempfile::tempdir().expect("assets dir");
        let config = Config {
            workspace_root: root.path().to_path_buf(),
            pdf_blank_path: assets.path().join("blank.pdf"),
            tool_timeout_seconds: 120,
            ..Config::default()
        };
        Self { root, assets, config }
    }

    pub fn with_tools(mut self, latexmk: &str, qpdf: &str, convert: &str) -> Self {
        self.config.tools = ToolPaths {
            latexmk: latexmk.to_string(),
            qpdf: qpdf.to_string(),
            convert: convert.to_string(),
        };
        self
    }

    /// Writes a one-page blank of the given side length as the reference page.
    pub fn with_blank_page(self, side: i64) -> Self {
        std::fs::write(&self.config.pdf_blank_path, pdf_with_pages(1, side)).expect("write blank");
        self
    }

    /// Writes an executable shell script into the assets directory and
    /// returns its path, for standing in as one of the external tools.
    #[cfg(unix)]
    pub fn script(&self, name: &str, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = self.assets.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("make script executable");
        path.to_string_lossy().into_owned()
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.config.clone())
    }

    pub fn leftover_workspaces(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.root.path())
            .expect("read workspace root")
            .map(|entry| entry.expect("dir entry").path())
            .collect()
    }

    pub fn root_path(&self) -> &Path {
        self.root.path()
    }
}

/// PDF with `count` empty pages, each `side` points square.
pub fn pdf_with_pages(count: usize, side: i64) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..count {
        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(side),
                Object::Integer(side),
            ],
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(count as i64),
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save fixture pdf");
    bytes
}

/// Width of every page, in page order.
pub fn page_widths(pdf: &[u8]) -> Vec<f64> {
    let doc = Document::load_mem(pdf).expect("load pdf");
    doc.get_pages()
        .values()
        .map(|page_id| {
            let page = doc
                .get_object(*page_id)
                .and_then(Object::as_dict)
                .expect("page dictionary");
            let media_box = resolve(&doc, page.get(b"MediaBox").expect("media box"))
                .as_array()
                .expect("media box array");
            number(resolve(&doc, &media_box[2]))
        })
        .collect()
}

pub fn page_count(pdf: &[u8]) -> usize {
    Document::load_mem(pdf).expect("load pdf").get_pages().len()
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).expect("resolve reference"),
        other => other,
    }
}

fn number(object: &Object) -> f64 {
    match object {
        Object::Integer(i) => *i as f64,
        Object::Real(r) => *r as f64,
        other => panic!("expected a number, got {:?}", other),
    }
}

pub fn tool_available(program: &str) -> bool {
    pressroom::services::is_tool_available(program)
}
