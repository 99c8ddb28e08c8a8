#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};

use mailpdf_core::contract::{MockRenderEngine, RenderOptions};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const TEMPLATE: &str = include_str!("../fixtures/template.md");

pub const FAKE_PDF: &[u8] = b"%PDF-1.4\n%fake\n%%EOF\n";

/// Build an in-memory zip with the given (path, content) entries, in order.
pub fn zip_of(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (path, content) in entries {
        if path.ends_with('/') {
            writer.add_directory(*path, options).unwrap();
        } else {
            writer.start_file(*path, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// A rendering engine mock that records every HTML document it is given.
pub fn capturing_engine() -> (MockRenderEngine, Arc<Mutex<Vec<String>>>) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();
    let mut engine = MockRenderEngine::new();
    engine
        .expect_render()
        .returning(move |html: &str, _options: &RenderOptions| {
            sink.lock().unwrap().push(html.to_string());
            Ok(FAKE_PDF.to_vec())
        });
    (engine, captured)
}
