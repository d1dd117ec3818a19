#![allow(dead_code)]

pub mod budget_alloc;

use std::fs;
use std::path::{Path, PathBuf};

use txt_chunks::ChunkTemplate;

/// Small page with every field, content wrapped in `<c>` markers.
pub const STUB_TEMPLATE: &str =
    "<t>{{file_name}} {{current_chunk}}</t><m>{{current_chunk}}/{{total_chunks}}</m><c>{{content}}</c>";

pub fn stub_template() -> ChunkTemplate {
    ChunkTemplate::parse(STUB_TEMPLATE).expect("stub template parses")
}

pub fn write_input(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).expect("write input fixture");
    path
}

/// Text between the first `<c>` and the last `</c>`.
pub fn content_of(page: &str) -> &str {
    let start = page.find("<c>").expect("content start") + 3;
    let end = page.rfind("</c>").expect("content end");
    &page[start..end]
}

/// `current/total` pair from the `<m>` marker.
pub fn position_of(page: &str) -> (usize, usize) {
    let start = page.find("<m>").expect("meta start") + 3;
    let end = page.find("</m>").expect("meta end");
    let (current, total) = page[start..end].split_once('/').expect("current/total");
    (
        current.parse().expect("current number"),
        total.parse().expect("total number"),
    )
}

/// Deterministic multi-line text with varying line widths.
pub fn sample_text(lines: usize) -> String {
    let mut out = String::new();
    for idx in 0..lines {
        out.push_str(&format!(
            "{:05} It was a dark & stormy <night> number {}{}\n",
            idx,
            idx,
            "~".repeat(idx % 23)
        ));
    }
    out
}
