//! End-to-end conversion of one text file into chunk documents.
//!
//! A run makes three sequential passes over the data: count decoded lines to
//! estimate the chunk count, rewind and plan chunk boundaries, then render
//! every chunk with the actual total and write it out.

use std::fs::{self, File};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::chunk_plan::{ChunkOptions, ChunkPlanner};
use crate::encoding::{count_lines, DecodedLines, TextEncoding};
use crate::error::ConvertError;
use crate::escape::escape_line;
use crate::template::{ChunkMeta, ChunkPage, ChunkRenderer};

/// Suffix appended to the input file name to form the output directory.
pub const OUTPUT_DIR_SUFFIX: &str = "_html_chunks";

/// What to convert and where to put it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertRequest {
    /// Text file to convert.
    pub input: PathBuf,
    /// Source encoding of `input`.
    pub encoding: TextEncoding,
    /// Directory that receives `<input name>_html_chunks/`.
    pub output_parent: PathBuf,
    /// Chunk sizing.
    pub options: ChunkOptions,
}

impl ConvertRequest {
    /// Request with default sizing, writing next to the current directory.
    pub fn new(input: impl Into<PathBuf>, encoding: TextEncoding) -> Self {
        Self {
            input: input.into(),
            encoding,
            output_parent: PathBuf::from("."),
            options: ChunkOptions::default(),
        }
    }

    /// Put the output directory under `parent` instead of `.`.
    pub fn with_output_parent(mut self, parent: impl Into<PathBuf>) -> Self {
        self.output_parent = parent.into();
        self
    }

    /// Override chunk sizing.
    pub fn with_options(mut self, options: ChunkOptions) -> Self {
        self.options = options;
        self
    }
}

/// Names derived from the input path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLayout {
    /// Input base name, shown in every document (`novel.txt`).
    pub file_name: String,
    /// Input base name without extension, used for chunk files (`novel`).
    pub stem: String,
    /// `<parent>/<file_name>_html_chunks`.
    pub dir: PathBuf,
}

impl OutputLayout {
    /// Derive names for `input`, placing the directory under `parent`.
    pub fn for_input(input: &Path, parent: &Path) -> Self {
        let file_name = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = parent.join(format!("{}{}", file_name, OUTPUT_DIR_SUFFIX));
        Self {
            file_name,
            stem,
            dir,
        }
    }

    /// Path of the 1-based chunk `index`.
    pub fn chunk_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}_chunk_{}.html", self.stem, index))
    }
}

/// Progress notifications emitted while a run proceeds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunEvent {
    /// Input opened and output directory prepared.
    Started {
        input: PathBuf,
        input_bytes: u64,
        output_dir: PathBuf,
    },
    /// Pre-scan finished.
    LinesCounted {
        total_lines: usize,
        estimated_chunks: usize,
    },
    /// One chunk document written.
    ChunkWritten {
        index: usize,
        total: usize,
        path: PathBuf,
        bytes: usize,
    },
}

/// One written chunk document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrittenChunk {
    /// 1-based chunk index.
    pub index: usize,
    /// File written.
    pub path: PathBuf,
    /// Rendered document size.
    pub bytes: usize,
    /// Escaped content size inside the document.
    pub content_bytes: usize,
}

/// Outcome of a finished run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub input_bytes: u64,
    pub encoding: TextEncoding,
    pub total_lines: usize,
    pub estimated_chunks: usize,
    pub output_dir: PathBuf,
    pub files: Vec<WrittenChunk>,
    /// Input contained byte sequences invalid for the chosen encoding.
    pub had_replacements: bool,
}

impl RunSummary {
    /// Number of chunk files written.
    pub fn total_chunks(&self) -> usize {
        self.files.len()
    }
}

/// Convert `request.input` into chunk documents rendered by `renderer`.
///
/// The output directory is removed and recreated before anything is written.
/// A failure part-way through may leave some chunk files behind.
pub fn convert_file<T, E>(
    request: &ConvertRequest,
    renderer: &T,
    mut on_event: E,
) -> Result<RunSummary, ConvertError>
where
    T: ChunkRenderer + ?Sized,
    E: FnMut(&RunEvent),
{
    let input = request.input.as_path();
    if !input.exists() {
        return Err(ConvertError::InputNotFound(input.to_path_buf()));
    }
    let mut file = File::open(input).map_err(|source| ConvertError::Open {
        path: input.to_path_buf(),
        source,
    })?;
    let input_bytes = file.metadata().map(|meta| meta.len()).unwrap_or(0);
    let layout = OutputLayout::for_input(input, &request.output_parent);

    recreate_dir(&layout.dir)?;
    log::info!(
        "converting {} ({} bytes, {}) into {}",
        input.display(),
        input_bytes,
        request.encoding.label(),
        layout.dir.display()
    );
    on_event(&RunEvent::Started {
        input: input.to_path_buf(),
        input_bytes,
        output_dir: layout.dir.clone(),
    });

    let total_lines = count_lines(&mut file, request.encoding).map_err(ConvertError::Read)?;
    let estimated_chunks = request.options.estimate_total_chunks(total_lines);
    log::info!(
        "pre-scan: {} lines, estimating {} chunks",
        total_lines,
        estimated_chunks
    );
    on_event(&RunEvent::LinesCounted {
        total_lines,
        estimated_chunks,
    });

    file.seek(SeekFrom::Start(0)).map_err(ConvertError::Seek)?;

    let mut lines = DecodedLines::new(&mut file, request.encoding);
    let mut planner = ChunkPlanner::new(
        request.options,
        &layout.file_name,
        estimated_chunks,
        |meta: &ChunkMeta<'_>| renderer.overhead(meta),
    );
    for line in lines.by_ref() {
        let line = line.map_err(ConvertError::Read)?;
        planner.push(&escape_line(&line));
    }
    let had_replacements = lines.had_replacements();
    drop(lines);
    drop(file);

    let plan = planner.finish();
    let total = plan.actual_total();
    if total != estimated_chunks {
        log::debug!(
            "chunk estimate corrected from {} to {}",
            estimated_chunks,
            total
        );
    }

    let mut files = Vec::with_capacity(total);
    for (offset, content) in plan.chunks().iter().enumerate() {
        let index = offset + 1;
        let html = renderer.render(&ChunkPage {
            content,
            meta: ChunkMeta {
                file_name: &layout.file_name,
                total_chunks: total,
                current_chunk: index,
            },
        });
        let path = layout.chunk_path(index);
        write_document(&path, html.as_bytes())?;
        log::debug!("wrote {} ({} bytes)", path.display(), html.len());
        on_event(&RunEvent::ChunkWritten {
            index,
            total,
            path: path.clone(),
            bytes: html.len(),
        });
        files.push(WrittenChunk {
            index,
            path,
            bytes: html.len(),
            content_bytes: content.len(),
        });
    }

    log::info!(
        "wrote {} chunk files to {}",
        files.len(),
        layout.dir.display()
    );
    Ok(RunSummary {
        input_bytes,
        encoding: request.encoding,
        total_lines,
        estimated_chunks,
        output_dir: layout.dir,
        files,
        had_replacements,
    })
}

fn recreate_dir(dir: &Path) -> Result<(), ConvertError> {
    if let Err(err) = fs::remove_dir_all(dir) {
        if err.kind() != std::io::ErrorKind::NotFound {
            log::debug!("could not remove {}: {}", dir.display(), err);
        }
    }
    fs::create_dir_all(dir).map_err(|source| ConvertError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_document(path: &Path, bytes: &[u8]) -> Result<(), ConvertError> {
    let to_err = |source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut out = File::create(path).map_err(to_err)?;
    out.write_all(bytes).map_err(to_err)?;
    out.flush().map_err(to_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_uses_base_name_for_dir_and_stem_for_files() {
        let layout = OutputLayout::for_input(Path::new("books/novel.txt"), Path::new("out"));
        assert_eq!(layout.file_name, "novel.txt");
        assert_eq!(layout.stem, "novel");
        assert_eq!(layout.dir, Path::new("out").join("novel.txt_html_chunks"));
        assert_eq!(
            layout.chunk_path(12),
            Path::new("out")
                .join("novel.txt_html_chunks")
                .join("novel_chunk_12.html")
        );
    }

    #[test]
    fn layout_handles_names_without_extension() {
        let layout = OutputLayout::for_input(Path::new("README"), Path::new("."));
        assert_eq!(layout.file_name, "README");
        assert_eq!(layout.stem, "README");
        assert!(layout.chunk_path(1).ends_with("README_chunk_1.html"));
    }

    #[test]
    fn missing_input_is_reported_before_touching_output() {
        struct Bare;
        impl ChunkRenderer for Bare {
            fn render(&self, page: &ChunkPage<'_>) -> String {
                page.content.to_string()
            }
        }
        let request = ConvertRequest::new("definitely/not/here.txt", TextEncoding::Utf8)
            .with_output_parent("definitely/not");
        let err = convert_file(&request, &Bare, |_| {}).expect_err("missing input");
        assert!(matches!(err, ConvertError::InputNotFound(_)));
    }
}
