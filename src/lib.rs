//! Split large plain-text files into size-bounded, self-contained HTML chunks.
//!
//! The pipeline is: decode the input with a [`TextEncoding`], escape each line
//! ([`escape_line`]), cut the line stream into chunks with a [`ChunkPlanner`]
//! whose budgets come from a [`ChunkRenderer`], then render every chunk again
//! with the real chunk count and write one document per chunk
//! ([`convert_file`]).
//!
//! ```rust,no_run
//! use txt_chunks::{convert_file, ChunkTemplate, ConvertRequest, TextEncoding};
//!
//! # fn example() -> Result<(), txt_chunks::ConvertError> {
//! let template = ChunkTemplate::parse(
//!     "<title>{{file_name}} {{current_chunk}}/{{total_chunks}}</title><pre>{{content}}</pre>",
//! )?;
//! let request = ConvertRequest::new("novel.txt", TextEncoding::Gbk);
//! let summary = convert_file(&request, &template, |_| {})?;
//! println!("{} files in {}", summary.total_chunks(), summary.output_dir.display());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented
    )
)]

pub mod chunk_plan;
pub mod encoding;
pub mod error;
pub mod escape;
pub mod run;
pub mod template;

pub use chunk_plan::{
    plan_chunks, ChunkOptions, ChunkPlan, ChunkPlanner, DEFAULT_LINES_PER_CHUNK_HINT,
    DEFAULT_MIN_BUDGET, DEFAULT_TARGET_SIZE,
};
pub use encoding::{count_lines, DecodedLines, TextEncoding, READ_BUFFER_SIZE};
pub use error::{ConvertError, TemplateError};
pub use escape::{escape_line, escape_text};
pub use run::{
    convert_file, ConvertRequest, OutputLayout, RunEvent, RunSummary, WrittenChunk,
    OUTPUT_DIR_SUFFIX,
};
pub use template::{ChunkMeta, ChunkPage, ChunkRenderer, ChunkTemplate};
