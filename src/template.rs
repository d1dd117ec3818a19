//! Chunk document rendering contract and a placeholder template engine.
//!
//! The planner only needs two things from a renderer: the finished document
//! for a chunk, and the byte cost of that document with no content. Both go
//! through [`ChunkRenderer`] so tests can plug in trivial stubs.

use crate::error::TemplateError;
use crate::escape::escape_text;

/// Metadata rendered around a chunk's content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkMeta<'a> {
    /// Source file name shown in the title and page header.
    pub file_name: &'a str,
    /// Total chunk count (estimated while planning, actual when writing).
    pub total_chunks: usize,
    /// 1-based index of this chunk.
    pub current_chunk: usize,
}

/// Full render input for one chunk document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkPage<'a> {
    /// Already-escaped chunk content.
    pub content: &'a str,
    /// Metadata around the content.
    pub meta: ChunkMeta<'a>,
}

/// Renders chunk documents.
pub trait ChunkRenderer {
    /// Produce the complete document for `page`. Must be deterministic.
    fn render(&self, page: &ChunkPage<'_>) -> String;

    /// Byte length of the document for `meta` with empty content.
    fn overhead(&self, meta: &ChunkMeta<'_>) -> usize {
        self.render(&ChunkPage { content: "", meta: *meta }).len()
    }
}

impl<T: ChunkRenderer + ?Sized> ChunkRenderer for &T {
    fn render(&self, page: &ChunkPage<'_>) -> String {
        (**self).render(page)
    }

    fn overhead(&self, meta: &ChunkMeta<'_>) -> usize {
        (**self).overhead(meta)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Content,
    FileName,
    TotalChunks,
    CurrentChunk,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "content" => Some(Self::Content),
            "file_name" => Some(Self::FileName),
            "total_chunks" => Some(Self::TotalChunks),
            "current_chunk" => Some(Self::CurrentChunk),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// Parsed template with `{{content}}`, `{{file_name}}`, `{{total_chunks}}`
/// and `{{current_chunk}}` placeholders.
///
/// `file_name` is HTML-escaped on substitution; `content` is inserted as-is
/// because lines are escaped before they reach the planner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkTemplate {
    segments: Vec<Segment>,
    literal_len: usize,
}

impl ChunkTemplate {
    /// Parse `source` into literal and placeholder segments.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal_len = 0usize;
        let mut has_content = false;
        let mut rest = source;
        let mut offset = 0usize;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                literal_len += open;
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after_open = &rest[open + 2..];
            let close = after_open
                .find("}}")
                .ok_or(TemplateError::UnterminatedPlaceholder {
                    offset: offset + open,
                })?;
            let name = after_open[..close].trim();
            let field = Field::from_name(name).ok_or_else(|| TemplateError::UnknownField {
                name: name.to_string(),
                offset: offset + open,
            })?;
            has_content |= field == Field::Content;
            segments.push(Segment::Field(field));

            let consumed = open + 2 + close + 2;
            rest = &rest[consumed..];
            offset += consumed;
        }
        if !rest.is_empty() {
            literal_len += rest.len();
            segments.push(Segment::Literal(rest.to_string()));
        }
        if !has_content {
            return Err(TemplateError::MissingContent);
        }

        Ok(Self {
            segments,
            literal_len,
        })
    }
}

impl ChunkRenderer for ChunkTemplate {
    fn render(&self, page: &ChunkPage<'_>) -> String {
        let escaped_name = escape_text(page.meta.file_name);
        let mut out = String::with_capacity(self.literal_len + page.content.len() + 64);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(Field::Content) => out.push_str(page.content),
                Segment::Field(Field::FileName) => out.push_str(&escaped_name),
                Segment::Field(Field::TotalChunks) => {
                    out.push_str(&page.meta.total_chunks.to_string())
                }
                Segment::Field(Field::CurrentChunk) => {
                    out.push_str(&page.meta.current_chunk.to_string())
                }
            }
        }
        out
    }

    // Same byte count as rendering with empty content, without building it.
    fn overhead(&self, meta: &ChunkMeta<'_>) -> usize {
        let name_len = escape_text(meta.file_name).len();
        let fields: usize = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(_) | Segment::Field(Field::Content) => 0,
                Segment::Field(Field::FileName) => name_len,
                Segment::Field(Field::TotalChunks) => decimal_width(meta.total_chunks),
                Segment::Field(Field::CurrentChunk) => decimal_width(meta.current_chunk),
            })
            .sum();
        self.literal_len + fields
    }
}

fn decimal_width(mut value: usize) -> usize {
    let mut width = 1;
    while value >= 10 {
        value /= 10;
        width += 1;
    }
    width
}
