//! Chunk boundary planning.
//!
//! The planner consumes escaped lines in order and cuts them into chunks so
//! each rendered chunk stays under [`ChunkOptions::target_size`]. The byte
//! cost of the surrounding document is asked for every time a chunk opens,
//! because it changes with the chunk index and with the digit width of the
//! total (9 -> 10, 99 -> 100, ...).
//!
//! Planning runs against an *estimated* total. Callers render the final files
//! in a second pass using [`ChunkPlan::actual_total`].

use crate::template::ChunkMeta;

/// Target rendered size of one chunk document: 1 MiB.
pub const DEFAULT_TARGET_SIZE: usize = 1024 * 1024;
/// Content budget used when the document overhead alone reaches the target.
pub const DEFAULT_MIN_BUDGET: usize = 1024;
/// Assumed lines per chunk for the pre-scan estimate.
pub const DEFAULT_LINES_PER_CHUNK_HINT: usize = 300;

/// Sizing knobs for chunk planning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkOptions {
    /// Upper bound for a rendered chunk document, in bytes.
    pub target_size: usize,
    /// Floor for the per-chunk content budget.
    pub min_budget: usize,
    /// Lines assumed to fit in one chunk when estimating the chunk count.
    pub lines_per_chunk_hint: usize,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            min_budget: DEFAULT_MIN_BUDGET,
            lines_per_chunk_hint: DEFAULT_LINES_PER_CHUNK_HINT,
        }
    }
}

impl ChunkOptions {
    /// Content budget for a chunk whose empty document costs `overhead` bytes.
    pub fn budget_for(&self, overhead: usize) -> usize {
        if overhead >= self.target_size {
            self.min_budget
        } else {
            self.target_size - overhead
        }
    }

    /// Rough chunk count from a pre-scan line count; never below 1.
    pub fn estimate_total_chunks(&self, total_lines: usize) -> usize {
        (total_lines / self.lines_per_chunk_hint.max(1)).max(1)
    }
}

/// Ordered chunk contents produced by one planning pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkPlan {
    chunks: Vec<String>,
    estimated_total: usize,
}

impl ChunkPlan {
    /// Chunk contents in order.
    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    /// Consume the plan, keeping the chunk contents.
    pub fn into_chunks(self) -> Vec<String> {
        self.chunks
    }

    /// Total used for overhead while planning.
    pub fn estimated_total(&self) -> usize {
        self.estimated_total
    }

    /// Real number of chunks; this is what final documents must show.
    pub fn actual_total(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Incremental chunk planner.
///
/// `overhead` receives the metadata of the chunk being opened, always carrying
/// the estimate given to [`ChunkPlanner::new`] as its total.
pub struct ChunkPlanner<'a, F> {
    options: ChunkOptions,
    file_name: &'a str,
    estimated_total: usize,
    overhead: F,
    chunks: Vec<String>,
    current: String,
    chunk_index: usize,
    budget: usize,
}

impl<'a, F> ChunkPlanner<'a, F>
where
    F: FnMut(&ChunkMeta<'_>) -> usize,
{
    /// Start planning; the budget for chunk 1 is computed immediately.
    pub fn new(options: ChunkOptions, file_name: &'a str, estimated_total: usize, overhead: F) -> Self {
        let mut planner = Self {
            options,
            file_name,
            estimated_total,
            overhead,
            chunks: Vec::new(),
            current: String::new(),
            chunk_index: 1,
            budget: 0,
        };
        planner.budget = planner.budget_for_current();
        planner
    }

    fn budget_for_current(&mut self) -> usize {
        let meta = ChunkMeta {
            file_name: self.file_name,
            total_chunks: self.estimated_total,
            current_chunk: self.chunk_index,
        };
        let overhead = (self.overhead)(&meta);
        self.options.budget_for(overhead)
    }

    /// Index of the chunk currently being filled.
    pub fn chunk_index(&self) -> usize {
        self.chunk_index
    }

    /// Content budget of the chunk currently being filled.
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Append one escaped line, closing the open chunk first if the line
    /// would overflow it. Lines are never split.
    pub fn push(&mut self, line: &str) {
        if !self.current.is_empty() && self.current.len() + line.len() > self.budget {
            log::debug!(
                "closing chunk {} at {} bytes (budget {})",
                self.chunk_index,
                self.current.len(),
                self.budget
            );
            let closed = std::mem::take(&mut self.current);
            self.chunks.push(closed);
            self.chunk_index += 1;
            self.budget = self.budget_for_current();
        }
        if line.len() > self.budget {
            log::trace!(
                "line of {} bytes exceeds chunk {} budget {}",
                line.len(),
                self.chunk_index,
                self.budget
            );
        }
        self.current.push_str(line);
    }

    /// Close the last chunk and return the plan.
    pub fn finish(mut self) -> ChunkPlan {
        if !self.current.is_empty() {
            log::debug!(
                "closing final chunk {} at {} bytes (budget {})",
                self.chunk_index,
                self.current.len(),
                self.budget
            );
            self.chunks.push(self.current);
        }
        ChunkPlan {
            chunks: self.chunks,
            estimated_total: self.estimated_total,
        }
    }
}

/// Plan a complete line stream in one call.
pub fn plan_chunks<I, S, F>(
    lines: I,
    options: ChunkOptions,
    file_name: &str,
    estimated_total: usize,
    overhead: F,
) -> ChunkPlan
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: FnMut(&ChunkMeta<'_>) -> usize,
{
    let mut planner = ChunkPlanner::new(options, file_name, estimated_total, overhead);
    for line in lines {
        planner.push(line.as_ref());
    }
    planner.finish()
}
