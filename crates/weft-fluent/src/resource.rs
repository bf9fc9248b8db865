#![forbid(unsafe_code)]

//! Message resource assembly.
//!
//! A [`MessageResource`] regenerates the textual Fluent source fed to the
//! bundle compiler: one `key = pattern` entry per string source, entries
//! grouped into named blocks (one block per contributing repo), blocks
//! separated by a blank line and concatenated in dependency order. The
//! resource is regenerated from the live sources on every call, never
//! mutated in place.
//!
//! Pattern values containing newlines are emitted as indented continuation
//! lines, and empty values as an empty string literal, so that any plain
//! string round-trips through the Fluent grammar.

use crate::source::StringSource;

/// A named group of string sources contributed by one repo.
#[derive(Clone, Debug)]
struct Block {
    name: String,
    sources: Vec<StringSource>,
}

/// Ordered collection of blocks, assembled into Fluent resource text.
#[derive(Clone, Debug, Default)]
pub struct MessageResource {
    blocks: Vec<Block>,
}

impl MessageResource {
    /// An empty resource.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block of sources. Blocks are emitted in the order they are
    /// added; callers add them in dependency order.
    pub fn add_block(&mut self, name: impl Into<String>, sources: Vec<StringSource>) {
        self.blocks.push(Block {
            name: name.into(),
            sources,
        });
    }

    /// All sources in emission order, flattened across blocks. This is the
    /// dependency list a bundle container subscribes to.
    #[must_use]
    pub fn sources(&self) -> Vec<StringSource> {
        self.blocks
            .iter()
            .flat_map(|block| block.sources.iter().cloned())
            .collect()
    }

    /// Number of entries across all blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.iter().map(|block| block.sources.len()).sum()
    }

    /// True when no block contains any entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Regenerate the concatenated Fluent resource text from the current
    /// source values.
    #[must_use]
    pub fn ftl(&self) -> String {
        let mut text = String::new();
        for block in &self.blocks {
            if block.sources.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push('\n');
            }
            for source in &block.sources {
                text.push_str(&ftl_entry(source.key(), &source.get()));
                text.push('\n');
            }
        }
        tracing::trace!(
            blocks = self.blocks.len(),
            entries = self.len(),
            bytes = text.len(),
            "message resource regenerated"
        );
        text
    }

    /// Names of the blocks in emission order.
    #[must_use]
    pub fn block_names(&self) -> Vec<&str> {
        self.blocks.iter().map(|block| block.name.as_str()).collect()
    }
}

/// Render one `key = pattern` entry.
///
/// Multi-line values become Fluent continuation lines (indented under the
/// key); an empty value becomes an empty string-literal placeable, since a
/// bare `key =` with no value is a syntax error.
fn ftl_entry(key: &str, value: &str) -> String {
    if value.is_empty() {
        return format!("{key} = {{\"\"}}");
    }
    if value.contains('\n') {
        let mut entry = format!("{key} =");
        for line in value.lines() {
            entry.push_str("\n    ");
            entry.push_str(line);
        }
        return entry;
    }
    format!("{key} = {value}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
