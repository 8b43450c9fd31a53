//! Node Store - node and header persistence on top of a [`LineFile`].

use std::path::Path;

use tracing::debug;

use crate::common::config::HEADER_LINES;
use crate::common::{Error, NodeId, Result};
use crate::storage::line_file::LineFile;
use crate::storage::node::{codec, Node};
use crate::storage::TreeHeader;

/// Reads and writes nodes by id and the header lines of the index file.
///
/// Node `id` is stored on line `id + HEADER_LINES`.
pub struct NodeStore {
    file: LineFile,
}

impl NodeStore {
    /// Open the index file, creating it with an empty-tree header if it is
    /// missing or has no content.
    pub fn open<P: AsRef<Path>>(path: P, sync: bool) -> Result<Self> {
        let mut file = LineFile::open_or_create(path, sync)?;
        if file.is_empty()? {
            debug!(path = %file.path().display(), "initializing index file");
            file.write_lines(1, &TreeHeader::default().to_lines())?;
        }
        Ok(Self { file })
    }

    /// Load node `id`.
    ///
    /// # Errors
    /// - `Error::Logic` for `NodeId::NULL`
    /// - `Error::Parse` if the line is missing or malformed
    pub fn read_node(&mut self, id: NodeId) -> Result<Node> {
        if id.is_null() {
            return Err(Error::logic(id, "cannot load the null node"));
        }
        let line_number = Self::line_of(id);
        let line = self
            .file
            .read_line(line_number)?
            .ok_or_else(|| Error::parse(line_number, format!("{} has no line", id)))?;
        codec::decode(id, &line)
    }

    /// Persist `node` on its line.
    pub fn write_node(&mut self, node: &Node) -> Result<()> {
        if node.id.is_null() {
            return Err(Error::logic(node.id, "cannot save a node without an id"));
        }
        self.file.write_line(Self::line_of(node.id), &codec::encode(node))
    }

    /// Read the header lines.
    pub fn read_header(&mut self) -> Result<TreeHeader> {
        let root_line = self.file.read_line(1)?.unwrap_or_default();
        let next_line = self.file.read_line(2)?.unwrap_or_default();
        TreeHeader::from_lines(&root_line, &next_line)
    }

    /// Rewrite the header lines.
    pub fn write_header(&mut self, header: &TreeHeader) -> Result<()> {
        self.file.write_lines(1, &header.to_lines())
    }

    #[inline]
    fn line_of(id: NodeId) -> usize {
        id.0 as usize + HEADER_LINES
    }
}
