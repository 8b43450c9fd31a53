//! Line codec for tree nodes.
//!
//! # Format
//! Fields are `;`-delimited, with a trailing delimiter after the last field:
//! ```text
//! Leaf:     L;numKeys;key_1;...;key_n;ptr_1;...;ptr_n;prevLeafId;nextLeafId;
//! Internal: I;numKeys;key_1;...;key_n;child_0;...;child_n;
//! ```
//! The format must stay bit-exact so existing index files remain readable.

use std::fmt::Write;
use std::str::FromStr;

use crate::common::config::HEADER_LINES;
use crate::common::{Error, NodeId, Result};

use super::node::{InternalBody, LeafBody, Node, NodeBody, NodeKind};

const DELIMITER: char = ';';

/// Serialize a node to its index file line (without the newline).
pub fn encode(node: &Node) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write!(out, "{}{}{}{}", node.kind().tag(), DELIMITER, node.num_keys(), DELIMITER);
    for key in &node.keys {
        let _ = write!(out, "{}{}", key, DELIMITER);
    }
    match &node.body {
        NodeBody::Leaf(leaf) => {
            for record in &leaf.records {
                let _ = write!(out, "{}{}", record, DELIMITER);
            }
            let _ = write!(out, "{}{}{}{}", leaf.prev.0, DELIMITER, leaf.next.0, DELIMITER);
        }
        NodeBody::Internal(internal) => {
            for child in &internal.children {
                let _ = write!(out, "{}{}", child.0, DELIMITER);
            }
        }
    }
    out
}

/// Parse node `id` from its index file line.
///
/// A line without the final delimiter is accepted.
///
/// # Errors
/// Returns `Error::Parse` on an unknown tag, a wrong field count, or a
/// non-numeric field.
pub fn decode(id: NodeId, line: &str) -> Result<Node> {
    let file_line = id.0 as usize + HEADER_LINES;
    if line.is_empty() {
        return Err(Error::parse(file_line, "empty node line"));
    }

    let body = line.strip_suffix(DELIMITER).unwrap_or(line);
    let fields: Vec<&str> = body.split(DELIMITER).collect();

    let kind = NodeKind::from_tag(fields[0])
        .ok_or_else(|| Error::parse(file_line, format!("unknown node tag {:?}", fields[0])))?;

    let num_keys: usize = parse_field(fields.get(1).copied(), file_line, "numKeys")?;
    let expected = match kind {
        NodeKind::Leaf => num_keys.checked_mul(2).and_then(|n| n.checked_add(4)),
        NodeKind::Internal => num_keys.checked_mul(2).and_then(|n| n.checked_add(3)),
    }
    .ok_or_else(|| Error::parse(file_line, format!("numKeys {} out of range", num_keys)))?;
    if fields.len() != expected {
        return Err(Error::parse(
            file_line,
            format!("expected {} fields, found {}", expected, fields.len()),
        ));
    }

    let mut rest = fields[2..].iter().copied();
    let keys = take_fields(&mut rest, num_keys, file_line, "key")?;

    let body = match kind {
        NodeKind::Leaf => {
            let records = take_fields(&mut rest, num_keys, file_line, "record pointer")?;
            let prev = NodeId::new(parse_field(rest.next(), file_line, "prevLeafId")?);
            let next = NodeId::new(parse_field(rest.next(), file_line, "nextLeafId")?);
            NodeBody::Leaf(LeafBody { records, prev, next })
        }
        NodeKind::Internal => {
            let children: Vec<u32> = take_fields(&mut rest, num_keys + 1, file_line, "child id")?;
            NodeBody::Internal(InternalBody {
                children: children.into_iter().map(NodeId::new).collect(),
            })
        }
    };

    Ok(Node { id, keys, body })
}

fn take_fields<'a, T: FromStr>(
    fields: &mut impl Iterator<Item = &'a str>,
    count: usize,
    file_line: usize,
    what: &str,
) -> Result<Vec<T>> {
    (0..count)
        .map(|_| parse_field(fields.next(), file_line, what))
        .collect()
}

fn parse_field<T: FromStr>(field: Option<&str>, file_line: usize, what: &str) -> Result<T> {
    let field = field.ok_or_else(|| Error::parse(file_line, format!("missing {}", what)))?;
    field
        .trim()
        .parse()
        .map_err(|_| Error::parse(file_line, format!("non-numeric {} {:?}", what, field)))
}
