//! Address space and per-file emit accumulator.
//!
//! Every generated file is addressed by a [`Connection`]: the origin whose
//! declarations it holds and the emission (target representation) it is written
//! in. Emitters collect header lines, body lines and file dependencies into one
//! [`Emit`] per connection.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// `(origin, emission)` address of one generated file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Connection {
    /// Origin whose declarations the file holds.
    pub origin: String,
    /// Emission the file is written in.
    pub emission: String,
}

impl Connection {
    /// Address of `origin` in `emission`.
    pub fn new(origin: impl Into<String>, emission: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            emission: emission.into(),
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.emission, self.origin)
    }
}

/// Accumulated output for one connection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Emit {
    /// Origin of the connection that created the emit.
    pub origin: String,
    /// Emission of the connection that created the emit.
    pub emission: String,
    /// Imports and re-exports, written before the body.
    pub headlines: Vec<String>,
    /// Body lines.
    pub lines: Vec<String>,
    /// Other files this one references; deduplicated on insert.
    pub connections: Vec<Connection>,
}

impl Emit {
    /// Empty emit for `connection`.
    pub fn new(connection: &Connection) -> Self {
        Self {
            origin: connection.origin.clone(),
            emission: connection.emission.clone(),
            ..Self::default()
        }
    }

    /// Address of this emit.
    pub fn connection(&self) -> Connection {
        Connection::new(self.origin.clone(), self.emission.clone())
    }

    /// Record a dependency. Returns `false` when it was already recorded.
    pub fn add_connection(&mut self, connection: Connection) -> bool {
        if self.connections.contains(&connection) {
            return false;
        }
        self.connections.push(connection);
        true
    }

    /// Append header lines, skipping ones already present.
    pub fn merge_headlines<'a>(&mut self, headlines: impl IntoIterator<Item = &'a String>) {
        for line in headlines {
            if !self.headlines.contains(line) {
                self.headlines.push(line.clone());
            }
        }
    }

    /// Header lines followed by body lines.
    pub fn page(&self) -> Vec<String> {
        self.headlines
            .iter()
            .chain(self.lines.iter())
            .cloned()
            .collect()
    }
}

/// The emits produced by one emitter pass, keyed by origin.
///
/// Within one pass every origin has exactly one emit; the emission of an entry
/// is fixed by the connection that created it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitMap {
    entries: IndexMap<String, Emit>,
}

impl EmitMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit for `connection.origin`, created on first reference.
    pub fn get_or_create(&mut self, connection: &Connection) -> &mut Emit {
        self.entries
            .entry(connection.origin.clone())
            .or_insert_with(|| Emit::new(connection))
    }

    /// Emit of `origin`.
    pub fn get(&self, origin: &str) -> Option<&Emit> {
        self.entries.get(origin)
    }

    /// Mutable emit of `origin`.
    pub fn get_mut(&mut self, origin: &str) -> Option<&mut Emit> {
        self.entries.get_mut(origin)
    }

    /// Record that `requested_from` depends on `target`.
    pub fn add_dependency(&mut self, requested_from: &Connection, target: Connection) {
        self.get_or_create(requested_from).add_connection(target);
    }

    /// Emits in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Emit> {
        self.entries.values()
    }

    /// Number of emits.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no emit has been created.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for EmitMap {
    type Item = Emit;
    type IntoIter = indexmap::map::IntoValues<String, Emit>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

/// Push an empty line unless the last line already is one.
pub fn add_space(lines: &mut Vec<String>) {
    if lines.last().is_none_or(|last| !last.is_empty()) {
        lines.push(String::new());
    }
}
