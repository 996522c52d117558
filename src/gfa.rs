pub mod orientation;

pub use self::orientation::*;

use std::io::BufRead;
use std::path::Path;

use bstr::{io::BufReadExt, BString};
use tracing::{debug, info};

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mmap::MmapFile;
use crate::parser::{
    Delimiter, Field, LineKind, ParseError, ParseResult, Record, Schema,
};

/// Segment fields shared by graph and alignment `S` lines. The
/// stable sequence name, offset and rank are rGFA tags, e.g.
/// `SN:Z:chr1`, `SO:i:1000`, `SR:i:0`.
pub(crate) mod fields {
    use crate::parser::Field;

    pub const NODE_ID: Field = Field::front("nodeid", 1);
    pub const SEQUENCE: Field = Field::front("sequence", 2);
    pub const CHROMOSOME: Field = Field::front("chromosome", 4);
    pub const POSITION: Field = Field::front("position", 5);
}

const RANK: Field = Field::front("rank", 6);

const SEGMENT: Schema = Schema {
    delimiter: Delimiter::Tab,
    fields: &[
        fields::NODE_ID,
        fields::SEQUENCE,
        fields::CHROMOSOME,
        fields::POSITION,
        RANK,
    ],
};

/// A graph segment: its name, sequence length and the rGFA stable
/// coordinate and rank it was added with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct NodeRecord {
    pub id: BString,
    pub length: usize,
    pub chromosome: BString,
    pub position: i64,
    /// Index of the assembly that contributed the segment when the
    /// graph was built; 0 is the reference.
    pub rank: usize,
}

impl NodeRecord {
    pub fn new(
        id: &str,
        length: usize,
        chromosome: &str,
        position: i64,
        rank: usize,
    ) -> Self {
        NodeRecord {
            id: id.into(),
            length,
            chromosome: chromosome.into(),
            position,
            rank,
        }
    }

    /// Read the segment fields of a bound record. `rank` differs
    /// between graph lines, where it's at a fixed position, and
    /// alignment lines, where it's the second to last field.
    pub(crate) fn from_record(
        record: &Record<'_>,
        rank: &Field,
    ) -> crate::parser::FieldResult<Self> {
        Ok(NodeRecord {
            id: record.name(&fields::NODE_ID)?,
            length: record.len_of(&fields::SEQUENCE)?,
            chromosome: record.tag(&fields::CHROMOSOME)?.value.into(),
            position: record.tag_value(&fields::POSITION)?,
            rank: record.tag_value(rank)?,
        })
    }
}

/// Node length table row: id, length, chromosome, position and rank,
/// tab-separated.
impl std::fmt::Display for NodeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.id, self.length, self.chromosome, self.position, self.rank
        )
    }
}

/// The segments and links of a graph. Links aren't interpreted, only
/// kept as the raw `L` lines.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct GraphFeatures {
    pub nodes: Vec<NodeRecord>,
    pub links: Vec<BString>,
}

impl GraphFeatures {
    pub fn new() -> Self {
        Default::default()
    }

    /// Add a single line of the graph. Anything that isn't an `S` or
    /// `L` line is ignored; a malformed `S` line is an error.
    pub fn push_line(&mut self, line_no: usize, line: &[u8]) -> ParseResult<()> {
        match LineKind::of(line) {
            Some(LineKind::Segment) => {
                let node = SEGMENT
                    .bind(line)
                    .and_then(|rec| NodeRecord::from_record(&rec, &RANK))
                    .map_err(|e| ParseError::malformed(line_no, line, e))?;
                self.nodes.push(node);
            }
            Some(LineKind::Link) => self.links.push(line.into()),
            None => (),
        }
        Ok(())
    }

    pub fn from_reader<R: BufRead>(reader: R) -> ParseResult<Self> {
        let mut features = Self::new();
        for (ix, line) in reader.byte_lines().enumerate() {
            let line = line?;
            features.push_line(ix + 1, &line)?;
        }
        Ok(features)
    }

    /// Memory map and parse a graph file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::MissingInput(path.into()));
        }
        info!("Reading graph {}", path.display());

        let mmap = MmapFile::open(path)?;
        let mut features = Self::new();
        for (ix, line) in mmap.lines().enumerate() {
            features
                .push_line(ix + 1, line)
                .map_err(|e| Error::parse(path, e))?;
        }

        debug!(
            "{} segments totalling {} bp, {} links",
            features.nodes.len(),
            features.total_length(),
            features.links.len()
        );
        Ok(features)
    }

    /// Total sequence length of the graph.
    pub fn total_length(&self) -> usize {
        self.nodes.iter().map(|n| n.length).sum()
    }
}
