//! Per-assembly coverage from minigraph's `--cov` output.
//!
//! Mapping an assembly against a graph with `minigraph --cov` writes
//! the graph back with a `dc` tag on every segment and link, giving
//! how much of the assembly aligned there. The file is named
//! `{assembly}_{graph}.gaf`, and its `S` and `L` lines are all `rgaf`
//! reads from it.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use bstr::{io::BufReadExt, BString};
use rayon::prelude::*;
use tracing::{debug, info};

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::gfa::{fields, parent_child, NodeRecord};
use crate::parser::{
    Delimiter, Field, FieldResult, LineKind, ParseError, ParseResult, Record,
    Schema,
};

const RANK: Field = Field::back("rank", 2);
const COVERAGE: Field = Field::back("coverage", 1);

const SEGMENT: Schema = Schema {
    delimiter: Delimiter::Whitespace,
    fields: &[
        fields::NODE_ID,
        fields::SEQUENCE,
        fields::CHROMOSOME,
        fields::POSITION,
        RANK,
        COVERAGE,
    ],
};

const FROM_SEGMENT: Field = Field::front("from_segment", 1);
const FROM_ORIENT: Field = Field::front("from_orient", 2);
const TO_SEGMENT: Field = Field::front("to_segment", 3);
const TO_ORIENT: Field = Field::front("to_orient", 4);
const USAGE: Field = Field::back("usage", 1);

const LINK: Schema = Schema {
    delimiter: Delimiter::Whitespace,
    fields: &[FROM_SEGMENT, FROM_ORIENT, TO_SEGMENT, TO_ORIENT, USAGE],
};

/// Path of the alignment of `assembly` against the graph with the
/// given prefix, e.g. `nh232_asm5.gaf`.
pub fn alignment_path<P: AsRef<Path>>(
    dir: P,
    assembly: &str,
    graph: &str,
) -> PathBuf {
    dir.as_ref().join(format!("{}_{}.gaf", assembly, graph))
}

/// A segment as seen by one assembly's alignment, with its raw `dc`
/// value. Zero or negative coverage means the assembly is absent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct NodeCoverage {
    pub node: NodeRecord,
    pub coverage: f64,
}

impl NodeCoverage {
    pub fn parse_line(line_no: usize, line: &[u8]) -> ParseResult<Self> {
        let malformed = |e| ParseError::malformed(line_no, line, e);

        let record = SEGMENT.bind(line).map_err(malformed)?;
        let node = NodeRecord::from_record(&record, &RANK).map_err(malformed)?;

        let tag = record.tag(&COVERAGE).map_err(malformed)?;
        if tag.is_empty() {
            return Err(ParseError::MissingCoverageTag { line: line_no });
        }
        let coverage = record.tag_value(&COVERAGE).map_err(malformed)?;

        Ok(NodeCoverage { node, coverage })
    }
}

/// Whether an assembly traverses a link, keyed by its (parent, child)
/// pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct EdgeUsage {
    pub parent: BString,
    pub child: BString,
    pub used: bool,
}

impl EdgeUsage {
    fn from_record(record: &Record<'_>) -> FieldResult<Self> {
        let from = record.name(&FROM_SEGMENT)?;
        let from_orient = record.orientation(&FROM_ORIENT)?;
        let to = record.name(&TO_SEGMENT)?;
        let to_orient = record.orientation(&TO_ORIENT)?;
        let usage: f64 = record.tag_value(&USAGE)?;

        let (parent, child) = parent_child((from, from_orient), (to, to_orient));
        Ok(EdgeUsage {
            parent,
            child,
            used: usage > 0.0,
        })
    }

    pub fn parse_line(line_no: usize, line: &[u8]) -> ParseResult<Self> {
        LINK.bind(line)
            .and_then(|record| Self::from_record(&record))
            .map_err(|e| ParseError::malformed(line_no, line, e))
    }

    pub fn key(&self) -> (BString, BString) {
        (self.parent.clone(), self.child.clone())
    }
}

/// Everything `rgaf` takes from one assembly's alignment file.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct AlignmentRecords {
    pub nodes: Vec<NodeCoverage>,
    pub edges: Vec<EdgeUsage>,
}

impl AlignmentRecords {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push_line(&mut self, line_no: usize, line: &[u8]) -> ParseResult<()> {
        match LineKind::of(line) {
            Some(LineKind::Segment) => {
                self.nodes.push(NodeCoverage::parse_line(line_no, line)?)
            }
            Some(LineKind::Link) => {
                self.edges.push(EdgeUsage::parse_line(line_no, line)?)
            }
            None => (),
        }
        Ok(())
    }

    /// Parse a whole alignment file, stopping at the first bad line.
    pub fn from_reader<R: BufRead>(reader: R) -> ParseResult<Self> {
        let mut records = Self::new();
        for (ix, line) in reader.byte_lines().enumerate() {
            let line = line?;
            records.push_line(ix + 1, &line)?;
        }
        Ok(records)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::MissingInput(path.into()));
        }

        let file = File::open(path)?;
        let records = Self::from_reader(BufReader::new(file))
            .map_err(|e| Error::parse(path, e))?;

        debug!(
            "{}: {} segments, {} links",
            path.display(),
            records.nodes.len(),
            records.edges.len()
        );
        Ok(records)
    }
}

/// Parse the alignment file of every assembly in parallel. The result
/// is in the same order as `assemblies`, and any error aborts the
/// whole batch.
pub fn load_assemblies<P: AsRef<Path>>(
    dir: P,
    graph: &str,
    assemblies: &[String],
) -> Result<Vec<(String, AlignmentRecords)>> {
    let paths: Vec<PathBuf> = assemblies
        .iter()
        .map(|asm| alignment_path(&dir, asm, graph))
        .collect();

    if let Some(missing) = paths.iter().find(|p| !p.is_file()) {
        return Err(Error::MissingInput(missing.clone()));
    }

    info!(
        "Parsing {} alignment files against graph {}",
        assemblies.len(),
        graph
    );

    assemblies
        .par_iter()
        .zip(paths.par_iter())
        .map(|(asm, path)| {
            AlignmentRecords::from_path(path).map(|recs| (asm.clone(), recs))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseFieldError;
    use std::io::Write;

    const ASM_A: &str = "S\ts1\tACGTACGTAC\tLN:i:10\tSN:Z:chr1\tSO:i:0\tSR:i:0\tdc:f:1
S\ts2\tACGTACGTACGTACGTACGT\tLN:i:20\tSN:Z:chr1\tSO:i:10\tSR:i:0\tdc:f:2.5
L\ts1\t+\ts2\t+\t0M\tSR:i:0\tdc:i:3
L\ts3\t-\ts2\t-\t0M\tSR:i:1\tdc:i:0
";

    #[test]
    fn parse_node_line() {
        let line = b"S\ts2\tACGTACGTACGTACGTACGT\tLN:i:20\tSN:Z:chr1\tSO:i:10\tSR:i:1\tdc:f:2.5";
        let cov = NodeCoverage::parse_line(1, line).unwrap();
        assert_eq!(NodeRecord::new("s2", 20, "chr1", 10, 1), cov.node);
        assert_eq!(2.5, cov.coverage);
    }

    #[test]
    fn negative_and_integer_coverage() {
        let neg = NodeCoverage::parse_line(1, b"S s1 A LN:i:1 SN:Z:c SO:i:0 SR:i:0 dc:f:-1")
            .unwrap();
        assert_eq!(-1.0, neg.coverage);

        let int = NodeCoverage::parse_line(1, b"S s1 A LN:i:1 SN:Z:c SO:i:0 SR:i:0 dc:i:4")
            .unwrap();
        assert_eq!(4.0, int.coverage);
    }

    #[test]
    fn empty_coverage_tag_is_fatal() {
        let line = b"S\ts1\tACGT\tLN:i:4\tSN:Z:chr1\tSO:i:0\tSR:i:0\tdc:f:";
        let err = NodeCoverage::parse_line(7, line).unwrap_err();
        assert!(matches!(err, ParseError::MissingCoverageTag { line: 7 }));
        assert!(err.to_string().contains("--cov"));
    }

    #[test]
    fn short_node_line_is_malformed() {
        let line = b"S\ts1\tACGT\tLN:i:4\tSN:Z:chr1\tSO:i:0\tdc:f:1";
        let err = NodeCoverage::parse_line(2, line).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MalformedRecord {
                line: 2,
                source: ParseFieldError::MissingFields { expected: 8, found: 7 },
                ..
            }
        ));
    }

    #[test]
    fn edge_orientation_normalizes() {
        let fwd = EdgeUsage::parse_line(1, b"L\ts1\t+\ts2\t+\t0M\tdc:i:3").unwrap();
        let rev = EdgeUsage::parse_line(1, b"L\ts2\t-\ts1\t-\t0M\tdc:i:3").unwrap();
        assert_eq!(fwd, rev);
        assert_eq!((BString::from("s1"), BString::from("s2")), fwd.key());
        assert!(fwd.used);

        let mixed = EdgeUsage::parse_line(1, b"L s1 + s2 - 0M dc:i:0").unwrap();
        assert_eq!(BString::from("s2"), mixed.parent);
        assert_eq!(BString::from("s1"), mixed.child);
        assert!(!mixed.used);
    }

    #[test]
    fn edge_usage_threshold() {
        let used = |v: &str| {
            let line = format!("L\ts1\t+\ts2\t+\t0M\tdc:i:{}", v);
            EdgeUsage::parse_line(1, line.as_bytes()).unwrap().used
        };
        assert!(used("1"));
        assert!(used("12"));
        assert!(!used("0"));
        assert!(!used("-1"));
    }

    #[test]
    fn bad_edge_orientation() {
        let err = EdgeUsage::parse_line(3, b"L\ts1\t>\ts2\t+\t0M\tdc:i:1").unwrap_err();
        assert!(matches!(
            err,
            ParseError::MalformedRecord {
                source: ParseFieldError::OrientationError,
                ..
            }
        ));
        assert_eq!(Some(3), err.line());
    }

    #[test]
    fn records_from_reader() {
        let recs = AlignmentRecords::from_reader(ASM_A.as_bytes()).unwrap();
        assert_eq!(2, recs.nodes.len());
        assert_eq!(2, recs.edges.len());

        // s3- s2- is s2+ s3+ read backwards
        assert_eq!(BString::from("s2"), recs.edges[1].parent);
        assert_eq!(BString::from("s3"), recs.edges[1].child);
        assert!(!recs.edges[1].used);
    }

    #[test]
    fn alignment_lines_are_skipped() {
        let gaf = "Sread1\t6\t0\t6\t+\t>s2>s3\t12\t2\t8\t6\t6\t60\tcg:Z:6M\n\n";
        let recs = AlignmentRecords::from_reader(gaf.as_bytes()).unwrap();
        assert_eq!(AlignmentRecords::new(), recs);
    }

    #[test]
    fn file_naming() {
        assert_eq!(
            PathBuf::from("gafs/nh232_asm5.gaf"),
            alignment_path("gafs", "nh232", "asm5")
        );
    }

    #[test]
    fn load_in_assembly_order() {
        let dir = tempfile::tempdir().unwrap();
        let asm_b = "S\ts2\tACGT\tLN:i:4\tSN:Z:chr1\tSO:i:10\tSR:i:0\tdc:f:1\n";
        for (name, contents) in [("a", ASM_A), ("b", asm_b)] {
            let mut f = File::create(alignment_path(dir.path(), name, "g")).unwrap();
            f.write_all(contents.as_bytes()).unwrap();
        }

        let names = vec!["b".to_string(), "a".to_string()];
        let loaded = load_assemblies(dir.path(), "g", &names).unwrap();
        assert_eq!("b", loaded[0].0);
        assert_eq!(1, loaded[0].1.nodes.len());
        assert_eq!("a", loaded[1].0);
        assert_eq!(2, loaded[1].1.nodes.len());

        let names = vec!["a".to_string(), "c".to_string()];
        let err = load_assemblies(dir.path(), "g", &names).unwrap_err();
        assert!(matches!(err, Error::MissingInput(p) if p.ends_with("c_g.gaf")));
    }
}
