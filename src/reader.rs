//! Reading the intermediate tables back, so each stage can run as its
//! own command.
//!
//! The readers take any `BufRead` plus the path it came from, which is
//! only used in error messages; the `*_path` functions open the file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use bstr::{io::BufReadExt, ByteSlice};
use tracing::{debug, warn};

use crate::coverage::CoverageTable;
use crate::error::{Error, Result};
use crate::gfa::NodeRecord;
use crate::matrix::PresenceMatrix;
use crate::parser::{
    Delimiter, Field, FieldResult, ParseError, ParseFieldError, Record, Schema,
};
use crate::writer::COVERAGE_COLUMNS;

const NODE_ID: Field = Field::front("nodeid", 0);
const LENGTH: Field = Field::front("nodelen", 1);
const CHROMOSOME: Field = Field::front("start_chromo", 2);
const POSITION: Field = Field::front("start_pos", 3);
const RANK: Field = Field::front("rrank", 4);

const NODE_FIELDS: &[Field] = &[NODE_ID, LENGTH, CHROMOSOME, POSITION, RANK];

const LENGTH_ROW: Schema = Schema {
    delimiter: Delimiter::Tab,
    fields: NODE_FIELDS,
};

const COVERAGE_ROW: Schema = Schema {
    delimiter: Delimiter::Whitespace,
    fields: NODE_FIELDS,
};

const MATRIX_ROW: Schema = Schema {
    delimiter: Delimiter::Tab,
    fields: &[NODE_ID],
};

fn node_from_row(record: &Record<'_>) -> FieldResult<NodeRecord> {
    Ok(NodeRecord {
        id: record.name(&NODE_ID)?,
        length: record.parse(&LENGTH)?,
        chromosome: record.get(&CHROMOSOME)?.into(),
        position: record.parse(&POSITION)?,
        rank: record.parse(&RANK)?,
    })
}

fn open(path: &Path) -> Result<BufReader<File>> {
    if !path.is_file() {
        return Err(Error::MissingInput(path.into()));
    }
    Ok(BufReader::new(File::open(path)?))
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

/// Bind a row that must have exactly `width` fields.
fn bind_row<'a>(
    schema: &Schema,
    width: usize,
    line: &'a [u8],
) -> FieldResult<Record<'a>> {
    let record = schema.bind(line)?;
    record.expect_len(width)?;
    Ok(record)
}

fn header_columns(header: &[u8], delimiter: Delimiter) -> Vec<String> {
    let header = header.trim_end_with(|c| c == '\n' || c == '\r');
    let fields: Vec<&[u8]> = match delimiter {
        Delimiter::Tab => header.split_str("\t").collect(),
        Delimiter::Whitespace => header.fields().collect(),
    };
    fields
        .into_iter()
        .map(|f| f.to_str_lossy().into_owned())
        .collect()
}

/// Read a node length table, as written by the `gfa` stage.
pub fn read_node_lengths<R: BufRead>(
    reader: R,
    path: &Path,
) -> Result<Vec<NodeRecord>> {
    let mut nodes = Vec::new();
    for (ix, line) in reader.byte_lines().enumerate() {
        let line = line?;
        if is_blank(&line) {
            continue;
        }
        let node = bind_row(&LENGTH_ROW, NODE_FIELDS.len(), &line)
            .and_then(|rec| node_from_row(&rec))
            .map_err(|e| Error::parse(path, ParseError::malformed(ix + 1, &line, e)))?;
        nodes.push(node);
    }
    debug!("Read {} node lengths from {}", nodes.len(), path.display());
    Ok(nodes)
}

pub fn read_node_lengths_path<P: AsRef<Path>>(path: P) -> Result<Vec<NodeRecord>> {
    let path = path.as_ref();
    read_node_lengths(open(path)?, path)
}

/// Read a combined coverage table, as written by the `gaf` stage.
///
/// The table must have one value column for each of `assemblies`,
/// which name the columns in order. If the names in the header
/// disagree, `assemblies` wins and a warning is logged.
pub fn read_coverage<R: BufRead>(
    reader: R,
    path: &Path,
    assemblies: &[String],
) -> Result<CoverageTable> {
    let width = COVERAGE_COLUMNS.len() + assemblies.len();
    let mut table = CoverageTable::with_assemblies(assemblies.to_vec());
    let mut lines = reader.byte_lines().enumerate();

    if let Some((_, header)) = lines.next() {
        let columns = header_columns(&header?, Delimiter::Whitespace);
        if columns.len() != width {
            return Err(Error::ColumnMismatch {
                what: format!("Coverage table {}", path.display()),
                expected: width,
                found: columns.len(),
            });
        }
        let named = &columns[COVERAGE_COLUMNS.len()..];
        if named != assemblies {
            warn!(
                "Coverage table columns {:?} differ from the given assemblies {:?}",
                named, assemblies
            );
        }
    }

    for (ix, line) in lines {
        let line = line?;
        if is_blank(&line) {
            continue;
        }
        let malformed = |e| Error::parse(path, ParseError::malformed(ix + 1, &line, e));

        let record = bind_row(&COVERAGE_ROW, width, &line).map_err(malformed)?;
        let node = node_from_row(&record).map_err(malformed)?;
        let values = record
            .tail(COVERAGE_COLUMNS.len())
            .iter()
            .map(|v| -> FieldResult<f64> {
                v.to_str()?
                    .parse::<f64>()
                    .map_err(|_| ParseFieldError::InvalidField("coverage"))
            })
            .collect::<FieldResult<Vec<f64>>>()
            .map_err(malformed)?;

        table
            .push_row(node.id.clone(), node, values)
            .map_err(|dup| Error::DuplicateNode {
                node: dup.key.to_string(),
                origin: format!("the coverage table {}", path.display()),
            })?;
    }

    debug!("Read coverage of {} nodes from {}", table.len(), path.display());
    Ok(table)
}

pub fn read_coverage_path<P: AsRef<Path>>(
    path: P,
    assemblies: &[String],
) -> Result<CoverageTable> {
    let path = path.as_ref();
    read_coverage(open(path)?, path, assemblies)
}

/// Read a binary node matrix, as written by the `mtx` stage. The
/// assembly names are taken from its header.
pub fn read_presence_matrix<R: BufRead>(reader: R, path: &Path) -> Result<PresenceMatrix> {
    let mut lines = reader.byte_lines().enumerate();

    let assemblies = match lines.next() {
        Some((_, header)) => header_columns(&header?, Delimiter::Tab)
            .into_iter()
            .skip(1)
            .collect(),
        None => Vec::new(),
    };
    let mut matrix = PresenceMatrix::new(assemblies);
    let width = matrix.total() + 1;

    for (ix, line) in lines {
        let line = line?;
        if is_blank(&line) {
            continue;
        }
        let malformed = |e| Error::parse(path, ParseError::malformed(ix + 1, &line, e));

        let record = bind_row(&MATRIX_ROW, width, &line).map_err(malformed)?;
        let node_id = record.name(&NODE_ID).map_err(malformed)?;
        let present = record
            .tail(1)
            .iter()
            .map(|v| match *v {
                b"0" => Ok(false),
                b"1" => Ok(true),
                _ => Err(ParseFieldError::InvalidField("presence")),
            })
            .collect::<FieldResult<Vec<bool>>>()
            .map_err(malformed)?;

        matrix.push_row(node_id, present)?;
    }

    Ok(matrix)
}

pub fn read_presence_matrix_path<P: AsRef<Path>>(path: P) -> Result<PresenceMatrix> {
    let path = path.as_ref();
    read_presence_matrix(open(path)?, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::{write_coverage, write_node_lengths, write_presence_matrix};
    use bstr::BString;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn here() -> &'static Path {
        Path::new("test.tsv")
    }

    #[test]
    fn node_lengths() {
        let text = "s1\t10\tchr1\t0\t0\ns2\t20\tchr1\t10\t0\n\ns3\t30\tchr2\t5\t1\n";
        let nodes = read_node_lengths(text.as_bytes(), here()).unwrap();
        assert_eq!(
            vec![
                NodeRecord::new("s1", 10, "chr1", 0, 0),
                NodeRecord::new("s2", 20, "chr1", 10, 0),
                NodeRecord::new("s3", 30, "chr2", 5, 1),
            ],
            nodes
        );

        let mut written = Vec::new();
        write_node_lengths(&nodes, &mut written).unwrap();
        assert_eq!(text.replace("\n\n", "\n").as_bytes(), &written[..]);
    }

    #[test]
    fn whitespace_lines_are_skipped() {
        let text = "s1\t10\tchr1\t0\t0\n \t\r\n\ns2\t20\tchr1\t10\t0\n";
        let nodes = read_node_lengths(text.as_bytes(), here()).unwrap();
        assert_eq!(2, nodes.len());

        let matrix = "nodeid\ta\n\n  \ns1\t1\n";
        let matrix = read_presence_matrix(matrix.as_bytes(), here()).unwrap();
        assert_eq!(1, matrix.rows().len());
    }

    #[test]
    fn node_lengths_wrong_width() {
        let err = read_node_lengths(&b"s1\t10\tchr1\t0\n"[..], here()).unwrap_err();
        match err {
            Error::Parse { source, .. } => assert_eq!(Some(1), source.line()),
            other => panic!("unexpected error {:?}", other),
        }

        let err = read_node_lengths(&b"s1\t10\tchr1\t0\t0\t7\n"[..], here()).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse {
                source: ParseError::MalformedRecord {
                    source: ParseFieldError::ExtraFields { expected: 5, found: 6 },
                    ..
                },
                ..
            }
        ));
    }

    #[test]
    fn coverage_table() {
        let text = "nodeid nodelen start_chromo start_pos rrank a b\n\
                    s1 10 chr1 0 0 2 0\n\
                    s2 20 chr1 10 0 0.5 1.5\n";
        let table = read_coverage(text.as_bytes(), here(), &names(&["a", "b"])).unwrap();
        assert_eq!(2, table.len());
        let s2 = table.get(&BString::from("s2")).unwrap();
        assert_eq!(vec![0.5, 1.5], s2.values);
        assert_eq!(20, s2.meta.length);

        let mut written = Vec::new();
        write_coverage(&table, &mut written).unwrap();
        assert_eq!(text.as_bytes(), &written[..]);
    }

    #[test]
    fn coverage_column_count_must_match() {
        let text = "nodeid nodelen start_chromo start_pos rrank a b\n";
        let err = read_coverage(text.as_bytes(), here(), &names(&["a", "b", "c"]))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ColumnMismatch { expected: 8, found: 7, .. }
        ));
    }

    #[test]
    fn coverage_bad_value() {
        let text = "nodeid nodelen start_chromo start_pos rrank a\n\
                    s1 10 chr1 0 0 high\n";
        let err = read_coverage(text.as_bytes(), here(), &names(&["a"])).unwrap_err();
        assert!(err.to_string().contains("coverage"));
    }

    #[test]
    fn presence_matrix() {
        let text = "nodeid\ta\tb\ns1\t1\t0\ns2\t1\t1\n";
        let matrix = read_presence_matrix(text.as_bytes(), here()).unwrap();
        assert_eq!(&names(&["a", "b"])[..], matrix.assemblies());
        assert_eq!(vec![true, true], matrix.get(b"s2").unwrap().present);

        let mut written = Vec::new();
        write_presence_matrix(&matrix, &mut written).unwrap();
        assert_eq!(text.as_bytes(), &written[..]);
    }

    #[test]
    fn presence_values_are_binary() {
        let text = "nodeid\ta\ns1\t2\n";
        assert!(read_presence_matrix(text.as_bytes(), here()).is_err());

        let dup = "nodeid\ta\ns1\t1\ns1\t0\n";
        assert!(matches!(
            read_presence_matrix(dup.as_bytes(), here()),
            Err(Error::DuplicateNode { .. })
        ));
    }

    #[test]
    fn missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.tsv");
        assert!(matches!(
            read_node_lengths_path(&path),
            Err(Error::MissingInput(_))
        ));
        assert!(matches!(
            read_presence_matrix_path(&path),
            Err(Error::MissingInput(_))
        ));
    }
}
