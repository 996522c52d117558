//! Typed access to the whitespace- or tab-delimited records `rgaf`
//! reads.
//!
//! Each record type is described by a [`Schema`], a list of named
//! [`Field`]s at fixed positions counted from the start or the end of
//! the line. A line is bound to its schema up front, which checks that
//! it's long enough for every field, and fields are then looked up by
//! name rather than by raw index arithmetic.

pub mod error;

pub use self::error::*;

use bstr::{BString, ByteSlice};

use lazy_static::lazy_static;
use regex::bytes::Regex;

use crate::gfa::Orientation;
use crate::optfields::OptField;

/// Position of a field within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldIndex {
    /// 0-based index from the start of the line.
    Front(usize),
    /// 1-based index from the end of the line, i.e. `Back(1)` is the
    /// last field.
    Back(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub index: FieldIndex,
}

impl Field {
    pub const fn front(name: &'static str, index: usize) -> Self {
        Field {
            name,
            index: FieldIndex::Front(index),
        }
    }

    pub const fn back(name: &'static str, index: usize) -> Self {
        Field {
            name,
            index: FieldIndex::Back(index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    /// Any run of whitespace
    Whitespace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub delimiter: Delimiter,
    pub fields: &'static [Field],
}

impl Schema {
    /// The smallest number of fields a line needs so that every field
    /// of the schema exists, and no field counted from the end
    /// overlaps a field counted from the start.
    pub fn min_fields(&self) -> usize {
        let front = self
            .fields
            .iter()
            .filter_map(|f| match f.index {
                FieldIndex::Front(i) => Some(i + 1),
                FieldIndex::Back(_) => None,
            })
            .max()
            .unwrap_or(0);
        let back = self
            .fields
            .iter()
            .filter_map(|f| match f.index {
                FieldIndex::Back(i) => Some(i),
                FieldIndex::Front(_) => None,
            })
            .max()
            .unwrap_or(0);
        front + back
    }

    /// Split a line and check it against the schema.
    pub fn bind<'a>(&self, line: &'a [u8]) -> FieldResult<Record<'a>> {
        let line = line.trim_end_with(|c| c == '\n' || c == '\r');
        let fields: Vec<&'a [u8]> = match self.delimiter {
            Delimiter::Tab => line.split_str("\t").collect(),
            Delimiter::Whitespace => line.fields().collect(),
        };

        let expected = self.min_fields();
        if fields.len() < expected {
            return Err(ParseFieldError::MissingFields {
                expected,
                found: fields.len(),
            });
        }

        Ok(Record { fields })
    }
}

/// The kinds of line `rgaf` consumes; everything else is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Segment,
    Link,
}

impl LineKind {
    /// Classify a line by its first field, which must be exactly `S`
    /// or `L`.
    pub fn of(line: &[u8]) -> Option<Self> {
        match line.fields().next()? {
            b"S" => Some(LineKind::Segment),
            b"L" => Some(LineKind::Link),
            _ => None,
        }
    }
}

/// A line that has been checked against a [`Schema`].
#[derive(Debug, Clone)]
pub struct Record<'a> {
    fields: Vec<&'a [u8]>,
}

impl<'a> Record<'a> {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Require exactly `expected` fields, for tables where the header
    /// fixes the row width.
    pub fn expect_len(&self, expected: usize) -> FieldResult<()> {
        let found = self.fields.len();
        if found < expected {
            Err(ParseFieldError::MissingFields { expected, found })
        } else if found > expected {
            Err(ParseFieldError::ExtraFields { expected, found })
        } else {
            Ok(())
        }
    }

    /// The fields from index `start` on.
    pub fn tail(&self, start: usize) -> &[&'a [u8]] {
        self.fields.get(start..).unwrap_or(&[])
    }

    pub fn get(&self, field: &Field) -> FieldResult<&'a [u8]> {
        let len = self.fields.len();
        let ix = match field.index {
            FieldIndex::Front(i) => Some(i),
            FieldIndex::Back(i) => len.checked_sub(i),
        };
        ix.and_then(|i| self.fields.get(i))
            .copied()
            .ok_or(ParseFieldError::InvalidField(field.name))
    }

    /// A segment name, validated against the GFA name grammar.
    pub fn name(&self, field: &Field) -> FieldResult<BString> {
        lazy_static! {
            static ref RE: Regex =
                Regex::new(r"(?-u)^[!-)+-<>-~][!-~]*$").unwrap();
        }
        let bytes = self.get(field)?;
        if RE.is_match(bytes) {
            Ok(BString::from(bytes))
        } else {
            Err(ParseFieldError::InvalidField(field.name))
        }
    }

    /// Length of a field's contents, used for sequence payloads.
    pub fn len_of(&self, field: &Field) -> FieldResult<usize> {
        self.get(field).map(|bs| bs.len())
    }

    pub fn parse<T: std::str::FromStr>(&self, field: &Field) -> FieldResult<T> {
        let bytes = self.get(field)?;
        bytes
            .to_str()?
            .parse()
            .map_err(|_| ParseFieldError::InvalidField(field.name))
    }

    pub fn tag(&self, field: &Field) -> FieldResult<OptField<'a>> {
        let bytes = self.get(field)?;
        OptField::parse(bytes).ok_or(ParseFieldError::InvalidTag(field.name))
    }

    /// The value of a `TAG:TYPE:VALUE` field, parsed as `T`.
    pub fn tag_value<T: std::str::FromStr>(
        &self,
        field: &Field,
    ) -> FieldResult<T> {
        self.tag(field)?
            .parse_value()
            .ok_or(ParseFieldError::InvalidField(field.name))
    }

    pub fn orientation(&self, field: &Field) -> FieldResult<Orientation> {
        let bytes = self.get(field)?;
        Orientation::from_bytes_plus_minus(bytes)
            .ok_or(ParseFieldError::OrientationError)
    }
}
