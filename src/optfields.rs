use bstr::ByteSlice;

use nom::{
    bytes::complete::{tag, take_while},
    IResult,
};

/// An optional field a la SAM, `<TAG>:<TYPE>:<VALUE>`, borrowed from
/// the line it was parsed from.
///
/// rGFA and minigraph store everything `rgaf` cares about in these
/// fields (stable sequence name, offset, rank and the `dc` coverage
/// tag), and only the value part is ever used. Unlike a strict SAM
/// tag parser, neither the tag nor the type are checked, and the value
/// is allowed to be empty; callers decide whether an empty value is an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptField<'a> {
    pub tag: &'a [u8],
    pub kind: &'a [u8],
    pub value: &'a [u8],
}

impl<'a> OptField<'a> {
    fn parser(i: &'a [u8]) -> IResult<&'a [u8], OptField<'a>> {
        let not_colon = |c: u8| c != b':';

        let (i, o_tag) = take_while(not_colon)(i)?;
        let (i, _) = tag(":")(i)?;
        let (i, o_kind) = take_while(not_colon)(i)?;
        let (value, _) = tag(":")(i)?;

        let field = OptField {
            tag: o_tag,
            kind: o_kind,
            value,
        };
        Ok((&value[value.len()..], field))
    }

    /// Parses an optional field from a bytestring in the format
    /// <TAG>:<TYPE>:<VALUE>. Everything after the second colon is the
    /// value, so values may contain colons themselves.
    pub fn parse(input: &'a [u8]) -> Option<Self> {
        Self::parser(input).ok().map(|(_, field)| field)
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// The value parsed as `T`, if it's valid UTF-8 and parses.
    pub fn parse_value<T: std::str::FromStr>(&self) -> Option<T> {
        self.value.to_str().ok().and_then(|s| s.parse().ok())
    }
}
