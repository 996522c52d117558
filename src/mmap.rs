use memmap::Mmap;

use std::fs::File;
use std::path::Path;

use bstr::ByteSlice;

/// A read-only memory mapped file, used for graphs, which are read
/// in full and can be large.
pub struct MmapFile {
    // mapping a zero-length file fails, so empty files have no map
    mmap: Option<Mmap>,
}

impl MmapFile {
    pub fn open<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();

        let mmap = if len == 0 {
            None
        } else {
            Some(unsafe { Mmap::map(&file)? })
        };

        Ok(Self { mmap })
    }

    pub fn get_ref(&self) -> &[u8] {
        self.mmap.as_ref().map_or(&[][..], |m| &m[..])
    }

    /// Iterate over the lines of the file, without their `\n` or
    /// `\r\n` terminators.
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.get_ref().lines()
    }
}
