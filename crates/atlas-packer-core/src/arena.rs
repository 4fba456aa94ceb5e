use std::ops::Range;

const INITIAL_CAPACITY: usize = 64 * 1024;

/// Growable byte store holding the trimmed pixels of every stored source back to back.
#[derive(Debug, Default, Clone)]
pub(crate) struct PixelArena {
    bytes: Vec<u8>,
}

impl PixelArena {
    /// Appends `rows` and returns the byte range they occupy.
    pub fn push_rows<'a>(&mut self, len: usize, rows: impl Iterator<Item = &'a [u8]>) -> Range<usize> {
        self.reserve(len);
        let start = self.bytes.len();
        for row in rows {
            self.bytes.extend_from_slice(row);
        }
        start..self.bytes.len()
    }

    pub fn get(&self, range: Range<usize>) -> &[u8] {
        &self.bytes[range]
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Doubles capacity until `additional` more bytes fit.
    fn reserve(&mut self, additional: usize) {
        let needed = self.bytes.len() + additional;
        if needed <= self.bytes.capacity() {
            return;
        }
        let mut capacity = self.bytes.capacity().max(INITIAL_CAPACITY);
        while capacity < needed {
            capacity *= 2;
        }
        self.bytes.reserve_exact(capacity - self.bytes.len());
    }
}
