use memchr::memchr;

pub const TAB: u8 = b'\t';
pub const NEWLINE: u8 = b'\n';

/// Find the next occurrence of `delim` in `data` at or after `from`.
/// Returns `data.len()` if absent.
///
/// memchr compiles to a vectorized scan (AVX2/NEON, 16/32-byte blocks
/// with an equality bitmask) with a scalar tail, selected at runtime.
/// The scalar and vector paths return identical positions; tests.rs
/// asserts this against a byte-at-a-time reference.
#[inline]
pub fn next_delim(data: &[u8], from: usize, delim: u8) -> usize {
    match memchr(delim, &data[from..]) {
        Some(p) => from + p,
        None => data.len(),
    }
}

/// Zero-copy cursor over the tab-delimited fields of one line.
/// Fields are non-owning views into the line slice; nothing is copied
/// or allocated regardless of field length.
pub struct FieldCursor<'a> {
    line: &'a [u8],
    pos: usize,
}

impl<'a> FieldCursor<'a> {
    #[inline]
    pub fn new(line: &'a [u8]) -> Self {
        FieldCursor { line, pos: 0 }
    }

    /// Byte offset of the next unread field within the line.
    /// Past `line.len()` once the final field has been consumed.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Extract the next field: the view from the cursor to the next tab
    /// (or line end), advancing past the consumed tab. Returns None once
    /// the line is exhausted.
    #[inline]
    pub fn next_field(&mut self) -> Option<&'a [u8]> {
        if self.pos > self.line.len() {
            return None;
        }
        let end = next_delim(self.line, self.pos, TAB);
        let field = &self.line[self.pos..end];
        // Advancing one past a line-end "tab" marks exhaustion.
        self.pos = end + 1;
        Some(field)
    }

    /// Advance past `n` fields without materializing views.
    /// Returns false if the line ends before `n` tabs are consumed.
    #[inline]
    pub fn skip_fields(&mut self, n: usize) -> bool {
        for _ in 0..n {
            if self.pos >= self.line.len() {
                self.pos = self.line.len() + 1;
                return false;
            }
            let end = next_delim(self.line, self.pos, TAB);
            if end == self.line.len() {
                self.pos = end + 1;
                return false;
            }
            self.pos = end + 1;
        }
        self.pos <= self.line.len()
    }
}
