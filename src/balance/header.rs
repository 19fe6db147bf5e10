use super::error::BalanceError;
use super::scan::{self, NEWLINE};

pub const COMMENT: u8 = b'#';
pub const HEADER_PREFIX: &[u8] = b"#CHROM";

/// VCF column roles (0-based).
pub const CHROM: usize = 0;
pub const POS: usize = 1;
pub const ID: usize = 2;
pub const REF: usize = 3;
pub const ALT: usize = 4;
pub const FIRST_SAMPLE: usize = 9;

/// The ordered sample names from the #CHROM header line, plus the
/// derived list of selected column indices. Built once per input and
/// immutable afterwards; selection preserves the order requested by
/// the caller, not header order.
pub struct SampleTable {
    names: Vec<String>,
    selected: Vec<usize>,
}

impl SampleTable {
    /// Parse the #CHROM header line: field names at column 9 and beyond
    /// become the sample list. Initially all samples are selected, in
    /// header order.
    pub fn from_header_line(line: &[u8]) -> Self {
        let mut names = Vec::new();
        let mut cursor = scan::FieldCursor::new(line);
        let mut col = 0usize;
        while let Some(field) = cursor.next_field() {
            // every field at or past column 9 is a sample slot, even an
            // empty one; skipping would misalign name and column index
            if col >= FIRST_SAMPLE {
                names.push(String::from_utf8_lossy(field).into_owned());
            }
            col += 1;
        }
        let selected = (0..names.len()).map(|i| FIRST_SAMPLE + i).collect();
        SampleTable { names, selected }
    }

    /// Restrict the selection to the requested sample names, in request
    /// order. A name absent from the header is a fatal error.
    pub fn select(&mut self, requested: &[String]) -> Result<(), BalanceError> {
        if requested.is_empty() {
            return Ok(());
        }
        let mut selected = Vec::with_capacity(requested.len());
        for name in requested {
            match self.names.iter().position(|n| n == name) {
                Some(i) => selected.push(FIRST_SAMPLE + i),
                None => return Err(BalanceError::UnknownSample(name.clone())),
            }
        }
        self.selected = selected;
        Ok(())
    }

    /// Selected absolute column indices, in caller order.
    #[inline]
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    /// Sample name for an absolute column index.
    #[inline]
    pub fn name_for_column(&self, col: usize) -> &str {
        &self.names[col - FIRST_SAMPLE]
    }

    /// Number of samples in the header.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }
}

/// Scan the top of a mapped input for the #CHROM header line.
/// Returns the sample table and the byte offset of the data section
/// (the line after the header). Comment lines before the header are
/// skipped; a data line before it, or EOF without one, is fatal.
pub fn index_header(data: &[u8]) -> Result<(SampleTable, usize), BalanceError> {
    let mut pos = 0;
    while pos < data.len() {
        let line_end = scan::next_delim(data, pos, NEWLINE);
        let line = &data[pos..line_end];
        let next = if line_end < data.len() { line_end + 1 } else { data.len() };

        if line.is_empty() {
            pos = next;
            continue;
        }
        if line[0] == COMMENT {
            if line.starts_with(HEADER_PREFIX) {
                return Ok((SampleTable::from_header_line(line), next));
            }
            pos = next;
            continue;
        }
        // data record before any #CHROM line
        return Err(BalanceError::MissingHeader);
    }
    Err(BalanceError::MissingHeader)
}
