use std::io::{self, Write};

use memchr::{memchr, memchr_iter};

use super::genotype::{allele_balance, genotype_subfield};
use super::header::{COMMENT, FIRST_SAMPLE, SampleTable};
use super::output::OutputBuffer;
use super::scan::{FieldCursor, TAB};

/// Minimum data-section size for partitioning (1MB). Per-chunk setup and
/// flush overhead dominates below this, so small inputs degrade to a
/// single chunk.
pub const PARTITION_THRESHOLD: usize = 1024 * 1024;

/// Compute line-aligned chunk boundaries over the data section
/// `[data_start, data.len())`.
///
/// Interior boundaries start at `data_start + k*(size/workers)` and are
/// advanced to the byte after the next newline, so every chunk begins
/// exactly at a line start. Boundaries that land at or past the end are
/// dropped. Consecutive pairs of the returned offsets define the chunks;
/// their union covers the data section exactly, with no line split
/// between chunks.
pub fn plan_chunks(data: &[u8], data_start: usize, workers: usize) -> Vec<(usize, usize)> {
    let size = data.len() - data_start;
    if workers <= 1 || size < PARTITION_THRESHOLD {
        if size == 0 {
            return Vec::new();
        }
        return vec![(data_start, data.len())];
    }

    let step = size / workers;
    let mut bounds = Vec::with_capacity(workers + 1);
    bounds.push(data_start);
    for k in 1..workers {
        let target = data_start + k * step;
        if target >= data.len() {
            break;
        }
        // advance to the start of the next line
        let boundary = match memchr(b'\n', &data[target..]) {
            Some(p) => target + p + 1,
            None => data.len(),
        };
        if boundary >= data.len() {
            break;
        }
        if boundary > *bounds.last().unwrap() {
            bounds.push(boundary);
        }
    }
    bounds.push(data.len());

    bounds.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Process one chunk: iterate its lines and emit rows for every selected
/// sample of every variant line, in input order. The `starts` scratch
/// vector is reused across lines to avoid per-line allocation.
pub fn process_chunk<W: Write>(
    chunk: &[u8],
    table: &SampleTable,
    starts: &mut Vec<usize>,
    out: &mut OutputBuffer<W>,
) -> io::Result<()> {
    let mut line_start = 0;
    for line_end in memchr_iter(b'\n', chunk) {
        process_line(&chunk[line_start..line_end], table, starts, out);
        out.maybe_flush()?;
        line_start = line_end + 1;
    }
    // final line without trailing newline
    if line_start < chunk.len() {
        process_line(&chunk[line_start..], table, starts, out);
        out.maybe_flush()?;
    }
    Ok(())
}

/// Process one variant line. Blank and comment lines yield nothing.
/// Short lines and out-of-range sample columns are recovered silently:
/// the affected samples produce no row and processing continues.
pub fn process_line<W: Write>(
    line: &[u8],
    table: &SampleTable,
    starts: &mut Vec<usize>,
    out: &mut OutputBuffer<W>,
) {
    if line.is_empty() || line[0] == COMMENT {
        return;
    }

    // Row prefix: CHROM, POS, ID, REF, ALT, extracted once per line.
    let mut cursor = FieldCursor::new(line);
    let Some(chrom) = cursor.next_field() else { return };
    let Some(pos) = cursor.next_field() else { return };
    let Some(id) = cursor.next_field() else { return };
    let Some(refa) = cursor.next_field() else { return };
    let Some(alt) = cursor.next_field() else { return };

    // QUAL, FILTER, INFO, FORMAT carry nothing we need.
    if !cursor.skip_fields(4) {
        return;
    }

    // Record the start offset of every sample column without splitting
    // the remainder into views.
    starts.clear();
    let mut p = cursor.pos();
    while p <= line.len() {
        starts.push(p);
        match memchr(TAB, &line[p..]) {
            Some(t) => p = p + t + 1,
            None => break,
        }
    }

    for &col in table.selected() {
        let i = col - FIRST_SAMPLE;
        if i >= starts.len() {
            continue;
        }
        let cell_end = match starts.get(i + 1) {
            Some(&next) => next - 1,
            None => line.len(),
        };
        let gt = genotype_subfield(&line[starts[i]..cell_end]);
        out.write_row(
            chrom,
            pos,
            id,
            refa,
            alt,
            table.name_for_column(col),
            allele_balance(gt),
        );
    }
}
