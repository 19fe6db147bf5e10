use std::io::{self, BufRead, Write};

use rayon::prelude::*;

use super::chunk::{plan_chunks, process_chunk, process_line};
use super::error::BalanceError;
use super::header::{COMMENT, HEADER_PREFIX, SampleTable, index_header};
use super::output::{OUTPUT_HEADER, OutputBuffer};

/// Pipeline configuration, as resolved from the command line.
#[derive(Default)]
pub struct BalanceConfig {
    /// Samples to report, in request order. Empty selects all samples
    /// in header order.
    pub samples: Vec<String>,
    /// Chunk-count hint; None auto-detects from hardware concurrency.
    pub workers: Option<usize>,
    /// Process partitioned chunks on rayon workers instead of
    /// sequentially. Output is byte-identical either way.
    pub parallel: bool,
}

/// Resolve the chunk-count target: explicit hint, else hardware
/// concurrency with a floor of one.
pub fn resolve_workers(cfg: &BalanceConfig) -> usize {
    cfg.workers.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    })
}

/// Mapped-input driver: single-pass when the planner yields one chunk,
/// partitioned otherwise. The header row is written only after the VCF
/// header has been parsed and the sample selection resolved, so fatal
/// schema errors produce no output at all.
pub fn process_data<W: Write>(
    data: &[u8],
    cfg: &BalanceConfig,
    writer: W,
) -> Result<(), BalanceError> {
    if data.is_empty() {
        return Err(BalanceError::EmptyInput);
    }

    let (mut table, data_start) = index_header(data)?;
    table.select(&cfg.samples)?;

    let chunks = plan_chunks(data, data_start, resolve_workers(cfg));

    let mut out = OutputBuffer::new(writer);
    out.write(OUTPUT_HEADER)?;

    if cfg.parallel && chunks.len() > 1 {
        // Each worker owns a private buffer; results are written back in
        // chunk index order, preserving the input (line, sample) order.
        let results: Vec<io::Result<Vec<u8>>> = chunks
            .par_iter()
            .map(|&(start, end)| {
                let mut buf = OutputBuffer::new(Vec::new());
                let mut starts = Vec::with_capacity(64);
                process_chunk(&data[start..end], &table, &mut starts, &mut buf)?;
                buf.into_inner()
            })
            .collect();
        for result in results {
            out.write(&result?)?;
        }
    } else {
        let mut starts = Vec::with_capacity(64);
        for &(start, end) in &chunks {
            process_chunk(&data[start..end], &table, &mut starts, &mut out)?;
            out.flush()?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Streamed driver for non-seekable input: recognizes the header line
/// inline, then processes each subsequent line exactly as the chunk
/// processor does, flushing periodically. No partitioning.
pub fn process_reader<R: BufRead, W: Write>(
    mut reader: R,
    cfg: &BalanceConfig,
    writer: W,
) -> Result<(), BalanceError> {
    let mut out = OutputBuffer::new(writer);
    let mut table: Option<SampleTable> = None;
    let mut starts = Vec::with_capacity(64);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            break;
        }
        let line = if buf.last() == Some(&b'\n') {
            &buf[..buf.len() - 1]
        } else {
            &buf[..]
        };

        match table {
            Some(ref t) => {
                process_line(line, t, &mut starts, &mut out);
                out.maybe_flush()?;
            }
            None => {
                if line.is_empty() {
                    continue;
                }
                if line[0] == COMMENT {
                    if line.starts_with(HEADER_PREFIX) {
                        let mut t = SampleTable::from_header_line(line);
                        t.select(&cfg.samples)?;
                        out.write(OUTPUT_HEADER)?;
                        table = Some(t);
                    }
                    continue;
                }
                return Err(BalanceError::MissingHeader);
            }
        }
    }

    if table.is_none() {
        return Err(BalanceError::MissingHeader);
    }
    out.flush()?;
    Ok(())
}
