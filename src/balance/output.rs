use std::io::{self, Write};

/// Fixed output column header, written once before any data row.
pub const OUTPUT_HEADER: &[u8] = b"CHROM\tPOS\tID\tREF\tALT\tSample\tAllele_Balance\n";

/// Rendering of an undefined (wholly missing) ratio.
pub const NA: &[u8] = b"NA";

/// Output buffer capacity. Pending bytes never exceed this between
/// flushes; payloads larger than half of it bypass the buffer.
pub const BUFFER_CAPACITY: usize = 4 * 1024 * 1024;

/// maybe_flush() drains the buffer once it reaches this size, bounding
/// peak memory to roughly the threshold rather than the full capacity.
pub const FLUSH_THRESHOLD: usize = 1024 * 1024;

/// Append-only byte buffer bound to one output sink, with
/// threshold-triggered flush and a bypass path for oversized writes.
/// Flushing issues one write call per flush. Not internally
/// thread-safe: one buffer per producing execution context.
pub struct OutputBuffer<W: Write> {
    buf: Vec<u8>,
    writer: W,
}

impl<W: Write> OutputBuffer<W> {
    pub fn new(writer: W) -> Self {
        OutputBuffer {
            buf: Vec::with_capacity(BUFFER_CAPACITY),
            writer,
        }
    }

    /// Bytes currently pending.
    #[inline]
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Append a payload. Oversized payloads (more than half the buffer
    /// capacity) flush pending bytes and then go to the writer in a
    /// single call, skipping the copy into the buffer.
    pub fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        if bytes.len() > BUFFER_CAPACITY / 2 {
            self.flush()?;
            return self.writer.write_all(bytes);
        }
        if self.buf.len() + bytes.len() > BUFFER_CAPACITY {
            self.flush()?;
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Flush if the pending length has reached the threshold. Called
    /// after each processed line so peak memory tracks the threshold.
    #[inline]
    pub fn maybe_flush(&mut self) -> io::Result<()> {
        if self.buf.len() >= FLUSH_THRESHOLD {
            self.flush()?;
        }
        Ok(())
    }

    /// Drain pending bytes with one write call.
    pub fn flush(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            self.writer.write_all(&self.buf)?;
            self.buf.clear();
        }
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.flush()?;
        Ok(self.writer)
    }

    /// Serialize one output row: the five identifying fields, the sample
    /// name, and the ratio (six fractional digits) or NA. Rows are small
    /// relative to the capacity; the per-line maybe_flush() keeps the
    /// buffer from growing past the threshold by more than one line.
    pub fn write_row(
        &mut self,
        chrom: &[u8],
        pos: &[u8],
        id: &[u8],
        refa: &[u8],
        alt: &[u8],
        sample: &str,
        ratio: Option<f64>,
    ) {
        self.buf.extend_from_slice(chrom);
        self.buf.push(b'\t');
        self.buf.extend_from_slice(pos);
        self.buf.push(b'\t');
        self.buf.extend_from_slice(id);
        self.buf.push(b'\t');
        self.buf.extend_from_slice(refa);
        self.buf.push(b'\t');
        self.buf.extend_from_slice(alt);
        self.buf.push(b'\t');
        self.buf.extend_from_slice(sample.as_bytes());
        self.buf.push(b'\t');
        match ratio {
            Some(v) => format_ratio(v, &mut self.buf),
            None => self.buf.extend_from_slice(NA),
        }
        self.buf.push(b'\n');
    }
}

/// Render a non-negative ratio with exactly six digits after the decimal
/// point, e.g. 1.0 -> "1.000000". Scaled-integer rendering: itoa for the
/// integer part, manual zero-padded digits for the fraction. No
/// general-purpose float formatting in the hot path.
pub fn format_ratio(value: f64, buf: &mut Vec<u8>) {
    let scaled = (value * 1_000_000.0 + 0.5) as u64;
    let int = scaled / 1_000_000;
    let mut frac = scaled % 1_000_000;

    let mut itoa_buf = itoa::Buffer::new();
    buf.extend_from_slice(itoa_buf.format(int).as_bytes());
    buf.push(b'.');

    let mut digits = [b'0'; 6];
    for d in digits.iter_mut().rev() {
        *d = b'0' + (frac % 10) as u8;
        frac /= 10;
    }
    buf.extend_from_slice(&digits);
}
