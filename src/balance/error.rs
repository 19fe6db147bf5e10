use std::io;

use thiserror::Error;

/// Fatal pipeline errors. Per-line and per-genotype conditions are
/// recovered locally and never surface here.
#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("cannot read input: {0}")]
    Io(#[from] io::Error),

    /// Reported for a zero-length input file, distinct from a mapping
    /// failure and from a file that merely lacks a header line.
    #[error("input file is empty")]
    EmptyInput,

    #[error("no #CHROM header line found before data records")]
    MissingHeader,

    #[error("sample '{0}' not found in VCF header")]
    UnknownSample(String),
}
