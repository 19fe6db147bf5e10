use memchr::memchr;

/// The genotype sub-field of one sample column: the span up to (not
/// including) the first ':', or the whole column if none is present.
#[inline]
pub fn genotype_subfield(cell: &[u8]) -> &[u8] {
    match memchr(b':', cell) {
        Some(p) => &cell[..p],
        None => cell,
    }
}

/// Allele balance of one genotype cell: reference allele count divided
/// by alternate allele count.
///
/// Scans left to right: '/' and '|' are allele separators, '.' is a
/// missing allele contributing to neither count, and a run of decimal
/// digits is one allele index. Index 0 increments the reference
/// counter, any nonzero value the alternate counter. Other bytes are
/// skipped.
///
/// Returns:
/// - `Some(0.0)` when there are reference alleles and no alternates
/// - `None` when the genotype is wholly missing (rendered as NA)
/// - `Some(ref/alt)` otherwise
///
/// Note this is ref/alt, not the ref/(ref+alt) fraction computed by the
/// allele-balance *filter*; the two must not be conflated.
pub fn allele_balance(gt: &[u8]) -> Option<f64> {
    let mut refs = 0u32;
    let mut alts = 0u32;

    let mut i = 0;
    while i < gt.len() {
        let b = gt[i];
        if b.is_ascii_digit() {
            let mut nonzero = false;
            while i < gt.len() && gt[i].is_ascii_digit() {
                nonzero |= gt[i] != b'0';
                i += 1;
            }
            if nonzero {
                alts += 1;
            } else {
                refs += 1;
            }
        } else {
            // separators ('/', '|'), missing markers ('.'), and any
            // stray bytes all advance without counting
            i += 1;
        }
    }

    if alts == 0 {
        if refs > 0 { Some(0.0) } else { None }
    } else {
        Some(refs as f64 / alts as f64)
    }
}
