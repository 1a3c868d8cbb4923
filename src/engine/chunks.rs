use std::ops::Range;

/// Split `total` items into consecutive index ranges of at most `chunk_size` items.
/// A `chunk_size` of 0 is treated as 1.
pub fn chunk_ranges(total: usize, chunk_size: usize) -> Vec<Range<usize>> {
    let chunk_size = chunk_size.max(1);
    let mut ranges = Vec::with_capacity(total.div_ceil(chunk_size));

    let mut start = 0;
    while start < total {
        let end = (start + chunk_size).min(total);
        ranges.push(start..end);
        start = end;
    }

    ranges
}
