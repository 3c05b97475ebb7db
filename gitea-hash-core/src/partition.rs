/// Upper bound on the number of chunks, and so on download workers.
pub const MAX_CHUNKS: usize = 3;

/// Split `items` into at most [`MAX_CHUNKS`] non-empty chunks that concatenate back to `items`.
///
/// The first two chunks hold `round(n / 3)` items each and the last takes the
/// rest, so `[1..=5]` becomes `[[1, 2], [3, 4], [5]]` and `[1, 2, 3, 4]`
/// becomes `[[1], [2], [3, 4]]`. Empty chunks are dropped.
pub fn split_into_chunks<T>(items: Vec<T>) -> Vec<Vec<T>> {
    // n/3 never ends in .5, so nearest-integer rounding is (n + 1) / 3.
    let size = (items.len() + 1) / MAX_CHUNKS;
    let mut rest = items;
    let mut out = Vec::with_capacity(MAX_CHUNKS);
    for _ in 0..MAX_CHUNKS - 1 {
        let take = size.min(rest.len());
        let tail = rest.split_off(take);
        out.push(rest);
        rest = tail;
    }
    out.push(rest);
    out.retain(|c| !c.is_empty());
    out
}
