/// Whether throats are eroded on the rayon pool (the `parallel` feature).
#[cfg(feature = "parallel")]
#[must_use]
pub fn is_parallel_available() -> bool {
    true
}

/// Whether throats are eroded on the rayon pool (the `parallel` feature).
#[cfg(not(feature = "parallel"))]
#[must_use]
pub fn is_parallel_available() -> bool {
    false
}

/// Applies `f` to every index in `0..count` on the rayon pool.
///
/// Results come back in index order.
#[cfg(feature = "parallel")]
pub fn map_indexed<U, F>(count: usize, f: F) -> Vec<U>
where
    U: Send,
    F: Fn(usize) -> U + Sync + Send,
{
    use rayon::prelude::*;
    (0..count).into_par_iter().map(f).collect()
}

/// Applies `f` to every index in `0..count`, one after another.
#[cfg(not(feature = "parallel"))]
pub fn map_indexed<U, F>(count: usize, f: F) -> Vec<U>
where
    F: Fn(usize) -> U,
{
    (0..count).map(f).collect()
}
