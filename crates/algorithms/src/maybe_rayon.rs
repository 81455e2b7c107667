//! Row-parallel execution.
//!
//! With the `parallel` feature rows are spread over rayon's pool; without it
//! (e.g. WASM builds) the same call runs as a plain loop. Results always come
//! back in row order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Evaluate `f` for every row index in `0..rows`, in row order.
#[cfg(feature = "parallel")]
pub fn map_rows<T, F>(rows: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..rows).into_par_iter().map(f).collect()
}

/// Evaluate `f` for every row index in `0..rows`, in row order.
#[cfg(not(feature = "parallel"))]
pub fn map_rows<T, F>(rows: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..rows).map(f).collect()
}
