use rayon::prelude::*;
use thiserror::Error;

use convkit_image::Image;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride must be strictly positive.
    #[error("row stride must be > 0, got {0}")]
    InvalidRowStride(usize),
}

/// Controls how the accelerated engines spread rows over threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool and hand out one output row per task.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

/// Apply a function to each pixel in the image in parallel.
///
/// The closure receives the source pixel (`C1` samples) and the destination pixel (`C2` samples).
pub fn par_iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
{
    let cols = src.cols();
    if cols == 0 {
        return;
    }
    src.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(C1)
                .zip(dst_chunk.chunks_exact_mut(C2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each sample in the image in parallel.
pub fn par_iter_rows_val<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&T1, &mut T2) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
{
    let cols = src.cols();
    if cols == 0 {
        return;
    }
    src.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .iter()
                .zip(dst_chunk.iter_mut())
                .for_each(|(src_val, dst_val)| {
                    f(src_val, dst_val);
                });
        });
}

/// Run `op` over every row of `dst` with the given strategy.
///
/// # Arguments
///
/// * `dst` - The destination buffer, split into rows of `row_stride` elements.
/// * `row_stride` - The number of elements in one row (width * channels).
/// * `strategy` - The execution strategy.
/// * `op` - Called with the row index and the mutable row slice.
///
/// Rows are disjoint, so `op` only ever writes to its own row. The first error returned by
/// `op` aborts the remaining rows and is returned.
pub fn par_rows_mut<T, E, F>(
    dst: &mut [T],
    row_stride: usize,
    strategy: ExecutionStrategy,
    op: F,
) -> Result<(), E>
where
    T: Send,
    E: From<ParallelError> + Send,
    F: Fn(usize, &mut [T]) -> Result<(), E> + Sync + Send,
{
    if row_stride == 0 {
        return Err(ParallelError::InvalidRowStride(row_stride).into());
    }

    match strategy {
        ExecutionStrategy::Serial => dst
            .chunks_mut(row_stride)
            .enumerate()
            .try_for_each(|(row, dst_row)| op(row, dst_row)),
        ExecutionStrategy::ParallelRows => dst
            .par_chunks_mut(row_stride)
            .enumerate()
            .try_for_each(|(row, dst_row)| op(row, dst_row)),
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n).into());
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                dst.par_chunks_mut(row_stride)
                    .enumerate()
                    .try_for_each(|(row, dst_row)| op(row, dst_row))
            })
        }
    }
}
