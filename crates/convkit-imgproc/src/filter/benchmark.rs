//! Single run timing of every convolution engine on the same input.

use std::time::{Duration, Instant};

use convkit_image::{Image, ImageSize};

use super::{BoundaryPolicy, Engine, FilterError, Kernel};

/// Wall clock duration of one engine run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineTiming {
    /// The engine that ran.
    pub engine: Engine,
    /// How long the run took.
    pub elapsed: Duration,
}

/// The timings of one [`benchmark_engines`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkReport {
    /// Size of the benchmarked image.
    pub image_size: ImageSize,
    /// Number of channels of the benchmarked image.
    pub num_channels: usize,
    /// Kernel dimensions as `(rows, cols)`.
    pub kernel_size: (usize, usize),
    /// One entry per engine, in [`Engine::ALL`] order.
    pub timings: Vec<EngineTiming>,
}

impl BenchmarkReport {
    /// The timing of `engine`, if it ran.
    pub fn elapsed(&self, engine: Engine) -> Option<Duration> {
        self.timings
            .iter()
            .find(|t| t.engine == engine)
            .map(|t| t.elapsed)
    }

    /// The engine with the shortest run.
    pub fn fastest(&self) -> Option<&EngineTiming> {
        self.timings.iter().min_by_key(|t| t.elapsed)
    }
}

impl std::fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "{}x{}x{} image, {}x{} kernel",
            self.image_size.width,
            self.image_size.height,
            self.num_channels,
            self.kernel_size.0,
            self.kernel_size.1
        )?;
        for timing in &self.timings {
            let elapsed = format!("{:.3?}", timing.elapsed);
            writeln!(f, "  {:<20} {elapsed:>12}", timing.engine.name())?;
        }
        Ok(())
    }
}

/// Run every [`Engine`] once on `src` and measure how long each run takes.
///
/// Each engine writes into its own freshly allocated output, so the allocation is not part of
/// the measured time.
///
/// # Errors
///
/// Fails with the first error an engine returns.
pub fn benchmark_engines<const C: usize, B: BoundaryPolicy>(
    src: &Image<f32, C>,
    kernel: &Kernel,
    boundary: &B,
) -> Result<BenchmarkReport, FilterError> {
    let mut timings = Vec::with_capacity(Engine::ALL.len());

    for engine in Engine::ALL {
        let mut dst = Image::from_size_val(src.size(), 0.0)?;

        let start = Instant::now();
        engine.convolve(src, &mut dst, kernel, boundary)?;
        let elapsed = start.elapsed();

        log::info!("{} took {:?}", engine.name(), elapsed);
        timings.push(EngineTiming { engine, elapsed });
    }

    Ok(BenchmarkReport {
        image_size: src.size(),
        num_channels: C,
        kernel_size: (kernel.rows(), kernel.cols()),
        timings,
    })
}
