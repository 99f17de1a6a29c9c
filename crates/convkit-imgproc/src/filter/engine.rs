use std::str::FromStr;

use convkit_image::Image;

use super::{
    convolve_accelerated, convolve_naive, convolve_padded, convolve_padded_accelerated,
    BoundaryPolicy, FilterError, Kernel,
};
use crate::parallel::ExecutionStrategy;

/// The interchangeable convolution engines.
///
/// All of them compute the same result for the same inputs; they differ only in speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Engine {
    /// [`convolve_naive`]: bounds checked read per kernel tap.
    Naive,
    /// [`convolve_padded`]: window reduction over a padded copy.
    Padded,
    /// [`convolve_accelerated`]: row parallel with an unchecked interior.
    #[default]
    Accelerated,
    /// [`convolve_padded_accelerated`]: row parallel padding and reduction.
    PaddedAccelerated,
}

impl Engine {
    /// Every engine, in the order the benchmark runs them.
    pub const ALL: [Engine; 4] = [
        Engine::Naive,
        Engine::Padded,
        Engine::Accelerated,
        Engine::PaddedAccelerated,
    ];

    /// The name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Engine::Naive => "naive",
            Engine::Padded => "padded",
            Engine::Accelerated => "accelerated",
            Engine::PaddedAccelerated => "padded-accelerated",
        }
    }

    /// Convolve `src` into `dst` with this engine.
    ///
    /// The accelerated engines use the default [`ExecutionStrategy`].
    pub fn convolve<const C: usize, B: BoundaryPolicy>(
        &self,
        src: &Image<f32, C>,
        dst: &mut Image<f32, C>,
        kernel: &Kernel,
        boundary: &B,
    ) -> Result<(), FilterError> {
        match self {
            Engine::Naive => convolve_naive(src, dst, kernel, boundary),
            Engine::Padded => convolve_padded(src, dst, kernel, boundary),
            Engine::Accelerated => {
                convolve_accelerated(src, dst, kernel, boundary, ExecutionStrategy::default())
            }
            Engine::PaddedAccelerated => convolve_padded_accelerated(
                src,
                dst,
                kernel,
                boundary,
                ExecutionStrategy::default(),
            ),
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Engine {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase().replace('_', "-");
        Engine::ALL
            .into_iter()
            .find(|engine| engine.name() == s)
            .ok_or_else(|| {
                FilterError::InvalidArgument(format!(
                    "unknown engine {s:?}, expected naive, padded, accelerated or padded-accelerated"
                ))
            })
    }
}

/// Convolve an image into a newly allocated output image.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel` - The convolution kernel.
/// * `boundary` - The policy for out-of-bounds reads.
/// * `engine` - The engine computing the result.
///
/// # Returns
///
/// The convolved image with the shape of `src`.
///
/// # Examples
///
/// ```
/// use convkit_image::Image;
/// use convkit_imgproc::filter::{convolve, BorderMode, Engine, Kernel};
///
/// let src = Image::<f32, 1>::from_size_val([5, 5].into(), 2.0).unwrap();
/// let dst = convolve(&src, &Kernel::zeros(3, 3).unwrap(), &BorderMode::Replicate, Engine::Naive)
///     .unwrap();
///
/// assert_eq!(dst.size(), src.size());
/// assert!(dst.as_slice().iter().all(|&v| v == 0.0));
/// ```
pub fn convolve<const C: usize, B: BoundaryPolicy>(
    src: &Image<f32, C>,
    kernel: &Kernel,
    boundary: &B,
    engine: Engine,
) -> Result<Image<f32, C>, FilterError> {
    let mut dst = Image::from_size_val(src.size(), 0.0)?;
    engine.convolve(src, &mut dst, kernel, boundary)?;
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::BorderMode;

    #[test]
    fn test_engine_names_round_trip() -> Result<(), FilterError> {
        for engine in Engine::ALL {
            assert_eq!(engine.name().parse::<Engine>()?, engine);
            assert_eq!(engine.to_string(), engine.name());
        }
        assert_eq!("Padded_Accelerated".parse::<Engine>()?, Engine::PaddedAccelerated);
        assert!(matches!(
            "numba".parse::<Engine>(),
            Err(FilterError::InvalidArgument(_))
        ));
        Ok(())
    }

    #[test]
    fn test_convolve_allocates_output() -> Result<(), FilterError> {
        let src = Image::<f32, 3>::from_size_val([4, 2].into(), 0.5)?;
        for engine in Engine::ALL {
            let dst = convolve(&src, &Kernel::identity(), &BorderMode::Wrap, engine)?;
            assert_eq!(dst, src, "{engine}");
        }
        Ok(())
    }
}
