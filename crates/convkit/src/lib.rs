//! Hand-written 2D convolution engines with pluggable boundary policies.
//!
//! ```
//! use convkit::image::Image;
//! use convkit::imgproc::filter::{convolve, kernels, BorderMode, Engine};
//!
//! let src = Image::<f32, 1>::from_size_val([8, 8].into(), 1.0).unwrap();
//! let dst = convolve(&src, &kernels::blur_nicely_3x3(), &BorderMode::Replicate, Engine::default())
//!     .unwrap();
//!
//! assert!((dst.as_slice()[0] - 0.9).abs() < 1e-6);
//! ```

#[doc(inline)]
pub use convkit_image as image;

#[doc(inline)]
pub use convkit_imgproc as imgproc;

#[doc(inline)]
pub use convkit_io as io;
