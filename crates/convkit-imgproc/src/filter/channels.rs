use std::collections::BTreeMap;
use std::str::FromStr;

use convkit_image::Image;

use super::{ops::validate_images, BoundaryPolicy, Engine, FilterError, Kernel};

/// A color channel of an RGB image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    /// The first channel.
    R,
    /// The second channel.
    G,
    /// The third channel.
    B,
}

impl From<Channel> for usize {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::R => 0,
            Channel::G => 1,
            Channel::B => 2,
        }
    }
}

impl FromStr for Channel {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "r" | "red" => Ok(Channel::R),
            "g" | "green" => Ok(Channel::G),
            "b" | "blue" => Ok(Channel::B),
            _ => Err(FilterError::InvalidArgument(format!(
                "unknown channel {s:?}, expected R, G or B"
            ))),
        }
    }
}

/// Assignment of kernels to channel indices, at most one kernel per channel.
///
/// Channels without a kernel are passed through unchanged by [`convolve_channels`].
///
/// # Examples
///
/// ```
/// use convkit_imgproc::filter::{kernels, Channel, ChannelKernels};
///
/// let mapping = ChannelKernels::new()
///     .with(Channel::R, kernels::emboss_3x3())
///     .with(Channel::B, kernels::sharpen_3x3());
///
/// assert_eq!(mapping.len(), 2);
/// assert!(mapping.get(Channel::G).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelKernels {
    kernels: BTreeMap<usize, Kernel>,
}

impl ChannelKernels {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// The mapping with `kernel` assigned to `channel`, replacing any previous assignment.
    pub fn with(mut self, channel: impl Into<usize>, kernel: Kernel) -> Self {
        self.insert(channel, kernel);
        self
    }

    /// Assign `kernel` to `channel` and return the kernel it replaces, if any.
    pub fn insert(&mut self, channel: impl Into<usize>, kernel: Kernel) -> Option<Kernel> {
        self.kernels.insert(channel.into(), kernel)
    }

    /// The kernel assigned to `channel`.
    pub fn get(&self, channel: impl Into<usize>) -> Option<&Kernel> {
        self.kernels.get(&channel.into())
    }

    /// Number of channels with a kernel.
    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    /// Whether no channel has a kernel.
    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    /// The assignments in increasing channel order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Kernel)> {
        self.kernels.iter().map(|(ch, kernel)| (*ch, kernel))
    }

    /// Check the mapping against an image with `num_channels` channels.
    ///
    /// # Errors
    ///
    /// Fails with [`FilterError::InvalidArgument`] if the mapping is empty, names a channel
    /// the image does not have, or covers every channel.
    pub fn validate(&self, num_channels: usize) -> Result<(), FilterError> {
        if self.is_empty() {
            return Err(FilterError::InvalidArgument(
                "the channel mapping is empty".to_string(),
            ));
        }
        if let Some(ch) = self.kernels.keys().find(|&&ch| ch >= num_channels) {
            return Err(FilterError::InvalidArgument(format!(
                "channel {ch} does not exist in an image with {num_channels} channels"
            )));
        }
        if self.len() >= num_channels {
            return Err(FilterError::InvalidArgument(format!(
                "the channel mapping covers all {num_channels} channels, \
                 at least one channel must pass through"
            )));
        }
        Ok(())
    }
}

impl<K: Into<usize>> FromIterator<(K, Kernel)> for ChannelKernels {
    fn from_iter<I: IntoIterator<Item = (K, Kernel)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (channel, kernel) in iter {
            mapping.insert(channel, kernel);
        }
        mapping
    }
}

/// Convolve selected channels of an image, each with its own kernel.
///
/// Every channel with a kernel in `kernels` is convolved on its own with that kernel; every
/// other channel is copied from `src` unchanged.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernels` - The per channel kernels.
/// * `boundary` - The policy for out-of-bounds reads.
/// * `engine` - The engine convolving each selected channel.
///
/// # Errors
///
/// Fails with [`FilterError::InvalidArgument`] if `kernels` is not valid for `C` channels,
/// see [`ChannelKernels::validate`], and if the images are empty or differ in size.
///
/// # Examples
///
/// ```
/// use convkit_image::Image;
/// use convkit_imgproc::filter::{convolve_channels, BorderMode, Channel, ChannelKernels, Engine, Kernel};
///
/// let src = Image::<f32, 3>::from_size_val([2, 2].into(), 0.5).unwrap();
/// let mut dst = Image::<f32, 3>::from_size_val(src.size(), 0.0).unwrap();
/// let mapping = ChannelKernels::new().with(Channel::G, Kernel::from_val(1, 1, 2.0).unwrap());
///
/// convolve_channels(&src, &mut dst, &mapping, &BorderMode::Zero, Engine::Naive).unwrap();
///
/// assert_eq!(dst.get_pixel(0, 0).unwrap(), [0.5, 1.0, 0.5]);
/// ```
pub fn convolve_channels<const C: usize, B: BoundaryPolicy>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    kernels: &ChannelKernels,
    boundary: &B,
    engine: Engine,
) -> Result<(), FilterError> {
    kernels.validate(C)?;
    validate_images(src, dst)?;

    dst.as_slice_mut().copy_from_slice(src.as_slice());

    let mut plane_dst = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    for (ch, kernel) in kernels.iter() {
        log::debug!("convolving channel {ch} with a {}x{} kernel", kernel.rows(), kernel.cols());
        let plane = src.channel(ch)?;
        engine.convolve(&plane, &mut plane_dst, kernel, boundary)?;

        dst.as_slice_mut()
            .chunks_exact_mut(C)
            .zip(plane_dst.as_slice())
            .for_each(|(px, &v)| px[ch] = v);
    }

    Ok(())
}
