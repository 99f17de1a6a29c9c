use super::{FilterError, Kernel};

/// Create a 5x5 kernel with a single one on the right of the middle row.
///
/// Each output pixel picks the input two columns to its right, so the image moves left.
pub fn shift_left_5x5() -> Kernel {
    let mut data = vec![0.0; 25];
    data[2 * 5 + 4] = 1.0;
    Kernel::from_parts(5, 5, data)
}

/// Create a 3x3 kernel that doubles the center pixel.
pub fn brighten_3x3() -> Kernel {
    centered_3x3(0.0, 2.0)
}

/// Create a 3x3 sharpen kernel: -0.11 around a center of 1.88.
pub fn sharpen_3x3() -> Kernel {
    centered_3x3(-0.11, 1.88)
}

/// Create a 3x3 kernel with all weights set to 0.1.
///
/// The weights add up to 0.9, so the result is both blurred and slightly darker.
pub fn blur_nicely_3x3() -> Kernel {
    centered_3x3(0.1, 0.1)
}

/// Create a 3x3 emboss kernel: 0.5 around a center of -3.
pub fn emboss_3x3() -> Kernel {
    centered_3x3(0.5, -3.0)
}

/// Create a 3x3 vertical edge kernel with columns 1, 0, -1.
pub fn vertical_edges_3x3() -> Kernel {
    Kernel::from_parts(3, 3, [1.0, 0.0, -1.0].repeat(3))
}

/// Create the 1x3 horizontal derivative kernel `[1, 0, -1]`.
pub fn horizontal_derivative() -> Kernel {
    Kernel::from_parts(1, 3, vec![1.0, 0.0, -1.0])
}

/// Create a `size`x`size` kernel with a single one in the top-left corner.
///
/// With an odd `size` this pulls every pixel from `size / 2` rows and columns up-left, which
/// makes the boundary policy visible along the top and left edges.
///
/// # Errors
///
/// Fails if `size` is zero.
pub fn shift_corner(size: usize) -> Result<Kernel, FilterError> {
    let mut data = vec![0.0; size * size];
    if let Some(first) = data.first_mut() {
        *first = 1.0;
    }
    Kernel::new(size, size, data)
}

/// Names accepted by [`from_name`].
pub const KERNEL_NAMES: &[&str] = &[
    "identity",
    "shift-left",
    "brighten",
    "sharpen",
    "blur-nicely",
    "emboss",
    "vertical-edges",
    "horizontal-derivative",
    "box3",
    "shift-corner",
];

/// Look up a named kernel.
///
/// # Examples
///
/// ```
/// use convkit_imgproc::filter::kernels;
///
/// let kernel = kernels::from_name("emboss").unwrap();
/// assert_eq!(kernel.at(1, 1), -3.0);
/// assert!(kernels::from_name("unknown").is_err());
/// ```
pub fn from_name(name: &str) -> Result<Kernel, FilterError> {
    let kernel = match name.to_lowercase().as_str() {
        "identity" => Kernel::identity(),
        "shift-left" => shift_left_5x5(),
        "brighten" => brighten_3x3(),
        "sharpen" => sharpen_3x3(),
        "blur-nicely" => blur_nicely_3x3(),
        "emboss" => emboss_3x3(),
        "vertical-edges" => vertical_edges_3x3(),
        "horizontal-derivative" => horizontal_derivative(),
        "box3" => Kernel::box_kernel(3, 3)?,
        "shift-corner" => shift_corner(81)?,
        _ => {
            return Err(FilterError::InvalidArgument(format!(
                "unknown kernel {name:?}, expected one of {KERNEL_NAMES:?}"
            )))
        }
    };
    Ok(kernel)
}

fn centered_3x3(ring: f32, center: f32) -> Kernel {
    let mut data = vec![ring; 9];
    data[4] = center;
    Kernel::from_parts(3, 3, data)
}
