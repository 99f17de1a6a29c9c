use convkit_image::Image;
use convkit_imgproc::filter::{
    convolve, convolve_accelerated, convolve_channels, convolve_naive, convolve_padded,
    convolve_padded_accelerated, kernels, BorderMode, BoundaryPolicy, Channel, ChannelKernels,
    Engine, FilterError, Kernel,
};
use convkit_imgproc::parallel::ExecutionStrategy;
use rand::{rngs::StdRng, Rng, SeedableRng};

const BORDERS: [BorderMode; 6] = [
    BorderMode::Zero,
    BorderMode::Constant(0.25),
    BorderMode::Replicate,
    BorderMode::Reflect,
    BorderMode::Reflect101,
    BorderMode::Wrap,
];

fn random_image<const C: usize>(
    rng: &mut StdRng,
    width: usize,
    height: usize,
) -> Result<Image<f32, C>, FilterError> {
    let data = (0..width * height * C).map(|_| rng.random::<f32>()).collect();
    Ok(Image::new([width, height].into(), data)?)
}

fn random_kernel(rng: &mut StdRng, rows: usize, cols: usize) -> Result<Kernel, FilterError> {
    let data = (0..rows * cols)
        .map(|_| rng.random_range(-1.0f32..1.0))
        .collect();
    Kernel::new(rows, cols, data)
}

#[test]
fn identity_kernel_returns_input() -> Result<(), FilterError> {
    let mut rng = StdRng::seed_from_u64(0);
    let gray = random_image::<1>(&mut rng, 7, 5)?;
    let rgb = random_image::<3>(&mut rng, 4, 6)?;

    for engine in Engine::ALL {
        for boundary in BORDERS {
            assert_eq!(convolve(&gray, &Kernel::identity(), &boundary, engine)?, gray);
            assert_eq!(convolve(&rgb, &Kernel::identity(), &boundary, engine)?, rgb);
        }
    }
    Ok(())
}

#[test]
fn zero_kernel_returns_zeros() -> Result<(), FilterError> {
    let mut rng = StdRng::seed_from_u64(1);
    let src = random_image::<3>(&mut rng, 6, 4)?;

    for (rows, cols) in [(1, 1), (2, 5), (3, 3), (9, 9)] {
        let kernel = Kernel::zeros(rows, cols)?;
        for engine in Engine::ALL {
            let dst = convolve(&src, &kernel, &BorderMode::Replicate, engine)?;
            assert_eq!(dst.size(), src.size());
            assert!(dst.as_slice().iter().all(|&v| v == 0.0), "{engine} {rows}x{cols}");
        }
    }
    Ok(())
}

#[test]
fn convolution_is_linear() -> Result<(), FilterError> {
    let mut rng = StdRng::seed_from_u64(2);
    let img1 = random_image::<1>(&mut rng, 9, 8)?;
    let img2 = random_image::<1>(&mut rng, 9, 8)?;
    let kernel = random_kernel(&mut rng, 3, 4)?;
    let (a, b) = (0.75f32, -2.0f32);

    let mix = |x: &Image<f32, 1>, y: &Image<f32, 1>| -> Result<Image<f32, 1>, FilterError> {
        let data = x
            .as_slice()
            .iter()
            .zip(y.as_slice())
            .map(|(u, v)| a * u + b * v)
            .collect();
        Ok(Image::new(x.size(), data)?)
    };

    // constant fills are affine, not linear, so they are left out
    for boundary in [BorderMode::Zero, BorderMode::Replicate, BorderMode::Wrap] {
        let lhs = convolve(&mix(&img1, &img2)?, &kernel, &boundary, Engine::Naive)?;
        let rhs = mix(
            &convolve(&img1, &kernel, &boundary, Engine::Naive)?,
            &convolve(&img2, &kernel, &boundary, Engine::Naive)?,
        )?;
        for (&l, &r) in lhs.as_slice().iter().zip(rhs.as_slice()) {
            approx::assert_abs_diff_eq!(l, r, epsilon = 1e-4);
        }
    }
    Ok(())
}

#[test]
fn naive_and_padded_agree_with_zero_fill() -> Result<(), FilterError> {
    let mut rng = StdRng::seed_from_u64(3);
    let cases = [
        // 5x5 constant image, 3x3 mean
        (
            Image::<f32, 1>::from_size_val([5, 5].into(), 0.8)?,
            Kernel::box_kernel(3, 3)?,
        ),
        // single row, 1x3 kernel
        (
            random_image::<1>(&mut rng, 9, 1)?,
            kernels::horizontal_derivative(),
        ),
        // kernel larger than the image
        (
            random_image::<1>(&mut rng, 3, 2)?,
            random_kernel(&mut rng, 5, 6)?,
        ),
    ];

    for (src, kernel) in cases {
        let mut naive = Image::from_size_val(src.size(), 0.0)?;
        let mut padded = Image::from_size_val(src.size(), 0.0)?;
        convolve_naive(&src, &mut naive, &kernel, &BorderMode::Zero)?;
        convolve_padded(&src, &mut padded, &kernel, &BorderMode::Zero)?;
        assert_eq!(naive, padded);
    }
    Ok(())
}

// The padded engine fills its padding through the caller's boundary policy, one policy call per
// border cell, so it honors every policy and matches the naive engine exactly. It does not
// hard-code zero padding.
#[test]
fn padded_honors_every_boundary_policy() -> Result<(), FilterError> {
    let mut rng = StdRng::seed_from_u64(4);
    let src = random_image::<3>(&mut rng, 6, 5)?;
    let kernel = random_kernel(&mut rng, 4, 3)?;

    for boundary in BORDERS {
        let mut naive = Image::from_size_val(src.size(), 0.0)?;
        let mut padded = Image::from_size_val(src.size(), 0.0)?;
        convolve_naive(&src, &mut naive, &kernel, &boundary)?;
        convolve_padded(&src, &mut padded, &kernel, &boundary)?;
        assert_eq!(naive, padded, "{boundary:?}");
    }

    // non-zero policies do change the border, so the agreement above is not vacuous
    let zero = convolve(&src, &kernel, &BorderMode::Zero, Engine::Padded)?;
    let replicate = convolve(&src, &kernel, &BorderMode::Replicate, Engine::Padded)?;
    assert_ne!(zero, replicate);
    Ok(())
}

fn assert_engines_match<const C: usize>(
    src: &Image<f32, C>,
    kernel: &Kernel,
    boundary: &BorderMode,
) -> Result<(), FilterError> {
    let mut naive = Image::from_size_val(src.size(), 0.0)?;
    let mut padded = Image::from_size_val(src.size(), 0.0)?;
    let mut accelerated = Image::from_size_val(src.size(), 0.0)?;
    let mut padded_accelerated = Image::from_size_val(src.size(), 0.0)?;

    convolve_naive(src, &mut naive, kernel, boundary)?;
    convolve_padded(src, &mut padded, kernel, boundary)?;
    convolve_accelerated(
        src,
        &mut accelerated,
        kernel,
        boundary,
        ExecutionStrategy::ParallelRows,
    )?;
    convolve_padded_accelerated(
        src,
        &mut padded_accelerated,
        kernel,
        boundary,
        ExecutionStrategy::Fixed(2),
    )?;

    let case = format!(
        "{}x{}x{} image, {}x{} kernel, {boundary:?}",
        src.cols(),
        src.rows(),
        C,
        kernel.rows(),
        kernel.cols()
    );
    assert_eq!(accelerated, naive, "{case}");
    assert_eq!(padded, naive, "{case}");
    assert_eq!(padded_accelerated, padded, "{case}");
    Ok(())
}

#[test]
fn accelerated_engines_match_on_random_suite() -> Result<(), FilterError> {
    let mut rng = StdRng::seed_from_u64(5);

    for _ in 0..40 {
        let (width, height) = (rng.random_range(1..24), rng.random_range(1..24));
        let (rows, cols) = (rng.random_range(1..9), rng.random_range(1..9));
        let kernel = random_kernel(&mut rng, rows, cols)?;
        let boundary = BORDERS[rng.random_range(0..BORDERS.len())];

        let gray = random_image::<1>(&mut rng, width, height)?;
        assert_engines_match(&gray, &kernel, &boundary)?;

        // a wrong channel stride in the interior windows only shows with C > 1
        let rgb = random_image::<3>(&mut rng, width, height)?;
        assert_engines_match(&rgb, &kernel, &boundary)?;
    }
    Ok(())
}

// A policy that only answers the coordinates the kernel taps can reach. Even kernels reach
// `len / 2` samples before the center and one less after it, so no engine may ask for more.
struct ReachableOnly {
    before: (isize, isize),
    after: (isize, isize),
}

impl BoundaryPolicy for ReachableOnly {
    fn sample<const C: usize>(
        &self,
        src: &Image<f32, C>,
        row: isize,
        col: isize,
    ) -> Option<[f32; C]> {
        let (rows, cols) = (src.rows() as isize, src.cols() as isize);
        let row_ok = row >= -self.before.0 && row < rows + self.after.0;
        let col_ok = col >= -self.before.1 && col < cols + self.after.1;
        (row_ok && col_ok).then_some([10.0; C])
    }
}

#[test]
fn even_kernels_only_read_reachable_border() -> Result<(), FilterError> {
    let src = Image::<f32, 1>::from_size_val([3, 3].into(), 1.0)?;

    for (rows, cols) in [(2, 2), (4, 4), (2, 3), (4, 1)] {
        let kernel = Kernel::from_val(rows, cols, 1.0)?;
        let (half_rows, half_cols) = kernel.half_size();
        let policy = ReachableOnly {
            before: (half_rows as isize, half_cols as isize),
            after: ((rows - 1 - half_rows) as isize, (cols - 1 - half_cols) as isize),
        };

        let expected = convolve(&src, &kernel, &policy, Engine::Naive)?;
        for engine in Engine::ALL {
            let dst = convolve(&src, &kernel, &policy, engine)?;
            assert_eq!(dst, expected, "{engine} {rows}x{cols}");
        }
    }

    // 2x2 of ones: the top-left pixel reads three border cells of 10 and itself
    let kernel = Kernel::from_val(2, 2, 1.0)?;
    let policy = ReachableOnly {
        before: (1, 1),
        after: (0, 0),
    };
    let dst = convolve(&src, &kernel, &policy, Engine::PaddedAccelerated)?;
    assert_eq!(dst.get_pixel(0, 0)?[0], 31.0);
    assert_eq!(dst.get_pixel(2, 2)?[0], 4.0);
    Ok(())
}

#[test]
fn blur_nicely_on_ones() -> Result<(), FilterError> {
    let src = Image::<f32, 1>::from_size_val([3, 3].into(), 1.0)?;
    let kernel = kernels::blur_nicely_3x3();

    for engine in Engine::ALL {
        let dst = convolve(&src, &kernel, &BorderMode::Zero, engine)?;
        // offsets -1, 0, 1: a corner keeps 2x2 of its 3x3 neighborhood
        approx::assert_relative_eq!(dst.get_pixel(1, 1)?[0], 0.9, epsilon = 1e-6);
        approx::assert_relative_eq!(dst.get_pixel(0, 0)?[0], 0.4, epsilon = 1e-6);
        approx::assert_relative_eq!(dst.get_pixel(2, 2)?[0], 0.4, epsilon = 1e-6);
    }
    Ok(())
}

// Replicate clamps to the last row and column, so a read one row below a single-row image
// returns that row.
#[test]
fn replicate_reads_below_last_row() -> Result<(), FilterError> {
    let src = Image::<f32, 1>::new([4, 1].into(), vec![1.0, 2.0, 3.0, 4.0])?;
    let below = Kernel::new(3, 1, vec![0.0, 0.0, 1.0])?;

    for engine in Engine::ALL {
        assert_eq!(convolve(&src, &below, &BorderMode::Replicate, engine)?, src);
    }
    Ok(())
}

#[test]
fn shift_corner_replicates_top_left() -> Result<(), FilterError> {
    let src = Image::<f32, 1>::new([3, 2].into(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])?;
    let kernel = kernels::shift_corner(5)?;

    for engine in Engine::ALL {
        let dst = convolve(&src, &kernel, &BorderMode::Replicate, engine)?;
        // every pixel reads two rows up and two columns left, clamped to the first ones
        assert_eq!(dst.as_slice(), &[1.0; 6], "{engine}");
    }
    Ok(())
}

#[test]
fn channel_pass_through() -> Result<(), FilterError> {
    let mut rng = StdRng::seed_from_u64(6);
    let src = random_image::<3>(&mut rng, 8, 6)?;
    let mapping = ChannelKernels::new().with(Channel::R, kernels::emboss_3x3());

    for engine in Engine::ALL {
        let mut dst = Image::from_size_val(src.size(), 0.0)?;
        convolve_channels(&src, &mut dst, &mapping, &BorderMode::Replicate, engine)?;

        for ch in [Channel::G, Channel::B] {
            let ch = usize::from(ch);
            assert_eq!(dst.channel(ch)?, src.channel(ch)?);
        }

        let red = convolve(
            &src.channel(0)?,
            &kernels::emboss_3x3(),
            &BorderMode::Replicate,
            Engine::Naive,
        )?;
        assert_eq!(dst.channel(0)?, red);
    }
    Ok(())
}

#[test]
fn channel_mapping_covering_all_channels_is_rejected() -> Result<(), FilterError> {
    let src = Image::<f32, 3>::from_size_val([4, 4].into(), 0.5)?;
    let mapping: ChannelKernels = [Channel::R, Channel::G, Channel::B]
        .into_iter()
        .map(|ch| (ch, kernels::sharpen_3x3()))
        .collect();

    let mut dst = Image::from_size_val(src.size(), 0.0)?;
    let res = convolve_channels(&src, &mut dst, &mapping, &BorderMode::Zero, Engine::Naive);
    assert!(matches!(res, Err(FilterError::InvalidArgument(_))));
    Ok(())
}

#[test]
fn custom_policy_is_used_for_out_of_bounds_reads() -> Result<(), FilterError> {
    // every out-of-bounds read returns the negated top-left pixel
    struct NegatedOrigin;

    impl BoundaryPolicy for NegatedOrigin {
        fn sample<const C: usize>(
            &self,
            src: &Image<f32, C>,
            _row: isize,
            _col: isize,
        ) -> Option<[f32; C]> {
            src.get_pixel(0, 0).ok().map(|px| px.map(|v| -v))
        }
    }

    let src = Image::<f32, 1>::new([2, 1].into(), vec![3.0, 5.0])?;
    let kernel = Kernel::from_rows(&[&[1.0, 0.0, 1.0]])?;

    for engine in Engine::ALL {
        let dst = convolve(&src, &kernel, &NegatedOrigin, engine)?;
        assert_eq!(dst.as_slice(), &[2.0, 0.0], "{engine}");
    }
    Ok(())
}

#[test]
fn unresolved_coordinate_is_out_of_range() -> Result<(), FilterError> {
    struct Unresolved;

    impl BoundaryPolicy for Unresolved {
        fn sample<const C: usize>(&self, _: &Image<f32, C>, _: isize, _: isize) -> Option<[f32; C]> {
            None
        }
    }

    let src = Image::<f32, 1>::from_size_val([3, 3].into(), 1.0)?;
    let kernel = Kernel::box_kernel(3, 3)?;

    for engine in Engine::ALL {
        let res = convolve(&src, &kernel, &Unresolved, engine);
        assert!(
            matches!(res, Err(FilterError::OutOfRange { .. })),
            "{engine}"
        );
    }

    // an interior-only kernel never consults the policy
    assert_eq!(convolve(&src, &Kernel::identity(), &Unresolved, Engine::Naive)?, src);
    Ok(())
}
