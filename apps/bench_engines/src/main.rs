use argh::FromArgs;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::path::PathBuf;

use convkit::image::Image;
use convkit::imgproc::{
    color,
    filter::{benchmark, kernels, BorderMode},
};
use convkit::io::functional as F;

#[derive(FromArgs)]
/// Time every convolution engine once on a grayscale image.
struct Args {
    /// path to an input image, a random image is used when missing
    #[argh(option, short = 'i')]
    input: Option<PathBuf>,

    /// width and height of the random image
    #[argh(option, default = "512")]
    size: usize,

    /// seed of the random image
    #[argh(option, default = "42")]
    seed: u64,

    /// name of a built-in kernel
    #[argh(option, short = 'k', default = "String::from(\"blur-nicely\")")]
    kernel: String,

    /// boundary policy: zero, constant:<v>, replicate, reflect, reflect101 or wrap
    #[argh(option, default = "BorderMode::default()")]
    boundary: BorderMode,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let kernel = kernels::from_name(&args.kernel)?;

    let rgb = match &args.input {
        Some(path) => F::read_image_rgb_f32(path)?,
        None => {
            log::info!("no input, using a {0}x{0} random image", args.size);
            let mut rng = StdRng::seed_from_u64(args.seed);
            let data = (0..args.size * args.size * 3)
                .map(|_| rng.random::<f32>())
                .collect();
            Image::new([args.size, args.size].into(), data)?
        }
    };

    // the engines are compared on one channel
    let mut gray = Image::from_size_val(rgb.size(), 0.0)?;
    color::gray_from_rgb(&rgb, &mut gray)?;

    let report = benchmark::benchmark_engines(&gray, &kernel, &args.boundary)?;
    print!("{report}");

    if let Some(fastest) = report.fastest() {
        println!("fastest: {}", fastest.engine);
    }

    Ok(())
}
