use argh::FromArgs;
use std::path::PathBuf;

use convkit::image::Image;
use convkit::imgproc::{
    color,
    filter::{self, kernels, BorderMode, Channel, ChannelKernels, Engine, Kernel},
    normalize, threshold,
};
use convkit::io::functional as F;

#[derive(FromArgs)]
/// Apply a convolution kernel to an image.
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output image
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// name of a built-in kernel, e.g. sharpen, emboss or shift-corner
    #[argh(option, short = 'k')]
    kernel: Option<String>,

    /// path to a json file holding the kernel as a list of rows
    #[argh(option)]
    kernel_file: Option<PathBuf>,

    /// boundary policy: zero, constant:<v>, replicate, reflect, reflect101 or wrap
    #[argh(option, default = "BorderMode::default()")]
    boundary: BorderMode,

    /// engine: naive, padded, accelerated or padded-accelerated
    #[argh(option, default = "Engine::Accelerated")]
    engine: Engine,

    /// convolve only this channel (R, G or B), may be repeated
    #[argh(option, short = 'c')]
    channel: Vec<Channel>,

    /// convert the image to grayscale before convolving
    #[argh(switch)]
    gray: bool,

    /// zero every output sample not above this value
    #[argh(option)]
    threshold: Option<f32>,
}

fn load_kernel(args: &Args) -> Result<Kernel, Box<dyn std::error::Error>> {
    match (&args.kernel, &args.kernel_file) {
        (Some(name), None) => Ok(kernels::from_name(name)?),
        (None, Some(path)) => {
            let file = std::fs::File::open(path)?;
            Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
        }
        (None, None) => Err(format!(
            "one of --kernel or --kernel-file is required, built-in kernels: {}",
            kernels::KERNEL_NAMES.join(", ")
        )
        .into()),
        (Some(_), Some(_)) => Err("--kernel and --kernel-file are mutually exclusive".into()),
    }
}

fn apply_threshold<const C: usize>(
    image: Image<f32, C>,
    value: Option<f32>,
) -> Result<Image<f32, C>, Box<dyn std::error::Error>> {
    let Some(value) = value else {
        return Ok(image);
    };
    let mut thresholded = Image::from_size_val(image.size(), 0.0)?;
    threshold::threshold_to_zero(&image, &mut thresholded, value)?;
    Ok(thresholded)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let kernel = load_kernel(&args)?;
    log::info!(
        "{}x{} kernel, {:?} boundary, {} engine",
        kernel.rows(),
        kernel.cols(),
        args.boundary,
        args.engine
    );

    // read the image normalized to [0, 1]
    let image = F::read_image_rgb_f32(&args.input)?;

    if args.gray {
        if !args.channel.is_empty() {
            return Err("--channel cannot be combined with --gray".into());
        }

        let mut gray = Image::from_size_val(image.size(), 0.0)?;
        color::gray_from_rgb(&image, &mut gray)?;

        let output = filter::convolve(&gray, &kernel, &args.boundary, args.engine)?;
        let output = apply_threshold(output, args.threshold)?;

        // gray outputs are stretched to the full range
        let mut normalized = Image::from_size_val(output.size(), 0.0)?;
        normalize::normalize_min_max(&output, &mut normalized, 0.0, 1.0)?;
        F::write_image_gray_f32(&args.output, &normalized)?;
    } else {
        let output = if args.channel.is_empty() {
            filter::convolve(&image, &kernel, &args.boundary, args.engine)?
        } else {
            let mapping: ChannelKernels = args
                .channel
                .iter()
                .map(|&ch| (ch, kernel.clone()))
                .collect();

            let mut output = Image::from_size_val(image.size(), 0.0)?;
            filter::convolve_channels(&image, &mut output, &mapping, &args.boundary, args.engine)?;
            output
        };
        let output = apply_threshold(output, args.threshold)?;

        F::write_image_rgb_f32(&args.output, &output)?;
    }

    println!("Wrote {}", args.output.display());

    Ok(())
}
