//! Application related stuff

use crate::pbrt::*;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

/// System wide options.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Options {
    /// Number of threads to use for rendering.
    #[arg(
        long = "nthreads",
        short = 't',
        value_name = "NUM",
        default_value_t = 0,
        help = "Use specified number of threads for rendering (0 uses all logical CPUs)."
    )]
    pub n_threads: usize,

    /// Automatically reduce a number of quality settings to render more quickly.
    #[arg(
        long = "quick",
        help = "Automatically reduce a number of quality settings to render more quickly."
    )]
    pub quick_render: bool,

    /// Suppress all text output other than error messages.
    #[arg(long, help = "Suppress all text output other than error messages.")]
    pub quiet: bool,

    /// Path to the image file.
    #[arg(
        long = "outfile",
        short = 'o',
        value_name = "FILE",
        default_value = "photonmap.png",
        help = "Write the final image to the given filename."
    )]
    pub image_file: String,

    /// Image resolution.
    #[arg(
        long = "resolution",
        short = 'r',
        value_name = "NUM",
        default_value_t = 256,
        help = "Width and height of the square output image in pixels."
    )]
    pub resolution: usize,

    /// Caustic photon target override.
    #[arg(long = "causticphotons", value_name = "NUM", help = "Number of caustic photons to store.")]
    pub caustic_photons: Option<Int>,

    /// Indirect photon target override.
    #[arg(long = "indirectphotons", value_name = "NUM", help = "Number of indirect photons to store.")]
    pub indirect_photons: Option<Int>,

    /// Volume photon target override.
    #[arg(long = "volumephotons", value_name = "NUM", help = "Number of volume photons to store.")]
    pub volume_photons: Option<Int>,

    /// Disable final gathering.
    #[arg(long = "nofinalgather", help = "Estimate indirect lighting directly from the photon map.")]
    pub no_final_gather: bool,

    /// Add a participating medium to the scene.
    #[arg(long = "fog", help = "Fill the scene with a homogeneous scattering medium.")]
    pub fog: bool,
}

impl Options {
    /// Returns the number of threads to use.
    pub fn threads(&self) -> usize {
        threads(self.n_threads)
    }
}

/// Returns the number of worker threads to use for a requested count. Zero
/// selects all logical CPUs.
///
/// * `requested` - Requested number of threads.
pub fn threads(requested: usize) -> usize {
    let max_threads = num_cpus::get();
    match requested {
        0 => max_threads,
        n if n > max_threads => {
            warn!("Num threads > max logical CPUs {}", max_threads);
            max_threads
        }
        n => n,
    }
}

/// Returns a progress bar with the workspace style.
///
/// * `len`     - Total number of steps.
/// * `message` - Message displayed next to the bar.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let progress = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        progress.set_style(style.progress_chars("=>-"));
    }
    progress.set_message(message.to_string());
    progress
}
