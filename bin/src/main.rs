#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;

mod render;
mod scene;

use clap::Parser;
use photon_core::app::*;
use photon_core::geometry::*;
use photon_core::paramset::*;
use photon_core::pbrt::*;
use photon_integrators::*;
use render::*;
use scene::*;

lazy_static! {
    /// The global application options.
    static ref OPTIONS: Options = Options::parse();
}

/// Photon targets are divided by this in quick mode.
const QUICK_RENDER_DIVISOR: usize = 4;

fn main() -> Result<(), String> {
    // Initialize `env_logger`.
    env_logger::init();

    if let Err(e) = render() {
        error!("{e}");
        return Err(e);
    }
    Ok(())
}

/// Returns the integrator parameters from the command line.
fn integrator_params() -> ParamSet {
    let mut params = ParamSet::new();
    if let Some(n) = OPTIONS.caustic_photons {
        params.add_int("causticphotons", &[n]);
    }
    if let Some(n) = OPTIONS.indirect_photons {
        params.add_int("indirectphotons", &[n]);
    }
    if let Some(n) = OPTIONS.volume_photons {
        params.add_int("volumephotons", &[n]);
    }
    params.add_bool("finalgather", &[!OPTIONS.no_final_gather]);
    params.add_int("nthreads", &[OPTIONS.threads() as Int]);
    params
}

fn render() -> Result<(), String> {
    let scene = demo_scene(OPTIONS.fog);

    let mut options = PhotonMapOptions::from(&integrator_params());
    if OPTIONS.quick_render {
        options.caustic_photons /= QUICK_RENDER_DIVISOR;
        options.indirect_photons /= QUICK_RENDER_DIVISOR;
        options.volume_photons /= QUICK_RENDER_DIVISOR;
    }
    if OPTIONS.fog {
        options.max_dist_squared = max(options.max_dist_squared, 0.25);
        options.step_size = 0.5;
    }

    let mut integrator = PhotonMapIntegrator::new(options);
    integrator.preprocess(&scene).map_err(|e| e.to_string())?;

    let view = OrthographicView {
        center: Point3f::new(0.0, -15.0, 5.0),
        extent: 12.0,
        resolution: OPTIONS.resolution,
        strata: if OPTIONS.quick_render { 1 } else { 2 },
    };
    let pixels = view.render(&integrator, &scene, OPTIONS.threads());
    write_png(&OPTIONS.image_file, &pixels, OPTIONS.resolution)?;

    if !OPTIONS.quiet {
        println!("Wrote {}", OPTIONS.image_file);
    }
    Ok(())
}
