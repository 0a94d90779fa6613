//! Orthographic row renderer

use image::{ImageBuffer, ImageFormat, Rgb};
use photon_core::app::*;
use photon_core::geometry::*;
use photon_core::pbrt::*;
use photon_core::rng::*;
use photon_core::sampling::*;
use photon_core::scene::*;
use photon_core::spectrum::*;
use photon_integrators::*;
use std::thread;

/// An orthographic view looking along +y.
#[derive(Copy, Clone, Debug)]
pub struct OrthographicView {
    /// World space position of the image center.
    pub center: Point3f,

    /// World space width and height of the image plane.
    pub extent: Float,

    /// Width and height of the image in pixels.
    pub resolution: usize,

    /// Pixels are split into `strata` x `strata` cells with one jittered
    /// sample in each.
    pub strata: usize,
}

impl OrthographicView {
    /// Returns the camera ray through a point of a pixel.
    ///
    /// * `x` - Pixel column.
    /// * `y` - Pixel row, counted from the top.
    /// * `u` - Offset inside the pixel.
    pub fn ray(&self, x: usize, y: usize, u: &Point2f) -> Ray {
        let scale = self.extent / self.resolution as Float;
        let half = 0.5 * self.extent;
        let o = Point3f::new(
            self.center.x - half + (x as Float + u.x) * scale,
            self.center.y,
            self.center.z + half - (y as Float + u.y) * scale,
        );
        Ray::new(o, Vector3f::new(0.0, 1.0, 0.0), INFINITY, 0.0)
    }

    /// Renders one row of pixels.
    ///
    /// * `integrator` - The photon map integrator.
    /// * `scene`      - The scene.
    /// * `y`          - Pixel row.
    fn render_row(&self, integrator: &PhotonMapIntegrator, scene: &Scene, y: usize) -> Vec<Spectrum> {
        let mut rng = RNG::new(y as u64);
        let inv_spp = 1.0 / (self.strata * self.strata) as Float;
        (0..self.resolution)
            .map(|x| {
                let mut l = Spectrum::zero();
                for u in stratified_sample_2d(&mut rng, self.strata, self.strata, true) {
                    let ray = self.ray(x, y, &u);
                    let li = integrator.li(&ray, scene, &mut rng, 0);
                    if li.has_nans() {
                        debug!("NaN radiance at pixel ({}, {})", x, y);
                    } else {
                        l += li;
                    }
                }
                l * inv_spp
            })
            .collect()
    }

    /// Renders the image with rows distributed over worker threads. Returns
    /// the pixels in row major order.
    ///
    /// * `integrator` - The photon map integrator; preprocessing must be done.
    /// * `scene`      - The scene.
    /// * `n_threads`  - Number of worker threads.
    pub fn render(&self, integrator: &PhotonMapIntegrator, scene: &Scene, n_threads: usize) -> Vec<Spectrum> {
        let res = self.resolution;
        let mut pixels = vec![Spectrum::zero(); res * res];
        let progress = create_progress_bar(res as u64, "Rendering");

        thread::scope(|scope| {
            let (tx_collector, rx_collector) = crossbeam_channel::bounded::<(usize, Vec<Spectrum>)>(n_threads);
            let (tx_worker, rx_worker) = crossbeam_channel::bounded::<usize>(n_threads);

            // Spawn collector thread.
            let pixels = &mut pixels;
            let progress = &progress;
            scope.spawn(move || {
                for (y, row) in rx_collector.iter() {
                    pixels[y * res..(y + 1) * res].copy_from_slice(&row);
                    progress.inc(1);
                }
            });

            // Spawn worker threads.
            for _ in 0..n_threads {
                let rx_worker = rx_worker.clone();
                let tx_collector = tx_collector.clone();
                scope.spawn(move || {
                    for y in rx_worker.iter() {
                        let row = self.render_row(integrator, scene, y);
                        if tx_collector.send((y, row)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(rx_worker); // Drop extra since we've cloned one for each worker.
            drop(tx_collector);

            // Send work.
            for y in 0..res {
                if tx_worker.send(y).is_err() {
                    error!("Render workers stopped early");
                    break;
                }
            }
        });
        progress.finish_and_clear();

        pixels
    }
}

/// Write pixels to an 8-bit PNG after gamma correction.
///
/// * `path`       - Output path.
/// * `pixels`     - Pixels in row major order.
/// * `resolution` - Width and height of the image.
pub fn write_png(path: &str, pixels: &[Spectrum], resolution: usize) -> Result<(), String> {
    let res = resolution as u32;
    let mut imgbuf = ImageBuffer::new(res, res);
    for (x, y, pixel) in imgbuf.enumerate_pixels_mut() {
        let [r, g, b] = pixels[y as usize * resolution + x as usize].to_rgb();
        *pixel = Rgb([to_byte(r), to_byte(g), to_byte(b)]);
    }

    match imgbuf.save_with_format(path, ImageFormat::Png) {
        Ok(()) => Ok(()),
        Err(err) => Err(format!("Error saving output image {path}: {err}.")),
    }
}

/// Apply gamma correction and clamp to a byte.
fn to_byte(v: Float) -> u8 {
    clamp(255.0 * gamma_correct(v) + 0.5, 0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use photon_core::primitives::*;
    use std::sync::Arc;

    fn view(resolution: usize) -> OrthographicView {
        OrthographicView {
            center: Point3f::new(0.0, -10.0, 0.0),
            extent: 2.0,
            resolution,
            strata: 1,
        }
    }

    #[test]
    fn pixel_corners_span_the_extent() {
        let v = view(4);
        let top_left = v.ray(0, 0, &Point2f::zero());
        assert_eq!(top_left.o, Point3f::new(-1.0, -10.0, 1.0));
        let bottom_right = v.ray(3, 3, &Point2f::new(1.0, 1.0));
        assert_eq!(bottom_right.o, Point3f::new(1.0, -10.0, -1.0));
        assert_eq!(bottom_right.d, Vector3f::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn empty_scene_renders_black() {
        let scene = Scene::new(Arc::new(PrimitiveList::new(vec![])), vec![], None);
        let integrator = PhotonMapIntegrator::new(PhotonMapOptions::default());
        let mut v = view(3);
        v.strata = 2;
        let pixels = v.render(&integrator, &scene, 2);
        assert_eq!(pixels.len(), 9);
        assert!(pixels.iter().all(|p| p.is_black()));
    }

    #[test]
    fn bytes_are_gamma_corrected_and_clamped() {
        assert_eq!(to_byte(0.0), 0);
        assert_eq!(to_byte(1.0), 255);
        assert_eq!(to_byte(4.0), 255);
        assert_eq!(to_byte(-1.0), 0);
        assert!(to_byte(0.5) > 128);
    }
}
