use std::path::Path;

use image::{ImageResult, Rgb, RgbImage};

use crate::boids::Boid;

pub const BACKGROUND: Rgb<u8> = Rgb([0xFF, 0xF1, 0xEB]);
pub const INK: Rgb<u8> = Rgb([0x54, 0x3D, 0x5E]);

/// Opacity of the background wash laid over the previous frame.
const FADE: f32 = 0.25;
const DOT_SIZE: i64 = 2;

/// Moves a boid that left the `[-half, half]` box to the opposite edge.
pub fn wrap_boid(boid: &mut Boid, half_width: f64, half_height: f64) {
    boid.position.x = wrap(boid.position.x, half_width);
    boid.position.y = wrap(boid.position.y, half_height);
}

fn wrap(value: f64, half: f64) -> f64 {
    if value > half {
        -half
    } else if -value > half {
        half
    } else {
        value
    }
}

/// Frame buffer with the world origin at its centre. Old frames fade out
/// under a translucent background, leaving short trails.
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Canvas {
            image: RgbImage::from_pixel(width, height, BACKGROUND),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn half_extent(&self) -> (f64, f64) {
        (self.width() as f64 / 2.0, self.height() as f64 / 2.0)
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn draw(&mut self, boids: &[Boid]) {
        self.fade();
        let (half_width, half_height) = self.half_extent();
        for boid in boids {
            let x = boid.position.x + half_width;
            let y = boid.position.y + half_height;
            // also rejects NaN and infinities
            let on_canvas = x >= -(DOT_SIZE as f64)
                && y >= -(DOT_SIZE as f64)
                && x < self.width() as f64
                && y < self.height() as f64;
            if !on_canvas {
                continue;
            }
            self.dot(x.floor() as i64, y.floor() as i64);
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        self.image.save(path)
    }

    fn fade(&mut self) {
        for pixel in self.image.pixels_mut() {
            for (channel, target) in pixel.0.iter_mut().zip(BACKGROUND.0) {
                let blended = (target as f32 * FADE) + (*channel as f32 * (1.0 - FADE));
                *channel = blended.round() as u8;
            }
        }
    }

    fn dot(&mut self, x: i64, y: i64) {
        let (width, height) = (self.width() as i64, self.height() as i64);
        for py in y..y + DOT_SIZE {
            for px in x..x + DOT_SIZE {
                if px >= 0 && py >= 0 && px < width && py < height {
                    self.image.put_pixel(px as u32, py as u32, INK);
                }
            }
        }
    }
}
