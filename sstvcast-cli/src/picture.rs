use std::path::Path;

use color_eyre::eyre::WrapErr;
use image::{
    DynamicImage,
    Rgb,
    RgbImage,
    imageops::{
        self,
        FilterType,
    },
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::Error;

/// How an image with a different aspect ratio is fitted to a mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    /// Scale to cover and crop the overhang evenly on both sides.
    #[default]
    Center,
    /// Scale to fit and fill the rest with black bars.
    Pad,
    /// Scale both axes independently.
    Stretch,
}

const FILTER: FilterType = FilterType::Lanczos3;

pub fn load(path: &Path) -> Result<DynamicImage, Error> {
    tracing::debug!(path = %path.display(), "Loading image");
    image::open(path).wrap_err_with(|| format!("Could not load image {}", path.display()))
}

/// Fits `image` to exactly `width` x `height` pixels.
pub fn fit(image: &DynamicImage, width: u32, height: u32, aspect: Aspect) -> RgbImage {
    let image = image.to_rgb8();
    let (image_width, image_height) = image.dimensions();
    tracing::debug!(image_width, image_height, width, height, ?aspect, "Fitting image");

    if (image_width, image_height) == (width, height) {
        return image;
    }
    if image_width == 0 || image_height == 0 {
        return RgbImage::new(width, height);
    }

    let scale_x = f64::from(width) / f64::from(image_width);
    let scale_y = f64::from(height) / f64::from(image_height);
    let scaled_size = |scale: f64| {
        (
            ((f64::from(image_width) * scale).round() as u32).max(1),
            ((f64::from(image_height) * scale).round() as u32).max(1),
        )
    };

    match aspect {
        Aspect::Stretch => imageops::resize(&image, width, height, FILTER),
        Aspect::Center => {
            let (scaled_width, scaled_height) = scaled_size(scale_x.max(scale_y));
            let scaled_width = scaled_width.max(width);
            let scaled_height = scaled_height.max(height);
            let scaled = imageops::resize(&image, scaled_width, scaled_height, FILTER);
            imageops::crop_imm(
                &scaled,
                (scaled_width - width) / 2,
                (scaled_height - height) / 2,
                width,
                height,
            )
            .to_image()
        }
        Aspect::Pad => {
            let (scaled_width, scaled_height) = scaled_size(scale_x.min(scale_y));
            let scaled_width = scaled_width.min(width);
            let scaled_height = scaled_height.min(height);
            let scaled = imageops::resize(&image, scaled_width, scaled_height, FILTER);
            let mut canvas = RgbImage::from_pixel(width, height, Rgb([0, 0, 0]));
            imageops::overlay(
                &mut canvas,
                &scaled,
                i64::from((width - scaled_width) / 2),
                i64::from((height - scaled_height) / 2),
            );
            canvas
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])))
    }

    #[test]
    fn every_mode_gets_its_resolution() {
        for aspect in [Aspect::Center, Aspect::Pad, Aspect::Stretch] {
            for (width, height) in [(320, 256), (320, 240)] {
                let fitted = fit(&white(1024, 768), width, height, aspect);
                assert_eq!(fitted.dimensions(), (width, height), "{aspect:?}");
            }
        }
    }

    #[test]
    fn pad_adds_black_bars() {
        // 2:1 into 320x256 leaves bars above and below
        let fitted = fit(&white(640, 320), 320, 256, Aspect::Pad);
        assert_eq!(fitted.get_pixel(160, 0), &Rgb([0, 0, 0]));
        assert_eq!(fitted.get_pixel(160, 255), &Rgb([0, 0, 0]));
        assert!(fitted.get_pixel(160, 128)[0] > 250);
    }

    #[test]
    fn center_crop_covers_the_frame() {
        let fitted = fit(&white(640, 320), 320, 256, Aspect::Center);
        assert!(fitted.pixels().all(|pixel| pixel[0] > 250));
    }
}
