use image::RgbImage;

/// A color channel as it is scanned onto the air.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Luma,
    /// R-Y
    RedDifference,
    /// B-Y
    BlueDifference,
}

impl Channel {
    /// Whether the channel is sampled per chroma block instead of per pixel.
    #[inline]
    pub fn is_chroma(&self) -> bool {
        matches!(self, Self::RedDifference | Self::BlueDifference)
    }

    /// Value of this channel for an RGB pixel.
    pub fn value(&self, [r, g, b]: [u8; 3]) -> u8 {
        match self {
            Self::Red => r,
            Self::Green => g,
            Self::Blue => b,
            Self::Luma => luma([r, g, b]),
            Self::RedDifference => red_difference([r, g, b]),
            Self::BlueDifference => blue_difference([r, g, b]),
        }
    }
}

/// Row-major RGB pixels.
pub trait FrameBuffer {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn pixel(&self, x: usize, y: usize) -> [u8; 3];

    #[inline]
    fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }
}

impl<F> FrameBuffer for &F
where
    F: FrameBuffer,
{
    #[inline]
    fn width(&self) -> usize {
        (**self).width()
    }

    #[inline]
    fn height(&self) -> usize {
        (**self).height()
    }

    #[inline]
    fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        (**self).pixel(x, y)
    }
}

impl FrameBuffer for RgbImage {
    #[inline]
    fn width(&self) -> usize {
        RgbImage::width(self) as usize
    }

    #[inline]
    fn height(&self) -> usize {
        RgbImage::height(self) as usize
    }

    #[inline]
    fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.get_pixel(x as u32, y as u32).0
    }
}

/// Borrowed row-major `[r, g, b]` pixels of known dimensions.
#[derive(Clone, Copy, Debug)]
pub struct RgbPixels<'a> {
    pub width: usize,
    pub height: usize,
    pub pixels: &'a [[u8; 3]],
}

impl<'a> RgbPixels<'a> {
    /// Returns `None` if `pixels` doesn't hold exactly `width * height`
    /// pixels.
    pub fn new(width: usize, height: usize, pixels: &'a [[u8; 3]]) -> Option<Self> {
        (width.checked_mul(height)? == pixels.len()).then_some(Self {
            width,
            height,
            pixels,
        })
    }
}

impl FrameBuffer for RgbPixels<'_> {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.pixels[y * self.width + x]
    }
}

// ITU-R BT.601 studio swing, scaled to 8 bits
const SCALE: f64 = 0.003906;

#[inline]
fn quantize(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

pub fn luma([r, g, b]: [u8; 3]) -> u8 {
    let [r, g, b] = [f64::from(r), f64::from(g), f64::from(b)];
    quantize(16.0 + SCALE * (65.738 * r + 129.057 * g + 25.064 * b))
}

pub fn red_difference([r, g, b]: [u8; 3]) -> u8 {
    let [r, g, b] = [f64::from(r), f64::from(g), f64::from(b)];
    quantize(128.0 + SCALE * (112.439 * r - 94.154 * g - 18.285 * b))
}

pub fn blue_difference([r, g, b]: [u8; 3]) -> u8 {
    let [r, g, b] = [f64::from(r), f64::from(g), f64::from(b)];
    quantize(128.0 + SCALE * (-37.945 * r - 74.494 * g + 112.439 * b))
}

/// Integer mean of the pixels in the block at `(x, y)` with the given size.
/// The block is cut off at the image border.
pub fn block_mean<F>(frame_buffer: &F, x: usize, y: usize, width: usize, height: usize) -> [u8; 3]
where
    F: FrameBuffer + ?Sized,
{
    let x_end = (x + width).min(frame_buffer.width());
    let y_end = (y + height).min(frame_buffer.height());

    let mut sum = [0u32; 3];
    let mut count = 0;
    for y in y..y_end {
        for x in x..x_end {
            let pixel = frame_buffer.pixel(x, y);
            for (sum, value) in sum.iter_mut().zip(pixel) {
                *sum += u32::from(value);
            }
            count += 1;
        }
    }

    if count == 0 {
        return [0; 3];
    }
    sum.map(|sum| (sum / count) as u8)
}

#[cfg(test)]
mod tests {
    use image::{
        Rgb,
        RgbImage,
    };

    use super::*;

    #[test]
    fn ycrcb_of_primaries() {
        assert_eq!(luma([0, 0, 0]), 16);
        assert_eq!(luma([255, 255, 255]), 235);
        assert_eq!(red_difference([128, 128, 128]), 128);
        assert_eq!(blue_difference([128, 128, 128]), 128);
        assert_eq!(red_difference([255, 0, 0]), 240);
        assert_eq!(blue_difference([0, 0, 255]), 240);
        assert_eq!(luma([255, 0, 0]), 81);
    }

    #[test]
    fn mean_of_block() {
        let image = RgbImage::from_fn(4, 4, |x, y| Rgb([(x * 10) as u8, (y * 10) as u8, 7]));
        assert_eq!(block_mean(&image, 0, 0, 2, 2), [5, 5, 7]);
        assert_eq!(block_mean(&image, 2, 2, 1, 2), [20, 25, 7]);
        // clipped at the border
        assert_eq!(block_mean(&image, 3, 3, 2, 2), [30, 30, 7]);
    }

    #[test]
    fn rgb_pixels_checks_length() {
        let pixels = [[1, 2, 3]; 6];
        assert!(RgbPixels::new(3, 2, &pixels).is_some());
        assert!(RgbPixels::new(2, 2, &pixels).is_none());
        let frame = RgbPixels::new(3, 2, &pixels).unwrap();
        assert_eq!(frame.pixel(2, 1), [1, 2, 3]);
        assert_eq!(Channel::Green.value(frame.pixel(0, 0)), 2);
    }
}
