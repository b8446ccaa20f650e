use image::DynamicImage;

/// Number of intensity levels per 8-bit channel.
pub const BINS: usize = 256;

/// Per-channel intensity counts of an 8-bit RGB image.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelHistogram {
    /// RGB histogram data: [R[256], G[256], B[256]]
    pub data: [[u32; BINS]; 3],
}

impl ChannelHistogram {
    /// Count intensities of every channel; alpha is dropped and wider
    /// samples are scaled down to 8 bits first.
    pub fn compute(image: &DynamicImage) -> Self {
        let mut data = [[0u32; BINS]; 3];
        for pixel in image.to_rgb8().pixels() {
            for (channel, &value) in pixel.0.iter().enumerate() {
                data[channel][value as usize] += 1;
            }
        }
        Self { data }
    }

    /// Largest bin over all channels, used to normalise plots.
    pub fn max_count(&self) -> u32 {
        self.data
            .iter()
            .flat_map(|channel| channel.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_solid_color_fills_one_bin_per_channel() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(5, 4, Rgb([10, 20, 30])));
        let hist = ChannelHistogram::compute(&img);

        assert_eq!(hist.data[0][10], 20);
        assert_eq!(hist.data[1][20], 20);
        assert_eq!(hist.data[2][30], 20);
        assert_eq!(hist.max_count(), 20);
    }

    #[test]
    fn test_each_channel_sums_to_pixel_count() {
        let img = RgbImage::from_fn(16, 9, |x, y| Rgb([(x * 15) as u8, (y * 28) as u8, (x + y) as u8]));
        let hist = ChannelHistogram::compute(&DynamicImage::ImageRgb8(img));

        for channel in &hist.data {
            assert_eq!(channel.iter().sum::<u32>(), 16 * 9);
        }
    }

    #[test]
    fn test_alpha_is_ignored() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 7]));
        let hist = ChannelHistogram::compute(&DynamicImage::ImageRgba8(img));

        assert_eq!(hist.data[0][255], 4);
        assert_eq!(hist.data[1][0], 4);
        assert_eq!(hist.data[2][0], 4);
    }
}
