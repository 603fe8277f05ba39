use crate::{
    modem::sstv::{
        CHANNEL_HIGH_TONE,
        CHANNEL_LOW_TONE,
        image::{
            Channel,
            FrameBuffer,
            block_mean,
        },
        modes::{
            ModeSpecification,
            Segment,
        },
    },
    source::{
        Pulse,
        PulseSink,
    },
    util::lerp,
};

/// Rows between two progress messages.
const PROGRESS_INTERVAL: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{mode} expects a {}x{} image, but got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
pub struct DimensionMismatch {
    pub mode: &'static str,
    pub expected: (usize, usize),
    pub actual: (usize, usize),
}

/// Tone frequency for a channel value.
#[inline]
pub fn channel_frequency(value: u8) -> f64 {
    lerp(
        f64::from(value) / 255.0,
        CHANNEL_LOW_TONE,
        CHANNEL_HIGH_TONE,
    )
}

/// Turns an image into the scan pulses of a mode.
#[derive(Clone, Debug)]
pub struct SstvEncoder<F> {
    frame_buffer: F,
    mode: &'static ModeSpecification,
}

impl<F> SstvEncoder<F>
where
    F: FrameBuffer,
{
    pub fn new(frame_buffer: F, mode: &'static ModeSpecification) -> Result<Self, DimensionMismatch> {
        let actual = frame_buffer.dimensions();
        if actual != mode.dimensions() {
            return Err(DimensionMismatch {
                mode: mode.name,
                expected: mode.dimensions(),
                actual,
            });
        }

        Ok(Self { frame_buffer, mode })
    }

    #[inline]
    pub fn mode(&self) -> &'static ModeSpecification {
        self.mode
    }

    /// Channel values of one scan, left to right.
    ///
    /// `row` is the absolute image row. Chroma scans average the block that
    /// starts at `row`.
    pub fn scan(&self, channel: Channel, row: usize) -> impl Iterator<Item = u8> + '_ {
        let block_width = self.mode.subsampling.block_width();
        let block_height = self.mode.subsampling.block_height();

        (0..self.mode.scan_length(channel)).map(move |x| {
            if channel.is_chroma() {
                let pixel = block_mean(
                    &self.frame_buffer,
                    x * block_width,
                    row,
                    block_width,
                    block_height,
                );
                channel.value(pixel)
            }
            else {
                channel.value(self.frame_buffer.pixel(x, row))
            }
        })
    }

    /// Writes the pulses of all scan lines, without VIS header or trailer.
    pub fn write_image<S>(&self, mut sink: S) -> Result<(), S::Error>
    where
        S: PulseSink,
    {
        let mode = self.mode;

        for segment in mode.preamble {
            self.write_segment(&mut sink, segment, 0)?;
        }

        for row_base in (0..mode.height).step_by(mode.rows_per_line()) {
            if row_base % PROGRESS_INTERVAL == 0 {
                tracing::debug!(mode = mode.short_name, row = row_base, height = mode.height, "scanning");
            }

            for segment in mode.line {
                self.write_segment(&mut sink, segment, row_base)?;
            }
        }

        Ok(())
    }

    fn write_segment<S>(&self, sink: &mut S, segment: &Segment, row_base: usize) -> Result<(), S::Error>
    where
        S: PulseSink,
    {
        if let Segment::Scan { channel, row } = segment {
            let pixel_time = self.mode.scan_pixel_time(*channel);
            for value in self.scan(*channel, row_base + row) {
                sink.put_pulse(Pulse::new(channel_frequency(value), pixel_time))?;
            }
        }
        else if let Some(pulse) = self.mode.segment_pulse(segment) {
            sink.put_pulse(pulse)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use image::{
        Rgb,
        RgbImage,
    };

    use super::*;
    use crate::{
        modem::sstv::image::{
            blue_difference,
            luma,
            red_difference,
        },
        source::total_duration,
    };

    fn encode(image: &RgbImage, mode: &'static ModeSpecification) -> Vec<Pulse> {
        let encoder = SstvEncoder::new(image, mode).unwrap();
        let mut pulses: Vec<Pulse> = vec![];
        encoder.write_image(&mut pulses).unwrap();
        pulses
    }

    fn test_pattern(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                (x * 7 + y * 3) as u8,
                (x * 13 ^ y * 5) as u8,
                ((x + y) * 11) as u8,
            ])
        })
    }

    #[test]
    fn frequency_map_endpoints() {
        assert_eq!(channel_frequency(0), 1500.0);
        assert_eq!(channel_frequency(255), 2300.0);
        assert_abs_diff_eq!(channel_frequency(128), 1901.568_627, epsilon = 1e-6);
    }

    #[test]
    fn rejects_wrong_dimensions() {
        let image = RgbImage::new(320, 240);
        let error = SstvEncoder::new(&image, &ModeSpecification::M1).unwrap_err();
        assert_eq!(error.expected, (320, 256));
        assert_eq!(error.actual, (320, 240));
    }

    #[test]
    fn gray_martin_1_lines() {
        let image = RgbImage::from_pixel(320, 256, Rgb([128, 128, 128]));
        let pulses = encode(&image, &ModeSpecification::M1);

        let line_length = 2 + 3 * 321;
        assert_eq!(pulses.len(), 256 * line_length);

        let gray = channel_frequency(128);
        for line in pulses.chunks(line_length) {
            assert_eq!(line[0], Pulse::new(1200.0, 4.862e-3));
            assert_eq!(line[1], Pulse::new(1500.0, 0.572e-3));
            for scan in 0..3 {
                let start = 2 + scan * 321;
                assert!(line[start..start + 320].iter().all(|p| p.frequency == gray));
                assert_eq!(line[start + 320], Pulse::new(1500.0, 0.572e-3));
            }
            assert_abs_diff_eq!(total_duration(line), 446.446e-3, epsilon = 1e-9);
        }
    }

    #[test]
    fn martin_scans_green_blue_red() {
        let image = RgbImage::from_pixel(320, 256, Rgb([255, 0, 128]));
        let pulses = encode(&image, &ModeSpecification::M2);
        assert_eq!(pulses[2].frequency, channel_frequency(0));
        assert_eq!(pulses[2 + 321].frequency, channel_frequency(128));
        assert_eq!(pulses[2 + 2 * 321].frequency, channel_frequency(255));
    }

    #[test]
    fn scottie_sync_placement() {
        let image = RgbImage::from_pixel(320, 256, Rgb([0, 255, 0]));
        let pulses = encode(&image, &ModeSpecification::S1);

        // one leading sync pulse, then 256 lines
        let line_length = 1 + 320 + 1 + 320 + 2 + 320;
        assert_eq!(pulses.len(), 1 + 256 * line_length);
        assert_eq!(pulses[0], Pulse::new(1200.0, 9e-3));

        let line = &pulses[1..1 + line_length];
        assert_eq!(line[0], Pulse::new(1500.0, 1.5e-3));
        assert_eq!(line[1].frequency, 2300.0);
        assert_eq!(line[642], Pulse::new(1200.0, 9e-3));
        assert_eq!(line[643], Pulse::new(1500.0, 1.5e-3));
        assert_eq!(line[644].frequency, 1500.0);
        assert_abs_diff_eq!(total_duration(line), 428.22e-3, epsilon = 1e-9);
    }

    fn luma_frequencies(pulses: &[Pulse], chroma_length: usize) -> Vec<f64> {
        // sync, porch, luma, separator, chroma porch, chroma
        let half = 2 + 320 + 2 + chroma_length;
        pulses
            .chunks(2 * half)
            .flat_map(|pair| pair[2..322].iter().chain(&pair[half + 2..half + 322]))
            .map(|pulse| pulse.frequency)
            .collect()
    }

    #[test]
    fn robot_luma_does_not_depend_on_subsampling() {
        let image = test_pattern(320, 240);
        let r36 = encode(&image, &ModeSpecification::R36);
        let r72 = encode(&image, &ModeSpecification::R72);

        assert_eq!(r36.len(), 120 * 2 * (4 + 320 + 160));
        assert_eq!(r72.len(), 120 * 2 * (4 + 320 + 320));

        let luma_36 = luma_frequencies(&r36, 160);
        let luma_72 = luma_frequencies(&r72, 320);
        assert_eq!(luma_36.len(), 320 * 240);
        assert_eq!(luma_36, luma_72);
        assert_eq!(luma_36[320 * 5 + 17], channel_frequency(luma(image.get_pixel(17, 5).0)));
    }

    #[test]
    fn robot_chroma_is_block_averaged() {
        let image = test_pattern(320, 240);
        let r36 = encode(&image, &ModeSpecification::R36);
        let r72 = encode(&image, &ModeSpecification::R72);

        // second row pair, chroma column 3
        let pair = 2 * (4 + 320 + 160);
        let expected = red_difference(block_mean(&image, 6, 2, 2, 2));
        assert_eq!(r36[pair + 324 + 3].frequency, channel_frequency(expected));
        let expected = blue_difference(block_mean(&image, 6, 2, 2, 2));
        assert_eq!(r36[pair + 484 + 324 + 3].frequency, channel_frequency(expected));

        let pair = 2 * (4 + 320 + 320);
        let expected = red_difference(block_mean(&image, 3, 2, 1, 2));
        assert_eq!(r72[pair + 324 + 3].frequency, channel_frequency(expected));
    }

    #[test]
    fn robot_separators() {
        let image = test_pattern(320, 240);
        let pulses = encode(&image, &ModeSpecification::R36);
        assert_eq!(pulses[0], Pulse::new(1200.0, 9e-3));
        assert_eq!(pulses[1], Pulse::new(1500.0, 3e-3));
        assert_eq!(pulses[322], Pulse::new(1500.0, 4.5e-3));
        assert_eq!(pulses[323], Pulse::new(1900.0, 1.5e-3));
        assert_eq!(pulses[484 + 322], Pulse::new(2300.0, 4.5e-3));
        assert_abs_diff_eq!(total_duration(&pulses[..968]), 0.3, epsilon = 1e-9);
    }
}
