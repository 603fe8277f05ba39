//! Mode specifications
//!
//! Timings follow the Dayton paper. [Vis codes][1]
//!
//! [1]: https://web.archive.org/web/20050306193820/http://www.tima.com/~djones/vis.txt

use std::{
    collections::HashMap,
    fmt::Display,
    str::FromStr,
    sync::OnceLock,
};

use crate::{
    modem::sstv::{
        CHANNEL_HIGH_TONE,
        PORCH_TONE,
        SYNC_TONE,
        image::Channel,
    },
    source::Pulse,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorFormat {
    /// Green, blue and red scanned one after another, one image row per line.
    Gbr,
    /// Luma per row, color differences shared by a pair of rows.
    YCrCb,
}

/// How many pixels share one chroma sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subsampling {
    None,
    /// 2×1 blocks: one column, two rows.
    Vertical,
    /// 2×2 blocks: two columns, two rows.
    Quad,
}

impl Subsampling {
    #[inline]
    pub fn block_width(&self) -> usize {
        match self {
            Self::None | Self::Vertical => 1,
            Self::Quad => 2,
        }
    }

    #[inline]
    pub fn block_height(&self) -> usize {
        match self {
            Self::None => 1,
            Self::Vertical | Self::Quad => 2,
        }
    }
}

/// One step of a scan line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
    /// Sync pulse of the mode's sync time.
    Sync,
    /// Porch after a sync pulse.
    Porch,
    /// Separator between channel scans.
    Separator,
    /// A tone with fixed frequency and duration.
    Tone(Pulse),
    /// One pulse per pixel (or chroma block) of `channel`. `row` is relative to
    /// the first row of the current line group.
    Scan { channel: Channel, row: usize },
}

/// Seven bit mode identifier sent in the VIS header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct VisCode(u8);

impl VisCode {
    /// `None` if the high bit is set.
    pub const fn new(value: u8) -> Option<Self> {
        if value < 0x80 {
            Some(Self(value))
        }
        else {
            None
        }
    }

    /// Data bit `index`, counted from the least significant bit.
    #[inline]
    pub fn bit(&self, index: u8) -> bool {
        debug_assert!(index < 7);
        self.0 & (1 << index) != 0
    }

    /// Parity bit for even parity over the seven data bits.
    #[inline]
    pub fn parity(&self) -> bool {
        self.0.count_ones() % 2 == 1
    }
}

impl Display for VisCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

const MARTIN_LINE: &[Segment] = &[
    Segment::Sync,
    Segment::Porch,
    Segment::Scan {
        channel: Channel::Green,
        row: 0,
    },
    Segment::Separator,
    Segment::Scan {
        channel: Channel::Blue,
        row: 0,
    },
    Segment::Separator,
    Segment::Scan {
        channel: Channel::Red,
        row: 0,
    },
    Segment::Separator,
];

// the sync pulse sits between the blue and red scans, and one extra sync pulse
// starts the image.
const SCOTTIE_PREAMBLE: &[Segment] = &[Segment::Sync];
const SCOTTIE_LINE: &[Segment] = &[
    Segment::Separator,
    Segment::Scan {
        channel: Channel::Green,
        row: 0,
    },
    Segment::Separator,
    Segment::Scan {
        channel: Channel::Blue,
        row: 0,
    },
    Segment::Sync,
    Segment::Porch,
    Segment::Scan {
        channel: Channel::Red,
        row: 0,
    },
];

const ROBOT_EVEN_SEPARATOR: Pulse = Pulse::new(PORCH_TONE, 4.5e-3);
const ROBOT_ODD_SEPARATOR: Pulse = Pulse::new(CHANNEL_HIGH_TONE, 4.5e-3);
const ROBOT_CHROMA_PORCH: Pulse = Pulse::new(1900.0, 1.5e-3);

const ROBOT_LINE_PAIR: &[Segment] = &[
    Segment::Sync,
    Segment::Porch,
    Segment::Scan {
        channel: Channel::Luma,
        row: 0,
    },
    Segment::Tone(ROBOT_EVEN_SEPARATOR),
    Segment::Tone(ROBOT_CHROMA_PORCH),
    Segment::Scan {
        channel: Channel::RedDifference,
        row: 0,
    },
    Segment::Sync,
    Segment::Porch,
    Segment::Scan {
        channel: Channel::Luma,
        row: 1,
    },
    Segment::Tone(ROBOT_ODD_SEPARATOR),
    Segment::Tone(ROBOT_CHROMA_PORCH),
    Segment::Scan {
        channel: Channel::BlueDifference,
        row: 0,
    },
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeSpecification {
    pub name: &'static str,
    pub short_name: &'static str,
    pub vis_code: VisCode,
    pub width: usize,
    pub height: usize,
    pub color_format: ColorFormat,
    pub subsampling: Subsampling,
    pub sync_time: f64,
    pub porch_time: f64,
    pub sep_time: f64,
    pub pixel_time: f64,
    pub chroma_pixel_time: f64,
    /// Segments sent once before the first line.
    pub preamble: &'static [Segment],
    /// Segments of one line group (one row, or a pair of rows for YCrCb).
    pub line: &'static [Segment],
}

impl ModeSpecification {
    pub const M1: Self = Self {
        name: "Martin 1",
        short_name: "M1",
        vis_code: VisCode(44),
        width: 320,
        height: 256,
        color_format: ColorFormat::Gbr,
        subsampling: Subsampling::None,
        sync_time: 4.862e-3,
        porch_time: 0.572e-3,
        sep_time: 0.572e-3,
        pixel_time: 0.4576e-3,
        chroma_pixel_time: 0.4576e-3,
        preamble: &[],
        line: MARTIN_LINE,
    };

    pub const M2: Self = Self {
        name: "Martin 2",
        short_name: "M2",
        vis_code: VisCode(40),
        pixel_time: 0.2288e-3,
        chroma_pixel_time: 0.2288e-3,
        ..Self::M1
    };

    pub const S1: Self = Self {
        name: "Scottie 1",
        short_name: "S1",
        vis_code: VisCode(60),
        width: 320,
        height: 256,
        color_format: ColorFormat::Gbr,
        subsampling: Subsampling::None,
        sync_time: 9e-3,
        porch_time: 1.5e-3,
        sep_time: 1.5e-3,
        pixel_time: 0.4320e-3,
        chroma_pixel_time: 0.4320e-3,
        preamble: SCOTTIE_PREAMBLE,
        line: SCOTTIE_LINE,
    };

    pub const S2: Self = Self {
        name: "Scottie 2",
        short_name: "S2",
        vis_code: VisCode(56),
        pixel_time: 0.2752e-3,
        chroma_pixel_time: 0.2752e-3,
        ..Self::S1
    };

    pub const SDX: Self = Self {
        name: "Scottie DX",
        short_name: "SDX",
        vis_code: VisCode(76),
        pixel_time: 1.08e-3,
        chroma_pixel_time: 1.08e-3,
        ..Self::S1
    };

    /// Chroma is averaged over 2×2 blocks, 160 chroma samples per line.
    pub const R36: Self = Self {
        name: "Robot 36",
        short_name: "R36",
        vis_code: VisCode(8),
        width: 320,
        height: 240,
        color_format: ColorFormat::YCrCb,
        subsampling: Subsampling::Quad,
        sync_time: 9e-3,
        porch_time: 3e-3,
        sep_time: 4.5e-3,
        pixel_time: 0.275e-3,
        chroma_pixel_time: 0.275e-3,
        preamble: &[],
        line: ROBOT_LINE_PAIR,
    };

    /// Chroma is averaged over 2×1 blocks, 320 chroma samples per line.
    pub const R72: Self = Self {
        name: "Robot 72",
        short_name: "R72",
        vis_code: VisCode(12),
        subsampling: Subsampling::Vertical,
        pixel_time: 0.55e-3,
        chroma_pixel_time: 0.275e-3,
        ..Self::R36
    };

    pub const ALL: [&'static Self; 7] = [
        &Self::M1,
        &Self::M2,
        &Self::S1,
        &Self::S2,
        &Self::SDX,
        &Self::R36,
        &Self::R72,
    ];

    /// Looks up a mode by short name (`m1`, `sdx`, ...) or full name
    /// (`Martin 1`), ignoring case.
    pub fn from_name(name: &str) -> Option<&'static Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|mode| {
            mode.short_name.eq_ignore_ascii_case(name) || mode.name.eq_ignore_ascii_case(name)
        })
    }

    pub fn from_vis_code(vis_code: VisCode) -> Option<&'static Self> {
        builtin_mode_specification(vis_code)
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Image rows covered by one pass over [`Self::line`].
    #[inline]
    pub fn rows_per_line(&self) -> usize {
        match self.color_format {
            ColorFormat::Gbr => 1,
            ColorFormat::YCrCb => 2,
        }
    }

    /// Number of pulses a scan of `channel` produces.
    #[inline]
    pub fn scan_length(&self, channel: Channel) -> usize {
        if channel.is_chroma() {
            self.width / self.subsampling.block_width()
        }
        else {
            self.width
        }
    }

    #[inline]
    pub fn scan_pixel_time(&self, channel: Channel) -> f64 {
        if channel.is_chroma() {
            self.chroma_pixel_time
        }
        else {
            self.pixel_time
        }
    }

    /// Nominal duration of a segment in seconds.
    pub fn segment_time(&self, segment: &Segment) -> f64 {
        match segment {
            Segment::Sync => self.sync_time,
            Segment::Porch => self.porch_time,
            Segment::Separator => self.sep_time,
            Segment::Tone(pulse) => pulse.duration,
            Segment::Scan { channel, row: _ } => {
                self.scan_length(*channel) as f64 * self.scan_pixel_time(*channel)
            }
        }
    }

    /// The fixed pulse a non-scan segment stands for.
    pub fn segment_pulse(&self, segment: &Segment) -> Option<Pulse> {
        match segment {
            Segment::Sync => Some(Pulse::new(SYNC_TONE, self.sync_time)),
            Segment::Porch => Some(Pulse::new(PORCH_TONE, self.porch_time)),
            Segment::Separator => Some(Pulse::new(PORCH_TONE, self.sep_time)),
            Segment::Tone(pulse) => Some(*pulse),
            Segment::Scan { .. } => None,
        }
    }

    /// Nominal duration of one pass over [`Self::line`].
    pub fn line_time(&self) -> f64 {
        self.line.iter().map(|segment| self.segment_time(segment)).sum()
    }

    /// Nominal duration of the image part of a transmission (without VIS
    /// header and trailer).
    pub fn image_time(&self) -> f64 {
        let preamble: f64 = self
            .preamble
            .iter()
            .map(|segment| self.segment_time(segment))
            .sum();
        preamble + self.line_time() * (self.height / self.rows_per_line()) as f64
    }
}

impl Display for ModeSpecification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.short_name)
    }
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("unknown SSTV mode: {name}")]
pub struct UnknownMode {
    pub name: String,
}

impl FromStr for &'static ModeSpecification {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModeSpecification::from_name(s).ok_or_else(|| {
            UnknownMode {
                name: s.to_owned(),
            }
        })
    }
}

pub fn builtin_mode_specification(vis_code: VisCode) -> Option<&'static ModeSpecification> {
    static MAP: OnceLock<HashMap<VisCode, &'static ModeSpecification>> = OnceLock::new();
    let map = MAP.get_or_init(|| {
        ModeSpecification::ALL
            .into_iter()
            .map(|mode| (mode.vis_code, mode))
            .collect()
    });

    map.get(&vis_code).copied()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::modem::sstv::modes::{
        ModeSpecification,
        VisCode,
    };

    #[test]
    fn correct_vis_codes() {
        assert_eq!(ModeSpecification::R36.vis_code, VisCode(0x08));
        assert_eq!(ModeSpecification::R72.vis_code, VisCode(0x0c));
        assert_eq!(ModeSpecification::M2.vis_code, VisCode(0x28));
        assert_eq!(ModeSpecification::M1.vis_code, VisCode(0x2c));
        assert_eq!(ModeSpecification::S2.vis_code, VisCode(0x38));
        assert_eq!(ModeSpecification::S1.vis_code, VisCode(0x3c));
        assert_eq!(ModeSpecification::SDX.vis_code, VisCode(0x4c));
    }

    #[test]
    fn even_parity() {
        // 44 = 0b0101100 has three ones
        assert!(VisCode(44).parity());
        // 40 = 0b0101000 has two
        assert!(!VisCode(40).parity());
        for code in 0..0x80 {
            let vis_code = VisCode::new(code).unwrap();
            let ones = code.count_ones() + u32::from(vis_code.parity());
            assert_eq!(ones % 2, 0);
        }
        assert!(VisCode::new(0x80).is_none());
    }

    #[test]
    fn bits_are_lsb_first() {
        let bits: Vec<bool> = (0..7).map(|i| VisCode(44).bit(i)).collect();
        assert_eq!(bits, [false, false, true, true, false, true, false]);
        assert_eq!(format!("{:>4}", VisCode(8)), "   8");
    }

    #[test]
    fn lookup_by_name_and_code() {
        assert_eq!(ModeSpecification::from_name("m1"), Some(&ModeSpecification::M1));
        assert_eq!(ModeSpecification::from_name("SDX"), Some(&ModeSpecification::SDX));
        assert_eq!(
            ModeSpecification::from_name("robot 72"),
            Some(&ModeSpecification::R72)
        );
        assert_eq!(ModeSpecification::from_name("pd120"), None);
        assert!("r36".parse::<&ModeSpecification>().is_ok());
        assert!("x9".parse::<&ModeSpecification>().is_err());

        for mode in ModeSpecification::ALL {
            assert_eq!(ModeSpecification::from_vis_code(mode.vis_code), Some(mode));
        }
        assert_eq!(ModeSpecification::from_vis_code(VisCode(0x5f)), None);
    }

    #[test]
    fn published_line_times() {
        assert_abs_diff_eq!(ModeSpecification::M1.line_time(), 446.446e-3, epsilon = 1e-9);
        assert_abs_diff_eq!(ModeSpecification::M2.line_time(), 226.798e-3, epsilon = 1e-9);
        assert_abs_diff_eq!(ModeSpecification::S1.line_time(), 428.22e-3, epsilon = 1e-9);
        // one pass covers two rows, each 150 ms
        assert_abs_diff_eq!(ModeSpecification::R36.line_time(), 300e-3, epsilon = 1e-9);
    }

    #[test]
    fn image_times() {
        assert_abs_diff_eq!(ModeSpecification::M1.image_time(), 114.29, epsilon = 0.01);
        assert_abs_diff_eq!(ModeSpecification::R36.image_time(), 36.0, epsilon = 1e-6);
        assert_abs_diff_eq!(ModeSpecification::SDX.image_time(), 268.886, epsilon = 0.001);
    }
}
