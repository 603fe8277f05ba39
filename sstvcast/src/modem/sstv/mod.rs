//! Slow-scan television transmitter.
//!
//! # References
//!
//! - <http://lionel.cordesses.free.fr/gpages/sstv.html>
//! - <http://www.barberdsp.com/downloads/Dayton%20Paper.pdf>
//! - <https://web.archive.org/web/20050306193820/http://www.tima.com/~djones/vis.txt>

mod encoder;
pub mod image;
pub mod modes;
pub mod state;
pub mod vis;

pub use self::{
    encoder::{
        DimensionMismatch,
        SstvEncoder,
        channel_frequency,
    },
    modes::{
        ModeSpecification,
        UnknownMode,
        VisCode,
    },
    vis::{
        TRAILER,
        VisFrame,
    },
};

/// Silence before the calibration tones.
pub const LEAD_IN_TIME: f64 = 0.500;

pub const CALIBRATION_TONES: [f64; 8] = [
    1900.0, 1500.0, 1900.0, 1500.0, 2300.0, 1500.0, 2300.0, 1500.0,
];
pub const CALIBRATION_TIME: f64 = 0.100;

pub const LEADER_TONE: f64 = 1900.0;
pub const LEADER_TIME: f64 = 0.300;

pub const LEADER_BREAK_TIME: f64 = 0.010;

pub const VIS_BIT_TIME: f64 = 0.030;
pub const VIS_ZERO_TONE: f64 = 1300.0;
pub const VIS_ONE_TONE: f64 = 1100.0;

// sync, leader break, vis start/stop
pub const SYNC_TONE: f64 = 1200.0;

pub const PORCH_TONE: f64 = 1500.0;

pub const CHANNEL_LOW_TONE: f64 = 1500.0;
pub const CHANNEL_HIGH_TONE: f64 = 2300.0;

/// Silence between the trailer and the Morse identification.
pub const IDENTIFICATION_GAP: f64 = 2.0;
