use crate::{
    modem::sstv::{
        CALIBRATION_TIME,
        CALIBRATION_TONES,
        LEAD_IN_TIME,
        LEADER_BREAK_TIME,
        LEADER_TIME,
        LEADER_TONE,
        SYNC_TONE,
        VIS_BIT_TIME,
        VIS_ONE_TONE,
        VIS_ZERO_TONE,
        modes::VisCode,
    },
    source::Pulse,
};

/// Position in the VIS header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HeaderState {
    #[default]
    LeadIn,
    Calibration {
        index: usize,
    },
    Leader1,
    Break,
    Leader2,
    StartBit,
    DataBit {
        bit: u8,
    },
    ParityBit,
    StopBit,
}

impl HeaderState {
    pub fn next(&self) -> Option<Self> {
        let mut state = *self;
        match &mut state {
            Self::LeadIn => state = Self::Calibration { index: 0 },
            Self::Calibration { index } => {
                *index += 1;
                if *index == CALIBRATION_TONES.len() {
                    state = Self::Leader1;
                }
            }
            Self::Leader1 => state = Self::Break,
            Self::Break => state = Self::Leader2,
            Self::Leader2 => state = Self::StartBit,
            Self::StartBit => state = Self::DataBit { bit: 0 },
            Self::DataBit { bit } => {
                *bit += 1;
                if *bit == 7 {
                    state = Self::ParityBit;
                }
            }
            Self::ParityBit => state = Self::StopBit,
            Self::StopBit => return None,
        }

        Some(state)
    }

    /// The tone sent in this state.
    pub fn pulse(&self, vis_code: VisCode) -> Pulse {
        let bit_pulse = |bit: bool| {
            Pulse::new(
                if bit { VIS_ONE_TONE } else { VIS_ZERO_TONE },
                VIS_BIT_TIME,
            )
        };

        match self {
            Self::LeadIn => Pulse::silence(LEAD_IN_TIME),
            Self::Calibration { index } => Pulse::new(CALIBRATION_TONES[*index], CALIBRATION_TIME),
            Self::Leader1 | Self::Leader2 => Pulse::new(LEADER_TONE, LEADER_TIME),
            Self::Break => Pulse::new(SYNC_TONE, LEADER_BREAK_TIME),
            Self::StartBit | Self::StopBit => Pulse::new(SYNC_TONE, VIS_BIT_TIME),
            Self::DataBit { bit } => bit_pulse(vis_code.bit(*bit)),
            Self::ParityBit => bit_pulse(vis_code.parity()),
        }
    }
}

/// Iterates over all header states, starting at the lead-in.
pub fn header_states() -> impl Iterator<Item = HeaderState> {
    std::iter::successors(Some(HeaderState::default()), HeaderState::next)
}
