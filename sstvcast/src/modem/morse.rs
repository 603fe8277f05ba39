//! Morse code (CW) station identification.
//!
//! Timing follows the PARIS convention: one unit is `1.2 / wpm` seconds, a dot
//! is one unit, a dash three. Elements of a character are separated by one
//! unit of silence, characters by three, words by seven.

use crate::source::{
    Envelope,
    Pulse,
    PulseSink,
};

pub const MIN_WPM: u32 = 1;
pub const MAX_WPM: u32 = 50;
pub const DEFAULT_WPM: u32 = 15;

pub const MIN_TONE: f64 = 400.0;
pub const MAX_TONE: f64 = 2000.0;
pub const DEFAULT_TONE: f64 = 800.0;

pub const MAX_CALLSIGN_LENGTH: usize = 31;

/// Rise and fall time of a mark.
pub const MARK_RAMP: f64 = 0.020;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MorseError {
    #[error("character {character:?} at position {position} has no Morse code")]
    InvalidCharacter { character: char, position: usize },
    #[error("callsign is empty")]
    EmptyCallsign,
    #[error("callsign is {length} characters long, at most {max} are allowed", max = MAX_CALLSIGN_LENGTH)]
    CallsignTooLong { length: usize },
    #[error("{wpm} wpm is outside of {min}..={max}", min = MIN_WPM, max = MAX_WPM)]
    WpmOutOfRange { wpm: u32 },
    #[error("CW tone of {tone} Hz is outside of {min}..={max} Hz", min = MIN_TONE, max = MAX_TONE)]
    ToneOutOfRange { tone: f64 },
}

/// Code for an (uppercase) character, as dots and dashes.
pub fn code(character: char) -> Option<&'static str> {
    let code = match character {
        'A' => ".-",
        'B' => "-...",
        'C' => "-.-.",
        'D' => "-..",
        'E' => ".",
        'F' => "..-.",
        'G' => "--.",
        'H' => "....",
        'I' => "..",
        'J' => ".---",
        'K' => "-.-",
        'L' => ".-..",
        'M' => "--",
        'N' => "-.",
        'O' => "---",
        'P' => ".--.",
        'Q' => "--.-",
        'R' => ".-.",
        'S' => "...",
        'T' => "-",
        'U' => "..-",
        'V' => "...-",
        'W' => ".--",
        'X' => "-..-",
        'Y' => "-.--",
        'Z' => "--..",
        '0' => "-----",
        '1' => ".----",
        '2' => "..---",
        '3' => "...--",
        '4' => "....-",
        '5' => ".....",
        '6' => "-....",
        '7' => "--...",
        '8' => "---..",
        '9' => "----.",
        '/' => "-..-.",
        '?' => "..--..",
        '=' => "-...-",
        _ => return None,
    };
    Some(code)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MorseElement {
    Dot,
    Dash,
    /// Between the elements of one character.
    IntraGap,
    /// Between characters.
    InterGap,
    /// Between words.
    WordGap,
}

impl MorseElement {
    #[inline]
    pub fn units(&self) -> u32 {
        match self {
            Self::Dot | Self::IntraGap => 1,
            Self::Dash | Self::InterGap => 3,
            Self::WordGap => 7,
        }
    }

    #[inline]
    pub fn is_mark(&self) -> bool {
        matches!(self, Self::Dot | Self::Dash)
    }
}

/// Checks that `wpm` and `tone` are in their supported ranges.
pub fn check_parameters(wpm: u32, tone: f64) -> Result<(), MorseError> {
    if !(MIN_WPM..=MAX_WPM).contains(&wpm) {
        return Err(MorseError::WpmOutOfRange { wpm });
    }
    if !(MIN_TONE..=MAX_TONE).contains(&tone) {
        return Err(MorseError::ToneOutOfRange { tone });
    }
    Ok(())
}

/// Validates a callsign and returns it in uppercase.
///
/// Callsigns are 1 to 31 ASCII letters, digits or `/`.
pub fn normalize_callsign(callsign: &str) -> Result<String, MorseError> {
    let callsign = callsign.trim();
    if callsign.is_empty() {
        return Err(MorseError::EmptyCallsign);
    }

    let length = callsign.chars().count();
    if length > MAX_CALLSIGN_LENGTH {
        return Err(MorseError::CallsignTooLong { length });
    }

    if let Some((position, character)) = callsign
        .chars()
        .enumerate()
        .find(|(_, c)| !c.is_ascii_alphanumeric() && *c != '/')
    {
        return Err(MorseError::InvalidCharacter {
            character,
            position,
        });
    }

    Ok(callsign.to_ascii_uppercase())
}

/// The message sent after an image.
pub fn identification_message(callsign: &str) -> Result<String, MorseError> {
    Ok(format!("SSTV DE {}", normalize_callsign(callsign)?))
}

/// Sequence of Morse elements for a message, with its timing.
#[derive(Clone, Debug, PartialEq)]
pub struct MorsePlan {
    elements: Vec<MorseElement>,
    unit: f64,
    tone: f64,
}

impl MorsePlan {
    /// Plans `message` at `wpm` words per minute with a `tone` Hz carrier.
    ///
    /// Lowercase letters are sent as uppercase. Runs of spaces become a single
    /// word gap. Leading and trailing spaces are ignored.
    pub fn new(message: &str, wpm: u32, tone: f64) -> Result<Self, MorseError> {
        check_parameters(wpm, tone)?;

        let mut elements = vec![];
        let mut pending_gap = None;

        for (position, character) in message.chars().enumerate() {
            if character == ' ' {
                if !elements.is_empty() {
                    pending_gap = Some(MorseElement::WordGap);
                }
                continue;
            }

            let code = code(character.to_ascii_uppercase()).ok_or(MorseError::InvalidCharacter {
                character,
                position,
            })?;

            if let Some(gap) = pending_gap.take() {
                elements.push(gap);
            }

            for (i, symbol) in code.chars().enumerate() {
                if i > 0 {
                    elements.push(MorseElement::IntraGap);
                }
                elements.push(if symbol == '.' {
                    MorseElement::Dot
                }
                else {
                    MorseElement::Dash
                });
            }

            pending_gap = Some(MorseElement::InterGap);
        }

        Ok(Self {
            elements,
            unit: 1.2 / f64::from(wpm),
            tone,
        })
    }

    #[inline]
    pub fn elements(&self) -> &[MorseElement] {
        &self.elements
    }

    /// Length of one unit in seconds.
    #[inline]
    pub fn unit(&self) -> f64 {
        self.unit
    }

    #[inline]
    pub fn tone(&self) -> f64 {
        self.tone
    }

    pub fn units(&self) -> u32 {
        self.elements.iter().map(MorseElement::units).sum()
    }

    /// Nominal duration in seconds.
    pub fn duration(&self) -> f64 {
        f64::from(self.units()) * self.unit
    }

    pub fn pulses(&self) -> impl Iterator<Item = Pulse> + '_ {
        self.elements.iter().map(|element| {
            let duration = f64::from(element.units()) * self.unit;
            if element.is_mark() {
                Pulse::new(self.tone, duration).with_envelope(Envelope::Hann { ramp: MARK_RAMP })
            }
            else {
                Pulse::silence(duration)
            }
        })
    }

    pub fn write<S>(&self, mut sink: S) -> Result<(), S::Error>
    where
        S: PulseSink,
    {
        for pulse in self.pulses() {
            sink.put_pulse(pulse)?;
        }
        Ok(())
    }
}
