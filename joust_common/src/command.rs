//! Referee command protocol types.
//!
//! The referee box ("JSR") answers each 4-byte poll on the command bus with
//! a status byte whose low three bits carry the current match command and
//! whose upper bits flag per-side reload requests.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Poll byte requesting match status.
pub const STATUS_QUERY: u8 = 0x3F;
/// Poll byte requesting score.
pub const SCORE_QUERY: u8 = 0xC3;
/// Filler byte clocked out after the query.
pub const FILLER: u8 = 0x00;
/// "Nothing seen yet" marker for the de-duplication memory.
pub const NOTHING: u8 = 0xFF;
/// Bytes per poll frame.
pub const FRAME_LEN: u8 = 4;

/// Match command carried in the low three bits of a status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MatchCommand {
    Wait = 0x00,
    StartRound = 0x01,
    Recess = 0x03,
    SuddenDeath = 0x04,
    End = 0x05,
}

impl MatchCommand {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::Wait),
            0x01 => Some(Self::StartRound),
            0x03 => Some(Self::Recess),
            0x04 => Some(Self::SuddenDeath),
            0x05 => Some(Self::End),
            _ => None,
        }
    }

    #[inline]
    pub fn from_param(param: u16) -> Option<Self> {
        u8::try_from(param).ok().and_then(Self::from_u8)
    }

    /// True for commands that begin a round.
    #[inline]
    pub const fn starts_round(self) -> bool {
        matches!(self, Self::StartRound | Self::SuddenDeath)
    }
}

bitflags! {
    /// Status byte layout.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusByte: u8 {
        /// Command field (3 bits).
        const COMMAND     = 0x07;
        /// Red knight reload requested.
        const RED_RELOAD  = 0x10;
        /// Dark knight reload requested.
        const DARK_RELOAD = 0x40;
    }
}

impl StatusByte {
    /// Command field value.
    #[inline]
    pub const fn command(raw: u8) -> u8 {
        raw & Self::COMMAND.bits()
    }
}

/// Which knight this robot plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Red,
    #[default]
    Dark,
}

impl Side {
    /// Reload-request bit belonging to this side.
    #[inline]
    pub const fn reload_mask(self) -> StatusByte {
        match self {
            Self::Red => StatusByte::RED_RELOAD,
            Self::Dark => StatusByte::DARK_RELOAD,
        }
    }
}

/// Command bus polling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Status query; the command is read from byte 4.
    #[default]
    Status,
    /// Score query; commands are read from bytes 3 and 4.
    Score,
}

impl QueryMode {
    /// Poll byte sent at position 1.
    #[inline]
    pub const fn query_byte(self) -> u8 {
        match self {
            Self::Status => STATUS_QUERY,
            Self::Score => SCORE_QUERY,
        }
    }

    /// Frame position (1-based) carrying the first command.
    #[inline]
    pub const fn read_from(self) -> u8 {
        match self {
            Self::Status => 4,
            Self::Score => 3,
        }
    }
}
