use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, FromRepr, IntoStaticStr};

/// Playable instrument tracks of a song.
///
/// Declaration order is the stable order charts are written in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Instrument {
    Guitar,
    GuitarCoop,
    Bass,
    Rhythm,
    Keys,
    Drums,
    #[strum(serialize = "GHLiveGuitar")]
    GhLiveGuitar,
    #[strum(serialize = "GHLiveBass")]
    GhLiveBass,
}

impl Instrument {
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Note family deciding how fret ids and modifiers are interpreted.
    pub fn family(&self) -> InstrumentFamily {
        match self {
            Self::Drums => InstrumentFamily::Drums,
            Self::GhLiveGuitar | Self::GhLiveBass => InstrumentFamily::SixFret,
            Self::Guitar | Self::GuitarCoop | Self::Bass | Self::Rhythm | Self::Keys => {
                InstrumentFamily::Guitar
            }
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Instrument groups sharing a note and modifier layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
pub enum InstrumentFamily {
    /// Five frets plus open.
    Guitar,
    /// Guitar Hero Live layout: three black and three white buttons plus open.
    SixFret,
    Drums,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    FromRepr,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Difficulty {
    Easy = 0,
    Medium = 1,
    Hard = 2,
    Expert = 3,
}

impl Difficulty {
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
