use std::fmt::{Display, Error, Formatter};
use std::ops::Deref;

// Color channel
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channel {
    R,
    G,
    B,
}

impl Channel {
    // Index of the channel within an RGB pixel
    pub fn index(self) -> usize {
        match self {
            Self::R => 0,
            Self::G => 1,
            Self::B => 2,
        }
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let name = match *self {
            Self::R => "R",
            Self::G => "G",
            Self::B => "B",
        };
        f.write_str(name)
    }
}

// Channel set
//------------------------------------------------------------------------------

// Bitmask of selected channels. Iteration always yields R, G, B order
// irrespective of insertion order, which keeps payload assembly and report
// ordering stable.
#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelSet(u8);

impl ChannelSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Self(0b111)
    }

    pub fn with(mut self, ch: Channel) -> Self {
        self.0 |= 1 << ch.index();
        self
    }

    pub fn contains(self, ch: Channel) -> bool {
        self.0 & (1 << ch.index()) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Channel> {
        [Channel::R, Channel::G, Channel::B].into_iter().filter(move |ch| self.contains(*ch))
    }
}

impl Deref for ChannelSet {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Channel> for ChannelSet {
    fn from(ch: Channel) -> Self {
        Self::empty().with(ch)
    }
}

impl<const N: usize> From<[Channel; N]> for ChannelSet {
    fn from(chs: [Channel; N]) -> Self {
        chs.into_iter().collect()
    }
}

impl FromIterator<Channel> for ChannelSet {
    fn from_iter<I: IntoIterator<Item = Channel>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl Display for ChannelSet {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let mut first = true;
        for ch in self.iter() {
            if !first {
                f.write_str("+")?;
            }
            write!(f, "{ch}")?;
            first = false;
        }
        Ok(())
    }
}


// Bit position
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BitPosition {
    Lsb,
    Msb,
}

impl BitPosition {
    // Bit index within an 8-bit sample
    pub fn index(self) -> u8 {
        match self {
            Self::Lsb => 0,
            Self::Msb => 7,
        }
    }
}

impl Display for BitPosition {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let name = match *self {
            Self::Lsb => "LSB",
            Self::Msb => "MSB",
        };
        f.write_str(name)
    }
}

// Bit position set
//------------------------------------------------------------------------------

// Selected bit positions, iterated LSB first.
#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitPositionSet(u8);

impl BitPositionSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn both() -> Self {
        Self(0b11)
    }

    pub fn with(mut self, bit: BitPosition) -> Self {
        self.0 |= match bit {
            BitPosition::Lsb => 0b01,
            BitPosition::Msb => 0b10,
        };
        self
    }

    pub fn contains(self, bit: BitPosition) -> bool {
        let mask = match bit {
            BitPosition::Lsb => 0b01,
            BitPosition::Msb => 0b10,
        };
        self.0 & mask != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = BitPosition> {
        [BitPosition::Lsb, BitPosition::Msb].into_iter().filter(move |bit| self.contains(*bit))
    }
}

impl From<BitPosition> for BitPositionSet {
    fn from(bit: BitPosition) -> Self {
        Self::empty().with(bit)
    }
}

impl FromIterator<BitPosition> for BitPositionSet {
    fn from_iter<I: IntoIterator<Item = BitPosition>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

// Output format
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputFormat {
    Auto,
    Hex,
    Bin,
    Ascii,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let name = match *self {
            Self::Auto => "auto",
            Self::Hex => "hex",
            Self::Bin => "bin",
            Self::Ascii => "ascii",
        };
        f.write_str(name)
    }
}

// Analysis config
//------------------------------------------------------------------------------

// Built once per run by the caller and read-only thereafter.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisConfig {
    pub channels: ChannelSet,
    pub bit_positions: BitPositionSet,
    pub brute_force: bool,
    pub max_output_bytes: usize,
    pub output_format: OutputFormat,
    pub utf8_text_threshold: f64,
    pub fallback_text_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            channels: ChannelSet::all(),
            bit_positions: BitPosition::Lsb.into(),
            brute_force: false,
            max_output_bytes: 1024,
            output_format: OutputFormat::Auto,
            utf8_text_threshold: 0.7,
            fallback_text_threshold: 0.6,
        }
    }
}
