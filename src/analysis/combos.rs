use std::fmt::{Display, Error, Formatter};

use crate::common::{AnalysisConfig, BitPosition, Channel, ChannelSet};

// Channel combination
//------------------------------------------------------------------------------

// One unit of analysis work: a set of channels read jointly at one bit
// position. No combination appears twice within a run.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelCombination {
    pub channels: ChannelSet,
    pub bit: BitPosition,
}

impl ChannelCombination {
    pub fn new(channels: ChannelSet, bit: BitPosition) -> Self {
        Self { channels, bit }
    }
}

impl Display for ChannelCombination {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "{} - {}", self.channels, self.bit)
    }
}

// Enumeration
//------------------------------------------------------------------------------

// Brute force walks singles first, then pairs, then the full set
static BRUTE_FORCE_SUBSETS: [&[Channel]; 7] = [
    &[Channel::R],
    &[Channel::G],
    &[Channel::B],
    &[Channel::R, Channel::G],
    &[Channel::R, Channel::B],
    &[Channel::G, Channel::B],
    &[Channel::R, Channel::G, Channel::B],
];

// Expands a config into the ordered combination list. Brute force covers
// every non-empty channel subset at LSB and MSB, 14 in total; otherwise the
// selected channels are read jointly, once per selected bit position. The
// order is stable for a given config since it defines report ordering.
pub fn enumerate_combinations(config: &AnalysisConfig) -> Vec<ChannelCombination> {
    if config.brute_force {
        BRUTE_FORCE_SUBSETS
            .iter()
            .flat_map(|subset| {
                let channels = subset.iter().copied().collect::<ChannelSet>();
                [BitPosition::Lsb, BitPosition::Msb]
                    .map(|bit| ChannelCombination::new(channels, bit))
            })
            .collect()
    } else {
        config
            .bit_positions
            .iter()
            .map(|bit| ChannelCombination::new(config.channels, bit))
            .collect()
    }
}
