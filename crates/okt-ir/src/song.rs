//! Song structure and sequencing types.

use alloc::vec::Vec;

use crate::pattern::Pattern;
use crate::sample::Sample;

/// A complete song.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Song {
    /// Number of pattern channels
    pub num_channels: u8,
    /// Initial speed (ticks per row, 1-31)
    pub initial_speed: u8,
    /// Initial tempo in BPM
    pub initial_tempo: u8,
    /// Samples; slot `i` is instrument number `i + 1` in pattern cells
    pub samples: Vec<Sample>,
    /// Patterns, referenced by the order list
    pub patterns: Vec<Pattern>,
    /// Playback order
    pub order: Vec<OrderEntry>,
    /// Per-channel settings
    pub channels: Vec<ChannelSettings>,
}

impl Default for Song {
    fn default() -> Self {
        Self {
            num_channels: 0,
            initial_speed: 6,
            initial_tempo: 125,
            samples: Vec::new(),
            patterns: Vec::new(),
            order: Vec::new(),
            channels: Vec::new(),
        }
    }
}

impl Song {
    /// Create an empty song with a given number of channels.
    pub fn with_channels(num_channels: u8) -> Self {
        let mut song = Self {
            num_channels,
            ..Self::default()
        };

        for i in 0..num_channels {
            song.channels.push(ChannelSettings {
                // Classic Amiga panning: L R R L pattern
                initial_pan: if i % 4 == 0 || i % 4 == 3 { -64 } else { 64 },
                initial_vol: 64,
                muted: false,
            });
        }

        song
    }
}

/// An entry in the order list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderEntry {
    /// Play pattern with this index
    Pattern(u8),
    /// End of song marker (0xFF in the file)
    End,
}

/// Per-channel settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelSettings {
    /// Initial panning (-64 to +64, 0 = center)
    pub initial_pan: i8,
    /// Initial volume (0-64)
    pub initial_vol: u8,
    /// Is the channel muted?
    pub muted: bool,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            initial_pan: 0,
            initial_vol: 64,
            muted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_channels_amiga_panning() {
        let song = Song::with_channels(8);
        assert_eq!(song.num_channels, 8);
        assert_eq!(song.channels.len(), 8);

        let pans: Vec<i8> = song.channels.iter().map(|c| c.initial_pan).collect();
        assert_eq!(pans, [-64, 64, 64, -64, -64, 64, 64, -64]);
    }

    #[test]
    fn tracker_defaults() {
        let song = Song::default();
        assert_eq!(song.initial_speed, 6);
        assert_eq!(song.initial_tempo, 125);
        assert!(song.order.is_empty());
    }
}
