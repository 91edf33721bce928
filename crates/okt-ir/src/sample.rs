//! Sample data types.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

/// A sample definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    /// Sample name, the record's 20-byte field copied verbatim.
    /// Not necessarily NUL-terminated or valid UTF-8.
    pub name: [u8; 20],
    /// Declared length in bytes (always even)
    pub length: u32,
    /// Loop start position (in samples)
    pub loop_start: u32,
    /// Loop end position (in samples)
    pub loop_end: u32,
    /// Loop type
    pub loop_type: LoopType,
    /// Default volume (0-256 full scale, the record's 7-bit volume
    /// scaled up by two bits)
    pub volume: u16,
    /// Global volume (0-64)
    pub global_volume: u8,
    /// Frequency of C-4 in Hz (8363, the Amiga reference rate)
    pub c4_speed: u32,
    /// Audio data, empty until the sample-data chunks are decoded
    pub data: SampleData,
}

impl Default for Sample {
    fn default() -> Self {
        Self {
            name: [0; 20],
            length: 0,
            loop_start: 0,
            loop_end: 0,
            loop_type: LoopType::None,
            volume: 0,
            global_volume: 64,
            c4_speed: 8363,
            data: SampleData::Mono8(Vec::new()),
        }
    }
}

impl Sample {
    /// Printable view of the name: cut at the first NUL, lossy UTF-8.
    pub fn name_str(&self) -> Cow<'_, str> {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.name.len());
        String::from_utf8_lossy(&self.name[..end])
    }

    /// Get the length of the decoded data in frames.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the sample has no decoded data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if the sample has a loop.
    pub fn has_loop(&self) -> bool {
        self.loop_type != LoopType::None && self.loop_end > self.loop_start
    }
}

/// Sample audio data.
///
/// Oktalyzer sample bodies are mono signed 8-bit PCM; the single arm keeps
/// the accessors format-shaped for the engine side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SampleData {
    /// 8-bit mono samples
    Mono8(Vec<i8>),
}

impl SampleData {
    /// Get the number of sample frames.
    pub fn len(&self) -> usize {
        match self {
            SampleData::Mono8(v) => v.len(),
        }
    }

    /// Returns true if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a sample value at position (as i16, zero past the end).
    pub fn get_mono(&self, pos: usize) -> i16 {
        match self {
            SampleData::Mono8(v) => v.get(pos).copied().unwrap_or(0) as i16 * 256,
        }
    }
}

/// Sample loop type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopType {
    /// No loop
    #[default]
    None,
    /// Forward loop
    Forward,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_str_cuts_at_nul() {
        let mut sample = Sample::default();
        sample.name[..5].copy_from_slice(b"bass\0");
        sample.name[5] = b'x'; // trailing junk past the terminator
        assert_eq!(sample.name_str(), "bass");
    }

    #[test]
    fn name_str_full_width_without_nul() {
        let mut sample = Sample::default();
        sample.name.copy_from_slice(b"abcdefghijklmnopqrst");
        assert_eq!(sample.name_str(), "abcdefghijklmnopqrst");
    }

    #[test]
    fn has_loop_requires_forward_type_and_range() {
        let mut sample = Sample::default();
        sample.loop_start = 4;
        sample.loop_end = 12;
        assert!(!sample.has_loop());

        sample.loop_type = LoopType::Forward;
        assert!(sample.has_loop());
    }

    #[test]
    fn get_mono_scales_and_clips() {
        let data = SampleData::Mono8(alloc::vec![0, 100, -50]);
        assert_eq!(data.get_mono(1), 100 * 256);
        assert_eq!(data.get_mono(99), 0);
    }
}
