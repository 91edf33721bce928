//! Effect command types for tracker patterns.

/// Effect column command.
///
/// This is the normalized command set an Oktalyzer pattern can produce.
/// The raw file commands are remapped into these by the parser; a raw
/// command with no mapping becomes [`Effect::None`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Effect {
    #[default]
    None,
    /// Slide pitch up by amount per tick
    PortaUp(u8),
    /// Slide pitch down by amount per tick
    PortaDown(u8),
    /// Arpeggio: cycle between note, note+x, note+y each tick
    /// (offsets packed in the parameter nibbles)
    Arpeggio(u8),
    /// Extended command byte, ProTracker Exx encoding:
    /// `0x0p` filter toggle, `0xAp` fine volume up, `0xBp` fine volume down
    Extended(u8),
    /// Jump to order position
    PositionJump(u8),
    /// Set ticks per row (speed)
    SetSpeed(u8),
    /// Set channel volume (0-64)
    SetVolume(u8),
    /// Volume slide: down amount in the low nibble, up amount in the high
    VolumeSlide(u8),
}

impl Effect {
    /// Returns the variant name as a static string (ignoring parameters).
    pub fn name(&self) -> &'static str {
        match self {
            Effect::None => "None",
            Effect::PortaUp(_) => "PortaUp",
            Effect::PortaDown(_) => "PortaDown",
            Effect::Arpeggio(_) => "Arpeggio",
            Effect::Extended(_) => "Extended",
            Effect::PositionJump(_) => "PositionJump",
            Effect::SetSpeed(_) => "SetSpeed",
            Effect::SetVolume(_) => "SetVolume",
            Effect::VolumeSlide(_) => "VolumeSlide",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_ignores_parameter() {
        assert_eq!(Effect::PortaUp(3).name(), Effect::PortaUp(0xFF).name());
        assert_eq!(Effect::None.name(), "None");
    }
}
