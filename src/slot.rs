//! Named decode targets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One decode-and-playback target.
///
/// The five drum slots mirror the fixed set of inputs of the preview page;
/// `Single` is the implicit slot used when only one file is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotId {
    Bass,
    HighTom,
    MidTom,
    LowTom,
    HiHat,
    Single,
}

impl SlotId {
    /// The enumerated drum slots, in display order.
    pub const DRUMS: [SlotId; 5] = [
        SlotId::Bass,
        SlotId::HighTom,
        SlotId::MidTom,
        SlotId::LowTom,
        SlotId::HiHat,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SlotId::Bass => "bass",
            SlotId::HighTom => "highTom",
            SlotId::MidTom => "midTom",
            SlotId::LowTom => "lowTom",
            SlotId::HiHat => "hiHat",
            SlotId::Single => "single",
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown slot '{0}' (expected one of bass, highTom, midTom, lowTom, hiHat, single)")]
pub struct UnknownSlot(pub String);

impl FromStr for SlotId {
    type Err = UnknownSlot;

    /// Accepts the slot name in any case, with or without the `Input`
    /// suffix used by the page's element ids (`bassInput`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let key = lower.strip_suffix("input").unwrap_or(&lower);
        let slot = match key {
            "bass" => SlotId::Bass,
            "hightom" => SlotId::HighTom,
            "midtom" => SlotId::MidTom,
            "lowtom" | "floortom" => SlotId::LowTom,
            "hihat" | "hihatclose" => SlotId::HiHat,
            "single" => SlotId::Single,
            _ => return Err(UnknownSlot(s.to_string())),
        };
        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_element_ids() {
        assert_eq!("bass".parse::<SlotId>().unwrap(), SlotId::Bass);
        assert_eq!("highTomInput".parse::<SlotId>().unwrap(), SlotId::HighTom);
        assert_eq!("HIHAT".parse::<SlotId>().unwrap(), SlotId::HiHat);
        assert_eq!("floortom".parse::<SlotId>().unwrap(), SlotId::LowTom);
    }

    #[test]
    fn rejects_unknown_slot() {
        let err = "cowbell".parse::<SlotId>().unwrap_err();
        assert_eq!(err, UnknownSlot("cowbell".to_string()));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for slot in SlotId::DRUMS.iter().chain(std::iter::once(&SlotId::Single)) {
            assert_eq!(slot.to_string().parse::<SlotId>().unwrap(), *slot);
        }
    }
}
