use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Camera facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CameraPosition {
    Front,
    #[default]
    #[serde(alias = "back")]
    Rear,
}

impl CameraPosition {
    /// The camera on the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            CameraPosition::Front => CameraPosition::Rear,
            CameraPosition::Rear => CameraPosition::Front,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CameraPosition::Front => "front",
            CameraPosition::Rear => "rear",
        }
    }
}

impl fmt::Display for CameraPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Torch state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TorchMode {
    #[default]
    Off,
    On,
}

impl TorchMode {
    pub fn toggled(&self) -> Self {
        match self {
            TorchMode::Off => TorchMode::On,
            TorchMode::On => TorchMode::Off,
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, TorchMode::On)
    }
}

/// Focus and exposure settings applied when a session starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusSettings {
    /// Focus point of interest in unit coordinates
    pub point_of_interest: Point,
    pub continuous_autofocus: bool,
    pub continuous_auto_exposure: bool,
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            point_of_interest: Point::new(0.5, 0.45),
            continuous_autofocus: true,
            continuous_auto_exposure: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_opposite() {
        assert_eq!(CameraPosition::Front.opposite(), CameraPosition::Rear);
        assert_eq!(CameraPosition::Rear.opposite(), CameraPosition::Front);
        assert_eq!(CameraPosition::default(), CameraPosition::Rear);
    }

    #[test]
    fn test_position_deserializes_back_alias() {
        let position: CameraPosition = serde_json::from_str("\"back\"").unwrap();
        assert_eq!(position, CameraPosition::Rear);
        let position: CameraPosition = serde_json::from_str("\"front\"").unwrap();
        assert_eq!(position, CameraPosition::Front);
    }

    #[test]
    fn test_torch_toggle() {
        assert_eq!(TorchMode::Off.toggled(), TorchMode::On);
        assert_eq!(TorchMode::On.toggled(), TorchMode::Off);
        assert!(!TorchMode::default().is_on());
    }
}
