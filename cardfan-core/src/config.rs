use std::error::Error;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::drop_zone::DropZoneConfig;
use crate::fan::FanConfig;

/// Everything the tabletop needs to lay itself out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub fan: FanConfig,
    pub drop_zone: DropZoneConfig,
    pub min_start_cards: usize,
    pub max_start_cards: usize,
    pub card_size: Vec2,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            fan: FanConfig::default(),
            drop_zone: DropZoneConfig::default(),
            min_start_cards: 4,
            max_start_cards: 8,
            card_size: Vec2::new(110.0, 150.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    EmptyDeal,
    StartRangeInverted,
    SpreadStepNotPositive,
    ThresholdTooSmall,
    ZoneSpacingNotPositive,
    ZoneSizeNotPositive,
}

impl ConfigError {
    pub fn message(&self) -> &'static str {
        match self {
            ConfigError::EmptyDeal => "the opening deal must contain at least one card",
            ConfigError::StartRangeInverted => "min_start_cards must not exceed max_start_cards",
            ConfigError::SpreadStepNotPositive => "spread_step must be positive",
            ConfigError::ThresholdTooSmall => "proportional_min_cards must be at least 2",
            ConfigError::ZoneSpacingNotPositive => "drop zone spacing must be positive",
            ConfigError::ZoneSizeNotPositive => "drop zone size must be positive on both axes",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Error for ConfigError {}

impl TableConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_start_cards == 0 {
            return Err(ConfigError::EmptyDeal);
        }
        if self.min_start_cards > self.max_start_cards {
            return Err(ConfigError::StartRangeInverted);
        }
        if self.fan.spread_step <= 0.0 {
            return Err(ConfigError::SpreadStepNotPositive);
        }
        // A threshold of one would divide by zero in the layout math.
        if self.fan.proportional_min_cards < 2 {
            return Err(ConfigError::ThresholdTooSmall);
        }
        if self.drop_zone.spacing <= 0.0 {
            return Err(ConfigError::ZoneSpacingNotPositive);
        }
        if self.drop_zone.size.x <= 0.0 || self.drop_zone.size.y <= 0.0 {
            return Err(ConfigError::ZoneSizeNotPositive);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(TableConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_parameters() {
        let mut config = TableConfig::default();
        config.min_start_cards = 0;
        assert_eq!(config.validate(), Err(ConfigError::EmptyDeal));

        let mut config = TableConfig::default();
        config.min_start_cards = 9;
        config.max_start_cards = 3;
        assert_eq!(config.validate(), Err(ConfigError::StartRangeInverted));

        let mut config = TableConfig::default();
        config.fan.spread_step = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::SpreadStepNotPositive));

        let mut config = TableConfig::default();
        config.fan.proportional_min_cards = 1;
        assert_eq!(config.validate(), Err(ConfigError::ThresholdTooSmall));

        let mut config = TableConfig::default();
        config.drop_zone.spacing = -1.0;
        assert_eq!(config.validate(), Err(ConfigError::ZoneSpacingNotPositive));

        let mut config = TableConfig::default();
        config.drop_zone.size = Vec2::new(100.0, 0.0);
        assert_eq!(config.validate(), Err(ConfigError::ZoneSizeNotPositive));
    }

    #[test]
    fn errors_carry_readable_messages() {
        assert_eq!(
            ConfigError::ThresholdTooSmall.to_string(),
            "proportional_min_cards must be at least 2"
        );
    }
}
