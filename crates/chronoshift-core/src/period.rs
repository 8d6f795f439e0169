//! Time Periods
//!
//! The three overlapping world configurations a player shifts between, the
//! static registry of their display metadata, and the period sets that tag
//! which configurations an entity exists in.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// One of the three mutually exclusive world configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    Past,
    #[default]
    Present,
    Future,
}

impl TimePeriod {
    /// Every period in timeline order
    pub const ALL: [TimePeriod; 3] = [TimePeriod::Past, TimePeriod::Present, TimePeriod::Future];

    /// Lowercase identifier used in configuration and level data
    pub fn name(self) -> &'static str {
        match self {
            Self::Past => "past",
            Self::Present => "present",
            Self::Future => "future",
        }
    }

    /// Registry entry for this period
    pub fn info(self) -> &'static PeriodInfo {
        period_info(self)
    }

    fn index(self) -> usize {
        match self {
            Self::Past => 0,
            Self::Present => 1,
            Self::Future => 2,
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().label)
    }
}

impl FromStr for TimePeriod {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        TimePeriod::ALL
            .into_iter()
            .find(|period| period.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::InvalidPeriod(s.to_string()))
    }
}

/// Display metadata for a period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodInfo {
    /// HUD label
    pub label: &'static str,
    /// Ambient light and portal tint (0xRRGGBB)
    pub ambient_color: u32,
    /// Fog tint (0xRRGGBB)
    pub fog_color: u32,
}

static REGISTRY: [PeriodInfo; 3] = [
    PeriodInfo { label: "PAST", ambient_color: 0x8B4513, fog_color: 0x4A3520 },
    PeriodInfo { label: "PRESENT", ambient_color: 0x00FFFF, fog_color: 0x1A1A2E },
    PeriodInfo { label: "FUTURE", ambient_color: 0xFF00FF, fog_color: 0x2A1A3E },
];

/// Look up the display metadata for a period
pub fn period_info(period: TimePeriod) -> &'static PeriodInfo {
    &REGISTRY[period.index()]
}

/// Look up the display metadata for a period by name
pub fn period_info_by_name(name: &str) -> CoreResult<&'static PeriodInfo> {
    let period: TimePeriod = name.parse()?;
    Ok(period_info(period))
}

bitflags! {
    /// Periods an entity exists in. The empty set means "always present".
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct PeriodSet: u8 {
        const PAST = 0b001;
        const PRESENT = 0b010;
        const FUTURE = 0b100;
    }
}

impl PeriodSet {
    /// Entities tagged with no period exist in all of them (the ground)
    pub const ALWAYS: Self = Self::empty();

    /// Whether an entity tagged with this set is active in `period`
    pub fn is_active_in(self, period: TimePeriod) -> bool {
        self.is_empty() || self.contains(PeriodSet::from(period))
    }
}

impl From<TimePeriod> for PeriodSet {
    fn from(period: TimePeriod) -> Self {
        match period {
            TimePeriod::Past => PeriodSet::PAST,
            TimePeriod::Present => PeriodSet::PRESENT,
            TimePeriod::Future => PeriodSet::FUTURE,
        }
    }
}
