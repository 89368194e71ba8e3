//! Defines the `Season` enum, the four-way classification of calendar months used
//! for seasonal grouping.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A meteorological season (Northern Hemisphere).
///
/// Seasons are a pure function of the calendar month:
///
/// | Months        | Season   |
/// |---------------|----------|
/// | 12, 1, 2      | `Winter` |
/// | 3, 4, 5       | `Spring` |
/// | 6, 7, 8       | `Summer` |
/// | 9, 10, 11     | `Fall`   |
///
/// The derived `season` column of a normalized table holds the [`Season::as_str`]
/// label of each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// All seasons in calendar order, starting with the one that contains January.
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    /// Classifies a calendar month (1-12).
    ///
    /// # Returns
    ///
    /// * `Some(Season)` for months 1 through 12.
    /// * `None` for any other value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use air_quality::Season;
    ///
    /// assert_eq!(Season::from_month(12), Some(Season::Winter));
    /// assert_eq!(Season::from_month(4), Some(Season::Spring));
    /// assert_eq!(Season::from_month(13), None);
    /// ```
    pub fn from_month(month: u32) -> Option<Self> {
        match month {
            12 | 1 | 2 => Some(Season::Winter),
            3..=5 => Some(Season::Spring),
            6..=8 => Some(Season::Summer),
            9..=11 => Some(Season::Fall),
            _ => None,
        }
    }

    /// The three calendar months belonging to this season.
    pub fn months(self) -> [u32; 3] {
        match self {
            Season::Winter => [12, 1, 2],
            Season::Spring => [3, 4, 5],
            Season::Summer => [6, 7, 8],
            Season::Fall => [9, 10, 11],
        }
    }

    /// The label stored in the `season` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Season::ALL
            .into_iter()
            .find(|season| season.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownOption {
                kind: "season",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_month_maps_to_fixed_season() {
        let expected = [
            (1, Season::Winter),
            (2, Season::Winter),
            (3, Season::Spring),
            (4, Season::Spring),
            (5, Season::Spring),
            (6, Season::Summer),
            (7, Season::Summer),
            (8, Season::Summer),
            (9, Season::Fall),
            (10, Season::Fall),
            (11, Season::Fall),
            (12, Season::Winter),
        ];
        for (month, season) in expected {
            assert_eq!(Season::from_month(month), Some(season), "month {}", month);
        }
        assert_eq!(Season::from_month(0), None);
        assert_eq!(Season::from_month(13), None);
    }

    #[test]
    fn test_months_agree_with_from_month() {
        for season in Season::ALL {
            for month in season.months() {
                assert_eq!(Season::from_month(month), Some(season));
            }
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("summer".parse::<Season>().unwrap(), Season::Summer);
        assert_eq!(" FALL ".parse::<Season>().unwrap(), Season::Fall);
        assert!("autumn".parse::<Season>().is_err());
    }
}
