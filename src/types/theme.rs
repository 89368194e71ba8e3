//! Plot styling choices offered to the user.
//!
//! These values never touch the data. They are carried unchanged from the request
//! into every [`crate::View`] so the presentation layer can style each chart
//! without relying on ambient global state.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! theme_option {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|option| option.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| ConfigError::UnknownOption {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

theme_option!(
    /// Background/grid style of a chart.
    PlotStyle, "style", {
        DarkGrid => "darkgrid",
        WhiteGrid => "whitegrid",
        Dark => "dark",
        White => "white",
        Ticks => "ticks",
    }
);

theme_option!(
    /// Scaling context for fonts and line widths.
    PlotContext, "context", {
        Paper => "paper",
        Notebook => "notebook",
        Talk => "talk",
        Poster => "poster",
    }
);

theme_option!(
    /// Color palette used for per-station series.
    Palette, "palette", {
        Deep => "deep",
        Muted => "muted",
        Bright => "bright",
        Pastel => "pastel",
        Dark => "dark",
        Colorblind => "colorblind",
    }
);

/// The full set of styling choices for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotTheme {
    pub style: PlotStyle,
    pub context: PlotContext,
    pub palette: Palette,
}
