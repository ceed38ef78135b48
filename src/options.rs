//! Position, background and scale modes with their name lookup tables.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::error::Error;
use crate::processing::color::Color;

/// Where the image is anchored on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    Centered,
    #[default]
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

/// What fills surface pixels the image does not cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    #[default]
    Black,
    White,
    Red,
    Green,
    Blue,
    /// Leave whatever the surface already shows.
    Disabled,
}

/// How the image is resized relative to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMode {
    #[default]
    Disabled,
    Fit,
    Fill,
    Stretch,
}

impl Position {
    pub const ALL: &'static [Self] = &[
        Self::Centered,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
    ];
    const NAMES: &'static [&'static str] = &[
        "centered",
        "top-left",
        "top-right",
        "bottom-right",
        "bottom-left",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Centered => "centered",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
        }
    }
}

impl Background {
    pub const ALL: &'static [Self] = &[
        Self::Black,
        Self::White,
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Disabled,
    ];
    const NAMES: &'static [&'static str] = &["black", "white", "red", "green", "blue", "disabled"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Disabled => "disabled",
        }
    }

    /// Fill color, or `None` when the background is left untouched.
    #[must_use]
    pub const fn color(self) -> Option<Color> {
        match self {
            Self::Black => Some(Color::BLACK),
            Self::White => Some(Color::WHITE),
            Self::Red => Some(Color::RED),
            Self::Green => Some(Color::GREEN),
            Self::Blue => Some(Color::BLUE),
            Self::Disabled => None,
        }
    }
}

impl ScaleMode {
    pub const ALL: &'static [Self] = &[Self::Disabled, Self::Fit, Self::Fill, Self::Stretch];
    const NAMES: &'static [&'static str] = &["disabled", "fit", "fill", "stretch"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Fit => "fit",
            Self::Fill => "fill",
            Self::Stretch => "stretch",
        }
    }
}

// Numeric aliases keep the historical `-pos 0` / `-bg 2` spellings working.
// Index into ALL, so ordering of ALL matters for Position and Background.
fn lookup<T: Copy>(
    kind: &'static str,
    raw: &str,
    all: &[T],
    names: &[&str],
    numeric: usize,
) -> Result<T, Error> {
    let wanted = raw.trim().to_ascii_lowercase();
    if let Some(idx) = names.iter().position(|n| *n == wanted) {
        return Ok(all[idx]);
    }
    if let Ok(idx) = wanted.parse::<usize>()
        && idx < numeric
    {
        return Ok(all[idx]);
    }
    Err(Error::UnknownOption {
        kind,
        value: raw.to_string(),
        expected: names.join(", "),
    })
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup("position", s, Self::ALL, Self::NAMES, Self::ALL.len())
    }
}

impl FromStr for Background {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `disabled` has no numeric alias.
        lookup("background", s, Self::ALL, Self::NAMES, 5)
    }
}

impl FromStr for ScaleMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup("scale mode", s, Self::ALL, Self::NAMES, 0)
    }
}

macro_rules! display_and_deserialize {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                raw.parse()
                    .map_err(|_| de::Error::unknown_variant(&raw, <$ty>::NAMES))
            }
        }
    )*};
}

display_and_deserialize!(Position, Background, ScaleMode);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_display() {
        for p in Position::ALL {
            assert_eq!(p.to_string().parse::<Position>().unwrap(), *p);
        }
        for b in Background::ALL {
            assert_eq!(b.to_string().parse::<Background>().unwrap(), *b);
        }
        for s in ScaleMode::ALL {
            assert_eq!(s.to_string().parse::<ScaleMode>().unwrap(), *s);
        }
    }

    #[test]
    fn numeric_aliases_match_legacy_flags() {
        assert_eq!("0".parse::<Position>().unwrap(), Position::Centered);
        assert_eq!("1".parse::<Position>().unwrap(), Position::TopLeft);
        assert_eq!("4".parse::<Position>().unwrap(), Position::BottomLeft);
        assert_eq!("2".parse::<Background>().unwrap(), Background::Red);
        assert!("5".parse::<Background>().is_err());
        assert!("1".parse::<ScaleMode>().is_err());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!("Top-Right".parse::<Position>().unwrap(), Position::TopRight);
        assert_eq!(" FIT ".parse::<ScaleMode>().unwrap(), ScaleMode::Fit);
    }

    #[test]
    fn unknown_names_report_expected_values() {
        let err = "middle".parse::<Position>().unwrap_err();
        match err {
            Error::UnknownOption { kind, value, expected } => {
                assert_eq!(kind, "position");
                assert_eq!(value, "middle");
                assert!(expected.contains("centered"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn background_colors_are_opaque() {
        for b in Background::ALL {
            if let Some(c) = b.color() {
                assert_eq!(c.a, 0xff);
            }
        }
        assert_eq!(Background::Disabled.color(), None);
    }
}
