//! Hourly status codes and their half-hour interpretation.
//!
//! The feed describes each clock hour with a short code. Every code maps to
//! a pair of half-hour power states. Codes the feed marks as uncertain
//! ("maybe") go through an [`UncertaintyPolicy`]; everything we do not
//! recognise is treated as powered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;

/// Status used for an hour the feed says nothing about.
///
/// Gaps in the feed must never render as outages.
pub const MISSING_HOUR_STATUS: StatusCode = StatusCode::On;

/// Power status of one clock hour, as published by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusCode {
    /// `yes`: power for the whole hour.
    On,
    /// `no`: no power for the whole hour.
    Off,
    /// `first`: no power during the first 30 minutes.
    OffFirstHalf,
    /// `second`: no power during the last 30 minutes.
    OffSecondHalf,
    /// `maybe`: an outage is possible during the hour.
    Maybe,
    /// `mfirst`: an outage is possible during the first 30 minutes.
    MaybeFirstHalf,
    /// `msecond`: an outage is possible during the last 30 minutes.
    MaybeSecondHalf,
    /// Anything else.
    Unknown,
}

impl StatusCode {
    /// Parse a feed code. Unrecognised strings become [`StatusCode::Unknown`].
    pub fn from_feed(code: &str) -> Self {
        match code {
            "yes" => StatusCode::On,
            "no" => StatusCode::Off,
            "first" => StatusCode::OffFirstHalf,
            "second" => StatusCode::OffSecondHalf,
            "maybe" => StatusCode::Maybe,
            "mfirst" => StatusCode::MaybeFirstHalf,
            "msecond" => StatusCode::MaybeSecondHalf,
            _ => StatusCode::Unknown,
        }
    }

    /// The feed spelling of this code (`"unknown"` for [`StatusCode::Unknown`]).
    pub fn feed_code(&self) -> &'static str {
        match self {
            StatusCode::On => "yes",
            StatusCode::Off => "no",
            StatusCode::OffFirstHalf => "first",
            StatusCode::OffSecondHalf => "second",
            StatusCode::Maybe => "maybe",
            StatusCode::MaybeFirstHalf => "mfirst",
            StatusCode::MaybeSecondHalf => "msecond",
            StatusCode::Unknown => "unknown",
        }
    }

    /// True for the `maybe` family.
    pub fn is_uncertain(&self) -> bool {
        matches!(
            self,
            StatusCode::Maybe | StatusCode::MaybeFirstHalf | StatusCode::MaybeSecondHalf
        )
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.feed_code())
    }
}

impl<'de> Deserialize<'de> for StatusCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Non-string values (null, numbers) must not fail the whole document.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Other(serde::de::IgnoredAny),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(code) => StatusCode::from_feed(&code),
            Raw::Other(_) => StatusCode::Unknown,
        })
    }
}

/// How the `maybe` family of codes resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UncertaintyPolicy {
    /// Possible outages are reported as power present.
    #[default]
    Optimistic,
    /// Possible outages are reported as power absent.
    Pessimistic,
}

impl UncertaintyPolicy {
    /// Whether the uncertain part of `code` counts as powered.
    ///
    /// Codes outside the `maybe` family carry no uncertainty and always
    /// answer `true`; [`interpret`] only asks about uncertain halves.
    pub fn resolves_to_powered(&self, code: StatusCode) -> bool {
        if !code.is_uncertain() {
            return true;
        }
        match self {
            UncertaintyPolicy::Optimistic => true,
            UncertaintyPolicy::Pessimistic => false,
        }
    }
}

impl FromStr for UncertaintyPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Ok(UncertaintyPolicy::Optimistic),
            "pessimistic" => Ok(UncertaintyPolicy::Pessimistic),
            other => Err(CoreError::Config(format!(
                "unknown maybe policy '{other}' (expected optimistic or pessimistic)"
            ))),
        }
    }
}

/// Power state of the two halves of one clock hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfHours {
    pub first: bool,
    pub second: bool,
}

impl HalfHours {
    const fn new(first: bool, second: bool) -> Self {
        Self { first, second }
    }
}

/// Map one hourly code to its half-hour power states.
pub fn interpret(code: StatusCode, policy: UncertaintyPolicy) -> HalfHours {
    match code {
        StatusCode::On | StatusCode::Unknown => HalfHours::new(true, true),
        StatusCode::Off => HalfHours::new(false, false),
        StatusCode::OffFirstHalf => HalfHours::new(false, true),
        StatusCode::OffSecondHalf => HalfHours::new(true, false),
        StatusCode::Maybe => {
            let powered = policy.resolves_to_powered(code);
            HalfHours::new(powered, powered)
        }
        StatusCode::MaybeFirstHalf => HalfHours::new(policy.resolves_to_powered(code), true),
        StatusCode::MaybeSecondHalf => HalfHours::new(true, policy.resolves_to_powered(code)),
    }
}
