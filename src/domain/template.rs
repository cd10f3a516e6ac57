//! Noid templates.
//!
//! A template string describes the shape of every identifier a minter
//! produces:
//!
//! ```text
//! [PREFIX "."] ORDER MASK+ ["k"]
//!
//! foo.reedeek
//! └┬┘ │└─┬─┘└── check digit appended
//!  │  │  └───── mask: 'd' = octal digit (3 bits), 'e' = extended symbol (5 bits)
//!  │  └──────── ordering: 'r' random, 's' sequential, 'z' sequential unlimited
//!  └─────────── prefix, joined to the suffix with '.'
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NoidError;

/// Order in which a minter walks its identifier space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ordering {
    /// Deterministic non-repeating permutation of a bounded space.
    Random,
    /// Counting order; fails once the space is used up.
    SequentialLimited,
    /// Counting order; grows extra leading symbols past the mask.
    SequentialUnlimited,
}

impl Ordering {
    /// Map a template ordering character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'r' => Some(Self::Random),
            's' => Some(Self::SequentialLimited),
            'z' => Some(Self::SequentialUnlimited),
            _ => None,
        }
    }

    /// The template character for this ordering.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Random => 'r',
            Self::SequentialLimited => 's',
            Self::SequentialUnlimited => 'z',
        }
    }

    /// Whether the counter is capped by the mask's bit width.
    #[must_use]
    pub const fn is_bounded(self) -> bool {
        !matches!(self, Self::SequentialUnlimited)
    }
}

impl std::fmt::Display for Ordering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::SequentialLimited => write!(f, "sequential"),
            Self::SequentialUnlimited => write!(f, "sequential-unlimited"),
        }
    }
}

/// One position of a template mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskChar {
    /// `d`: one of the 8 symbols `0`-`7`.
    Digit,
    /// `e`: one of the 32 extended symbols.
    Extended,
}

impl MaskChar {
    /// Map a template mask character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'd' => Some(Self::Digit),
            'e' => Some(Self::Extended),
            _ => None,
        }
    }

    /// The template character for this position.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Digit => 'd',
            Self::Extended => 'e',
        }
    }

    /// Bits of counter consumed by one symbol at this position.
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Digit => 3,
            Self::Extended => 5,
        }
    }
}

/// Parsed, immutable template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    raw: String,
    prefix: String,
    ordering: Ordering,
    mask: Vec<MaskChar>,
    has_check_digit: bool,
}

impl Template {
    /// Parse a template string.
    ///
    /// # Errors
    ///
    /// Returns [`NoidError::InvalidOrdering`] if the character after the prefix
    /// is not `r`, `s`, or `z`, and [`NoidError::InvalidMask`] if the mask is
    /// empty or contains anything other than `d` and `e`.
    pub fn parse(template: &str) -> Result<Self, NoidError> {
        let (prefix, body) = template.split_once('.').unwrap_or(("", template));

        let (has_check_digit, body) = body
            .strip_suffix('k')
            .map_or((false, body), |rest| (true, rest));

        let mut chars = body.chars();
        let order_char = chars.next();
        let ordering = order_char.and_then(Ordering::from_char).ok_or_else(|| {
            NoidError::InvalidOrdering(order_char.map(String::from).unwrap_or_default())
        })?;

        let mask_str = chars.as_str();
        if mask_str.is_empty() {
            return Err(NoidError::InvalidMask(String::new()));
        }

        let mask = mask_str
            .chars()
            .map(MaskChar::from_char)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| NoidError::InvalidMask(mask_str.to_string()))?;

        Ok(Self {
            raw: template.to_string(),
            prefix: prefix.to_string(),
            ordering,
            mask,
            has_check_digit,
        })
    }

    /// Template string as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Prefix joined to every identifier (may be empty).
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub const fn ordering(&self) -> Ordering {
        self.ordering
    }

    /// Mask positions, most significant first.
    #[must_use]
    pub fn mask(&self) -> &[MaskChar] {
        &self.mask
    }

    #[must_use]
    pub const fn has_check_digit(&self) -> bool {
        self.has_check_digit
    }

    /// Sum of the bit widths of every mask position.
    #[must_use]
    pub fn total_bits(&self) -> u32 {
        self.mask.iter().map(|c| u32::from(c.bits())).sum()
    }
}

impl FromStr for Template {
    type Err = NoidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
