//! Noid minter.
//!
//! Composes a [`Template`] and a [`SuffixGenerator`]: every call to
//! [`Minter::mint`] returns `prefix.suffix[check]` for the current counter and
//! then advances the counter.

use crate::domain::{MinterState, Template};
use crate::error::NoidError;
use crate::service::generator::{ALPHABET, SuffixGenerator, symbol_index};

/// An identifier produced by [`Minter::mint`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Minted {
    noid: String,
    overflow: Option<NoidError>,
}

impl Minted {
    /// The identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.noid
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.noid
    }

    /// Overflow raised while advancing past this identifier.
    ///
    /// `Some` means this was the last identifier of a bounded range.
    #[must_use]
    pub const fn overflow(&self) -> Option<&NoidError> {
        self.overflow.as_ref()
    }

    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.overflow.is_some()
    }
}

impl std::fmt::Display for Minted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.noid)
    }
}

/// Owns one template and the generator walking its identifier space.
#[derive(Debug, Clone)]
pub struct Minter {
    template: Template,
    generator: SuffixGenerator,
    exhausted: bool,
}

impl Minter {
    /// Create a minter starting at sequence 0.
    ///
    /// # Errors
    ///
    /// Returns the template parse error, or [`NoidError::MaskTooWide`] for a
    /// bounded template wider than 64 bits.
    pub fn new(template: &str) -> Result<Self, NoidError> {
        Self::with_sequence(template, 0)
    }

    /// Create a minter starting at `sequence`.
    ///
    /// # Errors
    ///
    /// As [`Minter::new`], plus [`NoidError::SequenceOutOfRange`] if
    /// `sequence` exceeds the template's maximum.
    pub fn with_sequence(template: &str, sequence: u64) -> Result<Self, NoidError> {
        let template = Template::parse(template)?;
        let generator = SuffixGenerator::new(&template, sequence)?;

        Ok(Self {
            template,
            generator,
            exhausted: false,
        })
    }

    /// Rebuild a minter from its persisted record.
    ///
    /// # Errors
    ///
    /// Same as [`Minter::with_sequence`].
    pub fn restore(state: &MinterState) -> Result<Self, NoidError> {
        let mut minter = Self::with_sequence(&state.template, state.sequence)?;
        minter.exhausted = state.exhausted;
        Ok(minter)
    }

    /// The record this minter persists as.
    #[must_use]
    pub fn state(&self) -> MinterState {
        MinterState {
            template: self.template.as_str().to_string(),
            sequence: self.generator.sequence(),
            exhausted: self.exhausted,
        }
    }

    #[must_use]
    pub const fn template(&self) -> &Template {
        &self.template
    }

    /// Counter of the next identifier.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.generator.sequence()
    }

    #[must_use]
    pub const fn max_sequence(&self) -> u64 {
        self.generator.max_sequence()
    }

    /// Identifiers left to mint, or `None` for unlimited templates.
    #[must_use]
    pub fn remaining(&self) -> Option<u64> {
        if !self.template.ordering().is_bounded() {
            return None;
        }
        if self.exhausted {
            return Some(0);
        }
        Some(
            (self.max_sequence() - self.sequence())
                .checked_add(1)
                .unwrap_or(u64::MAX),
        )
    }

    /// Whether the final identifier of a bounded range has been issued.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// The identifier the next [`Minter::mint`] would return, without
    /// advancing.
    #[must_use]
    pub fn peek(&self) -> String {
        let suffix = self.generator.encode();

        let mut noid = if self.template.prefix().is_empty() {
            suffix
        } else {
            format!("{}.{suffix}", self.template.prefix())
        };

        if self.template.has_check_digit() {
            noid.push(check_digit(&noid));
        }

        noid
    }

    /// Mint the identifier for the current counter, then advance.
    ///
    /// The last identifier of a bounded range is still returned; the overflow
    /// raised while advancing past it is reported through
    /// [`Minted::overflow`], and the minter is marked exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`NoidError::Overflow`] if the minter is already exhausted.
    pub fn mint(&mut self) -> Result<Minted, NoidError> {
        if self.exhausted {
            return Err(NoidError::Overflow {
                max: self.max_sequence(),
            });
        }

        let noid = self.peek();
        let overflow = self.generator.next_sequence().err();
        self.exhausted = overflow.is_some();

        Ok(Minted { noid, overflow })
    }
}

/// Position-weighted checksum symbol for `noid`.
///
/// Characters outside the alphabet (the `.` separator, vowels in a prefix)
/// count as zero but still occupy a position.
#[must_use]
pub fn check_digit(noid: &str) -> char {
    let tally = noid
        .chars()
        .enumerate()
        .fold(0usize, |tally, (i, c)| {
            tally.wrapping_add(symbol_index(c).unwrap_or(0).wrapping_mul(i + 1))
        });

    char::from(ALPHABET[tally % ALPHABET.len()])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mint(minter: &mut Minter) -> String {
        minter.mint().unwrap().into_string()
    }

    #[test]
    fn test_minting() {
        let mut minter = Minter::new("foo.seedee").unwrap();
        assert_eq!(mint(&mut minter), "foo.00000");

        for _ in 0..1000 {
            mint(&mut minter);
        }
        assert_eq!(mint(&mut minter), "foo.000z9");
    }

    #[test]
    fn test_minting_with_no_prefix() {
        let mut minter = Minter::new("zee").unwrap();
        assert_eq!(mint(&mut minter), "00");

        for _ in 0..1000 {
            mint(&mut minter);
        }
        assert_eq!(mint(&mut minter), "z9");
    }

    #[test]
    fn test_check_digits() {
        let cases = [
            ("foo.seedeek", 0, "foo.00000f"),
            ("foo.seedeek", 1001, "foo.000z9r"),
            ("bar.seedeek", 0, "bar.000004"),
            ("bar.seedeek", 1001, "bar.000z9d"),
        ];

        for (template, sequence, expected) in cases {
            let mut minter = Minter::with_sequence(template, sequence).unwrap();
            assert_eq!(mint(&mut minter), expected, "{template} @ {sequence}");
        }
    }

    #[test]
    fn test_check_digit_counts_prefix_positions() {
        assert_eq!(check_digit("foo.00000"), 'f');
        // Same suffix, different prefix length shifts every weight.
        assert_ne!(check_digit("x.000z9"), check_digit("xx.000z9"));
    }

    #[test]
    fn test_template_width_limit() {
        assert!(Minter::new("redededededededed").is_ok());
        assert_eq!(
            Minter::new("reeeeeeeeeeeeee").unwrap_err(),
            NoidError::MaskTooWide { bits: 70 }
        );
        assert_eq!(
            Minter::new("reeeeeeeeeeeee").unwrap_err(),
            NoidError::MaskTooWide { bits: 65 }
        );
    }

    #[test]
    fn test_construction_errors() {
        assert!(matches!(
            Minter::new("foo.qdd"),
            Err(NoidError::InvalidOrdering(_))
        ));
        assert!(matches!(
            Minter::with_sequence("sdd", 64),
            Err(NoidError::SequenceOutOfRange { .. })
        ));
    }

    #[test]
    fn test_peek_does_not_advance() {
        let minter = Minter::with_sequence("foo.reedeek", 99).unwrap();
        assert_eq!(minter.peek(), minter.peek());
        assert_eq!(minter.sequence(), 99);
    }

    #[test]
    fn test_mint_matches_peek() {
        let mut minter = Minter::new("bar.reek").unwrap();
        for _ in 0..50 {
            let expected = minter.peek();
            assert_eq!(mint(&mut minter), expected);
        }
        assert_eq!(minter.sequence(), 50);
    }

    #[test]
    fn test_last_identifier_is_not_lost() {
        let mut minter = Minter::with_sequence("sd", 6).unwrap();

        let sixth = minter.mint().unwrap();
        assert_eq!(sixth.as_str(), "6");
        assert!(!sixth.is_last());

        let last = minter.mint().unwrap();
        assert_eq!(last.as_str(), "7");
        assert_eq!(last.overflow(), Some(&NoidError::Overflow { max: 7 }));
        assert!(minter.is_exhausted());
        assert_eq!(minter.remaining(), Some(0));

        assert_eq!(minter.mint(), Err(NoidError::Overflow { max: 7 }));
        assert_eq!(minter.sequence(), 7);
    }

    #[test]
    fn test_state_round_trip() {
        let mut minter = Minter::new("foo.reedeek").unwrap();
        for _ in 0..17 {
            mint(&mut minter);
        }

        let state = minter.state();
        assert_eq!(state, MinterState::new("foo.reedeek", 17));

        let mut restored = Minter::restore(&state).unwrap();
        assert_eq!(mint(&mut restored), mint(&mut minter));
    }

    #[test]
    fn test_exhausted_state_round_trip() {
        let mut minter = Minter::with_sequence("sd", 7).unwrap();
        mint(&mut minter);

        let state = minter.state();
        assert!(state.exhausted);

        let mut restored = Minter::restore(&state).unwrap();
        assert!(restored.mint().is_err());
    }

    #[test]
    fn test_remaining() {
        assert_eq!(Minter::new("sdd").unwrap().remaining(), Some(64));
        assert_eq!(Minter::with_sequence("sdd", 60).unwrap().remaining(), Some(4));
        assert_eq!(Minter::new("zdd").unwrap().remaining(), None);
        assert_eq!(
            Minter::new("redededededededed").unwrap().remaining(),
            Some(u64::MAX)
        );
    }
}
