//! Suffix generator.
//!
//! Turns a counter into the suffix half of a noid. Each mask position takes a
//! fixed number of low-order bits from the working value: 3 bits for a `d`
//! position, 5 bits for an `e` position. The least significant position is
//! consumed first and the symbols are emitted most significant first.
//!
//! For random ordering the counter is first pushed through a fixed
//! permutation of its bit positions, so consecutive counters produce
//! unrelated looking suffixes while every value in the range is still
//! produced exactly once.

use crate::domain::{Ordering, Template};
use crate::error::NoidError;

/// Symbols in index order. `d` positions only use the first eight.
pub const ALPHABET: &[u8; 32] = b"0123456789abcdfghjkmnpqrstuvwxyz";

/// Counter state and the mask metadata needed to encode it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixGenerator {
    sequence: u64,
    max_sequence: u64,
    /// Bit width per mask position, least significant position first.
    bit_widths: Vec<u8>,
    total_bits: u32,
    ordering: Ordering,
}

impl SuffixGenerator {
    /// Create a generator for `template` starting at `sequence`.
    ///
    /// # Errors
    ///
    /// Returns [`NoidError::MaskTooWide`] if a bounded template needs more
    /// than 64 bits, and [`NoidError::SequenceOutOfRange`] if `sequence`
    /// exceeds the template's maximum.
    pub fn new(template: &Template, sequence: u64) -> Result<Self, NoidError> {
        let bit_widths: Vec<u8> = template.mask().iter().rev().map(|c| c.bits()).collect();
        let total_bits = template.total_bits();
        let ordering = template.ordering();

        let max_sequence = if ordering.is_bounded() {
            max_for_bits(total_bits)?
        } else {
            u64::MAX
        };

        if sequence > max_sequence {
            return Err(NoidError::SequenceOutOfRange {
                sequence,
                max: max_sequence,
            });
        }

        Ok(Self {
            sequence,
            max_sequence,
            bit_widths,
            total_bits,
            ordering,
        })
    }

    /// Current counter value.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Largest counter value this generator accepts.
    #[must_use]
    pub const fn max_sequence(&self) -> u64 {
        self.max_sequence
    }

    /// Sum of the mask's bit widths.
    #[must_use]
    pub const fn total_bits(&self) -> u32 {
        self.total_bits
    }

    #[must_use]
    pub const fn ordering(&self) -> Ordering {
        self.ordering
    }

    /// Encode the current counter. Never changes the counter.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut value = match self.ordering {
            Ordering::Random => self.permuted(),
            Ordering::SequentialLimited | Ordering::SequentialUnlimited => self.sequence,
        };

        let mut symbols = Vec::with_capacity(self.bit_widths.len());
        for &bits in &self.bit_widths {
            symbols.push(symbol(value, bits));
            value >>= bits;
        }

        // Only reachable for unlimited ordering: keep growing to the left
        // using the most significant position's width.
        if let Some(&bits) = self.bit_widths.last() {
            while value != 0 {
                symbols.push(symbol(value, bits));
                value >>= bits;
            }
        }

        symbols.iter().rev().map(|&b| char::from(b)).collect()
    }

    /// Advance the counter by one.
    ///
    /// # Errors
    ///
    /// Returns [`NoidError::Overflow`] if the counter is already at its
    /// maximum; the counter is left unchanged.
    pub fn next_sequence(&mut self) -> Result<(), NoidError> {
        if self.sequence == self.max_sequence {
            return Err(NoidError::Overflow {
                max: self.max_sequence,
            });
        }
        self.sequence += 1;
        Ok(())
    }

    /// Apply the random-ordering permutation to the current counter.
    ///
    /// Every step is an XOR with a constant or a swap of two bit positions
    /// below `total_bits`, so the result is a bijection on `[0, max_sequence]`.
    fn permuted(&self) -> u64 {
        let width = self.total_bits;
        let max_bit = width - 1;

        let xor = diffusion_mask(self.max_sequence);
        let mut seed = xor;
        let mut value = self.sequence ^ xor;

        value = bit_swap(value, 0, max_bit - 1);
        value = bit_swap(value, 1, max_bit / 2);

        for i in 3..max_bit {
            #[allow(clippy::cast_possible_truncation)]
            let target = (seed % u64::from(width)) as u32;
            value = bit_swap(value, i, target);
            seed >>= 1;
        }

        value
    }
}

/// Swap bit positions `b1` and `b2` of `value`.
///
/// The order of the two positions does not matter; swapping a position with
/// itself, or two positions holding the same bit, returns `value` unchanged.
#[must_use]
pub const fn bit_swap(value: u64, b1: u32, b2: u32) -> u64 {
    let (lo, hi) = if b1 <= b2 { (b1, b2) } else { (b2, b1) };
    if lo == hi {
        return value;
    }

    if ((value >> lo) ^ (value >> hi)) & 1 == 1 {
        value ^ ((1 << lo) | (1 << hi))
    } else {
        value
    }
}

/// Index of `c` in [`ALPHABET`], if it is a noid symbol.
#[must_use]
pub fn symbol_index(c: char) -> Option<usize> {
    ALPHABET.iter().position(|&b| char::from(b) == c)
}

/// Largest counter for a bounded mask of `bits` total width.
const fn max_for_bits(bits: u32) -> Result<u64, NoidError> {
    match bits {
        0..=63 => Ok((1 << bits) - 1),
        64 => Ok(u64::MAX),
        _ => Err(NoidError::MaskTooWide { bits }),
    }
}

/// `max * 2 / 3`: the alternating `1010...` pattern across the mask width.
///
/// Computed in 128 bits so a full 64-bit mask keeps the pattern instead of
/// wrapping.
#[allow(clippy::cast_possible_truncation)]
const fn diffusion_mask(max: u64) -> u64 {
    ((max as u128) * 2 / 3) as u64
}

#[allow(clippy::cast_possible_truncation)]
const fn symbol(value: u64, bits: u8) -> u8 {
    let index = value & ((1 << bits) - 1);
    ALPHABET[index as usize]
}
