//! Request address decomposition.
//!
//! A request address is a flat word address laid out, from most to least
//! significant, as `{bank, row, column}`. This module provides:
//! 1. **`AddressMap`:** The configured bit widths and the decode/encode functions.
//! 2. **`DecodedAddress`:** The `{bank, row, column}` triple derived from a request.
//!
//! Decoding is a pure function. The scheduler recomputes it from the held request
//! whenever it needs it instead of storing a second copy.

use crate::config::GeometryConfig;

/// Bank, row and column of a request address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct DecodedAddress {
    /// Bank select.
    pub bank: u32,
    /// Row within the bank.
    pub row: u32,
    /// Column within the row.
    pub col: u32,
}

/// Bit widths used to split a request address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressMap {
    bank_bits: u32,
    row_bits: u32,
    col_bits: u32,
}

impl AddressMap {
    /// Creates an address map from explicit widths.
    pub const fn new(bank_bits: u32, row_bits: u32, col_bits: u32) -> Self {
        Self {
            bank_bits,
            row_bits,
            col_bits,
        }
    }

    /// Creates an address map from the geometry section of the configuration.
    pub const fn from_geometry(geometry: &GeometryConfig) -> Self {
        Self::new(geometry.bank_bits, geometry.row_bits, geometry.col_bits)
    }

    /// Splits a request address. Bits above the bank field are ignored.
    #[inline]
    pub const fn decode(&self, address: u64) -> DecodedAddress {
        let col = address & mask(self.col_bits);
        let row = (address >> self.col_bits) & mask(self.row_bits);
        let bank = (address >> (self.col_bits + self.row_bits)) & mask(self.bank_bits);
        DecodedAddress {
            bank: bank as u32,
            row: row as u32,
            col: col as u32,
        }
    }

    /// Builds a request address from its parts (inverse of [`Self::decode`]).
    #[inline]
    pub const fn encode(&self, bank: u32, row: u32, col: u32) -> u64 {
        ((bank as u64 & mask(self.bank_bits)) << (self.row_bits + self.col_bits))
            | ((row as u64 & mask(self.row_bits)) << self.col_bits)
            | (col as u64 & mask(self.col_bits))
    }
}

const fn mask(bits: u32) -> u64 {
    if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }
}
