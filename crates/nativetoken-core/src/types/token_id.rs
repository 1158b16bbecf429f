//! Bit-packed token identifiers
//!
//! A [`TokenId`] is a plain `u32` with the following layout, low bit first:
//!
//! | bits   | field            |
//! |--------|------------------|
//! | 0..20  | unique id        |
//! | 20..27 | reserved (zero)  |
//! | 27..29 | token type       |
//! | 29..32 | version          |
//!
//! Fields are read and written with shifts and masks only, so the encoding
//! does not depend on host endianness.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel returned by the C-shaped API on any failure
pub const INVALID_TOKEN_ID: u64 = 0;

/// Width of the random portion of a token id
pub const TOKEN_UNIQUE_ID_BITS: u32 = 20;
/// Mask selecting the random portion of a token id
pub const TOKEN_UNIQUE_ID_MASK: u32 = (1 << TOKEN_UNIQUE_ID_BITS) - 1;

const RESERVED_SHIFT: u32 = 20;
const RESERVED_MASK: u32 = 0x7f;
const TYPE_SHIFT: u32 = 27;
const TYPE_MASK: u32 = 0x3;
const VERSION_SHIFT: u32 = 29;
const VERSION_MASK: u32 = 0x7;

/// Current token id layout version
pub const DEFAULT_TOKEN_VERSION: u8 = 1;

/// Kind of process a token was issued to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    /// Ordinary native system process
    Native,
    /// The reserved debug-shell process
    Shell,
}

impl TokenType {
    /// Two-bit wire value
    pub fn bits(self) -> u32 {
        match self {
            TokenType::Native => 1,
            TokenType::Shell => 2,
        }
    }

    /// Decode the two-bit wire value
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            1 => Some(TokenType::Native),
            2 => Some(TokenType::Shell),
            _ => None,
        }
    }
}

/// 32-bit packed token identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(u32);

impl TokenId {
    /// Pack a token id from its fields. `unique_id` is truncated to 20 bits.
    pub fn new(unique_id: u32, token_type: TokenType, version: u8) -> Self {
        let raw = (unique_id & TOKEN_UNIQUE_ID_MASK)
            | (token_type.bits() << TYPE_SHIFT)
            | ((u32::from(version) & VERSION_MASK) << VERSION_SHIFT);
        Self(raw)
    }

    /// Wrap a raw value read from disk without checking it
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw packed value
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Random 20-bit portion
    pub fn unique_id(self) -> u32 {
        self.0 & TOKEN_UNIQUE_ID_MASK
    }

    /// Reserved bits; zero for every id this crate produces
    pub fn reserved(self) -> u32 {
        (self.0 >> RESERVED_SHIFT) & RESERVED_MASK
    }

    /// Raw two-bit type field
    pub fn type_bits(self) -> u32 {
        (self.0 >> TYPE_SHIFT) & TYPE_MASK
    }

    /// Decoded type, `None` if the bits name neither native nor shell
    pub fn token_type(self) -> Option<TokenType> {
        TokenType::from_bits(self.type_bits())
    }

    /// Layout version
    pub fn version(self) -> u8 {
        ((self.0 >> VERSION_SHIFT) & VERSION_MASK) as u8
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl From<TokenId> for u32 {
    fn from(id: TokenId) -> Self {
        id.0
    }
}

/// 64-bit token handed back to callers
///
/// The upper 32 bits carry the [`TokenId`], the lower 32 bits the token
/// attribute flags (always zero today).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenIdEx(u64);

impl TokenIdEx {
    /// Pack a token id and its attribute word
    pub fn new(token_id: TokenId, token_attr: u32) -> Self {
        Self((u64::from(token_id.as_u32()) << 32) | u64::from(token_attr))
    }

    /// Raw 64-bit value
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Token id half
    pub fn token_id(self) -> TokenId {
        TokenId((self.0 >> 32) as u32)
    }

    /// Attribute half
    pub fn token_attr(self) -> u32 {
        (self.0 & 0xffff_ffff) as u32
    }
}

impl From<TokenIdEx> for u64 {
    fn from(id: TokenIdEx) -> Self {
        id.0
    }
}

impl fmt::Display for TokenIdEx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
