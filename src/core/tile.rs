//! Tile types and per-type tile counts.
//!
//! ## TileType
//!
//! The closed set of tiles the defense can draw. Each tile has a one-letter
//! symbol used in placement strings (`"BBSS"`) and a fixed canonical position
//! used everywhere counts are enumerated or encoded.
//!
//! ## TileCounts
//!
//! A fixed-size count per tile type. The same shape serves as the bag of
//! undrawn tiles ([`TileBag`]) and as a single round's draw
//! ([`DrawCombination`]). Counts encode to a stable key such as `"4-0-0-0-2"`
//! (canonical order B, C, O, P, S), which is also their serialized form.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use super::error::{Error, Result};

/// A tile the defense can place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileType {
    Blank,
    CageTrap,
    OilTrap,
    PushbackTrap,
    SpikeTrap,
}

impl TileType {
    /// Number of tile types.
    pub const COUNT: usize = 5;

    /// All tile types in canonical (symbol-sorted) order.
    pub const ALL: [TileType; Self::COUNT] = [
        TileType::Blank,
        TileType::CageTrap,
        TileType::OilTrap,
        TileType::PushbackTrap,
        TileType::SpikeTrap,
    ];

    /// Position of this type in [`TileType::ALL`].
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// One-letter symbol used in placement strings.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            TileType::Blank => 'B',
            TileType::CageTrap => 'C',
            TileType::OilTrap => 'O',
            TileType::PushbackTrap => 'P',
            TileType::SpikeTrap => 'S',
        }
    }

    /// Parse a placement symbol.
    pub fn from_symbol(symbol: char) -> Result<Self> {
        TileType::ALL
            .into_iter()
            .find(|t| t.symbol() == symbol)
            .ok_or(Error::UnknownTileSymbol { symbol })
    }

    /// Upper-case name, e.g. `SPIKE_TRAP`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TileType::Blank => "BLANK",
            TileType::CageTrap => "CAGE_TRAP",
            TileType::OilTrap => "OIL_TRAP",
            TileType::PushbackTrap => "PUSHBACK_TRAP",
            TileType::SpikeTrap => "SPIKE_TRAP",
        }
    }
}

impl std::fmt::Display for TileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Count of tiles per [`TileType`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TileCounts([u32; TileType::COUNT]);

/// Tiles still in the bag.
pub type TileBag = TileCounts;

/// Tiles drawn in one round.
pub type DrawCombination = TileCounts;

impl TileCounts {
    /// All counts zero.
    #[must_use]
    pub const fn empty() -> Self {
        Self([0; TileType::COUNT])
    }

    /// Create counts from a raw array in canonical order.
    #[must_use]
    pub const fn from_array(counts: [u32; TileType::COUNT]) -> Self {
        Self(counts)
    }

    /// Create counts from `(type, count)` pairs. Repeated types accumulate.
    #[must_use]
    pub fn from_pairs(pairs: &[(TileType, u32)]) -> Self {
        let mut counts = Self::empty();
        for &(tile, count) in pairs {
            counts[tile] += count;
        }
        counts
    }

    /// Set one type's count.
    #[must_use]
    pub fn with(mut self, tile: TileType, count: u32) -> Self {
        self[tile] = count;
        self
    }

    /// Raw counts in canonical order.
    #[inline]
    #[must_use]
    pub const fn as_array(&self) -> &[u32; TileType::COUNT] {
        &self.0
    }

    /// Total number of tiles.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Check whether every count is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterate over `(type, count)` for types with a non-zero count.
    pub fn iter(&self) -> impl Iterator<Item = (TileType, u32)> + '_ {
        TileType::ALL
            .into_iter()
            .map(|t| (t, self[t]))
            .filter(|&(_, c)| c > 0)
    }

    /// Remove `drawn` from these counts.
    ///
    /// Returns `None` if any type would go negative.
    #[must_use]
    pub fn checked_sub(&self, drawn: &TileCounts) -> Option<TileCounts> {
        let mut out = *self;
        for tile in TileType::ALL {
            out[tile] = self[tile].checked_sub(drawn[tile])?;
        }
        Some(out)
    }

    /// Expand into one symbol per tile, in canonical order.
    #[must_use]
    pub fn to_tiles(&self) -> Vec<TileType> {
        self.iter()
            .flat_map(|(tile, count)| std::iter::repeat(tile).take(count as usize))
            .collect()
    }

    /// Stable key, e.g. `"4-0-0-0-2"`.
    #[must_use]
    pub fn key(&self) -> String {
        self.0
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Parse a key produced by [`TileCounts::key`].
    pub fn from_key(key: &str) -> Result<Self> {
        let invalid = || Error::InvalidTileKey {
            key: key.to_string(),
        };
        let parts: Vec<&str> = key.split('-').collect();
        if parts.len() != TileType::COUNT {
            return Err(invalid());
        }
        let mut counts = Self::empty();
        for (slot, part) in counts.0.iter_mut().zip(parts) {
            *slot = part.parse().map_err(|_| invalid())?;
        }
        Ok(counts)
    }

    /// Readable listing of the non-zero counts, e.g. `BLANK:3, SPIKE_TRAP:1`.
    #[must_use]
    pub fn describe(&self) -> String {
        let parts: Vec<String> = self
            .iter()
            .map(|(tile, count)| format!("{}:{}", tile.name(), count))
            .collect();
        if parts.is_empty() {
            "(none)".to_string()
        } else {
            parts.join(", ")
        }
    }
}

impl Index<TileType> for TileCounts {
    type Output = u32;

    #[inline]
    fn index(&self, tile: TileType) -> &u32 {
        &self.0[tile.index()]
    }
}

impl IndexMut<TileType> for TileCounts {
    #[inline]
    fn index_mut(&mut self, tile: TileType) -> &mut u32 {
        &mut self.0[tile.index()]
    }
}

impl std::fmt::Display for TileCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}

impl From<TileCounts> for String {
    fn from(counts: TileCounts) -> Self {
        counts.key()
    }
}

impl TryFrom<String> for TileCounts {
    type Error = Error;

    fn try_from(key: String) -> Result<Self> {
        TileCounts::from_key(&key)
    }
}

/// Encode a tile sequence as a placement string such as `"BSBS"`.
#[must_use]
pub fn placement_string(tiles: &[TileType]) -> String {
    tiles.iter().map(|t| t.symbol()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order_is_symbol_sorted() {
        let symbols: Vec<char> = TileType::ALL.iter().map(|t| t.symbol()).collect();
        let mut sorted = symbols.clone();
        sorted.sort_unstable();
        assert_eq!(symbols, sorted);

        for (i, tile) in TileType::ALL.iter().enumerate() {
            assert_eq!(tile.index(), i);
        }
    }

    #[test]
    fn test_symbol_roundtrip() {
        for tile in TileType::ALL {
            assert_eq!(TileType::from_symbol(tile.symbol()).unwrap(), tile);
        }
        assert!(matches!(
            TileType::from_symbol('X'),
            Err(Error::UnknownTileSymbol { symbol: 'X' })
        ));
    }

    #[test]
    fn test_key() {
        let bag = TileCounts::from_pairs(&[(TileType::Blank, 4), (TileType::SpikeTrap, 2)]);
        assert_eq!(bag.key(), "4-0-0-0-2");
        assert_eq!(bag.total(), 6);
        assert_eq!(TileCounts::from_key("4-0-0-0-2").unwrap(), bag);
    }

    #[test]
    fn test_bad_keys_rejected() {
        assert!(TileCounts::from_key("4-0-0-2").is_err());
        assert!(TileCounts::from_key("4-0-x-0-2").is_err());
        assert!(TileCounts::from_key("").is_err());
    }

    #[test]
    fn test_checked_sub() {
        let bag = TileCounts::from_pairs(&[(TileType::Blank, 4), (TileType::SpikeTrap, 2)]);
        let draw = TileCounts::from_pairs(&[(TileType::Blank, 3), (TileType::SpikeTrap, 1)]);

        let rest = bag.checked_sub(&draw).unwrap();
        assert_eq!(rest[TileType::Blank], 1);
        assert_eq!(rest[TileType::SpikeTrap], 1);

        let too_many = TileCounts::empty().with(TileType::SpikeTrap, 3);
        assert!(bag.checked_sub(&too_many).is_none());
    }

    #[test]
    fn test_to_tiles_and_placement_string() {
        let draw = TileCounts::from_pairs(&[(TileType::SpikeTrap, 1), (TileType::Blank, 2)]);
        let tiles = draw.to_tiles();
        assert_eq!(placement_string(&tiles), "BBS");
    }

    #[test]
    fn test_describe() {
        let draw = TileCounts::from_pairs(&[(TileType::Blank, 3), (TileType::SpikeTrap, 1)]);
        assert_eq!(draw.describe(), "BLANK:3, SPIKE_TRAP:1");
        assert_eq!(TileCounts::empty().describe(), "(none)");
    }

    #[test]
    fn test_serializes_as_key() {
        let bag = TileCounts::from_pairs(&[(TileType::Blank, 10), (TileType::SpikeTrap, 2)]);
        let json = serde_json::to_string(&bag).unwrap();
        assert_eq!(json, "\"10-0-0-0-2\"");

        let back: TileCounts = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bag);
    }
}
