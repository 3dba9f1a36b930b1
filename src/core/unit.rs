//! Offense units, per-unit-type tables, and board coordinates.
//!
//! The board is `num_paths` columns wide and grows one row per round. A cell
//! is addressed by a single integer `location = y * num_paths + x`; row 0 is
//! the offense's spawn row.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::error::{Error, Result};

/// Unit type. The discriminant is the id used in serialized output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum UnitType {
    Basic = 0,
    Sprinter = 1,
}

impl UnitType {
    /// Number of unit types.
    pub const COUNT: usize = 2;

    /// All unit types, in spawn-source order.
    pub const ALL: [UnitType; Self::COUNT] = [UnitType::Basic, UnitType::Sprinter];

    /// Numeric id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Look up a unit type by id.
    pub fn from_id(id: u8) -> Result<Self> {
        UnitType::ALL
            .into_iter()
            .find(|t| t.id() == id)
            .ok_or(Error::UnknownUnitType { id })
    }
}

impl From<UnitType> for u8 {
    fn from(t: UnitType) -> Self {
        t.id()
    }
}

impl TryFrom<u8> for UnitType {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self> {
        UnitType::from_id(id)
    }
}

/// One value per [`UnitType`], indexed by type.
///
/// Serializes as a plain array in [`UnitType::ALL`] order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitTable<T>(pub [T; UnitType::COUNT]);

impl<T: Copy> UnitTable<T> {
    /// Create a table from values in [`UnitType::ALL`] order.
    #[must_use]
    pub const fn new(values: [T; UnitType::COUNT]) -> Self {
        Self(values)
    }

    /// Iterate `(type, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (UnitType, T)> + '_ {
        UnitType::ALL.into_iter().map(move |t| (t, self[t]))
    }
}

impl<T> Index<UnitType> for UnitTable<T> {
    type Output = T;

    #[inline]
    fn index(&self, t: UnitType) -> &T {
        &self.0[t as usize]
    }
}

impl<T> IndexMut<UnitType> for UnitTable<T> {
    #[inline]
    fn index_mut(&mut self, t: UnitType) -> &mut T {
        &mut self.0[t as usize]
    }
}

/// Remaining spawns available per unit type.
pub type SpawnSourceCounts = UnitTable<u32>;

/// Gold cost to spawn each unit type.
pub type UnitCosts = UnitTable<u32>;

impl SpawnSourceCounts {
    /// Return a copy with one spawn of `t` consumed, or `None` if exhausted.
    #[must_use]
    pub fn decremented(&self, t: UnitType) -> Option<Self> {
        let mut next = *self;
        next[t] = self[t].checked_sub(1)?;
        Some(next)
    }
}

/// Board coordinates of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    /// Decode a location for a board `num_paths` wide.
    #[must_use]
    pub fn from_location(location: u32, num_paths: u32) -> Self {
        Self {
            x: i64::from(location % num_paths),
            y: i64::from(location / num_paths),
        }
    }

    /// Encode back to a location. `None` if off the board.
    #[must_use]
    pub fn to_location(self, num_paths: u32) -> Option<u32> {
        if self.x < 0 || self.x >= i64::from(num_paths) || self.y < 0 {
            return None;
        }
        u32::try_from(self.y * i64::from(num_paths) + self.x).ok()
    }

    /// Offset by `(dx, dy)`.
    #[must_use]
    pub const fn offset(self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// An offense unit on the board.
///
/// Serializes as `"type::location"`, e.g. `"1::3"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Unit {
    pub unit_type: UnitType,
    pub location: u32,
}

impl Unit {
    #[must_use]
    pub const fn new(unit_type: UnitType, location: u32) -> Self {
        Self {
            unit_type,
            location,
        }
    }

    /// Row this unit occupies.
    #[must_use]
    pub const fn row(&self, num_paths: u32) -> u32 {
        self.location / num_paths
    }

    /// Compact `"type::location"` encoding.
    #[must_use]
    pub fn encode(&self) -> String {
        format!("{}::{}", self.unit_type.id(), self.location)
    }

    /// Parse an encoding produced by [`Unit::encode`].
    pub fn decode(encoding: &str) -> Result<Self> {
        let invalid = || Error::InvalidUnitEncoding {
            encoding: encoding.to_string(),
        };
        let (type_part, loc_part) = encoding.split_once("::").ok_or_else(invalid)?;
        let id: u8 = type_part.parse().map_err(|_| invalid())?;
        let location: u32 = loc_part.parse().map_err(|_| invalid())?;
        Ok(Self::new(UnitType::from_id(id)?, location))
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.encode()
    }
}

impl TryFrom<String> for Unit {
    type Error = Error;

    fn try_from(encoding: String) -> Result<Self> {
        Unit::decode(&encoding)
    }
}

/// Units in spawn order. A `Move` action refers to units by index here.
pub type Units = SmallVec<[Unit; 4]>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_type_ids() {
        assert_eq!(UnitType::Basic.id(), 0);
        assert_eq!(UnitType::Sprinter.id(), 1);
        assert_eq!(UnitType::from_id(1).unwrap(), UnitType::Sprinter);
        assert!(matches!(UnitType::from_id(7), Err(Error::UnknownUnitType { id: 7 })));
    }

    #[test]
    fn test_position_roundtrip() {
        let pos = Position::from_location(5, 2);
        assert_eq!(pos, Position { x: 1, y: 2 });
        assert_eq!(pos.to_location(2), Some(5));
    }

    #[test]
    fn test_position_bounds() {
        let origin = Position::from_location(0, 2);
        assert_eq!(origin.offset(-1, 0).to_location(2), None);
        assert_eq!(origin.offset(0, -1).to_location(2), None);
        assert_eq!(origin.offset(2, 0).to_location(2), None);
        assert_eq!(origin.offset(1, 0).to_location(2), Some(1));
        // Rows have no upper bound.
        assert_eq!(origin.offset(0, 10).to_location(2), Some(20));
    }

    #[test]
    fn test_spawn_source_decrement() {
        let counts = SpawnSourceCounts::new([1, 0]);
        let next = counts.decremented(UnitType::Basic).unwrap();
        assert_eq!(next, SpawnSourceCounts::new([0, 0]));
        assert!(counts.decremented(UnitType::Sprinter).is_none());
    }

    #[test]
    fn test_unit_encoding() {
        let unit = Unit::new(UnitType::Sprinter, 3);
        assert_eq!(unit.encode(), "1::3");
        assert_eq!(Unit::decode("1::3").unwrap(), unit);
        assert!(Unit::decode("1:3").is_err());
        assert!(Unit::decode("9::3").is_err());
    }

    #[test]
    fn test_unit_row() {
        assert_eq!(Unit::new(UnitType::Basic, 3).row(2), 1);
        assert_eq!(Unit::new(UnitType::Basic, 1).row(2), 0);
    }

    #[test]
    fn test_serialization() {
        let units: Units = SmallVec::from_slice(&[
            Unit::new(UnitType::Basic, 0),
            Unit::new(UnitType::Sprinter, 3),
        ]);
        let json = serde_json::to_string(&units).unwrap();
        assert_eq!(json, r#"["0::0","1::3"]"#);

        let back: Units = serde_json::from_str(&json).unwrap();
        assert_eq!(back, units);

        let counts = SpawnSourceCounts::new([1, 1]);
        assert_eq!(serde_json::to_string(&counts).unwrap(), "[1,1]");
    }
}
