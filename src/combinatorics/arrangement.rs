//! Distinguishable arrangements of a drawn multiset over ordered board slots.

use serde::{Deserialize, Serialize};

use crate::core::{placement_string, DrawCombination, Error, Result, TileType};

/// One ordering of a draw over the board slots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Arrangement {
    /// One tile per slot.
    pub tiles: Vec<TileType>,

    /// `1 / (number of distinct arrangements)` for the draw.
    pub probability: f64,
}

impl Arrangement {
    /// Symbol string, e.g. `"BSSB"`.
    #[must_use]
    pub fn placement(&self) -> String {
        placement_string(&self.tiles)
    }

    /// The multiset this arrangement uses.
    #[must_use]
    pub fn combination(&self) -> DrawCombination {
        let mut counts = DrawCombination::empty();
        for &tile in &self.tiles {
            counts[tile] += 1;
        }
        counts
    }
}

/// Every distinct ordering of `combination` into `num_locations` slots.
///
/// Yields `n! / Π count_i!` arrangements in lexicographic symbol order; equal
/// tiles are never swapped into a duplicate. Fails with
/// [`Error::ArrangementSizeMismatch`] when the draw does not fill the slots.
pub fn enumerate_arrangements(
    combination: &DrawCombination,
    num_locations: u32,
) -> Result<Vec<Arrangement>> {
    let size = combination.total();
    if size != num_locations {
        return Err(Error::ArrangementSizeMismatch {
            combination: size,
            locations: num_locations,
        });
    }

    let mut orderings = Vec::new();
    let mut remaining = *combination;
    let mut current = Vec::with_capacity(num_locations as usize);
    permute(&mut remaining, &mut current, num_locations as usize, &mut orderings);

    let probability = 1.0 / orderings.len() as f64;
    Ok(orderings
        .into_iter()
        .map(|tiles| Arrangement { tiles, probability })
        .collect())
}

// Picking by type rather than by tile position means each distinct symbol is
// tried once per slot, so duplicates never arise.
fn permute(
    remaining: &mut DrawCombination,
    current: &mut Vec<TileType>,
    target: usize,
    out: &mut Vec<Vec<TileType>>,
) {
    if current.len() == target {
        out.push(current.clone());
        return;
    }

    for tile in TileType::ALL {
        if remaining[tile] == 0 {
            continue;
        }
        remaining[tile] -= 1;
        current.push(tile);
        permute(remaining, current, target, out);
        current.pop();
        remaining[tile] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combo(blank: u32, spike: u32) -> DrawCombination {
        DrawCombination::empty()
            .with(TileType::Blank, blank)
            .with(TileType::SpikeTrap, spike)
    }

    #[test]
    fn test_two_by_two() {
        let arrangements = enumerate_arrangements(&combo(2, 2), 4).unwrap();
        let placements: Vec<String> = arrangements.iter().map(Arrangement::placement).collect();

        assert_eq!(
            placements,
            vec!["BBSS", "BSBS", "BSSB", "SBBS", "SBSB", "SSBB"]
        );
        for arrangement in &arrangements {
            assert!((arrangement.probability - 1.0 / 6.0).abs() < 1e-12);
            assert_eq!(arrangement.combination(), combo(2, 2));
        }
    }

    #[test]
    fn test_single_type() {
        let arrangements = enumerate_arrangements(&combo(4, 0), 4).unwrap();
        assert_eq!(arrangements.len(), 1);
        assert_eq!(arrangements[0].placement(), "BBBB");
        assert_eq!(arrangements[0].probability, 1.0);
    }

    #[test]
    fn test_size_mismatch() {
        let err = enumerate_arrangements(&combo(2, 1), 4).unwrap_err();
        assert!(matches!(
            err,
            Error::ArrangementSizeMismatch {
                combination: 3,
                locations: 4
            }
        ));
    }

    #[test]
    fn test_empty_draw_has_one_empty_arrangement() {
        let arrangements = enumerate_arrangements(&DrawCombination::empty(), 0).unwrap();
        assert_eq!(arrangements.len(), 1);
        assert!(arrangements[0].tiles.is_empty());
    }
}
