//! Draw distribution: every multiset a round can draw from the bag, with its
//! probability under sampling without replacement.

use serde::{Deserialize, Serialize};

use super::multinomial_coefficient;
use crate::core::{DrawCombination, Error, Result, TileBag, TileType};

/// One feasible draw and its probability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawOutcome {
    /// Tiles drawn, per type.
    pub combination: DrawCombination,

    /// Probability of drawing exactly this multiset.
    pub probability: f64,
}

/// Enumerate every way to draw `num_tiles` from `bag`.
///
/// Combinations are produced in canonical order: tile types in
/// [`TileType::ALL`] order, each type's count ascending. Probabilities sum to
/// one. Fails with [`Error::InsufficientTiles`] if the bag is too small.
pub fn enumerate_draws(bag: &TileBag, num_tiles: u32) -> Result<Vec<DrawOutcome>> {
    let available = bag.total();
    if num_tiles > available {
        return Err(Error::InsufficientTiles {
            requested: num_tiles,
            available,
        });
    }

    let mut combinations = Vec::new();
    collect_combinations(bag, 0, num_tiles, DrawCombination::empty(), &mut combinations);

    combinations
        .into_iter()
        .map(|combination| {
            let probability = draw_probability(bag, &combination)?;
            Ok(DrawOutcome {
                combination,
                probability,
            })
        })
        .collect()
}

fn collect_combinations(
    bag: &TileBag,
    tile_index: usize,
    remaining: u32,
    current: DrawCombination,
    out: &mut Vec<DrawCombination>,
) {
    if tile_index == TileType::COUNT {
        if remaining == 0 {
            out.push(current);
        }
        return;
    }

    let tile = TileType::ALL[tile_index];
    let max_draw = remaining.min(bag[tile]);
    for count in 0..=max_draw {
        collect_combinations(
            bag,
            tile_index + 1,
            remaining - count,
            current.with(tile, count),
            out,
        );
    }
}

/// Probability of drawing exactly `combination` from `bag`.
///
/// Multiplies the per-tile factors of one particular draw order (types in
/// canonical order, `remaining of type / remaining total`) and scales by the
/// number of orders that yield the same multiset.
pub fn draw_probability(bag: &TileBag, combination: &DrawCombination) -> Result<f64> {
    let mut remaining = *bag;
    let mut tiles_left = bag.total();
    let mut probability = 1.0f64;

    for tile in TileType::ALL {
        for _ in 0..combination[tile] {
            if remaining[tile] == 0 {
                return Ok(0.0);
            }
            probability *= f64::from(remaining[tile]) / f64::from(tiles_left);
            remaining[tile] -= 1;
            tiles_left -= 1;
        }
    }

    let orderings = multinomial_coefficient(combination.as_array())?;
    Ok(probability * orderings as f64)
}
