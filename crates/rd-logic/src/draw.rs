//! Weighted symbol draw and grid generation

use rand::Rng;

use rd_core::Grid;

use crate::catalog::SymbolCatalog;

/// Weighted sampler over a catalog's symbols.
///
/// Weights are snapshotted in catalog order at construction; the total is
/// cached once. Sampling subtracts each weight from a uniform value in
/// `[0, total)` until the remainder drops to zero or below, so the draw is
/// proportional to weight and deterministic for a fixed RNG seed.
#[derive(Debug, Clone)]
pub struct WeightedDraw {
    entries: Vec<(String, f64)>,
    total: f64,
}

impl WeightedDraw {
    pub fn from_catalog(catalog: &SymbolCatalog) -> Self {
        let entries: Vec<(String, f64)> = catalog
            .all()
            .map(|s| (s.id.clone(), s.weight))
            .collect();
        Self {
            total: catalog.total_weight(),
            entries,
        }
    }

    /// Draw one symbol id
    pub fn draw<R: Rng>(&self, rng: &mut R) -> &str {
        let mut remainder = rng.gen_range(0.0..self.total);
        for (id, weight) in &self.entries {
            remainder -= weight;
            if remainder <= 0.0 {
                return id;
            }
        }
        // Floating point drift can leave a sliver above the last entry
        &self.entries[self.entries.len() - 1].0
    }

    /// Cached weight total
    pub fn total(&self) -> f64 {
        self.total
    }
}

/// Generate a fresh grid of independent weighted draws,
/// `reel_count` columns × `rows` rows.
pub fn generate_grid<R: Rng>(
    draw: &WeightedDraw,
    rng: &mut R,
    reel_count: u8,
    rows: u8,
) -> Grid {
    let mut grid = Vec::with_capacity(reel_count as usize);
    for _ in 0..reel_count {
        let mut column = Vec::with_capacity(rows as usize);
        for _ in 0..rows {
            column.push(draw.draw(rng).to_string());
        }
        grid.push(column);
    }
    grid
}
