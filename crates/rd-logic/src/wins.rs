//! Win detection over a finished grid
//!
//! Scans four directions (→, ↓, ↘, ↗) from edge-anchored starting cells,
//! keeps the longest valid run per start, applies wild substitution, and
//! deduplicates runs that different scans converge on.

use std::collections::HashSet;

use log::warn;

use rd_core::{grid_is_rectangular, Grid, Position};

use crate::catalog::SymbolCatalog;
use crate::result::{SpinResult, WinLine};

/// Minimum matching symbols for a win
pub const MIN_RUN_LENGTH: u8 = 3;

/// Scan direction as a (column, row) step
#[derive(Debug, Clone, Copy)]
struct Direction {
    dc: i16,
    dr: i16,
}

const RIGHT: Direction = Direction { dc: 1, dr: 0 };
const DOWN: Direction = Direction { dc: 0, dr: 1 };
const DOWN_RIGHT: Direction = Direction { dc: 1, dr: 1 };
const UP_RIGHT: Direction = Direction { dc: 1, dr: -1 };

/// Evaluate all win lines on a grid for a bet.
///
/// Defensive: an empty or ragged grid, or a non-positive bet, is a caller
/// defect and yields a zero result instead of a panic.
pub fn evaluate(catalog: &SymbolCatalog, grid: &Grid, bet: f64) -> SpinResult {
    if !grid_is_rectangular(grid) {
        warn!("win evaluation rejected: grid is empty or ragged");
        return SpinResult::zero(grid.clone(), bet);
    }
    if !(bet.is_finite() && bet > 0.0) {
        warn!("win evaluation rejected: invalid bet {bet}");
        return SpinResult::zero(grid.clone(), bet);
    }

    let cols = grid.len();
    let rows = grid[0].len();

    let mut win_lines: Vec<WinLine> = Vec::new();
    let mut seen: HashSet<Vec<Position>> = HashSet::new();

    for (direction, starts) in [
        (RIGHT, starts_for_right(cols, rows)),
        (DOWN, starts_for_down(cols, rows)),
        (DOWN_RIGHT, starts_for_down_right(cols, rows)),
        (UP_RIGHT, starts_for_up_right(cols, rows)),
    ] {
        for start in starts {
            let ray = ray_cells(start, direction, cols, rows);
            if ray.len() < MIN_RUN_LENGTH as usize {
                continue;
            }

            // Longest valid run wins; its sub-runs are never counted again.
            for length in (MIN_RUN_LENGTH as usize..=ray.len()).rev() {
                let run = &ray[..length];
                let Some(paying) = run_paying_symbol(catalog, grid, run) else {
                    continue;
                };

                let multiplier = catalog
                    .get(paying)
                    .map(|s| s.pay(length as u8))
                    .unwrap_or(0.0);
                if multiplier > 0.0 {
                    let mut key: Vec<Position> = run.to_vec();
                    key.sort();
                    if seen.insert(key) {
                        win_lines.push(WinLine {
                            symbol: paying.to_string(),
                            length: length as u8,
                            positions: run.to_vec(),
                            payout: multiplier * bet,
                        });
                    }
                }
                break;
            }
        }
    }

    let total_win = win_lines.iter().map(|w| w.payout).sum();
    SpinResult {
        grid: grid.clone(),
        bet,
        total_win,
        win_lines,
    }
}

/// Determine the paying symbol of a run, or None if the run is not valid.
///
/// The base is the first non-wild symbol; wilds substitute for it unless
/// the base is scatter or bonus. An all-wild run pays as wild.
fn run_paying_symbol<'a>(
    catalog: &SymbolCatalog,
    grid: &'a Grid,
    run: &[Position],
) -> Option<&'a str> {
    let symbol_at =
        |p: &Position| grid[p.column as usize][p.row as usize].as_str();

    let base = run
        .iter()
        .map(symbol_at)
        .find(|id| !catalog.is_wild(id));

    let Some(base) = base else {
        // Every cell is wild
        return Some(symbol_at(&run[0]));
    };

    let wilds_allowed = !catalog.is_special(base);

    for position in run {
        let id = symbol_at(position);
        if id == base {
            continue;
        }
        if wilds_allowed && catalog.is_wild(id) {
            continue;
        }
        return None;
    }

    Some(base)
}

fn ray_cells(start: Position, direction: Direction, cols: usize, rows: usize) -> Vec<Position> {
    let mut cells = Vec::new();
    let mut c = start.column as i16;
    let mut r = start.row as i16;
    while c >= 0 && r >= 0 && (c as usize) < cols && (r as usize) < rows {
        cells.push(Position::new(c as u8, r as u8));
        c += direction.dc;
        r += direction.dr;
    }
    cells
}

// Edge-anchored starts only: interior cells are covered by the ray from
// the edge, so enumerating them would just re-scan sub-runs.

fn starts_for_right(_cols: usize, rows: usize) -> Vec<Position> {
    (0..rows).map(|r| Position::new(0, r as u8)).collect()
}

fn starts_for_down(cols: usize, _rows: usize) -> Vec<Position> {
    (0..cols).map(|c| Position::new(c as u8, 0)).collect()
}

fn starts_for_down_right(cols: usize, rows: usize) -> Vec<Position> {
    let mut starts: Vec<Position> =
        (0..rows).map(|r| Position::new(0, r as u8)).collect();
    starts.extend((1..cols).map(|c| Position::new(c as u8, 0)));
    starts
}

fn starts_for_up_right(cols: usize, rows: usize) -> Vec<Position> {
    let mut starts: Vec<Position> =
        (0..rows).map(|r| Position::new(0, r as u8)).collect();
    starts.extend((1..cols).map(|c| Position::new(c as u8, (rows - 1) as u8)));
    starts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Symbol, SymbolCatalog};

    fn test_catalog() -> SymbolCatalog {
        let mut symbols = vec![
            Symbol::normal("pig", 1.0, &[(3, 50.0), (4, 120.0), (5, 400.0)]),
            Symbol::normal("dog", 1.0, &[(3, 10.0), (4, 30.0), (5, 90.0)]),
            Symbol::normal("cat", 1.0, &[(3, 5.0)]),
            Symbol::wild("wild", 1.0, &[(3, 60.0), (4, 250.0), (5, 1000.0)]),
            Symbol::scatter("scatter", 1.0),
            Symbol::bonus("bonus", 1.0),
        ];
        // Non-paying filler used to pad grids without creating runs
        for i in 1..=5 {
            symbols.push(Symbol::normal(format!("f{i}"), 1.0, &[]));
        }
        SymbolCatalog::new(symbols).unwrap()
    }

    /// 5×3 grid of filler symbols arranged so adjacent cells differ along
    /// every scan direction: cell(c, r) = f[(c + 2r) mod 5]. The step
    /// deltas 1 (→), 2 (↓), 3 (↘) and 4 (↗) are all non-zero mod 5.
    fn filler_grid() -> Grid {
        (0..5u8)
            .map(|c| {
                (0..3u8)
                    .map(|r| format!("f{}", (c + 2 * r) % 5 + 1))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_filler_grid_has_no_wins() {
        let result = evaluate(&test_catalog(), &filler_grid(), 1.0);
        assert_eq!(result.total_win, 0.0);
        assert!(result.win_lines.is_empty());
    }

    #[test]
    fn test_three_of_a_kind_row_pays() {
        // 5×3 grid, bet 1.0, pig pays 50 at length 3
        let mut grid = filler_grid();
        grid[0][0] = "pig".into();
        grid[1][0] = "pig".into();
        grid[2][0] = "pig".into();

        let result = evaluate(&test_catalog(), &grid, 1.0);
        assert_eq!(result.total_win, 50.0);
        assert_eq!(result.win_lines.len(), 1);
        let line = &result.win_lines[0];
        assert_eq!(line.symbol, "pig");
        assert_eq!(line.length, 3);
        assert_eq!(
            line.positions,
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0)
            ]
        );
    }

    #[test]
    fn test_longest_run_absorbs_sub_run() {
        let mut grid = filler_grid();
        for c in 0..4 {
            grid[c][1] = "dog".into();
        }

        let result = evaluate(&test_catalog(), &grid, 2.0);
        assert_eq!(result.win_lines.len(), 1);
        assert_eq!(result.win_lines[0].length, 4);
        assert_eq!(result.win_lines[0].payout, 60.0); // 30 × bet 2
        assert_eq!(result.total_win, 60.0);
    }

    #[test]
    fn test_wild_substitutes_for_normal() {
        let mut grid = filler_grid();
        grid[0][2] = "wild".into();
        grid[1][2] = "dog".into();
        grid[2][2] = "dog".into();

        let result = evaluate(&test_catalog(), &grid, 1.0);
        assert_eq!(result.win_lines.len(), 1);
        assert_eq!(result.win_lines[0].symbol, "dog");
        assert_eq!(result.win_lines[0].payout, 10.0);
    }

    #[test]
    fn test_all_wild_run_pays_as_wild() {
        let mut grid = filler_grid();
        grid[0][0] = "wild".into();
        grid[1][0] = "wild".into();
        grid[2][0] = "wild".into();
        // Block the run from extending into a filler-based substitution
        grid[3][0] = "scatter".into();

        let result = evaluate(&test_catalog(), &grid, 1.0);
        assert_eq!(result.win_lines.len(), 1);
        let line = &result.win_lines[0];
        assert_eq!(line.symbol, "wild");
        assert_eq!(line.length, 3);
        assert_eq!(line.payout, 60.0);
    }

    #[test]
    fn test_wild_extends_into_filler_base_without_pay() {
        // wild,wild,wild,f4: the longest valid run is length 4 paying as
        // the filler symbol, which has no paytable entry, so nothing is
        // recorded and the all-wild sub-run is not counted separately.
        let mut grid = filler_grid();
        grid[0][0] = "wild".into();
        grid[1][0] = "wild".into();
        grid[2][0] = "wild".into();

        let result = evaluate(&test_catalog(), &grid, 1.0);
        assert!(result.win_lines.is_empty());
    }

    #[test]
    fn test_wild_does_not_substitute_for_scatter() {
        let mut grid = filler_grid();
        grid[0][1] = "wild".into();
        grid[1][1] = "scatter".into();
        grid[2][1] = "scatter".into();

        let result = evaluate(&test_catalog(), &grid, 1.0);
        assert!(result.win_lines.is_empty());
        assert_eq!(result.total_win, 0.0);
    }

    #[test]
    fn test_wild_does_not_substitute_for_bonus() {
        let mut grid = filler_grid();
        grid[0][1] = "bonus".into();
        grid[1][1] = "wild".into();
        grid[2][1] = "bonus".into();

        let result = evaluate(&test_catalog(), &grid, 1.0);
        assert!(result.win_lines.is_empty());
    }

    #[test]
    fn test_vertical_run() {
        let mut grid = filler_grid();
        grid[2][0] = "dog".into();
        grid[2][1] = "dog".into();
        grid[2][2] = "dog".into();

        let result = evaluate(&test_catalog(), &grid, 1.0);
        assert_eq!(result.win_lines.len(), 1);
        assert_eq!(
            result.win_lines[0].positions,
            vec![
                Position::new(2, 0),
                Position::new(2, 1),
                Position::new(2, 2)
            ]
        );
    }

    #[test]
    fn test_diagonal_runs() {
        // ↘ from the top-left corner
        let mut grid = filler_grid();
        grid[0][0] = "cat".into();
        grid[1][1] = "cat".into();
        grid[2][2] = "cat".into();
        let result = evaluate(&test_catalog(), &grid, 1.0);
        assert_eq!(result.win_lines.len(), 1);
        assert_eq!(
            result.win_lines[0].positions,
            vec![
                Position::new(0, 0),
                Position::new(1, 1),
                Position::new(2, 2)
            ]
        );

        // ↗ from the bottom-left corner
        let mut grid = filler_grid();
        grid[0][2] = "cat".into();
        grid[1][1] = "cat".into();
        grid[2][0] = "cat".into();
        let result = evaluate(&test_catalog(), &grid, 1.0);
        assert_eq!(result.win_lines.len(), 1);
        assert_eq!(
            result.win_lines[0].positions,
            vec![
                Position::new(0, 2),
                Position::new(1, 1),
                Position::new(2, 0)
            ]
        );
    }

    #[test]
    fn test_no_paytable_entry_is_not_recorded() {
        // cat only pays at length 3; a 4-run has no entry and pays nothing,
        // and its 3-sub-run must not be counted either.
        let mut grid = filler_grid();
        for c in 0..4 {
            grid[c][0] = "cat".into();
        }

        let result = evaluate(&test_catalog(), &grid, 1.0);
        assert!(result.win_lines.is_empty());
        assert_eq!(result.total_win, 0.0);
    }

    #[test]
    fn test_no_duplicate_position_sets() {
        let mut grid = filler_grid();
        grid[0][0] = "pig".into();
        grid[1][0] = "pig".into();
        grid[2][0] = "pig".into();
        grid[2][1] = "dog".into();
        grid[2][2] = "dog".into();
        grid[2][0] = "dog".into();
        grid[1][0] = "dog".into();
        grid[0][0] = "dog".into();

        let result = evaluate(&test_catalog(), &grid, 1.0);
        let mut sets: Vec<Vec<Position>> = result
            .win_lines
            .iter()
            .map(|w| {
                let mut p = w.positions.clone();
                p.sort();
                p
            })
            .collect();
        let before = sets.len();
        sets.sort();
        sets.dedup();
        assert_eq!(before, sets.len());
    }

    #[test]
    fn test_invalid_inputs_yield_zero_result() {
        let catalog = test_catalog();
        let good = filler_grid();

        let empty: Grid = Vec::new();
        let result = evaluate(&catalog, &empty, 1.0);
        assert_eq!(result.total_win, 0.0);
        assert!(result.win_lines.is_empty());

        let mut ragged = good.clone();
        ragged[1].pop();
        let result = evaluate(&catalog, &ragged, 1.0);
        assert_eq!(result.total_win, 0.0);

        for bad_bet in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let result = evaluate(&catalog, &good, bad_bet);
            assert_eq!(result.total_win, 0.0);
            assert!(result.win_lines.is_empty());
        }
    }

    #[test]
    fn test_evaluate_is_pure() {
        let mut grid = filler_grid();
        grid[0][0] = "pig".into();
        grid[1][0] = "pig".into();
        grid[2][0] = "pig".into();
        let catalog = test_catalog();

        let a = evaluate(&catalog, &grid, 1.0);
        let b = evaluate(&catalog, &grid, 1.0);
        assert_eq!(a.total_win, b.total_win);
        assert_eq!(a.win_lines, b.win_lines);
    }

    #[test]
    fn test_total_equals_sum_of_lines() {
        let mut grid = filler_grid();
        grid[0][0] = "pig".into();
        grid[1][0] = "pig".into();
        grid[2][0] = "pig".into();
        grid[0][2] = "dog".into();
        grid[1][2] = "dog".into();
        grid[2][2] = "dog".into();

        let result = evaluate(&test_catalog(), &grid, 1.0);
        let sum: f64 = result.win_lines.iter().map(|w| w.payout).sum();
        assert_eq!(result.total_win, sum);
        assert_eq!(result.win_lines.len(), 2);
    }
}
