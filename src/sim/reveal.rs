//! Reveal, flag and validation rules
//!
//! Every operation mutates the grid and reports what changed to a
//! [`GridRenderer`], bracketed by `pause`/`resume` so the scene graph is never
//! drawn half-updated.

use glam::IVec3;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, risk_label};

/// What the presentation layer must be able to do with a block
pub trait GridRenderer {
    /// Show a risk number on a block (`None` shows the plain block)
    fn show_risk(&mut self, id: &str, risk: Option<u8>);
    /// Put a flag on a block, or clear the marker
    fn show_flag(&mut self, id: &str, flagged: bool);
    /// Take a block out of the scene
    fn remove_cell(&mut self, id: &str);
    /// Show the bomb texture on every listed block
    fn reveal_all_bombs(&mut self, bomb_ids: &[String]);
    /// Stop drawing while a batch of changes is applied
    fn pause(&mut self) {}
    /// Resume drawing after a batch
    fn resume(&mut self) {}
}

/// A single renderer call, recorded for JS or for tests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    ShowRisk {
        id: String,
        risk: Option<u8>,
        /// Texture name ("1".."9", "9+")
        label: Option<String>,
    },
    ShowFlag {
        id: String,
        flagged: bool,
    },
    RemoveCell {
        id: String,
    },
    RevealAllBombs {
        ids: Vec<String>,
    },
}

impl GridRenderer for Vec<GameEvent> {
    fn show_risk(&mut self, id: &str, risk: Option<u8>) {
        self.push(GameEvent::ShowRisk {
            id: id.to_string(),
            risk,
            label: risk.and_then(risk_label),
        });
    }

    fn show_flag(&mut self, id: &str, flagged: bool) {
        self.push(GameEvent::ShowFlag {
            id: id.to_string(),
            flagged,
        });
    }

    fn remove_cell(&mut self, id: &str) {
        self.push(GameEvent::RemoveCell { id: id.to_string() });
    }

    fn reveal_all_bombs(&mut self, bomb_ids: &[String]) {
        self.push(GameEvent::RevealAllBombs {
            ids: bomb_ids.to_vec(),
        });
    }
}

/// Result of a reveal action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Flagged, removed or off-grid target
    Ignored,
    /// Target removed and flood fill ran
    Cleared { removed: usize, revealed: usize },
    /// Target was a bomb
    Detonated,
}

/// Tally of the player's flags against the bombs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagReport {
    /// Flags sitting on bombs
    pub correct: u32,
    /// Flags on safe cells
    pub incorrect: u32,
    /// Bombs in the grid
    pub bombs: u32,
}

impl FlagReport {
    pub fn is_win(&self) -> bool {
        self.correct == self.bombs && self.incorrect == 0
    }
}

#[inline]
fn shown_risk(risk: u8) -> Option<u8> {
    (risk > 0).then_some(risk)
}

/// Reveal the block at `coord`.
///
/// The target itself is always removed. Zero-risk neighbours are removed and
/// expanded in turn; numbered neighbours stop the fill and show their number.
pub fn reveal<R: GridRenderer + ?Sized>(
    grid: &mut Grid,
    coord: IVec3,
    renderer: &mut R,
) -> RevealOutcome {
    let Some(cell) = grid.get(coord).copied() else {
        return RevealOutcome::Ignored;
    };
    if cell.removed || cell.flagged {
        return RevealOutcome::Ignored;
    }

    renderer.pause();
    let outcome = if cell.is_bomb {
        show_bombs(grid, renderer);
        RevealOutcome::Detonated
    } else {
        flood_remove(grid, coord, renderer)
    };
    renderer.resume();
    outcome
}

fn flood_remove<R: GridRenderer + ?Sized>(
    grid: &mut Grid,
    root: IVec3,
    renderer: &mut R,
) -> RevealOutcome {
    let mut removed = 0;
    let mut revealed = 0;

    if let Some(cell) = grid.get_mut(root) {
        cell.revealed = true;
        cell.removed = true;
    }
    renderer.remove_cell(&grid.cell_id(root));
    removed += 1;

    let mut stack: Vec<IVec3> = grid.neighbors(root).collect();
    while let Some(coord) = stack.pop() {
        let Some(cell) = grid.get_mut(coord) else {
            continue;
        };
        if cell.removed {
            continue;
        }

        if cell.risk == 0 && !cell.is_bomb {
            cell.removed = true;
            renderer.remove_cell(&grid.cell_id(coord));
            removed += 1;
            stack.extend(grid.neighbors(coord));
        } else if cell.risk > 0 && !cell.revealed && !cell.flagged {
            cell.revealed = true;
            let risk = cell.risk;
            renderer.show_risk(&grid.cell_id(coord), Some(risk));
            revealed += 1;
        }
    }

    log::debug!("Reveal at {root}: removed {removed}, numbered {revealed}");
    RevealOutcome::Cleared { removed, revealed }
}

/// Toggle the flag on the block at `coord`.
///
/// Unflagging a block that had its number showing puts the number back;
/// otherwise the marker is cleared. Returns the new flag state, or `None` if
/// the block is gone.
pub fn toggle_flag<R: GridRenderer + ?Sized>(
    grid: &mut Grid,
    coord: IVec3,
    renderer: &mut R,
) -> Option<bool> {
    let id = grid.cell_id(coord);
    let cell = grid.get_mut(coord).filter(|c| c.in_play())?;

    renderer.pause();
    if cell.flagged {
        cell.flagged = false;
        if cell.revealed {
            renderer.show_risk(&id, shown_risk(cell.risk));
        } else {
            renderer.show_flag(&id, false);
        }
    } else {
        cell.flagged = true;
        renderer.show_flag(&id, true);
    }
    renderer.resume();

    Some(cell.flagged)
}

/// Count correct and incorrect flags among the blocks still in play
pub fn check_win(grid: &Grid) -> FlagReport {
    let mut report = FlagReport {
        correct: 0,
        incorrect: 0,
        bombs: grid.bomb_count(),
    };
    for (_, cell) in grid.iter().filter(|(_, c)| c.in_play() && c.flagged) {
        if cell.is_bomb {
            report.correct += 1;
        } else {
            report.incorrect += 1;
        }
    }
    report
}

/// Show the bomb texture on every bomb
pub fn reveal_all_bombs<R: GridRenderer + ?Sized>(grid: &mut Grid, renderer: &mut R) {
    renderer.pause();
    show_bombs(grid, renderer);
    renderer.resume();
}

fn show_bombs<R: GridRenderer + ?Sized>(grid: &mut Grid, renderer: &mut R) {
    let bombs: Vec<IVec3> = grid.bombs().collect();
    let mut ids = Vec::with_capacity(bombs.len());
    for coord in bombs {
        if let Some(cell) = grid.get_mut(coord).filter(|c| c.in_play()) {
            cell.revealed = true;
            ids.push(grid.cell_id(coord));
        }
    }
    renderer.reveal_all_bombs(&ids);
}

/// Show the risk number of every block still in play
pub fn reveal_all_numbers<R: GridRenderer + ?Sized>(grid: &mut Grid, renderer: &mut R) {
    renderer.pause();
    let coords: Vec<IVec3> = grid.coords().collect();
    for coord in coords {
        let Some(cell) = grid.get_mut(coord) else {
            continue;
        };
        if cell.removed || cell.revealed {
            continue;
        }
        cell.revealed = true;
        let risk = cell.risk;
        renderer.show_risk(&grid.cell_id(coord), shown_risk(risk));
    }
    renderer.resume();
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    fn grid_with_bombs(size: u32, bombs: &[IVec3]) -> Grid {
        let mut grid = Grid::new(size);
        for &b in bombs {
            assert!(grid.place_bomb_at(b));
        }
        grid
    }

    fn removed(grid: &Grid) -> HashSet<IVec3> {
        grid.iter()
            .filter(|(_, c)| c.removed)
            .map(|(coord, _)| coord)
            .collect()
    }

    #[test]
    fn test_small_cube_reveal_does_not_cascade() {
        let mut grid = grid_with_bombs(2, &[IVec3::ZERO]);
        let mut events = Vec::new();
        let target = IVec3::ONE;

        let outcome = reveal(&mut grid, target, &mut events);
        assert_eq!(outcome, RevealOutcome::Cleared { removed: 1, revealed: 6 });
        assert_eq!(removed(&grid), HashSet::from([target]));
        assert_eq!(events[0], GameEvent::RemoveCell {
            id: grid.cell_id(target),
        });

        // Every other safe cell now shows "1"; the bomb has risk 0 and stays hidden
        for (coord, cell) in grid.iter() {
            if coord == target {
                continue;
            }
            assert_eq!(cell.revealed, !cell.is_bomb, "cell {coord}");
        }
        assert!(events.iter().skip(1).all(|e| matches!(
            e,
            GameEvent::ShowRisk { risk: Some(1), label: Some(l), .. } if l == "1"
        )));
    }

    #[test]
    fn test_flood_stops_at_numbers() {
        // 4x4x4 with one bomb in a corner: everything but the bomb's 7
        // neighbours is zero-risk and connected
        let mut grid = grid_with_bombs(4, &[IVec3::ZERO]);
        let mut events = Vec::new();

        let outcome = reveal(&mut grid, IVec3::splat(3), &mut events);
        assert_eq!(outcome, RevealOutcome::Cleared { removed: 56, revealed: 7 });

        for (coord, cell) in grid.iter() {
            if coord == IVec3::ZERO {
                assert!(!cell.removed && !cell.revealed);
            } else if cell.risk > 0 {
                assert!(!cell.removed && cell.revealed, "cell {coord}");
            } else {
                assert!(cell.removed, "cell {coord}");
            }
        }
    }

    #[test]
    fn test_root_removed_even_when_numbered() {
        let mut grid = grid_with_bombs(4, &[IVec3::ZERO]);
        let mut events = Vec::new();
        let root = IVec3::ONE;
        assert_eq!(grid.get(root).map(|c| c.risk), Some(1));

        reveal(&mut grid, root, &mut events);
        assert!(grid.get(root).is_some_and(|c| c.removed));
        // Root has zero-risk neighbours, so the fill spreads from it
        assert!(grid.get(IVec3::splat(3)).is_some_and(|c| c.removed));
    }

    #[test]
    fn test_bomb_neighbour_of_root_is_never_removed() {
        // Lone bomb at (0,0,0) has risk 0; revealing its neighbour must not
        // sweep it away with the zero-risk cells
        let mut grid = grid_with_bombs(3, &[IVec3::ZERO]);
        let mut events = Vec::new();
        reveal(&mut grid, IVec3::new(1, 0, 0), &mut events);
        let bomb = grid.get(IVec3::ZERO).copied().unwrap_or_default();
        assert!(bomb.is_bomb && !bomb.removed && !bomb.revealed);
    }

    #[test]
    fn test_flagged_target_is_ignored() {
        let mut grid = grid_with_bombs(3, &[IVec3::ZERO]);
        let mut events = Vec::new();
        toggle_flag(&mut grid, IVec3::ONE, &mut events);
        events.clear();

        assert_eq!(reveal(&mut grid, IVec3::ONE, &mut events), RevealOutcome::Ignored);
        assert!(events.is_empty());

        // Flagged bomb does not detonate either
        toggle_flag(&mut grid, IVec3::ZERO, &mut events);
        assert_eq!(reveal(&mut grid, IVec3::ZERO, &mut events), RevealOutcome::Ignored);
    }

    #[test]
    fn test_flagged_number_keeps_its_flag_during_fill() {
        let mut grid = grid_with_bombs(4, &[IVec3::ZERO]);
        let mut events = Vec::new();
        let numbered = IVec3::new(1, 0, 0);
        toggle_flag(&mut grid, numbered, &mut events);
        events.clear();

        reveal(&mut grid, IVec3::splat(3), &mut events);
        let cell = grid.get(numbered).copied().unwrap_or_default();
        assert!(cell.flagged && !cell.revealed && !cell.removed);
        assert!(!events.iter().any(|e| matches!(
            e,
            GameEvent::ShowRisk { id, .. } if *id == grid.cell_id(numbered)
        )));
    }

    #[test]
    fn test_detonation_reveals_all_bombs() {
        let bombs = [IVec3::ZERO, IVec3::new(2, 2, 2), IVec3::new(0, 2, 1)];
        let mut grid = grid_with_bombs(3, &bombs);
        let mut events = Vec::new();

        assert_eq!(reveal(&mut grid, bombs[1], &mut events), RevealOutcome::Detonated);
        assert_eq!(events.len(), 1);
        let GameEvent::RevealAllBombs { ids } = &events[0] else {
            panic!("expected RevealAllBombs, got {:?}", events[0]);
        };
        let expected: HashSet<String> = bombs.iter().map(|b| grid.cell_id(*b)).collect();
        assert_eq!(ids.iter().cloned().collect::<HashSet<_>>(), expected);
        assert!(bombs.iter().all(|b| grid.get(*b).is_some_and(|c| c.revealed)));
    }

    #[test]
    fn test_removed_cell_is_ignored() {
        let mut grid = grid_with_bombs(2, &[IVec3::ZERO]);
        let mut events = Vec::new();
        reveal(&mut grid, IVec3::ONE, &mut events);
        events.clear();

        assert_eq!(reveal(&mut grid, IVec3::ONE, &mut events), RevealOutcome::Ignored);
        assert_eq!(toggle_flag(&mut grid, IVec3::ONE, &mut events), None);
        assert_eq!(reveal(&mut grid, IVec3::splat(5), &mut events), RevealOutcome::Ignored);
        assert!(events.is_empty());
    }

    #[test]
    fn test_toggle_flag_hidden_cell() {
        let mut grid = grid_with_bombs(3, &[IVec3::ZERO]);
        let mut events = Vec::new();
        let id = grid.cell_id(IVec3::ONE);

        assert_eq!(toggle_flag(&mut grid, IVec3::ONE, &mut events), Some(true));
        assert_eq!(toggle_flag(&mut grid, IVec3::ONE, &mut events), Some(false));
        assert_eq!(events, vec![
            GameEvent::ShowFlag { id: id.clone(), flagged: true },
            GameEvent::ShowFlag { id, flagged: false },
        ]);
    }

    #[test]
    fn test_unflag_revealed_cell_restores_number() {
        let mut grid = grid_with_bombs(2, &[IVec3::ZERO]);
        let mut events = Vec::new();
        reveal(&mut grid, IVec3::ONE, &mut events);
        let numbered = IVec3::new(1, 0, 0);
        let id = grid.cell_id(numbered);
        events.clear();

        toggle_flag(&mut grid, numbered, &mut events);
        toggle_flag(&mut grid, numbered, &mut events);
        assert_eq!(events, vec![
            GameEvent::ShowFlag { id: id.clone(), flagged: true },
            GameEvent::ShowRisk { id, risk: Some(1), label: Some("1".to_string()) },
        ]);
        let cell = grid.get(numbered).copied().unwrap_or_default();
        assert!(cell.revealed && !cell.flagged);
    }

    #[test]
    fn test_check_win() {
        let bombs = [IVec3::ZERO, IVec3::splat(2)];
        let mut grid = grid_with_bombs(3, &bombs);
        let mut events = Vec::new();

        assert!(!check_win(&grid).is_win());

        toggle_flag(&mut grid, bombs[0], &mut events);
        let report = check_win(&grid);
        assert_eq!(report, FlagReport { correct: 1, incorrect: 0, bombs: 2 });
        assert!(!report.is_win());

        toggle_flag(&mut grid, bombs[1], &mut events);
        assert!(check_win(&grid).is_win());

        toggle_flag(&mut grid, IVec3::new(1, 0, 0), &mut events);
        let report = check_win(&grid);
        assert_eq!(report, FlagReport { correct: 2, incorrect: 1, bombs: 2 });
        assert!(!report.is_win());
    }

    #[test]
    fn test_flagged_zero_cell_swept_and_not_counted() {
        let mut grid = grid_with_bombs(4, &[IVec3::ZERO]);
        let mut events = Vec::new();
        let safe = IVec3::splat(2);
        assert_eq!(grid.get(safe).map(|c| c.risk), Some(0));

        toggle_flag(&mut grid, safe, &mut events);
        toggle_flag(&mut grid, IVec3::ZERO, &mut events);
        assert_eq!(check_win(&grid).incorrect, 1);

        reveal(&mut grid, IVec3::splat(3), &mut events);
        let cell = grid.get(safe).copied().unwrap_or_default();
        assert!(cell.flagged && cell.removed);
        assert!(events.contains(&GameEvent::RemoveCell {
            id: grid.cell_id(safe),
        }));

        let report = check_win(&grid);
        assert_eq!(report, FlagReport { correct: 1, incorrect: 0, bombs: 1 });
        assert!(report.is_win());
    }

    #[test]
    fn test_reveal_all_numbers() {
        let mut grid = grid_with_bombs(2, &[IVec3::ZERO]);
        let mut events = Vec::new();
        reveal_all_numbers(&mut grid, &mut events);
        assert_eq!(events.len(), 8);
        assert!(grid.iter().all(|(_, c)| c.revealed));
        assert!(events.contains(&GameEvent::ShowRisk {
            id: grid.cell_id(IVec3::ZERO),
            risk: None,
            label: None,
        }));
    }

    #[test]
    fn test_pause_resume_bracket_batches() {
        #[derive(Default)]
        struct Tracing {
            calls: Vec<&'static str>,
        }
        impl GridRenderer for Tracing {
            fn show_risk(&mut self, _: &str, _: Option<u8>) {
                self.calls.push("risk");
            }
            fn show_flag(&mut self, _: &str, _: bool) {
                self.calls.push("flag");
            }
            fn remove_cell(&mut self, _: &str) {
                self.calls.push("remove");
            }
            fn reveal_all_bombs(&mut self, _: &[String]) {
                self.calls.push("bombs");
            }
            fn pause(&mut self) {
                self.calls.push("pause");
            }
            fn resume(&mut self) {
                self.calls.push("resume");
            }
        }

        let mut grid = grid_with_bombs(2, &[IVec3::ZERO]);
        let mut tracing = Tracing::default();
        reveal(&mut grid, IVec3::ZERO, &mut tracing);
        assert_eq!(tracing.calls, ["pause", "bombs", "resume"]);
    }

    /// Zero-risk safe cells reachable from `root` through zero-risk cells
    fn zero_component(grid: &Grid, root: IVec3) -> HashSet<IVec3> {
        let mut seen = HashSet::from([root]);
        let mut stack = vec![root];
        while let Some(c) = stack.pop() {
            for n in grid.neighbors(c) {
                let cell = grid.get(n).copied().unwrap_or_default();
                if cell.risk == 0 && !cell.is_bomb && seen.insert(n) {
                    stack.push(n);
                }
            }
        }
        seen
    }

    proptest! {
        #[test]
        fn prop_flood_clears_zero_region(size in 3u32..=8, bombs in 1u32..=25, seed in any::<u64>()) {
            let mut grid = Grid::new(size);
            let mut rng = Pcg32::seed_from_u64(seed);
            grid.place_bombs(bombs, &mut rng);

            let root = grid.iter().find(|(_, c)| c.risk == 0 && !c.is_bomb).map(|(coord, _)| coord);
            prop_assume!(root.is_some());
            let root = root.unwrap_or_default();

            let component = zero_component(&grid, root);
            let border: HashSet<IVec3> = component
                .iter()
                .flat_map(|c| grid.neighbors(*c))
                .filter(|n| !component.contains(n))
                .collect();

            let mut events = Vec::new();
            reveal(&mut grid, root, &mut events);

            prop_assert_eq!(removed(&grid), component);
            for b in border {
                let cell = grid.get(b).copied().unwrap_or_default();
                prop_assert!(cell.risk > 0 && cell.revealed && !cell.removed);
                prop_assert!(!cell.is_bomb);
            }
        }
    }
}
