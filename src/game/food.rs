use std::collections::HashSet;

use rand::Rng;
use rand::seq::IteratorRandom;
use tracing::warn;

use super::grid::{Cell, Grid};

/// The single food item on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    position: Cell,
}

impl Food {
    /// Place food on a random cell outside `forbidden`, or `None` if there is none
    pub fn spawn<R: Rng + ?Sized>(
        grid: &Grid,
        forbidden: &HashSet<Cell>,
        rng: &mut R,
    ) -> Option<Self> {
        grid.cells()
            .filter(|cell| !forbidden.contains(cell))
            .choose(rng)
            .map(Self::at)
    }

    /// Food at a fixed cell
    pub fn at(position: Cell) -> Self {
        Self { position }
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    /// Move to a cell drawn uniformly from the cells not in `forbidden`.
    ///
    /// Returns false and keeps the current position when no free cell exists.
    pub fn relocate<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        forbidden: &HashSet<Cell>,
        rng: &mut R,
    ) -> bool {
        let free = grid.cells().filter(|cell| !forbidden.contains(cell));

        match free.choose(rng) {
            Some(cell) => {
                self.position = cell;
                true
            }
            None => {
                warn!(
                    width = grid.width(),
                    height = grid.height(),
                    "No free cell left for food"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_relocate_avoids_forbidden() {
        let grid = Grid::new(8, 6);
        let mut rng = StdRng::seed_from_u64(7);
        let forbidden: HashSet<Cell> = grid.cells().filter(|c| c.x < 7).collect();
        let mut food = Food::at(Cell::new(0, 0));

        for _ in 0..50 {
            assert!(food.relocate(&grid, &forbidden, &mut rng));
            assert!(!forbidden.contains(&food.position()));
            assert!(grid.contains(food.position()));
        }
    }

    #[test]
    fn test_single_free_cell_is_chosen() {
        let grid = Grid::new(4, 4);
        let mut rng = StdRng::seed_from_u64(1);
        let free = Cell::new(2, 3);
        let forbidden: HashSet<Cell> = grid.cells().filter(|c| *c != free).collect();

        let food = Food::spawn(&grid, &forbidden, &mut rng).unwrap();

        assert_eq!(food.position(), free);
    }

    #[test]
    fn test_full_grid_keeps_position() {
        let grid = Grid::new(3, 3);
        let mut rng = StdRng::seed_from_u64(1);
        let forbidden: HashSet<Cell> = grid.cells().collect();
        let mut food = Food::at(Cell::new(1, 1));

        assert!(!food.relocate(&grid, &forbidden, &mut rng));
        assert_eq!(food.position(), Cell::new(1, 1));
    }

    #[test]
    fn test_spawn_on_full_grid_is_none() {
        let grid = Grid::new(3, 3);
        let mut rng = StdRng::seed_from_u64(1);
        let forbidden: HashSet<Cell> = grid.cells().collect();

        assert_eq!(Food::spawn(&grid, &forbidden, &mut rng), None);
    }

    #[test]
    fn test_same_seed_same_placement() {
        let grid = Grid::new(32, 24);
        let forbidden = HashSet::new();

        let a = Food::spawn(&grid, &forbidden, &mut StdRng::seed_from_u64(42));
        let b = Food::spawn(&grid, &forbidden, &mut StdRng::seed_from_u64(42));

        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn test_spawn_reaches_many_cells() {
        let grid = Grid::new(5, 5);
        let mut rng = StdRng::seed_from_u64(3);
        let forbidden = HashSet::new();

        let seen: HashSet<Cell> = (0..500)
            .filter_map(|_| Food::spawn(&grid, &forbidden, &mut rng))
            .map(|food| food.position())
            .collect();

        assert!(seen.len() > 20);
    }
}
