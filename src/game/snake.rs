use std::collections::{HashSet, VecDeque};

use super::direction::Direction;
use super::grid::{Cell, Grid};
use crate::error::SelfCollision;

/// The snake: an ordered body, head first, plus the direction it faces.
///
/// `occupied` mirrors `body` as a set for constant-time membership tests.
/// Both are only ever changed together inside `advance`.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Cell>,
    occupied: HashSet<Cell>,
    direction: Direction,
    pending_growth: bool,
}

impl Snake {
    /// Lay out `length` cells in a straight line behind `head`, facing `direction`
    pub fn new(head: Cell, direction: Direction, length: usize, grid: &Grid) -> Self {
        let back = direction.opposite();
        let mut body = VecDeque::with_capacity(length.max(1));
        let mut cell = grid.wrap(head);
        body.push_back(cell);

        for _ in 1..length {
            cell = grid.step(cell, back);
            body.push_back(cell);
        }

        let occupied = body.iter().copied().collect();
        Self {
            body,
            occupied,
            direction,
            pending_growth: false,
        }
    }

    /// Build a snake from explicit segments, head first.
    ///
    /// Returns `None` when the body is empty or has repeated cells.
    pub fn from_body(body: impl IntoIterator<Item = Cell>, direction: Direction) -> Option<Self> {
        let body: VecDeque<Cell> = body.into_iter().collect();
        let occupied: HashSet<Cell> = body.iter().copied().collect();

        if body.is_empty() || occupied.len() != body.len() {
            return None;
        }

        Some(Self {
            body,
            occupied,
            direction,
            pending_growth: false,
        })
    }

    pub fn head(&self) -> Cell {
        // body is never empty
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn body(&self) -> impl ExactSizeIterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn has_pending_growth(&self) -> bool {
        self.pending_growth
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.occupied.contains(&cell)
    }

    pub fn occupied(&self) -> &HashSet<Cell> {
        &self.occupied
    }

    /// Face `direction` unless it would reverse the snake onto itself
    pub fn turn(&mut self, direction: Direction) {
        if !self.direction.is_opposite(direction) {
            self.direction = direction;
        }
    }

    /// Grow by one segment on the next `advance`. Repeated calls do not stack.
    pub fn mark_growth(&mut self) {
        self.pending_growth = true;
    }

    /// Move one cell forward, wrapping at the grid edges.
    ///
    /// The new head is checked against every segment behind the current
    /// head, including the tail that is about to move away. On collision the
    /// snake is left untouched.
    pub fn advance(&mut self, grid: &Grid) -> Result<Cell, SelfCollision> {
        let head = self.head();
        let new_head = grid.step(head, self.direction);

        // Both sides are at least 2 cells, so the new head is never the current
        // head and a hit anywhere in the set is a hit on body[1..]
        if self.occupied.contains(&new_head) {
            return Err(SelfCollision { at: new_head });
        }

        self.body.push_front(new_head);
        self.occupied.insert(new_head);

        if self.pending_growth {
            self.pending_growth = false;
        } else if let Some(tail) = self.body.pop_back() {
            self.occupied.remove(&tail);
        }

        Ok(new_head)
    }
}
