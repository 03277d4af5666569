use std::{fmt, str::FromStr};

use crate::{
    error::{Error, Result},
    grid::{Edges, Grid, ALIVE, DEAD},
};

/// Anything that owns a grid and knows how to advance it one generation.
pub trait CellularAutomaton {
    fn grid(&self) -> &Grid;
    fn grid_mut(&mut self) -> &mut Grid;
    fn step(&mut self);
    fn generation(&self) -> u64;

    /// Advances one generation and reports whether any cell changed.
    fn step_changed(&mut self) -> bool {
        let before = self.grid().clone();
        self.step();
        *self.grid() != before
    }
}

/// Birth / survival neighbor counts of a Life-like rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    birth: [bool; 9],
    survive: [bool; 9],
}

impl Rule {
    pub fn new(birth: &[u8], survive: &[u8]) -> Result<Self> {
        let mut rule = Rule {
            birth: [false; 9],
            survive: [false; 9],
        };
        for (counts, table) in [(birth, &mut rule.birth), (survive, &mut rule.survive)] {
            for &n in counts {
                let slot = table
                    .get_mut(n as usize)
                    .ok_or_else(|| Error::InvalidRule(format!("neighbor count {n}")))?;
                *slot = true;
            }
        }
        Ok(rule)
    }

    /// B3/S23
    pub fn conway() -> Self {
        let mut birth = [false; 9];
        let mut survive = [false; 9];
        birth[3] = true;
        survive[2] = true;
        survive[3] = true;
        Rule { birth, survive }
    }

    #[inline]
    pub fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        let n = neighbors as usize;
        if alive {
            self.survive.get(n).copied().unwrap_or(false)
        } else {
            self.birth.get(n).copied().unwrap_or(false)
        }
    }
}

impl Default for Rule {
    fn default() -> Self {
        Rule::conway()
    }
}

impl FromStr for Rule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidRule(s.to_string());
        let mut birth = None;
        let mut survive = None;

        for part in s.trim().split('/') {
            let mut chars = part.chars();
            let slot = match chars.next().map(|c| c.to_ascii_uppercase()) {
                Some('B') => &mut birth,
                Some('S') => &mut survive,
                _ => return Err(invalid()),
            };
            if slot.is_some() {
                return Err(invalid());
            }
            let counts = chars
                .map(|c| c.to_digit(10).filter(|&d| d <= 8).map(|d| d as u8))
                .collect::<Option<Vec<u8>>>()
                .ok_or_else(invalid)?;
            *slot = Some(counts);
        }

        match (birth, survive) {
            (Some(b), Some(s)) => Rule::new(&b, &s),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = |t: &[bool; 9]| -> String {
            (0..9).filter(|&i| t[i]).map(|i| char::from(b'0' + i as u8)).collect()
        };
        write!(f, "B{}/S{}", digits(&self.birth), digits(&self.survive))
    }
}

/// Two-state automaton on a Moore neighborhood, parameterized by a [`Rule`].
#[derive(Debug, Clone)]
pub struct LifeLike {
    grid: Grid,
    next: Vec<Vec<i32>>,
    rule: Rule,
    edges: Edges,
    generation: u64,
}

/// Conway's Game of Life is the B3/S23 member of the family.
pub type ConwayLife = LifeLike;

impl LifeLike {
    pub fn new(grid: Grid, rule: Rule, edges: Edges) -> Self {
        let next = grid.as_rows().to_vec();
        LifeLike {
            grid,
            next,
            rule,
            edges,
            generation: 0,
        }
    }

    /// Empty Conway field with dead borders.
    pub fn conway(rows: usize, cols: usize) -> Result<Self> {
        Ok(Self::new(Grid::new(rows, cols)?, Rule::conway(), Edges::Bounded))
    }

    #[inline]
    pub fn rule(&self) -> Rule {
        self.rule
    }

    #[inline]
    pub fn edges(&self) -> Edges {
        self.edges
    }
}

impl CellularAutomaton for LifeLike {
    #[inline]
    fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    fn step(&mut self) {
        self.step_changed();
    }

    #[inline]
    fn generation(&self) -> u64 {
        self.generation
    }

    fn step_changed(&mut self) -> bool {
        let mut changed = false;
        for i in 0..self.grid.rows() {
            for j in 0..self.grid.cols() {
                let alive = self.grid.is_alive(i, j);
                let n = self.grid.live_neighbors(i, j, self.edges);
                let next = self.rule.next_state(alive, n);
                changed |= next != alive;
                self.next[i][j] = if next { ALIVE } else { DEAD };
            }
        }
        std::mem::swap(self.grid.data_mut(), &mut self.next);
        self.generation += 1;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn life(pattern: &str) -> LifeLike {
        LifeLike::new(Grid::from_pattern(pattern).unwrap(), Rule::conway(), Edges::Bounded)
    }

    #[test]
    fn conway_transitions() {
        let r = Rule::conway();
        assert!(r.next_state(false, 3));
        assert!(!r.next_state(false, 2));
        assert!(r.next_state(true, 2));
        assert!(r.next_state(true, 3));
        assert!(!r.next_state(true, 1));
        assert!(!r.next_state(true, 4));
    }

    #[test]
    fn rule_parsing() {
        assert_eq!("B3/S23".parse::<Rule>().unwrap(), Rule::conway());
        assert_eq!("s23/b3".parse::<Rule>().unwrap(), Rule::conway());
        assert_eq!("B36/S23".parse::<Rule>().unwrap().to_string(), "B36/S23");
        assert_eq!("B2/S".parse::<Rule>().unwrap().to_string(), "B2/S");
        for bad in ["", "B3", "B9/S23", "X3/S23", "B3/B3", "B3/S2a"] {
            assert!(matches!(bad.parse::<Rule>(), Err(Error::InvalidRule(_))), "{bad}");
        }
    }

    /// Shifts every row down by one, wrapping, and relies on the provided
    /// `step_changed`.
    struct RollDown {
        grid: Grid,
        generation: u64,
    }

    impl CellularAutomaton for RollDown {
        fn grid(&self) -> &Grid {
            &self.grid
        }

        fn grid_mut(&mut self) -> &mut Grid {
            &mut self.grid
        }

        fn step(&mut self) {
            self.grid.data_mut().rotate_right(1);
            self.generation += 1;
        }

        fn generation(&self) -> u64 {
            self.generation
        }
    }

    #[test]
    fn provided_step_changed_compares_generations() {
        let mut moving = RollDown {
            grid: Grid::from_pattern("#.\n..\n").unwrap(),
            generation: 0,
        };
        assert!(moving.step_changed());
        assert!(moving.grid().is_alive(1, 0));

        let mut uniform = RollDown {
            grid: Grid::from_pattern("##\n##\n").unwrap(),
            generation: 0,
        };
        assert!(!uniform.step_changed());
        assert_eq!(uniform.generation(), 1);
    }

    #[test]
    fn lone_cell_dies() {
        let mut a = life("...\n.#.\n...\n");
        assert!(a.step_changed());
        assert_eq!(a.grid().population(), 0);
        assert_eq!(a.generation(), 1);
    }

    #[test]
    fn block_is_stable() {
        let mut a = life("....\n.##.\n.##.\n....\n");
        let before = a.grid().clone();
        assert!(!a.step_changed());
        assert_eq!(a.grid(), &before);
    }

    #[test]
    fn blinker_has_period_two() {
        let mut a = life(".....\n.....\n.###.\n.....\n.....\n");
        let start = a.grid().clone();
        a.step();
        assert_eq!(a.grid(), &Grid::from_pattern(".....\n..#..\n..#..\n..#..\n.....\n").unwrap());
        a.step();
        assert_eq!(a.grid(), &start);
        assert_eq!(a.generation(), 2);
    }

    #[test]
    fn bounded_edges_are_dead() {
        // A blinker on the top row cannot grow upward.
        let mut a = life("###\n...\n...\n");
        a.step();
        assert_eq!(a.grid(), &Grid::from_pattern(".#.\n.#.\n...\n").unwrap());
    }

    #[test]
    fn wrapping_edges_join() {
        let grid = Grid::from_pattern("#...#\n.....\n.....\n.....\n#....\n").unwrap();
        let mut a = LifeLike::new(grid, Rule::conway(), Edges::Wrapping);
        a.step();
        // Three corners of a wrapped block fill the fourth.
        assert_eq!(a.grid().population(), 4);
        assert!(a.grid().is_alive(4, 4));
    }
}
