use std::collections::HashSet;

use life_screens::{
    shapes::ShapeLibrary, CellularAutomaton, ConwayLife, Edges, Grid, LifeLike, Rule,
};
use rand::{rngs::StdRng, SeedableRng};

fn shipped_library() -> ShapeLibrary {
    ShapeLibrary::load(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/shapes.json")).unwrap()
}

fn with_shape(name: &str, rows: usize, cols: usize) -> ConwayLife {
    let mut life = ConwayLife::conway(rows, cols).unwrap();
    let shape = shipped_library().get(name).unwrap();
    shape.place_centered(life.grid_mut()).unwrap();
    life
}

fn set_cells(grid: &mut Grid, cells: &[(usize, usize)]) {
    for &(r, c) in cells {
        grid.set(r, c, 1);
    }
}

fn collect_live(grid: &Grid) -> HashSet<(usize, usize)> {
    let mut out = HashSet::new();
    for (r, row) in grid.rows_iter().enumerate() {
        for (c, &state) in row.iter().enumerate() {
            if state == 1 {
                out.insert((r, c));
            }
        }
    }
    out
}

fn step_naive(cells: &HashSet<(usize, usize)>, rows: usize, cols: usize) -> HashSet<(usize, usize)> {
    let mut next = HashSet::new();
    for r in 0..rows {
        for c in 0..cols {
            let mut neighbors = 0;
            for dr in -1i64..=1 {
                for dc in -1i64..=1 {
                    if dr == 0 && dc == 0 {
                        continue;
                    }
                    let (nr, nc) = (r as i64 + dr, c as i64 + dc);
                    if nr >= 0 && nc >= 0 && cells.contains(&(nr as usize, nc as usize)) {
                        neighbors += 1;
                    }
                }
            }
            let alive = cells.contains(&(r, c));
            if neighbors == 3 || (alive && neighbors == 2) {
                next.insert((r, c));
            }
        }
    }
    next
}

#[test]
fn glider_moves_diagonally() {
    let mut life = ConwayLife::conway(20, 20).unwrap();
    set_cells(life.grid_mut(), &[(5, 6), (6, 7), (7, 5), (7, 6), (7, 7)]);
    let start = collect_live(life.grid());

    for _ in 0..4 {
        life.step();
    }

    let moved: HashSet<_> = start.iter().map(|&(r, c)| (r + 1, c + 1)).collect();
    assert_eq!(collect_live(life.grid()), moved);
    assert_eq!(life.generation(), 4);
}

#[test]
fn matches_naive_stepper_on_random_soup() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let mut grid = Grid::new(24, 31).unwrap();
    grid.randomize(&mut rng, 0.35);
    let mut expected = collect_live(&grid);
    let mut life = LifeLike::new(grid, Rule::conway(), Edges::Bounded);

    for gen in 0..40 {
        life.step();
        expected = step_naive(&expected, 24, 31);
        assert_eq!(collect_live(life.grid()), expected, "generation {gen}");
    }
}

#[test]
fn shipped_shapes_are_well_formed() {
    let lib = shipped_library();
    assert!(lib.len() >= 10);
    for name in lib.names() {
        let shape = lib.get(name).unwrap();
        assert!(!shape.cells.is_empty(), "{name} is empty");
        for cell in &shape.cells {
            assert!(
                (0..shape.width).contains(&cell.x) && (0..shape.height).contains(&cell.y),
                "{name}: ({}, {}) outside {}x{}",
                cell.x,
                cell.y,
                shape.width,
                shape.height
            );
        }
    }
}

#[test]
fn oscillator_periods() {
    for (name, period) in [("blinker", 2), ("toad", 2), ("beacon", 2), ("pulsar", 3)] {
        let mut life = with_shape(name, 17, 17);
        let start = life.grid().clone();
        life.step();
        assert_ne!(life.grid(), &start, "{name} should move");
        for _ in 1..period {
            life.step();
        }
        assert_eq!(life.grid(), &start, "{name} should have period {period}");
    }
}

#[test]
fn block_is_a_still_life() {
    let mut life = with_shape("block", 6, 6);
    assert!(!life.step_changed());
    assert_eq!(life.grid().population(), 4);
}

#[test]
fn gosper_gun_emits_a_glider_every_thirty_generations() {
    let mut life = with_shape("gosper_glider_gun", 40, 60);
    let gun = collect_live(life.grid());
    assert_eq!(gun.len(), 36);

    for _ in 0..30 {
        life.step();
    }

    let now = collect_live(life.grid());
    assert_eq!(now.len(), 41);
    assert!(gun.is_subset(&now));
}

#[test]
fn diehard_vanishes_after_130_generations() {
    let mut life = with_shape("diehard", 60, 80);
    for _ in 0..129 {
        life.step();
    }
    assert_eq!(life.grid().population(), 2);
    life.step();
    assert_eq!(life.grid().population(), 0);
}

#[test]
fn highlife_replicator_rule_differs_from_conway() {
    // Six neighbors give birth under B36/S23 but not under B3/S23.
    let pattern = "###\n...\n###\n";
    let mut conway = LifeLike::new(Grid::from_pattern(pattern).unwrap(), Rule::conway(), Edges::Bounded);
    let mut high = LifeLike::new(
        Grid::from_pattern(pattern).unwrap(),
        "B36/S23".parse().unwrap(),
        Edges::Bounded,
    );
    conway.step();
    high.step();
    assert!(!conway.grid().is_alive(1, 1));
    assert!(high.grid().is_alive(1, 1));
}
