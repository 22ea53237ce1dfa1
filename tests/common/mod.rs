#![allow(dead_code)]

use metropolis::geometry::ConstraintGroups;

/// A 24-clue, point-symmetric puzzle with one solution. 0 marks a blank.
pub const PUBLISHED_PUZZLE: &str = "\
0 0 0 0 8 1 0 0 0
0 0 2 0 0 7 8 0 0
0 5 3 0 0 0 1 7 0
3 7 0 0 0 0 0 0 0
6 0 0 0 0 0 0 0 3
0 0 0 0 0 0 0 2 4
0 6 9 0 0 0 2 3 0
0 0 5 9 0 0 4 0 0
0 0 0 6 5 0 0 0 0
";

pub const PUBLISHED_SOLUTION: &str = "\
746281359
912537846
853496172
374125698
628749513
591368724
169874235
285913467
437652981
";

pub fn digits(text: &str) -> Vec<u8> {
    text.chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| d as u8)
        .collect()
}

pub fn published_puzzle() -> Vec<u8> {
    digits(PUBLISHED_PUZZLE)
}

pub fn published_solution() -> Vec<u8> {
    digits(PUBLISHED_SOLUTION)
}

pub fn classic_groups() -> ConstraintGroups {
    ConstraintGroups::sudoku(3, 3).unwrap()
}

/// One free cell per row, column and box of the published solution.
pub const SCATTERED_CELLS: [(usize, usize); 9] = [
    (0, 0),
    (1, 3),
    (2, 6),
    (3, 1),
    (4, 4),
    (5, 7),
    (6, 2),
    (7, 5),
    (8, 8),
];

/// Four cells forming a swappable 3/8 rectangle in the published solution.
pub const RECTANGLE: [(usize, usize); 4] = [(0, 4), (0, 6), (1, 4), (1, 6)];

pub fn site(row: usize, col: usize) -> usize {
    row * 9 + col
}
