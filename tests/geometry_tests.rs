mod common;

use common::*;
use metropolis::geometry::{ConstraintGroups, GridSize};
use rstest::rstest;

#[test]
fn test_reflection_and_center() {
    let size = GridSize::square(9);
    assert_eq!(size.reflect(0), 80);
    assert_eq!(size.reflect(site(1, 2)), site(7, 6));
    assert_eq!(size.center(), Some(40));
    assert_eq!(size.reflect(40), 40);

    let wide = GridSize::new(2, 3);
    assert_eq!(wide.center(), None);
    assert_eq!((wide.row(4), wide.col(4)), (1, 1));
}

#[test]
fn test_neighbors_stay_inside() {
    let size = GridSize::new(3, 4);
    let mut corner: Vec<usize> = size.neighbors4(0).collect();
    corner.sort_unstable();
    assert_eq!(corner, vec![1, 4]);

    let mut inner: Vec<usize> = size.neighbors4(size.index(1, 1)).collect();
    inner.sort_unstable();
    assert_eq!(inner, vec![1, 4, 6, 9]);
}

#[test]
fn test_sudoku_peers() {
    let groups = classic_groups();
    assert_eq!(groups.groups().len(), 27);
    for s in 0..81 {
        assert_eq!(groups.peers(s).len(), 20, "site {}", s);
        assert_eq!(groups.groups_of(s).len(), 3);
        assert!(!groups.peers(s).contains(&s));
    }
    assert!(groups.peers(0).contains(&site(2, 2)));
    assert!(!groups.peers(0).contains(&site(3, 3)));
}

#[rstest]
#[case(4, 2, 2)]
#[case(6, 2, 3)]
#[case(8, 2, 4)]
#[case(9, 3, 3)]
#[case(12, 3, 4)]
#[case(16, 4, 4)]
fn test_squarest_boxes(#[case] side: usize, #[case] box_rows: usize, #[case] box_cols: usize) {
    let groups = ConstraintGroups::sudoku_of_side(side).unwrap();
    assert_eq!(groups.symbols() as usize, side);
    assert_eq!(groups.groups().len(), 3 * side);

    // The first box spans `box_rows` rows and `box_cols` columns.
    let first_box = &groups.groups()[2 * side];
    let size = groups.size();
    let rows = first_box.iter().map(|&s| size.row(s)).max().unwrap() + 1;
    let cols = first_box.iter().map(|&s| size.col(s)).max().unwrap() + 1;
    assert_eq!((rows, cols), (box_rows, box_cols));
}

#[test]
fn test_is_solution() {
    let groups = classic_groups();
    let solution = published_solution();
    assert!(groups.is_solution(&solution));
    assert!(!groups.is_solution(&published_puzzle()));
    assert!(!groups.is_solution(&solution[..80]));

    let mut swapped = solution.clone();
    swapped.swap(0, 1);
    assert!(!groups.is_solution(&swapped));
}

#[test]
fn test_latin_square_has_no_boxes() {
    let groups = ConstraintGroups::latin(5).unwrap();
    assert_eq!(groups.groups().len(), 10);
    assert_eq!(groups.peers(0).len(), 8);
    assert_eq!(groups.domain(), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_malformed_groups_rejected() {
    let size = GridSize::square(2);
    assert!(ConstraintGroups::new(size, 2, vec![vec![0, 1], vec![2]]).is_err());
    assert!(ConstraintGroups::new(size, 2, vec![vec![0, 9]]).is_err());
    assert!(ConstraintGroups::new(size, 0, vec![]).is_err());
    assert!(ConstraintGroups::latin(65).is_err());
}
