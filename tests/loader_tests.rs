mod common;

use common::*;
use metropolis::scorer::kenken::CageOp;
use metropolis::scorer::loader::{
    load_covariance, load_dictionary, load_kenken, load_points, load_sudoku, parse_bitmap,
    parse_covariance, parse_dictionary, parse_kenken, parse_points, parse_sudoku,
};
use metropolis::MetropolisError;
use rstest::rstest;
use std::io::Write;
use tempfile::NamedTempFile;

// --- SUDOKU ---

#[test]
fn test_loader_reads_spaced_grid() {
    let (n, cells) = parse_sudoku(PUBLISHED_PUZZLE).unwrap();
    assert_eq!(n, 9);
    assert_eq!(cells, published_puzzle());
}

#[test]
fn test_loader_reads_compact_grid_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# compact form, dots are blanks").unwrap();
    for row in published_puzzle().chunks(9) {
        let line: String = row
            .iter()
            .map(|&d| if d == 0 { '.' } else { char::from(b'0' + d) })
            .collect();
        writeln!(file, "{}", line).unwrap();
    }

    let (n, cells) = load_sudoku(file.path().to_str().unwrap()).unwrap();
    assert_eq!(n, 9);
    assert_eq!(cells, published_puzzle());
}

#[test]
fn test_loader_reads_large_spaced_grid() {
    let text: String = (0..16)
        .map(|r| {
            let row: Vec<String> = (0..16).map(|c| ((r * 4 + r / 4 + c) % 16 + 1).to_string()).collect();
            row.join(" ") + "\n"
        })
        .collect();
    let (n, cells) = parse_sudoku(&text).unwrap();
    assert_eq!(n, 16);
    assert_eq!(cells.len(), 256);
    assert!(cells.iter().all(|&v| (1..=16).contains(&v)));
}

#[rstest]
#[case::ragged("123\n12\n123\n")]
#[case::bad_char("12a\n123\n123\n")]
#[case::digit_too_large("124\n123\n123\n")]
#[case::empty("# nothing here\n\n")]
fn test_loader_rejects_bad_sudoku(#[case] text: &str) {
    assert!(matches!(parse_sudoku(text), Err(MetropolisError::Input(_))));
}

#[test]
fn test_loader_missing_file_is_io_error() {
    let result = load_sudoku("/definitely/not/here.txt");
    assert!(matches!(result, Err(MetropolisError::Io(_))));
}

// --- DICTIONARY ---

#[test]
fn test_dictionary_filters_and_normalizes() {
    let text = "cat\nDOG\n-cow\nhorse\ncat\nt3n\n\nrat\n";
    let words = parse_dictionary(text, 3);
    assert_eq!(words, vec![b"CAT".to_vec(), b"DOG".to_vec()]);
}

#[test]
fn test_dictionary_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "ABABA").unwrap();
    writeln!(file, "babab").unwrap();
    writeln!(file, "ABBA").unwrap();

    let words = load_dictionary(file.path().to_str().unwrap(), 5).unwrap();
    assert_eq!(words.len(), 2);
    assert_eq!(words[1], b"BABAB".to_vec());
}

// --- POINTS ---

#[test]
fn test_points_parse_with_whitespace() {
    let points = parse_points("x, y\n0.0, 0.0\n 1.5 ,2\n-3,4.25\n").unwrap();
    assert_eq!(points, vec![(0.0, 0.0), (1.5, 2.0), (-3.0, 4.25)]);
}

#[test]
fn test_points_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "x,y").unwrap();
    writeln!(file, "1,1").unwrap();
    writeln!(file, "2,2").unwrap();
    let points = load_points(file.path().to_str().unwrap()).unwrap();
    assert_eq!(points.len(), 2);
}

#[test]
fn test_points_reject_garbage() {
    assert!(matches!(parse_points("x,y\n1,abc\n"), Err(MetropolisError::Csv(_))));
    assert!(matches!(parse_points("x,y\n1,NaN\n"), Err(MetropolisError::Input(_))));
}

// --- COVARIANCE ---

#[test]
fn test_covariance_parses_named_matrix() {
    let (tickers, matrix) = parse_covariance("AAA, BBB\n0.04, 0.01\n 0.01 ,0.09\n").unwrap();
    assert_eq!(tickers, vec!["AAA".to_string(), "BBB".to_string()]);
    assert_eq!(matrix, vec![0.04, 0.01, 0.01, 0.09]);
}

#[test]
fn test_covariance_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "X,Y,Z").unwrap();
    writeln!(file, "1,0,0").unwrap();
    writeln!(file, "0,2,0").unwrap();
    writeln!(file, "0,0,3").unwrap();
    let (tickers, matrix) = load_covariance(file.path().to_str().unwrap()).unwrap();
    assert_eq!(tickers.len(), 3);
    assert_eq!(matrix[8], 3.0);
}

#[rstest]
#[case::short_row("A,B\n1,0\n0\n")]
#[case::long_row("A,B\n1,0,5\n0,1\n")]
#[case::missing_row("A,B\n1,0\n")]
#[case::extra_row("A,B\n1,0\n0,1\n0,1\n")]
fn test_covariance_rejects_bad_shape(#[case] text: &str) {
    assert!(matches!(parse_covariance(text), Err(MetropolisError::Input(_))));
}

#[test]
fn test_covariance_rejects_garbage() {
    assert!(matches!(parse_covariance("A,B\n1,x\n0,1\n"), Err(MetropolisError::Csv(_))));
}

// --- KENKEN ---

const KENKEN_3X3: &str = "\
AAB
CDB
CDD
A +3
B x6
C - 1
D +5
";

#[test]
fn test_kenken_parses_regions_and_rules() {
    let puzzle = parse_kenken(KENKEN_3X3).unwrap();
    assert_eq!(puzzle.n(), 3);
    assert_eq!(puzzle.cages().len(), 4);

    let a = &puzzle.cages()[0];
    assert_eq!((a.op, a.target, a.sites.clone()), (CageOp::Add, 3, vec![0, 1]));
    let b = &puzzle.cages()[1];
    assert_eq!((b.op, b.target, b.sites.clone()), (CageOp::Mul, 6, vec![2, 5]));
    let c = &puzzle.cages()[2];
    assert_eq!((c.op, c.target), (CageOp::Sub, 1));
    assert_eq!(puzzle.cage_of(8), 3);
}

#[test]
fn test_kenken_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", KENKEN_3X3).unwrap();
    let puzzle = load_kenken(file.path().to_str().unwrap()).unwrap();
    assert_eq!(puzzle.cages().len(), 4);
}

#[rstest]
#[case::unknown_op("AB\nAB\nA %3\nB +3\n", "unknown operation")]
#[case::missing_rule("AB\nAB\nA +3\n", "no rule")]
#[case::unknown_region("AB\nAB\nA +3\nB +3\nC +1\n", "no region")]
#[case::bad_target("AB\nAB\nA +x\nB +3\n", "line 3")]
#[case::short_map("ABC\nABC\n", "region rows")]
fn test_kenken_rejects(#[case] text: &str, #[case] needle: &str) {
    match parse_kenken(text) {
        Err(MetropolisError::Input(msg)) => assert!(msg.contains(needle), "{}", msg),
        other => panic!("expected input error, got {:?}", other.map(|p| p.n())),
    }
}

// --- BITMAP ---

#[rstest]
#[case("010\n111\n010\n")]
#[case(".#.\n###\n.#.\n")]
fn test_bitmap_formats(#[case] text: &str) {
    let (size, pixels) = parse_bitmap(text).unwrap();
    assert_eq!((size.rows, size.cols), (3, 3));
    assert_eq!(pixels, vec![0, 1, 0, 1, 1, 1, 0, 1, 0]);
}

#[test]
fn test_bitmap_rejects_ragged_rows() {
    assert!(parse_bitmap("010\n01\n").is_err());
    assert!(parse_bitmap("0x0\n").is_err());
    assert!(parse_bitmap("\n\n").is_err());
}
