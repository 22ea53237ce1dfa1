mod common;

use common::*;
use regex::Regex;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    _dir: TempDir,
    puzzle_path: PathBuf,
    small_path: PathBuf,
    points_path: PathBuf,
    words_path: PathBuf,
    image_path: PathBuf,
    covariance_path: PathBuf,
    config_path: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let puzzle_path = dir.path().join("published.txt");
        let small_path = dir.path().join("small.txt");
        let points_path = dir.path().join("cities.csv");
        let words_path = dir.path().join("words.txt");
        let image_path = dir.path().join("noisy.txt");
        let covariance_path = dir.path().join("covariance.csv");
        let config_path = dir.path().join("config.json");

        let mut f = File::create(&puzzle_path).unwrap();
        write!(f, "{}", PUBLISHED_PUZZLE).unwrap();

        // 4x4 with a single completion.
        let mut f = File::create(&small_path).unwrap();
        writeln!(f, "1...").unwrap();
        writeln!(f, "..1.").unwrap();
        writeln!(f, ".4..").unwrap();
        writeln!(f, "...3").unwrap();

        let mut f = File::create(&points_path).unwrap();
        writeln!(f, "x,y").unwrap();
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.5, 0.2)] {
            writeln!(f, "{},{}", x, y).unwrap();
        }

        let mut f = File::create(&words_path).unwrap();
        writeln!(f, "ABABA").unwrap();
        writeln!(f, "BABAB").unwrap();

        let mut f = File::create(&image_path).unwrap();
        writeln!(f, "........").unwrap();
        writeln!(f, ".####...").unwrap();
        writeln!(f, ".#.##...").unwrap();
        writeln!(f, ".####..#").unwrap();
        writeln!(f, "........").unwrap();

        let mut f = File::create(&covariance_path).unwrap();
        writeln!(f, "LOW,MID,HIGH").unwrap();
        writeln!(f, "0.010,0.027,0.002").unwrap();
        writeln!(f, "0.027,0.090,0.004").unwrap();
        writeln!(f, "0.002,0.004,0.040").unwrap();

        let mut f = File::create(&config_path).unwrap();
        writeln!(f, r#"{{ "search": {{ "max_steps": 5000 }} }}"#).unwrap();

        Self {
            _dir: dir,
            puzzle_path,
            small_path,
            points_path,
            words_path,
            image_path,
            covariance_path,
            config_path,
        }
    }
}

fn run(args: &[&str]) -> (Output, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_metropolis"))
        .args(args)
        .output()
        .expect("Failed to execute binary");
    // Log lines carry colour codes.
    let ansi = Regex::new(r"\x1b\[[0-9;]*m").unwrap();
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    let clean = ansi.replace_all(&text, "").to_string();
    (output, clean)
}

fn path(p: &Path) -> &str {
    p.to_str().unwrap()
}

#[test]
fn test_cli_solve_small_grid() {
    let ctx = TestContext::new();
    let (output, text) = run(&["solve", "-p", path(&ctx.small_path), "-S", "1", "--max-steps", "2000000"]);
    assert!(output.status.success(), "{}", text);
    assert!(text.contains("PUZZLE"));
    assert!(text.contains("BEST GRID"));
    assert!(text.contains("Seed: 1"));
}

#[test]
fn test_cli_solve_published_within_budget() {
    let ctx = TestContext::new();
    let (output, text) = run(&[
        "solve",
        "--puzzle",
        path(&ctx.puzzle_path),
        "--seed",
        "5",
        "--max-steps",
        "100000",
    ]);
    assert!(output.status.success(), "{}", text);
    // Either outcome is reported; the summary table is always there.
    assert!(text.contains("Status"));
    assert!(text.contains("Solved") || text.contains("No solution within budget"));
}

#[test]
fn test_cli_generate_small_puzzle() {
    let (output, text) = run(&[
        "generate",
        "--side",
        "4",
        "--target-clues",
        "8",
        "--max-proposals",
        "50000",
        "-S",
        "11",
    ]);
    assert!(output.status.success(), "{}", text);
    assert!(text.contains("SOLUTION"));
    assert!(Regex::new(r"\d+ clues, uniquely solvable").unwrap().is_match(&text));
}

#[test]
fn test_cli_magic_square() {
    let (output, text) = run(&["magic", "--order", "3", "-S", "7", "--max-steps", "3000000"]);
    assert!(output.status.success(), "{}", text);
    assert!(text.contains("MAGIC SQUARE"));
    assert!(text.contains("line sum 15"));
}

#[test]
fn test_cli_tour() {
    let ctx = TestContext::new();
    let (output, text) = run(&["tour", "-p", path(&ctx.points_path), "--max-steps", "20000", "-S", "2"]);
    assert!(output.status.success(), "{}", text);
    let re = Regex::new(r"Tour length (\d+\.\d+): 0 -> ").unwrap();
    let caps = re.captures(&text).expect("tour summary missing");
    let length: f64 = caps[1].parse().unwrap();
    assert!(length > 0.0);
}

#[test]
fn test_cli_crossword() {
    let ctx = TestContext::new();
    let (output, text) = run(&[
        "crossword",
        "-w",
        path(&ctx.words_path),
        "--size",
        "5",
        "--max-steps",
        "2000000",
        "-S",
        "4",
    ]);
    assert!(output.status.success(), "{}", text);
}

#[test]
fn test_cli_denoise() {
    let ctx = TestContext::new();
    let (output, text) = run(&[
        "denoise",
        "-i",
        path(&ctx.image_path),
        "--years",
        "5",
        "--max-steps",
        "20000",
    ]);
    assert!(output.status.success(), "{}", text);
    assert!(text.contains("DEGRADED"));
    assert!(text.contains("RESTORED"));
}

#[test]
fn test_cli_denoise_ages_clean_image() {
    let ctx = TestContext::new();
    let (output, text) = run(&[
        "denoise",
        "-i",
        path(&ctx.image_path),
        "--degrade",
        "--years",
        "400",
        "-S",
        "3",
        "--max-steps",
        "20000",
    ]);
    assert!(output.status.success(), "{}", text);
    assert!(text.contains("ORIGINAL"));
    assert!(text.contains("Wrong pixels:"), "{}", text);
}

#[test]
fn test_cli_portfolio_long_only() {
    let ctx = TestContext::new();
    let (output, text) = run(&[
        "portfolio",
        "--covariance",
        path(&ctx.covariance_path),
        "--lots",
        "1000",
        "-S",
        "2",
        "--max-steps",
        "100000",
    ]);
    assert!(output.status.success(), "{}", text);
    assert!(text.contains("HOLDINGS"));
    assert!(text.contains("shorts forbidden"));
    assert!(text.contains("No single-lot transfer lowers the variance"), "{}", text);
    // Long-only holdings never print a minus sign in the lots column.
    let lots = Regex::new(r"\|\s*(LOW|MID|HIGH)\s*\|\s*(-?\d+)\s*\|").unwrap();
    let held: Vec<i64> = lots
        .captures_iter(&text)
        .map(|c| c[2].parse().unwrap())
        .collect();
    assert_eq!(held.len(), 3, "{}", text);
    assert!(held.iter().all(|&h| h >= 0));
    assert_eq!(held.iter().sum::<i64>(), 1000);
}

#[test]
fn test_cli_portfolio_with_shorts() {
    let ctx = TestContext::new();
    let (output, text) = run(&[
        "portfolio",
        "-c",
        path(&ctx.covariance_path),
        "--lots",
        "1000",
        "--allow-shorts",
        "-S",
        "2",
        "--max-steps",
        "100000",
    ]);
    assert!(output.status.success(), "{}", text);
    assert!(text.contains("shorts allowed"));
    assert!(text.contains("Closed-form minimum variance"), "{}", text);
}

#[test]
fn test_cli_config_file_sets_budget() {
    let ctx = TestContext::new();
    let (output, text) = run(&[
        "magic",
        "--order",
        "8",
        "--target-cost=-1",
        "--config",
        path(&ctx.config_path),
    ]);
    assert!(output.status.success(), "{}", text);
    // Unreachable target: the step budget from the file ends the run.
    assert!(text.contains("budget expired"), "{}", text);
}

#[test]
fn test_cli_missing_file_fails() {
    let (output, text) = run(&["solve", "-p", "/definitely/not/here.txt"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(text.contains("IO Error"), "{}", text);
}

#[test]
fn test_cli_bad_reducer_setting_fails() {
    let (output, text) = run(&["generate", "--difficulty", "12"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(text.contains("difficulty"), "{}", text);
}

#[test]
fn test_cli_unreachable_clue_target_gives_up() {
    // No 4x4 puzzle with two clues is unique; the default cap ends the walk.
    let (output, text) = run(&["generate", "--side", "4", "--target-clues", "2", "-S", "1"]);
    assert_eq!(output.status.code(), Some(1), "{}", text);
    assert!(text.contains("No proposal cap given"), "{}", text);
    assert!(text.contains("after 100000 proposals"), "{}", text);
}

#[test]
fn test_cli_seed_replays_grid() {
    let grid = || {
        let (output, text) = run(&["magic", "--order", "4", "-S", "9", "--max-steps", "50000"]);
        assert!(output.status.success(), "{}", text);
        let start = text.find("MAGIC SQUARE").expect("grid missing");
        text[start..]
            .lines()
            .filter(|l| l.starts_with('+') || l.starts_with('|'))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let first = grid();
    assert!(!first.is_empty());
    assert_eq!(first, grid());
}
