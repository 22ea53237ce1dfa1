use super::kenken::{Cage, CageOp, KenKenPuzzle};
use crate::error::{MetroResult, MetropolisError};
use crate::geometry::GridSize;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::str::FromStr;
use strum::IntoEnumIterator;

fn input_error(what: &str, line: usize, msg: impl std::fmt::Display) -> MetropolisError {
    MetropolisError::Input(format!("{} line {}: {}", what, line + 1, msg))
}

fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'))
}

// --- Sudoku ---

/// Reads an `n x n` grid, `0` or `.` marking blanks.
///
/// Rows are either whitespace-separated numbers or, for sides up to 9,
/// a run of digits such as `53..7....`.
pub fn parse_sudoku(text: &str) -> MetroResult<(usize, Vec<u8>)> {
    let mut rows: Vec<Vec<u8>> = Vec::new();
    for (i, line) in content_lines(text) {
        let row: Vec<u8> = if line.contains(char::is_whitespace) {
            line.split_whitespace()
                .map(|tok| match tok {
                    "." => Ok(0),
                    _ => tok.parse::<u8>().map_err(|e| input_error("sudoku", i, e)),
                })
                .collect::<MetroResult<_>>()?
        } else {
            line.chars()
                .map(|ch| match ch {
                    '.' => Ok(0),
                    _ => ch
                        .to_digit(10)
                        .map(|d| d as u8)
                        .ok_or_else(|| input_error("sudoku", i, format!("bad cell '{}'", ch))),
                })
                .collect::<MetroResult<_>>()?
        };
        rows.push(row);
    }

    let n = rows.len();
    if n == 0 {
        return Err(MetropolisError::Input("sudoku grid is empty".into()));
    }
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
        return Err(MetropolisError::Input(format!(
            "sudoku row {} has {} cells, expected {}",
            i + 1,
            row.len(),
            n
        )));
    }
    let cells: Vec<u8> = rows.into_iter().flatten().collect();
    if let Some(&bad) = cells.iter().find(|&&v| v as usize > n) {
        return Err(MetropolisError::Input(format!(
            "digit {} does not fit a {}x{} grid",
            bad, n, n
        )));
    }
    Ok((n, cells))
}

pub fn load_sudoku(path: &str) -> MetroResult<(usize, Vec<u8>)> {
    parse_sudoku(&fs::read_to_string(path)?)
}

// --- Dictionary ---

/// One word per line. Lines starting with `-` are struck out and the first
/// blank line ends the list. Words are upper-cased and kept only at `len`.
pub fn parse_dictionary(text: &str, len: usize) -> Vec<Vec<u8>> {
    let mut words: Vec<Vec<u8>> = text
        .lines()
        .map(str::trim)
        .take_while(|l| !l.is_empty())
        .filter(|l| !l.starts_with('-'))
        .map(|l| l.to_ascii_uppercase().into_bytes())
        .filter(|w| w.len() == len && w.iter().all(u8::is_ascii_alphabetic))
        .collect();
    words.sort_unstable();
    words.dedup();
    words
}

pub fn load_dictionary(path: &str, len: usize) -> MetroResult<Vec<Vec<u8>>> {
    Ok(parse_dictionary(&fs::read_to_string(path)?, len))
}

// --- Tour points ---

#[derive(Debug, Deserialize)]
struct PointRecord {
    x: f64,
    y: f64,
}

/// CSV with `x` and `y` columns, one city per row.
pub fn parse_points(text: &str) -> MetroResult<Vec<(f64, f64)>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut points = Vec::new();
    for record in rdr.deserialize() {
        let p: PointRecord = record?;
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(MetropolisError::Input(format!(
                "city {} has a non-finite coordinate",
                points.len()
            )));
        }
        points.push((p.x, p.y));
    }
    Ok(points)
}

pub fn load_points(path: &str) -> MetroResult<Vec<(f64, f64)>> {
    parse_points(&fs::read_to_string(path)?)
}

// --- Covariance ---

/// CSV whose header names the assets, followed by one row of the covariance
/// matrix per asset in header order.
///
/// ```text
/// AAA, BBB
/// 0.04, 0.01
/// 0.01, 0.09
/// ```
pub fn parse_covariance(text: &str) -> MetroResult<(Vec<String>, Vec<f64>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let tickers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let n = tickers.len();
    let mut matrix = Vec::with_capacity(n * n);
    let mut rows = 0;
    for record in rdr.deserialize() {
        let row: Vec<f64> = record?;
        if row.len() != n {
            return Err(input_error(
                "covariance",
                rows + 1,
                format!("has {} entries, expected {}", row.len(), n),
            ));
        }
        matrix.extend(row);
        rows += 1;
    }
    if rows != n {
        return Err(MetropolisError::Input(format!(
            "covariance has {} rows for {} assets",
            rows, n
        )));
    }
    Ok((tickers, matrix))
}

pub fn load_covariance(path: &str) -> MetroResult<(Vec<String>, Vec<f64>)> {
    parse_covariance(&fs::read_to_string(path)?)
}

// --- KenKen ---

/// Region map followed by one rule per region.
///
/// ```text
/// AAB
/// CDB
/// CDD
/// A +3
/// B *6
/// C - 1
/// D +5
/// ```
pub fn parse_kenken(text: &str) -> MetroResult<KenKenPuzzle> {
    let lines: Vec<(usize, &str)> = content_lines(text).collect();
    let Some(&(_, first)) = lines.first() else {
        return Err(MetropolisError::Input("KenKen puzzle is empty".into()));
    };
    let n = first.chars().count();
    if lines.len() < n {
        return Err(MetropolisError::Input(format!(
            "KenKen needs {} region rows, found {}",
            n,
            lines.len()
        )));
    }

    let size = GridSize::square(n);
    let mut regions: BTreeMap<char, Vec<usize>> = BTreeMap::new();
    for (r, &(i, line)) in lines[..n].iter().enumerate() {
        let cells: Vec<char> = line.chars().collect();
        if cells.len() != n {
            return Err(input_error("kenken", i, format!("expected {} region letters", n)));
        }
        for (c, ch) in cells.into_iter().enumerate() {
            regions.entry(ch).or_default().push(size.index(r, c));
        }
    }

    let mut cages = Vec::with_capacity(regions.len());
    for &(i, line) in &lines[n..] {
        let mut chars = line.chars();
        let region = chars.next().unwrap_or_default();
        let rule = chars.as_str().trim();
        let op_str: String = rule.chars().take(1).collect();
        let op = CageOp::from_str(&op_str).map_err(|_| {
            let known: Vec<String> = CageOp::iter().map(|op| op.to_string()).collect();
            input_error(
                "kenken",
                i,
                format!("unknown operation '{}' (expected one of {})", op_str, known.join(" ")),
            )
        })?;
        let target: i64 = rule[op_str.len()..]
            .trim()
            .parse()
            .map_err(|e| input_error("kenken", i, e))?;
        let sites = regions
            .remove(&region)
            .ok_or_else(|| input_error("kenken", i, format!("no region '{}'", region)))?;
        cages.push(Cage { op, target, sites });
    }

    if let Some(region) = regions.keys().next() {
        return Err(MetropolisError::Input(format!(
            "region '{}' has no rule",
            region
        )));
    }
    KenKenPuzzle::new(n, cages)
}

pub fn load_kenken(path: &str) -> MetroResult<KenKenPuzzle> {
    parse_kenken(&fs::read_to_string(path)?)
}

// --- Bitmaps ---

/// Rows of `0`/`1` or `.`/`#`, all the same width.
pub fn parse_bitmap(text: &str) -> MetroResult<(GridSize, Vec<u8>)> {
    let mut pixels = Vec::new();
    let mut cols = None;
    let mut rows = 0;
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row: Vec<u8> = line
            .chars()
            .map(|ch| match ch {
                '0' | '.' => Ok(0),
                '1' | '#' => Ok(1),
                _ => Err(input_error("bitmap", i, format!("bad pixel '{}'", ch))),
            })
            .collect::<MetroResult<_>>()?;
        match cols {
            None => cols = Some(row.len()),
            Some(w) if w != row.len() => {
                return Err(input_error("bitmap", i, format!("expected width {}", w)));
            }
            Some(_) => {}
        }
        pixels.extend(row);
        rows += 1;
    }
    let cols = cols.ok_or_else(|| MetropolisError::Input("bitmap is empty".into()))?;
    Ok((GridSize::new(rows, cols), pixels))
}

pub fn load_bitmap(path: &str) -> MetroResult<(GridSize, Vec<u8>)> {
    parse_bitmap(&fs::read_to_string(path)?)
}
