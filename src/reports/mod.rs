use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use metropolis::geometry::GridSize;
use metropolis::optimizer::{AnnealOutcome, Termination};
use std::fmt::Display;

/// Prints a grid, one table cell per site. Empty labels render as blanks.
pub fn print_grid(title: &str, size: GridSize, label: impl Fn(usize) -> String) {
    println!("\n{}", title);
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    for r in 0..size.rows {
        let cells: Vec<Cell> = (0..size.cols)
            .map(|c| Cell::new(label(size.index(r, c))).set_alignment(CellAlignment::Center))
            .collect();
        table.add_row(cells);
    }
    println!("{}", table);
}

/// Digits with `0` shown as a blank.
pub fn print_digits<T: Copy + Display + PartialEq + Default>(title: &str, size: GridSize, values: &[T]) {
    print_grid(title, size, |s| {
        if values[s] == T::default() {
            " ".to_string()
        } else {
            values[s].to_string()
        }
    });
}

pub fn print_letters(title: &str, size: GridSize, letters: &[u8]) {
    print_grid(title, size, |s| (letters[s] as char).to_string());
}

pub fn print_bitmap(title: &str, size: GridSize, pixels: &[u8]) {
    println!("\n{}", title);
    for r in 0..size.rows {
        let line: String = (0..size.cols)
            .map(|c| if pixels[size.index(r, c)] == 1 { '#' } else { '.' })
            .collect();
        println!("  {}", line);
    }
}

/// One row per asset: lots held and portfolio weight.
pub fn print_weights(title: &str, names: &[String], holdings: &[i64], weights: &[f64]) {
    println!("\n{}", title);
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec![
        Cell::new("Asset").add_attribute(Attribute::Bold),
        Cell::new("Lots"),
        Cell::new("Weight"),
    ]);
    for ((name, &lots), &w) in names.iter().zip(holdings).zip(weights) {
        let weight = Cell::new(format!("{:.2}%", 100.0 * w));
        let weight = if lots < 0 { weight.fg(Color::Red) } else { weight };
        table.add_row(vec![Cell::new(name), Cell::new(lots), weight]);
    }
    for i in 1..=2 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("{}", table);
}

pub fn print_run_summary<S, E: Display + Copy>(outcome: &AnnealOutcome<S, E>) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let status = match outcome.termination {
        Termination::Converged => Cell::new(outcome.termination).fg(Color::Green),
        Termination::Cancelled | Termination::NoMoves => {
            Cell::new(outcome.termination).fg(Color::Red)
        }
        Termination::BudgetExpired => Cell::new(outcome.termination).fg(Color::Yellow),
    };

    table.add_row(vec![
        Cell::new("Status").add_attribute(Attribute::Bold),
        Cell::new("Steps"),
        Cell::new("Accepted"),
        Cell::new("Time"),
        Cell::new("Best").fg(Color::Cyan),
        Cell::new("Found At"),
        Cell::new("Final"),
    ]);
    for i in 1..=6 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    let rate = if outcome.steps > 0 {
        100.0 * outcome.accepted as f64 / outcome.steps as f64
    } else {
        0.0
    };
    table.add_row(vec![
        status,
        Cell::new(outcome.steps),
        Cell::new(format!("{} ({:.1}%)", outcome.accepted, rate)),
        Cell::new(format!("{:.2?}", outcome.elapsed)),
        Cell::new(format!("{:.4}", outcome.best.cost)).fg(Color::Cyan),
        Cell::new(outcome.best.step),
        Cell::new(format!("{:.4}", outcome.current_cost)),
    ]);
    println!("\n{}", table);
}
