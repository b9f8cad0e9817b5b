// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
use shopping_calc::ui;

use anyhow::Result;
use shopping_calc::{memo_totals, HistoryLedger};
#[cfg(feature = "tui")]
use shopping_calc::SettingsStore;
use std::env;
use std::path::PathBuf;

/// Default data directory, next to the working directory.
/// Override with SHOPPING_CALC_DATA.
const DATA_DIR: &str = "data";

fn data_dir() -> PathBuf {
    env::var_os("SHOPPING_CALC_DATA")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DATA_DIR))
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("history") => run_history()?,
        Some("summary") => run_summary()?,
        Some("export") => run_export(args.get(2).map(String::as_str))?,
        Some("clear-history") => run_clear_history(args.iter().any(|a| a == "--yes"))?,
        _ => run_ui_mode()?,
    }

    Ok(())
}

/// Print the whole ledger as a table.
fn run_history() -> Result<()> {
    let ledger = HistoryLedger::new(data_dir());
    let records = ledger.read_all()?;

    if records.is_empty() {
        println!("📒 No history yet. Save a tally from the Calc page first.");
        return Ok(());
    }

    println!("📒 History ({} tallies) — {}", records.len(), ledger.path().display());
    println!(
        "{:<20} {:>6} {:>12} {:>7} {:>12}  {}",
        "Datetime", "Count", "Subtotal", "Tax", "Total", "Memo"
    );
    for r in &records {
        println!(
            "{:<20} {:>6} {:>12.2} {:>6.1}% {:>12.2}  {}",
            r.datetime,
            r.count,
            r.subtotal,
            r.tax_rate * 100.0,
            r.total,
            r.memo
        );
    }

    Ok(())
}

/// Print totals grouped by memo (top 10), highest first.
fn run_summary() -> Result<()> {
    let ledger = HistoryLedger::new(data_dir());
    let records = ledger.read_all()?;

    if records.is_empty() {
        println!("📊 No history yet, nothing to summarize.");
        return Ok(());
    }

    println!("📊 Total by memo (top 10)");
    let buckets = memo_totals(&records);
    let max = buckets.first().map(|b| b.total).unwrap_or(0.0).max(1.0);

    for bucket in &buckets {
        let width = ((bucket.total / max) * 40.0).round() as usize;
        println!("{:<20} {:>12.2}  {}", bucket.memo, bucket.total, "█".repeat(width));
    }

    Ok(())
}

/// Copy the history CSV verbatim to the given path (default: ./history.csv).
fn run_export(dest: Option<&str>) -> Result<()> {
    let ledger = HistoryLedger::new(data_dir());
    let dest = PathBuf::from(dest.unwrap_or("history.csv"));

    if ledger.export_to(&dest)? {
        println!("✓ Exported history to {}", dest.display());
    } else {
        println!("No history file yet, nothing to export.");
    }

    Ok(())
}

/// Delete the whole history file. Irreversible, so it insists on --yes.
fn run_clear_history(confirmed: bool) -> Result<()> {
    if !confirmed {
        eprintln!("⚠  This deletes ALL history and cannot be undone.");
        eprintln!("   Re-run with: shopping-calc clear-history --yes");
        std::process::exit(1);
    }

    let ledger = HistoryLedger::new(data_dir());
    if ledger.clear()? {
        println!("✓ History deleted.");
    } else {
        println!("No history file yet, nothing to delete.");
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode() -> Result<()> {
    let dir = data_dir();
    let settings_store = SettingsStore::new(&dir);
    let ledger = HistoryLedger::new(&dir);

    let mut app = ui::App::new(settings_store, ledger)?;
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode() -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the CLI: shopping-calc history | summary | export | clear-history --yes");
    std::process::exit(1);
}
