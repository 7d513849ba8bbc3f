//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init/status commands and shared utilities (open_db, parsers)
//! - `goals` - Goal CRUD and drift analysis commands
//! - `ledger` - Ledger entry commands with goal propagation
//! - `budget` - Budget cap commands and deviation display
//! - `advice` - Daily AI advice command
//! - `report` - Monthly AI report command
//! - `analysis` - Personal spending analysis command

pub mod advice;
pub mod analysis;
pub mod budget;
pub mod core;
pub mod goals;
pub mod ledger;
pub mod report;

// Re-export command functions for main.rs
pub use advice::*;
pub use analysis::*;
pub use budget::*;
pub use core::*;
pub use goals::*;
pub use ledger::*;
pub use report::*;

/// Format an integer KRW amount with thousands separators
pub fn format_krw(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if amount < 0 {
        format!("-{}원", out)
    } else {
        format!("{}원", out)
    }
}

#[cfg(test)]
mod tests {
    use super::format_krw;

    #[test]
    fn test_format_krw() {
        assert_eq!(format_krw(0), "0원");
        assert_eq!(format_krw(900), "900원");
        assert_eq!(format_krw(12_000), "12,000원");
        assert_eq!(format_krw(1_234_567), "1,234,567원");
        assert_eq!(format_krw(-45_000), "-45,000원");
    }
}
