//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.  Status lines go to stderr so
//! stdout stays clean for JSON and plaintext.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::profile::{FieldOutcome, PassReason, WalkReport};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    eprintln!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    eprintln!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    eprintln!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of per-field walk outcomes (Field, Status, Value).
pub fn print_outcomes_table(outcomes: &[(String, FieldOutcome)]) {
    if outcomes.is_empty() {
        info("The profile has no fields.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Status", "Value"]);

    for (name, outcome) in outcomes {
        let (status, value) = match outcome {
            FieldOutcome::Decrypted(plaintext) => ("decrypted".to_string(), plaintext.clone()),
            FieldOutcome::PassThrough { original, reason } => {
                let status = match reason {
                    PassReason::NotEncrypted => "plain".to_string(),
                    PassReason::AddressedElsewhere => "for another key".to_string(),
                    PassReason::AuthenticationFailed => "authentication failed".to_string(),
                    PassReason::Malformed(why) => format!("malformed: {why}"),
                };
                let value = match reason {
                    PassReason::NotEncrypted => original.to_string(),
                    _ => "<encrypted>".to_string(),
                };
                (status, value)
            }
        };
        table.add_row(vec![name.clone(), status, value]);
    }

    println!("{table}");
}

/// One-line summary of a walk.
pub fn print_report(report: &WalkReport) {
    info(&format!(
        "{} decrypted, {} plain, {} for other keys, {} failed",
        report.decrypted, report.plain, report.addressed_elsewhere, report.failed
    ));
}
