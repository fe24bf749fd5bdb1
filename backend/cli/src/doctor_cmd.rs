//! CLI Doctor Command
//!
//! Checks that the OCR provider can be configured from the current environment.

use anyhow::Result;

use textcam_understanding::{VisionConfig, CREDENTIALS_ENV, PROJECT_ID_ENV};

use crate::terminal_output::{note_error, note_info, note_success, note_warn};

/// Runs every check. Returns whether all required checks passed.
pub async fn run() -> Result<bool> {
    note_info("Running textcam doctor");

    let lookup = |name: &str| std::env::var(name).ok();
    let is_ok = check_env_vars(&lookup) & check_credentials(&lookup);

    println!();
    if is_ok {
        note_success("All checks passed. The gateway can reach Cloud Vision.");
    } else {
        note_error("Some checks failed. Recognition requests will be refused until they are fixed.");
    }
    Ok(is_ok)
}

fn check_env_vars<F>(lookup: &F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    // true = optional
    let checks = [(CREDENTIALS_ENV, false), (PROJECT_ID_ENV, true)];

    let mut all_good = true;
    for (var, optional) in checks {
        match lookup(var) {
            Some(val) if !val.trim().is_empty() => note_success(&format!("{var} is set")),
            _ if optional => note_warn(&format!("{var} is missing (optional, the key's project is used)")),
            _ => {
                note_error(&format!("{var} is missing (REQUIRED)"));
                all_good = false;
            }
        }
    }
    all_good
}

fn check_credentials<F>(lookup: &F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match VisionConfig::from_lookup(lookup) {
        Ok(config) => {
            note_success(&format!("Service account {} parsed", config.key.client_email));
            match &config.project_id {
                Some(project) => note_success(&format!("Quota project: {project}")),
                None => note_warn("No project id available; requests go out without a quota project"),
            }
            true
        }
        Err(e) => {
            note_error(&format!("Credentials unusable: {e}"));
            false
        }
    }
}
