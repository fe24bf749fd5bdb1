//! Text rendering
//!
//! Translates a `ViewModel` into the plain-text panel the command line prints.

use std::fmt::Write;

use crate::session::ViewModel;

pub fn render_text(view: &ViewModel) -> String {
    let mut out = String::new();

    if let Some(guidance) = &view.capture_error {
        let _ = writeln!(out, "! {guidance}");
    }
    if view.loading {
        let _ = writeln!(out, "{}", view.submit_label());
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "Error: {error}");
    }

    match &view.result {
        Some(result) => {
            let _ = writeln!(out, "Full text:");
            for line in result.full_text.lines() {
                let _ = writeln!(out, "  {line}");
            }
            if !result.fragments.is_empty() {
                let _ = writeln!(out, "\nFragments ({}):", result.fragments.len());
                for (i, fragment) in result.fragments.iter().enumerate() {
                    let _ = writeln!(out, "  {:>2}. {fragment}", i + 1);
                }
            }
            let _ = writeln!(out, "\n[{}]", view.copy_label());
        }
        None if view.error.is_none() && !view.loading && view.still.is_some() => {
            let _ = writeln!(out, "No text detected.");
        }
        None => {}
    }

    out
}
