//! `kfir.json` loading.
//!
//! The file is JSON with comments and trailing commas allowed; it
//! deserializes straight into [`CheckerOptions`].

use anyhow::{Context, Result};
use kfir_checker::CheckerOptions;
use std::path::{Path, PathBuf};

use crate::args::CheckArgs;

/// Name of the config file looked up next to the graph.
pub const CONFIG_FILE_NAME: &str = "kfir.json";

pub fn parse_config(source: &str) -> Result<CheckerOptions> {
    let stripped = strip_jsonc(source);
    let normalized = remove_trailing_commas(&stripped);
    let options = serde_json::from_str(&normalized).context("failed to parse kfir.json")?;
    Ok(options)
}

pub fn load_config(path: &Path) -> Result<CheckerOptions> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&source).with_context(|| format!("invalid config {}", path.display()))
}

/// The config file that applies to `graph`: the explicit one, else a
/// `kfir.json` in the graph's directory when present.
pub fn config_path_for(graph: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(explicit) = explicit {
        return Some(explicit.to_path_buf());
    }
    let candidate = graph
        .parent()
        .map_or_else(|| PathBuf::from(CONFIG_FILE_NAME), |dir| dir.join(CONFIG_FILE_NAME));
    candidate.is_file().then_some(candidate)
}

/// Options for a `check` run: config file first, command-line flags on top.
pub fn resolve_options(args: &CheckArgs) -> Result<CheckerOptions> {
    let mut options = match config_path_for(&args.graph, args.config.as_deref()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading checker options");
            load_config(&path)?
        }
        None => CheckerOptions::default(),
    };
    if args.warnings_as_errors {
        options.warnings_as_errors = true;
    }
    for name in &args.suppress {
        if !options.suppress.contains(name) {
            options.suppress.push(name.clone());
        }
    }
    Ok(options)
}

fn strip_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;
    let mut in_line_comment = false;
    let mut in_block_comment = false;

    while let Some(ch) = chars.next() {
        if in_line_comment {
            if ch == '\n' {
                in_line_comment = false;
                out.push(ch);
            }
            continue;
        }

        if in_block_comment {
            if ch == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_block_comment = false;
            } else if ch == '\n' {
                out.push(ch);
            }
            continue;
        }

        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        let next = chars.peek().copied();
        match (ch, next) {
            ('"', _) => {
                in_string = true;
                out.push(ch);
            }
            ('/', Some('/')) => {
                chars.next();
                in_line_comment = true;
            }
            ('/', Some('*')) => {
                chars.next();
                in_block_comment = true;
            }
            _ => out.push(ch),
        }
    }

    out
}

fn remove_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
        } else if ch == ',' {
            let next = chars.clone().find(|next| !next.is_whitespace());
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }
        out.push(ch);
    }

    out
}
