//! Classifies the lines of the stream file.
//!
//! The VQE program writes one line per event:
//! - `# ...` starts a new experiment run.
//! - `{...}` is one optimiser iteration, a JSON object or Python dict literal with at least an `energy` key.
//!
//! Every other line is ignored.

use crate::util::*;

/// A classified line of the stream file.
#[derive(Debug, Clone, PartialEq)]
pub enum LogLine {
    /// Start of a new experiment run, holds the header text after the `#`.
    RunHeader(Box<str>),
    /// One optimiser iteration.
    Iteration {
        /// Energy estimate of the iteration.
        energy: f64,
    },
    /// Anything else, ignored.
    Other,
}

/// Parse a single line of the stream file, with or without its line ending.
pub fn parse_line(line: &str) -> Result<LogLine, String> {
    let line = line.trim_end_matches(|c| c == '\n' || c == '\r');
    if let Some(header) = line.strip_prefix('#') {
        Ok(LogLine::RunHeader(header.trim().into()))
    } else if line.starts_with('{') {
        let energy = parse_energy(line)?;
        Ok(LogLine::Iteration { energy })
    } else {
        Ok(LogLine::Other)
    }
}

fn parse_energy(record: &str) -> Result<f64, String> {
    let parsed = serde_json::from_str::<serde_json::Value>(record).or_else(|_| {
        serde_json::from_str::<serde_json::Value>(&python_literal_to_json(record))
    });

    let energy = match parsed {
        Ok(serde_json::Value::Object(map)) => match map.get("energy") {
            Some(value) => value
                .as_f64()
                .ok_or_else(|| format!("Iteration energy is not a number: {value}"))?,
            None => return Err(format!("Iteration record has no energy: {record}")),
        },
        Ok(other) => return Err(format!("Iteration record is not an object: {other}")),
        // Records with values that have no JSON equivalent, like numpy reprs
        Err(_) => extract_energy(record)
            .ok_or_else(|| format!("Malformed iteration record: {record}"))?,
    };

    if energy.is_finite() {
        Ok(energy)
    } else {
        Err(format!("Iteration energy is not finite: {energy}"))
    }
}

/// Rewrites a Python literal to JSON: quotes, booleans, `None` and tuples.
fn python_literal_to_json(literal: &str) -> String {
    let mut json = String::with_capacity(literal.len());
    let mut chars = literal.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                let quote = c;
                json.push('"');
                while let Some(s) = chars.next() {
                    match s {
                        '\\' => match chars.next() {
                            Some('\'') => json.push('\''),
                            Some(escaped) => {
                                json.push('\\');
                                json.push(escaped);
                            }
                            None => json.push('\\'),
                        },
                        s if s == quote => break,
                        '"' => json.push_str("\\\""),
                        s => json.push(s),
                    }
                }
                json.push('"');
            }
            '(' => json.push('['),
            ')' => json.push(']'),
            c if c.is_alphabetic() || c == '_' => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_alphanumeric() || next == '_' {
                        word.push(next);
                        let _ = chars.next();
                    } else {
                        break;
                    }
                }
                json.push_str(match word.as_str() {
                    "True" => "true",
                    "False" => "false",
                    "None" => "null",
                    other => other,
                });
            }
            c => json.push(c),
        }
    }
    json
}

/// Last resort: pick the number following the `energy` key, wherever it is.
fn extract_energy(record: &str) -> Option<f64> {
    static ENERGY_RE: OnceLock<Regex> = OnceLock::new();
    let re = ENERGY_RE.get_or_init(|| {
        Regex::new(
            r#"['"]energy['"]\s*:\s*(?:[A-Za-z_][\w.]*\()?\s*(-?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)"#,
        )
        .expect("Invalid energy regex")
    });
    re.captures(record)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
