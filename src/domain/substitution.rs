// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shell-style `$NAME` / `${NAME}` substitution over stored settings.
//!
//! Values are stored raw and resolved on every read. The scan walks the string
//! left to right; a resolvable reference is spliced in place and the scan
//! resumes at the start of the spliced text, so nested references resolve as
//! well. Unknown names are left untouched and skipped.
//!
//! Termination under cyclic definitions (`A=$B`, `B=$A`) is guaranteed by
//! tracking which names are being expanded around the scan position: a
//! reference back to one of them is left literal, exactly like an unknown name.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches `${IDENT}` or `$IDENT`. The braced form ends at the first `}`, so
/// `${A}${B}` yields two adjacent references.
static REFERENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))")
        .expect("reference pattern is valid")
});

/// Upper bound on replacements performed for one read.
pub const MAX_SUBSTITUTIONS: usize = 10_000;

/// A name being expanded and the end offset of its expansion in the working string.
#[derive(Debug)]
struct Expansion {
    end: usize,
    name: String,
}

/// Resolves every reference in `raw` using `lookup`.
///
/// `origin` names the variable `raw` belongs to, if any; references back to it
/// are treated as cyclic and left literal.
///
/// # Examples
///
/// ```
/// use portcfg::domain::substitution::substitute;
///
/// let lookup = |name: &str| match name {
///     "X" => Some("val"),
///     "A" => Some("$B"),
///     "B" => Some("$A"),
///     _ => None,
/// };
///
/// assert_eq!(substitute("prefix-${X}-suffix", None, lookup), "prefix-val-suffix");
/// assert_eq!(substitute("$UNKNOWN/$X", None, lookup), "$UNKNOWN/val");
/// assert_eq!(substitute("$B", Some("A"), lookup), "$A");
/// ```
pub fn substitute<'a, F>(raw: &str, origin: Option<&str>, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut result = raw.to_string();
    let mut active: Vec<Expansion> = Vec::new();
    if let Some(name) = origin {
        active.push(Expansion {
            end: result.len(),
            name: name.to_string(),
        });
    }

    let mut pos = 0;
    let mut replacements = 0;

    loop {
        let (start, end, name) = match REFERENCE_PATTERN.captures_at(&result, pos) {
            Some(caps) => match (caps.get(0), caps.get(1).or_else(|| caps.get(2))) {
                (Some(whole), Some(ident)) => {
                    (whole.start(), whole.end(), ident.as_str().to_string())
                }
                _ => break,
            },
            None => break,
        };

        // expansions that ended before this reference no longer enclose the scan
        active.retain(|e| e.end > start);

        if active.iter().any(|e| e.name == name) {
            tracing::warn!("Cyclic reference to '{}' left unresolved", name);
            pos = end;
            continue;
        }

        let replacement = match lookup(&name) {
            Some(value) if replacements < MAX_SUBSTITUTIONS => value,
            Some(_) => {
                tracing::warn!(
                    "Substitution limit of {} reached, leaving '{}' unresolved",
                    MAX_SUBSTITUTIONS,
                    name
                );
                pos = end;
                continue;
            }
            None => {
                tracing::trace!("Reference to unknown variable '{}' left as is", name);
                pos = end;
                continue;
            }
        };

        let inserted_end = start + replacement.len();
        for expansion in &mut active {
            expansion.end = if expansion.end >= end {
                expansion.end - (end - start) + replacement.len()
            } else {
                inserted_end
            };
        }

        tracing::trace!("Substituting '{}' at offset {}", name, start);
        result.replace_range(start..end, replacement);
        active.push(Expansion {
            end: inserted_end,
            name,
        });
        replacements += 1;
        pos = start;
    }

    result
}

/// Returns `true` if `value` contains at least one `$NAME` or `${NAME}` reference.
pub fn has_references(value: &str) -> bool {
    REFERENCE_PATTERN.is_match(value)
}
