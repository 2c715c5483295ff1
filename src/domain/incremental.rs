// SPDX-License-Identifier: MIT OR Apache-2.0

//! Incremental token-list merging.
//!
//! Incremental variables hold a space-separated list of unique tokens. Each new
//! declaration is applied on top of the accumulated list, left to right:
//!
//! - `-*` empties the list,
//! - `-token` removes the first occurrence of `token`,
//! - anything else is appended unless already present.

/// Token that clears every previously accumulated token.
pub const CLEAR_ALL: &str = "-*";

/// Prefix marking a token for removal.
pub const REMOVE_PREFIX: char = '-';

/// Merges the whitespace-separated tokens of `addition` into `existing`.
///
/// Returns the merged list joined with single spaces. The result never contains
/// duplicates or removal markers, and surviving tokens keep the order in which
/// they first appeared.
///
/// # Examples
///
/// ```
/// use portcfg::domain::incremental::merge_incremental;
///
/// assert_eq!(merge_incremental("foo bar", "-bar baz"), "foo baz");
/// assert_eq!(merge_incremental("foo bar", "-* qux"), "qux");
/// assert_eq!(merge_incremental("foo", "foo  foo"), "foo");
/// ```
pub fn merge_incremental(existing: &str, addition: &str) -> String {
    let mut tokens: Vec<&str> = existing.split_whitespace().collect();
    apply_tokens(&mut tokens, addition);
    tokens.join(" ")
}

/// Applies every token of `addition` to `tokens` in order.
fn apply_tokens<'a>(tokens: &mut Vec<&'a str>, addition: &'a str) {
    for token in addition.split_whitespace() {
        if token == CLEAR_ALL {
            tracing::trace!("'{}' clears {} accumulated tokens", CLEAR_ALL, tokens.len());
            tokens.clear();
        } else if let Some(target) = token.strip_prefix(REMOVE_PREFIX) {
            if let Some(index) = tokens.iter().position(|t| *t == target) {
                tokens.remove(index);
            } else {
                tracing::trace!("'{}' removes nothing", token);
            }
        } else if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
}
