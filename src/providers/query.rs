//! Query-string parsing shared by the provider handlers
//!
//! A query is `"<prefix>[,|:<dayCount>,]<clause>,<clause>,..."` where each
//! clause is `name:id` or a bare id. The helpers here are deliberately
//! forgiving about whitespace and case but strict about overall shape:
//! a query that does not match the expected pattern parses to nothing, and
//! the handler answers with an empty result instead of an error.

use regex::Regex;

/// One channel requested by a query clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRequest {
    /// Display name, when the clause carried a `name:` part
    pub name: Option<String>,
    /// Provider-specific channel identifier
    pub id: String,
}

impl ChannelRequest {
    /// Name to show for this channel, falling back to the identifier
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Case-insensitive ASCII prefix test that never panics on multi-byte input
pub fn has_prefix(query: &str, prefix: &str) -> bool {
    query
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Split the channel-list part of a query into requests.
///
/// Clauses split on `,`; each clause splits on the first `:` into
/// `(name, id)`. A clause without `:` is a bare id with no name. Empty
/// clauses and clauses with an empty id are dropped.
pub fn split_channel_clauses(rest: &str) -> Vec<ChannelRequest> {
    rest.split(',')
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .filter_map(|clause| match clause.split_once(':') {
            Some((name, id)) => {
                let id = id.trim();
                if id.is_empty() {
                    return None;
                }
                let name = name.trim();
                Some(ChannelRequest {
                    name: (!name.is_empty()).then(|| name.to_string()),
                    id: id.to_string(),
                })
            }
            None => Some(ChannelRequest {
                name: None,
                id: clause.to_string(),
            }),
        })
        .collect()
}

/// Compile the day-count pattern for a provider prefix:
/// `"<prefix>:<digits>,<rest>"`, case-insensitive.
pub fn day_count_pattern(prefix: &str) -> Regex {
    Regex::new(&format!(r"(?i)^{}:(\d+),(.*)$", regex::escape(prefix)))
        .expect("day-count pattern is valid")
}

/// Extract the leading day-count argument and the channel-list remainder.
///
/// `"<prefix>:<n>,<rest>"` yields `(n, rest)`; the plain `"<prefix>,<rest>"`
/// form defaults to one day. Anything else is malformed and yields `None`.
pub fn parse_day_count<'q>(
    pattern: &Regex,
    query: &'q str,
    prefix: &str,
) -> Option<(u32, &'q str)> {
    if let Some(caps) = pattern.captures(query) {
        let count = caps.get(1)?.as_str().parse().ok()?;
        return Some((count, caps.get(2)?.as_str()));
    }

    let plain = format!("{},", prefix);
    if has_prefix(query, &plain) {
        return Some((1, &query[plain.len()..]));
    }
    None
}
