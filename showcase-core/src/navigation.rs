use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A front-end location such as `#/details/abc`, `/home?search=heat` or `details/abc/edit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl Location {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
            query: Vec::new(),
        }
    }

    /// Parse a raw, still percent-encoded location. Leading `#` and `/` are ignored
    /// and empty segments dropped. Segments and query pairs are decoded once; `+`
    /// means a space only inside the query.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().trim_start_matches('#');
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (raw, None),
        };

        let mut location = Self::new(path.split('/').map(decode_segment));
        if let Some(query) = query {
            for pair in query.split('&').filter(|p| !p.is_empty()) {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                location.query.push((decode_query(key), decode_query(value)));
            }
        }
        location
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn segments(&self) -> Vec<&str> {
        self.segments.iter().map(String::as_str).collect()
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path form without a leading slash, e.g. `home?search=the%20heat`.
    pub fn to_path(&self) -> String {
        let mut out = self
            .segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        if !self.query.is_empty() {
            let query = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            out.push('?');
            out.push_str(&query);
        }
        out
    }
}

fn decode_segment(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

fn decode_query(raw: &str) -> String {
    decode_segment(&raw.replace('+', " "))
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.to_path())
    }
}

impl From<&str> for Location {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationTicket(u64);

/// Hands out a ticket per navigation so results of superseded navigations can be dropped.
#[derive(Debug, Default)]
pub struct NavigationGuard {
    generation: AtomicU64,
}

impl NavigationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a navigation; every earlier ticket becomes stale.
    pub fn begin(&self) -> NavigationTicket {
        NavigationTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: NavigationTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }
}
