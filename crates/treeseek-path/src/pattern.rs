//! Pattern tokenization.

/// One step of a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object key or array index.
    Key(String),
    /// `*`: every direct child.
    Wildcard,
    /// `**`: every descendant.
    DeepWildcard,
}

impl Segment {
    /// Splits a pattern on `separator` and classifies each piece.
    ///
    /// Empty pieces are dropped, so `""`, `"a..b"` and `"a."` are read as
    /// `[]`, `[a, b]` and `[a]`. An empty separator keeps the whole pattern
    /// as a single segment.
    pub fn parse_all(pattern: &str, separator: &str) -> Vec<Segment> {
        if pattern.is_empty() {
            return Vec::new();
        }
        if separator.is_empty() {
            return vec![Segment::parse(pattern)];
        }

        pattern
            .split(separator)
            .filter(|raw| !raw.is_empty())
            .map(Segment::parse)
            .collect()
    }

    /// Classifies a single raw segment.
    pub fn parse(raw: &str) -> Segment {
        match raw {
            "*" => Segment::Wildcard,
            "**" => Segment::DeepWildcard,
            key => Segment::Key(key.to_string()),
        }
    }

    /// Returns `true` for `*` and `**`.
    pub fn is_wildcard(&self) -> bool {
        !matches!(self, Segment::Key(_))
    }

    /// Returns the array index this segment spells, if any.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Key(key) => key.parse().ok(),
            _ => None,
        }
    }
}
