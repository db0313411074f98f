//! Path segments and the immutable accumulator that renders them.
use std::fmt;
use std::str::FromStr;
use std::convert::Infallible;
use serde::{Deserialize, Serialize};

// ————————————————————————————————————————————————————————————————————————————
// SEGMENT
// ————————————————————————————————————————————————————————————————————————————

/// One `/`-delimited component of a generated path.
///
/// Rendered verbatim; nothing is escaped or validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    Signed(i64),
    Unsigned(u64),
    Text(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signed(x) => write!(f, "{x}"),
            Self::Unsigned(x) => write!(f, "{x}"),
            Self::Text(x) => f.write_str(x),
        }
    }
}

/// An integer only when it prints back as exactly `s`, otherwise the text
/// itself, so `007`, `+5` and `-0` stay verbatim.
impl FromStr for Segment {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(x) = s.parse::<i64>() {
            if x.to_string() == s {
                return Ok(Self::Signed(x))
            }
        } else if let Ok(x) = s.parse::<u64>() {
            if x.to_string() == s {
                return Ok(Self::Unsigned(x))
            }
        }
        Ok(Self::Text(s.to_string()))
    }
}

macro_rules! segment_from_int {
    ($variant:ident as $repr:ty: $($t:ty),*) => {$(
        impl From<$t> for Segment {
            fn from(x: $t) -> Self { Self::$variant(x as $repr) }
        }
    )*};
}

segment_from_int!(Signed as i64: i8, i16, i32, i64);
segment_from_int!(Unsigned as u64: u8, u16, u32, u64, usize);

impl From<&str> for Segment {
    fn from(x: &str) -> Self { Self::Text(x.to_string()) }
}

impl From<String> for Segment {
    fn from(x: String) -> Self { Self::Text(x) }
}

impl From<&String> for Segment {
    fn from(x: &String) -> Self { Self::Text(x.clone()) }
}

// ————————————————————————————————————————————————————————————————————————————
// ACCUMULATOR
// ————————————————————————————————————————————————————————————————————————————

/// Ordered segments gathered from the root down to some position.
///
/// Never mutated after construction: [`PathBuilder::push`] hands back a new
/// builder and leaves the receiver alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PathBuilder {
    parts: Vec<Segment>,
}

impl PathBuilder {
    pub fn empty() -> Self { Self::default() }
    pub fn push(&self, part: impl Into<Segment>) -> Self {
        let mut parts = Vec::with_capacity(self.parts.len() + 1);
        parts.extend(self.parts.iter().cloned());
        parts.push(part.into());
        Self { parts }
    }
    pub fn parts(&self) -> &[Segment] {
        &self.parts
    }
    pub fn len(&self) -> usize {
        self.parts.len()
    }
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
    /// `"/" + segment` for every segment; the empty builder renders as `"/"`.
    pub fn render(&self) -> String {
        if self.parts.is_empty() {
            return String::from("/")
        }
        let mut out = String::new();
        for part in &self.parts {
            out.push('/');
            out.push_str(&part.to_string());
        }
        out
    }
}

impl fmt::Display for PathBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl<S: Into<Segment>> FromIterator<S> for PathBuilder {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { parts: iter.into_iter().map(Into::into).collect() }
    }
}
