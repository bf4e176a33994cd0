//! Path pattern parsing and matching.
//!
//! # Responsibilities
//! - Parse a pattern string (`/api/todos/{todoId}`) into typed segments
//! - Reject malformed patterns at configuration time
//! - Match a pattern against the unconsumed part of a request path
//!
//! # Design Decisions
//! - Prefix matching: trailing path content is left for child routers
//! - A path that runs out yields empty tokens, so an empty literal still matches
//!   but a variable never binds an empty value
//! - `**` consumes everything that is left and must be the last segment
//! - Case-sensitive, no percent-decoding, no regex

use std::fmt;

use thiserror::Error;

use crate::routing::params::PathParams;

/// The segment that matches the whole remaining path.
pub const WILDCARD: &str = "**";

/// Errors raised while parsing a pattern string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern '{pattern}': '**' must be the last segment")]
    WildcardNotLast { pattern: String },

    #[error("pattern '{pattern}': malformed variable segment '{segment}'")]
    MalformedVariable { pattern: String, segment: String },

    #[error("pattern '{pattern}': variable '{name}' declared more than once")]
    DuplicateVariable { pattern: String, name: String },
}

/// One `/`-delimited unit of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Must equal the path token exactly.
    Literal(String),
    /// `{name}`: binds a non-empty path token.
    Variable(String),
    /// `**`: matches all remaining path.
    Wildcard,
}

impl PathSegment {
    fn classify(pattern: &str, segment: &str) -> Result<Self, PatternError> {
        if segment == WILDCARD {
            return Ok(PathSegment::Wildcard);
        }
        if !segment.contains(['{', '}']) {
            return Ok(PathSegment::Literal(segment.to_string()));
        }
        match segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
        {
            Some(name) if !name.is_empty() && !name.contains(['{', '}']) => {
                Ok(PathSegment::Variable(name.to_string()))
            }
            _ => Err(PatternError::MalformedVariable {
                pattern: pattern.to_string(),
                segment: segment.to_string(),
            }),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Literal(text) => f.write_str(text),
            PathSegment::Variable(name) => write!(f, "{{{}}}", name),
            PathSegment::Wildcard => f.write_str(WILDCARD),
        }
    }
}

/// Result of a successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
    /// The matched tokens joined with `/`.
    ///
    /// Usually a prefix of the input path. An empty literal matched after the
    /// path ran out still contributes its separator, so `/api/todo/` against
    /// `/api/todo` yields `/api/todo/`.
    pub matched: String,
    /// Variables bound while matching.
    pub params: PathParams,
}

/// An ordered list of segments, produced by splitting a pattern on `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<PathSegment>,
}

impl PathPattern {
    /// Parse and validate a pattern string.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let mut segments = Vec::new();
        let mut names: Vec<&str> = Vec::new();

        for raw in pattern.split('/') {
            if segments.last() == Some(&PathSegment::Wildcard) {
                return Err(PatternError::WildcardNotLast {
                    pattern: pattern.to_string(),
                });
            }
            let segment = PathSegment::classify(pattern, raw)?;
            if let PathSegment::Variable(name) = &segment {
                if names.contains(&name.as_str()) {
                    return Err(PatternError::DuplicateVariable {
                        pattern: pattern.to_string(),
                        name: name.clone(),
                    });
                }
                // Borrow from the raw segment; `{` is one byte.
                names.push(&raw[1..raw.len() - 1]);
            }
            segments.push(segment);
        }

        Ok(Self { segments })
    }

    /// The pattern that matches every path without consuming any of it
    /// beyond a leading empty token.
    pub fn empty() -> Self {
        Self {
            segments: vec![PathSegment::Literal(String::new())],
        }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Match this pattern against the front of `path`.
    ///
    /// Returns `None` when a literal differs from its token or a variable would
    /// bind an empty value. Content left over after the last segment does not
    /// fail the match.
    pub fn match_path(&self, path: &str) -> Option<PathMatch> {
        let mut params = PathParams::new();
        let mut tokens = Tokens::new(path);

        for segment in &self.segments {
            match segment {
                PathSegment::Wildcard => {
                    return Some(PathMatch {
                        matched: path.to_string(),
                        params,
                    });
                }
                PathSegment::Variable(name) => {
                    let token = tokens.shift();
                    if token.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), token.to_string());
                }
                PathSegment::Literal(text) => {
                    if tokens.shift() != text.as_str() {
                        return None;
                    }
                }
            }
        }

        Some(PathMatch {
            matched: tokens.consumed(),
            params,
        })
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Single-pass tokenizer over a path.
///
/// Once the path is exhausted every further shift yields `""`.
struct Tokens<'p> {
    path: &'p str,
    /// Byte offset of the next token, `None` once nothing is left.
    next: Option<usize>,
    /// End of the last token actually taken from `path`.
    end: usize,
    /// Shifts made after the path ran out.
    exhausted: usize,
}

impl<'p> Tokens<'p> {
    fn new(path: &'p str) -> Self {
        Self {
            path,
            next: Some(0),
            end: 0,
            exhausted: 0,
        }
    }

    fn shift(&mut self) -> &'p str {
        let Some(start) = self.next else {
            self.exhausted += 1;
            return "";
        };
        let rest = &self.path[start..];
        match rest.find('/') {
            Some(idx) => {
                self.end = start + idx;
                self.next = Some(start + idx + 1);
                &rest[..idx]
            }
            None => {
                self.end = self.path.len();
                self.next = None;
                rest
            }
        }
    }

    /// Every shifted token joined with `/`, exhausted ones included.
    fn consumed(&self) -> String {
        let mut joined = String::with_capacity(self.end + self.exhausted);
        joined.push_str(&self.path[..self.end]);
        for _ in 0..self.exhausted {
            joined.push('/');
        }
        joined
    }
}
