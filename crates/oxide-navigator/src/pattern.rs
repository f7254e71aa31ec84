//! Route pattern compilation and matching.

use std::fmt;

use regex::Regex;

use crate::error::{NavigatorError, Result};
use crate::params::{Parameters, decode_segment, split_location};

/// A piece of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Text matched verbatim.
    Literal(String),
    /// A named placeholder (e.g. `:id`, `:tab?` or `{id}`).
    Param { name: String, optional: bool },
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    /// The original pattern string.
    pattern: String,
    /// Parsed segments.
    segments: Vec<Segment>,
    /// Compiled regex for matching.
    regex: Regex,
    /// Parameter names in declaration order.
    param_names: Vec<String>,
}

impl RoutePattern {
    /// Compiles a route pattern.
    ///
    /// Pattern syntax:
    /// - `/users` - literal path
    /// - `/users/:id` - required parameter
    /// - `/users/:id/:tab?` - optional parameter (the `/` before it is optional too)
    /// - `/files/:name.:ext` - parameters separated by a literal
    /// - `/users/{id}` - alternate placeholder spelling
    ///
    /// A trailing `/` on the matched path is always accepted.
    ///
    /// # Errors
    ///
    /// Returns [`NavigatorError::InvalidPattern`] for an unclosed `{`, a stray
    /// `}`, a placeholder without a name, a repeated parameter name or a `?`
    /// outside a placeholder.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_navigator::RoutePattern;
    ///
    /// let pattern = RoutePattern::compile("/posts/:id/comments/:comment_id").unwrap();
    /// let params = pattern.captures("/posts/123/comments/456").unwrap();
    /// assert_eq!(params.get("id"), Some("123"));
    /// assert_eq!(params.get("comment_id"), Some("456"));
    /// ```
    pub fn compile(pattern: &str) -> Result<Self> {
        let segments = tokenize(pattern)?;
        let mut param_names: Vec<String> = Vec::new();
        let mut regex_str = String::from("^");

        for segment in &segments {
            match segment {
                Segment::Literal(text) => regex_str.push_str(&regex::escape(text)),
                Segment::Param { name, optional } => {
                    if param_names.contains(name) {
                        return Err(NavigatorError::invalid_pattern(
                            pattern,
                            format!("parameter `{name}` is declared twice"),
                        ));
                    }
                    param_names.push(name.clone());

                    if !optional {
                        regex_str.push_str("([^/]+)");
                    } else if regex_str.ends_with('/') {
                        regex_str.pop();
                        regex_str.push_str("(?:/([^/]+))?");
                    } else {
                        regex_str.push_str("([^/]+)?");
                    }
                }
            }
        }

        if regex_str.ends_with('/') {
            regex_str.pop();
        }
        regex_str.push_str("/?$");

        let regex = Regex::new(&regex_str)
            .map_err(|e| NavigatorError::invalid_pattern(pattern, e.to_string()))?;

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
            regex,
            param_names,
        })
    }

    /// Matches the path portion of `location` against this pattern.
    ///
    /// Returns the decoded parameter values in declaration order. An optional
    /// parameter that is absent from the path yields `None`.
    #[must_use]
    pub fn match_path(&self, location: &str) -> Option<Vec<Option<String>>> {
        let (path, _) = split_location(location);
        let caps = self.regex.captures(path)?;

        Some(
            (1..=self.param_names.len())
                .map(|i| caps.get(i).map(|m| decode_segment(m.as_str())))
                .collect(),
        )
    }

    /// Matches `location` and binds the captured values to their names.
    #[must_use]
    pub fn captures(&self, location: &str) -> Option<Parameters> {
        let values = self.match_path(location)?;
        Some(
            self.param_names
                .iter()
                .zip(values)
                .filter_map(|(name, value)| value.map(|v| (name.clone(), v)))
                .collect(),
        )
    }

    /// Returns true if `location` matches this pattern.
    #[must_use]
    pub fn is_match(&self, location: &str) -> bool {
        self.regex.is_match(split_location(location).0)
    }

    /// Returns the original pattern string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns the parameter names.
    #[must_use]
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Generates a concrete path from parameters.
    ///
    /// Values are percent-encoded. Returns `None` if a required parameter is
    /// missing; absent optional parameters are left out.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_navigator::{Parameters, RoutePattern};
    ///
    /// let pattern = RoutePattern::compile("/posts/:id").unwrap();
    /// let params: Parameters = [("id", "123")].into_iter().collect();
    /// assert_eq!(pattern.reverse(&params).unwrap(), "/posts/123");
    /// ```
    #[must_use]
    pub fn reverse(&self, params: &Parameters) -> Option<String> {
        let mut path = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Param { name, optional } => match params.get(name) {
                    Some(value) => path.push_str(&urlencoding::encode(value)),
                    None if *optional => {
                        if path.len() > 1 && path.ends_with('/') {
                            path.pop();
                        }
                    }
                    None => return None,
                },
            }
        }

        Some(path)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn tokenize(pattern: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ':' => {
                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    if !is_name_char(next) {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }
                if name.is_empty() {
                    return Err(NavigatorError::invalid_pattern(
                        pattern,
                        "`:` must be followed by a parameter name",
                    ));
                }
                let optional = chars.next_if_eq(&'?').is_some();
                flush_literal(&mut literal, &mut segments);
                segments.push(Segment::Param { name, optional });
            }
            '{' => {
                let mut body = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    match next {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => {
                            return Err(NavigatorError::invalid_pattern(
                                pattern,
                                "nested `{` in placeholder",
                            ));
                        }
                        _ => body.push(next),
                    }
                }
                if !closed {
                    return Err(NavigatorError::invalid_pattern(pattern, "unclosed `{`"));
                }
                let (name, optional) = body
                    .strip_suffix('?')
                    .map_or((body.as_str(), false), |n| (n, true));
                if name.is_empty() || !name.chars().all(is_name_char) {
                    return Err(NavigatorError::invalid_pattern(
                        pattern,
                        format!("`{{{body}}}` is not a valid placeholder"),
                    ));
                }
                flush_literal(&mut literal, &mut segments);
                segments.push(Segment::Param {
                    name: name.to_string(),
                    optional,
                });
            }
            '}' => {
                return Err(NavigatorError::invalid_pattern(pattern, "unmatched `}`"));
            }
            '?' => {
                return Err(NavigatorError::invalid_pattern(
                    pattern,
                    "`?` is only allowed after a parameter name",
                ));
            }
            _ => literal.push(c),
        }
    }
    flush_literal(&mut literal, &mut segments);

    Ok(segments)
}

fn flush_literal(literal: &mut String, segments: &mut Vec<Segment>) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}
