//! Recursive descent parser and matcher for seat lookup expressions
//!
//! Browsers evaluate lookup expressions natively; the in-memory diagram needs
//! its own evaluator. Supported grammar (a strict subset of CSS selectors):
//!
//! ```text
//! list      := complex ( "," complex )*
//! complex   := compound ( combinator compound )*
//! combinator:= whitespace | ">"
//! compound  := ( type | "*" )? ( "#" ident | "." ident | attribute )*
//! attribute := "[" ident ( op value )? "]"      op := = ~= |= ^= $= *=
//! ```
//!
//! Anything outside it (pseudo-classes, sibling combinators) is reported as
//! malformed, which callers treat the same as "no match".

use crate::error::LookupError;

/// Something a selector can be matched against
pub trait SelectorSubject: Sized {
    fn local_name(&self) -> String;
    fn attr(&self, name: &str) -> Option<String>;
    fn parent_element(&self) -> Option<Self>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum AttrOp {
    Equals,
    Includes,
    DashMatch,
    Prefix,
    Suffix,
    Substring,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Simple {
    Id(String),
    Class(String),
    Attr {
        name: String,
        test: Option<(AttrOp, String)>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Compound {
    /// `None` matches any element
    tag: Option<String>,
    simples: Vec<Simple>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`
    combinators: Vec<Combinator>,
}

/// A parsed selector list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, LookupError> {
        Parser::new(input).parse_list()
    }

    /// True if any alternative of the list matches `subject`
    pub fn matches<S: SelectorSubject>(&self, subject: &S) -> bool {
        self.alternatives
            .iter()
            .any(|complex| match_at(complex, complex.compounds.len() - 1, subject))
    }
}

fn match_at<S: SelectorSubject>(complex: &Complex, index: usize, subject: &S) -> bool {
    if !match_compound(&complex.compounds[index], subject) {
        return false;
    }
    if index == 0 {
        return true;
    }

    match complex.combinators[index - 1] {
        Combinator::Child => subject
            .parent_element()
            .map_or(false, |parent| match_at(complex, index - 1, &parent)),
        Combinator::Descendant => {
            let mut ancestor = subject.parent_element();
            while let Some(current) = ancestor {
                if match_at(complex, index - 1, &current) {
                    return true;
                }
                ancestor = current.parent_element();
            }
            false
        }
    }
}

fn match_compound<S: SelectorSubject>(compound: &Compound, subject: &S) -> bool {
    if let Some(tag) = &compound.tag {
        if !subject.local_name().eq_ignore_ascii_case(tag) {
            return false;
        }
    }

    compound.simples.iter().all(|simple| match simple {
        Simple::Id(id) => subject.attr("id").as_deref() == Some(id.as_str()),
        Simple::Class(class) => subject
            .attr("class")
            .map_or(false, |classes| classes.split_whitespace().any(|c| c == class.as_str())),
        Simple::Attr { name, test } => match (subject.attr(name), test) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(actual), Some((op, expected))) => match op {
                AttrOp::Equals => actual == *expected,
                AttrOp::Includes => actual.split_whitespace().any(|word| word == expected.as_str()),
                AttrOp::DashMatch => {
                    actual == *expected || actual.starts_with(&format!("{}-", expected))
                }
                AttrOp::Prefix => !expected.is_empty() && actual.starts_with(expected.as_str()),
                AttrOp::Suffix => !expected.is_empty() && actual.ends_with(expected.as_str()),
                AttrOp::Substring => !expected.is_empty() && actual.contains(expected.as_str()),
            },
        },
    })
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> LookupError {
        LookupError::Malformed {
            expression: self.input.to_string(),
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn parse_list(&mut self) -> Result<Selector, LookupError> {
        let mut alternatives = Vec::new();
        loop {
            self.skip_whitespace();
            alternatives.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.bump() {
                None => break,
                Some(',') => continue,
                Some(c) => return Err(self.error(format!("unexpected '{}'", c))),
            }
        }
        Ok(Selector { alternatives })
    }

    fn parse_complex(&mut self) -> Result<Complex, LookupError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.bump();
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some('+') | Some('~') => {
                    return Err(self.error("sibling combinators are not supported"));
                }
                Some(_) if had_space => Combinator::Descendant,
                Some(c) => return Err(self.error(format!("unexpected '{}'", c))),
            };
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(Complex {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> Result<Compound, LookupError> {
        let (tag, had_type) = match self.peek() {
            Some('*') => {
                self.bump();
                (None, true)
            }
            Some(c) if is_ident_start(c) => (Some(self.parse_ident()?), true),
            _ => (None, false),
        };

        let mut simples = Vec::new();
        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    simples.push(Simple::Id(self.parse_ident()?));
                }
                Some('.') => {
                    self.bump();
                    simples.push(Simple::Class(self.parse_ident()?));
                }
                Some('[') => {
                    self.bump();
                    simples.push(self.parse_attribute()?);
                }
                Some(':') => return Err(self.error("pseudo-classes are not supported")),
                _ => break,
            }
        }

        if !had_type && simples.is_empty() {
            return Err(match self.peek() {
                Some(c) => self.error(format!("expected a selector, found '{}'", c)),
                None => self.error("expected a selector"),
            });
        }

        Ok(Compound { tag, simples })
    }

    fn parse_attribute(&mut self) -> Result<Simple, LookupError> {
        self.skip_whitespace();
        let name = self.parse_ident()?;
        self.skip_whitespace();

        let op = match self.bump() {
            Some(']') => return Ok(Simple::Attr { name, test: None }),
            Some('=') => AttrOp::Equals,
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                if self.bump() != Some('=') {
                    return Err(self.error(format!("expected '=' after '{}'", c)));
                }
                match c {
                    '~' => AttrOp::Includes,
                    '|' => AttrOp::DashMatch,
                    '^' => AttrOp::Prefix,
                    '$' => AttrOp::Suffix,
                    _ => AttrOp::Substring,
                }
            }
            Some(c) => return Err(self.error(format!("unexpected '{}' in attribute", c))),
            None => return Err(self.error("unterminated attribute selector")),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                self.parse_quoted(quote)?
            }
            _ => self.parse_ident()?,
        };
        self.skip_whitespace();

        match self.bump() {
            Some(']') => Ok(Simple::Attr {
                name,
                test: Some((op, value)),
            }),
            _ => Err(self.error("unterminated attribute selector")),
        }
    }

    fn parse_quoted(&mut self, quote: char) -> Result<String, LookupError> {
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some('\\') => match self.bump() {
                    Some(c) => value.push(c),
                    None => return Err(self.error("dangling escape")),
                },
                Some(c) if c == quote => return Ok(value),
                Some(c) => value.push(c),
            }
        }
    }

    fn parse_ident(&mut self) -> Result<String, LookupError> {
        let mut ident = String::new();

        // Leading hyphen is allowed, a leading digit is not (`#1` is invalid CSS)
        if self.peek() == Some('-') {
            ident.push('-');
            self.bump();
        }
        match self.peek() {
            Some(c) if is_ident_start(c) => {}
            Some('\\') => {}
            Some(c) => return Err(self.error(format!("invalid identifier start '{}'", c))),
            None => return Err(self.error("expected an identifier")),
        }

        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                match self.bump() {
                    Some(escaped) => ident.push(escaped),
                    None => return Err(self.error("dangling escape")),
                }
            } else if is_ident_char(c) {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }
        Ok(ident)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Minimal chain of elements, child first
    #[derive(Clone)]
    struct Chain {
        nodes: Vec<(String, HashMap<String, String>)>,
        index: usize,
    }

    impl Chain {
        fn new(nodes: &[(&str, &[(&str, &str)])]) -> Self {
            Self {
                nodes: nodes
                    .iter()
                    .map(|(tag, attrs)| {
                        let attrs = attrs
                            .iter()
                            .map(|(k, v)| (k.to_string(), v.to_string()))
                            .collect();
                        (tag.to_string(), attrs)
                    })
                    .collect(),
                index: 0,
            }
        }
    }

    impl SelectorSubject for Chain {
        fn local_name(&self) -> String {
            self.nodes[self.index].0.clone()
        }

        fn attr(&self, name: &str) -> Option<String> {
            self.nodes[self.index].1.get(name).cloned()
        }

        fn parent_element(&self) -> Option<Self> {
            (self.index + 1 < self.nodes.len()).then(|| Chain {
                nodes: self.nodes.clone(),
                index: self.index + 1,
            })
        }
    }

    fn seat() -> Chain {
        Chain::new(&[
            ("circle", &[("id", "a-1"), ("class", "seat vip"), ("data-row", "A")][..]),
            ("g", &[("id", "row-a")][..]),
            ("svg", &[][..]),
            ("div", &[("class", "seatmap__svg")][..]),
        ])
    }

    fn matches(selector: &str) -> bool {
        Selector::parse(selector).unwrap().matches(&seat())
    }

    #[test]
    fn test_simple_selectors() {
        assert!(matches("#a-1"));
        assert!(matches("circle"));
        assert!(matches(".vip"));
        assert!(matches("circle.seat.vip"));
        assert!(matches("*"));
        assert!(!matches("#a-2"));
        assert!(!matches("path"));
        assert!(!matches(".seat.box"));
    }

    #[test]
    fn test_attribute_selectors() {
        assert!(matches("[data-row]"));
        assert!(matches("[data-row=A]"));
        assert!(matches(r#"circle[data-row="A"]"#));
        assert!(matches("[class~=vip]"));
        assert!(matches("[id^=a-]"));
        assert!(matches("[id$='-1']"));
        assert!(matches("[id*=\"-\"]"));
        assert!(matches("[id|=a]"));
        assert!(!matches("[data-row=B]"));
        assert!(!matches("[data-col]"));
    }

    #[test]
    fn test_combinators() {
        assert!(matches(".seatmap__svg circle"));
        assert!(matches("#row-a > circle"));
        assert!(matches("svg > g > #a-1"));
        assert!(matches("div g circle.vip"));
        assert!(!matches("svg > circle"));
        assert!(!matches("#row-b circle"));
    }

    #[test]
    fn test_selector_list() {
        assert!(matches("path, ellipse, circle"));
        assert!(!matches("path, ellipse"));
    }

    #[test]
    fn test_malformed_expressions_are_errors() {
        for bad in ["", "#", "#1", "circle[", "[id=", "a:hover", "a + b", ".", ",", "circle,"] {
            assert!(
                Selector::parse(bad).is_err(),
                "'{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_error_carries_expression() {
        let err = Selector::parse("circle[").unwrap_err();
        match err {
            LookupError::Malformed { expression, .. } => assert_eq!(expression, "circle["),
        }
    }
}
