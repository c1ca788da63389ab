//! Pattern compiler - turns route templates into anchored regex matchers.
//!
//! Compilation happens once, at registration time. The scanner walks the
//! template a character at a time, appending regex source to an output
//! buffer and pushing a [`ParamName`] every time it emits a capture group,
//! so `param_names[i]` always describes capture group `i + 1`.

use crate::config::RouterConfig;
use crate::error::CompilationError;
use crate::params::{decode_component, Params};
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// User-supplied path description
///
/// Immutable once registered. Templates go through the scanner; raw
/// patterns are used verbatim as the matcher.
#[derive(Debug, Clone)]
pub enum RouteSpec {
    /// Path template such as `/user/:user/:op?`
    Template(String),
    /// Raw regular expression; every capture group is positional
    Pattern(Regex),
}

impl RouteSpec {
    /// The template text, or the regex source for raw patterns
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            RouteSpec::Template(template) => template,
            RouteSpec::Pattern(regex) => regex.as_str(),
        }
    }

    /// Whether this spec is a raw regular expression
    #[must_use]
    pub fn is_pattern(&self) -> bool {
        matches!(self, RouteSpec::Pattern(_))
    }
}

impl fmt::Display for RouteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RouteSpec {
    fn from(template: &str) -> Self {
        RouteSpec::Template(template.to_string())
    }
}

impl From<String> for RouteSpec {
    fn from(template: String) -> Self {
        RouteSpec::Template(template)
    }
}

impl From<&String> for RouteSpec {
    fn from(template: &String) -> Self {
        RouteSpec::Template(template.clone())
    }
}

impl From<Regex> for RouteSpec {
    fn from(regex: Regex) -> Self {
        RouteSpec::Pattern(regex)
    }
}

/// Options that shape the generated matcher
///
/// Ignored for [`RouteSpec::Pattern`], which carries its own flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Case-sensitive matching (default: `false`)
    pub sensitive: bool,
    /// Exact trailing-slash matching (default: `false`)
    pub strict: bool,
    /// Anchor at the end of the path; `false` matches a path prefix that
    /// ends on a segment boundary (default: `true`)
    pub end: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            sensitive: false,
            strict: false,
            end: true,
        }
    }
}

impl From<&RouterConfig> for CompileOptions {
    fn from(config: &RouterConfig) -> Self {
        Self {
            sensitive: config.sensitive,
            strict: config.strict,
            end: true,
        }
    }
}

/// Name slot for one capture group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamName {
    /// Introduced by `:name` syntax
    Named(Arc<str>),
    /// Wildcard `*`, a parenthesized group, or any group of a raw pattern
    Positional,
}

impl ParamName {
    /// The capture name, if the slot is named
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            ParamName::Named(name) => Some(name),
            ParamName::Positional => None,
        }
    }
}

/// A matcher plus the ordered names of its capture groups
///
/// Invariant: `matcher` has exactly `param_names.len()` capture groups.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    spec: RouteSpec,
    matcher: Regex,
    param_names: Vec<ParamName>,
}

impl CompiledPattern {
    /// The spec this pattern was compiled from
    #[must_use]
    pub fn spec(&self) -> &RouteSpec {
        &self.spec
    }

    /// The compiled regular expression
    #[must_use]
    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    /// Capture group names in group order
    #[must_use]
    pub fn param_names(&self) -> &[ParamName] {
        &self.param_names
    }

    /// Test a pathname without extracting parameters
    #[inline]
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    /// Match a pathname and zip its captures against the parameter names
    ///
    /// Named captures are addressable by name; positional captures are
    /// appended to the positional list in group order. Captured values are
    /// percent-decoded. A group that did not participate in the match is
    /// recorded as absent rather than as an empty string.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<Params> {
        let caps = self.matcher.captures(path)?;
        let mut params = Params::new();
        for (index, name) in self.param_names.iter().enumerate() {
            let value = caps.get(index + 1).map(|m| decode_component(m.as_str()));
            match name {
                ParamName::Named(name) => params.insert(Arc::clone(name), value),
                ParamName::Positional => params.push(value),
            }
        }
        Some(params)
    }
}

/// Compile a route spec into a [`CompiledPattern`]
///
/// # Errors
///
/// Returns a [`CompilationError`] for unbalanced groups, unterminated
/// character classes, a dangling trailing `\`, or an expression the regex
/// engine rejects.
pub fn compile(
    spec: impl Into<RouteSpec>,
    options: CompileOptions,
) -> Result<CompiledPattern, CompilationError> {
    let spec = spec.into();

    let (matcher, param_names) = match &spec {
        RouteSpec::Pattern(regex) => {
            let groups = regex.captures_len().saturating_sub(1);
            (regex.clone(), vec![ParamName::Positional; groups])
        }
        RouteSpec::Template(template) => {
            let (body, names) = TemplateScanner::new(template).scan()?;
            let source = assemble(&body, options);
            let matcher = Regex::new(&source).map_err(|e| CompilationError::InvalidRegex {
                pattern: source.clone(),
                reason: e.to_string(),
            })?;
            (matcher, names)
        }
    };

    let groups = matcher.captures_len().saturating_sub(1);
    if groups != param_names.len() {
        return Err(CompilationError::CaptureCountMismatch {
            pattern: matcher.as_str().to_string(),
            groups,
            params: param_names.len(),
        });
    }

    debug!(
        spec = %spec,
        regex = %matcher.as_str(),
        param_count = param_names.len(),
        sensitive = options.sensitive,
        strict = options.strict,
        "Route pattern compiled"
    );

    Ok(CompiledPattern {
        spec,
        matcher,
        param_names,
    })
}

fn assemble(body: &str, options: CompileOptions) -> String {
    let mut source = String::with_capacity(body.len() + 16);
    if !options.sensitive {
        source.push_str("(?i)");
    }
    source.push('^');
    source.push_str(body);
    if !options.strict {
        source.push_str("/?");
    }
    if options.end {
        source.push('$');
    } else {
        source.push_str("(?:/|$)");
    }
    source
}

/// Whether a copied `(...)` group captures on its own
fn opens_capture_source(group: &str) -> bool {
    let Some(rest) = group.strip_prefix("(?") else {
        return true;
    };
    rest.starts_with("P<") || (rest.starts_with('<') && !rest.starts_with("<=") && !rest.starts_with("<!"))
}

#[inline]
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

struct TemplateScanner<'t> {
    template: &'t str,
    chars: Vec<(usize, char)>,
    pos: usize,
    out: String,
    names: Vec<ParamName>,
}

impl<'t> TemplateScanner<'t> {
    fn new(template: &'t str) -> Self {
        Self {
            template,
            chars: template.char_indices().collect(),
            pos: 0,
            out: String::with_capacity(template.len() * 2),
            names: Vec::new(),
        }
    }

    fn scan(mut self) -> Result<(String, Vec<ParamName>), CompilationError> {
        while let Some(c) = self.peek() {
            match c {
                '\\' => self.escape()?,
                '/' | '.' | ':' if self.param_ahead() => self.param()?,
                '/' => {
                    self.pos += 1;
                    self.out.push('/');
                }
                '.' => {
                    self.pos += 1;
                    self.out.push_str(r"\.");
                }
                '*' => {
                    self.pos += 1;
                    self.out.push_str("(.*)");
                    self.names.push(ParamName::Positional);
                }
                '[' => self.class()?,
                '(' => self.group(true)?,
                ')' => {
                    return Err(CompilationError::UnbalancedGroup {
                        template: self.template.to_string(),
                        position: self.offset(),
                    })
                }
                other => {
                    self.pos += 1;
                    self.out.push(other);
                }
            }
        }
        Ok((self.out, self.names))
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).map(|&(_, c)| c)
    }

    fn offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map_or(self.template.len(), |&(offset, _)| offset)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// `[/][.]:name` starts at the cursor
    fn param_ahead(&self) -> bool {
        let mut n = 0;
        if self.peek_at(n) == Some('/') {
            n += 1;
        }
        if self.peek_at(n) == Some('.') {
            n += 1;
        }
        self.peek_at(n) == Some(':') && self.peek_at(n + 1).is_some_and(is_name_char)
    }

    fn escape(&mut self) -> Result<(), CompilationError> {
        self.pos += 1;
        let Some(escaped) = self.peek() else {
            return Err(CompilationError::DanglingEscape {
                template: self.template.to_string(),
            });
        };
        self.pos += 1;
        self.out.push('\\');
        self.out.push(escaped);
        Ok(())
    }

    fn param(&mut self) -> Result<(), CompilationError> {
        let slash = if self.eat('/') { "/" } else { "" };
        let format = self.eat('.');
        self.pos += 1; // ':'

        let mut name = String::new();
        while let Some(c) = self.peek().filter(|c| is_name_char(*c)) {
            name.push(c);
            self.pos += 1;
        }
        self.names.push(ParamName::Named(Arc::from(name)));

        let custom = if self.peek() == Some('(') {
            Some(self.custom_capture()?)
        } else {
            None
        };
        let optional = self.eat('?');
        let star = self.eat('*');

        let capture = match (custom, format, star) {
            (Some(custom), _, _) => custom,
            (None, true, true) => "([^/.]+)".to_string(),
            (None, true, false) => "([^/.]+?)".to_string(),
            (None, false, true) => "([^/]+)".to_string(),
            (None, false, false) => "([^/]+?)".to_string(),
        };
        let format = if format { r"\." } else { "" };

        if optional {
            self.out.push_str("(?:");
            self.out.push_str(slash);
            self.out.push_str(format);
            self.out.push_str(&capture);
            self.out.push_str(")?");
        } else {
            self.out.push_str(slash);
            self.out.push_str("(?:");
            self.out.push_str(format);
            self.out.push_str(&capture);
            self.out.push(')');
        }

        // `:name*` swallows the rest of the path without capturing it
        if star {
            self.out.push_str("(?:/.*)?");
        }
        Ok(())
    }

    /// `:name(...)` - the parenthesized expression replaces the default capture
    fn custom_capture(&mut self) -> Result<String, CompilationError> {
        if self.peek_at(1) == Some('*') && self.peek_at(2) == Some(')') {
            self.pos += 3;
            return Ok("(.+)".to_string());
        }
        let saved = std::mem::take(&mut self.out);
        let result = self.group(false);
        let capture = std::mem::replace(&mut self.out, saved);
        result?;
        // `:id(?:a|b)` still has to yield a value for `id`
        if opens_capture_source(&capture) {
            Ok(capture)
        } else {
            Ok(format!("({capture})"))
        }
    }

    /// Copy a parenthesized group verbatim, counting nested capture groups
    fn group(&mut self, counted: bool) -> Result<(), CompilationError> {
        let start = self.offset();
        self.pos += 1;
        self.out.push('(');
        if counted && self.opens_capture() {
            self.names.push(ParamName::Positional);
        }

        loop {
            match self.peek() {
                None => {
                    return Err(CompilationError::UnbalancedGroup {
                        template: self.template.to_string(),
                        position: start,
                    })
                }
                Some(')') => {
                    self.pos += 1;
                    self.out.push(')');
                    return Ok(());
                }
                Some('\\') => self.escape()?,
                Some('[') => self.class()?,
                Some('(') => self.group(true)?,
                // A `*` with nothing to repeat is a wildcard, not a quantifier
                Some('*') if matches!(self.out.chars().last(), Some('(' | '|')) => {
                    self.pos += 1;
                    self.out.push_str(".*");
                }
                Some(c) => {
                    self.pos += 1;
                    self.out.push(c);
                }
            }
        }
    }

    /// Called just past a `(`: does this group capture?
    fn opens_capture(&self) -> bool {
        if self.peek() != Some('?') {
            return true;
        }
        match (self.peek_at(1), self.peek_at(2)) {
            (Some('P'), Some('<')) => true,
            (Some('<'), Some(c)) => c != '=' && c != '!',
            _ => false,
        }
    }

    fn class(&mut self) -> Result<(), CompilationError> {
        let start = self.offset();
        self.pos += 1;
        self.out.push('[');
        if self.eat('^') {
            self.out.push('^');
        }
        if self.eat(']') {
            self.out.push(']');
        }

        loop {
            match self.peek() {
                None => {
                    return Err(CompilationError::UnterminatedClass {
                        template: self.template.to_string(),
                        position: start,
                    })
                }
                Some('\\') => self.escape()?,
                Some(']') => {
                    self.pos += 1;
                    self.out.push(']');
                    return Ok(());
                }
                Some(c) => {
                    self.pos += 1;
                    self.out.push(c);
                }
            }
        }
    }
}
