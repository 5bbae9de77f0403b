//! Project: winpath
//! Module: path
//!
//! The [WinPath] value type and its pure string operations. Nothing in this
//! module touches the filesystem.

use crate::vars::VarMap;
use std::convert::Infallible;
use std::fmt::Display;
use std::ops::Div;
use std::str::FromStr;
use tracing::{debug, trace};

pub const SEP: char = '\\';
pub const ALT_SEP: char = '/';
pub const EXT_SEP: char = '.';
pub const CUR_DIR: &str = ".";
pub const PAR_DIR: &str = "..";

/// A normalized Windows-style path.
///
/// The inner string always uses `\` as its separator, never holds repeated
/// separators, and only ends with a separator when it is a bare root such as
/// `C:\`. A `WinPath` is immutable: every operation that would modify it
/// produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct WinPath {
    raw: String,
}

/// The closed set of values that can be appended onto a [WinPath].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment<'a> {
    Str(&'a str),
    Path(&'a WinPath),
}

impl<'a> Segment<'a> {
    fn as_str(self) -> &'a str {
        match self {
            Self::Str(s) => s,
            Self::Path(p) => p.as_str(),
        }
    }
}

impl<'a> From<&'a str> for Segment<'a> {
    fn from(value: &'a str) -> Self {
        Self::Str(value)
    }
}

impl<'a> From<&'a String> for Segment<'a> {
    fn from(value: &'a String) -> Self {
        Self::Str(value.as_str())
    }
}

impl<'a> From<&'a WinPath> for Segment<'a> {
    fn from(value: &'a WinPath) -> Self {
        Self::Path(value)
    }
}

/// Splits `s` into its drive prefix (`X:`) and the remainder.
fn split_drive_str(s: &str) -> (&str, &str) {
    let bytes = s.as_bytes();
    match bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        true => s.split_at(2),
        false => ("", s),
    }
}

/// Converts `s` into its canonical backslash-separated form.
///
/// Repeated separators collapse, `.` segments disappear and `..` segments
/// consume the segment before them. A `..` directly under a root has nowhere
/// to go and is dropped.
fn normalize(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    let s = s.replace(ALT_SEP, "\\");
    let (drive, rest) = split_drive_str(&s);
    let rooted = rest.starts_with(SEP);

    let mut segments: Vec<&str> = Vec::new();
    for seg in rest.split(SEP) {
        match seg {
            "" | CUR_DIR => (),
            PAR_DIR => match segments.last().copied() {
                Some(last) if last != PAR_DIR => {
                    segments.pop();
                }
                _ if rooted == true => (),
                _ => segments.push(seg),
            },
            _ => segments.push(seg),
        }
    }

    let mut raw = String::with_capacity(s.len());
    raw.push_str(drive);
    if rooted == true {
        raw.push(SEP);
    }
    raw.push_str(&segments.join("\\"));
    if raw.is_empty() {
        raw.push_str(CUR_DIR);
    }
    raw
}

impl WinPath {
    /// Creates a new path from `s`, normalizing it along the way.
    ///
    /// Construction never fails: an empty string produces an empty path.
    pub fn new(s: &str) -> Self {
        Self { raw: normalize(s) }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Accesses the drive prefix (`C:`), or an empty string when there is none.
    pub fn drive(&self) -> &str {
        split_drive_str(&self.raw).0
    }

    /// Splits the path into its drive prefix and everything after it.
    pub fn split_drive(&self) -> (&str, &str) {
        split_drive_str(&self.raw)
    }

    /// Checks if the path starts at a root separator, with or without a drive.
    pub fn is_absolute(&self) -> bool {
        split_drive_str(&self.raw).1.starts_with(SEP)
    }

    pub fn is_relative(&self) -> bool {
        self.is_absolute() == false
    }

    /// Checks if the path is a bare root such as `C:\` or `\`.
    pub fn is_root(&self) -> bool {
        split_drive_str(&self.raw).1.len() == 1 && self.is_absolute() == true
    }

    /// Divides the raw string into the head (drive and root included) and the
    /// final segment.
    fn split_last(&self) -> (&str, &str) {
        let (drive, rest) = split_drive_str(&self.raw);
        match rest.rfind(SEP) {
            // keep the root separator when the head is the root itself
            Some(0) => (&self.raw[..drive.len() + 1], &rest[1..]),
            Some(i) => (&self.raw[..drive.len() + i], &rest[i + 1..]),
            None => (drive, rest),
        }
    }

    /// Splits the path into its head and its final segment.
    ///
    /// The head of a single relative segment is an empty path.
    pub fn split(&self) -> (WinPath, WinPath) {
        let (head, tail) = self.split_last();
        (
            Self {
                raw: head.to_string(),
            },
            Self {
                raw: tail.to_string(),
            },
        )
    }

    /// Returns the final segment of the path. A bare root or drive has no
    /// basename.
    pub fn basename(&self) -> &str {
        self.split_last().1
    }

    /// Returns the extension of the basename, leading dot included.
    ///
    /// Leading dots of the basename never start an extension, so `.bashrc`
    /// has none.
    pub fn ext(&self) -> &str {
        let base = self.basename();
        let lead = base.len() - base.trim_start_matches(EXT_SEP).len();
        match base[lead..].rfind(EXT_SEP) {
            Some(i) => &base[lead + i..],
            None => "",
        }
    }

    /// Returns the basename without its extension.
    pub fn stem(&self) -> &str {
        let base = self.basename();
        &base[..base.len() - self.ext().len()]
    }

    /// Returns the path without its final segment.
    ///
    /// Roots, bare drives, `.` and the empty path are their own parent. The
    /// parent of a single relative segment is `.`.
    pub fn parent(&self) -> WinPath {
        let (head, tail) = self.split_last();
        match tail {
            "" | CUR_DIR => self.clone(),
            _ if head.is_empty() => Self {
                raw: CUR_DIR.to_string(),
            },
            _ => Self {
                raw: head.to_string(),
            },
        }
    }

    /// Iterates over this path and each of its parents, ending at the first
    /// path that is its own parent.
    pub fn ancestors(&self) -> Ancestors {
        Ancestors {
            next: Some(self.clone()),
        }
    }

    /// Appends `segment` onto this path.
    ///
    /// The segment is always treated as relative: joining `D:\x` onto `C:\y`
    /// produces `C:\y\D:\x`.
    pub fn join<'a>(&self, segment: impl Into<Segment<'a>>) -> WinPath {
        let segment = segment.into().as_str();
        let joined = if self.raw.is_empty() == true {
            segment.to_string()
        } else if split_drive_str(&self.raw).1.is_empty() == true {
            // a bare drive is drive-relative: `C:` + `x` is `C:x`
            format!("{}{}", self.raw, segment)
        } else {
            format!("{}{}{}", self.raw, SEP, segment)
        };
        trace!("joining {:?} onto {:?}", segment, self.raw);
        Self::new(&joined)
    }

    /// Appends every segment in order.
    pub fn join_all<'a, I>(&self, segments: I) -> WinPath
    where
        I: IntoIterator,
        I::Item: Into<Segment<'a>>,
    {
        segments
            .into_iter()
            .fold(self.clone(), |path, segment| path.join(segment))
    }

    /// Lowercases the path for case-insensitive comparisons.
    pub fn norm_case(&self) -> WinPath {
        Self {
            raw: self.raw.to_lowercase(),
        }
    }

    /// Replaces a leading `~` or `~name` with a home directory.
    ///
    /// `~` is the current user's home directory and `~name` is the directory
    /// next to it named `name`. The path is returned unchanged when it does
    /// not start with `~` or when the home directory cannot be determined.
    pub fn expand_user(&self) -> WinPath {
        if self.raw.starts_with('~') == false {
            return self.clone();
        }
        let home = match home::home_dir() {
            Some(h) => Self::new(&h.to_string_lossy()),
            None => return self.clone(),
        };
        let (user, rest) = match self.raw.find(SEP) {
            Some(i) => self.raw.split_at(i),
            None => (self.raw.as_str(), ""),
        };
        let base = match &user[1..] {
            "" => home,
            name => home.parent().join(name),
        };
        debug!("expanded {:?} to home directory {:?}", user, base.raw);
        Self::new(&format!("{}{}", base, rest))
    }

    /// Expands `%name%`, `$name` and `${name}` from the environment.
    pub fn expand_vars(&self) -> WinPath {
        self.expand_vars_with(&VarMap::new())
    }

    /// Expands `%name%`, `$name` and `${name}` from the environment, falling
    /// back to `vars`.
    ///
    /// `%%` and `$$` produce a literal `%` and `$`, text between single quotes
    /// is left alone, and names that are not defined anywhere are kept as
    /// written.
    pub fn expand_vars_with(&self, vars: &VarMap) -> WinPath {
        if self.raw.contains(|c: char| c == '%' || c == '$') == false {
            return self.clone();
        }
        let expanded = expand(&self.raw, vars);
        debug!("expanded variables in {:?} to {:?}", self.raw, expanded);
        Self::new(&expanded)
    }
}

fn is_var_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn expand(s: &str, vars: &VarMap) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    // writes the value of `name`, or `literal` when it is undefined
    let substitute = |out: &mut String, name: &str, literal: &str| match vars.lookup(name) {
        Some(value) => out.push_str(&value),
        None => out.push_str(literal),
    };
    while let Some(c) = rest.chars().next() {
        let after = &rest[c.len_utf8()..];
        match c {
            '\'' => match after.find('\'') {
                Some(i) => {
                    out.push_str(&rest[..i + 2]);
                    rest = &rest[i + 2..];
                }
                None => {
                    out.push_str(rest);
                    rest = "";
                }
            },
            '%' if after.starts_with('%') => {
                out.push('%');
                rest = &after[1..];
            }
            '%' => match after.find('%') {
                Some(i) => {
                    substitute(&mut out, &after[..i], &rest[..i + 2]);
                    rest = &after[i + 1..];
                }
                None => {
                    out.push_str(rest);
                    rest = "";
                }
            },
            '$' if after.starts_with('$') => {
                out.push('$');
                rest = &after[1..];
            }
            '$' if after.starts_with('{') => match after.find('}') {
                Some(i) => {
                    substitute(&mut out, &after[1..i], &rest[..i + 2]);
                    rest = &after[i + 1..];
                }
                None => {
                    out.push_str(rest);
                    rest = "";
                }
            },
            '$' => {
                let len = after.find(|c: char| is_var_char(c) == false).unwrap_or(after.len());
                substitute(&mut out, &after[..len], &rest[..len + 1]);
                rest = &after[len..];
            }
            _ => {
                out.push(c);
                rest = after;
            }
        }
    }
    out
}

/// Iterator over a path and its parents. See [WinPath::ancestors].
#[derive(Debug, Clone)]
pub struct Ancestors {
    next: Option<WinPath>,
}

impl Iterator for Ancestors {
    type Item = WinPath;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let parent = current.parent();
        if parent != current {
            self.next = Some(parent);
        }
        Some(current)
    }
}

impl FromStr for WinPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for WinPath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for WinPath {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl AsRef<str> for WinPath {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl Display for WinPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Div<&str> for &WinPath {
    type Output = WinPath;

    fn div(self, rhs: &str) -> Self::Output {
        self.join(rhs)
    }
}

impl Div<&WinPath> for &WinPath {
    type Output = WinPath;

    fn div(self, rhs: &WinPath) -> Self::Output {
        self.join(rhs)
    }
}

impl Div<&str> for WinPath {
    type Output = WinPath;

    fn div(self, rhs: &str) -> Self::Output {
        self.join(rhs)
    }
}

impl Div<&WinPath> for WinPath {
    type Output = WinPath;

    fn div(self, rhs: &WinPath) -> Self::Output {
        self.join(rhs)
    }
}
