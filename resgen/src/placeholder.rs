//! Placeholder scanning and parameter inference for message templates.
//!
//! A message such as `"Happy Birthday, {0}! You don't look {1,number}."`
//! declares positional arguments. Their types are inferred from the format
//! keyword after the index, giving a signature that the backends turn into
//! typed parameter lists.
//!
//! The scan is purely textual: it looks for `{N` substrings and inspects what
//! follows the last occurrence of each. Quoted braces and literal text that
//! happens to look like a placeholder are not distinguished.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref PLACEHOLDER_INDEX_REGEX: Regex = Regex::new(r"\{(\d+)").unwrap();
}

/// A Java method takes at most 255 parameter slots, one of which is `this`.
pub const MAX_PARAMETERS: usize = 254;

/// The inferred type of one positional argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    String,
    Number,
    Date,
    Time,
    /// No placeholder at this index, or a `choice` format.
    Unknown,
}

impl ParamKind {
    /// `Unknown` positions are passed as strings.
    pub fn or_string(self) -> ParamKind {
        match self {
            ParamKind::Unknown => ParamKind::String,
            kind => kind,
        }
    }
}

/// Concrete type names a backend uses for each parameter kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeNames {
    pub string: &'static str,
    pub number: &'static str,
    pub date: &'static str,
    pub time: &'static str,
}

impl TypeNames {
    pub const JAVA: TypeNames = TypeNames {
        string: "String",
        number: "Number",
        date: "java.util.Date",
        time: "java.util.Date",
    };

    pub const CPP: TypeNames = TypeNames {
        string: "const std::string &",
        number: "int",
        date: "time_t",
        time: "time_t",
    };

    pub fn name_of(&self, kind: ParamKind) -> &'static str {
        match kind.or_string() {
            ParamKind::Number => self.number,
            ParamKind::Date => self.date,
            ParamKind::Time => self.time,
            ParamKind::String | ParamKind::Unknown => self.string,
        }
    }
}

/// Ordered parameter kinds of a message, indexed by placeholder position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct ParameterSignature(Vec<ParamKind>);

impl ParameterSignature {
    pub fn kinds(&self) -> &[ParamKind] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a parameter list such as `String p0, Number p1`.
    ///
    /// Reference and pointer types (ending in `&` or `*`) are glued to the
    /// parameter name: `const std::string &p0`.
    pub fn parameter_list(&self, names: &TypeNames) -> String {
        self.0
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                let ty = names.name_of(*kind);
                if ty.ends_with('&') || ty.ends_with('*') {
                    format!("{}p{}", ty, i)
                } else {
                    format!("{} p{}", ty, i)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Returns an argument list such as `p0, p1`.
    pub fn argument_list(&self) -> String {
        (0..self.0.len())
            .map(|i| format!("p{}", i))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<Vec<ParamKind>> for ParameterSignature {
    fn from(kinds: Vec<ParamKind>) -> Self {
        ParameterSignature(kinds.into_iter().map(ParamKind::or_string).collect())
    }
}

/// Infers the parameter signature of a message. `Unknown` positions are
/// defaulted to `String`.
///
/// ```rust
/// use resgen::placeholder::{infer, ParamKind};
/// let sig = infer("Hello {0}, you are {1,number} years old");
/// assert_eq!(sig.kinds(), &[ParamKind::String, ParamKind::Number]);
/// assert_eq!(infer("{2}").len(), 3);
/// ```
pub fn infer(message: &str) -> ParameterSignature {
    ParameterSignature::from(infer_raw(message))
}

/// Infers parameter kinds, keeping `Unknown` for positions without a
/// placeholder and for `choice` formats.
///
/// Indices at or above [`MAX_PARAMETERS`] are ignored; callers that must
/// reject them check [`highest_index`] first.
pub fn infer_raw(message: &str) -> Vec<ParamKind> {
    let Some(max) = highest_index(message) else {
        return Vec::new();
    };
    let len = max.saturating_add(1).min(MAX_PARAMETERS);

    (0..len).map(|i| arg_kind(i, message)).collect()
}

/// The largest `{N` index in `message`. Indices too large for `usize`
/// report `usize::MAX`.
pub fn highest_index(message: &str) -> Option<usize> {
    PLACEHOLDER_INDEX_REGEX
        .captures_iter(message)
        .map(|caps| caps[1].parse::<usize>().unwrap_or(usize::MAX))
        .max()
}

/// Returns the kind of the `index`th argument, looking at the last `{index`
/// in the message.
fn arg_kind(index: usize, message: &str) -> ParamKind {
    let needle = format!("{{{}", index);
    let Some(found) = message.rfind(&needle) else {
        return ParamKind::Unknown;
    };

    let rest = message[found + needle.len()..].trim_start_matches(' ');
    let Some(format) = rest.strip_prefix(',') else {
        return ParamKind::String;
    };
    let format = format.trim_start_matches(' ');

    if format.starts_with("number") {
        ParamKind::Number
    } else if format.starts_with("date") {
        ParamKind::Date
    } else if format.starts_with("time") {
        ParamKind::Time
    } else if format.starts_with("choice") {
        ParamKind::Unknown
    } else {
        ParamKind::String
    }
}
