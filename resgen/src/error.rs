//! All error types for the resgen crate.
//!
//! These are returned from all fallible operations (loading, locale parsing,
//! code emission, file generation, etc.).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("invalid resource bundle: {0}")]
    InvalidBundle(String),

    #[error("invalid locale `{0}`")]
    InvalidLocale(String),

    #[error("resource bundle {0} must have a locale")]
    MissingLocale(String),

    #[error("resource bundle {path} has locale '{locale}' which is not in the 'locales' list ({locales})")]
    LocaleNotInList {
        path: String,
        locale: String,
        locales: String,
    },

    #[error("resource '{0}' has no message")]
    MissingText(String),

    #[error("no exception class specified for {resource} in {path}")]
    MissingExceptionClass { resource: String, path: String },

    #[error("C++ exception class {} without a header file location in {path}", location_subject(.resource))]
    MissingExceptionLocation {
        resource: Option<String>,
        path: String,
    },

    #[error("file '{0}' is not of a supported type (.xml or .properties)")]
    UnsupportedSource(String),

    #[error("failed while processing '{}': {source}", .path.display())]
    Include {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

fn location_subject(resource: &Option<String>) -> String {
    match resource {
        Some(name) => format!("specified for {name}"),
        None => "is defined".to_string(),
    }
}

impl Error {
    /// Wraps an error with the include file it was raised for.
    pub fn include_error(path: impl Into<PathBuf>, source: Error) -> Self {
        Error::Include {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Creates a new invalid bundle error
    pub fn invalid_bundle(message: impl Into<String>) -> Self {
        Error::InvalidBundle(message.into())
    }
}
