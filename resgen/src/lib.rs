#![forbid(unsafe_code)]
//! Resource bundle code generator.
//!
//! Reads XML resource bundles (message keys, parameterized text and
//! optional exception metadata) and generates typed accessor classes plus
//! `.properties` files for Java, and optionally a C++ header and
//! implementation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use resgen::{GenerateOptions, Generator, Include};
//!
//! let options = GenerateOptions {
//!     src_dir: "src/main/resources".into(),
//!     locales: Some("en_US,fr_FR".to_string()),
//!     ..GenerateOptions::default()
//! };
//! let report = Generator::new(options).run(&[Include::new("happy/Birthday.xml")]);
//! for outcome in &report.outcomes {
//!     if let Some(error) = &outcome.error {
//!         eprintln!("{}", error);
//!     }
//! }
//! ```
//!
//! # Generated Files
//!
//! For `happy/Birthday.xml` with locales `en_US` and `fr_FR`:
//!
//! - `happy/Birthday.java`, `happy/Birthday_en_US.java`, `happy/Birthday_fr_FR.java`
//! - `happy/Birthday.properties`, `happy/Birthday_en_US.properties`, `happy/Birthday_fr_FR.properties`
//! - `Birthday.h` and `Birthday.cpp` when C++ output is enabled
//!
//! # Features
//!
//! - Parameter types inferred from `{0}`, `{1,number}`, `{2,date}` placeholders
//! - Exception factories shaped by the constructors each exception class offers
//! - Regeneration only when a source is newer than its outputs
//! - Hand-written locale `.properties` files copied over generated stubs

pub mod emit;
pub mod error;
pub mod generator;
pub mod loader;
pub mod locale;
pub mod naming;
pub mod placeholder;
pub mod shape;
pub mod staleness;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    emit::{CommentStyle, JavaStyle},
    error::Error,
    generator::{GenerateOptions, Generator, Include, IncludeOutcome, Mode, RunReport},
    loader::XmlLoader,
    locale::Locale,
    placeholder::{ParamKind, ParameterSignature, infer},
    shape::{ConstructorKind, ExceptionConstructorShape, RunContext, ShapeTable},
    traits::BundleLoader,
    types::{ExceptionDef, Resource, ResourceBundle, ResourceKind},
};
