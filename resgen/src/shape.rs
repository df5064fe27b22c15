//! Which constructors an exception class offers.
//!
//! Exception factories in generated Java code call one of four constructor
//! forms. Since the exception classes are not available at generation time,
//! their shapes come from a [`ConstructorShapeProvider`] (normally a
//! [`ShapeTable`]) and, failing that, from `<factory>` hints in the bundle.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One constructor form an exception class may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructorKind {
    /// `(String message)`
    Message,
    /// `(String message, Throwable cause)`
    MessageCause,
    /// `(ResourceInstance r)`
    Instance,
    /// `(ResourceInstance r, Throwable cause)`
    InstanceCause,
}

impl ConstructorKind {
    /// Parses a signature hint such as `(String message, Throwable cause)`.
    pub fn from_signature(signature: &str) -> Option<Self> {
        match signature.trim() {
            "(String message)" => Some(ConstructorKind::Message),
            "(String message, Throwable cause)" => Some(ConstructorKind::MessageCause),
            "(ResourceInstance r)" => Some(ConstructorKind::Instance),
            "(ResourceInstance r, Throwable cause)" => Some(ConstructorKind::InstanceCause),
            _ => None,
        }
    }
}

/// The set of constructor forms an exception class is known to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ExceptionConstructorShape {
    pub message: bool,
    pub message_cause: bool,
    pub instance: bool,
    pub instance_cause: bool,
}

impl ExceptionConstructorShape {
    /// `(String)` and `(String, Throwable)`, as most `java.lang` throwables.
    pub const MESSAGE_AND_CAUSE: Self = Self {
        message: true,
        message_cause: true,
        instance: false,
        instance_cause: false,
    };

    /// Builds a shape from `<factory>` signature strings. Unrecognized
    /// signatures are ignored.
    pub fn from_signatures<'a>(signatures: impl IntoIterator<Item = &'a str>) -> Self {
        signatures
            .into_iter()
            .filter_map(ConstructorKind::from_signature)
            .collect()
    }

    pub fn has(&self, kind: ConstructorKind) -> bool {
        match kind {
            ConstructorKind::Message => self.message,
            ConstructorKind::MessageCause => self.message_cause,
            ConstructorKind::Instance => self.instance,
            ConstructorKind::InstanceCause => self.instance_cause,
        }
    }

    pub fn with(mut self, kind: ConstructorKind) -> Self {
        match kind {
            ConstructorKind::Message => self.message = true,
            ConstructorKind::MessageCause => self.message_cause = true,
            ConstructorKind::Instance => self.instance = true,
            ConstructorKind::InstanceCause => self.instance_cause = true,
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Constructor used by the plain factory. The `*Cause` forms are called
    /// with a `null` cause.
    pub fn factory_constructor(&self) -> Option<ConstructorKind> {
        [
            ConstructorKind::Instance,
            ConstructorKind::InstanceCause,
            ConstructorKind::Message,
            ConstructorKind::MessageCause,
        ]
        .into_iter()
        .find(|kind| self.has(*kind))
    }

    /// Constructor used by the cause-accepting factory.
    pub fn cause_constructor(&self) -> Option<ConstructorKind> {
        [ConstructorKind::InstanceCause, ConstructorKind::MessageCause]
            .into_iter()
            .find(|kind| self.has(*kind))
    }
}

impl FromIterator<ConstructorKind> for ExceptionConstructorShape {
    fn from_iter<T: IntoIterator<Item = ConstructorKind>>(iter: T) -> Self {
        iter.into_iter()
            .fold(ExceptionConstructorShape::default(), ExceptionConstructorShape::with)
    }
}

/// Looks up the constructor shape of an exception class by name.
pub trait ConstructorShapeProvider {
    fn lookup(&self, class_name: &str) -> Option<ExceptionConstructorShape>;
}

lazy_static! {
    /// Standard throwables and the constructors they declare.
    static ref JAVA_DEFAULT_SHAPES: HashMap<&'static str, ExceptionConstructorShape> = {
        let mut m = HashMap::new();
        for class_name in [
            "java.lang.Throwable",
            "java.lang.Exception",
            "java.lang.Error",
            "java.lang.RuntimeException",
            "java.lang.IllegalArgumentException",
            "java.lang.IllegalStateException",
            "java.lang.UnsupportedOperationException",
            "java.lang.SecurityException",
            "java.io.IOException",
            "java.io.UncheckedIOException",
        ] {
            m.insert(class_name, ExceptionConstructorShape::MESSAGE_AND_CAUSE);
        }
        // Message-only constructors.
        for class_name in [
            "java.lang.ArithmeticException",
            "java.lang.NullPointerException",
            "java.lang.IndexOutOfBoundsException",
            "java.lang.ClassCastException",
            "java.lang.NumberFormatException",
        ] {
            m.insert(
                class_name,
                ExceptionConstructorShape::default().with(ConstructorKind::Message),
            );
        }
        m
    };
}

/// A static table of known exception classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeTable {
    shapes: HashMap<String, ExceptionConstructorShape>,
}

impl ShapeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table preloaded with the common `java.lang` throwables.
    pub fn java_defaults() -> Self {
        Self {
            shapes: JAVA_DEFAULT_SHAPES
                .iter()
                .map(|(name, shape)| (name.to_string(), *shape))
                .collect(),
        }
    }

    /// Adds or replaces the shape of `class_name`.
    pub fn insert(&mut self, class_name: impl Into<String>, shape: ExceptionConstructorShape) {
        self.shapes.insert(class_name.into(), shape);
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl ConstructorShapeProvider for ShapeTable {
    /// Tries `class_name` as given, then as a `java.lang` class.
    fn lookup(&self, class_name: &str) -> Option<ExceptionConstructorShape> {
        self.shapes
            .get(class_name)
            .or_else(|| self.shapes.get(&format!("java.lang.{}", class_name)))
            .copied()
    }
}

/// State shared by everything generated in one run.
#[derive(Debug, Default)]
pub struct RunContext {
    shape_cache: HashMap<String, Option<ExceptionConstructorShape>>,
    warned_classes: HashSet<String>,
    warnings: Vec<String>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the constructor shape of `class_name`.
    ///
    /// The provider is asked once per class per run. On a miss, the
    /// bundle's factory `hints` for that class are used; if they yield
    /// nothing either, `None` is returned and a warning is recorded the
    /// first time the class is seen.
    pub fn resolve_shape<'a>(
        &mut self,
        provider: &dyn ConstructorShapeProvider,
        class_name: &str,
        hints: impl IntoIterator<Item = &'a str>,
    ) -> Option<ExceptionConstructorShape> {
        let looked_up = *self
            .shape_cache
            .entry(class_name.to_string())
            .or_insert_with(|| provider.lookup(class_name));
        if looked_up.is_some() {
            return looked_up;
        }

        let hinted = ExceptionConstructorShape::from_signatures(hints);
        if !hinted.is_empty() {
            return Some(hinted);
        }

        if self.warned_classes.insert(class_name.to_string()) {
            self.warn(format!(
                "Could not find exception class '{}'. Exception factory methods will not be generated.",
                class_name
            ));
        }
        None
    }

    /// Records and logs a warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.warnings.push(message);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Returns the warnings recorded so far, leaving the list empty.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}
