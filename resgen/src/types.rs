//! Core, backend-agnostic types for resgen.
//! Loaders decode into these; emitters render these.

use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    locale::Locale,
    placeholder::{MAX_PARAMETERS, ParameterSignature, highest_index, infer},
};

/// Java exception class used when neither the resource nor the bundle names one.
pub const DEFAULT_JAVA_EXCEPTION_CLASS: &str = "java.lang.RuntimeException";

/// A complete resource bundle, as loaded from one source document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceBundle {
    /// The base locale of the bundle's messages.
    pub locale: Locale,

    /// Backend-specific options declared on the bundle.
    #[serde(default)]
    pub metadata: BundleMetadata,

    /// Ordered list of all resources. Emitters never reorder it.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub resources: Vec<Resource>,

    /// Manual constructor signatures for exception classes that cannot be
    /// looked up at generation time.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub factories: Vec<FactoryHint>,
}

impl ResourceBundle {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            metadata: BundleMetadata::default(),
            resources: Vec::new(),
            factories: Vec::new(),
        }
    }

    /// Appends a resource, rejecting duplicate names.
    pub fn add_resource(&mut self, resource: Resource) -> Result<(), Error> {
        if self.find_resource(&resource.name).is_some() {
            return Err(Error::invalid_bundle(format!(
                "duplicate resource '{}'",
                resource.name
            )));
        }
        self.resources.push(resource);
        Ok(())
    }

    pub fn find_resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Manual factory signatures declared for `class_name`.
    pub fn factory_signatures<'a>(&'a self, class_name: &'a str) -> impl Iterator<Item = &'a str> {
        self.factories
            .iter()
            .filter(move |f| f.class_name == class_name)
            .map(|f| f.signature.as_str())
    }

    /// The Java exception class thrown by `exception`.
    pub fn java_exception_class<'a>(&'a self, exception: &'a ExceptionDef) -> &'a str {
        exception
            .class_name
            .as_deref()
            .or(self.metadata.exception_class_name.as_deref())
            .unwrap_or(DEFAULT_JAVA_EXCEPTION_CLASS)
    }

    /// The C++ exception class thrown by `exception`, if one is declared.
    pub fn cpp_exception_class<'a>(&'a self, exception: &'a ExceptionDef) -> Option<&'a str> {
        exception
            .cpp_class_name
            .as_deref()
            .or(self.metadata.cpp_exception_class_name.as_deref())
    }
}

/// Free-form options attached to a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct BundleMetadata {
    /// Default Java exception class for exception resources.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub exception_class_name: Option<String>,

    /// Java code copied verbatim into the generated base class.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub code: Option<String>,

    /// C++ namespace wrapping the generated class.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub cpp_namespace: Option<String>,

    /// Header included first by the generated C++ implementation.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub cpp_common_include: Option<String>,

    /// Default C++ exception class for exception resources.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub cpp_exception_class_name: Option<String>,

    /// Header declaring [`Self::cpp_exception_class_name`].
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub cpp_exception_class_location: Option<String>,
}

/// A single message or exception definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Resource {
    /// Identifier, unique within the bundle.
    pub name: String,

    /// Message template in the bundle's base locale. Required by every
    /// emitter; a missing text is reported when the resource is rendered.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub text: Option<String>,

    /// Ordered name/value pairs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub properties: Vec<Property>,

    /// First comment found in the resource's definition.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub comment: Option<String>,

    pub kind: ResourceKind,
}

impl Resource {
    pub fn message(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(text.into()),
            properties: Vec::new(),
            comment: None,
            kind: ResourceKind::Message,
        }
    }

    pub fn exception(
        name: impl Into<String>,
        text: impl Into<String>,
        exception: ExceptionDef,
    ) -> Self {
        Self {
            kind: ResourceKind::Exception(exception),
            ..Self::message(name, text)
        }
    }

    /// Returns the message text, or [`Error::MissingText`].
    pub fn require_text(&self) -> Result<&str, Error> {
        self.text
            .as_deref()
            .ok_or_else(|| Error::MissingText(self.name.clone()))
    }

    /// Infers the parameter signature from the message text.
    ///
    /// Fails with [`Error::InvalidBundle`] when a placeholder index needs
    /// more than [`MAX_PARAMETERS`] parameters.
    pub fn signature(&self) -> Result<ParameterSignature, Error> {
        let text = self.require_text()?;
        if let Some(index) = highest_index(text).filter(|&i| i >= MAX_PARAMETERS) {
            return Err(Error::invalid_bundle(format!(
                "resource '{}' uses argument index {}; at most {} arguments are supported",
                self.name, index, MAX_PARAMETERS
            )));
        }
        Ok(infer(text))
    }

    pub fn as_exception(&self) -> Option<&ExceptionDef> {
        match &self.kind {
            ResourceKind::Exception(exception) => Some(exception),
            ResourceKind::Message => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ResourceKind {
    /// A plain message.
    Message,

    /// A message that can also be raised as an exception.
    Exception(ExceptionDef),
}

/// Exception-only fields of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ExceptionDef {
    /// Java exception class, overriding the bundle default.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub class_name: Option<String>,

    /// C++ exception class, overriding the bundle default.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub cpp_class_name: Option<String>,

    /// Header declaring [`Self::cpp_class_name`].
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub cpp_class_location: Option<String>,

    /// Whether the Java class gets a cause-accepting factory. `None` leaves
    /// it to the exception class's constructors.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub chain_exceptions: Option<bool>,

    /// Whether the C++ class gets a `prev`-chaining factory.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub cpp_chain_exceptions: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

/// A manually declared constructor signature, e.g.
/// `("com.acme.MyError", "(String message, Throwable cause)")`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FactoryHint {
    pub class_name: String,
    pub signature: String,
}
