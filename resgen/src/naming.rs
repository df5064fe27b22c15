//! Class, file and member names derived from source paths and resources.

use std::path::{Path, PathBuf};

use crate::locale::{Locale, strip_locale_suffix};

/// `happy/Birthday_fr_FR.properties` with suffix `.properties` gives
/// `happy.Birthday`. Both `/` and `\` separate packages.
pub fn class_name_from_file(file_name: &str, suffix: &str) -> String {
    strip_locale_suffix(file_name, suffix).replace(['/', '\\'], ".")
}

/// Last segment of a dotted class name: `happy.Birthday` gives `Birthday`.
pub fn remove_package(class_name: &str) -> &str {
    class_name
        .rsplit_once('.')
        .map(|(_, name)| name)
        .unwrap_or(class_name)
}

/// Package part of a dotted class name, if any.
pub fn package_name(class_name: &str) -> Option<&str> {
    class_name.rsplit_once('.').map(|(package, _)| package)
}

/// Unqualified class name with an optional locale suffix, for example
/// `Birthday_en_US`.
pub fn class_name_sans_package(class_name: &str, locale: Option<&Locale>) -> String {
    match locale {
        Some(locale) => format!("{}_{}", remove_package(class_name), locale),
        None => remove_package(class_name).to_string(),
    }
}

/// Fully-qualified class name with an optional locale suffix.
pub fn localized_class_name(class_name: &str, locale: Option<&Locale>) -> String {
    match locale {
        Some(locale) => format!("{}_{}", class_name, locale),
        None => class_name.to_string(),
    }
}

/// `root` extended by the package directories of `class_name`.
pub fn package_dir(root: &Path, class_name: &str) -> PathBuf {
    match package_name(class_name) {
        Some(package) => package.split('.').fold(root.to_path_buf(), |dir, p| dir.join(p)),
        None => root.to_path_buf(),
    }
}

/// Member-name form of a resource name: an all-uppercase name gets a
/// leading underscore (`_OOPS`), anything else has its first letter
/// capitalized (`happyBirthday` gives `HappyBirthday`).
pub fn resource_initcap(name: &str) -> String {
    if name == name.to_uppercase() {
        return format!("_{}", name);
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
