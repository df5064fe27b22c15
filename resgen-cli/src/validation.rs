use resgen::{CommentStyle, JavaStyle, Mode, locale::parse_locale_list};
use std::path::{Path, PathBuf};

/// Validation context for the generate command
pub struct ValidationContext {
    pub src_dir: PathBuf,
    pub includes: Vec<String>,
    pub locales: Option<String>,
    pub mode: Option<String>,
    pub style: Option<String>,
    pub comment_style: Option<String>,
    /// Whether per-include overrides (class names, base classes) were given.
    pub has_include_overrides: bool,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationContext {
    pub fn new() -> Self {
        Self {
            src_dir: PathBuf::from("."),
            includes: Vec::new(),
            locales: None,
            mode: None,
            style: None,
            comment_style: None,
            has_include_overrides: false,
        }
    }

    pub fn with_src_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.src_dir = dir.into();
        self
    }

    pub fn with_include(mut self, include: String) -> Self {
        self.includes.push(include);
        self
    }

    pub fn with_locales(mut self, locales: String) -> Self {
        self.locales = Some(locales);
        self
    }

    pub fn with_mode(mut self, mode: String) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_style(mut self, style: String) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_comment_style(mut self, style: String) -> Self {
        self.comment_style = Some(style);
        self
    }

    pub fn with_include_overrides(mut self, present: bool) -> Self {
        self.has_include_overrides = present;
        self
    }
}

/// Validate that the source directory exists
pub fn validate_src_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("Source directory does not exist: {}", path.display()));
    }

    if !path.is_dir() {
        return Err(format!("Source path is not a directory: {}", path.display()));
    }

    Ok(())
}

/// Validate an include name: an existing `.xml` or `.properties` file under
/// the source directory
pub fn validate_include(src_dir: &Path, name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Include name cannot be empty".to_string());
    }

    if !(name.ends_with(".xml") || name.ends_with(".properties")) {
        return Err(format!(
            "Unsupported include: {}. Expected a .xml or .properties file",
            name
        ));
    }

    let path = src_dir.join(name);
    if !path.is_file() {
        return Err(format!("File does not exist: {}", path.display()));
    }

    Ok(())
}

/// Validate a comma-separated locale list such as `en_US,fr_FR`
pub fn validate_locales(locales: &str) -> Result<(), String> {
    let parsed = parse_locale_list(locales).map_err(|e| e.to_string())?;
    if parsed.is_empty() {
        return Err("Locale list cannot be empty".to_string());
    }
    Ok(())
}

pub fn validate_mode(mode: &str) -> Result<(), String> {
    mode.trim().parse::<Mode>().map(|_| ()).map_err(|e| {
        format!(
            "{}. Supported modes: java, managed, c++, cpp, native, all",
            e
        )
    })
}

pub fn validate_style(style: &str) -> Result<(), String> {
    style
        .trim()
        .parse::<JavaStyle>()
        .map(|_| ())
        .map_err(|e| format!("{}. Supported styles: dynamic, direct, functor", e))
}

pub fn validate_comment_style(style: &str) -> Result<(), String> {
    style
        .trim()
        .parse::<CommentStyle>()
        .map(|_| ())
        .map_err(|e| format!("{}. Supported comment styles: normal, scm-safe", e))
}

/// Validate a complete validation context
pub fn validate_context(context: &ValidationContext) -> Result<(), String> {
    validate_src_dir(&context.src_dir)?;

    if context.includes.is_empty() {
        return Err("At least one include file is required".to_string());
    }

    if context.has_include_overrides && context.includes.len() > 1 {
        return Err(format!(
            "Class name overrides need exactly one include, got {}",
            context.includes.len()
        ));
    }

    for (i, include) in context.includes.iter().enumerate() {
        validate_include(&context.src_dir, include)
            .map_err(|e| format!("Include {} validation failed: {}", i + 1, e))?;
    }

    if let Some(ref locales) = context.locales {
        validate_locales(locales).map_err(|e| format!("Locale validation failed: {}", e))?;
    }

    if let Some(ref mode) = context.mode {
        validate_mode(mode).map_err(|e| format!("Mode validation failed: {}", e))?;
    }

    if let Some(ref style) = context.style {
        validate_style(style).map_err(|e| format!("Style validation failed: {}", e))?;
    }

    if let Some(ref style) = context.comment_style {
        validate_comment_style(style)
            .map_err(|e| format!("Comment style validation failed: {}", e))?;
    }

    Ok(())
}
