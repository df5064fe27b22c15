//! Drives generation for a list of include files.
//!
//! Each include is processed independently: an error aborts that include
//! only, is wrapped with the include path, and the run moves on.

use std::{
    fmt::Display,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::SystemTime,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    emit::{
        common::{CommentStyle, HeaderContext},
        cpp::{self, CppClass},
        java::{self, JavaBaseClass, JavaStyle},
        properties,
    },
    error::Error,
    loader::XmlLoader,
    locale::{Locale, derive_from_filename, parse_locale_list, strip_locale_suffix},
    naming::{class_name_from_file, class_name_sans_package, package_dir, remove_package},
    shape::{RunContext, ShapeTable},
    staleness::{self, StalenessDecision},
    traits::BundleLoader,
    types::ResourceBundle,
};

/// Which backends to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    #[serde(alias = "managed")]
    Java,
    #[serde(alias = "c++", alias = "native")]
    Cpp,
    All,
}

impl Mode {
    pub fn java(self) -> bool {
        matches!(self, Mode::Java | Mode::All)
    }

    pub fn cpp(self) -> bool {
        matches!(self, Mode::Cpp | Mode::All)
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "java" | "managed" => Ok(Mode::Java),
            "c++" | "cpp" | "native" => Ok(Mode::Cpp),
            "all" => Ok(Mode::All),
            other => Err(format!("Invalid mode '{}'", other)),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Java => write!(f, "java"),
            Mode::Cpp => write!(f, "c++"),
            Mode::All => write!(f, "all"),
        }
    }
}

/// Settings shared by every include of a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    pub mode: Mode,
    /// Root that include names are relative to.
    pub src_dir: PathBuf,
    /// Root for generated source files. Defaults to `src_dir`.
    pub dest_dir: Option<PathBuf>,
    /// Root for generated `.properties` files. Defaults to the destination.
    pub res_dir: Option<PathBuf>,
    /// Comma-separated locales to generate, e.g. `en_US,fr_FR`. Defaults
    /// to each bundle's own locale.
    pub locales: Option<String>,
    pub style: JavaStyle,
    pub force: bool,
    pub comment_style: CommentStyle,
    pub java_base_class: Option<String>,
    pub cpp_base_class: Option<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            src_dir: PathBuf::from("."),
            dest_dir: None,
            res_dir: None,
            locales: None,
            style: JavaStyle::default(),
            force: false,
            comment_style: CommentStyle::default(),
            java_base_class: None,
            cpp_base_class: None,
        }
    }
}

impl GenerateOptions {
    pub fn dest_dir(&self) -> &Path {
        self.dest_dir.as_deref().unwrap_or(&self.src_dir)
    }

    pub fn res_dir(&self) -> &Path {
        self.res_dir.as_deref().unwrap_or_else(|| self.dest_dir())
    }
}

/// One source file to process, relative to the source directory, with
/// optional per-file overrides.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Include {
    pub name: String,
    pub class_name: Option<String>,
    pub base_class_name: Option<String>,
    pub cpp_class_name: Option<String>,
    pub cpp_base_class_name: Option<String>,
}

impl Include {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// What happened to one include.
#[derive(Debug, Default)]
pub struct IncludeOutcome {
    pub path: PathBuf,
    pub generated: Vec<PathBuf>,
    pub up_to_date: Vec<PathBuf>,
    /// Existing targets left alone because they are read-only.
    pub read_only: Vec<PathBuf>,
    pub error: Option<Error>,
}

impl IncludeOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of [`Generator::run`].
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<IncludeOutcome>,
    pub warnings: Vec<String>,
}

impl RunReport {
    pub fn error_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_ok()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn generated(&self) -> impl Iterator<Item = &Path> {
        self.outcomes
            .iter()
            .flat_map(|o| o.generated.iter().map(PathBuf::as_path))
    }
}

/// Generates code for includes according to a set of [`GenerateOptions`].
#[derive(Debug, Clone)]
pub struct Generator {
    options: GenerateOptions,
    shapes: ShapeTable,
}

/// Per-include state threaded through the emit steps.
struct Job<'a> {
    include: &'a Include,
    class_name: String,
    source: PathBuf,
    source_modified: SystemTime,
    header: HeaderContext,
    outcome: &'a mut IncludeOutcome,
}

impl Generator {
    /// Creates a generator that knows the common `java.lang` exceptions.
    pub fn new(options: GenerateOptions) -> Self {
        Self::with_shapes(options, ShapeTable::java_defaults())
    }

    pub fn with_shapes(options: GenerateOptions, shapes: ShapeTable) -> Self {
        Self { options, shapes }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    pub fn shapes_mut(&mut self) -> &mut ShapeTable {
        &mut self.shapes
    }

    /// Processes every include in order.
    pub fn run(&self, includes: &[Include]) -> RunReport {
        let timestamp = chrono::Local::now()
            .format("%a %b %d %H:%M:%S %Y")
            .to_string();
        let mut ctx = RunContext::new();
        let mut report = RunReport::default();

        for include in includes {
            let path = self.options.src_dir.join(&include.name);
            let mut outcome = IncludeOutcome {
                path: path.clone(),
                ..IncludeOutcome::default()
            };
            if let Err(e) = self.process(include, &path, &timestamp, &mut outcome, &mut ctx) {
                outcome.error = Some(Error::include_error(path, e));
            }
            report.outcomes.push(outcome);
        }

        report.warnings = ctx.take_warnings();
        report
    }

    fn process(
        &self,
        include: &Include,
        source: &Path,
        timestamp: &str,
        outcome: &mut IncludeOutcome,
        ctx: &mut RunContext,
    ) -> Result<(), Error> {
        let suffix = if include.name.ends_with(".xml") {
            ".xml"
        } else if include.name.ends_with(".properties") {
            ".properties"
        } else {
            return Err(Error::UnsupportedSource(include.name.clone()));
        };

        let class_name = include
            .class_name
            .clone()
            .unwrap_or_else(|| class_name_from_file(&include.name, suffix));
        let mut job = Job {
            include,
            class_name,
            source: source.to_path_buf(),
            source_modified: fs::metadata(source)?.modified()?,
            header: HeaderContext::new(source, self.options.comment_style, timestamp),
            outcome,
        };

        if suffix == ".xml" {
            self.process_xml(&mut job, ctx)
        } else {
            self.process_properties(&mut job)
        }
    }

    fn process_xml(&self, job: &mut Job<'_>, ctx: &mut RunContext) -> Result<(), Error> {
        let bundle = XmlLoader::load_file(&job.source)?;
        let locales = self.resolve_locales(&bundle, &job.source)?;
        if self.options.mode.cpp() {
            cpp::validate(&bundle, &job.source.display().to_string())?;
        }
        for resource in &bundle.resources {
            resource.signature()?;
        }

        if self.options.mode.java() {
            self.write_java_base(job, &bundle, ctx)?;
        }
        self.write_base_properties(job, &bundle, ctx)?;

        for locale in &locales {
            if self.options.mode.java() {
                self.write_java_locale(job, locale)?;
            }
            self.write_locale_properties(job, locale)?;
        }

        if self.options.mode.cpp() {
            self.write_cpp(job, &bundle)?;
        }
        Ok(())
    }

    /// `happy/Birthday_fr_FR.properties` produces the `fr_FR` Java class
    /// of the bundle defined in `happy/Birthday.xml`.
    fn process_properties(&self, job: &mut Job<'_>) -> Result<(), Error> {
        let name = &job.include.name;
        let locale = derive_from_filename(name, ".properties")
            .ok_or_else(|| Error::MissingLocale(name.clone()))?;
        let xml = self
            .options
            .src_dir
            .join(format!("{}.xml", strip_locale_suffix(name, ".properties")));
        XmlLoader::load_file(&xml)?;

        if self.options.mode.java() {
            self.write_java_locale(job, &locale)?;
        }
        Ok(())
    }

    fn resolve_locales(&self, bundle: &ResourceBundle, source: &Path) -> Result<Vec<Locale>, Error> {
        let locales = match &self.options.locales {
            Some(list) => parse_locale_list(list)?,
            None => vec![bundle.locale.clone()],
        };
        if !locales.contains(&bundle.locale) {
            return Err(Error::LocaleNotInList {
                path: source.display().to_string(),
                locale: bundle.locale.to_string(),
                locales: locales
                    .iter()
                    .map(Locale::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        debug!(
            "{}: generating locales {:?}",
            source.display(),
            locales.iter().map(Locale::to_string).collect::<Vec<_>>()
        );
        Ok(locales)
    }

    fn java_path(&self, job: &Job<'_>, locale: Option<&Locale>) -> PathBuf {
        package_dir(self.options.dest_dir(), &job.class_name).join(format!(
            "{}.java",
            class_name_sans_package(&job.class_name, locale)
        ))
    }

    fn properties_path(&self, root: &Path, job: &Job<'_>, locale: Option<&Locale>) -> PathBuf {
        package_dir(root, &job.class_name).join(format!(
            "{}.properties",
            class_name_sans_package(&job.class_name, locale)
        ))
    }

    fn write_java_base(
        &self,
        job: &mut Job<'_>,
        bundle: &ResourceBundle,
        ctx: &mut RunContext,
    ) -> Result<(), Error> {
        let target = self.java_path(job, None);
        let decision = staleness::check(job.source_modified, &target, self.options.force);
        let base_class = job
            .include
            .base_class_name
            .as_deref()
            .or(self.options.java_base_class.as_deref())
            .unwrap_or(java::DEFAULT_BASE_CLASS);
        let class = JavaBaseClass {
            bundle,
            class_name: &job.class_name,
            base_class,
            style: self.options.style,
        };
        let header = &job.header;
        let rendered = if decision.up_to_date {
            None
        } else {
            Some(class.render(header, &self.shapes, ctx)?)
        };
        write_output(job.outcome, &target, decision, rendered)
    }

    fn write_java_locale(&self, job: &mut Job<'_>, locale: &Locale) -> Result<(), Error> {
        let target = self.java_path(job, Some(locale));
        let decision = staleness::check(job.source_modified, &target, self.options.force);
        let rendered = (!decision.up_to_date)
            .then(|| java::render_locale_class(&job.class_name, locale, &job.header));
        write_output(job.outcome, &target, decision, rendered)
    }

    fn write_base_properties(
        &self,
        job: &mut Job<'_>,
        bundle: &ResourceBundle,
        ctx: &mut RunContext,
    ) -> Result<(), Error> {
        let target = self.properties_path(self.options.res_dir(), job, None);
        let decision = staleness::check(job.source_modified, &target, self.options.force);
        let rendered = if decision.up_to_date {
            None
        } else {
            Some(properties::render_base(bundle, &job.class_name, &job.header, ctx)?)
        };
        write_output(job.outcome, &target, decision, rendered)
    }

    /// Copies `src/<pkg>/Name_xx.properties` when it exists, otherwise
    /// writes an empty stub for the locale.
    fn write_locale_properties(&self, job: &mut Job<'_>, locale: &Locale) -> Result<(), Error> {
        let override_source = self.properties_path(&self.options.src_dir, job, Some(locale));
        let target = self.properties_path(self.options.res_dir(), job, Some(locale));
        let decision = staleness::check_locale_override(
            job.source_modified,
            &target,
            &override_source,
            self.options.force,
        );
        let rendered = if decision.up_to_date {
            None
        } else if override_source.exists() {
            debug!("Copying {}", override_source.display());
            Some(fs::read_to_string(&override_source)?)
        } else {
            Some(properties::render_locale_stub(
                &job.class_name,
                locale,
                &job.header,
            ))
        };
        write_output(job.outcome, &target, decision, rendered)
    }

    /// Header and implementation go to the destination root, not a package
    /// directory.
    fn write_cpp(&self, job: &mut Job<'_>, bundle: &ResourceBundle) -> Result<(), Error> {
        let class_name = match &job.include.cpp_class_name {
            Some(name) => name.clone(),
            None => {
                let simple = remove_package(&job.class_name);
                simple.split('_').next().unwrap_or(simple).to_string()
            }
        };
        let base_class = job
            .include
            .cpp_base_class_name
            .as_deref()
            .or(self.options.cpp_base_class.as_deref())
            .unwrap_or(cpp::DEFAULT_BASE_CLASS);
        let class = CppClass {
            bundle,
            class_name: &class_name,
            base_class,
        };

        let dest = self.options.dest_dir();
        let header_path = dest.join(class.header_file_name());
        let implementation_path = dest.join(class.implementation_file_name());
        let header_decision = staleness::check(job.source_modified, &header_path, self.options.force);
        let implementation_decision =
            staleness::check(job.source_modified, &implementation_path, self.options.force);

        if header_decision.up_to_date && implementation_decision.up_to_date {
            write_output(job.outcome, &header_path, header_decision, None)?;
            return write_output(job.outcome, &implementation_path, implementation_decision, None);
        }

        let header = class.render_header(&job.header)?;
        let implementation = class.render_implementation(&job.header)?;
        write_output(
            job.outcome,
            &header_path,
            StalenessDecision {
                up_to_date: false,
                reason: header_decision.reason,
            },
            Some(header),
        )?;
        write_output(
            job.outcome,
            &implementation_path,
            StalenessDecision {
                up_to_date: false,
                reason: implementation_decision.reason,
            },
            Some(implementation),
        )
    }
}

fn is_read_only(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.permissions().readonly())
        .unwrap_or(false)
}

/// Records an up-to-date target, or writes `rendered` to a stale one.
fn write_output(
    outcome: &mut IncludeOutcome,
    target: &Path,
    decision: StalenessDecision,
    rendered: Option<String>,
) -> Result<(), Error> {
    let Some(content) = rendered.filter(|_| !decision.up_to_date) else {
        info!("{} is up to date", target.display());
        outcome.up_to_date.push(target.to_path_buf());
        return Ok(());
    };
    if is_read_only(target) {
        info!("{} is read-only; skipping", target.display());
        outcome.read_only.push(target.to_path_buf());
        return Ok(());
    }

    info!("Generating {}", target.display());
    debug!("{}", decision.reason);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(target, content)?;
    outcome.generated.push(target.to_path_buf());
    Ok(())
}
