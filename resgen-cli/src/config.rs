//! TOML configuration for `resgen generate`.
//!
//! ```toml
//! src_dir = "src/main/resources"
//! dest_dir = "target/generated"
//! locales = "en_US,fr_FR"
//! style = "functor"
//! comment_style = "scm-safe"
//!
//! [[include]]
//! name = "happy/Birthday.xml"
//!
//! [exception_classes]
//! "com.acme.AcmeException" = ["instance", "instance_cause"]
//! ```
//!
//! Relative directories are resolved against the directory holding the
//! configuration file.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use resgen::{ConstructorKind, ExceptionConstructorShape, GenerateOptions, Include, ShapeTable};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(flatten)]
    pub options: GenerateOptions,

    #[serde(default, rename = "include")]
    pub includes: Vec<Include>,

    /// Constructor forms of exception classes the generated code throws.
    #[serde(default)]
    pub exception_classes: BTreeMap<String, Vec<ConstructorKind>>,
}

impl ConfigFile {
    pub fn parse(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| format!("Invalid configuration: {}", e))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read config file {}: {}", path.display(), e))?;
        let mut config = Self::parse(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |dir: &Path| -> PathBuf {
            if dir.is_relative() {
                base.join(dir)
            } else {
                dir.to_path_buf()
            }
        };
        self.options.src_dir = resolve(&self.options.src_dir);
        self.options.dest_dir = self.options.dest_dir.as_deref().map(resolve);
        self.options.res_dir = self.options.res_dir.as_deref().map(resolve);
    }

    /// The default `java.lang` shapes extended with the configured classes.
    pub fn shape_table(&self) -> ShapeTable {
        let mut table = ShapeTable::java_defaults();
        for (class_name, kinds) in &self.exception_classes {
            let shape: ExceptionConstructorShape = kinds.iter().copied().collect();
            table.insert(class_name.clone(), shape);
        }
        table
    }
}
