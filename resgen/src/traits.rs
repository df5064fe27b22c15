//! Traits for format-agnostic loading of resource bundles.

use std::{
    fs::File,
    io::{BufRead, Cursor, Read},
    path::Path,
};

use crate::{error::Error, types::ResourceBundle};

/// A trait for decoding a [`ResourceBundle`] from one source document.
///
/// # Example
///
/// ```rust,no_run
/// use resgen::{loader::XmlLoader, traits::BundleLoader};
/// let bundle = XmlLoader::load_file("happy/Birthday.xml")?;
/// println!("{} resources", bundle.resources.len());
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait BundleLoader {
    /// Load from any reader.
    fn load<R: BufRead>(reader: R) -> Result<ResourceBundle, Error>;

    /// Load from a file path. The file is decoded BOM-aware, so UTF-16
    /// sources are accepted as well as UTF-8.
    fn load_file<P: AsRef<Path>>(path: P) -> Result<ResourceBundle, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(Error::Io)?;
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        Self::load_str(&decoded).map_err(|e| match e {
            Error::MissingLocale(_) => Error::MissingLocale(path.display().to_string()),
            e => e,
        })
    }

    /// Load from a string.
    fn load_str(s: &str) -> Result<ResourceBundle, Error> {
        Self::load(Cursor::new(s))
    }

    /// Load from bytes.
    fn load_bytes(bytes: &[u8]) -> Result<ResourceBundle, Error> {
        Self::load(Cursor::new(bytes))
    }
}
