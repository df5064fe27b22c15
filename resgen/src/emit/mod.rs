//! Renderers for every generated artifact.
//!
//! Each backend is a sibling module built on the helpers in [`common`].
//! Renderers only produce text; the [`crate::generator`] decides what to
//! write and where.

pub mod common;
pub mod cpp;
pub mod java;
pub mod properties;

// Reexporting the renderers for easier access
pub use common::{CommentStyle, HeaderContext, TOOL_NAME};
pub use cpp::CppClass;
pub use java::{JavaBaseClass, JavaStyle};
