use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;
use rayon::prelude::*;

fn has_glob_meta(s: &str) -> bool {
    s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
}

/// Directory part of a pattern before its first glob meta-character.
fn static_prefix_dir(pattern: &str) -> &str {
    let idx = pattern
        .find(['*', '?', '[', '{'])
        .unwrap_or(pattern.len());
    pattern[..idx].rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

fn relative_name(src_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(src_dir).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Expand include patterns such as `happy/*.xml` into include names
/// relative to `src_dir`.
///
/// Patterns without glob meta-characters are kept as given so that missing
/// files are reported later. Each pattern's matches are sorted; the result
/// keeps pattern order and drops duplicates. Uses ignore + globset for
/// fast, parallel, .gitignore-aware traversal.
pub fn expand_includes(src_dir: &Path, patterns: &[String]) -> Result<Vec<String>, String> {
    let mut matchers: Vec<Option<GlobMatcher>> = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        if has_glob_meta(pattern) {
            let glob: Glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| format!("Invalid glob pattern '{}': {}", pattern, e))?;
            matchers.push(Some(glob.compile_matcher()));
        } else {
            matchers.push(None);
        }
    }

    // Collect unique roots to minimize directory walks
    let mut roots: Vec<PathBuf> = Vec::new();
    for pattern in patterns.iter().filter(|p| has_glob_meta(p)) {
        let root = src_dir.join(static_prefix_dir(pattern));
        if !roots.iter().any(|r| r == &root) {
            roots.push(root);
        }
    }

    // Walk roots in parallel, collecting candidate source files
    let candidates: Vec<String> = roots
        .par_iter()
        .map(|root| {
            let mut out: Vec<String> = Vec::new();
            let walker = WalkBuilder::new(root)
                .git_ignore(true)
                .git_global(true)
                .git_exclude(true)
                .hidden(false)
                .ignore(true)
                .parents(true)
                .build();

            for dent in walker.flatten() {
                if !dent.file_type().is_some_and(|t| t.is_file()) {
                    continue;
                }
                if let Some(name) = relative_name(src_dir, dent.path()) {
                    out.push(name);
                }
            }
            out
        })
        .flatten()
        .collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut results: Vec<String> = Vec::new();
    for (pattern, matcher) in patterns.iter().zip(&matchers) {
        let mut matched: Vec<String> = match matcher {
            Some(matcher) => candidates
                .iter()
                .filter(|name| matcher.is_match(name.as_str()))
                .cloned()
                .collect(),
            None => vec![pattern.clone()],
        };
        matched.sort();
        for name in matched {
            if seen.insert(name.clone()) {
                results.push(name);
            }
        }
    }
    Ok(results)
}
