//! Outcome of a validation run and its human-readable rendering.

use std::fmt;

use crate::scan::WrapperJar;

const INVALID_HEADER: &str = "✗ Found unknown Gradle Wrapper JAR files:";
const ERRORS_HEADER: &str = "✗ Other validation errors:";
const VALID_HEADER: &str = "✓ Found known Gradle Wrapper JAR files:";

/// Partition of scanned wrapper JARs plus policy-level errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Candidates whose checksum is trusted, in scan order.
    pub valid: Vec<WrapperJar>,
    /// Candidates whose checksum is not trusted, in scan order.
    pub invalid: Vec<WrapperJar>,
    /// Failures not tied to a single JAR (count policy, remote fetch).
    pub errors: Vec<String>,
    /// True if the remote provider was called during this run.
    pub fetched_checksums: bool,
}

impl ValidationResult {
    /// The pass/fail gate: no unknown JARs and no other errors.
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty() && self.errors.is_empty()
    }

    /// Paths of invalid JARs joined with `|`, as reported to CI as `failed-wrapper`.
    pub fn failed_wrapper_paths(&self) -> String {
        self.invalid
            .iter()
            .map(|j| j.path.as_str())
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Render the report: unknown JARs, then other errors, then known JARs.
    /// Empty sections are left out.
    pub fn to_display_string(&self) -> String {
        let mut sections: Vec<String> = Vec::with_capacity(3);
        if !self.invalid.is_empty() {
            sections.push(section(INVALID_HEADER, self.invalid.iter()));
        }
        if !self.errors.is_empty() {
            sections.push(section(ERRORS_HEADER, self.errors.iter()));
        }
        if !self.valid.is_empty() {
            sections.push(section(VALID_HEADER, self.valid.iter()));
        }
        sections.join("\n")
    }
}

fn section<I, T>(header: &str, lines: I) -> String
where
    I: Iterator<Item = T>,
    T: fmt::Display,
{
    let mut out = String::from(header);
    for line in lines {
        out.push_str("\n  ");
        out.push_str(&line.to_string());
    }
    out
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}
