//! Persisted minter state.

use serde::{Deserialize, Serialize};

use super::Ordering;

/// The record a minter is saved as and rebuilt from.
///
/// Template string and counter fully determine the generator; `exhausted` is
/// written only after a bounded stream has issued its final identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinterState {
    /// Template string the minter was created with.
    #[serde(alias = "Template")]
    pub template: String,

    /// Counter of the next identifier to mint.
    #[serde(alias = "Sequence")]
    pub sequence: u64,

    /// Set once the final identifier of a bounded range has been issued.
    #[serde(default, skip_serializing_if = "is_false")]
    pub exhausted: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(value: &bool) -> bool {
    !*value
}

impl MinterState {
    /// Create a state record at the given counter.
    #[must_use]
    pub fn new(template: impl Into<String>, sequence: u64) -> Self {
        Self {
            template: template.into(),
            sequence,
            exhausted: false,
        }
    }
}

/// Human-facing summary of a persisted minter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinterStatus {
    /// Template string.
    pub template: String,

    /// Ordering mode parsed from the template.
    pub ordering: Ordering,

    /// Counter of the next identifier to mint.
    pub sequence: u64,

    /// Largest counter the template allows.
    pub max_sequence: u64,

    /// Identifiers left to mint; `None` for unlimited templates.
    pub remaining: Option<u64>,

    /// Identifier the next mint would return, if any remain.
    pub next: Option<String>,
}

impl std::fmt::Display for MinterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "template:  {}", self.template)?;
        writeln!(f, "ordering:  {}", self.ordering)?;
        writeln!(f, "sequence:  {}", self.sequence)?;
        match self.remaining {
            Some(remaining) => writeln!(f, "remaining: {remaining}")?,
            None => writeln!(f, "remaining: unlimited")?,
        }
        match &self.next {
            Some(next) => write!(f, "next:      {next}"),
            None => write!(f, "next:      (exhausted)"),
        }
    }
}
