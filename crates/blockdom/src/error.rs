use core_types::Key;
use dom::DomError;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReconcileError {
    /// Two blocks of different kinds were patched against each other.
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// Element blocks built from different templates were patched together.
    TemplateMismatch,
    /// Multi blocks with a different number of slots were patched together.
    ArityMismatch { expected: usize, found: usize },
    /// The same key appears twice among the items of one list.
    DuplicateKey(Key),
    /// A positional reference node could not be found.
    MissingAnchor(&'static str),
    /// An operation that needs live nodes ran on a block that was never mounted.
    NotMounted(&'static str),
    Dom(DomError),
}

impl ReconcileError {
    /// Violations of the caller contract, as opposed to backend failures.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            ReconcileError::ShapeMismatch { .. }
                | ReconcileError::TemplateMismatch
                | ReconcileError::ArityMismatch { .. }
                | ReconcileError::DuplicateKey(_)
        )
    }
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::ShapeMismatch { expected, found } => {
                write!(f, "shape mismatch: expected {expected} block, found {found}")
            }
            ReconcileError::TemplateMismatch => {
                f.write_str("shape mismatch: element blocks use different templates")
            }
            ReconcileError::ArityMismatch { expected, found } => write!(
                f,
                "shape mismatch: expected multi block with {expected} slots, found {found}"
            ),
            ReconcileError::DuplicateKey(key) => write!(f, "duplicate key {key} in list"),
            ReconcileError::MissingAnchor(what) => write!(f, "missing anchor: {what}"),
            ReconcileError::NotMounted(what) => write!(f, "{what} block is not mounted"),
            ReconcileError::Dom(err) => write!(f, "dom: {err}"),
        }
    }
}

impl std::error::Error for ReconcileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReconcileError::Dom(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomError> for ReconcileError {
    fn from(err: DomError) -> Self {
        ReconcileError::Dom(err)
    }
}

/// Whether contract checks that cost extra work (key uniqueness) run.
pub(crate) fn checks_enabled() -> bool {
    cfg!(debug_assertions) || cfg!(feature = "reconcile-invariants")
}

/// Report a caller-contract violation.
///
/// Fatal in debug builds. Release builds log it and the caller continues
/// best-effort.
pub(crate) fn report_violation(err: &ReconcileError) {
    #[cfg(feature = "debug-stats")]
    crate::stats::record_violation();
    debug_assert!(false, "{err}");
    log::warn!(target: "blockdom", "{err}; continuing best-effort");
}
