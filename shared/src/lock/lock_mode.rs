/// How edits on an object locked by another participant are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockMode {
    /// Edits from non-owners still apply and are logged as advisory violations
    #[default]
    Advisory,
    /// Edits and lock requests from non-owners are refused
    Strict,
}
