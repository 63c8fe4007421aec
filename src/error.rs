/// Errors raised by the scoring engine.
///
/// Everything else the engine does is total over well-formed input; the only
/// failure is input that breaks component name uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Two components share a name that must be unique within the partition,
    /// so a reference to it cannot be resolved unambiguously.
    #[error("duplicate component {field} `{name}`: {first} and {second}")]
    DuplicateComponent {
        field: &'static str,
        name: String,
        first: String,
        second: String,
    },
}
