//! Generator seam for pre-parameter sets.

/// Errors reported by a pre-parameters generator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// The generator could not produce a parameter set.
    #[error("generation failed: {0}")]
    Failed(String),

    /// The parameter set was produced but could not be encoded.
    #[error("failed to serialize pre-parameters: {0}")]
    Serialization(String),
}

/// Produces one pre-parameter set per call.
///
/// Calls are slow and may fail. The pool never calls a generator
/// concurrently with itself and always calls it from a blocking worker
/// thread, so implementations only need to be `Send`.
pub trait ParamsGenerator<P>: Send + 'static {
    fn generate(&mut self) -> Result<P, GenerationError>;
}

impl<P, F> ParamsGenerator<P> for F
where
    F: FnMut() -> Result<P, GenerationError> + Send + 'static,
{
    fn generate(&mut self) -> Result<P, GenerationError> {
        self()
    }
}
