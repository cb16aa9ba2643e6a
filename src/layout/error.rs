use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The dependency relation between test assets closed a loop. `asset`
    /// names the asset whose edge completed the cycle.
    #[error("cyclic dependency between test assets, closed at '{asset}'")]
    CyclicDependency { asset: String },
}
