//! Pipeline Latch Interface.
//!
//! Common behavior of the storage between stages, used for flushing after a
//! taken branch and for detecting a drained pipeline.

/// Represents pipeline storage that can hold in-flight instructions.
pub trait PipelineLatch {
    /// Discards any held instructions.
    ///
    /// Called when a taken branch invalidates speculatively fetched
    /// instructions.
    fn flush(&mut self);

    /// Checks if the latch holds no instruction.
    ///
    /// # Returns
    ///
    /// `true` if there is no valid instruction in the latch, `false` otherwise.
    fn is_empty(&self) -> bool;
}
