/// Compatibility layer for rayon/sequential execution.
///
/// When the `parallel` feature is enabled, this re-exports rayon's parallel
/// iterators. When disabled (e.g., for WASM builds), it provides sequential
/// fallbacks that implement the same API surface used by the render passes.
#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
mod sequential {
    /// Sequential stand-in for `rayon::prelude::ParallelSliceMut`.
    ///
    /// Returns the standard `chunks_exact_mut` iterator, so the rest of the
    /// chain (`.enumerate()`, `.for_each()`) resolves to the plain
    /// `Iterator` methods.
    pub trait ParallelSliceMut<T> {
        fn par_chunks_exact_mut(&mut self, chunk_size: usize) -> std::slice::ChunksExactMut<'_, T>;
    }

    impl<T> ParallelSliceMut<T> for [T] {
        fn par_chunks_exact_mut(&mut self, chunk_size: usize) -> std::slice::ChunksExactMut<'_, T> {
            self.chunks_exact_mut(chunk_size)
        }
    }
}

#[cfg(not(feature = "parallel"))]
pub use sequential::*;
