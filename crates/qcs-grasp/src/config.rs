// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

/// Tuning parameters of a GRASP run.
///
/// `alpha` is kept within `[0, 1]`: 0 admits every action to the candidate
/// list and 1 only the best-weighted ones.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraspConfig {
    alpha: f64,
    early_stop: u64,
    max_iterations: u64,
    seed: u64,
}

impl Default for GraspConfig {
    fn default() -> Self {
        Self {
            alpha: 0.4,
            early_stop: 100,
            max_iterations: 1000,
            seed: 0,
        }
    }
}

impl GraspConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Greedy bias: candidates need a weight of at least `alpha` times the
    /// best weight. Values outside `[0, 1]` are clamped.
    ///
    /// # Panics
    ///
    /// In debug builds, if `alpha` is NaN.
    #[inline]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        debug_assert!(
            !alpha.is_nan(),
            "called `GraspConfig::with_alpha` with NaN"
        );
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Non-improving swaps tolerated per crane during local search.
    #[inline]
    pub fn with_early_stop(mut self, early_stop: u64) -> Self {
        self.early_stop = early_stop;
        self
    }

    #[inline]
    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[inline]
    pub fn early_stop(&self) -> u64 {
        self.early_stop
    }

    #[inline]
    pub fn max_iterations(&self) -> u64 {
        self.max_iterations
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl std::fmt::Display for GraspConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GraspConfig(alpha: {}, early_stop: {}, max_iterations: {}, seed: {})",
            self.alpha, self.early_stop, self.max_iterations, self.seed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GraspConfig::new();
        assert_eq!(config.alpha(), 0.4);
        assert_eq!(config.early_stop(), 100);
        assert_eq!(config.max_iterations(), 1000);
        assert_eq!(config.seed(), 0);
    }

    #[test]
    fn test_alpha_is_clamped_to_unit_interval() {
        assert_eq!(GraspConfig::new().with_alpha(1.5).alpha(), 1.0);
        assert_eq!(GraspConfig::new().with_alpha(-0.5).alpha(), 0.0);
        assert_eq!(GraspConfig::new().with_alpha(0.7).alpha(), 0.7);
    }
}
