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

/// Order in which open nodes leave the fringe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FringeStrategy {
    /// Lowest lower bound first; ties go to the deeper node, then to the
    /// node pushed earlier.
    #[default]
    BestFirst,
    /// Most recently pushed node first.
    DepthFirst,
}

impl std::fmt::Display for FringeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FringeStrategy::BestFirst => write!(f, "BestFirst"),
            FringeStrategy::DepthFirst => write!(f, "DepthFirst"),
        }
    }
}

/// Configuration of a `BnbSolver`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BnbConfig {
    strategy: FringeStrategy,
    iteration_limit: Option<u64>,
}

impl BnbConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_strategy(mut self, strategy: FringeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Stops the search after `limit` popped nodes.
    #[inline]
    pub fn with_iteration_limit(mut self, limit: u64) -> Self {
        self.iteration_limit = Some(limit);
        self
    }

    #[inline]
    pub fn strategy(&self) -> FringeStrategy {
        self.strategy
    }

    #[inline]
    pub fn iteration_limit(&self) -> Option<u64> {
        self.iteration_limit
    }
}

impl std::fmt::Display for BnbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.iteration_limit {
            Some(limit) => write!(
                f,
                "BnbConfig(strategy: {}, iteration_limit: {})",
                self.strategy, limit
            ),
            None => write!(f, "BnbConfig(strategy: {})", self.strategy),
        }
    }
}
