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

/// Counters collected by `DisjunctiveOracle` across all of its solves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OracleStatistics {
    /// Number of `solve` calls.
    pub solves: u64,
    /// Solves that ended infeasible.
    pub infeasible: u64,
    /// Branching nodes visited over all solves.
    pub branch_nodes: u64,
}

impl OracleStatistics {
    #[inline]
    pub fn on_solve(&mut self) {
        self.solves = self.solves.saturating_add(1);
    }

    #[inline]
    pub fn on_infeasible(&mut self) {
        self.infeasible = self.infeasible.saturating_add(1);
    }

    #[inline]
    pub fn on_branch_nodes(&mut self, count: u64) {
        self.branch_nodes = self.branch_nodes.saturating_add(count);
    }
}

impl std::fmt::Display for OracleStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Oracle Statistics:")?;
        writeln!(f, "  Solves:               {}", self.solves)?;
        writeln!(f, "  Infeasible:           {}", self.infeasible)?;
        writeln!(f, "  Branch nodes:         {}", self.branch_nodes)?;
        Ok(())
    }
}
