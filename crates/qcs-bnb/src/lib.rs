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

//! # QCS-BnB: branch-and-bound for quay crane scheduling
//!
//! Explores the assignment tree of a `SearchProblem` best-first (or
//! depth-first), asks an `Oracle` for the exact objective of every popped
//! node and keeps the best complete assignment.
//!
//! Core flow
//! - Wrap a `qcs_model::problem::Problem` in a `QcScheduling` search problem.
//! - Choose an oracle, a `DominanceRule` and a `TreeSearchMonitor`.
//! - Run `bnb::BnbSolver::solve`.
//!
//! Pruning
//! - Nodes whose lower bound reaches the incumbent are dropped, both when
//!   they are generated and again when they are popped.
//! - Nodes the oracle rejects, or whose oracle objective does not beat the
//!   incumbent, are dropped and memoised as explored.
//! - Assignments already explored along another path are skipped.
//!
//! Module map
//! - `bnb`: the solver and its search session.
//! - `config`: fringe strategy and iteration budget.
//! - `fringe`: best-first heap and depth-first stack.
//! - `tree`: arena of generated nodes, used to recover the decision path.
//! - `monitor`: tree-search monitors (log, time limit, composite, no-op).
//! - `result`, `stats`: outcomes and counters.

pub mod bnb;
pub mod config;
mod fringe;
pub mod monitor;
pub mod result;
pub mod stats;
pub mod tree;
