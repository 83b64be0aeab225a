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

//! # QCS Search
//!
//! The search-space model shared by the branch-and-bound and GRASP engines.
//!
//! - `oracle`: the feasibility/objective oracle contract and its constraint
//!   handle, plus a crane-load relaxation oracle.
//! - `state`: `AssignmentState`, the immutable node payload, and `Action`.
//! - `expansion`: legal actions under spatial eligibility and precedence
//!   safety.
//! - `bound`: the two-part lower bound and pluggable dominance rules.
//! - `search_problem`: the `SearchProblem` capability interface and its
//!   quay crane implementation.
//! - `result` and `monitor`: outcome types and the monitor command shared by
//!   both engines.

pub mod bound;
pub mod expansion;
pub mod monitor;
pub mod oracle;
pub mod result;
pub mod search_problem;
pub mod state;
