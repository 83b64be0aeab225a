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

//! # QCS Oracle
//!
//! An exact feasibility/objective oracle for quay crane constraint sets.
//!
//! `SequencingConstraints` records, per assignment, which crane serves a task
//! and which task directly precedes it on that crane, together with an
//! objective bound. `DisjunctiveOracle` turns the assigned part into a
//! temporal graph over completion times and minimises the makespan by
//! branching on violated non-simultaneity disjunctions.
//!
//! - `constraints`: the constraint handle.
//! - `graph`: longest-path propagation over completion-time arcs.
//! - `disjunctive`: the oracle and its branching search.
//! - `stats`: solve counters.

pub mod constraints;
pub mod disjunctive;
mod graph;
pub mod stats;
