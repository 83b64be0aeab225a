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

use qcs_model::{
    index::{CraneIndex, TaskIndex},
    problem::{Problem, ProblemBuilder},
};

pub(crate) fn build(
    durations: &[i64],
    locations: &[i64],
    cranes: &[i64],
    non_simultaneous: &[(usize, usize)],
    precedence: &[(usize, usize)],
) -> Problem<i64> {
    let mut builder = ProblemBuilder::<i64>::new(durations.len(), cranes.len());
    for (i, (&p, &l)) in durations.iter().zip(locations).enumerate() {
        builder
            .set_task_duration(TaskIndex::new(i), p)
            .set_task_location(TaskIndex::new(i), l);
    }
    for (k, &l) in cranes.iter().enumerate() {
        builder.set_crane_location(CraneIndex::new(k), l);
    }
    for &(a, b) in non_simultaneous {
        builder.add_non_simultaneous(TaskIndex::new(a), TaskIndex::new(b));
    }
    for &(a, b) in precedence {
        builder.add_precedence(TaskIndex::new(a), TaskIndex::new(b));
    }
    builder.build()
}

/// Five tasks on two cranes, consecutive tasks non-simultaneous.
pub(crate) fn scenario() -> Problem<i64> {
    build(
        &[8, 10, 20, 5, 30],
        &[1, 2, 3, 5, 6],
        &[1, 4],
        &[(0, 1), (1, 2), (2, 3), (3, 4)],
        &[],
    )
}
