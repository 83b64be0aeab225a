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

use crate::{config::FringeStrategy, tree::NodeIndex};
use qcs_search::state::AssignmentState;
use std::{cmp::Ordering, collections::BinaryHeap};

/// An open node waiting in the fringe.
#[derive(Debug)]
pub(crate) struct FringeEntry<T, C> {
    pub(crate) bound: T,
    pub(crate) depth: usize,
    pub(crate) sequence: u64,
    pub(crate) node: NodeIndex,
    pub(crate) state: AssignmentState<T, C>,
}

// `BinaryHeap` is a max-heap; "greater" means "popped first".
impl<T, C> Ord for FringeEntry<T, C>
where
    T: Ord,
{
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .bound
            .cmp(&self.bound)
            .then_with(|| self.depth.cmp(&other.depth))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<T, C> PartialOrd for FringeEntry<T, C>
where
    T: Ord,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, C> PartialEq for FringeEntry<T, C>
where
    T: Ord,
{
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T, C> Eq for FringeEntry<T, C> where T: Ord {}

#[derive(Debug)]
pub(crate) enum Fringe<T, C> {
    BestFirst(BinaryHeap<FringeEntry<T, C>>),
    DepthFirst(Vec<FringeEntry<T, C>>),
}

impl<T, C> Fringe<T, C>
where
    T: Ord,
{
    pub(crate) fn new(strategy: FringeStrategy) -> Self {
        match strategy {
            FringeStrategy::BestFirst => Fringe::BestFirst(BinaryHeap::new()),
            FringeStrategy::DepthFirst => Fringe::DepthFirst(Vec::new()),
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, entry: FringeEntry<T, C>) {
        match self {
            Fringe::BestFirst(heap) => heap.push(entry),
            Fringe::DepthFirst(stack) => stack.push(entry),
        }
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<FringeEntry<T, C>> {
        match self {
            Fringe::BestFirst(heap) => heap.pop(),
            Fringe::DepthFirst(stack) => stack.pop(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        match self {
            Fringe::BestFirst(heap) => heap.len(),
            Fringe::DepthFirst(stack) => stack.len(),
        }
    }
}
