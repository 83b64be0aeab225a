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

//! Arena of generated search nodes.
//!
//! States live in the fringe and are dropped once processed. The tree only
//! keeps the bookkeeping needed to walk back from the incumbent to the root.
//!
//! Nodes are never released during a run, so memory grows linearly with the
//! number of generated nodes (a few dozen bytes each).

use qcs_core::utils::index::{TypedIndex, TypedIndexTag};
use qcs_search::state::Action;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeIndexTag;

impl TypedIndexTag for NodeIndexTag {
    const NAME: &'static str = "NodeIndex";
}

/// Index of a node in a `SearchTree`.
pub type NodeIndex = TypedIndex<NodeIndexTag>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchNode {
    parent: Option<NodeIndex>,
    action: Option<Action>,
    depth: usize,
    cost: u64,
}

impl SearchNode {
    /// The parent node, `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// The action that produced this node, `None` for the root.
    #[inline]
    pub fn action(&self) -> Option<Action> {
        self.action
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Sum of step costs from the root.
    #[inline]
    pub fn cost(&self) -> u64 {
        self.cost
    }
}

/// Append-only node arena. Only `push_root` clears it.
#[derive(Clone, Debug, Default)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Clears the arena and inserts a root node.
    pub fn push_root(&mut self) -> NodeIndex {
        self.nodes.clear();
        self.nodes.push(SearchNode {
            parent: None,
            action: None,
            depth: 0,
            cost: 0,
        });
        NodeIndex::new(0)
    }

    /// Inserts a child of `parent` reached through `action`.
    pub fn push_child(&mut self, parent: NodeIndex, action: Action, step_cost: u64) -> NodeIndex {
        debug_assert!(
            parent.get() < self.nodes.len(),
            "called `SearchTree::push_child` with parent {} but the tree has {} nodes",
            parent.get(),
            self.nodes.len()
        );

        let parent_node = self.nodes[parent.get()];
        let index = NodeIndex::new(self.nodes.len());
        self.nodes.push(SearchNode {
            parent: Some(parent),
            action: Some(action),
            depth: parent_node.depth + 1,
            cost: parent_node.cost.saturating_add(step_cost),
        });
        index
    }

    #[inline]
    pub fn node(&self, index: NodeIndex) -> &SearchNode {
        &self.nodes[index.get()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The actions leading from the root to `index`, in application order.
    pub fn path_to(&self, index: NodeIndex) -> Vec<Action> {
        let mut path = Vec::with_capacity(self.node(index).depth);
        let mut current = Some(index);
        while let Some(node_index) = current {
            let node = self.node(node_index);
            if let Some(action) = node.action {
                path.push(action);
            }
            current = node.parent;
        }
        path.reverse();
        path
    }
}
