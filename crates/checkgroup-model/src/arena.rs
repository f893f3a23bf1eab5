//! In-progress node storage for one aggregation pass.
//!
//! Nodes are held as childless shells plus an owned list of child ids, so a
//! bucket refers to the node it fills by id instead of sharing a children
//! vector with it. A node is attached once, right after it is allocated, so
//! every node has exactly one parent. The finished tree is materialised
//! once at the end.

use crate::node::CheckNode;

pub(crate) type NodeId = usize;

pub(crate) const ROOT: NodeId = 0;

pub(crate) struct NodeArena {
    shells: Vec<CheckNode>,
    children: Vec<Vec<NodeId>>,
}

impl NodeArena {
    pub(crate) fn new(root: CheckNode) -> Self {
        Self {
            shells: vec![root],
            children: vec![Vec::new()],
        }
    }

    /// Allocate `shell` as the last child of `parent`.
    pub(crate) fn attach(&mut self, parent: NodeId, shell: CheckNode) -> NodeId {
        self.shells.push(shell);
        self.children.push(Vec::new());
        let id = self.shells.len() - 1;
        self.children[parent].push(id);
        id
    }

    pub(crate) fn len(&self) -> usize {
        self.shells.len()
    }

    #[cfg(test)]
    pub(crate) fn name(&self, id: NodeId) -> &str {
        self.shells[id].name()
    }

    /// Build the owned tree rooted at `ROOT`.
    pub(crate) fn materialize(&self) -> CheckNode {
        self.build(ROOT)
    }

    fn build(&self, id: NodeId) -> CheckNode {
        let mut node = self.shells[id].clone();
        if let Some(children) = node.children_mut() {
            children.extend(self.children[id].iter().map(|&child| self.build(child)));
        }
        node
    }
}
