//! Union-find used for connectivity checks and component extraction.
//!
//! Union by rank with path halving; ties between equal ranks go to the lower
//! root id so results are stable for a fixed edge order.

pub(crate) struct DisjointSet {
    parents: Vec<usize>,
    ranks: Vec<usize>,
    components: usize,
}

impl DisjointSet {
    pub(crate) fn new(node_count: usize) -> Self {
        Self {
            parents: (0..node_count).collect(),
            ranks: vec![0; node_count],
            components: node_count,
        }
    }

    pub(crate) fn components(&self) -> usize {
        self.components
    }

    /// Merges the sets holding `left` and `right`; returns `false` when they
    /// were already joined.
    pub(crate) fn union(&mut self, left: usize, right: usize) -> bool {
        let left_root = self.find(left);
        let right_root = self.find(right);
        if left_root == right_root {
            return false;
        }

        let left_rank = self.ranks[left_root];
        let right_rank = self.ranks[right_root];
        let (parent, child) = choose_parent_child(left_root, right_root, left_rank, right_rank);
        self.parents[child] = parent;
        if left_rank == right_rank {
            self.ranks[parent] += 1;
        }
        self.components -= 1;
        true
    }

    pub(crate) fn find(&mut self, node: usize) -> usize {
        let mut current = node;
        loop {
            let parent = self.parents[current];
            if parent == current {
                return current;
            }
            let grandparent = self.parents[parent];
            self.parents[current] = grandparent;
            current = parent;
        }
    }
}

fn choose_parent_child(
    left_root: usize,
    right_root: usize,
    left_rank: usize,
    right_rank: usize,
) -> (usize, usize) {
    if left_rank > right_rank {
        return (left_root, right_root);
    }
    if right_rank > left_rank {
        return (right_root, left_root);
    }
    if left_root <= right_root {
        (left_root, right_root)
    } else {
        (right_root, left_root)
    }
}
