//! Maximum bipartite matching by augmenting paths (Kuhn).
//!
//! Left vertices are processed in order; each tries its adjacency list in
//! the given order, first looking for a free right vertex and only then
//! searching for an augmenting path that re-routes earlier assignments.
//! The search is iterative so deep re-routing cannot exhaust the stack.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Matching {
    /// Right vertex matched to each left vertex.
    pub left: Vec<Option<usize>>,
    /// Left vertex matched to each right vertex.
    pub right: Vec<Option<usize>>,
}

impl Matching {
    pub fn size(&self) -> usize {
        self.left.iter().filter(|m| m.is_some()).count()
    }

    fn link(&mut self, l: usize, r: usize) {
        self.left[l] = Some(r);
        self.right[r] = Some(l);
    }

    /// Searches an augmenting path from the free left vertex `root`.
    fn augment(&mut self, adj: &[Vec<usize>], root: usize, seen: &mut [bool]) -> bool {
        // stack[i] = (left vertex, next adjacency cursor);
        // via[i] = right vertex leading from stack[i] to stack[i + 1].
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        let mut via: Vec<usize> = Vec::new();

        while let Some(top) = stack.len().checked_sub(1) {
            let (l, cursor) = stack[top];
            if cursor == adj[l].len() {
                stack.pop();
                via.pop();
                continue;
            }
            stack[top].1 += 1;

            let r = adj[l][cursor];
            if seen[r] {
                continue;
            }
            seen[r] = true;
            via.push(r);

            match self.right[r] {
                None => {
                    for (i, &(l_i, _)) in stack.iter().enumerate() {
                        self.link(l_i, via[i]);
                    }
                    return true;
                }
                Some(owner) => stack.push((owner, 0)),
            }
        }
        false
    }
}

pub(crate) fn max_matching(adj: &[Vec<usize>], right_len: usize) -> Matching {
    let mut m = Matching {
        left: vec![None; adj.len()],
        right: vec![None; right_len],
    };
    let mut seen = vec![false; right_len];

    for (l, edges) in adj.iter().enumerate() {
        if let Some(&r) = edges.iter().find(|&&r| m.right[r].is_none()) {
            m.link(l, r);
            continue;
        }
        seen.iter_mut().for_each(|s| *s = false);
        m.augment(adj, l, &mut seen);
    }
    m
}
