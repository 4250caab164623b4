//! Post-processing passes over raw parent/level arrays.

/// Reverses the id space so the root, allocated last, becomes node 0.
///
/// `node_map` entries are rewritten through the same permutation.
pub(crate) fn reorder<T>(parent: &mut [usize], levels: &mut [T], node_map: &mut [usize]) {
    let n = parent.len();
    parent.reverse();
    for p in parent.iter_mut() {
        *p = n - *p - 1;
    }
    levels.reverse();
    for id in node_map.iter_mut() {
        *id = n - *id - 1;
    }
}

/// Drops every non-root node whose level equals its parent's level.
///
/// Requires `parent[0] == 0` and `parent[i] < i`. Surviving nodes keep their
/// relative order; `node_map` entries are redirected to the surviving
/// representative. Returns the compacted `(parent, levels)`.
pub(crate) fn canonicalize<T: PartialEq + Clone>(
    parent: &[usize],
    levels: &[T],
    node_map: &mut [usize],
) -> (Vec<usize>, Vec<T>) {
    let n = parent.len();
    if n == 0 {
        return (Vec::new(), Vec::new());
    }
    let mut translation = vec![0_usize; n];
    let mut new_parent = vec![0_usize];
    let mut new_levels = vec![levels[0].clone()];
    for i in 1..n {
        let p = parent[i];
        if levels[i] == levels[p] {
            translation[i] = translation[p];
        } else {
            translation[i] = new_parent.len();
            new_parent.push(translation[p]);
            new_levels.push(levels[i].clone());
        }
    }
    for id in node_map.iter_mut() {
        *id = translation[*id];
    }
    (new_parent, new_levels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reorder_puts_the_root_first() {
        // Leaves 0, 1 under node 2 (root, allocated last).
        let mut parent = vec![2, 2, 2];
        let mut levels = vec![0_u8, 0, 5];
        let mut node_map = vec![0, 1, 1];
        reorder(&mut parent, &mut levels, &mut node_map);
        assert_eq!(parent, vec![0, 0, 0]);
        assert_eq!(levels, vec![5, 0, 0]);
        assert_eq!(node_map, vec![2, 1, 1]);
    }

    #[test]
    fn canonicalize_merges_equal_levels_and_is_idempotent() {
        let parent = vec![0, 0, 1, 1, 0];
        let levels = vec![4_u8, 2, 2, 0, 4];
        let mut node_map = vec![2, 3, 4, 1];
        let (parent, levels) = canonicalize(&parent, &levels, &mut node_map);
        assert_eq!(parent, vec![0, 0, 1]);
        assert_eq!(levels, vec![4, 2, 0]);
        assert_eq!(node_map, vec![1, 2, 0, 1]);

        let mut again = node_map.clone();
        let (parent2, levels2) = canonicalize(&parent, &levels, &mut again);
        assert_eq!(parent2, parent);
        assert_eq!(levels2, levels);
        assert_eq!(again, node_map);
    }
}
