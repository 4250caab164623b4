//! Kruskal-style merge loop shared by the tree of shapes and the alpha-tree.
//!
//! Leaves are flat zones. Edges are consumed in increasing weight; every
//! accepted edge merges two components under either a reused node (when
//! canonicalizing and a root already sits at the edge weight) or a fresh node.
//! Leaves are activated lazily, in increasing leaf level, just before the
//! first edge at or above their level so node ids grow with level.

use tracing::instrument;

use super::{
    canonicalize::{canonicalize, reorder},
    edges::{Edge, EdgeQueue},
    zones::Zones,
};
use crate::{level::Weight, union_find::UnionFind};

const UNSET: usize = usize::MAX;

#[derive(Clone, Copy, Debug)]
pub(crate) struct BuildOptions {
    pub(crate) canonicalize: bool,
    pub(crate) record_mst: bool,
}

/// Parent/level arrays with root 0 plus the cell-to-node map.
#[derive(Clone, Debug)]
pub(crate) struct Hierarchy<W> {
    pub(crate) parent: Vec<usize>,
    pub(crate) levels: Vec<W>,
    pub(crate) node_map: Vec<usize>,
    pub(crate) mst: Vec<Edge<W>>,
}

struct Forest<W> {
    parent: Vec<usize>,
    levels: Vec<W>,
}

impl<W: Weight> Forest<W> {
    fn push(&mut self, level: W) -> usize {
        let id = self.parent.len();
        self.parent.push(id);
        self.levels.push(level);
        id
    }
}

struct Leaves<'a, W> {
    levels: &'a [W],
    // Zones sorted by leaf level, ties in zone order.
    pending: Vec<usize>,
    cursor: usize,
    leaf_of: Vec<usize>,
}

impl<'a, W: Weight> Leaves<'a, W> {
    fn new(levels: &'a [W]) -> Self {
        let mut pending: Vec<usize> = (0..levels.len()).collect();
        pending.sort_by(|&a, &b| levels[a].total_cmp(&levels[b]));
        Self {
            levels,
            pending,
            cursor: 0,
            leaf_of: vec![UNSET; levels.len()],
        }
    }

    fn activate_next(&mut self, forest: &mut Forest<W>, links: &mut [usize]) -> bool {
        let Some(&zone) = self.pending.get(self.cursor) else {
            return false;
        };
        self.cursor += 1;
        let id = forest.push(self.levels[zone]);
        self.leaf_of[zone] = id;
        links[zone] = id;
        true
    }

    fn activate_up_to(&mut self, w: &W, forest: &mut Forest<W>, links: &mut [usize]) {
        while self
            .pending
            .get(self.cursor)
            .is_some_and(|&zone| self.levels[zone].total_cmp(w).is_le())
        {
            self.activate_next(forest, links);
        }
    }

    fn is_active(&self, zone: usize) -> bool {
        self.leaf_of[zone] != UNSET
    }
}

/// Builds the hierarchy over `zones`, whose leaf levels are `leaf_levels`,
/// consuming every edge of `edges`.
#[instrument(
    name = "core.hierarchy",
    skip_all,
    fields(zones = zones.len(), strategy = ?edges.strategy(), nodes = tracing::field::Empty),
)]
pub(crate) fn build_hierarchy<W: Weight>(
    zones: &Zones,
    leaf_levels: &[W],
    edges: &mut EdgeQueue<W>,
    options: BuildOptions,
) -> Hierarchy<W> {
    let zone_count = zones.len();
    let mut forest = Forest {
        parent: Vec::with_capacity(zone_count.saturating_mul(2)),
        levels: Vec::with_capacity(zone_count.saturating_mul(2)),
    };
    let mut zpar = UnionFind::new(zone_count);
    let mut links = vec![UNSET; zone_count];
    let mut leaves = Leaves::new(leaf_levels);
    let mut mst = Vec::new();

    while let Some(edge) = edges.pop() {
        let zp = zones.zone_of(edge.p);
        let zq = zones.zone_of(edge.q);
        leaves.activate_up_to(&edge.w, &mut forest, &mut links);
        while !(leaves.is_active(zp) && leaves.is_active(zq)) {
            if !leaves.activate_next(&mut forest, &mut links) {
                break;
            }
        }

        let rp = zpar.find(zp);
        let rq = zpar.find(zq);
        if rp == rq {
            continue;
        }
        let np = links[rp];
        let nq = links[rq];
        let (newer, older) = if np > nq { (np, nq) } else { (nq, np) };
        let node = if options.canonicalize && forest.levels[newer].total_cmp(&edge.w).is_eq() {
            newer
        } else if options.canonicalize && forest.levels[older].total_cmp(&edge.w).is_eq() {
            older
        } else {
            forest.push(edge.w)
        };
        forest.parent[np] = node;
        forest.parent[nq] = node;
        zpar.link_roots(rp, rq);
        links[rp] = node;
        if options.record_mst {
            mst.push(edge);
        }
    }
    while leaves.activate_next(&mut forest, &mut links) {}

    let Forest {
        mut parent,
        mut levels,
    } = forest;
    let mut node_map: Vec<usize> = (0..zones.cell_count())
        .map(|cell| leaves.leaf_of[zones.zone_of(cell)])
        .collect();
    reorder(&mut parent, &mut levels, &mut node_map);
    if options.canonicalize {
        (parent, levels) = canonicalize(&parent, &levels, &mut node_map);
    }
    tracing::Span::current().record("nodes", parent.len());

    Hierarchy {
        parent,
        levels,
        node_map,
        mst,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::zones::ZoneBuilder;
    use crate::image::{Connectivity, Neighborhood, Shape};
    use crate::pset::QueueStrategy;

    fn line_edges(values: &[u8]) -> (Zones, EdgeQueue<u8>) {
        let shape = Shape::new(&[values.len()]).expect("shape");
        let forward = Neighborhood::new(Connectivity::Two, shape)
            .expect("1-D")
            .forward();
        let mut queue = EdgeQueue::new(QueueStrategy::Auto, forward).expect("u8");
        let mut zones = ZoneBuilder::new(values.len());
        for p in 0..values.len() - 1 {
            let w = values[p].abs_diff(values[p + 1]);
            if w == 0 {
                zones.merge(p, p + 1);
            } else {
                queue.push(0, p, p + 1, w);
            }
        }
        queue.finish();
        (zones.finish(), queue)
    }

    #[test]
    fn line_builds_nested_components() {
        // Zones {0,1} {2} {3}; edges 1-2 (w=3), 2-3 (w=1).
        let (zones, mut queue) = line_edges(&[5, 5, 2, 3]);
        let leaf_levels = vec![0_u8; zones.len()];
        let h = build_hierarchy(
            &zones,
            &leaf_levels,
            &mut queue,
            BuildOptions {
                canonicalize: true,
                record_mst: true,
            },
        );
        assert_eq!(h.parent[0], 0);
        assert!(h.parent.iter().enumerate().skip(1).all(|(i, &p)| p < i));
        assert_eq!(h.parent.len(), 5);
        assert_eq!(h.levels[0], 3);
        assert_eq!(h.node_map[0], h.node_map[1]);
        let cut_level_one = h.parent[h.node_map[2]];
        assert_eq!(h.parent[h.node_map[3]], cut_level_one);
        assert_eq!(h.levels[cut_level_one], 1);
        assert_eq!(h.mst.len(), 2);
    }

    #[test]
    fn single_zone_yields_a_lone_root() {
        let (zones, mut queue) = line_edges(&[7, 7, 7]);
        let h = build_hierarchy(
            &zones,
            &[0_u8],
            &mut queue,
            BuildOptions {
                canonicalize: true,
                record_mst: false,
            },
        );
        assert_eq!(h.parent, vec![0]);
        assert_eq!(h.node_map, vec![0, 0, 0]);
        assert!(h.mst.is_empty());
    }
}
