//! Order-independent structural hashing.
//!
//! Atoms start from a local invariant (element, degree, bond-order profile) and are
//! ranked by iterated neighbourhood refinement. Refinement alone leaves symmetric
//! or regular regions tied and cannot separate every pair of non-isomorphic graphs,
//! so tied atoms are individualized one at a time and every resulting ordering is
//! explored. The lexicographically smallest relabelled atom and bond list is the
//! canonical code, and its hash is the structural index. Renumbering atoms (which
//! is what a different join order does) never changes it.

use super::StructuralIndex;
use crate::core::models::structure::{BondOrder, Structure};
use itertools::Itertools;
use std::hash::{Hash, Hasher};

pub(crate) struct Fnv1aHasher(u64);

impl Fnv1aHasher {
    pub(crate) fn new() -> Self {
        Self(0xcbf29ce484222325)
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(0x100000001b3);
        }
    }
}

pub(crate) fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = Fnv1aHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[derive(Hash)]
struct AtomInvariant {
    atomic_number: u8,
    degree: u8,
    singles: u8,
    doubles: u8,
    triples: u8,
    aromatic: u8,
}

/// Initial per-atom labels shared by the structural index and the fingerprint.
pub(crate) fn initial_labels(
    structure: &Structure,
    adjacency: &[Vec<(usize, BondOrder)>],
) -> Vec<u64> {
    structure
        .atoms()
        .iter()
        .zip(adjacency)
        .map(|(atom, neighbours)| {
            let count = |order: BondOrder| {
                neighbours.iter().filter(|(_, o)| *o == order).count() as u8
            };
            hash_of(&AtomInvariant {
                atomic_number: atom.atomic_number,
                degree: neighbours.len() as u8,
                singles: count(BondOrder::Single),
                doubles: count(BondOrder::Double),
                triples: count(BondOrder::Triple),
                aromatic: count(BondOrder::Aromatic),
            })
        })
        .collect()
}

/// One refinement round: every label absorbs the sorted labels of its neighbours.
pub(crate) fn refine(labels: &[u64], adjacency: &[Vec<(usize, BondOrder)>]) -> Vec<u64> {
    labels
        .iter()
        .zip(adjacency)
        .map(|(&own, neighbours)| {
            let environment = neighbours
                .iter()
                .map(|&(n, order)| (order as u8, labels[n]))
                .sorted_unstable()
                .collect_vec();
            hash_of(&(own, environment))
        })
        .collect()
}

fn distinct<T: Eq + Hash>(labels: &[T]) -> usize {
    labels.iter().unique().count()
}

/// Dense ranks: equal values share the position of their first occurrence in
/// sorted order.
fn ranks_of<T: Ord>(values: &[T]) -> Vec<usize> {
    let order = (0..values.len())
        .sorted_by(|&a, &b| values[a].cmp(&values[b]))
        .collect_vec();
    let mut ranks = vec![0; values.len()];
    for (position, &atom) in order.iter().enumerate() {
        ranks[atom] = match position.checked_sub(1).map(|p| order[p]) {
            Some(previous) if values[previous] == values[atom] => ranks[previous],
            _ => position,
        };
    }
    ranks
}

/// Refines a ranking until the number of classes stops growing.
fn refine_ranks(ranks: &[usize], adjacency: &[Vec<(usize, BondOrder)>]) -> Vec<usize> {
    let mut ranks = ranks_of(ranks);
    loop {
        let values = ranks
            .iter()
            .zip(adjacency)
            .map(|(&own, neighbours)| {
                let environment = neighbours
                    .iter()
                    .map(|&(n, order)| (order as u8, ranks[n]))
                    .sorted_unstable()
                    .collect_vec();
                hash_of(&(own, environment))
            })
            .collect_vec();
        let refined = ranks_of(&values);
        if distinct(&refined) <= distinct(&ranks) {
            return ranks;
        }
        ranks = refined;
    }
}

/// Atoms sharing the lowest tied rank, or `None` once every rank is distinct.
fn target_cell(ranks: &[usize]) -> Option<Vec<usize>> {
    let tied = ranks
        .iter()
        .counts()
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(&rank, _)| rank)
        .min()?;
    Some((0..ranks.len()).filter(|&i| ranks[i] == tied).collect())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct CanonicalCode {
    atoms: Vec<u8>,
    bonds: Vec<(usize, usize, u8)>,
}

impl CanonicalCode {
    /// Relabels the structure by a discrete ranking.
    fn encode(structure: &Structure, ranks: &[usize]) -> Self {
        let mut atoms = vec![0; ranks.len()];
        for (atom, &rank) in structure.atoms().iter().zip(ranks) {
            atoms[rank] = atom.atomic_number;
        }
        let bonds = structure
            .bonds()
            .iter()
            .map(|bond| {
                let (a, b) = (ranks[bond.atom1], ranks[bond.atom2]);
                (a.min(b), a.max(b), bond.order as u8)
            })
            .sorted_unstable()
            .collect_vec();
        Self { atoms, bonds }
    }
}

struct DisjointSet(Vec<usize>);

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self((0..size).collect())
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.0[x] != x {
            self.0[x] = self.0[self.0[x]];
            x = self.0[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.0[ra.max(rb)] = ra.min(rb);
        }
    }
}

/// Individualization-refinement search for the smallest canonical code.
///
/// Leaves that reproduce the best code reveal an automorphism. Children of a
/// node that lie in one orbit of the automorphisms fixing that node's path have
/// identical subtrees, so only the first of them is explored.
struct CanonicalSearch<'s> {
    structure: &'s Structure,
    adjacency: Vec<Vec<(usize, BondOrder)>>,
    best: Option<(CanonicalCode, Vec<usize>)>,
    automorphisms: Vec<Vec<usize>>,
}

impl<'s> CanonicalSearch<'s> {
    fn new(structure: &'s Structure) -> Self {
        Self {
            structure,
            adjacency: structure.adjacency(),
            best: None,
            automorphisms: Vec::new(),
        }
    }

    fn run(mut self) -> CanonicalCode {
        let initial = initial_labels(self.structure, &self.adjacency);
        let ranks = refine_ranks(&ranks_of(&initial), &self.adjacency);
        self.explore(ranks, &mut Vec::new());
        self.best.map(|(code, _)| code).unwrap_or_default()
    }

    fn explore(&mut self, ranks: Vec<usize>, path: &mut Vec<usize>) {
        let Some(cell) = target_cell(&ranks) else {
            self.visit_leaf(ranks);
            return;
        };

        let mut explored: Vec<usize> = Vec::new();
        for atom in cell {
            let mut orbits = self.orbits_fixing(path);
            if explored
                .iter()
                .any(|&seen| orbits.find(seen) == orbits.find(atom))
            {
                continue;
            }
            explored.push(atom);

            let mut trial = ranks.clone();
            trial[atom] = ranks.len();
            let refined = refine_ranks(&trial, &self.adjacency);
            path.push(atom);
            self.explore(refined, path);
            path.pop();
        }
    }

    fn visit_leaf(&mut self, ranks: Vec<usize>) {
        let code = CanonicalCode::encode(self.structure, &ranks);
        match &self.best {
            Some((best, _)) if code > *best => {}
            Some((best, best_ranks)) if code == *best => {
                let mut at_rank = vec![0; ranks.len()];
                for (atom, &rank) in ranks.iter().enumerate() {
                    at_rank[rank] = atom;
                }
                let automorphism: Vec<usize> =
                    best_ranks.iter().map(|&rank| at_rank[rank]).collect();
                self.automorphisms.push(automorphism);
            }
            _ => self.best = Some((code, ranks)),
        }
    }

    fn orbits_fixing(&self, path: &[usize]) -> DisjointSet {
        let mut orbits = DisjointSet::new(self.structure.atom_count());
        for automorphism in &self.automorphisms {
            if path.iter().all(|&atom| automorphism[atom] == atom) {
                for (atom, &image) in automorphism.iter().enumerate() {
                    orbits.union(atom, image);
                }
            }
        }
        orbits
    }
}

pub fn structural_index(structure: &Structure) -> StructuralIndex {
    StructuralIndex(hash_of(&CanonicalSearch::new(structure).run()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(symbols: &[&str]) -> Structure {
        let mut s = Structure::new();
        for (i, sym) in symbols.iter().enumerate() {
            s.add_atom(sym).unwrap();
            if i > 0 {
                s.add_bond(i - 1, i, BondOrder::Single).unwrap();
            }
        }
        s
    }

    #[test]
    fn index_ignores_atom_numbering() {
        let forward = chain(&["C", "C", "O", "N"]);
        let backward = chain(&["N", "O", "C", "C"]);
        assert_eq!(structural_index(&forward), structural_index(&backward));
    }

    #[test]
    fn index_distinguishes_constitutional_isomers() {
        let a = chain(&["C", "O", "C", "N"]);
        let b = chain(&["C", "C", "O", "N"]);
        assert_ne!(structural_index(&a), structural_index(&b));
    }

    #[test]
    fn index_depends_on_bond_order() {
        let single = chain(&["C", "C"]);
        let mut double = Structure::new();
        double.add_atom("C").unwrap();
        double.add_atom("C").unwrap();
        double.add_bond(0, 1, BondOrder::Double).unwrap();
        assert_ne!(structural_index(&single), structural_index(&double));
    }

    #[test]
    fn index_distinguishes_ring_from_chain() {
        let open = chain(&["C", "C", "C", "C", "C", "C"]);
        let mut ring = open.clone();
        ring.add_bond(5, 0, BondOrder::Single).unwrap();
        assert_ne!(structural_index(&open), structural_index(&ring));
    }

    fn carbon_graph(atoms: usize, bonds: &[(usize, usize)]) -> Structure {
        let mut s = Structure::new();
        for _ in 0..atoms {
            s.add_atom("C").unwrap();
        }
        for &(a, b) in bonds {
            s.add_bond(a, b, BondOrder::Single).unwrap();
        }
        s
    }

    #[test]
    fn index_separates_fused_from_joined_rings() {
        let decalin = carbon_graph(
            10,
            &[
                (0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0),
                (5, 6), (6, 7), (7, 8), (8, 9), (9, 0),
            ],
        );
        let bicyclopentyl = carbon_graph(
            10,
            &[
                (0, 1), (1, 2), (2, 3), (3, 4), (4, 0),
                (5, 6), (6, 7), (7, 8), (8, 9), (9, 5),
                (0, 5),
            ],
        );
        assert_ne!(structural_index(&decalin), structural_index(&bicyclopentyl));
    }

    #[test]
    fn index_separates_regular_graphs() {
        // Every atom has three neighbours in both, so refinement alone ties them.
        let prism = carbon_graph(
            6,
            &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (0, 3), (1, 4), (2, 5)],
        );
        let bipartite = carbon_graph(
            6,
            &[(0, 3), (0, 4), (0, 5), (1, 3), (1, 4), (1, 5), (2, 3), (2, 4), (2, 5)],
        );
        assert_ne!(structural_index(&prism), structural_index(&bipartite));
    }

    #[test]
    fn index_ignores_numbering_of_symmetric_graphs() {
        let prism = carbon_graph(
            6,
            &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (0, 3), (1, 4), (2, 5)],
        );
        // Same prism, atoms permuted by 0->4, 1->0, 2->5, 3->2, 4->1, 5->3.
        let relabelled = carbon_graph(
            6,
            &[(4, 0), (0, 5), (5, 4), (2, 1), (1, 3), (3, 2), (4, 2), (0, 1), (5, 3)],
        );
        assert_eq!(structural_index(&prism), structural_index(&relabelled));

        let mut ring = chain(&["C", "C", "C", "C", "C", "C"]);
        ring.add_bond(5, 0, BondOrder::Single).unwrap();
        let mut shuffled = Structure::new();
        for _ in 0..6 {
            shuffled.add_atom("C").unwrap();
        }
        for (a, b) in [(3, 0), (0, 5), (5, 1), (1, 4), (4, 2), (2, 3)] {
            shuffled.add_bond(a, b, BondOrder::Single).unwrap();
        }
        assert_eq!(structural_index(&ring), structural_index(&shuffled));
    }

    #[test]
    fn ranks_share_the_position_of_their_first_tie() {
        assert_eq!(ranks_of(&[30, 10, 30, 20]), vec![2, 0, 2, 1]);
        assert_eq!(target_cell(&[2, 0, 2, 1]), Some(vec![0, 2]));
        assert_eq!(target_cell(&[2, 0, 3, 1]), None);
    }

    #[test]
    fn index_is_stable_across_calls() {
        let s = chain(&["C", "N", "C", "O"]);
        assert_eq!(structural_index(&s), structural_index(&s.clone()));
    }

    #[test]
    fn fnv_hasher_matches_reference_offset_basis() {
        let hasher = Fnv1aHasher::new();
        assert_eq!(hasher.finish(), 0xcbf29ce484222325);
    }
}
