use std::collections::{HashSet, VecDeque};

use crate::model::molecule::Molecule;
use crate::model::rings::RingInfo;

/// Perceives ring membership and the smallest set of smallest rings.
///
/// Ring bonds are the non-bridge bonds. The SSSR is assembled from the
/// shortest cycle through each ring bond, accepted in order of size while
/// linearly independent over GF(2), until the cyclomatic number is reached.
pub fn find_rings(mol: &Molecule) -> RingInfo {
    let n = mol.atom_count();
    let m = mol.bond_count();

    let cyclomatic = (m + count_components(mol)).saturating_sub(n);
    let bridges = find_bridges(mol);
    let bond_in_ring: Vec<bool> = bridges.iter().map(|b| !b).collect();
    let atom_in_ring: Vec<bool> = (0..n)
        .map(|a| mol.neighbors(a).iter().any(|(_, b)| bond_in_ring[*b]))
        .collect();

    let (atom_rings, bond_rings) = if cyclomatic == 0 {
        (Vec::new(), Vec::new())
    } else {
        smallest_rings(mol, &bond_in_ring, cyclomatic)
    };

    RingInfo::new(atom_rings, bond_rings, cyclomatic, atom_in_ring, bond_in_ring)
}

fn count_components(mol: &Molecule) -> usize {
    let mut seen = vec![false; mol.atom_count()];
    let mut components = 0;
    let mut queue = VecDeque::new();

    for start in 0..mol.atom_count() {
        if seen[start] {
            continue;
        }
        components += 1;
        seen[start] = true;
        queue.push_back(start);
        while let Some(atom) = queue.pop_front() {
            for &(nbr, _) in mol.neighbors(atom) {
                if !seen[nbr] {
                    seen[nbr] = true;
                    queue.push_back(nbr);
                }
            }
        }
    }
    components
}

/// Tarjan bridge detection with an explicit stack.
fn find_bridges(mol: &Molecule) -> Vec<bool> {
    let n = mol.atom_count();
    let mut bridge = vec![false; mol.bond_count()];
    let mut disc = vec![usize::MAX; n];
    let mut low = vec![0usize; n];
    let mut timer = 0;

    // (atom, bond used to reach it, next neighbour slot)
    let mut stack: Vec<(usize, Option<usize>, usize)> = Vec::new();

    for root in 0..n {
        if disc[root] != usize::MAX {
            continue;
        }
        disc[root] = timer;
        low[root] = timer;
        timer += 1;
        stack.push((root, None, 0));

        while let Some(frame) = stack.last_mut() {
            let atom = frame.0;
            let slot = frame.2;
            if slot < mol.degree(atom) {
                frame.2 += 1;
                let via = frame.1;
                let (nbr, bond) = mol.neighbors(atom)[slot];
                if via == Some(bond) {
                    continue;
                }
                if disc[nbr] == usize::MAX {
                    disc[nbr] = timer;
                    low[nbr] = timer;
                    timer += 1;
                    stack.push((nbr, Some(bond), 0));
                } else {
                    low[atom] = low[atom].min(disc[nbr]);
                }
            } else {
                let via = frame.1;
                stack.pop();
                if let (Some(&(parent, _, _)), Some(bond)) = (stack.last(), via) {
                    low[parent] = low[parent].min(low[atom]);
                    if low[atom] > disc[parent] {
                        bridge[bond] = true;
                    }
                }
            }
        }
    }
    bridge
}

struct Cycle {
    atoms: Vec<usize>,
    bonds: Vec<usize>,
}

fn smallest_rings(
    mol: &Molecule,
    bond_in_ring: &[bool],
    target: usize,
) -> (Vec<Vec<usize>>, Vec<Vec<usize>>) {
    let mut seen: HashSet<Vec<usize>> = HashSet::new();
    let mut candidates = Vec::new();

    for (idx, bond) in mol.bonds.iter().enumerate() {
        if !bond_in_ring[idx] {
            continue;
        }
        let Some(cycle) = shortest_cycle_through(mol, idx, bond.i, bond.j, bond_in_ring) else {
            continue;
        };
        let mut key = cycle.bonds.clone();
        key.sort_unstable();
        if seen.insert(key) {
            candidates.push(cycle);
        }
    }

    candidates.sort_by_key(|c| c.bonds.len());

    let words = mol.bond_count().div_ceil(64);
    let mut basis: Vec<(usize, Vec<u64>)> = Vec::new();
    let mut atom_rings = Vec::new();
    let mut bond_rings = Vec::new();

    for cycle in candidates {
        if atom_rings.len() == target {
            break;
        }
        let mut vector = vec![0u64; words];
        for &b in &cycle.bonds {
            vector[b / 64] |= 1 << (b % 64);
        }
        for (pivot, row) in &basis {
            if vector[pivot / 64] & (1 << (pivot % 64)) != 0 {
                for (v, r) in vector.iter_mut().zip(row) {
                    *v ^= r;
                }
            }
        }
        let Some(pivot) = lowest_bit(&vector) else {
            continue;
        };
        basis.push((pivot, vector));
        atom_rings.push(cycle.atoms);
        bond_rings.push(cycle.bonds);
    }

    if atom_rings.len() < target {
        tracing::warn!(
            found = atom_rings.len(),
            expected = target,
            "ring set is smaller than the cyclomatic number"
        );
    }

    (atom_rings, bond_rings)
}

fn lowest_bit(vector: &[u64]) -> Option<usize> {
    vector
        .iter()
        .enumerate()
        .find(|(_, w)| **w != 0)
        .map(|(i, w)| i * 64 + w.trailing_zeros() as usize)
}

/// Breadth-first search from `from` to `to` over ring bonds, skipping
/// `excluded`; the path plus the excluded bond closes the cycle.
fn shortest_cycle_through(
    mol: &Molecule,
    excluded: usize,
    from: usize,
    to: usize,
    bond_in_ring: &[bool],
) -> Option<Cycle> {
    let mut came_from: Vec<Option<(usize, usize)>> = vec![None; mol.atom_count()];
    let mut visited = vec![false; mol.atom_count()];
    let mut queue = VecDeque::new();
    visited[from] = true;
    queue.push_back(from);

    while let Some(atom) = queue.pop_front() {
        if atom == to {
            break;
        }
        for &(nbr, bond) in mol.neighbors(atom) {
            if bond == excluded || !bond_in_ring[bond] || visited[nbr] {
                continue;
            }
            visited[nbr] = true;
            came_from[nbr] = Some((atom, bond));
            queue.push_back(nbr);
        }
    }

    if !visited[to] {
        return None;
    }

    let mut atoms = vec![to];
    let mut bonds = vec![excluded];
    let mut current = to;
    while let Some((prev, bond)) = came_from[current] {
        atoms.push(prev);
        bonds.push(bond);
        current = prev;
    }
    atoms.reverse();
    Some(Cycle { atoms, bonds })
}
