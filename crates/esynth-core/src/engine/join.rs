use super::error::EngineError;
use crate::core::chem::ChemistryProvider;
use crate::core::matching::commit_connection;
use crate::core::models::connection::ConnectableAtom;
use crate::core::models::fragment::{Connection, Fragment};
use crate::core::models::ids::ConnectionId;
use crate::core::models::structure::BondOrder;

/// Builds the complex formed by bonding `left.atoms()[left_atom]` to
/// `right.atoms()[right_atom]`.
///
/// Neither input is modified. The right fragment's atoms, bonds and connection ids
/// are shifted behind the left ones, so connection ids stay dense in the result.
pub(crate) fn join(
    left: &Fragment,
    left_atom: usize,
    right: &Fragment,
    right_atom: usize,
    chemistry: &dyn ChemistryProvider,
) -> Result<Fragment, EngineError> {
    let split = left.atoms().len();
    if left_atom >= split || right_atom >= right.atoms().len() {
        return Err(EngineError::Internal(format!(
            "join of '{}' and '{}' references connection points {} and {} out of range",
            left.name(),
            right.name(),
            left_atom,
            right_atom
        )));
    }

    let mut structure = left.structure().clone();
    let site_offset = structure.append(right.structure());
    let id_offset = left.connections().len() as u32;

    let mut atoms: Vec<ConnectableAtom> = Vec::with_capacity(split + right.atoms().len());
    atoms.extend_from_slice(left.atoms());
    atoms.extend(right.atoms().iter().map(|atom| {
        let mut atom = atom.clone();
        atom.relocate(site_offset, id_offset);
        atom
    }));

    let mut connections: Vec<Connection> = left.connections().to_vec();
    connections.extend(right.connections().iter().map(|c| Connection {
        id: c.id.offset(id_offset),
        from_site: c.from_site + site_offset,
        to_site: c.to_site + site_offset,
    }));

    let id = ConnectionId(connections.len() as u32);
    let (left_atoms, right_atoms) = atoms.split_at_mut(split);
    let (a, b) = (&mut left_atoms[left_atom], &mut right_atoms[right_atom]);
    commit_connection(a, b, id)?;

    let (from_site, to_site) = (a.site(), b.site());
    structure
        .add_bond(from_site, to_site, BondOrder::Single)
        .map_err(|e| EngineError::Internal(format!("bond between joined sites: {}", e)))?;
    connections.push(Connection {
        id,
        from_site,
        to_site,
    });

    let index = chemistry.structural_index(&structure)?;
    let parts = left
        .parts()
        .into_iter()
        .chain(right.parts())
        .map(str::to_string)
        .collect();

    Ok(Fragment::complex(
        format!("{}+{}", left.name(), right.name()),
        parts,
        index,
        structure,
        atoms,
        connections,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chem::{ChemistryError, GraphChemistry, StructuralIndex};
    use crate::core::chem::fingerprint::Fingerprint;
    use crate::core::matching::ConnectionError;
    use crate::core::models::structure::Structure;

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

    fn amine() -> Fragment {
        Fragment::brick(
            "amine",
            chain(&["C", "N"]),
            vec![ConnectableAtom::new("N.am", 1, ["C.co"])],
            &GraphChemistry,
        )
        .unwrap()
    }

    fn diacid() -> Fragment {
        Fragment::linker(
            "diacid",
            chain(&["C", "C", "C"]),
            vec![
                ConnectableAtom::new("C.co", 0, ["N.am"]),
                ConnectableAtom::new("C.co", 2, ["N.am"]),
            ],
            &GraphChemistry,
        )
        .unwrap()
    }

    #[test]
    fn join_merges_structures_and_commits_both_endpoints() {
        let brick = amine();
        let linker = diacid();

        let complex = join(&brick, 0, &linker, 0, &GraphChemistry).unwrap();

        assert!(complex.is_complex());
        assert_eq!(complex.name(), "amine+diacid");
        assert_eq!(complex.parts(), vec!["amine", "diacid"]);
        assert_eq!(complex.structure().atom_count(), 5);
        assert_eq!(complex.structure().bond_count(), 4);
        assert_eq!(complex.depth(), 1);
        assert_eq!(
            complex.connections(),
            &[Connection {
                id: ConnectionId(0),
                from_site: 1,
                to_site: 2
            }]
        );
        assert_eq!(complex.atoms()[0].external_connections(), 1);
        assert_eq!(complex.atoms()[1].external_connections(), 1);
        assert_eq!(complex.atoms()[1].site(), 2);
        assert_eq!(complex.atoms()[2].site(), 4);
        assert_eq!(complex.open_valence(), 1);
    }

    #[test]
    fn join_leaves_templates_untouched() {
        let brick = amine();
        let linker = diacid();
        join(&brick, 0, &linker, 1, &GraphChemistry).unwrap();

        assert_eq!(brick.atoms()[0].external_connections(), 0);
        assert!(linker.atoms().iter().all(|a| a.connection_id().is_none()));
    }

    #[test]
    fn nested_joins_keep_connection_ids_dense() {
        let first = join(&amine(), 0, &diacid(), 0, &GraphChemistry).unwrap();
        let open = first.open_connection_points().next().unwrap().0;
        let second = join(&first, open, &amine(), 0, &GraphChemistry).unwrap();

        let ids: Vec<u32> = second.connections().iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(second.parts(), vec!["amine", "diacid", "amine"]);
        assert_eq!(second.open_valence(), 0);
    }

    #[test]
    fn join_order_does_not_change_the_index() {
        let forward = join(&amine(), 0, &diacid(), 0, &GraphChemistry).unwrap();
        let other_end = join(&amine(), 0, &diacid(), 1, &GraphChemistry).unwrap();
        assert_eq!(forward, other_end);
    }

    #[test]
    fn joining_an_exhausted_point_is_a_connection_fault() {
        let complex = join(&amine(), 0, &diacid(), 0, &GraphChemistry).unwrap();
        let result = join(&complex, 0, &amine(), 0, &GraphChemistry);
        assert!(matches!(
            result,
            Err(EngineError::Connection {
                source: ConnectionError::Exhausted { .. }
            })
        ));
    }

    #[test]
    fn out_of_range_points_are_internal_errors() {
        let result = join(&amine(), 3, &diacid(), 0, &GraphChemistry);
        assert!(matches!(result, Err(EngineError::Internal(_))));
    }

    struct FailingChemistry;

    impl ChemistryProvider for FailingChemistry {
        fn structural_index(&self, _: &Structure) -> Result<StructuralIndex, ChemistryError> {
            Err(ChemistryError::Provider("offline".to_string()))
        }

        fn fingerprint(&self, _: &Structure) -> Result<Fingerprint, ChemistryError> {
            Err(ChemistryError::Provider("offline".to_string()))
        }
    }

    #[test]
    fn provider_failure_is_a_candidate_fault() {
        let err = join(&amine(), 0, &diacid(), 0, &FailingChemistry).unwrap_err();
        assert!(err.is_candidate_fault());
    }
}
