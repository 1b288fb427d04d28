use approx::assert_relative_eq;
use proptest::prelude::*;

use crate::interfaces::qchem::density::{
    expected_density_blocks, read_qchem_densities, tdm_start, total_tdms_to_read, DensityBlock,
    DensityKind, Spin,
};

const ROOT: &str = env!("CARGO_MANIFEST_DIR");

#[test]
fn test_density_block_enumeration() {
    let blocks = expected_density_blocks(3);
    assert_eq!(blocks.len(), 12);
    assert_eq!(
        blocks[..6]
            .iter()
            .map(|b| (b.kind, b.i, b.j, b.spin))
            .collect::<Vec<_>>(),
        vec![
            (DensityKind::State, 0, 0, Spin::Alpha),
            (DensityKind::State, 0, 0, Spin::Beta),
            (DensityKind::State, 1, 1, Spin::Alpha),
            (DensityKind::State, 1, 1, Spin::Beta),
            (DensityKind::State, 2, 2, Spin::Alpha),
            (DensityKind::State, 2, 2, Spin::Beta),
        ]
    );
    assert_eq!(
        blocks[6..]
            .iter()
            .map(|b| (b.kind, b.i, b.j, b.spin))
            .collect::<Vec<_>>(),
        vec![
            (DensityKind::Transition, 0, 1, Spin::Alpha),
            (DensityKind::Transition, 0, 1, Spin::Beta),
            (DensityKind::Transition, 0, 2, Spin::Alpha),
            (DensityKind::Transition, 0, 2, Spin::Beta),
            (DensityKind::Transition, 1, 2, Spin::Alpha),
            (DensityKind::Transition, 1, 2, Spin::Beta),
        ]
    );
}

#[test]
fn test_density_index_helpers() {
    assert_eq!(total_tdms_to_read(0), 0);
    assert_eq!(total_tdms_to_read(1), 0);
    assert_eq!(total_tdms_to_read(3), 3);
    assert_eq!(tdm_start(3, 1).unwrap(), 6);
    assert_eq!(tdm_start(3, 2).unwrap(), 10);
    assert_eq!(tdm_start(3, 3).unwrap(), 12);
    assert!(tdm_start(3, 0).is_err());
    assert!(tdm_start(3, 4).is_err());
}

proptest! {
    #[test]
    fn test_density_index_helpers_match_enumeration(nstates in 1usize..10) {
        let blocks = expected_density_blocks(nstates);
        prop_assert_eq!(blocks.len(), 2 * nstates + 2 * total_tdms_to_read(nstates));
        for state in 1..nstates {
            let start = tdm_start(nstates, state).unwrap();
            prop_assert_eq!(
                blocks[start],
                DensityBlock {
                    kind: DensityKind::Transition,
                    i: state - 1,
                    j: state,
                    spin: Spin::Alpha,
                }
            );
        }
        prop_assert_eq!(tdm_start(nstates, nstates).unwrap(), blocks.len());
    }
}

#[test]
fn test_density_read_three_states() {
    let densities =
        read_qchem_densities(format!("{ROOT}/tests/data/qchem/three_states.fchk"), 3, 2).unwrap();
    assert_eq!(densities.nstates, 3);
    assert_eq!(densities.nbasis, 2);

    // Block b of the file holds b + 0.1, b + 0.2, b + 0.3, b + 0.4 in row-major order.
    let first = |spin: Spin, i: usize, j: usize| densities.get(spin, i, j).unwrap()[[0, 0]];
    assert_relative_eq!(first(Spin::Alpha, 0, 0), 0.1);
    assert_relative_eq!(first(Spin::Beta, 0, 0), 1.1);
    assert_relative_eq!(first(Spin::Alpha, 2, 2), 4.1);
    assert_relative_eq!(first(Spin::Beta, 2, 2), 5.1);
    assert_relative_eq!(first(Spin::Alpha, 0, 1), 6.1);
    assert_relative_eq!(first(Spin::Beta, 0, 1), 7.1);
    assert_relative_eq!(first(Spin::Alpha, 0, 2), 8.1);
    assert_relative_eq!(first(Spin::Alpha, 1, 2), 10.1);
    assert_relative_eq!(first(Spin::Beta, 1, 2), 11.1);

    let d01 = densities.get(Spin::Alpha, 0, 1).unwrap();
    assert_relative_eq!(d01[[0, 1]], 6.2);
    assert_relative_eq!(d01[[1, 0]], 6.3);

    // Lower blocks are copies, not transposes.
    for spin in Spin::ALL {
        for i in 0..3 {
            for j in (i + 1)..3 {
                assert_eq!(densities.get(spin, j, i), densities.get(spin, i, j));
            }
        }
    }
    assert!(densities.get(Spin::Alpha, 3, 0).is_none());
    assert_eq!(densities.lattice(Spin::Beta).len(), 3);
}

#[test]
fn test_density_read_truncated() {
    let err = read_qchem_densities(format!("{ROOT}/tests/data/qchem/truncated.fchk"), 3, 2)
        .unwrap_err();
    assert!(err.to_string().contains("Reached end of file"));
}

#[test]
fn test_density_read_wrong_nbasis() {
    assert!(
        read_qchem_densities(format!("{ROOT}/tests/data/qchem/three_states.fchk"), 3, 3).is_err()
    );
}

#[test]
fn test_density_read_missing_file() {
    let densities =
        read_qchem_densities(format!("{ROOT}/tests/data/qchem/nonexistent.fchk"), 2, 3).unwrap();
    assert_eq!(densities.lattice(Spin::Alpha).len(), 2);
    assert!(Spin::ALL.iter().all(|&spin| densities
        .lattice(spin)
        .iter()
        .flatten()
        .all(|mat| mat.dim() == (3, 3) && mat.iter().all(|x| *x == 0.0))));
}
