use ndarray::array;

use crate::interfaces::qchem::read_qchem_overlap;

const ROOT: &str = env!("CARGO_MANIFEST_DIR");

#[test]
fn test_qchem_read_overlap() {
    let smat = read_qchem_overlap(format!("{ROOT}/tests/data/qchem/three_states.fchk"), 2).unwrap();
    assert_eq!(smat, array![[1.0, 0.25], [0.25, 1.0]]);
}

#[test]
fn test_qchem_read_overlap_wrong_size() {
    assert!(read_qchem_overlap(format!("{ROOT}/tests/data/qchem/three_states.fchk"), 3).is_err());
}

#[test]
fn test_qchem_read_overlap_missing_marker() {
    assert!(read_qchem_overlap(format!("{ROOT}/tests/data/qchem/eom.out"), 2).is_err());
}

#[test]
fn test_qchem_read_overlap_missing_file() {
    let smat = read_qchem_overlap(format!("{ROOT}/tests/data/qchem/nonexistent.fchk"), 4).unwrap();
    assert_eq!(smat.dim(), (4, 4));
    assert!(smat.iter().all(|x| *x == 0.0));
}
