use itertools::Itertools;
use ndarray::array;

use crate::interfaces::qchem::packed::{
    element_count, fill_lower_triangular, fill_row_major, read_packed_values,
};
use crate::io::LineCursor;

#[test]
fn test_packed_element_count() {
    assert_eq!(element_count("Overlap Matrix 6").unwrap(), 6);
    assert_eq!(element_count("  State Density  1 alpha   9  ").unwrap(), 9);
    assert!(element_count("Overlap Matrix").is_err());
    assert!(element_count("").is_err());
}

#[test]
fn test_packed_read_values() {
    let mut cursor = LineCursor::from_text(
        "1.0 2.0 3.0 4.0 5.0\n6.0 7.0\nnext\n",
        "memory",
    );
    let values = read_packed_values(&mut cursor, "Block 7").unwrap();
    assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    assert_eq!(cursor.next_line().unwrap().as_deref(), Some("next"));

    let mut cursor = LineCursor::from_text("1.0 2.0 3.0 4.0 5.0\n", "memory");
    assert_eq!(read_packed_values(&mut cursor, "Block 5").unwrap().len(), 5);
}

#[test]
fn test_packed_read_values_failures() {
    let mut cursor = LineCursor::from_text("1.0 2.0 3.0 4.0 5.0\n", "memory");
    assert!(read_packed_values(&mut cursor, "Block 6").is_err());

    let mut cursor = LineCursor::from_text("1.0 2.0 3.0\n", "memory");
    let err = read_packed_values(&mut cursor, "Block 4").unwrap_err();
    assert!(err.to_string().contains("Expected 4 packed values but found 3"));

    let mut cursor = LineCursor::from_text("1.0 x\n", "memory");
    assert!(read_packed_values(&mut cursor, "Block 2").is_err());
}

#[test]
fn test_packed_fill_lower_triangular() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let mat = fill_lower_triangular(&values, 3).unwrap();
    assert_eq!(
        mat,
        array![[1.0, 2.0, 4.0], [2.0, 3.0, 5.0], [4.0, 5.0, 6.0]]
    );
    assert_eq!(mat, mat.t());
    let lower = (0..3)
        .flat_map(|i| (0..=i).map(move |j| (i, j)))
        .map(|(i, j)| mat[[i, j]])
        .collect_vec();
    assert_eq!(lower, values.to_vec());

    assert!(fill_lower_triangular(&values[..5], 3).is_err());
    assert_eq!(fill_lower_triangular(&[], 0).unwrap().len(), 0);
}

#[test]
fn test_packed_fill_row_major() {
    let values = (1..=9).map(f64::from).collect_vec();
    let mat = fill_row_major(&values, 3).unwrap();
    assert_eq!(mat.iter().copied().collect_vec(), values);
    assert_eq!(mat[[0, 2]], 3.0);
    assert_eq!(mat[[2, 0]], 7.0);

    assert!(fill_row_major(&values, 2).is_err());
}
