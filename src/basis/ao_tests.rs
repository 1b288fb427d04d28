use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use nalgebra::Point3;
use proptest::prelude::*;

use crate::auxiliary::atom::{Atom, ElementMap, LengthUnit};
use crate::basis::ao::{cart_tuple_to_str, BasisSet, CartOrder};
use crate::basis::shell::{Primitive, Shell};

#[test]
fn test_ao_basis_cartorder_lex() {
    // =========
    // lcart = 0
    // =========
    let co_0_lex = CartOrder::lex(0);
    assert_eq!(co_0_lex.cart_tuples, vec![(0, 0, 0)]);

    // =========
    // lcart = 1
    // =========
    let co_1_lex = CartOrder::lex(1);
    assert_eq!(co_1_lex.cart_tuples, vec![(1, 0, 0), (0, 1, 0), (0, 0, 1)]);

    // =========
    // lcart = 2
    // =========
    let co_2_lex = CartOrder::lex(2);
    assert_eq!(
        co_2_lex.cart_tuples,
        vec![
            (2, 0, 0),
            (1, 1, 0),
            (1, 0, 1),
            (0, 2, 0),
            (0, 1, 1),
            (0, 0, 2),
        ]
    );

    // =========
    // lcart = 3
    // =========
    let co_3_lex = CartOrder::lex(3);
    assert_eq!(
        co_3_lex.cart_tuples,
        vec![
            (3, 0, 0),
            (2, 1, 0),
            (2, 0, 1),
            (1, 2, 0),
            (1, 1, 1),
            (1, 0, 2),
            (0, 3, 0),
            (0, 2, 1),
            (0, 1, 2),
            (0, 0, 3),
        ]
    );

    // =========
    // lcart = 4
    // =========
    let co_4_lex = CartOrder::lex(4);
    assert_eq!(
        co_4_lex.cart_tuples,
        vec![
            (4, 0, 0),
            (3, 1, 0),
            (3, 0, 1),
            (2, 2, 0),
            (2, 1, 1),
            (2, 0, 2),
            (1, 3, 0),
            (1, 2, 1),
            (1, 1, 2),
            (1, 0, 3),
            (0, 4, 0),
            (0, 3, 1),
            (0, 2, 2),
            (0, 1, 3),
            (0, 0, 4),
        ]
    );
}

#[test]
fn test_ao_basis_cart_tuple_to_str() {
    assert_eq!(cart_tuple_to_str(&(0, 0, 0)), "1");
    assert_eq!(cart_tuple_to_str(&(1, 0, 0)), "x");
    assert_eq!(cart_tuple_to_str(&(1, 2, 0)), "xyy");
    assert_eq!(cart_tuple_to_str(&(0, 1, 3)), "yzzz");
}

proptest! {
    #[test]
    fn test_ao_basis_cartorder_lex_properties(lcart in 0u32..=8) {
        let co = CartOrder::lex(lcart);
        let l = lcart as usize;
        prop_assert_eq!(co.cart_tuples.len(), (l + 1) * (l + 2) / 2);
        prop_assert!(co.iter().all(|(lx, ly, lz)| lx + ly + lz == lcart));
        prop_assert_eq!(co.iter().collect::<HashSet<_>>().len(), co.cart_tuples.len());

        // Strictly decreasing in (lx, ly) lexicographic order.
        prop_assert!(co
            .cart_tuples
            .windows(2)
            .all(|pair| (pair[0].0, pair[0].1) > (pair[1].0, pair[1].1)));
    }
}

fn water() -> Vec<Atom> {
    let emap = ElementMap::new();
    vec![
        Atom::from_symbol("O", Point3::new(0.0, 0.0, 0.2), LengthUnit::Bohr, &emap),
        Atom::from_symbol("H", Point3::new(0.0, 1.4, -0.9), LengthUnit::Bohr, &emap),
        Atom::from_symbol("H", Point3::new(0.0, -1.4, -0.9), LengthUnit::Bohr, &emap),
    ]
}

fn water_basis_map() -> IndexMap<String, Vec<Shell>> {
    let origin = Point3::origin();
    let mut basis_map = IndexMap::new();
    basis_map.insert(
        "O".to_string(),
        vec![
            Shell::new("S", origin, &[Primitive::new(5484.67, 0.0018311)]).unwrap(),
            Shell::new("P", origin, &[Primitive::new(15.5396, -0.1107775)]).unwrap(),
            Shell::new("D", origin, &[Primitive::new(0.8, 1.0)]).unwrap(),
        ],
    );
    basis_map.insert(
        "H".to_string(),
        vec![Shell::new("S", origin, &[Primitive::new(18.731137, 0.0334946)]).unwrap()],
    );
    basis_map
}

#[test]
fn test_ao_basis_set_from_geometry() {
    let atoms = water();
    let basis_map = water_basis_map();
    let bs = BasisSet::from_geometry("test", &atoms, &basis_map).unwrap();

    assert_eq!(bs.n_shells(), 5);
    assert_eq!(bs.n_funcs(), 1 + 3 + 6 + 1 + 1);
    assert_eq!(bs.centers.len(), 3);
    assert_eq!(
        bs.n_funcs(),
        bs.shells().map(|(_, shell)| shell.n_cart_funcs()).sum::<usize>()
    );

    let bfs = bs.basis_functions();
    assert_eq!(bfs[0].cart_tuple, (0, 0, 0));
    assert_eq!(bfs[1].cart_tuple, (1, 0, 0));
    assert_eq!(bfs[3].cart_tuple, (0, 0, 1));
    assert_eq!(bfs[4].cart_tuple, (2, 0, 0));
    assert_eq!(bfs[9].cart_tuple, (0, 0, 2));
    assert!(bfs[..10].iter().all(|bf| bf.atom_index == 0));
    assert_eq!(bfs[10].atom_index, 1);
    assert_eq!(bfs[10].center, Point3::new(0.0, 1.4, -0.9));
    assert_eq!(bfs[11].atom_index, 2);
    assert_eq!(bfs[11].shell_index, 4);
    assert_eq!(bfs[11].center, Point3::new(0.0, -1.4, -0.9));

    // Functions of one shell share its primitives.
    assert!(Arc::ptr_eq(&bfs[4].primitives, &bfs[9].primitives));
    assert!(Arc::ptr_eq(&bfs[10].primitives, &bfs[11].primitives));
}

#[test]
fn test_ao_basis_set_single_s_shell() {
    let emap = ElementMap::new();
    let atoms = vec![Atom::from_symbol(
        "He",
        Point3::new(0.0, 0.0, 0.0),
        LengthUnit::Bohr,
        &emap,
    )];
    let prims = [Primitive::new(6.36242139, 0.15432897), Primitive::new(1.158923, 0.53532814)];
    let mut basis_map = IndexMap::new();
    basis_map.insert(
        "HE".to_string(),
        vec![Shell::new("s", Point3::origin(), &prims).unwrap()],
    );
    let bs = BasisSet::from_geometry("sto-3g", &atoms, &basis_map).unwrap();
    assert_eq!(bs.n_funcs(), 1);
    assert_eq!(bs.basis_functions()[0].cart_tuple, (0, 0, 0));
    assert_eq!(&*bs.basis_functions()[0].primitives, &prims);
}

#[test]
fn test_ao_basis_set_missing_element() {
    let atoms = water();
    let mut basis_map = water_basis_map();
    basis_map.shift_remove("H");
    let bs = BasisSet::from_geometry("test", &atoms, &basis_map).unwrap();
    assert_eq!(bs.centers.len(), 3);
    assert!(bs.shells().all(|(atom_index, _)| atom_index == 0));
    assert!(bs.basis_functions().iter().all(|bf| bf.atom_index == 0));
}

#[test]
fn test_ao_basis_set_ghost_centre() {
    let emap = ElementMap::new();
    let atoms = vec![
        Atom::from_symbol("H", Point3::origin(), LengthUnit::Bohr, &emap),
        Atom::from_charge(0, Point3::new(0.0, 0.0, 0.7), LengthUnit::Bohr, &emap).unwrap(),
    ];
    let mut basis_map = IndexMap::new();
    basis_map.insert(
        "H".to_string(),
        vec![Shell::new("S", Point3::origin(), &[Primitive::new(0.5, 1.0)]).unwrap()],
    );
    let bs = BasisSet::from_geometry("ghost", &atoms, &basis_map).unwrap();
    assert_eq!(bs.n_funcs(), 1);
    assert_eq!(bs.centers[1], Point3::new(0.0, 0.0, 0.7));
}

#[test]
fn test_ao_basis_set_from_shells() {
    let centers = vec![Point3::origin(), Point3::new(0.0, 0.0, 1.4)];
    let d = Shell::new("D", centers[1], &[Primitive::new(0.8, 1.0)]).unwrap();
    let s = Shell::new("S", centers[0], &[Primitive::new(1.0, 1.0)]).unwrap();

    let mut bs = BasisSet::from_shells("molden", centers.clone(), vec![(1, d.clone()), (0, s)])
        .unwrap();
    assert_eq!(bs.n_funcs(), 7);
    assert_eq!(bs.basis_functions()[6].atom_index, 0);

    assert_eq!(bs.n_ao_funcs(), 6);
    bs.set_cartesian(&[2]);
    assert!(bs.shells().all(|(_, shell)| shell.pure != (shell.l == 2)));
    assert_eq!(bs.n_ao_funcs(), 7);

    bs.normalise().unwrap();
    assert_eq!(bs.n_funcs(), 7);
    assert!(!Arc::ptr_eq(
        &bs.basis_functions()[0].primitives,
        &d.shared_primitives()
    ));

    assert!(BasisSet::from_shells("bad", centers, vec![(2, d)]).is_err());
}
