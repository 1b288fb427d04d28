use approx::assert_relative_eq;
use nalgebra::Point3;

use crate::auxiliary::atom::{normalise_symbol, Atom, ElementMap, LengthUnit, ANG_TO_BOHR};

#[test]
fn test_atom_normalise_symbol() {
    assert_eq!(normalise_symbol("h"), "H");
    assert_eq!(normalise_symbol(" Cl "), "CL");
    assert_eq!(normalise_symbol("X"), "X");
}

#[test]
fn test_atom_element_map() {
    let emap = ElementMap::new();
    assert_eq!(emap.atomic_number("o"), Some(8));
    assert_eq!(emap.atomic_number("Cl"), Some(17));
    assert_eq!(emap.atomic_number("X"), None);
    assert_eq!(emap.symbol(26), Some("FE"));
    assert_eq!(emap.symbol(1000), None);
}

#[test]
fn test_atom_from_charge() {
    let emap = ElementMap::new();
    let c = Atom::from_charge(6, Point3::new(0.0, 1.0, 2.0), LengthUnit::Bohr, &emap).unwrap();
    assert_eq!(c.atomic_symbol, "C");
    assert_eq!(c.atomic_number, Some(6));

    let ghost = Atom::from_charge(0, Point3::origin(), LengthUnit::Bohr, &emap).unwrap();
    assert_eq!(ghost.atomic_symbol, "X");
    assert!(ghost.atomic_number.is_none());

    assert!(Atom::from_charge(500, Point3::origin(), LengthUnit::Bohr, &emap).is_err());
}

#[test]
fn test_atom_to_bohr_idempotent() {
    let emap = ElementMap::new();
    let mut atom = Atom::from_symbol(
        "n",
        Point3::new(1.0, -2.0, 0.5),
        LengthUnit::Angstrom,
        &emap,
    );
    assert_eq!(atom.atomic_symbol, "N");
    atom.to_bohr();
    assert_eq!(atom.unit, LengthUnit::Bohr);
    assert_relative_eq!(atom.coordinates[0], ANG_TO_BOHR);
    assert_relative_eq!(atom.coordinates[1], -2.0 * ANG_TO_BOHR);
    assert_relative_eq!(atom.coordinates[2], 0.5 * ANG_TO_BOHR);

    atom.to_bohr();
    assert_relative_eq!(atom.coordinates[0], ANG_TO_BOHR);

    let mut bohr_atom = Atom::from_symbol("H", Point3::new(1.0, 0.0, 0.0), LengthUnit::Bohr, &emap);
    bohr_atom.to_bohr();
    assert_relative_eq!(bohr_atom.coordinates[0], 1.0);
}
