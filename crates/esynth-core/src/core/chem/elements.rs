use phf::{Map, phf_map};

/// Atomic numbers for the elements that appear in fragment libraries.
///
/// `*` is the attachment dummy used by some libraries to mark where a removed
/// substituent used to sit; it carries atomic number 0.
static ATOMIC_NUMBERS: Map<&'static str, u8> = phf_map! {
    "*" => 0,
    "H" => 1, "He" => 2,
    "Li" => 3, "Be" => 4, "B" => 5, "C" => 6, "N" => 7, "O" => 8, "F" => 9, "Ne" => 10,
    "Na" => 11, "Mg" => 12, "Al" => 13, "Si" => 14, "P" => 15, "S" => 16, "Cl" => 17, "Ar" => 18,
    "K" => 19, "Ca" => 20, "Mn" => 25, "Fe" => 26, "Co" => 27, "Ni" => 28, "Cu" => 29, "Zn" => 30,
    "Ga" => 31, "Ge" => 32, "As" => 33, "Se" => 34, "Br" => 35, "Kr" => 36,
    "Sn" => 50, "Sb" => 51, "Te" => 52, "I" => 53, "Xe" => 54,
    "Pt" => 78, "Au" => 79, "Hg" => 80, "Pb" => 82, "Bi" => 83,
};

pub fn atomic_number(symbol: &str) -> Option<u8> {
    ATOMIC_NUMBERS.get(symbol.trim()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_organic_elements_resolve() {
        assert_eq!(atomic_number("C"), Some(6));
        assert_eq!(atomic_number("N"), Some(7));
        assert_eq!(atomic_number("O"), Some(8));
        assert_eq!(atomic_number("Cl"), Some(17));
        assert_eq!(atomic_number("Br"), Some(35));
    }

    #[test]
    fn dummy_atom_has_atomic_number_zero() {
        assert_eq!(atomic_number("*"), Some(0));
    }

    #[test]
    fn lookup_is_case_sensitive_and_trims() {
        assert_eq!(atomic_number(" S "), Some(16));
        assert_eq!(atomic_number("CL"), None);
        assert_eq!(atomic_number("Q"), None);
    }
}
