use phf::phf_map;

/// Conversion factor from Bohr to Angstrom.
pub const BOHR_TO_ANGS: f64 = 0.529177210903;
/// Conversion factor from electron volts to Hartree.
pub const EV_TO_HARTREE: f64 = 1.0 / 27.211386245988;
/// Hartree to electron volts
pub const HARTREE_TO_EV: f64 = 27.211386245988;
/// Boltzmann constant in Hartree / Kelvin
pub const K_BOLTZMANN: f64 = 3.166811563e-6;

/// Element symbols, indexed by the atomic number. The entry at index 0 is a dummy atom.
pub const ATOM_NAMES: [&str; 19] = [
    "X", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
    "Cl", "Ar",
];

/// Atomic numbers for lower-case element symbols.
pub static SYMBOL_TO_NUMBER: phf::Map<&'static str, u8> = phf_map! {
    "h" => 1,
    "he" => 2,
    "li" => 3,
    "be" => 4,
    "b" => 5,
    "c" => 6,
    "n" => 7,
    "o" => 8,
    "f" => 9,
    "ne" => 10,
    "na" => 11,
    "mg" => 12,
    "al" => 13,
    "si" => 14,
    "p" => 15,
    "s" => 16,
    "cl" => 17,
    "ar" => 18,
};

/// Look up the atomic number of an element symbol (case insensitive).
pub fn atomic_number(symbol: &str) -> Option<u8> {
    SYMBOL_TO_NUMBER
        .get(symbol.trim().to_lowercase().as_str())
        .copied()
}

/// Element symbol for an atomic number, `None` if the number is outside of the table.
pub fn element_symbol(number: u8) -> Option<&'static str> {
    match number {
        0 => None,
        n => ATOM_NAMES.get(n as usize).copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_round_trip_through_the_table() {
        assert_eq!(atomic_number("C"), Some(6));
        assert_eq!(atomic_number(" cl "), Some(17));
        assert_eq!(atomic_number("Xx"), None);
        assert_eq!(element_symbol(8), Some("O"));
        assert_eq!(element_symbol(0), None);
        assert_eq!(element_symbol(100), None);
    }
}
