use crate::param::records::{ElementRecord, ShellRecord};

/// (l, n, Slater exponent, reference occupation, self-energy in eV)
type RawShell = (u8, u8, f64, f64, f64);

/// Built-in element data:
/// symbol, Z, shells, hardness, Hubbard derivative, EN, rep. alpha, rep. Z_eff, C6, vdW radius
#[allow(clippy::type_complexity)]
const ELEMENTS: [(&str, u8, &[RawShell], f64, f64, f64, f64, f64, f64, f64); 7] = [
    (
        "H", 1,
        &[(0, 1, 1.230000, 1.0, -10.707211)],
        0.405771, 0.080000, 2.20, 2.213717, 1.105388, 3.09, 2.00,
    ),
    (
        "C", 6,
        &[(0, 2, 2.096432, 2.0, -13.970922), (1, 2, 1.800000, 2.0, -10.063292)],
        0.538015, 0.150000, 2.55, 1.247655, 4.231078, 18.14, 3.21,
    ),
    (
        "N", 7,
        &[(0, 2, 2.339881, 2.0, -16.686243), (1, 2, 2.014332, 3.0, -12.523956)],
        0.461493, 0.120000, 3.04, 1.682689, 5.242592, 12.80, 2.96,
    ),
    (
        "O", 8,
        &[(0, 2, 2.439742, 2.0, -20.229985), (1, 2, 2.137023, 4.0, -15.503117)],
        0.451896, 0.100000, 3.44, 2.165712, 5.784415, 10.40, 2.87,
    ),
    (
        "F", 9,
        &[(0, 2, 2.416597, 2.0, -23.655945), (1, 2, 2.308667, 5.0, -15.732919)],
        0.531518, 0.060000, 3.98, 2.421394, 7.021486, 7.20, 2.74,
    ),
    (
        "S", 16,
        &[(0, 3, 2.193000, 2.0, -20.029654), (1, 3, 1.891000, 4.0, -11.377694)],
        0.325042, 0.110000, 2.58, 1.214553, 14.995090, 134.00, 3.40,
    ),
    (
        "Cl", 17,
        &[(0, 3, 2.221000, 2.0, -29.278781), (1, 3, 2.010000, 5.0, -12.673758)],
        0.384482, 0.090000, 3.16, 1.577144, 17.353134, 94.60, 3.33,
    ),
];

/// Element records of the built-in tables. The p-shell self-energies are shifted by
/// `p_shift` (in eV).
pub(crate) fn builtin_elements(p_shift: f64) -> Vec<ElementRecord> {
    ELEMENTS
        .iter()
        .map(
            |(symbol, number, shells, hardness, gam3, en, alpha, zeff, c6, rvdw)| ElementRecord {
                symbol: symbol.to_string(),
                number: *number,
                shells: shells
                    .iter()
                    .map(|(l, n, zeta, occ, h)| ShellRecord {
                        l: *l,
                        n: *n,
                        exponent: *zeta,
                        occupation: *occ,
                        self_energy: if *l == 1 { h + p_shift } else { *h },
                    })
                    .collect(),
                hardness: *hardness,
                hubbard_derivative: *gam3,
                electronegativity: *en,
                rep_alpha: *alpha,
                rep_zeff: *zeff,
                c6: *c6,
                vdw_radius: *rvdw,
            },
        )
        .collect()
}
