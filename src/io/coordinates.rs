use crate::constants::{atomic_number, BOHR_TO_ANGS};
use crate::io::InputError;
use crate::types::Structure;
use nalgebra::Vector3;
use std::fs;
use std::path::Path;

fn xyz_error<S: Into<String>>(line: usize, msg: S) -> InputError {
    InputError::Xyz {
        line,
        msg: msg.into(),
    }
}

/// Parse the first geometry of an xyz file. The coordinates are given in Angstrom and
/// converted to Bohr; the element may be given as symbol or as atomic number.
pub fn parse_xyz(content: &str) -> Result<Structure, InputError> {
    let mut lines = content.lines().enumerate();
    let n_atoms: usize = lines
        .next()
        .and_then(|(_, line)| line.trim().parse().ok())
        .ok_or_else(|| xyz_error(1, "expected the number of atoms"))?;
    // comment line
    lines.next();

    let mut numbers: Vec<u8> = Vec::with_capacity(n_atoms);
    let mut positions: Vec<Vector3<f64>> = Vec::with_capacity(n_atoms);
    for (idx, line) in lines.take(n_atoms) {
        let line_nr: usize = idx + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(xyz_error(line_nr, "expected an element and three coordinates"));
        }
        let number: u8 = match fields[0].parse::<u8>() {
            Ok(z) => z,
            Err(_) => atomic_number(fields[0]).ok_or_else(|| {
                xyz_error(line_nr, format!("unknown element '{}'", fields[0]))
            })?,
        };
        let mut xyz: [f64; 3] = [0.0; 3];
        for (value, field) in xyz.iter_mut().zip(fields[1..4].iter()) {
            *value = field
                .parse::<f64>()
                .map_err(|err| xyz_error(line_nr, format!("'{}': {}", field, err)))?;
        }
        numbers.push(number);
        // transform the coordinates from angstrom to bohr
        positions.push(Vector3::new(xyz[0], xyz[1], xyz[2]) / BOHR_TO_ANGS);
    }
    if numbers.len() != n_atoms {
        return Err(xyz_error(
            numbers.len() + 3,
            format!("expected {} atoms, found {}", n_atoms, numbers.len()),
        ));
    }
    Ok(Structure::new(numbers, positions)?)
}

pub fn read_xyz<P: AsRef<Path>>(path: P) -> Result<Structure, InputError> {
    let content: String = fs::read_to_string(path.as_ref()).map_err(|source| InputError::Io {
        path: path.as_ref().display().to_string(),
        source,
    })?;
    parse_xyz(&content)
}
