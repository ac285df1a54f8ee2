use crate::types::property::Property;
use hashbrown::HashMap;
use ndarray::prelude::*;
use std::collections::BTreeMap;

/// Names of the properties that a single point calculation writes.
pub mod keys {
    pub const ENERGY: &str = "energy";
    pub const ELECTRONIC_ENERGY: &str = "electronic_energy";
    pub const REPULSION_ENERGY: &str = "repulsion_energy";
    pub const DISPERSION_ENERGY: &str = "dispersion_energy";
    pub const ORBITAL_ENERGIES: &str = "orbital_energies";
    pub const ORBITAL_OCCUPATIONS: &str = "orbital_occupations";
    pub const CHARGES: &str = "charges";
    pub const DENSITY_MATRIX: &str = "density_matrix";
    pub const HOMO_LUMO_GAP: &str = "homo_lumo_gap";
    pub const ITERATIONS: &str = "iterations";
    pub const CONVERGED: &str = "converged";
}

/// Container for the outcome of a calculation, keyed by property name. It is owned by the
/// caller; the calculator only writes into it.
#[derive(Debug, Default, Clone)]
pub struct Results {
    map: HashMap<&'static str, Property>,
}

impl Results {
    pub fn new() -> Self {
        Results {
            map: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.map.get(name)
    }

    /// Returns the Property without a reference and removes it from the dict
    pub fn take(&mut self, name: &str) -> Option<Property> {
        self.map.remove(name)
    }

    pub fn set<P: Into<Property>>(&mut self, name: &'static str, value: P) {
        self.map.insert(name, value.into());
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Total energy in Hartree.
    pub fn energy(&self) -> Option<f64> {
        self.get(keys::ENERGY).and_then(Property::as_double)
    }

    pub fn orbital_energies(&self) -> Option<ArrayView1<f64>> {
        self.get(keys::ORBITAL_ENERGIES).and_then(Property::as_array1)
    }

    pub fn occupations(&self) -> Option<ArrayView1<f64>> {
        self.get(keys::ORBITAL_OCCUPATIONS)
            .and_then(Property::as_array1)
    }

    /// Atomic partial charges, positive values correspond to a loss of electrons.
    pub fn charges(&self) -> Option<ArrayView1<f64>> {
        self.get(keys::CHARGES).and_then(Property::as_array1)
    }

    pub fn density_matrix(&self) -> Option<ArrayView2<f64>> {
        self.get(keys::DENSITY_MATRIX).and_then(Property::as_array2)
    }

    pub fn homo_lumo_gap(&self) -> Option<f64> {
        self.get(keys::HOMO_LUMO_GAP).and_then(Property::as_double)
    }

    pub fn iterations(&self) -> Option<usize> {
        self.get(keys::ITERATIONS).and_then(Property::as_int)
    }

    pub fn converged(&self) -> Option<bool> {
        self.get(keys::CONVERGED).and_then(Property::as_bool)
    }

    /// Sorted copy of all properties, used for the JSON output.
    pub fn to_sorted_map(&self) -> BTreeMap<&'static str, Property> {
        self.map.iter().map(|(k, v)| (*k, v.clone())).collect()
    }
}
