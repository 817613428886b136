use crate::constants::{OCEAN_NITRATE, OCEAN_SALINITY, OXYGEN_SATURATION};
use crate::timeseries::FloatValue;
use ode_solvers::Vector4;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Vector form of [`EstuaryState`] used by the integrators
///
/// Components are ordered as in [`StateField::ALL`].
pub type ModelState = Vector4<FloatValue>;

/// The quantities tracked by the estuary model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateField {
    Salinity,
    TidalHeight,
    Nitrate,
    Oxygen,
}

impl StateField {
    pub const ALL: [StateField; 4] = [
        StateField::Salinity,
        StateField::TidalHeight,
        StateField::Nitrate,
        StateField::Oxygen,
    ];

    /// Position of the field within a [`ModelState`]
    pub fn index(self) -> usize {
        match self {
            StateField::Salinity => 0,
            StateField::TidalHeight => 1,
            StateField::Nitrate => 2,
            StateField::Oxygen => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StateField::Salinity => "salinity",
            StateField::TidalHeight => "tidal_height",
            StateField::Nitrate => "nitrate",
            StateField::Oxygen => "oxygen",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            StateField::Salinity => "g / kg",
            StateField::TidalHeight => "m",
            StateField::Nitrate | StateField::Oxygen => "µmol / L",
        }
    }

    /// Concentrations must stay non-negative, tidal height may take either sign
    pub fn is_concentration(self) -> bool {
        !matches!(self, StateField::TidalHeight)
    }
}

impl fmt::Display for StateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Instantaneous state of the well-mixed estuary box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstuaryState {
    /// unit: g / kg
    pub salinity: FloatValue,
    /// Displacement of the sea surface from the mean depth
    /// unit: m
    pub tidal_height: FloatValue,
    /// unit: µmol / L
    pub nitrate: FloatValue,
    /// unit: µmol / L
    pub oxygen: FloatValue,
}

impl EstuaryState {
    /// Starting point of every run: estuary water identical to the ocean at mean depth
    pub fn baseline() -> Self {
        Self {
            salinity: OCEAN_SALINITY,
            tidal_height: 0.0,
            nitrate: OCEAN_NITRATE,
            oxygen: OXYGEN_SATURATION,
        }
    }

    pub fn get(&self, field: StateField) -> FloatValue {
        match field {
            StateField::Salinity => self.salinity,
            StateField::TidalHeight => self.tidal_height,
            StateField::Nitrate => self.nitrate,
            StateField::Oxygen => self.oxygen,
        }
    }

    pub fn to_vector(&self) -> ModelState {
        ModelState::new(self.salinity, self.tidal_height, self.nitrate, self.oxygen)
    }

    pub fn from_vector(y: &ModelState) -> Self {
        Self {
            salinity: y[StateField::Salinity.index()],
            tidal_height: y[StateField::TidalHeight.index()],
            nitrate: y[StateField::Nitrate.index()],
            oxygen: y[StateField::Oxygen.index()],
        }
    }

    /// The first field, in [`StateField::ALL`] order, outside of its physical domain
    ///
    /// Any non-finite value is invalid, as is a negative concentration.
    pub fn first_violation(&self) -> Option<(StateField, FloatValue)> {
        StateField::ALL
            .into_iter()
            .map(|field| (field, self.get(field)))
            .find(|(field, value)| !value.is_finite() || (field.is_concentration() && *value < 0.0))
    }
}

impl Default for EstuaryState {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Rate of change of every state field
///
/// Each process of the model reports its contribution as a separate tendency;
/// the derivative of the state is their sum.
/// unit: field unit / day
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Tendency {
    pub salinity: FloatValue,
    pub tidal_height: FloatValue,
    pub nitrate: FloatValue,
    pub oxygen: FloatValue,
}

impl Tendency {
    pub const ZERO: Tendency = Tendency {
        salinity: 0.0,
        tidal_height: 0.0,
        nitrate: 0.0,
        oxygen: 0.0,
    };

    pub fn get(&self, field: StateField) -> FloatValue {
        match field {
            StateField::Salinity => self.salinity,
            StateField::TidalHeight => self.tidal_height,
            StateField::Nitrate => self.nitrate,
            StateField::Oxygen => self.oxygen,
        }
    }

    pub fn is_zero(&self) -> bool {
        StateField::ALL.into_iter().all(|field| self.get(field) == 0.0)
    }

    /// Write the tendency into the vector layout used by the integrators
    pub fn write_to(&self, dy_dt: &mut ModelState) {
        for field in StateField::ALL {
            dy_dt[field.index()] = self.get(field);
        }
    }
}

impl Add for Tendency {
    type Output = Tendency;

    fn add(self, rhs: Self) -> Self::Output {
        Tendency {
            salinity: self.salinity + rhs.salinity,
            tidal_height: self.tidal_height + rhs.tidal_height,
            nitrate: self.nitrate + rhs.nitrate,
            oxygen: self.oxygen + rhs.oxygen,
        }
    }
}

impl Sum for Tendency {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Tendency::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_layout_matches_field_index() {
        let state = EstuaryState {
            salinity: 30.0,
            tidal_height: -0.5,
            nitrate: 12.0,
            oxygen: 200.0,
        };
        let y = state.to_vector();

        for field in StateField::ALL {
            assert_eq!(y[field.index()], state.get(field));
        }
        assert_eq!(EstuaryState::from_vector(&y), state);
    }

    #[test]
    fn negative_tidal_height_is_valid() {
        let state = EstuaryState {
            tidal_height: -0.9,
            ..EstuaryState::baseline()
        };
        assert_eq!(state.first_violation(), None);
    }

    #[test]
    fn negative_concentration_is_a_violation() {
        let state = EstuaryState {
            nitrate: -1e-12,
            oxygen: -5.0,
            ..EstuaryState::baseline()
        };
        assert_eq!(
            state.first_violation(),
            Some((StateField::Nitrate, -1e-12))
        );
    }

    #[test]
    fn non_finite_values_are_violations() {
        let state = EstuaryState {
            tidal_height: FloatValue::INFINITY,
            ..EstuaryState::baseline()
        };
        assert_eq!(
            state.first_violation(),
            Some((StateField::TidalHeight, FloatValue::INFINITY))
        );

        let state = EstuaryState {
            salinity: FloatValue::NAN,
            ..EstuaryState::baseline()
        };
        let (field, value) = state.first_violation().unwrap();
        assert_eq!(field, StateField::Salinity);
        assert!(value.is_nan());
    }

    #[test]
    fn tendencies_sum_per_field() {
        let a = Tendency {
            salinity: 1.0,
            oxygen: -2.0,
            ..Tendency::ZERO
        };
        let b = Tendency {
            nitrate: 3.0,
            oxygen: 0.5,
            ..Tendency::ZERO
        };
        let total: Tendency = [a, b, Tendency::ZERO].into_iter().sum();

        assert_eq!(
            total,
            Tendency {
                salinity: 1.0,
                tidal_height: 0.0,
                nitrate: 3.0,
                oxygen: -1.5,
            }
        );
        assert!(Tendency::ZERO.is_zero());
        assert!(!total.is_zero());

        let mut dy_dt = ModelState::zeros();
        total.write_to(&mut dy_dt);
        assert_eq!(dy_dt, ModelState::new(1.0, 0.0, 3.0, -1.5));
    }
}
