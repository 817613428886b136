use crate::forcing::{Biology, GasExchange, OceanExchange, RiverInflow, Tide};
use estuary_core::config::Configuration;
use estuary_core::constants::OCEAN_NITRATE;
use estuary_core::ivp::{StepInputs, IVP};
use estuary_core::state::{EstuaryState, ModelState, StateField, Tendency};
use estuary_core::timeseries::{FloatValue, OutputSeries, Time};
use serde::Serialize;

/// Window over which nitrate is averaged when limiting productivity
/// unit: day
const NUTRIENT_WINDOW: Time = 1.0;

/// Contribution of each process to the state derivative
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Contributions {
    pub tide: Tendency,
    pub ocean_exchange: Tendency,
    pub river: Tendency,
    pub gas_exchange: Tendency,
    pub biology: Tendency,
}

impl Contributions {
    pub fn total(&self) -> Tendency {
        [
            self.tide,
            self.ocean_exchange,
            self.river,
            self.gas_exchange,
            self.biology,
        ]
        .into_iter()
        .sum()
    }
}

/// Well-mixed estuary box coupled to a tidal ocean, a river and the atmosphere
///
/// The model holds no run state. Everything that changes during a run lives in the
/// state vector owned by the integrator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstuaryModel {
    configuration: Configuration,
    tide: Tide,
    ocean: OceanExchange,
    river: RiverInflow,
    gas_exchange: GasExchange,
    biology: Biology,
}

impl EstuaryModel {
    pub fn from_configuration(configuration: Configuration) -> Self {
        let tide = Tide::from_configuration(&configuration);
        Self {
            tide,
            ocean: OceanExchange::new(tide),
            river: RiverInflow::from_configuration(&configuration),
            gas_exchange: GasExchange::from_configuration(&configuration),
            biology: Biology::from_configuration(&configuration),
            configuration,
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn tide(&self) -> &Tide {
        &self.tide
    }

    pub fn contributions(
        &self,
        t: Time,
        state: &EstuaryState,
        inputs: &StepInputs,
    ) -> Contributions {
        Contributions {
            tide: self.tide.tendency(t),
            ocean_exchange: self.ocean.tendency(t, state),
            river: self.river.tendency(state),
            gas_exchange: self.gas_exchange.tendency(state),
            biology: self
                .biology
                .tendency(t, state, inputs.productivity_scale),
        }
    }

    /// Rate of change of every state field
    pub fn derivative(&self, t: Time, state: &EstuaryState, inputs: &StepInputs) -> Tendency {
        self.contributions(t, state, inputs).total()
    }

    /// Multiplier applied to productivity for the step starting at `t`
    ///
    /// With nutrient limitation enabled, production-phase steps scale productivity by
    /// the mean nitrate over the trailing day relative to the ocean nitrate.
    pub fn productivity_scale(&self, t: Time, history: &OutputSeries) -> FloatValue {
        if !self.configuration.nutrient_limitation() || t < 0.0 {
            return 1.0;
        }
        let window = history.trailing(NUTRIENT_WINDOW);
        if window.is_empty() {
            return 1.0;
        }
        let mean_nitrate =
            window.iter().map(|s| s.state.nitrate).sum::<FloatValue>() / window.len() as FloatValue;
        mean_nitrate / OCEAN_NITRATE
    }
}

impl IVP<Time, ModelState> for EstuaryModel {
    fn calculate_dy_dt(&self, t: Time, inputs: &StepInputs, y: &ModelState, dy_dt: &mut ModelState) {
        let state = EstuaryState::from_vector(y);
        self.derivative(t, &state, inputs).write_to(dy_dt);
    }

    fn step_inputs(&self, t: Time, history: &OutputSeries) -> StepInputs {
        StepInputs {
            productivity_scale: self.productivity_scale(t, history),
        }
    }

    fn apply_prescribed(&self, t: Time, y: &mut ModelState) {
        y[StateField::TidalHeight.index()] = self.tide.height(t);
    }
}
