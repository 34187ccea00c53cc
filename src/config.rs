use crate::clock;
use crate::dosing::{CoffeeType, DoseSchedule};
use crate::error::PKResult;
use crate::profile::PhysiologicalProfile;
use crate::simulation::GridConfig;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub profile: PhysiologicalProfile,
    #[serde(default = "default_start")]
    pub start: String, // HH:MM origin of the simulation
    #[serde(default)]
    pub doses: Vec<DoseConfig>,
    #[serde(default)]
    pub grid: GridConfig,
    pub bedtime: Option<String>, // HH:MM
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoseConfig {
    pub coffee: String,
    #[serde(default = "default_servings")]
    pub servings: u32,
    pub time: String, // HH:MM
    pub custom_mg: Option<f64>,
    pub interval_hours: Option<f64>, // spaces servings out instead of taking them at once
}

fn default_start() -> String {
    "00:00".to_string()
}

fn default_servings() -> u32 {
    1
}

impl ScenarioConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> PKResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ScenarioConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PKResult<()> {
        self.profile.validate()?;
        self.grid.validate()?;
        let origin = self.origin()?;

        if let Some(bedtime) = &self.bedtime {
            clock::parse_clock(bedtime)?;
        }

        // Building a throwaway schedule checks coffee keys, servings and times.
        self.build_schedule_from(origin)?;
        Ok(())
    }

    pub fn origin(&self) -> PKResult<NaiveTime> {
        clock::parse_clock(&self.start)
    }

    pub fn build_schedule(&self) -> PKResult<DoseSchedule> {
        self.build_schedule_from(self.origin()?)
    }

    fn build_schedule_from(&self, origin: NaiveTime) -> PKResult<DoseSchedule> {
        let mut schedule = DoseSchedule::new();

        for dose in &self.doses {
            let coffee = CoffeeType::resolve(&dose.coffee, dose.custom_mg)?;
            let timestamp = clock::offset_of(origin, &dose.time)?;

            match dose.interval_hours {
                Some(interval) if dose.servings > 1 => {
                    schedule.add_spaced(coffee, dose.servings, timestamp, interval)?
                }
                _ => schedule.add(coffee, dose.servings, timestamp)?,
            }
        }

        Ok(schedule)
    }

    pub fn bedtime_offset(&self) -> PKResult<Option<f64>> {
        let origin = self.origin()?;
        self.bedtime
            .as_deref()
            .map(|bedtime| clock::offset_of(origin, bedtime))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PKError;
    use crate::profile::Sex;

    const SCENARIO: &str = r#"{
        "profile": {
            "weight": 65,
            "sex": "female",
            "smoking": "non-smoker",
            "liver": "normal",
            "metabolism": "slow"
        },
        "start": "06:00",
        "doses": [
            { "coffee": "espresso", "servings": 2, "time": "07:30" },
            { "coffee": "drip", "servings": 3, "time": "09:00", "interval_hours": 2.0 },
            { "coffee": "custom", "custom_mg": 180, "time": "15:00" }
        ],
        "grid": { "horizon_hours": 20, "step_minutes": 10 },
        "bedtime": "23:00"
    }"#;

    #[test]
    fn test_parse_scenario() {
        let config: ScenarioConfig = serde_json::from_str(SCENARIO).unwrap();
        config.validate().unwrap();
        assert_eq!(config.profile.sex, Sex::Female);
        assert_eq!(config.grid.step_minutes, 10);

        let schedule = config.build_schedule().unwrap();
        let events: Vec<(f64, f64)> = schedule.events().map(|e| (e.timestamp, e.amount)).collect();
        assert_eq!(
            events,
            vec![(1.5, 126.0), (3.0, 95.0), (5.0, 95.0), (7.0, 95.0), (9.0, 180.0)]
        );
        assert_eq!(config.bedtime_offset().unwrap(), Some(17.0));
    }

    #[test]
    fn test_defaults() {
        let json = r#"{
            "profile": { "weight": 70, "sex": "male", "smoking": "smoker",
                         "liver": "mild", "metabolism": "fast" },
            "bedtime": null
        }"#;
        let config: ScenarioConfig = serde_json::from_str(json).unwrap();
        config.validate().unwrap();
        assert_eq!(config.grid, GridConfig::default());
        assert!(config.build_schedule().unwrap().is_empty());
        assert_eq!(config.bedtime_offset().unwrap(), None);
    }

    #[test]
    fn test_unknown_coffee_is_configuration_error() {
        let mut config: ScenarioConfig = serde_json::from_str(SCENARIO).unwrap();
        config.doses[0].coffee = "irish".to_string();
        assert!(matches!(config.validate(), Err(PKError::Configuration(_))));
    }

    #[test]
    fn test_out_of_range_inputs_are_validation_errors() {
        let mut config: ScenarioConfig = serde_json::from_str(SCENARIO).unwrap();
        config.profile.weight = 200.0;
        assert!(matches!(config.validate(), Err(PKError::Validation(_))));

        let mut config: ScenarioConfig = serde_json::from_str(SCENARIO).unwrap();
        config.grid.step_minutes = 90;
        assert!(matches!(config.validate(), Err(PKError::Validation(_))));

        let mut config: ScenarioConfig = serde_json::from_str(SCENARIO).unwrap();
        config.doses[1].servings = 12;
        assert!(matches!(config.validate(), Err(PKError::Validation(_))));
    }
}
