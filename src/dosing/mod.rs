use crate::error::{PKError, PKResult};
use crate::models::DoseEvent;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_SERVINGS: u32 = 1;
pub const MAX_SERVINGS: u32 = 10;
pub const MIN_CUSTOM_MG: f64 = 1.0;
pub const MAX_CUSTOM_MG: f64 = 1000.0;
pub const MIN_INTERVAL_HOURS: f64 = 0.5;
pub const MAX_INTERVAL_HOURS: f64 = 24.0;

/// Coffee presets with their typical caffeine content, plus a custom serving.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoffeeType {
    Espresso,    // 30 ml
    Drip,        // 240 ml
    FrenchPress, // 240 ml
    ColdBrew,    // 240 ml
    Instant,     // 240 ml
    Decaf,       // 240 ml
    Cappuccino,  // 240 ml
    Latte,       // 240 ml
    Americano,   // single espresso shot
    Mocha,       // 240 ml
    Turkish,     // 60 ml
    Custom { mg_per_serving: f64 },
}

const PRESETS: [(&str, CoffeeType); 11] = [
    ("espresso", CoffeeType::Espresso),
    ("drip", CoffeeType::Drip),
    ("french-press", CoffeeType::FrenchPress),
    ("cold-brew", CoffeeType::ColdBrew),
    ("instant", CoffeeType::Instant),
    ("decaf", CoffeeType::Decaf),
    ("cappuccino", CoffeeType::Cappuccino),
    ("latte", CoffeeType::Latte),
    ("americano", CoffeeType::Americano),
    ("mocha", CoffeeType::Mocha),
    ("turkish", CoffeeType::Turkish),
];

impl CoffeeType {
    /// Resolves a menu key to a coffee type. The `custom` key takes its
    /// caffeine content from `custom_mg`; preset keys ignore it.
    pub fn resolve(key: &str, custom_mg: Option<f64>) -> PKResult<Self> {
        let key = key.trim().to_ascii_lowercase();

        if key == "custom" {
            let mg = custom_mg.ok_or_else(|| {
                PKError::Configuration("Custom coffee requires a mg-per-serving value".to_string())
            })?;
            let coffee = CoffeeType::Custom { mg_per_serving: mg };
            coffee.validate()?;
            return Ok(coffee);
        }

        PRESETS
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, coffee)| *coffee)
            .ok_or_else(|| PKError::Configuration(format!("Unknown coffee type: {}", key)))
    }

    pub fn key(&self) -> &'static str {
        match self {
            CoffeeType::Custom { .. } => "custom",
            preset => PRESETS
                .iter()
                .find(|(_, coffee)| coffee == preset)
                .map(|(name, _)| *name)
                .unwrap_or("custom"),
        }
    }

    /// Caffeine content of one serving (mg).
    pub fn mg_per_serving(&self) -> f64 {
        match self {
            CoffeeType::Espresso => 63.0,
            CoffeeType::Drip => 95.0,
            CoffeeType::FrenchPress => 100.0,
            CoffeeType::ColdBrew => 120.0,
            CoffeeType::Instant => 65.0,
            CoffeeType::Decaf => 5.0,
            CoffeeType::Cappuccino => 75.0,
            CoffeeType::Latte => 75.0,
            CoffeeType::Americano => 63.0,
            CoffeeType::Mocha => 80.0,
            CoffeeType::Turkish => 60.0,
            CoffeeType::Custom { mg_per_serving } => *mg_per_serving,
        }
    }

    fn validate(&self) -> PKResult<()> {
        if let CoffeeType::Custom { mg_per_serving } = self {
            if !mg_per_serving.is_finite()
                || *mg_per_serving < MIN_CUSTOM_MG
                || *mg_per_serving > MAX_CUSTOM_MG
            {
                return Err(PKError::Validation(format!(
                    "Custom caffeine content must be within [{}, {}] mg, got {}",
                    MIN_CUSTOM_MG, MAX_CUSTOM_MG, mg_per_serving
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for CoffeeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoffeeType::Custom { mg_per_serving } => write!(f, "custom ({} mg)", mg_per_serving),
            preset => f.write_str(preset.key()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub coffee: CoffeeType,
    pub servings: u32,
    pub event: DoseEvent,
}

/// Caller-owned list of doses, kept in entry order.
///
/// Removal pops the most recently entered dose, which is not necessarily the
/// latest one in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoseSchedule {
    entries: Vec<ScheduleEntry>,
}

impl DoseSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, coffee: CoffeeType, servings: u32, timestamp: f64) -> PKResult<()> {
        coffee.validate()?;
        validate_servings(servings)?;

        let amount = coffee.mg_per_serving() * servings as f64;
        let event = DoseEvent::new(amount, timestamp)?;

        info!(
            "Added {} x {} ({:.1} mg) at t={:.2} h",
            servings, coffee, amount, timestamp
        );
        self.entries.push(ScheduleEntry { coffee, servings, event });
        Ok(())
    }

    /// Adds `servings` single servings, the first at `first_timestamp` and each
    /// following one `interval_hours` later.
    pub fn add_spaced(
        &mut self,
        coffee: CoffeeType,
        servings: u32,
        first_timestamp: f64,
        interval_hours: f64,
    ) -> PKResult<()> {
        coffee.validate()?;
        validate_servings(servings)?;
        if !interval_hours.is_finite()
            || interval_hours < MIN_INTERVAL_HOURS
            || interval_hours > MAX_INTERVAL_HOURS
        {
            return Err(PKError::Validation(format!(
                "Dosing interval must be within [{}, {}] hours, got {}",
                MIN_INTERVAL_HOURS, MAX_INTERVAL_HOURS, interval_hours
            )));
        }

        // Validate every event before touching the schedule.
        let amount = coffee.mg_per_serving();
        let events = (0..servings)
            .map(|i| DoseEvent::new(amount, first_timestamp + i as f64 * interval_hours))
            .collect::<PKResult<Vec<_>>>()?;

        info!(
            "Added {} x {} every {:.1} h from t={:.2} h",
            servings, coffee, interval_hours, first_timestamp
        );
        self.entries.extend(
            events
                .into_iter()
                .map(|event| ScheduleEntry { coffee, servings: 1, event }),
        );
        Ok(())
    }

    /// Pops the most recently added entry; `None` when the schedule is empty.
    pub fn remove_last(&mut self) -> Option<ScheduleEntry> {
        let removed = self.entries.pop();
        match &removed {
            Some(entry) => info!(
                "Removed {} ({:.1} mg) at t={:.2} h",
                entry.coffee, entry.event.amount, entry.event.timestamp
            ),
            None => warn!("Remove requested on an empty dose schedule"),
        }
        removed
    }

    pub fn list(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn events(&self) -> impl Iterator<Item = &DoseEvent> + '_ {
        self.entries.iter().map(|entry| &entry.event)
    }

    pub fn total_caffeine(&self) -> f64 {
        self.events().map(|event| event.amount).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_servings(servings: u32) -> PKResult<()> {
    if !(MIN_SERVINGS..=MAX_SERVINGS).contains(&servings) {
        return Err(PKError::Validation(format!(
            "Servings must be within [{}, {}], got {}",
            MIN_SERVINGS, MAX_SERVINGS, servings
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_presets_and_custom() {
        assert_eq!(CoffeeType::resolve("drip", None).unwrap(), CoffeeType::Drip);
        assert_eq!(CoffeeType::resolve("Cold-Brew", None).unwrap().mg_per_serving(), 120.0);
        assert_eq!(
            CoffeeType::resolve("custom", Some(200.0)).unwrap(),
            CoffeeType::Custom { mg_per_serving: 200.0 }
        );
        for (key, coffee) in PRESETS.iter() {
            assert_eq!(coffee.key(), *key);
        }
    }

    #[test]
    fn test_resolve_errors() {
        assert!(matches!(
            CoffeeType::resolve("frappuccino", None),
            Err(PKError::Configuration(_))
        ));
        assert!(matches!(
            CoffeeType::resolve("custom", None),
            Err(PKError::Configuration(_))
        ));
        assert!(matches!(
            CoffeeType::resolve("custom", Some(1500.0)),
            Err(PKError::Validation(_))
        ));
    }

    #[test]
    fn test_add_multiplies_servings() {
        let mut schedule = DoseSchedule::new();
        schedule.add(CoffeeType::Espresso, 2, 8.0).unwrap();
        schedule.add(CoffeeType::Custom { mg_per_serving: 150.0 }, 1, 1.5).unwrap();

        let entries = schedule.list();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event.amount, 126.0);
        assert_eq!(entries[0].event.timestamp, 8.0);
        assert_eq!(entries[1].event.amount, 150.0);
        assert_eq!(schedule.total_caffeine(), 276.0);
    }

    #[test]
    fn test_add_rejects_out_of_range() {
        let mut schedule = DoseSchedule::new();
        assert!(schedule.add(CoffeeType::Drip, 0, 8.0).is_err());
        assert!(schedule.add(CoffeeType::Drip, 11, 8.0).is_err());
        assert!(schedule.add(CoffeeType::Custom { mg_per_serving: 0.5 }, 1, 8.0).is_err());
        assert!(schedule.add(CoffeeType::Drip, 1, -1.0).is_err());
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_add_accepts_range_endpoints() {
        let mut schedule = DoseSchedule::new();
        schedule.add(CoffeeType::Drip, 1, 0.0).unwrap();
        schedule.add(CoffeeType::Drip, 10, 0.0).unwrap();
        schedule.add(CoffeeType::Custom { mg_per_serving: 1.0 }, 1, 2.0).unwrap();
        schedule.add(CoffeeType::Custom { mg_per_serving: 1000.0 }, 10, 3.0).unwrap();
        assert!(CoffeeType::resolve("custom", Some(1.0)).is_ok());
        assert!(CoffeeType::resolve("custom", Some(1000.0)).is_ok());

        let amounts: Vec<f64> = schedule.events().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![95.0, 950.0, 1.0, 10000.0]);
    }

    #[test]
    fn test_remove_last_is_stack_order() {
        let mut schedule = DoseSchedule::new();
        schedule.add(CoffeeType::Latte, 1, 12.0).unwrap();
        schedule.add(CoffeeType::Mocha, 1, 7.0).unwrap();

        let removed = schedule.remove_last().unwrap();
        assert_eq!(removed.coffee, CoffeeType::Mocha);
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.list()[0].coffee, CoffeeType::Latte);

        schedule.remove_last();
        assert!(schedule.remove_last().is_none());
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_add_spaced() {
        let mut schedule = DoseSchedule::new();
        schedule.add_spaced(CoffeeType::Drip, 3, 8.0, 2.0).unwrap();

        let times: Vec<f64> = schedule.events().map(|e| e.timestamp).collect();
        assert_eq!(times, vec![8.0, 10.0, 12.0]);
        assert!(schedule.events().all(|e| e.amount == 95.0));

        assert!(schedule.add_spaced(CoffeeType::Drip, 2, 8.0, 0.25).is_err());
        assert_eq!(schedule.len(), 3);
    }
}
