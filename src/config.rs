//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::curve::{BelowFloor, CurveMode};
use crate::fuel::{ELECTRIC_BTU_PER_KWH, ELECTRIC_KG_CO2_PER_KWH, FuelKind, FuelProfile};
use crate::sim::season::{HeatingSeason, MonthDay};
use crate::sim::types::DispatchSettings;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the reference analysis (oil baseline,
/// 65 °F setpoint, heating from September 15 to June 1). Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use [`ScenarioConfig::baseline`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Thermostat setpoint and heating season.
    #[serde(default)]
    pub building: BuildingConfig,
    /// Fuel of the existing heating system.
    #[serde(default)]
    pub baseline: FuelConfig,
    /// Fuel of the supplemental system; defaults to the baseline fuel.
    #[serde(default)]
    pub supplemental: Option<FuelConfig>,
    /// Electricity tariff and grid emissions.
    #[serde(default)]
    pub electricity: ElectricityConfig,
    /// Selected heat pump and curve model.
    #[serde(default)]
    pub heat_pump: HeatPumpConfig,
    /// Dispatch modeling assumptions.
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Thermostat setpoint and heating season.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildingConfig {
    /// Indoor setpoint (°F).
    pub indoor_setpoint_f: f64,
    /// Calendar day the heating system is switched on (`"MM-DD"`).
    pub turn_on: MonthDay,
    /// Calendar day the heating system is switched off (`"MM-DD"`).
    pub turn_off: MonthDay,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            indoor_setpoint_f: 65.0,
            turn_on: MonthDay::SEPTEMBER_15,
            turn_off: MonthDay::JUNE_1,
        }
    }
}

/// A fuel selection with optional overrides of its standard constants.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FuelConfig {
    /// Fuel kind. When unset, the delivery file header decides (oil otherwise).
    pub fuel: Option<FuelKind>,
    /// Price per fuel unit.
    pub price: Option<f64>,
    /// Seasonal efficiency of the heating appliance (0.0–1.0].
    pub hvac_efficiency: Option<f64>,
    /// Energy content (BTU per fuel unit).
    pub energy_content: Option<f64>,
    /// Emissions (kg CO2eq per fuel unit).
    pub kg_co2_per_unit: Option<f64>,
}

impl FuelConfig {
    /// Resolves the fuel profile, falling back to `inferred` then oil.
    pub fn profile(&self, inferred: Option<FuelKind>) -> FuelProfile {
        let kind = self.fuel.or(inferred).unwrap_or(FuelKind::Oil);
        let mut profile = kind.profile();
        if let Some(price) = self.price {
            profile.price = price;
        }
        if let Some(eff) = self.hvac_efficiency {
            profile.hvac_efficiency = eff;
        }
        if let Some(energy) = self.energy_content {
            profile.energy_content = energy;
        }
        if let Some(co2) = self.kg_co2_per_unit {
            profile.kg_co2_per_unit = co2;
        }
        profile
    }
}

/// Electricity tariff and grid emissions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElectricityConfig {
    /// Price per kWh.
    pub price_per_kwh: f64,
    /// Grid emissions (kg CO2eq per kWh).
    pub kg_co2_per_kwh: f64,
    /// Energy content of one kWh (BTU).
    pub energy_content_btu: f64,
}

impl Default for ElectricityConfig {
    fn default() -> Self {
        Self {
            price_per_kwh: 0.15,
            kg_co2_per_kwh: ELECTRIC_KG_CO2_PER_KWH,
            energy_content_btu: ELECTRIC_BTU_PER_KWH,
        }
    }
}

/// Selected heat pump and curve model.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeatPumpConfig {
    /// Catalog identifier (model name) of the heat pump to analyse.
    pub model: String,
    /// How capacity and COP are derived from the calibration points.
    pub curve_mode: CurveMode,
    /// Behavior at and below the coldest calibration point.
    pub below_floor: BelowFloor,
}

/// Dispatch modeling assumptions.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Supplemental hours closer than this to the hour that opened the
    /// previous supplemental event are part of that event.
    pub event_window_hours: u32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            event_window_hours: 24,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"building.turn_on"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ScenarioConfig {
    /// Returns the reference scenario.
    pub fn baseline() -> Self {
        Self {
            building: BuildingConfig::default(),
            baseline: FuelConfig::default(),
            supplemental: None,
            electricity: ElectricityConfig::default(),
            heat_pump: HeatPumpConfig::default(),
            dispatch: DispatchConfig::default(),
        }
    }

    /// Reference scenario, but the heat pump shuts off at and below its
    /// coldest rated temperature instead of holding its rated output.
    pub fn cut_out() -> Self {
        Self {
            heat_pump: HeatPumpConfig {
                below_floor: BelowFloor::CutOut,
                ..HeatPumpConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "cut_out"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::baseline()),
            "cut_out" => Ok(Self::cut_out()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Heating season predicate configured by the `[building]` section.
    pub fn heating_season(&self) -> HeatingSeason {
        HeatingSeason::new(
            self.building.indoor_setpoint_f,
            self.building.turn_on,
            self.building.turn_off,
        )
    }

    /// Resolves baseline and supplemental fuels and packages everything the
    /// estimator and the dispatch simulator consume.
    ///
    /// `inferred` is the fuel named in the delivery file header, if any.
    pub fn dispatch_settings(&self, inferred: Option<FuelKind>) -> DispatchSettings {
        let baseline = self.baseline.profile(inferred);
        let supplemental = match &self.supplemental {
            Some(supp) => supp.profile(Some(baseline.kind)),
            None => baseline.clone(),
        };
        DispatchSettings {
            season: self.heating_season(),
            baseline,
            supplemental,
            electricity: self.electricity.clone(),
            event_window: Duration::hours(i64::from(self.dispatch.event_window_hours)),
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !self.building.indoor_setpoint_f.is_finite() {
            errors.push(ConfigError {
                field: "building.indoor_setpoint_f".into(),
                message: "must be a finite temperature".into(),
            });
        }
        if self.building.turn_on == self.building.turn_off {
            errors.push(ConfigError {
                field: "building.turn_on".into(),
                message: "must differ from building.turn_off".into(),
            });
        }

        validate_fuel(&self.baseline, "baseline", &mut errors);
        if let Some(supp) = &self.supplemental {
            validate_fuel(supp, "supplemental", &mut errors);
        }

        let elec = &self.electricity;
        if !(elec.price_per_kwh >= 0.0) {
            errors.push(ConfigError {
                field: "electricity.price_per_kwh".into(),
                message: "must be >= 0".into(),
            });
        }
        if !(elec.kg_co2_per_kwh >= 0.0) {
            errors.push(ConfigError {
                field: "electricity.kg_co2_per_kwh".into(),
                message: "must be >= 0".into(),
            });
        }
        if !(elec.energy_content_btu > 0.0) {
            errors.push(ConfigError {
                field: "electricity.energy_content_btu".into(),
                message: "must be > 0".into(),
            });
        }

        if self.dispatch.event_window_hours == 0 {
            errors.push(ConfigError {
                field: "dispatch.event_window_hours".into(),
                message: "must be > 0".into(),
            });
        }

        errors
    }
}

fn validate_fuel(fuel: &FuelConfig, section: &str, errors: &mut Vec<ConfigError>) {
    if let Some(price) = fuel.price {
        if !(price >= 0.0) {
            errors.push(ConfigError {
                field: format!("{section}.price"),
                message: "must be >= 0".into(),
            });
        }
    }
    if let Some(eff) = fuel.hvac_efficiency {
        if !(eff > 0.0 && eff <= 1.0) {
            errors.push(ConfigError {
                field: format!("{section}.hvac_efficiency"),
                message: "must be in (0.0, 1.0]".into(),
            });
        }
    }
    if let Some(energy) = fuel.energy_content {
        if !(energy > 0.0) {
            errors.push(ConfigError {
                field: format!("{section}.energy_content"),
                message: "must be > 0".into(),
            });
        }
    }
    if let Some(co2) = fuel.kg_co2_per_unit {
        if !(co2 >= 0.0) {
            errors.push(ConfigError {
                field: format!("{section}.kg_co2_per_unit"),
                message: "must be >= 0".into(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[building]
indoor_setpoint_f = 68.0
turn_on = "10-01"
turn_off = "05-15"

[baseline]
fuel = "propane"
price = 2.80

[supplemental]
fuel = "electric"

[electricity]
price_per_kwh = 0.22

[heat_pump]
model = "FH15NA"
curve_mode = "quadratic"
below_floor = "cut_out"

[dispatch]
event_window_hours = 12
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        let cfg = cfg.as_ref();
        assert_eq!(cfg.map(|c| c.building.indoor_setpoint_f), Some(68.0));
        assert_eq!(cfg.map(|c| c.building.turn_on), MonthDay::new(10, 1).ok());
        assert_eq!(cfg.map(|c| c.heat_pump.curve_mode), Some(CurveMode::Quadratic));
        assert_eq!(cfg.map(|c| c.heat_pump.below_floor), Some(BelowFloor::CutOut));
        assert_eq!(cfg.map(|c| c.dispatch.event_window_hours), Some(12));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[building]
indoor_setpoint_f = 65.0
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn invalid_calendar_day_is_rejected_at_parse() {
        let toml = r#"
[building]
turn_on = "02-30"
"#;
        let err = ScenarioConfig::from_toml_str(toml);
        assert!(err.is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[electricity]
price_per_kwh = 0.30
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.electricity.price_per_kwh), Some(0.30));
        assert_eq!(cfg.as_ref().map(|c| c.building.indoor_setpoint_f), Some(65.0));
        assert_eq!(cfg.as_ref().map(|c| c.dispatch.event_window_hours), Some(24));
        assert_eq!(
            cfg.as_ref().map(|c| c.heat_pump.curve_mode),
            Some(CurveMode::Piecewise)
        );
    }

    #[test]
    fn validation_catches_bad_efficiency() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.baseline.hvac_efficiency = Some(1.5);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "baseline.hvac_efficiency"));
    }

    #[test]
    fn validation_catches_zero_event_window() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.dispatch.event_window_hours = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "dispatch.event_window_hours"));
    }

    #[test]
    fn supplemental_defaults_to_baseline_fuel() {
        let cfg = ScenarioConfig::baseline();
        let settings = cfg.dispatch_settings(Some(FuelKind::Propane));
        assert_eq!(settings.baseline.kind, FuelKind::Propane);
        assert_eq!(settings.supplemental, settings.baseline);
        assert_eq!(settings.event_window, Duration::hours(24));
    }

    #[test]
    fn explicit_fuel_wins_over_header_inference() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.baseline.fuel = Some(FuelKind::Gas);
        cfg.baseline.price = Some(1.25);
        let settings = cfg.dispatch_settings(Some(FuelKind::Oil));
        assert_eq!(settings.baseline.kind, FuelKind::Gas);
        assert_eq!(settings.baseline.price, 1.25);
        assert_eq!(settings.baseline.hvac_efficiency, 0.90);
    }
}
