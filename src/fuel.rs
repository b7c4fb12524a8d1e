//! Heating fuel kinds and their standard constants.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Electricity energy content (BTU per kWh).
pub const ELECTRIC_BTU_PER_KWH: f64 = 3412.0;

/// Grid electricity emissions (kg CO2eq per kWh), 722 lb/MWh.
pub const ELECTRIC_KG_CO2_PER_KWH: f64 = (722.0 / 2.2) * 1e-3;

/// Heating system fuel of the baseline (or supplemental) system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelKind {
    Oil,
    Gas,
    Electric,
    Propane,
    Other,
}

/// Constants describing one fuel as consumed by a heating system.
///
/// Prices are per fuel unit, energy content is BTU per fuel unit, and the
/// emissions factor is kg CO2eq per fuel unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelProfile {
    pub kind: FuelKind,
    pub name: String,
    pub units: String,
    pub price: f64,
    pub hvac_efficiency: f64,
    pub energy_content: f64,
    pub kg_co2_per_unit: f64,
}

impl FuelKind {
    /// Display name, also the text matched in delivery file headers.
    pub fn display_name(self) -> &'static str {
        match self {
            FuelKind::Oil => "Fuel Oil",
            FuelKind::Gas => "Natural Gas",
            FuelKind::Electric => "Electric Resistance",
            FuelKind::Propane => "Propane",
            FuelKind::Other => "Other",
        }
    }

    /// Standard constants for this fuel.
    ///
    /// Gas, propane, and "other" carry a placeholder price of 999 per unit;
    /// override it in the scenario when analysing those systems.
    pub fn profile(self) -> FuelProfile {
        let (units, price, hvac_efficiency, energy_content, kg_co2_per_btu) = match self {
            FuelKind::Oil => ("Gallons", 3.0, 0.75, 139_000.0, 72.93e-6),
            FuelKind::Gas => ("SCF", 999.0, 0.90, 1050.0, 53.06e-6),
            FuelKind::Electric => ("KWh", 0.15, 0.75, ELECTRIC_BTU_PER_KWH, 0.0),
            FuelKind::Propane => ("Gallons", 999.0, 0.75, 91_330.0, 62.0e-6),
            FuelKind::Other => ("???", 999.0, 1.0, 1.0, 0.0),
        };
        let kg_co2_per_unit = match self {
            FuelKind::Electric => ELECTRIC_KG_CO2_PER_KWH,
            _ => kg_co2_per_btu * energy_content,
        };
        FuelProfile {
            kind: self,
            name: self.display_name().to_string(),
            units: units.to_string(),
            price,
            hvac_efficiency,
            energy_content,
            kg_co2_per_unit,
        }
    }

    /// Infers the fuel from free header text such as `"Heat source: Propane"`.
    ///
    /// Only lines containing `Heat source:` are considered. Returns `None`
    /// when no such line names a known fuel.
    pub fn infer_from_header(text: &str) -> Option<Self> {
        text.lines()
            .filter(|line| line.contains("Heat source:"))
            .find_map(|line| {
                [
                    FuelKind::Oil,
                    FuelKind::Gas,
                    FuelKind::Electric,
                    FuelKind::Propane,
                ]
                .into_iter()
                .find(|kind| line.contains(kind.display_name()))
            })
    }
}

impl fmt::Display for FuelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oil_profile_matches_standard_constants() {
        let oil = FuelKind::Oil.profile();
        assert_eq!(oil.units, "Gallons");
        assert_eq!(oil.price, 3.0);
        assert_eq!(oil.hvac_efficiency, 0.75);
        assert_eq!(oil.energy_content, 139_000.0);
        assert!((oil.kg_co2_per_unit - 10.137).abs() < 1e-3);
    }

    #[test]
    fn electric_profile_uses_grid_factor() {
        let elec = FuelKind::Electric.profile();
        assert_eq!(elec.energy_content, 3412.0);
        assert!((elec.kg_co2_per_unit - 0.3282).abs() < 1e-4);
    }

    #[test]
    fn infers_fuel_from_header_line() {
        let header = "Fuel delivery data for: Town Hall\nHeat source: Propane\n";
        assert_eq!(FuelKind::infer_from_header(header), Some(FuelKind::Propane));
    }

    #[test]
    fn ignores_fuel_names_outside_heat_source_line() {
        let header = "Notes: switched from Natural Gas\nHeat source: Fuel Oil\n";
        assert_eq!(FuelKind::infer_from_header(header), Some(FuelKind::Oil));
        assert_eq!(FuelKind::infer_from_header("no header here"), None);
    }
}
