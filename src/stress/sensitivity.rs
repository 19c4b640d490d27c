//! Two-way sensitivity grid of profit over a borrowing-rate × bond-yield sweep

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::projection::HORIZON_YEARS;

/// Upper bound on the number of values one axis may sweep
pub const MAX_SWEEP_POINTS: usize = 1_000;

/// A swept variable: `min..=max` in `step` increments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityAxis {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SensitivityAxis {
    pub fn new(name: &str, min: f64, max: f64, step: f64) -> Self {
        Self {
            name: name.to_string(),
            min,
            max,
            step,
        }
    }

    /// Parse a `min:max:step` sweep, e.g. `2:8:0.5`
    pub fn parse(name: &str, text: &str) -> Result<Self> {
        let invalid = |reason: String| EngineError::InvalidAxis {
            axis: name.to_string(),
            reason,
        };

        let parts: Vec<&str> = text.split(':').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(invalid(format!("expected min:max:step, got {:?}", text)));
        }
        let mut values = [0.0; 3];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse::<f64>()
                .map_err(|_| invalid(format!("{:?} is not a number", part)))?;
        }

        Ok(Self::new(name, values[0], values[1], values[2]))
    }

    /// Generate the sweep values; `max` is always included
    pub fn sweep(&self) -> Result<Vec<f64>> {
        if !(self.step > 0.0) {
            return Err(EngineError::InvalidAxis {
                axis: self.name.clone(),
                reason: "step must be positive".into(),
            });
        }
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(EngineError::InvalidAxis {
                axis: self.name.clone(),
                reason: "bounds must be finite".into(),
            });
        }
        if self.min > self.max {
            return Err(EngineError::InvalidAxis {
                axis: self.name.clone(),
                reason: "min must be <= max".into(),
            });
        }

        // Index-based stepping avoids accumulating float error
        let steps = ((self.max - self.min) / self.step + 1e-9).floor();
        if steps >= MAX_SWEEP_POINTS as f64 {
            return Err(EngineError::InvalidAxis {
                axis: self.name.clone(),
                reason: format!("sweep exceeds {} points", MAX_SWEEP_POINTS),
            });
        }
        let steps = steps as usize;
        let mut values: Vec<f64> = (0..=steps).map(|i| self.min + i as f64 * self.step).collect();

        if let Some(&last) = values.last() {
            if self.max - last > 1e-9 {
                values.push(self.max);
            }
        }

        Ok(values)
    }
}

/// Which year and which axis values the grid evaluates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityConfig {
    /// Policy year at which profit is measured (clamped to the horizon)
    pub analysis_year: u32,
    /// Reference borrowing rates swept across columns (%)
    pub rate_axis: Vec<f64>,
    /// Bond yields swept down rows (%)
    pub yield_axis: Vec<f64>,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            analysis_year: 10,
            rate_axis: vec![2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            yield_axis: vec![3.0, 3.5, 4.0, 4.5, 5.0, 5.5, 6.0],
        }
    }
}

impl SensitivityConfig {
    /// Build a config from axis sweeps
    pub fn from_axes(analysis_year: u32, rate: &SensitivityAxis, bond_yield: &SensitivityAxis) -> Result<Self> {
        Ok(Self {
            analysis_year,
            rate_axis: rate.sweep()?,
            yield_axis: bond_yield.sweep()?,
        })
    }

    pub fn year(&self) -> u32 {
        self.analysis_year.min(HORIZON_YEARS)
    }
}

/// Profit matrix: `data[row][col]` is profit at `yield_axis[row]` and `rate_axis[col]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityGrid {
    pub analysis_year: u32,
    pub rate_axis: Vec<f64>,
    pub yield_axis: Vec<f64>,
    pub data: Vec<Vec<f64>>,
}

impl SensitivityGrid {
    /// Evaluate `profit(rate, bond_yield)` over every grid cell
    pub fn evaluate<P>(config: &SensitivityConfig, profit: P) -> Self
    where
        P: Fn(f64, f64) -> f64,
    {
        let data: Vec<Vec<f64>> = config
            .yield_axis
            .iter()
            .map(|&bond_yield| {
                config
                    .rate_axis
                    .iter()
                    .map(|&rate| profit(rate, bond_yield))
                    .collect::<Vec<f64>>()
            })
            .collect();

        Self {
            analysis_year: config.year(),
            rate_axis: config.rate_axis.clone(),
            yield_axis: config.yield_axis.clone(),
            data,
        }
    }

    /// Column labels (borrowing rate)
    pub fn x_labels(&self) -> Vec<String> {
        self.rate_axis.iter().map(|r| format!("{:.2}%", r)).collect()
    }

    /// Row labels (bond yield)
    pub fn y_labels(&self) -> Vec<String> {
        self.yield_axis.iter().map(|y| format!("{:.2}%", y)).collect()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get(row).and_then(|r| r.get(col)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_includes_max() {
        let axis = SensitivityAxis::new("hibor", 2.0, 5.0, 1.0);
        assert_eq!(axis.sweep().unwrap(), vec![2.0, 3.0, 4.0, 5.0]);

        let ragged = SensitivityAxis::new("hibor", 2.0, 4.5, 1.0);
        assert_eq!(ragged.sweep().unwrap(), vec![2.0, 3.0, 4.0, 4.5]);
    }

    #[test]
    fn test_sweep_fractional_step() {
        let axis = SensitivityAxis::new("yield", 3.0, 6.0, 0.5);
        let values = axis.sweep().unwrap();
        assert_eq!(values.len(), 7);
        assert!((values[6] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_axes_rejected() {
        let zero_step = SensitivityAxis::new("hibor", 1.0, 2.0, 0.0);
        assert!(matches!(zero_step.sweep(), Err(EngineError::InvalidAxis { .. })));

        let inverted = SensitivityAxis::new("hibor", 3.0, 2.0, 0.5);
        assert!(matches!(inverted.sweep(), Err(EngineError::InvalidAxis { .. })));
    }

    #[test]
    fn test_tiny_step_rejected() {
        let axis = SensitivityAxis::new("hibor", 2.0, 8.0, 1e-300);
        let err = axis.sweep().unwrap_err();
        assert!(err.to_string().contains("exceeds"));

        let at_limit = SensitivityAxis::new("hibor", 0.0, (MAX_SWEEP_POINTS - 1) as f64, 1.0);
        assert_eq!(at_limit.sweep().unwrap().len(), MAX_SWEEP_POINTS);
    }

    #[test]
    fn test_parse_axis() {
        let axis = SensitivityAxis::parse("yield", "3:6:0.5").unwrap();
        assert_eq!(axis, SensitivityAxis::new("yield", 3.0, 6.0, 0.5));

        assert!(matches!(
            SensitivityAxis::parse("yield", "3:6"),
            Err(EngineError::InvalidAxis { .. })
        ));
        assert!(matches!(
            SensitivityAxis::parse("yield", "3:six:0.5"),
            Err(EngineError::InvalidAxis { .. })
        ));
    }

    #[test]
    fn test_config_from_axes() {
        let rate = SensitivityAxis::parse("hibor", "2:8:1").unwrap();
        let bond_yield = SensitivityAxis::parse("yield", "3:6:0.5").unwrap();
        let config = SensitivityConfig::from_axes(10, &rate, &bond_yield).unwrap();
        assert_eq!(config, SensitivityConfig::default());

        let bad = SensitivityAxis::new("hibor", 8.0, 2.0, 1.0);
        assert!(SensitivityConfig::from_axes(10, &bad, &bond_yield).is_err());
    }

    #[test]
    fn test_grid_shape_and_orientation() {
        let config = SensitivityConfig {
            analysis_year: 5,
            rate_axis: vec![1.0, 2.0, 3.0],
            yield_axis: vec![10.0, 20.0],
        };
        let grid = SensitivityGrid::evaluate(&config, |rate, bond_yield| bond_yield - rate);

        assert_eq!(grid.data.len(), grid.y_labels().len());
        assert!(grid.data.iter().all(|row| row.len() == grid.x_labels().len()));
        assert_eq!(grid.cell(1, 0), Some(19.0));
        assert_eq!(grid.cell(2, 0), None);
        assert_eq!(grid.x_labels()[0], "1.00%");
    }

    #[test]
    fn test_analysis_year_clamped() {
        let config = SensitivityConfig {
            analysis_year: 45,
            ..Default::default()
        };
        assert_eq!(config.year(), 30);
    }
}
