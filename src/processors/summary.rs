//! Flight-regime summaries for newly added test points.
//!
//! A summary captures the speed range, altitude envelope, and level-turn
//! content of one maneuver, computed once at insertion time from the raw
//! channel data. Both the numeric values and their fixed display strings are
//! recorded, so downstream consumers never reformat.

use serde::{Deserialize, Serialize};

use crate::config::{Channel, ChannelMap};
use crate::core::airdata;
use crate::core::dataset::{ChannelError, ChannelTable, ParameterAccessor, Result};

/// Roll excursion in degrees beyond which a sample counts as turning.
pub const TURN_THRESHOLD_DEG: f64 = 5.0;

/// Flight-regime summary attached to a test point when it is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Minimum Mach over the maneuver.
    pub speed_min: f64,
    /// Maximum Mach over the maneuver.
    pub speed_max: f64,
    /// Minimum geometric height in feet.
    pub alt_min_ft: f64,
    /// Midpoint of the altitude envelope in feet.
    pub alt_mid_ft: f64,
    /// Maximum geometric height in feet.
    pub alt_max_ft: f64,
    /// Half the altitude envelope in feet.
    pub alt_tolerance_ft: f64,
    /// Mean Mach over turning samples; `None` when the maneuver never banks
    /// past [`TURN_THRESHOLD_DEG`].
    pub turn_speed: Option<f64>,

    pub speed_min_display: String,
    pub speed_max_display: String,
    pub alt_min_display: String,
    pub alt_mid_display: String,
    pub alt_max_display: String,
    pub alt_tolerance_display: String,
    pub turn_speed_display: Option<String>,
}

impl SummaryRecord {
    /// Returns true if any sample banked past the turn threshold.
    pub fn is_turning(&self) -> bool {
        self.turn_speed.is_some()
    }

    /// Ordered `(field, value)` pairs for the point-info message. The level
    /// turn entry appears only for turning maneuvers.
    pub fn display_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("Min. speed".to_string(), self.speed_min_display.clone()),
            ("Max. speed".to_string(), self.speed_max_display.clone()),
        ];
        if let Some(turn) = &self.turn_speed_display {
            fields.push(("Level turn".to_string(), turn.clone()));
        }
        fields.push(("Min. alt".to_string(), self.alt_min_display.clone()));
        fields.push(("Mid. alt".to_string(), self.alt_mid_display.clone()));
        fields.push(("Max. alt".to_string(), self.alt_max_display.clone()));
        fields.push((
            "Alt. tolerance".to_string(),
            self.alt_tolerance_display.clone(),
        ));
        fields
    }
}

fn format_speed(mach: f64) -> String {
    format!("{mach:.2} M")
}

fn format_altitude(feet: f64) -> String {
    format!("{:.2} Kft", feet / 1000.0)
}

fn format_tolerance(feet: f64) -> String {
    format!("\u{b1}{} ft", feet.trunc() as i64)
}

fn check_aligned(channel: Channel, actual: usize, expected: usize) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(ChannelError::MisalignedChannels {
            name: channel.name().to_string(),
            expected,
            actual,
        })
    }
}

/// Computes the flight-regime summary of one test-point dataset.
///
/// # Errors
///
/// Returns [`ChannelError::MissingParameter`] when any of total pressure,
/// static pressure, geometric height, or roll angle is unavailable,
/// [`ChannelError::EmptyChannel`] when a pressure channel holds no samples,
/// and [`ChannelError::MisalignedChannels`] when the touched channels do not
/// share the sample index.
pub fn compute_summary(data: &ChannelTable, names: &ChannelMap) -> Result<SummaryRecord> {
    let access = ParameterAccessor::new(data, names);

    let total_pres = access.sequence(Channel::TotalPressure)?;
    let static_pres = access.sequence(Channel::StaticPressure)?;
    if total_pres.is_empty() {
        return Err(ChannelError::EmptyChannel(
            Channel::TotalPressure.name().to_string(),
        ));
    }
    if static_pres.is_empty() {
        return Err(ChannelError::EmptyChannel(
            Channel::StaticPressure.name().to_string(),
        ));
    }
    let expected = total_pres.len();
    check_aligned(Channel::StaticPressure, static_pres.len(), expected)?;

    let height = access.sequence(Channel::GeometricHeight)?;
    check_aligned(Channel::GeometricHeight, height.len(), expected)?;
    let roll = access.sequence(Channel::RollAngle)?;
    check_aligned(Channel::RollAngle, roll.len(), expected)?;

    let speed = airdata::speed_metric(total_pres, static_pres);
    let speed_min = speed.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let speed_max = speed.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

    let alt_min = height.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let alt_max = height.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let alt_mid = 0.5 * (alt_min + alt_max);
    let alt_tolerance = 0.5 * (alt_max - alt_min);

    // Mean speed over samples banked past the threshold, if there are any.
    let roll_deg = airdata::degrees_from_radians(roll);
    let turning: Vec<f64> = roll_deg
        .iter()
        .zip(&speed)
        .filter(|(deg, _)| deg.abs() > TURN_THRESHOLD_DEG)
        .map(|(_, &mach)| mach)
        .collect();
    let turn_speed = if turning.is_empty() {
        None
    } else {
        Some(turning.iter().sum::<f64>() / turning.len() as f64)
    };

    Ok(SummaryRecord {
        speed_min,
        speed_max,
        alt_min_ft: alt_min,
        alt_mid_ft: alt_mid,
        alt_max_ft: alt_max,
        alt_tolerance_ft: alt_tolerance,
        turn_speed,
        speed_min_display: format_speed(speed_min),
        speed_max_display: format_speed(speed_max),
        alt_min_display: format_altitude(alt_min),
        alt_mid_display: format_altitude(alt_mid),
        alt_max_display: format_altitude(alt_max),
        alt_tolerance_display: format_tolerance(alt_tolerance),
        turn_speed_display: turn_speed.map(format_speed),
    })
}
