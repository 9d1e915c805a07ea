use serde::{Deserialize, Serialize};

use super::config::ModeShiftCaps;
use super::mode_choice::ModeShares;

/// Mode split if car trips moved to active modes and transit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModeShiftScenario {
    pub potential_shares: ModeShares,
    pub car_share_reduction: f64,
    pub vmt_reduction_percent: f64,
    pub reduced_daily_vmt: f64,
}

/// Vehicle miles travelled.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VmtAnalysis {
    pub daily_car_trips: f64,
    pub avg_trip_length_miles: f64,
    pub daily_vmt: f64,
    pub annual_vmt: f64,
    pub per_capita_annual_vmt: f64,
    pub mode_shift: ModeShiftScenario,
}

pub fn mode_shift(shares: &ModeShares, caps: &ModeShiftCaps) -> ModeShares {
    let car = shares.car;
    let mut gains = [
        (caps.walk_rate * car).min(caps.walk_max),
        (caps.bike_rate * car).min(caps.bike_max),
        (caps.transit_rate * car).min(caps.transit_max),
    ];
    let total_gain: f64 = gains.iter().sum();
    // The car share can only give up what it has.
    if total_gain > car && total_gain > 0.0 {
        for g in &mut gains {
            *g *= car / total_gain;
        }
    }
    let moved: f64 = gains.iter().sum();
    ModeShares {
        walk: shares.walk + gains[0],
        bike: shares.bike + gains[1],
        transit: shares.transit + gains[2],
        car: (car - moved).max(0.0),
    }
}

pub fn vmt_analysis(
    total_daily_trips: f64,
    shares: &ModeShares,
    avg_link_length_m: f64,
    population: f64,
    metres_per_mile: f64,
    caps: &ModeShiftCaps,
) -> VmtAnalysis {
    let daily_car_trips = total_daily_trips * shares.car;
    let avg_trip_length_miles = avg_link_length_m / metres_per_mile;
    let daily_vmt = daily_car_trips * avg_trip_length_miles;
    let annual_vmt = daily_vmt * 365.0;

    let potential_shares = mode_shift(shares, caps);
    let car_share_reduction = shares.car - potential_shares.car;
    let vmt_reduction_percent = if shares.car > 0.0 {
        car_share_reduction / shares.car * 100.0
    } else {
        0.0
    };

    VmtAnalysis {
        daily_car_trips,
        avg_trip_length_miles,
        daily_vmt,
        annual_vmt,
        per_capita_annual_vmt: if population > 0.0 {
            annual_vmt / population
        } else {
            0.0
        },
        mode_shift: ModeShiftScenario {
            potential_shares,
            car_share_reduction,
            vmt_reduction_percent,
            reduced_daily_vmt: total_daily_trips * potential_shares.car * avg_trip_length_miles,
        },
    }
}
