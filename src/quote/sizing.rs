//! Goal-driven BESS power and duration sizing.

use crate::config::SizingConfig;
use crate::quote::types::{CalculationInput, LoadProfile, PrimaryGoal, SizingRecommendation};

const KW_PER_HP: f64 = 0.746;

/// Derives a battery recommendation from the reconstructed load profile.
///
/// Power starts at a goal-dependent fraction of coincident peak, then a
/// series of one-way floors lift it: critical-load coverage, motor-start
/// surge, interconnection gap, full-peak carry for off-grid sites. Floors
/// only ever raise the number, so the recommendation stays monotone in
/// the load profile.
///
/// Every applied rule appends one `rationale` entry; `sources` cites the
/// sizing guidance the ratios come from. `bess_kwh == bess_kw *
/// duration_hours` holds on return.
pub fn recommend(
    profile: &LoadProfile,
    input: &CalculationInput,
    cfg: &SizingConfig,
) -> SizingRecommendation {
    let goal = PrimaryGoal::parse(input.text("primary_goal").unwrap_or(""));
    let peak = profile.peak_load_kw;
    let mut rationale = Vec::new();

    let ratio = match goal {
        PrimaryGoal::PeakShaving => cfg.peak_shaving_ratio,
        PrimaryGoal::Arbitrage => cfg.arbitrage_ratio,
        PrimaryGoal::Resilience => cfg.resilience_ratio,
    };
    let mut kw = peak * ratio;
    let mut duration = cfg.default_duration_hours;
    rationale.push(format!(
        "{}: power set to {:.0}% of {:.1} kW coincident peak",
        goal.label(),
        ratio * 100.0,
        peak
    ));

    if goal == PrimaryGoal::Resilience {
        let critical = input.number("critical_load_fraction").clamp(0.05, 1.0);
        let runtime = if input.number("backup_runtime_hours") > 0.0 {
            input.number("backup_runtime_hours")
        } else {
            cfg.default_duration_hours
        };
        if peak * critical > kw {
            kw = peak * critical;
            rationale.push(format!(
                "raised power to carry {:.0}% critical load through an outage",
                critical * 100.0
            ));
        }
        if runtime > duration {
            duration = runtime;
            rationale.push(format!("duration extended to {runtime:.1} h backup runtime"));
        }
        let surge = input.number("largest_motor_hp") * KW_PER_HP * cfg.motor_surge_multiplier;
        if surge > kw {
            kw = surge;
            rationale.push(format!(
                "raised power to {surge:.1} kW for largest-motor starting surge"
            ));
        }
    }

    let mut energy_uplift = 0.0;
    match input.text("grid_connection").unwrap_or("reliable") {
        "off_grid" => {
            if peak > kw {
                kw = peak;
                rationale.push("off-grid site: battery must carry full peak".to_string());
            }
            if cfg.off_grid_duration_floor_hours > duration {
                duration = cfg.off_grid_duration_floor_hours;
                rationale.push(format!(
                    "off-grid duration floor of {:.1} h applied",
                    cfg.off_grid_duration_floor_hours
                ));
            }
        }
        "unreliable" => {
            energy_uplift = cfg.unreliable_energy_uplift;
            rationale.push(format!(
                "unreliable grid: {:.0}% energy reserve added",
                energy_uplift * 100.0
            ));
        }
        "limited" => {
            let cap = input.number("grid_capacity_kw");
            if cap > 0.0 && peak - cap > kw {
                kw = peak - cap;
                rationale.push(format!(
                    "limited interconnection: battery covers {:.1} kW above the {cap:.1} kW grid limit",
                    peak - cap
                ));
            }
        }
        "microgrid" => {
            rationale.push("microgrid interconnection: grid-forming PCS required".to_string());
        }
        _ => {}
    }

    let mut kwh = kw * duration * (1.0 + energy_uplift);
    if input.flag("expansion_plans") {
        kw *= 1.0 + cfg.expansion_headroom;
        kwh *= 1.0 + cfg.expansion_headroom;
        rationale.push(format!(
            "{:.0}% headroom for planned expansion",
            cfg.expansion_headroom * 100.0
        ));
    }

    SizingRecommendation {
        bess_kw: kw,
        bess_kwh: kwh,
        duration_hours: kwh / kw,
        goal,
        rationale,
        sources: vec![
            "DOE/Sandia Energy Storage Handbook, application sizing tables".to_string(),
            "NREL ATB 2024, commercial 4-hour reference duration".to_string(),
        ],
    }
}
