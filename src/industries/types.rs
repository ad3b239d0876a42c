//! Calculator contract and shared load-reconstruction math.

use crate::industries::Industry;
use crate::quote::types::{CalculationInput, LoadProfile};

/// Hours in a non-leap year, the bound for annual energy sanity checks.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Bottom-up load calculator for one industry.
///
/// Implementations sum named equipment/use contributors rather than
/// applying a blanket multiplier, so the contributor breakdown is always
/// auditable. They never return zero, NaN, or infinite loads: degenerate
/// inputs clamp to a documented per-industry floor inside
/// [`build_profile`].
pub trait IndustryCalculator: Sync {
    /// The canonical industry this calculator serves.
    fn industry(&self) -> Industry;

    /// Reconstructs the load profile from normalized inputs.
    fn compute(&self, input: &CalculationInput) -> LoadProfile;
}

/// Inputs to [`build_profile`]: nameplate contributors plus the industry's
/// documented load-shape constants.
pub struct ProfileSpec {
    /// Named nameplate contributions (kW) before the diversity factor.
    pub contributors: Vec<(&'static str, f64)>,
    /// Concurrency/diversity factor applied to every contributor, so the
    /// contributor sum equals peak by construction.
    pub diversity: f64,
    /// Minimum credible peak for this industry (kW).
    pub floor_kw: f64,
    /// Overnight base load as a fraction of peak.
    pub base_fraction: f64,
    /// Annual utilization of peak, `annual = peak * 8760 * duty`.
    pub duty_cycle: f64,
    /// Last-resort peak estimate (e.g. derived from a utility bill) used
    /// when every contributor is zero. Zero when unavailable.
    pub fallback_peak_kw: f64,
}

/// Builds a [`LoadProfile`] from nameplate contributors, applying the
/// shared numeric policy:
///
/// - non-finite or negative contributor values are treated as zero;
/// - the diversity factor scales each contributor, keeping the breakdown
///   consistent with the coincident peak;
/// - an all-zero breakdown falls back to `fallback_peak_kw` (or the
///   floor) as a single `facility_base` contributor;
/// - a sub-floor peak is clamped up by rescaling the non-zero
///   contributors proportionally; zero contributors stay zero.
pub fn build_profile(spec: ProfileSpec) -> LoadProfile {
    let diversity = if spec.diversity.is_finite() && spec.diversity > 0.0 {
        spec.diversity.min(1.0)
    } else {
        1.0
    };
    let floor_kw = if spec.floor_kw.is_finite() && spec.floor_kw > 0.0 {
        spec.floor_kw
    } else {
        1.0
    };

    let mut contributors: Vec<(&'static str, f64)> = spec
        .contributors
        .into_iter()
        .map(|(name, kw)| {
            let clean = if kw.is_finite() && kw > 0.0 { kw } else { 0.0 };
            (name, clean * diversity)
        })
        .collect();

    let mut peak: f64 = contributors.iter().map(|(_, kw)| kw).sum();

    if peak <= 0.0 {
        // Nothing reconstructable: anchor on the bill estimate or floor.
        let fallback = if spec.fallback_peak_kw.is_finite() && spec.fallback_peak_kw > 0.0 {
            spec.fallback_peak_kw.max(floor_kw)
        } else {
            floor_kw
        };
        contributors.push(("facility_base", fallback));
        peak = fallback;
    } else if peak < floor_kw {
        let scale = floor_kw / peak;
        for (_, kw) in contributors.iter_mut() {
            *kw *= scale;
        }
        peak = floor_kw;
    }

    let duty_cycle = if spec.duty_cycle.is_finite() {
        spec.duty_cycle.clamp(0.01, 1.0)
    } else {
        0.4
    };
    let base_fraction = if spec.base_fraction.is_finite() {
        spec.base_fraction.clamp(0.0, 1.0)
    } else {
        0.25
    };

    LoadProfile {
        peak_load_kw: peak,
        base_load_kw: base_fraction * peak,
        annual_energy_kwh: peak * HOURS_PER_YEAR * duty_cycle,
        duty_cycle,
        kw_contributors: contributors
            .into_iter()
            .map(|(name, kw)| (name.to_string(), kw))
            .collect(),
    }
}
