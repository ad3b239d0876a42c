//! Reference data access: intake templates, equipment price tables, and
//! financial constants, behind a swappable store trait.
//!
//! The engine never reaches out to a data source mid-calculation; it pulls
//! everything it needs up front through a [`ReferenceStore`], so the
//! calculation stages stay pure. [`TtlCache`] bounds how often a remote
//! store is consulted, and [`ReferenceLibrary`] decides what happens when
//! the store is down.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::QuoteError;
use crate::industries::Industry;
use crate::quote::template::{IndustryTemplate, template_for};

/// One point on the battery price curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceAnchor {
    /// System energy (kWh) this anchor is quoted at.
    pub kwh: f64,
    /// Battery system price at that size (USD/kWh, before markup).
    pub usd_per_kwh: f64,
}

/// One volume-discount break.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeBreak {
    /// Discount applies at and above this system energy (kWh).
    pub min_kwh: f64,
    /// Discount fraction of the equipment subtotal.
    pub discount: f64,
}

/// Equipment price table: battery anchors, PCS rates, volume breaks.
///
/// Anchors and breaks are kept sorted ascending by size; lookups clamp
/// below the first anchor and above the last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierTable {
    pub anchors: Vec<PriceAnchor>,
    pub volume_breaks: Vec<VolumeBreak>,
    /// PCS price for commercial-scale systems (USD/kW).
    pub pcs_commercial_usd_per_kw: f64,
    /// PCS price at utility scale (USD/kW).
    pub pcs_utility_usd_per_kw: f64,
}

impl Default for TierTable {
    fn default() -> Self {
        TierTable {
            anchors: vec![
                PriceAnchor { kwh: 2_000.0, usd_per_kwh: 420.0 },
                PriceAnchor { kwh: 5_000.0, usd_per_kwh: 330.0 },
                PriceAnchor { kwh: 15_000.0, usd_per_kwh: 260.0 },
            ],
            volume_breaks: vec![
                VolumeBreak { min_kwh: 10_000.0, discount: 0.02 },
                VolumeBreak { min_kwh: 50_000.0, discount: 0.04 },
                VolumeBreak { min_kwh: 100_000.0, discount: 0.06 },
                VolumeBreak { min_kwh: 500_000.0, discount: 0.08 },
                VolumeBreak { min_kwh: 1_000_000.0, discount: 0.10 },
            ],
            pcs_commercial_usd_per_kw: 240.0,
            pcs_utility_usd_per_kw: 150.0,
        }
    }
}

impl TierTable {
    /// Battery unit price at `kwh`, linearly interpolated between anchors
    /// and clamped at the ends. Non-increasing in system size.
    pub fn usd_per_kwh(&self, kwh: f64) -> f64 {
        let Some(first) = self.anchors.first() else {
            return 0.0;
        };
        if kwh <= first.kwh {
            return first.usd_per_kwh;
        }
        for pair in self.anchors.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if kwh <= hi.kwh {
                let t = (kwh - lo.kwh) / (hi.kwh - lo.kwh);
                return lo.usd_per_kwh + t * (hi.usd_per_kwh - lo.usd_per_kwh);
            }
        }
        self.anchors.last().map_or(0.0, |a| a.usd_per_kwh)
    }

    /// Volume discount fraction at `kwh`. Non-decreasing in system size.
    pub fn volume_discount(&self, kwh: f64) -> f64 {
        self.volume_breaks
            .iter()
            .take_while(|b| b.min_kwh <= kwh)
            .last()
            .map_or(0.0, |b| b.discount)
    }
}

/// Market and tax constants for the financial model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialConstants {
    /// Nominal discount rate for NPV and LCOS.
    pub discount_rate: f64,
    /// Analysis horizon in years.
    pub project_years: usize,
    /// Investment tax credit fraction of gross capex.
    pub itc_fraction: f64,
    /// Marginal corporate tax rate for the depreciation shield.
    pub tax_rate: f64,
    /// MACRS year fractions; basis is reduced by half the ITC.
    pub macrs_schedule: Vec<f64>,
    /// Annual battery capacity fade.
    pub degradation_rate: f64,
    /// Annual tariff escalation.
    pub escalation_rate: f64,
    /// AC round-trip efficiency.
    pub round_trip_efficiency: f64,
    /// Equivalent full cycles per year.
    pub cycles_per_year: f64,
    /// Cost of charging energy (USD/kWh).
    pub charge_cost_usd_per_kwh: f64,
    /// Value of discharged energy (USD/kWh).
    pub discharge_value_usd_per_kwh: f64,
    /// Demand charge (USD/kW-month).
    pub demand_charge_usd_per_kw_month: f64,
    /// Fixed O&M (USD per kWh of capacity per year).
    pub om_usd_per_kwh_year: f64,
}

impl Default for FinancialConstants {
    fn default() -> Self {
        FinancialConstants {
            discount_rate: 0.08,
            project_years: 25,
            itc_fraction: 0.30,
            tax_rate: 0.21,
            macrs_schedule: vec![0.20, 0.32, 0.192, 0.1152, 0.1152, 0.0576],
            degradation_rate: 0.02,
            escalation_rate: 0.025,
            round_trip_efficiency: 0.86,
            cycles_per_year: 300.0,
            charge_cost_usd_per_kwh: 0.06,
            discharge_value_usd_per_kwh: 0.16,
            demand_charge_usd_per_kw_month: 18.0,
            om_usd_per_kwh_year: 7.0,
        }
    }
}

/// Source of reference data the pipeline depends on.
///
/// Implementations must be cheap to call or wrapped in [`TtlCache`]; the
/// engine consults the store once per quote.
pub trait ReferenceStore: Send + Sync {
    /// Intake template for an industry.
    ///
    /// # Errors
    ///
    /// [`QuoteError::MissingTemplate`] when the store has no template for
    /// the slug.
    fn template(&self, industry: Industry) -> Result<&IndustryTemplate, QuoteError>;

    /// Current equipment price table.
    ///
    /// # Errors
    ///
    /// [`QuoteError::DataSourceUnavailable`] when the backing source
    /// cannot be reached.
    fn price_table(&self) -> Result<TierTable, QuoteError>;

    /// Current financial constants.
    ///
    /// # Errors
    ///
    /// [`QuoteError::DataSourceUnavailable`] when the backing source
    /// cannot be reached.
    fn financial_constants(&self) -> Result<FinancialConstants, QuoteError>;
}

/// Built-in reference data compiled into the binary. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticStore;

impl ReferenceStore for StaticStore {
    fn template(&self, industry: Industry) -> Result<&IndustryTemplate, QuoteError> {
        Ok(template_for(industry))
    }

    fn price_table(&self) -> Result<TierTable, QuoteError> {
        Ok(TierTable::default())
    }

    fn financial_constants(&self) -> Result<FinancialConstants, QuoteError> {
        Ok(FinancialConstants::default())
    }
}

fn relock<T>(slot: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

fn cached_fetch<T: Clone>(
    slot: &Mutex<Option<(Instant, T)>>,
    ttl: Duration,
    fetch: impl FnOnce() -> Result<T, QuoteError>,
) -> Result<T, QuoteError> {
    let mut guard = relock(slot);
    if let Some((at, value)) = guard.as_ref() {
        if at.elapsed() < ttl {
            return Ok(value.clone());
        }
    }
    let value = fetch()?;
    *guard = Some((Instant::now(), value.clone()));
    Ok(value)
}

/// TTL cache over another store. Templates pass through (they are static
/// data); price tables and constants are cached for the configured TTL.
pub struct TtlCache<S> {
    inner: S,
    ttl: Duration,
    price: Mutex<Option<(Instant, TierTable)>>,
    constants: Mutex<Option<(Instant, FinancialConstants)>>,
}

impl<S: ReferenceStore> TtlCache<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        TtlCache {
            inner,
            ttl,
            price: Mutex::new(None),
            constants: Mutex::new(None),
        }
    }
}

impl<S: ReferenceStore> ReferenceStore for TtlCache<S> {
    fn template(&self, industry: Industry) -> Result<&IndustryTemplate, QuoteError> {
        self.inner.template(industry)
    }

    fn price_table(&self) -> Result<TierTable, QuoteError> {
        cached_fetch(&self.price, self.ttl, || self.inner.price_table())
    }

    fn financial_constants(&self) -> Result<FinancialConstants, QuoteError> {
        cached_fetch(&self.constants, self.ttl, || self.inner.financial_constants())
    }
}

/// Where a piece of reference data actually came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Served by the configured store.
    Store,
    /// Store failed; compiled-in defaults were used instead.
    BuiltinFallback,
}

/// Engine-facing reference access with an explicit availability policy.
///
/// When `fallback_to_builtin` is set, a failing store degrades to the
/// compiled-in defaults and the caller learns about it through the
/// returned [`Provenance`] (quotes priced that way carry a warning).
/// Without fallback, store errors propagate.
pub struct ReferenceLibrary {
    store: Box<dyn ReferenceStore>,
    fallback_to_builtin: bool,
}

impl ReferenceLibrary {
    pub fn new(store: Box<dyn ReferenceStore>, fallback_to_builtin: bool) -> Self {
        ReferenceLibrary {
            store,
            fallback_to_builtin,
        }
    }

    /// Built-in data only. Cannot fail, never warns.
    pub fn with_defaults() -> Self {
        ReferenceLibrary::new(Box::new(StaticStore), false)
    }

    /// Wraps `store` in a TTL cache first.
    pub fn cached(
        store: impl ReferenceStore + 'static,
        ttl: Duration,
        fallback_to_builtin: bool,
    ) -> Self {
        ReferenceLibrary::new(Box::new(TtlCache::new(store, ttl)), fallback_to_builtin)
    }

    pub fn template(
        &self,
        industry: Industry,
    ) -> Result<(&IndustryTemplate, Provenance), QuoteError> {
        match self.store.template(industry) {
            Ok(t) => Ok((t, Provenance::Store)),
            Err(_) if self.fallback_to_builtin => {
                Ok((template_for(industry), Provenance::BuiltinFallback))
            }
            Err(e) => Err(e),
        }
    }

    pub fn price_table(&self) -> Result<(TierTable, Provenance), QuoteError> {
        match self.store.price_table() {
            Ok(t) => Ok((t, Provenance::Store)),
            Err(_) if self.fallback_to_builtin => {
                Ok((TierTable::default(), Provenance::BuiltinFallback))
            }
            Err(e) => Err(e),
        }
    }

    pub fn financial_constants(&self) -> Result<(FinancialConstants, Provenance), QuoteError> {
        match self.store.financial_constants() {
            Ok(c) => Ok((c, Provenance::Store)),
            Err(_) if self.fallback_to_builtin => {
                Ok((FinancialConstants::default(), Provenance::BuiltinFallback))
            }
            Err(e) => Err(e),
        }
    }
}

/// Generic TTL'd map for memoizing computed values (quote results keyed
/// by input fingerprint). Interior mutability keeps callers `&self`.
pub struct TtlMap<K: Ord, V> {
    ttl: Duration,
    entries: Mutex<std::collections::BTreeMap<K, (Instant, V)>>,
}

impl<K: Ord + Clone, V: Clone> TtlMap<K, V> {
    pub fn new(ttl: Duration) -> Self {
        TtlMap {
            ttl,
            entries: Mutex::new(std::collections::BTreeMap::new()),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let guard = relock(&self.entries);
        guard
            .get(key)
            .filter(|(at, _)| at.elapsed() < self.ttl)
            .map(|(_, v)| v.clone())
    }

    pub fn insert(&self, key: K, value: V) {
        let mut guard = relock(&self.entries);
        guard.insert(key, (Instant::now(), value));
    }

    pub fn len(&self) -> usize {
        relock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
