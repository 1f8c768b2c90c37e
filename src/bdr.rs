/*! The *bounded-delay resource* (BDR) abstraction: a value type
`(rate, delay)` with its supply bound function and the two algebraic
transforms (half-half, and its inverse) that connect it to the periodic
resource model (PRM). */

use crate::time::{Real, Time};

/// Generic interface for a model of processor supply.
///
/// A type implementing [`SupplyBound`] need only provide
/// [`provided_service`][SupplyBound::provided_service]; the default
/// [`service_time`][SupplyBound::service_time] inverts it by a linear
/// search, which is exact for [`Bdr`] since its SBF is piecewise linear.
pub trait SupplyBound {
    /// The minimum amount of service guaranteed over an interval of
    /// length `delta`.
    fn provided_service(&self, delta: Time) -> Real;

    /// The minimum interval length guaranteed to provide at least
    /// `demand` amount of service.
    fn service_time(&self, demand: Real) -> Time {
        let mut t = 0;
        while self.provided_service(t) < demand {
            t += 1;
        }
        t
    }
}

/// A bounded-delay resource `(alpha, delta)`: after an initial delay of at
/// most `delta` time units, the resource supplies processor time at rate
/// `alpha`.
///
/// Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bdr {
    /// `0 <= alpha <= 1`: the guaranteed long-run bandwidth.
    pub rate: Real,
    /// `delta >= 0`: the maximum startup delay.
    pub delay: Real,
}

impl Bdr {
    /// Constructs a BDR interface directly from a rate and a delay.
    pub fn new(rate: Real, delay: Real) -> Self {
        debug_assert!((0.0..=1.0).contains(&rate), "rate must be in [0, 1], got {rate}");
        debug_assert!(delay >= 0.0, "delay must be non-negative, got {delay}");
        Bdr { rate, delay }
    }

    /// The full, undelayed CPU: `BDR(1, 0)`. The parent interface assumed
    /// at the root of a per-core hierarchy.
    pub fn full_cpu() -> Self {
        Bdr::new(1.0, 0.0)
    }

    /// `sbf(t) = 0` for `t < delta`, else `alpha * (t - delta)`.
    ///
    /// Monotone non-decreasing in `t` by construction (it is either
    /// constant zero or a non-decreasing affine function).
    pub fn sbf(&self, t: Time) -> Real {
        let t = t as Real;
        if t < self.delay {
            0.0
        } else {
            self.rate * (t - self.delay)
        }
    }

    /// The canonical PRM -> BDR conversion (Theorem 3, "half-half"): given
    /// a periodic supply `(Q, P)`, derive the conservative BDR interface
    /// `alpha' = Q/P`, `delta' = 2*(P - Q)`.
    ///
    /// This is the conversion the analyzer applies to every component's
    /// declared budget.
    pub fn from_prm(budget: Real, period: Real) -> Self {
        debug_assert!(period > 0.0);
        debug_assert!(budget >= 0.0 && budget <= period);
        Bdr::new(budget / period, 2.0 * (period - budget))
    }

    /// The inverse half-half transform: recovers a PRM pair `(Q, P)` that
    /// induces (at least) this BDR interface.
    ///
    /// `alpha >= 1` collapses to the full CPU `(1, 1)`; `alpha == 0`
    /// collapses to `(0, 0)`.
    pub fn to_prm(&self) -> (Real, Real) {
        if self.rate >= 1.0 {
            return (1.0, 1.0);
        }
        if self.rate == 0.0 {
            return (0.0, 0.0);
        }
        let period = self.delay / (2.0 * (1.0 - self.rate));
        let budget = self.rate * period;
        (budget, period)
    }

    /// The compositional schedulability test (Theorem 1): can a parent BDR
    /// host every child in `children`?
    ///
    /// Requires `sum(alpha_i) <= alpha_p` and `delta_i > delta_p` for every
    /// child, except that a zero-delay parent (the full, undelayed CPU at
    /// the root of a core) relaxes the delay condition to `delta_i >= 0`,
    /// which trivially holds.
    pub fn can_host(parent: &Bdr, children: &[Bdr]) -> bool {
        let rate_ok: Real = children.iter().map(|c| c.rate).sum::<Real>() <= parent.rate + 1e-9;
        let delay_ok = if parent.delay == 0.0 {
            children.iter().all(|c| c.delay >= 0.0)
        } else {
            children.iter().all(|c| c.delay > parent.delay)
        };
        rate_ok && delay_ok
    }
}

impl SupplyBound for Bdr {
    fn provided_service(&self, delta: Time) -> Real {
        self.sbf(delta)
    }
}
