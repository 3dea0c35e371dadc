/// Which pass schedule drives rebalancing (§4.2). Both values produce a
/// tree satisfying the same δ/γ balance invariant (§3) and the same
/// testable properties (§8); see `DESIGN.md` for why this implementation
/// shares one retrace algorithm between them rather than also implementing
/// single-pass's eager on-descent rotation as a distinct code path.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum PassPolicy {
    #[default]
    TwoPass,
    SinglePass,
}

/// Integer-only (δ, γ) rebalancing parameters, stored as rational
/// numerator/denominator pairs exactly as the source design calls for
/// (§4.2: "integer-only arithmetic (rational (δ, γ) stored as
/// numerator/denominator pairs)").
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WbtParams {
    pub delta_num: u64,
    pub delta_den: u64,
    pub gamma_num: u64,
    pub gamma_den: u64,
    pub policy: PassPolicy,
}

impl WbtParams {
    fn valid(&self) -> bool {
        let delta = self.delta_num as f64 / self.delta_den as f64;
        let gamma = self.gamma_num as f64 / self.gamma_den as f64;
        delta > 1.0 && gamma > 1.0 && gamma < delta
    }

    /// Lai-Wood (3, 1): the original weight-balanced tree parameters.
    pub fn lai_wood_3_1() -> Self {
        let p = WbtParams { delta_num: 3, delta_den: 1, gamma_num: 2, gamma_den: 1, policy: PassPolicy::TwoPass };
        debug_assert!(p.valid());
        p
    }

    /// Lai-Wood (4, 3).
    pub fn lai_wood_4_3() -> Self {
        let p = WbtParams { delta_num: 4, delta_den: 3, gamma_num: 5, gamma_den: 4, policy: PassPolicy::TwoPass };
        debug_assert!(p.valid());
        p
    }

    /// The commonly used "balanced" preset (δ=2, γ=3/2).
    pub fn balanced() -> Self {
        let p = WbtParams { delta_num: 2, delta_den: 1, gamma_num: 3, gamma_den: 2, policy: PassPolicy::TwoPass };
        debug_assert!(p.valid());
        p
    }

    /// "super-balanced" (δ=3/2, γ=5/4): tighter balance, more rotations.
    pub fn super_balanced() -> Self {
        let p = WbtParams { delta_num: 3, delta_den: 2, gamma_num: 5, gamma_den: 4, policy: PassPolicy::TwoPass };
        debug_assert!(p.valid());
        p
    }

    /// Integral (δ=3, γ=2): avoids needing any division at all.
    pub fn integral() -> Self {
        let p = WbtParams { delta_num: 3, delta_den: 1, gamma_num: 2, gamma_den: 1, policy: PassPolicy::TwoPass };
        debug_assert!(p.valid());
        p
    }

    pub fn with_policy(mut self, policy: PassPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// `weight(n) = size(n) + 1`, so empty subtrees (size 0) still
    /// contribute a nonzero weight to the ratio test (§3).
    #[inline]
    pub(crate) fn weight(size: usize) -> u64 {
        size as u64 + 1
    }

    /// True if a node with left/right subtree sizes `l`/`r` satisfies the
    /// δ-balance invariant from §3.
    pub(crate) fn is_balanced(&self, l: usize, r: usize) -> bool {
        let (wl, wr) = (Self::weight(l), Self::weight(r));
        self.delta_num * wl >= self.delta_den * wr && self.delta_num * wr >= self.delta_den * wl
    }

    /// True if the *left* side is too heavy relative to the right.
    pub(crate) fn left_too_heavy(&self, l: usize, r: usize) -> bool {
        self.delta_num * Self::weight(r) < self.delta_den * Self::weight(l)
    }

    /// Single-rotation test for an inner-child weight `w_inner` against the
    /// outer-child weight `w_outer` (§4.2).
    pub(crate) fn prefers_single_rotation(&self, w_inner: usize, w_outer: usize) -> bool {
        self.gamma_num * Self::weight(w_inner) < self.gamma_den * Self::weight(w_outer)
    }
}

impl Default for WbtParams {
    fn default() -> Self {
        Self::balanced()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for p in [
            WbtParams::lai_wood_3_1(),
            WbtParams::lai_wood_4_3(),
            WbtParams::balanced(),
            WbtParams::super_balanced(),
            WbtParams::integral(),
        ] {
            assert!(p.valid());
        }
    }

    #[test]
    fn balance_predicate_symmetric_for_equal_sizes() {
        let p = WbtParams::balanced();
        assert!(p.is_balanced(5, 5));
        assert!(!p.left_too_heavy(5, 5));
    }
}
