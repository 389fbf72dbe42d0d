use log::debug;
use serde::Serialize;
use std::fmt;
use tsa_utils::error::{AnalysisError, Result};

/// Smallest NFFT exponent tried (NFFT = 8).
pub const MIN_EXPONENT: u32 = 3;
/// Largest NFFT exponent tried (NFFT = 524288).
pub const MAX_EXPONENT: u32 = 19;
/// Fewest sub-sections allowed.
pub const MIN_SECTIONS: usize = 8;
/// Most sub-sections tried.
pub const MAX_SECTIONS: usize = 29;

/// Number of sub-sections and their length for spectral averaging.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub struct SegmentPlan {
    /// NS: number of sub-sections
    pub ns: usize,
    /// NFFT: points per sub-section, a power of two
    pub nfft: usize,
    /// N: total samples the plan was chosen for
    pub sample_count: usize,
}

impl SegmentPlan {
    /// NS * NFFT, the samples actually covered by the plan.
    pub fn total(&self) -> usize {
        self.ns * self.nfft
    }

    /// log2(NFFT)
    pub fn exponent(&self) -> u32 {
        self.nfft.trailing_zeros()
    }
}

impl fmt::Display for SegmentPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NS*NFFT = NT < N: {}*{} = {} < {}; NFFT = 2^{} = {}",
            self.ns,
            self.nfft,
            self.total(),
            self.sample_count,
            self.exponent(),
            self.nfft
        )
    }
}

/// Pick NS and NFFT for `sample_count` samples.
///
/// Exponents run outer and section counts inner, both ascending, and the last
/// pair with `NS * NFFT < N` wins: the largest feasible NFFT, then the largest
/// NS for it. This is not the pair that covers the most samples.
pub fn select_segments(sample_count: usize) -> Result<SegmentPlan> {
    let mut last = None;
    for exponent in MIN_EXPONENT..=MAX_EXPONENT {
        let nfft = 1usize << exponent;
        for ns in MIN_SECTIONS..=MAX_SECTIONS {
            if ns * nfft < sample_count {
                last = Some((ns, nfft));
            }
        }
    }

    let (ns, nfft) = last.ok_or(AnalysisError::InsufficientData {
        needed: MIN_SECTIONS * (1 << MIN_EXPONENT) + 1,
        found: sample_count,
    })?;
    let plan = SegmentPlan {
        ns,
        nfft,
        sample_count,
    };
    debug!("segment plan: {plan}");
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_thousand_samples() {
        let plan = select_segments(10_000).unwrap();
        assert_eq!(plan.nfft, 1024);
        assert_eq!(plan.ns, 9);
        assert_eq!(plan.total(), 9216);
        assert_eq!(plan.exponent(), 10);
    }

    #[test]
    fn test_minute_record_length() {
        // one year-plus of minute data per station
        let plan = select_segments(3_461_760).unwrap();
        assert_eq!((plan.ns, plan.nfft), (13, 262_144));
    }

    #[test]
    fn test_prefers_larger_nfft() {
        // 24 * 8 also covers 192 samples, the larger NFFT wins
        let plan = select_segments(200).unwrap();
        assert_eq!((plan.ns, plan.nfft), (12, 16));
    }

    #[test]
    fn test_largest_exponent_caps() {
        let plan = select_segments(1_000_000_000).unwrap();
        assert_eq!((plan.ns, plan.nfft), (29, 524_288));
    }

    #[test]
    fn test_smallest_valid() {
        let plan = select_segments(65).unwrap();
        assert_eq!((plan.ns, plan.nfft), (8, 8));
    }

    #[test]
    fn test_insufficient_data() {
        for n in [0, 1, 10, 64] {
            assert_eq!(
                select_segments(n),
                Err(AnalysisError::InsufficientData {
                    needed: 65,
                    found: n
                })
            );
        }
    }

    #[test]
    fn test_plan_invariants() {
        for n in (65..5000).step_by(37).chain([8191, 8192, 8193, 123_457, 4_000_000]) {
            let plan = select_segments(n).unwrap();
            assert!(plan.total() < n, "{plan}");
            assert!((MIN_SECTIONS..=MAX_SECTIONS).contains(&plan.ns), "{plan}");
            assert!(plan.nfft.is_power_of_two(), "{plan}");
            assert!((MIN_EXPONENT..=MAX_EXPONENT).contains(&plan.exponent()), "{plan}");
            // no larger NFFT admits even the minimum section count
            if plan.exponent() < MAX_EXPONENT {
                assert!(MIN_SECTIONS * plan.nfft * 2 >= n, "{plan}");
            }
            // no larger NS fits this NFFT
            if plan.ns < MAX_SECTIONS {
                assert!((plan.ns + 1) * plan.nfft >= n, "{plan}");
            }
        }
    }

    #[test]
    fn test_display() {
        let plan = select_segments(10_000).unwrap();
        assert_eq!(
            plan.to_string(),
            "NS*NFFT = NT < N: 9*1024 = 9216 < 10000; NFFT = 2^10 = 1024"
        );
    }
}
