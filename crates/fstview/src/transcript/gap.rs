use std::sync::OnceLock;

use regex::Regex;

use super::NUMBER;
use crate::model::OptimalityGap;

/// One recognized optimality report, in priority order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GapObservation {
    /// `Best bound = B, Best integer = I`
    BoundAndIncumbent { bound: f64, incumbent: f64 },
    /// `MIP gap = P%`
    GapPercent(f64),
    /// `... MIP optimal ... tolerance (P%)`
    OptimalWithinTolerance(f64),
    /// `New best: ... Z = V`
    NewBest(f64),
    /// `Best branch is ... Z0 = A, Z1 = B`
    BestBranch { z0: f64, z1: f64 },
}

fn capture_f64(caps: &regex::Captures<'_>, idx: usize) -> Option<f64> {
    caps.get(idx)?.as_str().parse::<f64>().ok()
}

/// Number directly after `marker`, ignoring leading whitespace.
fn number_after(line: &str, marker: &str) -> Option<f64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(&format!(r"^\s*({NUMBER})")).unwrap());
    let rest = &line[line.find(marker)? + marker.len()..];
    capture_f64(&re.captures(rest)?, 1)
}

impl GapObservation {
    /// Classify a transcript line. The first pattern that matches wins.
    pub fn parse(line: &str) -> Option<Self> {
        static BOUND_RE: OnceLock<Regex> = OnceLock::new();
        static GAP_RE: OnceLock<Regex> = OnceLock::new();

        let bound_re = BOUND_RE.get_or_init(|| {
            Regex::new(&format!(
                r"^\s*Best bound\s*=\s*({NUMBER})\s*,\s*Best integer\s*=\s*({NUMBER})"
            ))
            .unwrap()
        });
        if let Some(caps) = bound_re.captures(line) {
            if let (Some(bound), Some(incumbent)) = (capture_f64(&caps, 1), capture_f64(&caps, 2))
            {
                return Some(Self::BoundAndIncumbent { bound, incumbent });
            }
        }

        let gap_re = GAP_RE
            .get_or_init(|| Regex::new(&format!(r"^\s*MIP gap\s*=\s*({NUMBER})\s*%")).unwrap());
        if let Some(pct) = gap_re.captures(line).and_then(|c| capture_f64(&c, 1)) {
            return Some(Self::GapPercent(pct));
        }

        if line.contains("MIP optimal") && line.contains("tolerance") {
            if let Some(pct) = number_after(line, "(") {
                return Some(Self::OptimalWithinTolerance(pct));
            }
        }

        if line.contains("New best:") {
            if let Some(z) = number_after(line, "Z =") {
                return Some(Self::NewBest(z));
            }
        }

        if line.contains("Best branch is") {
            if let (Some(z0), Some(z1)) = (number_after(line, "Z0 ="), number_after(line, "Z1 =")) {
                return Some(Self::BestBranch { z0, z1 });
            }
        }

        None
    }
}

fn relative_gap(incumbent: f64, bound: f64) -> Option<f64> {
    if incumbent == 0.0 || incumbent.is_nan() || bound.is_nan() {
        return None;
    }
    Some((incumbent - bound).abs() / incumbent.abs())
}

/// Folds observations in file order into a single gap.
///
/// Every observation that yields a gap replaces the previous one, so the
/// last such line in the transcript governs. When none does, the last
/// `New best` objective and the larger value of the last branch line give an
/// end-of-scan estimate.
#[derive(Debug, Default)]
pub struct GapEstimator {
    gap: Option<f64>,
    latest_new_best: Option<f64>,
    latest_branch_bound: Option<f64>,
}

impl GapEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe_line(&mut self, line: &str) {
        if let Some(obs) = GapObservation::parse(line) {
            self.record(obs);
        }
    }

    pub fn record(&mut self, obs: GapObservation) {
        match obs {
            GapObservation::BoundAndIncumbent { bound, incumbent } => {
                if let Some(g) = relative_gap(incumbent, bound) {
                    self.gap = Some(g);
                }
            }
            GapObservation::GapPercent(pct) | GapObservation::OptimalWithinTolerance(pct) => {
                self.gap = Some(pct / 100.0);
            }
            GapObservation::NewBest(z) => {
                self.latest_new_best = Some(z);
            }
            GapObservation::BestBranch { z0, z1 } => {
                let (low, high) = if z0 < z1 { (z0, z1) } else { (z1, z0) };
                self.latest_branch_bound = Some(high);
                if let Some(g) = relative_gap(low, high) {
                    self.gap = Some(g);
                }
            }
        }
    }

    pub fn finish(&self) -> OptimalityGap {
        if let Some(g) = self.gap {
            return OptimalityGap::Available(g);
        }
        match (self.latest_new_best, self.latest_branch_bound) {
            (Some(incumbent), Some(bound)) => relative_gap(incumbent, bound)
                .map(OptimalityGap::Available)
                .unwrap_or(OptimalityGap::Unavailable),
            _ => OptimalityGap::Unavailable,
        }
    }
}

/// Estimate the gap from a whole transcript.
pub fn estimate_gap(text: &str) -> OptimalityGap {
    let mut estimator = GapEstimator::new();
    for line in text.lines() {
        estimator.observe_line(line);
    }
    estimator.finish()
}
