//! Per-(individual, start-node, depth) counters and moment sums (§3,
//! §4.2). One-pass mean/variance identity, clamping rounding-induced
//! negative variance to zero per §4.9.

#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub match_count: u64,
    pub eval_count: u64,
    /// sums over x at t+1
    pub sum_x1: f64,
    pub sum_x1_sq: f64,
    /// sums over x at t+2, populated only for the dual-horizon dialect
    pub sum_x2: f64,
    pub sum_x2_sq: f64,
    /// record indices i that matched, effective=true, at this depth
    pub matched_indices: Vec<usize>,
}

impl Cell {
    /// (mean, sigma) of x at t+1, or None if never matched
    pub fn stats_horizon1(&self) -> Option<(f64, f64)> {
        Self::moments(self.match_count, self.sum_x1, self.sum_x1_sq)
    }

    /// (mean, sigma) of x at t+2, or None if never matched / single-horizon
    pub fn stats_horizon2(&self) -> Option<(f64, f64)> {
        Self::moments(self.match_count, self.sum_x2, self.sum_x2_sq)
    }

    fn moments(count: u64, sum: f64, sum_sq: f64) -> Option<(f64, f64)> {
        if count == 0 {
            return None;
        }
        let n = count as f64;
        let mean = sum / n;
        let var = (sum_sq / n - mean * mean).max(0.0);
        Some((mean, var.sqrt()))
    }

    /// negative_count[k,j] := match_count[k,0] - eval_count[k,j] + match_count[k,j] (§4.2)
    pub fn effective_denominator(&self, depth0: &Cell) -> u64 {
        (depth0.match_count + self.match_count).saturating_sub(self.eval_count)
    }

    /// support_rate := match_count / effective_denominator, 0 on a zero denominator (§4.9)
    pub fn support_rate(&self, depth0: &Cell) -> f64 {
        let denom = self.effective_denominator(depth0);
        if denom == 0 {
            0.0
        } else {
            self.match_count as f64 / denom as f64
        }
    }
}
