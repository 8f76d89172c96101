//! Linear axis scaling and tick placement

/// Maps a data domain onto a pixel range
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    d0: f64,
    d1: f64,
    r0: f64,
    r1: f64,
}

impl LinearScale {
    /// Build a scale. A degenerate domain (min == max) is widened by one
    /// unit either side so single-valued data still renders.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (mut d0, mut d1) = domain;
        if d0 == d1 {
            d0 -= 1.0;
            d1 += 1.0;
        }
        Self {
            d0,
            d1,
            r0: range.0,
            r1: range.1,
        }
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.d0, self.d1)
    }

    /// Map a domain value to the pixel range
    pub fn map(&self, v: f64) -> f64 {
        let t = (v - self.d0) / (self.d1 - self.d0);
        self.r0 + t * (self.r1 - self.r0)
    }

    /// Tick positions at a nice step, covering the domain
    pub fn ticks(&self, target: usize) -> Vec<f64> {
        let step = nice_step(self.d1 - self.d0, target);
        let mut ticks = Vec::new();
        let mut v = (self.d0 / step).ceil() * step;
        // Round away accumulated float error so labels stay clean
        while v <= self.d1 + step * 1e-9 {
            ticks.push((v / step).round() * step);
            v += step;
        }
        ticks
    }
}

/// A tick step from the 1/2/5 ladder close to `span / target`
pub fn nice_step(span: f64, target: usize) -> f64 {
    let raw = span.abs() / target.max(1) as f64;
    if raw == 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let factor = if norm < 1.5 {
        1.0
    } else if norm < 3.5 {
        2.0
    } else if norm < 7.5 {
        5.0
    } else {
        10.0
    };
    factor * mag
}

/// Format a tick label without float-noise digits
pub fn format_tick(v: f64) -> String {
    let rounded = (v * 1e9).round() / 1e9;
    if rounded == rounded.trunc() && rounded.abs() < 1e15 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}
