//! Linear pixel scales with d3-scale semantics, plus d3-array tick generation.

use serde::Serialize;

use super::types::EffectTotals;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
    pub clamp: bool,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            clamp: false,
        }
    }

    pub fn clamped(mut self) -> Self {
        self.clamp = true;
        self
    }

    /// Domain to range. A degenerate domain maps everything to the range midpoint.
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return (r0 + r1) / 2.0;
        }
        let mut t = (value - d0) / span;
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        r0 + t * (r1 - r0)
    }

    /// Range to domain. A degenerate range inverts to the domain midpoint.
    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        if span == 0.0 || !span.is_finite() {
            return (d0 + d1) / 2.0;
        }
        let mut t = (px - r0) / span;
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        d0 + t * (d1 - d0)
    }

    /// Pixel length of a domain-space length.
    pub fn extent(&self, value: f64) -> f64 {
        self.map(value) - self.map(0.0)
    }

    /// Domain-space length of a pixel length.
    pub fn invert_extent(&self, px: f64) -> f64 {
        self.invert(px) - self.invert(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForceScales {
    pub domain_size: f64,
    /// `[0, domain_size] -> [0, width]`.
    pub bar: LinearScale,
    /// Shift that puts the base value at the horizontal center.
    pub offset: f64,
    /// `[-domain_size/2, domain_size/2] -> [0, width]`, clamped. Drives the axis.
    pub centered: LinearScale,
}

impl ForceScales {
    pub fn new(totals: &EffectTotals, width: f64, headroom: f64) -> Self {
        let domain_size = totals.positive.max(totals.negative) * headroom;
        let bar = LinearScale::new((0.0, domain_size), (0.0, width));
        let offset = width / 2.0 - bar.map(totals.negative);
        let centered =
            LinearScale::new((-domain_size / 2.0, domain_size / 2.0), (0.0, width)).clamped();
        Self {
            domain_size,
            bar,
            offset,
            centered,
        }
    }

    /// Pixel position of a cumulative contribution.
    pub fn px(&self, x: f64) -> f64 {
        self.bar.map(x) + self.offset
    }

    pub fn extent(&self, length: f64) -> f64 {
        self.bar.extent(length)
    }

    pub fn invert_extent(&self, px: f64) -> f64 {
        self.bar.invert_extent(px)
    }
}

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

fn js_round(x: f64) -> f64 {
    (x + 0.5).floor()
}

fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let inverse = 10f64.powf(-power) / factor;
        i1 = js_round(start * inverse);
        i2 = js_round(stop * inverse);
        if i1 / inverse < start {
            i1 += 1.0;
        }
        if i2 / inverse > stop {
            i2 -= 1.0;
        }
        inc = -inverse;
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = js_round(start / inc);
        i2 = js_round(stop / inc);
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
    }
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Nicely rounded values spanning `[start, stop]`, roughly `count` of them.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    let count = count as f64;
    if !(count > 0.0) || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (i1, i2, inc) = if reverse {
        tick_spec(stop, start, count)
    } else {
        tick_spec(start, stop, count)
    };
    // subnormal spans overflow the power of ten
    if !i1.is_finite() || !i2.is_finite() || !inc.is_finite() || !(i2 >= i1) {
        return Vec::new();
    }
    let Some(n) = ((i2 - i1) as usize).checked_add(1) else {
        return Vec::new();
    };
    let value = |i: usize| {
        let k = i1 + i as f64;
        if inc < 0.0 { k / -inc } else { k * inc }
    };
    if reverse {
        (0..n).map(|i| value(n - 1 - i)).collect()
    } else {
        (0..n).map(value).collect()
    }
}
