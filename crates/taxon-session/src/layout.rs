// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Surface sizing: sanitize caller-supplied numbers, then clamp.

/// Caller-supplied layout wishes. All fields are non-negative finite
/// numbers; anything else falls back to the field's default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSpec {
    /// Requested width.
    pub width: f64,
    /// Requested height.
    pub height: f64,
    /// Lower width bound.
    pub min_width: f64,
    /// Lower height bound.
    pub min_height: f64,
    /// Upper width bound.
    pub max_width: f64,
    /// Upper height bound.
    pub max_height: f64,
    /// Inner padding.
    pub padding: f64,
}

impl Default for LayoutSpec {
    fn default() -> Self {
        Self {
            width: 520.0,
            height: 420.0,
            min_width: 280.0,
            min_height: 200.0,
            max_width: 1600.0,
            max_height: 1200.0,
            padding: 16.0,
        }
    }
}

/// Final surface geometry after sanitize + clamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLayout {
    /// Width clamped into `[min_width, max_width]`.
    pub width: f64,
    /// Height clamped into `[min_height, max_height]`.
    pub height: f64,
    /// Sanitized padding.
    pub padding: f64,
}

impl LayoutSpec {
    /// Sanitize every field against its default, then clamp width and
    /// height into the sanitized `[min, max]` ranges.
    pub fn resolve(&self) -> ResolvedLayout {
        let d = Self::default();
        let min_width = sanitize(self.min_width, d.min_width);
        let min_height = sanitize(self.min_height, d.min_height);
        // A max below its min would make clamp panic; pin it up.
        let max_width = sanitize(self.max_width, d.max_width).max(min_width);
        let max_height = sanitize(self.max_height, d.max_height).max(min_height);
        ResolvedLayout {
            width: sanitize(self.width, d.width).clamp(min_width, max_width),
            height: sanitize(self.height, d.height).clamp(min_height, max_height),
            padding: sanitize(self.padding, d.padding),
        }
    }
}

fn sanitize(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_unchanged() {
        let resolved = LayoutSpec::default().resolve();
        assert!((resolved.width - 520.0).abs() < f64::EPSILON);
        assert!((resolved.height - 420.0).abs() < f64::EPSILON);
        assert!((resolved.padding - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn oversized_requests_clamp_to_max() {
        let spec = LayoutSpec {
            width: 10_000.0,
            height: 9_000.0,
            ..LayoutSpec::default()
        };
        let resolved = spec.resolve();
        assert!((resolved.width - 1600.0).abs() < f64::EPSILON);
        assert!((resolved.height - 1200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn undersized_requests_clamp_to_min() {
        let spec = LayoutSpec {
            width: 1.0,
            height: 0.0,
            ..LayoutSpec::default()
        };
        let resolved = spec.resolve();
        assert!((resolved.width - 280.0).abs() < f64::EPSILON);
        assert!((resolved.height - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn non_finite_and_negative_fields_fall_back_to_defaults() {
        let spec = LayoutSpec {
            width: f64::NAN,
            height: -5.0,
            padding: f64::INFINITY,
            ..LayoutSpec::default()
        };
        let resolved = spec.resolve();
        assert!((resolved.width - 520.0).abs() < f64::EPSILON);
        assert!((resolved.height - 420.0).abs() < f64::EPSILON);
        assert!((resolved.padding - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn inverted_bounds_pin_max_up_to_min() {
        let spec = LayoutSpec {
            width: 500.0,
            min_width: 800.0,
            max_width: 300.0,
            ..LayoutSpec::default()
        };
        let resolved = spec.resolve();
        assert!((resolved.width - 800.0).abs() < f64::EPSILON);
    }
}
