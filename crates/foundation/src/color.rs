use std::fmt;

use serde::{Deserialize, Serialize};

/// 8-bit RGB color with a float alpha, rendered as a CSS `rgba()` string.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Linear interpolation; `k` is clamped to `[0, 1]`.
    pub fn lerp(self, to: Rgba, k: f64) -> Rgba {
        let k = k.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * k).round() as u8;
        Rgba {
            r: mix(self.r, to.r),
            g: mix(self.g, to.g),
            b: mix(self.b, to.b),
            a: (self.a as f64 + (to.a as f64 - self.a as f64) * k) as f32,
        }
    }

    /// Adds `by` to every channel, each result capped at `cap` unless the
    /// channel already exceeds it.
    pub fn brighten(self, by: u8, cap: u8) -> Rgba {
        let up = |c: u8| {
            if c >= cap {
                c
            } else {
                c.saturating_add(by).min(cap)
            }
        };
        Rgba {
            r: up(self.r),
            g: up(self.g),
            b: up(self.b),
            a: self.a,
        }
    }

    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::Rgba;

    #[test]
    fn css_matches_rgba_syntax() {
        assert_eq!(Rgba::opaque(255, 15, 15).to_css(), "rgba(255, 15, 15, 1)");
        let half = Rgba { a: 0.6, ..Rgba::opaque(255, 86, 86) };
        assert_eq!(half.to_css(), "rgba(255, 86, 86, 0.6)");
    }

    #[test]
    fn lerp_hits_endpoints() {
        let a = Rgba::opaque(255, 172, 172);
        let b = Rgba::opaque(255, 120, 120);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5).g, 146);
    }

    #[test]
    fn brighten_respects_cap() {
        let c = Rgba::opaque(255, 180, 180).brighten(28, 200);
        assert_eq!((c.r, c.g, c.b), (255, 200, 200));
    }
}
