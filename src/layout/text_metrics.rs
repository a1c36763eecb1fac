use serde::{Deserialize, Serialize};

/// Font parameters for one label class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub size: f64,
    pub weight: u16,
    pub family: String,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            size: 12.0,
            weight: 400,
            family: "sans-serif".to_owned(),
        }
    }
}

impl FontSpec {
    #[must_use]
    pub fn sized(size: f64) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.weight = 700;
        self
    }
}

/// The one external capability the layout engine needs: rendered pixel
/// width for a piece of text.
///
/// Callers plug in a real backend-driven measurer (e.g. canvas or Pango
/// metrics); [`HeuristicTextMeasurer`] ships for tests and early layout.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> f64;
}

/// A tiny heuristic measurer assuming an average glyph width of ~0.6em.
///
/// Deterministic and monotone in text length, which is all the wrap/pack
/// searches rely on.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        0.6 * font.size * text.chars().count() as f64
    }
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &M {
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        (**self).measure(text, font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_width_scales_with_length_and_size() {
        let measurer = HeuristicTextMeasurer;
        let font = FontSpec::sized(10.0);
        let short = measurer.measure("ab", &font);
        let long = measurer.measure("abcd", &font);
        assert!(long > short);
        assert!((long - 2.0 * short).abs() < 1e-9);
    }
}
