use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` notation, the only form a
    /// per-record color column may carry.
    pub fn from_hex_str(input: &str) -> ChartResult<Self> {
        let digits = input.strip_prefix('#').ok_or_else(|| {
            ChartError::InvalidData(format!("color `{input}` must start with `#`"))
        })?;

        let channel = |hex: &str| -> ChartResult<f64> {
            u8::from_str_radix(hex, 16)
                .map(|v| f64::from(v) / 255.0)
                .map_err(|_| ChartError::InvalidData(format!("invalid hex color `{input}`")))
        };

        match digits.len() {
            3 => {
                let mut parts = [0.0; 3];
                for (slot, ch) in parts.iter_mut().zip(digits.chars()) {
                    let doubled = format!("{ch}{ch}");
                    *slot = channel(&doubled)?;
                }
                Ok(Self::rgb(parts[0], parts[1], parts[2]))
            }
            6 => Ok(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            8 => Ok(Self::rgba(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
                channel(&digits[6..8])?,
            )),
            _ => Err(ChartError::InvalidData(format!(
                "invalid hex color `{input}`"
            ))),
        }
    }

    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Named categorical palette used to color groups by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Palette {
    /// Muted eight-color dashboard default.
    #[default]
    Dashboard,
    /// The D3 `category10` scheme.
    Category10,
    /// Low-saturation pastel variant for dense grouped charts.
    Pastel,
}

const DASHBOARD: [Color; 8] = [
    Color::rgb(0.267, 0.447, 0.769),
    Color::rgb(0.929, 0.490, 0.192),
    Color::rgb(0.655, 0.655, 0.655),
    Color::rgb(1.000, 0.753, 0.000),
    Color::rgb(0.357, 0.608, 0.835),
    Color::rgb(0.439, 0.678, 0.278),
    Color::rgb(0.149, 0.267, 0.471),
    Color::rgb(0.620, 0.286, 0.137),
];

const CATEGORY10: [Color; 10] = [
    Color::rgb(0.122, 0.467, 0.706),
    Color::rgb(1.000, 0.498, 0.055),
    Color::rgb(0.173, 0.627, 0.173),
    Color::rgb(0.839, 0.153, 0.157),
    Color::rgb(0.580, 0.404, 0.741),
    Color::rgb(0.549, 0.337, 0.294),
    Color::rgb(0.890, 0.467, 0.761),
    Color::rgb(0.498, 0.498, 0.498),
    Color::rgb(0.737, 0.741, 0.133),
    Color::rgb(0.090, 0.745, 0.812),
];

const PASTEL: [Color; 8] = [
    Color::rgb(0.682, 0.780, 0.910),
    Color::rgb(1.000, 0.733, 0.471),
    Color::rgb(0.596, 0.875, 0.541),
    Color::rgb(1.000, 0.596, 0.588),
    Color::rgb(0.773, 0.690, 0.835),
    Color::rgb(0.769, 0.612, 0.580),
    Color::rgb(0.980, 0.745, 0.835),
    Color::rgb(0.780, 0.780, 0.780),
];

impl Palette {
    #[must_use]
    pub fn colors(self) -> &'static [Color] {
        match self {
            Self::Dashboard => &DASHBOARD,
            Self::Category10 => &CATEGORY10,
            Self::Pastel => &PASTEL,
        }
    }

    /// Color for a group position; wraps around when the palette is smaller
    /// than the group domain.
    #[must_use]
    pub fn color_at(self, index: usize) -> Color {
        let colors = self.colors();
        colors[index % colors.len()]
    }
}
