//! Parcel dimensions used for rate quotes.

use crate::error::FieldErrors;

/// Heaviest parcel accepted for a quote, in kg.
pub const MAX_WEIGHT_KG: f64 = 10_000.0;

/// Longest side accepted for a quote, in cm.
pub const MAX_DIMENSION_CM: f64 = 1_000.0;

/// A parcel described by weight (kg) and dimensions (cm).
///
/// Built with chained setters:
///
/// ```
/// use carrier_rates::domain::shipment::Package;
///
/// let package = Package::new()
///     .with_weight(2.1)
///     .with_height(10.0)
///     .with_length(20.0)
///     .with_width(15.0);
///
/// assert_eq!(package.volume_cm3(), 3000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Package {
    weight: f64,
    height: f64,
    length: f64,
    width: f64,
}

impl Package {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn volume_cm3(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// Checks that every measurement is positive and within the accepted limits.
    pub(crate) fn check(&self, fields: &mut FieldErrors) {
        let measurements = [
            ("weight", self.weight, MAX_WEIGHT_KG),
            ("height", self.height, MAX_DIMENSION_CM),
            ("length", self.length, MAX_DIMENSION_CM),
            ("width", self.width, MAX_DIMENSION_CM),
        ];

        for (name, value, max) in measurements {
            let problem = if !value.is_finite() || value <= 0.0 {
                "Must be a positive number".to_string()
            } else if value > max {
                format!("Must be at most {max}")
            } else {
                continue;
            };

            fields.entry(name.to_string()).or_default().push(problem);
        }
    }
}
