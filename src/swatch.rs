use std::cmp::Ordering;

/// A single color in the pool together with its weight.
///
/// Before clustering, `population` counts how many pixels across the whole
/// sticker set had exactly this RGBA value. After [`crate::Colors::run_kmeans`]
/// it counts how many pixels ended up in this color's cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Swatch {
    red: u8,
    green: u8,
    blue: u8,
    alpha: u8,
    population: u32,
}

impl Swatch {
    pub fn new((red, green, blue, alpha): (u8, u8, u8, u8), population: u32) -> Swatch {
        Self {
            red,
            green,
            blue,
            alpha,
            population,
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }

    pub fn rgba(self) -> (u8, u8, u8, u8) {
        (self.red, self.green, self.blue, self.alpha)
    }

    pub fn alpha(self) -> u8 {
        self.alpha
    }

    pub fn hsv(self) -> (f32, f32, f32) {
        crate::rgb_to_hsv(self.rgb())
    }

    pub fn population(self) -> u32 {
        self.population
    }
}

/// Sort into the canonical pool order: most populous first, ties broken by
/// descending RGBA so equal-weight colors still land in a stable order.
pub(crate) fn sort_by_prevalence(swatches: &mut [Swatch]) {
    swatches.sort_by(|lhs, rhs| match rhs.population.cmp(&lhs.population) {
        Ordering::Equal => rhs.rgba().cmp(&lhs.rgba()),
        unequal => unequal,
    });
}
