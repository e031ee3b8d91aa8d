use num_traits::Float;

use crate::{Error, Result};

/// A closed interval `[lower, upper]` that a correlation coefficient must stay
/// within to be considered stable.
///
/// Both limits are finite, ordered and within `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corridor<T> {
    lower: T,
    upper: T,
}

impl<T: Float> Corridor<T> {
    /// Creates a corridor from explicit limits
    ///
    /// # Arguments
    ///
    /// * `lower` - The lower limit
    /// * `upper` - The upper limit
    ///
    /// # Returns
    ///
    /// * `Result<Self>` - The corridor, or [`Error::InvalidCorridor`] if the
    ///   limits are not finite, inverted or outside `[-1, 1]`
    pub fn new(lower: T, upper: T) -> Result<Self> {
        let valid = lower.is_finite()
            && upper.is_finite()
            && lower <= upper
            && lower >= -T::one()
            && upper <= T::one();
        if valid {
            Ok(Self { lower, upper })
        } else {
            Err(Error::InvalidCorridor {
                lower: lower.to_f64().unwrap_or(f64::NAN),
                upper: upper.to_f64().unwrap_or(f64::NAN),
            })
        }
    }

    /// Creates the corridor `[rho - precision, rho + precision]`, clipped to
    /// `[-1, 1]`
    ///
    /// # Arguments
    ///
    /// * `rho` - The population correlation at the centre of the corridor
    /// * `precision` - The half-width of the corridor
    ///
    /// # Examples
    ///
    /// ```
    /// use fastpos::Corridor;
    /// use assert_approx_eq::assert_approx_eq;
    ///
    /// let corridor: Corridor<f64> = Corridor::around(0.5, 0.1).unwrap();
    /// assert_approx_eq!(corridor.lower(), 0.4);
    /// assert_approx_eq!(corridor.upper(), 0.6);
    ///
    /// let corridor = Corridor::around(0.95, 0.1).unwrap();
    /// assert_eq!(corridor.upper(), 1.0);
    /// ```
    pub fn around(rho: T, precision: T) -> Result<Self> {
        if !precision.is_finite() || precision < T::zero() {
            return Err(Error::InvalidPrecision(precision.to_f64().unwrap_or(f64::NAN)));
        }
        Self::clipped(rho - precision, rho + precision)
    }

    /// Creates the corridor `[rho - |rho| * precision, rho + |rho| * precision]`,
    /// clipped to `[-1, 1]`
    ///
    /// # Arguments
    ///
    /// * `rho` - The population correlation at the centre of the corridor
    /// * `precision` - The half-width relative to `rho`
    pub fn around_relative(rho: T, precision: T) -> Result<Self> {
        if !precision.is_finite() || precision < T::zero() {
            return Err(Error::InvalidPrecision(precision.to_f64().unwrap_or(f64::NAN)));
        }
        let half_width = rho.abs() * precision;
        Self::clipped(rho - half_width, rho + half_width)
    }

    fn clipped(lower: T, upper: T) -> Result<Self> {
        Self::new(lower.max(-T::one()), upper.min(T::one()))
    }

    /// Returns the lower limit
    pub const fn lower(&self) -> T {
        self.lower
    }

    /// Returns the upper limit
    pub const fn upper(&self) -> T {
        self.upper
    }

    /// Returns `true` if `r` lies within the closed interval. NaN never does.
    #[inline]
    pub fn contains(&self, r: T) -> bool {
        r >= self.lower && r <= self.upper
    }

    /// Returns `true` if a possibly undefined correlation lies within the
    /// corridor. An undefined correlation is never inside.
    #[inline]
    pub fn admits(&self, r: Option<T>) -> bool {
        r.is_some_and(|r| self.contains(r))
    }
}
