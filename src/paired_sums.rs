use num_traits::Float;

use crate::Kbn;

/// Running sufficient statistics of a paired sample.
///
/// `PairedSums<T>` keeps the five sums from which Pearson's r can be recomputed
/// in constant time: the sums of both variables, their sums of squares and
/// the sum of their products. Pairs can be pushed onto and popped off the
/// sample in any order, as long as every popped pair was pushed before.
///
/// All sums use Kahan-Babuska-Neumaier compensated summation, so a long run of
/// removals (as when a sample is shrunk from its maximum size down to its
/// minimum) stays within rounding distance of the sums recomputed from scratch.
#[derive(Debug, Clone)]
pub struct PairedSums<T> {
    /// Number of pairs in the sample
    len: usize,
    /// Sum of inputs
    sum: (Kbn<T>, Kbn<T>),
    /// Sum of squares
    sum_sq: (Kbn<T>, Kbn<T>),
    /// Sum of products
    sum_prod: Kbn<T>,
}

impl<T> PairedSums<T>
where
    T: Default + Clone + Float,
{
    /// Creates an empty `PairedSums`
    pub fn new() -> Self {
        Self {
            len: 0,
            sum: Default::default(),
            sum_sq: Default::default(),
            sum_prod: Default::default(),
        }
    }

    /// Builds the sums over every pair yielded by `pairs`
    ///
    /// # Arguments
    ///
    /// * `pairs` - The paired values (x, y)
    ///
    /// # Returns
    ///
    /// * `Self` - The sums over all pairs
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, T)>,
    {
        let mut sums = Self::new();
        pairs.into_iter().for_each(|pair| {
            sums.push(pair);
        });
        sums
    }

    /// Resets the sums to an empty sample
    ///
    /// # Returns
    ///
    /// * `&mut Self` - The sums object
    pub fn reset(&mut self) -> &mut Self {
        self.len = 0;
        self.sum = Default::default();
        self.sum_sq = Default::default();
        self.sum_prod = Default::default();
        self
    }

    /// Returns the number of pairs in the sample
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the sample holds no pairs
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Adds a pair to the sample
    ///
    /// # Arguments
    ///
    /// * `value` - The pair (x, y) to add
    ///
    /// # Returns
    ///
    /// * `&mut Self` - The sums object for method chaining
    pub fn push(&mut self, (x, y): (T, T)) -> &mut Self {
        self.len += 1;
        self.sum.0 += x;
        self.sum.1 += y;
        self.sum_sq.0 += x * x;
        self.sum_sq.1 += y * y;
        self.sum_prod += x * y;
        self
    }

    /// Removes a previously pushed pair from the sample
    ///
    /// Popping from an empty sample is a no-op.
    ///
    /// # Arguments
    ///
    /// * `value` - The pair (x, y) to remove
    ///
    /// # Returns
    ///
    /// * `&mut Self` - The sums object for method chaining
    pub fn pop(&mut self, (x, y): (T, T)) -> &mut Self {
        if self.len == 0 {
            return self;
        }
        self.len -= 1;
        self.sum.0 -= x;
        self.sum.1 -= y;
        self.sum_sq.0 -= x * x;
        self.sum_sq.1 -= y * y;
        self.sum_prod -= x * y;
        self
    }

    /// Returns the sums of x and y
    pub fn sum(&self) -> (T, T) {
        (self.sum.0.total(), self.sum.1.total())
    }

    /// Returns the sums of squares of x and y
    pub fn sum_sq(&self) -> (T, T) {
        (self.sum_sq.0.total(), self.sum_sq.1.total())
    }

    /// Returns the sum of products x * y
    pub fn sum_prod(&self) -> T {
        self.sum_prod.total()
    }

    /// Returns the correlation coefficient (Pearson's r) of the sample
    ///
    /// Computed from the sums alone as
    /// `(n Sxy - Sx Sy) / sqrt((n Sxx - Sx^2) (n Syy - Sy^2))`.
    ///
    /// The coefficient is undefined, and `None` is returned, when either
    /// variance factor is zero, negative through cancellation, or not finite.
    /// Finite results are clamped to `[-1, 1]`.
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The correlation coefficient, or `None` if undefined
    ///
    /// # Examples
    ///
    /// ```
    /// use fastpos::PairedSums;
    /// use assert_approx_eq::assert_approx_eq;
    ///
    /// let inputs = [
    ///     (0.496714, 0.115991),
    ///     (-0.138264, -0.329650),
    ///     (0.647689, 0.574363),
    /// ];
    /// let mut sums: PairedSums<f64> = PairedSums::from_pairs(inputs);
    /// assert_approx_eq!(sums.corr().unwrap(), 0.939464, 0.0001);
    ///
    /// sums.push((1.523030, 0.109481));
    /// sums.pop((1.523030, 0.109481));
    /// assert_approx_eq!(sums.corr().unwrap(), 0.939464, 0.0001);
    ///
    /// sums.reset().push((1.0, 2.0)).push((1.0, 3.0));
    /// assert_eq!(sums.corr(), None);
    /// ```
    pub fn corr(&self) -> Option<T> {
        let n = T::from(self.len)?;
        let (sum_x, sum_y) = self.sum();
        let (sum_sq_x, sum_sq_y) = self.sum_sq();

        let var_x = n * sum_sq_x - sum_x * sum_x;
        let var_y = n * sum_sq_y - sum_y * sum_y;
        let defined = var_x > T::zero()
            && var_y > T::zero()
            && var_x.is_finite()
            && var_y.is_finite();
        if !defined {
            return None;
        }

        let r = (n * self.sum_prod() - sum_x * sum_y) / (var_x * var_y).sqrt();
        r.is_finite().then(|| r.max(-T::one()).min(T::one()))
    }
}

impl<T> Default for PairedSums<T>
where
    T: Default + Clone + Float,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use assert_approx_eq::assert_approx_eq;

    fn inputs() -> Vec<(f64, f64)> {
        vec![
            (0.496714, 0.115991),
            (-0.138264, -0.329650),
            (0.647689, 0.574363),
            (1.523030, 0.109481),
            (-0.234153, -1.026366),
            (-0.234137, -0.445040),
            (1.579213, 0.599033),
            (0.767435, 0.694328),
            (-0.469474, -0.782644),
            (0.542560, -0.326360),
        ]
    }

    #[test]
    fn corr_matches_known_values() {
        let inputs = inputs();
        let expected = [(2, 1.0), (3, 0.939464), (4, 0.454672), (10, 0.777711)];
        for (n, e) in expected {
            let sums = PairedSums::from_pairs(inputs[..n].iter().copied());
            assert_approx_eq!(sums.corr().unwrap(), e, 0.0001);
        }
    }

    #[test]
    fn pop_matches_recomputed_prefix() {
        let inputs = inputs();
        let mut sums = PairedSums::from_pairs(inputs.iter().copied());

        for n in (1..inputs.len()).rev() {
            sums.pop(inputs[n]);
            let fresh = PairedSums::from_pairs(inputs[..n].iter().copied());

            assert_eq!(sums.len(), n);
            assert_approx_eq!(sums.sum().0, fresh.sum().0, 1e-12);
            assert_approx_eq!(sums.sum().1, fresh.sum().1, 1e-12);
            assert_approx_eq!(sums.sum_sq().0, fresh.sum_sq().0, 1e-12);
            assert_approx_eq!(sums.sum_sq().1, fresh.sum_sq().1, 1e-12);
            assert_approx_eq!(sums.sum_prod(), fresh.sum_prod(), 1e-12);
        }
    }

    #[test]
    fn corr_undefined_for_degenerate_variance() {
        assert_eq!(PairedSums::<f64>::new().corr(), None);
        assert_eq!(PairedSums::from_pairs([(1.0, 1.0)]).corr(), None);

        let constant_x = PairedSums::from_pairs([(2.0, 1.0), (2.0, 5.0), (2.0, -3.0)]);
        assert_eq!(constant_x.corr(), None);

        let constant_y = PairedSums::from_pairs([(1.0, 4.0), (2.0, 4.0), (3.0, 4.0)]);
        assert_eq!(constant_y.corr(), None);
    }

    #[test]
    fn corr_of_collinear_pairs_is_unit() {
        let pairs: Vec<(f64, f64)> = (0..50).map(|i| (i as f64 * 0.1, i as f64 * 0.1)).collect();
        assert_eq!(PairedSums::from_pairs(pairs.iter().copied()).corr(), Some(1.0));

        let pairs: Vec<(f64, f64)> = (0..50).map(|i| (i as f64 * 0.1, -3.0 * i as f64)).collect();
        assert_approx_eq!(PairedSums::from_pairs(pairs).corr().unwrap(), -1.0, 1e-12);
    }

    #[test]
    fn pop_on_empty_is_noop() {
        let mut sums = PairedSums::<f64>::new();
        sums.pop((1.0, 2.0));
        assert!(sums.is_empty());
        assert_eq!(sums.sum(), (0.0, 0.0));
    }
}
