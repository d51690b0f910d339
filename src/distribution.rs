use std::f64::consts::PI;

/// Normal distribution used as the focus falloff around the pointer.
///
/// `center` and `deviation` are in pixels of the container's vertical axis.
/// `factor` rescales the density so the peak can be pinned to a target value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distribution {
    pub center: f64,
    pub deviation: f64,
    pub factor: f64,
}

impl Distribution {
    pub fn new(center: f64, deviation: f64) -> Self {
        Self {
            center,
            deviation,
            factor: 1.0,
        }
    }

    /// Density at `position`, multiplied by `factor`.
    pub fn at(&self, position: f64) -> f64 {
        self.factor * self.raw_at(position)
    }

    /// Peak density, i.e. the value at `center`.
    pub fn max(&self) -> f64 {
        self.at(self.center)
    }

    /// Pin the peak to `1 / target`.
    ///
    /// Computed from the unscaled peak, so calling it again with the same
    /// target leaves the factor unchanged.
    pub fn set_max_factor(&mut self, target: f64) {
        self.factor = 1.0 / (target * self.raw_at(self.center));
    }

    fn raw_at(&self, position: f64) -> f64 {
        let variance = self.deviation * self.deviation;
        let z = (position - self.center) / self.deviation;
        (1.0 / (2.0 * PI * variance).sqrt()) * (-0.5 * z * z).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_normal_values() {
        let dist = Distribution::new(0.0, 1.0);

        assert!((dist.at(0.0) - 0.3989).abs() < 1e-4);
        assert_eq!(format!("{:.2}", dist.at(0.0)), "0.40");
        assert_eq!(format!("{:.2}", dist.at(2.0)), "0.05");
        assert_eq!(format!("{:.2}", dist.at(-2.0)), "0.05");
    }

    #[test]
    fn test_max_is_value_at_center() {
        let dist = Distribution::new(120.0, 42.0);
        assert_eq!(dist.max(), dist.at(120.0));
        assert!(dist.at(100.0) < dist.max());
        assert!(dist.at(140.0) < dist.max());
    }

    #[test]
    fn test_set_max_factor() {
        let mut dist = Distribution::new(0.0, 1.0);
        dist.set_max_factor(0.5);
        assert!((dist.max() - 2.0).abs() < 1e-12);

        // Same target again must not compound the factor
        dist.set_max_factor(0.5);
        assert!((dist.max() - 2.0).abs() < 1e-12);

        dist.set_max_factor(1.0);
        assert!((dist.max() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_falloff_is_symmetric() {
        let mut dist = Distribution::new(300.0, 30.0);
        dist.set_max_factor(0.25);
        for offset in [5.0, 30.0, 61.5, 200.0] {
            assert!((dist.at(300.0 - offset) - dist.at(300.0 + offset)).abs() < 1e-12);
        }
    }
}
