use eyre::{ensure, Result};
use statrs::distribution::{Binomial, DiscreteCDF};

/// One-sided ("greater") exact binomial test of feature concordance against a background
/// proportion.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BinomialTest {
    background: f64,
}

impl BinomialTest {
    pub fn new(background: f64) -> Result<Self> {
        ensure!(
            background > 0.0 && background < 1.0,
            "Background proportion must be within (0, 1), got {background}"
        );
        Ok(Self { background })
    }

    pub fn background(&self) -> f64 {
        self.background
    }

    /// P(X >= concordant) for X ~ Binomial(concordant + discordant, background).
    /// Features without concordant alignments get 0 without running the test.
    pub fn p_value(&self, concordant: u64, discordant: u64) -> Result<f64> {
        if concordant == 0 {
            return Ok(0.0);
        }
        let distribution = Binomial::new(self.background, concordant + discordant)?;
        Ok(distribution.sf(concordant - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_tail() -> Result<()> {
        let test = BinomialTest::new(0.6)?;
        for (concordant, discordant, expected) in [
            (1, 0, 0.6),
            (2, 0, 0.36),
            (1, 1, 0.84),
            (2, 1, 0.648),
        ] {
            let pvalue = test.p_value(concordant, discordant)?;
            assert!(
                (pvalue - expected).abs() < 1e-9,
                "{concordant}/{discordant}: {pvalue} != {expected}"
            );
        }
        Ok(())
    }

    #[test]
    fn test_concordance_above_background() -> Result<()> {
        let test = BinomialTest::new(0.6)?;
        assert!(test.p_value(90, 10)? < 0.01);
        assert!(test.p_value(60, 40)? > 0.4);
        Ok(())
    }

    #[test]
    fn test_sentinel_without_concordant_alignments() -> Result<()> {
        let test = BinomialTest::new(0.6)?;
        assert_eq!(test.p_value(0, 0)?, 0.0);
        assert_eq!(test.p_value(0, 250)?, 0.0);
        Ok(())
    }

    #[test]
    fn test_invalid_background() {
        assert!(BinomialTest::new(0.0).is_err());
        assert!(BinomialTest::new(1.0).is_err());
        assert!(BinomialTest::new(f64::NAN).is_err());
    }
}
