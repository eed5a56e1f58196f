// Minimum kill rate for a reproducibility target, and budget parsing

use super::{MergeError, Result};

/// Weak behaviors per second needed to observe at least one weak behavior
/// within `budget` seconds with probability `reproducibility`.
///
/// # Example
/// ```
/// use killscope::merge::ceiling_rate;
///
/// // ceil(-ln(0.00001)) = ceil(11.51) = 12
/// assert_eq!(ceiling_rate(0.99999, 4.0).unwrap(), 3.0);
/// ```
pub fn ceiling_rate(reproducibility: f64, budget: f64) -> Result<f64> {
    if !(reproducibility > 0.0 && reproducibility < 1.0) {
        return Err(MergeError::InvalidReproducibility(reproducibility));
    }
    if !(budget > 0.0 && budget.is_finite()) {
        return Err(MergeError::InvalidBudget(budget.to_string()));
    }
    Ok((-(1.0 - reproducibility).ln()).ceil() / budget)
}

/// Parse a per-test budget in seconds: `"4"`, `"0.5"` or a fraction `"1/1024"`
pub fn parse_budget(label: &str) -> Result<f64> {
    let invalid = || MergeError::InvalidBudget(label.to_string());
    let parse = |part: &str| part.trim().parse::<f64>().map_err(|_| invalid());

    let value = match label.split_once('/') {
        Some((numerator, denominator)) => {
            let denominator = parse(denominator)?;
            if denominator == 0.0 {
                return Err(invalid());
            }
            parse(numerator)? / denominator
        }
        None => parse(label)?,
    };

    if !(value > 0.0 && value.is_finite()) {
        return Err(invalid());
    }
    Ok(value)
}
