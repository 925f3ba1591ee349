//! Typed access to a `ParamSet` on behalf of one estimator family.

use crate::domain::{ParamSet, ParamValue};
use crate::error::AppError;

/// Reads parameters for `family`, rejecting names outside `known`.
pub struct ParamReader<'a> {
    family: &'static str,
    params: &'a ParamSet,
}

impl<'a> ParamReader<'a> {
    pub fn new(family: &'static str, params: &'a ParamSet, known: &[&str]) -> Result<Self, AppError> {
        if let Some(unknown) = params.keys().find(|k| !known.contains(k)) {
            return Err(AppError::input(format!(
                "Unknown parameter `{unknown}` for {family} (supported: {}).",
                known.join(", ")
            )));
        }
        Ok(Self { family, params })
    }

    pub fn f64_or(&self, key: &str, default: f64) -> Result<f64, AppError> {
        match self.params.get(key) {
            None => Ok(default),
            Some(v) => v
                .as_f64()
                .filter(|x| x.is_finite())
                .ok_or_else(|| self.invalid(key, v, "a finite number")),
        }
    }

    pub fn usize_or(&self, key: &str, default: usize) -> Result<usize, AppError> {
        match self.params.get(key) {
            None => Ok(default),
            Some(v) => v.as_usize().ok_or_else(|| self.invalid(key, v, "a non-negative integer")),
        }
    }

    /// A text parameter restricted to `choices`.
    pub fn choice_or(&self, key: &str, default: &'static str, choices: &[&'static str]) -> Result<&'static str, AppError> {
        let Some(v) = self.params.get(key) else {
            return Ok(default);
        };
        let text = v.as_str().ok_or_else(|| self.invalid(key, v, "a string"))?;
        choices
            .iter()
            .find(|c| c.eq_ignore_ascii_case(text))
            .copied()
            .ok_or_else(|| self.invalid(key, v, &format!("one of {}", choices.join(", "))))
    }

    fn invalid(&self, key: &str, value: &ParamValue, expected: &str) -> AppError {
        AppError::input(format!(
            "Invalid value {value} for `{key}` of {}: expected {expected}.",
            self.family
        ))
    }
}
