//! Baseline classifier that ignores the features.
//!
//! Strategies:
//! - `most_frequent`: always the majority training label (smallest label on ties)
//! - `stratified`: random labels drawn with the training class frequencies
//! - `uniform`: random labels drawn uniformly from the training classes
//!
//! Random strategies are seeded, so `predict` is deterministic for a fitted model.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::{Dataset, Label, ParamSet};
use crate::error::AppError;
use crate::models::Classifier;
use crate::models::params::ParamReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DummyStrategy {
    MostFrequent,
    Stratified,
    Uniform,
}

#[derive(Debug, Clone)]
pub struct DummyClassifier {
    strategy: DummyStrategy,
    classes: Vec<Label>,
    counts: Vec<usize>,
    seed: u64,
}

impl DummyClassifier {
    pub fn fit(params: &ParamSet, train: &Dataset, seed: u64) -> Result<Self, AppError> {
        let reader = ParamReader::new("dummy classifier", params, &["strategy"])?;
        let strategy = match reader.choice_or(
            "strategy",
            "stratified",
            &["most_frequent", "stratified", "uniform"],
        )? {
            "most_frequent" => DummyStrategy::MostFrequent,
            "uniform" => DummyStrategy::Uniform,
            _ => DummyStrategy::Stratified,
        };

        let counts = train.class_counts();
        if counts.is_empty() {
            return Err(AppError::insufficient("Dummy classifier needs at least one labelled sample."));
        }

        Ok(Self {
            strategy,
            classes: counts.keys().copied().collect(),
            counts: counts.values().copied().collect(),
            seed,
        })
    }

    fn majority(&self) -> Label {
        // `max_by_key` keeps the last maximum; scan manually to keep the first.
        let mut best = 0;
        for (i, &c) in self.counts.iter().enumerate() {
            if c > self.counts[best] {
                best = i;
            }
        }
        self.classes[best]
    }

    fn draw(&self, n: usize, weights: &[usize]) -> Result<Vec<Label>, AppError> {
        let dist = WeightedIndex::new(weights)
            .map_err(|e| AppError::model("Dummy classifier sampling failed", e))?;
        let mut rng = StdRng::seed_from_u64(self.seed);
        Ok((0..n).map(|_| self.classes[dist.sample(&mut rng)]).collect())
    }
}

impl Classifier for DummyClassifier {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<Label>, AppError> {
        match self.strategy {
            DummyStrategy::MostFrequent => Ok(vec![self.majority(); rows.len()]),
            DummyStrategy::Stratified => self.draw(rows.len(), &self.counts),
            DummyStrategy::Uniform => self.draw(rows.len(), &vec![1; self.classes.len()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Dataset;

    fn imbalanced() -> Dataset {
        let labels = vec![0, 0, 0, 1, 0, 1, 0, 0];
        let rows = labels.iter().map(|&l| vec![l as f64]).collect();
        Dataset::new(vec!["x".into()], rows, labels).unwrap()
    }

    #[test]
    fn most_frequent_predicts_majority() {
        let params = ParamSet::new().with("strategy", "most_frequent");
        let clf = DummyClassifier::fit(&params, &imbalanced(), 0).unwrap();
        assert_eq!(clf.predict(&[vec![1.0], vec![0.0]]).unwrap(), vec![0, 0]);
    }

    #[test]
    fn stratified_is_deterministic_for_a_seed() {
        let params = ParamSet::new().with("strategy", "stratified");
        let clf = DummyClassifier::fit(&params, &imbalanced(), 7).unwrap();
        let rows = vec![vec![0.0]; 50];
        let a = clf.predict(&rows).unwrap();
        let b = clf.predict(&rows).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|l| *l == 0 || *l == 1));
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let params = ParamSet::new().with("strategy", "constant");
        assert_eq!(DummyClassifier::fit(&params, &imbalanced(), 0).unwrap_err().exit_code(), 2);
    }
}
