use std::{collections::BTreeMap, fmt};

use revlife_engine::Example;
use serde::Serialize;

use crate::{Predictor, ReportError};

/// Number of scored examples and their mean error rate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ErrorSummary {
    count: usize,
    mean_error: f64,
}

impl ErrorSummary {
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn mean_error(&self) -> f64 {
        self.mean_error
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    count: usize,
    total_error: f64,
}

impl Accumulator {
    fn push(&mut self, error: f64) {
        self.count += 1;
        self.total_error += error;
    }

    #[expect(clippy::cast_precision_loss)]
    fn summary(&self) -> ErrorSummary {
        ErrorSummary {
            count: self.count,
            mean_error: self.total_error / self.count as f64,
        }
    }
}

/// Mean error rate of a predictor, overall and per delta.
///
/// Displayed as a tab-separated table with one row per delta followed by an
/// `all` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictorReport {
    overall: ErrorSummary,
    by_delta: BTreeMap<usize, ErrorSummary>,
}

impl PredictorReport {
    /// Predicts the start board of every example and scores it.
    ///
    /// Every example needs a start board.
    pub fn evaluate<P>(predictor: &P, examples: &[Example]) -> Result<Self, ReportError>
    where
        P: Predictor + ?Sized,
    {
        if examples.is_empty() {
            return Err(ReportError::EmptyExamples);
        }
        let mut overall = Accumulator::default();
        let mut by_delta = BTreeMap::<usize, Accumulator>::new();
        for example in examples {
            let predicted = predictor.predict(example.end(), example.delta())?;
            let error = example.evaluate(&predicted)?;
            overall.push(error);
            by_delta.entry(example.delta()).or_default().push(error);
        }

        let by_delta = by_delta
            .into_iter()
            .map(|(delta, acc)| (delta, acc.summary()))
            .collect::<BTreeMap<_, _>>();
        for (delta, summary) in &by_delta {
            tracing::debug!(
                delta,
                count = summary.count,
                mean_error = summary.mean_error,
                "scored delta"
            );
        }
        let overall = overall.summary();
        tracing::debug!(
            count = overall.count,
            mean_error = overall.mean_error,
            "scored predictor"
        );
        Ok(Self { overall, by_delta })
    }

    #[must_use]
    pub fn overall(&self) -> ErrorSummary {
        self.overall
    }

    #[must_use]
    pub fn delta(&self, delta: usize) -> Option<ErrorSummary> {
        self.by_delta.get(&delta).copied()
    }

    /// Per-delta summaries in ascending delta order.
    pub fn by_delta(&self) -> impl Iterator<Item = (usize, ErrorSummary)> + '_ {
        self.by_delta.iter().map(|(&delta, &summary)| (delta, summary))
    }
}

impl fmt::Display for PredictorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "delta\tn\terror rate")?;
        for (delta, summary) in &self.by_delta {
            writeln!(f, "{delta}\t{}\t{:.4}", summary.count, summary.mean_error)?;
        }
        write!(
            f,
            "all\t{}\t{:.4}",
            self.overall.count, self.overall.mean_error
        )
    }
}
