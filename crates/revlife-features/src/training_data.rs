use std::collections::{HashMap, hash_map::Entry};

use revlife_engine::{Cell, Example, Grid, Symmetry};

use crate::{
    TrainingDataError,
    neighborhood::{FeatureMatrix, NeighborhoodFeatures},
};

/// Feature rows from end boards paired with start-board labels.
///
/// Each example contributes one row per cell. With symmetries enabled, each
/// example contributes all eight transformed copies, applying the same
/// transform to both boards so that features and labels stay aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingData {
    x: FeatureMatrix,
    y: Vec<Cell>,
}

impl TrainingData {
    /// Builds rows for every cell of every example.
    ///
    /// All examples must carry a start board and share one shape.
    pub fn from_examples(
        extractor: &NeighborhoodFeatures,
        examples: &[Example],
        use_symmetries: bool,
    ) -> Result<Self, TrainingDataError> {
        let copies = if use_symmetries { Symmetry::LEN } else { 1 };
        let (rows, cols) = check_examples(examples)?;
        let mut data = Self {
            x: FeatureMatrix::with_capacity(
                extractor.num_features(),
                copies * rows * cols * examples.len(),
            ),
            y: Vec::with_capacity(copies * rows * cols * examples.len()),
        };
        for_each_board_pair(examples, use_symmetries, |start, end| {
            data.x.append(&extractor.features_for_board(end));
            data.y.extend_from_slice(start.cells());
        });
        tracing::debug!(
            examples = examples.len(),
            rows = data.len(),
            use_symmetries,
            "assembled training data"
        );
        Ok(data)
    }

    #[must_use]
    pub fn x(&self) -> &FeatureMatrix {
        &self.x
    }

    #[must_use]
    pub fn y(&self) -> &[Cell] {
        &self.y
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.y.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    #[must_use]
    pub fn into_parts(self) -> (FeatureMatrix, Vec<Cell>) {
        (self.x, self.y)
    }
}

/// [`TrainingData`] with duplicate `(features, label)` rows merged.
///
/// Each distinct row appears once, in order of first occurrence, with its
/// occurrence count as weight. Sparse boards repeat the same neighborhoods
/// heavily, so this is usually far smaller than the unweighted data.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTrainingData {
    x: FeatureMatrix,
    y: Vec<Cell>,
    weights: Vec<u32>,
}

impl WeightedTrainingData {
    pub fn from_examples(
        extractor: &NeighborhoodFeatures,
        examples: &[Example],
        use_symmetries: bool,
    ) -> Result<Self, TrainingDataError> {
        check_examples(examples)?;
        let mut data = Self {
            x: FeatureMatrix::new(extractor.num_features()),
            y: vec![],
            weights: vec![],
        };
        // keyed on bit patterns since f32 is not Hash
        let mut index: HashMap<(Vec<u32>, Cell), usize> = HashMap::new();
        let mut total = 0_usize;
        for_each_board_pair(examples, use_symmetries, |start, end| {
            let features = extractor.features_for_board(end);
            for (row, &label) in features.iter_rows().zip(start.cells()) {
                total += 1;
                let key = (row.iter().map(|v| v.to_bits()).collect(), label);
                match index.entry(key) {
                    Entry::Occupied(entry) => data.weights[*entry.get()] += 1,
                    Entry::Vacant(entry) => {
                        entry.insert(data.y.len());
                        data.x.push_row(row);
                        data.y.push(label);
                        data.weights.push(1);
                    }
                }
            }
        });
        tracing::debug!(
            examples = examples.len(),
            rows = total,
            distinct = data.len(),
            use_symmetries,
            "assembled weighted training data"
        );
        Ok(data)
    }

    #[must_use]
    pub fn x(&self) -> &FeatureMatrix {
        &self.x
    }

    #[must_use]
    pub fn y(&self) -> &[Cell] {
        &self.y
    }

    #[must_use]
    pub fn weights(&self) -> &[u32] {
        &self.weights
    }

    /// Number of distinct rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.y.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Sum of all weights, equal to the row count of the unweighted data.
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.weights.iter().map(|&w| u64::from(w)).sum()
    }
}

fn check_examples(examples: &[Example]) -> Result<(usize, usize), TrainingDataError> {
    let first = examples.first().ok_or(TrainingDataError::EmptyExamples)?;
    let (rows, cols) = first.shape();
    for (index, example) in examples.iter().enumerate() {
        if example.start().is_none() {
            return Err(TrainingDataError::MissingStart { index });
        }
        let (actual_rows, actual_cols) = example.shape();
        if (actual_rows, actual_cols) != (rows, cols) {
            return Err(TrainingDataError::ShapeMismatch {
                index,
                expected_rows: rows,
                expected_cols: cols,
                actual_rows,
                actual_cols,
            });
        }
    }
    Ok((rows, cols))
}

// Callers run `check_examples` first, so every start board is present.
fn for_each_board_pair<F>(examples: &[Example], use_symmetries: bool, mut f: F)
where
    F: FnMut(&Grid, &Grid),
{
    let symmetries: &[Symmetry] = if use_symmetries {
        &Symmetry::ALL
    } else {
        &[Symmetry::Identity]
    };
    for example in examples {
        let Some(start) = example.start() else {
            continue;
        };
        for &sym in symmetries {
            if sym == Symmetry::Identity {
                f(start, example.end());
            } else {
                f(&sym.apply(start), &sym.apply(example.end()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> Example {
        let start = Grid::from_rows(&[[1_u8, 1], [0, 1]]).unwrap();
        let end = Grid::from_rows(&[[1_u8, 0], [0, 1]]).unwrap();
        Example::new(1, Some(start), Some(end)).unwrap()
    }

    #[test]
    fn test_training_data_literal() {
        let extractor = NeighborhoodFeatures::new(1, -1.0);
        let data = TrainingData::from_examples(&extractor, &[two_by_two()], false).unwrap();
        let expected_x: [[f32; 9]; 4] = [
            [-1.0, -1.0, -1.0, -1.0, 1.0, 0.0, -1.0, 0.0, 1.0],
            [-1.0, -1.0, -1.0, 1.0, 0.0, -1.0, 0.0, 1.0, -1.0],
            [-1.0, 1.0, 0.0, -1.0, 0.0, 1.0, -1.0, -1.0, -1.0],
            [1.0, 0.0, -1.0, 0.0, 1.0, -1.0, -1.0, -1.0, -1.0],
        ];
        assert_eq!(data.len(), 4);
        for (k, row) in expected_x.iter().enumerate() {
            assert_eq!(&data.x()[k], row.as_slice(), "row {k}");
        }
        assert_eq!(
            data.y(),
            [Cell::Alive, Cell::Alive, Cell::Dead, Cell::Alive]
        );
    }

    #[test]
    fn test_training_data_with_symmetries() {
        let extractor = NeighborhoodFeatures::new(1, 0.0);
        let example = two_by_two();
        let data = TrainingData::from_examples(&extractor, std::slice::from_ref(&example), true)
            .unwrap();
        assert_eq!(data.len(), 32);
        for (t, sym) in Symmetry::ALL.into_iter().enumerate() {
            let start = sym.apply(example.start().unwrap());
            let features = extractor.features_for_board(&sym.apply(example.end()));
            assert_eq!(&data.y()[t * 4..(t + 1) * 4], start.cells());
            for k in 0..4 {
                assert_eq!(&data.x()[t * 4 + k], &features[k]);
            }
        }
    }

    #[test]
    fn test_weighted_all_distinct() {
        let extractor = NeighborhoodFeatures::new(1, 0.0);
        let data =
            WeightedTrainingData::from_examples(&extractor, &[two_by_two()], false).unwrap();
        assert_eq!(data.len(), 4);
        assert_eq!(data.weights(), [1, 1, 1, 1]);
        let plain = TrainingData::from_examples(&extractor, &[two_by_two()], false).unwrap();
        assert_eq!(data.x(), plain.x());
        assert_eq!(data.y(), plain.y());
    }

    #[test]
    fn test_weighted_merges_duplicates() {
        let extractor = NeighborhoodFeatures::new(1, 0.0);
        let dead = Example::from_start(1, Grid::new_dead(2, 2));
        let data = WeightedTrainingData::from_examples(&extractor, &[dead], true).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data.weights(), [32]);
        assert_eq!(data.total_weight(), 32);
        assert_eq!(data.y(), [Cell::Dead]);
    }

    #[test]
    fn test_weighted_keeps_labels_apart() {
        // identical all-dead end boards, but the start boards disagree
        let extractor = NeighborhoodFeatures::new(0, 0.0);
        let end = Grid::new_dead(1, 2);
        let a = Example::new(1, Some(Grid::from_rows(&[[0_u8, 1]]).unwrap()), Some(end.clone()));
        let b = Example::new(1, Some(Grid::from_rows(&[[1_u8, 1]]).unwrap()), Some(end));
        let data =
            WeightedTrainingData::from_examples(&extractor, &[a.unwrap(), b.unwrap()], false)
                .unwrap();
        assert_eq!(data.y(), [Cell::Dead, Cell::Alive]);
        assert_eq!(data.weights(), [1, 3]);
    }

    #[test]
    fn test_errors() {
        let extractor = NeighborhoodFeatures::default();
        assert_eq!(
            TrainingData::from_examples(&extractor, &[], false),
            Err(TrainingDataError::EmptyExamples)
        );

        let unlabeled = Example::from_end(1, Grid::new_dead(2, 2));
        assert_eq!(
            WeightedTrainingData::from_examples(&extractor, &[two_by_two(), unlabeled], false),
            Err(TrainingDataError::MissingStart { index: 1 })
        );

        let larger = Example::from_start(1, Grid::new_dead(3, 3));
        let err = TrainingData::from_examples(&extractor, &[two_by_two(), larger], false)
            .unwrap_err();
        assert!(err.kind().is_unsupported());
    }
}
