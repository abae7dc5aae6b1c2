use revlife_engine::Grid;

use crate::{PredictError, Predictor};

/// Predicts that every cell started dead.
///
/// Live cells are rare on evolved boards, so this is the baseline every other
/// strategy has to beat.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllDeadPredictor;

impl Predictor for AllDeadPredictor {
    fn predict(&self, end: &Grid, _delta: usize) -> Result<Grid, PredictError> {
        Ok(Grid::new_dead(end.rows(), end.cols()))
    }
}

#[cfg(test)]
mod tests {
    use revlife_engine::Example;

    use super::*;

    #[test]
    fn test_predicts_dead_board_of_same_shape() {
        let end: Grid = "0110\n1111".parse().unwrap();
        let predicted = AllDeadPredictor.predict(&end, 5).unwrap();
        assert_eq!(predicted.shape(), (2, 4));
        assert!(predicted.is_all_dead());
    }

    #[test]
    fn test_baseline_error_is_start_density() {
        let start = Grid::from_rows(&[[0_u8, 1, 1], [1, 1, 0], [0, 0, 1]]).unwrap();
        let example = Example::from_start(1, start);
        let predicted = AllDeadPredictor.predict(example.end(), example.delta()).unwrap();
        let error = example.evaluate(&predicted).unwrap();
        assert!((error - 5.0 / 9.0).abs() < 1e-12);
    }
}
