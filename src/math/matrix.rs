use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data.first().map_or(0, |row| row.len()),
            data
        }
    }

    /// True when `data` really is `rows × cols`.
    ///
    /// Deserialized matrices carry their declared shape separately from the
    /// nested vectors, so the two can disagree in a hand-edited file.
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == self.rows && self.data.iter().all(|row| row.len() == self.cols)
    }

    /// Row-vector product `input · self`, where `input.len() == self.rows`.
    ///
    /// Returns `None` on a length mismatch.
    pub fn left_mul(&self, input: &[f64]) -> Option<Vec<f64>> {
        if input.len() != self.rows {
            return None;
        }
        let mut out = vec![0.0; self.cols];
        for (x, row) in input.iter().zip(self.data.iter()) {
            if *x == 0.0 {
                continue;
            }
            for (acc, w) in out.iter_mut().zip(row.iter()) {
                *acc += x * w;
            }
        }
        Some(out)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_mul_matches_hand_computation() {
        let m = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        assert_eq!(m.left_mul(&[1.0, 0.0, -1.0]).unwrap(), vec![-4.0, -4.0]);
    }

    #[test]
    fn left_mul_rejects_wrong_length() {
        let m = Matrix::zeros(3, 2);
        assert!(m.left_mul(&[1.0, 2.0]).is_none());
    }

    #[test]
    fn ragged_data_is_not_well_formed() {
        let mut m = Matrix::zeros(2, 2);
        assert!(m.is_well_formed());
        m.data[1].push(0.0);
        assert!(!m.is_well_formed());
    }
}
