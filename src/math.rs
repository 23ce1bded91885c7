pub struct Math;

impl Math {
    /// Column means of an R x C set.
    pub fn mean<const C: usize, const R: usize>(set: [[f32; C]; R]) -> [f32; C] {
        std::array::from_fn(|c| set.iter().map(|row| row[c]).sum::<f32>() / R as f32)
    }

    pub fn centroid_matrix<const C: usize, const R: usize>(set: [[f32; C]; R]) -> [[f32; C]; R] {
        let mean = Self::mean(set);
        set.map(|row| std::array::from_fn(|c| row[c] - mean[c]))
    }

    /// Population variance of each column.
    pub fn variance<const C: usize, const R: usize>(set: [[f32; C]; R]) -> [f32; C] {
        let centered = Self::centroid_matrix(set);
        std::array::from_fn(|c| centered.iter().map(|row| row[c].powi(2)).sum::<f32>() / R as f32)
    }
}

#[cfg(test)]
mod test {
    use super::Math;

    #[test]
    fn computes_column_mean() {
        let set = [[1., 2.], [3., 4.], [5., 6.], [7., 8.], [9., 10.]];
        assert_eq!(Math::mean(set), [5., 6.]);
    }

    #[test]
    fn centers_rows_on_mean() {
        let set = [[1., 10.], [3., 30.]];
        assert_eq!(Math::centroid_matrix(set), [[-1., -10.], [1., 10.]]);
    }

    #[test]
    fn computes_population_variance() {
        let set = [[1., 2.], [3., 4.], [5., 6.], [7., 8.], [9., 10.]];
        assert_eq!(Math::variance(set), [8., 8.]);
    }
}
