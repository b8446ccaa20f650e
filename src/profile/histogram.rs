/// Equal-width histogram over the known areas of a profile table.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaHistogram {
    /// `counts.len() + 1` bin edges, ascending.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl AreaHistogram {
    /// Split `[min, max]` into `bins` equal bins; the last bin is closed so
    /// the maximum is counted. A constant input gets a unit-wide range
    /// centred on its value.
    pub fn compute(values: &[u64], bins: usize) -> Self {
        let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
            return Self {
                edges: Vec::new(),
                counts: Vec::new(),
            };
        };
        let bins = bins.max(1);

        let (mut low, mut high) = (min as f64, max as f64);
        if low == high {
            low -= 0.5;
            high += 0.5;
        }
        let width = (high - low) / bins as f64;

        let edges = (0..=bins).map(|i| low + width * i as f64).collect();
        let mut counts = vec![0; bins];
        for &value in values {
            let bin = ((value as f64 - low) / width).floor() as usize;
            counts[bin.min(bins - 1)] += 1;
        }

        Self { edges, counts }
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_cover_every_value() {
        let hist = AreaHistogram::compute(&[100, 200, 300, 400], 3);

        assert_eq!(hist.edges.len(), 4);
        assert_eq!(hist.edges[0], 100.0);
        assert_eq!(hist.edges[3], 400.0);
        assert_eq!(hist.counts, vec![1, 1, 2]);
        assert_eq!(hist.max_count(), 2);
    }

    #[test]
    fn test_constant_values_land_in_one_bin() {
        let hist = AreaHistogram::compute(&[50, 50], 2);
        assert_eq!(hist.edges, vec![49.5, 50.0, 50.5]);
        assert_eq!(hist.counts.iter().sum::<usize>(), 2);
    }

    #[test]
    fn test_no_values_gives_empty_histogram() {
        let hist = AreaHistogram::compute(&[], 5);
        assert!(hist.is_empty());
        assert_eq!(hist.max_count(), 0);
    }
}
