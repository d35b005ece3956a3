pub fn mean(xs: impl Iterator<Item = f64>) -> f64 {
    let mut count = 0;
    let mut total = 0.0;
    for x in xs {
        count += 1;
        total += x;
    }
    assert_ne!(count, 0);
    total / count as f64
}

pub fn vector_mean<'a>(xs: impl Iterator<Item = &'a [f64]> + Clone, len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| mean(xs.clone().map(|x| x[i])))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_mean_works() {
        let rows = [vec![1.0, 4.0], vec![3.0, 0.0]];
        assert_eq!(vector_mean(rows.iter().map(|r| r.as_slice()), 2), vec![2.0, 2.0]);
        assert_eq!(mean([1.0, 2.0, 6.0].iter().copied()), 3.0);
    }
}
