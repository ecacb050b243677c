use std::ops::Range;

/* ---------- */

/// Splits `total` items into one contiguous range per producer.
///
/// Every range holds `total / producers` items except the last one, which also takes the remainder.
/// When there are fewer items than producers, the leading ranges are empty.
/// No range is returned for 0 producers.
///
/// # Examples
///
/// ```
/// # use conveyor::partition;
/// assert_eq!(partition(10, 3), vec![0..3, 3..6, 6..10]);
/// assert_eq!(partition(2, 3), vec![0..0, 0..0, 0..2]);
/// ```
pub fn partition(total: usize, producers: usize) -> Vec<Range<usize>> {
    if producers == 0 {
        return Vec::new();
    }

    let segment = total / producers;

    (0..producers)
        .map(|nth| {
            let start = segment * nth;
            let end = if nth + 1 == producers {
                total
            } else {
                segment * (nth + 1)
            };

            start..end
        })
        .collect()
}

/* ---------- */

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    fn assert_exact_cover(ranges: &[Range<usize>], total: usize, producers: usize) {
        assert_eq!(ranges.len(), producers);
        assert_eq!(ranges.first().map(|r| r.start), Some(0));
        assert_eq!(ranges.last().map(|r| r.end), Some(total));

        for range in ranges {
            assert!(range.start <= range.end, "{range:?} is reversed");
        }
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end, pair[1].start, "gap or overlap in {pair:?}");
        }

        assert_eq!(ranges.iter().map(|r| r.len()).sum::<usize>(), total);
    }

    #[test]
    fn even_split() {
        assert_eq!(partition(9, 3), vec![0..3, 3..6, 6..9]);
    }

    #[test]
    fn last_range_takes_remainder() {
        assert_eq!(partition(11, 4), vec![0..2, 2..4, 4..6, 6..11]);
    }

    #[test]
    fn single_producer() {
        assert_eq!(partition(7, 1), vec![0..7]);
    }

    #[test]
    fn fewer_items_than_producers() {
        let ranges = partition(2, 5);

        assert_exact_cover(&ranges, 2, 5);
        assert_eq!(ranges.iter().filter(|r| r.is_empty()).count(), 4);
        assert_eq!(ranges[4], 0..2);
    }

    #[test]
    fn no_producer() {
        assert!(partition(10, 0).is_empty());
    }

    #[test]
    fn random_inputs_are_exactly_covered() {
        let mut rng = rand::thread_rng();

        for _ in 0..1000 {
            let total = rng.gen_range(1..10_000);
            let producers = rng.gen_range(1..64);

            assert_exact_cover(&partition(total, producers), total, producers);
        }
    }
}
