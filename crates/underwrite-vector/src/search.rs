use std::cmp::Ordering;

/// Position of a stored vector and its squared distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f32,
}

pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn by_distance_then_position(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance.total_cmp(&b.distance).then(a.position.cmp(&b.position))
}

/// Exhaustive scan returning the `k` closest rows, ascending by distance.
///
/// Equal distances keep insertion order, so results are deterministic.
pub fn nearest<'a, I>(query: &[f32], rows: I, k: usize) -> Vec<Neighbor>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut all: Vec<Neighbor> = rows
        .into_iter()
        .enumerate()
        .map(|(position, row)| Neighbor { position, distance: squared_l2(query, row) })
        .collect();
    if k == 0 || all.is_empty() {
        return Vec::new();
    }
    if k < all.len() {
        all.select_nth_unstable_by(k - 1, by_distance_then_position);
        all.truncate(k);
    }
    all.sort_by(by_distance_then_position);
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[[f32; 2]]) -> Vec<&[f32]> {
        data.iter().map(|r| &r[..]).collect()
    }

    #[test]
    fn squared_distance() {
        assert_eq!(squared_l2(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
        assert_eq!(squared_l2(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn returns_k_closest_in_order() {
        let data = [[5.0, 0.0], [1.0, 0.0], [3.0, 0.0], [0.0, 0.0], [2.0, 0.0]];
        let hits = nearest(&[0.0, 0.0], rows(&data), 3);
        let positions: Vec<usize> = hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, [3, 1, 4]);
        assert_eq!(hits[2].distance, 4.0);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let data = [[1.0, 0.0], [0.0, 1.0], [-1.0, 0.0], [0.0, -1.0], [9.0, 9.0]];
        let hits = nearest(&[0.0, 0.0], rows(&data), 3);
        let positions: Vec<usize> = hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, [0, 1, 2]);
    }

    #[test]
    fn k_larger_than_rows_returns_everything() {
        let data = [[2.0, 0.0], [1.0, 0.0]];
        let hits = nearest(&[0.0, 0.0], rows(&data), 10);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].position, 1);
    }

    #[test]
    fn zero_k_or_no_rows_is_empty() {
        let data = [[2.0, 0.0]];
        assert!(nearest(&[0.0, 0.0], rows(&data), 0).is_empty());
        assert!(nearest(&[0.0, 0.0], rows(&[]), 3).is_empty());
    }
}
