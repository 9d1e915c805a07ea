use std::collections::HashMap;

use geo::Coord;

/// Bucketed point index over an unbounded plane.
///
/// Points are stored by their index into a caller-owned slice. Buckets are
/// square cells of `bucket_size`; a radius query only visits the cells its
/// bounding square overlaps.
pub struct PointIndex {
    bucket_size: f64,
    buckets: HashMap<(i64, i64), Vec<(usize, Coord<f64>)>>,
    len: usize,
}

impl PointIndex {
    pub fn new(bucket_size: f64) -> Self {
        Self {
            bucket_size: if bucket_size > 0.0 { bucket_size } else { 1.0 },
            buckets: HashMap::new(),
            len: 0,
        }
    }

    #[inline]
    fn bucket_of(&self, x: f64, y: f64) -> (i64, i64) {
        (
            (x / self.bucket_size).floor() as i64,
            (y / self.bucket_size).floor() as i64,
        )
    }

    pub fn insert(&mut self, idx: usize, point: Coord<f64>) {
        let key = self.bucket_of(point.x, point.y);
        self.buckets.entry(key).or_default().push((idx, point));
        self.len += 1;
    }

    pub fn query_rect(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<usize> {
        let (min_bx, min_by) = self.bucket_of(min_x, min_y);
        let (max_bx, max_by) = self.bucket_of(max_x, max_y);

        let mut result = Vec::new();
        for by in min_by..=max_by {
            for bx in min_bx..=max_bx {
                if let Some(bucket) = self.buckets.get(&(bx, by)) {
                    result.extend(
                        bucket
                            .iter()
                            .filter(|(_, p)| {
                                p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y
                            })
                            .map(|(idx, _)| *idx),
                    );
                }
            }
        }
        result
    }

    /// Indices of points within `radius` of `center`, nearest first.
    pub fn query_radius(&self, center: Coord<f64>, radius: f64) -> Vec<(usize, f64)> {
        let mut hits: Vec<(usize, f64)> = Vec::new();
        let (min_bx, min_by) = self.bucket_of(center.x - radius, center.y - radius);
        let (max_bx, max_by) = self.bucket_of(center.x + radius, center.y + radius);
        for by in min_by..=max_by {
            for bx in min_bx..=max_bx {
                let Some(bucket) = self.buckets.get(&(bx, by)) else {
                    continue;
                };
                for (idx, p) in bucket {
                    let d = ((p.x - center.x).powi(2) + (p.y - center.y).powi(2)).sqrt();
                    if d <= radius {
                        hits.push((*idx, d));
                    }
                }
            }
        }
        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        hits
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
