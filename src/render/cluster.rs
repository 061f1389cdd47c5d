use std::collections::BTreeMap;

use crate::dataset::GeoPoint;

/// Points that fall in the same grid cell
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub center: GeoPoint,
    /// Indices into the clustered slice
    pub members: Vec<usize>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Group points into square cells of `cell` degrees. Cluster centers are
/// the mean of their members. Output order is stable (by cell).
pub fn cluster_points(points: &[GeoPoint], cell: f64) -> Vec<Cluster> {
    if cell <= 0.0 || !cell.is_finite() {
        return points
            .iter()
            .enumerate()
            .map(|(i, p)| Cluster {
                center: *p,
                members: vec![i],
            })
            .collect();
    }

    let mut cells: BTreeMap<(i64, i64), Vec<usize>> = BTreeMap::new();
    for (i, p) in points.iter().enumerate() {
        let key = ((p.lat / cell).floor() as i64, (p.lon / cell).floor() as i64);
        cells.entry(key).or_default().push(i);
    }

    cells
        .into_values()
        .map(|members| {
            let n = members.len() as f64;
            let (lat, lon) = members.iter().fold((0.0, 0.0), |(lat, lon), &i| {
                (lat + points[i].lat, lon + points[i].lon)
            });
            Cluster {
                center: GeoPoint {
                    lat: lat / n,
                    lon: lon / n,
                },
                members,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint { lat, lon }
    }

    #[test]
    fn test_nearby_points_merge() {
        let points = [p(-6.901, 107.601), p(-6.903, 107.603), p(-7.2, 107.9)];
        let clusters = cluster_points(&points, 0.05);
        assert_eq!(clusters.len(), 2);

        let big = clusters.iter().find(|c| c.len() == 2).unwrap();
        assert_eq!(big.members, vec![0, 1]);
        assert!((big.center.lat - -6.902).abs() < 1e-9);
    }

    #[test]
    fn test_every_point_in_one_cluster() {
        let points: Vec<GeoPoint> = (0..50)
            .map(|i| p(-7.0 + i as f64 * 0.013, 107.4 + i as f64 * 0.007))
            .collect();
        let clusters = cluster_points(&points, 0.1);
        let total: usize = clusters.iter().map(Cluster::len).sum();
        assert_eq!(total, points.len());
    }

    #[test]
    fn test_zero_cell_keeps_points_apart() {
        let points = [p(1.0, 1.0), p(1.0, 1.0)];
        assert_eq!(cluster_points(&points, 0.0).len(), 2);
    }
}
