//! Density-based clustering over planar points.
//!
//! Classic DBSCAN semantics: a point is a core point if at least `min_pts`
//! points (itself included) lie within `eps`; clusters grow through
//! core-point connectivity; non-core points within `eps` of a core point
//! join its cluster as border points; everything else is noise.
//!
//! Neighbor queries go through a uniform grid bucketed at cell size `eps`,
//! so a query touches at most the 3x3 cells around a point instead of the
//! whole set.

use crate::util::{DetectError, DetectResult};
use std::collections::HashMap;

/// Cluster assignment for one input point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Label {
    /// Member of the cluster with the given id.
    Cluster(usize),
    /// Insufficiently dense to merge with anything.
    Noise,
}

/// Validates clustering parameters.
pub(crate) fn validate_params(eps: f64, min_pts: usize) -> DetectResult<()> {
    if !eps.is_finite() || eps <= 0.0 {
        return Err(DetectError::InvalidEps { eps });
    }
    if min_pts < 1 {
        return Err(DetectError::InvalidMinPts { min_pts });
    }
    Ok(())
}

/// Runs DBSCAN over `points` and returns one label per input point.
///
/// Labels are deterministic: clusters are numbered in the order their first
/// core point appears in the input.
pub fn dbscan(points: &[[f64; 2]], eps: f64, min_pts: usize) -> DetectResult<Vec<Label>> {
    validate_params(eps, min_pts)?;
    if points.is_empty() {
        return Ok(Vec::new());
    }

    let index = GridIndex::build(points, eps);
    let eps_sq = eps * eps;

    // None = unvisited.
    let mut labels: Vec<Option<Label>> = vec![None; points.len()];
    let mut next_cluster = 0usize;
    let mut frontier = Vec::new();

    for seed in 0..points.len() {
        if labels[seed].is_some() {
            continue;
        }
        let neighbors = index.neighbors(points, seed, eps_sq);
        if neighbors.len() < min_pts {
            labels[seed] = Some(Label::Noise);
            continue;
        }

        let cluster = next_cluster;
        next_cluster += 1;
        labels[seed] = Some(Label::Cluster(cluster));

        frontier.clear();
        frontier.extend(neighbors);
        while let Some(idx) = frontier.pop() {
            match labels[idx] {
                // Border point previously labeled noise joins the cluster.
                Some(Label::Noise) => {
                    labels[idx] = Some(Label::Cluster(cluster));
                }
                Some(Label::Cluster(_)) => {}
                None => {
                    labels[idx] = Some(Label::Cluster(cluster));
                    let reach = index.neighbors(points, idx, eps_sq);
                    if reach.len() >= min_pts {
                        frontier.extend(reach);
                    }
                }
            }
        }
    }

    Ok(labels
        .into_iter()
        .map(|label| label.unwrap_or(Label::Noise))
        .collect())
}

/// Uniform grid over the point set with eps-sized cells.
struct GridIndex {
    cells: HashMap<(i64, i64), Vec<usize>>,
    inv_cell: f64,
}

impl GridIndex {
    fn build(points: &[[f64; 2]], eps: f64) -> Self {
        let inv_cell = 1.0 / eps;
        let mut cells: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (idx, point) in points.iter().enumerate() {
            cells.entry(cell_of(point, inv_cell)).or_default().push(idx);
        }
        Self { cells, inv_cell }
    }

    /// Indices of all points within `sqrt(eps_sq)` of `points[query]`,
    /// including the query point itself.
    fn neighbors(&self, points: &[[f64; 2]], query: usize, eps_sq: f64) -> Vec<usize> {
        let center = points[query];
        let (cx, cy) = cell_of(&center, self.inv_cell);
        let mut found = Vec::new();
        for gx in cx - 1..=cx + 1 {
            for gy in cy - 1..=cy + 1 {
                let Some(bucket) = self.cells.get(&(gx, gy)) else {
                    continue;
                };
                for &idx in bucket {
                    let dx = points[idx][0] - center[0];
                    let dy = points[idx][1] - center[1];
                    if dx * dx + dy * dy <= eps_sq {
                        found.push(idx);
                    }
                }
            }
        }
        found
    }
}

fn cell_of(point: &[f64; 2], inv_cell: f64) -> (i64, i64) {
    (
        (point[0] * inv_cell).floor() as i64,
        (point[1] * inv_cell).floor() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::{dbscan, Label};
    use crate::util::DetectError;

    #[test]
    fn two_close_points_form_a_cluster() {
        let points = [[0.0, 0.0], [1.0, 0.0]];
        let labels = dbscan(&points, 2.0, 2).unwrap();
        assert_eq!(labels, vec![Label::Cluster(0), Label::Cluster(0)]);
    }

    #[test]
    fn isolated_point_is_noise() {
        let points = [[0.0, 0.0], [1.0, 0.0], [100.0, 100.0]];
        let labels = dbscan(&points, 2.0, 2).unwrap();
        assert_eq!(labels[2], Label::Noise);
    }

    #[test]
    fn chain_connects_through_core_points() {
        // Each consecutive pair is within eps; the chain is one cluster.
        let points = [[0.0, 0.0], [1.5, 0.0], [3.0, 0.0], [4.5, 0.0]];
        let labels = dbscan(&points, 2.0, 2).unwrap();
        assert!(labels.iter().all(|&l| l == Label::Cluster(0)));
    }

    #[test]
    fn min_pts_one_makes_every_point_core() {
        let points = [[0.0, 0.0], [100.0, 0.0]];
        let labels = dbscan(&points, 1.0, 1).unwrap();
        assert_eq!(labels, vec![Label::Cluster(0), Label::Cluster(1)]);
    }

    #[test]
    fn separated_groups_get_distinct_ids() {
        let points = [[0.0, 0.0], [1.0, 0.0], [50.0, 50.0], [51.0, 50.0]];
        let labels = dbscan(&points, 2.0, 2).unwrap();
        assert_eq!(labels[0], Label::Cluster(0));
        assert_eq!(labels[1], Label::Cluster(0));
        assert_eq!(labels[2], Label::Cluster(1));
        assert_eq!(labels[3], Label::Cluster(1));
    }

    #[test]
    fn rejects_degenerate_parameters() {
        let points = [[0.0, 0.0]];
        assert_eq!(
            dbscan(&points, 0.0, 2).err().unwrap(),
            DetectError::InvalidEps { eps: 0.0 }
        );
        assert_eq!(
            dbscan(&points, 1.0, 0).err().unwrap(),
            DetectError::InvalidMinPts { min_pts: 0 }
        );
    }

    #[test]
    fn empty_input_yields_empty_labels() {
        assert!(dbscan(&[], 1.0, 2).unwrap().is_empty());
    }
}
