//! Vantage-point tree over normalized coordinate buffers
//!
//! Each branch picks one buffer as the vantage point and splits the rest at
//! the median distance to it. A k-nearest query visits the side of the split
//! the query falls on first and skips the other side once the current k-th
//! best distance cannot cross the median.
//!
//! Pruning is exact when the metric satisfies the triangle inequality.
//! [`AngularDistance`] is used the same way but the skip is then a heuristic;
//! members of the tree are still always found at distance 0.
//!
//! The tree serializes together with its buffers as
//! `{"polylines": [[..], ..], "vpTree": {..}}`.

use serde::{Deserialize, Serialize};

use crate::similarity::cos_distance;
use crate::Result;

/// Buffers per leaf before a node is split
pub const DEFAULT_BUCKET_SIZE: usize = 10;

/// Distance between two coordinate buffers
pub trait Metric {
    fn distance(&self, lhs: &[f64], rhs: &[f64]) -> Result<f64>;
}

/// [`cos_distance`] as a tree metric
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AngularDistance;

impl Metric for AngularDistance {
    fn distance(&self, lhs: &[f64], rhs: &[f64]) -> Result<f64> {
        cos_distance(lhs, rhs)
    }
}

/// A search hit: position of the buffer in the tree's input and its distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum Node {
    Leaf {
        items: Vec<usize>,
    },
    Branch {
        vantage: usize,
        /// Median distance; `inside` holds items at or below it
        mu: f64,
        inside: Box<Node>,
        outside: Box<Node>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpTree<M = AngularDistance> {
    polylines: Vec<Vec<f64>>,
    vp_tree: Node,
    #[serde(skip)]
    metric: M,
}

impl VpTree<AngularDistance> {
    /// Build with [`AngularDistance`] and [`DEFAULT_BUCKET_SIZE`].
    ///
    /// # Errors
    /// `InvalidInput` when the buffers differ in length or have odd length.
    pub fn build(polylines: Vec<Vec<f64>>) -> Result<Self> {
        Self::build_with(polylines, AngularDistance, DEFAULT_BUCKET_SIZE)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<M: Metric> VpTree<M> {
    pub fn build_with(polylines: Vec<Vec<f64>>, metric: M, bucket_size: usize) -> Result<Self> {
        let indices = (0..polylines.len()).collect();
        let vp_tree = build_node(&polylines, indices, &metric, bucket_size.max(1))?;
        log::debug!("built vp-tree over {} polylines", polylines.len());
        Ok(Self {
            polylines,
            vp_tree,
            metric,
        })
    }

    pub fn polylines(&self) -> &[Vec<f64>] {
        &self.polylines
    }

    pub fn len(&self) -> usize {
        self.polylines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polylines.is_empty()
    }

    /// Up to `k` closest buffers, nearest first
    pub fn search(&self, query: &[f64], k: usize) -> Result<Vec<Neighbor>> {
        let mut best = Vec::with_capacity(k);
        if k > 0 {
            self.visit(&self.vp_tree, query, k, &mut best)?;
        }
        Ok(best)
    }

    pub fn nearest(&self, query: &[f64]) -> Result<Option<Neighbor>> {
        Ok(self.search(query, 1)?.into_iter().next())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn visit(&self, node: &Node, query: &[f64], k: usize, best: &mut Vec<Neighbor>) -> Result<()> {
        match node {
            Node::Leaf { items } => {
                for &index in items {
                    let d = self.metric.distance(query, &self.polylines[index])?;
                    offer(best, k, Neighbor { index, distance: d });
                }
            }
            Node::Branch {
                vantage,
                mu,
                inside,
                outside,
            } => {
                let d = self.metric.distance(query, &self.polylines[*vantage])?;
                offer(best, k, Neighbor { index: *vantage, distance: d });

                if d <= *mu {
                    self.visit(inside, query, k, best)?;
                    if d + bound(best, k) >= *mu {
                        self.visit(outside, query, k, best)?;
                    }
                } else {
                    self.visit(outside, query, k, best)?;
                    if d - bound(best, k) <= *mu {
                        self.visit(inside, query, k, best)?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn build_node<M: Metric>(
    polylines: &[Vec<f64>],
    mut indices: Vec<usize>,
    metric: &M,
    bucket_size: usize,
) -> Result<Node> {
    if indices.len() <= bucket_size {
        // Leaves are still checked so a bad buffer fails the build
        if let Some((&first, rest)) = indices.split_first() {
            for &i in rest {
                metric.distance(&polylines[first], &polylines[i])?;
            }
        }
        return Ok(Node::Leaf { items: indices });
    }

    let vantage = indices.swap_remove(0);
    let mut ranked = indices
        .into_iter()
        .map(|i| Ok((metric.distance(&polylines[vantage], &polylines[i])?, i)))
        .collect::<Result<Vec<(f64, usize)>>>()?;
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

    let median = ranked.len() / 2;
    let mu = ranked[median].0;
    let outside = ranked.split_off(median);

    Ok(Node::Branch {
        vantage,
        mu,
        inside: Box::new(build_node(
            polylines,
            ranked.into_iter().map(|(_, i)| i).collect(),
            metric,
            bucket_size,
        )?),
        outside: Box::new(build_node(
            polylines,
            outside.into_iter().map(|(_, i)| i).collect(),
            metric,
            bucket_size,
        )?),
    })
}

/// Insert keeping `best` sorted and at most `k` long
fn offer(best: &mut Vec<Neighbor>, k: usize, candidate: Neighbor) {
    if best.len() == k && best.last().is_some_and(|w| w.distance <= candidate.distance) {
        return;
    }
    let at = best.partition_point(|n| n.distance <= candidate.distance);
    best.insert(at, candidate);
    best.truncate(k);
}

/// Current k-th best distance, unbounded until `k` hits are held
fn bound(best: &[Neighbor], k: usize) -> f64 {
    if best.len() < k {
        f64::INFINITY
    } else {
        best.last().map_or(f64::INFINITY, |n| n.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[derive(Debug)]
    struct Euclidean;

    impl Metric for Euclidean {
        fn distance(&self, lhs: &[f64], rhs: &[f64]) -> Result<f64> {
            Ok(lhs
                .iter()
                .zip(rhs)
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f64>()
                .sqrt())
        }
    }

    fn random_buffers(rng: &mut StdRng, count: usize, len: usize) -> Vec<Vec<f64>> {
        (0..count)
            .map(|_| (0..len).map(|_| rng.random_range(-250.0..250.0)).collect())
            .collect()
    }

    fn linear_scan(buffers: &[Vec<f64>], query: &[f64], k: usize) -> Vec<usize> {
        let mut ranked: Vec<(f64, usize)> = buffers
            .iter()
            .enumerate()
            .map(|(i, b)| (Euclidean.distance(query, b).unwrap(), i))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked.into_iter().take(k).map(|(_, i)| i).collect()
    }

    #[test]
    fn test_knn_matches_linear_scan_for_metric() {
        let mut rng = StdRng::seed_from_u64(17);
        let buffers = random_buffers(&mut rng, 200, 6);
        let tree = VpTree::build_with(buffers.clone(), Euclidean, 4).unwrap();

        for _ in 0..25 {
            let query: Vec<f64> = (0..6).map(|_| rng.random_range(-250.0..250.0)).collect();
            let found: Vec<usize> = tree.search(&query, 5).unwrap().iter().map(|n| n.index).collect();
            assert_eq!(found, linear_scan(&buffers, &query, 5));
        }
    }

    #[test]
    fn test_members_found_at_zero_distance() {
        let mut rng = StdRng::seed_from_u64(3);
        let buffers = random_buffers(&mut rng, 60, 8);
        let tree = VpTree::build(buffers.clone()).unwrap();
        for buffer in &buffers {
            let hit = tree.nearest(buffer).unwrap().unwrap();
            assert_abs_diff_eq!(hit.distance, 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_results_sorted_and_bounded() {
        let mut rng = StdRng::seed_from_u64(8);
        let tree = VpTree::build(random_buffers(&mut rng, 40, 4)).unwrap();
        let hits = tree.search(&[10.0, 0.0, 0.0, 10.0], 7).unwrap();
        assert_eq!(hits.len(), 7);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert!(tree.search(&[10.0, 0.0, 0.0, 10.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_empty_and_small_trees() {
        let empty = VpTree::build(Vec::new()).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.nearest(&[1.0, 0.0]).unwrap(), None);

        let tree = VpTree::build(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        assert_eq!(tree.search(&[1.0, 0.0], 10).unwrap().len(), 2);
    }

    #[test]
    fn test_mismatched_buffers_rejected() {
        let err = VpTree::build(vec![vec![1.0, 0.0], vec![1.0, 0.0, 2.0, 2.0]]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let tree = VpTree::build(vec![vec![1.0, 0.0]]).unwrap();
        assert!(tree.search(&[1.0], 1).is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_answers() {
        let mut rng = StdRng::seed_from_u64(21);
        let tree = VpTree::build(random_buffers(&mut rng, 30, 6)).unwrap();
        let json = tree.to_json_pretty().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["polylines"].as_array().unwrap().len(), 30);
        assert!(value["vpTree"]["kind"].is_string());

        let restored = VpTree::from_json(&json).unwrap();
        assert_eq!(restored, tree);
    }
}
