use crate::{
    error::{Error, Result},
    swatch::{self, Swatch},
};
use rand::{rngs::StdRng, seq::index, SeedableRng};
use std::collections::HashMap;

/// A distinct RGB point in the pool. Alpha plays no part in clustering
/// distance, so pool entries sharing an RGB value are merged up front with
/// their weights summed and their alpha averaged.
struct Point {
    rgb: [f64; 3],
    alpha: f64,
    count: u64,
}

/// One finished k-means attempt: per-point cluster assignment and the total
/// within-cluster squared distance it achieved.
struct Run {
    assignment: Vec<usize>,
    inertia: f64,
}

/// Cluster the pool into exactly `k` weighted colors, keeping the best of
/// `runs` independent attempts. Deterministic for a given `seed`.
pub(crate) fn cluster(
    swatches: &[Swatch],
    k: usize,
    runs: usize,
    max_iter: usize,
    seed: u64,
) -> Result<Vec<Swatch>> {
    let points = merge_by_rgb(swatches);

    if points.len() < k {
        return Err(Error::InsufficientData {
            available: points.len(),
            needed: k,
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let best = best_of(runs, |_| attempt(&points, k, max_iter, &mut rng));

    Ok(clusters_to_swatches(&points, &best.assignment, k))
}

/// Run `n` attempts and keep the one with the lowest inertia.
fn best_of<F>(n: usize, mut attempt: F) -> Run
where
    F: FnMut(usize) -> Run,
{
    let mut best = attempt(0);

    for run in 1..n {
        let candidate = attempt(run);
        if candidate.inertia < best.inertia {
            best = candidate;
        }
    }

    best
}

/// A single k-means attempt: centroids start as `k` distinct points sampled
/// from the pool, then assignment and weighted-mean update steps alternate
/// until no point changes cluster or `max_iter` passes are spent.
fn attempt(points: &[Point], k: usize, max_iter: usize, rng: &mut StdRng) -> Run {
    let mut centroids: Vec<[f64; 3]> = index::sample(rng, points.len(), k)
        .into_iter()
        .map(|i| points[i].rgb)
        .collect();
    let mut assignment = vec![usize::MAX; points.len()];

    for _ in 0..max_iter {
        if !assign(points, &centroids, &mut assignment) {
            break;
        }

        update(points, &assignment, &mut centroids);
    }

    // the last update pass may have moved the centroids, so settle the
    // assignment against them before measuring the result
    assign(points, &centroids, &mut assignment);
    repair_empty_clusters(points, &mut assignment, &mut centroids);

    let inertia = points
        .iter()
        .zip(&assignment)
        .map(|(point, &cluster)| point.count as f64 * dist2(point.rgb, centroids[cluster]))
        .sum();

    Run { assignment, inertia }
}

/// Move every point to its nearest centroid. Returns whether any point
/// changed cluster.
fn assign(points: &[Point], centroids: &[[f64; 3]], assignment: &mut [usize]) -> bool {
    let mut changed = false;

    for (point, slot) in points.iter().zip(assignment.iter_mut()) {
        let mut nearest = 0;
        let mut nearest_dist = f64::INFINITY;

        for (cluster, centroid) in centroids.iter().enumerate() {
            let dist = dist2(point.rgb, *centroid);
            if dist < nearest_dist {
                nearest = cluster;
                nearest_dist = dist;
            }
        }

        if *slot != nearest {
            *slot = nearest;
            changed = true;
        }
    }

    changed
}

/// Recompute each centroid as the weighted mean of its assigned points. A
/// cluster that lost all its points is reseeded to the point farthest from
/// its current centroid so every attempt ends with `k` non-empty clusters.
fn update(points: &[Point], assignment: &[usize], centroids: &mut [[f64; 3]]) {
    let mut sums = vec![[0.0f64; 3]; centroids.len()];
    let mut weights = vec![0.0f64; centroids.len()];

    for (point, &cluster) in points.iter().zip(assignment) {
        let weight = point.count as f64;
        sums[cluster][0] += point.rgb[0] * weight;
        sums[cluster][1] += point.rgb[1] * weight;
        sums[cluster][2] += point.rgb[2] * weight;
        weights[cluster] += weight;
    }

    for cluster in 0..centroids.len() {
        if weights[cluster] > 0.0 {
            centroids[cluster] = [
                sums[cluster][0] / weights[cluster],
                sums[cluster][1] / weights[cluster],
                sums[cluster][2] / weights[cluster],
            ];
        }
    }

    for cluster in 0..centroids.len() {
        if weights[cluster] == 0.0 {
            if let Some(farthest) = farthest_point(points, assignment, centroids) {
                centroids[cluster] = points[farthest].rgb;
            }
        }
    }
}

/// Index of the point farthest from its assigned centroid.
fn farthest_point(points: &[Point], assignment: &[usize], centroids: &[[f64; 3]]) -> Option<usize> {
    points
        .iter()
        .zip(assignment)
        .enumerate()
        .max_by(|(_, (a, &ca)), (_, (b, &cb))| {
            let dist_a = dist2(a.rgb, centroids[ca]);
            let dist_b = dist2(b.rgb, centroids[cb]);
            dist_a.total_cmp(&dist_b)
        })
        .map(|(i, _)| i)
}

/// Force any cluster that ended up empty to adopt the farthest point of a
/// cluster that can spare one. With at least `k` distinct points in the pool
/// this always terminates with every cluster non-empty.
fn repair_empty_clusters(points: &[Point], assignment: &mut [usize], centroids: &mut [[f64; 3]]) {
    loop {
        let mut members = vec![0usize; centroids.len()];
        for &cluster in assignment.iter() {
            members[cluster] += 1;
        }

        let Some(empty) = members.iter().position(|&count| count == 0) else {
            return;
        };

        let donor = points
            .iter()
            .zip(assignment.iter())
            .enumerate()
            .filter(|(_, (_, &cluster))| members[cluster] > 1)
            .max_by(|(_, (a, &ca)), (_, (b, &cb))| {
                let dist_a = dist2(a.rgb, centroids[ca]);
                let dist_b = dist2(b.rgb, centroids[cb]);
                dist_a.total_cmp(&dist_b)
            })
            .map(|(i, _)| i);

        let Some(donor) = donor else {
            return;
        };

        assignment[donor] = empty;
        centroids[empty] = points[donor].rgb;
    }
}

/// Collapse the final assignment back into weighted swatches, one per
/// cluster, in canonical order. Each swatch carries the weighted mean RGB and
/// alpha of its member pixels and their total count.
fn clusters_to_swatches(points: &[Point], assignment: &[usize], k: usize) -> Vec<Swatch> {
    let mut sums = vec![[0.0f64; 4]; k];
    let mut counts = vec![0u64; k];

    for (point, &cluster) in points.iter().zip(assignment) {
        let weight = point.count as f64;
        sums[cluster][0] += point.rgb[0] * weight;
        sums[cluster][1] += point.rgb[1] * weight;
        sums[cluster][2] += point.rgb[2] * weight;
        sums[cluster][3] += point.alpha * weight;
        counts[cluster] += point.count;
    }

    let mut swatches: Vec<Swatch> = sums
        .iter()
        .zip(&counts)
        .filter(|(_, &count)| count > 0)
        .map(|(sum, &count)| {
            let weight = count as f64;
            Swatch::new(
                (
                    (sum[0] / weight).round() as u8,
                    (sum[1] / weight).round() as u8,
                    (sum[2] / weight).round() as u8,
                    (sum[3] / weight).round() as u8,
                ),
                count as u32,
            )
        })
        .collect();

    swatch::sort_by_prevalence(&mut swatches);
    swatches
}

/// Merge pool entries that share an RGB value, summing their pixel counts and
/// averaging their alpha. Sorted so clustering is reproducible for a given
/// seed regardless of hash order.
fn merge_by_rgb(swatches: &[Swatch]) -> Vec<Point> {
    let mut merged: HashMap<(u8, u8, u8), (u64, f64)> = HashMap::new();

    for swatch in swatches {
        let count = u64::from(swatch.population());
        let entry = merged.entry(swatch.rgb()).or_insert((0, 0.0));
        entry.0 += count;
        entry.1 += f64::from(swatch.alpha()) * count as f64;
    }

    let mut merged: Vec<_> = merged.into_iter().collect();
    merged.sort_unstable_by_key(|&(rgb, _)| rgb);

    merged
        .into_iter()
        .map(|((r, g, b), (count, alpha_sum))| Point {
            rgb: [f64::from(r), f64::from(g), f64::from(b)],
            alpha: alpha_sum / count as f64,
            count,
        })
        .collect()
}

fn dist2(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}
