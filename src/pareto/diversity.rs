//! Density estimators in objective space
//!
//! Crowding distance (larger = more isolated) and sigma-sharing
//! (smaller = more isolated).

/// Crowding distance for the members of `front`
///
/// Returns one distance per entry of `front`, in the same order. Boundary
/// members of every objective get `f64::INFINITY`; fronts of two or fewer
/// members are all boundary. An objective with zero range adds nothing to the
/// interior members.
pub fn crowding_distance<O: AsRef<[f64]>>(objectives: &[O], front: &[usize]) -> Vec<f64> {
    let n = front.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let mut distances = vec![0.0; n];
    let num_objectives = objectives[front[0]].as_ref().len();
    let value = |pos: usize, obj: usize| objectives[front[pos]].as_ref()[obj];

    for obj in 0..num_objectives {
        // Positions within `front`, sorted by this objective
        let mut sorted: Vec<usize> = (0..n).collect();
        sorted.sort_by(|&a, &b| value(a, obj).total_cmp(&value(b, obj)));

        distances[sorted[0]] = f64::INFINITY;
        distances[sorted[n - 1]] = f64::INFINITY;

        let obj_min = value(sorted[0], obj);
        let obj_max = value(sorted[n - 1], obj);
        let obj_range = obj_max - obj_min;
        if obj_range <= 0.0 {
            continue;
        }

        for k in 1..(n - 1) {
            let prev_val = value(sorted[k - 1], obj);
            let next_val = value(sorted[k + 1], obj);
            distances[sorted[k]] += (next_val - prev_val) / obj_range;
        }
    }

    distances
}

/// Sigma-sharing niche count for every point
///
/// `share_i = Σ_{j≠i} max(0, 1 - d_ij / sigma)` where `d_ij` is the Euclidean
/// distance divided by the diagonal of the objective bounding box. A zero
/// diagonal makes every normalized distance zero.
pub fn sharing_values<O: AsRef<[f64]>>(objectives: &[O], sigma: f64) -> Vec<f64> {
    let n = objectives.len();
    if n == 0 {
        return vec![];
    }

    let m = objectives[0].as_ref().len();
    let mut mins = vec![f64::INFINITY; m];
    let mut maxs = vec![f64::NEG_INFINITY; m];
    for point in objectives {
        for (k, &v) in point.as_ref().iter().enumerate() {
            mins[k] = mins[k].min(v);
            maxs[k] = maxs[k].max(v);
        }
    }
    let diagonal = mins
        .iter()
        .zip(&maxs)
        .map(|(lo, hi)| (hi - lo).powi(2))
        .sum::<f64>()
        .sqrt();

    let mut shares = vec![0.0; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let raw = euclidean(objectives[i].as_ref(), objectives[j].as_ref());
            let normalized = if diagonal > 0.0 { raw / diagonal } else { 0.0 };
            let contribution = (1.0 - normalized / sigma).max(0.0);
            shares[i] += contribution;
            shares[j] += contribution;
        }
    }
    shares
}

/// Keep the `keep` least-shared points among `candidates`
///
/// Sharing is computed only among the candidates. Ties keep candidate order.
/// Returns indices into `objectives`.
pub fn select_by_sharing<O: AsRef<[f64]>>(
    objectives: &[O],
    candidates: &[usize],
    keep: usize,
    sigma: f64,
) -> Vec<usize> {
    let subset: Vec<&[f64]> = candidates.iter().map(|&i| objectives[i].as_ref()).collect();
    let shares = sharing_values(&subset, sigma);
    let mut ranked: Vec<(usize, f64)> = candidates.iter().copied().zip(shares).collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked.into_iter().take(keep).map(|(i, _)| i).collect()
}

/// Euclidean distance between two objective vectors
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
