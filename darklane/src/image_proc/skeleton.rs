//! Topology-preserving thinning of boolean masks.
//!
//! Zhang-Suen thinning alternates two sub-iterations that peel boundary
//! pixels from opposite sides until nothing changes. Pixels outside the
//! raster count as background. Candidates are collected in parallel-style
//! passes but re-checked against the current raster as they are removed,
//! which keeps two-pixel-thick strokes from vanishing in a single pass.

use ndarray::{Array2, ArrayView2};

/// Neighbours in clockwise order from north: P2, P3, ... P9.
const RING: [(isize, isize); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

fn ring_values(img: &Array2<bool>, row: usize, col: usize) -> [bool; 8] {
    let (rows, cols) = img.dim();
    RING.map(|(dr, dc)| {
        let r = row as isize + dr;
        let c = col as isize + dc;
        r >= 0 && c >= 0 && r < rows as isize && c < cols as isize && img[[r as usize, c as usize]]
    })
}

/// Zhang-Suen deletion test for one sub-iteration (`first` selects which).
fn is_deletable(p: &[bool; 8], first: bool) -> bool {
    let neighbours = p.iter().filter(|&&v| v).count();
    if !(2..=6).contains(&neighbours) {
        return false;
    }
    let transitions = (0..8).filter(|&i| !p[i] && p[(i + 1) % 8]).count();
    if transitions != 1 {
        return false;
    }
    let (n, e, s, w) = (p[0], p[2], p[4], p[6]);
    if first {
        !(n && e && s) && !(e && s && w)
    } else {
        !(n && e && w) && !(n && s && w)
    }
}

/// Thin `mask` to a one-pixel-wide skeleton with the same connectivity.
pub fn skeletonize(mask: ArrayView2<bool>) -> Array2<bool> {
    let mut current = mask.to_owned();
    let mut foreground: Vec<(usize, usize)> = current
        .indexed_iter()
        .filter(|(_, &set)| set)
        .map(|(idx, _)| idx)
        .collect();

    loop {
        let mut changed = false;

        for first in [true, false] {
            let candidates: Vec<(usize, usize)> = foreground
                .iter()
                .copied()
                .filter(|&(r, c)| {
                    current[[r, c]] && is_deletable(&ring_values(&current, r, c), first)
                })
                .collect();

            for (r, c) in candidates {
                if is_deletable(&ring_values(&current, r, c), first) {
                    current[[r, c]] = false;
                    changed = true;
                }
            }
        }

        if !changed {
            break;
        }
        foreground.retain(|&(r, c)| current[[r, c]]);
    }

    current
}
