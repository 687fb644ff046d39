//! Boolean-grid morphology
//!
//! Explicit structuring-element routines over 2D grids: dilation, erosion
//! and a neighborhood maximum filter. The structuring element starts from
//! the minimal full-connectivity 3×3 shape (orthogonal plus diagonal
//! neighbors) and is grown by repeated structural dilation, so a
//! `Neighborhood` grown for `n` iterations spans radius `n` on each axis.
//!
//! Border conventions, fixed per operation:
//! - dilation: points outside the grid are background
//! - erosion: caller supplies the border value
//! - maximum filter: the window is clamped to the grid (value-equivalent to
//!   reflection for this full-square neighborhood)

use rayon::prelude::*;

/// Structuring element spanning `(2 * radius + 1)²` cells
#[derive(Debug, Clone)]
pub struct Neighborhood {
    radius: usize,
    mask: Vec<Vec<bool>>,
    offsets: Vec<(isize, isize)>,
}

impl Neighborhood {
    /// Minimal full-connectivity shape: a 3×3 block covering orthogonal
    /// and diagonal neighbors
    fn base() -> Vec<Vec<bool>> {
        vec![vec![true; 3]; 3]
    }

    /// Grow the base shape by repeated structural dilation
    ///
    /// `iterations` of growth produce a neighborhood of radius
    /// `iterations` per axis; values below 1 yield the base shape.
    pub fn grown(iterations: usize) -> Self {
        let base = Self::from_mask(Self::base());
        let mut mask = Self::base();

        for _ in 1..iterations.max(1) {
            mask = dilate(&pad(&mask), &base);
        }

        Self::from_mask(mask)
    }

    fn from_mask(mask: Vec<Vec<bool>>) -> Self {
        let radius = mask.len() / 2;
        let mut offsets = Vec::new();
        for (r, row) in mask.iter().enumerate() {
            for (c, &set) in row.iter().enumerate() {
                if set {
                    offsets.push((r as isize - radius as isize, c as isize - radius as isize));
                }
            }
        }
        Self { radius, mask, offsets }
    }

    /// Radius per axis
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Offsets of the set cells relative to the center
    pub fn offsets(&self) -> &[(isize, isize)] {
        &self.offsets
    }

    /// The element's boolean mask
    pub fn mask(&self) -> &[Vec<bool>] {
        &self.mask
    }
}

/// Surround a grid with one ring of background
fn pad(grid: &[Vec<bool>]) -> Vec<Vec<bool>> {
    let cols = grid.first().map_or(0, |row| row.len());
    let mut out = vec![vec![false; cols + 2]];
    for row in grid {
        let mut padded = Vec::with_capacity(cols + 2);
        padded.push(false);
        padded.extend_from_slice(row);
        padded.push(false);
        out.push(padded);
    }
    out.push(vec![false; cols + 2]);
    out
}

/// Dilate a boolean grid: a point is set if any element offset lands on a
/// set input point. Points outside the grid are background.
pub fn dilate(grid: &[Vec<bool>], element: &Neighborhood) -> Vec<Vec<bool>> {
    let rows = grid.len() as isize;
    let cols = grid.first().map_or(0, |row| row.len()) as isize;

    grid.par_iter()
        .enumerate()
        .map(|(r, row)| {
            (0..row.len())
                .map(|c| {
                    element.offsets().iter().any(|&(dr, dc)| {
                        let rr = r as isize + dr;
                        let cc = c as isize + dc;
                        rr >= 0 && rr < rows && cc >= 0 && cc < cols && grid[rr as usize][cc as usize]
                    })
                })
                .collect()
        })
        .collect()
}

/// Erode a boolean grid: a point survives only if every element offset
/// lands on a set point. Offsets falling outside the grid read
/// `border_value`.
pub fn erode(grid: &[Vec<bool>], element: &Neighborhood, border_value: bool) -> Vec<Vec<bool>> {
    let rows = grid.len() as isize;
    let cols = grid.first().map_or(0, |row| row.len()) as isize;

    grid.par_iter()
        .enumerate()
        .map(|(r, row)| {
            (0..row.len())
                .map(|c| {
                    element.offsets().iter().all(|&(dr, dc)| {
                        let rr = r as isize + dr;
                        let cc = c as isize + dc;
                        if rr < 0 || rr >= rows || cc < 0 || cc >= cols {
                            border_value
                        } else {
                            grid[rr as usize][cc as usize]
                        }
                    })
                })
                .collect()
        })
        .collect()
}

/// Neighborhood maximum of an `f32` grid; the window is clamped at the
/// grid borders
pub fn maximum_filter(grid: &[Vec<f32>], element: &Neighborhood) -> Vec<Vec<f32>> {
    let rows = grid.len() as isize;
    let cols = grid.first().map_or(0, |row| row.len()) as isize;

    grid.par_iter()
        .enumerate()
        .map(|(r, row)| {
            (0..row.len())
                .map(|c| {
                    element
                        .offsets()
                        .iter()
                        .filter_map(|&(dr, dc)| {
                            let rr = r as isize + dr;
                            let cc = c as isize + dc;
                            if rr >= 0 && rr < rows && cc >= 0 && cc < cols {
                                Some(grid[rr as usize][cc as usize])
                            } else {
                                None
                            }
                        })
                        .fold(f32::NEG_INFINITY, f32::max)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grown_radius_matches_iterations() {
        for iterations in [1, 2, 5, 20] {
            let nb = Neighborhood::grown(iterations);
            assert_eq!(nb.radius(), iterations);
            assert_eq!(nb.mask().len(), 2 * iterations + 1);
        }
    }

    #[test]
    fn test_grown_from_full_base_stays_full() {
        let nb = Neighborhood::grown(3);
        assert!(nb.mask().iter().flatten().all(|&set| set));
        assert_eq!(nb.offsets().len(), 49);
    }

    #[test]
    fn test_dilate_point_becomes_block() {
        let mut grid = vec![vec![false; 5]; 5];
        grid[2][2] = true;

        let dilated = dilate(&grid, &Neighborhood::grown(1));

        for (r, row) in dilated.iter().enumerate() {
            for (c, &set) in row.iter().enumerate() {
                let inside = (1..=3).contains(&r) && (1..=3).contains(&c);
                assert_eq!(set, inside, "({}, {})", r, c);
            }
        }
    }

    #[test]
    fn test_erode_foreground_border_keeps_edges() {
        let grid = vec![vec![true; 3]; 3];
        let eroded = erode(&grid, &Neighborhood::grown(1), true);
        assert!(eroded.iter().flatten().all(|&set| set));
    }

    #[test]
    fn test_erode_background_border_strips_edges() {
        let grid = vec![vec![true; 3]; 3];
        let eroded = erode(&grid, &Neighborhood::grown(1), false);
        let survivors: usize = eroded.iter().flatten().filter(|&&set| set).count();
        assert_eq!(survivors, 1);
        assert!(eroded[1][1]);
    }

    #[test]
    fn test_maximum_filter_clamps_at_border() {
        let grid = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let filtered = maximum_filter(&grid, &Neighborhood::grown(1));
        assert_eq!(filtered[0][0], 5.0);
        assert_eq!(filtered[1][2], 6.0);
        assert!(filtered.iter().flatten().all(|&v| v <= 6.0));
    }
}
