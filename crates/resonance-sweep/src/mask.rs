// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Grid Connectivity
// ─────────────────────────────────────────────────────────────────────
//! 4-connected components of the ringing mask.

use std::collections::VecDeque;

use resonance_types::GridMask;

const NEIGHBOURS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Sizes of every 4-connected component of true cells, in discovery
/// order (row-major by first cell).
pub fn component_sizes(mask: &GridMask) -> Vec<usize> {
    let (rows, cols) = (mask.rows(), mask.cols());
    let mut seen = vec![false; rows * cols];
    let mut queue = VecDeque::new();
    let mut sizes = Vec::new();

    for start in 0..rows * cols {
        if seen[start] || !mask.cells()[start] {
            continue;
        }
        seen[start] = true;
        queue.push_back(start);
        let mut size = 0;
        while let Some(idx) = queue.pop_front() {
            size += 1;
            let (r, c) = ((idx / cols) as isize, (idx % cols) as isize);
            for (dr, dc) in NEIGHBOURS {
                let (nr, nc) = (r + dr, c + dc);
                if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
                    continue;
                }
                let n = nr as usize * cols + nc as usize;
                if !seen[n] && mask.cells()[n] {
                    seen[n] = true;
                    queue.push_back(n);
                }
            }
        }
        sizes.push(size);
    }
    sizes
}

/// Size of the largest 4-connected component; 0 for an all-false mask.
pub fn largest_component(mask: &GridMask) -> usize {
    component_sizes(mask).into_iter().max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(rows: &[&str]) -> GridMask {
        let rows: Vec<Vec<bool>> = rows
            .iter()
            .map(|r| r.chars().map(|c| c == '#').collect())
            .collect();
        GridMask::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_single_cell() {
        let m = mask(&["...", ".#.", "..."]);
        assert_eq!(largest_component(&m), 1);
    }

    #[test]
    fn test_all_true_5x5() {
        let m = GridMask::from_cells(5, 5, vec![true; 25]).unwrap();
        assert_eq!(largest_component(&m), 25);
    }

    #[test]
    fn test_empty_mask() {
        assert_eq!(largest_component(&GridMask::new(4, 4)), 0);
        assert_eq!(largest_component(&GridMask::new(0, 0)), 0);
    }

    #[test]
    fn test_diagonal_not_connected() {
        let m = mask(&["#..", ".#.", "..#"]);
        assert_eq!(component_sizes(&m), vec![1, 1, 1]);
    }

    #[test]
    fn test_no_wraparound_between_rows() {
        // last cell of row 0 and first of row 1 are not neighbours
        let m = mask(&["..#", "#.."]);
        assert_eq!(largest_component(&m), 1);
    }

    #[test]
    fn test_snake_shape() {
        let m = mask(&["####", "...#", "####", "#..."]);
        assert_eq!(largest_component(&m), 10);
    }

    #[test]
    fn test_two_regions() {
        let m = mask(&["##..#", "##..#", ".....", "#####"]);
        let mut sizes = component_sizes(&m);
        sizes.sort_unstable();
        assert_eq!(sizes, vec![2, 4, 5]);
        assert_eq!(largest_component(&m), 5);
    }
}
