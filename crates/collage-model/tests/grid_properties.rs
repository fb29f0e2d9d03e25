use collage_model::{CellSize, GridSpec, Layout};
use proptest::prelude::*;

fn dims_strategy() -> impl Strategy<Value = Vec<(u32, u32)>> {
    prop::collection::vec((1u32..4096, 1u32..4096), 1..32)
}

proptest! {
    #[test]
    fn cell_size_is_max_of_each_axis(dims in dims_strategy()) {
        let cell = CellSize::from_dimensions(dims.iter().copied()).unwrap();
        prop_assert_eq!(cell.width, dims.iter().map(|d| d.0).max().unwrap());
        prop_assert_eq!(cell.height, dims.iter().map(|d| d.1).max().unwrap());
    }

    #[test]
    fn canvas_size_law(rows in 1u32..64, cols in 1u32..64, dims in dims_strategy()) {
        let grid = GridSpec::new(rows, cols).unwrap();
        let layout = Layout::fit(grid, dims.iter().copied()).unwrap();
        prop_assert_eq!(layout.canvas_width(), cols * layout.cell.width);
        prop_assert_eq!(layout.canvas_height(), rows * layout.cell.height);
    }

    #[test]
    fn placement_law(rows in 1u32..32, cols in 1u32..32, count in 1usize..1200) {
        let grid = GridSpec::new(rows, cols).unwrap();
        let layout = Layout::new(grid, CellSize { width: 7, height: 5 }).unwrap();

        let placements: Vec<_> = layout.placements(count).collect();
        prop_assert_eq!(placements.len() as u64, grid.cell_count().min(count as u64));

        for (i, p) in placements.iter().enumerate() {
            prop_assert_eq!(p.index, i);
            prop_assert_eq!(p.row as usize, i / cols as usize);
            prop_assert_eq!(p.col as usize, i % cols as usize);

            let rect = layout.cell_rect(i).unwrap();
            prop_assert_eq!(rect.x, p.col * 7);
            prop_assert_eq!(rect.y, p.row * 5);
            prop_assert!(rect.right() <= layout.canvas_width());
            prop_assert!(rect.bottom() <= layout.canvas_height());
        }
    }

    #[test]
    fn cells_never_overlap(rows in 1u32..8, cols in 1u32..8) {
        let grid = GridSpec::new(rows, cols).unwrap();
        let layout = Layout::new(grid, CellSize { width: 3, height: 2 }).unwrap();
        let cells = grid.cell_count() as usize;

        for a in 0..cells {
            let ra = layout.cell_rect(a).unwrap();
            for b in (a + 1)..cells {
                let rb = layout.cell_rect(b).unwrap();
                prop_assert!(!rb.contains(ra.x, ra.y));
                prop_assert!(!ra.contains(rb.x, rb.y));
            }
        }
    }
}
