use arena_sim::domains::arena::*;

#[cfg(test)]
mod transform_tests {
    use super::*;

    #[test]
    fn test_transform_maps_logical_to_display() {
        // Origin bottom-left maps to the bottom row of the display grid.
        assert_eq!(transform_coord(0, 0), (19, 0));
        assert_eq!(transform_coord(19, 0), (19, 19));
        assert_eq!(transform_coord(0, 19), (0, 0));
    }

    #[test]
    fn test_transform_round_trips_with_inverse() {
        for x in 0..GRID_SIZE {
            for y in 0..GRID_SIZE {
                let (dx, dy) = transform_coord(x, y);
                assert_eq!(inverse_transform_coord(dx, dy), (x, y));

                let (lx, ly) = inverse_transform_coord(x, y);
                assert_eq!(transform_coord(lx, ly), (x, y));
            }
        }
    }

    #[test]
    fn test_transform_is_a_quarter_turn_not_an_involution() {
        // Applying the transform twice is a half-turn of the grid, so the
        // transform is NOT its own inverse; four applications are.
        for x in 0..GRID_SIZE {
            for y in 0..GRID_SIZE {
                let (tx, ty) = transform_coord(x, y);
                let twice = transform_coord(tx, ty);
                assert_eq!(twice, (GRID_SIZE - 1 - x, GRID_SIZE - 1 - y));

                let (tx3, ty3) = transform_coord(twice.0, twice.1);
                assert_eq!(transform_coord(tx3, ty3), (x, y));
            }
        }
    }

    #[test]
    fn test_direction_codes_round_trip() {
        for d in [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
            Direction::Skip,
        ] {
            assert_eq!(Direction::from_code(d.code()), Some(d));
        }
        assert_eq!(Direction::from_code(1), None);
        assert_eq!(Direction::from_code(10), None);
    }
}

#[cfg(test)]
mod robot_cells_tests {
    use super::*;

    #[test]
    fn test_footprint_has_one_marker_among_nine_cells() {
        let cells = robot_cells(&Pose::new(5, 5, Direction::East));
        assert_eq!(cells.len(), 9);
        assert_eq!(cells.iter().filter(|c| c.marker).count(), 1);
    }

    #[test]
    fn test_marker_cell_for_north_facing_robot_at_origin_corner() {
        // Robot at (1, 1) facing North: the marker neighborhood cell is at
        // logical (1, 2), display (19 - 2, 1) = (17, 1).
        let cells = robot_cells(&Pose::new(1, 1, Direction::North));
        let marker = cells.iter().find(|c| c.marker).unwrap();
        assert_eq!((marker.x, marker.y), (17, 1));
        assert!(!marker.visited);
    }

    #[test]
    fn test_skip_direction_keeps_marker_on_center() {
        let cells = robot_cells(&Pose::new(5, 5, Direction::Skip));
        let marker = cells.iter().find(|c| c.marker).unwrap();
        assert_eq!((marker.x, marker.y), transform_coord(5, 5));
    }

    #[test]
    fn test_marker_visited_follows_status() {
        let mut pose = Pose::new(5, 5, Direction::North);
        pose.status = 3;
        let cells = robot_cells(&pose);
        let marker = cells.iter().find(|c| c.marker).unwrap();
        assert!(marker.visited);
    }
}

#[cfg(test)]
mod renderer_tests {
    use super::*;

    fn cell_at(view: &GridView, display: (i32, i32)) -> CellKind {
        view.cell(display.0 as usize, display.1 as usize)
    }

    #[test]
    fn test_empty_scene_renders_robot_and_background_only() {
        let robot = Pose::new(1, 1, Direction::North);
        let view = GridView::render(&[], &robot);

        let mut body = 0;
        let mut markers = 0;
        let mut empty = 0;
        for row in view.rows() {
            for cell in row {
                match cell {
                    CellKind::RobotBody => body += 1,
                    CellKind::RobotMarker { .. } => markers += 1,
                    CellKind::Empty => empty += 1,
                    CellKind::Obstacle { .. } => panic!("no obstacles in scene"),
                }
            }
        }
        assert_eq!(body, 8);
        assert_eq!(markers, 1);
        assert_eq!(empty, 400 - 9);
        assert_eq!(
            cell_at(&view, (17, 1)),
            CellKind::RobotMarker { visited: false }
        );
    }

    #[test]
    fn test_obstacle_classification_keeps_facing() {
        let obstacles = vec![
            Obstacle { x: 10, y: 10, direction: Direction::West, id: 1 },
            Obstacle { x: 3, y: 12, direction: Direction::Skip, id: 2 },
        ];
        let robot = Pose::new(1, 1, Direction::North);
        let view = GridView::render(&obstacles, &robot);

        assert_eq!(
            cell_at(&view, transform_coord(10, 10)),
            CellKind::Obstacle { facing: Some(Direction::West) }
        );
        // Skip means a plain filled cell with no highlighted face edge.
        assert_eq!(
            cell_at(&view, transform_coord(3, 12)),
            CellKind::Obstacle { facing: None }
        );
    }

    #[test]
    fn test_obstacle_masks_robot_cells() {
        // The obstacle sits exactly on the robot's marker cell; obstacle
        // lookups win at the same display coordinate.
        let obstacles = vec![Obstacle { x: 1, y: 2, direction: Direction::South, id: 1 }];
        let robot = Pose::new(1, 1, Direction::North);
        let view = GridView::render(&obstacles, &robot);

        assert_eq!(
            cell_at(&view, transform_coord(1, 2)),
            CellKind::Obstacle { facing: Some(Direction::South) }
        );
        // The rest of the footprint still renders.
        assert_eq!(cell_at(&view, transform_coord(0, 0)), CellKind::RobotBody);
    }

    #[test]
    fn test_first_obstacle_wins_on_shared_display_cell() {
        let obstacles = vec![
            Obstacle { x: 7, y: 7, direction: Direction::North, id: 1 },
            Obstacle { x: 7, y: 7, direction: Direction::Skip, id: 2 },
        ];
        let robot = Pose::new(1, 1, Direction::North);
        let view = GridView::render(&obstacles, &robot);

        assert_eq!(
            cell_at(&view, transform_coord(7, 7)),
            CellKind::Obstacle { facing: Some(Direction::North) }
        );
    }

    #[test]
    fn test_visited_marker_renders_from_path_status() {
        let mut robot = Pose::new(5, 5, Direction::East);
        robot.status = 2;
        let view = GridView::render(&[], &robot);

        assert_eq!(
            cell_at(&view, transform_coord(6, 5)),
            CellKind::RobotMarker { visited: true }
        );
    }
}
