use ratatui::layout::Rect;

use veraclaim::layout::nodes::{DIVIDER_HANDLE, DIVIDER_WRAPPER, NodeId, SPLIT_ROW};
use veraclaim::layout::{
    DragController, LayoutNodes, WidthBounds, WidthModel, next_left_width, resolve_split_container,
};

const EPS: f64 = 1e-9;

fn bounds() -> WidthBounds {
    WidthBounds::default()
}

/// Split row 1000 columns wide with the divider at column 340.
fn mounted_split(width: u16) -> LayoutNodes {
    let mut nodes = LayoutNodes::new();
    let row = Rect::new(0, 1, width, 20);
    let divider = Rect::new(width * 34 / 100, 1, 1, 20);
    nodes.mount(SPLIT_ROW, None, row);
    nodes.mount(DIVIDER_WRAPPER, Some(SPLIT_ROW), divider);
    nodes.mount(DIVIDER_HANDLE, Some(DIVIDER_WRAPPER), divider);
    nodes
}

// --- Width model ---

#[test]
fn test_no_movement_keeps_width() {
    assert_eq!(next_left_width(34.0, 0.0, Some(1000.0), &bounds()), 34.0);
}

#[test]
fn test_wider_drag_never_narrows_pane() {
    for start in [20.0, 34.0, 51.5, 70.0] {
        let mut last = f64::NEG_INFINITY;
        for step in -60..=60 {
            let delta = f64::from(step) * 25.0;
            let next = next_left_width(start, delta, Some(1000.0), &bounds());
            assert!(next >= last, "start {} delta {}: {} < {}", start, delta, next, last);
            last = next;
        }
    }
}

#[test]
fn test_opposite_drags_mirror_around_start() {
    for start in [30.0, 34.0, 45.0, 60.0] {
        for delta in [0.0, 1.0, 17.5, 80.0] {
            let right = next_left_width(start, delta, Some(1000.0), &bounds());
            let left = next_left_width(start, -delta, Some(1000.0), &bounds());
            assert!(
                (right + left - 2.0 * start).abs() < EPS,
                "start {} delta {}",
                start,
                delta
            );
        }
    }
}

#[test]
fn test_large_left_drag_saturates_floor() {
    assert_eq!(next_left_width(22.0, -1000.0, Some(500.0), &bounds()), 20.0);
}

#[test]
fn test_large_right_drag_saturates_ceiling() {
    assert_eq!(next_left_width(60.0, 1000.0, Some(500.0), &bounds()), 70.0);
}

#[test]
fn test_zero_container_width_returns_start() {
    assert_eq!(next_left_width(34.0, 100.0, Some(0.0), &bounds()), 34.0);
}

#[test]
fn test_missing_or_non_finite_container_returns_start() {
    assert_eq!(next_left_width(41.0, 100.0, None, &bounds()), 41.0);
    assert_eq!(next_left_width(41.0, 100.0, Some(f64::NAN), &bounds()), 41.0);
    assert_eq!(
        next_left_width(41.0, 100.0, Some(f64::INFINITY), &bounds()),
        41.0
    );
}

#[test]
fn test_width_inside_bounds_is_linear() {
    let next = next_left_width(34.0, 50.0, Some(1000.0), &bounds());
    assert!((next - 39.0).abs() < EPS);

    let next = next_left_width(50.0, -100.0, Some(400.0), &bounds());
    assert!((next - 25.0).abs() < EPS);
}

#[test]
fn test_result_always_within_bounds() {
    let b = bounds();
    for delta in [-5000.0, -300.0, -1.0, 0.0, 1.0, 300.0, 5000.0] {
        for start in [20.0, 34.0, 55.0, 70.0] {
            let next = next_left_width(start, delta, Some(640.0), &b);
            assert!(next >= b.min && next <= b.max, "{} from {}", next, start);
        }
    }
}

#[test]
fn test_custom_bounds() {
    let b = WidthBounds::new(10.0, 90.0, 50.0).unwrap();
    assert_eq!(next_left_width(50.0, -1000.0, Some(100.0), &b), 10.0);
    assert_eq!(next_left_width(50.0, 1000.0, Some(100.0), &b), 90.0);
}

#[test]
fn test_invalid_bounds_rejected() {
    assert!(WidthBounds::new(70.0, 20.0, 34.0).is_err());
    assert!(WidthBounds::new(0.0, 70.0, 34.0).is_err());
    assert!(WidthBounds::new(20.0, 100.0, 34.0).is_err());
    assert!(WidthBounds::new(20.0, 70.0, 80.0).is_err());
    assert!(WidthBounds::new(f64::NAN, 70.0, 34.0).is_err());
}

#[test]
fn test_width_model_set_clamps_and_reset_restores_default() {
    let mut model = WidthModel::default();
    assert_eq!(model.percent(), 34.0);

    model.set(95.0);
    assert_eq!(model.percent(), 70.0);
    model.set(f64::NAN);
    assert_eq!(model.percent(), 70.0);

    model.reset();
    assert_eq!(model.percent(), 34.0);
}

#[test]
fn test_left_columns_leaves_room_for_divider() {
    let mut model = WidthModel::default();
    assert_eq!(model.left_columns(100), 34);
    model.set(70.0);
    assert_eq!(model.left_columns(200), 140);
    assert_eq!(model.left_columns(1), 0);
}

// --- Container resolver ---

#[test]
fn test_resolver_without_handle_is_none() {
    let nodes = mounted_split(1000);
    assert_eq!(resolve_split_container(&nodes, None), None);
}

#[test]
fn test_resolver_climbs_two_levels() {
    let nodes = mounted_split(1000);
    assert_eq!(
        resolve_split_container(&nodes, Some(DIVIDER_HANDLE)),
        Some(SPLIT_ROW)
    );
    assert_eq!(nodes.width(SPLIT_ROW), Some(1000.0));
}

#[test]
fn test_resolver_with_detached_handle_is_none() {
    let nodes = LayoutNodes::new();
    assert_eq!(resolve_split_container(&nodes, Some(DIVIDER_HANDLE)), None);
}

#[test]
fn test_resolver_with_missing_wrapper_or_row_is_none() {
    let mut nodes = mounted_split(1000);
    nodes.unmount(DIVIDER_WRAPPER);
    assert_eq!(resolve_split_container(&nodes, Some(DIVIDER_HANDLE)), None);

    let mut nodes = mounted_split(1000);
    nodes.unmount(SPLIT_ROW);
    assert_eq!(resolve_split_container(&nodes, Some(DIVIDER_HANDLE)), None);
}

#[test]
fn test_resolver_with_one_level_parent_is_none() {
    let mut nodes = LayoutNodes::new();
    let handle = NodeId("orphan.handle");
    nodes.mount(DIVIDER_WRAPPER, None, Rect::new(0, 0, 1, 10));
    nodes.mount(handle, Some(DIVIDER_WRAPPER), Rect::new(0, 0, 1, 10));
    assert_eq!(resolve_split_container(&nodes, Some(handle)), None);
}

#[test]
fn test_hit_test_uses_mounted_area() {
    let nodes = mounted_split(100);
    assert!(nodes.hit(DIVIDER_HANDLE, 34, 5));
    assert!(!nodes.hit(DIVIDER_HANDLE, 35, 5));
    assert!(!nodes.hit(DIVIDER_HANDLE, 34, 0));
    assert!(nodes.hit(SPLIT_ROW, 99, 20));
}

// --- Drag controller ---

#[test]
fn test_full_gesture() {
    let nodes = mounted_split(1000);
    let mut model = WidthModel::default();
    let mut drag = DragController::new();
    assert!(!drag.is_dragging());

    drag.begin(340.0, model.percent(), DIVIDER_HANDLE);
    assert!(drag.is_dragging());

    let next = drag.on_move(390.0, &nodes, model.bounds()).unwrap();
    model.set(next);
    assert!((model.percent() - 39.0).abs() < EPS);

    assert!(drag.end());
    assert!(!drag.is_dragging());
    assert!(drag.session().is_none());

    // Moves after release change nothing
    assert_eq!(drag.on_move(900.0, &nodes, model.bounds()), None);
    assert!((model.percent() - 39.0).abs() < EPS);

    model.reset();
    assert_eq!(model.percent(), 34.0);
}

#[test]
fn test_moves_are_relative_to_gesture_start() {
    let nodes = mounted_split(1000);
    let model = WidthModel::default();
    let mut drag = DragController::new();
    drag.begin(340.0, model.percent(), DIVIDER_HANDLE);

    let first = drag.on_move(350.0, &nodes, model.bounds()).unwrap();
    let second = drag.on_move(330.0, &nodes, model.bounds()).unwrap();
    assert!((first - 35.0).abs() < EPS);
    assert!((second - 33.0).abs() < EPS);
}

#[test]
fn test_move_when_container_unmounted_is_skipped() {
    let mut nodes = mounted_split(1000);
    let model = WidthModel::default();
    let mut drag = DragController::new();
    drag.begin(340.0, model.percent(), DIVIDER_HANDLE);

    nodes.unmount(SPLIT_ROW);
    assert_eq!(drag.on_move(500.0, &nodes, model.bounds()), None);
    // Still dragging; the next resolvable frame picks up again
    assert!(drag.is_dragging());
}

#[test]
fn test_end_when_idle_reports_nothing_to_end() {
    let mut drag = DragController::new();
    assert!(!drag.end());
}

#[test]
fn test_second_gesture_starts_from_current_width() {
    let nodes = mounted_split(1000);
    let mut model = WidthModel::default();
    let mut drag = DragController::new();

    drag.begin(340.0, model.percent(), DIVIDER_HANDLE);
    model.set(drag.on_move(440.0, &nodes, model.bounds()).unwrap());
    drag.end();
    assert!((model.percent() - 44.0).abs() < EPS);

    drag.begin(440.0, model.percent(), DIVIDER_HANDLE);
    let session = drag.session().unwrap();
    assert_eq!(session.start_x, 440.0);
    assert!((session.start_percent - 44.0).abs() < EPS);
    model.set(drag.on_move(2000.0, &nodes, model.bounds()).unwrap());
    assert_eq!(model.percent(), 70.0);
}
