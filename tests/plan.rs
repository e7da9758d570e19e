use pretty_assertions::assert_eq;
use wingrid::actor::reactor::Command;
use wingrid::common::config::ArrangeSettings;
use wingrid::layout_engine::{GridRequest, GridShape, LayoutError, plan_grid};
use wingrid::model::MoveDirection;
use wingrid::sys::geometry::Rect;
use wingrid::ui::console::{parse_line, render_json};

#[test]
fn plans_on_a_monitor_left_of_the_primary() {
    let plan = plan_grid(&GridRequest {
        window_count: 5,
        work_area: Rect::new(-1920, 0, 0, 1040),
        offset_x: 8,
        offset_y: 40,
        min_spacing_y: 20,
    })
    .unwrap();

    assert_eq!(plan.shape, GridShape { rows: 2, columns: 3 });
    assert_eq!(plan.cells.len(), 5);
    assert_eq!(plan.row_heights.iter().sum::<i32>(), 1040 - 40 - 20);
    assert_eq!(plan.column_widths.iter().sum::<i32>(), 1920);
    assert_eq!(plan.cells[0].left, -1912);
    assert_eq!(plan.cells[0].top, 0);
    assert_eq!(plan.cells[3].top, plan.row_heights[0] + 20);
    assert!(plan.cells.iter().all(|c| c.bottom <= 1040 - 40));
}

#[test]
fn bottom_offset_taller_than_the_monitor_is_infeasible() {
    let err = plan_grid(&GridRequest {
        window_count: 3,
        work_area: Rect::new(0, 0, 400, 300),
        offset_x: 0,
        offset_y: 400,
        min_spacing_y: 20,
    })
    .unwrap_err();
    assert!(matches!(err, LayoutError::Infeasible { .. }));
}

#[test]
fn console_commands_serialize_with_a_tag() {
    let cmd = parse_line("down 3", ArrangeSettings::default()).unwrap().unwrap();
    assert_eq!(cmd, Command::Move { position: 2, direction: MoveDirection::Down });
    assert_eq!(
        render_json(&cmd).split_whitespace().collect::<String>(),
        r#"{"command":"move","position":2,"direction":"down"}"#
    );
}
