//! Text area behavior through the public widget API

use kiln_core::{Area, DrawCommand, ObjId, ObjTree, RecordingPainter};
use kiln_widgets::text_area::{self, EditOutcome, RejectReason, CURSOR_LAST};
use kiln_widgets::{label, page, Theme, WidgetConfig};

struct Fixture {
    tree: ObjTree,
    theme: Theme,
    scr: ObjId,
    ta: ObjId,
}

fn fixture(config: WidgetConfig) -> Fixture {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    let mut tree = ObjTree::new(config.display.clone());
    let theme = Theme::install(&mut tree, &config);
    let scr = tree.create(None, None).unwrap();
    let ta = text_area::create(&mut tree, &theme, Some(scr), None).unwrap();
    Fixture {
        tree,
        theme,
        scr,
        ta,
    }
}

fn empty_text_area() -> Fixture {
    let mut f = fixture(WidgetConfig::default());
    text_area::set_text(&mut f.tree, f.ta, "");
    f
}

#[test]
fn insert_then_move_then_insert() {
    let Fixture { mut tree, ta, .. } = empty_text_area();
    assert_eq!(text_area::add_text(&mut tree, ta, "ab"), EditOutcome::Applied);
    assert_eq!(text_area::add_text(&mut tree, ta, "cd"), EditOutcome::Applied);
    assert_eq!(text_area::set_cursor_pos(&mut tree, ta, 1), 1);
    assert_eq!(text_area::add_char(&mut tree, ta, 'X'), EditOutcome::Applied);

    assert_eq!(text_area::text(&tree, ta), Some("aXbcd"));
    assert_eq!(text_area::cursor_pos(&tree, ta), 2);
}

#[test]
fn inserts_never_exceed_max_length() {
    let Fixture { mut tree, ta, .. } = fixture(WidgetConfig::default().with_max_length(8));
    text_area::set_text(&mut tree, ta, "");

    for chunk in ["abc", "defg", "hi", "j", "", "k"] {
        let before = text_area::text(&tree, ta).unwrap().to_string();
        let fits = before.chars().count() + chunk.chars().count() <= 8;
        let outcome = text_area::add_text(&mut tree, ta, chunk);
        let after = text_area::text(&tree, ta).unwrap();

        assert!(after.chars().count() <= 8);
        if fits {
            assert_eq!(outcome, EditOutcome::Applied);
        } else {
            assert_eq!(outcome, EditOutcome::Rejected(RejectReason::TooLong));
            assert_eq!(after, before);
        }
    }
    assert_eq!(text_area::text(&tree, ta), Some("abcdefgj"));
    assert_eq!(
        text_area::add_char(&mut tree, ta, 'z'),
        EditOutcome::Rejected(RejectReason::TooLong)
    );
}

#[test]
fn cursor_pos_is_always_clamped() {
    let Fixture { mut tree, ta, .. } = empty_text_area();
    text_area::set_text(&mut tree, ta, "Hello");
    for (input, expected) in [
        (-1, 4),
        (-5, 0),
        (-100, 0),
        (i32::MIN, 0),
        (0, 0),
        (3, 3),
        (6, 5),
        (i32::MAX, 5),
        (CURSOR_LAST, 5),
    ] {
        assert_eq!(text_area::set_cursor_pos(&mut tree, ta, input), expected, "input {}", input);
        assert_eq!(text_area::cursor_pos(&tree, ta), expected);
    }
}

#[test]
fn set_text_then_last_but_one() {
    let Fixture { mut tree, ta, .. } = empty_text_area();
    text_area::set_text(&mut tree, ta, "Hello");
    assert_eq!(text_area::cursor_pos(&tree, ta), 5);
    text_area::set_cursor_pos(&mut tree, ta, -1);
    assert_eq!(text_area::cursor_pos(&tree, ta), 4);
}

#[test]
fn del_at_start_is_rejected() {
    let Fixture { mut tree, ta, .. } = empty_text_area();
    text_area::set_text(&mut tree, ta, "abc");
    text_area::set_cursor_pos(&mut tree, ta, 0);
    assert_eq!(
        text_area::del(&mut tree, ta),
        EditOutcome::Rejected(RejectReason::AtStart)
    );
    assert_eq!(text_area::text(&tree, ta), Some("abc"));
    assert_eq!(text_area::cursor_pos(&tree, ta), 0);
}

#[test]
fn insert_then_delete_restores_text() {
    let Fixture { mut tree, ta, .. } = empty_text_area();
    text_area::set_text(&mut tree, ta, "hello world");
    for pos in [0, 5, 11] {
        text_area::set_cursor_pos(&mut tree, ta, pos);
        assert!(text_area::add_char(&mut tree, ta, '#').is_applied());
        assert!(text_area::del(&mut tree, ta).is_applied());
        assert_eq!(text_area::text(&tree, ta), Some("hello world"));
        assert_eq!(text_area::cursor_pos(&tree, ta), pos as usize);
    }
}

#[test]
fn vertical_moves_keep_the_remembered_column() {
    let Fixture { mut tree, ta, .. } = empty_text_area();
    text_area::set_text(&mut tree, ta, "abcdefghij\nab\nabcdefghij");
    text_area::set_cursor_pos(&mut tree, ta, 7);
    assert_eq!(text_area::cursor_right(&mut tree, ta), EditOutcome::Applied);
    let column = text_area::cursor_valid_x(&tree, ta);
    assert_eq!(column, 64);

    assert!(text_area::cursor_down(&mut tree, ta).is_applied());
    // the short middle line ends the cursor at its newline
    assert_eq!(text_area::cursor_pos(&tree, ta), 13);
    assert!(text_area::cursor_down(&mut tree, ta).is_applied());
    assert_eq!(text_area::cursor_pos(&tree, ta), 22);
    assert_eq!(
        text_area::cursor_down(&mut tree, ta),
        EditOutcome::Rejected(RejectReason::LastLine)
    );

    assert!(text_area::cursor_up(&mut tree, ta).is_applied());
    assert!(text_area::cursor_up(&mut tree, ta).is_applied());
    let pos = text_area::cursor_pos(&tree, ta);
    assert_eq!(pos, 8);
    let label = text_area::label(&tree, ta).unwrap();
    assert_eq!(label::letter_pos(&tree, label, pos).x, column);
    assert_eq!(text_area::cursor_valid_x(&tree, ta), column);
}

#[test]
fn right_at_end_of_short_line_resets_the_column() {
    let Fixture { mut tree, ta, .. } = empty_text_area();
    text_area::set_text(&mut tree, ta, "abcdefghij\nab");
    text_area::set_cursor_pos(&mut tree, ta, 8);
    assert!(text_area::cursor_right(&mut tree, ta).is_applied());
    assert_eq!(text_area::cursor_valid_x(&tree, ta), 72);

    assert!(text_area::cursor_down(&mut tree, ta).is_applied());
    assert_eq!(text_area::cursor_pos(&tree, ta), 13);
    assert_eq!(
        text_area::cursor_right(&mut tree, ta),
        EditOutcome::Rejected(RejectReason::AtEnd)
    );
    assert_eq!(text_area::cursor_pos(&tree, ta), 13);
    assert_eq!(text_area::cursor_valid_x(&tree, ta), 16);

    assert!(text_area::cursor_up(&mut tree, ta).is_applied());
    assert_eq!(text_area::cursor_pos(&tree, ta), 2);
}

#[test]
fn horizontal_moves_stop_at_the_ends() {
    let Fixture { mut tree, ta, .. } = empty_text_area();
    text_area::set_text(&mut tree, ta, "ab");
    assert_eq!(
        text_area::cursor_right(&mut tree, ta),
        EditOutcome::Rejected(RejectReason::AtEnd)
    );
    assert!(text_area::cursor_left(&mut tree, ta).is_applied());
    assert!(text_area::cursor_left(&mut tree, ta).is_applied());
    assert_eq!(text_area::cursor_valid_x(&tree, ta), 0);
    assert_eq!(
        text_area::cursor_left(&mut tree, ta),
        EditOutcome::Rejected(RejectReason::AtStart)
    );
}

#[test]
fn cursor_is_scrolled_into_view() {
    let Fixture { mut tree, ta, .. } = empty_text_area();
    let scrl = page::scrollable(&tree, ta).unwrap();
    assert_eq!(tree.y(scrl), 4);

    text_area::set_text(&mut tree, ta, "1\n2\n3\n4\n5\n6\n7\n8");
    assert_eq!(tree.y(scrl), -78);
    let label = text_area::label(&tree, ta).unwrap();
    let ta_area = tree.coords(ta).unwrap();
    let cursor_y = tree.coords(label).unwrap().y1 + label::letter_pos(&tree, label, 15).y;
    assert!(cursor_y >= ta_area.y1 && cursor_y + 16 <= ta_area.y2);

    text_area::set_cursor_pos(&mut tree, ta, 0);
    assert_eq!(tree.y(scrl), 0);
}

#[test]
fn blink_toggles_cursor_and_redraws_only_on_change() {
    let Fixture { mut tree, ta, .. } = empty_text_area();
    tree.take_invalid();

    tree.tick(399);
    assert!(!text_area::cursor_hidden(&tree, ta));
    tree.tick(1);
    assert!(text_area::cursor_hidden(&tree, ta));
    assert!(!tree.take_invalid().is_empty());

    assert!(!text_area::set_cursor_hidden(&mut tree, ta, true));
    assert!(tree.take_invalid().is_empty());

    tree.tick(400);
    assert!(!text_area::cursor_hidden(&tree, ta));
}

#[test]
fn cursor_is_drawn_after_the_text() {
    let Fixture { mut tree, ta, .. } = empty_text_area();
    text_area::set_text(&mut tree, ta, "ab");
    let mask = tree.config().screen_area();

    let mut painter = RecordingPainter::new();
    tree.draw(ta, &mask, &mut painter);
    let cursor = Area::new(27, 12, 29, 28);
    let commands = painter.take_commands();
    let cursor_at = commands
        .iter()
        .position(|c| matches!(c, DrawCommand::Rect { area, .. } if *area == cursor));
    let text_at = commands
        .iter()
        .position(|c| matches!(c, DrawCommand::Label { .. }));
    assert!(matches!((text_at, cursor_at), (Some(t), Some(c)) if t < c));
    assert!(commands
        .iter()
        .any(|c| matches!(c, DrawCommand::Label { text, .. } if text == "ab")));

    text_area::set_cursor_hidden(&mut tree, ta, true);
    tree.draw(ta, &mask, &mut painter);
    assert!(painter.commands().iter().all(|c| c.area() != cursor));
}

#[test]
fn resize_rewraps_the_label() {
    let Fixture { mut tree, ta, .. } = empty_text_area();
    text_area::set_text(&mut tree, ta, "aaaa bbbb cccc");
    let label = text_area::label(&tree, ta).unwrap();
    assert_eq!(tree.height(label), 2 * 18 - 2);

    tree.set_width(ta, 200);
    assert_eq!(tree.width(label), 176);
    assert_eq!(tree.height(label), 16);
}

#[test]
fn copy_takes_text_style_and_cursor() {
    let Fixture {
        mut tree,
        theme,
        scr,
        ta,
    } = empty_text_area();
    text_area::set_text(&mut tree, ta, "copy me");
    text_area::set_cursor_pos(&mut tree, ta, 2);

    let copy = text_area::create(&mut tree, &theme, Some(scr), Some(ta)).unwrap();
    assert_eq!(text_area::text(&tree, copy), Some("copy me"));
    assert_eq!(text_area::cursor_pos(&tree, copy), 2);
    assert_eq!(tree.style(copy), tree.style(ta));
    assert_eq!(tree.coords(copy), tree.coords(ta));
    assert_ne!(text_area::label(&tree, copy), text_area::label(&tree, ta));

    text_area::add_char(&mut tree, copy, '!');
    assert_eq!(text_area::text(&tree, ta), Some("copy me"));
}

#[test]
fn delete_removes_the_whole_widget() {
    let Fixture {
        mut tree, scr, ta, ..
    } = empty_text_area();
    let nodes = tree.len();
    let children = tree.child_count(scr);
    let label = text_area::label(&tree, ta).unwrap();

    tree.delete(ta).unwrap();
    assert_eq!(tree.len(), nodes - 3);
    assert_eq!(tree.child_count(scr), children - 1);
    assert!(!tree.contains(label));
    assert!(tree.timers().is_empty());
    assert_eq!(
        text_area::add_text(&mut tree, ta, "x"),
        EditOutcome::Rejected(RejectReason::NotTextArea)
    );
    tree.tick(1000);
}

#[test]
fn hidden_text_area_produces_no_invalid_areas() {
    let Fixture { mut tree, ta, .. } = empty_text_area();
    tree.set_hidden(ta, true);
    tree.take_invalid();

    text_area::add_text(&mut tree, ta, "abc");
    text_area::cursor_left(&mut tree, ta);
    tree.tick(400);
    assert!(tree.take_invalid().is_empty());
}

#[test]
fn shared_style_edit_reaches_every_text_area() {
    let Fixture {
        mut tree,
        theme,
        scr,
        ta,
    } = empty_text_area();
    let other = text_area::create(&mut tree, &theme, Some(scr), None).unwrap();
    let style = theme.text_area.default;

    assert!(tree.edit_shared_style::<kiln_core::RectStyle>(style, |s| s.hpad = 10));
    for node in [ta, other] {
        let label = text_area::label(&tree, node).unwrap();
        assert_eq!(tree.width(label), 120 - 2 * (10 + 8));
    }
}
