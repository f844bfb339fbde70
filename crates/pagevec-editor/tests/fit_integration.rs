//! Integration tests for the two fit operations.

mod common;

use common::{init_logs, SolidRaster};
use pagevec_core::{PxRect, Rect, Size, Vec2};
use pagevec_editor::{ContentMode, EditorSession};

fn session_with_region() -> (EditorSession, pagevec_core::RegionId) {
    let mut session = EditorSession::new(1000, 800).unwrap();
    let page = SolidRaster::white(1000, 800);
    let id = session
        .create_draft_region(Rect::new(0.1, 0.1, 0.2, 0.1))
        .unwrap();
    session.attach_content(id, &page, ContentMode::Empty).unwrap();
    let ticket = session.begin_generation(id).unwrap();
    session.complete_generation(ticket, Ok(r#"<text x="50" y="20">hi</text>"#.to_string()));
    (session, id)
}

#[test]
fn test_fit_content_to_area_reanchors_local_frame() {
    init_logs();
    let (mut session, id) = session_with_region();

    // Measured tight box of the content in local space, pre-transform.
    assert!(session.fit_content_to_area(id, PxRect::new(5.0, 10.0, 50.0, 20.0)));

    let region = session.region(id).unwrap();
    assert_eq!(region.content_size, Size::new(50.0, 20.0));
    assert_eq!(region.scale, Vec2::one());
    assert_eq!(region.offset, Vec2::new(-5.0, -10.0));
    // The placement is untouched.
    assert_eq!(region.rect, Rect::new(0.1, 0.1, 0.2, 0.1));
}

#[test]
fn test_fit_content_to_area_rejects_degenerate_bounds() {
    init_logs();
    let (mut session, id) = session_with_region();
    let before = session.region(id).unwrap().clone();
    assert!(!session.fit_content_to_area(id, PxRect::new(5.0, 10.0, 0.0, 20.0)));
    let after = session.region(id).unwrap();
    assert_eq!(after.content_size, before.content_size);
    assert_eq!(after.offset, before.offset);
}

#[test]
fn test_fit_area_to_content_shrinks_placement() {
    init_logs();
    let (mut session, id) = session_with_region();

    // The region occupies pixels (100, 80)..(300, 160) and its 200x80
    // local frame maps 1:1 onto those pixels, so a rendered box of
    // (150, 100, 50, 20) corresponds to local (50, 20, 50, 20).
    assert!(session.fit_area_to_content(id, PxRect::new(150.0, 100.0, 50.0, 20.0)));

    let region = session.region(id).unwrap();
    assert_eq!(region.rect, Rect::new(0.15, 0.125, 0.05, 0.025));
    assert_eq!(region.content_size, Size::new(50.0, 20.0));
    assert_eq!(region.scale, Vec2::one());
    assert_eq!(region.offset, Vec2::new(-50.0, -20.0));
}

#[test]
fn test_fit_area_to_content_accounts_for_transform() {
    init_logs();
    let (mut session, id) = session_with_region();

    // Shift the content by (10, 10) local units first.
    {
        // fit_content_to_area with a shifted box leaves offset (-10, -10).
        session.fit_content_to_area(id, PxRect::new(10.0, 10.0, 200.0, 80.0));
    }
    // The placement still covers pixels (100, 80)..(300, 160). A rendered
    // box at (150, 100, 50, 20) is viewport units (50, 20), and undoing
    // the offset puts the local box at (60, 30).
    assert!(session.fit_area_to_content(id, PxRect::new(150.0, 100.0, 50.0, 20.0)));

    let region = session.region(id).unwrap();
    assert_eq!(region.rect, Rect::new(0.15, 0.125, 0.05, 0.025));
    assert_eq!(region.content_size, Size::new(50.0, 20.0));
    assert_eq!(region.offset, Vec2::new(-60.0, -30.0));
}

#[test]
fn test_fit_operations_are_undoable() {
    init_logs();
    let (mut session, id) = session_with_region();
    session.fit_content_to_area(id, PxRect::new(5.0, 10.0, 50.0, 20.0));
    assert!(session.undo());
    let region = session.region(id).unwrap();
    assert_eq!(region.content_size, Size::new(200.0, 80.0));
    assert_eq!(region.offset, Vec2::zero());
}
