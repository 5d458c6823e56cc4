//! Property tests for rectangle hit testing.

use dndboard_core::Rect;
use proptest::prelude::*;

fn rect() -> impl Strategy<Value = Rect> {
    (-500.0f32..500.0, -500.0f32..500.0, 1.0f32..300.0, 1.0f32..300.0)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    #[test]
    fn expanded_rect_contains_original_hits(
        r in rect(),
        amount in 0.0f32..100.0,
        fx in 0.01f32..0.99,
        fy in 0.01f32..0.99,
    ) {
        let x = r.x + r.width * fx;
        let y = r.y + r.height * fy;
        prop_assume!(r.contains(x, y));
        prop_assert!(r.expand_vertical(amount).contains(x, y));
    }

    #[test]
    fn edges_are_never_inside(r in rect(), f in 0.0f32..1.0) {
        let x = r.x + r.width * f;
        prop_assert!(!r.contains(x, r.top()));
        prop_assert!(!r.contains(r.left(), r.y + r.height * f));
    }

    #[test]
    fn translate_shifts_hits(r in rect(), dx in -100.0f32..100.0, dy in -100.0f32..100.0) {
        let moved = r.translate(dx, dy);
        prop_assert_eq!(moved.width, r.width);
        prop_assert_eq!(moved.height, r.height);
        prop_assert_eq!(moved.left(), r.left() + dx);
        prop_assert_eq!(moved.top(), r.top() + dy);
    }
}
