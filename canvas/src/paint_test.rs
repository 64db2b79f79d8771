#![allow(clippy::float_cmp)]

use super::*;
use crate::recorder::{Call, Recorder};

#[test]
fn scoped_restores_on_drop() {
    let mut rec = Recorder::new();
    {
        let mut scope = Scoped::new(&mut rec);
        scope.translate(10.0, 20.0).expect("translate");
    }
    assert_eq!(rec.depth(), 0);
    assert_eq!(rec.calls.first(), Some(&Call::Save));
    assert_eq!(rec.calls.last(), Some(&Call::Restore));
}

#[test]
fn with_transform_translates_then_rotates() {
    let mut rec = Recorder::new();
    with_transform(&mut rec, Point::new(150.0, 250.0), 1.5, |p| {
        p.fill(&circle(Point::new(0.0, 0.0), 5.0), Fill::Solid("red"))
    })
    .expect("draw");

    assert_eq!(
        rec.calls[..3],
        [Call::Save, Call::Translate(Point::new(150.0, 250.0)), Call::Rotate(1.5)]
    );
    let Call::Fill { origin, .. } = &rec.calls[3] else {
        panic!("expected fill, got {:?}", rec.calls[3]);
    };
    assert_eq!(*origin, Point::new(150.0, 250.0));
    assert_eq!(rec.calls[4], Call::Restore);
}

#[test]
fn with_transform_restores_when_draw_fails() {
    let mut rec = Recorder::new();
    rec.fail_on_text = true;
    let style = TextStyle { font: "10px serif", color: "black", align: TextAlign::Left };

    let result = with_transform(&mut rec, Point::new(0.0, 0.0), 0.0, |p| {
        p.text("boom", Point::new(0.0, 0.0), style)
    });

    assert!(result.is_err());
    assert_eq!(rec.depth(), 0);
    assert_eq!(rec.calls.last(), Some(&Call::Restore));
}

#[test]
fn nested_scopes_rebalance() {
    let mut rec = Recorder::new();
    with_transform(&mut rec, Point::new(1.0, 1.0), 0.0, |outer| {
        with_transform(outer, Point::new(2.0, 2.0), 0.0, |inner| {
            inner.fill(&circle(Point::new(0.0, 0.0), 1.0), Fill::Solid("red"))
        })
    })
    .expect("draw");

    assert_eq!(rec.max_depth, 2);
    assert_eq!(rec.depth(), 0);
    assert_eq!(rec.unbalanced_restores, 0);
}

#[test]
fn square_is_centered() {
    let [PathOp::Rect { origin, width, height }] = square(Point::new(0.0, 0.0), 100.0) else {
        panic!("expected rect");
    };
    assert_eq!(origin, Point::new(-50.0, -50.0));
    assert_eq!(width, 100.0);
    assert_eq!(height, 100.0);
}

#[test]
fn crosshair_spans_both_axes() {
    let ops = crosshair(Point::new(10.0, 10.0), 5.0);
    assert_eq!(ops[0], PathOp::MoveTo(Point::new(10.0, 5.0)));
    assert_eq!(ops[1], PathOp::LineTo(Point::new(10.0, 15.0)));
    assert_eq!(ops[2], PathOp::MoveTo(Point::new(5.0, 10.0)));
    assert_eq!(ops[3], PathOp::LineTo(Point::new(15.0, 10.0)));
}

#[test]
fn solid_stroke_has_no_dash() {
    assert!(Stroke::solid("black", 2.0).dash.is_empty());
}

#[test]
fn paint_error_messages() {
    assert_eq!(PaintError::Backend("x".to_owned()).to_string(), "drawing backend error: x");
    assert_eq!(PaintError::NoContext.to_string(), "no 2d context available");
}
