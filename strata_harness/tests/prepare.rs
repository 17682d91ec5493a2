// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Preparation through the public engine API.

use kurbo::{Rect, Size};
use strata_core::backend::ComputedBox;
use strata_core::config::{Direction, Settings, TargetConfig};
use strata_core::engine::Parallax;
use strata_core::trace::{PrepareSkip, Tracer};
use strata_harness::{EventLog, FakeDocument, NodeId};

const MARKER: &str = "data-parallax";
const CONTAINER: &str = "parallax-container";

fn desktop() -> FakeDocument {
    FakeDocument::new(Size::new(1000.0, 800.0))
}

fn rect(top: f64, height: f64) -> Rect {
    Rect::new(0.0, top, 640.0, top + height)
}

fn init(engine: &mut Parallax<NodeId>, doc: &mut FakeDocument) -> strata_core::engine::InitReport {
    engine.init(doc, &mut Tracer::none())
}

#[test]
fn preparing_twice_tracks_each_target_once() {
    let mut doc = desktop();
    let body = doc.body();
    let a = doc.append_target(body, MARKER, rect(0.0, 300.0));
    let b = doc.append_target(body, MARKER, rect(400.0, 300.0));
    let mut engine = Parallax::new(Settings::new());

    let first = init(&mut engine, &mut doc);
    assert_eq!(first.prepared, 2);
    assert!(first.attach_listeners);

    let second = init(&mut engine, &mut doc);
    assert_eq!(second.prepared, 0);
    assert_eq!(second.already_prepared, 2);
    assert!(!second.attach_listeners, "listeners are requested once");

    assert_eq!(engine.len(), 2);
    assert_eq!(doc.count_with_class(CONTAINER), 2, "no double wrapping");
    for target in [a, b] {
        let container = doc.parent_of(target).expect("target is wrapped");
        assert!(doc.class_list_contains(container, CONTAINER));
        assert_eq!(doc.parent_of(container), Some(body));
        assert_eq!(doc.children(container), &[target]);
    }
}

#[test]
fn targets_without_attributes_get_defaults() {
    let mut doc = desktop();
    let body = doc.body();
    doc.append_target(body, MARKER, rect(0.0, 300.0));
    let mut engine = Parallax::new(Settings::new());
    init(&mut engine, &mut doc);

    let (_, instance) = engine.registry().iter().next().expect("one instance");
    let c = instance.config;
    assert_eq!(c.direction, Direction::Vertical);
    assert_eq!(c.speed, 2.0);
    assert_eq!(c.height_percent, 130);
    assert_eq!(c.horizontal_scale, 1.1);
    assert!(c.disable_below_mobile_breakpoint);
    assert!(c.disable_below_tablet_breakpoint);
}

#[test]
fn malformed_attributes_fall_back_to_defaults() {
    let mut doc = desktop();
    let body = doc.body();
    let img = doc.append_target(body, MARKER, rect(0.0, 300.0));
    doc.set_attribute(img, "data-parallax-speed", "quick");
    doc.set_attribute(img, "data-parallax-height", "tall");
    doc.set_attribute(img, "data-parallax-scale", "");
    doc.set_attribute(img, "data-parallax-direction", "sideways");
    let mut engine = Parallax::new(Settings::new());
    init(&mut engine, &mut doc);

    let (_, instance) = engine.registry().iter().next().expect("one instance");
    assert_eq!(instance.config, TargetConfig::defaults(&Settings::new()));
}

#[test]
fn new_container_takes_over_the_outer_box() {
    let mut doc = desktop();
    let body = doc.body();
    let img = doc.append_target(body, MARKER, rect(0.0, 300.0));
    doc.set_computed(
        img,
        ComputedBox {
            display: "block".into(),
            width: Some("640px".into()),
            height: None,
            margin: [
                "10px".into(),
                "auto".into(),
                "20px".into(),
                "auto".into(),
            ],
            border_radius: "8px".into(),
            box_shadow: "rgba(0, 0, 0, 0.3) 0px 4px 12px 0px".into(),
        },
    );
    let mut engine = Parallax::new(Settings::new());
    init(&mut engine, &mut doc);

    let container = doc.parent_of(img).expect("wrapped");
    assert_eq!(doc.style(container, "display"), Some("block"));
    assert_eq!(doc.style(container, "width"), Some("640px"));
    assert_eq!(doc.style(container, "height"), None, "auto height is not copied");
    assert_eq!(doc.style(container, "margin-top"), Some("10px"));
    assert_eq!(doc.style(container, "margin-right"), Some("auto"));
    assert_eq!(doc.style(container, "margin-bottom"), Some("20px"));
    assert_eq!(doc.style(container, "margin-left"), Some("auto"));
    assert_eq!(doc.style(container, "border-radius"), Some("8px"));
    assert_eq!(
        doc.style(container, "box-shadow"),
        Some("rgba(0, 0, 0, 0.3) 0px 4px 12px 0px")
    );
    assert_eq!(doc.style(container, "position"), Some("relative"));
    assert_eq!(doc.style(container, "overflow"), Some("hidden"));

    assert_eq!(doc.style(img, "box-shadow"), Some("none"), "shadow moves");
    assert_eq!(doc.style(img, "margin"), Some("0"));
    assert_eq!(doc.style(img, "border-radius"), Some("0"));
    assert_eq!(doc.style(img, "display"), Some("block"));
    assert_eq!(doc.style(img, "object-fit"), Some("cover"));
    assert_eq!(doc.style(img, "will-change"), Some("transform"));
    assert_eq!(doc.style(img, "height"), Some("130%"));
    assert_eq!(doc.style(img, "top"), Some("-15%"));
}

#[test]
fn inline_targets_get_inline_block_containers() {
    let mut doc = desktop();
    let body = doc.body();
    let img = doc.append_target(body, MARKER, rect(0.0, 300.0));
    let mut engine = Parallax::new(Settings::new());
    init(&mut engine, &mut doc);

    let container = doc.parent_of(img).expect("wrapped");
    assert_eq!(doc.style(container, "display"), Some("inline-block"));
    assert_eq!(doc.style(container, "box-shadow"), None, "no shadow to move");
}

#[test]
fn existing_container_is_reused_without_copying_styles() {
    let mut doc = desktop();
    let body = doc.body();
    let wrapper = doc.append(body, "div");
    doc.add_class(wrapper, CONTAINER);
    let img = doc.append_target(wrapper, MARKER, rect(0.0, 300.0));
    let mut engine = Parallax::new(Settings::new());
    init(&mut engine, &mut doc);

    assert_eq!(doc.parent_of(img), Some(wrapper));
    assert_eq!(doc.count_with_class(CONTAINER), 1);
    assert_eq!(doc.style(wrapper, "display"), None);
    assert_eq!(doc.style(wrapper, "position"), Some("relative"));
    assert_eq!(doc.style(wrapper, "overflow"), Some("hidden"));
    assert_eq!(doc.style(img, "margin"), None, "margin untouched when reusing");
}

#[test]
fn sibling_inserted_into_prepared_container_reuses_it() {
    let mut doc = desktop();
    let body = doc.body();
    let first = doc.append_target(body, MARKER, rect(0.0, 300.0));
    let mut engine = Parallax::new(Settings::new());
    init(&mut engine, &mut doc);

    let container = doc.parent_of(first).expect("wrapped");
    let sibling = doc.append_target(container, MARKER, rect(0.0, 300.0));
    let report = init(&mut engine, &mut doc);

    assert_eq!(report.prepared, 1);
    assert_eq!(doc.parent_of(sibling), Some(container));
    assert_eq!(doc.count_with_class(CONTAINER), 1);
}

#[test]
fn horizontal_targets_fill_the_container() {
    let mut doc = desktop();
    let body = doc.body();
    let img = doc.append_target(body, MARKER, rect(0.0, 300.0));
    doc.set_attribute(img, "data-parallax-direction", "horizontal");
    let mut engine = Parallax::new(Settings::new());
    init(&mut engine, &mut doc);

    assert_eq!(doc.style(img, "width"), Some("100%"));
    assert_eq!(doc.style(img, "height"), Some("100%"));
    assert_eq!(doc.style(img, "top"), Some("0%"));
}

#[test]
fn both_targets_use_vertical_overscan() {
    let mut doc = desktop();
    let body = doc.body();
    let img = doc.append_target(body, MARKER, rect(0.0, 300.0));
    doc.set_attribute(img, "data-parallax-direction", "both");
    doc.set_attribute(img, "data-parallax-height", "150");
    let mut engine = Parallax::new(Settings::new());
    init(&mut engine, &mut doc);

    assert_eq!(doc.style(img, "height"), Some("150%"));
    assert_eq!(doc.style(img, "top"), Some("-25%"));
}

#[test]
fn elements_without_parent_are_skipped() {
    let mut doc = desktop();
    let body = doc.body();
    doc.set_attribute(body, MARKER, "");
    let img = doc.append_target(body, MARKER, rect(0.0, 300.0));
    let mut log = EventLog::new();
    let mut engine = Parallax::new(Settings::new());
    let report = engine.init(&mut doc, &mut Tracer::new(&mut log));

    assert_eq!(report.failed, 1);
    assert_eq!(report.prepared, 1);
    assert!(engine.registry().contains(&img));
    assert!(!engine.registry().contains(&body));
    let skips: Vec<_> = log.skips().collect();
    assert_eq!(skips.len(), 1);
    assert_eq!(skips[0].reason, PrepareSkip::NoParent);
    assert_eq!(skips[0].document_index, 0);
}

#[test]
fn refused_container_leaves_target_for_a_later_run() {
    let mut doc = desktop();
    let body = doc.body();
    let img = doc.append_target(body, MARKER, rect(0.0, 300.0));
    doc.refuse_containers(true);
    let mut engine = Parallax::new(Settings::new());

    let report = init(&mut engine, &mut doc);
    assert_eq!(report.failed, 1);
    assert!(engine.is_empty());
    assert!(!report.attach_listeners, "no instance, no listeners");
    assert_eq!(doc.parent_of(img), Some(body));

    doc.refuse_containers(false);
    let report = init(&mut engine, &mut doc);
    assert_eq!(report.prepared, 1);
    assert!(report.attach_listeners);
}

#[test]
fn failed_move_into_container_leaves_document_untouched() {
    let mut doc = desktop();
    let body = doc.body();
    let before = doc.append(body, "p");
    let img = doc.append_target(body, MARKER, rect(0.0, 300.0));
    doc.set_computed(
        img,
        ComputedBox {
            display: "block".into(),
            box_shadow: "black 0px 2px 4px 0px".into(),
            ..ComputedBox::default()
        },
    );
    doc.refuse_appends(true);
    let mut engine = Parallax::new(Settings::new());

    let report = init(&mut engine, &mut doc);
    assert_eq!(report.failed, 1);
    assert!(engine.is_empty());
    assert_eq!(doc.count_with_class(CONTAINER), 0, "container is removed again");
    assert_eq!(doc.children(body), &[before, img]);
    assert_eq!(doc.style(img, "box-shadow"), None, "shadow is kept");
    assert_eq!(doc.style(img, "margin"), None);

    doc.refuse_appends(false);
    let report = init(&mut engine, &mut doc);
    assert_eq!(report.prepared, 1);
    assert_eq!(doc.count_with_class(CONTAINER), 1, "wrapped exactly once");
    let container = doc.parent_of(img).expect("target is wrapped");
    assert_eq!(doc.children(body), &[before, container]);
    assert_eq!(doc.style(img, "box-shadow"), Some("none"));
}

#[test]
fn inserted_containers_of_tracked_targets_need_no_preparation() {
    let mut doc = desktop();
    let body = doc.body();
    let img = doc.append_target(body, MARKER, rect(0.0, 300.0));
    let mut engine: Parallax<NodeId> = Parallax::new(Settings::new());
    assert!(engine.has_untracked(&[img]));
    init(&mut engine, &mut doc);

    // The container inserted around `img` holds only tracked targets.
    assert!(!engine.has_untracked(&[img]));
    assert!(!engine.has_untracked(&Vec::new()));

    let late = doc.append_target(body, MARKER, rect(400.0, 300.0));
    assert!(engine.has_untracked(&[img, late]));
    init(&mut engine, &mut doc);
    assert!(!engine.has_untracked(&[img, late]));
}

#[test]
fn custom_marker_attribute() {
    let mut settings = Settings::new();
    settings.marker_attribute = "data-drift";
    let mut doc = desktop();
    let body = doc.body();
    let ignored = doc.append_target(body, MARKER, rect(0.0, 300.0));
    let img = doc.append_target(body, "data-drift", rect(400.0, 300.0));
    doc.set_attribute(img, "data-drift-speed", "0.5");
    let mut engine = Parallax::new(settings);
    init(&mut engine, &mut doc);

    assert_eq!(engine.len(), 1);
    assert!(!engine.registry().contains(&ignored));
    let id = engine.registry().find(&img).expect("tracked");
    assert_eq!(engine.registry().get(id).map(|i| i.config.speed), Some(0.5));
}
