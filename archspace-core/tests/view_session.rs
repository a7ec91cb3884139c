//! Integration tests for archspace-core
//!
//! These drive a `ViewSession` the way a user interface would and check what
//! a renderer ends up showing.

use archspace_core::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::thread;

/// Renderer that keeps the last value it was told for every object
#[derive(Default)]
struct SceneState {
    transforms: HashMap<String, PointTransform>,
    emphasized: HashMap<String, bool>,
    labels: HashMap<String, bool>,
    texts: HashMap<String, String>,
    clusters: HashMap<CategoryKey, Option<ClusterGeometry>>,
    titles: Option<AxisTitles>,
    hit: Option<EntityId>,
}

impl SceneState {
    fn visible(&self, id: &str) -> bool {
        self.transforms.get(id).is_some_and(|t| t.visible)
    }
}

impl Renderer for SceneState {
    fn set_point_transform(&mut self, id: &EntityId, transform: &PointTransform) {
        self.transforms.insert(id.to_string(), *transform);
    }

    fn set_point_emphasis(&mut self, id: &EntityId, emphasized: bool) {
        self.emphasized.insert(id.to_string(), emphasized);
    }

    fn set_label_visible(&mut self, id: &EntityId, visible: bool) {
        self.labels.insert(id.to_string(), visible);
    }

    fn set_label_text(&mut self, id: &EntityId, text: &str) {
        self.texts.insert(id.to_string(), text.to_string());
    }

    fn set_cluster_geometry(&mut self, category: CategoryKey, geometry: Option<&ClusterGeometry>) {
        self.clusters.insert(category, geometry.cloned());
    }

    fn pick(&self, _pointer: PointerCoords) -> Option<EntityId> {
        self.hit.clone()
    }

    fn set_cube_appearance(&mut self, _appearance: &CubeAppearance) {}

    fn set_axis_titles(&mut self, titles: &AxisTitles) {
        self.titles = Some(titles.clone());
    }

    fn set_tick_labels(&mut self, _ticks: &[TickMark]) {}
}

fn session_with(config: ViewConfig) -> ViewSession<SceneState> {
    ViewSession::new(Catalogue::builtin().unwrap(), config, SceneState::default()).unwrap()
}

#[test]
fn test_hiding_a_category_hides_members_cluster_and_selection() {
    let mut session = session_with(ViewConfig {
        show_clusters: true,
        ..ViewConfig::default()
    });

    session.renderer_mut().hit = Some(EntityId::from("microservices"));
    session.pointer_clicked(PointerCoords::new(100.0, 100.0));
    assert_eq!(session.selection().selected(), Some(&EntityId::from("microservices")));
    assert!(session.renderer().clusters[&CategoryKey::Deployment].is_some());

    session.set_category_enabled(CategoryKey::Deployment, false);
    let scene = session.renderer();
    assert!(!scene.visible("microservices"));
    assert!(!scene.visible("monolith"));
    assert!(scene.visible("ddd"));
    assert!(scene.clusters[&CategoryKey::Deployment].is_none());
    assert!(session.selection().selected().is_none());
    assert!(session.frame_slot().latest().selected.is_none());

    session.set_category_enabled(CategoryKey::Deployment, true);
    assert!(session.renderer().visible("microservices"));
    assert!(session.renderer().clusters[&CategoryKey::Deployment].is_some());
    assert!(session.selection().selected().is_none());
}

#[test]
fn test_axis_and_size_on_same_attribute_restore_independently() {
    use AttributeKey::*;
    let mut session = session_with(ViewConfig::default());

    session.set_size_attribute(Structure).unwrap();
    session.toggle_attribute(Structure, false);
    let mapping = session.mapping();
    assert_eq!(mapping.get(Slot::X), Granularity);
    assert_eq!(mapping.get(Slot::Size), Granularity);
    assert!(mapping.is_forced(Slot::X));
    assert!(mapping.is_forced(Slot::Size));

    // An unrelated explicit change must not clear the other slots' forced flags
    session.set_axis(Axis::Y, Focus).unwrap();
    assert!(session.mapping().is_forced(Slot::X));
    assert!(session.mapping().is_forced(Slot::Size));

    session.toggle_attribute(Structure, true);
    let mapping = session.mapping();
    assert_eq!(mapping.get(Slot::X), Structure);
    assert_eq!(mapping.get(Slot::Size), Structure);
    assert_eq!(mapping.get(Slot::Y), Focus);
    assert!(!mapping.is_forced(Slot::X));
    assert!(!mapping.is_forced(Slot::Size));

    let titles = session.renderer().titles.clone().unwrap();
    assert_eq!(titles.x.text, "X: Structure");
    assert_eq!(titles.y.text, "Y: Focus");
}

#[test]
fn test_random_commands_keep_invariants() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut session = session_with(ViewConfig::default());
    let ids: Vec<EntityId> = session.catalogue().entities().iter().map(|e| e.id.clone()).collect();

    for _ in 0..500 {
        match rng.gen_range(0..6) {
            0 => {
                let key = AttributeKey::ALL[rng.gen_range(0..4)];
                session.toggle_attribute(key, rng.gen_bool(0.5));
            }
            1 => {
                let key = AttributeKey::ALL[rng.gen_range(0..4)];
                let axis = [Axis::X, Axis::Y, Axis::Z][rng.gen_range(0..3)];
                let enabled = session.mapping().is_enabled(key);
                assert_eq!(session.set_axis(axis, key).is_ok(), enabled);
            }
            2 => {
                let key = CategoryKey::ALL[rng.gen_range(0..3)];
                session.set_category_enabled(key, rng.gen_bool(0.7));
            }
            3 => {
                let id = &ids[rng.gen_range(0..ids.len())];
                session.set_entity_enabled(id.as_str(), rng.gen_bool(0.7));
            }
            4 => {
                let id = ids[rng.gen_range(0..ids.len())].clone();
                session.click(Some(id));
            }
            _ => {
                let id = ids[rng.gen_range(0..ids.len())].clone();
                session.hover(Some(id));
            }
        }

        let mapping = session.mapping();
        assert!(mapping.state().enabled_count() > 0);
        for slot in Slot::ALL {
            assert!(mapping.is_enabled(mapping.get(slot)));
        }
        if let Some(id) = session.selection().selected() {
            assert!(session.filter().is_visible_id(session.catalogue(), id.as_str()));
            assert!(session.renderer().visible(id.as_str()));
        }
        // The renderer mirrors the published frame
        let frame = session.frame_slot().latest();
        for point in &frame.points {
            assert_eq!(session.renderer().transforms[point.id.as_str()], point.transform);
            assert_eq!(session.renderer().labels[point.id.as_str()], point.label_visible);
        }
    }
}

#[test]
fn test_hover_labels_follow_policy() {
    let mut session = session_with(ViewConfig {
        label_policy: LabelPolicy::HoverSelected,
        ..ViewConfig::default()
    });

    session.click(Some(EntityId::from("onion")));
    session.hover(Some(EntityId::from("saga")));
    let scene = session.renderer();
    assert!(scene.labels["onion"]);
    assert!(scene.labels["saga"]);
    assert!(scene.emphasized["saga"]);
    assert!(!scene.labels["eda"]);
    assert_eq!(scene.texts["saga"], "Saga Pattern");

    session.hover(None);
    assert!(!session.renderer().labels["saga"]);
    assert!(!session.renderer().emphasized["saga"]);
    assert!(session.renderer().labels["onion"]);
}

#[test]
fn test_bulk_entity_toggle_restores_everything() {
    let mut session = session_with(ViewConfig::default());
    session.set_all_entities(false);
    assert_eq!(session.frame().visible_points().count(), 0);
    assert!(session.frame().clusters.is_empty());

    session.set_all_entities(true);
    assert_eq!(session.frame().visible_points().count(), 18);

    session.set_entities_for_category(CategoryKey::Strategic, false);
    assert_eq!(session.frame().visible_points().count(), 16);
}

#[test]
fn test_reader_thread_sees_consistent_frames() {
    let mut session = session_with(ViewConfig::default());
    let slot = session.frame_slot();

    let reader = thread::spawn(move || {
        let mut last = 0;
        for _ in 0..2000 {
            let frame = slot.latest();
            assert!(frame.generation >= last);
            last = frame.generation;
            assert_eq!(frame.points.len(), 18);
            let visible = frame.visible_points().count();
            let members: usize = frame.clusters.iter().map(|c| c.member_count).sum();
            assert_eq!(visible, members);
        }
        last
    });

    for i in 0..300 {
        session.set_entity_enabled("serverless", i % 2 == 0);
        session.set_category_enabled(CategoryKey::Structural, i % 3 != 0);
    }

    let seen = reader.join().unwrap();
    assert!(seen <= session.generation());
}

#[test]
fn test_custom_catalogue_from_json() {
    let json = r##"{
        "attributes": [
            { "key": "coupling", "label": "Coupling" },
            { "key": "focus", "label": "Focus" },
            { "key": "structure", "label": "Structure" },
            { "key": "granularity", "label": "Granularity" }
        ],
        "categories": [ { "key": "strategic", "label": "Strategic", "color": "#059669" } ],
        "entities": [
            {
                "id": "a", "name": "A", "category": "strategic", "description": "",
                "values": { "coupling": 100, "focus": 0, "structure": 50, "granularity": 25 }
            }
        ]
    }"##;
    let catalogue = Catalogue::from_json(json).unwrap();
    let session = ViewSession::new(catalogue, ViewConfig::default(), NullRenderer).unwrap();

    assert_eq!(session.mapping().get(Slot::X), AttributeKey::Coupling);
    let point = session.frame().point("a").unwrap();
    assert_eq!(point.transform.position, Point3f::new(22.0, -22.0, 0.0));
    assert_eq!(point.color.to_string(), "#059669");

    let broken = json.replace("\"focus\": 0", "\"focus\": 120");
    assert!(matches!(
        Catalogue::from_json(&broken),
        Err(Error::DataIntegrity(IntegrityViolation::ValueOutOfRange { .. }))
    ));
}
