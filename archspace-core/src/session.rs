//! The single-writer view session
//!
//! A [`ViewSession`] owns every piece of view state for one catalogue and a
//! [`Renderer`]. Each command mutates the state, re-checks the selection,
//! recomputes a full [`SceneFrame`], pushes what changed to the renderer and
//! publishes the frame for readers such as a render loop.

use crate::cluster::summarize_clusters;
use crate::config::{CubeAppearance, ViewConfig};
use crate::dataset::{Catalogue, Entity};
use crate::describe::{snapshot, AxisReading};
use crate::error::{Error, Result};
use crate::filter::FilterState;
use crate::frame::{FrameSlot, ProjectedPoint, SceneFrame};
use crate::keys::{AttributeKey, CategoryKey, EntityId};
use crate::mapping::{Axis, MappingEngine};
use crate::point::Rgb;
use crate::projector::{Projector, TickLabelMode};
use crate::renderer::{PointerCoords, Renderer};
use crate::selection::{HoverInstruction, LabelPolicy, SelectionController};
use std::sync::Arc;
use tracing::{debug, info};

const FALLBACK_COLOR: Rgb = Rgb([0x9c, 0xa3, 0xaf]);

/// Owns the view state of one catalogue and keeps a renderer in sync with it
///
/// Every command updates the mapping, filter or selection state, builds a
/// new `SceneFrame`, pushes what changed to the renderer and publishes the
/// frame to the session's `FrameSlot`.
pub struct ViewSession<R: Renderer> {
    catalogue: Catalogue,
    config: ViewConfig,
    mapping: MappingEngine,
    filter: FilterState,
    selection: SelectionController,
    projector: Projector,
    renderer: R,
    frame: Arc<SceneFrame>,
    slot: FrameSlot,
}

impl<R: Renderer> ViewSession<R> {
    /// Start a session with everything enabled and nothing selected
    ///
    /// The renderer receives label texts, point colors and a complete first
    /// frame before this returns.
    pub fn new(catalogue: Catalogue, config: ViewConfig, mut renderer: R) -> Result<Self> {
        let config = config.validated()?;
        let mapping = MappingEngine::for_catalogue(&catalogue);
        let filter = FilterState::for_catalogue(&catalogue);
        let selection = SelectionController::new(config.label_policy);
        let projector = Projector::new(config.scale);

        for entity in catalogue.entities() {
            let color = catalogue
                .category(entity.category)
                .map_or(FALLBACK_COLOR, |c| c.color);
            renderer.set_label_text(&entity.id, &entity.name);
            renderer.set_point_color(&entity.id, color);
        }

        // Replaced by the first real frame below
        let placeholder = Arc::new(SceneFrame {
            generation: 0,
            scale: config.scale,
            points: Vec::new(),
            clusters: Vec::new(),
            show_clusters: config.show_clusters,
            ticks: Vec::new(),
            axis_titles: projector.axis_titles(mapping.state(), &catalogue),
            cube: config.cube,
            selected: None,
            hovered: None,
        });

        let mut session = Self {
            frame: Arc::clone(&placeholder),
            slot: FrameSlot::new(placeholder),
            catalogue,
            config,
            mapping,
            filter,
            selection,
            projector,
            renderer,
        };

        let first = Arc::new(session.build_frame(0));
        push_frame(&mut session.renderer, &session.catalogue, None, &first);
        session.slot.publish(Arc::clone(&first));
        session.frame = first;
        info!(
            entities = session.catalogue.len(),
            scale = session.config.scale,
            "view session started"
        );
        Ok(session)
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn mapping(&self) -> &MappingEngine {
        &self.mapping
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Direct access for renderer-side concerns such as camera or viewport
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// The most recent frame
    pub fn frame(&self) -> &Arc<SceneFrame> {
        &self.frame
    }

    /// A handle readers can poll for the latest frame
    pub fn frame_slot(&self) -> FrameSlot {
        self.slot.clone()
    }

    pub fn generation(&self) -> u64 {
        self.frame.generation
    }

    // Mapping commands

    pub fn toggle_attribute(&mut self, key: AttributeKey, enabled: bool) {
        self.mapping.toggle_attribute(key, enabled);
        self.refresh();
    }

    /// Map an axis to an attribute; a disabled attribute leaves everything unchanged
    pub fn set_axis(&mut self, axis: Axis, key: AttributeKey) -> Result<()> {
        self.mapping.set_axis(axis, key)?;
        self.refresh();
        Ok(())
    }

    pub fn set_size_attribute(&mut self, key: AttributeKey) -> Result<()> {
        self.mapping.set_size_attribute(key)?;
        self.refresh();
        Ok(())
    }

    // Filter commands

    pub fn set_category_enabled(&mut self, key: CategoryKey, enabled: bool) {
        self.filter.set_category_enabled(key, enabled);
        self.refresh();
    }

    /// Returns false, without recomputing, for ids not in the catalogue
    pub fn set_entity_enabled(&mut self, id: &str, enabled: bool) -> bool {
        if !self.filter.set_entity_enabled(id, enabled) {
            return false;
        }
        self.refresh();
        true
    }

    pub fn set_all_entities(&mut self, enabled: bool) {
        self.filter.set_all_entities(&self.catalogue, enabled);
        self.refresh();
    }

    pub fn set_entities_for_category(&mut self, key: CategoryKey, enabled: bool) {
        self.filter
            .set_entities_for_category(&self.catalogue, key, enabled);
        self.refresh();
    }

    // Presentation commands

    pub fn set_label_policy(&mut self, policy: LabelPolicy) {
        self.config.label_policy = policy;
        self.selection.set_label_policy(policy);
        self.refresh();
    }

    pub fn set_tick_label_mode(&mut self, mode: TickLabelMode) {
        self.config.tick_label_mode = mode;
        self.refresh();
    }

    pub fn set_show_clusters(&mut self, show: bool) {
        self.config.show_clusters = show;
        self.refresh();
    }

    pub fn set_scale(&mut self, scale: f32) -> Result<()> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::Config(format!(
                "scale must be a positive finite number, got {}",
                scale
            )));
        }
        self.config.scale = scale;
        self.projector = Projector::new(scale);
        self.refresh();
        Ok(())
    }

    /// Opacities outside their ranges are clamped
    pub fn set_cube_appearance(&mut self, appearance: CubeAppearance) {
        self.config.cube = appearance.clamped();
        self.refresh();
    }

    // Pointer input

    /// Pick under the pointer and update hover
    pub fn pointer_moved(&mut self, pointer: PointerCoords) -> Vec<HoverInstruction> {
        let picked = self.renderer.pick(pointer);
        self.hover(picked)
    }

    /// Pick under the pointer and select the hit, or clear on a miss
    pub fn pointer_clicked(&mut self, pointer: PointerCoords) {
        let picked = self.renderer.pick(pointer);
        self.click(picked);
    }

    /// Hover an entity directly, bypassing the pick
    ///
    /// Unknown or hidden ids count as hovering empty space.
    pub fn hover(&mut self, next: Option<EntityId>) -> Vec<HoverInstruction> {
        let next = self.visible_or_none(next);
        let instructions = self.selection.pointer_moved(next);
        if instructions.is_empty() {
            return instructions;
        }

        for instruction in &instructions {
            match instruction {
                HoverInstruction::Exit(id) => self.renderer.set_point_emphasis(id, false),
                HoverInstruction::Enter(id) => self.renderer.set_point_emphasis(id, true),
            }
        }
        self.refresh();
        instructions
    }

    /// Select an entity directly; unknown or hidden ids clear the selection
    pub fn click(&mut self, next: Option<EntityId>) {
        let next = self.visible_or_none(next);
        self.selection.pointer_clicked(next);
        self.refresh();
    }

    // Queries

    pub fn selected_entity(&self) -> Option<&Entity> {
        self.selection
            .selected()
            .and_then(|id| self.catalogue.entity(id.as_str()))
    }

    /// Axis and size readings of the selected entity
    pub fn selected_snapshot(&self) -> Option<[AxisReading; 4]> {
        self.selected_entity()
            .map(|entity| snapshot(entity, self.mapping.state(), &self.catalogue))
    }

    fn visible_or_none(&self, id: Option<EntityId>) -> Option<EntityId> {
        id.filter(|id| self.filter.is_visible_id(&self.catalogue, id.as_str()))
    }

    /// Settle the selection, recompute the frame, push and publish it
    fn refresh(&mut self) {
        let (catalogue, filter) = (&self.catalogue, &self.filter);
        self.selection
            .retain_visible(|id| filter.is_visible_id(catalogue, id.as_str()));

        let next = Arc::new(self.build_frame(self.frame.generation + 1));
        push_frame(&mut self.renderer, &self.catalogue, Some(&self.frame), &next);
        self.slot.publish(Arc::clone(&next));
        debug!(
            generation = next.generation,
            visible = next.visible_points().count(),
            "scene recomputed"
        );
        self.frame = next;
    }

    fn build_frame(&self, generation: u64) -> SceneFrame {
        let state = self.mapping.state();
        let points: Vec<ProjectedPoint> = self
            .catalogue
            .entities()
            .iter()
            .map(|entity| {
                let transform = self.projector.project(entity, state, &self.filter);
                ProjectedPoint {
                    id: entity.id.clone(),
                    name: entity.name.clone(),
                    category: entity.category,
                    color: self
                        .catalogue
                        .category(entity.category)
                        .map_or(FALLBACK_COLOR, |c| c.color),
                    label_visible: self.selection.label_visible(&entity.id, transform.visible),
                    emphasized: self.selection.is_hovered(&entity.id),
                    transform,
                }
            })
            .collect();

        let clusters = summarize_clusters(
            self.catalogue.categories(),
            points
                .iter()
                .filter(|p| p.transform.visible)
                .map(|p| (p.category, p.transform.position)),
        );

        SceneFrame {
            generation,
            scale: self.projector.scale(),
            points,
            clusters,
            show_clusters: self.config.show_clusters,
            ticks: self.projector.ticks(self.config.tick_label_mode),
            axis_titles: self.projector.axis_titles(state, &self.catalogue),
            cube: self.config.cube,
            selected: self.selection.selected().cloned(),
            hovered: self.selection.hovered().cloned(),
        }
    }
}

/// Send the renderer everything that differs from `previous`, or everything
/// when there is no previous frame
fn push_frame<R: Renderer>(
    renderer: &mut R,
    catalogue: &Catalogue,
    previous: Option<&SceneFrame>,
    next: &SceneFrame,
) {
    for (i, point) in next.points.iter().enumerate() {
        let before = previous.and_then(|f| f.points.get(i)).filter(|p| p.id == point.id);
        if before.map_or(true, |b| b.transform != point.transform) {
            renderer.set_point_transform(&point.id, &point.transform);
        }
        if before.map_or(true, |b| b.label_visible != point.label_visible) {
            renderer.set_label_visible(&point.id, point.label_visible);
        }
    }

    let shown = |frame: &SceneFrame, key: CategoryKey| {
        if frame.show_clusters {
            frame.cluster(key).cloned()
        } else {
            None
        }
    };
    for category in catalogue.categories() {
        let geometry = shown(next, category.key);
        if previous.map_or(true, |f| shown(f, category.key) != geometry) {
            renderer.set_cluster_geometry(category.key, geometry.as_ref());
        }
    }

    if previous.map_or(true, |f| f.cube != next.cube) {
        renderer.set_cube_appearance(&next.cube);
    }
    if previous.map_or(true, |f| f.axis_titles != next.axis_titles) {
        renderer.set_axis_titles(&next.axis_titles);
    }
    if previous.map_or(true, |f| f.ticks != next.ticks) {
        renderer.set_tick_labels(&next.ticks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::ClusterGeometry;
    use crate::projector::{AxisTitles, PointTransform, TickMark};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Transform(String, bool),
        Emphasis(String, bool),
        LabelVisible(String, bool),
        LabelText(String),
        Cluster(CategoryKey, bool),
        Cube,
        Titles,
        Ticks,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        hit: Option<EntityId>,
    }

    impl Recorder {
        fn take(&mut self) -> Vec<Call> {
            std::mem::take(&mut self.calls)
        }
    }

    impl Renderer for Recorder {
        fn set_point_transform(&mut self, id: &EntityId, transform: &PointTransform) {
            self.calls.push(Call::Transform(id.to_string(), transform.visible));
        }

        fn set_point_emphasis(&mut self, id: &EntityId, emphasized: bool) {
            self.calls.push(Call::Emphasis(id.to_string(), emphasized));
        }

        fn set_label_visible(&mut self, id: &EntityId, visible: bool) {
            self.calls.push(Call::LabelVisible(id.to_string(), visible));
        }

        fn set_label_text(&mut self, _id: &EntityId, text: &str) {
            self.calls.push(Call::LabelText(text.to_string()));
        }

        fn set_cluster_geometry(&mut self, category: CategoryKey, geometry: Option<&ClusterGeometry>) {
            self.calls.push(Call::Cluster(category, geometry.is_some()));
        }

        fn pick(&self, _pointer: PointerCoords) -> Option<EntityId> {
            self.hit.clone()
        }

        fn set_cube_appearance(&mut self, _appearance: &CubeAppearance) {
            self.calls.push(Call::Cube);
        }

        fn set_axis_titles(&mut self, _titles: &AxisTitles) {
            self.calls.push(Call::Titles);
        }

        fn set_tick_labels(&mut self, _ticks: &[TickMark]) {
            self.calls.push(Call::Ticks);
        }
    }

    fn session() -> ViewSession<Recorder> {
        ViewSession::new(Catalogue::builtin().unwrap(), ViewConfig::default(), Recorder::default()).unwrap()
    }

    fn count(calls: &[Call], pred: impl Fn(&Call) -> bool) -> usize {
        calls.iter().filter(|c| pred(c)).count()
    }

    #[test]
    fn test_first_pass_pushes_everything() {
        let mut session = session();
        let calls = session.renderer_mut().take();

        assert_eq!(count(&calls, |c| matches!(c, Call::LabelText(_))), 18);
        assert_eq!(count(&calls, |c| matches!(c, Call::Transform(_, true))), 18);
        assert_eq!(count(&calls, |c| matches!(c, Call::LabelVisible(_, false))), 18);
        // Clusters are off by default
        assert_eq!(count(&calls, |c| matches!(c, Call::Cluster(_, false))), 3);
        assert!(calls.contains(&Call::Cube));
        assert!(calls.contains(&Call::Titles));
        assert!(calls.contains(&Call::Ticks));
        assert_eq!(session.generation(), 0);
        assert_eq!(session.frame_slot().latest().points.len(), 18);
    }

    #[test]
    fn test_only_changed_points_are_pushed() {
        let mut session = session();
        session.renderer_mut().take();

        session.set_entity_enabled("soa", false);
        let calls = session.renderer_mut().take();
        assert_eq!(calls, vec![Call::Transform("soa".to_string(), false)]);
        assert_eq!(session.generation(), 1);

        assert!(!session.set_entity_enabled("missing", false));
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn test_hiding_selected_clears_selection() {
        let mut session = session();
        session.click(Some(EntityId::from("monolith")));
        assert_eq!(session.selected_entity().map(|e| e.name.as_str()), Some("Monolith"));

        session.set_category_enabled(CategoryKey::Deployment, false);
        assert!(session.selection().selected().is_none());
        assert!(session.frame().selected.is_none());
        assert!(!session.frame().point("monolith").unwrap().transform.visible);

        session.set_category_enabled(CategoryKey::Deployment, true);
        assert!(session.frame().point("monolith").unwrap().transform.visible);
        assert!(session.selection().selected().is_none());
    }

    #[test]
    fn test_hover_drives_emphasis_and_labels() {
        let mut session = session();
        session.renderer_mut().take();

        session.renderer_mut().hit = Some(EntityId::from("ddd"));
        let instructions = session.pointer_moved(PointerCoords::new(10.0, 10.0));
        assert_eq!(instructions, vec![HoverInstruction::Enter(EntityId::from("ddd"))]);
        let calls = session.renderer_mut().take();
        assert_eq!(
            calls,
            vec![
                Call::Emphasis("ddd".to_string(), true),
                Call::LabelVisible("ddd".to_string(), true),
            ]
        );

        // Same pick again does nothing
        assert!(session.pointer_moved(PointerCoords::new(11.0, 10.0)).is_empty());
        assert!(session.renderer_mut().take().is_empty());

        session.renderer_mut().hit = None;
        session.pointer_moved(PointerCoords::new(0.0, 0.0));
        let calls = session.renderer_mut().take();
        assert!(calls.contains(&Call::Emphasis("ddd".to_string(), false)));
        assert!(calls.contains(&Call::LabelVisible("ddd".to_string(), false)));
    }

    #[test]
    fn test_hidden_pick_counts_as_miss() {
        let mut session = session();
        session.set_entity_enabled("cqrs", false);

        session.renderer_mut().hit = Some(EntityId::from("cqrs"));
        session.pointer_clicked(PointerCoords::new(5.0, 5.0));
        assert!(session.selection().selected().is_none());

        session.click(Some(EntityId::from("no-such-style")));
        assert!(session.selection().selected().is_none());
    }

    #[test]
    fn test_clusters_pushed_only_when_shown() {
        let mut session = session();
        session.renderer_mut().take();

        session.set_show_clusters(true);
        let calls = session.renderer_mut().take();
        assert_eq!(count(&calls, |c| matches!(c, Call::Cluster(_, true))), 3);
        assert!(session.frame().cluster(CategoryKey::Strategic).is_some());

        session.set_category_enabled(CategoryKey::Strategic, false);
        let calls = session.renderer_mut().take();
        assert!(calls.contains(&Call::Cluster(CategoryKey::Strategic, false)));
        assert!(session.frame().cluster(CategoryKey::Strategic).is_none());

        session.set_show_clusters(false);
        let calls = session.renderer_mut().take();
        assert_eq!(count(&calls, |c| matches!(c, Call::Cluster(_, false))), 2);
    }

    #[test]
    fn test_rejected_mapping_leaves_frame_alone() {
        let mut session = session();
        session.toggle_attribute(AttributeKey::Focus, false);
        let generation = session.generation();

        assert!(matches!(
            session.set_axis(Axis::X, AttributeKey::Focus),
            Err(Error::InvalidMappingRequest { .. })
        ));
        assert_eq!(session.generation(), generation);
        assert!(session.set_scale(f32::NAN).is_err());
        assert_eq!(session.generation(), generation);
    }

    #[test]
    fn test_scale_and_ticks_update_presentation() {
        let mut session = session();
        session.renderer_mut().take();

        session.set_scale(30.0).unwrap();
        let calls = session.renderer_mut().take();
        assert!(calls.contains(&Call::Titles));
        assert!(calls.contains(&Call::Ticks));
        assert_eq!(session.frame().ticks[10].coord, 30.0);

        session.set_tick_label_mode(TickLabelMode::All);
        assert_eq!(session.renderer_mut().take(), vec![Call::Ticks]);

        session.set_cube_appearance(CubeAppearance {
            face_opacity: 2.0,
            ..CubeAppearance::default()
        });
        assert_eq!(session.renderer_mut().take(), vec![Call::Cube]);
        assert_eq!(session.config().cube.face_opacity, crate::config::MAX_FACE_OPACITY);
    }

    #[test]
    fn test_selected_snapshot() {
        let mut session = session();
        assert!(session.selected_snapshot().is_none());

        session.click(Some(EntityId::from("monolith")));
        session.set_size_attribute(AttributeKey::Coupling).unwrap();
        let readings = session.selected_snapshot().unwrap();
        assert_eq!(readings[3].value, 90.0);
        assert_eq!(readings[3].note, "very high coupling (low ↔ high)");
    }

    #[test]
    fn test_label_policy_all_shows_visible_labels() {
        let mut session = session();
        session.set_entity_enabled("p2p", false);
        session.set_label_policy(LabelPolicy::All);

        let frame = session.frame();
        assert_eq!(frame.points.iter().filter(|p| p.label_visible).count(), 17);
        assert!(!frame.point("p2p").unwrap().label_visible);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ViewConfig {
            scale: -1.0,
            ..ViewConfig::default()
        };
        assert!(ViewSession::new(Catalogue::builtin().unwrap(), config, Recorder::default()).is_err());
    }
}
