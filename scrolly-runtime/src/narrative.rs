//! The narrative scope: owns every subscription and threads derived values
//! to its handlers.

use crate::registry::Registry;
use crate::{
    ElementRef, Error, FrameScheduler, ResizeController, Result, Subscription, Viewport,
    ViewportEvent, VisibilityGate,
};
use scrolly_core::{
    resolve, LinePresentation, LineTransition, NarrativeConfig, NarrativeSnapshot, Platform,
    ProgressTracker, ScrollDirection, ScrollGeometry, SegmentCount, TextLine,
};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::{debug, info};

/// Per-presentation choices on top of [`NarrativeConfig`]
#[derive(Debug, Clone, Default)]
pub struct NarrativeOptions {
    /// Platform used to pick the scroll distance
    pub platform: Platform,
    /// Overrides the configured default segment count
    pub segment_count: Option<SegmentCount>,
    /// Text for each segment, in order
    pub lines: Vec<String>,
}

/// A line changed state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEvent {
    pub index: usize,
    pub transition: LineTransition,
}

struct NarrativeShared {
    container: ElementRef,
    segment_count: SegmentCount,
    video_duration_secs: Option<f64>,
    tracker: RefCell<ProgressTracker>,
    lines: RefCell<Vec<TextLine>>,
    snapshot: Cell<NarrativeSnapshot>,
    changes: Registry<NarrativeSnapshot>,
    line_events: Registry<LineEvent>,
}

impl NarrativeShared {
    fn recompute(&self, event: &ViewportEvent) {
        let Some(container) = self.container.get() else {
            info!("scroll container not mounted; keeping last progress");
            return;
        };

        let geometry = ScrollGeometry::new(container.height, event.height);
        let offset = event.scroll_y - container.offset_top;
        let progress = self.tracker.borrow_mut().update(offset, geometry);
        let segments = resolve(progress, self.segment_count);

        let transitions: Vec<LineEvent> = self
            .lines
            .borrow_mut()
            .iter_mut()
            .enumerate()
            .filter_map(|(index, line)| {
                let should_show = segments.active_index == Some(index as u32);
                line.set_should_show(should_show)
                    .map(|transition| LineEvent { index, transition })
            })
            .collect();

        let previous = self.snapshot.get();
        let next = NarrativeSnapshot::new(
            progress,
            segments,
            previous.is_in_viewport,
            self.video_duration_secs,
        );

        if next.active_text_index != previous.active_text_index {
            debug!(
                progress,
                active = ?next.active_text_index,
                after_video = next.after_video,
                "active text changed"
            );
        }

        self.publish(next);
        for event in &transitions {
            self.line_events.emit(event);
        }
    }

    fn set_visibility(&self, is_in_viewport: bool) {
        let next = NarrativeSnapshot {
            is_in_viewport,
            ..self.snapshot.get()
        };
        self.publish(next);
    }

    fn publish(&self, next: NarrativeSnapshot) {
        if self.snapshot.replace(next) != next {
            self.changes.emit(&next);
        }
    }
}

/// Scroll-driven video narrative bound to one viewport and container.
///
/// On construction the container is sized, progress is computed once and
/// the visibility gate starts observing. Scroll recomputes run at most once
/// per animation frame; resize recomputes run immediately. Dropping the
/// narrative tears down every listener it registered.
pub struct ScrollNarrative {
    shared: Rc<NarrativeShared>,
    gate: VisibilityGate,
    _subscriptions: Vec<Subscription>,
}

impl ScrollNarrative {
    /// Sets up the narrative on `viewport` for `container`
    pub fn new(
        viewport: &Viewport,
        container: ElementRef,
        config: &NarrativeConfig,
        options: NarrativeOptions,
    ) -> Result<Self> {
        config.validate()?;
        let observer_options = config.observer_options()?;

        let segment_count = match (options.segment_count, options.lines.len()) {
            (Some(count), 0) => count,
            (Some(count), lines) if lines == count.get() as usize => count,
            (Some(count), lines) => {
                return Err(Error::LineCountMismatch {
                    lines,
                    segments: count.get(),
                })
            }
            (None, 0) => config.default_segment_count,
            (None, lines) => SegmentCount::new(u32::try_from(lines).unwrap_or(u32::MAX))?,
        };

        let distances = config.distances(options.platform);
        info!(
            platform = %options.platform,
            segments = segment_count.get(),
            scroll_extra_px = distances.scroll_extra_px,
            after_video_extra_px = distances.after_video_extra_px,
            "setting up scroll narrative"
        );

        let shared = Rc::new(NarrativeShared {
            container: container.clone(),
            segment_count,
            video_duration_secs: config.video_duration_secs,
            tracker: RefCell::new(ProgressTracker::new()),
            lines: RefCell::new(options.lines.into_iter().map(TextLine::new).collect()),
            snapshot: Cell::new(NarrativeSnapshot::default()),
            changes: Registry::new(),
            line_events: Registry::new(),
        });

        let mut subscriptions = Vec::with_capacity(4);

        // Registered first so the container is resized before progress is
        // recomputed against it.
        subscriptions.push(ResizeController::new(container.clone(), distances).attach(viewport));

        let on_resize = Rc::downgrade(&shared);
        subscriptions.push(viewport.on_resize(move |event| {
            if let Some(shared) = on_resize.upgrade() {
                shared.recompute(event);
            }
        }));

        // Geometry is read when the frame runs, so a resize between the
        // scroll and the frame is not undone by a stale viewport height.
        let on_frame: Weak<NarrativeShared> = Rc::downgrade(&shared);
        let frame_viewport = viewport.clone();
        let scheduler = FrameScheduler::new(viewport.clone(), move |()| {
            if let Some(shared) = on_frame.upgrade() {
                shared.recompute(&frame_viewport.event());
            }
        });
        subscriptions.push(viewport.on_scroll(move |_| {
            scheduler.schedule(());
        }));

        let gate = VisibilityGate::new(viewport, container, observer_options);
        let on_visibility = Rc::downgrade(&shared);
        subscriptions.push(gate.on_change(move |visible| {
            if let Some(shared) = on_visibility.upgrade() {
                shared.set_visibility(visible);
            }
        }));
        shared.set_visibility(gate.is_in_viewport());

        shared.recompute(&viewport.event());

        Ok(Self {
            shared,
            gate,
            _subscriptions: subscriptions,
        })
    }

    /// Latest outputs
    pub fn snapshot(&self) -> NarrativeSnapshot {
        self.shared.snapshot.get()
    }

    pub fn progress(&self) -> f64 {
        self.shared.tracker.borrow().current()
    }

    /// Progress before the latest recompute
    pub fn previous_progress(&self) -> f64 {
        self.shared.tracker.borrow().previous()
    }

    pub fn direction(&self) -> ScrollDirection {
        self.shared.tracker.borrow().direction()
    }

    pub fn active_text_index(&self) -> Option<u32> {
        self.snapshot().active_text_index
    }

    pub fn after_video(&self) -> bool {
        self.snapshot().after_video
    }

    pub fn is_in_viewport(&self) -> bool {
        self.snapshot().is_in_viewport
    }

    pub fn segment_count(&self) -> SegmentCount {
        self.shared.segment_count
    }

    /// Presentation flags for every text line, in order
    pub fn line_presentations(&self) -> Vec<LinePresentation> {
        self.shared
            .lines
            .borrow()
            .iter()
            .map(TextLine::presentation)
            .collect()
    }

    /// Text of line `index`
    pub fn line_text(&self, index: usize) -> Option<String> {
        self.shared
            .lines
            .borrow()
            .get(index)
            .map(|line| line.text().to_string())
    }

    /// Subscribes to snapshot changes
    pub fn on_change(&self, handler: impl Fn(&NarrativeSnapshot) + 'static) -> Subscription {
        self.shared.changes.subscribe(handler)
    }

    /// Subscribes to text line enter/exit transitions
    pub fn on_line_transition(&self, handler: impl Fn(&LineEvent) + 'static) -> Subscription {
        self.shared.line_events.subscribe(handler)
    }

    /// The gate observing the container
    pub fn visibility_gate(&mut self) -> &mut VisibilityGate {
        &mut self.gate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Element;

    fn setup(lines: &[&str]) -> (Viewport, ElementRef, ScrollNarrative) {
        let viewport = Viewport::new(800.0);
        let container = ElementRef::attached(Element::new(0.0, 0.0));
        let config = NarrativeConfig {
            default_scroll_extra_px: 4000.0,
            after_video_extra_height: 200.0,
            video_duration_secs: Some(10.0),
            ..NarrativeConfig::default()
        };
        let options = NarrativeOptions {
            lines: lines.iter().map(|s| s.to_string()).collect(),
            ..NarrativeOptions::default()
        };
        let narrative = ScrollNarrative::new(&viewport, container.clone(), &config, options).unwrap();
        (viewport, container, narrative)
    }

    #[test]
    fn test_initial_state() {
        let (_viewport, container, narrative) = setup(&["a", "b", "c"]);
        assert_eq!(container.get().map(|e| e.height), Some(5000.0));
        assert_eq!(narrative.segment_count().get(), 3);
        assert_eq!(narrative.progress(), 0.0);
        assert_eq!(narrative.active_text_index(), Some(0));
        assert!(narrative.is_in_viewport());
        assert!(narrative.line_presentations()[0].visible);
        assert!(!narrative.line_presentations()[1].visible);
        assert_eq!(narrative.line_text(2).as_deref(), Some("c"));
    }

    #[test]
    fn test_scroll_is_throttled_per_frame() {
        let (viewport, _container, narrative) = setup(&["a", "b", "c"]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _subscription = {
            let seen = Rc::clone(&seen);
            narrative.on_change(move |snapshot| seen.borrow_mut().push(*snapshot))
        };

        viewport.scroll_to(100.0);
        viewport.scroll_to(1000.0);
        viewport.scroll_to(2100.0);
        assert_eq!(narrative.progress(), 0.0);
        assert!(seen.borrow().is_empty());

        assert_eq!(viewport.run_animation_frame(), 1);
        assert_eq!(narrative.progress(), 0.5);
        assert_eq!(narrative.direction(), ScrollDirection::Forward);
        assert_eq!(seen.borrow().len(), 1);

        let snapshot = seen.borrow()[0];
        // segLen = 0.25, so 0.5 is segment 2
        assert_eq!(snapshot.active_text_index, Some(2));
        assert!(!snapshot.after_video);
        assert_eq!(snapshot.playback_secs, Some(5.0));
    }

    #[test]
    fn test_after_video_and_back() {
        let (viewport, _container, narrative) = setup(&["a", "b", "c"]);

        viewport.scroll_to(4200.0);
        viewport.run_animation_frame();
        assert!(narrative.after_video());
        assert_eq!(narrative.active_text_index(), None);
        assert!(narrative.line_presentations().iter().all(|p| !p.visible));

        viewport.scroll_to(0.0);
        viewport.run_animation_frame();
        assert!(!narrative.after_video());
        assert_eq!(narrative.previous_progress(), 1.0);
        assert_eq!(narrative.direction(), ScrollDirection::Backward);
    }

    #[test]
    fn test_line_reentry_fires_enter_again() {
        let (viewport, _container, narrative) = setup(&["a", "b"]);
        let events = Rc::new(RefCell::new(Vec::new()));
        let _subscription = {
            let events = Rc::clone(&events);
            narrative.on_line_transition(move |event| events.borrow_mut().push(*event))
        };

        // two segments over a 4200px range: segLen = 1/3
        viewport.scroll_to(1500.0);
        viewport.run_animation_frame();
        viewport.scroll_to(100.0);
        viewport.run_animation_frame();

        let events = events.borrow();
        assert_eq!(
            &*events,
            &[
                LineEvent {
                    index: 0,
                    transition: LineTransition::Exited
                },
                LineEvent {
                    index: 1,
                    transition: LineTransition::Entered { generation: 1 }
                },
                LineEvent {
                    index: 0,
                    transition: LineTransition::Entered { generation: 2 }
                },
                LineEvent {
                    index: 1,
                    transition: LineTransition::Exited
                },
            ]
        );
    }

    #[test]
    fn test_resize_recomputes_immediately() {
        let (viewport, container, narrative) = setup(&["a", "b", "c"]);
        viewport.scroll_to(2100.0);
        viewport.run_animation_frame();
        assert_eq!(narrative.progress(), 0.5);

        viewport.resize(1000.0);
        assert_eq!(container.get().map(|e| e.height), Some(5200.0));
        assert_eq!(narrative.progress(), 0.5);
    }

    #[test]
    fn test_frame_after_resize_uses_current_geometry() {
        let (viewport, container, narrative) = setup(&["a", "b", "c"]);
        viewport.scroll_to(2100.0);
        viewport.resize(1000.0);
        assert_eq!(container.get().map(|e| e.height), Some(5200.0));
        assert_eq!(narrative.progress(), 0.5);

        viewport.run_animation_frame();
        // range is 5200 - 1000, not 5200 - 800
        assert_eq!(narrative.progress(), 0.5);
        assert_eq!(narrative.active_text_index(), Some(2));
    }

    #[test]
    fn test_line_events_see_published_snapshot() {
        let (viewport, _container, narrative) = setup(&["a", "b", "c"]);
        let narrative = Rc::new(narrative);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _subscription = {
            let seen = Rc::clone(&seen);
            let weak = Rc::downgrade(&narrative);
            narrative.on_line_transition(move |event| {
                if let Some(narrative) = weak.upgrade() {
                    seen.borrow_mut()
                        .push((event.index, narrative.active_text_index()));
                }
            })
        };

        viewport.scroll_to(2100.0);
        viewport.run_animation_frame();
        assert_eq!(&*seen.borrow(), &[(0, Some(2)), (2, Some(2))]);
    }

    #[test]
    fn test_visibility_flows_into_snapshot() {
        let (viewport, _container, narrative) = setup(&["a"]);
        viewport.scroll_to(6000.0);
        viewport.run_animation_frame();
        assert!(!narrative.is_in_viewport());
        assert!(narrative.after_video());
    }

    #[test]
    fn test_drop_releases_everything() {
        let (viewport, _container, narrative) = setup(&["a"]);
        assert!(viewport.listener_count() > 0);
        viewport.scroll_to(50.0);
        drop(narrative);

        assert_eq!(viewport.listener_count(), 0);
        viewport.run_animation_frame();
        viewport.resize(500.0);
    }

    #[test]
    fn test_line_count_mismatch() {
        let viewport = Viewport::new(800.0);
        let options = NarrativeOptions {
            segment_count: Some(SegmentCount::new(4).unwrap()),
            lines: vec!["only one".to_string()],
            ..NarrativeOptions::default()
        };
        let result = ScrollNarrative::new(
            &viewport,
            ElementRef::new(),
            &NarrativeConfig::default(),
            options,
        );
        assert!(matches!(
            result,
            Err(Error::LineCountMismatch {
                lines: 1,
                segments: 4
            })
        ));
    }

    #[test]
    fn test_unmounted_container_keeps_defaults() {
        let viewport = Viewport::new(800.0);
        let narrative = ScrollNarrative::new(
            &viewport,
            ElementRef::new(),
            &NarrativeConfig::default(),
            NarrativeOptions::default(),
        )
        .unwrap();
        viewport.scroll_to(3000.0);
        viewport.run_animation_frame();

        assert_eq!(narrative.segment_count().get(), 5);
        assert_eq!(narrative.snapshot(), NarrativeSnapshot::default());
    }
}
