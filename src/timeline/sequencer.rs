use std::collections::BTreeSet;

use crate::{
    foundation::{
        core::{Point, Vec2},
        error::{SceneError, SceneResult},
    },
    render::backend::Renderer,
    scene::model::{EntityKind, SceneGraph},
    timeline::{
        plan::{Props, StepPlan, Tween, TweenKind},
        step::{Action, Op, PropChange, Target, Timeline, TimelineStep},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Where a [`Sequencer`] is in its timeline.
pub enum SequencerState {
    /// `run` has not been called.
    NotStarted,
    /// Executing a step.
    Running {
        /// Index of the step in flight.
        step: usize,
    },
    /// Every step has run and the renderer was told to finish.
    Finished,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// When one step ran.
pub struct StepTiming {
    /// Step index.
    pub index: usize,
    /// Playback time the step started at.
    pub start_secs: f64,
    /// Seconds of animation.
    pub run_time: f64,
    /// Seconds held afterwards.
    pub wait_after: f64,
    /// Entities changed by the step.
    pub targets: usize,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
/// Timing of a whole playback.
pub struct PlaybackReport {
    /// Per-step timing in play order.
    pub steps: Vec<StepTiming>,
    /// Total playback time.
    pub duration_secs: f64,
}

/// Drives a [`Timeline`] one step at a time.
///
/// Steps never overlap: each one is planned against the scene left by its predecessor, handed to
/// the renderer, then committed before the next is planned.
pub struct Sequencer<'t> {
    timeline: &'t Timeline,
    state: SequencerState,
    clock: f64,
    report: PlaybackReport,
}

impl<'t> Sequencer<'t> {
    /// Sequencer over `timeline`, not yet started.
    pub fn new(timeline: &'t Timeline) -> Self {
        Self {
            timeline,
            state: SequencerState::NotStarted,
            clock: 0.0,
            report: PlaybackReport::default(),
        }
    }

    /// Current position in the timeline.
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Timeline seconds consumed so far.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Run the next step. Returns `false` once the timeline is exhausted.
    pub fn advance(
        &mut self,
        scene: &mut SceneGraph,
        renderer: &mut dyn Renderer,
    ) -> SceneResult<bool> {
        let index = match self.state {
            SequencerState::NotStarted => 0,
            SequencerState::Running { step } => step + 1,
            SequencerState::Finished => return Ok(false),
        };
        let Some(step) = self.timeline.steps.get(index) else {
            self.state = SequencerState::Finished;
            self.report.duration_secs = self.clock;
            return Ok(false);
        };
        self.state = SequencerState::Running { step: index };

        step.validate(index)?;
        let plan = plan_step(index, step, scene)?;
        tracing::debug!(
            step = index,
            tweens = plan.tweens.len(),
            run_time = plan.run_time,
            wait = plan.wait_after,
            "step"
        );

        if plan.run_time > 0.0 {
            renderer.animate(scene, &plan)?;
        }
        plan.settle(scene);
        for id in plan.exits() {
            renderer.remove(id)?;
        }
        if plan.wait_after > 0.0 {
            renderer.hold(scene, plan.wait_after)?;
        }

        self.report.steps.push(StepTiming {
            index,
            start_secs: self.clock,
            run_time: step.run_time,
            wait_after: step.wait_after,
            targets: plan.targets().len(),
        });
        self.clock += step.elapsed();
        Ok(true)
    }

    /// Run every remaining step, then close the renderer.
    #[tracing::instrument(skip_all, fields(steps = self.timeline.steps.len()))]
    pub fn run(
        mut self,
        scene: &mut SceneGraph,
        renderer: &mut dyn Renderer,
    ) -> SceneResult<PlaybackReport> {
        while self.advance(scene, renderer)? {}
        renderer.finish()?;
        Ok(self.report)
    }
}

/// Resolve one step into concrete tweens against the current scene.
pub fn plan_step(index: usize, step: &TimelineStep, scene: &SceneGraph) -> SceneResult<StepPlan> {
    let mut planner = Planner {
        index,
        scene,
        touched: BTreeSet::new(),
        tweens: Vec::new(),
    };
    for action in &step.actions {
        planner.action(action)?;
    }
    Ok(StepPlan {
        index,
        run_time: step.run_time,
        ease: step.ease,
        wait_after: step.wait_after,
        tweens: planner.tweens,
    })
}

struct Planner<'a> {
    index: usize,
    scene: &'a SceneGraph,
    touched: BTreeSet<String>,
    tweens: Vec<Tween>,
}

impl Planner<'_> {
    fn err(&self, msg: impl std::fmt::Display) -> SceneError {
        SceneError::authoring(format!("step {}: {msg}", self.index))
    }

    fn resolve(&self, target: &Target) -> SceneResult<Vec<String>> {
        match target {
            Target::Id(id) => self
                .scene
                .expand(id)
                .map_err(|e| self.err(format!("{e} in target"))),
            Target::OnCanvas => Ok(self.scene.on_canvas()),
        }
    }

    fn claim(&mut self, id: &str) -> SceneResult<()> {
        if !self.touched.insert(id.to_owned()) {
            return Err(self.err(format!("'{id}' is targeted twice")));
        }
        Ok(())
    }

    fn require(&self, id: &str, on_canvas: bool) -> SceneResult<()> {
        match (self.scene.is_on_canvas(id), on_canvas) {
            (true, false) => Err(self.err(format!("'{id}' is already on canvas"))),
            (false, true) => Err(self.err(format!("'{id}' is not on canvas"))),
            _ => Ok(()),
        }
    }

    fn current(&self, id: &str) -> SceneResult<(TweenKind, Props)> {
        if let Some(item) = self.scene.item(id) {
            return Ok((TweenKind::Item, Props::of_item(item)));
        }
        if let Some(conn) = self.scene.connection(id) {
            let props = Props {
                position: Point::ORIGIN,
                color: conn.style.color,
                opacity: conn.opacity,
                scale: 1.0,
                reveal: conn.reveal,
            };
            return Ok((TweenKind::Connection, props));
        }
        Err(self.err(format!("unknown entity '{id}'")))
    }

    fn push(&mut self, id: &str, kind: TweenKind, from: Props, to: Props, exit: bool) {
        self.tweens.push(Tween {
            entity: id.to_owned(),
            kind,
            from,
            to,
            exit,
            restore: None,
        });
    }

    fn action(&mut self, action: &Action) -> SceneResult<()> {
        let ids = self.resolve(&action.target)?;
        if ids.is_empty() {
            return Ok(());
        }
        match &action.op {
            Op::Appear | Op::Write => {
                for id in &ids {
                    self.enter(id, |p| Props { reveal: 0.0, ..p })?;
                }
            }
            Op::Grow => {
                for id in &ids {
                    self.enter(id, |p| Props { scale: 0.0, ..p })?;
                }
            }
            Op::FadeIn { shift } => {
                for id in &ids {
                    let shift = *shift;
                    self.enter(id, move |p| Props {
                        opacity: 0.0,
                        position: p.position - shift,
                        ..p
                    })?;
                }
            }
            Op::FadeOut { shift } => {
                for id in &ids {
                    self.exit(id, *shift)?;
                }
            }
            Op::Animate(change) => self.animate(&action.target, &ids, change)?,
            Op::TransformInto { replacement } => self.transform(&action.target, &ids, replacement)?,
            Op::CopyInto { replacement } => self.copy(&ids, replacement)?,
        }
        Ok(())
    }

    fn enter(&mut self, id: &str, start: impl Fn(Props) -> Props) -> SceneResult<()> {
        self.claim(id)?;
        self.require(id, false)?;
        let (kind, to) = self.current(id)?;
        let from = match kind {
            // Connections have no geometry of their own to move or scale.
            TweenKind::Connection => {
                let s = start(to);
                Props {
                    position: to.position,
                    scale: to.scale,
                    reveal: s.reveal,
                    opacity: s.opacity,
                    ..to
                }
            }
            _ => start(to),
        };
        let to = Props { reveal: 1.0, ..to };
        self.push(id, kind, from, to, false);
        Ok(())
    }

    fn exit(&mut self, id: &str, shift: Vec2) -> SceneResult<()> {
        self.claim(id)?;
        self.require(id, true)?;
        let (kind, from) = self.current(id)?;
        let to = Props {
            opacity: 0.0,
            position: from.position + shift,
            ..from
        };
        self.tweens.push(Tween {
            entity: id.to_owned(),
            kind,
            from,
            to,
            exit: true,
            restore: Some(from),
        });
        Ok(())
    }

    fn animate(&mut self, target: &Target, ids: &[String], change: &PropChange) -> SceneResult<()> {
        let pivot = match target {
            Target::Id(id) => self.scene.center_of(id).map_err(|e| self.err(e))?,
            Target::OnCanvas => self.scene.frame.bounds().center(),
        };
        let mut offset = change.shift.unwrap_or(Vec2::ZERO);
        if let Some(dest) = change.move_to {
            offset += dest - pivot;
        }
        let pivot_after = pivot + offset;

        for id in ids {
            self.claim(id)?;
            self.require(id, true)?;
            let (kind, from) = self.current(id)?;
            let mut to = from;
            if let Some(c) = change.color {
                to.color = c;
            }
            if let Some(o) = change.opacity {
                to.opacity = o;
            }
            if matches!(kind, TweenKind::Item) {
                let mut p = from.position + offset;
                if let Some(s) = change.scale {
                    p = pivot_after + (p - pivot_after) * s;
                    to.scale = from.scale * s;
                }
                to.position = p;
            }
            self.push(id, kind, from, to, false);
        }
        Ok(())
    }

    fn transform(&mut self, target: &Target, sources: &[String], replacement: &str) -> SceneResult<()> {
        let center = match target {
            Target::Id(id) => self.scene.center_of(id).map_err(|e| self.err(e))?,
            Target::OnCanvas => self.scene.frame.bounds().center(),
        };
        let rep_ids = self.resolve(&Target::Id(replacement.to_owned()))?;
        if rep_ids.iter().any(|r| sources.contains(r)) {
            return Err(self.err(format!("'{replacement}' cannot replace itself")));
        }
        let rep_center = self
            .scene
            .center_of(replacement)
            .map_err(|e| self.err(e))?;
        let offset = center - rep_center;

        for id in sources {
            self.exit(id, Vec2::ZERO)?;
        }
        for id in &rep_ids {
            self.claim(id)?;
            self.require(id, false)?;
            let (kind, authored) = self.current(id)?;
            let mut to = Props {
                reveal: 1.0,
                ..authored
            };
            if matches!(kind, TweenKind::Item) {
                to.position = authored.position + offset;
            }
            let from = Props { opacity: 0.0, ..to };
            self.push(id, kind, from, to, false);
        }
        Ok(())
    }

    fn copy(&mut self, sources: &[String], replacement: &str) -> SceneResult<()> {
        let [source] = sources else {
            return Err(self.err("copy-into needs a single item as its source"));
        };
        let scene = self.scene;
        let src = scene
            .item(source)
            .ok_or_else(|| self.err(format!("copy-into source '{source}' must be an item")))?;
        self.require(source, true)?;
        if scene.kind_of(replacement) != Some(EntityKind::Item) {
            return Err(self.err(format!("copy-into replacement '{replacement}' must be an item")));
        }

        // The replacement enters like a fade-in; the source itself is untouched.
        self.enter(replacement, |p| Props { opacity: 0.0, ..p })?;
        let (_, rep) = self.current(replacement)?;

        let from = Props::of_item(src);
        let to = Props {
            position: rep.position,
            color: rep.color,
            opacity: 0.0,
            scale: src.scale * size_ratio(src.size(), scene, replacement),
            reveal: 1.0,
        };
        let ghost = format!("{source}~{replacement}");
        self.push(&ghost, TweenKind::Ghost(Box::new(src.clone())), from, to, false);
        Ok(())
    }
}

/// Uniform scale that brings `size` to the height of `target`.
fn size_ratio(size: Vec2, scene: &SceneGraph, target: &str) -> f64 {
    let Ok(r) = scene.bounds_of(target) else {
        return 1.0;
    };
    if size.y > 1e-9 { r.height() / size.y } else { 1.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/sequencer.rs"]
mod tests;
