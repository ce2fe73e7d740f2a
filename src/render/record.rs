use crate::{
    animation::ease::Ease,
    foundation::error::SceneResult,
    render::backend::Renderer,
    scene::model::SceneGraph,
    timeline::plan::StepPlan,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
/// One call the sequencer made, stamped with the clock at the time of the call.
pub enum RenderEvent {
    /// A step started animating.
    Animate {
        /// Clock in seconds.
        at: f64,
        /// Step index.
        step: usize,
        /// Seconds the step animates for.
        run_time: f64,
        /// Rate function of the step.
        ease: Ease,
        /// Entities the step changes.
        targets: Vec<String>,
    },
    /// The scene was held still.
    Hold {
        /// Clock in seconds.
        at: f64,
        /// Hold length.
        secs: f64,
        /// Entities on canvas during the hold.
        on_canvas: usize,
    },
    /// An entity left the canvas.
    Remove {
        /// Clock in seconds.
        at: f64,
        /// Entity id.
        id: String,
    },
    /// Playback ended.
    Finish {
        /// Clock in seconds.
        at: f64,
    },
}

/// Renderer that draws nothing and logs every call against a timeline clock.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    events: Vec<RenderEvent>,
    clock: f64,
    /// Committed scene state after the last animate/hold, useful for assertions.
    last: Option<SceneGraph>,
}

impl RecordingRenderer {
    /// Empty log at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events so far, in call order.
    pub fn events(&self) -> &[RenderEvent] {
        &self.events
    }

    /// Seconds of timeline time seen so far.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Committed scene after the latest call, `None` before any animate or hold.
    pub fn last_scene(&self) -> Option<&SceneGraph> {
        self.last.as_ref()
    }

    /// Consume the renderer, keeping only the log.
    pub fn into_events(self) -> Vec<RenderEvent> {
        self.events
    }
}

impl Renderer for RecordingRenderer {
    fn animate(&mut self, scene: &SceneGraph, plan: &StepPlan) -> SceneResult<()> {
        self.events.push(RenderEvent::Animate {
            at: self.clock,
            step: plan.index,
            run_time: plan.run_time,
            ease: plan.ease,
            targets: plan.targets(),
        });
        self.clock += plan.run_time;
        let mut settled = scene.clone();
        plan.settle(&mut settled);
        self.last = Some(settled);
        Ok(())
    }

    fn hold(&mut self, scene: &SceneGraph, secs: f64) -> SceneResult<()> {
        self.events.push(RenderEvent::Hold {
            at: self.clock,
            secs,
            on_canvas: scene.on_canvas().len(),
        });
        self.clock += secs;
        self.last = Some(scene.clone());
        Ok(())
    }

    fn remove(&mut self, id: &str) -> SceneResult<()> {
        self.events.push(RenderEvent::Remove {
            at: self.clock,
            id: id.to_owned(),
        });
        Ok(())
    }

    fn finish(&mut self) -> SceneResult<()> {
        self.events.push(RenderEvent::Finish { at: self.clock });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/record.rs"]
mod tests;
