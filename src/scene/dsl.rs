use crate::{
    foundation::{
        color::Color,
        core::{Direction, FrameSpec, Point, Rect, Vec2},
        error::{SceneError, SceneResult},
    },
    layout::place,
    render::backend::Renderer,
    scene::model::{Connection, Group, SceneGraph, VisualItem},
    timeline::{
        sequencer::{PlaybackReport, Sequencer},
        step::{Timeline, TimelineStep},
    },
};

/// A named scene ready to play.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Scene {
    /// Catalog name; also the default output file stem.
    pub name: String,
    /// Authored state before the first step.
    pub graph: SceneGraph,
    /// Steps in play order.
    pub timeline: Timeline,
}

impl Scene {
    /// Total playback time in seconds.
    pub fn duration(&self) -> f64 {
        self.timeline.total_duration()
    }

    /// Play the timeline against `renderer` on a fresh copy of the authored graph.
    #[tracing::instrument(skip_all, fields(scene = %self.name))]
    pub fn play(&self, renderer: &mut dyn Renderer) -> SceneResult<PlaybackReport> {
        let mut graph = self.graph.clone();
        let report = Sequencer::new(&self.timeline).run(&mut graph, renderer)?;
        tracing::info!(
            steps = report.steps.len(),
            duration = report.duration_secs,
            "scene finished"
        );
        Ok(report)
    }
}

/// Authoring surface for scene scripts: entities first, then steps, interleaved freely.
///
/// Entity geometry queries (`bounds`, `size`) read the authored graph, so a script can place
/// new items relative to ones it already added.
pub struct SceneBuilder {
    name: String,
    graph: SceneGraph,
    timeline: Timeline,
}

impl SceneBuilder {
    /// Builder over the default frame on a black background.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_frame(name, FrameSpec::default(), Color::BLACK)
    }

    /// Builder over a custom frame and background.
    pub fn with_frame(name: impl Into<String>, frame: FrameSpec, background: Color) -> Self {
        Self {
            name: name.into(),
            graph: SceneGraph::new(frame, background),
            timeline: Timeline::default(),
        }
    }

    /// Frame the scene is laid out in.
    pub fn frame(&self) -> FrameSpec {
        self.graph.frame
    }

    /// Scene graph as authored so far.
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Add one item. Ids must be unique across items, connections and groups.
    pub fn add(&mut self, item: VisualItem) -> SceneResult<()> {
        self.graph.insert_item(item)
    }

    /// Add items in order; stops at the first error.
    pub fn add_all(&mut self, items: impl IntoIterator<Item = VisualItem>) -> SceneResult<()> {
        for item in items {
            self.add(item)?;
        }
        Ok(())
    }

    /// Add a connection between existing entities.
    pub fn connect(&mut self, conn: Connection) -> SceneResult<()> {
        self.graph.insert_connection(conn)
    }

    /// Register a group. Group ids may be listed as members; they are flattened.
    pub fn group<I, S>(&mut self, id: impl Into<String>, members: I) -> SceneResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut flat = Vec::new();
        for m in members {
            let m = m.into();
            match self.graph.group(&m) {
                Some(g) => flat.extend(g.members.iter().cloned()),
                None => flat.push(m),
            }
        }
        self.graph.insert_group(Group {
            id: id.into(),
            members: flat,
        })
    }

    /// Bounds of an item or group.
    pub fn bounds(&self, id: &str) -> SceneResult<Rect> {
        self.graph.bounds_of(id)
    }

    /// Centre of an item or group.
    pub fn center(&self, id: &str) -> SceneResult<Point> {
        self.graph.center_of(id)
    }

    /// Width and height of an item or group.
    pub fn size(&self, id: &str) -> SceneResult<Vec2> {
        let r = self.bounds(id)?;
        Ok(Vec2::new(r.width(), r.height()))
    }

    /// Centre for an item of `size` beside the entity `anchor`.
    pub fn beside(&self, anchor: &str, size: Vec2, dir: Direction, buff: f64) -> SceneResult<Point> {
        Ok(place::next_to(self.bounds(anchor)?, size, dir, buff))
    }

    /// Move an authored item before it first appears.
    pub fn reposition(&mut self, id: &str, position: Point) -> SceneResult<()> {
        let item = self
            .graph
            .item_mut(id)
            .ok_or_else(|| SceneError::validation(format!("unknown item '{id}'")))?;
        item.position = position;
        Ok(())
    }

    /// Translate every item an id stands for.
    pub fn translate(&mut self, id: &str, by: Vec2) -> SceneResult<()> {
        for m in self.graph.expand(id)? {
            if let Some(item) = self.graph.item_mut(&m) {
                item.position += by;
            }
        }
        Ok(())
    }

    /// Queue a step.
    pub fn play(&mut self, step: TimelineStep) {
        self.timeline.push(step);
    }

    /// Hold the current state for `secs` after the last step.
    pub fn wait(&mut self, secs: f64) {
        self.timeline.wait(secs);
    }

    /// Finish authoring. Every id a step names must exist.
    pub fn build(self) -> SceneResult<Scene> {
        self.timeline.validate()?;
        for id in self.timeline.referenced_ids() {
            if self.graph.kind_of(id).is_none() {
                return Err(SceneError::authoring(format!(
                    "timeline references unknown entity '{id}'"
                )));
            }
        }
        Ok(Scene {
            name: self.name,
            graph: self.graph,
            timeline: self.timeline,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/dsl.rs"]
mod tests;
