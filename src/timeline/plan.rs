use crate::{
    animation::ease::Ease,
    foundation::{
        color::Color,
        core::Point,
        math::{lerp, lerp_point},
    },
    scene::model::{SceneGraph, VisualItem},
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Animatable state of one entity.
pub struct Props {
    /// Centre in scene units.
    pub position: Point,
    /// Stroke or text colour.
    pub color: Color,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Scale about the centre.
    pub scale: f64,
    /// Fraction of the outline or text drawn.
    pub reveal: f64,
}

impl Props {
    /// Component-wise interpolation; `t = 0` and `t = 1` give the endpoints exactly.
    pub fn lerp(self, to: Self, t: f64) -> Self {
        Self {
            position: lerp_point(self.position, to.position, t),
            color: self.color.lerp(to.color, t),
            opacity: lerp(self.opacity, to.opacity, t),
            scale: lerp(self.scale, to.scale, t),
            reveal: lerp(self.reveal, to.reveal, t),
        }
    }

    /// Current values of `item`.
    pub fn of_item(item: &VisualItem) -> Self {
        Self {
            position: item.position,
            color: item.color,
            opacity: item.opacity,
            scale: item.scale,
            reveal: item.reveal,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// What a tween writes to.
pub enum TweenKind {
    /// A visual item.
    Item,
    /// Connections follow their endpoints; only colour, opacity and reveal apply.
    Connection,
    /// Copy that exists only while the step runs.
    Ghost(Box<VisualItem>),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Interpolation of one entity over one step.
pub struct Tween {
    /// Entity id, or the ghost's own id.
    pub entity: String,
    /// Target kind.
    pub kind: TweenKind,
    /// Values at progress 0.
    pub from: Props,
    /// Values at eased progress 1.
    pub to: Props,
    /// Leaves the canvas when the step completes.
    pub exit: bool,
    /// Values restored on exit, so a later entry starts from the authored state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restore: Option<Props>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// One step resolved against the scene it is about to run on.
pub struct StepPlan {
    /// Position in the timeline.
    pub index: usize,
    /// Seconds the tweens run for.
    pub run_time: f64,
    /// Rate function.
    pub ease: Ease,
    /// Hold after the tweens finish.
    pub wait_after: f64,
    /// One tween per changed entity.
    pub tweens: Vec<Tween>,
}

impl StepPlan {
    /// Entities this step changes, in action order. Ghosts are excluded.
    pub fn targets(&self) -> Vec<String> {
        self.tweens
            .iter()
            .filter(|t| !matches!(t.kind, TweenKind::Ghost(_)))
            .map(|t| t.entity.clone())
            .collect()
    }

    /// Entities that leave the canvas when the step ends.
    pub fn exits(&self) -> impl Iterator<Item = &str> {
        self.tweens
            .iter()
            .filter(|t| t.exit)
            .map(|t| t.entity.as_str())
    }

    /// The scene as drawn at linear progress `t` in `[0, 1]`.
    pub fn sample(&self, scene: &SceneGraph, t: f64) -> SceneGraph {
        let e = self.ease.apply(t);
        let mut out = scene.clone();
        for tw in &self.tweens {
            let p = tw.from.lerp(tw.to, e);
            match &tw.kind {
                TweenKind::Item => {
                    if let Some(item) = out.item_mut(&tw.entity) {
                        apply_item(item, p);
                        item.on_canvas = true;
                    }
                }
                TweenKind::Connection => {
                    if let Some(conn) = out.connection_mut(&tw.entity) {
                        conn.style.color = p.color;
                        conn.opacity = p.opacity;
                        conn.reveal = p.reveal;
                        conn.on_canvas = true;
                    }
                }
                TweenKind::Ghost(src) => {
                    let mut ghost = VisualItem::clone(src);
                    ghost.id.clone_from(&tw.entity);
                    apply_item(&mut ghost, p);
                    ghost.on_canvas = true;
                    out.insert_transient(ghost);
                }
            }
        }
        out
    }

    /// Commit the end state of the step to `scene`.
    pub(crate) fn settle(&self, scene: &mut SceneGraph) {
        let e = self.ease.apply(1.0);
        for tw in &self.tweens {
            let p = tw.from.lerp(tw.to, e);
            match &tw.kind {
                TweenKind::Item => {
                    if let Some(item) = scene.item_mut(&tw.entity) {
                        apply_item(item, tw.restore.filter(|_| tw.exit).unwrap_or(p));
                        item.reveal = 1.0;
                        item.on_canvas = !tw.exit;
                    }
                }
                TweenKind::Connection => {
                    if let Some(conn) = scene.connection_mut(&tw.entity) {
                        let p = tw.restore.filter(|_| tw.exit).unwrap_or(p);
                        conn.style.color = p.color;
                        conn.opacity = p.opacity;
                        conn.reveal = 1.0;
                        conn.on_canvas = !tw.exit;
                    }
                }
                TweenKind::Ghost(_) => {}
            }
        }
    }
}

fn apply_item(item: &mut VisualItem, p: Props) {
    item.position = p.position;
    item.color = p.color;
    item.opacity = p.opacity;
    item.scale = p.scale;
    item.reveal = p.reveal;
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/plan.rs"]
mod tests;
