use crate::{
    animation::ease::Ease,
    foundation::{
        color::Color,
        core::{Point, Vec2},
        error::{SceneError, SceneResult},
    },
};

/// Default step duration in seconds.
pub const DEFAULT_RUN_TIME: f64 = 1.0;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// What an action applies to.
pub enum Target {
    /// An item, connection, or group id.
    Id(String),
    /// Everything on canvas when the step starts.
    OnCanvas,
}

impl From<&str> for Target {
    fn from(value: &str) -> Self {
        Self::Id(value.to_owned())
    }
}

impl From<String> for Target {
    fn from(value: String) -> Self {
        Self::Id(value)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Property changes for [`Op::Animate`]. Unset fields keep their current value.
pub struct PropChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Absolute destination for the centre.
    pub move_to: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Relative offset.
    pub shift: Option<Vec2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Target fill and stroke colour.
    pub color: Option<Color>,
    /// Multiplier on the current scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Target opacity in `[0, 1]`.
    pub opacity: Option<f64>,
}

impl PropChange {
    /// Move the centre to `p`.
    pub fn move_to(mut self, p: Point) -> Self {
        self.move_to = Some(p);
        self
    }

    /// Shift by `v`.
    pub fn shift(mut self, v: Vec2) -> Self {
        self.shift = Some(v);
        self
    }

    /// Recolour to `c`.
    pub fn color(mut self, c: Color) -> Self {
        self.color = Some(c);
        self
    }

    /// Multiply the scale by `s`.
    pub fn scale(mut self, s: f64) -> Self {
        self.scale = Some(s);
        self
    }

    /// Tween opacity to `o`.
    pub fn opacity(mut self, o: f64) -> Self {
        self.opacity = Some(o);
        self
    }

    /// True when no property is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
/// Animation kind, tagged as `op` in JSON.
pub enum Op {
    /// Draw the outline in.
    Appear,
    /// Scale up from nothing.
    Grow,
    /// Reveal text character by character.
    Write,
    /// Fade from transparent while moving by `shift` into place.
    FadeIn {
        /// Offset travelled on the way in.
        shift: Vec2,
    },
    /// Fade to transparent while moving by `shift`, then leave the canvas.
    FadeOut {
        /// Offset travelled on the way out.
        shift: Vec2,
    },
    /// Tween properties of something already on canvas.
    Animate(PropChange),
    /// Swap the target for `replacement`, placed at the target's centre.
    TransformInto {
        /// Entity that takes the target's place.
        replacement: String,
    },
    /// Morph a copy of the target into `replacement`; the target stays.
    CopyInto {
        /// Entity the copy turns into.
        replacement: String,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One animation applied to a target.
pub struct Action {
    /// Entity, group or canvas the op applies to.
    pub target: Target,
    #[serde(flatten)]
    /// What happens to the target.
    pub op: Op,
}

impl Action {
    /// Action running `op` on `target`.
    pub fn new(target: impl Into<Target>, op: Op) -> Self {
        Self {
            target: target.into(),
            op,
        }
    }

    /// Draw `id` in.
    pub fn appear(id: impl Into<Target>) -> Self {
        Self::new(id, Op::Appear)
    }

    /// Scale `id` up from nothing.
    pub fn grow(id: impl Into<Target>) -> Self {
        Self::new(id, Op::Grow)
    }

    /// Write `id` out character by character.
    pub fn write(id: impl Into<Target>) -> Self {
        Self::new(id, Op::Write)
    }

    /// Fade `id` in where it stands.
    pub fn fade_in(id: impl Into<Target>) -> Self {
        Self::fade_in_from(id, Vec2::ZERO)
    }

    /// Fade in while travelling along `shift` to the authored position.
    pub fn fade_in_from(id: impl Into<Target>, shift: Vec2) -> Self {
        Self::new(id, Op::FadeIn { shift })
    }

    /// Fade `id` out in place and remove it.
    pub fn fade_out(id: impl Into<Target>) -> Self {
        Self::fade_out_by(id, Vec2::ZERO)
    }

    /// Fade `id` out while travelling along `shift`.
    pub fn fade_out_by(id: impl Into<Target>, shift: Vec2) -> Self {
        Self::new(id, Op::FadeOut { shift })
    }

    /// Fade out everything on canvas.
    pub fn clear(shift: Vec2) -> Self {
        Self::new(Target::OnCanvas, Op::FadeOut { shift })
    }

    /// Tween the properties in `change`.
    pub fn animate(id: impl Into<Target>, change: PropChange) -> Self {
        Self::new(id, Op::Animate(change))
    }

    /// Move `id` to `p`.
    pub fn move_to(id: impl Into<Target>, p: Point) -> Self {
        Self::animate(id, PropChange::default().move_to(p))
    }

    /// Shift `id` by `v`.
    pub fn shift(id: impl Into<Target>, v: Vec2) -> Self {
        Self::animate(id, PropChange::default().shift(v))
    }

    /// Recolour `id`.
    pub fn recolor(id: impl Into<Target>, c: Color) -> Self {
        Self::animate(id, PropChange::default().color(c))
    }

    /// Scale `id` by `s`.
    pub fn scale(id: impl Into<Target>, s: f64) -> Self {
        Self::animate(id, PropChange::default().scale(s))
    }

    /// Tween the opacity of `id` to `o`.
    pub fn set_opacity(id: impl Into<Target>, o: f64) -> Self {
        Self::animate(id, PropChange::default().opacity(o))
    }

    /// Replace `id` with `replacement`.
    pub fn transform_into(id: impl Into<Target>, replacement: impl Into<String>) -> Self {
        Self::new(
            id,
            Op::TransformInto {
                replacement: replacement.into(),
            },
        )
    }

    /// Morph a copy of `id` into `replacement`.
    pub fn copy_into(id: impl Into<Target>, replacement: impl Into<String>) -> Self {
        Self::new(
            id,
            Op::CopyInto {
                replacement: replacement.into(),
            },
        )
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Actions that start together and share one run time and ease.
pub struct TimelineStep {
    /// Actions started together.
    pub actions: Vec<Action>,
    /// Animation length in seconds.
    pub run_time: f64,
    /// Rate function shared by every action.
    pub ease: Ease,
    /// Pause after the animation, in seconds.
    pub wait_after: f64,
}

impl TimelineStep {
    /// Step with the default run time and ease.
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            run_time: DEFAULT_RUN_TIME,
            ease: Ease::default(),
            wait_after: 0.0,
        }
    }

    /// A step with no actions that only holds the canvas.
    pub fn pause(secs: f64) -> Self {
        Self {
            actions: Vec::new(),
            run_time: 0.0,
            ease: Ease::Linear,
            wait_after: secs,
        }
    }

    /// Set the animation length.
    pub fn run_time(mut self, secs: f64) -> Self {
        self.run_time = secs;
        self
    }

    /// Set the rate function.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Set the pause after the animation.
    pub fn wait(mut self, secs: f64) -> Self {
        self.wait_after = secs;
        self
    }

    /// Wall time this step occupies, whatever its action count.
    pub fn elapsed(&self) -> f64 {
        self.run_time + self.wait_after
    }

    /// Check durations and animate arguments; `index` labels errors.
    pub fn validate(&self, index: usize) -> SceneResult<()> {
        for (name, v) in [("run_time", self.run_time), ("wait", self.wait_after)] {
            if !v.is_finite() || v < 0.0 {
                return Err(SceneError::authoring(format!(
                    "step {index}: {name} must be finite and >= 0, got {v}"
                )));
            }
        }
        if !self.actions.is_empty() && self.run_time <= 0.0 {
            return Err(SceneError::authoring(format!(
                "step {index}: a step with actions needs a positive run_time"
            )));
        }
        for a in &self.actions {
            if let Op::Animate(change) = &a.op {
                if change.is_empty() {
                    return Err(SceneError::authoring(format!(
                        "step {index}: animate with no property changes"
                    )));
                }
                if let Some(s) = change.scale
                    && (!s.is_finite() || s < 0.0)
                {
                    return Err(SceneError::authoring(format!(
                        "step {index}: scale must be finite and >= 0"
                    )));
                }
                if let Some(o) = change.opacity
                    && !(0.0..=1.0).contains(&o)
                {
                    return Err(SceneError::authoring(format!(
                        "step {index}: opacity must be in [0, 1]"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Ordered steps of a scene.
pub struct Timeline {
    /// Steps in playback order.
    pub steps: Vec<TimelineStep>,
}

impl Timeline {
    /// Append a step.
    pub fn push(&mut self, step: TimelineStep) {
        self.steps.push(step);
    }

    /// Extend the last step's wait, or open with a pause if nothing was played yet.
    pub fn wait(&mut self, secs: f64) {
        match self.steps.last_mut() {
            Some(last) => last.wait_after += secs,
            None => self.steps.push(TimelineStep::pause(secs)),
        }
    }

    /// Sum of every step's run time and wait.
    pub fn total_duration(&self) -> f64 {
        self.steps.iter().map(TimelineStep::elapsed).sum()
    }

    /// Validate every step.
    pub fn validate(&self) -> SceneResult<()> {
        for (i, s) in self.steps.iter().enumerate() {
            s.validate(i)?;
        }
        Ok(())
    }

    /// Every explicit id named by an action, including replacements.
    pub fn referenced_ids(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().flat_map(|s| s.actions.iter()).flat_map(|a| {
            let target = match &a.target {
                Target::Id(id) => Some(id.as_str()),
                Target::OnCanvas => None,
            };
            let replacement = match &a.op {
                Op::TransformInto { replacement } | Op::CopyInto { replacement } => {
                    Some(replacement.as_str())
                }
                _ => None,
            };
            target.into_iter().chain(replacement)
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/step.rs"]
mod tests;
