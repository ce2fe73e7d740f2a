use std::collections::BTreeMap;

use crate::{
    foundation::{
        color::Color,
        core::{FrameSpec, Point, Rect, Vec2},
        error::{SceneError, SceneResult},
    },
    layout::place,
};

/// Text line height in scene units per point of font size.
pub const TEXT_LINE_UNITS: f64 = 1.0 / 80.0;
/// Average glyph advance as a fraction of line height.
///
/// Layout never sees real glyph metrics; this estimate is what `next_to`/`arrange` use for text.
pub const TEXT_ADVANCE_RATIO: f64 = 0.55;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Drawable geometry of a [`VisualItem`], in scene units before scaling.
pub enum Shape {
    /// Outlined rectangle, optionally with rounded corners.
    Rect {
        /// Width.
        width: f64,
        /// Height.
        height: f64,
        /// Zero for square corners.
        #[serde(default)]
        corner_radius: f64,
    },
    /// Outlined circle.
    Circle {
        /// Radius.
        radius: f64,
    },
    /// Filled circle.
    Dot {
        /// Radius.
        radius: f64,
    },
    /// Straight line centred on the item position.
    Segment {
        /// Vector from the start point to the end point.
        delta: Vec2,
    },
    /// One or more lines of centred text.
    Text {
        /// Text; `\n` separates lines.
        content: String,
        /// Point size at the reference output height.
        font_size: f64,
    },
}

impl Shape {
    /// Unscaled bounding size.
    pub fn size(&self) -> Vec2 {
        match self {
            Self::Rect { width, height, .. } => Vec2::new(*width, *height),
            Self::Circle { radius } | Self::Dot { radius } => Vec2::new(radius * 2.0, radius * 2.0),
            Self::Segment { delta } => Vec2::new(delta.x.abs(), delta.y.abs()),
            Self::Text { content, font_size } => text_size(content, *font_size),
        }
    }
}

/// Estimated extent of a text block.
pub fn text_size(content: &str, font_size: f64) -> Vec2 {
    let line_h = font_size * TEXT_LINE_UNITS;
    let lines = content.split('\n').count().max(1);
    let longest = content
        .split('\n')
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);
    Vec2::new(
        longest as f64 * line_h * TEXT_ADVANCE_RATIO,
        lines as f64 * line_h,
    )
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Interior paint.
pub struct Fill {
    /// Fill colour.
    pub color: Color,
    /// Fill opacity in `[0, 1]`.
    pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A positioned entity: shape, colour, and placement state.
pub struct VisualItem {
    /// Unique id within the scene.
    pub id: String,
    /// Geometry, in scene units.
    pub shape: Shape,
    /// Centre of the item.
    pub position: Point,
    /// Stroke colour; text and dots use it as their fill.
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Interior paint; `None` leaves the shape hollow.
    pub fill: Option<Fill>,
    /// Stroke width in pixels at a 1080-pixel-tall output.
    pub stroke_width: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Uniform scale about the centre.
    pub scale: f64,
    /// Draw priority; ties fall back to insertion order.
    pub z: i32,
    /// Drawing progress in `[0, 1]`; below 1 only while an entry animation runs.
    pub reveal: f64,
    /// Whether the item is currently drawn.
    pub on_canvas: bool,
}

impl VisualItem {
    /// Item at the origin in white, not yet on canvas.
    pub fn new(id: impl Into<String>, shape: Shape) -> Self {
        let stroke_width = match shape {
            Shape::Text { .. } | Shape::Dot { .. } => 0.0,
            _ => 4.0,
        };
        Self {
            id: id.into(),
            shape,
            position: Point::ORIGIN,
            color: Color::WHITE,
            fill: None,
            stroke_width,
            opacity: 1.0,
            scale: 1.0,
            z: 0,
            reveal: 1.0,
            on_canvas: false,
        }
    }

    /// Sharp-cornered rectangle.
    pub fn rect(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self::new(
            id,
            Shape::Rect {
                width,
                height,
                corner_radius: 0.0,
            },
        )
    }

    /// Rectangle with rounded corners.
    pub fn rounded_rect(id: impl Into<String>, width: f64, height: f64, radius: f64) -> Self {
        Self::new(
            id,
            Shape::Rect {
                width,
                height,
                corner_radius: radius,
            },
        )
    }

    /// Outlined circle.
    pub fn circle(id: impl Into<String>, radius: f64) -> Self {
        Self::new(id, Shape::Circle { radius })
    }

    /// Filled dot.
    pub fn dot(id: impl Into<String>, radius: f64) -> Self {
        Self::new(id, Shape::Dot { radius })
    }

    /// Straight segment spanning `delta`, centred on the position.
    pub fn segment(id: impl Into<String>, delta: Vec2) -> Self {
        Self::new(id, Shape::Segment { delta })
    }

    /// Single- or multi-line text label.
    pub fn text(id: impl Into<String>, content: impl Into<String>, font_size: f64) -> Self {
        Self::new(
            id,
            Shape::Text {
                content: content.into(),
                font_size,
            },
        )
    }

    /// Place the centre at `position`.
    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Set the stroke colour.
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Fill the interior.
    pub fn fill(mut self, color: Color, opacity: f64) -> Self {
        self.fill = Some(Fill { color, opacity });
        self
    }

    /// Set the stroke width.
    pub fn stroke(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    /// Set the opacity.
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Set the draw priority.
    pub fn z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    /// Size after scaling.
    pub fn size(&self) -> Vec2 {
        self.shape.size() * self.scale
    }

    /// Axis-aligned bounds around the current position.
    pub fn bounds(&self) -> Rect {
        let s = self.size();
        Rect::from_center_size(self.position, (s.x, s.y))
    }

    fn validate(&self) -> SceneResult<()> {
        let dims = match &self.shape {
            Shape::Rect { width, height, .. } => vec![*width, *height],
            Shape::Circle { radius } | Shape::Dot { radius } => vec![*radius],
            Shape::Segment { delta } => vec![delta.hypot()],
            Shape::Text { font_size, .. } => vec![*font_size],
        };
        if dims.iter().any(|d| !d.is_finite() || *d <= 0.0) {
            return Err(SceneError::validation(format!(
                "item '{}' has a non-positive or non-finite size",
                self.id
            )));
        }
        if !(self.position.x.is_finite() && self.position.y.is_finite()) {
            return Err(SceneError::validation(format!(
                "item '{}' has a non-finite position",
                self.id
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Arrow heads drawn on a connection.
pub enum Tip {
    /// Plain line.
    None,
    #[default]
    /// Head at the `to` end.
    End,
    /// Heads at both ends.
    Both,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Where a connection meets its endpoints.
pub enum Attach {
    /// Centre to centre.
    #[default]
    Center,
    /// Clipped to each endpoint's outline.
    Boundary,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Stroke and tip styling of a connection.
pub struct ConnectionStyle {
    /// Stroke colour.
    pub color: Color,
    /// Pixels at a 1080-pixel-tall output.
    pub width: f64,
    /// Arrow heads.
    pub tip: Tip,
    /// Arc angle in radians; 0 draws a straight line.
    pub angle: f64,
    /// Upper bound on tip length as a fraction of the connection length.
    pub tip_ratio: f64,
}

impl Default for ConnectionStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            width: 4.0,
            tip: Tip::End,
            angle: 0.0,
            tip_ratio: 0.25,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Directed edge between two entities. Its geometry is derived from the endpoints on demand.
pub struct Connection {
    /// Unique id within the scene.
    pub id: String,
    /// Item or group id.
    pub from: String,
    /// Item or group id.
    pub to: String,
    /// Stroke and tip styling.
    pub style: ConnectionStyle,
    /// How the ends meet the endpoints.
    pub attach: Attach,
    /// Gap left at both ends after attachment.
    pub buff: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Drawing progress in `[0, 1]`.
    pub reveal: f64,
    /// Whether the connection is currently drawn.
    pub on_canvas: bool,
}

impl Connection {
    /// Straight arrow with a head at `to`, clipped to both outlines.
    pub fn arrow(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            style: ConnectionStyle::default(),
            attach: Attach::Boundary,
            buff: 0.1,
            opacity: 1.0,
            reveal: 1.0,
            on_canvas: false,
        }
    }

    /// Connection without arrow heads.
    pub fn line(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        let mut c = Self::arrow(id, from, to);
        c.style.tip = Tip::None;
        c
    }

    /// Set the stroke colour.
    pub fn color(mut self, color: Color) -> Self {
        self.style.color = color;
        self
    }

    /// Set the stroke width.
    pub fn width(mut self, width: f64) -> Self {
        self.style.width = width;
        self
    }

    /// Set the arrow heads.
    pub fn tip(mut self, tip: Tip) -> Self {
        self.style.tip = tip;
        self
    }

    /// Bend into an arc of `angle` radians.
    pub fn curved(mut self, angle: f64) -> Self {
        self.style.angle = angle;
        self
    }

    /// Cap tip length relative to the connection length.
    pub fn tip_ratio(mut self, ratio: f64) -> Self {
        self.style.tip_ratio = ratio;
        self
    }

    /// Choose centre or boundary attachment.
    pub fn attach(mut self, attach: Attach) -> Self {
        self.attach = attach;
        self
    }

    /// Gap left at both ends.
    pub fn buff(mut self, buff: f64) -> Self {
        self.buff = buff;
        self
    }

    /// Set the opacity.
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Named list of item/connection ids. Groups never contain groups.
pub struct Group {
    /// Unique id within the scene.
    pub id: String,
    /// Item and connection ids, in order.
    pub members: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What an id refers to.
pub enum EntityKind {
    /// A [`VisualItem`].
    Item,
    /// A [`Connection`].
    Connection,
    /// A [`Group`].
    Group,
}

#[derive(Clone, Debug, Default, serde::Serialize)]
/// Flat store of every entity in one scene.
pub struct SceneGraph {
    /// Visible region in scene units.
    pub frame: FrameSpec,
    /// Canvas colour.
    pub background: Color,
    pub(crate) items: BTreeMap<String, VisualItem>,
    pub(crate) connections: BTreeMap<String, Connection>,
    pub(crate) groups: BTreeMap<String, Group>,
    /// Insertion order of items and connections.
    pub(crate) order: Vec<String>,
}

impl SceneGraph {
    /// Empty graph.
    pub fn new(frame: FrameSpec, background: Color) -> Self {
        Self {
            frame,
            background,
            ..Self::default()
        }
    }

    // Lookup.

    /// Kind of entity registered under `id`.
    pub fn kind_of(&self, id: &str) -> Option<EntityKind> {
        if self.items.contains_key(id) {
            Some(EntityKind::Item)
        } else if self.connections.contains_key(id) {
            Some(EntityKind::Connection)
        } else if self.groups.contains_key(id) {
            Some(EntityKind::Group)
        } else {
            None
        }
    }

    /// Item by id.
    pub fn item(&self, id: &str) -> Option<&VisualItem> {
        self.items.get(id)
    }

    /// Connection by id.
    pub fn connection(&self, id: &str) -> Option<&Connection> {
        self.connections.get(id)
    }

    /// Group by id.
    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.get(id)
    }

    /// Every item, ordered by id.
    pub fn items(&self) -> impl Iterator<Item = &VisualItem> {
        self.items.values()
    }

    /// Every connection, ordered by id.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    // Authoring. Every insert validates and rejects duplicate ids.

    /// Add an item after validating its size and position.
    pub fn insert_item(&mut self, item: VisualItem) -> SceneResult<()> {
        item.validate()?;
        self.ensure_free(&item.id)?;
        self.order.push(item.id.clone());
        self.items.insert(item.id.clone(), item);
        Ok(())
    }

    /// Add a connection whose endpoints are existing items or groups.
    pub fn insert_connection(&mut self, conn: Connection) -> SceneResult<()> {
        self.ensure_free(&conn.id)?;
        for end in [&conn.from, &conn.to] {
            match self.kind_of(end) {
                Some(EntityKind::Item | EntityKind::Group) => {}
                Some(EntityKind::Connection) => {
                    return Err(SceneError::validation(format!(
                        "connection '{}' cannot attach to connection '{end}'",
                        conn.id
                    )));
                }
                None => {
                    return Err(SceneError::validation(format!(
                        "connection '{}' references unknown endpoint '{end}'",
                        conn.id
                    )));
                }
            }
        }
        if !conn.buff.is_finite() || conn.buff < 0.0 {
            return Err(SceneError::validation(format!(
                "connection '{}' buff must be finite and >= 0",
                conn.id
            )));
        }
        self.order.push(conn.id.clone());
        self.connections.insert(conn.id.clone(), conn);
        Ok(())
    }

    /// Add a group of existing items and connections.
    pub fn insert_group(&mut self, group: Group) -> SceneResult<()> {
        self.ensure_free(&group.id)?;
        if group.members.is_empty() {
            return Err(SceneError::validation(format!(
                "group '{}' must have at least one member",
                group.id
            )));
        }
        for m in &group.members {
            match self.kind_of(m) {
                Some(EntityKind::Item | EntityKind::Connection) => {}
                Some(EntityKind::Group) => {
                    return Err(SceneError::validation(format!(
                        "group '{}' cannot contain group '{m}'; list its members instead",
                        group.id
                    )));
                }
                None => {
                    return Err(SceneError::validation(format!(
                        "group '{}' references unknown member '{m}'",
                        group.id
                    )));
                }
            }
        }
        self.groups.insert(group.id.clone(), group);
        Ok(())
    }

    fn ensure_free(&self, id: &str) -> SceneResult<()> {
        if id.trim().is_empty() {
            return Err(SceneError::validation("entity id must be non-empty"));
        }
        if self.kind_of(id).is_some() {
            return Err(SceneError::validation(format!("duplicate entity id '{id}'")));
        }
        Ok(())
    }

    // In-place mutation for the builder and step sampling; skips validation.

    pub(crate) fn item_mut(&mut self, id: &str) -> Option<&mut VisualItem> {
        self.items.get_mut(id)
    }

    pub(crate) fn connection_mut(&mut self, id: &str) -> Option<&mut Connection> {
        self.connections.get_mut(id)
    }

    /// Short-lived item shown only while one step samples; never part of the authored scene.
    pub(crate) fn insert_transient(&mut self, item: VisualItem) {
        self.order.push(item.id.clone());
        self.items.insert(item.id.clone(), item);
    }

    // Queries over the current state.

    /// Item and connection ids a target id stands for. Groups expand to their members.
    pub fn expand(&self, id: &str) -> SceneResult<Vec<String>> {
        match self.kind_of(id) {
            Some(EntityKind::Item | EntityKind::Connection) => Ok(vec![id.to_owned()]),
            Some(EntityKind::Group) => Ok(self.groups[id].members.clone()),
            None => Err(SceneError::authoring(format!("unknown entity '{id}'"))),
        }
    }

    /// Whether an item or connection is currently drawn.
    pub fn is_on_canvas(&self, id: &str) -> bool {
        self.items
            .get(id)
            .map(|i| i.on_canvas)
            .or_else(|| self.connections.get(id).map(|c| c.on_canvas))
            .unwrap_or(false)
    }

    /// Ids currently on canvas, in insertion order.
    pub fn on_canvas(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|id| self.is_on_canvas(id))
            .cloned()
            .collect()
    }

    /// Items and connections in paint order: `z`, then insertion order.
    pub fn paint_order(&self) -> Vec<&str> {
        let mut keyed: Vec<(i32, usize, &str)> = self
            .order
            .iter()
            .enumerate()
            .map(|(idx, id)| {
                let z = self.items.get(id).map(|i| i.z).unwrap_or(0);
                (z, idx, id.as_str())
            })
            .collect();
        keyed.sort();
        keyed.into_iter().map(|(_, _, id)| id).collect()
    }

    /// Bounding rectangle of an item, connection, or group.
    pub fn bounds_of(&self, id: &str) -> SceneResult<Rect> {
        if let Some(item) = self.items.get(id) {
            return Ok(item.bounds());
        }
        if let Some(conn) = self.connections.get(id) {
            let (a, b) = self.endpoints(conn)?;
            return Ok(Rect::from_points(a, b));
        }
        if let Some(group) = self.groups.get(id) {
            // Items define a group's footprint; connections only count when it has no items.
            let items = group.members.iter().filter_map(|m| self.items.get(m));
            if let Some(r) = place::bounds_union(items.map(VisualItem::bounds)) {
                return Ok(r);
            }
            let all = group
                .members
                .iter()
                .map(|m| self.bounds_of(m))
                .collect::<SceneResult<Vec<_>>>()?;
            return place::bounds_union(all)
                .ok_or_else(|| SceneError::authoring(format!("group '{id}' is empty")));
        }
        Err(SceneError::authoring(format!("unknown entity '{id}'")))
    }

    /// Centre of the bounds of an item, connection, or group.
    pub fn center_of(&self, id: &str) -> SceneResult<Point> {
        Ok(self.bounds_of(id)?.center())
    }

    /// Current start/end points of a connection.
    pub fn endpoints(&self, conn: &Connection) -> SceneResult<(Point, Point)> {
        let a = self.center_of(&conn.from)?;
        let b = self.center_of(&conn.to)?;
        let d = b - a;
        let len = d.hypot();
        if len < 1e-9 {
            return Ok((a, b));
        }
        let u = d / len;
        let (mut start, mut end) = (0.0, len);
        if conn.attach == Attach::Boundary {
            start += self.exit_distance(&conn.from, u)?;
            end -= self.exit_distance(&conn.to, -u)?;
        }
        start += conn.buff;
        end -= conn.buff;
        if end <= start {
            let mid = a + u * ((start + end) * 0.5).clamp(0.0, len);
            return Ok((mid, mid));
        }
        Ok((a + u * start, a + u * end))
    }

    /// Distance from an entity's centre to its outline along `u`.
    fn exit_distance(&self, id: &str, u: Vec2) -> SceneResult<f64> {
        if let Some(item) = self.items.get(id) {
            if let Shape::Circle { radius } | Shape::Dot { radius } = item.shape {
                return Ok(radius * item.scale);
            }
        }
        let r = self.bounds_of(id)?;
        let hw = r.width() * 0.5;
        let hh = r.height() * 0.5;
        let tx = if u.x.abs() > 1e-12 { hw / u.x.abs() } else { f64::INFINITY };
        let ty = if u.y.abs() > 1e-12 { hh / u.y.abs() } else { f64::INFINITY };
        let t = tx.min(ty);
        Ok(if t.is_finite() { t } else { 0.0 })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
