//! Demo graph and the per-frame display records derived from it.

use serde::Deserialize;

use crate::camera::Camera;
use crate::color::Color;
use crate::display::{EdgeDisplayData, EdgeKind, NodeDisplayData, RenderQuality};
use crate::groups::{EdgeGroup, assign_groups};
use crate::labels::{self, LabelCanvas, LabelLayout, TextMeasure};
use crate::math::Point;
use crate::settings::RenderSettings;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SceneNode {
    pub name: String,
    pub x: f32,
    pub y: f32,
    /// Radius in pixels at zoom ratio 1.
    pub size: f32,
    #[serde(default)]
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SceneEdge {
    pub source: usize,
    pub target: usize,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_edge_size")]
    pub size: f32,
    #[serde(default)]
    pub color: Color,
    /// Draw as a straight edge clamped at the target. Self-loops ignore it.
    #[serde(default)]
    pub straight: bool,
    /// Fixed control point in graph coordinates.
    #[serde(default)]
    pub control: Option<[f32; 2]>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub selected: bool,
}

fn default_edge_size() -> f32 {
    2.0
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
}

/// One edge ready for the programs.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameEdge {
    pub id: usize,
    pub source: NodeDisplayData,
    pub target: NodeDisplayData,
    pub edge: EdgeDisplayData,
    pub hidden: bool,
}

/// Edges sorted by the program that draws their body. Every straight and
/// curved edge also gets an arrowhead; self-loops get a self arrowhead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub straight: Vec<FrameEdge>,
    pub curved: Vec<FrameEdge>,
    pub self_loops: Vec<FrameEdge>,
    pub quality: RenderQuality,
}

impl Frame {
    pub fn visible_edges(&self) -> usize {
        self.straight
            .iter()
            .chain(&self.curved)
            .chain(&self.self_loops)
            .filter(|e| !e.hidden)
            .count()
    }

    /// Edges drawn with the curved arrowhead program, in offset order.
    pub fn arrow_edges(&self) -> impl Iterator<Item = &FrameEdge> {
        self.straight.iter().chain(&self.curved)
    }
}

impl Scene {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let scene: Scene = serde_json::from_str(json)?;
        scene.check()?;
        Ok(scene)
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        use anyhow::Context;

        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scene from {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("in {}", path.display()))
    }

    fn check(&self) -> anyhow::Result<()> {
        for (i, edge) in self.edges.iter().enumerate() {
            if edge.source >= self.nodes.len() || edge.target >= self.nodes.len() {
                anyhow::bail!(
                    "edge {i} references node {} but the scene has {} nodes",
                    edge.source.max(edge.target),
                    self.nodes.len()
                );
            }
        }
        Ok(())
    }

    /// A small directory graph with parallel, reverse, straight and
    /// self-referencing edges.
    pub fn sample() -> Self {
        let node = |name: &str, x, y, size| SceneNode {
            name: name.to_string(),
            x,
            y,
            size,
            highlighted: false,
        };
        let edge = |source, target, label: &str, color| SceneEdge {
            source,
            target,
            label: Some(label.to_string()),
            size: default_edge_size(),
            color,
            straight: false,
            control: None,
            hidden: false,
            selected: false,
        };

        let member = Color::rgb(0x55, 0x5a, 0x64);
        let admin = Color::rgb(0xc0, 0x39, 0x2b);
        let session = Color::rgb(0x27, 0x80, 0x60);

        let mut edges = vec![
            edge(1, 0, "MemberOf", member),
            edge(2, 0, "MemberOf", member),
            edge(0, 3, "AdminTo", admin),
            edge(0, 3, "GenericAll", admin),
            edge(3, 0, "HasSession", session),
            edge(1, 1, "Owns", member),
            edge(1, 1, "WriteDacl", admin),
            edge(2, 3, "CanRDP", session),
            edge(1, 2, "ForceChangePassword", admin),
        ];
        edges[7].straight = true;
        edges[8].control = Some([0.5, 0.75]);

        let mut nodes = vec![
            node("DOMAIN ADMINS", 0.5, 0.2, 14.0),
            node("ALICE", 0.2, 0.6, 10.0),
            node("BOB", 0.8, 0.6, 10.0),
            node("DC01", 0.5, 0.95, 12.0),
        ];
        nodes[0].highlighted = true;

        Self { nodes, edges }
    }

    fn edge_display(&self, edge: &SceneEdge, inverse_sqrt_zoom_ratio: f32) -> EdgeDisplayData {
        let kind = if edge.source == edge.target {
            EdgeKind::SelfLoop
        } else if edge.straight {
            EdgeKind::Straight
        } else {
            EdgeKind::Curved
        };

        EdgeDisplayData {
            size: edge.size,
            color: edge.color,
            label: edge.label.clone(),
            control: edge.control.map(Point::from),
            inverse_sqrt_zoom_ratio,
            selected: edge.selected,
            kind,
            ..Default::default()
        }
    }

    /// Group slots per edge. Straight edges are drawn as lines whatever
    /// their siblings do, so they neither join a group nor take a slot.
    fn groups(&self) -> Vec<Option<EdgeGroup>> {
        let grouped = |e: &SceneEdge| !e.straight || e.source == e.target;

        let pairs: Vec<_> = self
            .edges
            .iter()
            .filter(|e| grouped(e))
            .map(|e| (e.source, e.target))
            .collect();
        let mut groups = assign_groups(&pairs).into_iter();

        self.edges
            .iter()
            .map(|e| if grouped(e) { groups.next() } else { None })
            .collect()
    }

    /// Display records in graph space for the GPU programs.
    pub fn frame(
        &self,
        camera: &Camera,
        viewport: (f32, f32),
        settings: &RenderSettings,
        quality_override: Option<RenderQuality>,
    ) -> Frame {
        let groups = self.groups();
        let inverse_sqrt_zoom = camera.inverse_sqrt_zoom_ratio();

        let mut frame = Frame::default();

        for (id, (scene_edge, group)) in self.edges.iter().zip(groups).enumerate() {
            let (Some(source), Some(target)) = (
                self.nodes.get(scene_edge.source),
                self.nodes.get(scene_edge.target),
            ) else {
                log::warn!("edge {id} has a dangling endpoint, skipping");
                continue;
            };

            let mut edge = self.edge_display(scene_edge, inverse_sqrt_zoom);
            if let Some(group) = group {
                group.apply(&mut edge);
            }

            let entry = FrameEdge {
                id,
                source: camera.frame_node(&display_node(source), viewport),
                target: camera.frame_node(&display_node(target), viewport),
                edge,
                hidden: scene_edge.hidden,
            };

            match entry.edge.kind {
                EdgeKind::SelfLoop => frame.self_loops.push(entry),
                EdgeKind::Straight => frame.straight.push(entry),
                EdgeKind::Curved => frame.curved.push(entry),
            }
        }

        frame.quality =
            quality_override.unwrap_or_else(|| settings.arrow_quality(frame.visible_edges()));
        frame
    }

    /// Draws every visible label in viewport space and returns the layouts
    /// for hit testing.
    pub fn draw_labels<C: LabelCanvas, M: TextMeasure>(
        &self,
        canvas: &mut C,
        measure: &M,
        camera: &Camera,
        viewport: (f32, f32),
        settings: &RenderSettings,
    ) -> Vec<(usize, LabelLayout)> {
        let frame = self.frame(camera, viewport, settings, None);
        let mut layouts = Vec::new();

        for entry in frame
            .straight
            .iter()
            .chain(&frame.curved)
            .chain(&frame.self_loops)
            .filter(|e| !e.hidden)
        {
            let source = camera.viewport_node(&entry.source, viewport);
            let target = camera.viewport_node(&entry.target, viewport);
            let mut edge = entry.edge.clone();
            edge.control = edge
                .control
                .map(|control| camera.graph_to_viewport(control, viewport));

            if let Some(layout) = labels::draw_edge_label(
                canvas,
                measure,
                &source,
                &target,
                &edge,
                camera.ratio,
                settings,
            ) {
                layouts.push((entry.id, layout));
            }
        }

        layouts
    }

    /// Flips selection on an edge, returning its new state.
    pub fn toggle_selected(&mut self, id: usize) -> Option<bool> {
        let edge = self.edges.get_mut(id)?;
        edge.selected = !edge.selected;
        Some(edge.selected)
    }
}

fn display_node(node: &SceneNode) -> NodeDisplayData {
    NodeDisplayData {
        highlighted: node.highlighted,
        ..NodeDisplayData::new(node.x, node.y, node.size)
    }
}
