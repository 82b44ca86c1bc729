//! Test fixture: a small lattice navigation graph with per-node area
//! classes and crowd density.

use glam::Vec3;
use wayplan_core::{AreaMask, NavGraph, NavNode};

pub(crate) struct GridNav {
    positions: Vec<Vec3>,
    edges: Vec<Vec<u32>>,
    walkable: Vec<bool>,
    area: Vec<u32>,
    density: Vec<f32>,
    width: i32,
}

impl GridNav {
    /// A fully open `width x height` lattice, nodes at integer world
    /// coordinates on the XZ plane, 4-connected.
    pub(crate) fn open(width: i32, height: i32) -> Self {
        let n = (width * height) as usize;
        let mut positions = Vec::with_capacity(n);
        for z in 0..height {
            for x in 0..width {
                positions.push(Vec3::new(x as f32, 0.0, z as f32));
            }
        }
        let mut edges = vec![Vec::new(); n];
        for z in 0..height {
            for x in 0..width {
                let i = (z * width + x) as usize;
                for (dx, dz) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                    let (nx, nz) = (x + dx, z + dz);
                    if nx >= 0 && nz >= 0 && nx < width && nz < height {
                        edges[i].push((nz * width + nx) as u32);
                    }
                }
            }
        }
        Self {
            positions,
            edges,
            walkable: vec![true; n],
            area: vec![0; n],
            density: vec![0.0; n],
            width,
        }
    }

    /// A chain of nodes at the given x coordinates, consecutive nodes
    /// connected. Handy for exact-edge-length assertions.
    pub(crate) fn line(xs: &[f32]) -> Self {
        let n = xs.len();
        let positions: Vec<Vec3> = xs.iter().map(|&x| Vec3::new(x, 0.0, 0.0)).collect();
        let mut edges = vec![Vec::new(); n];
        for i in 1..n {
            edges[i - 1].push(i as u32);
            edges[i].push((i - 1) as u32);
        }
        Self {
            positions,
            edges,
            walkable: vec![true; n],
            area: vec![0; n],
            density: vec![0.0; n],
            width: n as i32,
        }
    }

    fn idx(&self, x: i32, z: i32) -> usize {
        (z * self.width + x) as usize
    }

    pub(crate) fn block(&mut self, x: i32, z: i32) {
        let i = self.idx(x, z);
        self.walkable[i] = false;
    }

    pub(crate) fn set_density(&mut self, x: i32, z: i32, density: f32) {
        let i = self.idx(x, z);
        self.density[i] = density;
    }

    pub(crate) fn set_area(&mut self, x: i32, z: i32, class: u32) {
        let i = self.idx(x, z);
        self.area[i] = class;
    }
}

impl NavGraph for GridNav {
    fn node_count(&self) -> usize {
        self.positions.len()
    }

    fn nearest_node(&self, point: Vec3, radius: f32, mask: AreaMask) -> Option<NavNode> {
        let mut best: Option<(usize, f32)> = None;
        for (i, pos) in self.positions.iter().enumerate() {
            if !self.walkable[i] || !mask.allows(self.area[i]) {
                continue;
            }
            let d = pos.distance(point);
            if d <= radius && best.is_none_or(|(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| NavNode(i as u32))
    }

    fn position(&self, node: NavNode) -> Vec3 {
        self.positions[node.index()]
    }

    fn neighbors(&self, node: NavNode, mask: AreaMask, buf: &mut Vec<NavNode>) {
        for &n in &self.edges[node.index()] {
            let i = n as usize;
            if self.walkable[i] && mask.allows(self.area[i]) {
                buf.push(NavNode(n));
            }
        }
    }

    fn density(&self, node: NavNode) -> f32 {
        self.density[node.index()]
    }
}
