#![allow(dead_code)]
use multipatch_bridge::prelude::*;

pub fn nid(u: u64) -> NodeId {
    NodeId::new(u).unwrap()
}

pub fn knots(values: &[f64]) -> KnotArray1D<f64> {
    values.iter().copied().collect()
}

/// Open uniform knot vector with `spans` spans of degree `p` on `[0, spans]`.
pub fn open_uniform(spans: usize, p: usize) -> KnotArray1D<f64> {
    let mut v = vec![0.0; p];
    v.extend((0..=spans).map(|i| i as f64));
    v.extend(std::iter::repeat_n(spans as f64, p));
    knots(&v)
}

/// Plate with `su` quadratic spans in u and `sv` linear spans in v.
///
/// Control point `(i, j)` sits at `(x0 + i, j, 0)` with weight `1 + i/10`.
pub fn plate_with_spans(id: usize, x0: f64, su: usize, sv: usize) -> Patch {
    let space =
        BSplineFESpace::new(vec![open_uniform(su, 2), open_uniform(sv, 1)], vec![2, 1]).unwrap();
    let (nu, nv) = (space.number(0), space.number(1));
    let mut pts = Vec::with_capacity(nu * nv);
    for j in 0..nv {
        for i in 0..nu {
            pts.push(ControlPoint::new(x0 + i as f64, j as f64, 0.0, 1.0 + i as f64 / 10.0));
        }
    }
    Patch::new(id, space, ControlGrid::structured(vec![nu, nv], pts).unwrap()).unwrap()
}

/// Two quadratic spans in u (4 functions), one linear span in v (2 functions).
pub fn plate(id: usize, x0: f64) -> Patch {
    plate_with_spans(id, x0, 2, 1)
}

pub fn single_plate() -> MultiPatch {
    let mut mp = MultiPatch::new();
    mp.add_patch(plate(1, 0.0)).unwrap();
    mp
}

/// Plates 1 and 2 side by side, glued along x = 3.
pub fn two_glued_plates() -> MultiPatch {
    let mut mp = MultiPatch::new();
    mp.add_patch(plate(1, 0.0)).unwrap();
    mp.add_patch(plate(2, 3.0)).unwrap();
    mp.glue(1, BoundarySide::Right, 2, BoundarySide::Left).unwrap();
    mp
}

/// Volume with two quadratic spans in u, one linear span in v and two
/// quadratic spans in w (4 × 2 × 4 functions, 4 cells).
///
/// Control point `(i, j, k)` sits at `(x0 + i, j, k)` with weight
/// `1 + x/10 + z/100`, so glued volumes agree on interface weights.
pub fn volume(id: usize, x0: f64) -> Patch {
    let space = BSplineFESpace::new(
        vec![open_uniform(2, 2), open_uniform(1, 1), open_uniform(2, 2)],
        vec![2, 1, 2],
    )
    .unwrap();
    let (nu, nv, nw) = (space.number(0), space.number(1), space.number(2));
    let mut pts = Vec::with_capacity(nu * nv * nw);
    for k in 0..nw {
        for j in 0..nv {
            for i in 0..nu {
                let (x, z) = (x0 + i as f64, k as f64);
                pts.push(ControlPoint::new(x, j as f64, z, volume_weight(x, z)));
            }
        }
    }
    Patch::new(id, space, ControlGrid::structured(vec![nu, nv, nw], pts).unwrap()).unwrap()
}

pub fn volume_weight(x: f64, z: f64) -> f64 {
    1.0 + x / 10.0 + z / 100.0
}

/// Volumes 1 and 2 side by side, glued along the face x = 3.
pub fn two_glued_volumes() -> MultiPatch {
    let mut mp = MultiPatch::new();
    mp.add_patch(volume(1, 0.0)).unwrap();
    mp.add_patch(volume(2, 3.0)).unwrap();
    mp.glue(1, BoundarySide::Right, 2, BoundarySide::Left).unwrap();
    mp
}

pub fn catalog() -> EntityCatalog {
    let mut c = EntityCatalog::new();
    c.elements.register_isogeometric("Bezier2D");
    c.elements.register_isogeometric("Bezier3D");
    c.conditions.register_isogeometric("LineLoad");
    c.conditions.register_isogeometric("SurfaceLoad");
    c
}

pub fn bridge(mp: MultiPatch) -> MultiPatchModelPart {
    MultiPatchModelPart::new(mp.into_shared(), catalog(), BridgeOptions::default()).unwrap()
}

/// Bridge that went through begin + create_nodes.
pub fn bridge_with_nodes(mp: MultiPatch) -> MultiPatchModelPart {
    let mut b = bridge(mp);
    b.begin_model_part().unwrap();
    b.create_nodes().unwrap();
    b
}

/// Bridge with nodes and elements for every patch, finalized.
pub fn ready_bridge(mp: MultiPatch) -> MultiPatchModelPart {
    let ids: Vec<usize> = mp.iter().map(|p| p.id()).collect();
    let mut b = bridge_with_nodes(mp);
    let mut next = 1;
    for id in ids {
        next += b.add_elements(id, "Bezier2D", next, 1).unwrap().len();
    }
    b.end_model_part();
    b
}
