mod util;

use multipatch_bridge::prelude::*;
use proptest::prelude::*;
use util::*;

fn temperature() -> Variable {
    Variable::scalar("TEMPERATURE")
}

fn displacement() -> Variable {
    Variable::vector("DISPLACEMENT", 3)
}

#[test]
fn forward_copies_patch_fields_to_nodes() {
    let mut mp = single_plate();
    let temp = temperature();
    {
        let grid = mp.patch_mut(1).unwrap().create_field(&temp);
        for i in 0..8 {
            grid.set(i, &[10.0 * i as f64]).unwrap();
        }
    }
    let mut b = ready_bridge(mp);
    b.synchronize_forward(&temp).unwrap();
    for eq in 0..8 {
        let node = b.node_id_map().node_id(eq);
        assert_eq!(
            b.mesh().solution_step_value(&temp, node).unwrap(),
            &[10.0 * eq as f64]
        );
    }
}

#[test]
fn forward_without_patch_field_is_a_lookup_error() {
    let mut b = ready_bridge(single_plate());
    let err = b.synchronize_forward(&temperature()).unwrap_err();
    assert_eq!(
        err,
        BridgeError::MissingField {
            patch: 1,
            field: "TEMPERATURE".into()
        }
    );
    assert_eq!(err.kind(), ErrorKind::Lookup);
}

#[test]
fn backward_creates_missing_grids() {
    let mut b = ready_bridge(two_glued_plates());
    let disp = displacement();
    let nodes: Vec<NodeId> = b.mesh().node_ids().collect();
    for n in &nodes {
        let v = n.get() as f64;
        b.mesh_mut()
            .set_solution_step_value(&disp, *n, &[v, -v, 0.5 * v])
            .unwrap();
    }
    b.synchronize_backward(&disp).unwrap();

    let mp = b.multipatch().read();
    for patch in mp.iter() {
        let grid = patch.field(&disp).unwrap();
        assert_eq!(grid.len(), patch.total_number());
        for (local, &eq) in patch.fe_space().function_indices().iter().enumerate() {
            let v = (eq + 1) as f64;
            assert_eq!(grid.get(local).unwrap(), &[v, -v, 0.5 * v]);
        }
    }
    // interface control points received the shared node value on both sides
    let p1 = mp.patch(1).unwrap().field(&disp).unwrap().get(3).unwrap().to_vec();
    let p2 = mp.patch(2).unwrap().field(&disp).unwrap().get(0).unwrap().to_vec();
    assert_eq!(p1, p2);
}

#[test]
fn backward_without_nodal_values_is_a_lookup_error() {
    let mut b = ready_bridge(single_plate());
    assert_eq!(
        b.synchronize_backward(&temperature()).unwrap_err(),
        BridgeError::MissingVariable("TEMPERATURE".into())
    );
}

#[test]
fn synchronization_is_skipped_until_ready() {
    let mut mp = single_plate();
    let temp = temperature();
    mp.patch_mut(1).unwrap().create_field(&temp);
    let mut b = bridge_with_nodes(mp);
    b.add_elements(1, "Bezier2D", 1, 1).unwrap();
    assert!(!b.is_ready());

    b.synchronize_forward(&temp).unwrap();
    assert!(!b.mesh().has_nodal_variable(&temp));

    let disp = displacement();
    b.synchronize_backward(&disp).unwrap();
    assert!(!b.multipatch().read().patch(1).unwrap().has_field(&disp));
}

proptest! {
    #[test]
    fn backward_then_forward_preserves_nodal_values(
        values in prop::collection::vec(-1.0e6f64..1.0e6, 14)
    ) {
        let mut b = ready_bridge(two_glued_plates());
        let temp = temperature();
        let nodes: Vec<NodeId> = b.mesh().node_ids().collect();
        prop_assert_eq!(nodes.len(), values.len());
        for (n, v) in nodes.iter().zip(&values) {
            b.mesh_mut().set_solution_step_value(&temp, *n, &[*v]).unwrap();
        }

        b.synchronize_backward(&temp).unwrap();
        b.synchronize_forward(&temp).unwrap();

        for (n, v) in nodes.iter().zip(&values) {
            prop_assert_eq!(b.mesh().solution_step_value(&temp, *n).unwrap(), &[*v]);
        }
    }

    #[test]
    fn forward_then_backward_preserves_patch_values(
        values in prop::collection::vec(-1.0e3f64..1.0e3, 8)
    ) {
        let mut mp = single_plate();
        let temp = temperature();
        {
            let grid = mp.patch_mut(1).unwrap().create_field(&temp);
            for (i, v) in values.iter().enumerate() {
                grid.set(i, &[*v]).unwrap();
            }
        }
        let mut b = ready_bridge(mp);
        b.synchronize_forward(&temp).unwrap();
        b.synchronize_backward(&temp).unwrap();
        let mp = b.multipatch().read();
        prop_assert_eq!(mp.patch(1).unwrap().field(&temp).unwrap().as_slice(), values.as_slice());
    }
}
