//! Entity synthesis from the parametric cells of a finite-element space.
//!
//! Each cell becomes one entity. Node ids and weights are both looked up
//! through the cell's anchor list, in anchor order, so node `i`, weight `i`
//! and extraction-operator row `i` always describe the same control point.

use std::sync::Arc;

use crate::bridge_error::BridgeError;
use crate::mesh::entity::{EntityContainer, EntityFlags};
use crate::mesh::geometry::IsogeometricGeometry;
use crate::mesh::model_part::Mesh;
use crate::mesh::properties::Properties;
use crate::mesh::registry::EntityRegistry;
use crate::patch::control_grid::{ControlGrid, ControlPoint};
use crate::patch::fe_space::FESpace;
use crate::topology::point::NodeIdMap;

/// What to create and how to number it.
#[derive(Clone, Debug)]
pub struct EntityRequest<'a> {
    pub type_name: &'a str,
    pub starting_id: usize,
    pub properties: Arc<Properties>,
    /// Used when `properties` carries no integration method.
    pub default_integration_method: i32,
}

/// Create one entity per cell of `space`.
///
/// Ids run from `request.starting_id` upwards in cell order. The returned
/// container is unique by id.
///
/// # Errors
/// - `UnknownEntityType` if the type is not registered (checked first);
/// - `MissingNode` if an anchor has no node in `mesh`;
/// - `GridIndexOutOfRange` if an anchor has no control point.
pub fn create_entities_from_fe_space<S>(
    space: &S,
    control_grid: &ControlGrid<ControlPoint>,
    mesh: &Mesh,
    registry: &EntityRegistry,
    node_map: &NodeIdMap,
    request: &EntityRequest<'_>,
) -> Result<EntityContainer, BridgeError>
where
    S: FESpace + ?Sized,
{
    registry.ensure_registered(request.type_name)?;

    let orders = [space.order(0), space.order(1), space.order(2)];
    let max_integration_method = request
        .properties
        .integration_method()
        .unwrap_or(request.default_integration_method);

    let cells = space.construct_cells()?;
    let mut out = EntityContainer::new();
    for (cnt, cell) in (request.starting_id..).zip(&cells) {
        let anchors = cell.supported_anchors();
        let mut nodes = Vec::with_capacity(anchors.len());
        let mut weights = Vec::with_capacity(anchors.len());
        for &anchor in anchors {
            let node = node_map.node_id(anchor);
            if !mesh.has_node(node) {
                return Err(BridgeError::MissingNode(node));
            }
            let local = space
                .local_id(anchor)
                .ok_or(BridgeError::GridIndexOutOfRange {
                    index: anchor,
                    len: control_grid.len(),
                })?;
            nodes.push(node);
            weights.push(control_grid.get(local)?.w);
        }

        let mut geometry = IsogeometricGeometry::new(nodes);
        geometry.assign_geometry_data(
            weights,
            cell.compressed_extraction_operator(),
            orders,
            max_integration_method,
        )?;

        let mut entity = registry.create(
            request.type_name,
            cnt,
            geometry,
            Arc::clone(&request.properties),
        )?;
        entity.set_flags(EntityFlags::ACTIVE);
        out.push(Arc::from(entity));
    }
    out.unique();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nurbs::knot_array::KnotArray1D;
    use crate::patch::fe_space::BSplineFESpace;

    fn line_space() -> BSplineFESpace {
        let k: KnotArray1D<f64> = [0.0, 0.0, 0.0, 1.0, 2.0, 2.0, 2.0].into_iter().collect();
        BSplineFESpace::new(vec![k], vec![2]).unwrap()
    }

    fn grid() -> ControlGrid<ControlPoint> {
        ControlGrid::unstructured(
            (0..4)
                .map(|i| ControlPoint::new(i as f64, 0.0, 0.0, 1.0 + i as f64))
                .collect(),
        )
    }

    fn mesh_with_nodes(n: usize, map: &NodeIdMap) -> Mesh {
        let mut m = Mesh::new("m");
        for eq in 0..n {
            m.create_node(map.node_id(eq), [eq as f64, 0.0, 0.0]).unwrap();
        }
        m
    }

    fn registry() -> EntityRegistry {
        let mut r = EntityRegistry::new("Element");
        r.register_isogeometric("Bezier1D");
        r
    }

    fn request(name: &str) -> EntityRequest<'_> {
        EntityRequest {
            type_name: name,
            starting_id: 10,
            properties: Arc::new(Properties::new(1)),
            default_integration_method: 1,
        }
    }

    #[test]
    fn one_entity_per_cell() {
        let map = NodeIdMap::default();
        let mesh = mesh_with_nodes(4, &map);
        let out = create_entities_from_fe_space(
            &line_space(),
            &grid(),
            &mesh,
            &registry(),
            &map,
            &request("Bezier1D"),
        )
        .unwrap();
        assert_eq!(out.ids(), vec![10, 11]);
        let second = out.get(11).unwrap();
        let node_ids: Vec<u64> = second.geometry().nodes().iter().map(|n| n.get()).collect();
        assert_eq!(node_ids, vec![2, 3, 4]);
        assert_eq!(second.geometry().weights(), &[2.0, 3.0, 4.0]);
        assert_eq!(second.geometry().orders(), [2, 0, 0]);
        assert_eq!(second.geometry().max_integration_method(), 1);
        assert!(second.flags().active);
        assert_eq!(second.properties().id(), 1);
    }

    #[test]
    fn integration_method_comes_from_properties() {
        let map = NodeIdMap::default();
        let mesh = mesh_with_nodes(4, &map);
        let mut req = request("Bezier1D");
        req.properties = Arc::new(Properties::new(1).with_integration_method(5));
        let out =
            create_entities_from_fe_space(&line_space(), &grid(), &mesh, &registry(), &map, &req)
                .unwrap();
        assert!(out.iter().all(|e| e.geometry().max_integration_method() == 5));
    }

    #[test]
    fn unknown_type_fails_before_node_lookup() {
        let map = NodeIdMap::default();
        let empty = Mesh::new("empty");
        let err = create_entities_from_fe_space(
            &line_space(),
            &grid(),
            &empty,
            &registry(),
            &map,
            &request("Nope"),
        )
        .unwrap_err();
        assert!(matches!(err, BridgeError::UnknownEntityType { .. }));
    }

    #[test]
    fn missing_nodes_are_reported() {
        let map = NodeIdMap::default();
        let mesh = mesh_with_nodes(3, &map);
        let err = create_entities_from_fe_space(
            &line_space(),
            &grid(),
            &mesh,
            &registry(),
            &map,
            &request("Bezier1D"),
        )
        .unwrap_err();
        assert_eq!(err, BridgeError::MissingNode(map.node_id(3)));
    }
}
