//! Control points, control grids and per-control-point field grids.

use std::fmt;

use crate::bridge_error::BridgeError;

/// Weighted control point `(x, y, z, w)`.
///
/// Identity is positional: a control point is whatever sits at a given index
/// of a patch's control grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl ControlPoint {
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Cartesian coordinates.
    #[inline]
    pub fn coordinates(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl fmt::Display for ControlPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

/// Flat grid of values, one per control point, with an optional tensor shape
/// (first direction varies fastest).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ControlGrid<V> {
    shape: Vec<usize>,
    data: Vec<V>,
}

impl<V> ControlGrid<V> {
    /// Structured grid; `data.len()` must equal the product of `shape`.
    pub fn structured(shape: Vec<usize>, data: Vec<V>) -> Result<Self, BridgeError> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(BridgeError::SizeMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Grid without tensor structure.
    pub fn unstructured(data: Vec<V>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Extent per direction.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Entry at a flat index.
    pub fn get(&self, i: usize) -> Result<&V, BridgeError> {
        self.data.get(i).ok_or(BridgeError::GridIndexOutOfRange {
            index: i,
            len: self.data.len(),
        })
    }

    /// Overwrite the entry at a flat index.
    pub fn set(&mut self, i: usize, value: V) -> Result<(), BridgeError> {
        let len = self.data.len();
        let slot = self
            .data
            .get_mut(i)
            .ok_or(BridgeError::GridIndexOutOfRange { index: i, len })?;
        *slot = value;
        Ok(())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.data.iter()
    }

    /// Copy of the entries at `indices`, in that order, as an unstructured grid.
    pub fn select(&self, indices: &[usize]) -> Result<Self, BridgeError>
    where
        V: Clone,
    {
        let data = indices
            .iter()
            .map(|&i| self.get(i).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::unstructured(data))
    }
}

impl<V: Clone + Default> ControlGrid<V> {
    /// Unstructured grid of `n` default values.
    pub fn with_len(n: usize) -> Self {
        Self::unstructured(vec![V::default(); n])
    }
}

/// Nodal variable: a named quantity with a fixed number of components.
///
/// Deserialization rejects zero components.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "VariableRepr")]
pub struct Variable {
    name: String,
    components: usize,
}

#[derive(serde::Deserialize)]
struct VariableRepr {
    name: String,
    components: usize,
}

impl TryFrom<VariableRepr> for Variable {
    type Error = BridgeError;

    fn try_from(raw: VariableRepr) -> Result<Self, Self::Error> {
        if raw.components == 0 {
            return Err(BridgeError::InvalidVariable(raw.name));
        }
        Ok(Self {
            name: raw.name,
            components: raw.components,
        })
    }
}

impl Variable {
    /// Scalar variable.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: 1,
        }
    }

    /// Vector variable with `components` entries (at least one).
    pub fn vector(name: impl Into<String>, components: usize) -> Self {
        Self {
            name: name.into(),
            components: components.max(1),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn components(&self) -> usize {
        self.components
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Values of one variable at every control point of a patch.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "FieldGridRepr")]
pub struct FieldGrid {
    variable: Variable,
    values: Vec<f64>,
}

#[derive(serde::Deserialize)]
struct FieldGridRepr {
    variable: Variable,
    values: Vec<f64>,
}

impl TryFrom<FieldGridRepr> for FieldGrid {
    type Error = BridgeError;

    fn try_from(raw: FieldGridRepr) -> Result<Self, Self::Error> {
        Self::from_values(raw.variable, raw.values)
    }
}

impl FieldGrid {
    /// Zero-initialised grid for `n` control points.
    pub fn zeros(variable: Variable, n: usize) -> Self {
        let values = vec![0.0; n * variable.components()];
        Self { variable, values }
    }

    /// Grid from flat values (`components` values per control point).
    pub fn from_values(variable: Variable, values: Vec<f64>) -> Result<Self, BridgeError> {
        if values.len() % variable.components() != 0 {
            return Err(BridgeError::SizeMismatch {
                expected: values.len().next_multiple_of(variable.components()),
                found: values.len(),
            });
        }
        Ok(Self { variable, values })
    }

    #[inline]
    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    /// Number of control points covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len() / self.variable.components()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a control point.
    pub fn get(&self, i: usize) -> Result<&[f64], BridgeError> {
        let c = self.variable.components();
        self.values
            .get(i * c..(i + 1) * c)
            .ok_or(BridgeError::GridIndexOutOfRange {
                index: i,
                len: self.len(),
            })
    }

    /// Overwrite the value at a control point.
    pub fn set(&mut self, i: usize, value: &[f64]) -> Result<(), BridgeError> {
        let c = self.variable.components();
        if value.len() != c {
            return Err(BridgeError::SizeMismatch {
                expected: c,
                found: value.len(),
            });
        }
        let len = self.len();
        let slot = self
            .values
            .get_mut(i * c..(i + 1) * c)
            .ok_or(BridgeError::GridIndexOutOfRange { index: i, len })?;
        slot.copy_from_slice(value);
        Ok(())
    }

    /// Flat values.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Copy of the values at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Result<Self, BridgeError> {
        let mut values = Vec::with_capacity(indices.len() * self.variable.components());
        for &i in indices {
            values.extend_from_slice(self.get(i)?);
        }
        Ok(Self {
            variable: self.variable.clone(),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_grid_checks_size() {
        assert!(ControlGrid::structured(vec![2, 3], vec![0.0; 6]).is_ok());
        assert_eq!(
            ControlGrid::structured(vec![2, 3], vec![0.0; 5]).unwrap_err(),
            BridgeError::SizeMismatch {
                expected: 6,
                found: 5
            }
        );
    }

    #[test]
    fn grid_access_is_bounds_checked() {
        let mut g = ControlGrid::<ControlPoint>::with_len(2);
        g.set(1, ControlPoint::new(1.0, 2.0, 3.0, 0.5)).unwrap();
        assert_eq!(g.get(1).unwrap().w, 0.5);
        assert_eq!(
            g.get(2).unwrap_err(),
            BridgeError::GridIndexOutOfRange { index: 2, len: 2 }
        );
        assert!(g.set(5, ControlPoint::default()).is_err());
    }

    #[test]
    fn field_grid_per_point_slices() {
        let mut f = FieldGrid::zeros(Variable::vector("DISPLACEMENT", 3), 2);
        assert_eq!(f.len(), 2);
        f.set(1, &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(f.get(1).unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(f.get(0).unwrap(), &[0.0, 0.0, 0.0]);
        assert!(f.set(0, &[1.0]).is_err());
        assert!(f.get(2).is_err());
        assert_eq!(f.select(&[1]).unwrap().as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn variable_json_roundtrip() {
        let v = Variable::vector("DISPLACEMENT", 3);
        let back: Variable = serde_json::from_str(&serde_json::to_string(&v).unwrap()).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn zero_component_variable_is_rejected_on_load() {
        let err = serde_json::from_str::<Variable>(r#"{"name":"T","components":0}"#).unwrap_err();
        assert!(err.to_string().contains("at least one component"));
        assert_eq!(Variable::vector("T", 0).components(), 1);
    }

    #[test]
    fn field_grid_load_checks_value_count() {
        let ok: FieldGrid = serde_json::from_str(
            r#"{"variable":{"name":"V","components":2},"values":[1.0,2.0,3.0,4.0]}"#,
        )
        .unwrap();
        assert_eq!(ok.len(), 2);
        assert_eq!(ok.get(1).unwrap(), &[3.0, 4.0]);

        assert!(serde_json::from_str::<FieldGrid>(
            r#"{"variable":{"name":"V","components":2},"values":[1.0,2.0,3.0]}"#,
        )
        .is_err());
        assert!(serde_json::from_str::<FieldGrid>(
            r#"{"variable":{"name":"V","components":0},"values":[]}"#,
        )
        .is_err());
    }
}
