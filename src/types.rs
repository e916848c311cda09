use nalgebra::{Point3, Vector3};

/// Scalar field value at a point in space.
pub type Value = f64;

/// A 3D point with [`Value`] components.
pub type Point = Point3<Value>;

/// A 3D vector with [`Value`] components.
pub type Vector = Vector3<Value>;

/// One output face: three vertex positions, not index-referenced.
///
/// Adjacent cells emit their own copies of shared vertices; welding them is
/// left to whoever builds a renderable mesh from the face list.
pub type Triangle = [Point; 3];

/// A scalar field function: maps a [`Point`] to a [`Value`].
///
/// Wrap one in [`FnField`](crate::fields::FnField) to give it an isovalue.
pub type CompiledFunction = dyn Fn(&Point) -> Value + Sync;
