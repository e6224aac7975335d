mod vector3;
mod shape;
mod convex_mesh;
mod simplex;

pub use vector3::*;
pub use shape::*;
pub use convex_mesh::*;
pub use simplex::*;

#[cfg(test)]
mod convex_mesh_tests;
