//! Procedural scene content: ground plane, the repeated prop and the skybox.

pub mod instances;
pub mod mesh;
pub mod skybox;

pub use instances::grid_instances;
pub use mesh::{cuboid, ground_plane, prop, sphere, Mesh, Vertex, GROUND_COLOR};
pub use skybox::{skybox_view_projection, SKYBOX_INDICES, SKYBOX_VERTICES};
