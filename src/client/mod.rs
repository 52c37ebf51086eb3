//! Client connection layer

pub mod control_plane;
pub mod raw_connection;

pub use control_plane::{ControlPlane, ControlPlaneExt};
pub use raw_connection::{ConnectionFactory, RawConnection};

#[cfg(test)]
pub(crate) use control_plane::mock::MockControlPlane;
