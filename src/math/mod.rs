pub mod convex_hull_2d;
pub mod intersect_2d;
pub mod polygon_2d;
pub mod projection;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 3x3 rotation matrix.
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;
