//! **tacgrid-core** — grid geometry primitives and maximal-rectangle search.
//!
//! This crate provides the foundational types used across the *tacgrid*
//! ecosystem: world positions ([`Point3`]), integer grid coordinates
//! ([`GridPoint`], [`GridRect`]), distance helpers, and the
//! maximal-rectangle finder ([`biggest_rect_all`], [`biggest_rect`]).

pub mod geom;
pub mod rect;

pub use geom::{GridPoint, GridRect, Point3, bound_angle, manhattan, ortho_dist};
pub use rect::{RectPreference, biggest_rect, biggest_rect_all};
