//! rota-planner core
//!
//! Orders door-to-door sales stops into a short visiting sequence before
//! handing off to a map application.

pub mod error;
pub mod point;
pub mod traits;
pub mod haversine;
pub mod ors;
pub mod osrm;
pub mod oracle;
pub mod tour;
pub mod two_opt;
pub mod cluster;
pub mod planner;
pub mod location;
pub mod suggest;
pub mod customer;
pub mod geocode;
pub mod maps;
pub mod logging;

pub use error::{Error, Result};
pub use point::Point;
pub use planner::{optimize, plan, RouteOptions, RoutePlan};
