pub mod auth;
pub mod client;
pub mod exam_papers;
pub mod exam_points;
pub mod location;
pub mod session;
pub mod users;
