pub mod railway;
pub mod vercel;

pub use railway::RailwayAdapter;
pub use vercel::VercelAdapter;
