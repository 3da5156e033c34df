pub mod adapter;
pub mod model;

pub use adapter::LogAdapter;
pub use model::HostModel;
