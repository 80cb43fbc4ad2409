mod ids;

pub use ids::CategoryId;
