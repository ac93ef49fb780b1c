mod model;

pub use model::{MockContentModel, MockContentResult};
