pub(crate) mod api_json;
pub mod hierarchy;
pub mod loader;
pub mod model;

#[cfg(test)]
pub(crate) mod test_support;
