pub mod auth;
pub mod error;
pub mod favorites;
pub mod middleware;
pub mod provider;
pub mod recipes;
pub mod routes;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
