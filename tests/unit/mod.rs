//! Unit test modules.

mod analytics_test;
mod intervals_test;
mod zones_test;
