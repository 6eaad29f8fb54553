//! Unit test runner for layout_estimator

mod test_estimator;
