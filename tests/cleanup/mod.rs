//! Cleanup behaviour against a recording session double.

mod mock;
mod test_dm;
mod test_group;
